use std::path::PathBuf;

use log::info;

use crate::io::read_sequences;
use crate::phylo_info::PhyloInfo;
use crate::Result;

/// Builds a [`PhyloInfo`] from an aligned fasta file.
pub struct PhyloInfoBuilder {
    sequence_file: PathBuf,
}

impl PhyloInfoBuilder {
    pub fn new(sequence_file: PathBuf) -> PhyloInfoBuilder {
        PhyloInfoBuilder { sequence_file }
    }

    /// Reads the sequences and compiles the leaf encodings.
    /// Bails if the file is missing, malformed, not DNA or not aligned.
    pub fn build(self) -> Result<PhyloInfo> {
        info!(
            "Reading alignment from file {}",
            self.sequence_file.display()
        );
        let msa = read_sequences(&self.sequence_file)?;
        PhyloInfo::from_aligned(msa)
    }
}
