use std::collections::HashMap;

use anyhow::bail;
use bio::io::fasta::Record;
use itertools::Itertools;
use nalgebra::DMatrix;

use crate::alphabets::{dna_alphabet, Alphabet};
use crate::tree::Tree;
use crate::Result;

mod phyloinfo_builder;
pub use phyloinfo_builder::*;

/// Aligned sequences together with their per-leaf state encodings.
///
/// The encodings are computed once and reused for every likelihood
/// evaluation; one matrix per sequence, one column per site.
#[derive(Debug)]
pub struct PhyloInfo {
    pub msa: Vec<Record>,
    alphabet: Alphabet,
    leaf_encoding: HashMap<String, DMatrix<f64>>,
}

impl PhyloInfo {
    /// Builds the container from aligned records, validating that there is
    /// at least one sequence, that all sequences have equal length and that
    /// the ids are unique.
    pub fn from_aligned(msa: Vec<Record>) -> Result<Self> {
        if msa.is_empty() {
            bail!("No sequences provided.");
        }
        let msa_len = msa[0].seq().len();
        if msa_len == 0 {
            bail!("The provided sequences are empty.");
        }
        if msa.iter().any(|rec| rec.seq().len() != msa_len) {
            bail!("The provided sequences are not aligned.");
        }
        if let Some(id) = msa.iter().map(|rec| rec.id()).duplicates().next() {
            bail!("Duplicate sequence id {} in the alignment.", id);
        }
        let alphabet = dna_alphabet();
        let leaf_encoding = generate_leaf_encoding(&msa, &alphabet);
        Ok(Self {
            msa,
            alphabet,
            leaf_encoding,
        })
    }

    /// Number of sites in the alignment.
    pub fn msa_len(&self) -> usize {
        self.msa[0].seq().len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the encoding of a leaf sequence by its id.
    pub fn leaf_encoding(&self, id: &str) -> Result<&DMatrix<f64>> {
        match self.leaf_encoding.get(id) {
            Some(encoding) => Ok(encoding),
            None => bail!("No encoding found for leaf with id {}.", id),
        }
    }

    /// Checks that every leaf of the tree has a sequence in the alignment.
    pub fn validate_tree_leaves(&self, tree: &Tree) -> Result<()> {
        for id in tree.leaf_ids() {
            if !self.leaf_encoding.contains_key(&id) {
                bail!("No sequence provided for tree leaf {}.", id);
            }
        }
        Ok(())
    }
}

fn generate_leaf_encoding(
    msa: &[Record],
    alphabet: &Alphabet,
) -> HashMap<String, DMatrix<f64>> {
    let mut leaf_encoding = HashMap::with_capacity(msa.len());
    for seq in msa.iter() {
        leaf_encoding.insert(
            seq.id().to_string(),
            DMatrix::from_columns(
                seq.seq()
                    .iter()
                    .map(|&c| alphabet.char_encoding(c))
                    .collect::<Vec<_>>()
                    .as_slice(),
            ),
        );
    }
    leaf_encoding
}
