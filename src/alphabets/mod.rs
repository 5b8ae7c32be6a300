use lazy_static::lazy_static;

use crate::frequencies;
use crate::substitution_models::FreqVector;

pub static NUCLEOTIDES: &[u8] = b"TCAG";
pub static AMB_NUCLEOTIDES: &[u8] = b"RYSWKMBDHVNZX";
pub static GAP: u8 = b'-';
pub static POSSIBLE_GAPS: &[u8] = b"-*?";

/// The DNA alphabet over the fixed state order TCAG.
///
/// Gaps and unrecognised characters are treated as fully unknown, which
/// matches converting gaps to unknown characters before the likelihood
/// computation.
#[derive(Debug, PartialEq)]
pub struct Alphabet {
    symbols: &'static [u8],
    ambiguous: &'static [u8],
    char_sets: &'static [FreqVector],
    index: &'static [usize; 255],
}

impl Alphabet {
    pub fn is_word(&self, word: &[u8]) -> bool {
        word.to_ascii_uppercase()
            .iter()
            .all(|c| self.symbols.contains(c) | self.ambiguous.contains(c) | (*c == GAP))
    }

    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    pub fn ambiguous(&self) -> &'static [u8] {
        self.ambiguous
    }

    pub fn n(&self) -> usize {
        self.symbols.len()
    }

    /// State-indicator vector for a character, 1.0 for every compatible state.
    pub fn char_encoding(&self, char: u8) -> FreqVector {
        self.char_sets[char.to_ascii_uppercase() as usize].clone()
    }

    pub fn index(&self, char: &u8) -> usize {
        self.index[*char as usize]
    }
}

pub fn dna_alphabet() -> Alphabet {
    Alphabet {
        symbols: NUCLEOTIDES,
        ambiguous: AMB_NUCLEOTIDES,
        char_sets: &DNA_SETS,
        index: &NUCLEOTIDE_INDEX,
    }
}

lazy_static! {
    pub static ref NUCLEOTIDE_INDEX: [usize; 255] = {
        let mut index = [0; 255];
        for (i, char) in NUCLEOTIDES.iter().enumerate() {
            index[*char as usize] = i;
            index[(*char).to_ascii_lowercase() as usize] = i;
        }
        index
    };
    pub static ref DNA_SETS: Vec<FreqVector> = {
        let mut map = vec![frequencies!(&[0.0; 4]); 255];
        for (i, elem) in map.iter_mut().enumerate() {
            elem.set_column(0, &generic_dna_sets(i as u8));
        }
        map
    };
}

fn generic_dna_sets(char: u8) -> FreqVector {
    match char.to_ascii_uppercase() {
        b'T' => frequencies!(&[1.0, 0.0, 0.0, 0.0]),
        b'C' => frequencies!(&[0.0, 1.0, 0.0, 0.0]),
        b'A' => frequencies!(&[0.0, 0.0, 1.0, 0.0]),
        b'G' => frequencies!(&[0.0, 0.0, 0.0, 1.0]),
        b'M' => frequencies!(&[0.0, 1.0, 1.0, 0.0]),
        b'R' => frequencies!(&[0.0, 0.0, 1.0, 1.0]),
        b'W' => frequencies!(&[1.0, 0.0, 1.0, 0.0]),
        b'S' => frequencies!(&[0.0, 1.0, 0.0, 1.0]),
        b'Y' => frequencies!(&[1.0, 1.0, 0.0, 0.0]),
        b'K' => frequencies!(&[1.0, 0.0, 0.0, 1.0]),
        b'V' => frequencies!(&[0.0, 1.0, 1.0, 1.0]),
        b'D' => frequencies!(&[1.0, 0.0, 1.0, 1.0]),
        b'B' => frequencies!(&[1.0, 1.0, 0.0, 1.0]),
        b'H' => frequencies!(&[1.0, 1.0, 1.0, 0.0]),
        _ => frequencies!(&[1.0; 4]),
    }
}
