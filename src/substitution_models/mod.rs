use nalgebra::{DMatrix, DVector};

pub mod dna_models;
pub use dna_models::*;

pub type SubstMatrix = DMatrix<f64>;
pub type FreqVector = DVector<f64>;

#[cfg(test)]
mod tests;
