use anyhow::bail;
use approx::relative_eq;

use crate::substitution_models::{FreqVector, SubstMatrix};
use crate::Result;

mod dna_substitution_parameters;
pub use dna_substitution_parameters::*;

mod gtr;
mod hky;
mod jc69;
mod k80;
mod tn93;
pub use gtr::*;
pub use hky::*;
pub use jc69::*;
pub use k80::*;
pub use tn93::*;

/// A time-reversible DNA substitution model over the state order TCAG.
///
/// The rate matrix is normalised to one expected substitution per unit time
/// at equilibrium, so branch lengths are in expected substitutions per site.
#[derive(Debug, Clone, PartialEq)]
pub struct DNASubstModel {
    pub(crate) params: DNASubstParams,
    pub(crate) q: SubstMatrix,
}

impl DNASubstModel {
    /// Creates a model by name with a flat parameter slice.
    ///
    /// Parameter layouts: JC69 takes none; K80 takes `[alpha]` or
    /// `[alpha, beta]`; HKY takes `[pi_t, pi_c, pi_a, pi_g, kappa]`; TN93
    /// takes `[pi_t, pi_c, pi_a, pi_g, alpha1, alpha2, beta]`; GTR takes
    /// `[pi_t, pi_c, pi_a, pi_g, rtc, rta, rtg, rca, rcg, rag]`.
    pub fn new(model_name: &str, model_params: &[f64]) -> Result<Self> {
        match model_name.to_uppercase().as_str() {
            "JC69" => jc69(model_params),
            "K80" => k80(model_params),
            "HKY" | "HKY85" => hky(model_params),
            "TN93" => tn93(model_params),
            "GTR" => gtr(model_params),
            _ => bail!("Unknown DNA model requested: {}.", model_name),
        }
    }

    pub fn q(&self) -> &SubstMatrix {
        &self.q
    }

    pub fn freqs(&self) -> &FreqVector {
        &self.params.pi
    }

    pub fn params(&self) -> &DNASubstParams {
        &self.params
    }

    /// Transition probability matrix for the given evolutionary time.
    pub fn p(&self, time: f64) -> SubstMatrix {
        (self.q.clone() * time).exp()
    }
}

fn make_dna_model(params: DNASubstParams, q: SubstMatrix) -> DNASubstModel {
    DNASubstModel { params, q }
}

fn make_pi(pi_array: &[f64]) -> Result<FreqVector> {
    let pi = FreqVector::from_column_slice(pi_array);
    debug_assert!(
        pi.len() == 4,
        "There have to be 4 equilibrium frequencies for DNA models."
    );
    if !relative_eq!(pi.sum(), 1.0, epsilon = 1e-10) {
        bail!("The equilibrium frequencies provided do not sum up to 1.");
    }
    Ok(pi)
}
