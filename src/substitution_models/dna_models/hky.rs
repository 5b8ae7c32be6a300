use anyhow::bail;
use log::info;

use crate::substitution_models::dna_models::{
    make_dna_model, make_pi, tn93_params, tn93_q, DNASubstModel,
};
use crate::Result;

pub fn hky(model_params: &[f64]) -> Result<DNASubstModel> {
    if model_params.len() != 5 {
        bail!(
            "{} parameters for the hky model, expected 5, got {}",
            if model_params.len() < 5 {
                "Not enough"
            } else {
                "Too many"
            },
            model_params.len()
        );
    }
    let pi = make_pi(&model_params[0..4])?;
    let params = tn93_params(pi, model_params[4], model_params[4], 1.0);
    info!("Setting up hky with parameters {}", params.print_as_hky());
    let q = tn93_q(&params);
    Ok(make_dna_model(params, q))
}
