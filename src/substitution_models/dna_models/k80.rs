use std::ops::Div;

use log::{info, warn};

use crate::substitution_models::dna_models::{make_dna_model, DNASubstModel, DNASubstParams};
use crate::substitution_models::{FreqVector, SubstMatrix};
use crate::Result;

pub fn k80(model_params: &[f64]) -> Result<DNASubstModel> {
    let (alpha, beta) = match model_params {
        [] => {
            warn!("No values provided for K80, required 1 or 2 values, kappa or alpha and beta.");
            warn!("Falling back to default values.");
            (2.0, 1.0)
        }
        [alpha] => (*alpha, 1.0),
        [alpha, beta] => (*alpha, *beta),
        [alpha, beta, ..] => {
            warn!("Too many values provided for K80, required 2 values, alpha and beta.");
            warn!("Will only use the first two values provided.");
            (*alpha, *beta)
        }
    };
    let params = DNASubstParams {
        pi: FreqVector::from_column_slice(&[0.25; 4]),
        rtc: alpha,
        rta: beta,
        rtg: beta,
        rca: beta,
        rcg: beta,
        rag: alpha,
    };
    info!("Setting up k80 with parameters: {}", params.print_as_k80());
    let q = k80_q(&params);
    Ok(make_dna_model(params, q))
}

pub(crate) fn k80_q(p: &DNASubstParams) -> SubstMatrix {
    let alpha = p.rtc;
    let beta = p.rta;
    let total = alpha + 2.0 * beta;
    SubstMatrix::from_row_slice(
        4,
        4,
        &[
            -(alpha + 2.0 * beta),
            alpha,
            beta,
            beta,
            alpha,
            -(alpha + 2.0 * beta),
            beta,
            beta,
            beta,
            beta,
            -(alpha + 2.0 * beta),
            alpha,
            beta,
            beta,
            alpha,
            -(alpha + 2.0 * beta),
        ],
    )
    .div(total)
}
