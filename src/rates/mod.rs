use anyhow::bail;
use log::info;
use statrs::distribution::{ContinuousCDF, Gamma};

use crate::Result;

/// Discrete distribution of substitution rates across sites.
///
/// Site likelihoods are averaged over the categories with the category
/// weights. The rates always have weighted mean 1 so that branch lengths
/// keep their expected-substitutions-per-site scale.
#[derive(Debug, Clone, PartialEq)]
pub struct RateDistribution {
    rates: Vec<f64>,
    weights: Vec<f64>,
}

impl RateDistribution {
    /// Single rate of 1, i.e. no rate heterogeneity.
    pub fn constant() -> Self {
        Self {
            rates: vec![1.0],
            weights: vec![1.0],
        }
    }

    /// Gamma distribution with the given shape, discretised into
    /// equal-weight categories at the quantile medians and rescaled to mean
    /// exactly 1.
    pub fn gamma(alpha: f64, categories: usize) -> Result<Self> {
        if categories == 0 {
            bail!("A discretised Gamma needs at least one rate category.");
        }
        if alpha <= 0.0 {
            bail!("The Gamma shape parameter must be positive, got {}.", alpha);
        }
        info!(
            "Setting up discretised Gamma rates with alpha = {} and {} categories.",
            alpha, categories
        );
        let gamma = Gamma::new(alpha, alpha)?;
        let mut rates: Vec<f64> = (0..categories)
            .map(|cat| gamma.inverse_cdf((2 * cat + 1) as f64 / (2 * categories) as f64))
            .collect();
        let mean = rates.iter().sum::<f64>() / categories as f64;
        rates.iter_mut().for_each(|rate| *rate /= mean);
        Ok(Self {
            rates,
            weights: vec![1.0 / categories as f64; categories],
        })
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn categories(&self) -> usize {
        self.rates.len()
    }
}
