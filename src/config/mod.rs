use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;

use crate::rates::RateDistribution;
use crate::substitution_models::DNASubstModel;
use crate::Result;

/// Key-value run parameters, read from a parameter file with optional
/// command-line overrides.
///
/// The file holds one `key = value` pair per line; blank lines and lines
/// starting with `#` are ignored, later assignments win.
#[derive(Debug, Clone, Default)]
pub struct Config {
    params: HashMap<String, String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Reading parameters from file {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read parameter file {}", path.display()))?;
        let mut config = Config::default();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            config.set_pair(line).with_context(|| {
                format!("Malformed parameter on line {} of {}", lineno + 1, path.display())
            })?;
        }
        Ok(config)
    }

    /// Reads the parameter file and applies `key=value` overrides on top.
    pub fn from_sources(path: &Path, overrides: &[String]) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        for pair in overrides {
            config.set_pair(pair)?;
        }
        Ok(config)
    }

    fn set_pair(&mut self, pair: &str) -> Result<()> {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected key=value, got \"{}\".", pair);
        };
        self.params
            .insert(key.trim().to_string(), value.trim().to_string());
        Ok(())
    }

    pub fn str_param(&self, key: &str) -> Result<&str> {
        match self.params.get(key) {
            Some(value) => Ok(value),
            None => bail!("Missing required parameter \"{}\".", key),
        }
    }

    pub fn str_param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.params.get(key).map(String::as_str).unwrap_or(default)
    }

    pub fn path_param(&self, key: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(self.str_param(key)?))
    }

    pub fn f64_param_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.params.get(key) {
            Some(value) => value
                .parse::<f64>()
                .with_context(|| format!("Parameter \"{}\" is not a number: {}", key, value)),
            None => Ok(default),
        }
    }

    pub fn usize_param_or(&self, key: &str, default: usize) -> Result<usize> {
        match self.params.get(key) {
            Some(value) => value
                .parse::<usize>()
                .with_context(|| format!("Parameter \"{}\" is not a count: {}", key, value)),
            None => Ok(default),
        }
    }

    pub fn bool_param_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.params.get(key).map(String::as_str) {
            None => Ok(default),
            Some("true") | Some("yes") | Some("1") => Ok(true),
            Some("false") | Some("no") | Some("0") => Ok(false),
            Some(other) => bail!("Parameter \"{}\" is not a boolean: {}", key, other),
        }
    }

    /// Whitespace-separated list of numbers; missing key means empty list.
    pub fn f64_list_param(&self, key: &str) -> Result<Vec<f64>> {
        let Some(value) = self.params.get(key) else {
            return Ok(Vec::new());
        };
        value
            .split_whitespace()
            .map(|v| {
                v.parse::<f64>().with_context(|| {
                    format!("Parameter \"{}\" contains a non-number: {}", key, v)
                })
            })
            .collect()
    }
}

/// Builds the substitution model selected by `model` and `model.params`.
/// Only the DNA alphabet is supported.
pub fn model_from_config(config: &Config) -> Result<DNASubstModel> {
    let alphabet = config.str_param_or("alphabet", "DNA");
    if !alphabet.eq_ignore_ascii_case("DNA") {
        bail!("Unsupported alphabet \"{}\", only DNA is available.", alphabet);
    }
    let name = config.str_param("model")?;
    let params = config.f64_list_param("model.params")?;
    DNASubstModel::new(name, &params)
}

/// Builds the across-site rate distribution selected by `rate.distribution`,
/// `rate.categories` and `rate.alpha`.
pub fn rates_from_config(config: &Config) -> Result<RateDistribution> {
    let name = config.str_param_or("rate.distribution", "Constant");
    match name.to_lowercase().as_str() {
        "constant" | "uniform" => Ok(RateDistribution::constant()),
        "gamma" => RateDistribution::gamma(
            config.f64_param_or("rate.alpha", 0.5)?,
            config.usize_param_or("rate.categories", 4)?,
        ),
        _ => bail!("Unknown rate distribution requested: {}.", name),
    }
}
