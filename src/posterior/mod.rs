use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{bail, Context};
use log::{info, warn};
use statrs::distribution::{Continuous, Exp};

use crate::config::{model_from_config, rates_from_config, Config};
use crate::io::read_newick_from_file;
use crate::likelihood::{PhyloCostFunction, TreeLikelihood};
use crate::phylo_info::PhyloInfoBuilder;
use crate::tree::Tree;
use crate::Result;

pub const CSV_HEADER: &str = "branch_length,prior,likelihood,posterior";

/// One step of the branch-length sweep; `posterior` is the unnormalised
/// log-joint density `prior + likelihood`.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorRow {
    pub branch_length: f64,
    pub prior: f64,
    pub likelihood: f64,
    pub posterior: f64,
}

/// The swept branch-length grid: `steps` values starting at `min`, spaced by
/// `max / steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

impl SweepGrid {
    /// The pendant branch-length grid over (0, 1] used by the program.
    pub fn pendant(steps: usize) -> Self {
        SweepGrid {
            min: 1e-6,
            max: 1.0,
            steps,
        }
    }

    pub fn lengths(&self) -> impl Iterator<Item = f64> + '_ {
        let step = self.max / self.steps as f64;
        (0..self.steps).map(move |i| self.min + i as f64 * step)
    }
}

/// Sweeps the pendant branch length of `taxon` over the grid, recording the
/// exponential log-prior (mean `exp_mean`), the log-likelihood and their
/// sum per step. The curve is left unnormalised for downstream consumers.
pub fn sweep(
    tree: &Tree,
    taxon: &str,
    grid: &SweepGrid,
    exp_mean: f64,
    cost: &impl PhyloCostFunction,
) -> Result<Vec<PosteriorRow>> {
    if grid.steps == 0 {
        bail!("The sweep needs at least one step.");
    }
    if exp_mean <= 0.0 {
        bail!("The exponential prior mean must be positive, got {}.", exp_mean);
    }
    let leaf = tree.leaf_by_id(taxon)?;
    let prior = Exp::new(1.0 / exp_mean)?;

    let mut working = tree.clone();
    let mut rows = Vec::with_capacity(grid.steps);
    for branch_length in grid.lengths() {
        working.set_blen(&leaf, branch_length);
        let likelihood = cost.logl(&working);
        let log_prior = prior.ln_pdf(branch_length);
        rows.push(PosteriorRow {
            branch_length,
            prior: log_prior,
            likelihood,
            posterior: log_prior + likelihood,
        });
    }
    Ok(rows)
}

pub fn write_rows<W: Write>(writer: &mut W, rows: &[PosteriorRow]) -> Result<()> {
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{}",
            row.branch_length, row.prior, row.likelihood, row.posterior
        )?;
    }
    Ok(())
}

/// The whole empirical-posterior program: load data, model, rates and the
/// tree, sweep the taxon's pendant branch and write the CSV.
pub fn run(config: &Config) -> Result<()> {
    let info = PhyloInfoBuilder::new(config.path_param("input.sequence.file")?).build()?;
    let model = model_from_config(config)?;
    let rates = rates_from_config(config)?;
    let trees = read_newick_from_file(&config.path_param("input.tree.file")?)?;
    if trees.len() > 1 {
        warn!("The tree file has {} trees, only the first is swept.", trees.len());
    }
    let tree = &trees[0];
    info.validate_tree_leaves(tree)?;

    let taxon = config.str_param("posterior.new_taxon")?;
    let exp_mean = config.f64_param_or("posterior.exp_mean", 0.1)?;
    let steps = config.usize_param_or("posterior.steps", 1000)?;

    let output_path = config.path_param("output.file")?;
    let output = File::create(&output_path)
        .with_context(|| format!("Cannot create output file {}", output_path.display()))?;
    let mut output = BufWriter::new(output);
    writeln!(output, "{}", CSV_HEADER)?;

    let cost = TreeLikelihood::new(&info, &model, &rates);
    info!(
        "Sweeping the pendant branch of {} over {} steps.",
        taxon, steps
    );
    let rows = sweep(tree, taxon, &SweepGrid::pendant(steps), exp_mean, &cost)?;
    write_rows(&mut output, &rows)?;
    output.flush()?;
    info!("Wrote results to {}.", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests;
