use std::fs;
use std::io::Write as _;

use approx::assert_relative_eq;

use crate::config::Config;
use crate::likelihood::{PhyloCostFunction, TreeLikelihood};
use crate::phylo_info::PhyloInfo;
use crate::posterior::{run, sweep, write_rows, SweepGrid, CSV_HEADER};
use crate::rates::RateDistribution;
use crate::record_wo_desc as record;
use crate::substitution_models::DNASubstModel;
use crate::tree;

const NEWICK: &str = "((t1:0.1,t2:0.15):0.05,(t3:0.2,t4:0.2):0.1):0.0;";

fn four_taxon_info() -> PhyloInfo {
    PhyloInfo::from_aligned(vec![
        record!("t1", b"ACGTACGT"),
        record!("t2", b"CCTTACGA"),
        record!("t3", b"CCTTATGT"),
        record!("t4", b"GGAACTGT"),
    ])
    .unwrap()
}

#[test]
fn grid_matches_the_documented_example() {
    let lengths: Vec<f64> = SweepGrid::pendant(4).lengths().collect();
    let expected = [1e-6, 0.25 + 1e-6, 0.5 + 1e-6, 0.75 + 1e-6];
    assert_eq!(lengths.len(), 4);
    for (actual, expected) in lengths.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, epsilon = 1e-12);
    }
}

#[test]
fn grid_is_strictly_increasing_within_bounds() {
    let grid = SweepGrid::pendant(100);
    let lengths: Vec<f64> = grid.lengths().collect();
    assert_eq!(lengths.len(), 100);
    assert_relative_eq!(lengths[0], 1e-6);
    assert!(lengths.windows(2).all(|w| w[0] < w[1]));
    assert!(*lengths.last().unwrap() < grid.max + grid.min);
}

#[test]
fn sweep_records_prior_likelihood_and_their_sum() {
    let info = four_taxon_info();
    let model = DNASubstModel::new("JC69", &[]).unwrap();
    let rates = RateDistribution::constant();
    let cost = TreeLikelihood::new(&info, &model, &rates);
    let tree = tree!(NEWICK);

    let exp_mean = 0.1;
    let grid = SweepGrid::pendant(5);
    let rows = sweep(&tree, "t4", &grid, exp_mean, &cost).unwrap();

    assert_eq!(rows.len(), 5);
    for (row, expected_bl) in rows.iter().zip(grid.lengths()) {
        assert_relative_eq!(row.branch_length, expected_bl);
        // The log prior is the exponential density with the requested mean.
        assert_relative_eq!(
            row.prior,
            -row.branch_length / exp_mean - exp_mean.ln(),
            epsilon = 1e-12
        );
        assert!(row.likelihood < 0.0);
        assert_eq!(row.posterior, row.prior + row.likelihood);
    }
    // The input tree is never mutated by the sweep.
    let pendant = tree.leaf_by_id("t4").unwrap();
    assert_relative_eq!(tree.blen(&pendant), 0.2);
}

#[test]
fn sweep_likelihood_matches_direct_evaluation() {
    let info = four_taxon_info();
    let model = DNASubstModel::new("HKY", &[0.22, 0.26, 0.33, 0.19, 2.0]).unwrap();
    let rates = RateDistribution::gamma(0.5, 4).unwrap();
    let cost = TreeLikelihood::new(&info, &model, &rates);
    let tree = tree!(NEWICK);

    let rows = sweep(&tree, "t3", &SweepGrid::pendant(3), 0.1, &cost).unwrap();
    let mut check = tree.clone();
    let leaf = check.leaf_by_id("t3").unwrap();
    for row in rows {
        check.set_blen(&leaf, row.branch_length);
        assert_relative_eq!(row.likelihood, cost.logl(&check), epsilon = 1e-12);
    }
}

#[test]
fn sweep_rejects_bad_arguments() {
    let info = four_taxon_info();
    let model = DNASubstModel::new("JC69", &[]).unwrap();
    let rates = RateDistribution::constant();
    let cost = TreeLikelihood::new(&info, &model, &rates);
    let tree = tree!(NEWICK);

    assert!(sweep(&tree, "t4", &SweepGrid::pendant(0), 0.1, &cost).is_err());
    assert!(sweep(&tree, "t4", &SweepGrid::pendant(5), 0.0, &cost).is_err());
    assert!(sweep(&tree, "t4", &SweepGrid::pendant(5), -0.1, &cost).is_err());
    assert!(sweep(&tree, "t9", &SweepGrid::pendant(5), 0.1, &cost).is_err());
}

#[test]
fn write_rows_emits_one_line_per_step() {
    let rows = vec![
        crate::posterior::PosteriorRow {
            branch_length: 1e-6,
            prior: 2.3,
            likelihood: -12.5,
            posterior: -10.2,
        },
        crate::posterior::PosteriorRow {
            branch_length: 0.25,
            prior: -0.2,
            likelihood: -14.0,
            posterior: -14.2,
        },
    ];
    let mut out = Vec::new();
    write_rows(&mut out, &rows).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "0.000001,2.3,-12.5,-10.2\n0.25,-0.2,-14,-14.2\n"
    );
}

#[test]
fn run_sweeps_into_the_csv() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    };
    write(
        "seqs.fasta",
        ">t1\nACGTACGT\n>t2\nCCTTACGA\n>t3\nCCTTATGT\n>t4\nGGAACTGT\n",
    );
    write("tree.newick", "((t1:0.1,t2:0.15):0.05,(t3:0.2,t4:0.2):0.1):0.0;\n");
    let params = write(
        "run.params",
        "model = JC69\nposterior.new_taxon = t4\nposterior.exp_mean = 0.2\nposterior.steps = 8\n",
    );
    let overrides = [
        format!("input.sequence.file={}", dir.path().join("seqs.fasta").display()),
        format!("input.tree.file={}", dir.path().join("tree.newick").display()),
        format!("output.file={}", dir.path().join("out.csv").display()),
    ];
    let config = Config::from_sources(&params, &overrides).unwrap();
    run(&config).unwrap();

    let output = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 1 + 8);
    let mut previous = f64::NEG_INFINITY;
    for line in &lines[1..] {
        let fields: Vec<f64> = line.split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 4);
        assert!(fields[0] > previous);
        previous = fields[0];
        assert_eq!(fields[3], fields[1] + fields[2]);
    }
}

#[test]
fn run_requires_the_swept_taxon() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    };
    write("seqs.fasta", ">t1\nACGT\n>t2\nACGA\n");
    write("tree.newick", "(t1:0.1,t2:0.15):0.0;\n");
    let params = write("run.params", "model = JC69\n");
    let overrides = [
        format!("input.sequence.file={}", dir.path().join("seqs.fasta").display()),
        format!("input.tree.file={}", dir.path().join("tree.newick").display()),
        format!("output.file={}", dir.path().join("out.csv").display()),
    ];
    let config = Config::from_sources(&params, &overrides).unwrap();
    assert!(run(&config).is_err());
}
