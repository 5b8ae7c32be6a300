use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{bail, Context};
use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::config::{model_from_config, rates_from_config, Config};
use crate::io::read_newick_from_file;
use crate::likelihood::{PhyloCostFunction, TreeLikelihood};
use crate::phylo_info::PhyloInfoBuilder;
use crate::tree::{NodeIdx, Tree};
use crate::Result;

pub const CSV_HEADER: &str =
    "tree,node,same_as_tree,d,mid_edge_log_like,rank,mid_edge_log_like_half,rank_half";

/// One candidate attachment edge of one tree, scored and ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub tree: usize,
    pub node: usize,
    pub same_as_tree: bool,
    pub d: f64,
    pub mid_edge_log_like: f64,
    pub rank: usize,
    pub mid_edge_log_like_half: f64,
    pub rank_half: usize,
}

impl CandidateRow {
    pub fn same(&self) -> &'static str {
        if self.same_as_tree {
            "yes"
        } else {
            "no"
        }
    }
}

/// Puts a tree into the canonical rooting every scan assumes: the first
/// leaf in id order becomes the outgroup, node ids are renumbered in
/// preorder, and the root's second edge is folded into the first so the
/// outgroup hangs on a zero-length calibration edge.
pub fn normalise_rooting(tree: &mut Tree) -> Result<()> {
    let Some(&outgroup) = tree.leaves().first() else {
        bail!("The tree has no leaves.");
    };
    tree.set_outgroup(outgroup)?;
    tree.renumber();
    let children = tree.node(&tree.root).children.clone();
    let moved = tree.blen(&children[1]);
    tree.set_blen(&children[0], tree.blen(&children[0]) + moved);
    tree.set_blen(&children[1], 0.0);
    Ok(())
}

/// Every edge a pruned taxon can be reattached to, identified by the edge's
/// child node: all live nodes except the root and the zero-length
/// calibration child.
pub fn candidate_edges(tree: &Tree) -> Vec<NodeIdx> {
    let calibration = tree.node(&tree.root).children[1];
    tree.preorder()
        .into_iter()
        .filter(|idx| *idx != tree.root && *idx != calibration)
        .collect()
}

/// Scores the reattachment of `taxon` at the midpoint of every candidate
/// edge of a normalised tree.
///
/// The taxon's original leaf and parent ids are recorded before pruning and
/// reused for the grafted nodes, and its pre-pruning sibling marks the true
/// attachment edge. Each candidate works on its own copy of the pruned tree
/// and is scored with the pendant branch at 0 and at 0.5. Rows come back
/// sorted by node id with 0-based dense ranks per metric, best first.
pub fn scan_tree(
    tree_idx: usize,
    tree: &Tree,
    taxon: &str,
    cost: &impl PhyloCostFunction,
) -> Result<Vec<CandidateRow>> {
    let leaf = tree.leaf_by_id(taxon)?;
    let Some(parent) = tree.node(&leaf).parent else {
        bail!("Taxon {} is the only node of the tree.", taxon);
    };
    let Some(true_edge) = tree.sibling(&leaf) else {
        bail!("Taxon {} has no sibling edge.", taxon);
    };
    debug!(
        "True attachment edge of {} in tree {} is node {}.",
        taxon,
        tree_idx,
        usize::from(true_edge)
    );

    let mut pruned = tree.clone();
    pruned.prune_leaf(taxon)?;
    let leaf_slot = usize::from(leaf);
    let internal_slot = usize::from(parent);

    let mut rows = Vec::new();
    for edge in candidate_edges(&pruned) {
        let mut candidate = pruned.clone();
        let d = candidate.blen(&edge);
        candidate.graft_midpoint(&edge, taxon, leaf_slot, internal_slot)?;
        let new_leaf = NodeIdx::Leaf(leaf_slot);
        let zero_logl = cost.logl(&candidate);
        candidate.set_blen(&new_leaf, 0.5);
        let half_logl = cost.logl(&candidate);
        rows.push(CandidateRow {
            tree: tree_idx,
            node: edge.into(),
            same_as_tree: edge == true_edge,
            d,
            mid_edge_log_like: zero_logl,
            rank: 0,
            mid_edge_log_like_half: half_logl,
            rank_half: 0,
        });
    }
    assign_ranks(&mut rows);
    rows.sort_by_key(|row| row.node);
    Ok(rows)
}

/// 0-based dense ranks per metric, higher log-likelihood first, ties broken
/// by ascending node id.
fn assign_ranks(rows: &mut [CandidateRow]) {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by_key(|&i| (Reverse(OrderedFloat(rows[i].mid_edge_log_like)), rows[i].node));
    for (rank, &i) in order.iter().enumerate() {
        rows[i].rank = rank;
    }
    order.sort_by_key(|&i| {
        (
            Reverse(OrderedFloat(rows[i].mid_edge_log_like_half)),
            rows[i].node,
        )
    });
    for (rank, &i) in order.iter().enumerate() {
        rows[i].rank_half = rank;
    }
}

pub fn write_rows<W: Write>(writer: &mut W, rows: &[CandidateRow]) -> Result<()> {
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            row.tree,
            row.node,
            row.same(),
            row.d,
            row.mid_edge_log_like,
            row.rank,
            row.mid_edge_log_like_half,
            row.rank_half
        )?;
    }
    Ok(())
}

/// The whole mid-edge program: load data, model, rates and trees, scan every
/// tree and write the CSV.
pub fn run(config: &Config) -> Result<()> {
    let info = PhyloInfoBuilder::new(config.path_param("input.sequence.file")?).build()?;
    let model = model_from_config(config)?;
    let rates = rates_from_config(config)?;
    let mut trees = read_newick_from_file(&config.path_param("input.tree.file")?)?;
    let taxon = config.str_param_or("pruned.taxon", "t1").to_string();

    let output_path = config.path_param("output.file")?;
    let output = File::create(&output_path)
        .with_context(|| format!("Cannot create output file {}", output_path.display()))?;
    let mut output = BufWriter::new(output);
    writeln!(output, "{}", CSV_HEADER)?;

    let cost = TreeLikelihood::new(&info, &model, &rates);
    for (tree_idx, tree) in trees.iter_mut().enumerate() {
        normalise_rooting(tree)?;
        info.validate_tree_leaves(tree)?;
        info!("Scanning tree {} for attachments of {}.", tree_idx, taxon);
        let rows = scan_tree(tree_idx, tree, &taxon, &cost)?;
        write_rows(&mut output, &rows)?;
    }
    output.flush()?;
    info!("Wrote results to {}.", output_path.display());
    Ok(())
}
