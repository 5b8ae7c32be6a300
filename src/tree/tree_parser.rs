use std::fmt;

use anyhow::bail;
use log::{info, warn};
use pest::{error::Error as PestError, iterators::Pair, Parser};
use pest_derive::Parser;

use crate::tree::{
    Node,
    NodeIdx::{Internal as Int, Leaf},
    Tree,
};
use crate::Result;

#[derive(Parser)]
#[grammar = "./tree/newick.pest"]
pub struct NewickParser;

#[derive(Debug)]
pub struct ParsingError(pub(crate) Box<PestError<Rule>>);

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Malformed newick string")?;
        write!(f, "{}", self.0)
    }
}

/// Parses newick trees, one per input statement.
///
/// Rooted trees are taken as-is; an unrooted tree (trifurcation at the top
/// level) is rooted at the trifurcation with zero-length branches.
pub fn from_newick(newick_string: &str) -> Result<Vec<Tree>> {
    info!("Parsing newick trees.");
    let mut trees = Vec::new();
    let newick_tree_rule = match NewickParser::parse(Rule::newick, newick_string) {
        Ok(mut rules) => rules.next().expect("newick rule matched"),
        Err(e) => bail!(ParsingError(Box::new(e))),
    };
    for tree_rule in newick_tree_rule.into_inner() {
        if let Some(rule) = tree_rule.into_inner().next() {
            let mut tree = Tree::new_empty();
            match rule.as_rule() {
                Rule::rooted => tree.parse_rooted_rule(rule),
                Rule::unrooted => tree.parse_unrooted_rule(rule),
                _ => continue,
            };
            trees.push(tree);
        }
    }
    info!("Finished parsing newick trees successfully.");
    Ok(trees)
}

impl Tree {
    fn new_empty() -> Self {
        Self {
            root: Int(0),
            nodes: Vec::new(),
        }
    }

    fn parse_rooted_rule(&mut self, node_rule: Pair<Rule>) {
        let tree_rule = node_rule.into_inner().next().expect("rooted tree content");
        let mut node_idx = 0;
        match tree_rule.as_rule() {
            Rule::leaf => {
                self.parse_leaf_rule(&mut node_idx, tree_rule);
                self.root = Leaf(0);
            }
            Rule::internal => {
                self.parse_internal_rule(&mut node_idx, tree_rule);
                self.root = Int(0);
            }
            _ => unreachable!(),
        }
    }

    fn parse_unrooted_rule(&mut self, tree_rule: Pair<Rule>) {
        warn!("Found unrooted tree, will root at the trifurcation.");
        let mut node_idx = 0;
        let mut children = Vec::new();
        for node_rule in tree_rule.into_inner() {
            match node_rule.as_rule() {
                Rule::leaf => {
                    children.push(Leaf(node_idx));
                    self.parse_leaf_rule(&mut node_idx, node_rule);
                }
                Rule::internal => {
                    children.push(Int(node_idx));
                    self.parse_internal_rule(&mut node_idx, node_rule);
                }
                _ => {}
            }
        }

        let joined_idx = node_idx;
        self.nodes.push(Some(Node::new_internal(
            joined_idx,
            None,
            children[0..2].to_vec(),
            0.0,
            "".to_string(),
        )));
        for child_idx in &children[0..2] {
            self.node_mut(child_idx).parent = Some(Int(joined_idx));
        }

        let root_idx = joined_idx + 1;
        self.nodes.push(Some(Node::new_internal(
            root_idx,
            None,
            vec![Int(joined_idx), children[2]],
            0.0,
            "".to_string(),
        )));
        self.node_mut(&Int(joined_idx)).parent = Some(Int(root_idx));
        self.node_mut(&children[2]).parent = Some(Int(root_idx));
        self.root = Int(root_idx);
    }

    fn parse_internal_rule(&mut self, node_idx: &mut usize, internal_rule: Pair<Rule>) {
        let cur_node_idx = *node_idx;
        self.nodes.push(Some(Node::new_empty_internal(cur_node_idx)));
        *node_idx += 1;
        let mut id = String::from("");
        let mut blen = 0.0;
        let mut children = Vec::new();
        for rule in internal_rule.into_inner() {
            match rule.as_rule() {
                Rule::label => id = Tree::parse_label_rule(rule),
                Rule::branch_length => blen = Tree::parse_branch_length_rule(rule),
                Rule::internal => {
                    children.push(Int(*node_idx));
                    self.parse_internal_rule(node_idx, rule);
                }
                Rule::leaf => {
                    children.push(Leaf(*node_idx));
                    self.parse_leaf_rule(node_idx, rule);
                }
                _ => unreachable!(),
            }
        }
        for child_idx in &children {
            self.node_mut(child_idx).parent = Some(Int(cur_node_idx));
        }
        let node = self.node_mut(&Int(cur_node_idx));
        node.id = id;
        node.blen = blen;
        node.children = children;
    }

    fn parse_leaf_rule(&mut self, node_idx: &mut usize, inner_rule: Pair<Rule>) {
        let mut id = String::from("");
        let mut blen = 0.0;
        for rule in inner_rule.into_inner() {
            match rule.as_rule() {
                Rule::label => id = Tree::parse_label_rule(rule),
                Rule::branch_length => blen = Tree::parse_branch_length_rule(rule),
                _ => unreachable!(),
            }
        }
        self.nodes
            .push(Some(Node::new_leaf(*node_idx, None, blen, id)));
        *node_idx += 1;
    }

    fn parse_branch_length_rule(rule: Pair<Rule>) -> f64 {
        rule.into_inner()
            .next()
            .map(|float| float.as_str().trim().parse::<f64>().unwrap_or_default())
            .unwrap_or_default()
    }

    fn parse_label_rule(rule: Pair<Rule>) -> String {
        rule.as_str().to_string()
    }
}
