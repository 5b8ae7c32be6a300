use nalgebra::{DMatrix, RowDVector};

use crate::phylo_info::PhyloInfo;
use crate::rates::RateDistribution;
use crate::substitution_models::DNASubstModel;
use crate::tree::{NodeIdx, Tree};

/// The seam between the analysis programs and the likelihood machinery:
/// anything that can score a tree against fixed data.
pub trait PhyloCostFunction {
    /// Natural-log likelihood of the data given the tree.
    fn logl(&self, tree: &Tree) -> f64;
}

/// Felsenstein-pruning log-likelihood of an alignment given a tree, a
/// substitution model and a discrete rate distribution.
///
/// The tree is taken per call and never mutated, so independent working
/// copies of a tree can be scored against the same data. Every leaf of the
/// scored tree must carry a sequence in the alignment; this is validated
/// when the program sets up, not per call.
pub struct TreeLikelihood<'a> {
    info: &'a PhyloInfo,
    model: &'a DNASubstModel,
    rates: &'a RateDistribution,
}

impl<'a> TreeLikelihood<'a> {
    pub fn new(
        info: &'a PhyloInfo,
        model: &'a DNASubstModel,
        rates: &'a RateDistribution,
    ) -> Self {
        TreeLikelihood { info, model, rates }
    }

    /// Per-site likelihoods under a single rate scaling of all branches.
    fn site_likelihoods(&self, tree: &Tree, rate: f64) -> RowDVector<f64> {
        let msa_len = self.info.msa_len();
        let mut partials: Vec<Option<DMatrix<f64>>> = vec![None; tree.capacity()];
        for node_idx in tree.postorder() {
            let node = tree.node(&node_idx);
            let partial = match node_idx {
                NodeIdx::Leaf(_) => {
                    let encoding = self
                        .info
                        .leaf_encoding(&node.id)
                        .expect("every tree leaf has a sequence");
                    self.model.p(node.blen * rate) * encoding
                }
                NodeIdx::Internal(_) => {
                    let mut combined =
                        DMatrix::from_element(self.info.alphabet().n(), msa_len, 1.0);
                    for child in node.children.iter() {
                        combined.component_mul_assign(
                            partials[usize::from(*child)]
                                .as_ref()
                                .expect("postorder visits children first"),
                        );
                    }
                    if node_idx == tree.root {
                        combined
                    } else {
                        self.model.p(node.blen * rate) * combined
                    }
                }
            };
            partials[usize::from(node_idx)] = Some(partial);
        }
        let root_partial = partials[usize::from(tree.root)]
            .as_ref()
            .expect("root partial is computed last");
        self.model.freqs().transpose() * root_partial
    }
}

impl PhyloCostFunction for TreeLikelihood<'_> {
    fn logl(&self, tree: &Tree) -> f64 {
        let mut site_likelihoods = RowDVector::<f64>::zeros(self.info.msa_len());
        for (&rate, &weight) in self.rates.rates().iter().zip(self.rates.weights()) {
            site_likelihoods += self.site_likelihoods(tree, rate).scale(weight);
        }
        site_likelihoods.map(|x| x.ln()).sum()
    }
}
