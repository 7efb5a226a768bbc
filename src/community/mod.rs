//! Recursive spectral modularity bisection of the identifier graph.
//!
//! # Algorithm
//! Starting from the whole graph (community `C1`), each subgraph is either
//! emitted as a terminal community or split in two by the sign pattern of the
//! leading eigenvector of its modularity matrix, recursing depth-first with
//! `-1` / `-2` appended to the id. A subgraph is terminal when it has at most
//! one node, has no internal edges, its leading eigenvalue is below the
//! threshold, the decomposition fails, or the split would leave a side empty.
//!
//! Communities emitted at any level are disjoint and cover the subgraph they
//! were split from. Each split costs a dense O(n³) eigen-decomposition.

pub mod modularity;
pub mod subgraph;

use log::debug;
use nalgebra::DMatrix;
use petgraph::graph::NodeIndex;

use crate::graph::IdentifierGraph;
use modularity::{
    eigenvector, leading_eigenvalue, modularity_matrix, symmetric_leading_eigenpair, ModularityMode,
};
use subgraph::Subgraph;

/// Leading eigenvalues with a real part below this mean "no useful split".
pub const DEFAULT_THRESHOLD: f64 = 1e-6;

const ROOT_COMMUNITY_ID: &str = "C1";

/// One terminal community: path-coded id plus its member nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: String,
    pub size: usize,
    pub members: Vec<NodeIndex>,
}

impl Community {
    fn from_subgraph(sub: &Subgraph<'_>, id: String) -> Self {
        Community {
            id,
            size: sub.len(),
            members: sub.nodes().to_vec(),
        }
    }

    /// The subgraph of `graph` induced by this community's members.
    pub fn subgraph<'g>(&self, graph: &'g IdentifierGraph) -> Subgraph<'g> {
        Subgraph::from_nodes(graph, self.members.clone())
    }

    /// Recursion depth encoded in the id (`C1` is 0, `C1-2-1` is 2).
    pub fn depth(&self) -> usize {
        self.id.matches('-').count()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommunityDetector {
    threshold: f64,
    mode: ModularityMode,
}

impl Default for CommunityDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            mode: ModularityMode::Directed,
        }
    }
}

impl CommunityDetector {
    pub fn new(threshold: f64, mode: ModularityMode) -> Self {
        Self { threshold, mode }
    }

    /// Partition the whole graph into terminal communities.
    pub fn detect(&self, graph: &IdentifierGraph) -> Vec<Community> {
        self.detect_in(Subgraph::full(graph), ROOT_COMMUNITY_ID)
    }

    /// Partition one subgraph, labelling the root `root_id`.
    pub fn detect_in(&self, sub: Subgraph<'_>, root_id: &str) -> Vec<Community> {
        let mut communities = Vec::new();
        self.divide(sub, root_id.to_string(), &mut communities);
        communities
    }

    fn divide(&self, sub: Subgraph<'_>, id: String, out: &mut Vec<Community>) {
        if sub.len() <= 1 {
            out.push(Community::from_subgraph(&sub, id));
            return;
        }

        let Some((group1, group2)) = self.bisect(&sub) else {
            debug!("community {} is indivisible ({} nodes)", id, sub.len());
            out.push(Community::from_subgraph(&sub, id));
            return;
        };

        debug!(
            "split {} ({} nodes) into {} + {}",
            id,
            sub.len(),
            group1.len(),
            group2.len()
        );
        let left = sub.induced(group1);
        let right = sub.induced(group2);

        self.divide(left, format!("{}-1", id), out);
        self.divide(right, format!("{}-2", id), out);
    }

    fn bisect(&self, sub: &Subgraph<'_>) -> Option<(Vec<NodeIndex>, Vec<NodeIndex>)> {
        let b = modularity_matrix(sub, self.mode)?;
        self.split(sub, &b)
    }

    /// Split `sub` by the sign of the leading eigenvector of `b`: positive
    /// real part to the first group.
    fn split(
        &self,
        sub: &Subgraph<'_>,
        b: &DMatrix<f64>,
    ) -> Option<(Vec<NodeIndex>, Vec<NodeIndex>)> {
        let vector = match self.mode {
            ModularityMode::Directed => {
                let lambda = leading_eigenvalue(b)?;
                if lambda.re < self.threshold {
                    return None;
                }
                eigenvector(b, lambda)?
            }
            ModularityMode::Symmetrized => {
                let (lambda, vector) = symmetric_leading_eigenpair(b)?;
                if lambda < self.threshold {
                    return None;
                }
                vector
            }
        };

        let (group1, group2): (Vec<_>, Vec<_>) = sub
            .nodes()
            .iter()
            .zip(vector.iter())
            .partition(|(_, component)| component.re > 0.0);

        if group1.is_empty() || group2.is_empty() {
            return None;
        }

        Some((
            group1.into_iter().map(|(idx, _)| *idx).collect(),
            group2.into_iter().map(|(idx, _)| *idx).collect(),
        ))
    }
}
