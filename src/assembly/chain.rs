use std::collections::HashSet;

use tracing::debug;

use crate::config::{ConfigError, ModelConfig};
use crate::model::{AlignmentFragment, Direction};

/// Ordered run of compatible fragments, in protein order.
pub type FragmentChain = Vec<AlignmentFragment>;

/// Enumerates maximal chains of compatible alignment fragments.
///
/// Two fragments A → B are compatible when they share a strand, B starts
/// after A and ends after A in both the protein and (strand-aware) genome
/// coordinates, and their overlaps stay within the configured tolerances.
/// A chain is maximal when no fragment can be prepended, appended or
/// inserted between two neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentChainBuilder {
    aa_overlap_max: u32,
    nt_overlap_max: u32,
}

impl FragmentChainBuilder {
    /// Builder with explicit tolerances.
    pub fn new(aa_overlap_max: u32, nt_overlap_max: u32) -> Self {
        Self {
            aa_overlap_max,
            nt_overlap_max,
        }
    }

    /// Builder using the tolerances of a typed configuration.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.aa_overlap_max, config.nt_overlap_max)
    }

    /// Builder from raw parameters; both tolerances are required.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        ModelConfig::from_params(params).map(|config| Self::from_config(&config))
    }

    /// Whether `next` may directly follow `prev` in a chain.
    pub fn is_compatible(&self, prev: &AlignmentFragment, next: &AlignmentFragment) -> bool {
        if prev.direction != next.direction {
            return false;
        }
        let protein_advances = next.protein.begin() > prev.protein.begin()
            && next.protein.end() > prev.protein.end();
        let genome_advances = match next.direction {
            Direction::Forward => {
                next.genome.begin() >= prev.genome.begin() && next.genome.end() > prev.genome.end()
            }
            Direction::Reverse => {
                next.genome.end() <= prev.genome.end() && next.genome.begin() < prev.genome.begin()
            }
        };

        protein_advances
            && genome_advances
            && prev.protein.overlap_len(&next.protein) <= self.aa_overlap_max
            && prev.genome.overlap_len(&next.genome) <= self.nt_overlap_max
    }

    /// All maximal, pairwise-distinct compatible chains.
    ///
    /// An empty input yields no chains; a fragment with no partners is a
    /// chain of its own.
    pub fn build(&self, fragments: &[AlignmentFragment]) -> Vec<FragmentChain> {
        let nodes = unique_sorted(fragments);
        let n = nodes.len();

        let successors: Vec<Vec<usize>> = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| self.is_compatible(&nodes[i], &nodes[j]))
                    .collect()
            })
            .collect();
        let mut has_predecessor = vec![false; n];
        for &j in successors.iter().flatten() {
            has_predecessor[j] = true;
        }

        // An edge i -> j is covering when no k fits between i and j.
        let covering: Vec<Vec<usize>> = successors
            .iter()
            .map(|succ| {
                succ.iter()
                    .copied()
                    .filter(|&j| !succ.iter().any(|&k| successors[k].contains(&j)))
                    .collect()
            })
            .collect();

        let mut chains = Vec::new();
        let mut path = Vec::new();
        for source in (0..n).filter(|&i| !has_predecessor[i]) {
            walk(source, &covering, &mut path, &mut |path: &[usize]| {
                chains.push(path.iter().map(|&i| nodes[i]).collect());
            });
        }

        debug!(
            fragments = fragments.len(),
            unique = n,
            chains = chains.len(),
            "enumerated fragment chains"
        );
        chains
    }
}

impl From<&ModelConfig> for FragmentChainBuilder {
    fn from(config: &ModelConfig) -> Self {
        Self::from_config(config)
    }
}

fn walk(
    node: usize,
    covering: &[Vec<usize>],
    path: &mut Vec<usize>,
    emit: &mut impl FnMut(&[usize]),
) {
    path.push(node);
    if covering[node].is_empty() {
        emit(path);
    } else {
        for &next in &covering[node] {
            walk(next, covering, path, emit);
        }
    }
    path.pop();
}

fn unique_sorted(fragments: &[AlignmentFragment]) -> Vec<AlignmentFragment> {
    let mut seen = HashSet::new();
    let mut nodes: Vec<AlignmentFragment> = fragments
        .iter()
        .filter(|fragment| seen.insert(fragment.key()))
        .copied()
        .collect();
    nodes.sort_by_key(|fragment| {
        (
            fragment.protein.begin(),
            fragment.genome_start(),
            fragment.protein.end(),
        )
    });
    nodes
}
