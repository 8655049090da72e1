use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::Alignment;

/// Merge alignments of the same reference protein against the same genome.
///
/// An aligner may report several hits for one protein; chaining needs all
/// their fragments together. Groups keep the order in which each
/// (protein, genome) pair first appears. The merged alignment keeps the
/// first hit's evidence, the highest score, and the union of fragments
/// ordered by protein position.
pub fn merge_identical_protein_alignments(alignments: Vec<Alignment>) -> Vec<Alignment> {
    let total = alignments.len();
    let mut merged: Vec<Alignment> = Vec::new();
    let mut slots: HashMap<(String, String), usize> = HashMap::new();

    for alignment in alignments {
        let key = (
            alignment.protein.id.clone(),
            alignment.genome.id().to_string(),
        );
        match slots.get(&key) {
            Some(&slot) => {
                let target = &mut merged[slot];
                target.score = target.score.max(alignment.score);
                target.fragments.extend(alignment.fragments);
            }
            None => {
                slots.insert(key, merged.len());
                merged.push(alignment);
            }
        }
    }

    for alignment in &mut merged {
        let mut seen = HashSet::new();
        alignment.fragments.retain(|fragment| seen.insert(fragment.key()));
        alignment
            .fragments
            .sort_by_key(|fragment| (fragment.protein.begin(), fragment.genome_start()));
    }

    debug!(input = total, merged = merged.len(), "merged protein alignments");
    merged
}
