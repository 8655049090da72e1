//! Value types shared by every assembly stage: intervals, alignment
//! fragments, alignments, exons and candidate models.

mod alignment;
mod candidate;
mod exon;
mod fragment;
mod interval;

pub use alignment::{
    Alignment, AlignmentEvidence, GeneAttributes, RibosomalSlippage, RnaEditing, StopReadthrough,
    ViralProtein, VirusGenome,
};
pub use candidate::{GenomeSide, Model, RnaEdit, ScoreComponent};
pub use exon::Exon;
pub use fragment::{AlignmentFragment, AlignmentTool, Direction, Frame};
pub use interval::Interval;

use thiserror::Error;

/// Errors raised while building or transforming models.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// An alignment with no fragments was submitted for assembly.
    #[error("alignment of {protein} has no fragments")]
    NoFragments {
        /// Reference protein identifier.
        protein: String,
    },

    /// A fragment chain with no fragments was submitted to the assembler.
    #[error("cannot assemble a model from an empty fragment chain")]
    EmptyChain,

    /// Sequence gaps were not strictly increasing and disjoint.
    #[error("sequence gap {next} does not follow gap {prev}")]
    UnorderedGaps {
        /// Earlier gap.
        prev: Interval,
        /// Offending gap.
        next: Interval,
    },

    /// A model violated the exon invariant.
    #[error("inconsistent model geometry: {0}")]
    Geometry(String),
}

/// Reject gap lists that are not strictly increasing and non-overlapping.
pub fn validate_gaps(gaps: &[Interval]) -> Result<(), ModelError> {
    match gaps
        .windows(2)
        .find(|pair| pair[1].begin() <= pair[0].end())
    {
        Some(pair) => Err(ModelError::UnorderedGaps {
            prev: pair[0],
            next: pair[1],
        }),
        None => Ok(()),
    }
}
