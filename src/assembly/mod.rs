//! From alignment fragments to gap-free candidate models.
//!
//! Fragments are chained ([`FragmentChainBuilder`]), each chain becomes a
//! model ([`assemble_model`]), and models are split around sequence gaps
//! ([`split_at_gaps`]).

mod assembler;
mod chain;
mod gaps;
mod merge;

pub use assembler::assemble_model;
pub use chain::{FragmentChain, FragmentChainBuilder};
pub use gaps::{split_at_gaps, split_exons_at_gaps, split_model_at_gaps};
pub use merge::merge_identical_protein_alignments;
