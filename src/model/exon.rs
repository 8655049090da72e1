use super::{AlignmentFragment, Frame, Interval};

/// Contiguous coding interval of a candidate model.
///
/// Exons are owned by exactly one [`Model`](super::Model); cloning a model
/// clones its exons.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exon {
    /// Genome bases covered by the exon.
    pub range: Interval,
    /// Genomic frame of the exon's codons.
    pub frame: Frame,
    /// Fragment the exon was assembled from, if any.
    pub fragment: Option<AlignmentFragment>,
}

impl Exon {
    /// Exon with no backing fragment.
    pub fn new(range: Interval, frame: Frame) -> Self {
        Self {
            range,
            frame,
            fragment: None,
        }
    }

    /// Exon covering a fragment's genome range in the fragment's frame.
    pub fn from_fragment(fragment: &AlignmentFragment) -> Self {
        Self {
            range: fragment.genome,
            frame: fragment.frame,
            fragment: Some(*fragment),
        }
    }

    /// Copy of this exon over a different range, keeping frame and fragment.
    pub fn with_range(&self, range: Interval) -> Self {
        Self {
            range,
            ..self.clone()
        }
    }
}
