use std::fmt;

use super::Interval;

/// Strand on which a fragment or model is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Plus strand; transcription runs towards higher coordinates.
    Forward,
    /// Minus strand; transcription runs towards lower coordinates.
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "+"),
            Direction::Reverse => write!(f, "-"),
        }
    }
}

/// Genomic reading frame of a codon run.
///
/// A codon whose lowest coordinate is `q` lies in frame `q mod 3`; `One`
/// is residue 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frame {
    /// Codons start at positions ≡ 0 (mod 3).
    One,
    /// Codons start at positions ≡ 1 (mod 3).
    Two,
    /// Codons start at positions ≡ 2 (mod 3).
    Three,
}

impl Frame {
    /// Frame of a codon starting at `position`.
    pub fn of_position(position: u32) -> Self {
        match position % 3 {
            0 => Frame::One,
            1 => Frame::Two,
            _ => Frame::Three,
        }
    }

    /// Residue (0, 1 or 2) of codon start positions in this frame.
    pub fn offset(self) -> u32 {
        match self {
            Frame::One => 0,
            Frame::Two => 1,
            Frame::Three => 2,
        }
    }

    /// Whether a codon starting at `position` is in this frame.
    pub fn admits(self, position: u32) -> bool {
        position % 3 == self.offset()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset() + 1)
    }
}

/// Producer of alignment fragments.
///
/// The assembly core never branches on the tool; the tag travels with the
/// evidence for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentTool {
    /// Protein-to-genome alignments from exonerate.
    #[default]
    Exonerate,
}

impl AlignmentTool {
    /// Tool name as it appears in evidence records.
    pub fn name(self) -> &'static str {
        match self {
            AlignmentTool::Exonerate => "exonerate",
        }
    }
}

/// One contiguous, single-frame segment of a protein-to-genome alignment.
///
/// Genome coordinates are already normalized to the forward strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentFragment {
    /// Residues of the reference protein covered by the fragment.
    pub protein: Interval,
    /// Bases of the genome covered by the fragment.
    pub genome: Interval,
    /// Strand of the alignment.
    pub direction: Direction,
    /// Genomic frame of the aligned codons.
    pub frame: Frame,
    /// Aligner that produced the fragment.
    pub tool: AlignmentTool,
}

impl AlignmentFragment {
    /// Construct a fragment produced by the default aligner.
    pub fn new(protein: Interval, genome: Interval, direction: Direction, frame: Frame) -> Self {
        Self {
            protein,
            genome,
            direction,
            frame,
            tool: AlignmentTool::default(),
        }
    }

    /// Set the producing tool.
    pub fn with_tool(mut self, tool: AlignmentTool) -> Self {
        self.tool = tool;
        self
    }

    /// Identity used for duplicate detection: both ranges plus strand.
    pub fn key(&self) -> (Interval, Interval, Direction) {
        (self.protein, self.genome, self.direction)
    }

    /// Genome position where translation of this fragment begins.
    pub fn genome_start(&self) -> u32 {
        match self.direction {
            Direction::Forward => self.genome.begin(),
            Direction::Reverse => self.genome.end(),
        }
    }
}

impl fmt::Display for AlignmentFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aa {} / nt {} ({}{})",
            self.protein, self.genome, self.direction, self.frame
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_follows_codon_start_residue() {
        assert_eq!(Frame::of_position(9), Frame::One);
        assert_eq!(Frame::of_position(10), Frame::Two);
        assert_eq!(Frame::of_position(11), Frame::Three);
        assert!(Frame::Three.admits(104));
        assert!(!Frame::Three.admits(105));
    }

    #[test]
    fn duplicate_key_ignores_frame_and_tool() {
        let protein = Interval::new(0, 10).unwrap();
        let genome = Interval::new(30, 62).unwrap();
        let a = AlignmentFragment::new(protein, genome, Direction::Forward, Frame::One);
        let b = AlignmentFragment::new(protein, genome, Direction::Forward, Frame::Two);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.genome_start(), 30);
    }
}
