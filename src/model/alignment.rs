use std::sync::Arc;

use regex::bytes::Regex;

use super::{validate_gaps, AlignmentFragment, AlignmentTool, Interval, ModelError};
use crate::config::ModelConfig;

/// Programmed -1/+1 frameshift declared for a reference protein.
#[derive(Debug, Clone)]
pub struct RibosomalSlippage {
    /// Slippery-site motif searched on the coding strand.
    pub motif: Regex,
    /// Offset from the motif start to the last base read before the slip.
    pub offset: i32,
    /// Frameshift applied at the slip site (-1 re-reads one base).
    pub frameshift: i32,
}

/// Programmed readthrough of an in-frame stop codon.
#[derive(Debug, Clone)]
pub struct StopReadthrough {
    /// Amino acid inserted in place of the stop codon.
    pub replacement: char,
}

/// Co-transcriptional insertion of non-templated bases.
#[derive(Debug, Clone)]
pub struct RnaEditing {
    /// Editing-site motif searched on the coding strand.
    pub motif: Regex,
    /// Offset from the motif start to the first base after the insertion.
    pub offset: i32,
    /// Bases inserted at the edit site.
    pub insertion: String,
}

/// Translational phenomena a reference protein is known to require.
#[derive(Debug, Clone, Default)]
pub struct GeneAttributes {
    /// Ribosomal slippage, if the protein is produced by a frameshift.
    pub ribosomal_slippage: Option<RibosomalSlippage>,
    /// Stop-codon readthrough, if the protein reads through a leaky stop.
    pub stop_readthrough: Option<StopReadthrough>,
    /// RNA editing, if the transcript is edited before translation.
    pub rna_editing: Option<RnaEditing>,
}

/// Reference protein an alignment was made against.
#[derive(Debug, Clone)]
pub struct ViralProtein {
    /// Database identifier.
    pub id: String,
    /// Free-form definition line.
    pub defline: String,
    /// Length in residues.
    pub length: u32,
    /// Declared translational phenomena.
    pub attributes: GeneAttributes,
    /// Per-protein configuration overriding the generator's.
    pub config: Option<ModelConfig>,
}

impl ViralProtein {
    /// Protein with no declared attributes or overrides.
    pub fn new(id: impl Into<String>, length: u32) -> Self {
        Self {
            id: id.into(),
            defline: String::new(),
            length,
            attributes: GeneAttributes::default(),
            config: None,
        }
    }

    /// Set the definition line.
    pub fn with_defline(mut self, defline: impl Into<String>) -> Self {
        self.defline = defline.into();
        self
    }

    /// Set the declared attributes.
    pub fn with_attributes(mut self, attributes: GeneAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach a per-protein configuration.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Index of the final residue.
    pub fn last_residue(&self) -> u32 {
        self.length.saturating_sub(1)
    }
}

/// Genome record being annotated.
#[derive(Debug, Clone)]
pub struct VirusGenome {
    id: String,
    sequence: Arc<[u8]>,
    gaps: Vec<Interval>,
}

impl VirusGenome {
    /// Genome with externally supplied sequence gaps.
    ///
    /// Gaps must be strictly increasing and non-overlapping.
    pub fn new(
        id: impl Into<String>,
        sequence: impl AsRef<[u8]>,
        gaps: Vec<Interval>,
    ) -> Result<Self, ModelError> {
        validate_gaps(&gaps)?;
        Ok(Self {
            id: id.into(),
            sequence: Arc::from(sequence.as_ref().to_ascii_uppercase()),
            gaps,
        })
    }

    /// Genome whose gaps are the runs of `N` at least `min_gap_len` long.
    pub fn with_detected_gaps(
        id: impl Into<String>,
        sequence: impl AsRef<[u8]>,
        min_gap_len: u32,
    ) -> Self {
        let sequence = sequence.as_ref().to_ascii_uppercase();
        let gaps = find_gaps(&sequence, min_gap_len.max(1));
        Self {
            id: id.into(),
            sequence: Arc::from(sequence),
            gaps,
        }
    }

    /// Record identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Uppercase sequence bytes.
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Sequence length in bases.
    pub fn len(&self) -> u32 {
        self.sequence.len() as u32
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Ordered sequence gaps.
    pub fn gaps(&self) -> &[Interval] {
        &self.gaps
    }

    /// Bases covered by `range`, or `None` past the end of the sequence.
    pub fn slice(&self, range: Interval) -> Option<&[u8]> {
        self.sequence
            .get(range.begin() as usize..=range.end() as usize)
    }
}

fn find_gaps(sequence: &[u8], min_gap_len: u32) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut run_start = None;

    for (pos, &base) in sequence.iter().enumerate() {
        match (base == b'N', run_start) {
            (true, None) => run_start = Some(pos as u32),
            (false, Some(start)) => {
                push_gap(&mut gaps, start, pos as u32 - 1, min_gap_len);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        push_gap(&mut gaps, start, sequence.len() as u32 - 1, min_gap_len);
    }
    gaps
}

fn push_gap(gaps: &mut Vec<Interval>, begin: u32, end: u32, min_gap_len: u32) {
    if let Some(gap) = Interval::new(begin, end).filter(|gap| gap.len() >= min_gap_len) {
        gaps.push(gap);
    }
}

/// Where an alignment came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentEvidence {
    /// Reference protein database the protein was drawn from.
    pub reference_db: String,
    /// Aligner that produced the fragments.
    pub tool: AlignmentTool,
    /// Location of the aligner's raw output, if retained.
    pub raw_output: Option<String>,
}

/// Protein-to-genome alignment: the evidence a model is built from.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Reference protein.
    pub protein: Arc<ViralProtein>,
    /// Genome the protein was aligned to.
    pub genome: Arc<VirusGenome>,
    /// Aligned segments, in the aligner's order.
    pub fragments: Vec<AlignmentFragment>,
    /// Raw alignment score reported by the aligner.
    pub score: f64,
    /// Provenance.
    pub evidence: AlignmentEvidence,
}

impl Alignment {
    /// Construct an alignment with default evidence.
    pub fn new(
        protein: Arc<ViralProtein>,
        genome: Arc<VirusGenome>,
        fragments: Vec<AlignmentFragment>,
        score: f64,
    ) -> Self {
        Self {
            protein,
            genome,
            fragments,
            score,
            evidence: AlignmentEvidence::default(),
        }
    }

    /// Attach provenance.
    pub fn with_evidence(mut self, evidence: AlignmentEvidence) -> Self {
        self.evidence = evidence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_runs_of_n_as_gaps() {
        let genome = VirusGenome::with_detected_gaps("g", b"acgtNNNNNacgtNNacgtNNNN", 3);
        assert_eq!(
            genome.gaps(),
            &[Interval::new(4, 8).unwrap(), Interval::new(19, 22).unwrap()]
        );
        assert_eq!(genome.sequence()[0], b'A');
    }

    #[test]
    fn rejects_overlapping_gaps() {
        let gaps = vec![Interval::new(10, 20).unwrap(), Interval::new(15, 30).unwrap()];
        let err = VirusGenome::new("g", b"ACGT", gaps).unwrap_err();
        assert!(matches!(err, ModelError::UnorderedGaps { .. }));
    }

    #[test]
    fn slice_stays_within_sequence() {
        let genome = VirusGenome::new("g", b"ACGTAC", Vec::new()).unwrap();
        assert_eq!(genome.slice(Interval::new(1, 3).unwrap()), Some(&b"CGT"[..]));
        assert!(genome.slice(Interval::new(4, 9).unwrap()).is_none());
    }
}
