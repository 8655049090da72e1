use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{Alignment, Direction, Exon, Interval, ModelError};

/// Largest number of bases two exons may share across a slippage site.
const MAX_SLIPPAGE_OVERLAP: u32 = 3;

/// Named score component carried by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreComponent {
    /// Aligner score of the supporting alignment.
    Alignment,
    /// Start-codon quality.
    StartCodon,
    /// Leaky-stop readthrough quality.
    LeakyStop,
    /// Splice-site quality.
    Splice,
    /// Stop-codon quality.
    StopCodon,
    /// Weighted sum written by the score evaluator.
    Total,
}

impl ScoreComponent {
    /// The five weighted components, in evaluation order.
    pub const WEIGHTED: [ScoreComponent; 5] = [
        ScoreComponent::Alignment,
        ScoreComponent::StartCodon,
        ScoreComponent::LeakyStop,
        ScoreComponent::Splice,
        ScoreComponent::StopCodon,
    ];

    /// Key used when scores are exported.
    pub fn key(self) -> &'static str {
        match self {
            ScoreComponent::Alignment => "alignmentScore",
            ScoreComponent::StartCodon => "startCodonScore",
            ScoreComponent::LeakyStop => "leakyStopScore",
            ScoreComponent::Splice => "spliceScore",
            ScoreComponent::StopCodon => "stopCodonScore",
            ScoreComponent::Total => "totalScore",
        }
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Non-templated insertion recorded by the RNA-editing detector.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RnaEdit {
    /// First templated base after the insertion.
    pub site: Interval,
    /// Inserted bases.
    pub insertion: String,
}

/// Side of a model in genome coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenomeSide {
    /// Lowest coordinate.
    Left,
    /// Highest coordinate.
    Right,
}

/// Candidate gene model: exon structure plus annotations.
#[derive(Debug, Clone)]
pub struct Model {
    /// Exons in ascending genome order.
    pub exons: Vec<Exon>,
    /// Alignment the model was assembled from.
    pub alignment: Arc<Alignment>,
    /// Strand of translation.
    pub direction: Direction,
    /// 5' end does not reach the reference protein's start.
    pub partial_5p: bool,
    /// 3' end does not reach the reference protein's end.
    pub partial_3p: bool,
    /// Model is flagged as a pseudogene.
    pub pseudogene: bool,
    /// Slippery site recorded by the ribosomal-slippage detector.
    pub ribosomal_slippage: Option<Interval>,
    /// Stop codon translated by readthrough.
    pub replace_stop_codon: Option<Interval>,
    /// Edit recorded by the RNA-editing detector.
    pub rna_editing: Option<RnaEdit>,
    /// Score components.
    pub scores: BTreeMap<ScoreComponent, f64>,
    /// Status tags for downstream selection.
    pub status: Vec<String>,
    /// Free-form notes.
    pub notes: Vec<String>,
}

impl Model {
    /// Model with the given exons and no annotations.
    pub fn new(alignment: Arc<Alignment>, direction: Direction, exons: Vec<Exon>) -> Self {
        Self {
            exons,
            alignment,
            direction,
            partial_5p: false,
            partial_3p: false,
            pseudogene: false,
            ribosomal_slippage: None,
            replace_stop_codon: None,
            rna_editing: None,
            scores: BTreeMap::new(),
            status: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Genome interval from the first exon's begin to the last exon's end.
    pub fn span(&self) -> Option<Interval> {
        let first = self.exons.first()?;
        let last = self.exons.last()?;
        Some(first.range.span(&last.range))
    }

    /// Exon indices in transcription order.
    pub fn transcription_order(&self) -> Vec<usize> {
        let indices = 0..self.exons.len();
        match self.direction {
            Direction::Forward => indices.collect(),
            Direction::Reverse => indices.rev().collect(),
        }
    }

    /// Index of the exon holding the 3' end.
    pub fn three_prime_index(&self) -> Option<usize> {
        match self.direction {
            Direction::Forward => self.exons.len().checked_sub(1),
            Direction::Reverse => (!self.exons.is_empty()).then_some(0),
        }
    }

    /// Mark the edge on `side` as partial.
    pub fn mark_partial(&mut self, side: GenomeSide) {
        match (side, self.direction) {
            (GenomeSide::Left, Direction::Forward) | (GenomeSide::Right, Direction::Reverse) => {
                self.partial_5p = true
            }
            (GenomeSide::Right, Direction::Forward) | (GenomeSide::Left, Direction::Reverse) => {
                self.partial_3p = true
            }
        }
    }

    /// Score component value, if present.
    pub fn score(&self, component: ScoreComponent) -> Option<f64> {
        self.scores.get(&component).copied()
    }

    /// Check the exon invariant: non-empty, strictly increasing, and
    /// non-overlapping except for bases inside the recorded slippage site.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.exons.is_empty() {
            return Err(ModelError::Geometry("model has no exons".to_string()));
        }
        for pair in self.exons.windows(2) {
            let (prev, next) = (pair[0].range, pair[1].range);
            if next.begin() <= prev.begin() || next.end() <= prev.end() {
                return Err(ModelError::Geometry(format!(
                    "exon {next} does not follow exon {prev}"
                )));
            }
            let Some(shared) = prev.intersection(&next) else {
                continue;
            };
            let slipped = self.ribosomal_slippage.is_some_and(|site| {
                site.covers(&shared) && shared.len() <= MAX_SLIPPAGE_OVERLAP
            });
            if !slipped {
                return Err(ModelError::Geometry(format!(
                    "exons {prev} and {next} overlap by {} bases",
                    shared.len()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exons = self
            .exons
            .iter()
            .map(|exon| format!("{}:{}", exon.range, exon.frame))
            .collect::<Vec<_>>()
            .join(",");
        let optional = |range: Option<Interval>| range.map_or("-".to_string(), |r| r.to_string());

        write!(
            f,
            "{protein}\t{genome}\t{strand}\t{exons}\t5p={p5}\t3p={p3}\tpseudo={pseudo}\tslip={slip}\tstop={stop}\tedit={edit}\ttotal={total:.2}",
            protein = self.alignment.protein.id,
            genome = self.alignment.genome.id(),
            strand = self.direction,
            p5 = self.partial_5p as u8,
            p3 = self.partial_3p as u8,
            pseudo = self.pseudogene as u8,
            slip = optional(self.ribosomal_slippage),
            stop = optional(self.replace_stop_codon),
            edit = self
                .rna_editing
                .as_ref()
                .map_or("-".to_string(), |edit| format!("{}+{}", edit.site, edit.insertion)),
            total = self.score(ScoreComponent::Total).unwrap_or(0.0),
        )
    }
}
