//! Corrections for virus-specific translational phenomena.
//!
//! Each detector is a [`ViralTrick`]: it looks at a model's existing exon
//! geometry, frames and backing alignment and proposes adjusted copies.
//! The unmodified model always passes through, so a detector that finds
//! nothing is the identity. [`TrickPipeline`] chains detectors by
//! flat-mapping every model through each one in turn.

mod codon;
mod leaky_stop;
mod rna_editing;
mod slippage;

pub use leaky_stop::LeakyStopDetector;
pub use rna_editing::RnaEditingDetector;
pub use slippage::RibosomalSlippageDetector;

use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::model::{Direction, Interval, Model};

/// Detector for one translational phenomenon.
pub trait ViralTrick: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Adjusted copies of `model`; empty when the signature is absent.
    ///
    /// Implementations must never modify `model` itself.
    fn variants(&self, model: &Model) -> Vec<Model>;

    /// The unmodified model followed by every well-formed variant.
    ///
    /// Variants that break the exon invariant are logged and dropped.
    fn adjust(&self, model: &Model) -> Vec<Model> {
        let mut models = vec![model.clone()];
        for variant in self.variants(model) {
            match variant.validate() {
                Ok(()) => models.push(variant),
                Err(err) => warn!(
                    trick = self.name(),
                    protein = %model.alignment.protein.id,
                    error = %err,
                    "dropping malformed candidate"
                ),
            }
        }
        models
    }
}

/// Ordered chain of detectors.
pub struct TrickPipeline {
    tricks: Vec<Box<dyn ViralTrick>>,
}

impl std::fmt::Debug for TrickPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrickPipeline")
            .field("tricks", &self.names())
            .finish()
    }
}

impl TrickPipeline {
    /// Pipeline with no detectors; it passes models through unchanged.
    pub fn empty() -> Self {
        Self { tricks: Vec::new() }
    }

    /// Ribosomal slippage, then leaky stop, then RNA editing.
    pub fn standard(config: &ModelConfig) -> Self {
        Self::empty()
            .with_trick(RibosomalSlippageDetector::new(config.junction_window))
            .with_trick(LeakyStopDetector::new(config.junction_window))
            .with_trick(RnaEditingDetector::new(config.junction_window))
    }

    /// Append a detector.
    pub fn with_trick(mut self, trick: impl ViralTrick + 'static) -> Self {
        self.tricks.push(Box::new(trick));
        self
    }

    /// Detector names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.tricks.iter().map(|trick| trick.name()).collect()
    }

    /// Run `model` through every detector, keeping all candidates.
    pub fn apply(&self, model: Model) -> Vec<Model> {
        self.tricks.iter().fold(vec![model], |models, trick| {
            let adjusted: Vec<Model> = models
                .iter()
                .flat_map(|model| trick.adjust(model))
                .collect();
            debug!(
                trick = trick.name(),
                before = models.len(),
                after = adjusted.len(),
                "applied viral trick"
            );
            adjusted
        })
    }
}

/// Two exons adjacent in transcription order that meet closely enough, in
/// different frames, to hide a frameshift or an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Junction {
    /// Index of the exon translated first.
    pub upstream: usize,
    /// Index of the exon translated second.
    pub downstream: usize,
    /// Genome bases searched for a motif.
    pub region: Interval,
}

/// Near junctions of `model`: intron length within `±window` and a frame
/// change across the junction.
pub(crate) fn near_junctions(model: &Model, window: u32) -> Vec<Junction> {
    let genome_last = model.alignment.genome.len().saturating_sub(1);
    model
        .exons
        .windows(2)
        .enumerate()
        .filter_map(|(idx, pair)| {
            let (lo, hi) = (&pair[0], &pair[1]);
            let intron = i64::from(hi.range.begin()) - i64::from(lo.range.end()) - 1;
            if intron.abs() > i64::from(window) || lo.frame == hi.frame {
                return None;
            }
            let near = lo.range.end().min(hi.range.begin());
            let far = lo.range.end().max(hi.range.begin());
            let region = Interval::new(
                near.saturating_sub(window),
                far.saturating_add(window).min(genome_last),
            )?;
            let (upstream, downstream) = match model.direction {
                Direction::Forward => (idx, idx + 1),
                Direction::Reverse => (idx + 1, idx),
            };
            Some(Junction {
                upstream,
                downstream,
                region,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Alignment, Exon, Frame, ViralProtein, VirusGenome};

    fn model(exons: Vec<Exon>) -> Model {
        let protein = Arc::new(ViralProtein::new("p1", 200));
        let genome = Arc::new(VirusGenome::new("g1", vec![b'C'; 600], Vec::new()).unwrap());
        let alignment = Arc::new(Alignment::new(protein, genome, Vec::new(), 0.0));
        Model::new(alignment, Direction::Forward, exons)
    }

    fn exon(begin: u32, end: u32, frame: Frame) -> Exon {
        Exon::new(Interval::new(begin, end).unwrap(), frame)
    }

    #[test]
    fn near_junction_requires_proximity_and_frame_change() {
        let model = model(vec![
            exon(10, 104, Frame::Two),
            exon(106, 300, Frame::Three),
            exon(400, 500, Frame::One),
        ]);
        let junctions = near_junctions(&model, 20);
        assert_eq!(
            junctions,
            vec![Junction {
                upstream: 0,
                downstream: 1,
                region: Interval::new(84, 126).unwrap(),
            }]
        );
    }

    #[test]
    fn pipeline_without_signatures_passes_model_through() {
        let model = model(vec![exon(10, 104, Frame::Two), exon(106, 300, Frame::Three)]);
        let pipeline = TrickPipeline::standard(&ModelConfig::default());
        let adjusted = pipeline.apply(model.clone());

        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted[0].exons, model.exons);
        assert_eq!(
            pipeline.names(),
            vec!["ribosomal_slippage", "leaky_stop", "rna_editing"]
        );
    }
}
