use tracing::debug;

use super::codon::{codon_at, codon_starts, is_stop};
use super::ViralTrick;
use crate::model::{AlignmentFragment, Direction, Exon, Interval, Model};

/// Detects translation through a leaky stop codon at the 3' end.
///
/// Active only for proteins declaring [`StopReadthrough`]. Two signatures
/// are recognised on the 3'-terminal exon:
///
/// * an in-frame stop codon inside the exon that is not its final codon,
///   i.e. the aligner already read through it; the stop is recorded;
/// * an in-frame stop codon right after the exon, followed within the
///   junction window by another same-frame fragment of the alignment that
///   continues the protein; the stop is recorded and the exon is extended
///   over that fragment, unless a sequence gap lies in between.
///
/// Models that already record a replaced stop are left alone.
///
/// [`StopReadthrough`]: crate::model::StopReadthrough
#[derive(Debug, Clone, Copy)]
pub struct LeakyStopDetector {
    junction_window: u32,
}

impl LeakyStopDetector {
    /// Detector accepting continuations up to `junction_window` bases past
    /// the stop codon.
    pub fn new(junction_window: u32) -> Self {
        Self { junction_window }
    }

    fn continuation<'a>(
        &self,
        model: &'a Model,
        exon: &Exon,
        stop: Interval,
    ) -> Option<&'a AlignmentFragment> {
        let reached = exon.fragment.map(|fragment| fragment.protein.end());
        model
            .alignment
            .fragments
            .iter()
            .filter(|fragment| {
                fragment.direction == model.direction
                    && fragment.frame == exon.frame
                    && reached.map_or(true, |end| fragment.protein.end() > end)
            })
            .filter_map(|fragment| {
                let distance = match model.direction {
                    Direction::Forward => i64::from(fragment.genome.begin()) - i64::from(stop.end()),
                    Direction::Reverse => i64::from(stop.begin()) - i64::from(fragment.genome.end()),
                };
                (1..=i64::from(self.junction_window) + 1)
                    .contains(&distance)
                    .then_some((distance, fragment))
            })
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, fragment)| fragment)
    }
}

impl ViralTrick for LeakyStopDetector {
    fn name(&self) -> &'static str {
        "leaky_stop"
    }

    fn description(&self) -> &'static str {
        "Translate through an in-frame stop codon by programmed readthrough."
    }

    fn variants(&self, model: &Model) -> Vec<Model> {
        let Some(readthrough) = &model.alignment.protein.attributes.stop_readthrough else {
            return Vec::new();
        };
        if model.replace_stop_codon.is_some() {
            return Vec::new();
        }
        let Some(idx) = model.three_prime_index() else {
            return Vec::new();
        };
        let genome = &model.alignment.genome;
        let exon = &model.exons[idx];

        let mut starts = codon_starts(exon.range, exon.frame);
        if model.direction == Direction::Reverse {
            starts.reverse();
        }
        let Some((&last, internal)) = starts.split_last() else {
            return Vec::new();
        };
        let stop_at = |lowest: u32| {
            codon_at(genome, lowest, model.direction)
                .filter(|codon| is_stop(codon))
                .and_then(|_| Interval::new(lowest, lowest + 2))
        };

        if let Some(stop) = internal.iter().find_map(|&lowest| stop_at(lowest)) {
            let mut adjusted = model.clone();
            adjusted.replace_stop_codon = Some(stop);
            adjusted.notes.push(format!(
                "internal stop codon {stop} read through as {}",
                readthrough.replacement
            ));
            debug!(protein = %model.alignment.protein.id, stop = %stop, "internal leaky stop");
            return vec![adjusted];
        }

        let next = match model.direction {
            Direction::Forward => last.checked_add(3),
            Direction::Reverse => last.checked_sub(3),
        };
        let Some(stop) = next.and_then(stop_at) else {
            return Vec::new();
        };
        let Some(continuation) = self.continuation(model, exon, stop) else {
            return Vec::new();
        };
        let bridged = stop.span(&continuation.genome);
        if genome.gaps().iter().any(|gap| gap.intersects(&bridged)) {
            debug!(
                protein = %model.alignment.protein.id,
                stop = %stop,
                "sequence gap between stop and continuation; no readthrough"
            );
            return Vec::new();
        }
        let extended = match model.direction {
            Direction::Forward => exon.range.with_end(continuation.genome.end()),
            Direction::Reverse => exon.range.with_begin(continuation.genome.begin()),
        };
        let Some(extended) = extended else {
            return Vec::new();
        };

        let mut adjusted = model.clone();
        adjusted.exons[idx].range = extended;
        adjusted.replace_stop_codon = Some(stop);
        adjusted.partial_3p =
            continuation.protein.end() < model.alignment.protein.last_residue();
        adjusted.notes.push(format!(
            "stop codon {stop} read through as {}; extended to {}",
            readthrough.replacement, continuation.genome
        ));
        debug!(
            protein = %model.alignment.protein.id,
            stop = %stop,
            extended = %extended,
            "leaky stop readthrough"
        );
        vec![adjusted]
    }
}
