use tracing::debug;

use super::codon::{motif_sites, offset_position};
use super::{near_junctions, Junction, ViralTrick};
use crate::model::{Direction, Interval, Model};

/// Detects programmed ribosomal frameshifts at near junctions.
///
/// Active only for proteins declaring [`RibosomalSlippage`]. For every
/// slippery-site motif found around a near junction, the upstream exon is
/// trimmed or extended to end at the slip position and the downstream exon
/// resumes `1 + frameshift` bases later, so a -1 shift re-reads the slip
/// base.
///
/// [`RibosomalSlippage`]: crate::model::RibosomalSlippage
#[derive(Debug, Clone, Copy)]
pub struct RibosomalSlippageDetector {
    junction_window: u32,
}

impl RibosomalSlippageDetector {
    /// Detector searching `junction_window` bases around each junction.
    pub fn new(junction_window: u32) -> Self {
        Self { junction_window }
    }
}

impl ViralTrick for RibosomalSlippageDetector {
    fn name(&self) -> &'static str {
        "ribosomal_slippage"
    }

    fn description(&self) -> &'static str {
        "Rejoin exons across a programmed ribosomal frameshift."
    }

    fn variants(&self, model: &Model) -> Vec<Model> {
        let Some(slippage) = &model.alignment.protein.attributes.ribosomal_slippage else {
            return Vec::new();
        };
        let genome = &model.alignment.genome;

        let mut variants: Vec<Model> = Vec::new();
        for junction in near_junctions(model, self.junction_window) {
            for site in motif_sites(genome, junction.region, model.direction, &slippage.motif) {
                let Some(slip) = offset_position(site.start, slippage.offset, model.direction)
                else {
                    continue;
                };
                let Some(variant) = slip_at(model, &junction, slip, slippage.frameshift, site.span)
                else {
                    continue;
                };
                if !variants.iter().any(|seen| seen.exons == variant.exons) {
                    debug!(
                        protein = %model.alignment.protein.id,
                        slip,
                        frameshift = slippage.frameshift,
                        "ribosomal slippage site"
                    );
                    variants.push(variant);
                }
            }
        }
        variants
    }
}

fn slip_at(
    model: &Model,
    junction: &Junction,
    slip: u32,
    frameshift: i32,
    site: Interval,
) -> Option<Model> {
    let up = model.exons[junction.upstream].range;
    let down = model.exons[junction.downstream].range;

    let (up_range, down_range) = match model.direction {
        Direction::Forward => {
            let resume = i64::from(slip) + 1 + i64::from(frameshift);
            (
                up.with_end(slip)?,
                Interval::from_signed(resume, i64::from(down.end()))?,
            )
        }
        Direction::Reverse => {
            let resume = i64::from(slip) - 1 - i64::from(frameshift);
            (
                up.with_begin(slip)?,
                Interval::from_signed(i64::from(down.begin()), resume)?,
            )
        }
    };

    let mut adjusted = model.clone();
    adjusted.exons[junction.upstream].range = up_range;
    adjusted.exons[junction.downstream].range = down_range;
    adjusted.ribosomal_slippage = Some(site);
    adjusted
        .notes
        .push(format!("ribosomal slippage at {slip} ({frameshift:+})"));
    Some(adjusted)
}
