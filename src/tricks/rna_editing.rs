use tracing::debug;

use super::codon::{motif_sites, offset_position};
use super::{near_junctions, Junction, ViralTrick};
use crate::model::{Direction, Interval, Model, RnaEdit};

/// Detects co-transcriptional RNA editing at near junctions.
///
/// Active only for proteins declaring [`RnaEditing`]. The edit site sits
/// `offset` bases past the start of the editing motif; the upstream exon
/// ends just before it and the downstream exon resumes on it, with the
/// inserted bases recorded on the model.
///
/// [`RnaEditing`]: crate::model::RnaEditing
#[derive(Debug, Clone, Copy)]
pub struct RnaEditingDetector {
    junction_window: u32,
}

impl RnaEditingDetector {
    /// Detector searching `junction_window` bases around each junction.
    pub fn new(junction_window: u32) -> Self {
        Self { junction_window }
    }
}

impl ViralTrick for RnaEditingDetector {
    fn name(&self) -> &'static str {
        "rna_editing"
    }

    fn description(&self) -> &'static str {
        "Join exons across an RNA editing site with inserted bases."
    }

    fn variants(&self, model: &Model) -> Vec<Model> {
        let Some(editing) = &model.alignment.protein.attributes.rna_editing else {
            return Vec::new();
        };
        if model.rna_editing.is_some() {
            return Vec::new();
        }
        let genome = &model.alignment.genome;

        let mut variants: Vec<Model> = Vec::new();
        for junction in near_junctions(model, self.junction_window) {
            for site in motif_sites(genome, junction.region, model.direction, &editing.motif) {
                let Some(edit) = offset_position(site.start, editing.offset, model.direction)
                else {
                    continue;
                };
                let Some(variant) = edit_at(model, &junction, edit, &editing.insertion) else {
                    continue;
                };
                if !variants.iter().any(|seen| seen.exons == variant.exons) {
                    debug!(
                        protein = %model.alignment.protein.id,
                        edit,
                        insertion = %editing.insertion,
                        "RNA editing site"
                    );
                    variants.push(variant);
                }
            }
        }
        variants
    }
}

fn edit_at(model: &Model, junction: &Junction, edit: u32, insertion: &str) -> Option<Model> {
    let up = model.exons[junction.upstream].range;
    let down = model.exons[junction.downstream].range;

    let (up_range, down_range) = match model.direction {
        Direction::Forward => (up.with_end(edit.checked_sub(1)?)?, down.with_begin(edit)?),
        Direction::Reverse => (up.with_begin(edit.checked_add(1)?)?, down.with_end(edit)?),
    };

    let mut adjusted = model.clone();
    adjusted.exons[junction.upstream].range = up_range;
    adjusted.exons[junction.downstream].range = down_range;
    adjusted.rna_editing = Some(RnaEdit {
        site: Interval::point(edit),
        insertion: insertion.to_owned(),
    });
    adjusted
        .notes
        .push(format!("RNA editing at {edit} inserts {insertion}"));
    Some(adjusted)
}
