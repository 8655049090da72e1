use tracing::{debug, warn};

use crate::model::{validate_gaps, GenomeSide, Interval, Model, ModelError};

/// Split a model at sequence gaps: first into independent models at gaps
/// lying inside introns, then cut each remaining exon around the gaps it
/// overlaps.
///
/// No exon of the result intersects a gap, and the result covers exactly
/// the input exon bases not covered by a gap. Models whose exons are all
/// swallowed by gaps are dropped.
pub fn split_at_gaps(model: &Model, gaps: &[Interval]) -> Result<Vec<Model>, ModelError> {
    let models = split_model_at_gaps(model, gaps)?;
    let mut split = Vec::with_capacity(models.len());
    for sub_model in &models {
        if let Some(cut) = split_exons_at_gaps(sub_model, gaps)? {
            split.push(cut);
        }
    }
    debug!(
        protein = %model.alignment.protein.id,
        models = split.len(),
        "split model at sequence gaps"
    );
    Ok(split)
}

/// Split a model into independent models wherever a gap lies strictly
/// between two consecutive exons.
///
/// Each piece inherits the parent's annotations and is partial on the
/// edges facing a gap. A model with no intron gap is returned unchanged.
pub fn split_model_at_gaps(model: &Model, gaps: &[Interval]) -> Result<Vec<Model>, ModelError> {
    validate_gaps(gaps)?;

    let mut bounds = vec![0];
    for (idx, pair) in model.exons.windows(2).enumerate() {
        let (up, down) = (pair[0].range, pair[1].range);
        if gaps
            .iter()
            .any(|gap| gap.begin() > up.end() && gap.end() < down.begin())
        {
            bounds.push(idx + 1);
        }
    }
    if bounds.len() == 1 {
        return Ok(vec![model.clone()]);
    }
    bounds.push(model.exons.len());

    let pieces = bounds
        .windows(2)
        .map(|window| {
            let (start, end) = (window[0], window[1]);
            let mut piece = Model {
                exons: model.exons[start..end].to_vec(),
                ..model.clone()
            };
            if start > 0 {
                piece.mark_partial(GenomeSide::Left);
            }
            if end < model.exons.len() {
                piece.mark_partial(GenomeSide::Right);
            }
            retain_features_within(&mut piece);
            piece.notes.push(format!(
                "split at sequence gap into exons {}..{}",
                start + 1,
                end
            ));
            piece
        })
        .collect();
    Ok(pieces)
}

/// Cut every exon around the gaps it overlaps, keeping the pieces in the
/// same model.
///
/// When a gap clips the model's outermost base on either side, that edge
/// becomes partial. Returns `Ok(None)` when gaps cover every exon.
pub fn split_exons_at_gaps(model: &Model, gaps: &[Interval]) -> Result<Option<Model>, ModelError> {
    validate_gaps(gaps)?;
    let Some(span) = model.span() else {
        return Ok(None);
    };

    let mut exons = Vec::with_capacity(model.exons.len());
    let mut cut = false;
    for exon in &model.exons {
        let pieces = exon.range.subtract(gaps);
        cut |= pieces.as_slice() != [exon.range];
        exons.extend(pieces.into_iter().map(|range| exon.with_range(range)));
    }
    if !cut {
        return Ok(Some(model.clone()));
    }
    if exons.is_empty() {
        warn!(
            protein = %model.alignment.protein.id,
            span = %span,
            "sequence gaps cover every exon; dropping model"
        );
        return Ok(None);
    }

    let mut adjusted = Model {
        exons,
        ..model.clone()
    };
    if let Some(new_span) = adjusted.span() {
        if new_span.begin() > span.begin() {
            adjusted.mark_partial(GenomeSide::Left);
        }
        if new_span.end() < span.end() {
            adjusted.mark_partial(GenomeSide::Right);
        }
    }
    retain_features_within(&mut adjusted);
    adjusted.notes.push("exons cut at sequence gaps".to_string());
    Ok(Some(adjusted))
}

fn retain_features_within(model: &mut Model) {
    let Some(span) = model.span() else {
        return;
    };
    let inside = |range: &Interval| range.intersects(&span);
    model.ribosomal_slippage = model.ribosomal_slippage.filter(inside);
    model.replace_stop_codon = model.replace_stop_codon.filter(inside);
    if model
        .rna_editing
        .as_ref()
        .is_some_and(|edit| !inside(&edit.site))
    {
        model.rna_editing = None;
    }
}
