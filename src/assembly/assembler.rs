use std::sync::Arc;

use tracing::debug;

use crate::model::{
    Alignment, AlignmentFragment, Direction, Exon, Model, ModelError, ScoreComponent,
};

/// Turn a fragment chain into an initial candidate model.
///
/// Each fragment becomes one exon, ordered by genome position. The model is
/// 5' partial when the chain does not begin at the protein's first residue
/// and 3' partial when it does not reach the last residue. The alignment
/// score seeds the `alignmentScore` component.
///
/// Chained fragments may share genome bases; the downstream exon of each
/// overlapping pair is clipped to start after its upstream neighbour.
pub fn assemble_model(
    alignment: &Arc<Alignment>,
    chain: &[AlignmentFragment],
) -> Result<Model, ModelError> {
    let (first, last) = match (chain.first(), chain.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ModelError::EmptyChain),
    };

    let mut exons: Vec<Exon> = chain.iter().map(Exon::from_fragment).collect();
    exons.sort_by_key(|exon| exon.range.begin());
    let clipped = clip_overlaps(&mut exons, first.direction)?;

    let mut model = Model::new(Arc::clone(alignment), first.direction, exons);
    if clipped > 0 {
        model
            .notes
            .push(format!("clipped {clipped} overlapping exon boundaries"));
    }
    model.partial_5p = first.protein.begin() > 0;
    model.partial_3p = last.protein.end() < alignment.protein.last_residue();
    model
        .scores
        .insert(ScoreComponent::Alignment, alignment.score);

    debug!(
        protein = %alignment.protein.id,
        exons = model.exons.len(),
        partial_5p = model.partial_5p,
        partial_3p = model.partial_3p,
        "assembled model"
    );
    Ok(model)
}

fn clip_overlaps(exons: &mut [Exon], direction: Direction) -> Result<usize, ModelError> {
    let mut clipped = 0;
    for idx in 1..exons.len() {
        let (prev, next) = (exons[idx - 1].range, exons[idx].range);
        if prev.end() < next.begin() {
            continue;
        }
        let (upstream, downstream) = match direction {
            Direction::Forward => (idx - 1, idx),
            Direction::Reverse => (idx, idx - 1),
        };
        let trimmed = match direction {
            Direction::Forward => prev.end().checked_add(1).and_then(|b| next.with_begin(b)),
            Direction::Reverse => next.begin().checked_sub(1).and_then(|e| prev.with_end(e)),
        };
        let Some(trimmed) = trimmed else {
            return Err(ModelError::Geometry(format!(
                "exon {} is covered by exon {}",
                exons[downstream].range, exons[upstream].range
            )));
        };
        exons[downstream].range = trimmed;
        clipped += 1;
    }
    Ok(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Frame, Interval, ViralProtein, VirusGenome};

    fn alignment(length: u32) -> Arc<Alignment> {
        let protein = Arc::new(ViralProtein::new("p1", length));
        let genome = Arc::new(VirusGenome::new("g1", b"ACGT", Vec::new()).unwrap());
        Arc::new(Alignment::new(protein, genome, Vec::new(), 42.0))
    }

    fn frag(aa: (u32, u32), nt: (u32, u32), direction: Direction) -> AlignmentFragment {
        AlignmentFragment::new(
            Interval::new(aa.0, aa.1).unwrap(),
            Interval::new(nt.0, nt.1).unwrap(),
            direction,
            Frame::Two,
        )
    }

    #[test]
    fn complete_chain_is_not_partial() {
        let chain = [
            frag((0, 100), (10, 312), Direction::Forward),
            frag((101, 180), (400, 642), Direction::Forward),
        ];
        let model = assemble_model(&alignment(181), &chain).unwrap();

        assert_eq!(model.exons.len(), 2);
        assert_eq!(model.exons[0].frame, Frame::Two);
        assert_eq!(model.exons[1].fragment, Some(chain[1]));
        assert!(!model.partial_5p);
        assert!(!model.partial_3p);
        assert_eq!(model.score(ScoreComponent::Alignment), Some(42.0));
    }

    #[test]
    fn truncated_chain_is_partial_on_both_ends() {
        let chain = [frag((5, 100), (10, 297), Direction::Forward)];
        let model = assemble_model(&alignment(181), &chain).unwrap();
        assert!(model.partial_5p);
        assert!(model.partial_3p);
    }

    #[test]
    fn reverse_chain_exons_are_in_genome_order() {
        let chain = [
            frag((0, 50), (500, 652), Direction::Reverse),
            frag((51, 90), (300, 419), Direction::Reverse),
        ];
        let model = assemble_model(&alignment(91), &chain).unwrap();
        assert_eq!(model.direction, Direction::Reverse);
        assert_eq!(model.exons[0].range, Interval::new(300, 419).unwrap());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn overlapping_fragments_are_clipped_downstream() {
        let forward = [
            frag((0, 50), (10, 162), Direction::Forward),
            frag((45, 90), (150, 290), Direction::Forward),
        ];
        let model = assemble_model(&alignment(91), &forward).unwrap();
        assert_eq!(model.exons[1].range, Interval::new(163, 290).unwrap());
        assert_eq!(model.exons[1].frame, Frame::Two);
        assert!(model.validate().is_ok());

        let reverse = [
            frag((0, 50), (300, 452), Direction::Reverse),
            frag((45, 90), (170, 310), Direction::Reverse),
        ];
        let model = assemble_model(&alignment(91), &reverse).unwrap();
        assert_eq!(model.exons[0].range, Interval::new(170, 299).unwrap());
        assert_eq!(model.exons[1].range, Interval::new(300, 452).unwrap());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert_eq!(
            assemble_model(&alignment(10), &[]).unwrap_err(),
            ModelError::EmptyChain
        );
    }
}
