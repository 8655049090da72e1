mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use vireo::assembly::{split_at_gaps, split_exons_at_gaps};
use vireo::{Interval, Model};

/// Disjoint, strictly increasing intervals built from (spacing, length)
/// steps.
fn arb_layout(max: usize) -> impl Strategy<Value = Vec<Interval>> {
    proptest::collection::vec((1u32..80, 0u32..120), 1..max).prop_map(|steps| {
        let mut cursor = 0;
        steps
            .into_iter()
            .map(|(spacing, len)| {
                let begin = cursor + spacing;
                cursor = begin + len;
                Interval::new(begin, begin + len).unwrap()
            })
            .collect()
    })
}

fn positions<'a>(ranges: impl IntoIterator<Item = &'a Interval>) -> BTreeSet<u32> {
    ranges
        .into_iter()
        .flat_map(|range| range.begin()..=range.end())
        .collect()
}

fn exon_ranges(model: &Model) -> Vec<Interval> {
    model.exons.iter().map(|exon| exon.range).collect()
}

proptest! {
    #[test]
    fn split_output_avoids_gaps_and_keeps_every_other_base(
        exons in arb_layout(8),
        gaps in arb_layout(6),
    ) {
        let genome = common::plain_genome("g1", 10, Vec::new());
        let bounds: Vec<(u32, u32)> = exons.iter().map(|r| (r.begin(), r.end())).collect();
        let model = common::model_with_exons(genome, &bounds);

        let split = split_at_gaps(&model, &gaps).unwrap();
        let mut covered = BTreeSet::new();
        for piece in &split {
            prop_assert!(piece.validate().is_ok());
            for exon in &piece.exons {
                prop_assert!(gaps.iter().all(|gap| !gap.intersects(&exon.range)));
                covered.extend(exon.range.begin()..=exon.range.end());
            }
        }

        let gap_bases = positions(&gaps);
        let expected: BTreeSet<u32> = positions(&exons).difference(&gap_bases).copied().collect();
        prop_assert_eq!(covered, expected);
    }

    #[test]
    fn untouched_models_come_back_unchanged(exons in arb_layout(6)) {
        let genome = common::plain_genome("g1", 10, Vec::new());
        let bounds: Vec<(u32, u32)> = exons.iter().map(|r| (r.begin(), r.end())).collect();
        let model = common::model_with_exons(genome, &bounds);

        let far = exons.last().unwrap().end() + 10;
        let gaps = [Interval::new(far, far + 5).unwrap()];
        let split = split_at_gaps(&model, &gaps).unwrap();
        prop_assert_eq!(split.len(), 1);
        prop_assert_eq!(exon_ranges(&split[0]), exons);
        prop_assert!(split[0].notes.is_empty());
    }
}

#[test]
fn gaps_covering_every_exon_drop_the_model() {
    common::init_tracing();
    let model = common::model_with_exons(common::plain_genome("g1", 10, Vec::new()), &[(100, 200)]);
    let gaps = [Interval::new(50, 250).unwrap()];
    assert!(split_exons_at_gaps(&model, &gaps).unwrap().is_none());
    assert!(split_at_gaps(&model, &gaps).unwrap().is_empty());
}
