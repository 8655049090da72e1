mod common;

use std::collections::HashSet;

use proptest::prelude::*;
use vireo::{AlignmentFragment, Direction, FragmentChainBuilder, Frame, Interval};

fn arb_fragment() -> impl Strategy<Value = AlignmentFragment> {
    (0u32..60, 0u32..40, 0u32..300, 0u32..120, any::<bool>()).prop_map(
        |(aa_begin, aa_len, nt_begin, nt_len, forward)| {
            let direction = if forward {
                Direction::Forward
            } else {
                Direction::Reverse
            };
            AlignmentFragment::new(
                Interval::new(aa_begin, aa_begin + aa_len).unwrap(),
                Interval::new(nt_begin, nt_begin + nt_len).unwrap(),
                direction,
                Frame::of_position(nt_begin),
            )
        },
    )
}

proptest! {
    #[test]
    fn chains_are_compatible_distinct_and_maximal(
        fragments in proptest::collection::vec(arb_fragment(), 0..8),
        aa_overlap_max in 0u32..15,
        nt_overlap_max in 0u32..45,
    ) {
        let builder = FragmentChainBuilder::new(aa_overlap_max, nt_overlap_max);
        let chains = builder.build(&fragments);

        let mut seen = HashSet::new();
        for chain in &chains {
            prop_assert!(!chain.is_empty());
            let key: Vec<_> = chain.iter().map(|f| f.key()).collect();
            prop_assert!(seen.insert(key), "duplicate chain {:?}", chain);

            for pair in chain.windows(2) {
                prop_assert!(builder.is_compatible(&pair[0], &pair[1]));
            }

            let first = chain[0];
            let last = chain[chain.len() - 1];
            for candidate in &fragments {
                prop_assert!(!builder.is_compatible(candidate, &first), "chain can be prepended");
                prop_assert!(!builder.is_compatible(&last, candidate), "chain can be appended");
                for pair in chain.windows(2) {
                    prop_assert!(
                        !(builder.is_compatible(&pair[0], candidate)
                            && builder.is_compatible(candidate, &pair[1])),
                        "fragment fits between neighbours"
                    );
                }
            }
        }

        // Every fragment belongs to at least one chain.
        for fragment in &fragments {
            prop_assert!(chains.iter().any(|chain| chain.iter().any(|f| f.key() == fragment.key())));
        }
    }

    #[test]
    fn duplicated_input_changes_nothing(
        fragments in proptest::collection::vec(arb_fragment(), 1..6),
    ) {
        let builder = FragmentChainBuilder::new(10, 30);
        let doubled: Vec<_> = fragments.iter().chain(fragments.iter()).copied().collect();
        prop_assert_eq!(builder.build(&fragments), builder.build(&doubled));
    }
}

#[test]
fn six_fragment_scenario_from_raw_parameters() {
    common::init_tracing();
    let builder = FragmentChainBuilder::from_params([
        ("AAOverlapMaximum", "10"),
        ("NTOverlapMaximum", "30"),
    ])
    .unwrap();
    let chains = builder.build(&common::six_fragments());

    let rendered: Vec<String> = chains
        .iter()
        .map(|chain| {
            chain
                .iter()
                .map(|f| f.protein.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    assert_eq!(
        rendered,
        vec![
            "0-100,121-150,171-180",
            "0-100,130-170,171-180",
            "60-120,121-150,171-180",
            "65-110,121-150,171-180",
            "65-110,130-170,171-180",
        ]
    );
}
