use proptest::prelude::*;
use shelf_recommend::round_robin;

fn arb_lists() -> impl Strategy<Value = Vec<Vec<(usize, usize)>>> {
    prop::collection::vec(0usize..8, 0..5).prop_map(|lens| {
        lens.into_iter()
            .enumerate()
            .map(|(list, len)| (0..len).map(|i| (list, i)).collect())
            .collect()
    })
}

proptest! {
    #[test]
    fn length_is_min_of_limit_and_total(lists in arb_lists(), limit in 0usize..40) {
        let total: usize = lists.iter().map(Vec::len).sum();
        prop_assert_eq!(round_robin(&lists, limit).len(), limit.min(total));
    }

    #[test]
    fn each_list_keeps_its_order(lists in arb_lists(), limit in 0usize..40) {
        let out = round_robin(&lists, limit);
        for list in 0..lists.len() {
            let positions: Vec<usize> = out.iter().filter(|(l, _)| *l == list).map(|(_, i)| *i).collect();
            let expected: Vec<usize> = (0..positions.len()).collect();
            prop_assert_eq!(positions, expected);
        }
    }

    #[test]
    fn rounds_never_run_ahead(lists in arb_lists()) {
        // An item at index i is only emitted after every longer list emitted index i - 1.
        let out = round_robin(&lists, usize::MAX);
        let rounds: Vec<usize> = out.iter().map(|(_, i)| *i).collect();
        prop_assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
    }
}
