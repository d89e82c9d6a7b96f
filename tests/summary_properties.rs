use daily_diet_api::domain::{Meal, summarize};
use proptest::prelude::*;
use uuid::Uuid;

fn meals(flags: &[bool]) -> Vec<Meal> {
    let user_id = Uuid::new_v4();
    flags
        .iter()
        .enumerate()
        .map(|(i, &in_diet)| Meal::new(user_id, format!("meal-{i}"), None, in_diet, None))
        .collect()
}

/// Longest run of `true`, measured by lengths only.
fn longest_run(flags: &[bool]) -> usize {
    flags
        .split(|&in_diet| !in_diet)
        .map(<[bool]>::len)
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn counts_add_up(flags in prop::collection::vec(any::<bool>(), 0..64)) {
        let input = meals(&flags);
        let summary = summarize(&input);

        prop_assert_eq!(summary.amount, flags.len());
        prop_assert_eq!(summary.amount_in_diet, flags.iter().filter(|&&f| f).count());
        prop_assert_eq!(summary.amount, summary.amount_in_diet + summary.amount_not_in_diet);
    }

    #[test]
    fn best_run_is_a_longest_contiguous_in_diet_window(
        flags in prop::collection::vec(any::<bool>(), 0..64)
    ) {
        let input = meals(&flags);
        let summary = summarize(&input);
        let best = summary.best_sequence_in_diet;

        prop_assert!(best.len() <= summary.amount_in_diet);
        prop_assert!(best.iter().all(|m| m.in_diet));
        prop_assert_eq!(best.len(), longest_run(&flags));

        // Contiguous in input order: the window's ids match a slice of the input.
        if let Some(first) = best.first() {
            let start = input.iter().position(|m| m.id == first.id).unwrap();
            prop_assert_eq!(&input[start..start + best.len()], best);
        }
    }

    #[test]
    fn earliest_longest_run_wins(flags in prop::collection::vec(any::<bool>(), 1..64)) {
        let input = meals(&flags);
        let summary = summarize(&input);
        let best_len = longest_run(&flags);

        // First index where a run of `best_len` in-diet meals starts.
        let expected_start = (0..flags.len())
            .find(|&i| i + best_len <= flags.len() && flags[i..i + best_len].iter().all(|&f| f));

        if best_len == 0 {
            prop_assert!(summary.best_sequence_in_diet.is_empty());
        } else {
            let start = expected_start.unwrap();
            prop_assert_eq!(summary.best_sequence_in_diet, &input[start..start + best_len]);
        }
    }

    #[test]
    fn summarize_is_idempotent(flags in prop::collection::vec(any::<bool>(), 0..32)) {
        let input = meals(&flags);
        prop_assert_eq!(summarize(&input), summarize(&input));
    }
}
