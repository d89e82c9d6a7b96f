//! Diet adherence summary over a user's meals.

use serde::Serialize;

use super::meal::Meal;

/// Aggregate statistics for one user's meals.
///
/// `best_sequence_in_diet` borrows from the slice passed to [`summarize`],
/// so it is always a contiguous window of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary<'a> {
    pub amount: usize,
    pub amount_in_diet: usize,
    pub amount_not_in_diet: usize,
    pub best_sequence_in_diet: &'a [Meal],
}

/// Summarize `meals` in the order given.
///
/// The longest run of consecutive in-diet meals is reported; when two runs
/// have the same length the earlier one is kept. The input is not sorted
/// here, callers decide what "consecutive" means by the order they pass.
pub fn summarize(meals: &[Meal]) -> Summary<'_> {
    let mut amount_in_diet = 0;
    let mut run_start = 0;
    let (mut best_start, mut best_len) = (0, 0);

    for (index, meal) in meals.iter().enumerate() {
        if meal.in_diet {
            amount_in_diet += 1;
            let run_len = index + 1 - run_start;
            // Strictly longer only: an equal run later on must not win.
            if run_len > best_len {
                best_start = run_start;
                best_len = run_len;
            }
        } else {
            run_start = index + 1;
        }
    }

    Summary {
        amount: meals.len(),
        amount_in_diet,
        amount_not_in_diet: meals.len() - amount_in_diet,
        best_sequence_in_diet: &meals[best_start..best_start + best_len],
    }
}
