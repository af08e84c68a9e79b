// src/selector.rs
// No-repeat random index selection for a single category

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{QuoteError, Result};

/// Per-session, per-category selection state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState {
    /// Indices already shown in the current cycle
    #[serde(default)]
    pub used: BTreeSet<usize>,
    /// Index returned by the previous selection, if any
    #[serde(default)]
    pub last: Option<usize>,
}

/// Outcome of one selection: the chosen index and the state to store back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub state: CategoryState,
}

/// Pick an index in `0..item_count` that has not been used this cycle.
///
/// A used set that already covers every item is treated as empty, starting a
/// new cycle. When more than one candidate remains, the index shown last is
/// never returned again immediately. Only the returned index is recorded as
/// used. The input state is left untouched; callers persist `Selection::state`.
pub fn select<R: Rng + ?Sized>(
    category: &str,
    item_count: usize,
    state: &CategoryState,
    rng: &mut R,
) -> Result<Selection> {
    if item_count == 0 {
        return Err(QuoteError::EmptyCategory(category.to_string()));
    }

    // Indices from a longer catalog can't be honoured
    let mut used: BTreeSet<usize> = state
        .used
        .iter()
        .copied()
        .filter(|&i| i < item_count)
        .collect();
    if used.len() >= item_count {
        used.clear();
    }

    let available: Vec<usize> = (0..item_count).filter(|i| !used.contains(i)).collect();
    let mut index = available[rng.random_range(0..available.len())];

    if available.len() > 1 && state.last == Some(index) {
        let others: Vec<usize> = available
            .iter()
            .copied()
            .filter(|&i| Some(i) != state.last)
            .collect();
        index = others[rng.random_range(0..others.len())];
    }

    used.insert(index);
    Ok(Selection {
        index,
        state: CategoryState {
            used,
            last: Some(index),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run(item_count: usize, rounds: usize, seed: u64) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = CategoryState::default();
        let mut picks = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            let selection = select("A", item_count, &state, &mut rng).unwrap();
            picks.push(selection.index);
            state = selection.state;
        }
        picks
    }

    #[test]
    fn test_empty_category_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = CategoryState {
            used: BTreeSet::from([0]),
            last: Some(0),
        };
        let err = select("empty", 0, &state, &mut rng).unwrap_err();
        assert_eq!(err, QuoteError::EmptyCategory("empty".to_string()));
        // Input state is borrowed immutably, so nothing to roll back
        assert_eq!(state.used.len(), 1);
    }

    #[test]
    fn test_single_item_always_zero() {
        for seed in 0..10 {
            assert!(run(1, 6, seed).iter().all(|&i| i == 0));
        }
    }

    #[test]
    fn test_full_cycle_is_permutation() {
        for seed in 0..50 {
            for n in 2..8 {
                let picks = run(n, n, seed);
                let distinct: BTreeSet<usize> = picks.iter().copied().collect();
                assert_eq!(distinct.len(), n, "seed {seed} n {n}: {picks:?}");
                assert!(picks.iter().all(|&i| i < n));
            }
        }
    }

    #[test]
    fn test_every_cycle_is_permutation() {
        for seed in 0..20 {
            let n = 5;
            let picks = run(n, n * 6, seed);
            for cycle in picks.chunks(n) {
                let distinct: BTreeSet<usize> = cycle.iter().copied().collect();
                assert_eq!(distinct.len(), n, "seed {seed}: {picks:?}");
            }
        }
    }

    #[test]
    fn test_no_back_to_back_repeat() {
        for seed in 0..50 {
            for n in 2..6 {
                let picks = run(n, n * 10, seed);
                for pair in picks.windows(2) {
                    assert_ne!(pair[0], pair[1], "seed {seed} n {n}: {picks:?}");
                }
            }
        }
    }

    #[test]
    fn test_three_item_example() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = CategoryState::default();
            let mut picks = Vec::new();
            for _ in 0..3 {
                let s = select("A", 3, &state, &mut rng).unwrap();
                picks.push(s.index);
                state = s.state;
            }
            let mut sorted = picks.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2]);
            assert_eq!(state.used.len(), 3);

            let fourth = select("A", 3, &state, &mut rng).unwrap();
            assert_ne!(fourth.index, picks[2]);
            // Fresh cycle holds only the new pick
            assert_eq!(fourth.state.used, BTreeSet::from([fourth.index]));
            assert_eq!(fourth.state.last, Some(fourth.index));
        }
    }

    #[test]
    fn test_lone_candidate_may_repeat_last() {
        let mut rng = StdRng::seed_from_u64(7);
        // Everything but 2 used, and 2 was somehow shown last
        let state = CategoryState {
            used: BTreeSet::from([0, 1, 3]),
            last: Some(2),
        };
        let s = select("A", 4, &state, &mut rng).unwrap();
        assert_eq!(s.index, 2);
        assert_eq!(s.state.used, BTreeSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_redraw_excludes_last_only() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let state = CategoryState {
                used: BTreeSet::from([0]),
                last: Some(1),
            };
            let s = select("A", 3, &state, &mut rng).unwrap();
            assert_eq!(s.index, 2);
            // The discarded draw is not recorded
            assert_eq!(s.state.used, BTreeSet::from([0, 2]));
        }
    }

    #[test]
    fn test_stale_indices_are_dropped() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = CategoryState {
            used: BTreeSet::from([0, 9, 12]),
            last: Some(9),
        };
        let s = select("A", 2, &state, &mut rng).unwrap();
        assert_eq!(s.index, 1);
        assert_eq!(s.state.used, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_state_serde_defaults() {
        let state: CategoryState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, CategoryState::default());

        let state: CategoryState = serde_json::from_str(r#"{"used":[2,0],"last":2}"#).unwrap();
        assert_eq!(state.used, BTreeSet::from([0, 2]));
        assert_eq!(state.last, Some(2));
    }
}
