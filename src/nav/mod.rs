//! Highlight state machine for keyboard traversal
//!
//! One highlight at a time, no history: `Idle` (dropdown closed or nothing to
//! highlight) or `Highlighted(id)`. Moves clamp at the list boundaries — there
//! is deliberately no wraparound — and disabled candidates are never enterable,
//! so they are skipped in both directions.
//!
//! After every pipeline recomputation [`Highlight::reanchor`] re-derives the
//! state: keep the current id when it is still listed and enterable, otherwise
//! fall back to the first enterable candidate, otherwise go idle. The same
//! rule applies whether the list changed because of a search pass or a
//! selection change.

use crate::candidates::CandidateList;
use crate::store::ChoiceId;

/// The single candidate currently targeted for keyboard-driven selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    current: Option<ChoiceId>,
}

impl Highlight {
    /// Start idle
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// The highlighted candidate, if any
    #[must_use]
    pub const fn current(&self) -> Option<ChoiceId> {
        self.current
    }

    /// Highlight the first enterable candidate (dropdown open)
    ///
    /// Stays idle when the list has nothing enterable.
    pub fn open(&mut self, list: &CandidateList) -> Option<ChoiceId> {
        self.current = list.first_enterable();
        self.current
    }

    /// Move the highlight down; a no-op at the last enterable candidate
    pub fn next(&mut self, list: &CandidateList) -> Option<ChoiceId> {
        self.step(list, Direction::Down)
    }

    /// Move the highlight up; a no-op at the first enterable candidate
    pub fn previous(&mut self, list: &CandidateList) -> Option<ChoiceId> {
        self.step(list, Direction::Up)
    }

    /// Re-derive the highlight after the candidate list changed
    pub fn reanchor(&mut self, list: &CandidateList) {
        let retained = self
            .current
            .and_then(|id| list.position(id))
            .is_some_and(|pos| list.enterable(pos));
        if !retained {
            self.current = list.first_enterable();
        }
    }

    /// Drop the highlight (dropdown closed)
    pub fn clear(&mut self) {
        self.current = None;
    }

    fn step(&mut self, list: &CandidateList, direction: Direction) -> Option<ChoiceId> {
        let Some(pos) = self.current.and_then(|id| list.position(id)) else {
            // nothing highlighted yet: both directions land on the first entry
            self.current = list.first_enterable();
            return self.current;
        };

        let entries = list.entries();
        let candidate = match direction {
            Direction::Down => entries
                .iter()
                .skip(pos + 1)
                .find(|e| !e.disabled)
                .map(|e| e.id),
            Direction::Up => entries[..pos].iter().rev().find(|e| !e.disabled).map(|e| e.id),
        };

        if let Some(id) = candidate {
            self.current = Some(id);
        }
        self.current
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates;
    use crate::config::PickerConfig;
    use crate::search::SearchState;
    use crate::store::{ChoiceId, ChoiceSpec, ItemStore};

    fn list_of(labels: &[&str], disabled: &[usize]) -> (CandidateList, Vec<ChoiceId>) {
        let mut store = ItemStore::new();
        let ids: Vec<ChoiceId> = labels
            .iter()
            .map(|label| store.add_choice(ChoiceSpec::new(*label, *label)))
            .collect();
        for &pos in disabled {
            store.set_disabled(ids[pos], true).unwrap();
        }
        let list = candidates::build(
            &store,
            &SearchState::new(),
            0,
            &PickerConfig::default(),
            false,
        );
        (list, ids)
    }

    #[test]
    fn test_open_highlights_first_candidate() {
        let (list, ids) = list_of(&["Choice 1", "Choice 2"], &[]);
        let mut highlight = Highlight::new();

        assert_eq!(highlight.open(&list), Some(ids[0]));
        assert_eq!(highlight.current(), Some(ids[0]));
    }

    #[test]
    fn test_open_skips_leading_disabled_candidates() {
        let (list, ids) = list_of(&["Choice 1", "Choice 2", "Choice 3"], &[0, 1]);
        let mut highlight = Highlight::new();

        assert_eq!(highlight.open(&list), Some(ids[2]));
    }

    #[test]
    fn test_open_on_empty_list_stays_idle() {
        let (list, _) = list_of(&[], &[]);
        let mut highlight = Highlight::new();

        assert_eq!(highlight.open(&list), None);
        assert_eq!(highlight.current(), None);
    }

    #[test]
    fn test_next_walks_down_and_clamps_at_end() {
        let (list, ids) = list_of(&["Choice 1", "Choice 2", "Choice 3"], &[]);
        let mut highlight = Highlight::new();
        highlight.open(&list);

        assert_eq!(highlight.next(&list), Some(ids[1]));
        assert_eq!(highlight.next(&list), Some(ids[2]));
        // boundary: no wraparound
        assert_eq!(highlight.next(&list), Some(ids[2]));
    }

    #[test]
    fn test_previous_walks_up_and_clamps_at_start() {
        let (list, ids) = list_of(&["Choice 1", "Choice 2"], &[]);
        let mut highlight = Highlight::new();
        highlight.open(&list);
        highlight.next(&list);

        assert_eq!(highlight.previous(&list), Some(ids[0]));
        // boundary: no wraparound
        assert_eq!(highlight.previous(&list), Some(ids[0]));
    }

    #[test]
    fn test_moves_skip_disabled_candidates() {
        let (list, ids) = list_of(&["Choice 1", "Choice 2", "Choice 3"], &[1]);
        let mut highlight = Highlight::new();
        highlight.open(&list);

        assert_eq!(highlight.next(&list), Some(ids[2]));
        assert_eq!(highlight.previous(&list), Some(ids[0]));
    }

    #[test]
    fn test_reanchor_retains_surviving_highlight() {
        let (list, ids) = list_of(&["Choice 1", "Choice 2", "Choice 3"], &[]);
        let mut highlight = Highlight::new();
        highlight.open(&list);
        highlight.next(&list);

        highlight.reanchor(&list);
        assert_eq!(highlight.current(), Some(ids[1]));
    }

    #[test]
    fn test_reanchor_falls_back_to_first_candidate() {
        let (full, ids) = list_of(&["Choice 1", "Choice 2", "Choice 3"], &[]);
        let mut highlight = Highlight::new();
        highlight.open(&full);
        highlight.next(&full);
        highlight.next(&full);

        // the highlighted entry disappeared from the recomputed list
        let (narrowed, narrowed_ids) = list_of(&["Choice 1", "Choice 2"], &[]);
        assert_eq!(highlight.current(), Some(ids[2]));
        highlight.reanchor(&narrowed);
        assert_eq!(highlight.current(), Some(narrowed_ids[0]));
    }

    #[test]
    fn test_reanchor_goes_idle_on_empty_list() {
        let (list, _) = list_of(&["Choice 1"], &[]);
        let mut highlight = Highlight::new();
        highlight.open(&list);

        let (empty, _) = list_of(&[], &[]);
        highlight.reanchor(&empty);
        assert_eq!(highlight.current(), None);
    }
}
