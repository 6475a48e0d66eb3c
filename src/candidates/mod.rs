//! Filter pipeline: from store + search state to the rendered candidate list
//!
//! [`build`] is a pure function over the current engine state. It owns the
//! ordering, truncation and empty-state rules so the renderer never has to
//! guess: at most one [`EmptyState`] signal is emitted per recomputation, and
//! limit-reached suppresses the other two.
//!
//! Disabled *choices* stay in the list (the renderer greys them out and
//! navigation skips them); choices in disabled or hidden groups are removed
//! outright.

use crate::config::PickerConfig;
use crate::search::SearchState;
use crate::store::{Choice, ChoiceId, GroupId, ItemStore};

/// Why the dropdown has nothing selectable to show
///
/// The engine emits which state applies plus its parameters; it never renders
/// text. The three variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// The selection is at `max_item_count`; carries the configured limit
    LimitReached { limit: usize },

    /// A search was active and matched nothing; carries the query
    NoResults { query: String },

    /// The candidate pool is exhausted (no query active)
    NoChoices,
}

/// One renderable candidate, in final display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEntry {
    pub id: ChoiceId,
    pub group: Option<GroupId>,
    /// Rendered greyed out; never enterable for the highlight
    pub disabled: bool,
    /// Match quality of the last search pass (zero when unfiltered)
    pub score: u32,
}

/// The ordered, truncated set of choices currently eligible for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    entries: Vec<CandidateEntry>,
    groups: Vec<GroupId>,
    empty_state: Option<EmptyState>,
}

impl CandidateList {
    /// Entries in display order
    #[must_use]
    pub fn entries(&self) -> &[CandidateEntry] {
        &self.entries
    }

    /// Groups that still own at least one listed candidate, in first-appearance order
    #[must_use]
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// The empty-state signal, if any
    #[must_use]
    pub fn empty_state(&self) -> Option<&EmptyState> {
        self.empty_state.as_ref()
    }

    /// Number of listed candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of a candidate in display order
    #[must_use]
    pub fn position(&self, id: ChoiceId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Whether the candidate at `pos` can take the highlight
    #[must_use]
    pub fn enterable(&self, pos: usize) -> bool {
        self.entries.get(pos).is_some_and(|e| !e.disabled)
    }

    /// First candidate that can take the highlight
    #[must_use]
    pub fn first_enterable(&self) -> Option<ChoiceId> {
        self.entries.iter().find(|e| !e.disabled).map(|e| e.id)
    }
}

/// Compute the candidate list for the current engine state
///
/// While a remote load is in flight the list is forced empty with no
/// empty-state signal — the frame's loading flag is the blocking signal and
/// interaction is rejected upstream.
#[must_use]
pub fn build(
    store: &ItemStore,
    search: &SearchState,
    selected_count: usize,
    config: &PickerConfig,
    loading: bool,
) -> CandidateList {
    if loading {
        return CandidateList::default();
    }

    if let Some(limit) = config.max_items()
        && selected_count >= limit
    {
        return CandidateList {
            entries: Vec::new(),
            groups: Vec::new(),
            empty_state: Some(EmptyState::LimitReached { limit }),
        };
    }

    let active_query = search.active_query(config.search_floor);

    let mut entries: Vec<CandidateEntry> = match active_query {
        Some(_) => search
            .results
            .iter()
            .filter_map(|scored| {
                let choice = store.choice(scored.id).ok()?;
                (eligible(choice) && !store.group_blocked(choice)).then(|| CandidateEntry {
                    id: choice.id,
                    group: choice.group,
                    disabled: choice.disabled,
                    score: scored.score,
                })
            })
            .collect(),
        None => store
            .choices()
            .iter()
            .filter(|choice| eligible(choice) && !store.group_blocked(choice))
            .map(|choice| CandidateEntry {
                id: choice.id,
                group: choice.group,
                disabled: choice.disabled,
                score: 0,
            })
            .collect(),
    };

    if let Some(limit) = config.render_limit() {
        entries.truncate(limit);
    }

    let mut groups = Vec::new();
    for entry in &entries {
        if let Some(gid) = entry.group
            && !groups.contains(&gid)
        {
            groups.push(gid);
        }
    }

    let empty_state = entries.is_empty().then(|| match active_query {
        Some(query) => EmptyState::NoResults {
            query: query.to_string(),
        },
        None => EmptyState::NoChoices,
    });

    CandidateList {
        entries,
        groups,
        empty_state,
    }
}

/// Active, not yet selected, and not a placeholder
fn eligible(choice: &Choice) -> bool {
    choice.active && !choice.selected && !choice.placeholder
}
