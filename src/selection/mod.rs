//! Constraint-checked selection operations
//!
//! The [`Selection`] ledger keeps selected ids in insertion order (which is
//! also display order in the selected-items area). The operation functions
//! work over `(ItemStore, Selection, PickerConfig)` and run every constraint
//! check before the first state write, so a rejection leaves the store and the
//! ledger exactly as they were.
//!
//! Selecting deactivates a choice from the candidate pool; removing
//! reactivates it — unless it was created from free-text entry, in which case
//! the record is deleted from the store outright.

mod error;

pub use error::SelectError;

use crate::config::{PickerConfig, SelectMode};
use crate::store::{ChoiceId, ChoiceSpec, ItemStore};
use tracing::debug;

/// Selection result type
pub type Result<T> = std::result::Result<T, SelectError>;

/// Ordered sequence of selected choice ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    order: Vec<ChoiceId>,
}

impl Selection {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in insertion order
    #[must_use]
    pub fn ids(&self) -> &[ChoiceId] {
        &self.order
    }

    /// Number of selected items
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the id is part of the selection
    #[must_use]
    pub fn contains(&self, id: ChoiceId) -> bool {
        self.order.contains(&id)
    }

    /// The most recently selected id
    #[must_use]
    pub fn last(&self) -> Option<ChoiceId> {
        self.order.last().copied()
    }

    fn push(&mut self, id: ChoiceId) {
        self.order.push(id);
    }

    fn remove_id(&mut self, id: ChoiceId) {
        self.order.retain(|&held| held != id);
    }
}

/// What happened to a removed choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub id: ChoiceId,
    /// User-created entries are deleted from the store rather than reactivated
    pub deleted: bool,
}

/// Select a choice by id
///
/// In single-select mode the current selection is replaced as part of the same
/// successful operation.
///
/// # Errors
///
/// `AlreadySelected`, `Disabled` (choice, group, or placeholder),
/// `DuplicateValue` (another selected item carries the same value and
/// duplicates are disallowed), `LimitReached` (multi-select at the bound), or
/// `Store` for unknown ids. All checks precede any mutation.
pub fn select(
    store: &mut ItemStore,
    selection: &mut Selection,
    config: &PickerConfig,
    id: ChoiceId,
) -> Result<()> {
    let choice = store.choice(id)?;
    if choice.selected || selection.contains(id) {
        return Err(SelectError::AlreadySelected(id));
    }
    if choice.disabled || choice.placeholder || store.group_blocked(choice) {
        return Err(SelectError::Disabled(id));
    }
    if !config.duplicate_items_allowed {
        let value = choice.value.clone();
        let duplicate = selection
            .ids()
            .iter()
            .filter_map(|&held| store.choice(held).ok())
            .any(|held| held.value == value);
        if duplicate {
            return Err(SelectError::DuplicateValue { value });
        }
    }
    if config.mode == SelectMode::Multi
        && let Some(limit) = config.max_items()
        && selection.len() >= limit
    {
        return Err(SelectError::LimitReached { limit });
    }

    if config.mode == SelectMode::Single
        && let Some(previous) = selection.last()
    {
        release(store, selection, previous)?;
    }

    store.set_selected(id, true)?;
    store.set_active(id, false)?;
    selection.push(id);
    debug!(%id, selected = selection.len(), "choice selected");
    Ok(())
}

/// Remove a choice from the selection
///
/// Reusable choices return to the candidate pool; user-created entries are
/// deleted from the store entirely. The order of the remaining selection is
/// preserved.
///
/// # Errors
///
/// `NotSelected` when the choice is not currently selected, or `Store` for
/// unknown ids.
pub fn remove(store: &mut ItemStore, selection: &mut Selection, id: ChoiceId) -> Result<Removed> {
    let choice = store.choice(id)?;
    if !choice.selected {
        return Err(SelectError::NotSelected(id));
    }

    let deleted = choice.user_created;
    if deleted {
        store.remove_choice(id)?;
        selection.remove_id(id);
    } else {
        release(store, selection, id)?;
    }
    debug!(%id, deleted, "choice removed from selection");
    Ok(Removed { id, deleted })
}

/// Remove the most recently selected item (backspace semantics)
///
/// An empty selection is a no-op, not an error.
///
/// # Errors
///
/// Propagates [`remove`] failures for the targeted id.
pub fn remove_last(store: &mut ItemStore, selection: &mut Selection) -> Result<Option<Removed>> {
    match selection.last() {
        None => Ok(None),
        Some(id) => remove(store, selection, id).map(Some),
    }
}

/// Remove every selected item, reactivating reusable choices
///
/// # Errors
///
/// Propagates [`remove`] failures; the ledger and store stay consistent for
/// items already processed.
pub fn clear(store: &mut ItemStore, selection: &mut Selection) -> Result<Vec<Removed>> {
    let mut removed = Vec::with_capacity(selection.len());
    while let Some(id) = selection.last() {
        removed.push(remove(store, selection, id)?);
    }
    Ok(removed)
}

/// Create a choice from free-text entry and select it immediately
///
/// The created record is flagged user-created, so removing it later deletes
/// it instead of returning it to the candidate pool.
///
/// # Errors
///
/// `DuplicateValue` when the value already exists in the store and duplicates
/// are disallowed, `LimitReached` before anything is created, or a propagated
/// [`select`] rejection.
pub fn create_and_select(
    store: &mut ItemStore,
    selection: &mut Selection,
    config: &PickerConfig,
    label: impl Into<String>,
    value: impl Into<String>,
) -> Result<ChoiceId> {
    let value = value.into();
    if !config.duplicate_items_allowed && store.has_value(&value) {
        return Err(SelectError::DuplicateValue { value });
    }
    if config.mode == SelectMode::Multi
        && let Some(limit) = config.max_items()
        && selection.len() >= limit
    {
        return Err(SelectError::LimitReached { limit });
    }

    let id = store.add_choice(ChoiceSpec::new(label, value).user_created(true));
    select(store, selection, config, id)?;
    debug!(%id, "user-created choice selected");
    Ok(id)
}

fn release(store: &mut ItemStore, selection: &mut Selection, id: ChoiceId) -> Result<()> {
    store.set_selected(id, false)?;
    store.set_active(id, true)?;
    selection.remove_id(id);
    Ok(())
}
