//! Canonical choice and group records
//!
//! The item store is the single source of truth for everything the engine can
//! display or select. Records are plain data with public fields (direct field
//! access is used for comparisons and filtering); mutation happens through the
//! store so id lookups stay consistent.
//!
//! Ids are assigned from a monotonic counter on insertion and are never
//! reused, so a `ChoiceId` held across renders always refers to the same
//! record. Insertion order is preserved and is the stable default ordering of
//! every downstream list.

mod error;

pub use error::StoreError;

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Store result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a choice record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChoiceId(u64);

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Stable identifier of a group record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A single selectable option record
///
/// Labels are stored raw; whether markup in them may be interpreted is a
/// policy flag carried on the render frame, never evaluated here.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Unique, stable id assigned on insertion
    pub id: ChoiceId,

    /// Display text
    pub label: String,

    /// Raw value used for matching, duplicate checks and form sync
    pub value: String,

    /// Currently part of the selection
    pub selected: bool,

    /// Not selectable (rendered greyed out, skipped by navigation)
    pub disabled: bool,

    /// Part of the candidate pool; selection deactivates, removal reactivates
    pub active: bool,

    /// Owning group, if any
    pub group: Option<GroupId>,

    /// Non-selectable placeholder entry, never indexed or listed
    pub placeholder: bool,

    /// Created from free-text entry; deleted outright on removal
    pub user_created: bool,

    /// Match quality of the last search pass (transient)
    pub score: u32,

    /// Open key/value mapping of host-supplied properties
    pub custom: Map<String, Value>,
}

/// A named collection of choices, collectively disable-able
///
/// Group state is looked up by reference when filtering; it is never copied
/// onto member choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Unique, stable id assigned on insertion
    pub id: GroupId,

    /// Display label
    pub label: String,

    /// Disables all member choices
    pub disabled: bool,

    /// Hidden groups suppress their members from the candidate pool
    pub active: bool,
}

// ============================================================================
// Insertion specs
// ============================================================================

/// Everything needed to insert a choice; the store assigns the id
#[derive(Debug, Clone, Default)]
pub struct ChoiceSpec {
    pub label: String,
    pub value: String,
    pub group: Option<GroupId>,
    pub disabled: bool,
    pub placeholder: bool,
    pub user_created: bool,
    pub custom: Map<String, Value>,
}

impl ChoiceSpec {
    /// Create a spec with the given label and value
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Place the choice under a group
    #[must_use]
    pub const fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Mark the choice disabled
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Mark the choice as a placeholder entry
    #[must_use]
    pub const fn placeholder(mut self, placeholder: bool) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Mark the choice as created from free-text entry
    #[must_use]
    pub const fn user_created(mut self, user_created: bool) -> Self {
        self.user_created = user_created;
        self
    }

    /// Attach custom properties
    #[must_use]
    pub fn with_custom(mut self, custom: Map<String, Value>) -> Self {
        self.custom = custom;
        self
    }
}

/// Everything needed to insert a group; the store assigns the id
#[derive(Debug, Clone, Default)]
pub struct GroupSpec {
    pub label: String,
    pub disabled: bool,
}

impl GroupSpec {
    /// Create a spec with the given label
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark the group disabled
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

// ============================================================================
// Store
// ============================================================================

/// Single source of truth for choice and group records
///
/// All mutations are synchronous and immediately visible to subsequent reads;
/// render batching is the renderer's concern, never the store's.
#[derive(Debug, Default)]
pub struct ItemStore {
    choices: Vec<Choice>,
    groups: Vec<Group>,
    choice_index: HashMap<ChoiceId, usize>,
    group_index: HashMap<GroupId, usize>,
    next_choice: u64,
    next_group: u64,
}

impl ItemStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a choice and return its assigned id
    pub fn add_choice(&mut self, spec: ChoiceSpec) -> ChoiceId {
        let id = ChoiceId(self.next_choice);
        self.next_choice += 1;

        self.choice_index.insert(id, self.choices.len());
        self.choices.push(Choice {
            id,
            label: spec.label,
            value: spec.value,
            selected: false,
            disabled: spec.disabled,
            active: true,
            group: spec.group,
            placeholder: spec.placeholder,
            user_created: spec.user_created,
            score: 0,
            custom: spec.custom,
        });
        id
    }

    /// Insert a group and return its assigned id
    pub fn add_group(&mut self, spec: GroupSpec) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;

        self.group_index.insert(id, self.groups.len());
        self.groups.push(Group {
            id,
            label: spec.label,
            disabled: spec.disabled,
            active: true,
        });
        id
    }

    /// Look up a choice by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ChoiceNotFound` for unknown ids.
    pub fn choice(&self, id: ChoiceId) -> Result<&Choice> {
        self.choice_index
            .get(&id)
            .map(|&pos| &self.choices[pos])
            .ok_or(StoreError::ChoiceNotFound(id))
    }

    /// Look up a group by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError::GroupNotFound` for unknown ids.
    pub fn group(&self, id: GroupId) -> Result<&Group> {
        self.group_index
            .get(&id)
            .map(|&pos| &self.groups[pos])
            .ok_or(StoreError::GroupNotFound(id))
    }

    /// All choices in insertion order
    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// All groups in insertion order
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of choice records
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Whether the store holds no choices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Whether any choice carries the given value
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }

    /// Whether a choice's group blocks it (disabled or hidden group)
    #[must_use]
    pub fn group_blocked(&self, choice: &Choice) -> bool {
        choice
            .group
            .and_then(|gid| self.group(gid).ok())
            .is_some_and(|g| g.disabled || !g.active)
    }

    /// Set a choice's candidate-pool membership
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ChoiceNotFound` for unknown ids.
    pub fn set_active(&mut self, id: ChoiceId, active: bool) -> Result<()> {
        self.choice_mut(id)?.active = active;
        Ok(())
    }

    /// Set a choice's selected flag
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ChoiceNotFound` for unknown ids.
    pub fn set_selected(&mut self, id: ChoiceId, selected: bool) -> Result<()> {
        self.choice_mut(id)?.selected = selected;
        Ok(())
    }

    /// Set a choice's disabled flag
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ChoiceNotFound` for unknown ids.
    pub fn set_disabled(&mut self, id: ChoiceId, disabled: bool) -> Result<()> {
        self.choice_mut(id)?.disabled = disabled;
        Ok(())
    }

    /// Set a group's disabled flag
    ///
    /// # Errors
    ///
    /// Returns `StoreError::GroupNotFound` for unknown ids.
    pub fn set_group_disabled(&mut self, id: GroupId, disabled: bool) -> Result<()> {
        let pos = *self
            .group_index
            .get(&id)
            .ok_or(StoreError::GroupNotFound(id))?;
        self.groups[pos].disabled = disabled;
        Ok(())
    }

    /// Record a choice's match quality from the last search pass
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ChoiceNotFound` for unknown ids.
    pub fn set_score(&mut self, id: ChoiceId, score: u32) -> Result<()> {
        self.choice_mut(id)?.score = score;
        Ok(())
    }

    /// Reset all transient scores to zero
    pub fn clear_scores(&mut self) {
        for choice in &mut self.choices {
            choice.score = 0;
        }
    }

    /// Delete a choice record outright (user-created teardown)
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ChoiceNotFound` for unknown ids.
    pub fn remove_choice(&mut self, id: ChoiceId) -> Result<Choice> {
        let pos = *self
            .choice_index
            .get(&id)
            .ok_or(StoreError::ChoiceNotFound(id))?;
        let removed = self.choices.remove(pos);
        self.choice_index.remove(&id);
        for (shifted, choice) in self.choices.iter().enumerate().skip(pos) {
            self.choice_index.insert(choice.id, shifted);
        }
        Ok(removed)
    }

    /// Delete every choice and group; id counters keep running
    pub fn clear(&mut self) {
        self.choices.clear();
        self.groups.clear();
        self.choice_index.clear();
        self.group_index.clear();
    }

    fn choice_mut(&mut self, id: ChoiceId) -> Result<&mut Choice> {
        let pos = *self
            .choice_index
            .get(&id)
            .ok_or(StoreError::ChoiceNotFound(id))?;
        Ok(&mut self.choices[pos])
    }
}
