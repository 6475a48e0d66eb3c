//! Engine facade and collaborator interfaces
//!
//! A [`Picker`] owns one state tree — store, search index, selection ledger,
//! highlight — and exposes the operation surface external collaborators call
//! into. Every successful mutation recomputes the candidate list, re-anchors
//! the highlight, and pushes a fresh [`RenderFrame`] to attached renderers;
//! selection changes additionally push the composed value sequence to form
//! sync collaborators.
//!
//! All operations run synchronously to completion. The only asynchrony lives
//! outside: a remote load holds a blocking flag between [`Picker::begin_load`]
//! and [`Picker::complete_load`], during which interacting operations reject
//! with [`EngineError::Busy`] and stale responses are dropped by generation
//! token.

pub mod mock;
mod remote;

pub use remote::{LoadOutcome, LoadReport, LoadToken, RemoteBatch};

use crate::candidates::{self, CandidateList, EmptyState};
use crate::config::{ConfigError, PickerConfig};
use crate::nav::Highlight;
use crate::search::{SearchIndex, SearchState};
use crate::selection::{self, SelectError, Selection};
use crate::store::{ChoiceId, ChoiceSpec, GroupId, GroupSpec, ItemStore, StoreError};
use thiserror::Error;
use tracing::debug;

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures and rejections surfaced by engine operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A remote data load is in flight; retry after it completes
    #[error("a remote data load is in flight")]
    Busy,

    /// The widget is disabled
    #[error("the widget is disabled")]
    Disabled,

    /// A selection rejection
    #[error(transparent)]
    Selection(#[from] SelectError),

    /// An unknown id reference
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// Collaborator interfaces
// ============================================================================

/// Consumes a frame after every recomputation
///
/// Renderers must not mutate engine state directly — only through the
/// documented operations.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

/// Receives the ordered, composed value sequence on every selection change
///
/// Responsible for reflecting the values into the native form element.
pub trait FormSync {
    fn values_changed(&mut self, values: &[String]);
}

/// Everything a renderer needs to redraw the widget
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Candidates in display order
    pub candidates: Vec<CandidateView>,

    /// Groups still owning at least one listed candidate
    pub groups: Vec<GroupView>,

    /// Selected items in selection order
    pub selected: Vec<SelectedView>,

    /// The candidate targeted for keyboard-driven selection
    pub highlighted: Option<ChoiceId>,

    /// At most one empty-state signal
    pub empty_state: Option<EmptyState>,

    /// A remote load is in flight; the dropdown must not open
    pub loading: bool,

    /// Widget-level enablement
    pub enabled: bool,

    /// Whether label markup may be interpreted; labels are raw either way
    pub allow_html: bool,
}

/// One dropdown row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateView {
    pub id: ChoiceId,
    pub label: String,
    pub value: String,
    pub group: Option<GroupId>,
    pub disabled: bool,
    pub highlighted: bool,
    pub score: u32,
}

/// One group header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: GroupId,
    pub label: String,
}

/// One selected item; `value` is raw (composition happens only for form sync)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedView {
    pub id: ChoiceId,
    pub label: String,
    pub value: String,
    pub removable: bool,
}

// ============================================================================
// Engine
// ============================================================================

/// The choice engine: one owned state tree per widget instance
pub struct Picker {
    config: PickerConfig,
    store: ItemStore,
    index: SearchIndex,
    search: SearchState,
    selection: Selection,
    candidates: CandidateList,
    highlight: Highlight,
    enabled: bool,
    loading: bool,
    load_generation: u64,
    renderers: Vec<Box<dyn Renderer>>,
    form_syncs: Vec<Box<dyn FormSync>>,
}

impl Picker {
    /// Build an engine from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration is rejected; the engine
    /// never becomes operative with an invalid configuration.
    pub fn new(config: PickerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let index = SearchIndex::new(&config.search_fields);
        let mut picker = Self {
            config,
            store: ItemStore::new(),
            index,
            search: SearchState::new(),
            selection: Selection::new(),
            candidates: CandidateList::default(),
            highlight: Highlight::new(),
            enabled: true,
            loading: false,
            load_generation: 0,
            renderers: Vec::new(),
            form_syncs: Vec::new(),
        };
        picker.candidates = candidates::build(
            &picker.store,
            &picker.search,
            0,
            &picker.config,
            false,
        );
        Ok(picker)
    }

    // ------------------------------------------------------------------
    // Collaborators
    // ------------------------------------------------------------------

    /// Attach a renderer; it immediately receives the current frame
    pub fn attach_renderer(&mut self, renderer: impl Renderer + 'static) {
        let mut renderer = Box::new(renderer);
        renderer.render(&self.frame());
        self.renderers.push(renderer);
    }

    /// Attach a form-sync collaborator; it immediately receives current values
    pub fn attach_form_sync(&mut self, sync: impl FormSync + 'static) {
        let mut sync = Box::new(sync);
        sync.values_changed(&self.selected_values());
        self.form_syncs.push(sync);
    }

    // ------------------------------------------------------------------
    // Data setup (programmatic; guarded only against in-flight loads)
    // ------------------------------------------------------------------

    /// Append a choice to the store and index it
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight.
    pub fn add_choice(&mut self, spec: ChoiceSpec) -> Result<ChoiceId> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        let id = self.insert_choice(spec);
        self.recompute(false);
        Ok(id)
    }

    /// Append several choices with a single recomputation
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight.
    pub fn add_choices<I>(&mut self, specs: I) -> Result<Vec<ChoiceId>>
    where
        I: IntoIterator<Item = ChoiceSpec>,
    {
        if self.loading {
            return Err(EngineError::Busy);
        }
        let ids = specs.into_iter().map(|spec| self.insert_choice(spec)).collect();
        self.recompute(false);
        Ok(ids)
    }

    /// Append a group
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight.
    pub fn add_group(&mut self, spec: GroupSpec) -> Result<GroupId> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        let id = self.store.add_group(spec);
        self.recompute(false);
        Ok(id)
    }

    /// Hide or reinstate a choice in the candidate pool
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight; `Store` for unknown ids.
    pub fn set_choice_active(&mut self, id: ChoiceId, active: bool) -> Result<()> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        self.store.set_active(id, active)?;
        self.recompute(false);
        Ok(())
    }

    /// Disable or re-enable a single choice
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight; `Store` for unknown ids.
    pub fn set_choice_disabled(&mut self, id: ChoiceId, disabled: bool) -> Result<()> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        self.store.set_disabled(id, disabled)?;
        self.recompute(false);
        Ok(())
    }

    /// Disable or re-enable a whole group
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight; `Store` for unknown ids.
    pub fn set_group_disabled(&mut self, id: GroupId, disabled: bool) -> Result<()> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        self.store.set_group_disabled(id, disabled)?;
        self.recompute(false);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Widget-level enablement
    // ------------------------------------------------------------------

    /// Allow user interaction
    pub fn enable(&mut self) {
        self.enabled = true;
        self.notify_render();
    }

    /// Block user interaction; mutating operations reject `Disabled`
    pub fn disable(&mut self) {
        self.enabled = false;
        self.notify_render();
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    /// Replace the query string and recompute the candidate list
    ///
    /// Queries below the search floor leave the list unfiltered; a blank query
    /// is "no filter", never an error.
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight; `Disabled` while the widget is
    /// disabled.
    pub fn set_query(&mut self, query: impl Into<String>) -> Result<()> {
        self.guard_interaction()?;
        self.search.set_query(query);
        self.recompute(false);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Open the dropdown: highlight the first enterable candidate
    ///
    /// Inert while the widget is disabled (the dropdown does not open).
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight.
    pub fn open(&mut self) -> Result<Option<ChoiceId>> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        if !self.enabled {
            return Ok(None);
        }
        let id = self.highlight.open(&self.candidates);
        self.notify_render();
        Ok(id)
    }

    /// Close the dropdown: drop the highlight
    pub fn close(&mut self) {
        self.highlight.clear();
        self.notify_render();
    }

    /// Move the highlight down; a no-op at the last enterable candidate
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight.
    pub fn next(&mut self) -> Result<Option<ChoiceId>> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        if !self.enabled {
            return Ok(self.highlight.current());
        }
        let id = self.highlight.next(&self.candidates);
        self.notify_render();
        Ok(id)
    }

    /// Move the highlight up; a no-op at the first enterable candidate
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight.
    pub fn previous(&mut self) -> Result<Option<ChoiceId>> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        if !self.enabled {
            return Ok(self.highlight.current());
        }
        let id = self.highlight.previous(&self.candidates);
        self.notify_render();
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a choice by id
    ///
    /// # Errors
    ///
    /// `Busy`, `Disabled` (widget level), or a [`SelectError`] rejection; a
    /// rejection leaves all state unchanged.
    pub fn select(&mut self, id: ChoiceId) -> Result<()> {
        self.guard_interaction()?;
        selection::select(&mut self.store, &mut self.selection, &self.config, id)?;
        self.recompute(true);
        Ok(())
    }

    /// Select whatever is currently highlighted
    ///
    /// Returns `Ok(None)` when nothing is highlighted.
    ///
    /// # Errors
    ///
    /// As [`Picker::select`].
    pub fn select_highlighted(&mut self) -> Result<Option<ChoiceId>> {
        self.guard_interaction()?;
        match self.highlight.current() {
            None => Ok(None),
            Some(id) => {
                selection::select(&mut self.store, &mut self.selection, &self.config, id)?;
                self.recompute(true);
                Ok(Some(id))
            }
        }
    }

    /// Select the first not-yet-selected choice carrying the given value
    ///
    /// This is the programmatic path (host form logic); it bypasses the
    /// widget-level disabled flag. Returns `Ok(None)` when no choice matches.
    ///
    /// # Errors
    ///
    /// `Busy` while a remote load is in flight, or a [`SelectError`]
    /// rejection for the matched choice.
    pub fn select_by_value(&mut self, value: &str) -> Result<Option<ChoiceId>> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        let Some(id) = self
            .store
            .choices()
            .iter()
            .find(|c| !c.selected && c.value == value)
            .map(|c| c.id)
        else {
            return Ok(None);
        };
        selection::select(&mut self.store, &mut self.selection, &self.config, id)?;
        self.recompute(true);
        Ok(Some(id))
    }

    /// Remove a selected item
    ///
    /// # Errors
    ///
    /// `Busy`, `Disabled`, or a [`SelectError`] rejection.
    pub fn remove(&mut self, id: ChoiceId) -> Result<()> {
        self.guard_interaction()?;
        let removed = selection::remove(&mut self.store, &mut self.selection, id)?;
        if removed.deleted {
            self.index.remove(removed.id);
        }
        self.recompute(true);
        Ok(())
    }

    /// Remove the most recently selected item (backspace semantics)
    ///
    /// An empty selection is a no-op returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `Busy`, `Disabled`, or a [`SelectError`] rejection.
    pub fn remove_last(&mut self) -> Result<Option<ChoiceId>> {
        self.guard_interaction()?;
        match selection::remove_last(&mut self.store, &mut self.selection)? {
            None => Ok(None),
            Some(removed) => {
                if removed.deleted {
                    self.index.remove(removed.id);
                }
                self.recompute(true);
                Ok(Some(removed.id))
            }
        }
    }

    /// Remove every selected item
    ///
    /// Returns how many items were removed.
    ///
    /// # Errors
    ///
    /// `Busy`, `Disabled`, or a [`SelectError`] rejection.
    pub fn clear_selection(&mut self) -> Result<usize> {
        self.guard_interaction()?;
        let removed = selection::clear(&mut self.store, &mut self.selection)?;
        if removed.is_empty() {
            return Ok(0);
        }
        for item in &removed {
            if item.deleted {
                self.index.remove(item.id);
            }
        }
        self.recompute(true);
        Ok(removed.len())
    }

    /// Create a choice from free-text entry and select it
    ///
    /// # Errors
    ///
    /// `Busy`, `Disabled` (widget disabled *or* free-text creation is off), or
    /// a [`SelectError`] rejection.
    pub fn create_and_select(
        &mut self,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<ChoiceId> {
        self.guard_interaction()?;
        if !self.config.add_items {
            return Err(EngineError::Disabled);
        }
        let id = selection::create_and_select(
            &mut self.store,
            &mut self.selection,
            &self.config,
            label,
            value,
        )?;
        self.index.insert(self.store.choice(id)?);
        self.recompute(true);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Remote data
    // ------------------------------------------------------------------

    /// Enter the loading state and hand out a generation token
    ///
    /// Candidates are forced empty and interacting operations reject `Busy`
    /// until [`Picker::complete_load`] resolves with this token. Calling this
    /// again supersedes the pending request: the old token goes stale.
    pub fn begin_load(&mut self) -> LoadToken {
        self.load_generation += 1;
        self.loading = true;
        debug!(generation = self.load_generation, "remote load started");
        self.recompute(false);
        LoadToken {
            generation: self.load_generation,
        }
    }

    /// Apply a remote batch, unless a newer request superseded it
    ///
    /// Stale responses are dropped by generation token, not applied. Applied
    /// batches are appended to the store and indexed incrementally (only the
    /// new entries) before the loading flag clears.
    pub fn complete_load(&mut self, token: LoadToken, batch: &RemoteBatch) -> LoadOutcome {
        if !self.loading || token.generation != self.load_generation {
            debug!(generation = token.generation, "stale remote load dropped");
            return LoadOutcome::Stale;
        }

        let (specs, skipped) = remote::map_records(batch);
        let added = specs.len();
        for spec in specs {
            self.insert_choice(spec);
        }
        self.loading = false;
        debug!(added, skipped, "remote load applied");
        self.recompute(false);
        LoadOutcome::Applied(LoadReport { added, skipped })
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Destroy every choice, group and selection; cancel any pending load
    pub fn clear_store(&mut self) {
        let had_selection = !self.selection.is_empty();
        self.store.clear();
        self.index.clear();
        self.selection = Selection::new();
        self.search.clear();
        self.highlight.clear();
        self.loading = false;
        self.load_generation += 1;
        self.recompute(had_selection);
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Build the frame a renderer would receive right now
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        let candidates = self
            .candidates
            .entries()
            .iter()
            .filter_map(|entry| {
                let choice = self.store.choice(entry.id).ok()?;
                Some(CandidateView {
                    id: entry.id,
                    label: choice.label.clone(),
                    value: choice.value.clone(),
                    group: entry.group,
                    disabled: entry.disabled,
                    highlighted: self.highlight.current() == Some(entry.id),
                    score: entry.score,
                })
            })
            .collect();

        let groups = self
            .candidates
            .groups()
            .iter()
            .filter_map(|&gid| self.store.group(gid).ok())
            .map(|group| GroupView {
                id: group.id,
                label: group.label.clone(),
            })
            .collect();

        let selected = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.store.choice(id).ok())
            .map(|choice| SelectedView {
                id: choice.id,
                label: choice.label.clone(),
                value: choice.value.clone(),
                removable: self.config.remove_item_button,
            })
            .collect();

        RenderFrame {
            candidates,
            groups,
            selected,
            highlighted: self.highlight.current(),
            empty_state: self.candidates.empty_state().cloned(),
            loading: self.loading,
            enabled: self.enabled,
            allow_html: self.config.allow_html,
        }
    }

    /// The composed value sequence delivered to form sync
    #[must_use]
    pub fn selected_values(&self) -> Vec<String> {
        self.selection
            .ids()
            .iter()
            .filter_map(|&id| self.store.choice(id).ok())
            .map(|choice| self.config.compose_value(&choice.value))
            .collect()
    }

    /// The raw query as typed
    #[must_use]
    pub fn query(&self) -> &str {
        self.search.query()
    }

    /// Whether a remote load is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether user interaction is allowed
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current candidate list
    #[must_use]
    pub const fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// The highlighted candidate, if any
    #[must_use]
    pub const fn highlighted(&self) -> Option<ChoiceId> {
        self.highlight.current()
    }

    /// Selected ids in selection order
    #[must_use]
    pub fn selected_ids(&self) -> &[ChoiceId] {
        self.selection.ids()
    }

    /// The canonical record store
    #[must_use]
    pub const fn store(&self) -> &ItemStore {
        &self.store
    }

    /// The configuration this engine was built with
    #[must_use]
    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn guard_interaction(&self) -> Result<()> {
        if self.loading {
            return Err(EngineError::Busy);
        }
        if !self.enabled {
            return Err(EngineError::Disabled);
        }
        Ok(())
    }

    fn insert_choice(&mut self, spec: ChoiceSpec) -> ChoiceId {
        let id = self.store.add_choice(spec);
        if let Ok(choice) = self.store.choice(id) {
            self.index.insert(choice);
        }
        id
    }

    fn run_search_pass(&mut self) {
        self.store.clear_scores();
        let results = match self.search.active_query(self.config.search_floor) {
            Some(query) if !self.loading => self.index.search(&self.store, query),
            _ => Vec::new(),
        };
        for scored in &results {
            let _ = self.store.set_score(scored.id, scored.score);
        }
        self.search.results = results;
    }

    fn recompute(&mut self, selection_changed: bool) {
        self.run_search_pass();
        self.candidates = candidates::build(
            &self.store,
            &self.search,
            self.selection.len(),
            &self.config,
            self.loading,
        );
        self.highlight.reanchor(&self.candidates);
        self.notify_render();
        if selection_changed {
            self.notify_form_sync();
        }
    }

    fn notify_render(&mut self) {
        if self.renderers.is_empty() {
            return;
        }
        let frame = self.frame();
        for renderer in &mut self.renderers {
            renderer.render(&frame);
        }
    }

    fn notify_form_sync(&mut self) {
        if self.form_syncs.is_empty() {
            return;
        }
        let values = self.selected_values();
        for sync in &mut self.form_syncs {
            sync.values_changed(&values);
        }
    }
}
