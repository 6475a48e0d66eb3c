//! Pickr - a searchable, keyboard-navigable choice engine
//!
//! This library implements the state model behind single- and multi-select
//! widgets: a canonical item store, a deterministic search/filter pipeline,
//! constraint-checked selection, and a highlight state machine for keyboard
//! traversal. Rendering, form element mutation and event wiring stay in the
//! host, talking to the engine through the collaborator traits in
//! [`engine`].

pub mod candidates;
pub mod config;
pub mod engine;
pub mod nav;
pub mod search;
pub mod selection;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use candidates::{CandidateList, EmptyState};
pub use config::{ConfigError, PickerConfig, SearchField, SelectMode};
pub use engine::{
    EngineError, FormSync, LoadOutcome, LoadReport, LoadToken, Picker, RemoteBatch, RenderFrame,
    Renderer,
};
pub use selection::SelectError;
pub use store::{Choice, ChoiceId, ChoiceSpec, Group, GroupId, GroupSpec, ItemStore, StoreError};

use thiserror::Error;

/// Error enum, contains all failure states of the engine
#[derive(Debug, Error)]
pub enum PickrError {
    /// Configuration rejected at construction
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    /// Operation failure or rejection
    #[error("Engine error: {0}")]
    EngineError(#[from] EngineError),
}
