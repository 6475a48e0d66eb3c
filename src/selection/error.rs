//! Selection rejection taxonomy
//!
//! These are expected rejections of user or caller actions, reported as
//! structured `Err` values. A rejected operation never partially applies:
//! every constraint is checked before the first state write.

use crate::store::{ChoiceId, StoreError};
use thiserror::Error;

/// Rejections from selection operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// The choice is already part of the selection
    #[error("choice {0} is already selected")]
    AlreadySelected(ChoiceId),

    /// The choice is not part of the selection
    #[error("choice {0} is not selected")]
    NotSelected(ChoiceId),

    /// The choice, its group, or a placeholder entry cannot be selected
    #[error("choice {0} is disabled")]
    Disabled(ChoiceId),

    /// The selection is at its configured maximum
    #[error("only {limit} values can be added")]
    LimitReached { limit: usize },

    /// An identical value already exists and duplicates are disallowed
    #[error("a choice with value {value:?} already exists")]
    DuplicateValue { value: String },

    /// Unknown id reference
    #[error(transparent)]
    Store(#[from] StoreError),
}
