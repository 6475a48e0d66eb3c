//! Store-specific error types
//!
//! Unknown-id references are integration errors: they are surfaced to the
//! caller and never corrupt the store.

use super::{ChoiceId, GroupId};
use thiserror::Error;

/// Item store errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No choice exists with the given id
    #[error("no choice with id {0}")]
    ChoiceNotFound(ChoiceId),

    /// No group exists with the given id
    #[error("no group with id {0}")]
    GroupNotFound(GroupId),
}
