//! Shared test fixtures
//!
//! Builders for the store shapes the unit tests keep reaching for.

use crate::config::PickerConfig;
use crate::engine::Picker;
use crate::store::{ChoiceId, ChoiceSpec};

/// Specs for the classic "Choice 1..n" fixture
#[must_use]
pub fn choice_specs(count: usize) -> Vec<ChoiceSpec> {
    (1..=count)
        .map(|n| ChoiceSpec::new(format!("Choice {n}"), format!("Choice {n}")))
        .collect()
}

/// An engine seeded with "Choice 1..n"
///
/// # Panics
///
/// Panics when the configuration is invalid — fixtures feed valid configs.
#[must_use]
pub fn seeded_picker(config: PickerConfig, count: usize) -> (Picker, Vec<ChoiceId>) {
    let mut picker = Picker::new(config).expect("fixture config must be valid");
    let ids = picker
        .add_choices(choice_specs(count))
        .expect("fixture engine is not loading");
    (picker, ids)
}
