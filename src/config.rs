//! Engine configuration surface
//!
//! A `PickerConfig` is handed to [`crate::engine::Picker::new`] once and is
//! immutable for the lifetime of the instance. The struct is serde-derived so
//! hosts can deserialize it straight from their own TOML/JSON settings.
//!
//! Validation happens at construction: an engine is never built from a
//! configuration that names no searchable fields or a blank custom field path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors rejected before the engine becomes operative
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No searchable fields were configured
    #[error("search_fields must name at least one field")]
    NoSearchFields,

    /// A custom search field was declared with an empty path
    #[error("custom search field path must not be blank")]
    BlankCustomField,
}

/// Whether the widget holds one value or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectMode {
    /// One selected item at a time; selecting replaces the current item
    Single,

    /// Any number of selected items, bounded only by `max_item_count`
    #[default]
    Multi,
}

/// A field the search index reads from each choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// The display label
    Label,

    /// The raw (pre prepend/append) value
    Value,

    /// A custom property by key; an absent key folds to the empty string
    Custom(String),
}

/// Configuration for a single engine instance
///
/// Field semantics follow the widget surface: counts and limits of zero (or
/// `None`) mean "unbounded", and `allow_html` defaults to `false` so labels
/// are escaped by the renderer unless the host opts in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Single- or multi-select behaviour
    pub mode: SelectMode,

    /// Maximum number of selected items (`None` or `Some(0)` = unlimited)
    pub max_item_count: Option<usize>,

    /// Allow free-text creation of new choices
    pub add_items: bool,

    /// Selected items carry a remove affordance
    pub remove_item_button: bool,

    /// Minimum query length (chars, after trimming) before filtering activates
    pub search_floor: usize,

    /// Maximum number of rendered candidates (`None` or `Some(0)` = unlimited)
    pub render_choice_limit: Option<usize>,

    /// Fields the search index matches against, in priority order
    pub search_fields: Vec<SearchField>,

    /// Whether the renderer may interpret label markup (policy flag only)
    pub allow_html: bool,

    /// Prefix composed onto synchronized values (never onto labels)
    pub prepend_value: Option<String>,

    /// Suffix composed onto synchronized values (never onto labels)
    pub append_value: Option<String>,

    /// Permit selecting/creating items whose value already exists
    pub duplicate_items_allowed: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            mode: SelectMode::Multi,
            max_item_count: None,
            add_items: true,
            remove_item_button: false,
            search_floor: 1,
            render_choice_limit: None,
            search_fields: vec![SearchField::Label, SearchField::Value],
            allow_html: false,
            prepend_value: None,
            append_value: None,
            duplicate_items_allowed: true,
        }
    }
}

impl PickerConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to single-select behaviour
    #[must_use]
    pub fn single(mut self) -> Self {
        self.mode = SelectMode::Single;
        self
    }

    /// Bound the selection to `max` items
    #[must_use]
    pub const fn with_max_items(mut self, max: usize) -> Self {
        self.max_item_count = Some(max);
        self
    }

    /// Set the minimum query length before filtering activates
    #[must_use]
    pub const fn with_search_floor(mut self, floor: usize) -> Self {
        self.search_floor = floor;
        self
    }

    /// Cap the number of rendered candidates
    #[must_use]
    pub const fn with_render_limit(mut self, limit: usize) -> Self {
        self.render_choice_limit = Some(limit);
        self
    }

    /// Replace the searchable field list
    #[must_use]
    pub fn with_search_fields(mut self, fields: Vec<SearchField>) -> Self {
        self.search_fields = fields;
        self
    }

    /// Set the value prefix/suffix used for form synchronization
    #[must_use]
    pub fn with_affixes(
        mut self,
        prepend: impl Into<String>,
        append: impl Into<String>,
    ) -> Self {
        self.prepend_value = Some(prepend.into());
        self.append_value = Some(append.into());
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when no searchable fields are configured or a
    /// custom field path is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_fields.is_empty() {
            return Err(ConfigError::NoSearchFields);
        }
        for field in &self.search_fields {
            if let SearchField::Custom(path) = field
                && path.trim().is_empty()
            {
                return Err(ConfigError::BlankCustomField);
            }
        }
        Ok(())
    }

    /// Effective selection bound (`None` = unlimited)
    #[must_use]
    pub fn max_items(&self) -> Option<usize> {
        self.max_item_count.filter(|&n| n > 0)
    }

    /// Effective render cap (`None` = unlimited)
    #[must_use]
    pub fn render_limit(&self) -> Option<usize> {
        self.render_choice_limit.filter(|&n| n > 0)
    }

    /// Compose the value synchronized to the form element
    ///
    /// Prepend/append apply only here; displayed labels are never decorated.
    #[must_use]
    pub fn compose_value(&self, raw: &str) -> String {
        let prepend = self.prepend_value.as_deref().unwrap_or("");
        let append = self.append_value.as_deref().unwrap_or("");
        if prepend.is_empty() && append.is_empty() {
            raw.to_string()
        } else {
            format!("{prepend}{raw}{append}")
        }
    }
}
