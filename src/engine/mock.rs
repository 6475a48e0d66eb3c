//! Mock collaborators for testing
//!
//! Push-based collaborators record what the engine sends them behind a shared
//! handle, so a test can keep a clone for assertions and attach the other.
//! Useful for host integrations as well as this crate's own tests.

use super::{FormSync, RenderFrame, Renderer};
use std::sync::{Arc, Mutex};

/// Renderer that records every frame it receives
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    frames: Arc<Mutex<Vec<RenderFrame>>>,
}

impl MockRenderer {
    /// Create a recording renderer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every frame received so far
    #[must_use]
    pub fn frames(&self) -> Vec<RenderFrame> {
        self.frames.lock().expect("mock renderer poisoned").clone()
    }

    /// The most recent frame
    #[must_use]
    pub fn last(&self) -> Option<RenderFrame> {
        self.frames
            .lock()
            .expect("mock renderer poisoned")
            .last()
            .cloned()
    }

    /// Number of frames received
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.lock().expect("mock renderer poisoned").len()
    }

    /// Whether no frame was received yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Renderer for MockRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames
            .lock()
            .expect("mock renderer poisoned")
            .push(frame.clone());
    }
}

/// Form-sync collaborator that records every value sequence it receives
#[derive(Debug, Clone, Default)]
pub struct MockFormSync {
    payloads: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFormSync {
    /// Create a recording form-sync collaborator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value sequence received so far
    #[must_use]
    pub fn payloads(&self) -> Vec<Vec<String>> {
        self.payloads.lock().expect("mock form sync poisoned").clone()
    }

    /// The most recent value sequence
    #[must_use]
    pub fn last(&self) -> Option<Vec<String>> {
        self.payloads
            .lock()
            .expect("mock form sync poisoned")
            .last()
            .cloned()
    }
}

impl FormSync for MockFormSync {
    fn values_changed(&mut self, values: &[String]) {
        self.payloads
            .lock()
            .expect("mock form sync poisoned")
            .push(values.to_vec());
    }
}
