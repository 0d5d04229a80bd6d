//! Single-slot record of the most recent upload interaction.
//!
//! The sequencer writes it, the voice agent reads it. Both run on the UI
//! thread, so a plain `Rc<RefCell<_>>` is enough.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

pub const SKIP_REASON: &str = "user moved on without a successful upload";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSnapshot {
    pub document_type: String,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InteractionSnapshot {
    pub fn accepted(document_type: &str, reason: &str) -> Self {
        Self {
            document_type: document_type.to_string(),
            skipped: false,
            accepted: Some(true),
            reason: Some(reason.to_string()),
        }
    }

    pub fn skipped(document_type: &str) -> Self {
        Self {
            document_type: document_type.to_string(),
            skipped: true,
            accepted: None,
            reason: Some(SKIP_REASON.to_string()),
        }
    }
}

/// Cloneable handle; every clone shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    slot: Rc<RefCell<Option<InteractionSnapshot>>>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<InteractionSnapshot> {
        self.slot.borrow().clone()
    }

    /// Replaces whatever was there before.
    pub fn set(&self, snapshot: Option<InteractionSnapshot>) {
        *self.slot.borrow_mut() = snapshot;
    }
}
