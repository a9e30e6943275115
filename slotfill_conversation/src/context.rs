//! Per-conversation state carried between turns.

use chrono::{DateTime, Utc};
use slotfill_core::{SlotContext, SlotStorage};
use uuid::Uuid;

use crate::form::FormStorage;
use crate::script::{NodeLabel, Response};

/// State of one conversation.
///
/// Slot and form storages stay `None` until the matching context-init hook
/// has been registered on the actor and has run.
#[derive(Debug, Clone)]
pub struct Context {
    pub id: Uuid,
    pub requests: Vec<String>,
    pub responses: Vec<String>,
    pub labels: Vec<NodeLabel>,
    slot_storage: Option<SlotStorage>,
    form_storage: Option<FormStorage>,
    pending_response: Option<Response>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            requests: Vec::new(),
            responses: Vec::new(),
            labels: Vec::new(),
            slot_storage: None,
            form_storage: None,
            pending_response: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn add_request(&mut self, request: impl Into<String>) {
        self.requests.push(request.into());
        self.updated_at = Utc::now();
    }

    pub fn add_response(&mut self, response: impl Into<String>) {
        self.responses.push(response.into());
        self.updated_at = Utc::now();
    }

    pub fn add_label(&mut self, label: NodeLabel) {
        self.labels.push(label);
    }

    #[must_use]
    pub fn last_label(&self) -> Option<&NodeLabel> {
        self.labels.last()
    }

    #[must_use]
    pub fn last_response(&self) -> Option<&str> {
        self.responses.last().map(String::as_str)
    }

    /// Number of completed turns.
    #[must_use]
    pub const fn turn_count(&self) -> usize {
        self.responses.len()
    }

    /// Create an empty slot storage unless one exists.
    pub fn init_slot_storage(&mut self) {
        self.slot_storage.get_or_insert_with(SlotStorage::new);
    }

    /// Create an empty form storage unless one exists.
    pub fn init_form_storage(&mut self) {
        self.form_storage.get_or_insert_with(FormStorage::new);
    }

    #[must_use]
    pub const fn form_storage(&self) -> Option<&FormStorage> {
        self.form_storage.as_ref()
    }

    pub const fn form_storage_mut(&mut self) -> Option<&mut FormStorage> {
        self.form_storage.as_mut()
    }

    /// Response of the node being answered, before it is rendered.
    #[must_use]
    pub const fn pending_response(&self) -> Option<&Response> {
        self.pending_response.as_ref()
    }

    pub const fn pending_response_mut(&mut self) -> Option<&mut Response> {
        self.pending_response.as_mut()
    }

    pub(crate) fn set_pending_response(&mut self, response: Option<Response>) {
        self.pending_response = response;
    }

    pub(crate) const fn take_pending_response(&mut self) -> Option<Response> {
        self.pending_response.take()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotContext for Context {
    fn last_request(&self) -> Option<&str> {
        self.requests.last().map(String::as_str)
    }

    fn slot_storage(&self) -> Option<&SlotStorage> {
        self.slot_storage.as_ref()
    }

    fn slot_storage_mut(&mut self) -> Option<&mut SlotStorage> {
        self.slot_storage.as_mut()
    }
}
