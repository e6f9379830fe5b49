//! Handler types and dependencies

use std::sync::Arc;

use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::store::{BlobStore, DocumentStore};
use super::state::State;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for handlers
pub type HandlerResult = Result<(), HandlerError>;

/// Per-chat conversation handle. The stored `State` is replaced wholesale
/// on every transition and removed on cancellation.
pub type AdminDialogue = Dialogue<State, InMemStorage<State>>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl HandlerDeps {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }
}
