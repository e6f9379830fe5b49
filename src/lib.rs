//! Quizdesk - Telegram admin bot for authoring quiz content
//!
//! This library provides the full authoring path: a guided conversation
//! that collects subjects, topics, questions, notes, articles, banners and
//! the "latest update" notice from a single admin and persists them to a
//! Firestore-style document store and a blob store.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `store`: document/blob store traits and gateways
//! - `content`: record shapes, the bulk line parser, import reporting
//! - `telegram`: conversation states, dispatcher schema, flow handlers

pub mod cli;
pub mod content;
pub mod core;
pub mod store;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use telegram::{schema, show_main_menu, HandlerDeps};
