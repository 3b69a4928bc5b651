//! # notekeep-core
//!
//! Core types, traits, and validation for the notekeep service.
//!
//! This crate provides the note data model, the [`NoteStore`] persistence
//! contract that backends implement, write validation, and the shared error
//! taxonomy.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
pub use validation::{validate_draft, validate_patch};
