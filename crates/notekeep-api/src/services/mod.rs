//! Business logic services used by the HTTP handlers.

pub mod notes_service;

pub use notes_service::NotesService;
