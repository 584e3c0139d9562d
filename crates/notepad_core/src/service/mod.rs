//! Core use-case services.
//!
//! # Responsibility
//! - Offer typed note use-cases on top of the URI-addressed store.
//! - Keep callers away from raw column names and selections.

pub mod note_service;
