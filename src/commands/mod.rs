//! CLI Command handlers
//!
//! Handlers that are more than a single call into [`crate::build`] live here.

pub mod new;
