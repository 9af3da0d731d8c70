//! Core types shared across rbuild: the error taxonomy and its user-facing
//! rendering.

pub mod error;

pub use error::{ErrorContext, RbuildError, user_friendly_error};
