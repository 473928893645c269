//! Review model, validation, and the input form.
mod form;
mod types;
mod validate;

pub use form::{ReviewForm, DEFAULT_MAX_REVIEW_CHARS};
pub use types::*;
pub use validate::{validate, ValidationError};
