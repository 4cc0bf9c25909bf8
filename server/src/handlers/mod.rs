//! Request handlers for document operations.

mod fetch;
mod replace;

pub use fetch::*;
pub use replace::*;
