//! Domain types shared by both index strategies and the replay tool.

pub mod error;
pub mod index_of;
pub mod weight;

pub use error::{AppError, IndexError, InputError, ReplayError, ScriptError};
pub use index_of::IndexOfResult;
pub use weight::{validate_weights, Sum, Weight};
