//! panelkit Core - Fundamental types
//!
//! This crate provides the core types shared by every widget crate:
//! - `Value`: Runtime values (numbers, text, lists, objects, errors)
//! - `PanelError`: Structured errors returned to the panel

mod value;
mod error;

pub use value::Value;
pub use error::{PanelError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, PanelError};
    pub use crate::error::codes;
}
