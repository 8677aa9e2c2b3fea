//! panelkit Plugin System
//!
//! Widgets expose their operations as pure function plugins. The host
//! looks them up by name in a [`PluginRegistry`] and calls them with
//! [`Value`](panelkit_core::Value) arguments.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, TraceStep};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta,
        PluginRegistry, EvalContext, TraceStep,
    };
    pub use panelkit_core::prelude::*;
}
