//! Evaluation Context

use panelkit_core::Value;
use crate::PluginRegistry;
use std::sync::Arc;

/// Evaluation context passed to plugins
pub struct EvalContext {
    pub registry: Arc<PluginRegistry>,
    pub tracing: bool,
    pub trace: Vec<TraceStep>,
}

/// Single step in evaluation trace
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub function: String,
    pub args: Vec<Value>,
    pub result: Value,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            tracing: false,
            trace: Vec::new(),
        }
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    /// Call a registered function, recording the step when tracing is on
    pub fn call(&mut self, name: &str, args: &[Value]) -> Value {
        let registry = Arc::clone(&self.registry);
        let result = registry.call_function(name, args, self);
        self.record_trace(name.to_string(), args.to_vec(), result.clone());
        result
    }

    pub fn record_trace(&mut self, function: String, args: Vec<Value>, result: Value) {
        if self.tracing {
            self.trace.push(TraceStep { function, args, result });
        }
    }

    /// Drain recorded steps
    pub fn take_trace(&mut self) -> Vec<TraceStep> {
        std::mem::take(&mut self.trace)
    }
}
