//! Host configuration from the environment

use std::env;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// `tracing` filter directive for stderr logging
    pub log_filter: String,
    /// Attach evaluation traces to `tools/call` results
    pub trace: bool,
}

impl HostConfig {
    /// `PANELKIT_LOG` (falling back to `RUST_LOG`) and `PANELKIT_TRACE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = lookup("PANELKIT_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let trace = lookup("PANELKIT_TRACE")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self { log_filter, trace }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            trace: false,
        }
    }
}
