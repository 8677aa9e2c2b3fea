//! Conversion errors

use panelkit_core::PanelError;
use thiserror::Error;

/// Errors raised by registry lookups and conversions.
///
/// A missing or non-numeric amount is not an error: conversions report it
/// as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("unknown category: {0}")]
    CategoryNotFound(String),

    #[error("unknown unit '{unit}' in category {category}")]
    UnitNotFound { category: String, unit: String },

    #[error("unit '{unit}' belongs to {actual}, not {category}")]
    InvalidUnit {
        category: String,
        unit: String,
        actual: String,
    },

    #[error("{category} units have no scale factor")]
    NoScaleFactor { category: String },
}

impl From<ConvertError> for PanelError {
    fn from(err: ConvertError) -> Self {
        match &err {
            ConvertError::CategoryNotFound(_) => PanelError::not_found(err.to_string())
                .with_suggestion("Call categories() for the available categories"),
            ConvertError::UnitNotFound { category, .. } => PanelError::not_found(err.to_string())
                .with_suggestion(format!("Call units('{}') for the available units", category)),
            ConvertError::InvalidUnit { category, .. } => PanelError::invalid_unit(err.to_string())
                .with_suggestion(format!("Pick a unit from units('{}')", category)),
            ConvertError::NoScaleFactor { .. } => PanelError::domain_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelkit_core::codes;

    #[test]
    fn test_panel_error_codes() {
        let err: PanelError = ConvertError::CategoryNotFound("Speed".into()).into();
        assert_eq!(err.code, codes::NOT_FOUND);
        assert_eq!(err.message, "unknown category: Speed");

        let err: PanelError = ConvertError::InvalidUnit {
            category: "Length".into(),
            unit: "Gram".into(),
            actual: "Weight".into(),
        }
        .into();
        assert_eq!(err.code, codes::INVALID_UNIT);
        assert!(err.suggestion.unwrap().contains("units('Length')"));
    }
}
