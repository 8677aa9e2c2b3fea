//! Converter widget form state
//!
//! Mirrors the four inputs the panel collects, for unit and currency
//! converters alike. Every setter validates
//! against the registry, so `result()` only fails if the registry itself
//! changes shape, which it never does at runtime.

use serde::Serialize;
use crate::ConvertError;
use crate::registry::{Category, UNITS};

/// Default amount shown when the widget opens
const DEFAULT_AMOUNT: &str = "1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConverterForm {
    category: String,
    amount: String,
    from: String,
    to: String,
}

impl ConverterForm {
    /// Open the form on a category with its first two units selected
    pub fn new(category: &str) -> Result<Self, ConvertError> {
        let (category, from, to) = Self::defaults_for(category)?;
        Ok(Self {
            category,
            amount: DEFAULT_AMOUNT.to_string(),
            from,
            to,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Switch category; both unit selections reset. The amount text stays.
    pub fn set_category(&mut self, category: &str) -> Result<(), ConvertError> {
        let (category, from, to) = Self::defaults_for(category)?;
        self.category = category;
        self.from = from;
        self.to = to;
        Ok(())
    }

    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.amount = text.into();
    }

    pub fn set_from(&mut self, unit: &str) -> Result<(), ConvertError> {
        self.from = UNITS.unit(&self.category, unit)?.name.to_string();
        Ok(())
    }

    pub fn set_to(&mut self, unit: &str) -> Result<(), ConvertError> {
        self.to = UNITS.unit(&self.category, unit)?.name.to_string();
        Ok(())
    }

    /// Exchange source and target units
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Converted value, `None` while the amount field has no number
    pub fn value(&self) -> Result<Option<f64>, ConvertError> {
        UNITS.convert_input(&self.category, &self.amount, &self.from, &self.to)
    }

    /// Display string for the result field
    pub fn result(&self) -> Result<Option<String>, ConvertError> {
        let cat = self.current_category()?;
        Ok(self.value()?.map(|v| cat.format_value(v)))
    }

    /// One-line summary under the result, e.g. `1 mi = 1.60934 km`.
    /// Currencies are labelled by code: `1 USD = 0.85 EUR`.
    pub fn summary(&self) -> Result<Option<String>, ConvertError> {
        let cat = self.current_category()?;
        let Some(result) = self.result()? else {
            return Ok(None);
        };
        let (from, to) = if cat.is_rate() {
            (self.from.clone(), self.to.clone())
        } else {
            let from = UNITS.unit(cat.name, &self.from)?.symbol;
            let to = UNITS.unit(cat.name, &self.to)?.symbol;
            (from.to_string(), to.to_string())
        };
        Ok(Some(format!("{} {} = {} {}", self.amount.trim(), from, result, to)))
    }

    /// Exchange rate line for currencies (`1 USD = 0.85 EUR`); `None` for
    /// other categories.
    pub fn rate_summary(&self) -> Result<Option<String>, ConvertError> {
        let cat = self.current_category()?;
        if !cat.is_rate() {
            return Ok(None);
        }
        let rate = UNITS.convert(cat.name, 1.0, &self.from, &self.to)?;
        Ok(rate.map(|r| format!("1 {} = {} {}", self.from, cat.format_value(r), self.to)))
    }

    fn current_category(&self) -> Result<&'static Category, ConvertError> {
        UNITS.category(&self.category)
    }

    fn defaults_for(category: &str) -> Result<(String, String, String), ConvertError> {
        let cat = UNITS.category(category)?;
        let units = cat.units();
        let from = units.first().map(|u| u.name).unwrap_or(cat.base_unit);
        let to = units.get(1).map(|u| u.name).unwrap_or(from);
        Ok((cat.name.to_string(), from.to_string(), to.to_string()))
    }
}
