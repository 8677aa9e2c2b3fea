//! Conversion engine

use tracing::debug;
use crate::ConvertError;
use crate::parse::parse_amount;
use crate::registry::{Category, ConversionRule, UnitRegistry, UNITS};

impl UnitRegistry {
    /// Convert `amount` between two units of one category.
    ///
    /// Returns `Ok(None)` when there is nothing to display: the amount is
    /// not finite (or not positive, for currencies), or the result
    /// overflowed. Unit names are validated first.
    pub fn convert(&self, category: &str, amount: f64, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
        let cat = self.category(category)?;
        let result = match cat.rule {
            ConversionRule::LinearFactor(_) => self.convert_linear(cat, amount, from, to)?,
            ConversionRule::Temperature(_) => self.convert_temperature(cat, amount, from, to)?,
            ConversionRule::Rate(_) => self.convert_rate(cat, amount, from, to)?,
        };

        debug!(category = cat.name, amount, from, to, result = ?result, "converted");
        Ok(result)
    }

    /// Parse free-text input leniently, then convert
    pub fn convert_input(&self, category: &str, input: &str, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
        let amount = parse_amount(input).unwrap_or(f64::NAN);
        self.convert(category, amount, from, to)
    }

    fn convert_linear(&self, cat: &Category, amount: f64, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
        let from_unit = cat.linear_unit(from).ok_or_else(|| self.missing_unit(cat, from))?;
        let to_unit = cat.linear_unit(to).ok_or_else(|| self.missing_unit(cat, to))?;

        if !amount.is_finite() {
            return Ok(None);
        }
        if from_unit.name == to_unit.name {
            return Ok(Some(amount));
        }

        Ok(finite(amount * from_unit.factor / to_unit.factor))
    }

    fn convert_temperature(&self, cat: &Category, amount: f64, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
        let from_unit = cat.temperature_unit(from).ok_or_else(|| self.missing_unit(cat, from))?;
        let to_unit = cat.temperature_unit(to).ok_or_else(|| self.missing_unit(cat, to))?;

        if !amount.is_finite() {
            return Ok(None);
        }
        if from_unit.scale == to_unit.scale {
            return Ok(Some(amount));
        }

        let celsius = from_unit.scale.to_celsius(amount);
        Ok(finite(to_unit.scale.from_celsius(celsius)))
    }

    fn convert_rate(&self, cat: &Category, amount: f64, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
        let from_unit = cat.rate_unit(from).ok_or_else(|| self.missing_unit(cat, from))?;
        let to_unit = cat.rate_unit(to).ok_or_else(|| self.missing_unit(cat, to))?;

        // Money amounts must be positive
        if !amount.is_finite() || amount <= 0.0 {
            return Ok(None);
        }
        if from_unit.name == to_unit.name {
            return Ok(Some(amount));
        }

        Ok(finite(amount / from_unit.rate * to_unit.rate))
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Convert with the global registry
pub fn convert(category: &str, amount: f64, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
    UNITS.convert(category, amount, from, to)
}

/// Convert free-text input with the global registry
pub fn convert_input(category: &str, input: &str, from: &str, to: &str) -> Result<Option<f64>, ConvertError> {
    UNITS.convert_input(category, input, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 5] = [1.0, 0.0, -5.0, 1e9, 1e-9];

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual, tolerance, expected
        );
    }

    fn value(category: &str, amount: f64, from: &str, to: &str) -> f64 {
        convert(category, amount, from, to).unwrap().unwrap()
    }

    #[test]
    fn test_known_conversions() {
        assert_close(value("Length", 1.0, "Mile", "Kilometer"), 1.60934, 1e-9);
        assert_eq!(value("Temperature", 0.0, "Celsius", "Fahrenheit"), 32.0);
        assert_eq!(value("Temperature", 212.0, "Fahrenheit", "Celsius"), 100.0);
        assert_close(value("Weight", 1.0, "Kilogram", "Pound"), 2.20462, 1e-5);
        assert_close(value("Volume", 1.0, "Gallon", "Liter"), 3.78541, 1e-12);
    }

    #[test]
    fn test_more_temperature_cases() {
        assert_close(value("Temperature", 0.0, "Kelvin", "Celsius"), -273.15, 1e-12);
        assert_close(value("Temperature", 100.0, "Celsius", "Kelvin"), 373.15, 1e-12);
        assert_close(value("Temperature", -40.0, "Fahrenheit", "Celsius"), -40.0, 1e-12);
        assert_close(value("Temperature", 32.0, "Fahrenheit", "Kelvin"), 273.15, 1e-12);
    }

    #[test]
    fn test_linear_uses_registry_factors() {
        let expected = 3.0 * 0.3048 / 0.0254;
        assert_eq!(value("Length", 3.0, "Foot", "Inch"), expected);
        assert_eq!(value("Weight", 2.0, "Stone", "Pound"), 2.0 * 6350.29 / 453.592);
    }

    #[test]
    fn test_identity_is_exact() {
        for cat in UNITS.categories() {
            for unit in cat.units() {
                for amount in SAMPLES.iter().chain([0.1, 98.6, -273.15, 1.0 / 3.0].iter()) {
                    if cat.is_rate() && *amount <= 0.0 {
                        continue;
                    }
                    assert_eq!(
                        value(cat.name, *amount, unit.name, unit.name),
                        *amount,
                        "{} {} -> {}",
                        cat.name, amount, unit.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_identity_through_aliases() {
        assert_eq!(value("Length", 0.1, "Foot", "ft"), 0.1);
        assert_eq!(value("Temperature", 98.6, "°F", "fahrenheit"), 98.6);
    }

    #[test]
    fn test_round_trip_every_pair() {
        for cat in UNITS.categories() {
            let units = cat.units();
            for x in &units {
                for y in &units {
                    for &amount in SAMPLES.iter().filter(|a| !cat.is_rate() || **a > 0.0) {
                        let there = value(cat.name, amount, x.name, y.name);
                        let back = value(cat.name, there, y.name, x.name);
                        let tolerance = 1e-9 * amount.abs().max(1.0);
                        assert_close(back, amount, tolerance);
                    }
                }
            }
        }
    }

    #[test]
    fn test_swap_gives_inverse() {
        let forward = value("Length", 10.0, "Kilometer", "Mile");
        let backward = value("Length", forward, "Mile", "Kilometer");
        assert_close(backward, 10.0, 1e-12);

        let one_mile = value("Length", 1.0, "Mile", "Kilometer");
        let one_km = value("Length", 1.0, "Kilometer", "Mile");
        assert_close(one_mile * one_km, 1.0, 1e-12);
    }

    #[test]
    fn test_currency_goes_through_dollar_rates() {
        assert_eq!(value("Currency", 1.0, "USD", "EUR"), 0.85);
        assert_eq!(value("Currency", 100.0, "EUR", "GBP"), 100.0 / 0.85 * 0.73);
        assert_close(value("Currency", 110.0, "JPY", "USD"), 1.0, 1e-12);
        assert_eq!(value("Currency", 2.5, "₹", "INR"), 2.5);
    }

    #[test]
    fn test_currency_needs_positive_amount() {
        assert_eq!(convert("Currency", 0.0, "USD", "EUR"), Ok(None));
        assert_eq!(convert("Currency", -3.0, "USD", "EUR"), Ok(None));
        assert_eq!(convert("Currency", -3.0, "USD", "USD"), Ok(None));
        assert_eq!(convert("Currency", f64::NAN, "USD", "EUR"), Ok(None));
        assert!(matches!(
            convert("Currency", -3.0, "USD", "Bitcoin"),
            Err(ConvertError::UnitNotFound { .. })
        ));
    }

    #[test]
    fn test_negative_and_zero_amounts_pass_through() {
        assert_eq!(value("Length", 0.0, "Mile", "Kilometer"), 0.0);
        assert_close(value("Volume", -2.0, "Liter", "Milliliter"), -2000.0, 1e-9);
    }

    #[test]
    fn test_non_finite_amount_is_no_result() {
        assert_eq!(convert("Length", f64::NAN, "Mile", "Kilometer"), Ok(None));
        assert_eq!(convert("Temperature", f64::INFINITY, "Celsius", "Kelvin"), Ok(None));
        assert_eq!(convert("Weight", f64::NEG_INFINITY, "Gram", "Gram"), Ok(None));
    }

    #[test]
    fn test_overflow_is_no_result() {
        assert_eq!(convert("Length", f64::MAX, "Mile", "Millimeter"), Ok(None));
    }

    #[test]
    fn test_unit_errors_win_over_missing_amount() {
        assert!(matches!(
            convert("Length", f64::NAN, "Mile", "Parsec"),
            Err(ConvertError::UnitNotFound { .. })
        ));
        assert!(matches!(
            convert("Temperature", 1.0, "Celsius", "Meter"),
            Err(ConvertError::InvalidUnit { .. })
        ));
        assert!(matches!(
            convert("Speed", 1.0, "Meter", "Meter"),
            Err(ConvertError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_convert_input() {
        assert_eq!(convert_input("Temperature", " 212 ", "Fahrenheit", "Celsius"), Ok(Some(100.0)));
        assert_eq!(convert_input("Length", "", "Mile", "Kilometer"), Ok(None));
        assert_eq!(convert_input("Length", "abc", "Mile", "Kilometer"), Ok(None));
        assert_eq!(convert_input("Length", "2km", "Meter", "Meter"), Ok(Some(2.0)));
    }
}
