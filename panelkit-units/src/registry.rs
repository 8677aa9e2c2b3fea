//! Unit definitions - five categories of convertible units

use std::collections::HashMap;
use std::sync::LazyLock;
use serde::Serialize;
use crate::ConvertError;

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// A unit converted linearly through its category's base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearUnit {
    pub name: &'static str,
    pub symbol: &'static str,
    /// How many base units one of this unit equals
    pub factor: f64,
}

/// The three supported temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureUnit {
    pub name: &'static str,
    pub symbol: &'static str,
    pub scale: TemperatureScale,
}

/// A currency valued against the US dollar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateUnit {
    /// ISO 4217 code, used as the unit name
    pub name: &'static str,
    pub label: &'static str,
    pub symbol: &'static str,
    /// Units of this currency per US dollar
    pub rate: f64,
}

/// How a category turns one unit into another
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionRule {
    /// `amount * factor(from) / factor(to)`
    LinearFactor(&'static [LinearUnit]),
    /// Through Celsius using fixed formulas
    Temperature(&'static [TemperatureUnit]),
    /// `amount / rate(from) * rate(to)`, positive amounts only
    Rate(&'static [RateUnit]),
}

/// Flat view of a unit for listings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    pub name: &'static str,
    pub symbol: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

/// A family of mutually convertible units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Category {
    pub name: &'static str,
    pub base_unit: &'static str,
    pub rule: ConversionRule,
}

impl Category {
    pub fn is_rate(&self) -> bool {
        matches!(self.rule, ConversionRule::Rate(_))
    }

    /// Units in registry order
    pub fn units(&self) -> Vec<Unit> {
        match self.rule {
            ConversionRule::LinearFactor(units) => units.iter()
                .map(|u| Unit { name: u.name, symbol: u.symbol, label: None, factor: Some(u.factor), rate: None })
                .collect(),
            ConversionRule::Temperature(units) => units.iter()
                .map(|u| Unit { name: u.name, symbol: u.symbol, label: None, factor: None, rate: None })
                .collect(),
            ConversionRule::Rate(units) => units.iter()
                .map(|u| Unit { name: u.name, symbol: u.symbol, label: Some(u.label), factor: None, rate: Some(u.rate) })
                .collect(),
        }
    }

    /// Resolve a unit by name, case-insensitive name, or symbol
    pub fn unit(&self, name: &str) -> Option<Unit> {
        let units = self.units();
        resolve(&units, name, |u| (u.name, u.symbol)).copied()
    }

    pub fn linear_unit(&self, name: &str) -> Option<&'static LinearUnit> {
        match self.rule {
            ConversionRule::LinearFactor(units) => resolve(units, name, |u| (u.name, u.symbol)),
            _ => None,
        }
    }

    pub fn temperature_unit(&self, name: &str) -> Option<&'static TemperatureUnit> {
        match self.rule {
            ConversionRule::Temperature(units) => resolve(units, name, |u| (u.name, u.symbol)),
            _ => None,
        }
    }

    pub fn rate_unit(&self, name: &str) -> Option<&'static RateUnit> {
        match self.rule {
            ConversionRule::Rate(units) => resolve(units, name, |u| (u.name, u.symbol)),
            _ => None,
        }
    }
}

/// Exact name, then case-insensitive name, then exact symbol
fn resolve<'a, T>(items: &'a [T], query: &str, key: impl Fn(&T) -> (&str, &str)) -> Option<&'a T> {
    let query = query.trim();
    items.iter().find(|item| key(item).0 == query)
        .or_else(|| items.iter().find(|item| key(item).0.eq_ignore_ascii_case(query)))
        .or_else(|| items.iter().find(|item| key(item).1 == query))
}

static LENGTH_UNITS: [LinearUnit; 8] = [
    LinearUnit { name: "Millimeter", symbol: "mm", factor: 0.001 },
    LinearUnit { name: "Centimeter", symbol: "cm", factor: 0.01 },
    LinearUnit { name: "Meter", symbol: "m", factor: 1.0 },
    LinearUnit { name: "Kilometer", symbol: "km", factor: 1000.0 },
    LinearUnit { name: "Inch", symbol: "in", factor: 0.0254 },
    LinearUnit { name: "Foot", symbol: "ft", factor: 0.3048 },
    LinearUnit { name: "Yard", symbol: "yd", factor: 0.9144 },
    LinearUnit { name: "Mile", symbol: "mi", factor: 1609.34 },
];

static WEIGHT_UNITS: [LinearUnit; 6] = [
    LinearUnit { name: "Milligram", symbol: "mg", factor: 0.001 },
    LinearUnit { name: "Gram", symbol: "g", factor: 1.0 },
    LinearUnit { name: "Kilogram", symbol: "kg", factor: 1000.0 },
    LinearUnit { name: "Ounce", symbol: "oz", factor: 28.3495 },
    LinearUnit { name: "Pound", symbol: "lb", factor: 453.592 },
    LinearUnit { name: "Stone", symbol: "st", factor: 6350.29 },
];

static TEMPERATURE_UNITS: [TemperatureUnit; 3] = [
    TemperatureUnit { name: "Celsius", symbol: "°C", scale: TemperatureScale::Celsius },
    TemperatureUnit { name: "Fahrenheit", symbol: "°F", scale: TemperatureScale::Fahrenheit },
    TemperatureUnit { name: "Kelvin", symbol: "K", scale: TemperatureScale::Kelvin },
];

static VOLUME_UNITS: [LinearUnit; 7] = [
    LinearUnit { name: "Milliliter", symbol: "ml", factor: 0.001 },
    LinearUnit { name: "Liter", symbol: "l", factor: 1.0 },
    LinearUnit { name: "Fluid Ounce", symbol: "fl oz", factor: 0.0295735 },
    LinearUnit { name: "Cup", symbol: "cup", factor: 0.236588 },
    LinearUnit { name: "Pint", symbol: "pt", factor: 0.473176 },
    LinearUnit { name: "Quart", symbol: "qt", factor: 0.946353 },
    LinearUnit { name: "Gallon", symbol: "gal", factor: 3.78541 },
];

// Fixed rates; "¥" resolves to JPY, the first owner of the symbol
static CURRENCY_UNITS: [RateUnit; 9] = [
    RateUnit { name: "USD", label: "US Dollar", symbol: "$", rate: 1.0 },
    RateUnit { name: "EUR", label: "Euro", symbol: "€", rate: 0.85 },
    RateUnit { name: "GBP", label: "British Pound", symbol: "£", rate: 0.73 },
    RateUnit { name: "JPY", label: "Japanese Yen", symbol: "¥", rate: 110.0 },
    RateUnit { name: "AUD", label: "Australian Dollar", symbol: "A$", rate: 1.35 },
    RateUnit { name: "CAD", label: "Canadian Dollar", symbol: "C$", rate: 1.25 },
    RateUnit { name: "CHF", label: "Swiss Franc", symbol: "Fr", rate: 0.92 },
    RateUnit { name: "CNY", label: "Chinese Yuan", symbol: "¥", rate: 6.45 },
    RateUnit { name: "INR", label: "Indian Rupee", symbol: "₹", rate: 74.5 },
];

/// Registry of all known categories
pub struct UnitRegistry {
    categories: Vec<Category>,
    by_name: HashMap<String, usize>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let categories = vec![
            Category { name: "Length", base_unit: "Meter", rule: ConversionRule::LinearFactor(&LENGTH_UNITS) },
            Category { name: "Weight", base_unit: "Gram", rule: ConversionRule::LinearFactor(&WEIGHT_UNITS) },
            Category { name: "Temperature", base_unit: "Celsius", rule: ConversionRule::Temperature(&TEMPERATURE_UNITS) },
            Category { name: "Volume", base_unit: "Liter", rule: ConversionRule::LinearFactor(&VOLUME_UNITS) },
            Category { name: "Currency", base_unit: "USD", rule: ConversionRule::Rate(&CURRENCY_UNITS) },
        ];
        let by_name = categories.iter()
            .enumerate()
            .map(|(i, c)| (c.name.to_lowercase(), i))
            .collect();
        UnitRegistry { categories, by_name }
    }

    /// Categories in registry order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name (case-insensitive)
    pub fn category(&self, name: &str) -> Result<&Category, ConvertError> {
        self.by_name.get(&name.trim().to_lowercase())
            .map(|&i| &self.categories[i])
            .ok_or_else(|| ConvertError::CategoryNotFound(name.to_string()))
    }

    /// Units of a category in registry order
    pub fn units(&self, category: &str) -> Result<Vec<Unit>, ConvertError> {
        Ok(self.category(category)?.units())
    }

    /// Resolve a unit inside a category.
    ///
    /// A name that only exists in another category is an `InvalidUnit`;
    /// a name found nowhere is `UnitNotFound`.
    pub fn unit(&self, category: &str, unit: &str) -> Result<Unit, ConvertError> {
        let cat = self.category(category)?;
        cat.unit(unit).ok_or_else(|| self.missing_unit(cat, unit))
    }

    /// Scale factor of a linear unit
    pub fn factor(&self, category: &str, unit: &str) -> Result<f64, ConvertError> {
        let cat = self.category(category)?;
        if !matches!(cat.rule, ConversionRule::LinearFactor(_)) {
            // Still report unknown names before the missing factor
            self.unit(category, unit)?;
            return Err(ConvertError::NoScaleFactor { category: cat.name.to_string() });
        }
        cat.linear_unit(unit)
            .map(|u| u.factor)
            .ok_or_else(|| self.missing_unit(cat, unit))
    }

    pub(crate) fn missing_unit(&self, category: &Category, unit: &str) -> ConvertError {
        let owner = self.categories.iter()
            .filter(|c| c.name != category.name)
            .find(|c| c.unit(unit).is_some());
        match owner {
            Some(actual) => ConvertError::InvalidUnit {
                category: category.name.to_string(),
                unit: unit.to_string(),
                actual: actual.name.to_string(),
            },
            None => ConvertError::UnitNotFound {
                category: category.name.to_string(),
                unit: unit.to_string(),
            },
        }
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_in_order() {
        let names: Vec<&str> = UNITS.categories().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Length", "Weight", "Temperature", "Volume", "Currency"]);
    }

    #[test]
    fn test_base_units_have_factor_one() {
        for cat in UNITS.categories().iter().filter(|c| matches!(c.rule, ConversionRule::LinearFactor(_))) {
            assert_eq!(UNITS.factor(cat.name, cat.base_unit), Ok(1.0), "{}", cat.name);
        }
        assert_eq!(UNITS.category("Temperature").unwrap().base_unit, "Celsius");
        assert_eq!(UNITS.unit("Currency", "USD").unwrap().rate, Some(1.0));
    }

    #[test]
    fn test_factor_lookup() {
        assert_eq!(UNITS.factor("Length", "Mile"), Ok(1609.34));
        assert_eq!(UNITS.factor("Weight", "Stone"), Ok(6350.29));
        assert_eq!(UNITS.factor("Volume", "Fluid Ounce"), Ok(0.0295735));
    }

    #[test]
    fn test_name_resolution() {
        assert_eq!(UNITS.unit("length", "mile").unwrap().name, "Mile");
        assert_eq!(UNITS.unit("Length", "km").unwrap().name, "Kilometer");
        assert_eq!(UNITS.unit("Volume", "fl oz").unwrap().name, "Fluid Ounce");
        assert_eq!(UNITS.unit("Temperature", "°F").unwrap().name, "Fahrenheit");
        // Symbols are case-sensitive: "m" is meter, "M" is nothing
        assert!(UNITS.unit("Length", "M").is_err());
    }

    #[test]
    fn test_volume_symbols_are_lowercase() {
        assert_eq!(UNITS.unit("Volume", "ml").unwrap().name, "Milliliter");
        assert_eq!(UNITS.unit("Volume", "l").unwrap().name, "Liter");
        assert_eq!(UNITS.unit("Volume", "Liter").unwrap().symbol, "l");
        assert!(UNITS.unit("Volume", "mL").is_err());
    }

    #[test]
    fn test_currency_resolution() {
        let eur = UNITS.unit("Currency", "eur").unwrap();
        assert_eq!((eur.name, eur.symbol, eur.label), ("EUR", "€", Some("Euro")));
        assert_eq!(UNITS.unit("Currency", "₹").unwrap().name, "INR");
        assert_eq!(UNITS.unit("Currency", "¥").unwrap().name, "JPY");
        assert_eq!(UNITS.unit("Currency", "CNY").unwrap().rate, Some(6.45));
        assert!(matches!(
            UNITS.unit("Currency", "Meter"),
            Err(ConvertError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(
            UNITS.factor("Speed", "Meter"),
            Err(ConvertError::CategoryNotFound("Speed".into()))
        );
    }

    #[test]
    fn test_unknown_and_foreign_units() {
        assert_eq!(
            UNITS.factor("Length", "Furlong"),
            Err(ConvertError::UnitNotFound { category: "Length".into(), unit: "Furlong".into() })
        );
        assert_eq!(
            UNITS.factor("Length", "Gram"),
            Err(ConvertError::InvalidUnit {
                category: "Length".into(),
                unit: "Gram".into(),
                actual: "Weight".into(),
            })
        );
    }

    #[test]
    fn test_temperature_has_no_factor() {
        assert_eq!(
            UNITS.factor("Temperature", "Kelvin"),
            Err(ConvertError::NoScaleFactor { category: "Temperature".into() })
        );
        assert!(matches!(
            UNITS.factor("Temperature", "Rankine"),
            Err(ConvertError::UnitNotFound { .. })
        ));
        assert_eq!(
            UNITS.factor("Currency", "EUR"),
            Err(ConvertError::NoScaleFactor { category: "Currency".into() })
        );
    }

    #[test]
    fn test_unit_listing() {
        let volume = UNITS.units("Volume").unwrap();
        assert_eq!(volume.len(), 7);
        assert_eq!(volume[0].name, "Milliliter");
        assert_eq!(volume[6].factor, Some(3.78541));

        let temperature = UNITS.units("Temperature").unwrap();
        assert_eq!(temperature.len(), 3);
        assert!(temperature.iter().all(|u| u.factor.is_none()));

        let currency = UNITS.units("Currency").unwrap();
        assert_eq!(currency.len(), 9);
        assert!(currency.iter().all(|u| u.factor.is_none() && u.rate.is_some()));
    }

    #[test]
    fn test_scale_formulas() {
        assert_eq!(TemperatureScale::Fahrenheit.to_celsius(212.0), 100.0);
        assert_eq!(TemperatureScale::Fahrenheit.from_celsius(0.0), 32.0);
        assert_eq!(TemperatureScale::Kelvin.from_celsius(0.0), 273.15);
        assert_eq!(TemperatureScale::Kelvin.to_celsius(273.15), 0.0);
    }
}
