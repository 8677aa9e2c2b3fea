//! panelkit Units - the converter widget's engine
//!
//! Converts amounts between units (or currencies) of one category and
//! renders the result for display.
//!
//! Categories:
//! - Length (base Meter): mm, cm, m, km, in, ft, yd, mi
//! - Weight (base Gram): mg, g, kg, oz, lb, st
//! - Temperature (base Celsius): °C, °F, K, converted by formula
//! - Volume (base Liter): ml, l, fl oz, cup, pt, qt, gal
//! - Currency (base USD): USD, EUR, GBP, JPY, AUD, CAD, CHF, CNY, INR at
//!   fixed rates, shown with two grouped decimals
//!
//! Linear categories convert as `amount * factor(from) / factor(to)`,
//! currencies as `amount / rate(from) * rate(to)` for positive amounts.
//! An amount that is not a finite number yields `Ok(None)` ("no result"),
//! never a NaN on screen.

mod error;
mod registry;
mod convert;
mod parse;
mod format;
mod form;
mod functions;

pub use error::ConvertError;
pub use registry::{
    Category, ConversionRule, LinearUnit, RateUnit, TemperatureScale,
    TemperatureUnit, Unit, UnitRegistry, UNITS,
};
pub use convert::{convert, convert_input};
pub use parse::parse_amount;
pub use format::{format_currency, format_result};
pub use form::ConverterForm;

use panelkit_plugin::PluginRegistry;

/// Load converter functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion
        .with_function(functions::Convert)
        .with_function(functions::ConvertFormat)
        .with_function(functions::FormatResult)

        // Inspection
        .with_function(functions::Categories)
        .with_function(functions::Units)
}
