//! Converter widget functions

use std::collections::BTreeMap;
use panelkit_plugin::prelude::*;
use crate::parse_amount;
use crate::registry::{Category, UNITS};

/// Extract a Text argument
fn extract_text<'a>(args: &'a [Value], index: usize, func: &str, arg: &str) -> Result<&'a str, PanelError> {
    match &args[index] {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(PanelError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract the amount: a Number, free text parsed leniently, or Null.
/// NaN stands in for "no amount" and is reported as no result.
fn extract_amount(args: &[Value], index: usize, func: &str) -> Result<f64, PanelError> {
    match &args[index] {
        Value::Number(n) => Ok(*n),
        Value::Text(s) => Ok(parse_amount(s).unwrap_or(f64::NAN)),
        Value::Null => Ok(f64::NAN),
        Value::Error(e) => Err(e.clone()),
        other => Err(PanelError::arg_type(func, "amount", "Number", other.type_name())),
    }
}

fn convert_args(func: &str, args: &[Value]) -> Result<(&'static Category, Option<f64>), PanelError> {
    if args.len() < 4 {
        return Err(PanelError::arg_count(func, 4, args.len()));
    }
    let category = extract_text(args, 0, func, "category")?;
    let amount = extract_amount(args, 1, func)?;
    let from = extract_text(args, 2, func, "from_unit")?;
    let to = extract_text(args, 3, func, "to_unit")?;

    let cat = UNITS.category(category)?;
    Ok((cat, UNITS.convert(category, amount, from, to)?))
}

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("category", "Text", "Category: \"Length\", \"Weight\", \"Temperature\", \"Volume\" or \"Currency\""),
    ArgMeta::required("amount", "Number", "Amount to convert (Text is parsed leniently)"),
    ArgMeta::required("from_unit", "Text", "Source unit name or symbol (e.g., \"Mile\", \"mi\")"),
    ArgMeta::required("to_unit", "Text", "Target unit name or symbol"),
];

// ============ convert ============

pub struct Convert;

static CONVERT_EXAMPLES: [&str; 4] = [
    "convert(\"Length\", 1, \"Mile\", \"Kilometer\") → 1.60934",
    "convert(\"Temperature\", 212, \"Fahrenheit\", \"Celsius\") → 100",
    "convert(\"Currency\", 100, \"USD\", \"JPY\") → 11000",
    "convert(\"Weight\", \"abc\", \"Gram\", \"Pound\") → null",
];

static CONVERT_RELATED: [&str; 3] = ["convert_format", "format_result", "units"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert an amount between two units of one category",
            usage: "convert(category, amount, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Number (null when there is no amount)",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match convert_args("convert", args) {
            Ok((_, result)) => Value::from(result),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ format_result ============

pub struct FormatResult;

/// Any category other than Currency formats the same way
const DEFAULT_FORMAT_CATEGORY: &str = "Length";

static FORMAT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("value", "Number", "Converted value (null passes through)"),
    ArgMeta::optional("category", "Text", "Category whose display rules apply", DEFAULT_FORMAT_CATEGORY),
];

static FORMAT_EXAMPLES: [&str; 4] = [
    "format_result(1500000) → \"1.5000e+6\"",
    "format_result(1.5) → \"1.5\"",
    "format_result(0.0000005) → \"5.0000e-7\"",
    "format_result(1234.5, \"Currency\") → \"1,234.50\"",
];

static FORMAT_RELATED: [&str; 2] = ["convert", "convert_format"];

impl FunctionPlugin for FormatResult {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_result",
            description: "Render a value for display: exponential for very large or small magnitudes, otherwise up to six decimals; currencies get two grouped decimals",
            usage: "format_result(value, [category])",
            args: &FORMAT_ARGS,
            returns: "Text (null for null)",
            examples: &FORMAT_EXAMPLES,
            category: "units",
            related: &FORMAT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let category = if args.len() > 1 {
            extract_text(args, 1, "format_result", "category")
        } else {
            Ok(DEFAULT_FORMAT_CATEGORY)
        };
        let cat = match category.and_then(|name| UNITS.category(name).map_err(PanelError::from)) {
            Ok(cat) => cat,
            Err(e) => return Value::Error(e),
        };

        match args.first() {
            None => Value::Error(PanelError::arg_count("format_result", 1, 0)),
            Some(Value::Number(n)) => Value::Text(cat.format_value(*n)),
            Some(Value::Null) => Value::Null,
            Some(Value::Error(e)) => Value::Error(e.clone()),
            Some(other) => Value::Error(PanelError::arg_type("format_result", "value", "Number", other.type_name())),
        }
    }
}

// ============ convert_format ============

pub struct ConvertFormat;

static CONVERT_FORMAT_EXAMPLES: [&str; 3] = [
    "convert_format(\"Length\", 1, \"Mile\", \"Kilometer\") → \"1.60934\"",
    "convert_format(\"Currency\", 100, \"USD\", \"JPY\") → \"11,000.00\"",
    "convert_format(\"Length\", 1, \"Millimeter\", \"Mile\") → \"6.2137e-7\"",
];

static CONVERT_FORMAT_RELATED: [&str; 2] = ["convert", "format_result"];

impl FunctionPlugin for ConvertFormat {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_format",
            description: "Convert an amount and render the result for display",
            usage: "convert_format(category, amount, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Text (null when there is no amount)",
            examples: &CONVERT_FORMAT_EXAMPLES,
            category: "units",
            related: &CONVERT_FORMAT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match convert_args("convert_format", args) {
            Ok((cat, Some(n))) => Value::Text(cat.format_value(n)),
            Ok((_, None)) => Value::Null,
            Err(e) => Value::Error(e),
        }
    }
}

// ============ categories ============

pub struct Categories;

static CATEGORIES_EXAMPLES: [&str; 1] = [
    "categories() → [\"Length\", \"Weight\", \"Temperature\", \"Volume\", \"Currency\"]",
];

static CATEGORIES_RELATED: [&str; 1] = ["units"];

impl FunctionPlugin for Categories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "categories",
            description: "List unit categories in display order",
            usage: "categories()",
            args: &[],
            returns: "List<Text>",
            examples: &CATEGORIES_EXAMPLES,
            category: "units",
            related: &CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        Value::List(UNITS.categories().iter().map(|c| Value::from(c.name)).collect())
    }
}

// ============ units ============

pub struct Units;

static UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "Category name"),
];

static UNITS_EXAMPLES: [&str; 1] = [
    "units(\"Temperature\") → [{name: \"Celsius\", symbol: \"°C\"}, ...]",
];

static UNITS_RELATED: [&str; 2] = ["categories", "convert"];

impl FunctionPlugin for Units {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "units",
            description: "List the units of a category with symbols and scale factors or exchange rates",
            usage: "units(category)",
            args: &UNITS_ARGS,
            returns: "List<Object {name, symbol, label?, factor?, rate?}>",
            examples: &UNITS_EXAMPLES,
            category: "units",
            related: &UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(PanelError::arg_count("units", 1, 0));
        }
        let category = match extract_text(args, 0, "units", "category") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let units = match UNITS.units(category) {
            Ok(u) => u,
            Err(e) => return Value::Error(e.into()),
        };

        Value::List(units.into_iter().map(|u| {
            let mut obj = BTreeMap::new();
            obj.insert("name".to_string(), Value::from(u.name));
            obj.insert("symbol".to_string(), Value::from(u.symbol));
            if let Some(label) = u.label {
                obj.insert("label".to_string(), Value::from(label));
            }
            if let Some(factor) = u.factor {
                obj.insert("factor".to_string(), Value::Number(factor));
            }
            if let Some(rate) = u.rate {
                obj.insert("rate".to_string(), Value::Number(rate));
            }
            Value::Object(obj)
        }).collect())
    }
}
