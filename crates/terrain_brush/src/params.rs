//! Declarative brush parameter schemas.
//!
//! Brushes describe their extra knobs as a list of [`ParamDef`]s; host UIs
//! render controls from the serialized schema and hand values back as a
//! free-form [`ParamSet`]. [`resolve_params`] validates that map against the
//! schema before a brush ever sees it: unset values mean "use the default",
//! numbers clamp to their declared bounds, and anything unknown or
//! mistyped is dropped with a warning rather than reaching the kernel.

use log::warn;
use serde::Serialize;
use std::collections::HashMap;

/// One declarative parameter definition.
///
/// Serializes with a `"type"` tag so hosts can switch on the control kind.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamDef {
    Number {
        name: String,
        label: String,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    Boolean {
        name: String,
        label: String,
        default: bool,
    },
    Select {
        name: String,
        label: String,
        options: Vec<String>,
        default: String,
    },
    Text {
        name: String,
        label: String,
        default: String,
    },
}

impl ParamDef {
    pub fn number(name: &str, label: &str, default: f64, min: f64, max: f64, step: f64) -> Self {
        ParamDef::Number {
            name: name.to_string(),
            label: label.to_string(),
            default,
            min,
            max,
            step,
        }
    }

    pub fn boolean(name: &str, label: &str, default: bool) -> Self {
        ParamDef::Boolean {
            name: name.to_string(),
            label: label.to_string(),
            default,
        }
    }

    pub fn select(name: &str, label: &str, options: &[&str], default: &str) -> Self {
        ParamDef::Select {
            name: name.to_string(),
            label: label.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            default: default.to_string(),
        }
    }

    pub fn text(name: &str, label: &str, default: &str) -> Self {
        ParamDef::Text {
            name: name.to_string(),
            label: label.to_string(),
            default: default.to_string(),
        }
    }

    /// The parameter's key in a [`ParamSet`].
    pub fn name(&self) -> &str {
        match self {
            ParamDef::Number { name, .. }
            | ParamDef::Boolean { name, .. }
            | ParamDef::Select { name, .. }
            | ParamDef::Text { name, .. } => name,
        }
    }
}

/// A host-supplied parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}

/// Free-form name -> value map as supplied by the host.
pub type ParamSet = HashMap<String, ParamValue>;

/// Parameters after schema validation: every declared name is present with
/// an in-range value.
#[derive(Clone, Debug, Default)]
pub struct ResolvedParams {
    values: HashMap<String, ParamValue>,
}

impl ResolvedParams {
    /// Numeric value, or 0.0 for a name not in the schema.
    pub fn number(&self, name: &str) -> f64 {
        match self.values.get(name) {
            Some(ParamValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    /// Boolean value, or false for a name not in the schema.
    pub fn boolean(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ParamValue::Boolean(true)))
    }

    /// Text (or select) value, or "" for a name not in the schema.
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => s,
            _ => "",
        }
    }
}

/// Validate a free-form parameter map against a schema.
pub fn resolve_params(defs: &[ParamDef], supplied: &ParamSet) -> ResolvedParams {
    let mut values = HashMap::with_capacity(defs.len());

    for def in defs {
        let value = match def {
            ParamDef::Number {
                name,
                default,
                min,
                max,
                ..
            } => match supplied.get(name) {
                Some(ParamValue::Number(n)) => ParamValue::Number(n.clamp(*min, *max)),
                Some(_) => {
                    warn!("param '{}' has wrong type, using default", name);
                    ParamValue::Number(*default)
                }
                None => ParamValue::Number(*default),
            },
            ParamDef::Boolean { name, default, .. } => match supplied.get(name) {
                Some(ParamValue::Boolean(b)) => ParamValue::Boolean(*b),
                Some(_) => {
                    warn!("param '{}' has wrong type, using default", name);
                    ParamValue::Boolean(*default)
                }
                None => ParamValue::Boolean(*default),
            },
            ParamDef::Select {
                name,
                options,
                default,
                ..
            } => match supplied.get(name) {
                Some(ParamValue::Text(s)) if options.contains(s) => ParamValue::Text(s.clone()),
                Some(_) => {
                    warn!("param '{}' is not one of its options, using default", name);
                    ParamValue::Text(default.clone())
                }
                None => ParamValue::Text(default.clone()),
            },
            ParamDef::Text { name, default, .. } => match supplied.get(name) {
                Some(ParamValue::Text(s)) => ParamValue::Text(s.clone()),
                Some(_) => {
                    warn!("param '{}' has wrong type, using default", name);
                    ParamValue::Text(default.clone())
                }
                None => ParamValue::Text(default.clone()),
            },
        };
        values.insert(def.name().to_string(), value);
    }

    for key in supplied.keys() {
        if !defs.iter().any(|d| d.name() == key) {
            warn!("ignoring unknown param '{}'", key);
        }
    }

    ResolvedParams { values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ParamDef> {
        vec![
            ParamDef::number("scale", "Scale", 1.0, 0.1, 4.0, 0.1),
            ParamDef::boolean("centered", "Centered", true),
            ParamDef::select("tiling", "Tiling", &["clamp", "repeat"], "clamp"),
            ParamDef::text("image", "Image", ""),
        ]
    }

    #[test]
    fn test_unset_values_use_defaults() {
        let resolved = resolve_params(&schema(), &ParamSet::new());
        assert_eq!(resolved.number("scale"), 1.0);
        assert!(resolved.boolean("centered"));
        assert_eq!(resolved.text("tiling"), "clamp");
        assert_eq!(resolved.text("image"), "");
    }

    #[test]
    fn test_numbers_clamp_to_bounds() {
        let mut supplied = ParamSet::new();
        supplied.insert("scale".to_string(), ParamValue::Number(99.0));
        let resolved = resolve_params(&schema(), &supplied);
        assert_eq!(resolved.number("scale"), 4.0);
    }

    #[test]
    fn test_bad_select_falls_back_to_default() {
        let mut supplied = ParamSet::new();
        supplied.insert("tiling".to_string(), ParamValue::Text("mirror".to_string()));
        let resolved = resolve_params(&schema(), &supplied);
        assert_eq!(resolved.text("tiling"), "clamp");
    }

    #[test]
    fn test_type_mismatch_uses_default() {
        let mut supplied = ParamSet::new();
        supplied.insert("centered".to_string(), ParamValue::Number(1.0));
        let resolved = resolve_params(&schema(), &supplied);
        assert!(resolved.boolean("centered"));
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut supplied = ParamSet::new();
        supplied.insert("bogus".to_string(), ParamValue::Number(1.0));
        let resolved = resolve_params(&schema(), &supplied);
        assert_eq!(resolved.number("bogus"), 0.0);
    }

    #[test]
    fn test_schema_serializes_with_type_tag() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json[0]["type"], "number");
        assert_eq!(json[0]["name"], "scale");
        assert_eq!(json[0]["min"], 0.1);
        assert_eq!(json[2]["type"], "select");
        assert_eq!(json[2]["options"][1], "repeat");
    }
}
