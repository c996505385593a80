//! Option merging.
//!
//! Reconciles a node's declared option schema with the overrides saved on a
//! prior task. Pure function over the untouched schema: repeated calls on
//! the same inputs always produce the same output, and the schema is never
//! mutated in place.

use serde_json::Value;

use crate::catalog::OptionSchema;
use crate::task::TaskOptionValue;

/// A display-ready option: the schema entry with an explicit default and,
/// when a prior override matched, the overridden value.
///
/// `value = None` means "render as default, not explicitly overridden".
#[derive(Debug, Clone, PartialEq)]
pub struct MergedOption {
    pub name: String,
    pub value: Option<Value>,
    pub default_value: Value,
    pub field_type: Option<String>,
    pub domain: Option<Value>,
    pub help: Option<String>,
}

/// Merge a schema with prior-task overrides.
///
/// Preserves schema order and length exactly: no option is dropped or
/// invented. A schema entry without a declared value gets an empty-string
/// default.
pub fn merge(schema: &[OptionSchema], prior: Option<&[TaskOptionValue]>) -> Vec<MergedOption> {
    schema
        .iter()
        .map(|opt| {
            let override_value = prior
                .and_then(|opts| opts.iter().find(|o| o.name == opt.name))
                .map(|o| o.value.clone());

            MergedOption {
                name: opt.name.clone(),
                value: override_value,
                default_value: opt.value.clone().unwrap_or(Value::String(String::new())),
                field_type: opt.field_type.clone(),
                domain: opt.domain.clone(),
                help: opt.help.clone(),
            }
        })
        .collect()
}

impl MergedOption {
    /// The value to show in a widget: the override when present, else the default.
    pub fn display_value(&self) -> &Value {
        self.value.as_ref().unwrap_or(&self.default_value)
    }

    pub fn is_overridden(&self) -> bool {
        self.value.is_some()
    }
}
