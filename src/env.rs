//! Environment layer: `GSERVICES_*` variables mapped onto settings keys.
//!
//! Variable names come from the `env` attribute of each [`Settings`] field,
//! read through confique's `Meta`. The variables are passed in as pairs so
//! tests can use synthetic data instead of `std::env::vars()`.
//!
//! [`Settings`]: crate::Settings

use std::convert::Infallible;

use confique::meta::{FieldKind, Meta};
use toml::{Table, Value};

use crate::error::GServicesError;
use crate::overrides;

/// Settings keys whose variable holds a comma-separated list.
const LIST_KEYS: &[&str] = &["flavors"];

/// Build a settings table from the variables bound in `meta`.
///
/// Variables without a binding are ignored, and so are blank scalar values.
/// List values go through [`parse_list`].
pub fn env_to_table(
    meta: &Meta,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Table, GServicesError> {
    let bindings = bindings(meta);
    let mut entries = Vec::new();

    for (name, raw) in vars {
        let Some((_, key)) = bindings.iter().find(|(var, _)| *var == name) else {
            continue;
        };
        let value = if LIST_KEYS.contains(&key.as_str()) {
            let Ok(items) = parse_list(&raw);
            Value::Array(items.into_iter().map(Value::String).collect())
        } else if raw.trim().is_empty() {
            continue;
        } else {
            Value::String(raw.trim().to_string())
        };
        entries.push((key.clone(), value));
    }

    overrides::overrides_to_table(&entries)
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
///
/// `"free, arm64,"` is `["free", "arm64"]`; an empty string is `[]`.
pub(crate) fn parse_list(raw: &str) -> Result<Vec<String>, Infallible> {
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

/// `(variable, dotted key)` for every leaf field with an `env` attribute.
fn bindings(meta: &Meta) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    collect_bindings(meta, "", &mut out);
    out
}

fn collect_bindings(meta: &Meta, prefix: &str, out: &mut Vec<(&'static str, String)>) {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf { env: Some(var), .. } => out.push((*var, dotted)),
            FieldKind::Leaf { .. } => {}
            FieldKind::Nested { meta, .. } => collect_bindings(meta, &dotted, out),
        }
    }
}
