//! Convert dotted-key CLI overrides into a nested `toml::Table`.
//!
//! Each `("search.order", Value)` pair is expanded into the nested table
//! structure that deserializes into the settings layer.

use std::collections::HashSet;

use confique::meta::{FieldKind, Meta};
use toml::{Table, Value};

use crate::error::GServicesError;

/// Convert dotted-key overrides into a nested `toml::Table`.
///
/// `("search.order", Value::String("deepest-first"))` becomes
/// `{search = {order = "deepest-first"}}`. If multiple entries target the same
/// key, the last one wins.
pub fn overrides_to_table(entries: &[(String, Value)]) -> Result<Table, GServicesError> {
    let mut table = Table::new();
    for (dotted_key, value) in entries {
        set_nested(&mut table, dotted_key, value.clone())?;
    }
    Ok(table)
}

fn set_nested(table: &mut Table, dotted_key: &str, value: Value) -> Result<(), GServicesError> {
    let Some((path, leaf)) = dotted_key.rsplit_once('.') else {
        table.insert(dotted_key.to_string(), value);
        return Ok(());
    };

    let mut current = table;
    for segment in path.split('.') {
        current = current
            .entry(segment)
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| GServicesError::InvalidValue {
                key: dotted_key.to_string(),
                reason: format!("'{segment}' is a value, not a section"),
            })?;
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Collect all valid leaf key paths from a confique `Meta` tree.
///
/// Returns dotted paths like `"build_type"` and `"search.order"`. Section names
/// (nested structs) are excluded.
pub fn valid_keys(meta: &Meta) -> HashSet<String> {
    let mut keys = HashSet::new();
    collect_keys(meta, "", &mut keys);
    keys
}

fn collect_keys(meta: &Meta, prefix: &str, keys: &mut HashSet<String>) {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf { .. } => {
                keys.insert(dotted);
            }
            FieldKind::Nested { meta, .. } => {
                collect_keys(meta, &dotted, keys);
            }
        }
    }
}
