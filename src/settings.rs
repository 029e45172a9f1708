//! Generator settings: the per-module knobs a build script would otherwise set.
//!
//! Layers, highest priority first:
//!
//! ```text
//! CLI overrides         --application-id, --flavor, ...
//!        ↓ falls back to
//! Environment vars      GSERVICES_APPLICATION_ID, GSERVICES_FLAVORS, ...
//!        ↓ falls back to
//! Settings file         <root>/gservices.toml
//!        ↓ falls back to
//! Compiled defaults     #[config(default = ...)]
//! ```
//!
//! The settings file is validated in strict mode: a misspelled key fails with
//! its line number instead of being ignored.

use std::path::{Path, PathBuf};

use confique::Config;
use toml::{Table, Value};

use crate::env;
use crate::error::GServicesError;
use crate::overrides;
use crate::types::SortPolicy;
use crate::validate;

/// Name of the settings file looked up in the module root.
pub const SETTINGS_FILE_NAME: &str = "gservices.toml";

#[derive(Config, Debug)]
pub struct Settings {
    /// Package name of the client entry to generate from. Must equal one of
    /// `client[].client_info.android_client_info.package_name`.
    #[config(env = "GSERVICES_APPLICATION_ID")]
    pub application_id: Option<String>,

    /// Kotlin package of the generated file. Defaults to `application_id`.
    #[config(env = "GSERVICES_OUTPUT_PACKAGE")]
    pub output_package: Option<String>,

    /// Build type of the variant being generated.
    #[config(default = "debug", env = "GSERVICES_BUILD_TYPE")]
    pub build_type: String,

    /// Product flavors of the variant, in dimension order.
    #[config(
        default = [],
        env = "GSERVICES_FLAVORS",
        parse_env = crate::env::parse_list
    )]
    pub flavors: Vec<String>,

    /// Directory the generated source is written to. Cleared on every run.
    /// Relative paths are resolved against the module root.
    #[config(default = "build/generated/source/googleServices")]
    pub output_dir: PathBuf,

    #[config(nested)]
    pub search: SearchSettings,
}

#[derive(Config, Debug)]
pub struct SearchSettings {
    /// File name to look for in every candidate directory.
    #[config(default = "google-services.json")]
    pub file_name: String,

    /// `shallowest-first` prefers a file shared at the project root;
    /// `deepest-first` prefers the most specific flavor/build-type override.
    #[config(default = "shallowest-first", env = "GSERVICES_SEARCH_ORDER")]
    pub order: SortPolicy,
}

/// Pre-loaded settings sources. Nothing here touches the filesystem.
pub struct SettingsInput {
    /// Settings file path and contents, if the file exists.
    pub file: Option<(PathBuf, String)>,
    /// Overrides as `(dotted_key, value)` pairs.
    pub overrides: Vec<(String, Value)>,
    /// Raw environment variables: `std::env::vars().collect()` or synthetic
    /// pairs. Only the `GSERVICES_*` names bound in [`Settings`] are read.
    pub env_vars: Vec<(String, String)>,
    /// Whether to reject unknown keys in the settings file.
    pub strict: bool,
}

/// Resolve settings from pre-loaded sources.
pub fn resolve_settings(input: SettingsInput) -> Result<Settings, GServicesError> {
    let valid = overrides::valid_keys(&Settings::META);
    if let Some((key, _)) = input.overrides.iter().find(|(key, _)| !valid.contains(key)) {
        return Err(GServicesError::InvalidValue {
            key: key.clone(),
            reason: "not a known setting".into(),
        });
    }

    let override_table = overrides::overrides_to_table(&input.overrides)?;
    let env_table = env::env_to_table(&Settings::META, input.env_vars)?;
    let mut builder = Settings::builder()
        .preloaded(into_layer(override_table, "<overrides>")?)
        .preloaded(into_layer(env_table, "<env>")?);

    if let Some((path, content)) = &input.file {
        if input.strict {
            validate::check_settings_file(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|e| GServicesError::SettingsParse {
            path: path.clone(),
            source: e,
        })?;
        builder = builder.preloaded(into_layer(table, "<file>")?);
    }

    Ok(builder.load()?)
}

/// Read `<root_dir>/gservices.toml` (if present) and resolve all layers.
pub fn load_settings(
    root_dir: &Path,
    overrides: Vec<(String, Value)>,
    env_vars: Vec<(String, String)>,
) -> Result<Settings, GServicesError> {
    let path = root_dir.join(SETTINGS_FILE_NAME);
    let file = match std::fs::read_to_string(&path) {
        Ok(content) => Some((path, content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(GServicesError::IoError { path, source: e }),
    };

    resolve_settings(SettingsInput {
        file,
        overrides,
        env_vars,
        strict: true,
    })
}

fn into_layer(table: Table, key: &str) -> Result<<Settings as Config>::Layer, GServicesError> {
    Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| GServicesError::InvalidValue {
            key: key.into(),
            reason: e.to_string(),
        })
}

impl Default for SettingsInput {
    fn default() -> Self {
        Self {
            file: None,
            overrides: Vec::new(),
            env_vars: Vec::new(),
            strict: true,
        }
    }
}
