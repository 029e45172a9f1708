use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GServicesError {
    #[error(
        "File {file_name} is missing. The options builder cannot be generated without it.\nSearched locations:\n{}",
        list_paths(.searched)
    )]
    ConfigurationMissing {
        file_name: String,
        searched: Vec<PathBuf>,
    },

    #[error("Missing or malformed '{field}' in google-services.json")]
    Schema { field: String },

    #[error(
        "No client with client.client_info.android_client_info.package_name == \"{application_id}\""
    )]
    NoMatchingClient { application_id: String },

    #[error(
        "application_id is not set. Add it to gservices.toml:\n\n    application_id = \"your.google.cloud.app.id\"\n\nor pass --application-id / set GSERVICES_APPLICATION_ID.\nUsually it is the package name of your app. It must equal one of the \"client.client_info.android_client_info.package_name\" entries in google-services.json: it selects the client entry to generate from."
    )]
    MissingApplicationId,

    #[error("Cannot recreate output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown setting '{key}' in {path} (line {line}){}", did_you_mean(.suggestion))]
    UnknownSetting {
        key: String,
        path: PathBuf,
        line: usize,
        suggestion: Option<String>,
    },

    #[error("Unknown keys in settings file")]
    UnknownSettings(Vec<GServicesError>),

    #[error("Settings error: {0}")]
    SettingsError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("    {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(setting) => format!(", did you mean '{setting}'?"),
        None => String::new(),
    }
}

impl GServicesError {
    pub(crate) fn schema(field: &str) -> Self {
        GServicesError::Schema {
            field: field.to_string(),
        }
    }
}
