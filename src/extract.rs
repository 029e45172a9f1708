//! Field extraction from a parsed `google-services.json`.
//!
//! Operates on an already-parsed [`ConfigDocument`] with no I/O, so every
//! schema edge case is testable with inline JSON. Steps:
//!
//! 1. Require an object root and a `project_info` object
//! 2. Read `project_id` (required), `firebase_url` and `storage_bucket` (optional)
//! 3. Find the first `client[]` record whose package name is the application id
//! 4. Read `client_info.mobilesdk_app_id` and the first `api_key[].current_key`

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::GServicesError;

/// A parsed service configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Parse JSON text. `path` only labels parse errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, GServicesError> {
        let root = serde_json::from_str(content).map_err(|e| GServicesError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, GServicesError> {
        let content = std::fs::read_to_string(path).map_err(|e| GServicesError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }
}

impl From<Value> for ConfigDocument {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

/// The values the generated builder is populated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedConfig {
    pub api_key: String,
    pub project_id: String,
    /// The matched client's `mobilesdk_app_id`, not the package name used to
    /// select it.
    pub application_id: String,
    pub database_url: Option<String>,
    pub storage_bucket: Option<String>,
}

/// Select the client registered for `application_id` and extract its fields.
pub fn extract(
    document: &ConfigDocument,
    application_id: &str,
) -> Result<ExtractedConfig, GServicesError> {
    let root = document
        .root
        .as_object()
        .ok_or_else(|| GServicesError::schema("root"))?;

    let project_info = root
        .get("project_info")
        .and_then(Value::as_object)
        .ok_or_else(|| GServicesError::schema("project_info"))?;
    let project_id = primitive(project_info, "project_id")
        .ok_or_else(|| GServicesError::schema("project_info.project_id"))?;
    let database_url = primitive(project_info, "firebase_url");
    let storage_bucket = primitive(project_info, "storage_bucket");

    let clients = root
        .get("client")
        .and_then(Value::as_array)
        .ok_or_else(|| GServicesError::schema("client"))?;

    let client = clients
        .iter()
        .filter_map(Value::as_object)
        .find(|client| package_name(client).as_deref() == Some(application_id))
        .ok_or_else(|| GServicesError::NoMatchingClient {
            application_id: application_id.to_string(),
        })?;

    let mobilesdk_app_id = client
        .get("client_info")
        .and_then(Value::as_object)
        .and_then(|info| primitive(info, "mobilesdk_app_id"))
        .ok_or_else(|| GServicesError::schema("client.client_info.mobilesdk_app_id"))?;

    let api_key = client
        .get("api_key")
        .and_then(Value::as_array)
        .and_then(|keys| {
            keys.iter()
                .filter_map(Value::as_object)
                .find_map(|key| primitive(key, "current_key"))
        })
        .ok_or_else(|| GServicesError::schema("api_key.current_key"))?;

    Ok(ExtractedConfig {
        api_key,
        project_id,
        application_id: mobilesdk_app_id,
        database_url,
        storage_bucket,
    })
}

fn package_name(client: &Map<String, Value>) -> Option<String> {
    let android = client
        .get("client_info")?
        .as_object()?
        .get("android_client_info")?
        .as_object()?;
    primitive(android, "package_name")
}

/// A scalar member as text. Null, objects and arrays count as absent.
fn primitive(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
