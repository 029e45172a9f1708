use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the service configuration file the search looks for.
pub const GOOGLE_SERVICES_JSON: &str = "google-services.json";

/// Fixed name of the generated source file.
pub const OUTPUT_FILE_NAME: &str = "googleServicesOptionsBuilder.kt";

/// Output directory, relative to the module root, when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "build/generated/source/googleServices";

/// Name of the generated function.
pub const BUILDER_FUNCTION_NAME: &str = "googleServicesOptionsBuilder";

/// How candidates of different depth are ordered.
///
/// Depth is the number of path components below the filesystem root. Both
/// policies are stable: candidates of equal depth keep their generation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Most generic location first: a file shared at the project root wins
    /// unless it is missing.
    #[default]
    ShallowestFirst,
    /// Most specific location first: a flavor/build-type override wins.
    DeepestFirst,
}

/// Inputs to the candidate search for one build variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    pub root_dir: PathBuf,
    pub build_type: String,
    pub flavor_names: Vec<String>,
    pub file_name: String,
    pub sort_policy: SortPolicy,
}

impl SearchContext {
    /// A context searching for [`GOOGLE_SERVICES_JSON`] with the default policy.
    pub fn new(root_dir: impl Into<PathBuf>, build_type: &str, flavor_names: &[&str]) -> Self {
        Self {
            root_dir: root_dir.into(),
            build_type: build_type.to_string(),
            flavor_names: flavor_names.iter().map(|f| f.to_string()).collect(),
            file_name: GOOGLE_SERVICES_JSON.to_string(),
            sort_policy: SortPolicy::default(),
        }
    }
}

/// A generator operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Locate the JSON file, extract and write the options builder.
    Generate,
    /// Show the ordered candidate list and which entries exist.
    Candidates,
}
