use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::GServicesError;
use crate::extract::{self, ConfigDocument};
use crate::file;
use crate::ops::GenerateOutcome;
use crate::render::{self, GenerationSpec};
use crate::settings::Settings;
use crate::types::{Action, DEFAULT_OUTPUT_DIR, GOOGLE_SERVICES_JSON, SearchContext, SortPolicy};

/// Entry point for building a generator run.
pub struct GoogleServices;

impl GoogleServices {
    pub fn builder() -> GoogleServicesBuilder {
        GoogleServicesBuilder::new()
    }
}

/// Builder for one generation run, i.e. one build variant of one module.
///
/// The host build system calls this once per variant with that variant's
/// build type, flavors and output directory.
#[derive(Debug, Clone)]
pub struct GoogleServicesBuilder {
    root_dir: Option<PathBuf>,
    build_type: String,
    flavor_names: Vec<String>,
    application_id: Option<String>,
    output_package: Option<String>,
    output_dir: Option<PathBuf>,
    file_name: String,
    sort_policy: SortPolicy,
}

impl GoogleServicesBuilder {
    fn new() -> Self {
        Self {
            root_dir: None,
            build_type: "debug".to_string(),
            flavor_names: Vec::new(),
            application_id: None,
            output_package: None,
            output_dir: None,
            file_name: GOOGLE_SERVICES_JSON.to_string(),
            sort_policy: SortPolicy::default(),
        }
    }

    /// Module root the search starts from (default: current directory).
    pub fn root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    pub fn build_type(mut self, build_type: &str) -> Self {
        self.build_type = build_type.to_string();
        self
    }

    /// Append a product flavor. Order matters: it is the flavor dimension order.
    pub fn flavor(mut self, name: &str) -> Self {
        self.flavor_names.push(name.to_string());
        self
    }

    /// Replace the product flavors.
    pub fn flavors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flavor_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Package name used to select the `client[]` entry.
    pub fn application_id(mut self, id: &str) -> Self {
        self.application_id = Some(id.to_string());
        self
    }

    /// Package of the generated file (default: the application id).
    pub fn output_package(mut self, package: &str) -> Self {
        self.output_package = Some(package.to_string());
        self
    }

    /// Directory the generated file is written to. Relative paths are resolved
    /// against the root directory. The directory is cleared on every run.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Override the configuration file name (default: `google-services.json`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    /// Set the candidate ordering (default: [`SortPolicy::ShallowestFirst`]).
    pub fn sort_policy(mut self, policy: SortPolicy) -> Self {
        self.sort_policy = policy;
        self
    }

    /// Apply resolved [`Settings`]. Values already set on the builder are
    /// replaced; the root directory is kept.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.application_id = settings.application_id;
        self.output_package = settings.output_package;
        self.build_type = settings.build_type;
        self.flavor_names = settings.flavors;
        self.output_dir = Some(settings.output_dir);
        self.file_name = settings.search.file_name;
        self.sort_policy = settings.search.order;
        self
    }

    /// The application id, or a [`GServicesError::MissingApplicationId`]
    /// explaining how to configure it.
    fn effective_application_id(&self) -> Result<&str, GServicesError> {
        self.application_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(GServicesError::MissingApplicationId)
    }

    fn effective_output_package(&self) -> Result<String, GServicesError> {
        match &self.output_package {
            Some(package) if !package.trim().is_empty() => Ok(package.clone()),
            _ => self.effective_application_id().map(str::to_string),
        }
    }

    /// Absolute root directory.
    fn effective_root_dir(&self) -> Result<PathBuf, GServicesError> {
        let root = match &self.root_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from("."),
        };
        std::path::absolute(&root).map_err(|e| GServicesError::IoError {
            path: root,
            source: e,
        })
    }

    fn effective_output_dir(&self, root: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => root.join(dir),
            None => root.join(DEFAULT_OUTPUT_DIR),
        }
    }

    /// The search inputs for this run.
    pub fn search_context(&self) -> Result<SearchContext, GServicesError> {
        Ok(SearchContext {
            root_dir: self.effective_root_dir()?,
            build_type: self.build_type.clone(),
            flavor_names: self.flavor_names.clone(),
            file_name: self.file_name.clone(),
            sort_policy: self.sort_policy,
        })
    }

    /// Ordered candidate locations. Does not require an application id.
    pub fn candidates(&self) -> Result<Vec<PathBuf>, GServicesError> {
        Ok(file::resolve_candidates(&self.search_context()?))
    }

    /// Locate the configuration file, extract the client's fields and write
    /// the options builder.
    pub fn generate(&self) -> Result<GenerateOutcome, GServicesError> {
        let application_id = self.effective_application_id()?;
        let package = self.effective_output_package()?;
        info!(%package, "resolved output package");

        let ctx = self.search_context()?;
        debug!(candidates = ?file::resolve_candidates(&ctx), "searching for {}", ctx.file_name);
        let json_file = file::resolve_existing_file(&ctx)?;
        info!(json_file = %json_file.display(), "using configuration file");

        let document = ConfigDocument::load(&json_file)?;
        let fields = extract::extract(&document, application_id)?;

        let output_directory = render::disposable_output_dir(
            &self.effective_output_dir(&ctx.root_dir),
            &[ctx.root_dir.as_path(), json_file.as_path()],
        )?;
        let spec = GenerationSpec {
            output_package: package.clone(),
            output_directory,
            fields,
        };
        let output_file = render::generate(&spec)?;

        Ok(GenerateOutcome::Generated {
            json_file,
            output_file,
            package,
        })
    }

    /// Handle an [`Action`].
    pub fn handle(&self, action: Action) -> Result<GenerateOutcome, GServicesError> {
        match action {
            Action::Generate => self.generate(),
            Action::Candidates => {
                let entries = self
                    .candidates()?
                    .into_iter()
                    .map(|path| {
                        let exists = path.is_file();
                        (path, exists)
                    })
                    .collect();
                Ok(GenerateOutcome::Candidates { entries })
            }
        }
    }
}
