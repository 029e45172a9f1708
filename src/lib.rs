//! Generate a `FirebaseOptions.Builder` factory from `google-services.json`
//! for Android **library** modules.
//!
//! The upstream Google Services build plugin only works for application
//! modules. A library that wants to initialize Firebase itself needs the same
//! values, so this crate finds the right `google-services.json`, picks the
//! client entry for an application id and writes a small Kotlin file:
//!
//! ```kotlin
//! package com.example.app
//!
//! import com.google.firebase.FirebaseOptions
//!
//! fun googleServicesOptionsBuilder(): FirebaseOptions.Builder =
//!     FirebaseOptions.Builder()
//!         .setApiKey("...")
//!         .setProjectId("...")
//!         .setApplicationId("...")
//!         .setDatabaseUrl("...")
//!         .setStorageBucket(null)
//! ```
//!
//! ```ignore
//! let outcome = GoogleServices::builder()
//!     .root_dir("mylib")
//!     .build_type("debug")
//!     .flavor("free")
//!     .application_id("com.example.app")
//!     .generate()?;
//! ```
//!
//! # Pipeline
//!
//! One run handles one build variant and has three steps:
//!
//! 1. **Discovery** ([`file`]) expands the root directory, build type and
//!    flavors into an ordered list of candidate locations and picks the first
//!    one that exists. The list always starts from the generic locations (the
//!    parent directory shared with the app module, the module root, `src`) and
//!    ends with flavor/build-type specific ones. [`SortPolicy`] decides whether
//!    the generic file or the most specific override wins.
//! 2. **Extraction** ([`extract`]) reads `project_info` and the first
//!    `client[]` record whose `android_client_info.package_name` equals the
//!    application id. Optional project fields stay optional; a missing
//!    required node fails with the field path.
//! 3. **Rendering** ([`render`]) clears the output directory and writes
//!    `googleServicesOptionsBuilder.kt`. The text is deterministic: the same
//!    inputs always produce the same bytes.
//!
//! Enumerating variants is the host build system's job: it invokes the
//! generator once per variant with that variant's build type, flavors and
//! output directory.
//!
//! # Settings
//!
//! [`load_settings`] resolves the inputs from CLI overrides, `GSERVICES_*`
//! environment variables and a `gservices.toml` file in the module root, in
//! that order of precedence:
//!
//! ```toml
//! application_id = "com.example.app"
//! output_package = "com.example.lib.firebase"
//! build_type = "release"
//! flavors = ["free", "arm64"]
//!
//! [search]
//! order = "deepest-first"
//! ```
//!
//! Unknown keys in the file are rejected with their line number.
//!
//! # Error handling
//!
//! Every failure is fatal and returned as a [`GServicesError`]. Messages are
//! written for the person fixing the project: a missing file lists every
//! searched path, schema errors name the JSON field, and a missing
//! application id shows how to configure it.

pub mod error;
pub mod extract;
pub mod file;
pub mod render;
pub mod types;

mod builder;
#[cfg(feature = "cli")]
mod cli;
mod env;
mod ops;
mod overrides;
mod settings;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{GoogleServices, GoogleServicesBuilder};
#[cfg(feature = "cli")]
pub use cli::{Cli, Command, VariantArgs};
pub use error::GServicesError;
pub use extract::{ConfigDocument, ExtractedConfig};
pub use ops::GenerateOutcome;
pub use render::GenerationSpec;
pub use settings::{
    SETTINGS_FILE_NAME, SearchSettings, Settings, SettingsInput, load_settings, resolve_settings,
};
pub use types::{Action, GOOGLE_SERVICES_JSON, OUTPUT_FILE_NAME, SearchContext, SortPolicy};
