//! Discovery of `google-services.json` for one build variant.
//!
//! # Candidates
//!
//! A [`SearchContext`] is expanded into relative directory fragments:
//!
//! - `..`: the parent of the module root. A library module usually lives next
//!   to the application module and shares its file.
//! - `.` and `src`: the module itself.
//! - `src/<buildType>`, then `src/<flavor>` and `src/<buildType>/<flavor>` for
//!   every flavor in declaration order.
//! - The flavor chain (`free` + `arm64` = `freeArm64`) combined with the build
//!   type: `src/<chain>/<buildType>`, `src/<buildType>/<chain>` and the variant
//!   source set `src/<chain><BuildType>`.
//!
//! Each fragment is joined with the root and the file name, normalized
//! lexically and deduplicated. The list is then ordered by depth according to
//! the [`SortPolicy`]. Computing the list never touches the filesystem.
//!
//! # Resolution
//!
//! [`resolve_existing_file`] probes the ordered list and returns the first
//! regular file. When nothing exists the error carries the whole list so the
//! user can see every location that was tried.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::GServicesError;
use crate::types::{SearchContext, SortPolicy};

/// Relative directory fragments for a build type and its flavors, in
/// generation order, without duplicates.
pub fn candidate_fragments(build_type: &str, flavor_names: &[String]) -> Vec<String> {
    let mut fragments = vec![
        "..".to_string(),
        ".".to_string(),
        "src".to_string(),
        format!("src/{build_type}"),
    ];
    for flavor in flavor_names {
        fragments.push(format!("src/{flavor}"));
        fragments.push(format!("src/{build_type}/{flavor}"));
    }
    if !flavor_names.is_empty() {
        let chain = flavor_chain(flavor_names);
        fragments.push(format!("src/{chain}/{build_type}"));
        fragments.push(format!("src/{build_type}/{chain}"));
        fragments.push(format!("src/{chain}{}", capitalize(build_type)));
    }

    let mut seen = HashSet::new();
    fragments.retain(|f| seen.insert(f.clone()));
    fragments
}

/// Ordered, deduplicated absolute candidate paths for `ctx`.
pub fn resolve_candidates(ctx: &SearchContext) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<PathBuf> = candidate_fragments(&ctx.build_type, &ctx.flavor_names)
        .iter()
        .map(|fragment| normalize(&ctx.root_dir.join(fragment).join(&ctx.file_name)))
        .filter(|path| seen.insert(path.clone()))
        .collect();

    match ctx.sort_policy {
        SortPolicy::ShallowestFirst => candidates.sort_by_key(|p| depth(p)),
        SortPolicy::DeepestFirst => candidates.sort_by_key(|p| Reverse(depth(p))),
    }
    candidates
}

/// Candidates that exist as regular files, in search order.
pub fn existing_files(ctx: &SearchContext) -> Vec<PathBuf> {
    resolve_candidates(ctx)
        .into_iter()
        .filter(|path| {
            let found = path.is_file();
            debug!(path = %path.display(), found, "probed candidate");
            found
        })
        .collect()
}

/// The first candidate that exists as a regular file.
///
/// Returns [`GServicesError::ConfigurationMissing`] listing every searched
/// path when none does.
pub fn resolve_existing_file(ctx: &SearchContext) -> Result<PathBuf, GServicesError> {
    let candidates = resolve_candidates(ctx);
    for path in &candidates {
        let found = path.is_file();
        debug!(path = %path.display(), found, "probed candidate");
        if found {
            return Ok(path.clone());
        }
    }
    Err(GServicesError::ConfigurationMissing {
        file_name: ctx.file_name.clone(),
        searched: candidates,
    })
}

/// Number of named components, the sort key for candidates.
pub fn depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

/// Resolve `.` and `..` without consulting the filesystem.
///
/// `..` at the filesystem root stays at the root.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn flavor_chain(flavor_names: &[String]) -> String {
    flavor_names
        .iter()
        .enumerate()
        .map(|(i, flavor)| {
            if i == 0 {
                decapitalize(flavor)
            } else {
                capitalize(flavor)
            }
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
