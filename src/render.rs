//! Source generation: render the options builder and write it out.
//!
//! The output directory belongs to the generator. Every run removes it and
//! creates it again before writing [`OUTPUT_FILE_NAME`], so files left by a run
//! with different inputs never survive. [`disposable_output_dir`] refuses a
//! directory whose removal would take the module or its configuration with it.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::GServicesError;
use crate::extract::ExtractedConfig;
use crate::file;
use crate::types::{BUILDER_FUNCTION_NAME, OUTPUT_FILE_NAME};

/// Everything needed to write one generated file.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSpec {
    pub output_package: String,
    pub output_directory: PathBuf,
    pub fields: ExtractedConfig,
}

/// Render the Kotlin source for `fields` in `package`.
///
/// Pure and deterministic. Absent optional values render as the `null`
/// literal, which `FirebaseOptions.Builder` accepts for both setters.
pub fn render_source(package: &str, fields: &ExtractedConfig) -> String {
    let setters = [
        ("setApiKey", Some(fields.api_key.as_str())),
        ("setProjectId", Some(fields.project_id.as_str())),
        ("setApplicationId", Some(fields.application_id.as_str())),
        ("setDatabaseUrl", fields.database_url.as_deref()),
        ("setStorageBucket", fields.storage_bucket.as_deref()),
    ];
    let calls: String = setters
        .iter()
        .map(|(setter, value)| format!("\n        .{setter}({})", kotlin_literal(*value)))
        .collect();

    format!(
        "// Generated from google-services.json. Do not edit.\n\
         package {package}\n\
         \n\
         import com.google.firebase.FirebaseOptions\n\
         \n\
         fun {BUILDER_FUNCTION_NAME}(): FirebaseOptions.Builder =\n    \
         FirebaseOptions.Builder(){calls}\n"
    )
}

/// Clear the output directory, recreate it and write the rendered source.
///
/// The package is checked before anything is removed. Returns the path of
/// the written file.
pub fn generate(spec: &GenerationSpec) -> Result<PathBuf, GServicesError> {
    check_package(&spec.output_package)?;
    recreate_dir(&spec.output_directory)?;

    let path = spec.output_directory.join(OUTPUT_FILE_NAME);
    let source = render_source(&spec.output_package, &spec.fields);
    std::fs::write(&path, source).map_err(|e| GServicesError::IoError {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), package = %spec.output_package, "wrote options builder");
    Ok(path)
}

/// Normalized `dir`, provided that clearing it leaves every `kept` path alone.
///
/// A directory equal to, or above, any kept path fails with
/// [`GServicesError::OutputDirectory`]. Paths are compared lexically.
pub fn disposable_output_dir(dir: &Path, kept: &[&Path]) -> Result<PathBuf, GServicesError> {
    let dir = file::normalize(dir);
    match kept.iter().find(|path| file::normalize(path).starts_with(&dir)) {
        Some(path) => Err(GServicesError::OutputDirectory {
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("clearing it would delete {}", path.display()),
            ),
            path: dir,
        }),
        None => Ok(dir),
    }
}

/// `package` must be dot-separated identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
fn check_package(package: &str) -> Result<(), GServicesError> {
    let is_identifier = |segment: &str| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    if package.split('.').all(is_identifier) {
        return Ok(());
    }
    Err(GServicesError::InvalidValue {
        key: "output_package".into(),
        reason: format!("{package:?} is not a Kotlin package name"),
    })
}

fn recreate_dir(dir: &Path) -> Result<(), GServicesError> {
    let to_error = |e: io::Error| GServicesError::OutputDirectory {
        path: dir.to_path_buf(),
        source: e,
    };
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(to_error(e)),
    }
    std::fs::create_dir_all(dir).map_err(to_error)
}

fn kotlin_literal(value: Option<&str>) -> String {
    match value {
        Some(s) => format!("\"{}\"", escape_kotlin(s)),
        None => "null".to_string(),
    }
}

/// Escape text for a Kotlin double-quoted string literal.
fn escape_kotlin(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fields() -> ExtractedConfig {
        ExtractedConfig {
            api_key: "AIzaKey".into(),
            project_id: "demo-project".into(),
            application_id: "1:123:android:abc".into(),
            database_url: Some("https://demo-project.firebaseio.com".into()),
            storage_bucket: None,
        }
    }

    /// Read back the argument of `.{setter}(...)` from rendered source.
    fn read_argument(source: &str, setter: &str) -> Option<String> {
        let needle = format!(".{setter}(");
        let line = source.lines().find(|l| l.trim_start().starts_with(&needle))?;
        let arg = line.trim_start().strip_prefix(&needle)?.strip_suffix(')')?;
        if arg == "null" {
            return None;
        }
        let body = arg.strip_prefix('"')?.strip_suffix('"')?;
        let mut out = String::new();
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                other => out.push(other),
            }
        }
        Some(out)
    }

    fn read_back(source: &str) -> ExtractedConfig {
        ExtractedConfig {
            api_key: read_argument(source, "setApiKey").unwrap(),
            project_id: read_argument(source, "setProjectId").unwrap(),
            application_id: read_argument(source, "setApplicationId").unwrap(),
            database_url: read_argument(source, "setDatabaseUrl"),
            storage_bucket: read_argument(source, "setStorageBucket"),
        }
    }

    #[test]
    fn renders_expected_source() {
        let source = render_source("com.example.app", &fields());
        assert_eq!(
            source,
            "// Generated from google-services.json. Do not edit.\n\
             package com.example.app\n\
             \n\
             import com.google.firebase.FirebaseOptions\n\
             \n\
             fun googleServicesOptionsBuilder(): FirebaseOptions.Builder =\n    \
             FirebaseOptions.Builder()\n        \
             .setApiKey(\"AIzaKey\")\n        \
             .setProjectId(\"demo-project\")\n        \
             .setApplicationId(\"1:123:android:abc\")\n        \
             .setDatabaseUrl(\"https://demo-project.firebaseio.com\")\n        \
             .setStorageBucket(null)\n"
        );
    }

    #[test]
    fn absent_optional_renders_bare_null() {
        let source = render_source("p", &fields());
        assert!(source.contains(".setStorageBucket(null)"));
        assert!(!source.contains("\"null\""));
    }

    #[test]
    fn rendered_literals_read_back() {
        let original = ExtractedConfig {
            api_key: r#"key"with\quotes"#.into(),
            project_id: "price-$5-${x}".into(),
            application_id: "tab\there\nnewline\r".into(),
            database_url: None,
            storage_bucket: Some(r"C:\bucket\".into()),
        };
        let source = render_source("com.example", &original);
        assert_eq!(read_back(&source), original);
        assert!(source.contains(r#"price-\$5-\${x}"#));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render_source("a.b", &fields()), render_source("a.b", &fields()));
    }

    #[test]
    fn generate_writes_fixed_file_name() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("generated");
        let spec = GenerationSpec {
            output_package: "com.example.app".into(),
            output_directory: out.clone(),
            fields: fields(),
        };

        let path = generate(&spec).unwrap();
        assert_eq!(path, out.join("googleServicesOptionsBuilder.kt"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("package com.example.app\n"));
        assert!(content.contains("fun googleServicesOptionsBuilder()"));
    }

    #[test]
    fn generate_clears_stale_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("generated");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("stale.kt"), "old").unwrap();
        fs::write(out.join("nested").join("older.kt"), "old").unwrap();

        let spec = GenerationSpec {
            output_package: "p".into(),
            output_directory: out.clone(),
            fields: fields(),
        };
        generate(&spec).unwrap();

        let names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(OUTPUT_FILE_NAME)]);
    }

    #[test]
    fn generate_twice_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let spec = GenerationSpec {
            output_package: "p".into(),
            output_directory: dir.path().join("out"),
            fields: fields(),
        };
        let first = fs::read(generate(&spec).unwrap()).unwrap();
        let second = fs::read(generate(&spec).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_directory_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let spec = GenerationSpec {
            output_package: "p".into(),
            output_directory: blocker.join("out"),
            fields: fields(),
        };
        let result = generate(&spec);
        assert!(matches!(result, Err(GServicesError::OutputDirectory { .. })));
    }

    #[test]
    fn package_must_be_dotted_identifiers() {
        for ok in ["com.example.app", "_internal.v2", "single"] {
            assert!(check_package(ok).is_ok(), "{ok}");
        }
        let bad_packages = [
            "",
            "com..app",
            "com.example.",
            "1com.app",
            "com.ex-ample",
            "com.app\nimport evil",
        ];
        for bad in bad_packages {
            match check_package(bad) {
                Err(GServicesError::InvalidValue { key, .. }) => assert_eq!(key, "output_package"),
                other => panic!("expected InvalidValue for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_package_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("previous.kt"), "old").unwrap();

        let spec = GenerationSpec {
            output_package: "com.example\npackage other".into(),
            output_directory: out.clone(),
            fields: fields(),
        };
        assert!(matches!(
            generate(&spec),
            Err(GServicesError::InvalidValue { .. })
        ));
        assert!(out.join("previous.kt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn output_dir_may_not_hold_kept_paths() {
        let root = Path::new("/p/lib");
        let json = Path::new("/p/google-services.json");
        let kept = [root, json];

        for dir in ["/p/lib", "/p/lib/", "/p/lib/.", "/p", "/p/lib/..", "/", "/p/lib/src/../.."] {
            assert!(
                matches!(
                    disposable_output_dir(Path::new(dir), &kept),
                    Err(GServicesError::OutputDirectory { .. })
                ),
                "{dir} should be rejected"
            );
        }
        assert_eq!(
            disposable_output_dir(Path::new("/p/lib/build/./gen"), &kept).unwrap(),
            PathBuf::from("/p/lib/build/gen")
        );
        assert!(disposable_output_dir(Path::new("/p/other"), &kept).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn output_dir_containing_json_file_rejected() {
        let root = Path::new("/p/lib");
        let json = Path::new("/p/lib/src/free/google-services.json");
        let err = disposable_output_dir(Path::new("/p/lib/src"), &[root, json]).unwrap_err();
        assert!(err.to_string().contains("google-services.json"));
    }
}
