//! Strict mode for `gservices.toml`.
//!
//! Keys the settings layer does not consume are collected with `serde_ignored`
//! and reported one by one with the line they appear on. When a key looks like
//! a known setting spelled differently (`buildType`, `search.fileName`, a
//! top-level `order`, or a property name from the Gradle plugin extension) the
//! error names the setting that was probably meant.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use confique::Config;

use crate::error::GServicesError;
use crate::overrides;
use crate::settings::Settings;

/// Gradle extension properties and the settings that replace them.
const GRADLE_PROPERTIES: &[(&str, &str)] = &[
    ("googleCloudAppId", "application_id"),
    ("classPackage", "output_package"),
];

/// Reject keys in a settings file that [`Settings`] does not know.
///
/// Malformed TOML, or a known key with a value of the wrong type, is a
/// [`GServicesError::SettingsParse`].
pub fn check_settings_file(content: &str, path: &Path) -> Result<(), GServicesError> {
    let mut ignored = Vec::new();
    let _: <Settings as Config>::Layer =
        serde_ignored::deserialize(toml::Deserializer::new(content), |key| {
            ignored.push(key.to_string())
        })
        .map_err(|e| GServicesError::SettingsParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    if ignored.is_empty() {
        return Ok(());
    }

    let lines = key_lines(content);
    let known = overrides::valid_keys(&Settings::META);
    let errors = ignored
        .into_iter()
        .map(|key| GServicesError::UnknownSetting {
            line: lines.get(&key).copied().unwrap_or(0),
            suggestion: suggest(&key, &known),
            path: path.to_path_buf(),
            key,
        })
        .collect();
    Err(GServicesError::UnknownSettings(errors))
}

/// The known setting `key` most likely stands for.
fn suggest(key: &str, known: &HashSet<String>) -> Option<String> {
    if let Some((_, setting)) = GRADLE_PROPERTIES.iter().find(|(name, _)| *name == key) {
        return Some(setting.to_string());
    }

    let wanted = squash(key);
    if let Some(setting) = known.iter().filter(|k| squash(k) == wanted).min() {
        return Some(setting.clone());
    }

    // Same leaf under another section.
    let wanted = squash(leaf(key));
    known
        .iter()
        .filter(|k| squash(leaf(k)) == wanted)
        .min()
        .cloned()
}

/// Lowercase with `_` and `-` removed: `fileName`, `file-name` and
/// `file_name` all become `filename`.
fn squash(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn leaf(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

/// 1-based line of each `key = value` assignment, by full dotted key.
///
/// Follows `[section]` headers and dotted or quoted left-hand sides. The
/// first assignment of a key wins. Lines inside multi-line strings are not
/// told apart from assignments.
fn key_lines(content: &str) -> HashMap<String, usize> {
    let mut lines = HashMap::new();
    let mut section = String::new();

    for (number, line) in content.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            let header = line.trim_start_matches('[').split(']').next().unwrap_or("");
            section = dotted(header);
            continue;
        }
        let Some((lhs, _)) = line.split_once('=') else {
            continue;
        };
        let key = match dotted(lhs) {
            key if section.is_empty() => key,
            key => format!("{section}.{key}"),
        };
        lines.entry(key).or_insert(number);
    }
    lines
}

/// `search . "file_name"` as `search.file_name`.
fn dotted(raw: &str) -> String {
    raw.split('.')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/project/gservices.toml")
    }

    /// `(key, line, suggestion)` for every unknown key in `content`.
    fn unknown(content: &str) -> Vec<(String, usize, Option<String>)> {
        match check_settings_file(content, &path()) {
            Err(GServicesError::UnknownSettings(errors)) => errors
                .into_iter()
                .map(|e| match e {
                    GServicesError::UnknownSetting {
                        key,
                        line,
                        suggestion,
                        ..
                    } => (key, line, suggestion),
                    other => panic!("expected UnknownSetting, got {other:?}"),
                })
                .collect(),
            other => panic!("expected UnknownSettings, got {other:?}"),
        }
    }

    fn one(
        key: &str,
        line: usize,
        suggestion: Option<&str>,
    ) -> Vec<(String, usize, Option<String>)> {
        vec![(key.to_string(), line, suggestion.map(str::to_string))]
    }

    #[test]
    fn known_settings_pass() {
        let content = r#"
application_id = "com.example.app"
build_type = "release"
flavors = ["free"]

[search]
order = "deepest-first"
"#;
        assert!(check_settings_file(content, &path()).is_ok());
        assert!(check_settings_file("", &path()).is_ok());
    }

    #[test]
    fn gradle_property_names_point_to_settings() {
        let content = "build_type = \"debug\"\ngoogleCloudAppId = \"com.example.app\"\n";
        assert_eq!(unknown(content), one("googleCloudAppId", 2, Some("application_id")));

        let content = "classPackage = \"com.example.lib\"\n";
        assert_eq!(unknown(content), one("classPackage", 1, Some("output_package")));
    }

    #[test]
    fn camel_and_kebab_case_suggest_snake_case() {
        assert_eq!(unknown("buildType = \"release\"\n"), one("buildType", 1, Some("build_type")));
        assert_eq!(
            unknown("[search]\nfile-name = \"x.json\"\n"),
            one("search.file-name", 2, Some("search.file_name"))
        );
    }

    #[test]
    fn setting_in_wrong_section_suggests_its_home() {
        let content = "order = \"deepest-first\"\n[search]\norder = \"deepest-first\"\n";
        assert_eq!(unknown(content), one("order", 1, Some("search.order")));
    }

    #[test]
    fn unrelated_key_has_no_suggestion() {
        let content = "application_id = \"a\"\n[search]\ndepth = 3\n";
        assert_eq!(unknown(content), one("search.depth", 3, None));
    }

    #[test]
    fn every_unknown_key_is_reported() {
        let content = "googleCloudAppId = \"a\"\nclassPackage = \"b\"\n";
        let keys: Vec<_> = unknown(content).into_iter().map(|(k, ..)| k).collect();
        assert_eq!(keys, vec!["googleCloudAppId", "classPackage"]);
    }

    #[test]
    fn wrong_value_type_is_a_parse_error() {
        let result = check_settings_file("flavors = \"free\"\n", &path());
        assert!(matches!(result, Err(GServicesError::SettingsParse { .. })));
        let result = check_settings_file("build_type = ", &path());
        assert!(matches!(result, Err(GServicesError::SettingsParse { .. })));
    }

    #[test]
    fn key_lines_follow_sections_and_dotted_keys() {
        let content = "\
# comment = not a key
build_type = \"debug\"
search.order = \"deepest-first\"

[search] # trailing comment
\"file_name\" = \"x.json\"
";
        let lines = key_lines(content);
        assert_eq!(lines["build_type"], 2);
        assert_eq!(lines["search.order"], 3);
        assert_eq!(lines["search.file_name"], 6);
        assert!(!lines.contains_key("comment"));
    }
}
