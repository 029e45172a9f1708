//! Result types returned to the caller for display.

use std::fmt;
use std::path::PathBuf;

/// Result of a generator operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// The options builder was written.
    Generated {
        json_file: PathBuf,
        output_file: PathBuf,
        package: String,
    },
    /// Candidate locations in search order, each with whether it exists.
    Candidates { entries: Vec<(PathBuf, bool)> },
}

impl fmt::Display for GenerateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateOutcome::Generated {
                json_file,
                output_file,
                package,
            } => write!(
                f,
                "Generated {} (package {package}) from {}",
                output_file.display(),
                json_file.display()
            ),
            GenerateOutcome::Candidates { entries } => {
                for (i, (path, exists)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    let mark = if *exists { "*" } else { " " };
                    write!(f, "{mark} {}", path.display())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_display() {
        let outcome = GenerateOutcome::Generated {
            json_file: "/p/google-services.json".into(),
            output_file: "/p/lib/build/googleServicesOptionsBuilder.kt".into(),
            package: "com.example.app".into(),
        };
        assert_eq!(
            outcome.to_string(),
            "Generated /p/lib/build/googleServicesOptionsBuilder.kt (package com.example.app) from /p/google-services.json"
        );
    }

    #[test]
    fn candidates_display_marks_existing() {
        let outcome = GenerateOutcome::Candidates {
            entries: vec![
                ("/google-services.json".into(), false),
                ("/root/google-services.json".into(), true),
            ],
        };
        assert_eq!(
            outcome.to_string(),
            "  /google-services.json\n* /root/google-services.json"
        );
    }
}
