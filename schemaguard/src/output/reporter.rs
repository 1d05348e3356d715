//! Formatting of per-object outcomes and the run summary.

use serde::Serialize;

use crate::core::Outcome;
use crate::errors::SchemaguardError;
use crate::validation::ValidationStats;

/// Marks a valid object.
pub const GLYPH_CHECK: &str = "\u{2714}";
/// Marks an invalid object or a failed lookup.
pub const GLYPH_CROSS: &str = "\u{2718}";
/// Marks an object without a schema.
pub const GLYPH_QUESTION: &str = "?";

/// ANSI escape sequences used around report blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    green: &'static str,
    red: &'static str,
    dim: &'static str,
    reset: &'static str,
}

impl Palette {
    /// Green for valid, red for invalid and errors, dim for unknown.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            green: "\x1b[32m",
            red: "\x1b[31m",
            dim: "\x1b[2m",
            reset: "\x1b[0m",
        }
    }

    /// No escape sequences at all.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            green: "",
            red: "",
            dim: "",
            reset: "",
        }
    }

    /// Picks a palette from a color flag.
    #[must_use]
    pub const fn for_colors(colors: bool) -> Self {
        if colors {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::plain()
    }
}

/// Formats outcomes as text blocks ending in a newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    palette: Palette,
}

impl Reporter {
    /// Creates a reporter.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Formats one object's outcome.
    ///
    /// Invalid outcomes list each violation on its own indented line; the
    /// color reset comes after the last one.
    #[must_use]
    pub fn format(&self, name: &str, outcome: &Outcome) -> String {
        let Palette {
            green,
            red,
            dim,
            reset,
        } = self.palette;

        match outcome {
            Outcome::Valid => format!("{green}{GLYPH_CHECK} {name} is valid{reset}\n"),
            Outcome::Unknown => {
                format!("{dim}{GLYPH_QUESTION} {name}: no schema found, cannot validate{reset}\n")
            }
            Outcome::Error(message) => {
                format!("{red}{GLYPH_CROSS} {name}: schema fetch error {message}{reset}\n")
            }
            Outcome::Invalid(violations) => {
                let mut block = format!("{red}{GLYPH_CROSS} {name} is invalid");
                for violation in violations {
                    block.push_str("\n\t- ");
                    block.push_str(violation);
                }
                block.push_str(reset);
                block.push('\n');
                block
            }
        }
    }

    /// Formats the run summary as a YAML document.
    pub fn format_summary(&self, stats: &ValidationStats) -> Result<String, SchemaguardError> {
        #[derive(Serialize)]
        struct Summary<'a> {
            stats: &'a ValidationStats,
        }

        let body = serde_yaml::to_string(&Summary { stats })?;
        Ok(format!("---\n{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_lines() {
        let reporter = Reporter::new(Palette::plain());
        assert_eq!(
            reporter.format("ConfigMap a", &Outcome::Valid),
            "\u{2714} ConfigMap a is valid\n"
        );
        assert_eq!(
            reporter.format("Widget w", &Outcome::Unknown),
            "? Widget w: no schema found, cannot validate\n"
        );
        assert_eq!(
            reporter.format("Pod p", &Outcome::Error("fetch v1: refused".to_string())),
            "\u{2718} Pod p: schema fetch error fetch v1: refused\n"
        );
    }

    #[test]
    fn test_invalid_lists_every_violation() {
        let reporter = Reporter::new(Palette::plain());
        let outcome = Outcome::Invalid(vec![
            "spec: required value missing".to_string(),
            "data: expected object, got string".to_string(),
        ]);
        assert_eq!(
            reporter.format("Deployment web", &outcome),
            "\u{2718} Deployment web is invalid\n\t- spec: required value missing\n\t- data: expected object, got string\n"
        );
    }

    #[test]
    fn test_colored_lines_reset_at_end() {
        let reporter = Reporter::new(Palette::colored());
        assert_eq!(
            reporter.format("ConfigMap a", &Outcome::Valid),
            "\x1b[32m\u{2714} ConfigMap a is valid\x1b[0m\n"
        );
        assert_eq!(
            reporter.format("Widget w", &Outcome::Unknown),
            "\x1b[2m? Widget w: no schema found, cannot validate\x1b[0m\n"
        );
        let invalid = reporter.format("Pod p", &Outcome::Invalid(vec!["x".to_string()]));
        assert!(invalid.starts_with("\x1b[31m\u{2718}"));
        assert!(invalid.ends_with("\t- x\x1b[0m\n"));
    }

    #[test]
    fn test_summary_omits_empty_buckets() {
        let stats = ValidationStats {
            valid: 2,
            unknown: vec![],
            invalid: vec!["Deployment web".to_string()],
            errors: vec![],
        };
        let summary = Reporter::default().format_summary(&stats).unwrap();
        assert_eq!(
            summary,
            "---\nstats:\n  valid: 2\n  invalid:\n  - Deployment web\n"
        );
    }
}
