use std::path::Path;

use serde::Deserialize;

use crate::error::ScrubError;
use crate::table::{ColumnNames, DEFAULT_COMPANY_COLUMN, DEFAULT_EMAIL_COLUMN};

/// Default blacklist source. Must be replaced before a run.
pub const PLACEHOLDER_SOURCE: &str = "PASTE_BLACKLIST_SHEET_URL_HERE";

/// Fixed name of the exported artifact.
pub const DEFAULT_OUTPUT_FILE: &str = "filtered_results.xlsx";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    pub blacklist: BlacklistConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    /// Sheet URL, CSV URL or local file path.
    pub source: String,
    pub company_column: String,
    pub email_column: String,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            source: PLACEHOLDER_SOURCE.to_string(),
            company_column: DEFAULT_COMPANY_COLUMN.to_string(),
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
        }
    }
}

impl BlacklistConfig {
    pub fn columns(&self) -> ColumnNames {
        ColumnNames {
            company: self.company_column.clone(),
            email: self.email_column.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub company_column: String,
    pub email_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            company_column: DEFAULT_COMPANY_COLUMN.to_string(),
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
        }
    }
}

impl InputConfig {
    pub fn columns(&self) -> ColumnNames {
        ColumnNames {
            company: self.company_column.clone(),
            email: self.email_column.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xlsx => write!(f, "xlsx"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file: String,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_OUTPUT_FILE.to_string(),
            format: OutputFormat::Xlsx,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ScrubConfig {
    /// Parse without validating. Callers that override the source (flags,
    /// environment) validate after applying the override.
    pub fn parse_toml(input: &str) -> Result<Self, ScrubError> {
        toml::from_str(input).map_err(|e| ScrubError::config(format!("cannot parse config: {e}")))
    }

    pub fn from_toml(input: &str) -> Result<Self, ScrubError> {
        let config = Self::parse_toml(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ScrubError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScrubError::io(format!("cannot read {}: {e}", path.display())))?;
        Self::parse_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ScrubError> {
        let source = self.blacklist.source.trim();
        if source.is_empty() {
            return Err(ScrubError::config("blacklist source is empty"));
        }
        if source == PLACEHOLDER_SOURCE {
            return Err(ScrubError::config(
                "blacklist source is still the placeholder; set [blacklist] source or pass --blacklist",
            ));
        }

        if self.blacklist.company_column.trim().is_empty()
            && self.blacklist.email_column.trim().is_empty()
        {
            return Err(ScrubError::config(
                "blacklist needs at least one of company_column / email_column",
            ));
        }

        for (key, value) in [
            ("input.company_column", &self.input.company_column),
            ("input.email_column", &self.input.email_column),
            ("output.file", &self.output.file),
        ] {
            if value.trim().is_empty() {
                return Err(ScrubError::config(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[blacklist]
source = "https://docs.google.com/spreadsheets/d/abc123/edit#gid=42"
company_column = "Employer"
email_column = "Contact"

[input]
company_column = "Company"
email_column = "E-mail"

[output]
file = "out.csv"
format = "csv"
"#;

    #[test]
    fn parse_full() {
        let config = ScrubConfig::from_toml(FULL).unwrap();
        assert_eq!(config.blacklist.company_column, "Employer");
        assert_eq!(config.blacklist.columns().email, "Contact");
        assert_eq!(config.input.columns().company, "Company");
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.file, "out.csv");
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let config = ScrubConfig::from_toml(
            r#"
[blacklist]
source = "blacklist.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.blacklist.company_column, "Company Name");
        assert_eq!(config.input.email_column, "Email");
        assert_eq!(config.output.file, DEFAULT_OUTPUT_FILE);
        assert_eq!(config.output.format, OutputFormat::Xlsx);
    }

    #[test]
    fn reject_placeholder_source() {
        let err = ScrubConfig::from_toml("").unwrap_err();
        assert!(matches!(err, ScrubError::Config(_)));
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn parse_without_validation_keeps_placeholder() {
        let config = ScrubConfig::parse_toml("").unwrap();
        assert_eq!(config.blacklist.source, PLACEHOLDER_SOURCE);
    }

    #[test]
    fn reject_empty_source() {
        let err = ScrubConfig::from_toml("[blacklist]\nsource = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn reject_no_blacklist_columns() {
        let err = ScrubConfig::from_toml(
            r#"
[blacklist]
source = "b.csv"
company_column = ""
email_column = ""
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn reject_unknown_format() {
        let err = ScrubConfig::from_toml("[output]\nformat = \"pdf\"\n").unwrap_err();
        assert!(err.to_string().contains("cannot parse config"));
    }
}
