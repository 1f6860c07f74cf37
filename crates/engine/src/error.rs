use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrubError {
    /// Blacklist locator missing or unusable, blacklist table without any
    /// recognizable column, or a config file that fails to parse/validate.
    Config(String),
    /// A loaded table is missing one or more required columns.
    InputValidation {
        table: String,
        missing: Vec<String>,
        found: Vec<String>,
    },
    /// Table unreadable, or blacklist fetch failed.
    Io(String),
    /// Serialization of the working set failed.
    Export(String),
}

impl ScrubError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

impl fmt::Display for ScrubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::InputValidation { table, missing, found } => {
                let missing = missing
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                if found.is_empty() {
                    write!(f, "{table}: missing column(s) {missing} (table has no headers)")
                } else {
                    write!(
                        f,
                        "{table}: missing column(s) {missing} (found: {})",
                        found.join(", ")
                    )
                }
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Export(msg) => write!(f, "export error: {msg}"),
        }
    }
}

impl std::error::Error for ScrubError {}
