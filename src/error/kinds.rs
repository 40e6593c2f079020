use std::{fmt, io};

/// Crate-wide `Result` type using [`PagerError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, PagerError>;

/// Top-level error type for rowpager operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum PagerError {
    /// Navigation and pagination usage errors.
    Pagination(PaginationError),

    /// A template failed to build a component from an item.
    Construction(String),

    /// The item stream behind a cursor yielded an error.
    Source(String),

    /// Configuration errors.
    Config(ConfigError),

    /// Interactive command errors.
    Command(CommandError),

    /// I/O errors.
    Io(io::Error),

    /// JSON decoding errors.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Pagination-specific errors.
///
/// Stale data sources are not listed here: they are recovered inside the
/// engine and never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// `set_page` was called with a negative page index.
    NegativePageIndex(i64),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors raised while parsing interactive pager commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command word is not known.
    Unknown(String),

    /// The command needs an argument that was not given.
    MissingArgument(&'static str),

    /// The argument could not be parsed.
    InvalidArgument { command: &'static str, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for PagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagerError::Pagination(e) => write!(f, "Pagination error: {e}"),
            PagerError::Construction(msg) => write!(f, "Failed to build component: {msg}"),
            PagerError::Source(msg) => write!(f, "Data source error: {msg}"),
            PagerError::Config(e) => write!(f, "Configuration error: {e}"),
            PagerError::Command(e) => write!(f, "{e}"),
            PagerError::Io(e) => write!(f, "I/O error: {e}"),
            PagerError::Json(e) => write!(f, "JSON error: {e}"),
            PagerError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationError::NegativePageIndex(n) => {
                write!(f, "Page index must not be negative (got {n})")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => {
                write!(f, "Unknown command: {word} (type 'help' for a list)")
            }
            CommandError::MissingArgument(cmd) => write!(f, "'{cmd}' needs an argument"),
            CommandError::InvalidArgument { command, value } => {
                write!(f, "Invalid argument '{value}' for '{command}'")
            }
        }
    }
}

impl std::error::Error for PagerError {}
impl std::error::Error for PaginationError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for CommandError {}

/* ========================= Conversions to PagerError ========================= */

impl From<io::Error> for PagerError {
    fn from(err: io::Error) -> Self {
        PagerError::Io(err)
    }
}

impl From<serde_json::Error> for PagerError {
    fn from(err: serde_json::Error) -> Self {
        PagerError::Json(err)
    }
}

impl From<toml::de::Error> for PagerError {
    fn from(err: toml::de::Error) -> Self {
        PagerError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for PagerError {
    fn from(err: toml::ser::Error) -> Self {
        PagerError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<PaginationError> for PagerError {
    fn from(err: PaginationError) -> Self {
        PagerError::Pagination(err)
    }
}

impl From<ConfigError> for PagerError {
    fn from(err: ConfigError) -> Self {
        PagerError::Config(err)
    }
}

impl From<CommandError> for PagerError {
    fn from(err: CommandError) -> Self {
        PagerError::Command(err)
    }
}

impl From<String> for PagerError {
    fn from(msg: String) -> Self {
        PagerError::Generic(msg)
    }
}

impl From<&str> for PagerError {
    fn from(msg: &str) -> Self {
        PagerError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_page_display() {
        let err: PagerError = PaginationError::NegativePageIndex(-2).into();
        assert_eq!(
            err.to_string(),
            "Pagination error: Page index must not be negative (got -2)"
        );
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::InvalidArgument {
            command: "page",
            value: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid argument 'x' for 'page'");
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: PagerError = toml::from_str::<toml::Table>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, PagerError::Config(ConfigError::InvalidFormat(_))));
    }
}
