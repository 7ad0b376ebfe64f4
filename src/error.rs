use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Every way a run can end early. The `Display` text of each variant is
/// what gets shown to the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error reading {}: {source}", .path.display())]
    ConfigUnreadable { path: PathBuf, source: io::Error },

    #[error("API key not found in {}!", .path.display())]
    KeyNotFound { path: PathBuf },

    #[error("Error: no input was provided")]
    InputClosed,

    #[error("Error while using the console: {0}")]
    Console(#[source] io::Error),

    #[error("Error while calling Gemini API: {0}")]
    Transport(#[source] reqwest::Error),

    // `body` is the flattened error stream returned by the server
    #[error("API Error: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Error while saving file: {source}")]
    FileWrite { source: io::Error },
}

// The request URL carries the API key, so it never ends up in a message.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.without_url())
    }
}

impl AppError {
    /// True when the remote call produced no usable response.
    pub fn is_api_failure(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Status { .. })
    }

    /// A second line to print after the error itself, if any.
    pub fn follow_up(&self) -> Option<String> {
        match self {
            AppError::ConfigUnreadable { path, .. } => {
                Some(AppError::KeyNotFound { path: path.clone() }.to_string())
            }
            e if e.is_api_failure() => {
                Some("Error: Failed to get a response from the API.".to_string())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_not_found_names_the_file() {
        let err = AppError::KeyNotFound {
            path: PathBuf::from("/tmp/my.env"),
        };
        assert_eq!(err.to_string(), "API key not found in /tmp/my.env!");
        assert!(!err.is_api_failure());
        assert!(err.follow_up().is_none());
    }

    #[test]
    fn unreadable_file_is_followed_by_not_found() {
        let err = AppError::ConfigUnreadable {
            path: PathBuf::from(".env"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(err.to_string(), "Error reading .env: No such file or directory");
        assert_eq!(err.follow_up().as_deref(), Some("API key not found in .env!"));
    }

    #[test]
    fn save_failure_shows_only_the_cause() {
        let err = AppError::FileWrite {
            source: io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        };
        assert_eq!(err.to_string(), "Error while saving file: Permission denied");
        assert!(err.follow_up().is_none());
    }

    #[test]
    fn status_error_reports_body() {
        let err = AppError::Status {
            status: StatusCode::FORBIDDEN,
            body: r#"{"error":{"code":403}}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"API Error: {"error":{"code":403}}"#);
        assert!(err.is_api_failure());
        assert_eq!(
            err.follow_up().as_deref(),
            Some("Error: Failed to get a response from the API.")
        );
    }
}
