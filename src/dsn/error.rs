//! Error type for DSN parsing.

use thiserror::Error;

/// Errors produced while decomposing a DSN.
///
/// # Examples
///
/// ```
/// use cumulus::dsn::DsnError;
///
/// let error = DsnError::malformed("mysql://host:port/db", "invalid port");
/// assert_eq!(
///     error.to_string(),
///     "malformed DSN `mysql://host:port/db`: invalid port"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DsnError {
    /// The URL cannot be split into its components.
    #[error("malformed DSN `{url}`: {reason}")]
    MalformedUrl {
        /// The offending URL
        url: String,
        /// What made the URL unusable
        reason: String,
    },
}

impl DsnError {
    /// Creates a [`DsnError::MalformedUrl`].
    #[must_use]
    pub fn malformed(url: &str, reason: &str) -> Self {
        Self::MalformedUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
