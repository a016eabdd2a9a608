//! Error type for event searches.

use std::error::Error;
use std::fmt::{Display, Formatter};

use astrocal_ephem::ProviderError;

/// Errors from the localization engine or a classifier.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// A config, window, or body combination failed validation.
    InvalidConfig(&'static str),
    /// The ephemeris provider failed; fatal for the surrounding run.
    Provider(ProviderError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Provider(e) => write!(f, "ephemeris provider error: {e}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProviderError> for SearchError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}
