//! Address engine error types
//!
//! Default policy: soft failure. Lookup and retrieve errors are logged and
//! degraded to "no suggestions" by [`crate::lookup::AddressLookup`]; only the
//! raw API trait and the validation flow surface them to callers.

use thiserror::Error;

/// Error category for structured logging and behavior mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// `address.toml` or env misconfigured
    ConfigError,
    /// Transport failures or non-200 responses from the lookup endpoints
    LookupError,
    /// Response bodies that do not match the expected shape
    DecodeError,
    /// A validation flow event that is not legal in the current state
    FlowError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::LookupError => "LOOKUP_ERROR",
            Self::DecodeError => "DECODE_ERROR",
            Self::FlowError => "FLOW_ERROR",
        }
    }

    /// Whether the user can still continue with a manually entered address
    pub fn manual_entry_recoverable(&self) -> bool {
        matches!(self, Self::LookupError | Self::DecodeError)
    }
}

/// Address engine error with category and context
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("lookup error: {message}")]
    Lookup {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("invalid transition: cannot {event} while {state}")]
    InvalidTransition {
        event: &'static str,
        state: &'static str,
    },
}

impl AddressError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::ConfigError,
            Self::Lookup { .. } => ErrorCategory::LookupError,
            Self::Decode { .. } => ErrorCategory::DecodeError,
            Self::InvalidTransition { .. } => ErrorCategory::FlowError,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a lookup error
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lookup error with source
    pub fn lookup_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Lookup {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error with source
    pub fn decode_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for address engine operations
pub type Result<T> = std::result::Result<T, AddressError>;
