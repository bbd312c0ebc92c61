//! Error types for the research assistant.
//!
//! [`ClientError`] describes what went wrong on the wire. [`AssistantError`]
//! adds which upstream [`Service`] was being called, so user-facing messages
//! can point at the right API key or endpoint.

use std::fmt;
use std::time::Duration;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// 429 response
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// 404 response
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// 400 response, or an error code inside a 200 response body
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// 5xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },
}

impl ClientError {
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Whether the server refused our credentials.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status: 401 | 403, .. })
    }

    const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Middleware(_))
    }
}

/// Upstream services the assistant calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    SemanticScholar,
    LanguageModel,
    WebSearch,
    VectorDatabase,
}

impl Service {
    /// Environment variable that configures access to this service.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::SemanticScholar => "SEMANTIC_SCHOLAR_API_KEY",
            Self::LanguageModel => "OPENAI_API_KEY",
            Self::WebSearch => "DUCKDUCKGO_BASE_URL",
            Self::VectorDatabase => "ZILLIZ_CLOUD_URI",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SemanticScholar => "Semantic Scholar",
            Self::LanguageModel => "Language model",
            Self::WebSearch => "Web search",
            Self::VectorDatabase => "Vector database",
        })
    }
}

/// Errors from assistant operations (pipeline, tools, chat).
#[derive(thiserror::Error, Debug)]
pub enum AssistantError {
    /// A call to an upstream service failed
    #[error("{service} request failed: {source}")]
    Upstream {
        service: Service,
        #[source]
        source: ClientError,
    },

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation needs a service that is not configured
    #[error("{0} is not configured")]
    Unavailable(Service),
}

impl AssistantError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    #[must_use]
    pub const fn unavailable(service: Service) -> Self {
        Self::Unavailable(service)
    }

    #[must_use]
    pub const fn upstream(service: Service, source: ClientError) -> Self {
        Self::Upstream { service, source }
    }

    /// A Semantic Scholar failure. Usable as `map_err(AssistantError::semantic_scholar)`.
    #[must_use]
    pub const fn semantic_scholar(source: ClientError) -> Self {
        Self::upstream(Service::SemanticScholar, source)
    }

    #[must_use]
    pub const fn llm(source: ClientError) -> Self {
        Self::upstream(Service::LanguageModel, source)
    }

    #[must_use]
    pub const fn web_search(source: ClientError) -> Self {
        Self::upstream(Service::WebSearch, source)
    }

    #[must_use]
    pub const fn vector_db(source: ClientError) -> Self {
        Self::upstream(Service::VectorDatabase, source)
    }

    /// The failing upstream service, if any.
    #[must_use]
    pub const fn service(&self) -> Option<Service> {
        match self {
            Self::Upstream { service, .. } | Self::Unavailable(service) => Some(*service),
            _ => None,
        }
    }

    /// Convert to a user-friendly error message.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Upstream { service, source: ClientError::RateLimited { retry_after } } => {
                format!("{service} is rate limiting requests. Please wait {retry_after:?} before retrying.")
            }
            Self::Upstream { service, source } if source.is_auth_failure() => {
                format!("{service} rejected the credentials. Check {}.", service.env_var())
            }
            Self::Upstream { service, source } if source.is_unreachable() => {
                format!("Could not reach {service}: {source}")
            }
            Self::Upstream { service: Service::VectorDatabase, source: ClientError::BadRequest { message } } => {
                format!("Vector database rejected the request ({message}). Check that the collection exists.")
            }
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::Unavailable(service) => {
                format!("{service} is not configured. Set {}.", service.env_var())
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for assistant operations.
pub type AssistantResult<T> = Result<T, AssistantError>;
