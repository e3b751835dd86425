//! Error taxonomy for the Trello client.
//!
//! # Design
//! Validation variants (`MissingParameter`, `InvalidParameter`,
//! `InvalidArgument`, `UndefinedOperation`) are raised before a request is
//! built, so a failing call never reaches the network. The status-code
//! variants are produced by the response stage in `middleware` and carry the
//! server's message. `Transport` wraps failures of the HTTP agent itself,
//! keeping the original message.
//!
//! Nothing in the crate retries or swallows an error: every variant surfaces
//! to the caller unchanged, except that the domain-object layer re-wraps an
//! unsupported create/update/remove into `UnsupportedOperation`.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TrelloError>;

/// Errors returned by every layer of the client.
#[derive(Debug, Error)]
pub enum TrelloError {
    /// One or more required parameters are absent.
    #[error("{message}")]
    MissingParameter { message: String, names: Vec<String> },

    /// A value falls outside an allow-list, or a field is not declared on the
    /// resource.
    #[error(
        "The \"{parameter}\" parameter may contain only values within \"{}\". \"{value}\" given.",
        .allowed.join(", ")
    )]
    InvalidParameter {
        parameter: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A caller-supplied argument is unusable (unknown resource name, bad auth
    /// mode, unsupported config value).
    #[error("{0}")]
    InvalidArgument(String),

    /// An operation or resource name that does not exist was invoked.
    #[error("There is no operation named \"{operation}\" on \"{resource}\".")]
    UndefinedOperation { operation: String, resource: String },

    /// create/update/remove was invoked on a resource that does not allow it.
    #[error("You can't {operation} {resource} objects.")]
    UnsupportedOperation {
        operation: String,
        resource: String,
        #[source]
        source: Box<TrelloError>,
    },

    /// HTTP 400.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// HTTP 401.
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// HTTP 429. The body is never inspected.
    #[error("API rate limit exceeded, wait a second")]
    RateLimited,

    /// HTTP 422 with a structured `errors` list.
    #[error("Validation Failed: {}", .errors.join(", "))]
    ValidationFailed { errors: Vec<String> },

    /// Any other HTTP status >= 400.
    #[error("request failed with HTTP {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Connectivity or protocol failure inside the HTTP agent.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered 2xx but the body lacks something the caller needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A domain object was asked to do something its lifecycle state forbids.
    #[error("cannot {operation} an object in state {state}")]
    InvalidState { operation: String, state: String },

    /// A checklist item was deleted but could not be recreated. `item` holds
    /// the snapshot that was removed so the caller can restore it.
    #[error("checklist item was removed but recreating it failed: {source}")]
    ReplaceFailed {
        item: Box<serde_json::Value>,
        #[source]
        source: Box<TrelloError>,
    },
}

impl TrelloError {
    /// `MissingParameter` for a list of required keys that were not supplied.
    pub fn missing_required(names: Vec<String>) -> Self {
        let message = if names.len() == 1 {
            format!("The \"{}\" parameter is required.", names[0])
        } else {
            format!("The \"{}\" parameters are required.", names.join("\", \""))
        };
        Self::MissingParameter { message, names }
    }

    /// `MissingParameter` for an at-least-one-of group with no member present.
    pub fn missing_one_of(names: Vec<String>) -> Self {
        let message = format!(
            "You need to provide at least one of the following parameters \"{}\".",
            names.join("\", \"")
        );
        Self::MissingParameter { message, names }
    }

    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::PermissionDenied { .. } => Some(401),
            Self::ValidationFailed { .. } => Some(422),
            Self::RateLimited => Some(429),
            Self::RequestFailed { status, .. } => Some(*status),
            Self::UnsupportedOperation { source, .. } | Self::ReplaceFailed { source, .. } => {
                source.status()
            }
            _ => None,
        }
    }

    /// True when the remote side reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Name of the parameter the error is about, when there is exactly one.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { parameter, .. } => Some(parameter),
            Self::MissingParameter { names, .. } if names.len() == 1 => Some(&names[0]),
            _ => None,
        }
    }
}

impl From<ureq::Error> for TrelloError {
    fn from(err: ureq::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_names_every_key() {
        let err = TrelloError::missing_required(vec!["name".into(), "idBoard".into()]);
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("idBoard"));
        assert_eq!(err.parameter(), None);
    }

    #[test]
    fn single_missing_key_is_the_parameter() {
        let err = TrelloError::missing_required(vec!["idBoard".into()]);
        assert_eq!(err.parameter(), Some("idBoard"));
        assert_eq!(err.to_string(), "The \"idBoard\" parameter is required.");
    }

    #[test]
    fn invalid_parameter_lists_allowed_values() {
        let err = TrelloError::InvalidParameter {
            parameter: "filter".into(),
            value: "c".into(),
            allowed: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "The \"filter\" parameter may contain only values within \"a, b\". \"c\" given."
        );
    }

    #[test]
    fn status_is_reported_through_wrappers() {
        let inner = TrelloError::RequestFailed {
            status: 404,
            message: "not found".into(),
        };
        let err = TrelloError::UnsupportedOperation {
            operation: "remove".into(),
            resource: "board".into(),
            source: Box::new(inner),
        };
        assert!(err.is_not_found());
        assert_eq!(TrelloError::RateLimited.status(), Some(429));
        assert_eq!(TrelloError::Transport("boom".into()).status(), None);
    }
}
