#![doc = "Error types."]
use http::StatusCode;

/// Maximum number of body bytes kept in [`Error::Http`].
pub const BODY_SNIPPET_LIMIT: usize = 512;

/// A malformed or structurally invalid wire payload.
///
/// `path` is a JSON-path-like hint (`$.parameter[1].part[0]`) and `line`/`column`
/// are set when the failure came from the JSON parser itself.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}{}: {message}", position(.line, .column))]
pub struct DecodeError {
    pub path: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
}

impl DecodeError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), line: None, column: None, message: message.into() }
    }
    pub fn missing_field(path: impl Into<String>, name: &str) -> Self {
        Self::new(path, format!("missing required field `{name}`"))
    }
    pub fn from_json(path: impl Into<String>, err: &serde_json::Error) -> Self {
        // serde_json reports line 0 for errors that did not come from the parser
        let (line, column) =
            if err.line() == 0 { (None, None) } else { (Some(err.line()), Some(err.column())) };
        Self { path: path.into(), line, column, message: err.to_string() }
    }
}

fn position(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" (line {line}, column {column})"),
        _ => String::new(),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("http status {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("decode error at {0}")]
    Decode(#[from] DecodeError),
    #[error("network error: {0}")]
    Network(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Builds an [`Error::Http`] keeping at most [`BODY_SNIPPET_LIMIT`] bytes of the body.
    pub fn http(status: StatusCode, body: &[u8]) -> Self {
        let snippet = &body[..body.len().min(BODY_SNIPPET_LIMIT)];
        Self::Http { status, body: String::from_utf8_lossy(snippet).into_owned() }
    }
    /// The HTTP status, if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::InvalidArgument(format!("failed to build request: {err}"))
    }
}

impl From<serde_html_form::ser::Error> for Error {
    fn from(err: serde_html_form::ser::Error) -> Self {
        Self::InvalidArgument(format!("failed to encode form: {err}"))
    }
}

/// Type alias to use this library's [`Error`] type in a [`Result`](core::result::Result).
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_truncates_body() {
        let body = vec![b'x'; BODY_SNIPPET_LIMIT * 2];
        match Error::http(StatusCode::BAD_GATEWAY, &body) {
            Error::Http { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body.len(), BODY_SNIPPET_LIMIT);
            }
            err => panic!("must be Error::Http, got {err:?}"),
        }
        let err = Error::http(StatusCode::INTERNAL_SERVER_ERROR, &[]);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "http status 500 Internal Server Error: ");
    }

    #[test]
    fn decode_error_from_parser_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>(r#"{"invalid json"}"#)
            .expect_err("must be error");
        let err = DecodeError::from_json("$", &err);
        assert_eq!(err.line, Some(1));
        assert!(err.column.is_some());
        assert!(err.to_string().starts_with("$ (line 1, column "));
    }

    #[test]
    fn decode_error_without_position() {
        let err = DecodeError::missing_field("$.parameter", "type");
        assert_eq!(err.to_string(), "$.parameter: missing required field `type`");
        let err = Error::from(DecodeError { line: Some(3), column: Some(7), ..err });
        assert_eq!(
            err.to_string(),
            "decode error at $.parameter (line 3, column 7): missing required field `type`"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
