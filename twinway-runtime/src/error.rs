use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tonic::Code;

/// Helper to create a JSON error response with a standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// Failure to build a request message from an inbound HTTP request.
#[derive(Debug, thiserror::Error)]
pub enum UnmarshalError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("invalid value `{value}` for field `{field}`: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("field `{0}` is not a message")]
    NotAMessage(String),

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("couldn't read request body: {0}")]
    Body(String),

    #[error("couldn't extract path parameters: {0}")]
    PathParams(String),

    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<UnmarshalError>,
    },
}

impl UnmarshalError {
    /// Wrap with a description of the step that failed.
    pub fn context(self, context: &'static str) -> Self {
        UnmarshalError::Context {
            context,
            source: Box::new(self),
        }
    }
}

/// HTTP-facing error returned by generated unmarshalers and handlers.
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a gRPC status onto the HTTP status conventionally used for it.
    pub fn from_status(status: &tonic::Status) -> Self {
        Self::new(http_status(status.code()), status.message())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// HTTP status for a gRPC code.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        // Client closed request.
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            StatusCode::BAD_REQUEST
        }
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        error_response(self.status, self.message)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::fmt::Debug for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for HttpError {}

/// Reject a request whose message couldn't be built.
pub fn transform_unmarshaler_error(err: UnmarshalError) -> HttpError {
    tracing::debug!(error = %err, "rejecting request");
    HttpError::bad_request(err.to_string())
}
