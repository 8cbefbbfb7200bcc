use axum::{
    Json,
    http::StatusCode as HttpStatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error codes exposed to API clients
///
/// The string form is part of the wire contract and is shared between the
/// `Display` impl (via `strum`) and the JSON serialization.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[serde(into = "&'static str")]
pub enum ErrorCode {
    #[strum(serialize = "err.validation")]
    Validation,
    #[strum(serialize = "err.question_not_found")]
    QuestionNotFound,
    #[strum(serialize = "err.user_not_found")]
    UserNotFound,
    #[strum(serialize = "err.internal")]
    InternalServerError,
}

/// Error body returned for every failed request
///
/// # Example
/// ```
/// use survey_web::common::response::{ErrorCode, ErrorItem, ErrorResponse};
///
/// let body = ErrorResponse::single(ErrorItem::new(ErrorCode::InternalServerError, "Internal Server Error"));
/// assert_eq!(
///     serde_json::to_string(&body).unwrap(),
///     r#"{"errors":[{"code":"err.internal","message":"Internal Server Error"}]}"#
/// );
/// ```
#[derive(Debug, Default, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorItem {
    pub code: ErrorCode,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldErrorItem>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrorItem {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn single(item: ErrorItem) -> Self {
        Self { errors: vec![item] }
    }

    pub fn push(&mut self, item: ErrorItem) {
        self.errors.push(item);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Pair the body with a status so it can be returned from a handler.
    pub fn with_status(self, status: HttpStatusCode) -> ErrorReply {
        ErrorReply { status, body: self }
    }
}

impl FromIterator<ErrorItem> for ErrorResponse {
    fn from_iter<I: IntoIterator<Item = ErrorItem>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl ErrorItem {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn with_field_errors(mut self, field_errors: Vec<FieldErrorItem>) -> Self {
        self.field_errors = Some(field_errors);
        self
    }
}

impl FieldErrorItem {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A translated error ready to be written to the wire
#[derive(Debug)]
pub struct ErrorReply {
    pub status: HttpStatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
