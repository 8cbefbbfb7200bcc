//! # survey-web
//!
//! REST exception translation for the survey service.
//!
//! Handlers return [`SurveyError`]; the [`ExceptionTranslationLayer`] turns it
//! into a JSON error body with a matching status code, localized for the
//! request's `Accept-Language`.
//!
//! | error              | status | body                                              |
//! |--------------------|--------|---------------------------------------------------|
//! | `Validation`       | 400    | one `err.validation` item with its `fieldErrors`  |
//! | `QuestionNotFound` | 404    | one `err.question_not_found` item per missing id  |
//! | `UserNotFound`     | 404    | one `err.user_not_found` item per missing id      |
//! | anything else      | 500    | one `err.internal` item                           |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use survey_web::prelude::*;
//!
//! async fn find_question(Path(id): Path<i64>) -> Result<String, SurveyError> {
//!     Err(SurveyError::question_not_found([id]))
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = TranslatorSettings::from_config(&ConfigService::new())?;
//!     let translator = RestExceptionTranslator::from_settings(&settings)?;
//!
//!     let app = Router::new()
//!         .route("/api/questions/{id}", get(find_question))
//!         .layer(
//!             ExceptionTranslationLayer::new(translator)
//!                 .with_default_locale(settings.default_locale.clone()),
//!         );
//!
//!     let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod exception;
pub mod i18n;
pub mod pipe;

#[cfg(test)]
mod test_support;

// Re-export core types
pub use common::{ErrorCode, ErrorItem, ErrorResponse, FieldErrorItem};
pub use error::{Result, SurveyError};
pub use exception::{ExceptionFilter, ExceptionTranslationLayer, RestExceptionTranslator};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use survey_web::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{ErrorCode, ErrorItem, ErrorReply, ErrorResponse, FieldErrorItem};
    pub use crate::config::{ConfigService, TranslatorSettings};
    pub use crate::error::SurveyError;
    pub use crate::exception::{
        ExceptionFilter, ExceptionTranslationLayer, RestExceptionTranslator,
    };
    pub use crate::i18n::{AcceptLocale, DefaultLocale, Locale, MessageSource, StaticMessageSource};
    pub use crate::pipe::builtins::*;
    pub use crate::pipe::{
        FieldError, Pipe, PipeResult, Validate, ValidatedJson, ValidationErrors,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    };
    pub use std::sync::Arc;
}
