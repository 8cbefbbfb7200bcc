use crate::exception::translator::RestExceptionTranslator;
use crate::i18n::Locale;
use crate::pipe::ValidationErrors;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurveyError>;

/// Every error a request handler can surface to the client.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Validation failed with {} field error(s)", .0.len())]
    Validation(ValidationErrors),

    #[error("Questions not found: {}", .ids.join(", "))]
    QuestionNotFound { ids: Vec<String> },

    #[error("Users not found: {}", .ids.join(", "))]
    UserNotFound { ids: Vec<String> },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SurveyError {
    pub fn question_not_found<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::QuestionNotFound {
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }

    pub fn user_not_found<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::UserNotFound {
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }

    pub fn internal(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Internal(anyhow::Error::msg(message))
    }

    /// Emit the single `error!` event recorded for a translated error.
    pub fn log(&self) {
        match self {
            SurveyError::Validation(errors) => {
                tracing::error!("Translating method arguments not valid: {}", self);
                for field_error in errors.field_errors() {
                    tracing::debug!("Rejected field {}", field_error);
                }
            }
            SurveyError::QuestionNotFound { .. } => {
                tracing::error!("Translating question not found: {}", self);
            }
            SurveyError::UserNotFound { .. } => {
                tracing::error!("Translating user not found: {}", self);
            }
            SurveyError::Internal(cause) => {
                tracing::error!("Translating internal server error: {:#}", cause);
            }
        }
    }
}

impl From<ValidationErrors> for SurveyError {
    fn from(errors: ValidationErrors) -> Self {
        SurveyError::Validation(errors)
    }
}

/// Marker carried in response extensions so the translation layer can
/// re-render the error for the request's locale. The error has already been
/// logged when the marker is attached.
#[derive(Clone, Debug)]
pub struct UntranslatedError(pub Arc<SurveyError>);

impl axum::response::IntoResponse for SurveyError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        let error = Arc::new(self);
        let mut response =
            RestExceptionTranslator::default().render(&error, &Locale::default());
        response.extensions_mut().insert(UntranslatedError(error));
        response
    }
}
