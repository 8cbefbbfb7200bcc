use crate::error::SurveyError;
use crate::i18n::Locale;
use axum::response::Response;

pub mod layer;
pub mod translator;

pub use layer::{ExceptionTranslationLayer, ExceptionTranslationMiddleware};
pub use translator::RestExceptionTranslator;

/// The ExceptionFilter trait
///
/// Filters handle errors thrown during request processing.
/// They must return a valid Response for every error. Errors reach the
/// filter already logged.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Render an error raised while serving a request in `locale`
    fn catch(&self, error: &SurveyError, locale: &Locale) -> Response;
}
