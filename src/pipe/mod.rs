use crate::error::SurveyError;
use async_trait::async_trait;

pub mod builtins;
pub mod extractor;
pub mod validation;

pub use builtins::{ParseIdsPipe, ValidationPipe};
pub use extractor::ValidatedJson;
pub use validation::{FieldError, Validate, ValidationErrors};

pub type PipeResult<T> = Result<T, SurveyError>;

/// The Pipe trait for transformation and validation
///
/// Pipes run on handler input before the business logic sees it. A failing
/// pipe returns a [`SurveyError`], which is translated like any other handler
/// error.
#[async_trait]
pub trait Pipe: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    async fn transform(&self, input: Self::Input) -> PipeResult<Self::Output>;
}
