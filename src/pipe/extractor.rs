use crate::error::SurveyError;
use crate::pipe::{Pipe, Validate, ValidationPipe};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body extractor that runs the payload's constraints
///
/// Failed constraints reject with [`SurveyError::Validation`]. A body that is
/// not valid JSON for `T` is not a field-level problem and rejects with
/// [`SurveyError::Internal`].
///
/// # Example
/// ```
/// use survey_web::pipe::{Validate, ValidatedJson, ValidationErrors};
/// use survey_web::SurveyError;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct QuestionDto {
///     label: String,
/// }
///
/// impl Validate for QuestionDto {
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         let mut errors = ValidationErrors::new("questionDto");
///         errors.not_blank("label", &self.label);
///         errors.into_result()
///     }
/// }
///
/// async fn create(ValidatedJson(question): ValidatedJson<QuestionDto>) -> Result<String, SurveyError> {
///     Ok(question.label)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send + 'static,
    S: Send + Sync,
{
    type Rejection = SurveyError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| SurveyError::Internal(anyhow::Error::new(rejection)))?;

        let payload = ValidationPipe::<T>::default().transform(payload).await?;
        Ok(ValidatedJson(payload))
    }
}
