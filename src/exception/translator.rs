use crate::common::{ErrorCode, ErrorItem, ErrorReply, ErrorResponse, FieldErrorItem};
use crate::config::TranslatorSettings;
use crate::error::SurveyError;
use crate::exception::ExceptionFilter;
use crate::i18n::{Locale, MessageSource, MessageSourceError, StaticMessageSource};
use crate::pipe::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const VALIDATION_ERROR_MESSAGE: &str = "Validation Error";
const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Translates [`SurveyError`]s into JSON error bodies
///
/// | error              | status | items                                |
/// |--------------------|--------|--------------------------------------|
/// | `Validation`       | 400    | one, with a localized field error each |
/// | `QuestionNotFound` | 404    | one per missing id                   |
/// | `UserNotFound`     | 404    | one per missing id                   |
/// | `Internal`         | 500    | one generic item, cause not exposed  |
#[derive(Clone)]
pub struct RestExceptionTranslator {
    messages: Arc<dyn MessageSource>,
}

impl RestExceptionTranslator {
    pub fn new(messages: Arc<dyn MessageSource>) -> Self {
        Self { messages }
    }

    /// Build a translator whose bundles come from `settings.messages_dir`.
    pub fn from_settings(settings: &TranslatorSettings) -> Result<Self, MessageSourceError> {
        let messages = StaticMessageSource::new(settings.default_locale.clone());
        if let Some(dir) = &settings.messages_dir {
            let loaded = messages.load_dir(dir)?;
            tracing::info!("Loaded {} message(s) from {}", loaded, dir.display());
        }
        Ok(Self::new(Arc::new(messages)))
    }

    /// Log the error and build its reply for `locale`.
    pub fn translate(&self, error: &SurveyError, locale: &Locale) -> ErrorReply {
        error.log();
        self.reply(error, locale)
    }

    /// Build the reply for `locale` without logging.
    pub fn reply(&self, error: &SurveyError, locale: &Locale) -> ErrorReply {
        match error {
            SurveyError::Validation(errors) => self
                .validation_errors(errors, locale)
                .with_status(StatusCode::BAD_REQUEST),
            SurveyError::QuestionNotFound { ids } => {
                not_found(ids, ErrorCode::QuestionNotFound, "question")
                    .with_status(StatusCode::NOT_FOUND)
            }
            SurveyError::UserNotFound { ids } => {
                not_found(ids, ErrorCode::UserNotFound, "user").with_status(StatusCode::NOT_FOUND)
            }
            SurveyError::Internal(_) => ErrorResponse::single(ErrorItem::new(
                ErrorCode::InternalServerError,
                INTERNAL_SERVER_ERROR_MESSAGE,
            ))
            .with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Build the reply and turn it into a response without logging.
    pub fn render(&self, error: &SurveyError, locale: &Locale) -> Response {
        self.reply(error, locale).into_response()
    }

    fn validation_errors(&self, errors: &ValidationErrors, locale: &Locale) -> ErrorResponse {
        let field_errors = errors
            .field_errors()
            .iter()
            .map(|field_error| {
                FieldErrorItem::new(
                    field_error.field.clone(),
                    field_error.code.clone(),
                    self.messages.resolve_field_error(field_error, locale),
                )
            })
            .collect();

        ErrorResponse::single(
            ErrorItem::new(ErrorCode::Validation, VALIDATION_ERROR_MESSAGE)
                .with_field_errors(field_errors),
        )
    }
}

fn not_found(ids: &[String], code: ErrorCode, entity: &str) -> ErrorResponse {
    ids.iter()
        .map(|id| ErrorItem::new(code, format!("The {} with id {} was not found", entity, id)))
        .collect()
}

impl Default for RestExceptionTranslator {
    fn default() -> Self {
        Self::new(Arc::new(StaticMessageSource::default()))
    }
}

impl ExceptionFilter for RestExceptionTranslator {
    fn catch(&self, error: &SurveyError, locale: &Locale) -> Response {
        self.render(error, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::FieldError;
    use crate::test_support::ErrorEvents;
    use serde_json::{Value, json};

    fn translator() -> RestExceptionTranslator {
        let messages = StaticMessageSource::default();
        messages.add_message(&Locale::default(), "NotBlank", "{0} must not be blank");
        messages.add_message(&Locale::new("fr", None), "NotBlank", "{0} est obligatoire");
        RestExceptionTranslator::new(Arc::new(messages))
    }

    fn body(reply: &ErrorReply) -> Value {
        serde_json::to_value(&reply.body).unwrap()
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let mut errors = ValidationErrors::new("questionDto");
        errors
            .not_blank("label", "")
            .not_blank("description", " ")
            .size("label", "", 3, 255);

        let reply = translator().translate(&SurveyError::Validation(errors), &Locale::default());

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body.len(), 1);
        let item = &reply.body.errors[0];
        assert_eq!(item.code, ErrorCode::Validation);
        assert_eq!(item.message, "Validation Error");

        let field_errors = item.field_errors.as_ref().unwrap();
        assert_eq!(field_errors.len(), 3);
        assert_eq!(
            field_errors[0],
            FieldErrorItem::new("label", "NotBlank", "label must not be blank")
        );
        assert_eq!(field_errors[2].message, "size must be between 3 and 255");
    }

    #[test]
    fn test_validation_messages_follow_locale() {
        let mut errors = ValidationErrors::new("questionDto");
        errors.push(FieldError::new("questionDto", "label", "NotBlank"));

        let reply = translator().translate(
            &SurveyError::Validation(errors),
            &Locale::new("fr", Some("BE")),
        );

        assert_eq!(
            body(&reply)["errors"][0]["fieldErrors"][0]["message"],
            "label est obligatoire"
        );
    }

    #[test]
    fn test_question_not_found_emits_one_item_per_id() {
        let reply =
            translator().translate(&SurveyError::question_not_found([1, 2]), &Locale::default());

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(
            body(&reply),
            json!({
                "errors": [
                    {"code": "err.question_not_found", "message": "The question with id 1 was not found"},
                    {"code": "err.question_not_found", "message": "The question with id 2 was not found"}
                ]
            })
        );
    }

    #[test]
    fn test_user_not_found_emits_one_item_per_id() {
        let reply = translator().translate(&SurveyError::user_not_found([42]), &Locale::default());

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body.len(), 1);
        assert_eq!(reply.body.errors[0].code, ErrorCode::UserNotFound);
        assert_eq!(reply.body.errors[0].message, "The user with id 42 was not found");
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let cause = anyhow::anyhow!("connection refused").context("loading survey 9");
        let reply = translator().translate(&SurveyError::Internal(cause), &Locale::default());

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body(&reply),
            json!({"errors": [{"code": "err.internal", "message": "Internal Server Error"}]})
        );
    }

    #[test]
    fn test_from_settings_loads_bundles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("messages_de.properties"), "NotBlank={0} darf nicht leer sein").unwrap();
        let settings = TranslatorSettings {
            messages_dir: Some(dir.path().to_path_buf()),
            ..TranslatorSettings::default()
        };

        let mut errors = ValidationErrors::new("userDto");
        errors.not_blank("name", "");
        let reply = RestExceptionTranslator::from_settings(&settings)
            .unwrap()
            .translate(&SurveyError::Validation(errors), &Locale::new("de", Some("CH")));

        assert_eq!(
            body(&reply)["errors"][0]["fieldErrors"][0]["message"],
            "name darf nicht leer sein"
        );
    }

    #[test]
    fn test_translate_logs_and_catch_only_renders() {
        let (events, _guard) = ErrorEvents::capture();
        let error = SurveyError::user_not_found([8]);

        translator().translate(&error, &Locale::default());
        translator().catch(&error, &Locale::default());

        assert_eq!(
            events.messages(),
            vec!["Translating user not found: Users not found: 8"]
        );
    }

    #[test]
    fn test_catch_sets_status_and_json_content_type() {
        let response = translator().catch(&SurveyError::internal("boom"), &Locale::default());

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
