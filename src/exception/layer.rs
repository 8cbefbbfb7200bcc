use crate::error::{SurveyError, UntranslatedError};
use crate::exception::ExceptionFilter;
use crate::i18n::{AcceptLocale, Locale};
use axum::{
    body::{Body, to_bytes},
    http::{Request, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tower_http::catch_panic::CatchPanic;

/// Upper bound on a rejection body read back as the error cause.
const REJECTION_BODY_LIMIT: usize = 16 * 1024;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Tower Layer that routes handler errors through an [`ExceptionFilter`]
///
/// The request locale is resolved from `Accept-Language` before the handler
/// runs and stored in the request extensions, so handlers can read it with
/// [`AcceptLocale`]. Responses produced from a
/// [`SurveyError`](crate::SurveyError) are replaced by the filter's rendering
/// for that locale.
///
/// Errors that never became a `SurveyError` are translated as
/// [`SurveyError::Internal`]: plain-text error responses (extractor
/// rejections such as an unparseable `Path` segment) and handler panics.
/// Every other response passes through untouched, including the router's
/// empty-bodied 404/405 answers.
///
/// # Example
/// ```
/// use survey_web::exception::{ExceptionTranslationLayer, RestExceptionTranslator};
/// use survey_web::i18n::Locale;
/// use axum::{Router, routing::get};
///
/// let app: Router = Router::new()
///     .route("/health", get(|| async { "ok" }))
///     .layer(
///         ExceptionTranslationLayer::new(RestExceptionTranslator::default())
///             .with_default_locale(Locale::new("fr", None)),
///     );
/// ```
#[derive(Clone)]
pub struct ExceptionTranslationLayer {
    filter: Arc<dyn ExceptionFilter>,
    default_locale: Locale,
}

impl ExceptionTranslationLayer {
    pub fn new(filter: impl ExceptionFilter) -> Self {
        Self::from_shared(Arc::new(filter))
    }

    pub fn from_shared(filter: Arc<dyn ExceptionFilter>) -> Self {
        Self {
            filter,
            default_locale: Locale::default(),
        }
    }

    /// Locale used when the request has no usable `Accept-Language`.
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }
}

impl<S> Layer<S> for ExceptionTranslationLayer {
    type Service = ExceptionTranslationMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionTranslationMiddleware {
            inner: CatchPanic::custom(inner, panic_response as PanicHandler),
            filter: self.filter.clone(),
            default_locale: self.default_locale.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionTranslationMiddleware<S> {
    inner: CatchPanic<S, PanicHandler>,
    filter: Arc<dyn ExceptionFilter>,
    default_locale: Locale,
}

impl<S> Service<Request<Body>> for ExceptionTranslationMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let (mut parts, body) = request.into_parts();
        let locale = AcceptLocale::from_parts(&parts, &self.default_locale);
        parts.extensions.insert(locale.clone());
        let request = Request::from_parts(parts, body);

        // The readied service stays in `self`; the clone is driven to completion.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let filter = self.filter.clone();

        Box::pin(async move {
            let response = inner.call(request).await?.map(Body::new);

            let untranslated = response.extensions().get::<UntranslatedError>().cloned();
            if let Some(UntranslatedError(error)) = untranslated {
                return Ok(filter.catch(&error, &locale));
            }
            if !is_rejection(&response) {
                return Ok(response);
            }

            let status = response.status();
            let detail = to_bytes(response.into_body(), REJECTION_BODY_LIMIT)
                .await
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default();
            let error =
                SurveyError::Internal(anyhow::anyhow!("request rejected with {}: {}", status, detail));
            error.log();

            Ok(filter.catch(&error, &locale))
        })
    }
}

/// An error status with a plain-text body, as axum's extractor rejections
/// produce.
fn is_rejection(response: &Response) -> bool {
    let status = response.status();
    let plain_text = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/plain"));

    (status.is_client_error() || status.is_server_error()) && plain_text
}

/// Turn a handler panic into an internal error carried for translation.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    SurveyError::internal(format!("handler panicked: {}", detail)).into_response()
}
