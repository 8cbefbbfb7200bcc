use crate::i18n::Locale;
use axum::{
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use std::convert::Infallible;

/// Axum extractor for the request locale
///
/// Uses the locale resolved by
/// [`ExceptionTranslationLayer`](crate::exception::ExceptionTranslationLayer)
/// when the layer is installed. Otherwise it reads `Accept-Language` directly
/// and falls back to the [`DefaultLocale`] request extension, then to
/// [`Locale::default`].
///
/// # Example
/// ```
/// use survey_web::i18n::AcceptLocale;
///
/// async fn greet(AcceptLocale(locale): AcceptLocale) -> String {
///     format!("serving {locale}")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AcceptLocale(pub Locale);

/// Configured fallback locale for routers served without
/// [`ExceptionTranslationLayer`](crate::exception::ExceptionTranslationLayer)
///
/// # Example
/// ```
/// use axum::{Extension, Router, routing::get};
/// use survey_web::i18n::{AcceptLocale, DefaultLocale, Locale};
///
/// let app: Router = Router::new()
///     .route("/", get(|AcceptLocale(locale): AcceptLocale| async move { locale.to_string() }))
///     .layer(Extension(DefaultLocale(Locale::new("fr", None))));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultLocale(pub Locale);

impl AcceptLocale {
    pub fn from_parts(parts: &Parts, default_locale: &Locale) -> Locale {
        if let Some(locale) = parts.extensions.get::<Locale>() {
            return locale.clone();
        }

        parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Locale::from_accept_language)
            .unwrap_or_else(|| default_locale.clone())
    }
}

impl<S> FromRequestParts<S> for AcceptLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let default_locale = parts
            .extensions
            .get::<DefaultLocale>()
            .map(|DefaultLocale(locale)| locale.clone())
            .unwrap_or_default();
        Ok(AcceptLocale(Self::from_parts(parts, &default_locale)))
    }
}

impl std::ops::Deref for AcceptLocale {
    type Target = Locale;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_reads_accept_language() {
        let mut parts = parts(Request::builder().header(ACCEPT_LANGUAGE, "de-AT, en;q=0.4"));
        let AcceptLocale(locale) = AcceptLocale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(locale.to_string(), "de-AT");
    }

    #[tokio::test]
    async fn test_prefers_locale_resolved_by_layer() {
        let mut parts = parts(Request::builder().header(ACCEPT_LANGUAGE, "de"));
        parts.extensions.insert(Locale::new("fr", None));

        let AcceptLocale(locale) = AcceptLocale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(locale.language(), "fr");
    }

    #[tokio::test]
    async fn test_configured_default_applies_without_layer() {
        let mut parts = parts(Request::builder().header(ACCEPT_LANGUAGE, "*"));
        parts.extensions.insert(DefaultLocale(Locale::new("es", Some("MX"))));

        let AcceptLocale(locale) = AcceptLocale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(locale.to_string(), "es-MX");
    }

    #[tokio::test]
    async fn test_built_in_default_without_configuration() {
        let mut parts = parts(Request::builder());
        let AcceptLocale(locale) = AcceptLocale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(locale, Locale::default());
    }

    #[test]
    fn test_missing_header_uses_default() {
        let parts = parts(Request::builder());
        let fallback = Locale::new("it", None);
        assert_eq!(AcceptLocale::from_parts(&parts, &fallback), fallback);
    }
}
