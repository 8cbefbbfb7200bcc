use survey_web::prelude::*;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod survey;

use survey::SurveyStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting survey server...");

    let settings = TranslatorSettings::from_config(&ConfigService::new())?;
    let translator = RestExceptionTranslator::from_settings(&settings)?;
    let store = Arc::new(SurveyStore::seeded());

    let router = Router::new()
        .route(
            "/api/questions",
            get(survey::list_questions).post(survey::create_question),
        )
        .route("/api/users/{id}", get(survey::get_user))
        .route("/api/boom", get(survey::boom))
        .with_state(store)
        .layer(
            ExceptionTranslationLayer::new(translator)
                .with_default_locale(settings.default_locale.clone()),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(
        "Server running on http://{} (default locale {})",
        settings.bind_addr,
        settings.default_locale
    );
    axum::serve(listener, router).await?;

    Ok(())
}
