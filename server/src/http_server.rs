use crate::coordinator::{self, Exchange, TurnContext};
use crate::render::{render_error_page, render_page, PageView};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tutor_core::{history, ChatCompleter, Language, QuestionBank, TutorConfig, TutorError};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    config: Arc<TutorConfig>,
    completer: Arc<dyn ChatCompleter>,
    bank: Arc<QuestionBank>,
}

impl AppState {
    pub fn new(config: TutorConfig, completer: Arc<dyn ChatCompleter>, bank: QuestionBank) -> Self {
        Self {
            config: Arc::new(config),
            completer,
            bank: Arc::new(bank),
        }
    }

    /// Model to show as selected: the client's choice, else the gateway default
    fn display_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.completer.default_model())
    }
}

/// Query string for the question page
#[derive(Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    lang: String,
    model: Option<String>,
}

fn empty_history() -> String {
    history::EMPTY_HISTORY.to_string()
}

/// Form posted by the answer box
#[derive(Deserialize)]
pub struct AnswerForm {
    user_answer: String,
    question: String,
    correct_answer: String,
    #[serde(default = "empty_history")]
    history_json: String,
    #[serde(default)]
    lang: String,
    model: Option<String>,
}

/// Form posted by the follow-up box
#[derive(Deserialize)]
pub struct FollowupForm {
    followup: String,
    question: String,
    correct_answer: String,
    #[serde(default = "empty_history")]
    history_json: String,
    #[serde(default)]
    lang: String,
    model: Option<String>,
}

/// Error type for HTTP server
#[derive(Error, Debug)]
pub enum ApiError {
    /// Carries the page language and model for the error page
    #[error("Chat completion failed: {source}")]
    Gateway {
        #[source]
        source: TutorError,
        language: Language,
        model: String,
    },
}

impl ApiError {
    fn gateway(state: &AppState, ctx: &TurnContext<'_>, source: TutorError) -> Self {
        Self::Gateway {
            source,
            language: ctx.language,
            model: state.display_model(ctx.model).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Gateway {
                source,
                language,
                model,
            } => {
                error!(error = %source, model = %model, "Chat completion failed");
                let body = render_error_page(language, &model);
                (StatusCode::BAD_GATEWAY, Html(body)).into_response()
            }
        }
    }
}

/// Build the router with all routes and layers
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(home))
        .route("/answer", post(submit_answer))
        .route("/followup", post(submit_followup))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(
    config: TutorConfig,
    completer: Arc<dyn ChatCompleter>,
    bank: QuestionBank,
) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    info!("Starting HTTP server on {}", addr);

    let app = build_router(AppState::new(config, completer, bank));

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

fn page_for(state: &AppState, ctx: &TurnContext<'_>, exchange: &Exchange) -> Html<String> {
    Html(render_page(&PageView {
        question: ctx.question,
        correct_answer: ctx.correct_answer,
        reply: Some(exchange.reply.as_str()),
        history: &exchange.history,
        language: ctx.language,
        model: state.display_model(ctx.model),
        models: &state.config.models,
        render_markdown: state.config.render_markdown,
    }))
}

/// Serves a freshly drawn question with an empty conversation
async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Html<String> {
    let language = Language::from_tag(&query.lang);
    let question = state.bank.pick();

    Html(render_page(&PageView {
        question: question.text_for(language),
        correct_answer: &question.answer,
        reply: None,
        history: &[],
        language,
        model: state.display_model(query.model.as_deref()),
        models: &state.config.models,
        render_markdown: state.config.render_markdown,
    }))
}

async fn submit_answer(
    State(state): State<AppState>,
    Form(form): Form<AnswerForm>,
) -> Result<Html<String>, ApiError> {
    let ctx = TurnContext {
        question: &form.question,
        correct_answer: &form.correct_answer,
        history_json: &form.history_json,
        language: Language::from_tag(&form.lang),
        model: form.model.as_deref(),
    };

    let exchange = coordinator::grade_answer(state.completer.as_ref(), &ctx, &form.user_answer)
        .await
        .map_err(|e| ApiError::gateway(&state, &ctx, e))?;
    Ok(page_for(&state, &ctx, &exchange))
}

async fn submit_followup(
    State(state): State<AppState>,
    Form(form): Form<FollowupForm>,
) -> Result<Html<String>, ApiError> {
    let ctx = TurnContext {
        question: &form.question,
        correct_answer: &form.correct_answer,
        history_json: &form.history_json,
        language: Language::from_tag(&form.lang),
        model: form.model.as_deref(),
    };

    let exchange =
        coordinator::continue_conversation(state.completer.as_ref(), &ctx, &form.followup)
            .await
            .map_err(|e| ApiError::gateway(&state, &ctx, e))?;
    Ok(page_for(&state, &ctx, &exchange))
}
