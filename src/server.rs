//! HTTP service built on axum.
//!
//! `POST /run_pipeline` takes a multipart form: a `file` part with the data
//! document, a `tasks` field, and one JSON field per check parameter.
//! `GET /health` reports liveness and the registered task names.

use crate::config::AppConfig;
use crate::error::{INTERNAL_FAULT_MESSAGE, PipelineError};
use crate::pipeline::{CheckRegistry, ErrorResponse, UnknownTaskPolicy};
use crate::service::{self, DATA_FIELD, RunRequest};
use anyhow::Context as _;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared, read-only state for handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<CheckRegistry>,
    pub policy: UnknownTaskPolicy,
}

impl AppState {
    pub fn new(registry: CheckRegistry, policy: UnknownTaskPolicy) -> Self {
        Self {
            registry: Arc::new(registry),
            policy,
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/run_pipeline", post(run_pipeline))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_internal() {
            error!("Error in executing pipeline: {self}");
        } else {
            warn!("Rejected pipeline request: {self}");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "tasks": state.registry.names().collect::<Vec<_>>(),
    }))
}

async fn run_pipeline(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // A non-multipart body is treated as a form without a data part.
    let (data, fields) = match multipart {
        Ok(multipart) => match read_form(multipart).await {
            Ok(parts) => parts,
            Err(err) => return err.into_response(),
        },
        Err(rejection) => {
            debug!("Request body is not a multipart form: {rejection}");
            (None, HashMap::new())
        }
    };

    let AppState { registry, policy } = state;
    let outcome = tokio::task::spawn_blocking(move || {
        let request = RunRequest::parse(data.as_deref(), &fields, &registry)?;
        service::execute(request, &registry, policy)
    })
    .await;

    match outcome {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(join_error) => {
            error!("Error in executing pipeline: worker failed: {join_error}");
            let body = ErrorResponse {
                success: false,
                error: INTERNAL_FAULT_MESSAGE.to_owned(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

type FormParts = (Option<Bytes>, HashMap<String, String>);

async fn read_form(mut multipart: Multipart) -> Result<FormParts, PipelineError> {
    let mut data = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == DATA_FIELD {
            data = Some(field.bytes().await.map_err(malformed)?);
        } else {
            let value = field.text().await.map_err(malformed)?;
            fields.insert(name, value);
        }
    }

    Ok((data, fields))
}

fn malformed(err: MultipartError) -> PipelineError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PipelineError::PayloadTooLarge(err.body_text())
    } else {
        PipelineError::InputFormat(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Bind `config.bind_address` and serve until Ctrl-C.
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::new(CheckRegistry::builtin(), config.unknown_tasks);
    let app = router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
