//! Handlers HTTP.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::lookup::LookupService;
use crate::types::outcome::LookupOutcome;

use super::types::{ConsultaRequest, ErrorResponse, MessageResponse, StatsResponse};

/// Estado compartilhado pelos handlers.
pub struct AppState {
    pub service: Arc<LookupService>,
}

fn error(status: StatusCode, msg: &str) -> Response {
    (status, Json(ErrorResponse::new(msg))).into_response()
}

/// `POST /consultar`
pub async fn consultar(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConsultaRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return error(StatusCode::BAD_REQUEST, "Dados JSON inválidos");
    };

    let cnpj = match req.cnpj {
        Some(c) if !c.trim().is_empty() => c,
        _ => return error(StatusCode::BAD_REQUEST, "CNPJ não fornecido"),
    };

    // rusqlite bloqueia a thread; fica fora do runtime
    let service = Arc::clone(&state.service);
    let outcome = tokio::task::spawn_blocking(move || service.lookup(&cnpj)).await;

    match outcome {
        Ok(LookupOutcome::Found(record)) => Json(record.as_ref().clone()).into_response(),
        Ok(LookupOutcome::InvalidInput) => error(StatusCode::BAD_REQUEST, "CNPJ inválido"),
        Ok(LookupOutcome::NotFound) => error(StatusCode::NOT_FOUND, "CNPJ não encontrado"),
        Ok(LookupOutcome::Failed) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor")
        }
        Err(e) => {
            tracing::error!(error = %e, "Lookup task panicked");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor")
        }
    }
}

/// `GET /estatisticas`
pub async fn estatisticas(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = state.service.cache().stats();
    let pool = state.service.pool().status();

    Json(StatsResponse {
        cache_size: cache.size,
        cache_capacity: cache.capacity,
        cache_hits: cache.hits,
        cache_misses: cache.misses,
        pool_min: pool.min,
        pool_max: pool.max,
        pool_initialized: pool.initialized,
        pool_checked_out: pool.checked_out,
    })
}

/// `POST /limpar-cache`
pub async fn limpar_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.service.cache().clear();
    tracing::info!("Cache cleared");

    Json(MessageResponse {
        mensagem: "Cache limpo com sucesso".to_string(),
    })
}

/// `GET /health`: pronto apenas com o pool construído.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ready = state.service.pool().is_initialized();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "unavailable" },
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
