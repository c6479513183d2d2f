//! Servidor HTTP da consulta de CNPJ.
//!
//! Camada fina sobre [`LookupService`]: traduz os desfechos da consulta
//! em códigos HTTP e expõe as rotas administrativas.
//!
//! | Rota | Descrição |
//! |------|-----------|
//! | `POST /consultar` | consulta um CNPJ |
//! | `GET /estatisticas` | ocupação do cache e limites do pool |
//! | `POST /limpar-cache` | esvazia o cache |
//! | `GET /health` | prontidão (pool inicializado) |

mod handlers;
mod types;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::lookup::LookupService;
use crate::types::config::Config;
use crate::{ConsultaError, ConsultaResult};

pub use handlers::{consultar, estatisticas, health, limpar_cache, AppState};
pub use types::{ConsultaRequest, ErrorResponse, MessageResponse, StatsResponse};

/// Monta o roteador com todas as rotas.
pub fn router(service: Arc<LookupService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/consultar", post(consultar))
        .route("/estatisticas", get(estatisticas))
        .route("/limpar-cache", post(limpar_cache))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Inicializa o pool e serve até o processo ser encerrado.
///
/// Se o pool não puder ser construído, retorna erro antes de abrir a porta.
pub async fn serve(config: &Config) -> ConsultaResult<()> {
    let service = Arc::new(LookupService::from_config(config));

    let init = Arc::clone(&service);
    tokio::task::spawn_blocking(move || init.pool().initialize())
        .await
        .map_err(|e| ConsultaError::Server(e.to_string()))??;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
