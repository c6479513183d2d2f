//! Corpos de requisição e resposta da API HTTP.

use serde::{Deserialize, Serialize};

/// Corpo de `POST /consultar`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConsultaRequest {
    #[serde(default)]
    pub cnpj: Option<String>,
}

/// Resposta de erro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub erro: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { erro: msg.into() }
    }
}

/// Resposta de `GET /estatisticas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub cache_size: usize,
    pub cache_capacity: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub pool_min: u32,
    pub pool_max: u32,
    pub pool_initialized: bool,
    pub pool_checked_out: usize,
}

/// Resposta de ações administrativas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub mensagem: String,
}
