//! Resultado de uma consulta de CNPJ.

use std::sync::Arc;

use super::record::Record;

/// Os quatro desfechos possíveis de `LookupService::lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Registro encontrado (vindo do cache ou do banco).
    Found(Arc<Record>),

    /// A consulta rodou e não retornou linha.
    NotFound,

    /// O identificador não tem 14 dígitos após a normalização.
    InvalidInput,

    /// Falha de infraestrutura; o detalhe fica apenas no log.
    Failed,
}

impl LookupOutcome {
    /// Retorna o registro, se houver.
    pub fn record(&self) -> Option<&Arc<Record>> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            _ => None,
        }
    }

    /// `true` apenas para [`LookupOutcome::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

impl std::fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupOutcome::Found(record) => write!(f, "found {}", record.cnpj),
            LookupOutcome::NotFound => write!(f, "not_found"),
            LookupOutcome::InvalidInput => write!(f, "invalid_input"),
            LookupOutcome::Failed => write!(f, "failed"),
        }
    }
}
