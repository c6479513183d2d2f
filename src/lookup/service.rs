//! Orquestrador da consulta: cache na frente, pool de conexões atrás.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::RecordCache;
use crate::cnpj::Cnpj;
use crate::pool::ConnectionPoolManager;
use crate::types::config::Config;
use crate::types::errors::LookupError;
use crate::types::outcome::LookupOutcome;
use crate::types::record::Record;

use super::query::fetch_estabelecimento;

/// Serviço de consulta de CNPJ.
///
/// Seguro para uso concorrente: o cache serializa seus próprios acessos e
/// cada consulta empresta uma conexão exclusiva do pool.
pub struct LookupService {
    cache: Arc<RecordCache>,
    pool: Arc<ConnectionPoolManager>,
    query_timeout: Duration,
}

impl LookupService {
    /// Cria o serviço a partir de componentes já construídos.
    pub fn new(cache: Arc<RecordCache>, pool: Arc<ConnectionPoolManager>) -> Self {
        let query_timeout = pool.config().query_timeout();
        Self {
            cache,
            pool,
            query_timeout,
        }
    }

    /// Cria o serviço com cache e pool novos. O pool só conecta no primeiro uso.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(RecordCache::new(config.cache.capacity)),
            Arc::new(ConnectionPoolManager::new(config.database.clone())),
        )
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn pool(&self) -> &ConnectionPoolManager {
        &self.pool
    }

    /// Consulta um CNPJ em formato livre (com ou sem pontuação).
    ///
    /// Entradas que não somam 14 dígitos retornam [`LookupOutcome::InvalidInput`]
    /// sem tocar no cache nem no pool. Falhas de infraestrutura são registradas
    /// no log e viram [`LookupOutcome::Failed`], sem expor o erro do driver.
    pub fn lookup(&self, raw: &str) -> LookupOutcome {
        let Some(cnpj) = Cnpj::parse(raw) else {
            tracing::debug!(input_len = raw.len(), "Rejected malformed CNPJ");
            return LookupOutcome::InvalidInput;
        };

        match self.try_lookup(&cnpj) {
            Ok(Some(record)) => LookupOutcome::Found(record),
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => {
                tracing::error!(
                    cnpj_basico = cnpj.basico(),
                    error = %e,
                    "CNPJ lookup failed"
                );
                LookupOutcome::Failed
            }
        }
    }

    /// Consulta um CNPJ já validado, expondo o erro tipado.
    ///
    /// `Ok(None)` significa que a consulta rodou e não achou linha.
    pub fn try_lookup(&self, cnpj: &Cnpj) -> Result<Option<Arc<Record>>, LookupError> {
        if let Some(record) = self.cache.get(cnpj.digits()) {
            tracing::debug!(cnpj = %cnpj, "Cache hit");
            return Ok(Some(record));
        }
        tracing::debug!(cnpj = %cnpj, "Cache miss");

        let conn = self.pool.get_connection()?;
        let fetched = fetch_estabelecimento(&conn, cnpj, self.query_timeout);
        self.pool.return_connection(conn);

        let Some(row) = fetched? else {
            tracing::debug!(cnpj = %cnpj, "CNPJ not found");
            return Ok(None);
        };

        let record = Arc::new(row.into_record());
        self.cache.set(cnpj.digits().to_string(), Arc::clone(&record));
        Ok(Some(record))
    }
}
