//! Gerenciador do pool de conexões SQLite.

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::lookup::LOOKUP_SQL;
use crate::types::config::DatabaseConfig;
use crate::types::errors::LookupError;

/// Encaminha os erros de conexão do r2d2 para o `tracing`.
#[derive(Debug)]
struct TracingErrorHandler;

impl r2d2::HandleError<rusqlite::Error> for TracingErrorHandler {
    fn handle_error(&self, error: rusqlite::Error) {
        tracing::error!(error = %error, "Database connection error");
    }
}

/// Situação atual do pool, para introspecção.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    pub min: u32,
    pub max: u32,
    pub initialized: bool,
    /// Conexões abertas (ociosas + emprestadas).
    pub connections: u32,
    pub idle: u32,
    /// Guardas [`PooledConnection`] ainda vivas.
    pub checked_out: usize,
}

/// Gerenciador do pool de conexões.
///
/// O pool é construído na primeira chamada a [`get_connection`] (ou
/// [`initialize`]) usando double-checked locking: o caminho rápido lê um
/// `OnceLock`; o lento serializa os construtores num mutex e confere de novo
/// antes de construir. Uma falha de construção é devolvida a quem tentou e a
/// quem já esperava no mutex durante a tentativa, sem nova construção; só
/// chamadas que chegam depois tentam de novo, no máximo uma vez cada.
///
/// Política de aquisição: com o pool no máximo, `get_connection` bloqueia até
/// `acquire_timeout_ms` e então falha com [`LookupError::PoolExhausted`].
///
/// [`get_connection`]: ConnectionPoolManager::get_connection
/// [`initialize`]: ConnectionPoolManager::initialize
pub struct ConnectionPoolManager {
    config: DatabaseConfig,
    pool: OnceLock<Pool<SqliteConnectionManager>>,
    /// Serializa as construções e guarda a mensagem da última falha.
    init_lock: Mutex<Option<String>>,
    attempts: AtomicUsize,
    builds: AtomicUsize,
    checked_out: Arc<AtomicUsize>,
}

impl ConnectionPoolManager {
    /// Cria o gerenciador. Não abre nenhuma conexão.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceLock::new(),
            init_lock: Mutex::new(None),
            attempts: AtomicUsize::new(0),
            builds: AtomicUsize::new(0),
            checked_out: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Constrói o pool agora, se ainda não existir.
    pub fn initialize(&self) -> Result<(), LookupError> {
        self.pool().map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    /// Quantas vezes um pool foi efetivamente construído com sucesso.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Acquire)
    }

    /// Tentativas de construção concluídas, bem-sucedidas ou não.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    /// Limites configurados (mínimo de ociosas, máximo de conexões).
    pub fn bounds(&self) -> (u32, u32) {
        (self.config.pool_min, self.config.pool_max)
    }

    /// Conexões emprestadas e ainda não devolvidas.
    pub fn checked_out(&self) -> usize {
        self.checked_out.load(Ordering::Acquire)
    }

    pub fn status(&self) -> PoolStatus {
        let (min, max) = self.bounds();
        let state = self.pool.get().map(|pool| pool.state());
        PoolStatus {
            min,
            max,
            initialized: state.is_some(),
            connections: state.as_ref().map_or(0, |s| s.connections),
            idle: state.as_ref().map_or(0, |s| s.idle_connections),
            checked_out: self.checked_out(),
        }
    }

    /// Empresta uma conexão, inicializando o pool se necessário.
    pub fn get_connection(&self) -> Result<PooledConnection, LookupError> {
        let pool = self.pool()?;

        let conn = pool.get().map_err(|e| {
            tracing::warn!(
                error = %e,
                timeout_ms = self.config.acquire_timeout_ms,
                "No database connection available"
            );
            LookupError::PoolExhausted(self.config.acquire_timeout_ms)
        })?;

        self.checked_out.fetch_add(1, Ordering::AcqRel);
        Ok(PooledConnection {
            conn,
            checked_out: Arc::clone(&self.checked_out),
        })
    }

    /// Devolve uma conexão ao pool.
    ///
    /// Consome a guarda, então não pode ser chamado duas vezes para a mesma
    /// conexão. Soltar a guarda tem o mesmo efeito.
    pub fn return_connection(&self, conn: PooledConnection) {
        drop(conn);
    }

    fn pool(&self) -> Result<&Pool<SqliteConnectionManager>, LookupError> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.init_lock.lock();
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }

        // Outra chamada falhou enquanto esta esperava o mutex
        if self.attempts.load(Ordering::Acquire) != seen {
            if let Some(msg) = last_failure.as_ref() {
                return Err(LookupError::Initialization(msg.clone()));
            }
        }

        let built = self.build();
        self.attempts.fetch_add(1, Ordering::AcqRel);
        match built {
            Ok(pool) => {
                *last_failure = None;
                self.builds.fetch_add(1, Ordering::AcqRel);
                Ok(self.pool.get_or_init(|| pool))
            }
            Err(e) => {
                *last_failure = Some(match &e {
                    LookupError::Initialization(msg) => msg.clone(),
                    other => other.to_string(),
                });
                Err(e)
            }
        }
    }

    fn build(&self) -> Result<Pool<SqliteConnectionManager>, LookupError> {
        let cfg = &self.config;
        tracing::info!(
            path = %cfg.path.display(),
            min = cfg.pool_min,
            max = cfg.pool_max,
            "Initializing connection pool"
        );

        // r2d2 entra em pânico com limites inválidos
        if cfg.pool_max == 0 || cfg.pool_min > cfg.pool_max {
            return Err(LookupError::Initialization(format!(
                "invalid pool bounds: min {} max {}",
                cfg.pool_min, cfg.pool_max
            )));
        }

        if !cfg.path.exists() {
            let msg = format!("database file not found: {}", cfg.path.display());
            tracing::error!("{}", msg);
            return Err(LookupError::Initialization(msg));
        }

        let busy_timeout = cfg.busy_timeout();
        let manager = SqliteConnectionManager::file(&cfg.path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .with_init(move |conn: &mut Connection| conn.busy_timeout(busy_timeout));

        let pool = Pool::builder()
            .min_idle(Some(cfg.pool_min))
            .max_size(cfg.pool_max)
            .connection_timeout(cfg.acquire_timeout())
            .error_handler(Box::new(TracingErrorHandler))
            .build(manager)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build connection pool");
                LookupError::Initialization(e.to_string())
            })?;

        // Falha cedo se as tabelas esperadas não existirem
        {
            let conn = pool
                .get()
                .map_err(|e| LookupError::Initialization(e.to_string()))?;
            conn.prepare_cached(LOOKUP_SQL).map_err(|e| {
                tracing::error!(error = %e, "Lookup statement does not match database schema");
                LookupError::Initialization(format!("schema check failed: {}", e))
            })?;
        }

        tracing::info!("Connection pool ready");
        Ok(pool)
    }
}

/// Conexão emprestada do pool.
///
/// Volta ao pool quando a guarda é solta, seja qual for o caminho de saída.
pub struct PooledConnection {
    conn: r2d2::PooledConnection<SqliteConnectionManager>,
    checked_out: Arc<AtomicUsize>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        self.checked_out.fetch_sub(1, Ordering::AcqRel);
    }
}
