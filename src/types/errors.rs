//! Tipos de erro do serviço de consulta.

use thiserror::Error;

/// Tipo de resultado padrão da aplicação.
pub type ConsultaResult<T> = Result<T, ConsultaError>;

/// Erros de aplicação (configuração, inicialização, servidor).
#[derive(Error, Debug)]
pub enum ConsultaError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Falha ao inicializar o pool de conexões: {0}")]
    PoolInit(String),

    #[error("Erro no servidor HTTP: {0}")]
    Server(String),

    #[error("{0}")]
    Other(String),
}

impl ConsultaError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

/// Falhas de infraestrutura durante uma consulta.
///
/// Nunca chegam ao cliente HTTP: o orquestrador registra o detalhe
/// e devolve apenas um resultado genérico de falha.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Nenhuma conexão livre dentro do tempo limite de aquisição.
    #[error("Pool esgotado: nenhuma conexão disponível após {0} ms")]
    PoolExhausted(u64),

    /// O pool não pôde ser construído.
    #[error("Pool indisponível: {0}")]
    Initialization(String),

    /// A consulta excedeu o tempo limite e foi interrompida.
    #[error("Consulta excedeu o tempo limite de {0} ms")]
    QueryTimeout(u64),

    /// Erro do driver SQLite.
    #[error("Erro de banco de dados: {0}")]
    Database(#[from] rusqlite::Error),
}

impl From<LookupError> for ConsultaError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Initialization(msg) => ConsultaError::PoolInit(msg),
            LookupError::Database(e) => ConsultaError::Database(e),
            other => ConsultaError::Other(other.to_string()),
        }
    }
}
