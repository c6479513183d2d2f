//! # consulta-cnpj
//!
//! Consulta de CNPJ com cache LRU em memória e pool de conexões.
//!
//! Um CNPJ em formato livre é normalizado, buscado no cache e, em caso de
//! falta, consultado no banco com uma conexão emprestada do pool. O registro
//! resultante é guardado no cache para as próximas consultas.
//!
//! ## Módulos
//!
//! - [`cnpj`] - Normalização e formatação do identificador
//! - [`cache`] - Cache LRU de registros
//! - [`pool`] - Pool de conexões com inicialização única
//! - [`lookup`] - Orquestrador da consulta
//! - [`server`] - API HTTP
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Tipos compartilhados

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod cnpj;
pub mod lookup;
pub mod pool;
pub mod server;
pub mod types;

pub use lookup::LookupService;
pub use types::config::Config;
pub use types::errors::{ConsultaError, ConsultaResult, LookupError};
pub use types::outcome::LookupOutcome;
pub use types::record::Record;
