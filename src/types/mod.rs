//! Tipos compartilhados.

pub mod config;
pub mod errors;
pub mod outcome;
pub mod record;

pub use config::Config;
pub use errors::{ConsultaError, ConsultaResult, LookupError};
pub use outcome::LookupOutcome;
pub use record::Record;
