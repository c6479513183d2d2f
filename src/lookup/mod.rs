//! Orquestração da consulta de CNPJ.
//!
//! Fluxo: normaliza o identificador, consulta o cache e, em caso de falta,
//! empresta uma conexão do pool, executa a consulta fixa, monta o
//! [`Record`](crate::types::Record) e o guarda no cache.

mod query;
mod service;

pub use query::{fetch_estabelecimento, EstabelecimentoRow, LOOKUP_SQL, UNKNOWN_MUNICIPALITY};
pub use service::LookupService;
