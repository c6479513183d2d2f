//! Banco SQLite de teste com o recorte das tabelas da Receita.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use tempfile::TempDir;

use consulta_cnpj::cache::RecordCache;
use consulta_cnpj::pool::ConnectionPoolManager;
use consulta_cnpj::types::config::DatabaseConfig;
use consulta_cnpj::LookupService;

/// CNPJ ativo, com município cadastrado.
pub const ACTIVE_CNPJ: &str = "11222333000181";

/// CNPJ baixado (situação 08), sem município em `munic`.
pub const CLOSED_CNPJ: &str = "44555666000199";

/// CNPJ válido que não existe na base.
pub const MISSING_CNPJ: &str = "99888777000166";

pub struct TestDb {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("dados_rfb.db");
        seed(&path);
        Self { _dir: dir, path }
    }

    /// Conexão de escrita, separada do pool (que é somente leitura).
    pub fn writer(&self) -> Connection {
        Connection::open(&self.path).expect("Failed to open writer")
    }

    pub fn config(&self, min: u32, max: u32) -> DatabaseConfig {
        DatabaseConfig {
            pool_min: min,
            pool_max: max,
            acquire_timeout_ms: 300,
            query_timeout_ms: 2_000,
            ..DatabaseConfig::new(&self.path)
        }
    }

    pub fn service(&self, capacity: usize, min: u32, max: u32) -> LookupService {
        LookupService::new(
            Arc::new(RecordCache::new(capacity)),
            Arc::new(ConnectionPoolManager::new(self.config(min, max))),
        )
    }
}

fn seed(path: &Path) {
    let conn = Connection::open(path).expect("Failed to create database");
    conn.execute_batch(
        r#"
        CREATE TABLE empresa (
            cnpj_basico TEXT NOT NULL,
            razao_social TEXT
        );
        CREATE TABLE estabelecimento (
            cnpj_basico TEXT NOT NULL,
            cnpj_ordem TEXT NOT NULL,
            cnpj_dv TEXT NOT NULL,
            situacao_cadastral TEXT,
            logradouro TEXT,
            numero TEXT,
            bairro TEXT,
            cep TEXT,
            municipio TEXT,
            uf TEXT
        );
        CREATE TABLE munic (
            codigo TEXT NOT NULL,
            descricao TEXT
        );
        CREATE INDEX idx_estab_cnpj ON estabelecimento (cnpj_basico, cnpj_ordem, cnpj_dv);

        INSERT INTO empresa VALUES ('11222333', 'EMPRESA EXEMPLO LTDA   ');
        INSERT INTO empresa VALUES ('44555666', 'COMERCIO ANTIGO ME');

        INSERT INTO estabelecimento VALUES
            ('11222333', '0001', '81', '02', 'RUA DAS FLORES', '100 ', 'CENTRO',
             '01001000', '7107', 'SP');
        INSERT INTO estabelecimento VALUES
            ('44555666', '0001', '99', '08', 'AV BRASIL', NULL, NULL,
             '20040002', '9999', 'RJ');

        INSERT INTO munic VALUES ('7107', 'SAO PAULO  ');
        "#,
    )
    .expect("Failed to seed database");
}
