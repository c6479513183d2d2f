//! Implementação dos comandos CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cnpj::Cnpj;
use crate::lookup::LookupService;
use crate::types::config::{Config, DEFAULT_CONFIG_FILE};
use crate::{ConsultaError, ConsultaResult};

/// Initializes configuration in the specified directory.
pub async fn init(path: Option<PathBuf>) -> ConsultaResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    // Create directory if it doesn't exist
    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(DEFAULT_CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    let config = Config::default_config();
    config.save(&config_path)?;

    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point [database].path at the SQLite dataset (currently {})",
        config.database.path.display()
    );
    println!("  2. Check the setup: consulta-cnpj doctor");
    println!("  3. Start the server: consulta-cnpj serve");

    Ok(())
}

/// Inicia o servidor HTTP.
pub async fn serve(host: Option<String>, port: Option<u16>, config: &Config) -> ConsultaResult<()> {
    let mut config = config.clone();
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::debug!(
        "Configuração carregada: pool={}..{}, cache={}",
        config.database.pool_min,
        config.database.pool_max,
        config.cache.capacity
    );

    crate::server::serve(&config).await
}

/// Consulta um CNPJ diretamente, sem servidor.
pub async fn lookup(cnpj: &str, json: bool, config: &Config) -> ConsultaResult<()> {
    let Some(parsed) = Cnpj::parse(cnpj) else {
        return Err(ConsultaError::other(format!(
            "CNPJ inválido: '{}' (esperados 14 dígitos)",
            cnpj
        )));
    };

    let service = Arc::new(LookupService::from_config(config));
    let result = tokio::task::spawn_blocking(move || service.try_lookup(&parsed))
        .await
        .map_err(|e| ConsultaError::other(e.to_string()))??;

    match result {
        Some(record) if json => {
            println!("{}", serde_json::to_string_pretty(record.as_ref())?);
        }
        Some(record) => {
            println!("\n--- RESULTADO ---");
            println!("{}", record);
            println!("-----------------\n");
        }
        None => {
            println!("CNPJ não encontrado.");
        }
    }

    Ok(())
}

/// Diagnostica problemas de configuração.
pub async fn doctor(config_path: &Path, config: &Config) -> ConsultaResult<()> {
    println!("Diagnosticando configuração...\n");

    let mut issues: Vec<String> = Vec::new();

    if config_path.exists() {
        println!("✓ Configuração carregada de {}", config_path.display());
    } else {
        println!("○ {} não encontrado, usando padrões", config_path.display());
    }

    if let Err(e) = config.validate() {
        issues.push(e.to_string());
    }

    let db_path = &config.database.path;
    if db_path.exists() {
        println!("✓ Banco de dados: {}", db_path.display());

        let service = Arc::new(LookupService::from_config(config));
        let probe = Arc::clone(&service);
        let init = tokio::task::spawn_blocking(move || probe.pool().initialize())
            .await
            .map_err(|e| ConsultaError::other(e.to_string()))?;

        match init {
            Ok(()) => {
                let status = service.pool().status();
                println!(
                    "✓ Pool de conexões: {} abertas (min {}, max {})",
                    status.connections, status.min, status.max
                );
                println!("✓ Esquema compatível com a consulta");
            }
            Err(e) => issues.push(e.to_string()),
        }
    } else {
        issues.push(format!("Banco de dados não encontrado: {}", db_path.display()));
    }

    println!();
    if issues.is_empty() {
        println!("Nenhum problema encontrado.");
        Ok(())
    } else {
        for issue in &issues {
            println!("✗ {}", issue);
        }
        Err(ConsultaError::config(format!(
            "{} problema(s) encontrado(s)",
            issues.len()
        )))
    }
}

/// Mostra versão.
pub fn version() {
    println!("consulta-cnpj {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Consulta de CNPJ com cache LRU e pool de conexões");
}
