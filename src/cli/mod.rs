//! Interface de linha de comando.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::config::DEFAULT_CONFIG_FILE;

/// consulta-cnpj - consulta de CNPJ com cache LRU e pool de conexões.
#[derive(Parser, Debug)]
#[command(name = "consulta-cnpj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inicializa configuração no diretório atual.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Inicia o servidor HTTP.
    Serve {
        /// Endereço de bind (sobrescreve a configuração).
        #[arg(long)]
        host: Option<String>,

        /// Porta (sobrescreve a configuração).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Consulta um CNPJ e imprime o resultado.
    Lookup {
        /// CNPJ, com ou sem pontuação.
        cnpj: String,

        /// Imprime o registro em JSON.
        #[arg(long)]
        json: bool,
    },

    /// Diagnostica configuração e banco de dados.
    Doctor,

    /// Mostra versão.
    Version,
}
