use clap::Parser;
use consulta_cnpj::cli::{Cli, Commands};
use consulta_cnpj::types::config::Config;
use consulta_cnpj::ConsultaResult;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn directive(target: &str, level: &str) -> Directive {
    format!("{}={}", target, level).parse().unwrap_or_else(|_| {
        format!("{}=info", target)
            .parse()
            .expect("fallback directive is valid")
    })
}

#[tokio::main]
async fn main() -> ConsultaResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default_config()
    };

    // Determine log level: CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(directive("consulta_cnpj", &log_level))
        .add_directive(directive("tower_http", &log_level));

    if config.general.log_format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            consulta_cnpj::cli::commands::init(path).await?;
        }
        Commands::Serve { host, port } => {
            consulta_cnpj::cli::commands::serve(host, port, &config).await?;
        }
        Commands::Lookup { cnpj, json } => {
            consulta_cnpj::cli::commands::lookup(&cnpj, json, &config).await?;
        }
        Commands::Doctor => {
            consulta_cnpj::cli::commands::doctor(&cli.config, &config).await?;
        }
        Commands::Version => {
            consulta_cnpj::cli::commands::version();
        }
    }

    Ok(())
}
