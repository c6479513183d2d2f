//! Testes de integração para a CLI.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use common::{TestDb, ACTIVE_CNPJ, MISSING_CNPJ};

fn consulta_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_consulta-cnpj"))
}

/// Grava um arquivo de configuração apontando para o banco de teste.
fn write_config(dir: &TempDir, db: &TestDb) -> std::path::PathBuf {
    let path = dir.path().join("consulta-cnpj.toml");
    let content = format!(
        "[database]\npath = {:?}\npool_min = 1\npool_max = 2\nacquire_timeout_ms = 300\n",
        db.path.display().to_string()
    );
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_version_command() {
    consulta_bin()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("consulta-cnpj"));
}

#[test]
fn test_help_command() {
    consulta_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("serve"))
                .and(predicate::str::contains("lookup"))
                .and(predicate::str::contains("doctor")),
        );
}

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    consulta_bin()
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));

    let config = consulta_cnpj::Config::load(dir.path().join("consulta-cnpj.toml")).unwrap();
    assert_eq!(config.database.pool_max, 20);

    // Segunda execução não sobrescreve
    consulta_bin()
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_lookup_prints_record() {
    let db = TestDb::new();
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &db);

    consulta_bin()
        .arg("--config")
        .arg(&config)
        .args(["lookup", "11.222.333/0001-81"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("EMPRESA EXEMPLO LTDA")
                .and(predicate::str::contains("Status: Ativa")),
        );
}

#[test]
fn test_lookup_json_output() {
    let db = TestDb::new();
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &db);

    let output = consulta_bin()
        .arg("--config")
        .arg(&config)
        .args(["lookup", "--json", ACTIVE_CNPJ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let record: consulta_cnpj::Record = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record.cnpj, "11.222.333/0001-81");
    assert!(record.ativa);
}

#[test]
fn test_lookup_not_found_and_invalid() {
    let db = TestDb::new();
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &db);

    consulta_bin()
        .arg("--config")
        .arg(&config)
        .args(["lookup", MISSING_CNPJ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNPJ não encontrado."));

    consulta_bin()
        .arg("--config")
        .arg(&config)
        .args(["lookup", "123"])
        .assert()
        .failure();
}

#[test]
fn test_doctor_reports_missing_database() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("consulta-cnpj.toml");
    std::fs::write(&config, "[database]\npath = \"/nonexistent/dados.db\"\n").unwrap();

    consulta_bin()
        .arg("--config")
        .arg(&config)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("não encontrado"));
}

#[test]
fn test_doctor_ok_with_database() {
    let db = TestDb::new();
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &db);

    consulta_bin()
        .arg("--config")
        .arg(&config)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum problema encontrado"));
}
