//! Consulta fixa de estabelecimento e conversão da linha em [`Record`].

use std::time::{Duration, Instant};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::cnpj::{format_for_display, Cnpj};
use crate::types::errors::LookupError;
use crate::types::record::Record;

/// Nome devolvido pela consulta quando o código do município não existe em `munic`.
pub const UNKNOWN_MUNICIPALITY: &str = "Município não encontrado";

/// Instruções da VM do SQLite entre verificações do prazo da consulta.
const PROGRESS_OPS: i32 = 1_000;

/// Busca por segmentos, usando parâmetros posicionais.
pub const LOOKUP_SQL: &str = "
    SELECT
        e.cnpj_basico,
        e.cnpj_ordem,
        e.cnpj_dv,
        em.razao_social,
        e.situacao_cadastral,
        e.logradouro,
        e.numero,
        e.bairro,
        e.cep,
        COALESCE(m.descricao, 'Município não encontrado') AS municipio_nome,
        e.uf
    FROM estabelecimento e
    JOIN empresa em ON em.cnpj_basico = e.cnpj_basico
    LEFT JOIN munic m ON CAST(e.municipio AS TEXT) = CAST(m.codigo AS TEXT)
    WHERE e.cnpj_basico = ?1
      AND e.cnpj_ordem = ?2
      AND e.cnpj_dv = ?3
    LIMIT 1
";

/// Linha crua retornada por [`LOOKUP_SQL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstabelecimentoRow {
    pub cnpj_basico: String,
    pub cnpj_ordem: String,
    pub cnpj_dv: String,
    pub razao_social: String,
    pub situacao_cadastral: String,
    pub logradouro: String,
    pub numero: String,
    pub bairro: String,
    pub cep: String,
    pub municipio: String,
    pub uf: String,
}

impl EstabelecimentoRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            cnpj_basico: text(row, 0)?,
            cnpj_ordem: text(row, 1)?,
            cnpj_dv: text(row, 2)?,
            razao_social: text(row, 3)?,
            situacao_cadastral: text(row, 4)?,
            logradouro: text(row, 5)?,
            numero: text(row, 6)?,
            bairro: text(row, 7)?,
            cep: text(row, 8)?,
            municipio: text(row, 9)?,
            uf: text(row, 10)?,
        })
    }

    /// Monta o registro: campos aparados, endereço composto, flag de ativa.
    pub fn into_record(self) -> Record {
        let digits = format!(
            "{}{}{}",
            self.cnpj_basico.trim(),
            self.cnpj_ordem.trim(),
            self.cnpj_dv.trim()
        );

        let endereco = format!(
            "{}, {}, {}",
            self.logradouro.trim(),
            self.numero.trim(),
            self.bairro.trim()
        )
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string();

        let situacao = self.situacao_cadastral.trim().to_string();

        Record {
            cnpj: format_for_display(&digits),
            nome: self.razao_social.trim().to_string(),
            ativa: Record::is_active_status(&situacao),
            situacao,
            endereco,
            cep: self.cep.trim().to_string(),
            municipio: self.municipio.trim().to_string(),
            uf: self.uf.trim().to_string(),
        }
    }
}

/// Lê uma coluna como texto; NULL vira string vazia e números viram decimais.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    })
}

/// Remove o progress handler ao sair do escopo.
struct Deadline<'a> {
    conn: &'a Connection,
}

impl<'a> Deadline<'a> {
    fn arm(conn: &'a Connection, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        conn.progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= deadline));
        Self { conn }
    }
}

impl Drop for Deadline<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(PROGRESS_OPS, None::<fn() -> bool>);
    }
}

/// Executa a consulta para `cnpj`, interrompendo-a após `timeout`.
pub fn fetch_estabelecimento(
    conn: &Connection,
    cnpj: &Cnpj,
    timeout: Duration,
) -> Result<Option<EstabelecimentoRow>, LookupError> {
    let _deadline = Deadline::arm(conn, timeout);

    let result = conn.prepare_cached(LOOKUP_SQL).and_then(|mut stmt| {
        stmt.query_row(
            params![cnpj.basico(), cnpj.ordem(), cnpj.dv()],
            EstabelecimentoRow::from_row,
        )
        .optional()
    });

    result.map_err(|e| {
        if e.sqlite_error_code() == Some(rusqlite::ErrorCode::OperationInterrupted) {
            LookupError::QueryTimeout(timeout.as_millis() as u64)
        } else {
            LookupError::Database(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> EstabelecimentoRow {
        EstabelecimentoRow {
            cnpj_basico: "11222333".to_string(),
            cnpj_ordem: "0001".to_string(),
            cnpj_dv: "81".to_string(),
            razao_social: "  EMPRESA EXEMPLO LTDA ".to_string(),
            situacao_cadastral: "02".to_string(),
            logradouro: "RUA DAS FLORES ".to_string(),
            numero: " 100".to_string(),
            bairro: "CENTRO".to_string(),
            cep: "01001000 ".to_string(),
            municipio: "SAO PAULO   ".to_string(),
            uf: "SP".to_string(),
        }
    }

    #[test]
    fn test_into_record_trims_and_formats() {
        let record = sample_row().into_record();

        assert_eq!(record.cnpj, "11.222.333/0001-81");
        assert_eq!(record.nome, "EMPRESA EXEMPLO LTDA");
        assert_eq!(record.endereco, "RUA DAS FLORES, 100, CENTRO");
        assert_eq!(record.cep, "01001000");
        assert_eq!(record.municipio, "SAO PAULO");
        assert!(record.ativa);
    }

    #[test]
    fn test_inactive_status() {
        let mut row = sample_row();
        row.situacao_cadastral = "08".to_string();

        let record = row.into_record();
        assert_eq!(record.situacao, "08");
        assert!(!record.ativa);
    }

    #[test]
    fn test_missing_address_parts() {
        let mut row = sample_row();
        row.numero = String::new();
        row.bairro = String::new();

        assert_eq!(row.into_record().endereco, "RUA DAS FLORES");

        let empty = EstabelecimentoRow {
            cnpj_basico: "11222333".to_string(),
            cnpj_ordem: "0001".to_string(),
            cnpj_dv: "81".to_string(),
            ..Default::default()
        };
        let record = empty.into_record();
        assert_eq!(record.endereco, "");
        assert_eq!(record.municipio, "");
        assert!(!record.ativa);
    }

    #[test]
    fn test_fetch_uses_segments() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE estabelecimento (
                cnpj_basico TEXT, cnpj_ordem TEXT, cnpj_dv TEXT,
                situacao_cadastral TEXT, logradouro TEXT, numero TEXT,
                bairro TEXT, cep TEXT, municipio INTEGER, uf TEXT
            );
            CREATE TABLE empresa (cnpj_basico TEXT, razao_social TEXT);
            CREATE TABLE munic (codigo TEXT, descricao TEXT);
            INSERT INTO empresa VALUES ('11222333', 'EMPRESA EXEMPLO LTDA');
            INSERT INTO estabelecimento VALUES
                ('11222333', '0001', '81', '02', 'RUA A', '1', 'CENTRO', '01001000', 7107, 'SP');
            INSERT INTO munic VALUES ('7107', 'SAO PAULO');
            "#,
        )
        .unwrap();

        let cnpj = Cnpj::parse("11222333000181").unwrap();
        let row = fetch_estabelecimento(&conn, &cnpj, Duration::from_secs(1))
            .unwrap()
            .unwrap();
        assert_eq!(row.municipio, "SAO PAULO");

        conn.execute("DELETE FROM munic", []).unwrap();
        let row = fetch_estabelecimento(&conn, &cnpj, Duration::from_secs(1))
            .unwrap()
            .unwrap();
        assert_eq!(row.municipio, UNKNOWN_MUNICIPALITY);

        let other = Cnpj::parse("11222333000262").unwrap();
        let none = fetch_estabelecimento(&conn, &other, Duration::from_secs(1)).unwrap();
        assert!(none.is_none());
    }

    /// Tabelas sem índice com `rows` linhas em cada, para consultas lentas.
    fn create_large_unindexed(conn: &Connection, rows: u32) {
        conn.execute_batch(
            r#"
            CREATE TABLE estabelecimento (
                cnpj_basico TEXT, cnpj_ordem TEXT, cnpj_dv TEXT,
                situacao_cadastral TEXT, logradouro TEXT, numero TEXT,
                bairro TEXT, cep TEXT, municipio TEXT, uf TEXT
            );
            CREATE TABLE empresa (cnpj_basico TEXT, razao_social TEXT);
            CREATE TABLE munic (codigo TEXT, descricao TEXT);
            "#,
        )
        .unwrap();
        conn.execute(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?1)
             INSERT INTO estabelecimento
             SELECT printf('%08d', n), '0001', '00', '02', 'RUA', '1', 'BAIRRO',
                    '00000000', '7107', 'SP'
             FROM seq",
            [rows],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO empresa SELECT cnpj_basico, 'EMPRESA' FROM estabelecimento",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_query_timeout_interrupts_and_clears_handler() {
        let conn = Connection::open_in_memory().unwrap();
        create_large_unindexed(&conn, 200_000);
        let cnpj = Cnpj::parse("99888777000166").unwrap();

        let result = fetch_estabelecimento(&conn, &cnpj, Duration::ZERO);
        assert!(matches!(result, Err(LookupError::QueryTimeout(0))));

        // O prazo anterior não pode sobreviver na conexão
        let result = fetch_estabelecimento(&conn, &cnpj, Duration::from_secs(30));
        assert!(matches!(result, Ok(None)));

        let count: i64 = conn
            .query_row("SELECT count(*) FROM estabelecimento", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 200_000);
    }

    #[test]
    fn test_fetch_reports_database_error() {
        let conn = Connection::open_in_memory().unwrap();
        let cnpj = Cnpj::parse("11222333000181").unwrap();

        let result = fetch_estabelecimento(&conn, &cnpj, Duration::from_secs(1));
        assert!(matches!(result, Err(LookupError::Database(_))));
    }
}
