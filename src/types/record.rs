//! Registro de estabelecimento devolvido por uma consulta.

use serde::{Deserialize, Serialize};

/// Código de situação cadastral que indica empresa ativa.
pub const ACTIVE_STATUS: &str = "02";

/// Resultado imutável de uma consulta bem-sucedida.
///
/// Os nomes dos campos seguem o contrato JSON de `POST /consultar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// CNPJ formatado (`NN.NNN.NNN/NNNN-NN`).
    pub cnpj: String,

    /// Razão social.
    pub nome: String,

    /// Código da situação cadastral.
    pub situacao: String,

    /// Logradouro, número e bairro.
    pub endereco: String,

    /// CEP, só dígitos.
    pub cep: String,

    /// Nome do município.
    pub municipio: String,

    /// Sigla da unidade federativa.
    pub uf: String,

    /// `true` quando a situação cadastral é [`ACTIVE_STATUS`].
    pub ativa: bool,
}

impl Record {
    /// Indica se o código de situação corresponde a uma empresa ativa.
    pub fn is_active_status(situacao: &str) -> bool {
        situacao == ACTIVE_STATUS
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CNPJ: {}", self.cnpj)?;
        writeln!(f, "Nome: {}", self.nome)?;
        writeln!(f, "Situação Cadastral: {}", self.situacao)?;
        writeln!(f, "Endereço: {}", self.endereco)?;
        writeln!(f, "CEP: {}", self.cep)?;
        writeln!(f, "Município: {}", self.municipio)?;
        writeln!(f, "UF: {}", self.uf)?;
        write!(f, "Status: {}", if self.ativa { "Ativa" } else { "Inativa" })
    }
}
