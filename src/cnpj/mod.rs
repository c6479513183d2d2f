//! Normalização e formatação de CNPJ.
//!
//! Um CNPJ tem 14 dígitos: raiz (8), ordem (4) e dígitos verificadores (2).
//! Nenhuma função aqui faz I/O.

/// Quantidade de dígitos de um CNPJ completo.
pub const CNPJ_LEN: usize = 14;

/// Remove todo caractere que não seja dígito ASCII.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Aplica a máscara `NN.NNN.NNN/NNNN-NN`.
///
/// Entradas que não têm exatamente 14 dígitos ASCII são devolvidas sem alteração.
pub fn format_for_display(digits: &str) -> String {
    if digits.len() != CNPJ_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    )
}

/// CNPJ normalizado e dividido nos três segmentos usados pela consulta.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cnpj {
    digits: String,
}

impl Cnpj {
    /// Normaliza `input` e valida o tamanho.
    ///
    /// Retorna `None` quando o resultado não tem 14 dígitos.
    pub fn parse(input: &str) -> Option<Self> {
        let digits = normalize(input);
        if digits.len() != CNPJ_LEN {
            return None;
        }
        Some(Self { digits })
    }

    /// Os 14 dígitos; também é a chave do cache.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Raiz do CNPJ (`cnpj_basico`).
    pub fn basico(&self) -> &str {
        &self.digits[..8]
    }

    /// Número do estabelecimento (`cnpj_ordem`).
    pub fn ordem(&self) -> &str {
        &self.digits[8..12]
    }

    /// Dígitos verificadores (`cnpj_dv`).
    pub fn dv(&self) -> &str {
        &self.digits[12..]
    }

    pub fn formatted(&self) -> String {
        format_for_display(&self.digits)
    }
}

impl std::fmt::Display for Cnpj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}
