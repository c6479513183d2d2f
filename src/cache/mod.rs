//! Cache LRU de registros consultados.
//!
//! Este módulo implementa um cache Least Recently Used (LRU) limitado,
//! indexado pelo CNPJ normalizado, evitando consultas repetidas ao banco
//! para o mesmo estabelecimento.

mod lru;

pub use self::lru::{CacheStats, RecordCache};
