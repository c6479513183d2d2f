//! Pool de conexões com o banco de dados.
//!
//! ## Componentes
//!
//! - **ConnectionPoolManager**: cria o pool sob demanda, uma única vez, e
//!   empresta conexões com tempo limite de aquisição
//! - **PooledConnection**: guarda de escopo que devolve a conexão ao pool
//!   exatamente uma vez, em qualquer caminho de saída

mod manager;

pub use manager::{ConnectionPoolManager, PoolStatus, PooledConnection};
