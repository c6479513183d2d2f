//! Cache LRU de registros.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::types::config::default_cache_capacity;
use crate::types::record::Record;

/// Estatísticas do cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Capacidade máxima.
    pub capacity: usize,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses).
    pub misses: u64,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache LRU thread-safe de registros, chaveado pelos 14 dígitos do CNPJ.
///
/// Todas as operações passam pelo mesmo mutex: `get` também escreve,
/// porque promove a chave para a posição mais recente.
pub struct RecordCache {
    cache: Mutex<LruCache<String, Arc<Record>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecordCache {
    /// Cria um novo cache.
    ///
    /// Capacidade zero cai no padrão de 10 000 entradas.
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(default_cache_capacity()))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cria um cache com configuração padrão.
    pub fn default_config() -> Self {
        Self::new(default_cache_capacity())
    }

    /// Busca no cache, promovendo a chave para mais recente.
    ///
    /// Ausência não é erro: retorna `None`.
    pub fn get(&self, key: &str) -> Option<Arc<Record>> {
        let found = self.cache.lock().get(key).cloned();

        match found {
            Some(record) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insere ou sobrescreve uma entrada.
    ///
    /// Chave nova com o cache cheio remove exatamente a entrada menos
    /// recentemente usada. Sobrescrever uma chave existente a promove
    /// e não remove nada, já que o tamanho não cresce.
    pub fn set(&self, key: String, record: Arc<Record>) {
        let mut cache = self.cache.lock();
        if let Some((old_key, _)) = cache.push(key, record) {
            if !cache.contains(&old_key) {
                tracing::debug!(evicted = %old_key, "Cache full, evicted oldest entry");
            }
        }
    }

    /// Verifica presença sem alterar a ordem de uso.
    pub fn contains(&self, key: &str) -> bool {
        self.cache.lock().contains(key)
    }

    /// Limpa todo o cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Número atual de entradas.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().cap().get()
    }

    /// Chaves da menos para a mais recentemente usada.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.cache.lock().iter().rev().map(|(k, _)| k.clone()).collect()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.lock();
        CacheStats {
            size: cache.len(),
            capacity: cache.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::default_config()
    }
}
