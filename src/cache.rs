// ============================================================================
// Cache de la dernière série de cotations
// ============================================================================
// Le dashboard lit le cache s'il existe, sinon il interroge l'API et écrit
// le résultat. C'est un cache "best effort" :
// - fichier absent, illisible, JSON invalide ou liste vide → cache miss
// - échec d'écriture → loggé, jamais fatal
// - pas de verrou : deux requêtes simultanées peuvent s'écraser, c'est accepté
//
// CONCEPT RUST : Trait object
// - Le serveur reçoit un Arc<dyn QuoteCache>, fichier en production,
//   mémoire dans les tests
// ============================================================================

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::CacheError;
use crate::models::Quote;

/// Stockage de la dernière série de cotations
pub trait QuoteCache: Send + Sync {
    /// Dernière série non vide, ou None
    fn load(&self) -> Option<Vec<Quote>>;

    /// Remplace la série stockée
    fn store(&self, quotes: &[Quote]) -> Result<(), CacheError>;
}

/// Cache dans un fichier JSON (par défaut `stock_data.json`)
#[derive(Debug, Clone)]
pub struct FileQuoteCache {
    path: PathBuf,
}

impl FileQuoteCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuoteCache for FileQuoteCache {
    fn load(&self) -> Option<Vec<Quote>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No quote cache on disk");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read quote cache");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Quote>>(&content) {
            Ok(quotes) if !quotes.is_empty() => {
                debug!(quotes = quotes.len(), "Quotes loaded from cache");
                Some(quotes)
            }
            Ok(_) => {
                warn!(path = %self.path.display(), "Quote cache is empty, fetching live data");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not decode quote cache, fetching live data");
                None
            }
        }
    }

    fn store(&self, quotes: &[Quote]) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(quotes)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), quotes = quotes.len(), "Quote cache written");
        Ok(())
    }
}

/// Cache en mémoire (même contrat que le fichier)
#[derive(Debug, Default)]
pub struct MemoryQuoteCache {
    quotes: Mutex<Vec<Quote>>,
}

impl MemoryQuoteCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuoteCache for MemoryQuoteCache {
    fn load(&self) -> Option<Vec<Quote>> {
        let quotes = self.quotes.lock().unwrap_or_else(|e| e.into_inner());
        if quotes.is_empty() {
            None
        } else {
            Some(quotes.clone())
        }
    }

    fn store(&self, quotes: &[Quote]) -> Result<(), CacheError> {
        let mut stored = self.quotes.lock().unwrap_or_else(|e| e.into_inner());
        *stored = quotes.to_vec();
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
