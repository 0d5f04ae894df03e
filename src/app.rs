// ============================================================================
// Structure : AppState
// ============================================================================
// État partagé par toutes les routes du serveur : configuration, clients
// API, cache et espacement des appels amont.
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Construite une fois au démarrage, partagée via web::Data (un Arc)
// - Tout ce qu'elle contient est immuable ou synchronisé en interne
// ============================================================================

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{display_timestamp, ChartClient, HttpTransport, QuoteClient, RequestSpacing};
use crate::cache::QuoteCache;
use crate::config::Config;
use crate::models::{DashboardEntry, Quote};

/// État global de l'application
pub struct AppState {
    pub config: Config,
    pub quotes: QuoteClient,
    pub charts: ChartClient,
    pub cache: Arc<dyn QuoteCache>,
    pub spacing: RequestSpacing,
}

/// Données de la page d'accueil
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub quotes: Vec<Quote>,
    /// Heure affichée "Mis à jour à ..."
    pub updated_time: String,
    /// true si les cotations viennent du cache
    pub from_cache: bool,
}

impl AppState {
    /// Assemble l'état à partir de la configuration et des dépendances injectées
    pub fn new(config: Config, transport: Arc<dyn HttpTransport>, cache: Arc<dyn QuoteCache>) -> Self {
        if config.quote_api_key.is_empty() {
            warn!("QUOTE_API_KEY is not set, quotes will show as N/A");
        }

        let quotes = QuoteClient::new(
            transport.clone(),
            config.quote_api_base_url.clone(),
            config.quote_api_key.clone(),
        );
        let charts = ChartClient::new(transport, config.chart_api_base_url.clone());
        let spacing = RequestSpacing::new(config.request_spacing);

        Self {
            config,
            quotes,
            charts,
            cache,
            spacing,
        }
    }

    /// Cotations de tous les symboles configurés, dans l'ordre de la config
    ///
    /// Toutes les cotations du lot partagent la même heure d'affichage ;
    /// un symbole en échec devient une entrée "N/A".
    pub async fn fetch_all_quotes(&self) -> Vec<DashboardEntry> {
        let batch_time = display_timestamp();
        self.fetch_all_quotes_at(&batch_time).await
    }

    async fn fetch_all_quotes_at(&self, batch_time: &str) -> Vec<DashboardEntry> {
        let mut entries = Vec::with_capacity(self.config.dashboard_symbols.len());

        for symbol in &self.config.dashboard_symbols {
            self.spacing.wait_turn().await;
            let entry = match self.quotes.fetch_quote(symbol, Some(batch_time)).await {
                Some(quote) => DashboardEntry::Available(quote),
                None => DashboardEntry::Unavailable(symbol.clone()),
            };
            entries.push(entry);
        }

        entries
    }

    /// Données de la page d'accueil : cache si présent, sinon API
    ///
    /// Après un fetch réussi (au moins une cotation), le lot est écrit dans
    /// le cache ; un échec d'écriture est seulement loggé.
    pub async fn load_dashboard(&self) -> DashboardView {
        if let Some(quotes) = self.cache.load() {
            let updated_time = quotes
                .first()
                .map(|q| q.timestamp.clone())
                .unwrap_or_else(display_timestamp);
            info!(quotes = quotes.len(), "Dashboard served from cache");
            return DashboardView {
                quotes,
                updated_time,
                from_cache: true,
            };
        }

        let batch_time = display_timestamp();
        let quotes: Vec<Quote> = self
            .fetch_all_quotes_at(&batch_time)
            .await
            .into_iter()
            .filter_map(|entry| match entry {
                DashboardEntry::Available(quote) => Some(quote),
                DashboardEntry::Unavailable(_) => None,
            })
            .collect();

        if quotes.is_empty() {
            warn!("No quote fetched, nothing to cache");
        } else if let Err(e) = self.cache.store(&quotes) {
            warn!(error = %e, "Could not write quote cache");
        } else {
            info!(quotes = quotes.len(), "Quote cache refreshed");
        }

        DashboardView {
            quotes,
            updated_time: batch_time,
            from_cache: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::transport::testing::CannedTransport;
    use crate::cache::MemoryQuoteCache;
    use crate::models::Symbol;

    /// Config de test : deux symboles, aucun espacement
    pub(crate) fn test_config() -> Config {
        let mut config = Config::from_lookup(|key| match key {
            "DASHBOARD_SYMBOLS" => Some("AAPL,IBM".to_string()),
            "QUOTE_API_BASE_URL" => Some("https://quotes.test".to_string()),
            "CHART_API_BASE_URL" => Some("https://chart.test".to_string()),
            "QUOTE_API_KEY" => Some("key".to_string()),
            _ => None,
        })
        .unwrap();
        config.request_spacing = std::time::Duration::ZERO;
        config
    }

    pub(crate) fn aapl_only_transport() -> CannedTransport {
        CannedTransport::new().respond(
            "symbol=AAPL",
            200,
            r#"{"c": 110.0, "pc": 100.0, "o": 101.0, "h": 111.0, "l": 99.0}"#,
        )
    }

    #[tokio::test]
    async fn test_fetch_all_quotes_marks_failures() {
        let state = AppState::new(
            test_config(),
            Arc::new(aapl_only_transport()),
            Arc::new(MemoryQuoteCache::new()),
        );

        let entries = state.fetch_all_quotes().await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].quote().unwrap().close, Some(110.0));
        assert_eq!(
            entries[1],
            DashboardEntry::Unavailable(Symbol::parse("IBM").unwrap())
        );
    }

    #[tokio::test]
    async fn test_load_dashboard_fetches_then_caches() {
        let cache = Arc::new(MemoryQuoteCache::new());
        let transport = Arc::new(aapl_only_transport());
        let state = AppState::new(test_config(), transport.clone(), cache.clone());

        let view = state.load_dashboard().await;
        assert!(!view.from_cache);
        assert_eq!(view.quotes.len(), 1);
        assert_eq!(view.quotes[0].timestamp, view.updated_time);
        assert_eq!(cache.load().unwrap().len(), 1);
        assert_eq!(transport.requests().len(), 2);

        let view = state.load_dashboard().await;
        assert!(view.from_cache);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_load_dashboard_does_not_cache_empty_batch() {
        let cache = Arc::new(MemoryQuoteCache::new());
        let state = AppState::new(test_config(), Arc::new(CannedTransport::new()), cache.clone());

        let view = state.load_dashboard().await;
        assert!(view.quotes.is_empty());
        assert!(cache.load().is_none());
    }
}
