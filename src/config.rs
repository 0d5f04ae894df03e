// ============================================================================
// Configuration
// ============================================================================
// Lue depuis les variables d'environnement, avec un fichier .env optionnel
// chargé au démarrage (dotenvy). Chaque valeur a un défaut raisonnable sauf
// la clé d'API de cotations.
//
// | Variable            | Défaut                                  |
// |---------------------|-----------------------------------------|
// | BIND_ADDR           | 127.0.0.1:5000                          |
// | QUOTE_API_BASE_URL  | https://finnhub.io/api/v1               |
// | QUOTE_API_KEY       | (vide)                                  |
// | CHART_API_BASE_URL  | https://query1.finance.yahoo.com        |
// | DASHBOARD_SYMBOLS   | GOOGL,IBM,MSFT,AAPL,AMZN,TSLA,NVDA,META |
// | CACHE_PATH          | stock_data.json                         |
// | REQUEST_SPACING_MS  | 500                                     |
// | LOG_DIR             | ./logs                                  |
// ============================================================================

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::Symbol;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_QUOTE_API_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_CHART_API_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_DASHBOARD_SYMBOLS: &str = "GOOGL,IBM,MSFT,AAPL,AMZN,TSLA,NVDA,META";
pub const DEFAULT_CACHE_PATH: &str = "stock_data.json";
pub const DEFAULT_REQUEST_SPACING_MS: u64 = 500;
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Configuration complète du serveur
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub quote_api_base_url: String,
    pub quote_api_key: String,
    pub chart_api_base_url: String,
    /// Symboles affichés sur le dashboard, dans cet ordre
    pub dashboard_symbols: Vec<Symbol>,
    pub cache_path: PathBuf,
    /// Écart minimum entre deux appels amont
    pub request_spacing: Duration,
    pub log_dir: PathBuf,
}

impl Config {
    /// Charge .env (s'il existe) puis lit l'environnement
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture
    ///
    /// CONCEPT RUST : Closure en paramètre
    /// - `impl Fn(&str) -> Option<String>` : n'importe quelle source
    ///   (environnement réel, HashMap dans les tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Une variable vide est traitée comme absente
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR doit être une adresse host:port valide")?;

        let dashboard_symbols = Symbol::parse_list(
            &get("DASHBOARD_SYMBOLS").unwrap_or_else(|| DEFAULT_DASHBOARD_SYMBOLS.to_string()),
        )
        .context("DASHBOARD_SYMBOLS contient un symbole invalide")?;

        let spacing_ms = match get("REQUEST_SPACING_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .context("REQUEST_SPACING_MS doit être un entier (millisecondes)")?,
            None => DEFAULT_REQUEST_SPACING_MS,
        };

        Ok(Self {
            bind_addr,
            quote_api_base_url: get("QUOTE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_QUOTE_API_BASE_URL.to_string()),
            quote_api_key: get("QUOTE_API_KEY").unwrap_or_default(),
            chart_api_base_url: get("CHART_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CHART_API_BASE_URL.to_string()),
            dashboard_symbols,
            cache_path: PathBuf::from(get("CACHE_PATH").unwrap_or_else(|| DEFAULT_CACHE_PATH.to_string())),
            request_spacing: Duration::from_millis(spacing_ms),
            log_dir: PathBuf::from(get("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.dashboard_symbols.len(), 8);
        assert_eq!(config.dashboard_symbols[0].as_str(), "GOOGL");
        assert_eq!(config.request_spacing, Duration::from_millis(500));
        assert_eq!(config.cache_path, PathBuf::from("stock_data.json"));
        assert!(config.quote_api_key.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("QUOTE_API_KEY", "abc"),
            ("DASHBOARD_SYMBOLS", "aapl, btc-usd"),
            ("REQUEST_SPACING_MS", "0"),
            ("CACHE_PATH", ""),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.quote_api_key, "abc");
        assert_eq!(config.dashboard_symbols[1].as_str(), "BTC-USD");
        assert_eq!(config.request_spacing, Duration::ZERO);
        assert_eq!(config.cache_path, PathBuf::from(DEFAULT_CACHE_PATH));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("REQUEST_SPACING_MS", "soon")]).is_err());
        assert!(config_from(&[("DASHBOARD_SYMBOLS", "AAPL,$$$")]).is_err());
    }
}
