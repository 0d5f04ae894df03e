// ============================================================================
// API Client : cotations temps réel
// ============================================================================
// Récupère la cotation d'un symbole depuis une API de type Finnhub :
//   GET {base}/quote?symbol=AAPL&token=...
//   → { "c": 187.3, "pc": 185.1, "o": 186.0, "h": 188.2, "l": 185.5, ... }
//
// Les champs sont lus défensivement : un champ absent ou non numérique
// devient None, il ne fait jamais échouer la cotation.
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::api::transport::{HttpRequest, HttpTransport};
use crate::error::MarketError;
use crate::models::{Quote, Symbol};

/// Timeout d'un appel de cotation
const QUOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Format de l'heure affichée sur le dashboard (ex: "03:15:42 PM")
pub const DISPLAY_TIME_FORMAT: &str = "%I:%M:%S %p";

/// Heure locale courante au format d'affichage
pub fn display_timestamp() -> String {
    chrono::Local::now().format(DISPLAY_TIME_FORMAT).to_string()
}

/// Client de l'API de cotations
#[derive(Clone)]
pub struct QuoteClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl QuoteClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Cotation d'un symbole, ou None en cas d'échec (erreur loggée)
    ///
    /// `timestamp_override` permet de donner la même heure à tout un lot
    pub async fn fetch_quote(&self, symbol: &Symbol, timestamp_override: Option<&str>) -> Option<Quote> {
        match self.try_fetch_quote(symbol, timestamp_override).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                error!(ticker = %symbol, error = %e, "Failed to fetch quote");
                None
            }
        }
    }

    /// Cotation d'un symbole avec la raison de l'échec
    #[instrument(skip(self, timestamp_override), fields(ticker = %symbol))]
    pub async fn try_fetch_quote(
        &self,
        symbol: &Symbol,
        timestamp_override: Option<&str>,
    ) -> Result<Quote, MarketError> {
        // Le token n'apparaît jamais dans les logs
        debug!(base_url = %self.base_url, "Requesting quote");
        let url = build_quote_url(&self.base_url, symbol, &self.api_key)?;

        let response = self
            .transport
            .execute(HttpRequest::get(url).with_timeout(QUOTE_TIMEOUT))
            .await?
            .error_for_status()?;

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| MarketError::MalformedResponse(format!("invalid quote JSON: {}", e)))?;

        let timestamp = timestamp_override
            .map(str::to_string)
            .unwrap_or_else(display_timestamp);

        let quote = parse_quote(symbol, &payload, timestamp)?;
        info!(close = ?quote.close, change = ?quote.change, "Quote fetched");
        Ok(quote)
    }
}

/// `{base}/quote?symbol=..&token=..`, paramètres encodés
fn build_quote_url(base_url: &str, symbol: &Symbol, api_key: &str) -> Result<String, MarketError> {
    Url::parse_with_params(
        &format!("{}/quote", base_url),
        &[("symbol", symbol.as_str()), ("token", api_key)],
    )
    .map(String::from)
    .map_err(|e| MarketError::InvalidInput(format!("invalid quote API URL: {}", e)))
}

/// Convertit le JSON amont en Quote
fn parse_quote(symbol: &Symbol, payload: &Value, timestamp: String) -> Result<Quote, MarketError> {
    let fields = payload.as_object().ok_or_else(|| {
        MarketError::MalformedResponse("quote payload is not a JSON object".to_string())
    })?;

    // Seuls les vrais nombres JSON sont acceptés ("12.5" en string → None)
    let number = |key: &str| fields.get(key).and_then(Value::as_f64);

    Ok(Quote::new(
        symbol.clone(),
        number("o"),
        number("h"),
        number("l"),
        number("c"),
        number("pc"),
        timestamp,
    ))
}

// ============================================================================
// Tests unitaires
// ============================================================================
