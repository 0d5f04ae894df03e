// ============================================================================
// API Client : Yahoo Finance (historique)
// ============================================================================
// Récupère l'historique des prix de clôture depuis l'endpoint chart v8 :
//   GET {base}/v8/finance/chart/AAPL?range=10y&interval=1d
//
// CONCEPTS RUST :
// 1. Serde : structures qui matchent le JSON de Yahoo
// 2. serde_json::Value pour les prix : un prix non numérique (null, string)
//    ne doit pas faire échouer toute la désérialisation, seulement ce point
// 3. zip : appariement positionnel timestamp[i] <-> close[i]
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::transport::{HttpRequest, HttpTransport};
use crate::error::MarketError;
use crate::models::{round2, PriceSeries, Symbol};

/// Timeout d'un appel historique
const CHART_TIMEOUT: Duration = Duration::from_secs(10);

/// Yahoo rejette (403) les requêtes sans User-Agent de navigateur
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Format des labels de dates
const LABEL_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================

/// Réponse complète de l'API Yahoo Finance
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    /// null quand Yahoo renvoie une erreur (symbole inconnu, etc.)
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Value>,
}

// ============================================================================
// Client
// ============================================================================

/// Client de l'endpoint historique de Yahoo Finance
#[derive(Clone)]
pub struct ChartClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl ChartClient {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Récupère la série de clôtures d'un symbole
    ///
    /// # Arguments
    /// * `symbol` - Symbole validé (ex: AAPL)
    /// * `range` - Profondeur d'historique (ex: "1y", "10y", "max")
    /// * `interval` - Granularité (ex: "1d", "1wk")
    ///
    /// # Retourne
    /// * `Ok(PriceSeries)` - éventuellement partielle : les points invalides
    ///   sont ignorés, pas la requête
    /// * `Err(MarketError)` - transport, statut HTTP, JSON invalide, résultat vide
    #[instrument(skip(self), fields(ticker = %symbol))]
    pub async fn fetch_chart(
        &self,
        symbol: &Symbol,
        range: &str,
        interval: &str,
    ) -> Result<PriceSeries, MarketError> {
        validate_token("range", range)?;
        validate_token("interval", interval)?;

        let url = build_chart_url(&self.base_url, symbol, range, interval);
        debug!(url = %url, "Built Yahoo Finance chart URL");

        let request = HttpRequest::get(url)
            .with_header("User-Agent", BROWSER_USER_AGENT)
            .with_timeout(CHART_TIMEOUT);

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            error!(status = response.status, "Yahoo Finance returned error status");
        }
        let response = response.error_for_status()?;

        let yahoo_response: YahooResponse = serde_json::from_str(&response.body).map_err(|e| {
            let snippet: String = response.body.chars().take(200).collect();
            error!(error = %e, body = %snippet, "Failed to parse Yahoo chart JSON");
            MarketError::MalformedResponse(format!("invalid chart JSON: {}", e))
        })?;

        let series = parse_chart_response(yahoo_response, symbol)?;
        info!(points = series.len(), "Successfully fetched chart data");
        Ok(series)
    }
}

/// Construit l'URL de l'endpoint chart
fn build_chart_url(base_url: &str, symbol: &Symbol, range: &str, interval: &str) -> String {
    format!(
        "{}/v8/finance/chart/{}?range={}&interval={}",
        base_url, symbol, range, interval
    )
}

/// Les tokens range/interval sont courts et alphanumériques ("10y", "1wk")
fn validate_token(name: &str, value: &str) -> Result<(), MarketError> {
    let valid = !value.is_empty()
        && value.len() <= 8
        && value.chars().all(|ch| ch.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(MarketError::InvalidInput(format!("invalid {} token '{}'", name, value)))
    }
}

/// Convertit la réponse Yahoo en PriceSeries
///
/// CONCEPT RUST : Ownership
/// - yahoo_response est "moved" : on consomme les Vec sans les copier
fn parse_chart_response(
    yahoo_response: YahooResponse,
    symbol: &Symbol,
) -> Result<PriceSeries, MarketError> {
    let result = yahoo_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(MarketError::EmptyResult)?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .and_then(|indicators| indicators.quote.into_iter().next())
        .map(|quote| quote.close)
        .ok_or_else(|| MarketError::MalformedResponse("missing indicators.quote block".to_string()))?;

    debug!(timestamps = timestamps.len(), closes = closes.len(), "Received chart arrays");

    let mut series = PriceSeries::new(symbol.clone());
    let mut skipped_count = 0;

    for (&timestamp, close) in timestamps.iter().zip(closes.iter()) {
        // Seuls les nombres finis sont gardés ; le label saute avec le prix
        let price = match close.as_f64() {
            Some(price) if price.is_finite() => price,
            _ => {
                skipped_count += 1;
                continue;
            }
        };

        let label = match DateTime::from_timestamp(timestamp, 0) {
            Some(datetime) => datetime.format(LABEL_FORMAT).to_string(),
            None => {
                skipped_count += 1;
                continue;
            }
        };

        series.push(label, round2(price));
    }

    if skipped_count > 0 {
        warn!(
            skipped = skipped_count,
            total = timestamps.len(),
            "Skipped chart points with invalid close price"
        );
    }

    Ok(series)
}

// ============================================================================
// Tests unitaires
// ============================================================================
