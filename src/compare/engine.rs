// ============================================================================
// Moteur de comparaison basé sur l'historique
// ============================================================================
// Pour chaque symbole :
// 1. Historique journalier sur `years` ans (range "{years}y")
// 2. Taux de croissance annuel implicite :
//      g = (prix_final / prix_initial)^(1/years) - 1
//    C'est le taux constant qui, composé `years` fois, transforme le prix
//    initial en prix final (moyenne géométrique, pas arithmétique).
// 3. Deux projections de l'investissement initial :
//      sans réinvestissement : inv × (1 + g)^years
//      avec réinvestissement : inv × (1 + g + 2%)^years
//    Le bonus de 2% est une approximation du rendement du dividende, pas une
//    simulation d'achat d'actions.
// 4. Série normalisée en "dollars d'investissement initial" pour superposer
//    plusieurs symboles sur un même graphique.
// ============================================================================

use tracing::{debug, info, instrument, warn};

use crate::api::{ChartClient, RequestSpacing};
use crate::error::MarketError;
use crate::models::{round2, ComparisonReport, ComparisonRow, PriceSeries, Projection, Symbol};

/// Rendement du dividende supposé, ajouté au taux de croissance
pub const REINVESTMENT_YIELD: f64 = 0.02;

/// Horizon maximum accepté (comparaison historique et manuelle)
pub const MAX_YEARS: u32 = 100;

/// Granularité de l'historique utilisé pour la comparaison
pub const COMPARISON_INTERVAL: &str = "1d";

/// Token de profondeur d'historique pour un horizon en années
pub fn range_token(years: u32) -> String {
    format!("{}y", years)
}

/// Taux de croissance annuel implicite entre deux prix
///
/// Un prix initial nul donne un taux nul (cas dégénéré, pas une erreur).
pub fn annual_growth_rate(start_price: f64, end_price: f64, years: u32) -> f64 {
    if start_price == 0.0 || years == 0 {
        return 0.0;
    }
    (end_price / start_price).powf(1.0 / years as f64) - 1.0
}

/// Calcule les projections d'un symbole à partir de sa série
///
/// Une série de moins de 2 points ne donne lieu à aucun calcul.
pub fn project(
    series: PriceSeries,
    start_investment: f64,
    years: u32,
) -> Result<Projection, MarketError> {
    let (start_price, end_price) = match (series.first_price(), series.last_price()) {
        (Some(start), Some(end)) if series.len() >= 2 => (start, end),
        _ => {
            return Err(MarketError::InsufficientData {
                points: series.len(),
            })
        }
    };

    if start_price == 0.0 {
        warn!(ticker = %series.symbol(), "Start price is 0, growth rate set to 0");
    }

    let growth = annual_growth_rate(start_price, end_price, years);
    let periods = years as f64;

    let end_value_no_drip = start_investment * (1.0 + growth).powf(periods);
    let end_value_with_drip = start_investment * (1.0 + growth + REINVESTMENT_YIELD).powf(periods);

    Ok(Projection {
        annual_growth_rate: growth,
        reinvestment_yield: REINVESTMENT_YIELD,
        end_value_no_drip: round2(end_value_no_drip),
        end_value_with_drip: round2(end_value_with_drip),
        series,
    })
}

/// Compare plusieurs symboles sur un horizon donné
///
/// Les entrées globales sont validées avant tout appel amont. Ensuite chaque
/// symbole est traité indépendamment : son erreur est rangée dans sa ligne
/// et le traitement continue. L'ordre de `symbols` est conservé.
#[instrument(skip(client, spacing, symbols), fields(symbols = symbols.len()))]
pub async fn compare(
    client: &ChartClient,
    spacing: &RequestSpacing,
    symbols: &[Symbol],
    start_investment: f64,
    years: u32,
) -> Result<ComparisonReport, MarketError> {
    validate_inputs(symbols, start_investment, years)?;

    let range = range_token(years);
    let mut rows = Vec::with_capacity(symbols.len());
    let mut chart_series = Vec::new();

    for symbol in symbols {
        spacing.wait_turn().await;
        debug!(ticker = %symbol, range = %range, "Fetching history for comparison");

        let outcome = client
            .fetch_chart(symbol, &range, COMPARISON_INTERVAL)
            .await
            .and_then(|series| project(series, start_investment, years));

        match &outcome {
            Ok(projection) => {
                info!(
                    ticker = %symbol,
                    growth = projection.annual_growth_rate,
                    end_value = projection.end_value_no_drip,
                    "Comparison computed"
                );
                chart_series.push(projection.series.normalized(start_investment));
            }
            Err(e) => warn!(ticker = %symbol, error = %e, "Comparison skipped for symbol"),
        }

        rows.push(ComparisonRow {
            symbol: symbol.clone(),
            start_investment,
            outcome,
        });
    }

    Ok(ComparisonReport { rows, chart_series })
}

fn validate_inputs(symbols: &[Symbol], start_investment: f64, years: u32) -> Result<(), MarketError> {
    if symbols.is_empty() {
        return Err(MarketError::InvalidInput("Please provide stock symbols.".to_string()));
    }
    if !start_investment.is_finite() || start_investment <= 0.0 {
        return Err(MarketError::InvalidInput(
            "investment must be a positive number".to_string(),
        ));
    }
    if years == 0 {
        return Err(MarketError::InvalidInput(
            "Investment years must be positive.".to_string(),
        ));
    }
    if years > MAX_YEARS {
        return Err(MarketError::InvalidInput(format!(
            "Investment years must be at most {}.",
            MAX_YEARS
        )));
    }
    Ok(())
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::transport::testing::{yahoo_chart_json, CannedTransport};

    fn symbol(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_points(
            symbol("AAPL"),
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (format!("201{}-01-02", i), p)),
        )
    }

    #[test]
    fn test_doubling_over_ten_years() {
        let projection = project(series(&[100.0, 200.0]), 10_000.0, 10).unwrap();

        let expected = 2f64.powf(0.1) - 1.0;
        assert!((projection.annual_growth_rate - expected).abs() < 1e-12);
        assert!((projection.annual_growth_rate - 0.0718).abs() < 1e-4);
        assert!((projection.end_value_no_drip - 20_000.0).abs() < 0.01);
        assert!((projection.end_value_with_drip - 24_061.65).abs() < 0.01);
    }

    #[test]
    fn test_zero_start_price() {
        let projection = project(series(&[0.0, 50.0, 80.0]), 5_000.0, 3).unwrap();
        assert_eq!(projection.annual_growth_rate, 0.0);
        assert_eq!(projection.end_value_no_drip, 5_000.0);
        // (1.02)^3 × 5000 = 5306.04
        assert_eq!(projection.end_value_with_drip, 5_306.04);
    }

    #[test]
    fn test_decline_gives_negative_growth() {
        let projection = project(series(&[100.0, 80.0, 50.0]), 5_000.0, 2).unwrap();
        assert!(projection.annual_growth_rate < 0.0);
        assert_eq!(projection.end_value_no_drip, 2_500.0);
    }

    #[test]
    fn test_short_series_is_insufficient() {
        assert_eq!(
            project(series(&[100.0]), 1_000.0, 5).unwrap_err(),
            MarketError::InsufficientData { points: 1 }
        );
        assert_eq!(
            project(series(&[]), 1_000.0, 5).unwrap_err(),
            MarketError::InsufficientData { points: 0 }
        );
    }

    #[test]
    fn test_range_token() {
        assert_eq!(range_token(1), "1y");
        assert_eq!(range_token(10), "10y");
    }

    fn chart_client(transport: CannedTransport) -> ChartClient {
        ChartClient::new(Arc::new(transport), "https://chart.test")
    }

    #[tokio::test]
    async fn test_compare_keeps_order_and_isolates_failures() {
        let ts = [1262613600, 1578204000];
        let transport = CannedTransport::new()
            .respond("/chart/AAPL", 200, &yahoo_chart_json(&ts, &[json!(100.0), json!(200.0)]))
            .respond("/chart/FAIL", 500, "oops")
            .respond("/chart/ONE", 200, &yahoo_chart_json(&ts[..1], &[json!(10.0)]))
            .respond("/chart/MSFT", 200, &yahoo_chart_json(&ts, &[json!(50.0), json!(25.0)]));
        let client = chart_client(transport);
        let symbols = vec![symbol("AAPL"), symbol("FAIL"), symbol("ONE"), symbol("MSFT")];

        let report = compare(&client, &RequestSpacing::disabled(), &symbols, 10_000.0, 10)
            .await
            .unwrap();

        let order: Vec<&str> = report.rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["AAPL", "FAIL", "ONE", "MSFT"]);

        assert!(report.rows[0].projection().is_some());
        assert_eq!(
            report.rows[1].error(),
            Some(&MarketError::UpstreamStatus { status: 500 })
        );
        assert_eq!(
            report.rows[2].error(),
            Some(&MarketError::InsufficientData { points: 1 })
        );
        assert!(report.rows[3].projection().is_some());

        // Graphique : uniquement les succès, même ordre, normalisés
        assert_eq!(report.chart_series.len(), 2);
        assert_eq!(report.chart_series[0].symbol().as_str(), "AAPL");
        assert_eq!(report.chart_series[0].prices(), &[10_000.0, 20_000.0]);
        assert_eq!(report.chart_series[1].prices(), &[10_000.0, 5_000.0]);
    }

    #[tokio::test]
    async fn test_compare_rejects_out_of_range_years_before_fetching() {
        let transport = Arc::new(CannedTransport::new());
        let client = ChartClient::new(transport.clone(), "https://chart.test");
        let symbols = vec![symbol("AAPL")];

        for years in [0, MAX_YEARS + 1, 10_000_000] {
            let result = compare(&client, &RequestSpacing::disabled(), &symbols, 10_000.0, years).await;
            assert!(matches!(result, Err(MarketError::InvalidInput(_))), "{}", years);
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_compare_requests_range_from_years() {
        let transport = Arc::new(CannedTransport::new());
        let client = ChartClient::new(transport.clone(), "https://chart.test");

        let report = compare(&client, &RequestSpacing::disabled(), &[symbol("IBM")], 1_000.0, 7)
            .await
            .unwrap();

        assert!(transport.requests()[0].url.contains("range=7y&interval=1d"));
        assert!(report.rows[0].error().is_some());
        assert!(report.chart_series.is_empty());
    }

    #[tokio::test]
    async fn test_compare_rejects_invalid_inputs_before_fetching() {
        let transport = Arc::new(CannedTransport::new());
        let client = ChartClient::new(transport.clone(), "https://chart.test");
        let spacing = RequestSpacing::disabled();

        for (symbols, investment, years) in [
            (vec![], 1_000.0, 5),
            (vec![symbol("AAPL")], 0.0, 5),
            (vec![symbol("AAPL")], -10.0, 5),
            (vec![symbol("AAPL")], f64::NAN, 5),
            (vec![symbol("AAPL")], 1_000.0, 0),
        ] {
            let result = compare(&client, &spacing, &symbols, investment, years).await;
            assert!(matches!(result, Err(MarketError::InvalidInput(_))));
        }
        assert!(transport.requests().is_empty());
    }
}
