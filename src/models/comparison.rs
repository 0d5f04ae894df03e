// ============================================================================
// Structures : comparaison d'investissements
// ============================================================================
// - ComparisonRow : résultat par symbole du moteur basé sur l'historique
// - ComparisonReport : tableau + séries normalisées pour le graphique
// - ManualComparisonRow : résultat du comparateur à rendement saisi
//
// CONCEPT RUST : Result<T, E> comme valeur
// - Chaque ligne porte son propre Result
// - Un symbole en erreur n'empêche pas le calcul des autres
// ============================================================================

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::MarketError;
use crate::models::quote::NOT_AVAILABLE;
use crate::models::{PriceSeries, Symbol};

/// Projections calculées pour un symbole
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Taux de croissance annuel implicite (moyenne géométrique)
    pub annual_growth_rate: f64,
    /// Bonus de rendement ajouté pour le scénario "avec réinvestissement"
    pub reinvestment_yield: f64,
    /// Valeur finale sans réinvestissement, arrondie à 2 décimales
    pub end_value_no_drip: f64,
    /// Valeur finale avec réinvestissement, arrondie à 2 décimales
    pub end_value_with_drip: f64,
    /// Série historique brute utilisée pour le calcul
    pub series: PriceSeries,
}

/// Une ligne du tableau de comparaison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub symbol: Symbol,
    pub start_investment: f64,
    pub outcome: Result<Projection, MarketError>,
}

impl ComparisonRow {
    pub fn projection(&self) -> Option<&Projection> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&MarketError> {
        self.outcome.as_ref().err()
    }
}

/// Sérialise la ligne au format attendu par le front :
/// nombres en cas de succès, "N/A" + error_message en cas d'échec
impl Serialize for ComparisonRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = if self.outcome.is_ok() { 8 } else { 9 };
        let mut state = serializer.serialize_struct("ComparisonRow", field_count)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("start_investment", &self.start_investment)?;

        match &self.outcome {
            Ok(projection) => {
                let yield_label = format!("{:.1}%", projection.reinvestment_yield * 100.0);
                state.serialize_field("annual_growth_rate", &projection.annual_growth_rate)?;
                state.serialize_field("annual_yield", &yield_label)?;
                state.serialize_field("end_value_no_drip", &projection.end_value_no_drip)?;
                state.serialize_field("end_value_with_drip", &projection.end_value_with_drip)?;
                state.serialize_field("chart_labels", projection.series.labels())?;
                state.serialize_field("chart_prices", projection.series.prices())?;
            }
            Err(error) => {
                let empty: [f64; 0] = [];
                state.serialize_field("annual_growth_rate", NOT_AVAILABLE)?;
                state.serialize_field("annual_yield", NOT_AVAILABLE)?;
                state.serialize_field("end_value_no_drip", NOT_AVAILABLE)?;
                state.serialize_field("end_value_with_drip", NOT_AVAILABLE)?;
                state.serialize_field("chart_labels", &empty)?;
                state.serialize_field("chart_prices", &empty)?;
                state.serialize_field("error_message", &error.to_string())?;
            }
        }
        state.end()
    }
}

/// Résultat complet d'une comparaison multi-symboles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Une ligne par symbole, dans l'ordre de la requête
    #[serde(rename = "comparison_table")]
    pub rows: Vec<ComparisonRow>,
    /// Séries normalisées des symboles calculés avec succès, même ordre
    #[serde(rename = "comparison_chart_data")]
    pub chart_series: Vec<PriceSeries>,
}

/// Une ligne du comparateur manuel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualComparisonRow {
    pub symbol: Symbol,
    pub investment: f64,
    pub annual_yield_percent: f64,
    pub years: u32,
    /// Croissance linéaire (dividendes non réinvestis)
    pub value_no_drip: f64,
    /// Croissance composée (dividendes réinvestis)
    pub value_with_drip: f64,
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").unwrap()
    }

    #[test]
    fn test_error_row_shape() {
        let row = ComparisonRow {
            symbol: symbol(),
            start_investment: 10_000.0,
            outcome: Err(MarketError::InsufficientData { points: 1 }),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["end_value_no_drip"], "N/A");
        assert_eq!(json["annual_yield"], "N/A");
        assert_eq!(json["chart_labels"].as_array().unwrap().len(), 0);
        assert_eq!(json["chart_prices"].as_array().unwrap().len(), 0);
        assert!(json["error_message"]
            .as_str()
            .unwrap()
            .contains("not enough historical data"));
        assert!(row.projection().is_none());
    }

    #[test]
    fn test_success_row_shape() {
        let series = PriceSeries::from_points(
            symbol(),
            vec![("2020-01-02", 100.0), ("2030-01-02", 200.0)],
        );
        let row = ComparisonRow {
            symbol: symbol(),
            start_investment: 10_000.0,
            outcome: Ok(Projection {
                annual_growth_rate: 0.0718,
                reinvestment_yield: 0.02,
                end_value_no_drip: 20_000.0,
                end_value_with_drip: 24_061.65,
                series,
            }),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["annual_yield"], "2.0%");
        assert_eq!(json["end_value_no_drip"], 20_000.0);
        assert_eq!(json["chart_prices"][1], 200.0);
        assert!(json.get("error_message").is_none());
        assert!(row.error().is_none());
    }
}
