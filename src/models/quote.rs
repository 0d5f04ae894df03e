// ============================================================================
// Structure : Quote
// ============================================================================
// Cotation temps réel normalisée d'un symbole
//
// CONCEPTS RUST :
// 1. Option<f64> : un champ amont non numérique devient None, jamais 0.0
// 2. Constructeur qui dérive les champs calculés (change, percent_change)
//    → l'invariant "change présent ⇔ close et prev_close présents" est
//      garanti par construction
// ============================================================================

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{round2, Symbol};

/// Placeholder affiché pour un symbole dont la cotation a échoué
pub const NOT_AVAILABLE: &str = "N/A";

/// Cotation normalisée (aussi le format du cache `stock_data.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub prev_close: Option<f64>,
    /// close - prev_close, arrondi à 2 décimales
    pub change: Option<f64>,
    /// Variation en pourcentage, 0.0 si prev_close vaut 0
    pub percent_change: Option<f64>,
    /// Heure d'affichage (ex: "03:15:42 PM")
    pub timestamp: String,
}

impl Quote {
    /// Construit une cotation et dérive change / percent_change
    pub fn new(
        symbol: Symbol,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        prev_close: Option<f64>,
        timestamp: String,
    ) -> Self {
        let (change, percent_change) = match (close, prev_close) {
            (Some(close), Some(prev_close)) => {
                let raw_change = close - prev_close;
                let percent = if prev_close == 0.0 {
                    0.0
                } else {
                    round2(raw_change / prev_close * 100.0)
                };
                (Some(round2(raw_change)), Some(percent))
            }
            _ => (None, None),
        };

        Self {
            symbol,
            open,
            high,
            low,
            close,
            prev_close,
            change,
            percent_change,
            timestamp,
        }
    }

    /// true si la cotation est en hausse (ou stable)
    pub fn is_positive(&self) -> bool {
        self.change.map(|c| c >= 0.0).unwrap_or(false)
    }
}

/// Une ligne du dashboard : la cotation, ou un placeholder si le fetch a échoué
///
/// CONCEPT RUST : Enum plutôt que des champs "N/A" dans Quote
/// - Le type dit explicitement si la donnée existe
/// - Le texte "N/A" n'apparaît qu'à la sérialisation
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEntry {
    Available(Quote),
    Unavailable(Symbol),
}

impl DashboardEntry {
    pub fn symbol(&self) -> &Symbol {
        match self {
            DashboardEntry::Available(quote) => &quote.symbol,
            DashboardEntry::Unavailable(symbol) => symbol,
        }
    }

    pub fn quote(&self) -> Option<&Quote> {
        match self {
            DashboardEntry::Available(quote) => Some(quote),
            DashboardEntry::Unavailable(_) => None,
        }
    }
}

impl Serialize for DashboardEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DashboardEntry", 8)?;
        state.serialize_field("symbol", self.symbol())?;
        match self {
            DashboardEntry::Available(quote) => {
                state.serialize_field("open", &quote.open)?;
                state.serialize_field("close", &quote.close)?;
                state.serialize_field("high", &quote.high)?;
                state.serialize_field("low", &quote.low)?;
                state.serialize_field("change", &quote.change)?;
                state.serialize_field("percent_change", &quote.percent_change)?;
                state.serialize_field("timestamp", &quote.timestamp)?;
            }
            DashboardEntry::Unavailable(_) => {
                for field in [
                    "open",
                    "close",
                    "high",
                    "low",
                    "change",
                    "percent_change",
                    "timestamp",
                ] {
                    state.serialize_field(field, NOT_AVAILABLE)?;
                }
            }
        }
        state.end()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
