// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod comparison;   // Lignes de comparaison (historique et manuelle)
pub mod price_series; // Série de prix étiquetée par date
pub mod quote;        // Cotation normalisée et entrée du dashboard
pub mod symbol;       // Symbole boursier validé

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use dripcompare::models::quote::Quote;
// On peut faire : use dripcompare::models::Quote;
pub use comparison::{ComparisonReport, ComparisonRow, ManualComparisonRow, Projection};
pub use price_series::PriceSeries;
pub use quote::{DashboardEntry, Quote};
pub use symbol::Symbol;

/// Arrondit à 2 décimales (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
