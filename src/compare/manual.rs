// ============================================================================
// Comparateur manuel (rendement saisi par l'utilisateur)
// ============================================================================
// Aucun appel amont : l'utilisateur fournit le rendement annuel en pourcent
// (0.6 pour 0.6%).
//
// - Sans réinvestissement (linéaire) : inv + inv × (pct/100) × années
// - Avec réinvestissement (composé)  : inv × (1 + pct/100)^années
//
// Simplification assumée : un vrai DRIP achète des actions avec chaque
// dividende ; ici le rendement est traité comme un taux de croissance.
// ============================================================================

use crate::compare::engine::MAX_YEARS;
use crate::error::MarketError;
use crate::models::{round2, ManualComparisonRow, Symbol};

/// Calcule les deux projections d'une ligne
pub fn compare_manual(
    symbol: Symbol,
    investment: f64,
    annual_yield_percent: f64,
    years: u32,
) -> ManualComparisonRow {
    let yield_rate = annual_yield_percent / 100.0;

    let value_no_drip = investment + investment * yield_rate * years as f64;
    let value_with_drip = investment * (1.0 + yield_rate).powf(years as f64);

    ManualComparisonRow {
        symbol,
        investment,
        annual_yield_percent,
        years,
        value_no_drip: round2(value_no_drip),
        value_with_drip: round2(value_with_drip),
    }
}

/// Calcule un tableau complet à partir des listes du formulaire
///
/// Les trois listes doivent avoir la même longueur (non nulle) et toutes les
/// valeurs doivent être des nombres finis strictement positifs.
pub fn compare_manual_batch(
    symbols: &[Symbol],
    investments: &[f64],
    annual_yields: &[f64],
    period: u32,
) -> Result<Vec<ManualComparisonRow>, MarketError> {
    if symbols.is_empty() {
        return Err(MarketError::InvalidInput("Please provide stock symbols.".to_string()));
    }
    if investments.len() != symbols.len() || annual_yields.len() != symbols.len() {
        return Err(MarketError::InvalidInput(
            "each symbol needs an investment and an annual yield".to_string(),
        ));
    }
    if period == 0 {
        return Err(MarketError::InvalidInput("period must be positive".to_string()));
    }
    if period > MAX_YEARS {
        return Err(MarketError::InvalidInput(format!(
            "period must be at most {} years",
            MAX_YEARS
        )));
    }

    symbols
        .iter()
        .zip(investments)
        .zip(annual_yields)
        .map(|((symbol, &investment), &annual_yield)| {
            ensure_positive("investment", symbol, investment)?;
            ensure_positive("annual yield", symbol, annual_yield)?;
            Ok(compare_manual(symbol.clone(), investment, annual_yield, period))
        })
        .collect()
}

fn ensure_positive(field: &str, symbol: &Symbol, value: f64) -> Result<(), MarketError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MarketError::InvalidInput(format!(
            "{} for {} must be a positive number",
            field, symbol
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn test_linear_vs_compound() {
        let row = compare_manual(symbol("XYZ"), 10_000.0, 0.6, 5);
        assert_eq!(row.value_no_drip, 10_300.0);
        // 10000 × 1.006^5 = 10303.62
        assert_eq!(row.value_with_drip, 10_303.62);
        assert_eq!(row.years, 5);
    }

    #[test]
    fn test_compound_beats_linear_over_time() {
        let row = compare_manual(symbol("O"), 1_000.0, 5.0, 20);
        assert_eq!(row.value_no_drip, 2_000.0);
        assert_eq!(row.value_with_drip, 2_653.3);
    }

    #[test]
    fn test_batch() {
        let rows = compare_manual_batch(
            &[symbol("XYZ"), symbol("ABC")],
            &[10_000.0, 5_000.0],
            &[0.6, 3.0],
            5,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].symbol.as_str(), "ABC");
        assert_eq!(rows[1].value_no_drip, 5_750.0);
    }

    #[test]
    fn test_batch_rejects_invalid() {
        assert!(compare_manual_batch(&[], &[], &[], 5).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[1.0, 2.0], &[1.0], 5).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[1.0], &[1.0], 0).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[-1.0], &[1.0], 5).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[1.0], &[0.0], 5).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[1.0], &[1.0], MAX_YEARS + 1).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[1.0], &[1.0], u32::MAX).is_err());
        assert!(compare_manual_batch(&[symbol("A")], &[1.0], &[1.0], MAX_YEARS).is_ok());
    }

    #[test]
    fn test_compound_never_falls_below_linear_for_huge_periods() {
        let row = compare_manual(symbol("XYZ"), 10_000.0, 0.6, u32::MAX);
        assert!(row.value_with_drip >= row.value_no_drip);

        let row = compare_manual(symbol("XYZ"), 10_000.0, 0.6, i32::MAX as u32 + 1);
        assert!(row.value_with_drip >= row.value_no_drip);
    }
}
