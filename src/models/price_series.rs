// ============================================================================
// Structure : PriceSeries
// ============================================================================
// Série historique de prix de clôture, étiquetée par date ("2024-01-15")
//
// CONCEPTS RUST :
// 1. Champs privés : labels et prices ne peuvent être modifiés qu'ensemble
//    via push() → les deux Vec ont toujours la même longueur
// 2. Vec<T> : tableaux dynamiques, ordre chronologique conservé
// ============================================================================

use serde::Serialize;

use crate::models::Symbol;

/// Série de prix (labels et prix alignés par index)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    labels: Vec<String>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Crée une série vide
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            labels: Vec::new(),
            prices: Vec::new(),
        }
    }

    /// Construit une série à partir de paires (label, prix)
    pub fn from_points<I, L>(symbol: Symbol, points: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let mut series = Self::new(symbol);
        for (label, price) in points {
            series.push(label, price);
        }
        series
    }

    /// Ajoute un point (label et prix ensemble)
    pub fn push(&mut self, label: impl Into<String>, price: f64) {
        self.labels.push(label.into());
        self.prices.push(price);
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Premier prix de la série
    pub fn first_price(&self) -> Option<f64> {
        self.prices.first().copied()
    }

    /// Dernier prix de la série
    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }

    /// Rééchelonne la série en "dollars de l'investissement initial"
    ///
    /// Chaque prix devient (prix / premier_prix) × investment, ce qui rend
    /// comparables des symboles aux prix absolus très différents. Le premier
    /// point vaut donc exactement `investment`. Si le premier prix est 0, la
    /// série est plate à `investment`.
    pub fn normalized(&self, investment: f64) -> Self {
        let start = self.first_price().unwrap_or(0.0);
        let prices = self
            .prices
            .iter()
            .map(|&price| {
                if start == 0.0 {
                    investment
                } else {
                    (price / start) * investment
                }
            })
            .collect();

        Self {
            symbol: self.symbol.clone(),
            labels: self.labels.clone(),
            prices,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_points(
            Symbol::parse("MSFT").unwrap(),
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (format!("2024-01-{:02}", i + 1), p)),
        )
    }

    #[test]
    fn test_push_keeps_alignment() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.labels().len(), s.prices().len());
        assert_eq!(s.labels()[2], "2024-01-03");
        assert_eq!(s.first_price(), Some(1.0));
        assert_eq!(s.last_price(), Some(3.0));
    }

    #[test]
    fn test_normalized_starts_at_investment() {
        let s = series(&[137.13, 150.0, 274.26]).normalized(10_000.0);
        assert_eq!(s.prices()[0], 10_000.0);
        assert!((s.prices()[2] - 20_000.0).abs() < 1e-6);
        assert_eq!(s.labels(), series(&[0.0, 0.0, 0.0]).labels());
    }

    #[test]
    fn test_normalized_zero_start_is_flat() {
        let s = series(&[0.0, 5.0]).normalized(1_000.0);
        assert_eq!(s.prices(), &[1_000.0, 1_000.0]);
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(series(&[1.5])).unwrap();
        assert_eq!(json["symbol"], "MSFT");
        assert_eq!(json["labels"][0], "2024-01-01");
        assert_eq!(json["prices"][0], 1.5);
    }
}
