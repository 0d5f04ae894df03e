// ============================================================================
// Structure : Symbol
// ============================================================================
// Symbole boursier validé (action, indice, crypto, devise)
//
// Exemples acceptés : "AAPL", "BRK.B", "BTC-USD", "^GSPC", "EURUSD=X"
//
// CONCEPT RUST : Newtype pattern
// - Symbol(String) enveloppe une String
// - Le seul moyen d'en construire un est parse() → la validation est garantie
// - Le compilateur empêche de passer une String non validée à un fetcher
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

const MAX_SYMBOL_LEN: usize = 15;

/// Symbole normalisé (majuscules, sans espaces)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Valide et normalise un symbole saisi par l'utilisateur
    pub fn parse(input: &str) -> Result<Self, MarketError> {
        let normalized = input.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(MarketError::InvalidInput("symbol cannot be empty".to_string()));
        }

        if normalized.chars().count() > MAX_SYMBOL_LEN {
            return Err(MarketError::InvalidInput(format!(
                "symbol '{}' exceeds {} characters",
                normalized, MAX_SYMBOL_LEN
            )));
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = if index == 0 {
                ch.is_ascii_alphabetic() || ch == '^'
            } else {
                ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '=' | '^')
            };
            if !valid {
                return Err(MarketError::InvalidInput(format!(
                    "symbol '{}' contains invalid character '{}'",
                    normalized, ch
                )));
            }
        }

        Ok(Self(normalized))
    }

    /// Découpe une liste "aapl, msft,,ibm" en symboles validés
    ///
    /// Les entrées vides sont ignorées ; une liste vide est une erreur.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, MarketError> {
        let symbols = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if symbols.is_empty() {
            return Err(MarketError::InvalidInput("Please provide stock symbols.".to_string()));
        }
        Ok(symbols)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = MarketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let symbol = Symbol::parse(" aapl ").unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn test_parse_accepts_index_and_fx() {
        assert!(Symbol::parse("^GSPC").is_ok());
        assert!(Symbol::parse("EURUSD=X").is_ok());
        assert!(Symbol::parse("BTC-USD").is_ok());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Symbol::parse("").is_err());
        assert!(Symbol::parse("1ABC").is_err());
        assert!(Symbol::parse("AA PL").is_err());
        assert!(Symbol::parse("AAPL&token=x").is_err());
        assert!(Symbol::parse("ABCDEFGHIJKLMNOP").is_err());
    }

    #[test]
    fn test_parse_list() {
        let symbols = Symbol::parse_list("aapl, msft,,ibm ").unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "IBM"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(matches!(
            Symbol::parse_list(" , "),
            Err(MarketError::InvalidInput(_))
        ));
    }
}
