// ============================================================================
// Erreurs du domaine
// ============================================================================
// Chaque échec possible d'un appel amont ou d'une saisie utilisateur a sa
// variante. Les erreurs sont des valeurs : une erreur sur un symbole est
// rangée dans la ligne de ce symbole, elle n'interrompt jamais le lot.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error
// - #[error("...")] génère l'implémentation de Display
// ============================================================================

use thiserror::Error;

/// Erreurs produites par les fetchers et les calculs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// Échec réseau (connexion, timeout, lecture du corps)
    #[error("transport error: {0}")]
    Transport(String),

    /// L'API amont a répondu avec un statut hors 2xx
    #[error("upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    /// JSON invalide ou clé attendue absente
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// La réponse historique ne contient aucun résultat
    #[error("no chart data found for the given symbol and range")]
    EmptyResult,

    /// Série trop courte pour le calcul demandé
    #[error("not enough historical data for calculation ({points} points)")]
    InsufficientData { points: usize },

    /// Saisie utilisateur non numérique ou non positive
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MarketError {
    /// Code HTTP à renvoyer quand l'erreur remonte jusqu'à une route
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::InvalidInput(_) => 400,
            MarketError::EmptyResult => 404,
            _ => 500,
        }
    }
}

/// Erreurs d'écriture du cache (la lecture ne renvoie jamais d'erreur)
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
