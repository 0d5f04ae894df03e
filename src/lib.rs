// ============================================================================
// DripCompare - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Clients HTTP : cotations, historique Yahoo, espacement
pub mod app;       // État partagé du serveur et service du dashboard
pub mod cache;     // Cache "dernière série de cotations"
pub mod compare;   // Moteur de comparaison et comparateur manuel
pub mod config;    // Configuration depuis l'environnement
pub mod error;     // Erreurs du domaine
pub mod models;    // Structures de données
pub mod web;       // Routes, templates et réponses HTTP
