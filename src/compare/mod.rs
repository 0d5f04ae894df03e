// ============================================================================
// Module : compare
// ============================================================================
// Les deux chemins de comparaison d'investissements :
// - engine : basé sur l'historique réel des prix (appels Yahoo)
// - manual : basé sur un rendement annuel saisi (calcul pur)
// ============================================================================

pub mod engine;
pub mod manual;

pub use engine::{annual_growth_rate, compare, project, range_token, MAX_YEARS, REINVESTMENT_YIELD};
pub use manual::{compare_manual, compare_manual_batch};
