// ============================================================================
// Formatage pour l'affichage HTML
// ============================================================================
// Les templates reçoivent des chaînes déjà formatées : pas de logique de
// nombres dans Tera.
// ============================================================================

use crate::models::quote::NOT_AVAILABLE;

/// Prix à 2 décimales, ou "N/A"
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Variation signée (ex: "+2.24"), ou "N/A"
pub fn signed(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Variation en pourcentage signée (ex: "+1.21%"), ou "N/A"
pub fn signed_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Rendement avec une décimale (ex: "0.6%")
pub fn yield_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Montant entier avec séparateurs de milliers (ex: 12500.4 → "12,500")
pub fn thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if grouped == "0" {
        grouped
    } else {
        format!("{}{}", sign, grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(10_000.0), "10,000");
        assert_eq!(thousands(10_303.62), "10,304");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-4_500.0), "-4,500");
        assert_eq!(thousands(-0.2), "0");
    }

    #[test]
    fn test_optional_numbers() {
        assert_eq!(price(Some(187.3)), "187.30");
        assert_eq!(price(None), "N/A");
        assert_eq!(signed(Some(2.244)), "+2.24");
        assert_eq!(signed(Some(-1.0)), "-1.00");
        assert_eq!(signed_percent(Some(1.21)), "+1.21%");
        assert_eq!(signed_percent(None), "N/A");
        assert_eq!(yield_percent(0.6), "0.6%");
    }
}
