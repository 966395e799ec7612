// src/schema/countries.rs

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Countries with data in all four sources.
pub static ALLOW_LIST: &[&str] = &[
    "Australia",
    "Austria",
    "Belgium",
    "Canada",
    "Chile",
    "Costa Rica",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Japan",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Mexico",
    "Netherlands",
    "New Zealand",
    "Norway",
    "Poland",
    "Portugal",
    "Slovakia",
    "Slovenia",
    "South Korea",
    "Spain",
    "Sweden",
    "Switzerland",
    "United Kingdom",
    "United States",
];

/// Country rendered in the highlight colour on every chart.
pub const HIGHLIGHT: &str = "United States";

static ALLOWED: Lazy<HashSet<&'static str>> = Lazy::new(|| ALLOW_LIST.iter().copied().collect());

/// Life-expectancy names that differ from the other sources.
static LIFE_EXPECTANCY_ALIASES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("Czechia", "Czech Republic")]));

pub fn is_allowed(country: &str) -> bool {
    ALLOWED.contains(country)
}

/// Canonical name for a country as spelled by the life-expectancy table.
pub fn life_expectancy_alias(country: &str) -> &str {
    LIFE_EXPECTANCY_ALIASES
        .get(country)
        .copied()
        .unwrap_or(country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_has_33_unique_entries() {
        assert_eq!(ALLOW_LIST.len(), 33);
        assert_eq!(ALLOWED.len(), 33);
        assert!(is_allowed("South Korea"));
        assert!(!is_allowed("Korea, South"));
    }

    #[test]
    fn czechia_is_reconciled() {
        assert_eq!(life_expectancy_alias("Czechia"), "Czech Republic");
        assert_eq!(life_expectancy_alias("Japan"), "Japan");
    }
}
