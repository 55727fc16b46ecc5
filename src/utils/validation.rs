//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for validating subscription ids (GUID form)
static SUBSCRIPTION_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Regex for validating benefit ids
static BENEFIT_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$").unwrap()
});

/// Validate an Azure subscription id
pub fn validate_subscription_id(id: &str) -> bool {
    SUBSCRIPTION_ID_REGEX.is_match(id)
}

/// Validate a benefit id used in a request path
pub fn validate_benefit_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 128 && BENEFIT_ID_REGEX.is_match(id)
}

/// Validate a unit rate (finite and non-negative)
pub fn validate_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

/// Split a comma separated subscription list, keeping valid ids only
pub fn parse_subscription_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let valid = validate_subscription_id(s);
            if !valid {
                tracing::warn!("Ignoring invalid subscription id: {}", s);
            }
            valid
        })
        .map(|s| s.to_string())
        .collect()
}
