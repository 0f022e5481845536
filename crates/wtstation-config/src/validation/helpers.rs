//! Shared validation helpers.

/// Push an error if `value` is outside `[min, max]` (integer).
pub(super) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is outside `[min, max]` (float).
pub(super) fn validate_range_f64(
    errors: &mut Vec<String>,
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error unless `value` is an `https://` URL.
pub(super) fn validate_url(errors: &mut Vec<String>, name: &str, value: &str) {
    if !value.starts_with("https://") {
        errors.push(format!("{name} = {value:?} must be an https:// URL"));
    }
}
