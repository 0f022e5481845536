//! Full configuration validation.
//!
//! Validates numeric ranges and URL shapes. [`validate`] collects every
//! failure into one `ConfigError`; [`repair`] resets failing sections.

mod helpers;


use wtstation_common::ConfigError;

use crate::schema::StationConfig;

type Check = fn(&mut Vec<String>, &StationConfig);

use helpers::{validate_range, validate_range_f64, validate_url};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &StationConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_layout(&mut errors, config);
    validate_surfaces(&mut errors, config);
    validate_consistency(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Reset every section that fails validation to its defaults.
///
/// Returns the problems found; empty when the config was already valid.
pub fn repair(config: &mut StationConfig) -> Vec<String> {
    let mut problems = Vec::new();

    let errors = run(validate_window, config);
    reset_if_invalid(&mut config.window, errors, &mut problems);
    let errors = run(validate_layout, config);
    reset_if_invalid(&mut config.layout, errors, &mut problems);
    let errors = run(validate_surfaces, config);
    reset_if_invalid(&mut config.surfaces, errors, &mut problems);
    let errors = run(validate_consistency, config);
    reset_if_invalid(&mut config.consistency, errors, &mut problems);

    problems
}

fn run(check: Check, config: &StationConfig) -> Vec<String> {
    let mut errors = Vec::new();
    check(&mut errors, config);
    errors
}

fn reset_if_invalid<T: Default>(
    section: &mut T,
    errors: Vec<String>,
    problems: &mut Vec<String>,
) {
    if !errors.is_empty() {
        *section = T::default();
        problems.extend(errors);
    }
}

fn validate_window(errors: &mut Vec<String>, config: &StationConfig) {
    let w = &config.window;
    if w.min_width > w.width {
        errors.push(format!(
            "window.min_width = {} exceeds window.width = {}",
            w.min_width, w.width
        ));
    }
    if w.min_height > w.height {
        errors.push(format!(
            "window.min_height = {} exceeds window.height = {}",
            w.min_height, w.height
        ));
    }
}

fn validate_layout(errors: &mut Vec<String>, config: &StationConfig) {
    let l = &config.layout;
    validate_range_f64(errors, "layout.title_bar_height", l.title_bar_height, 0.0, 200.0);
    validate_range_f64(
        errors,
        "layout.sidebar_expanded_width",
        l.sidebar_expanded_width,
        0.0,
        800.0,
    );
    validate_range_f64(
        errors,
        "layout.sidebar_collapsed_width",
        l.sidebar_collapsed_width,
        0.0,
        800.0,
    );
    validate_range_f64(errors, "layout.sidebar_gap", l.sidebar_gap, 0.0, 20.0);
    if l.sidebar_collapsed_width > l.sidebar_expanded_width {
        errors.push(format!(
            "layout.sidebar_collapsed_width = {} exceeds layout.sidebar_expanded_width = {}",
            l.sidebar_collapsed_width, l.sidebar_expanded_width
        ));
    }
}

fn validate_surfaces(errors: &mut Vec<String>, config: &StationConfig) {
    let s = &config.surfaces;
    validate_range(errors, "surfaces.init_delay_ms", s.init_delay_ms, 0, 10_000);
    validate_url(errors, "surfaces.whatsapp_url", &s.whatsapp_url);
    validate_url(errors, "surfaces.telegram_url", &s.telegram_url);
    if s.offscreen_x > -1000.0 && s.offscreen_y > -1000.0 {
        errors.push(format!(
            "surfaces offscreen position ({}, {}) is too close to the visible area",
            s.offscreen_x, s.offscreen_y
        ));
    }
}

fn validate_consistency(errors: &mut Vec<String>, config: &StationConfig) {
    let c = &config.consistency;
    validate_range(
        errors,
        "consistency.check_interval_ms",
        c.check_interval_ms,
        50,
        10_000,
    );
    validate_range(
        errors,
        "consistency.recheck_delay_ms",
        c.recheck_delay_ms,
        10,
        5_000,
    );
}
