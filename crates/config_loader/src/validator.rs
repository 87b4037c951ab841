//! Configuration validation
//!
//! Field ranges come from the `validator` derives on the config structs.
//! Rules spanning several fields are checked here:
//! - quiet band bounds ordered (`start_threshold < start_max_threshold`,
//!   `stop_threshold < stop_max_threshold`)
//! - channel names non-empty and distinct

use std::collections::HashSet;

use contracts::{ContractError, ProfileConfig};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a `ProfileConfig`
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ProfileConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        ContractError::config_validation(field_path(&errors), errors.to_string())
    })?;
    validate_quiet_bands(config)?;
    validate_columns(config)?;
    Ok(())
}

/// Dotted path to the first failing field
fn field_path(errors: &ValidationErrors) -> String {
    let mut path = Vec::new();
    let mut current = errors;
    while let Some((field, kind)) = current.errors().iter().min_by_key(|(field, _)| *field) {
        path.push(field.to_string());
        match kind {
            ValidationErrorsKind::Struct(inner) => current = inner.as_ref(),
            _ => break,
        }
    }
    path.join(".")
}

fn validate_quiet_bands(config: &ProfileConfig) -> Result<(), ContractError> {
    let detection = &config.detection;
    let bands = [
        (
            "detection.start_max_threshold",
            detection.start_threshold,
            detection.start_max_threshold,
        ),
        (
            "detection.stop_max_threshold",
            detection.stop_threshold,
            detection.stop_max_threshold,
        ),
    ];
    for (field, threshold, max) in bands {
        if let Some(max) = max {
            if threshold >= max {
                return Err(ContractError::config_validation(
                    field,
                    format!("threshold ({threshold}) must be < max threshold ({max})"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_columns(config: &ProfileConfig) -> Result<(), ContractError> {
    let columns = &config.columns;
    let named = [
        ("columns.force", &columns.force),
        ("columns.ambient", &columns.ambient),
        ("columns.active", &columns.active),
        ("columns.barometer_depth", &columns.barometer_depth),
    ];
    let mut seen = HashSet::new();
    for (field, name) in named {
        if name.trim().is_empty() {
            return Err(ContractError::config_validation(
                field,
                "column name cannot be empty",
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(ContractError::config_validation(
                field,
                format!("duplicate column name '{name}'"),
            ));
        }
    }
    Ok(())
}
