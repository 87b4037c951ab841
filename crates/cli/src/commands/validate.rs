//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{DepthMethod, ProfileConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    depth_method: DepthMethod,
    force_column: String,
    surface_detection_offset_cm: f64,
    tip_diameter_mm: f64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    depth_method: config.depth_method,
                    force_column: config.columns.force.clone(),
                    surface_detection_offset_cm: config.surface_detection_offset_cm,
                    tip_diameter_mm: config.tip_diameter_mm,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ProfileConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let defaults = ProfileConfig::default();

    if config.depth_method == DepthMethod::Barometer {
        warnings.push(
            "depth_method = barometer ignores the accelerometer even when it is present"
                .to_string(),
        );
    }
    if config.columns != defaults.columns {
        warnings.push("column names differ from the Lyte firmware defaults".to_string());
    }
    if config.surface_detection_offset_cm == 0.0 {
        warnings.push("surface_detection_offset_cm is 0 - force and optical surfaces coincide".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Depth method: {:?}", summary.depth_method);
            println!("  Force column: {}", summary.force_column);
            println!(
                "  Surface offset: {} cm",
                summary.surface_detection_offset_cm
            );
            println!("  Tip diameter: {} mm", summary.tip_diameter_mm);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
