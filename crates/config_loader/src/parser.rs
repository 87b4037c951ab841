//! Profile configuration text formats.

use std::error::Error;

use contracts::{ContractError, ProfileConfig};

/// Text format of a profile configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Format for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// Deserialize a profile configuration. Missing keys take their defaults.
    pub fn parse(self, content: &str) -> Result<ProfileConfig, ContractError> {
        let parsed: Result<ProfileConfig, Box<dyn Error + Send + Sync>> = match self {
            Self::Toml => toml::from_str(content).map_err(Into::into),
            Self::Json => serde_json::from_str(content).map_err(Into::into),
        };
        parsed.map_err(|e| ContractError::ConfigParse {
            message: format!("{} parse error: {e}", self.name()),
            source: Some(e),
        })
    }

    /// Serialize a profile configuration in this format.
    pub fn render(self, config: &ProfileConfig) -> Result<String, ContractError> {
        let rendered = match self {
            Self::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        };
        rendered.map_err(|e| {
            ContractError::config_parse(format!("{} serialize error: {e}", self.name()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DepthMethod, MonotonicAggregate};

    #[test]
    fn test_parse_toml_partial() {
        let content = r#"
depth_method = "barometer"
surface_detection_offset_cm = 3.0

[detection]
optical_surface_threshold = 0.2

[depth]
monotonic_aggregate = "median"

[columns]
force = "Force"
"#;
        let config = ConfigFormat::Toml.parse(content).unwrap();
        assert_eq!(config.depth_method, DepthMethod::Barometer);
        assert_eq!(config.surface_detection_offset_cm, 3.0);
        assert_eq!(config.detection.optical_surface_threshold, 0.2);
        assert_eq!(config.depth.monotonic_aggregate, MonotonicAggregate::Median);
        assert_eq!(config.columns.force, "Force");
        // untouched fields keep their defaults
        assert_eq!(config.columns.ambient, "Sensor2");
        assert_eq!(config.detection.peak_distance, 10);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(ConfigFormat::Toml.parse("").unwrap(), ProfileConfig::default());
        assert_eq!(ConfigFormat::Json.parse("{}").unwrap(), ProfileConfig::default());
    }

    #[test]
    fn test_parse_json() {
        let config = ConfigFormat::Json.parse(r#"{ "tip_diameter_mm": 4.0, "optical": { "min_ambient_range": 50 } }"#)
            .unwrap();
        assert_eq!(config.tip_diameter_mm, 4.0);
        assert_eq!(config.optical.min_ambient_range, 50.0);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let err = ConfigFormat::Toml.parse("invalid toml [[[").unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_unknown_depth_method_rejected() {
        let err = ConfigFormat::Toml.parse(r#"depth_method = "sonar""#).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_render_then_parse() {
        let mut config = ProfileConfig::default();
        config.depth_method = DepthMethod::Accelerometer;
        for format in [ConfigFormat::Toml, ConfigFormat::Json] {
            let text = format.render(&config).unwrap();
            assert_eq!(format.parse(&text).unwrap(), config, "{format:?}");
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
