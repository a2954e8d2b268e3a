use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{ENV_PREFIX, PRODID, SIGNIFICANT_CHANGE_PROPERTIES};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scheduling: SchedulingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Property names whose change marks an outbound message as significant.
    pub significant_properties: Vec<String>,
    /// PRODID used when a calendar carries none.
    pub prodid: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            significant_properties: SIGNIFICANT_CHANGE_PROPERTIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            prodid: PRODID.to_string(),
        }
    }
}

impl SchedulingConfig {
    /// ## Summary
    /// Checks that the scheduling settings are usable and normalizes
    /// property names to uppercase.
    ///
    /// ## Errors
    /// Returns an error if the PRODID is empty or a property name is blank.
    pub fn validate(mut self) -> CoreResult<Self> {
        if self.prodid.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "scheduling.prodid must not be empty".to_string(),
            ));
        }
        for name in &mut self.significant_properties {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(CoreError::ValidationError(
                    "scheduling.significant_properties contains a blank entry".to_string(),
                ));
            }
            *name = trimmed.to_ascii_uppercase();
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn builder() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("logging.level", "info")?
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("scheduling.significant_properties"),
        ))
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file, environment variables and an
    /// optional `config.toml` into a `Settings`.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the
    /// configuration fails.
    pub fn load() -> Result<Self> {
        let settings = builder()?
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validated()
    }

    /// ## Summary
    /// Loads configuration from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is invalid or fails validation.
    pub fn from_toml(source: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validated()
    }

    fn validated(self) -> Result<Self> {
        Ok(Self {
            scheduling: self.scheduling.validate()?,
            logging: self.logging,
        })
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_cover_significant_properties() {
        let settings = Settings::default();
        assert_eq!(
            settings.scheduling.significant_properties.len(),
            SIGNIFICANT_CHANGE_PROPERTIES.len()
        );
        assert!(
            settings
                .scheduling
                .significant_properties
                .iter()
                .any(|p| p == "EXDATE")
        );
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn from_toml_overrides_and_normalizes() {
        let settings = Settings::from_toml(
            r#"
            [scheduling]
            significant_properties = ["dtstart", " summary "]

            [logging]
            level = "trace"
            "#,
        )
        .expect("valid settings");

        assert_eq!(
            settings.scheduling.significant_properties,
            vec!["DTSTART".to_string(), "SUMMARY".to_string()]
        );
        assert_eq!(settings.scheduling.prodid, PRODID);
        assert_eq!(settings.logging.level, "trace");
    }

    #[test]
    fn blank_prodid_is_rejected() {
        let result = Settings::from_toml(
            r#"
            [scheduling]
            prodid = "  "
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn deserializes_partial_json() {
        let settings: Settings =
            serde_json::from_str(r#"{"logging":{"level":"warn"}}"#).expect("valid json");
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.scheduling.prodid, PRODID);
    }
}
