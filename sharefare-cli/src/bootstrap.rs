use sharefare_domain::{AtomicUnitConversionError, CurrencyScale};
use std::{env, io, str::FromStr};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const CURRENCY_SCALE_VAR: &str = "SHAREFARE_CURRENCY_SCALE";
const OUTPUT_VAR: &str = "SHAREFARE_OUTPUT";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SHAREFARE_CURRENCY_SCALE must be a non-negative integer, got `{0}`")]
    InvalidScale(String),
    #[error("SHAREFARE_CURRENCY_SCALE: {0}")]
    UnsupportedScale(#[from] AtomicUnitConversionError),
    #[error("SHAREFARE_OUTPUT must be `table` or `json`, got `{0}`")]
    InvalidOutput(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidOutput(s.to_string())),
        }
    }
}

/// Runtime settings read from the environment (and an optional `.env`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub scale: CurrencyScale,
    pub output: OutputFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let scale = match lookup(CURRENCY_SCALE_VAR) {
            Some(raw) => {
                let scale = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidScale(raw.clone()))?;
                CurrencyScale::new(scale)?
            }
            None => CurrencyScale::default(),
        };
        let output = match lookup(OUTPUT_VAR) {
            Some(raw) => raw.parse()?,
            None => OutputFormat::default(),
        };
        Ok(Self { scale, output })
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_cents_and_tables() {
        let config = config_from(&[]).expect("defaults are valid");
        assert_eq!(config.scale, CurrencyScale::CENTS);
        assert_eq!(config.output, OutputFormat::Table);
    }

    #[rstest]
    #[case::yen("0", 0)]
    #[case::padded(" 3 ", 3)]
    fn reads_currency_scale(#[case] raw: &str, #[case] expected: u32) {
        let config = config_from(&[(CURRENCY_SCALE_VAR, raw)]).expect("valid scale");
        assert_eq!(config.scale.scale(), expected);
    }

    #[rstest]
    #[case::json("json", OutputFormat::Json)]
    #[case::upper("TABLE", OutputFormat::Table)]
    fn reads_output_format(#[case] raw: &str, #[case] expected: OutputFormat) {
        let config = config_from(&[(OUTPUT_VAR, raw)]).expect("valid output");
        assert_eq!(config.output, expected);
    }

    #[rstest]
    #[case::not_a_number(
        &[(CURRENCY_SCALE_VAR, "two")],
        "SHAREFARE_CURRENCY_SCALE must be a non-negative integer, got `two`"
    )]
    #[case::too_large(
        &[(CURRENCY_SCALE_VAR, "19")],
        "SHAREFARE_CURRENCY_SCALE: currency scale 19 is not supported (max 18)"
    )]
    #[case::bad_output(
        &[(OUTPUT_VAR, "xml")],
        "SHAREFARE_OUTPUT must be `table` or `json`, got `xml`"
    )]
    fn rejects_invalid_settings(#[case] pairs: &[(&str, &str)], #[case] message: &str) {
        let err = config_from(pairs).expect_err("invalid setting");
        assert_eq!(err.to_string(), message);
    }
}
