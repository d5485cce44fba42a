//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::EngineResult;

/// Calendar engine configuration.
///
/// Cache keys are assembled from these markers, e.g.
/// `Orion.ReferenceData.BusinessCenterHolidays.AUSY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Namespace prefix of every cache key.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Key segment of the date rule profiles object.
    #[serde(default = "default_date_rules_generic_name")]
    pub date_rules_generic_name: String,

    /// Key segment of the business centre holiday objects.
    #[serde(default = "default_holidays_type_marker")]
    pub holidays_type_marker: String,

    /// Key segment grouping all reference data.
    #[serde(default = "default_reference_data_marker")]
    pub reference_data_marker: String,

    /// Name of the calendar used when no business centre resolves.
    #[serde(default = "default_calendar")]
    pub default_calendar: String,

    /// `EnvFilter` directive used by [`init_tracing`] when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_namespace() -> String {
    "Orion".to_string()
}

fn default_date_rules_generic_name() -> String {
    "DateRules".to_string()
}

fn default_holidays_type_marker() -> String {
    "BusinessCenterHolidays".to_string()
}

fn default_reference_data_marker() -> String {
    "ReferenceData".to_string()
}

fn default_calendar() -> String {
    orion_core::calendars::HELL_CALENDAR.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            date_rules_generic_name: default_date_rules_generic_name(),
            holidays_type_marker: default_holidays_type_marker(),
            reference_data_marker: default_reference_data_marker(),
            default_calendar: default_calendar(),
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Configuration for another namespace with default markers.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Key of the date rule profiles object.
    pub fn date_rules_key(&self) -> String {
        format!(
            "{}.{}.{}",
            self.namespace, self.reference_data_marker, self.date_rules_generic_name
        )
    }

    /// Key of one business centre's holidays.
    pub fn holidays_key(&self, business_center: &str) -> String {
        format!("{}.{}", self.holidays_query(), business_center)
    }

    /// Prefix query matching every business centre holiday object.
    pub fn holidays_query(&self) -> String {
        format!(
            "{}.{}.{}",
            self.namespace, self.reference_data_marker, self.holidays_type_marker
        )
    }

    /// Prefix query matching the date rule profiles object.
    pub fn date_rules_query(&self) -> String {
        self.date_rules_key()
    }
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or `filter` when unset.
///
/// Returns `false` when a global subscriber is already installed.
pub fn init_tracing(filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
