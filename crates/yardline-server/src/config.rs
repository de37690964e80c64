//! Server configuration from `YARDLINE_*` environment variables.

use thiserror::Error;
use yardline_compliance::ComplianceConfig;
use yardline_db::DbConfig;
use yardline_tenancy::TenancyConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (default: `0.0.0.0:3000`).
    pub bind_addr: String,
    pub db: DbConfig,
    pub compliance: ComplianceConfig,
    pub tenancy: TenancyConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            db: DbConfig::default(),
            compliance: ComplianceConfig::default(),
            tenancy: TenancyConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// | variable                            | field                                   |
    /// |-------------------------------------|-----------------------------------------|
    /// | `YARDLINE_BIND_ADDR`                | `bind_addr`                             |
    /// | `YARDLINE_DB_URL`                   | `db.url`                                |
    /// | `YARDLINE_DB_NAMESPACE`             | `db.namespace`                          |
    /// | `YARDLINE_DB_DATABASE`              | `db.database`                           |
    /// | `YARDLINE_DB_USERNAME`              | `db.username`                           |
    /// | `YARDLINE_DB_PASSWORD`              | `db.password`                           |
    /// | `YARDLINE_ALERT_HORIZON_DAYS`       | `compliance.alert_horizon_days`         |
    /// | `YARDLINE_NOTIFICATION_WINDOW_DAYS` | `compliance.notification_window_days`   |
    /// | `YARDLINE_TRIAL_DAYS`               | `tenancy.default_trial_days`            |
    /// | `YARDLINE_MAX_TRIAL_DAYS`           | `tenancy.max_trial_days`                |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("YARDLINE_BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Some(v) = lookup("YARDLINE_DB_URL") {
            // Embedded engines take no credentials.
            if v.starts_with("mem://") {
                config.db.username = None;
                config.db.password = None;
            }
            config.db.url = v;
        }
        if let Some(v) = lookup("YARDLINE_DB_NAMESPACE") {
            config.db.namespace = v;
        }
        if let Some(v) = lookup("YARDLINE_DB_DATABASE") {
            config.db.database = v;
        }
        if let Some(v) = lookup("YARDLINE_DB_USERNAME") {
            config.db.username = Some(v);
        }
        if let Some(v) = lookup("YARDLINE_DB_PASSWORD") {
            config.db.password = Some(v);
        }

        let days = |var: &'static str| -> Result<Option<i64>, ConfigError> {
            match lookup(var) {
                None => Ok(None),
                Some(value) => match value.trim().parse::<i64>() {
                    Ok(n) if n >= 0 => Ok(Some(n)),
                    _ => Err(ConfigError::Invalid { var, value }),
                },
            }
        };

        if let Some(n) = days("YARDLINE_ALERT_HORIZON_DAYS")? {
            config.compliance.alert_horizon_days = n;
        }
        if let Some(n) = days("YARDLINE_NOTIFICATION_WINDOW_DAYS")? {
            config.compliance.notification_window_days = n;
        }
        if let Some(n) = days("YARDLINE_TRIAL_DAYS")? {
            config.tenancy.default_trial_days = n;
        }
        if let Some(n) = days("YARDLINE_MAX_TRIAL_DAYS")? {
            config.tenancy.max_trial_days = n;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that contradict each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let compliance = &self.compliance;
        if compliance.notification_window_days > compliance.alert_horizon_days {
            return Err(ConfigError::Invalid {
                var: "YARDLINE_NOTIFICATION_WINDOW_DAYS",
                value: format!(
                    "{} exceeds the alert horizon of {} days",
                    compliance.notification_window_days, compliance.alert_horizon_days
                ),
            });
        }

        let tenancy = &self.tenancy;
        if !(1..=tenancy.max_trial_days).contains(&tenancy.default_trial_days) {
            return Err(ConfigError::Invalid {
                var: "YARDLINE_TRIAL_DAYS",
                value: format!(
                    "{} is outside 1..={} (YARDLINE_MAX_TRIAL_DAYS)",
                    tenancy.default_trial_days, tenancy.max_trial_days
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.compliance.alert_horizon_days, 30);
        assert_eq!(config.compliance.notification_window_days, 7);
        assert_eq!(config.tenancy.default_trial_days, 14);
    }

    #[test]
    fn overrides_apply() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("YARDLINE_BIND_ADDR", "127.0.0.1:8080"),
            ("YARDLINE_DB_URL", "mem://"),
            ("YARDLINE_ALERT_HORIZON_DAYS", "60"),
            ("YARDLINE_TRIAL_DAYS", "21"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.db.url, "mem://");
        assert!(config.db.username.is_none());
        assert_eq!(config.compliance.alert_horizon_days, 60);
        assert_eq!(config.tenancy.default_trial_days, 21);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let vars = [("YARDLINE_NOTIFICATION_WINDOW_DAYS", "soon")];
        let err = ServerConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("YARDLINE_NOTIFICATION_WINDOW_DAYS"));
    }

    #[test]
    fn rejects_notification_window_beyond_horizon() {
        let vars = [
            ("YARDLINE_ALERT_HORIZON_DAYS", "10"),
            ("YARDLINE_NOTIFICATION_WINDOW_DAYS", "14"),
        ];
        let err = ServerConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("YARDLINE_NOTIFICATION_WINDOW_DAYS"));

        let equal = [
            ("YARDLINE_ALERT_HORIZON_DAYS", "14"),
            ("YARDLINE_NOTIFICATION_WINDOW_DAYS", "14"),
        ];
        assert!(ServerConfig::from_lookup(lookup(&equal)).is_ok());
    }

    #[test]
    fn rejects_default_trial_outside_allowed_range() {
        let longer = [("YARDLINE_TRIAL_DAYS", "30"), ("YARDLINE_MAX_TRIAL_DAYS", "20")];
        let err = ServerConfig::from_lookup(lookup(&longer)).unwrap_err();
        assert!(err.to_string().contains("YARDLINE_TRIAL_DAYS"));

        let zero = [("YARDLINE_TRIAL_DAYS", "0")];
        assert!(ServerConfig::from_lookup(lookup(&zero)).is_err());
    }
}
