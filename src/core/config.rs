use std::env;

use chrono_tz::Tz;

pub const DEFAULT_SECRET_NAME: &str = "SlackSecret";
pub const DEFAULT_SECRET_REGION: &str = "ap-northeast-1";
pub const DEFAULT_ALERT_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;
pub const DEFAULT_ALERT_USERNAME: &str = "AWS Login Notification";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret_name: String,
    pub secret_region: String,
    pub alert_timezone: Tz,
    pub alert_username: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            secret_region: DEFAULT_SECRET_REGION.to_string(),
            alert_timezone: DEFAULT_ALERT_TIMEZONE,
            alert_username: DEFAULT_ALERT_USERNAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let alert_timezone = match lookup("ALERT_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| format!("ALERT_TIMEZONE: {}", e))?,
            None => defaults.alert_timezone,
        };

        Ok(Self {
            secret_name: lookup("SLACK_SECRET_NAME").unwrap_or(defaults.secret_name),
            secret_region: lookup("SLACK_SECRET_REGION").unwrap_or(defaults.secret_region),
            alert_timezone,
            alert_username: lookup("ALERT_USERNAME").unwrap_or(defaults.alert_username),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn unset_variables_use_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.secret_name, "SlackSecret");
        assert_eq!(config.secret_region, "ap-northeast-1");
        assert_eq!(config.alert_timezone, chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn overrides_are_applied() {
        let vars: HashMap<&str, &str> = [
            ("SLACK_SECRET_NAME", "OtherSecret"),
            ("ALERT_TIMEZONE", "Europe/Berlin"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.secret_name, "OtherSecret");
        assert_eq!(config.alert_timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.alert_username, "AWS Login Notification");
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = AppConfig::from_lookup(|k| (k == "ALERT_TIMEZONE").then(|| "Mars/Base".into()))
            .unwrap_err();
        assert!(err.starts_with("ALERT_TIMEZONE"));
    }
}
