//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::store::RetryPolicy;

/// Session lifecycle timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle time after which a session is preserved and ended.
    pub timeout: Duration,
    /// Idle time after which a session is considered close to timing out.
    pub warning: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            warning: Duration::from_secs(25 * 60),
        }
    }
}

/// Coaching core configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub session: SessionConfig,
    /// How often the background sweep ends expired sessions.
    pub cleanup_interval: Duration,
    /// Maximum number of messages kept in a session's history.
    pub history_limit: usize,
    /// Retry policy applied to every data store call.
    pub retry: RetryPolicy,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            cleanup_interval: Duration::from_secs(60),
            history_limit: 50,
            retry: RetryPolicy::default(),
        }
    }
}

impl CoachConfig {
    /// Build a config from `COACH_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = parse_or(&lookup, "COACH_SESSION_TIMEOUT_SECS", defaults.session.timeout.as_secs())?;
        let warning = parse_or(&lookup, "COACH_SESSION_WARNING_SECS", defaults.session.warning.as_secs())?;
        if warning >= timeout {
            return Err(ConfigError::InvalidValue {
                key: "COACH_SESSION_WARNING_SECS".to_string(),
                message: format!("warning ({warning}s) must be below timeout ({timeout}s)"),
            });
        }

        let cleanup = parse_or(&lookup, "COACH_CLEANUP_INTERVAL_SECS", defaults.cleanup_interval.as_secs())?;
        if cleanup == 0 {
            return Err(ConfigError::InvalidValue {
                key: "COACH_CLEANUP_INTERVAL_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let history_limit = parse_or(&lookup, "COACH_HISTORY_LIMIT", defaults.history_limit)?;

        let max_attempts = parse_or(&lookup, "COACH_RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "COACH_RETRY_MAX_ATTEMPTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let base_delay = parse_or(
            &lookup,
            "COACH_RETRY_BASE_DELAY_MS",
            defaults.retry.base_delay.as_millis() as u64,
        )?;
        let max_delay = parse_or(
            &lookup,
            "COACH_RETRY_MAX_DELAY_MS",
            defaults.retry.max_delay.as_millis() as u64,
        )?;

        Ok(Self {
            session: SessionConfig {
                timeout: Duration::from_secs(timeout),
                warning: Duration::from_secs(warning),
            },
            cleanup_interval: Duration::from_secs(cleanup),
            history_limit,
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(base_delay),
                max_delay: Duration::from_millis(max_delay.max(base_delay)),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoachConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = CoachConfig::from_lookup(lookup(&[
            ("COACH_SESSION_TIMEOUT_SECS", "120"),
            ("COACH_SESSION_WARNING_SECS", "90"),
            ("COACH_RETRY_MAX_ATTEMPTS", "5"),
            ("COACH_RETRY_BASE_DELAY_MS", "10"),
            ("COACH_RETRY_MAX_DELAY_MS", "40"),
        ]))
        .unwrap();
        assert_eq!(config.session.timeout, Duration::from_secs(120));
        assert_eq!(config.session.warning, Duration::from_secs(90));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.max_delay, Duration::from_millis(40));
    }

    #[test]
    fn warning_must_precede_timeout() {
        let err = CoachConfig::from_lookup(lookup(&[
            ("COACH_SESSION_TIMEOUT_SECS", "60"),
            ("COACH_SESSION_WARNING_SECS", "60"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "COACH_SESSION_WARNING_SECS"));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = CoachConfig::from_lookup(lookup(&[("COACH_HISTORY_LIMIT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("COACH_HISTORY_LIMIT"));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        assert!(CoachConfig::from_lookup(lookup(&[("COACH_RETRY_MAX_ATTEMPTS", "0")])).is_err());
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        let err = CoachConfig::from_lookup(lookup(&[("COACH_CLEANUP_INTERVAL_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "COACH_CLEANUP_INTERVAL_SECS"));
    }
}
