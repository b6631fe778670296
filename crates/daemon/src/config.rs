// Daemon configuration (environment driven)

use clap::ValueEnum;
use jobpulse_core::application::EngagementPolicy;
use jobpulse_core::error::{AppError, Result};
use jobpulse_core::port::MaintenanceConfig;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "~/.jobpulse/engagement.db";
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_VACUUM_THRESHOLD_MB: f64 = 512.0;

/// Which adapter family backs the ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Sqlite,
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => Ok(Backend::Memory),
            other => Err(AppError::Config(format!(
                "JOBPULSE_BACKEND must be 'sqlite' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub backend: Backend,
    pub policy: EngagementPolicy,
    pub maintenance_interval: Duration,
    pub maintenance: MaintenanceConfig,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("JOBPULSE_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let backend = match lookup("JOBPULSE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => Backend::Sqlite,
        };

        let defaults = EngagementPolicy::default();
        let policy = EngagementPolicy {
            impression_window: secs(
                &lookup,
                "JOBPULSE_IMPRESSION_WINDOW_SECS",
                defaults.impression_window,
            )?,
            click_window: secs(&lookup, "JOBPULSE_CLICK_WINDOW_SECS", defaults.click_window)?,
            view_window: secs(&lookup, "JOBPULSE_VIEW_WINDOW_SECS", defaults.view_window)?,
        };
        policy.validate()?;

        let maintenance_interval = secs(
            &lookup,
            "JOBPULSE_MAINTENANCE_INTERVAL_SECS",
            Duration::from_secs(DEFAULT_MAINTENANCE_INTERVAL_SECS),
        )?;
        if maintenance_interval.is_zero() {
            return Err(AppError::Config(
                "JOBPULSE_MAINTENANCE_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        let max_db_size_mb = match lookup("JOBPULSE_VACUUM_THRESHOLD_MB") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|mb| mb.is_finite() && *mb >= 0.0)
                .ok_or_else(|| {
                    AppError::Config(format!("JOBPULSE_VACUUM_THRESHOLD_MB is invalid: '{}'", raw))
                })?,
            None => DEFAULT_VACUUM_THRESHOLD_MB,
        };

        // Entries younger than the largest window may still suppress events.
        let maintenance = MaintenanceConfig {
            dedup_retention_ms: policy.largest_window_millis()?,
            max_db_size_mb,
        };

        Ok(Self {
            db_path: expand_path(&db_path),
            backend,
            policy,
            maintenance_interval,
            maintenance,
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, db_path: Option<String>, backend: Option<Backend>) -> Self {
        if let Some(path) = db_path {
            self.db_path = expand_path(&path);
        }
        if let Some(backend) = backend {
            self.backend = backend;
        }
        self
    }
}

fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

fn secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| AppError::Config(format!("{} must be whole seconds, got '{}'", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = tokio_test::assert_ok!(DaemonConfig::from_lookup(lookup_from(&[])));

        assert_eq!(config.backend, Backend::Sqlite);
        assert!(config.db_path.ends_with(".jobpulse/engagement.db"));
        assert_eq!(config.policy, EngagementPolicy::default());
        assert_eq!(config.maintenance_interval, Duration::from_secs(3600));
        assert_eq!(config.maintenance.dedup_retention_ms, 75 * 60 * 1000);
        assert_eq!(config.maintenance.max_db_size_mb, 512.0);
    }

    #[test]
    fn test_windows_from_env() {
        let config = DaemonConfig::from_lookup(lookup_from(&[
            ("JOBPULSE_CLICK_WINDOW_SECS", "600"),
            ("JOBPULSE_VIEW_WINDOW_SECS", "7200"),
            ("JOBPULSE_BACKEND", "Memory"),
        ]))
        .unwrap();

        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.policy.click_window, Duration::from_secs(600));
        assert_eq!(config.policy.impression_window, Duration::from_secs(1800));
        assert_eq!(config.maintenance.dedup_retention_ms, 7_200_000);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pairs in [
            [("JOBPULSE_CLICK_WINDOW_SECS", "soon")],
            [("JOBPULSE_VIEW_WINDOW_SECS", "0")],
            [("JOBPULSE_VIEW_WINDOW_SECS", "18446744073709551615")],
            [("JOBPULSE_BACKEND", "postgres")],
            [("JOBPULSE_VACUUM_THRESHOLD_MB", "-1")],
            [("JOBPULSE_MAINTENANCE_INTERVAL_SECS", "0")],
        ] {
            let err = DaemonConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{:?}", pairs);
        }
    }

    #[test]
    fn test_overrides_win() {
        let config = DaemonConfig::from_lookup(lookup_from(&[("JOBPULSE_DB_PATH", "/tmp/a.db")]))
            .unwrap()
            .with_overrides(Some("/tmp/b.db".to_string()), Some(Backend::Memory));

        assert_eq!(config.db_path, "/tmp/b.db");
        assert_eq!(config.backend, Backend::Memory);
    }
}
