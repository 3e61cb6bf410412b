//! Scoped process environment for tests that read `TASKPULSE_*` settings.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use taskpulse::config::CONFIG_PATH_VAR;

/// Variables consulted by `DashboardConfig::load`.
pub const CONFIG_VARS: [&str; 5] = [
    CONFIG_PATH_VAR,
    "TASKPULSE_DATABASE_URL",
    "TASKPULSE_DATABASE_MAX_CONNECTIONS",
    "TASKPULSE_LOG_LEVEL",
    "TASKPULSE_LOG_JSON",
];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Holds the configuration environment steady for one test.
///
/// Every variable in [`CONFIG_VARS`] is cleared unless the test sets it, and
/// all of them are restored on drop. Guards serialise on a global lock, so
/// tests using them never observe each other's settings.
pub struct ConfigEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ConfigEnv {
    /// Points `TASKPULSE_CONFIG` at `path` and applies `overrides`.
    pub fn with_file(path: impl Into<OsString>, overrides: &[(&str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let path = path.into();
        let saved = CONFIG_VARS
            .into_iter()
            .map(|var| {
                let previous = env::var_os(var);
                let value = if var == CONFIG_PATH_VAR {
                    Some(path.clone())
                } else {
                    overrides
                        .iter()
                        .find(|(key, _)| *key == var)
                        .map(|(_, value)| OsString::from(value))
                };
                write_var(var, value.as_ref());
                (var, previous)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for ConfigEnv {
    fn drop(&mut self) {
        for (var, previous) in self.saved.drain(..) {
            write_var(var, previous.as_ref());
        }
    }
}

fn write_var(var: &str, value: Option<&OsString>) {
    unsafe {
        // SAFETY: ENV_LOCK serialises every environment mutation in tests.
        match value {
            Some(value) => env::set_var(var, value),
            None => env::remove_var(var),
        }
    }
}
