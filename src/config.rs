use serde::Deserialize;

use crate::{
    gemini,
    utils::{retry, throttle},
    validate,
};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConfigRoot {
    pub gemini: gemini::Config,
    pub throttle: throttle::Config,
    pub retries: retry::Policy,
    pub validation: validate::Config,
}

impl ConfigRoot {
    pub fn new(explicit_file: &Option<std::path::PathBuf>) -> Result<Self, config::ConfigError> {
        let mut s = config::Config::builder();

        // our base config will always be in /etc/emote
        s = s.add_source(config::File::with_name("/etc/emote/emote.toml").required(false));

        // but we can override it by having a file in the working dir
        s = s.add_source(config::File::with_name("emote.toml").required(false));

        // if an explicit file was passed, then we load it as mandatory
        if let Some(explicit) = explicit_file.as_ref().and_then(|x| x.to_str()) {
            s = s.add_source(config::File::with_name(explicit).required(true));
        }

        // finally, we use env vars to make some last-step overrides
        s = s.add_source(
            config::Environment::with_prefix("EMOTE")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut root: Self = s.build()?.try_deserialize()?;

        if root.gemini.api_key.is_none() {
            root.gemini.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, sync::Mutex, time::Duration};

    use super::*;

    // the process environment is shared by every test that loads config
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets env vars for the duration of a test, restoring the previous
    /// values on drop.
    struct EnvVars(Vec<(&'static str, Option<String>)>);

    impl EnvVars {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let previous = vars
                .iter()
                .map(|(key, value)| {
                    let old = std::env::var(key).ok();
                    std::env::set_var(key, value);
                    (*key, old)
                })
                .collect();

            Self(previous)
        }

        fn unset(keys: &[&'static str]) -> Self {
            let previous = keys
                .iter()
                .map(|key| {
                    let old = std::env::var(key).ok();
                    std::env::remove_var(key);
                    (*key, old)
                })
                .collect();

            Self(previous)
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for (key, old) in &self.0 {
                match old {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();

        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_documented_tuning() {
        let root = ConfigRoot::default();

        assert_eq!(root.throttle.min_interval, Duration::from_millis(1_000));
        assert_eq!(root.retries.max_attempts, 3);
        assert_eq!(root.retries.max_backoff, Duration::from_millis(10_000));
        assert_eq!(root.gemini.timeout, 30_000);
        assert_eq!(root.validation.max_length, 10_000);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let file = write_config(
            r#"
            [gemini]
            model = "gemini-1.5-flash"
            timeout = 5000

            [throttle]
            min_interval = 250

            [retries]
            max_attempts = 5
            backoff_unit = 100
            "#,
        );

        let _lock = env_lock();
        let root = ConfigRoot::new(&Some(file.path().to_path_buf())).unwrap();

        assert_eq!(root.gemini.model, "gemini-1.5-flash");
        assert_eq!(root.gemini.timeout, 5_000);
        assert_eq!(root.gemini.top_k, 40);
        assert_eq!(root.throttle.min_interval, Duration::from_millis(250));
        assert_eq!(root.retries.max_attempts, 5);
        assert_eq!(root.retries.backoff_unit, Duration::from_millis(100));
        assert_eq!(root.retries.backoff_factor, 2);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = std::path::PathBuf::from("/definitely/not/here/emote.toml");

        let _lock = env_lock();
        assert!(ConfigRoot::new(&Some(missing)).is_err());
    }

    #[test]
    fn env_vars_override_files() {
        let file = write_config(
            r#"
            [gemini]
            api_key = "from-file"
            model = "gemini-1.5-flash"
            base_url = "http://file.local"
            "#,
        );

        let _lock = env_lock();
        let _env = EnvVars::set(&[
            ("EMOTE_GEMINI__API_KEY", "from-env"),
            ("EMOTE_GEMINI__MODEL", "gemini-2.5-pro"),
        ]);

        let root = ConfigRoot::new(&Some(file.path().to_path_buf())).unwrap();

        assert_eq!(root.gemini.api_key.as_deref(), Some("from-env"));
        assert_eq!(root.gemini.model, "gemini-2.5-pro");
        assert_eq!(root.gemini.base_url, "http://file.local");
    }

    #[test]
    fn fallback_api_key_fills_only_missing_key() {
        let without_key = write_config(
            r#"
            [gemini]
            model = "gemini-1.5-flash"
            "#,
        );

        let with_key = write_config(
            r#"
            [gemini]
            api_key = "from-file"
            "#,
        );

        let _lock = env_lock();
        let _cleared = EnvVars::unset(&["EMOTE_GEMINI__API_KEY"]);
        let _env = EnvVars::set(&[(API_KEY_ENV, "from-fallback")]);

        let root = ConfigRoot::new(&Some(without_key.path().to_path_buf())).unwrap();
        assert_eq!(root.gemini.api_key.as_deref(), Some("from-fallback"));

        let root = ConfigRoot::new(&Some(with_key.path().to_path_buf())).unwrap();
        assert_eq!(root.gemini.api_key.as_deref(), Some("from-file"));
    }
}
