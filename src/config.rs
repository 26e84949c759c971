const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: std::time::Duration,
    pub log_to_console: bool,
    pub log_dir: Option<std::path::PathBuf>,
}

// There is no .env on a device, so a missing file just means defaults.
static CONFIG: std::sync::LazyLock<Config> = std::sync::LazyLock::new(|| {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error =? e, "No .env file loaded");
    }

    Config::from_lookup(|name| std::env::var(name).ok())
});

pub fn config() -> &'static Config {
    &CONFIG
}

impl Config {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: lookup("HN_API_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| crate::hn_api::DEFAULT_API_BASE_URL.to_string()),
            request_timeout: std::time::Duration::from_secs(parse_or(
                &lookup,
                "HN_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            log_to_console: parse_or(&lookup, "HN_LOG_TO_CONSOLE", false),
            log_dir: lookup("HN_LOG_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(std::path::PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(name) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                variable = name,
                value = %raw,
                default =? default,
                "Ignoring unparsable setting"
            );
            default
        }
    }
}
