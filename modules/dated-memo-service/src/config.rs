use std::env;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PATH: &str = "./dated_memos.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub debug: bool,
    /// Problems found while reading the environment, logged once logging is up.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();
        let port = match lookup("MEMOS_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warnings.push(format!(
                    "MEMOS_PORT '{}' is not a valid port, using {}",
                    raw, DEFAULT_PORT
                ));
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            db_path: lookup("MEMOS_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            port,
            debug: lookup("MEMOS_DEBUG")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            warnings,
        }
    }

    /// Debug builds are reachable only from the same machine.
    pub fn bind_addr(&self) -> String {
        let host = if self.debug { "127.0.0.1" } else { "0.0.0.0" };
        format!("{}:{}", host, self.port)
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
