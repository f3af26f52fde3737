//! Process configuration read from the environment.
//!
//! `main` loads `.env.local` / `.env` from the repo root before calling
//! [`AppConfig::from_env`].

use std::fmt;
use std::str::FromStr;

/// Which executor backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphBackend {
    #[default]
    Neo4j,
    /// Process-local graph, lost on exit.
    Memory,
}

impl fmt::Display for GraphBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neo4j => f.write_str("neo4j"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for GraphBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neo4j" => Ok(Self::Neo4j),
            "memory" | "in-memory" | "inmemory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown GRAPH_BACKEND '{0}' (expected 'neo4j' or 'memory')")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: GraphBackend,
    pub neo4j: Neo4jSettings,
    pub server_host: String,
    pub server_port: u16,
    /// `*` or a comma-separated origin list. `None` disables the CORS layer.
    pub cors_allowed_origins: Option<String>,
}

const DEFAULT_PORT: u16 = 3000;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend = match lookup("GRAPH_BACKEND") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => GraphBackend::default(),
        };

        let raw_port = lookup("SERVER_PORT").or_else(|| lookup("PORT"));
        let server_port = match raw_port.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = raw, default = DEFAULT_PORT, "Invalid SERVER_PORT, using default");
                DEFAULT_PORT
            }),
        };

        Ok(Self {
            backend,
            neo4j: Neo4jSettings {
                uri: var("NEO4J_URI", "bolt://localhost:7687"),
                user: var("NEO4J_USER", "neo4j"),
                password: var("NEO4J_PASSWORD", "password"),
            },
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.backend, GraphBackend::Neo4j);
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.cors_allowed_origins, None);
    }

    #[test]
    fn reads_overrides_and_port_fallback() {
        let config = config(&[
            ("GRAPH_BACKEND", "Memory"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", " * "),
        ])
        .unwrap();
        assert_eq!(config.backend, GraphBackend::Memory);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cors_allowed_origins.as_deref(), Some("*"));
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let config = config(&[("SERVER_PORT", "not-a-port")]).unwrap();
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn unknown_backend_is_an_error() {
        assert!(matches!(
            config(&[("GRAPH_BACKEND", "postgres")]),
            Err(ConfigError::UnknownBackend(_))
        ));
    }
}
