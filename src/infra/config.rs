//! Centralized configuration (environment variables + defaults).
//!
//! Values are read through a lookup function so the parsing rules can be
//! exercised without touching the process environment.

use crate::storage::StoreCredentials;
use anyhow::{anyhow, Context};
use serde_json::Value as JsonValue;

const DEFAULT_HTTP_PORT: u16 = 5000;
const DEFAULT_STORE_HOST: &str = "127.0.0.1";
const DEFAULT_STORE_PORT: u16 = 5432;
const DEFAULT_STORE_USER: &str = "postgres";
const DEFAULT_STORE_DATABASE: &str = "postgres";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Where the record store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEndpoint {
    Url(String),
    Parts {
        host: String,
        port: u16,
        credentials: StoreCredentials,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub endpoint: StoreEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub http_port: u16,
    pub seed_sample_data: bool,
    pub store: StoreSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// Call `dotenv::dotenv()` beforehand to pick up a local `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_port = match lookup("PORT") {
            Some(v) => parse_port("PORT", &v)?,
            None => DEFAULT_HTTP_PORT,
        };
        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(v) => parse_bool("SEED_SAMPLE_DATA", &v)?,
            None => false,
        };
        let backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(anyhow!(
                    "STORE_BACKEND must be 'postgres' or 'memory' (got '{}')",
                    other
                ))
            }
        };

        Ok(Self {
            http_port,
            seed_sample_data,
            store: StoreSettings {
                backend,
                endpoint: store_endpoint(&lookup)?,
            },
        })
    }
}

/// Resolution order: `DATABASE_URL`, then a `VCAP_SERVICES` binding, then the
/// individual `STORE_*` variables.
fn store_endpoint<F>(lookup: &F) -> anyhow::Result<StoreEndpoint>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
        return Ok(StoreEndpoint::Url(url));
    }

    if let Some(raw) = lookup("VCAP_SERVICES").filter(|v| !v.trim().is_empty()) {
        if let Some(endpoint) = endpoint_from_vcap(&raw)? {
            return Ok(endpoint);
        }
    }

    let port = match lookup("STORE_PORT") {
        Some(v) => parse_port("STORE_PORT", &v)?,
        None => DEFAULT_STORE_PORT,
    };
    Ok(StoreEndpoint::Parts {
        host: lookup("STORE_HOST").unwrap_or_else(|| DEFAULT_STORE_HOST.to_string()),
        port,
        credentials: StoreCredentials {
            username: lookup("STORE_USER").unwrap_or_else(|| DEFAULT_STORE_USER.to_string()),
            password: lookup("STORE_PASSWORD"),
            database: lookup("STORE_DATABASE")
                .unwrap_or_else(|| DEFAULT_STORE_DATABASE.to_string()),
        },
    })
}

/// Picks the first bound service whose credentials carry either a `uri` or a
/// `host`. Returns `None` when no service qualifies.
fn endpoint_from_vcap(raw: &str) -> anyhow::Result<Option<StoreEndpoint>> {
    let services: JsonValue =
        serde_json::from_str(raw).context("VCAP_SERVICES is not valid JSON")?;
    let Some(groups) = services.as_object() else {
        return Err(anyhow!("VCAP_SERVICES must be a JSON object"));
    };

    for bindings in groups.values().filter_map(|v| v.as_array()) {
        for binding in bindings {
            let Some(creds) = binding.get("credentials") else {
                continue;
            };
            if let Some(uri) = creds.get("uri").and_then(|v| v.as_str()) {
                return Ok(Some(StoreEndpoint::Url(uri.to_string())));
            }
            let Some(host) = creds.get("host").and_then(|v| v.as_str()) else {
                continue;
            };
            let port = match creds.get("port") {
                Some(JsonValue::Number(n)) => n
                    .as_u64()
                    .and_then(|p| u16::try_from(p).ok())
                    .ok_or_else(|| anyhow!("VCAP_SERVICES port out of range: {}", n))?,
                Some(JsonValue::String(s)) => parse_port("VCAP_SERVICES port", s)?,
                _ => DEFAULT_STORE_PORT,
            };
            let text = |field: &str| creds.get(field).and_then(|v| v.as_str()).map(str::to_string);
            return Ok(Some(StoreEndpoint::Parts {
                host: host.to_string(),
                port,
                credentials: StoreCredentials {
                    username: text("username")
                        .or_else(|| text("user"))
                        .unwrap_or_else(|| DEFAULT_STORE_USER.to_string()),
                    password: text("password"),
                    database: text("database")
                        .or_else(|| text("name"))
                        .unwrap_or_else(|| DEFAULT_STORE_DATABASE.to_string()),
                },
            }));
        }
    }
    Ok(None)
}

fn parse_port(name: &str, value: &str) -> anyhow::Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .with_context(|| format!("{} must be a valid port number (got '{}')", name, value))
}

fn parse_bool(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(anyhow!("{} must be true or false (got '{}')", name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.http_port, 5000);
        assert!(!s.seed_sample_data);
        assert_eq!(s.store.backend, StoreBackend::Postgres);
        assert_eq!(
            s.store.endpoint,
            StoreEndpoint::Parts {
                host: "127.0.0.1".to_string(),
                port: 5432,
                credentials: StoreCredentials {
                    username: "postgres".to_string(),
                    password: None,
                    database: "postgres".to_string(),
                },
            }
        );
    }

    #[test]
    fn database_url_wins_over_vcap() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://a@db/x"),
            ("VCAP_SERVICES", r#"{"pg":[{"credentials":{"uri":"postgres://b@db/y"}}]}"#),
        ])
        .unwrap();
        assert_eq!(s.store.endpoint, StoreEndpoint::Url("postgres://a@db/x".to_string()));
    }

    #[test]
    fn vcap_services_host_port_password() {
        let s = settings(&[(
            "VCAP_SERVICES",
            r#"{"elephantsql":[{"credentials":{"host":"db.example","port":"6543","password":"s3cret"}}]}"#,
        )])
        .unwrap();
        match s.store.endpoint {
            StoreEndpoint::Parts { host, port, credentials } => {
                assert_eq!(host, "db.example");
                assert_eq!(port, 6543);
                assert_eq!(credentials.password.as_deref(), Some("s3cret"));
            }
            other => panic!("unexpected endpoint: {:?}", other),
        }
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(settings(&[("PORT", "http")]).is_err());
        assert!(settings(&[("STORE_BACKEND", "redis")]).is_err());
        assert!(settings(&[("SEED_SAMPLE_DATA", "maybe")]).is_err());
        assert!(settings(&[("VCAP_SERVICES", "not json")]).is_err());
    }

    #[test]
    fn memory_backend_and_seed_flag() {
        let s = settings(&[("STORE_BACKEND", "memory"), ("SEED_SAMPLE_DATA", "true"), ("PORT", "8080")])
            .unwrap();
        assert_eq!(s.store.backend, StoreBackend::Memory);
        assert!(s.seed_sample_data);
        assert_eq!(s.http_port, 8080);
    }
}
