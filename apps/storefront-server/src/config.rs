//! Layered application configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. YAML file given with `--config`
//! 3. `JWT_SECRET` (mapped to `session.secret`)
//! 4. `STOREFRONT__`-prefixed variables, `__` separating sections,
//!    e.g. `STOREFRONT__AUTH_GATE__COOKIE_NAME`
//!
//! Secrets from the environment are taken verbatim, never parsed as YAML-ish
//! values, so they match what an external token issuer reads.

use std::path::Path;

use anyhow::{Context, Result, bail};
use auth_gate::AuthGateConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::Deserialize;
use session_token::SessionTokenConfig;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "STOREFRONT__";

/// Legacy variable holding the session signing secret.
pub const LEGACY_SECRET_VAR: &str = "JWT_SECRET";

/// Prefixed variable holding the session signing secret.
pub const SECRET_VAR: &str = "STOREFRONT__SESSION__SECRET";

const SECRET_KEY: &str = "session.secret";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub session: SessionTokenConfig,
    #[serde(default)]
    pub auth_gate: AuthGateConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_owned(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Layered sources without extraction, exposed for tests.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        for var in [LEGACY_SECRET_VAR, SECRET_VAR] {
            if let Ok(secret) = std::env::var(var) {
                figment = figment.merge(Serialized::default(SECRET_KEY, secret));
            }
        }
        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .split("__")
                .ignore(&[SECRET_KEY]),
        )
    }

    /// Load and validate configuration.
    ///
    /// # Errors
    /// Returns an error if the config file is missing, a source fails to
    /// parse, a field is unknown, or the session secret is absent or empty.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            bail!("config file '{}' does not exist", path.display());
        }

        let config: Self = Self::figment(path)
            .extract()
            .context("failed to load configuration")?;

        config
            .session
            .validate()
            .context("invalid session configuration")?;

        Ok(config)
    }
}
