//! Gateway configuration
//!
//! Provides:
//! - Command-line flags with environment fallbacks
//! - The immutable `ServerConfig` shared by all handlers
//! - CORS policy parsing

use axum::http::{HeaderValue, Method};
use clap::Parser;
use insight_core::{AuthGuard, ProjectRoot};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Command-line interface of the gateway binary
#[derive(Debug, Clone, Parser)]
#[command(name = "insight-gateway", version, about = "E-commerce analysis gateway")]
pub struct Cli {
    /// Shared secret expected in `X-API-Key`; empty disables auth
    #[arg(long, env = "ECOM_AGENT_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Comma-separated allowed origins, or `*`
    #[arg(long, env = "ECOM_AGENT_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Socket address to listen on
    #[arg(long, env = "ECOM_AGENT_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Directory relative request paths resolve against (defaults to cwd)
    #[arg(long, env = "ECOM_AGENT_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,
}

/// Which browser origins may call the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    #[default]
    AnyOrigin,
    AllowList(Vec<String>),
}

impl CorsPolicy {
    /// Parse a comma-separated origin list
    ///
    /// `*` anywhere in the list allows any origin. Blank entries are dropped,
    /// so an empty list allows none.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToString::to_string)
            .collect();

        if origins.iter().any(|origin| origin == "*") {
            Self::AnyOrigin
        } else {
            Self::AllowList(origins)
        }
    }

    /// Build the tower-http layer for this policy
    #[must_use]
    pub fn layer(&self) -> CorsLayer {
        let origin = match self {
            Self::AnyOrigin => AllowOrigin::any(),
            Self::AllowList(origins) => {
                let values: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|origin| match HeaderValue::from_str(origin) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            tracing::warn!(%origin, "ignoring unparsable CORS origin");
                            None
                        }
                    })
                    .collect();
                AllowOrigin::list(values)
            }
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    }
}

/// Process-wide settings, read once at start-up
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub auth: AuthGuard,
    pub cors: CorsPolicy,
    pub bind_addr: SocketAddr,
    pub project_root: ProjectRoot,
}

impl ServerConfig {
    /// Build from parsed flags
    ///
    /// # Errors
    /// Fails only when no project root is given and the working directory
    /// cannot be read.
    pub fn from_cli(cli: Cli) -> io::Result<Self> {
        let project_root = match cli.project_root {
            Some(path) => ProjectRoot::new(path),
            None => ProjectRoot::current_dir()?,
        };

        Ok(Self {
            auth: AuthGuard::new(&cli.api_key),
            cors: CorsPolicy::parse(&cli.cors_origins),
            bind_addr: cli.bind,
            project_root,
        })
    }

    /// Open configuration rooted at `root`, for tests and embedding
    #[must_use]
    pub fn for_root(root: ProjectRoot) -> Self {
        Self {
            auth: AuthGuard::disabled(),
            cors: CorsPolicy::AnyOrigin,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            project_root: root,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.auth = AuthGuard::new(key);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }
}
