//! Environment-driven configuration
//!
//! Values are read once at startup (after `.env` is loaded). Invalid values
//! fall back to their defaults with a warning.

use crate::types::DEFAULT_VOTE_POOL;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_MAX_TEXT_CHARS: usize = 500;

/// Rules that shape a turn
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Votes the judge distributes per turn
    pub vote_pool: u32,
    /// Upper bound on challenge and response length
    pub max_text_chars: usize,
    /// Refuse to finalize while votes are still unallocated
    pub require_all_votes: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            vote_pool: DEFAULT_VOTE_POOL,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            require_all_votes: false,
        }
    }
}

impl GameConfig {
    /// Load from CONCLAVE_VOTE_POOL, CONCLAVE_MAX_TEXT_CHARS and
    /// CONCLAVE_REQUIRE_ALL_VOTES
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let vote_pool = parse_var("CONCLAVE_VOTE_POOL", defaults.vote_pool);
        let vote_pool = if vote_pool == 0 {
            tracing::warn!("CONCLAVE_VOTE_POOL must be at least 1, using {}", DEFAULT_VOTE_POOL);
            DEFAULT_VOTE_POOL
        } else {
            vote_pool
        };

        let config = Self {
            vote_pool,
            max_text_chars: parse_var(
                "CONCLAVE_MAX_TEXT_CHARS",
                defaults.max_text_chars,
            ),
            require_all_votes: std::env::var("CONCLAVE_REQUIRE_ALL_VOTES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.require_all_votes),
        };

        tracing::info!(
            "Game config: pool={} max_chars={} require_all_votes={}",
            config.vote_pool,
            config.max_text_chars,
            config.require_all_votes
        );
        config
    }
}

/// Where the server listens
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    /// Load from CONCLAVE_BIND
    pub fn from_env() -> Self {
        Self {
            bind: parse_var("CONCLAVE_BIND", Self::default().bind),
        }
    }
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}
