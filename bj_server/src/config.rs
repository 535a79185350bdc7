//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use blackjack_table::{TableConfig, TiePolicy};
use std::net::SocketAddr;

const DEFAULT_PORT: u16 = 6969;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus scrape address; metrics are disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Decks per table shoe
    pub shoe_decks: usize,
    /// Balance a player starts with at each table
    pub starting_balance: i64,
    /// Rules and capacities applied to every table
    pub table: TableConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `decks_override` - Optional shoe size override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unusable value
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        decks_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(bind_override, decks_override, |key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(
        bind_override: Option<SocketAddr>,
        decks_override: Option<usize>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match parse_addr(&lookup, "SERVER_BIND")? {
                Some(bind) => bind,
                None => SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            },
        };

        let metrics_bind = parse_addr(&lookup, "METRICS_BIND")?;

        let tie_policy = match lookup("TIE_POLICY") {
            None => TiePolicy::default(),
            Some(value) => match value.to_lowercase().as_str() {
                "player_wins" => TiePolicy::PlayerWins,
                "push" => TiePolicy::Push,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TIE_POLICY".to_string(),
                        reason: format!("Expected player_wins or push, got {value:?}"),
                    });
                }
            },
        };

        let mut table = TableConfig::default();
        table.rules.tie_policy = tie_policy;
        table.rules.dealer_stands_on =
            parse_env_or(&lookup, "DEALER_STANDS_ON", table.rules.dealer_stands_on);
        table.rules.min_bet = parse_env_or(&lookup, "TABLE_MIN_BET", table.rules.min_bet);
        table.rules.max_bet = parse_env_or(&lookup, "TABLE_MAX_BET", table.rules.max_bet);

        let shoe_decks = decks_override.unwrap_or_else(|| parse_env_or(&lookup, "SHOE_DECKS", 6));

        Ok(ServerConfig {
            bind,
            metrics_bind,
            shoe_decks,
            starting_balance: parse_env_or(&lookup, "STARTING_BALANCE", 1_000),
            table,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shoe_decks == 0 || self.shoe_decks > 8 {
            return Err(ConfigError::Invalid {
                var: "SHOE_DECKS".to_string(),
                reason: "Must be between 1 and 8".to_string(),
            });
        }

        let rules = &self.table.rules;
        if rules.dealer_stands_on == 0 || rules.dealer_stands_on > 21 {
            return Err(ConfigError::Invalid {
                var: "DEALER_STANDS_ON".to_string(),
                reason: "Must be between 1 and 21".to_string(),
            });
        }

        if rules.min_bet == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_MIN_BET".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if rules.max_bet < rules.min_bet {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_BET".to_string(),
                reason: format!("Must be at least the minimum bet ({})", rules.min_bet),
            });
        }

        self.table.validate().map_err(|reason| ConfigError::Invalid {
            var: "TABLE".to_string(),
            reason,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_env_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_addr<F>(lookup: &F, key: &str) -> Result<Option<SocketAddr>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("{v:?} is not an IP:PORT address"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(None, None, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "SHOE_DECKS".to_string(),
            reason: "Must be between 1 and 8".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SHOE_DECKS"));
        assert!(msg.contains("between 1 and 8"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:6969".parse().unwrap());
        assert!(config.metrics_bind.is_none());
        assert_eq!(config.shoe_decks, 6);
        assert_eq!(config.starting_balance, 1_000);
        assert_eq!(config.table, TableConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_values() {
        let config = load(&[
            ("SERVER_BIND", "0.0.0.0:8080"),
            ("METRICS_BIND", "127.0.0.1:9090"),
            ("SHOE_DECKS", "2"),
            ("TIE_POLICY", "push"),
            ("DEALER_STANDS_ON", "18"),
            ("TABLE_MIN_BET", "5"),
            ("TABLE_MAX_BET", "500"),
            ("STARTING_BALANCE", "250"),
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.metrics_bind.unwrap().port(), 9090);
        assert_eq!(config.shoe_decks, 2);
        assert_eq!(config.table.rules.tie_policy, TiePolicy::Push);
        assert_eq!(config.table.rules.dealer_stands_on, 18);
        assert_eq!(config.table.rules.min_bet, 5);
        assert_eq!(config.table.rules.max_bet, 500);
        assert_eq!(config.starting_balance, 250);
    }

    #[test]
    fn test_overrides_win() {
        let vars: HashMap<String, String> =
            HashMap::from([("SHOE_DECKS".to_string(), "2".to_string())]);
        let config = ServerConfig::from_lookup(
            Some("10.0.0.1:7000".parse().unwrap()),
            Some(4),
            |key| vars.get(key).cloned(),
        )
        .unwrap();
        assert_eq!(config.bind.port(), 7000);
        assert_eq!(config.shoe_decks, 4);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(matches!(
            load(&[("TIE_POLICY", "dealer")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[("SERVER_BIND", "localhost")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    // === Validation ===

    #[test]
    fn test_validation_deck_count() {
        let config = load(&[("SHOE_DECKS", "0")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SHOE_DECKS"));
    }

    #[test]
    fn test_validation_bet_limits() {
        let config = load(&[("TABLE_MIN_BET", "50"), ("TABLE_MAX_BET", "10")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TABLE_MAX_BET"));
    }

    #[test]
    fn test_validation_stand_threshold() {
        let config = load(&[("DEALER_STANDS_ON", "22")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
