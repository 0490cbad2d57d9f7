//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (addresses → wallets → providers)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ConfigIssue>>
//! - Asset consistency is checked by the registry while wiring

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// One semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every issue.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        issues.push(ConfigIssue::new("listener.bind_address", "not a socket address"));
    }
    if config.listener.request_timeout_secs == 0 {
        issues.push(ConfigIssue::new("listener.request_timeout_secs", "must be positive"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        issues.push(ConfigIssue::new("observability.metrics_address", "not a socket address"));
    }

    let mut provider_ids = HashSet::new();
    for (i, provider) in config.providers.iter().enumerate() {
        if !provider_ids.insert(provider.id.as_str()) {
            issues.push(ConfigIssue::new(
                format!("providers[{i}].id"),
                format!("duplicate provider {}", provider.id),
            ));
        }

        let mut networks = HashSet::new();
        for (j, pipeline) in provider.networks.iter().enumerate() {
            let field = format!("providers[{i}].networks[{j}]");
            if !networks.insert(pipeline.network.as_str()) {
                issues.push(ConfigIssue::new(
                    format!("{field}.network"),
                    format!("{} configured twice for provider {}", pipeline.network, provider.id),
                ));
            }
            if url::Url::parse(&pipeline.node.rpc_url).is_err() {
                issues.push(ConfigIssue::new(format!("{field}.rpc_url"), "not a URL"));
            }
            if pipeline.node.rpc_timeout_secs == 0 {
                issues.push(ConfigIssue::new(format!("{field}.rpc_timeout_secs"), "must be positive"));
            }
            match (&pipeline.private_key, &pipeline.private_key_env) {
                (None, None) => issues.push(ConfigIssue::new(
                    field.clone(),
                    "one of private_key or private_key_env is required",
                )),
                (Some(_), Some(_)) => issues.push(ConfigIssue::new(
                    field.clone(),
                    "private_key and private_key_env are mutually exclusive",
                )),
                _ => {}
            }
        }
    }

    let mut wallet_ids = HashSet::new();
    for (i, wallet) in config.wallets.iter().enumerate() {
        if !wallet_ids.insert(wallet.id) {
            issues.push(ConfigIssue::new(format!("wallets[{i}].id"), format!("duplicate wallet {}", wallet.id)));
        }
        if !provider_ids.contains(wallet.provider_id.as_str()) {
            issues.push(ConfigIssue::new(
                format!("wallets[{i}].provider_id"),
                format!("unknown provider {}", wallet.provider_id),
            ));
        }
    }

    let mut addresses = HashSet::new();
    for (i, address) in config.addresses.iter().enumerate() {
        if !wallet_ids.contains(&address.wallet_id) {
            issues.push(ConfigIssue::new(
                format!("addresses[{i}].wallet_id"),
                format!("unknown wallet {}", address.wallet_id),
            ));
        }
        if !addresses.insert((address.network.as_str(), address.address.as_str())) {
            issues.push(ConfigIssue::new(
                format!("addresses[{i}].address"),
                format!("{} listed twice on {}", address.address, address.network),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> AppConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_issue() {
        let config = parse(
            r#"
            [listener]
            bind_address = "nowhere"

            [[providers]]
            id = "Local"

            [[providers.networks]]
            network = "TestEth"
            rpc_url = "not a url"

            [[wallets]]
            id = "8a9c7d2e-1f3b-4c5d-9e6f-7a8b9c0d1e2f"
            provider_id = "Fireblocks"

            [[addresses]]
            address = "0xA"
            network = "TestEth"
            wallet_id = "00000000-0000-0000-0000-000000000001"
            "#,
        );

        let issues = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "providers[0].networks[0].rpc_url",
                "providers[0].networks[0]",
                "wallets[0].provider_id",
                "addresses[0].wallet_id",
            ]
        );
        assert_eq!(issues[3].to_string(), "wallets[0].provider_id: unknown provider Fireblocks");
    }

    #[test]
    fn test_duplicate_network_per_provider() {
        let config = parse(
            r#"
            [[providers]]
            id = "Local"

            [[providers.networks]]
            network = "TestEth"
            rpc_url = "http://127.0.0.1:8545"
            private_key = "0x01"

            [[providers.networks]]
            network = "TestEth"
            rpc_url = "http://127.0.0.1:8546"
            private_key = "0x01"
            "#,
        );
        let issues = validate_config(&config).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "providers[0].networks[1].network");
    }
}
