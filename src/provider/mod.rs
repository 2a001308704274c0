//! # Secret Providers
//!
//! A provider answers the secret lookups a template makes. It implements
//! [`SecretResolver`](vault_template_core::SecretResolver) so the renderer can
//! call it without knowing anything about the store behind it.
//!
//! Only HashiCorp Vault is supported, through its HTTP API:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vault_template::provider::{VaultConfig, VaultProvider};
//!
//! let config = VaultConfig::new("https://vault.internal:8200", token)?;
//! let provider = Arc::new(VaultProvider::new(config)?);
//! let output = vault_template_core::render(provider, "pw={{ vault('secret/data/db#password') }}")?;
//! ```

pub mod vault;


pub use vault::{DEFAULT_ADDRESS, DEFAULT_FIELD, DEFAULT_TIMEOUT, VaultConfig, VaultProvider};
