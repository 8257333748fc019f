//! MTA Policy - read-only configuration and access-policy lookups for a mail server
//!
//! This library answers the questions an SMTP process asks about its
//! configuration:
//! - Identity: the canonical host name (`me`), default domain and DSN sender
//! - Local domains: ordered literal, suffix and negated rules
//! - Hosted domains: domain-suffix lookup in a keyed store
//! - Aliases: expansion of local addresses
//! - SMTP access: longest-prefix match on the client address, with
//!   `RELAYCLIENT` and `BLOCK` settings
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mta_policy::{Config, MailConfig, MemoryStore, MemoryStoreLoader, StaticHostname};
//!
//! let stores = MemoryStoreLoader::new().with_store(
//!     "smtpaccess.dat",
//!     MemoryStore::new()
//!         .with_entry("10.0", "BLOCK=no mail from this network")
//!         .with_entry("10.0.0.1", "RELAYCLIENT,BLOCK="),
//! );
//!
//! let mail = MailConfig::with_parts(
//!     Config::new().with_sysconf_dir("/nonexistent"),
//!     StaticHostname::new("mail.example.com"),
//!     Arc::new(stores),
//! );
//!
//! assert_eq!(mail.identity().me(), "mail.example.com");
//! assert!(mail.access().is_relay_allowed("10.0.0.1"));
//! assert!(mail.access().is_block_whitelisted("10.0.0.1"));
//! assert_eq!(
//!     mail.access().block_reason("10.0.0.2").as_deref(),
//!     Some("no mail from this network")
//! );
//! ```
//!
//! # Files
//!
//! All files live in the configuration directory (default `/etc/courier`).
//!
//! | File | Kind | Contents |
//! |------|------|----------|
//! | `me`, `defaultdomain`, `dsnfrom` | text | first line is the value |
//! | `locallowercase` | flag | presence only |
//! | `locals` | text | one rule per line: `domain`, `.suffix`, `!domain`, `# comment` |
//! | `hosteddomains.dat` | store | keys are domains or `.suffix` |
//! | `aliases.dat` | store | address to newline-joined destinations |
//! | `smtpaccess.dat` | store | address prefix to `FLAG,KEY=VALUE` tokens |

pub mod access;
pub mod alias;
pub mod config;
pub mod error;
pub mod identity;
pub mod matcher;
pub mod store;

use std::sync::Arc;

pub use access::{AccessPolicyResolver, AccessRecord, BLOCK, RELAY_CLIENT};
pub use alias::AliasResolver;
pub use config::{
    read_first_line, Config, DEFAULT_PREFIX_DIR, DEFAULT_SPOOL_DIR, DEFAULT_SYSCONF_DIR,
};
pub use error::{PolicyError, Result};
pub use identity::{HostnameSource, Identity, StaticHostname, SystemHostname};
pub use matcher::{DomainMatcher, LocalDomainRule, LocalDomainRules};
pub use store::{
    FileStore, FileStoreLoader, KeyStore, MemoryStore, MemoryStoreLoader, NilStoreLoader,
    StoreLoader,
};

/// All resolvers for one configuration directory, sharing one [`Identity`].
pub struct MailConfig {
    identity: Arc<Identity>,
    domains: Arc<DomainMatcher>,
    aliases: AliasResolver,
    access: AccessPolicyResolver,
}

impl MailConfig {
    /// Read files and stores from the configuration directory.
    pub fn new(config: Config) -> Self {
        let stores = Arc::new(FileStoreLoader::from_config(&config));
        Self::with_parts(config, SystemHostname, stores)
    }

    /// Build from explicit parts: a host name fallback and a store loader.
    pub fn with_parts(
        config: Config,
        hostname: impl HostnameSource + 'static,
        stores: Arc<dyn StoreLoader>,
    ) -> Self {
        let identity = Arc::new(Identity::with_hostname_source(config, hostname));
        let domains = Arc::new(DomainMatcher::new(identity.clone(), stores.clone()));
        let aliases = AliasResolver::new(identity.clone(), domains.clone(), stores.clone());
        let access = AccessPolicyResolver::new(stores);

        Self {
            identity,
            domains,
            aliases,
            access,
        }
    }

    /// Get the shared host identity
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Get the local and hosted domain matcher
    pub fn domains(&self) -> &DomainMatcher {
        &self.domains
    }

    /// Get the alias resolver
    pub fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    /// Get the SMTP access policy resolver
    pub fn access(&self) -> &AccessPolicyResolver {
        &self.access
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_workflow() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("locals"), "# local\nexample.com\n.example.com\n").unwrap();

        let stores = MemoryStoreLoader::new()
            .with_store(
                "aliases.dat",
                MemoryStore::new().with_entry("postmaster@mail.example.com", "root\n"),
            )
            .with_store(
                "hosteddomains.dat",
                MemoryStore::new().with_entry(".hosted.net", ""),
            )
            .with_store(
                "smtpaccess.dat",
                MemoryStore::new()
                    .with_entry("127.0.0.1", "RELAYCLIENT")
                    .with_entry("198.51.100", "BLOCK=listed"),
            );

        let mail = MailConfig::with_parts(
            Config::new().with_sysconf_dir(dir.path()),
            StaticHostname::new("mail.example.com"),
            Arc::new(stores),
        );

        // Identity
        assert_eq!(mail.identity().me(), "mail.example.com");
        assert_eq!(mail.identity().default_domain(), "mail.example.com");

        // Domains
        assert!(mail.domains().is_local("example.com"));
        assert!(mail.domains().is_local("www.example.com"));
        assert!(!mail.domains().is_local("example.org"));
        assert!(mail.domains().is_hosted_domain("mx.hosted.net"));

        // Aliases: local domain canonicalized to me
        assert_eq!(
            mail.aliases().get_alias("postmaster@example.com"),
            Some(vec!["root".to_string()])
        );
        assert_eq!(
            mail.aliases().get_alias("postmaster"),
            Some(vec!["root".to_string()])
        );

        // Access
        assert!(mail.access().is_relay_allowed("127.0.0.1"));
        assert!(!mail.access().is_relay_allowed("127.0.0.2"));
        assert_eq!(
            mail.access().block_reason("198.51.100.7"),
            Some("listed".to_string())
        );
    }
}
