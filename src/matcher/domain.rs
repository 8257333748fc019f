use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::hierarchy::DomainSuffixes;
use crate::config::{HOSTED_DOMAINS_DB, LOCALS_FILE};
use crate::error::Result;
use crate::identity::Identity;
use crate::store::StoreLoader;

/// A single line of the local domains file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalDomainRule {
    /// `!domain`: this exact domain is not local
    Negated(String),
    /// `.domain`: any domain ending in this string is local
    Suffix(String),
    /// `domain`: this exact domain is local
    Literal(String),
}

impl LocalDomainRule {
    /// Classify a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        if let Some(domain) = line.strip_prefix('!') {
            Some(LocalDomainRule::Negated(domain.to_string()))
        } else if line.starts_with('.') {
            Some(LocalDomainRule::Suffix(line.to_string()))
        } else {
            Some(LocalDomainRule::Literal(line.to_string()))
        }
    }

    /// `Some(verdict)` if this rule decides the domain, `None` to keep scanning.
    ///
    /// Suffix rules are a raw string-suffix test, not label-aware.
    pub fn decide(&self, domain: &str) -> Option<bool> {
        match self {
            LocalDomainRule::Negated(d) if d == domain => Some(false),
            LocalDomainRule::Suffix(s) if domain.ends_with(s.as_str()) => Some(true),
            LocalDomainRule::Literal(d) if d == domain => Some(true),
            _ => None,
        }
    }
}

/// Ordered local domain rules. The first rule that decides a domain wins.
#[derive(Debug, Clone, Default)]
pub struct LocalDomainRules {
    rules: Vec<LocalDomainRule>,
}

impl LocalDomainRules {
    /// Parse rules from the text of a local domains file
    pub fn parse(text: &str) -> Self {
        Self {
            rules: text.lines().filter_map(LocalDomainRule::parse).collect(),
        }
    }

    /// Read rules from a file. Bytes that are not UTF-8 are replaced, not rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Get the rules in file order
    pub fn rules(&self) -> &[LocalDomainRule] {
        &self.rules
    }

    /// Apply the rules in order. No deciding rule means not local.
    pub fn is_local(&self, domain: &str) -> bool {
        self.rules
            .iter()
            .find_map(|rule| rule.decide(domain))
            .unwrap_or(false)
    }
}

/// Decides whether domains are local or hosted by this server
pub struct DomainMatcher {
    identity: Arc<Identity>,
    stores: Arc<dyn StoreLoader>,
}

impl DomainMatcher {
    /// Create a matcher reading `locals` and the hosted domains store
    pub fn new(identity: Arc<Identity>, stores: Arc<dyn StoreLoader>) -> Self {
        Self { identity, stores }
    }

    /// Check the `locals` file. Without one, only [`Identity::me`] is local.
    ///
    /// The file is read on every call.
    pub fn is_local(&self, domain: &str) -> bool {
        let path = self.identity.config().path(LOCALS_FILE);
        match LocalDomainRules::load(&path) {
            Ok(rules) => rules.is_local(domain),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no local domains file");
                domain == self.identity.me()
            }
        }
    }

    /// Check the hosted domains store for the domain or any parent suffix.
    pub fn is_hosted_domain(&self, domain: &str) -> bool {
        let store = match self.stores.open(HOSTED_DOMAINS_DB) {
            Ok(store) => store,
            Err(e) => {
                debug!(error = %e, "hosted domains unavailable");
                return false;
            }
        };
        DomainSuffixes::new(domain).any(|key| store.exists(key))
    }
}
