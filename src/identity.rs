//! Host identity module.
//!
//! Resolves `me`, `defaultdomain` and `dsnfrom` once per process.

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::{Config, DEFAULT_DOMAIN_FILE, DSN_FROM_FILE, LOCAL_LOWERCASE_FILE, ME_FILE};

/// Source of the machine's host name, used when no `me` file is configured.
pub trait HostnameSource: Send + Sync {
    /// Get the host name
    fn hostname(&self) -> String;
}

/// Host name reported by the operating system.
pub struct SystemHostname;

impl SystemHostname {
    /// Create a system host name source
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemHostname {
    fn default() -> Self {
        Self::new()
    }
}

impl HostnameSource for SystemHostname {
    fn hostname(&self) -> String {
        gethostname::gethostname().to_string_lossy().into_owned()
    }
}

/// Fixed host name.
#[derive(Debug, Clone)]
pub struct StaticHostname(String);

impl StaticHostname {
    /// Create a fixed host name source
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl HostnameSource for StaticHostname {
    fn hostname(&self) -> String {
        self.0.clone()
    }
}

/// Process-scoped identity of this mail server.
///
/// Each value is resolved on first access and never changes afterwards,
/// even if the underlying files do.
pub struct Identity {
    config: Config,
    hostname: Box<dyn HostnameSource>,
    me: OnceCell<String>,
    default_domain: OnceCell<String>,
    dsn_from: OnceCell<String>,
}

impl Identity {
    /// Create an identity that falls back to the system host name.
    pub fn new(config: Config) -> Self {
        Self::with_hostname_source(config, SystemHostname)
    }

    /// Create an identity with an explicit host name fallback.
    pub fn with_hostname_source(config: Config, hostname: impl HostnameSource + 'static) -> Self {
        Self {
            config,
            hostname: Box::new(hostname),
            me: OnceCell::new(),
            default_domain: OnceCell::new(),
            dsn_from: OnceCell::new(),
        }
    }

    /// Get the directory layout this identity reads from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Canonical name of this host: the `me` file, else the host name.
    pub fn me(&self) -> &str {
        self.me.get_or_init(|| {
            self.config.read_value(ME_FILE).unwrap_or_else(|| {
                let name = self.hostname.hostname();
                debug!(hostname = %name, "no me file configured, using host name");
                name
            })
        })
    }

    /// Domain for unqualified addresses: the `defaultdomain` file, else [`Identity::me`].
    pub fn default_domain(&self) -> &str {
        self.default_domain.get_or_init(|| {
            self.config
                .read_value(DEFAULT_DOMAIN_FILE)
                .unwrap_or_else(|| self.me().to_string())
        })
    }

    /// Sender of delivery status notifications.
    pub fn dsn_from(&self) -> &str {
        self.dsn_from.get_or_init(|| {
            self.config
                .read_value(DSN_FROM_FILE)
                .unwrap_or_else(|| default_dsn_from(self.me()))
        })
    }

    /// Whether local parts are folded to lowercase. Not cached.
    pub fn local_lowercase(&self) -> bool {
        self.config.flag_set(LOCAL_LOWERCASE_FILE)
    }
}

fn default_dsn_from(me: &str) -> String {
    format!("\"Courier mail server at {}\" <@>", me)
}
