//! Configuration directory layout.
//!
//! Single-value files are plain text where only the first line matters.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Default system configuration directory
pub const DEFAULT_SYSCONF_DIR: &str = "/etc/courier";
/// Default installation prefix
pub const DEFAULT_PREFIX_DIR: &str = "/usr/lib/courier";
/// Default mail queue directory
pub const DEFAULT_SPOOL_DIR: &str = "/var/spool/courier";

/// Message submission program, relative to the installation prefix
pub const SUBMIT_PROGRAM: &str = "libexec/courier/submit";

/// Canonical host name
pub const ME_FILE: &str = "me";
/// Default domain appended to unqualified addresses
pub const DEFAULT_DOMAIN_FILE: &str = "defaultdomain";
/// Sender used on delivery status notifications
pub const DSN_FROM_FILE: &str = "dsnfrom";
/// Local domain rules
pub const LOCALS_FILE: &str = "locals";
/// Flag file: local parts are folded to lowercase
pub const LOCAL_LOWERCASE_FILE: &str = "locallowercase";
/// Hosted domains store
pub const HOSTED_DOMAINS_DB: &str = "hosteddomains.dat";
/// Alias store
pub const ALIASES_DB: &str = "aliases.dat";
/// SMTP access store
pub const SMTP_ACCESS_DB: &str = "smtpaccess.dat";

/// Mail server directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    sysconf_dir: PathBuf,
    prefix_dir: PathBuf,
    spool_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysconf_dir: PathBuf::from(DEFAULT_SYSCONF_DIR),
            prefix_dir: PathBuf::from(DEFAULT_PREFIX_DIR),
            spool_dir: PathBuf::from(DEFAULT_SPOOL_DIR),
        }
    }
}

impl Config {
    /// Create a config pointing at the default directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration directory.
    pub fn with_sysconf_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.sysconf_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the installation prefix.
    pub fn with_prefix_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.prefix_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the mail queue directory.
    pub fn with_spool_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.spool_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Get the configuration directory
    pub fn sysconf_dir(&self) -> &Path {
        &self.sysconf_dir
    }

    /// Get the installation prefix
    pub fn prefix_dir(&self) -> &Path {
        &self.prefix_dir
    }

    /// Get the mail queue directory
    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Path of the message submission program under the prefix.
    pub fn submit_path(&self) -> PathBuf {
        self.prefix_dir.join(SUBMIT_PROGRAM)
    }

    /// Full path of a file inside the configuration directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.sysconf_dir.join(name)
    }

    /// Read the first line of a single-value file.
    pub fn read_value(&self, name: &str) -> Option<String> {
        read_first_line(self.path(name))
    }

    /// Check whether a flag file exists.
    pub fn flag_set(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}

/// Read the first line of a file, trimmed.
///
/// Returns `None` if the file cannot be opened or the line is empty.
pub fn read_first_line(path: impl AsRef<Path>) -> Option<String> {
    let file = File::open(path.as_ref()).ok()?;
    let mut line = Vec::new();
    BufReader::new(file).read_until(b'\n', &mut line).ok()?;
    let line = String::from_utf8_lossy(&line);
    let line = line.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_default_dir() {
        let config = Config::new();
        assert_eq!(config.sysconf_dir(), Path::new("/etc/courier"));
        assert_eq!(config.path(ME_FILE), PathBuf::from("/etc/courier/me"));
        assert_eq!(config.prefix_dir(), Path::new("/usr/lib/courier"));
        assert_eq!(config.spool_dir(), Path::new("/var/spool/courier"));
        assert_eq!(
            config.submit_path(),
            PathBuf::from("/usr/lib/courier/libexec/courier/submit")
        );
    }

    #[test]
    fn test_directory_builders_are_independent() {
        let config = Config::new()
            .with_prefix_dir("/opt/courier")
            .with_spool_dir("/srv/spool");

        assert_eq!(config.sysconf_dir(), Path::new(DEFAULT_SYSCONF_DIR));
        assert_eq!(config.prefix_dir(), Path::new("/opt/courier"));
        assert_eq!(config.spool_dir(), Path::new("/srv/spool"));
        assert_eq!(
            config.submit_path(),
            PathBuf::from("/opt/courier/libexec/courier/submit")
        );
    }

    #[test]
    fn test_read_first_line_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("me"), "  mail.example.com \nignored\n").unwrap();

        let config = Config::new().with_sysconf_dir(dir.path());
        assert_eq!(config.read_value(ME_FILE), Some("mail.example.com".to_string()));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new().with_sysconf_dir(dir.path());
        assert_eq!(config.read_value(DSN_FROM_FILE), None);
        assert!(!config.flag_set(LOCAL_LOWERCASE_FILE));
    }

    #[test]
    fn test_empty_first_line_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("defaultdomain"), "\nexample.com\n").unwrap();
        assert_eq!(read_first_line(dir.path().join("defaultdomain")), None);
    }

    #[test]
    fn test_non_utf8_first_line_is_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dsnfrom"), b"\"Jos\xe9\" <postmaster@example.com>\n").unwrap();
        assert_eq!(
            read_first_line(dir.path().join("dsnfrom")),
            Some("\"Jos\u{fffd}\" <postmaster@example.com>".to_string())
        );
    }

    #[test]
    fn test_flag_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCAL_LOWERCASE_FILE), "").unwrap();
        let config = Config::new().with_sysconf_dir(dir.path());
        assert!(config.flag_set(LOCAL_LOWERCASE_FILE));
    }
}
