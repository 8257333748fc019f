//! Candidate keys for hierarchical longest-match lookups.
//!
//! Both iterators yield the most specific key first.

/// Iterator over a domain and its dot-prefixed parent suffixes.
///
/// `mail.example.com` yields `mail.example.com`, `.example.com`, `.com`.
#[derive(Debug, Clone)]
pub struct DomainSuffixes<'a> {
    domain: &'a str,
    pos: Option<usize>,
}

impl<'a> DomainSuffixes<'a> {
    /// Start from the full domain
    pub fn new(domain: &'a str) -> Self {
        Self {
            domain,
            pos: Some(0),
        }
    }
}

impl<'a> Iterator for DomainSuffixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.pos?;
        self.pos = self
            .domain
            .get(start + 1..)
            .and_then(|rest| rest.find('.'))
            .map(|i| start + 1 + i);
        Some(&self.domain[start..])
    }
}

/// Separator used to split a client address into network prefixes.
///
/// `.` wins over `:` so IPv4-mapped IPv6 addresses split on dots.
pub fn address_separator(ip: &str) -> Option<char> {
    if ip.contains('.') {
        Some('.')
    } else if ip.contains(':') {
        Some(':')
    } else {
        None
    }
}

/// Iterator over an address and its successively shorter prefixes.
///
/// `10.0.0.1` yields `10.0.0.1`, `10.0.0`, `10.0`, `10`.
#[derive(Debug, Clone)]
pub struct AddressPrefixes<'a> {
    rest: Option<&'a str>,
    sep: char,
}

impl<'a> AddressPrefixes<'a> {
    /// Start from the full address, splitting on `sep`
    pub fn new(ip: &'a str, sep: char) -> Self {
        Self {
            rest: Some(ip),
            sep,
        }
    }
}

impl<'a> Iterator for AddressPrefixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.rest.take()?;
        if current.is_empty() {
            return None;
        }
        self.rest = current.rfind(self.sep).map(|i| &current[..i]);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_suffixes() {
        let keys: Vec<_> = DomainSuffixes::new("mail.example.com").collect();
        assert_eq!(keys, vec!["mail.example.com", ".example.com", ".com"]);
    }

    #[test]
    fn test_domain_suffixes_single_label() {
        let keys: Vec<_> = DomainSuffixes::new("localhost").collect();
        assert_eq!(keys, vec!["localhost"]);
    }

    #[test]
    fn test_domain_suffixes_empty_labels() {
        let keys: Vec<_> = DomainSuffixes::new("a..b").collect();
        assert_eq!(keys, vec!["a..b", "..b", ".b"]);

        let keys: Vec<_> = DomainSuffixes::new("example.com.").collect();
        assert_eq!(keys, vec!["example.com.", ".com.", "."]);
    }

    #[test]
    fn test_domain_suffixes_empty() {
        let keys: Vec<_> = DomainSuffixes::new("").collect();
        assert_eq!(keys, vec![""]);
    }

    #[test]
    fn test_address_separator() {
        assert_eq!(address_separator("10.0.0.1"), Some('.'));
        assert_eq!(address_separator("2001:db8::1"), Some(':'));
        assert_eq!(address_separator("::ffff:192.0.2.1"), Some('.'));
        assert_eq!(address_separator("localhost"), None);
        assert_eq!(address_separator(""), None);
    }

    #[test]
    fn test_ipv4_prefixes() {
        let keys: Vec<_> = AddressPrefixes::new("10.0.0.1", '.').collect();
        assert_eq!(keys, vec!["10.0.0.1", "10.0.0", "10.0", "10"]);
    }

    #[test]
    fn test_ipv6_prefixes() {
        let keys: Vec<_> = AddressPrefixes::new("2001:db8::1", ':').collect();
        assert_eq!(keys, vec!["2001:db8::1", "2001:db8:", "2001:db8", "2001"]);
    }

    #[test]
    fn test_prefixes_stop_at_empty_candidate() {
        let keys: Vec<_> = AddressPrefixes::new(".1", '.').collect();
        assert_eq!(keys, vec![".1"]);
    }
}
