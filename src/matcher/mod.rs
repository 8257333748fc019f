mod domain;
mod hierarchy;

pub use domain::{DomainMatcher, LocalDomainRule, LocalDomainRules};
pub use hierarchy::{address_separator, AddressPrefixes, DomainSuffixes};
