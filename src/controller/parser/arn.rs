//! # Resource Names
//!
//! Parses fully-qualified resource names of the form
//! `acs:<service>:<region>:<account-id>:<resource>`.

use crate::constants::ARN_PREFIX;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a resource name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArnError {
    #[error("resource name must start with 'acs:'")]
    MissingPrefix,
    #[error("resource name must have 5 ':'-separated sections")]
    NotEnoughSections,
}

/// A parsed resource name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(ARN_PREFIX).ok_or(ArnError::MissingPrefix)?;
        let mut sections = rest.splitn(4, ':');
        let (Some(service), Some(region), Some(account_id), Some(resource)) = (
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
        ) else {
            return Err(ArnError::NotEnoughSections);
        };

        Ok(Self {
            service: service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: resource.to_string(),
        })
    }
}

/// Whether a name uses the fully-qualified form
#[must_use]
pub fn is_arn(name: &str) -> bool {
    name.starts_with(ARN_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arn() {
        let arn: Arn = "acs:kms:cn-hangzhou:123456789:secret/db/password"
            .parse()
            .unwrap();
        assert_eq!(arn.service, "kms");
        assert_eq!(arn.region, "cn-hangzhou");
        assert_eq!(arn.account_id, "123456789");
        assert_eq!(arn.resource, "secret/db/password");
    }

    #[test]
    fn test_resource_may_contain_colons() {
        let arn: Arn = "acs:kms:cn-beijing:1:secret/a:b".parse().unwrap();
        assert_eq!(arn.resource, "secret/a:b");
    }

    #[test]
    fn test_parse_arn_errors() {
        assert_eq!(
            "arn:kms:x:y:z".parse::<Arn>().unwrap_err(),
            ArnError::MissingPrefix
        );
        assert_eq!(
            "acs:kms:cn-hangzhou".parse::<Arn>().unwrap_err(),
            ArnError::NotEnoughSections
        );
        assert!(is_arn("acs:oos:r:a:p"));
        assert!(!is_arn("plain-secret"));
    }
}
