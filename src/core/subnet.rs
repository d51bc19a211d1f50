//! core::subnet
//!
//! CIDR overlap checks.
//!
//! Routed networks on the fabric must not carry overlapping subnets, so a
//! candidate CIDR is checked against the set already present. Two subnets
//! overlap when either contains the other (equal subnets contain each
//! other). Mixed-family pairs never overlap.

use std::net::IpAddr;

use thiserror::Error;

/// Errors from CIDR parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubnetError {
    #[error("invalid cidr: {0}")]
    InvalidCidr(String),
}

/// A parsed, normalized CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cidr {
    V4 { net: u32, prefix: u8 },
    V6 { net: u128, prefix: u8 },
}

impl Cidr {
    fn parse(s: &str) -> Result<Self, SubnetError> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| SubnetError::InvalidCidr(format!("'{}': missing prefix length", s)))?;

        let addr: IpAddr = addr
            .parse()
            .map_err(|_| SubnetError::InvalidCidr(format!("'{}': bad address", s)))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| SubnetError::InvalidCidr(format!("'{}': bad prefix length", s)))?;

        match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return Err(SubnetError::InvalidCidr(format!(
                        "'{}': prefix length exceeds 32",
                        s
                    )));
                }
                let bits = u32::from(v4);
                Ok(Cidr::V4 {
                    net: bits & mask4(prefix),
                    prefix,
                })
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return Err(SubnetError::InvalidCidr(format!(
                        "'{}': prefix length exceeds 128",
                        s
                    )));
                }
                let bits = u128::from(v6);
                Ok(Cidr::V6 {
                    net: bits & mask6(prefix),
                    prefix,
                })
            }
        }
    }

    /// Whether `self` contains `other` (equal blocks contain each other).
    fn contains(&self, other: &Cidr) -> bool {
        match (self, other) {
            (
                Cidr::V4 { net, prefix },
                Cidr::V4 {
                    net: other_net,
                    prefix: other_prefix,
                },
            ) => prefix <= other_prefix && (other_net & mask4(*prefix)) == *net,
            (
                Cidr::V6 { net, prefix },
                Cidr::V6 {
                    net: other_net,
                    prefix: other_prefix,
                },
            ) => prefix <= other_prefix && (other_net & mask6(*prefix)) == *net,
            _ => false,
        }
    }

    fn overlaps(&self, other: &Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }
}

fn mask4(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    }
}

fn mask6(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - prefix)
    }
}

/// Return the members of `existing` that overlap `given`.
///
/// Preserves the order and spelling of the input entries.
///
/// # Errors
///
/// Returns `SubnetError::InvalidCidr` if `given` or any member of
/// `existing` fails to parse.
///
/// # Example
///
/// ```
/// use fabricwork::core::subnet::overlapping_subnets;
///
/// let existing = vec!["10.0.0.0/24".to_string(), "10.1.0.0/24".to_string()];
/// let overlapped = overlapping_subnets("10.0.0.128/25", &existing).unwrap();
/// assert_eq!(overlapped, vec!["10.0.0.0/24"]);
/// ```
pub fn overlapping_subnets(given: &str, existing: &[String]) -> Result<Vec<String>, SubnetError> {
    let given_net = Cidr::parse(given)?;

    let mut overlapped = Vec::new();
    for cidr in existing {
        let existing_net = Cidr::parse(cidr)?;
        if given_net.overlaps(&existing_net) {
            overlapped.push(cidr.clone());
        }
    }
    Ok(overlapped)
}
