//! core::naming
//!
//! Fabric resource naming rules.
//!
//! # Features
//!
//! - Generate fabric node names for orchestrator-created networks
//! - Generate display names safe to embed in the device's XML requests
//! - Generate CLI-compatible router names
//!
//! Orchestrator-created resources carry a configured prefix plus the
//! resource id so they can be distinguished from user-created resources
//! on the fabric.

use crate::core::types::NetworkId;

/// Escape XML control characters.
///
/// Escapes `&`, `<`, `>` and additionally `'` and `"` so the result is
/// safe inside both element content and attribute values.
///
/// # Example
///
/// ```
/// use fabricwork::core::naming::xml_escape;
///
/// assert_eq!(xml_escape("a<b"), "a&lt;b");
/// assert_eq!(xml_escape(r#"say "hi""#), "say &quot;hi&quot;");
/// ```
pub fn xml_escape(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Generate the fabric node name for a network.
///
/// `prefix + network_id`, unique per network. This serves as the node id
/// of the network on the fabric.
///
/// # Example
///
/// ```
/// use fabricwork::core::naming::node_name;
/// use fabricwork::core::types::NetworkId;
///
/// let network = NetworkId::new("net-A").unwrap();
/// assert_eq!(node_name("os_", &network), "os_net-A");
/// ```
pub fn node_name(prefix: &str, network: &NetworkId) -> String {
    format!("{}{}", prefix, network)
}

/// Generate the display name for a network.
///
/// `prefix + network_id + '.' + name`, with XML control characters in the
/// human-readable name escaped so the result is valid inside a device XML
/// request.
///
/// # Example
///
/// ```
/// use fabricwork::core::naming::display_name;
/// use fabricwork::core::types::NetworkId;
///
/// let network = NetworkId::new("net-A").unwrap();
/// assert_eq!(display_name("os_", &network, "blue & green"), "os_net-A.blue &amp; green");
/// ```
pub fn display_name(prefix: &str, network: &NetworkId, name: &str) -> String {
    format!("{}{}.{}", prefix, network, xml_escape(name))
}

/// Generate the fabric name for a router.
///
/// `prefix + router_id + '.' + name`, with spaces replaced by underscores
/// for CLI compatibility.
///
/// # Example
///
/// ```
/// use fabricwork::core::naming::router_name;
///
/// assert_eq!(router_name("os_", "r1", "edge router"), "os_r1.edge_router");
/// ```
pub fn router_name(prefix: &str, router_id: &str, name: &str) -> String {
    format!("{}{}.{}", prefix, router_id, name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn network(id: &str) -> NetworkId {
        NetworkId::new(id).unwrap()
    }

    #[test]
    fn xml_escape_basic() {
        assert_eq!(xml_escape("plain"), "plain");
        assert_eq!(xml_escape("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(xml_escape("it's"), "it&apos;s");
    }

    #[test]
    fn xml_escape_empty() {
        assert_eq!(xml_escape(""), "");
    }

    #[test]
    fn node_name_concatenates() {
        assert_eq!(node_name("os_", &network("abc")), "os_abc");
        assert_eq!(node_name("", &network("abc")), "abc");
    }

    #[test]
    fn display_name_escapes_only_the_name_part() {
        let n = display_name("os_", &network("net-A"), "a<b>'c'");
        assert_eq!(n, "os_net-A.a&lt;b&gt;&apos;c&apos;");
    }

    #[test]
    fn router_name_replaces_spaces() {
        assert_eq!(router_name("os_", "r1", "my main router"), "os_r1.my_main_router");
        assert_eq!(router_name("os_", "r1", "nospace"), "os_r1.nospace");
    }

    proptest! {
        #[test]
        fn escaped_output_has_no_raw_control_chars(s in ".*") {
            let escaped = xml_escape(&s);
            // '&' only ever appears as the start of an entity we emitted
            let stripped = escaped
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&apos;", "")
                .replace("&quot;", "");
            prop_assert!(!stripped.contains('&'));
            prop_assert!(!stripped.contains('<'));
            prop_assert!(!stripped.contains('>'));
            prop_assert!(!stripped.contains('\''));
            prop_assert!(!stripped.contains('"'));
        }

        #[test]
        fn escaping_preserves_plain_text(s in "[a-zA-Z0-9 .-]*") {
            prop_assert_eq!(xml_escape(&s), s);
        }
    }
}
