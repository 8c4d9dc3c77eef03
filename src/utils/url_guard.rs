//! URL safety checks applied before any outbound fetch
//!
//! Rejects non-HTTP schemes and targets inside loopback, private, or
//! link-local address space. Malformed URLs are treated as unsafe (fail
//! closed). Checks are performed on the URL text only; no DNS resolution.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Check that a URL is safe to fetch
///
/// Accepts only `http`/`https` schemes and rejects hosts that resolve
/// textually to loopback, unspecified, private, or link-local addresses.
/// Private ranges are matched by CIDR containment on parsed IP literals,
/// so `http://172.awkward.example` is allowed while `http://172.16.0.1`
/// is not.
#[must_use]
pub fn validate_url(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => !domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => !is_blocked_v4(ip),
        Some(Host::Ipv6(ip)) => !is_blocked_v6(ip),
        // http(s) URLs without a host don't parse, but fail closed anyway
        None => false,
    }
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    // 127.0.0.0/8, 0.0.0.0, 10/8, 172.16/12, 192.168/16, 169.254/16
    ip.is_loopback() || ip.is_unspecified() || ip.is_private() || ip.is_link_local()
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    // ::1, ::, fc00::/7 (unique local), fe80::/10 (link local)
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}
