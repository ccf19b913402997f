//! Post-authentication redirect target validation.
//!
//! # Responsibilities
//! - Decide whether a client-supplied redirect target is safe to follow
//! - Substitute the configured fallback for anything that is not
//!
//! # Design Decisions
//! - Total: never errors, a hostile value just becomes the fallback
//! - Checks run in a fixed order and the first failure wins
//! - Unsafe paths match exactly, never by prefix
//! - Hosts match exactly and case-sensitively; subdomains are not implied
//! - Protocol-relative targets (`//host`) are rejected independently of
//!   scheme and host, since they parse without either
//! - Whitespace, control characters and backslashes make a target
//!   unparseable: browsers strip or rewrite them into slashes

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::schema::RedirectConfig;

/// Paths that are never redirect targets (they would loop back into auth).
pub const DEFAULT_UNSAFE_PATHS: [&str; 6] = [
    "/auth",
    "/password-reset",
    "/reset",
    "/register",
    "/sign-in",
    "/sign-out",
];

/// Schemes allowed besides "no scheme".
pub const DEFAULT_SAFE_SCHEMES: [&str; 2] = ["http", "https"];

/// Hosts allowed besides "no host".
pub const DEFAULT_SAFE_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Which check rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unparseable,
    UnsafePath,
    ProtocolRelative,
    Scheme,
    Host,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Unparseable => "unparseable",
            Rejection::UnsafePath => "unsafe_path",
            Rejection::ProtocolRelative => "protocol_relative",
            Rejection::Scheme => "scheme",
            Rejection::Host => "host",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled redirect policy. `None` entries stand for "absent".
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    fallback: String,
    unsafe_paths: HashSet<String>,
    safe_schemes: HashSet<Option<String>>,
    safe_hosts: HashSet<Option<String>>,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::new(&RedirectConfig::default())
    }
}

impl RedirectPolicy {
    /// Union the configured lists with the built-in sets.
    pub fn new(config: &RedirectConfig) -> Self {
        let unsafe_paths = DEFAULT_UNSAFE_PATHS
            .iter()
            .map(|p| p.to_string())
            .chain(config.unsafe_paths.iter().cloned())
            .collect();

        let safe_schemes = std::iter::once(None)
            .chain(DEFAULT_SAFE_SCHEMES.iter().map(|s| Some(s.to_string())))
            .chain(config.safe_schemes.iter().map(|s| Some(s.to_ascii_lowercase())))
            .collect();

        let safe_hosts = std::iter::once(None)
            .chain(DEFAULT_SAFE_HOSTS.iter().map(|h| Some(h.to_string())))
            .chain(config.safe_hosts.iter().map(|h| Some(h.clone())))
            .collect();

        Self {
            fallback: config.fallback.clone(),
            unsafe_paths,
            safe_schemes,
            safe_hosts,
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Run every check in order and report the first failure.
    pub fn check(&self, candidate: &str) -> Result<(), Rejection> {
        let parts = parse(candidate).ok_or(Rejection::Unparseable)?;

        if self.unsafe_paths.contains(parts.path) {
            return Err(Rejection::UnsafePath);
        }

        if candidate.starts_with("//") {
            return Err(Rejection::ProtocolRelative);
        }

        let scheme = parts.scheme.map(|s| s.to_ascii_lowercase());
        if !self.safe_schemes.contains(&scheme) {
            return Err(Rejection::Scheme);
        }

        if !self.safe_hosts.contains(&parts.host) {
            return Err(Rejection::Host);
        }

        Ok(())
    }

    /// The candidate unchanged when it passes, the fallback otherwise.
    pub fn sanitize(&self, candidate: &str) -> String {
        match self.check(candidate) {
            Ok(()) => candidate.to_string(),
            Err(_) => self.fallback.clone(),
        }
    }
}

/// Sanitize `candidate` against a one-off policy built from `config`.
pub fn sanitize(candidate: &str, config: &RedirectConfig) -> String {
    RedirectPolicy::new(config).sanitize(candidate)
}

/// Components of a URI reference relevant to the checks.
#[derive(Debug, PartialEq, Eq)]
struct UriParts<'a> {
    scheme: Option<&'a str>,
    host: Option<String>,
    path: &'a str,
}

/// Generic URI-reference split (RFC 3986, appendix B).
///
/// Scheme-bearing references must also be accepted by the WHATWG parser.
/// When such a reference has no literal authority, the host it resolves to
/// (e.g. `http:evil.com` → `evil.com`) is the one checked.
fn parse(candidate: &str) -> Option<UriParts<'_>> {
    if candidate
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || c == '\\')
    {
        return None;
    }

    let (scheme, rest) = match candidate.find([':', '/', '?', '#']) {
        Some(i) if candidate.as_bytes()[i] == b':' => {
            let scheme = &candidate[..i];
            if !is_valid_scheme(scheme) {
                return None;
            }
            (Some(scheme), &candidate[i + 1..])
        }
        _ => (None, candidate),
    };

    let (authority, rest) = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            (Some(&after[..end]), &after[end..])
        }
        None => (None, rest),
    };

    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    let path = rest.split_once('?').map_or(rest, |(before, _)| before);

    let mut host = authority.map(|a| host_of(a).to_string());

    if scheme.is_some() {
        let url = Url::parse(candidate).ok()?;
        if host.is_none() {
            host = url.host_str().map(str::to_string);
        }
    }

    Some(UriParts { scheme, host, path })
}

// ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// Strip userinfo and port from an authority.
fn host_of(authority: &str) -> &str {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    if host_port.starts_with('[') {
        return host_port
            .find(']')
            .map_or(host_port, |end| &host_port[..=end]);
    }

    host_port
        .split_once(':')
        .map_or(host_port, |(host, _)| host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative() {
        let parts = parse("/a/b?x=1#top").unwrap();
        assert_eq!(parts.scheme, None);
        assert_eq!(parts.host, None);
        assert_eq!(parts.path, "/a/b");

        let parts = parse("?admin=true").unwrap();
        assert_eq!(parts.path, "");
    }

    #[test]
    fn test_parse_absolute() {
        let parts = parse("https://user:pw@Example.com:8443/x?y#z").unwrap();
        assert_eq!(parts.scheme, Some("https"));
        assert_eq!(parts.host.as_deref(), Some("Example.com"));
        assert_eq!(parts.path, "/x");

        let parts = parse("http://[::1]:4000/").unwrap();
        assert_eq!(parts.host.as_deref(), Some("[::1]"));
    }

    #[test]
    fn test_parse_empty_authority_is_empty_host() {
        let parts = parse("///danger").unwrap();
        assert_eq!(parts.host.as_deref(), Some(""));
        assert_eq!(parts.path, "/danger");
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse(" //evil.com"), None);
        assert_eq!(parse("/\\evil.com"), None);
        assert_eq!(parse("/x\n"), None);
        assert_eq!(parse(":nope"), None);
        assert_eq!(parse("1http://x"), None);
        assert_eq!(parse("http://exa mple.com"), None);
    }

    #[test]
    fn test_scheme_without_authority_uses_resolved_host() {
        let parts = parse("http:evil.com").unwrap();
        assert_eq!(parts.host.as_deref(), Some("evil.com"));

        let policy = RedirectPolicy::default();
        assert_eq!(policy.check("http:/evil.com"), Err(Rejection::Host));
    }

    #[test]
    fn test_check_order() {
        let policy = RedirectPolicy::default();
        assert_eq!(policy.check("//sign-in"), Err(Rejection::ProtocolRelative));
        assert_eq!(policy.check("https://evil.com/sign-in"), Err(Rejection::UnsafePath));
        assert_eq!(policy.check("javascript:alert(1)"), Err(Rejection::Scheme));
        assert_eq!(policy.check("https://evil.com"), Err(Rejection::Host));
        assert_eq!(policy.check("/dashboard"), Ok(()));
    }

    #[test]
    fn test_schemes_are_case_insensitive_hosts_are_not() {
        let policy = RedirectPolicy::default();
        assert_eq!(policy.check("HTTP://localhost/x"), Ok(()));
        assert_eq!(policy.check("http://LOCALHOST/x"), Err(Rejection::Host));
    }

    #[test]
    fn test_extended_lists() {
        let policy = RedirectPolicy::new(&RedirectConfig {
            fallback: "/home".into(),
            unsafe_paths: vec!["/custom".into()],
            safe_schemes: vec!["FTP".into()],
            safe_hosts: vec!["example.com".into()],
        });

        assert_eq!(policy.sanitize("/custom"), "/home");
        assert_eq!(policy.sanitize("/sign-in"), "/home");
        assert_eq!(policy.sanitize("ftp://example.com/f"), "ftp://example.com/f");
        assert_eq!(policy.sanitize("https://sub.example.com"), "/home");
    }
}
