// Public-suffix aware domain decomposition
// Splits a host into subdomain, registrable domain and public suffix

use publicsuffix::{List, Psl};
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::utils::scan_errors::DomainListError;

/// Snapshot of the Mozilla public suffix list shipped with the crate
const BUNDLED_PSL: &str = include_str!("../../data/public_suffix_list.dat");

const PRIVATE_SECTION_MARKER: &str = "// ===BEGIN PRIVATE DOMAINS===";

/// `registrable_domain == <second-level label> + "." + public_suffix` whenever a
/// known suffix was recognised. Hosts without one (IP literals, single-label
/// names, unlisted TLDs) carry the whole host as the registrable domain and an
/// empty suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParts {
    pub registrable_domain: String,
    pub public_suffix: String,
    pub subdomain: String,
}

impl DomainParts {
    fn whole_host(host: &str) -> Self {
        Self {
            registrable_domain: host.to_string(),
            public_suffix: String::new(),
            subdomain: String::new(),
        }
    }

    /// Registrable domain and subdomain together, as inspected by the character rule
    pub fn domain_text(&self) -> String {
        if self.subdomain.is_empty() {
            self.registrable_domain.clone()
        } else {
            format!("{}.{}", self.subdomain, self.registrable_domain)
        }
    }
}

pub struct DomainDecomposer {
    list: List,
}

impl DomainDecomposer {
    /// Build from the bundled list. ICANN suffixes only unless `include_private`.
    pub fn bundled(include_private: bool) -> Result<Self, DomainListError> {
        Self::from_list_text(BUNDLED_PSL, include_private)
    }

    pub fn from_list_text(text: &str, include_private: bool) -> Result<Self, DomainListError> {
        let text = if include_private {
            text
        } else {
            match text.find(PRIVATE_SECTION_MARKER) {
                Some(idx) => &text[..idx],
                None => text,
            }
        };

        let list: List = text
            .parse()
            .map_err(|e| DomainListError::Parse(format!("{:?}", e)))?;

        Ok(Self { list })
    }

    pub fn decompose(&self, url: &Url) -> DomainParts {
        self.decompose_as_typed(url.as_str(), url)
    }

    /// Like `decompose`, but keeps a non-ASCII host as the user typed it.
    /// `Url` stores such hosts punycoded (`xn--...`), which hides the
    /// look-alike characters the heuristics look for.
    pub fn decompose_as_typed(&self, raw: &str, url: &Url) -> DomainParts {
        match url.host() {
            Some(Host::Domain(domain)) => match typed_host(raw) {
                Some(typed) if !typed.is_ascii() => self.decompose_host(typed),
                _ => self.decompose_host(domain),
            },
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
                DomainParts::whole_host(url.host_str().unwrap_or_default())
            },
            None => DomainParts::whole_host(""),
        }
    }

    pub fn decompose_host(&self, host: &str) -> DomainParts {
        let host = host.trim_end_matches('.').to_lowercase();

        let Some(domain) = self.list.domain(host.as_bytes()) else {
            return DomainParts::whole_host(&host);
        };

        let suffix = domain.suffix();
        if !suffix.is_known() {
            return DomainParts::whole_host(&host);
        }

        let registrable = String::from_utf8_lossy(domain.as_bytes()).into_owned();
        let public_suffix = String::from_utf8_lossy(suffix.as_bytes()).into_owned();
        let subdomain = host
            .strip_suffix(registrable.as_str())
            .map(|prefix| prefix.trim_end_matches('.').to_string())
            .unwrap_or_default();

        DomainParts {
            registrable_domain: registrable,
            public_suffix,
            subdomain,
        }
    }
}

/// Host portion of `scheme://[userinfo@]host[:port]/...` exactly as written
fn typed_host(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("://")?;
    let authority = rest
        .split(|c: char| matches!(c, '/' | '?' | '#' | '\\'))
        .next()
        .unwrap_or(rest);
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };

    (!host.is_empty()).then_some(host)
}
