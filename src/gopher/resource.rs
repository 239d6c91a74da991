//! Hosts, resources and findings
//!
//! A `Host` is keyed by its lowercase `host:port` form, a `Resource` by its
//! canonical `gopher://` URI. Both keys are used for deduplication, so their
//! string forms must be stable.

use super::ItemType;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Characters left unescaped in the path of a canonical resource URI
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// A gopher server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    pub hostname: String,
    pub port: String,
}

impl Host {
    pub fn new(hostname: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: port.into(),
        }
    }

    /// Returns `host:port` with the original casing, suitable for dialing
    ///
    /// IPv6 literals are wrapped in brackets.
    pub fn dial_address(&self) -> String {
        if self.hostname.contains(':') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }

    /// Returns the canonical key of this host (lowercase `host:port`)
    pub fn key(&self) -> String {
        self.dial_address().to_lowercase()
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A gopher resource identified by host, item type and selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub host: Host,
    pub item_type: ItemType,
    pub selector: String,
}

impl Resource {
    pub fn new(host: Host, item_type: ItemType, selector: impl Into<String>) -> Self {
        Self {
            host,
            item_type,
            selector: selector.into(),
        }
    }

    /// Creates the root menu resource of a server
    pub fn root_directory(host: Host) -> Self {
        Self::new(host, ItemType::Directory, "")
    }

    pub fn is_directory(&self) -> bool {
        self.item_type == ItemType::Directory
    }

    /// Returns the canonical URI used as the job identity of this resource
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Resource {
    /// Formats as `gopher://host:port/<type><selector>`
    ///
    /// A selector of `/` is treated as empty; everything after the authority
    /// is percent-escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector = if self.selector == "/" {
            ""
        } else {
            self.selector.as_str()
        };
        let path = format!("{}{}", self.item_type, selector);
        write!(
            f,
            "gopher://{}/{}",
            self.host,
            utf8_percent_encode(&path, PATH_ENCODE_SET)
        )
    }
}

/// A reference to a resource found while crawling the menu of `parent`
///
/// Only the bootstrap finding has no parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFinding {
    pub resource: Resource,
    pub parent: Option<Host>,
}

impl CrawlFinding {
    pub fn new(resource: Resource, parent: Host) -> Self {
        Self {
            resource,
            parent: Some(parent),
        }
    }

    /// Creates the parentless finding that seeds a crawl
    pub fn bootstrap(resource: Resource) -> Self {
        Self {
            resource,
            parent: None,
        }
    }
}

impl fmt::Display for CrawlFinding {
    /// Formats as a dot edge between the parent and the referenced server
    ///
    /// Selector and item type are dropped; only servers are graphed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "\"{}\" -> \"{}\"", parent, self.resource.host),
            None => write!(f, "\"{}\"", self.resource.host),
        }
    }
}
