//! Gopher menu line parser
//!
//! A menu line is made of tab-separated fields:
//!
//! ```text
//! <type><description> TAB <selector> TAB <host> TAB <port> [TAB +]
//! ```
//!
//! The optional fifth field marks a gopher+ item.

use super::{Host, ItemType, Resource};
use crate::{GopherError, Result};

/// The line that ends a menu listing
pub const MENU_TERMINATOR: &str = ".";

const TYPE_AND_DESCRIPTION: usize = 0;
const SELECTOR: usize = 1;
const HOSTNAME: usize = 2;
const PORT: usize = 3;
const PLUS: usize = 4;

/// Parses a gopher menu line into the resource it references
///
/// No normalization is applied to the selector.
///
/// # Errors
///
/// Returns `GopherError::Parse` naming the line if it is malformed:
/// - fewer than four or more than five fields
/// - empty host or port, or either containing a space
/// - host containing a slash
/// - a fifth field other than `+`
/// - an empty first field (no item type)
///
/// # Example
///
/// ```
/// use gopher_ripple::gopher::{parse_gopher_line, ItemType};
///
/// let resource = parse_gopher_line("1Root\t/docs\tlocalhost\t70").unwrap();
/// assert_eq!(resource.item_type, ItemType::Directory);
/// assert_eq!(resource.to_string(), "gopher://localhost:70/1/docs");
/// ```
pub fn parse_gopher_line(line: &str) -> Result<Resource> {
    parse_gopher_bytes(line.as_bytes())
}

/// Parses a raw menu line as read from the wire
///
/// The type byte is taken as is and the description may be in any
/// encoding. Selector, host and port must be UTF-8; a line where they are
/// not is rejected like any other malformed line.
pub fn parse_gopher_bytes(line: &[u8]) -> Result<Resource> {
    let fields: Vec<&[u8]> = line.split(|&b| b == b'\t').collect();

    if !is_valid(&fields) {
        return Err(parse_error(line));
    }

    let item_type = ItemType::from_byte(fields[TYPE_AND_DESCRIPTION][0]);

    let selector = field_text(fields[SELECTOR], line)?;
    let hostname = field_text(fields[HOSTNAME], line)?;
    let port = field_text(fields[PORT], line)?;

    Ok(Resource::new(Host::new(hostname, port), item_type, selector))
}

fn field_text<'a>(field: &'a [u8], line: &[u8]) -> Result<&'a str> {
    std::str::from_utf8(field).map_err(|_| parse_error(line))
}

fn parse_error(line: &[u8]) -> GopherError {
    GopherError::Parse {
        line: String::from_utf8_lossy(line).into_owned(),
    }
}

fn is_valid(fields: &[&[u8]]) -> bool {
    if fields.len() < 4 || fields.len() > 5 {
        return false;
    }

    let host = fields[HOSTNAME];
    let port = fields[PORT];

    if host.is_empty() || port.is_empty() {
        return false;
    }

    if host.contains(&b' ') || port.contains(&b' ') {
        return false;
    }

    if host.contains(&b'/') {
        return false;
    }

    if fields.len() == 5 && fields[PLUS] != b"+" {
        return false;
    }

    !fields[TYPE_AND_DESCRIPTION].is_empty()
}
