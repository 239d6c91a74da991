//! Gopher protocol module
//!
//! This module provides the resource model and the menu line parser:
//! - Item types (the single-byte tag of a menu entry)
//! - Hosts, resources and their canonical string forms
//! - Crawl findings (a reference from one server to a resource)
//! - Parsing of tab-separated menu lines

mod item_type;
mod parser;
mod resource;

pub use item_type::ItemType;
pub use parser::{parse_gopher_bytes, parse_gopher_line, MENU_TERMINATOR};
pub use resource::{CrawlFinding, Host, Resource};
