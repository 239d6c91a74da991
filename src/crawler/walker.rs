//! Menu walker
//!
//! Crawls a single gopher menu: opens it, parses every line, hands items to
//! the registered item actions and reports references to other menus as
//! findings.

use crate::crawler::ResourceOpener;
use crate::gopher::{parse_gopher_bytes, CrawlFinding, Resource, MENU_TERMINATOR};
use crate::{GopherError, Result};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::mpsc;

/// Longest menu line accepted, line ending excluded
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Action invoked for every menu item that references a resource
pub type ItemAction = Arc<dyn Fn(&Resource) + Send + Sync>;

/// Crawls the gopher menu `resource` and reports its findings on `findings`
///
/// # Behavior
///
/// 1. Fails with `GopherError::NotDirectory` before opening anything if the
///    resource is not a menu
/// 2. Reads the menu line by line until a line consisting of a single `.`
///    or the end of the stream. Lines are parsed from their raw bytes
/// 3. Calls every action in `actions`, in order, for each item that is
///    neither informational text nor an error message
/// 4. Sends a finding for each directory item, with this resource's host as
///    the parent
///
/// Sending a finding waits until the receiver has room, so a slow consumer
/// throttles the crawl.
///
/// # Errors
///
/// A malformed line, a line longer than `MAX_LINE_LENGTH`, an open or read
/// failure, or a closed findings channel abort the crawl. Findings already
/// sent stay valid.
pub async fn crawl_resource<O: ResourceOpener>(
    opener: &O,
    resource: &Resource,
    findings: &mpsc::Sender<CrawlFinding>,
    actions: &[ItemAction],
) -> Result<()> {
    if !resource.is_directory() {
        return Err(GopherError::NotDirectory(resource.to_string()));
    }

    let stream = opener.open(resource).await?;
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let limit = (MAX_LINE_LENGTH + 2) as u64;
        if (&mut reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = trim_line_ending(&buf);
        if line.len() > MAX_LINE_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("menu line longer than {} bytes", MAX_LINE_LENGTH),
            )
            .into());
        }

        if line == MENU_TERMINATOR.as_bytes() {
            break;
        }

        let item = parse_gopher_bytes(line)?;

        if item.item_type.is_reference() {
            for action in actions {
                action(&item);
            }
        }

        if item.is_directory() {
            let finding = CrawlFinding::new(item, resource.host.clone());
            findings
                .send(finding)
                .await
                .map_err(|_| GopherError::FindingsClosed)?;
        }
    }

    Ok(())
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
