//! Dot file generation
//!
//! The grapher writes a `strict digraph` describing which gopher servers
//! reference which. Every server that was crawled is declared as a node
//! with `alive=true`; every server-to-server reference becomes an edge.
//! Nodes and edges are each written at most once.

use crate::gopher::CrawlFinding;
use crate::{GopherError, Result};
use std::collections::HashSet;
use std::io::Write;

const HEADER: &str = "strict digraph {\n";
const FOOTER: &str = "}\n";

/// Writes server relations as a graphviz dot description
#[derive(Debug)]
pub struct Grapher<W: Write> {
    writer: W,
    alive: HashSet<String>,
    graphed: HashSet<String>,
}

impl<W: Write> Grapher<W> {
    /// Creates a grapher and writes the graph header to `writer`
    pub fn new(mut writer: W) -> Result<Self> {
        writer
            .write_all(HEADER.as_bytes())
            .map_err(GopherError::GraphWrite)?;

        Ok(Self {
            writer,
            alive: HashSet::new(),
            graphed: HashSet::new(),
        })
    }

    /// Graphs the server relation described by `finding`
    ///
    /// The parent server is declared alive the first time it shows up. The
    /// edge is written only if the same edge has not been written before.
    /// Findings without a parent are ignored.
    pub fn graph_finding(&mut self, finding: &CrawlFinding) -> Result<()> {
        let Some(parent) = &finding.parent else {
            return Ok(());
        };

        let parent = parent.key();
        if !self.alive.contains(&parent) {
            writeln!(self.writer, "\t\"{}\"[alive=true]", parent)
                .map_err(GopherError::GraphWrite)?;
            self.alive.insert(parent);
        }

        let edge = finding.to_string();
        if !self.graphed.contains(&edge) {
            writeln!(self.writer, "\t{}", edge).map_err(GopherError::GraphWrite)?;
            self.graphed.insert(edge);
        }

        Ok(())
    }

    /// Number of servers declared alive so far
    pub fn node_count(&self) -> usize {
        self.alive.len()
    }

    /// Number of distinct edges written so far
    pub fn edge_count(&self) -> usize {
        self.graphed.len()
    }

    /// Writes the graph footer and flushes the writer
    ///
    /// Returns the writer; dropping it releases the underlying sink.
    pub fn close(mut self) -> Result<W> {
        self.writer
            .write_all(FOOTER.as_bytes())
            .map_err(GopherError::GraphWrite)?;
        self.writer.flush().map_err(GopherError::GraphWrite)?;
        Ok(self.writer)
    }
}
