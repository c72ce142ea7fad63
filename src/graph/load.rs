//! Edge-list loading.
//!
//! The expected format is one edge per line, two whitespace-separated node
//! ids. Blank lines and `#` comments are skipped; anything else that does not
//! parse as exactly two ids is reported with its line number rather than
//! silently dropped, since a truncated graph would corrupt every statistic
//! computed from it.

use super::SocialGraph;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Edge-list parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphLoadError {
    #[error("failed to open graph file '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("i/o error while reading the edge list: {0}")]
    Read(#[from] std::io::Error),

    #[error("line {line}: expected two node ids, got '{content}'")]
    MalformedLine { line: usize, content: String },
}

/// Load a graph from an edge-list file.
pub fn load_edge_list(path: &Path) -> Result<SocialGraph, GraphLoadError> {
    let file = File::open(path).map_err(|source| GraphLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_edge_list(BufReader::new(file))
}

/// Parse an edge list from any buffered reader.
pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<SocialGraph, GraphLoadError> {
    let mut graph = SocialGraph::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let malformed = || GraphLoadError::MalformedLine {
            line: index + 1,
            content: trimmed.to_string(),
        };

        let mut fields = trimmed.split_whitespace();
        let u = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        let v = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        if fields.next().is_some() {
            return Err(malformed());
        }

        graph.add_edge(u, v);
    }

    Ok(graph)
}
