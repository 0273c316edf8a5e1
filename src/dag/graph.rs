// src/dag/graph.rs

use std::fmt;
use std::io::BufRead;

use thiserror::Error;

/// Errors produced by [`Graph::from_reader`].
#[derive(Error, Debug)]
pub enum GraphParseError {
    #[error("invalid count on line {line}: {text:?}")]
    BadCount { line: usize, text: String },

    #[error("illegal edge on line {line}: {text:?}")]
    IllegalEdge { line: usize, text: String },

    #[error("edge {from} -> {to} is out of range for {vertices} vertices")]
    OutOfRange {
        from: usize,
        to: usize,
        vertices: usize,
    },

    #[error("expected {expected} edges, found {found}")]
    MissingEdges { expected: usize, found: usize },

    #[error("empty graph description")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directed graph over `0..vertices` stored as adjacency lists.
///
/// Knows nothing about resources; the engine maps resource positions to
/// vertices and adds one edge per dependency, pointing from the dependency to
/// the dependent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertices: usize,
    adj: Vec<Vec<usize>>,
}

impl Graph {
    /// Graph with `vertices` vertices and no edges.
    pub fn new(vertices: usize) -> Self {
        Self {
            vertices,
            adj: vec![Vec::new(); vertices],
        }
    }

    /// Parse the textual form: vertex count, edge count, then one `"v w"`
    /// pair per line.
    ///
    /// ```text
    /// 3
    /// 2
    /// 0 1
    /// 1 2
    /// ```
    ///
    /// Blank lines are skipped. Lines after the declared edges are ignored.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, GraphParseError> {
        let mut graph: Option<Graph> = None;
        let mut expected_edges: Option<usize> = None;
        let mut found = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let text = line.trim();
            let line_no = idx + 1;
            if text.is_empty() {
                continue;
            }

            let Some(g) = graph.as_mut() else {
                let v = parse_count(text, line_no)?;
                graph = Some(Graph::new(v));
                continue;
            };

            let Some(expected) = expected_edges else {
                expected_edges = Some(parse_count(text, line_no)?);
                continue;
            };

            if found == expected {
                break;
            }

            let (from, to) = parse_edge(text, line_no)?;
            if from >= g.vertices || to >= g.vertices {
                return Err(GraphParseError::OutOfRange {
                    from,
                    to,
                    vertices: g.vertices,
                });
            }
            g.add_edge(from, to);
            found += 1;
        }

        let graph = graph.ok_or(GraphParseError::Empty)?;
        let expected = expected_edges.unwrap_or(0);
        if found < expected {
            return Err(GraphParseError::MissingEdges { expected, found });
        }
        Ok(graph)
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Successors of `v`, in insertion order.
    pub fn adjacent(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    /// Append `to` to the successors of `from`.
    ///
    /// Self loops and duplicate edges are accepted as given.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.adj[from].push(to);
    }

    /// Total number of edges, counting duplicates.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// Iterate over `(from, to)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(from, succ)| succ.iter().map(move |&to| (from, to)))
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={}, adj={:?}", self.vertices, self.adj)
    }
}

fn parse_count(text: &str, line: usize) -> Result<usize, GraphParseError> {
    text.parse::<usize>().map_err(|_| GraphParseError::BadCount {
        line,
        text: text.to_string(),
    })
}

fn parse_edge(text: &str, line: usize) -> Result<(usize, usize), GraphParseError> {
    let illegal = || GraphParseError::IllegalEdge {
        line,
        text: text.to_string(),
    };

    let mut parts = text.split_whitespace();
    let from = parts.next().and_then(|s| s.parse().ok()).ok_or_else(illegal)?;
    let to = parts.next().and_then(|s| s.parse().ok()).ok_or_else(illegal)?;
    if parts.next().is_some() {
        return Err(illegal());
    }
    Ok((from, to))
}
