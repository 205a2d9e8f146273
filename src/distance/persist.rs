//! JSON persistence of a distance oracle.
//!
//! The document maps every source id (as a string) to its `distances` and
//! `paths` towards every target id:
//!
//! ```text
//! { "1": { "distances": { "1": 0.0, "2": 10.0, "3": "Infinity" },
//!          "paths":     { "1": [1],  "2": [1, 2], "3": [] } } }
//! ```
//!
//! By default unreachable distances are the string `"Infinity"`, which keeps
//! the document strict JSON. Readers that need a number, such as Python's
//! `json` module doing arithmetic on the values, can ask for
//! [`InfinityStyle::Bare`]: the token is then written unquoted, the way
//! Python's own `json.dump` writes `float("inf")`. Both forms load back.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{DistanceMatrix, DistanceOracle};
use crate::error::{Error, Result};
use crate::models::Graph;

const INFINITY_TEXT: &str = "Infinity";

/// How unreachable distances are spelled in a written cache document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfinityStyle {
    /// `"Infinity"`: strict JSON.
    #[default]
    String,
    /// `Infinity`: not strict JSON, parsed as a float by Python and
    /// JavaScript-style readers.
    Bare,
}

#[derive(Debug, Serialize, Deserialize)]
struct SourceEntry {
    distances: BTreeMap<String, Value>,
    paths: BTreeMap<String, Vec<usize>>,
}

impl DistanceOracle {
    /// Serializes distances and paths to the cache document format.
    pub fn to_json(&self) -> Result<String> {
        self.to_json_with(InfinityStyle::String)
    }

    /// Like [`to_json`](Self::to_json), spelling unreachable distances
    /// as `style` asks.
    pub fn to_json_with(&self, style: InfinityStyle) -> Result<String> {
        let ids = self.node_ids();
        let mut doc = BTreeMap::new();
        for (i, &source) in ids.iter().enumerate() {
            let mut distances = BTreeMap::new();
            let mut paths = BTreeMap::new();
            for (j, &target) in ids.iter().enumerate() {
                let d = self.distance_at(i, j);
                let value = if d.is_finite() {
                    Value::from(d)
                } else {
                    Value::from(INFINITY_TEXT)
                };
                distances.insert(target.to_string(), value);
                let path = self.matrix().path(i, j).into_iter().map(|k| ids[k]).collect();
                paths.insert(target.to_string(), path);
            }
            doc.insert(source.to_string(), SourceEntry { distances, paths });
        }
        let text = serde_json::to_string(&doc)?;
        Ok(match style {
            InfinityStyle::String => text,
            // Keys and paths are integers, so the quoted token only ever
            // appears as a distance value.
            InfinityStyle::Bare => text.replace("\"Infinity\"", INFINITY_TEXT),
        })
    }

    /// Restores an oracle for `graph` from a cache document.
    ///
    /// Fails with [`Error::CacheMismatch`] if the document does not cover
    /// exactly the graph's nodes or if a path disagrees with its distance.
    pub fn from_json(text: &str, graph: &Graph) -> Result<Self> {
        let text = sanitize_non_finite(text);
        let doc: BTreeMap<String, SourceEntry> = serde_json::from_str(&text)?;
        if doc.len() != graph.len() {
            return Err(Error::cache_mismatch(format!(
                "{} sources in cache, {} nodes in graph",
                doc.len(),
                graph.len()
            )));
        }

        let n = graph.len();
        let mut matrix = DistanceMatrix::new(n);
        for (key, entry) in &doc {
            let s = parse_index(graph, key)?;
            for (t, target) in graph.node_ids().into_iter().enumerate() {
                let key = target.to_string();
                let value = entry.distances.get(&key).ok_or_else(|| {
                    Error::cache_mismatch(format!("missing distance {} -> {}", graph.node(s).id(), target))
                })?;
                let distance = parse_distance(value)?;
                let path = entry.paths.get(&key).map(Vec::as_slice).unwrap_or(&[]);
                let predecessor = check_path(graph, s, t, distance, path)?;
                matrix.set(s, t, distance, predecessor);
            }
        }

        for s in 0..n {
            for t in 0..n {
                if matrix.get(s, t).is_finite() && matrix.path(s, t).is_empty() {
                    return Err(Error::cache_mismatch(format!(
                        "paths from {} do not form a shortest-path tree",
                        graph.node(s).id()
                    )));
                }
            }
        }

        Ok(Self::from_matrix(graph, matrix))
    }

    /// Writes the cache document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, InfinityStyle::String)
    }

    /// Writes the cache document to a file in the given style.
    pub fn save_with(&self, path: impl AsRef<Path>, style: InfinityStyle) -> Result<()> {
        fs::write(path.as_ref(), self.to_json_with(style)?)?;
        debug!(path = %path.as_ref().display(), ?style, "distance cache written");
        Ok(())
    }

    /// Reads a cache document for `graph` from a file.
    pub fn load(path: impl AsRef<Path>, graph: &Graph) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text, graph)
    }
}

fn parse_index(graph: &Graph, key: &str) -> Result<usize> {
    let id: usize = key
        .trim()
        .parse()
        .map_err(|_| Error::cache_mismatch(format!("node key {key:?} is not an integer id")))?;
    graph
        .index_of(id)
        .ok_or_else(|| Error::cache_mismatch(format!("node {id} is not in the graph")))
}

fn parse_distance(value: &Value) -> Result<f64> {
    let d = match value {
        Value::Number(n) => n.as_f64(),
        Value::Null => Some(f64::INFINITY),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "infinity" | "inf" => Some(f64::INFINITY),
            _ => None,
        },
        _ => None,
    };
    match d {
        Some(d) if d >= 0.0 => Ok(d),
        _ => Err(Error::cache_mismatch(format!("invalid distance {value}"))),
    }
}

/// Validates one stored path and returns the predecessor of its target.
fn check_path(
    graph: &Graph,
    s: usize,
    t: usize,
    distance: f64,
    path: &[usize],
) -> Result<Option<usize>> {
    if s == t {
        let self_path = path.is_empty() || (path.len() == 1 && path[0] == graph.node(s).id());
        if distance != 0.0 || !self_path {
            return Err(Error::cache_mismatch(format!(
                "node {} must be at distance 0 from itself",
                graph.node(s).id()
            )));
        }
        return Ok(None);
    }
    if distance.is_infinite() {
        if !path.is_empty() {
            return Err(Error::cache_mismatch(format!(
                "unreachable pair {} -> {} has a path",
                graph.node(s).id(),
                graph.node(t).id()
            )));
        }
        return Ok(None);
    }
    let ends_ok = path.len() >= 2
        && path.first() == Some(&graph.node(s).id())
        && path.last() == Some(&graph.node(t).id());
    if !ends_ok {
        return Err(Error::cache_mismatch(format!(
            "path {} -> {} does not connect its endpoints",
            graph.node(s).id(),
            graph.node(t).id()
        )));
    }
    let prev = path[path.len() - 2];
    graph
        .index_of(prev)
        .map(Some)
        .ok_or_else(|| Error::cache_mismatch(format!("node {prev} is not in the graph")))
}

/// Quotes bare `Infinity`, `-Infinity` and `NaN` tokens outside string
/// literals so that documents written by non-strict emitters parse.
fn sanitize_non_finite(text: &str) -> Cow<'_, str> {
    if !text.contains("Infinity") && !text.contains("NaN") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let token = ["-Infinity", "Infinity", "NaN"]
            .into_iter()
            .find(|t| rest.starts_with(t));
        match token {
            Some(t) => {
                out.push('"');
                out.push_str(t);
                out.push('"');
                rest = &rest[t.len()..];
            }
            None => {
                if c == '"' {
                    in_string = true;
                }
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Cow::Owned(out)
}
