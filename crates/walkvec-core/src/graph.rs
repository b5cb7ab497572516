//! Undirected graphs over integer node ids.
//!
//! [`Graph`] stores adjacency in a compressed layout: one flat neighbor array
//! plus per-node offsets into it. Node ids from the edge list are mapped to
//! contiguous indices in ascending id order, so index `i` always refers to
//! the `i`-th smallest id.
//!
//! Adjacency keeps every declared edge as-is:
//!
//! - `u v` inserts `v` into `u`'s list and `u` into `v`'s list
//! - repeated edges stay repeated (and bias uniform neighbor choice)
//! - a self-loop `u u` puts `u` into its own list twice
//!
//! Neighbor order is edge-list order.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Node identifier as it appears in the edge list.
pub type NodeId = u64;

/// Most distinct nodes a [`Graph`] can hold. Indices and the node count
/// both fit in `u32`.
pub const MAX_NODES: u64 = u32::MAX as u64;

/// Edge-list reader.
///
/// Format: UTF-8 text, one edge per line, two whitespace-separated
/// non-negative integers. Blank lines are skipped.
pub struct EdgeList;

impl EdgeList {
    /// Read all edges, in file order.
    ///
    /// Fails on the first line that is not exactly two integers; no partial
    /// result is returned.
    pub fn read<R: BufRead>(reader: R) -> Result<Vec<(NodeId, NodeId)>> {
        let mut edges = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            edges.push(Self::parse_line(line).ok_or_else(|| Error::Format {
                line: i + 1,
                content: line.to_string(),
            })?);
        }

        Ok(edges)
    }

    fn parse_line(line: &str) -> Option<(NodeId, NodeId)> {
        let mut tokens = line.split_whitespace();
        let u = tokens.next()?.parse().ok()?;
        let v = tokens.next()?.parse().ok()?;
        if tokens.next().is_some() {
            return None;
        }
        Some((u, v))
    }
}

/// Undirected graph with contiguous-index adjacency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Sorted distinct node ids; position is the node index.
    ids: Vec<NodeId>,
    /// `offsets[i]..offsets[i + 1]` is node `i`'s slice of `neighbors`.
    offsets: Vec<usize>,
    /// Flat neighbor indices.
    neighbors: Vec<u32>,
    /// Number of declared edges (before symmetrization).
    edge_count: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::from_edges(&[])
    }
}

impl Graph {
    /// Build a graph from edges in declaration order.
    ///
    /// # Panics
    ///
    /// If the edges name more than [`MAX_NODES`] distinct ids. Use
    /// [`Graph::try_from_edges`] for untrusted input.
    pub fn from_edges(edges: &[(NodeId, NodeId)]) -> Self {
        let ids = Self::distinct_ids(edges);
        assert!(
            check_node_count(ids.len()).is_ok(),
            "{} distinct nodes exceed the u32 index space",
            ids.len()
        );
        Self::build(ids, edges)
    }

    /// Like [`Graph::from_edges`], but fails with [`Error::Config`] when the
    /// node count does not fit in `u32` indices.
    pub fn try_from_edges(edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let ids = Self::distinct_ids(edges);
        check_node_count(ids.len())?;
        Ok(Self::build(ids, edges))
    }

    fn distinct_ids(edges: &[(NodeId, NodeId)]) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    // `ids` must hold every endpoint and at most `MAX_NODES` entries.
    fn build(ids: Vec<NodeId>, edges: &[(NodeId, NodeId)]) -> Self {
        let index = |id: NodeId| -> usize {
            // every endpoint is in `ids`
            ids.binary_search(&id).unwrap_or_else(|_| unreachable!("endpoint {id} not indexed"))
        };

        let mut degree = vec![0usize; ids.len()];
        for &(u, v) in edges {
            degree[index(u)] += 1;
            degree[index(v)] += 1;
        }

        let mut offsets = Vec::with_capacity(ids.len() + 1);
        let mut total = 0;
        offsets.push(total);
        for d in &degree {
            total += d;
            offsets.push(total);
        }

        // Fill in edge order so each neighbor list preserves declaration order.
        let mut cursor = offsets[..ids.len()].to_vec();
        let mut neighbors = vec![0u32; offsets[ids.len()]];
        // Indices are below `MAX_NODES`, so the casts are lossless.
        for &(u, v) in edges {
            let (iu, iv) = (index(u), index(v));
            neighbors[cursor[iu]] = iv as u32;
            cursor[iu] += 1;
            neighbors[cursor[iv]] = iu as u32;
            cursor[iv] += 1;
        }

        Self {
            ids,
            offsets,
            neighbors,
            edge_count: edges.len(),
        }
    }

    /// Parse an edge list from a reader.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let edges = EdgeList::read(reader)?;
        Self::try_from_edges(&edges)
    }

    /// Load from an edge-list file.
    pub fn from_edgelist_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let graph = Self::read(BufReader::new(file))?;
        tracing::info!(
            nodes = graph.num_nodes(),
            edges = graph.edge_count(),
            "loaded edge list"
        );
        Ok(graph)
    }

    /// Number of distinct nodes.
    pub fn num_nodes(&self) -> usize {
        self.ids.len()
    }

    /// Number of edges as declared in the input (duplicates counted).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids in ascending order; the position of an id is its index.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Id of the node at `index`.
    pub fn id(&self, index: u32) -> NodeId {
        self.ids[index as usize]
    }

    /// Index of `id`, if the node exists.
    pub fn index_of(&self, id: NodeId) -> Option<u32> {
        self.ids
            .binary_search(&id)
            .ok()
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Neighbor indices of `index`, in edge-list order, duplicates kept.
    pub fn neighbors(&self, index: u32) -> &[u32] {
        let i = index as usize;
        &self.neighbors[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Neighbor ids of `id`. Empty if the node does not exist.
    pub fn neighbor_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.index_of(id)
            .map(|i| self.neighbors(i).iter().map(|&n| self.id(n)).collect())
            .unwrap_or_default()
    }

    /// Length of the neighbor list of `index`.
    pub fn degree(&self, index: u32) -> usize {
        let i = index as usize;
        self.offsets[i + 1] - self.offsets[i]
    }

    /// Summary statistics.
    pub fn stats(&self) -> GraphStats {
        let num_nodes = self.num_nodes();
        let self_loops = (0..num_nodes as u32)
            .map(|i| self.neighbors(i).iter().filter(|&&n| n == i).count() / 2)
            .sum();
        let max_degree = (0..num_nodes as u32)
            .map(|i| self.degree(i))
            .max()
            .unwrap_or(0);
        let avg_degree = if num_nodes > 0 {
            self.neighbors.len() as f64 / num_nodes as f64
        } else {
            0.0
        };

        GraphStats {
            num_nodes,
            edge_count: self.edge_count,
            adjacency_entries: self.neighbors.len(),
            self_loops,
            max_degree,
            avg_degree,
        }
    }
}

fn check_node_count(n: usize) -> Result<()> {
    if n as u64 > MAX_NODES {
        return Err(Error::Config(format!(
            "{n} distinct nodes exceed the limit of {MAX_NODES}"
        )));
    }
    Ok(())
}

/// Statistics about a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Distinct nodes.
    pub num_nodes: usize,
    /// Declared edges, duplicates included.
    pub edge_count: usize,
    /// Total neighbor-list length (2 per declared edge).
    pub adjacency_entries: usize,
    /// Declared self-loops.
    pub self_loops: usize,
    /// Largest neighbor-list length.
    pub max_degree: usize,
    /// Mean neighbor-list length.
    pub avg_degree: f64,
}
