//! Vector file format.
//!
//! One line per node, ascending id order:
//!
//! ```text
//! <id> <x1> <x2> ... <xd>
//! ```
//!
//! The id is a plain integer; each coordinate is fixed-point with 8 digits
//! after the decimal point.

use crate::{Error, Result};
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use walkvec_core::NodeId;

/// Vector file reader and writer.
pub struct VectorFile;

impl VectorFile {
    /// Render rows to a string.
    pub fn to_string(ids: &[NodeId], vectors: &[Vec<f32>]) -> String {
        let dim = vectors.first().map_or(0, Vec::len);
        let mut out = String::with_capacity(ids.len() * (dim * 12 + 8));
        for (id, vector) in ids.iter().zip(vectors) {
            let _ = write!(out, "{id}");
            for x in vector {
                let _ = write!(out, " {x:.8}");
            }
            out.push('\n');
        }
        out
    }

    /// Write rows to `writer`.
    pub fn write<W: Write>(mut writer: W, ids: &[NodeId], vectors: &[Vec<f32>]) -> Result<()> {
        writer.write_all(Self::to_string(ids, vectors).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Parse rows.
    ///
    /// Lines with fewer than two fields are skipped, as evaluators do.
    pub fn read<R: BufRead>(reader: R) -> Result<Vec<(NodeId, Vec<f32>)>> {
        let mut rows = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let mut fields = line.split_whitespace();
            let (Some(id), Some(_)) = (fields.next(), fields.clone().next()) else {
                continue;
            };

            let parsed = id.parse::<NodeId>().ok().and_then(|id| {
                let vector: Option<Vec<f32>> = fields.map(|x| x.parse().ok()).collect();
                vector.map(|v| (id, v))
            });
            rows.push(parsed.ok_or_else(|| Error::Format {
                line: i + 1,
                content: line.to_string(),
            })?);
        }

        Ok(rows)
    }
}
