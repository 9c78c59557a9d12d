#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Geometry for editing the outlines of multi-master glyphs.
//!
//! Outlines are held per master in a [`MasterSet`]. The operations here
//! balance Bezier handles, add nodes at inflections or near a point, keep
//! smooth connections proportional across masters and estimate the area
//! of an outline. Edits touching several masters check first that the
//! masters are compatible and change nothing if they are not.

pub mod area;
pub mod batch;
mod common;
pub mod dekink;
mod error;
pub mod filters;
pub mod geometry;
pub mod harmonize;
pub mod insert;
mod master;
mod serde_helpers;
mod shape;

pub use crate::{
    area::slice_area,
    batch::{in_batch, BatchScope, NoScope},
    common::{distance, Node, NodeKind, Point2D},
    dekink::{dekink, dekink_all, DekinkReport},
    error::GeometryError,
    harmonize::{HarmonizeMode, HarmonizeReport},
    insert::{insert_inflections, insert_inflections_in_masters, insert_node_near},
    master::{MasterId, MasterSet, Outline},
    shape::{Path, PathSegment, Segment},
};
use std::path::PathBuf;

/// Load a master set from a JSON snapshot
pub fn load(filename: impl Into<PathBuf>) -> Result<MasterSet, GeometryError> {
    let pb = filename.into();
    let buffered = std::io::BufReader::new(std::fs::File::open(&pb)?);
    let masters: MasterSet = serde_json::from_reader(buffered)?;
    log::debug!(
        "Loaded glyph '{}' with {} masters from {}",
        masters.glyph,
        masters.masters.len(),
        pb.display()
    );
    Ok(masters)
}

impl MasterSet {
    /// Write the master set as a JSON snapshot
    pub fn save(&self, filename: impl Into<PathBuf>) -> Result<(), GeometryError> {
        let buffered = std::io::BufWriter::new(std::fs::File::create(filename.into())?);
        serde_json::to_writer_pretty(buffered, self)?;
        Ok(())
    }
}
