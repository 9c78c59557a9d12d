use std::io;
use thiserror::Error;

/// Errors produced by the outline geometry kernel
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Two lines which were expected to meet are parallel
    #[error("Lines are parallel")]
    ParallelLines,

    /// A segment has zero length or coincident control points where a
    /// direction was required
    #[error("Degenerate segment")]
    DegenerateSegment,

    /// Masters do not share the same node structure
    #[error("Incompatible masters: {}", masters.join(", "))]
    IncompatibleTopology {
        /// The ids of the masters whose paths differ from the source
        masters: Vec<String>,
    },

    /// A numerical method failed to settle on an answer
    #[error("Numerical method did not converge")]
    NonConvergent,

    #[error("Master {master} not found")]
    /// A master id was not present in the master set
    MasterNotFound {
        /// The requested master id
        master: String,
    },

    #[error("Path {path} not found")]
    /// A path index was out of range
    PathNotFound {
        /// The requested path index
        path: usize,
    },

    #[error("Node {node} not found in path {path}")]
    /// A node index was out of range
    NodeNotFound {
        /// The path index
        path: usize,
        /// The requested node index
        node: usize,
    },

    #[error("Node {node} in path {path} is not part of a smooth connection")]
    /// A node which should sit on a smooth connection does not
    NotSmooth {
        /// The path index
        path: usize,
        /// The node index
        node: usize,
    },

    #[error("Segment {segment} not found")]
    /// A segment index was out of range
    SegmentNotFound {
        /// The requested segment index
        segment: usize,
    },

    /// The path's node sequence cannot be split into segments
    #[error("Ill-constructed path")]
    BadPath,

    #[error("Filter error: {0}")]
    /// A filter could not be constructed or applied
    FilterError(String),

    #[error("IO Error: {0}")]
    /// IO error
    IO(#[from] io::Error),

    #[error("JSON error: {0}")]
    /// Error reading or writing a JSON snapshot
    Json(#[from] serde_json::Error),
}
