//! Point, line and cubic Bezier primitives used by the outline operations.

mod cubic;
mod intersect;
mod nearest;

pub use cubic::{evaluate, find_inflections, split_cubic, INFLECTION_RANGE};
pub use intersect::intersect_lines;
pub use nearest::{nearest_t, nearest_t_on_cubic, nearest_t_on_line, NearestPointOptions};
