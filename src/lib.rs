//! Convex hulls of 3D point sets for the dual-word ornament builder.
//!
//! [`ConvexHull`] runs an incremental quickhull over a half-edge mesh and
//! answers containment and ray queries on the result. The finished hull can
//! be read face by face, flattened with [`ConvexHull::to_triangle_list`], or,
//! with the `genmesh` feature, fed to any `genmesh` consumer.
//!
//! ```
//! use nalgebra as na;
//! use ornament_hull::ConvexHull;
//!
//! let points = [
//!     na::Point3::new(0.0, 0.0, 0.0),
//!     na::Point3::new(1.0, 0.0, 0.0),
//!     na::Point3::new(0.0, 1.0, 0.0),
//!     na::Point3::new(0.0, 0.0, 1.0),
//!     na::Point3::new(0.1, 0.1, 0.1),
//! ];
//! let hull = ConvexHull::from_points(&points);
//! assert_eq!(hull.num_faces(), 4);
//! assert!(hull.contains_point(&na::Point3::new(0.2, 0.2, 0.2)));
//! ```

use nalgebra as na;

mod config;
mod error;
mod half_edge;
mod hull;
mod query;
mod vertex_list;

#[cfg(feature = "genmesh")]
mod genmesh;

pub type Point = na::Point3<f64>;

pub use crate::config::HullConfig;
pub use crate::error::{Degeneracy, HullError, Result};
pub use crate::half_edge::{EdgeId, Face, FaceId, FaceMark, HalfEdge, HalfEdgeMesh};
pub use crate::hull::ConvexHull;
pub use crate::query::{HullTriangle, Ray};
pub use crate::vertex_list::{VertexId, VertexList, VertexNode, VertexRegistry};

#[cfg(feature = "genmesh")]
pub use crate::genmesh::ConvexHullMeshGenerator;
