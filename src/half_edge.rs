//! Half-edge storage for the hull's triangular faces.
//!
//! Faces and half-edges live in two arenas and refer to each other by handle.
//! A face owns exactly three half-edges, created together by
//! [`HalfEdgeMesh::create_face`] and chained `e0 -> e1 -> e2 -> e0`. Each
//! half-edge stores the vertex it points *to*; its tail is the head of the
//! previous edge. Twins are set separately since they join two faces.

use nalgebra::Vector3;

use crate::vertex_list::{VertexId, VertexRegistry};
use crate::Point;

/// Handle of a face in a [`HalfEdgeMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(usize);

impl FaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a half-edge in a [`HalfEdgeMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMark {
    Visible,
    Deleted,
}

/// A triangular face with its supporting plane.
#[derive(Debug, Clone)]
pub struct Face {
    /// Base half-edge; the other two are reached through `next`/`prev`.
    pub edge: EdgeId,
    /// Outward unit normal. Zero for a zero-area triangle.
    pub normal: Vector3<f64>,
    /// Centroid of the triangle.
    pub midpoint: Point,
    pub area: f64,
    /// Signed distance of the plane from the origin, `normal · midpoint`.
    pub constant: f64,
    pub mark: FaceMark,
    /// First vertex of this face's run in the assigned list.
    pub(crate) outside: Option<VertexId>,
}

impl Face {
    /// Signed distance of `point` from the face plane, positive on the
    /// outward side.
    #[inline]
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        self.normal.dot(&point.coords) - self.constant
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.mark == FaceMark::Visible
    }

    #[inline]
    pub fn outside(&self) -> Option<VertexId> {
        self.outside
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// Destination vertex.
    pub vertex: VertexId,
    pub face: FaceId,
    pub next: EdgeId,
    pub prev: EdgeId,
    pub twin: Option<EdgeId>,
}

/// Arena of faces and half-edges. Deleted faces stay allocated until the
/// mesh is cleared.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    faces: Vec<Face>,
    edges: Vec<HalfEdge>,
}

impl HalfEdgeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.faces.clear();
        self.edges.clear();
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    #[inline]
    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.0]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id.0]
    }

    /// Builds the triangle `a`, `b`, `c` (counter-clockwise seen from
    /// outside) and computes its plane. Twins are left unset.
    pub fn create_face(
        &mut self,
        vertices: &VertexRegistry,
        a: VertexId,
        b: VertexId,
        c: VertexId,
    ) -> FaceId {
        let face = FaceId(self.faces.len());
        let base = self.edges.len();
        let (e0, e1, e2) = (EdgeId(base), EdgeId(base + 1), EdgeId(base + 2));

        for (vertex, next, prev) in [(a, e1, e2), (b, e2, e0), (c, e0, e1)] {
            self.edges.push(HalfEdge {
                vertex,
                face,
                next,
                prev,
                twin: None,
            });
        }

        self.faces.push(Face {
            edge: e0,
            normal: Vector3::zeros(),
            midpoint: Point::origin(),
            area: 0.0,
            constant: 0.0,
            mark: FaceMark::Visible,
            outside: None,
        });
        self.compute_face(vertices, face);
        face
    }

    /// Recomputes normal, midpoint, area and plane constant from the face's
    /// current vertices.
    pub fn compute_face(&mut self, vertices: &VertexRegistry, id: FaceId) {
        let base = self.faces[id.0].edge;
        let a = vertices[self.tail(base)].point;
        let b = vertices[self.head(base)].point;
        let c = vertices[self.head(self.edge(base).next)].point;

        let cross = (c - b).cross(&(a - b));
        let normal = cross.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        let midpoint = Point::from((a.coords + b.coords + c.coords) / 3.0);

        let face = &mut self.faces[id.0];
        face.area = cross.norm() * 0.5;
        face.normal = normal;
        face.midpoint = midpoint;
        face.constant = normal.dot(&midpoint.coords);
    }

    /// Returns the `i`-th edge of a face counting from its base edge.
    /// Negative indices walk backwards, so `-1` is the last edge.
    pub fn get_edge(&self, face: FaceId, mut i: isize) -> EdgeId {
        let mut edge = self.faces[face.0].edge;
        while i > 0 {
            edge = self.edges[edge.0].next;
            i -= 1;
        }
        while i < 0 {
            edge = self.edges[edge.0].prev;
            i += 1;
        }
        edge
    }

    /// The three edges of a face in `next` order starting at the base edge.
    pub fn face_edges(&self, face: FaceId) -> [EdgeId; 3] {
        let e0 = self.faces[face.0].edge;
        let e1 = self.edges[e0.0].next;
        let e2 = self.edges[e1.0].next;
        [e0, e1, e2]
    }

    #[inline]
    pub fn distance_to_point(&self, face: FaceId, point: &Point) -> f64 {
        self.faces[face.0].distance_to_point(point)
    }

    #[inline]
    pub fn head(&self, edge: EdgeId) -> VertexId {
        self.edges[edge.0].vertex
    }

    #[inline]
    pub fn tail(&self, edge: EdgeId) -> VertexId {
        let prev = self.edges[edge.0].prev;
        self.edges[prev.0].vertex
    }

    pub fn length_squared(&self, vertices: &VertexRegistry, edge: EdgeId) -> f64 {
        let head = vertices[self.head(edge)].point;
        let tail = vertices[self.tail(edge)].point;
        nalgebra::distance_squared(&head, &tail)
    }

    pub fn length(&self, vertices: &VertexRegistry, edge: EdgeId) -> f64 {
        self.length_squared(vertices, edge).sqrt()
    }

    /// Makes `edge` and `other` each other's twin.
    pub fn set_twin(&mut self, edge: EdgeId, other: EdgeId) {
        self.edges[edge.0].twin = Some(other);
        self.edges[other.0].twin = Some(edge);
    }
}
