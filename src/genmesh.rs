use genmesh::{
    generators::{IndexedPolygon, SharedVertex},
    Polygon, Triangle, Vertex,
};

use crate::{ConvexHull, HullTriangle};

/// `genmesh` generator emitting one flat-shaded triangle per hull face.
pub struct ConvexHullMeshGenerator {
    triangles: Vec<HullTriangle>,
    triangle: usize,
}

impl ConvexHullMeshGenerator {
    pub fn new(parent: &ConvexHull) -> Self {
        Self {
            triangles: parent.to_triangle_list(),
            triangle: 0,
        }
    }

    fn vertex(&self, idx: usize) -> Vertex {
        let t = &self.triangles[idx / 3];
        let p = t.vertices[idx % 3];
        Vertex {
            pos: [p.x as f32, p.y as f32, p.z as f32].into(),
            normal: [t.normal.x as f32, t.normal.y as f32, t.normal.z as f32].into(),
        }
    }
}

impl ConvexHull {
    pub fn mesh_generator(&self) -> ConvexHullMeshGenerator {
        ConvexHullMeshGenerator::new(self)
    }
}

impl Iterator for ConvexHullMeshGenerator {
    type Item = Polygon<Vertex>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.triangle >= self.triangles.len() {
            None
        } else {
            let base = self.triangle * 3;
            self.triangle += 1;
            Some(Polygon::PolyTri(Triangle::new(
                self.vertex(base),
                self.vertex(base + 1),
                self.vertex(base + 2),
            )))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.triangles.len() - self.triangle;
        (remaining, Some(remaining))
    }
}

impl SharedVertex<Vertex> for ConvexHullMeshGenerator {
    fn shared_vertex(&self, idx: usize) -> Vertex {
        self.vertex(idx)
    }

    fn shared_vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }
}

impl IndexedPolygon<Triangle<usize>> for ConvexHullMeshGenerator {
    fn indexed_polygon(&self, idx: usize) -> Triangle<usize> {
        let idx = idx * 3;
        Triangle::new(idx, idx + 1, idx + 2)
    }

    fn indexed_polygon_count(&self) -> usize {
        self.triangles.len()
    }
}
