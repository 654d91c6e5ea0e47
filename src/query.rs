use nalgebra::Vector3;

use crate::{ConvexHull, Point};

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }
}

/// One hull face as plain geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullTriangle {
    /// Corners in counter-clockwise order seen from outside.
    pub vertices: [Point; 3],
    pub normal: Vector3<f64>,
}

impl ConvexHull {
    /// Whether `point` is inside the hull or within tolerance of its surface.
    /// Always false for an empty hull.
    pub fn contains_point(&self, point: &Point) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        self.faces
            .iter()
            .all(|&face| self.mesh.distance_to_point(face, point) <= self.tolerance)
    }

    /// First point where `ray` meets the hull, or `None` if it misses.
    ///
    /// Each face is treated as a half-space; the ray is clipped against all
    /// of them. A ray starting inside the hull hits where it leaves.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Point> {
        if self.faces.is_empty() {
            return None;
        }

        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;

        for &face in &self.faces {
            let face = self.mesh.face(face);
            let v_n = face.distance_to_point(&ray.origin);
            let v_d = face.normal.dot(&ray.direction);

            // Outside this face and not heading towards it.
            if v_n > 0.0 && v_d >= 0.0 {
                return None;
            }

            let t = if v_d != 0.0 { -v_n / v_d } else { 0.0 };
            if t <= 0.0 {
                continue;
            }

            if v_d > 0.0 {
                t_far = t_far.min(t);
            } else {
                t_near = t_near.max(t);
            }

            if t_near > t_far {
                return None;
            }
        }

        if t_near != f64::NEG_INFINITY {
            Some(ray.at(t_near))
        } else if t_far != f64::INFINITY {
            Some(ray.at(t_far))
        } else {
            None
        }
    }

    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        self.intersect_ray(ray).is_some()
    }

    /// The hull's faces as independent triangles with flat normals.
    pub fn to_triangle_list(&self) -> Vec<HullTriangle> {
        self.faces
            .iter()
            .map(|&face| {
                let [e0, e1, e2] = self.mesh.face_edges(face);
                let corner = |edge| self.vertices[self.mesh.head(edge)].point;
                HullTriangle {
                    vertices: [corner(e0), corner(e1), corner(e2)],
                    normal: self.mesh.face(face).normal,
                }
            })
            .collect()
    }
}
