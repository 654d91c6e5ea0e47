//! Incremental 3D quickhull over a [`HalfEdgeMesh`].
//!
//! Construction runs in phases on a single [`ConvexHull`] value:
//!
//! 1. register every input point as a vertex and derive the tolerance;
//! 2. build an outward-facing tetrahedron from extreme points and hand every
//!    other vertex to the face it is farthest outside of;
//! 3. while some face still has outside vertices, take the farthest vertex of
//!    the first such face, delete every face it can see, fan new faces from
//!    it to the horizon and redistribute the orphaned vertices;
//! 4. drop the deleted faces from the face list.
//!
//! Outside vertices live in one intrusive list (`assigned`) where each face
//! owns a contiguous run starting at [`Face::outside`](crate::Face).

use indexmap::IndexSet;
use nalgebra::Matrix4;
use tracing::{debug, trace, warn};

use crate::config::HullConfig;
use crate::error::{Degeneracy, HullError, Result};
use crate::half_edge::{EdgeId, Face, FaceId, FaceMark, HalfEdge, HalfEdgeMesh};
use crate::vertex_list::{VertexId, VertexList, VertexNode, VertexRegistry};
use crate::Point;

/// How a construction run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Complete,
    Skipped(Skip),
    IterationLimit(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    TooFewPoints(usize),
    NonFinite(usize),
    Degenerate(Degeneracy),
}

/// Pending edges of one face during the horizon walk.
struct HorizonFrame {
    edges: [EdgeId; 3],
    len: usize,
    pos: usize,
}

/// A 3D convex hull made of outward-facing triangles.
///
/// An instance can be reused: every `set_from_*` call starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct ConvexHull {
    config: HullConfig,
    pub(crate) tolerance: f64,
    pub(crate) faces: Vec<FaceId>,
    new_faces: Vec<FaceId>,
    pub(crate) mesh: HalfEdgeMesh,
    pub(crate) vertices: VertexRegistry,
    assigned: VertexList,
    unassigned: VertexList,
}

impl ConvexHull {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config`, falling back to the default for any field that fails
    /// [`HullConfig::validate`].
    pub fn with_config(config: HullConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "falling back to defaults for invalid hull config");
        }
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    /// Computes the hull of `points`. Fewer than four points, or points that
    /// do not span a volume, give an empty hull.
    pub fn from_points(points: &[Point]) -> Self {
        let mut hull = Self::new();
        hull.set_from_points(points);
        hull
    }

    /// Like [`from_points`](Self::from_points), but reports why a hull could
    /// not be built instead of returning an empty one.
    pub fn try_from_points(points: &[Point], config: HullConfig) -> Result<Self> {
        config.validate()?;
        let mut hull = Self::with_config(config);
        match hull.build(points.iter().copied()) {
            Outcome::Complete => Ok(hull),
            Outcome::Skipped(Skip::TooFewPoints(count)) => {
                Err(HullError::InsufficientPoints { count })
            }
            Outcome::Skipped(Skip::NonFinite(index)) => Err(HullError::NonFinitePoint { index }),
            Outcome::Skipped(Skip::Degenerate(kind)) => Err(HullError::Degenerate(kind)),
            Outcome::IterationLimit(iterations) => Err(HullError::IterationLimit { iterations }),
        }
    }

    pub fn set_from_points(&mut self, points: &[Point]) -> &mut Self {
        self.build(points.iter().copied());
        self
    }

    /// Computes the hull of `points` after applying the homogeneous transform
    /// `matrix`, e.g. a mesh's local-to-world matrix.
    pub fn set_from_transformed_points(
        &mut self,
        points: &[Point],
        matrix: &Matrix4<f64>,
    ) -> &mut Self {
        self.build(points.iter().map(|p| matrix.transform_point(p)));
        self
    }

    /// Discards every face and vertex.
    pub fn make_empty(&mut self) -> &mut Self {
        self.faces.clear();
        self.new_faces.clear();
        self.mesh.clear();
        self.vertices.clear();
        self.assigned.clear();
        self.unassigned.clear();
        self.tolerance = 0.0;
        self
    }

    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    /// Distance below which a point counts as lying on a face plane.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Handles of the hull's faces.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }

    pub fn face(&self, id: FaceId) -> &Face {
        self.mesh.face(id)
    }

    pub fn edge(&self, id: EdgeId) -> &HalfEdge {
        self.mesh.edge(id)
    }

    pub fn vertex(&self, id: VertexId) -> &VertexNode {
        &self.vertices[id]
    }

    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    /// Distinct vertices referenced by the hull's faces, in the order they
    /// are first met walking the faces.
    pub fn vertex_ids(&self) -> IndexSet<VertexId> {
        self.faces
            .iter()
            .flat_map(|&face| self.mesh.face_edges(face))
            .map(|edge| self.mesh.head(edge))
            .collect()
    }

    /// Positions of the hull's vertices, see [`vertex_ids`](Self::vertex_ids).
    pub fn vertices(&self) -> Vec<Point> {
        self.vertex_ids()
            .into_iter()
            .map(|id| self.vertices[id].point)
            .collect()
    }

    fn build<I>(&mut self, points: I) -> Outcome
    where
        I: Iterator<Item = Point>,
    {
        self.make_empty();
        for point in points {
            self.vertices.push(point);
        }
        let count = self.vertices.len();

        let outcome = self.compute();
        match outcome {
            Outcome::Complete => {}
            Outcome::Skipped(Skip::TooFewPoints(_)) => {}
            Outcome::Skipped(reason) => {
                warn!(?reason, points = count, "convex hull skipped");
            }
            Outcome::IterationLimit(iterations) => {
                warn!(
                    iterations,
                    faces = self.faces.len(),
                    "convex hull stopped at iteration limit"
                );
            }
        }
        outcome
    }

    fn compute(&mut self) -> Outcome {
        let count = self.vertices.len();
        if count < 4 {
            self.make_empty();
            return Outcome::Skipped(Skip::TooFewPoints(count));
        }
        if let Some(id) = self
            .vertices
            .ids()
            .find(|&id| !self.vertices[id].point.coords.iter().all(|c| c.is_finite()))
        {
            self.make_empty();
            return Outcome::Skipped(Skip::NonFinite(id.index()));
        }

        if let Err(kind) = self.compute_initial_hull() {
            self.make_empty();
            return Outcome::Skipped(Skip::Degenerate(kind));
        }

        let mut iterations = 0;
        let mut outcome = Outcome::Complete;
        while let Some(eye) = self.next_vertex_to_add() {
            if self.config.max_iterations.map_or(false, |max| iterations >= max) {
                outcome = Outcome::IterationLimit(iterations);
                break;
            }
            self.add_vertex_to_hull(eye);
            iterations += 1;
        }

        self.reindex_faces();
        self.cleanup();
        debug!(
            points = count,
            iterations,
            faces = self.faces.len(),
            "convex hull finished"
        );
        outcome
    }

    /// Indices of the vertices with the smallest and largest coordinate on
    /// each axis. Also sets the tolerance.
    fn compute_extremes(&mut self) -> ([VertexId; 3], [VertexId; 3]) {
        let first = VertexId::new(0);
        let mut min = [first; 3];
        let mut max = [first; 3];

        for id in self.vertices.ids() {
            let point = &self.vertices[id].point;
            for axis in 0..3 {
                if point[axis] < self.vertices[min[axis]].point[axis] {
                    min[axis] = id;
                }
                if point[axis] > self.vertices[max[axis]].point[axis] {
                    max[axis] = id;
                }
            }
        }

        self.tolerance = match self.config.tolerance {
            Some(tolerance) => tolerance,
            None => {
                let extent: f64 = (0..3)
                    .map(|axis| {
                        let lo = self.vertices[min[axis]].point[axis].abs();
                        let hi = self.vertices[max[axis]].point[axis].abs();
                        lo.max(hi)
                    })
                    .sum();
                3.0 * f64::EPSILON * extent
            }
        };
        debug!(tolerance = self.tolerance, "derived hull tolerance");

        (min, max)
    }

    fn compute_initial_hull(&mut self) -> std::result::Result<(), Degeneracy> {
        let (min, max) = self.compute_extremes();
        let tolerance = self.tolerance;

        // The two extremes on the axis with the largest range.
        let mut max_distance = 0.0;
        let mut axis = 0;
        for i in 0..3 {
            let distance = self.vertices[max[i]].point[i] - self.vertices[min[i]].point[i];
            if distance > max_distance {
                max_distance = distance;
                axis = i;
            }
        }
        if max_distance <= tolerance {
            return Err(Degeneracy::Coincident);
        }
        let v0 = min[axis];
        let v1 = max[axis];
        let p0 = self.vertices[v0].point;
        let p1 = self.vertices[v1].point;

        // Farthest from the line v0-v1.
        let direction = p1 - p0;
        let mut max_distance = 0.0;
        let mut v2 = None;
        for id in self.vertices.ids().filter(|&id| id != v0 && id != v1) {
            let offset = self.vertices[id].point - p0;
            let along = offset.dot(&direction) / direction.norm_squared();
            let distance = (offset - direction * along).norm_squared();
            if distance > max_distance {
                max_distance = distance;
                v2 = Some(id);
            }
        }
        let v2 = match v2 {
            Some(v2) if max_distance > tolerance * tolerance => v2,
            _ => return Err(Degeneracy::Collinear),
        };
        let p2 = self.vertices[v2].point;

        // Farthest from the plane v0-v1-v2.
        let normal = (p2 - p1)
            .cross(&(p0 - p1))
            .try_normalize(0.0)
            .unwrap_or_else(nalgebra::Vector3::zeros);
        let plane_distance = |p: &Point| normal.dot(&(p - p0));
        let mut max_distance = -1.0;
        let mut v3 = None;
        for id in self
            .vertices
            .ids()
            .filter(|&id| id != v0 && id != v1 && id != v2)
        {
            let distance = plane_distance(&self.vertices[id].point).abs();
            if distance > max_distance {
                max_distance = distance;
                v3 = Some(id);
            }
        }
        let v3 = match v3 {
            Some(v3) if max_distance > tolerance => v3,
            _ => return Err(Degeneracy::Coplanar),
        };

        let faces = if plane_distance(&self.vertices[v3].point) < 0.0 {
            // v0-v1-v2 already faces away from v3.
            let faces = [
                self.mesh.create_face(&self.vertices, v0, v1, v2),
                self.mesh.create_face(&self.vertices, v3, v1, v0),
                self.mesh.create_face(&self.vertices, v3, v2, v1),
                self.mesh.create_face(&self.vertices, v3, v0, v2),
            ];
            for i in 0..3 {
                let j = (i + 1) % 3;
                let side = self.mesh.get_edge(faces[i + 1], 2);
                let base = self.mesh.get_edge(faces[0], j as isize);
                self.mesh.set_twin(side, base);
                let side = self.mesh.get_edge(faces[i + 1], 1);
                let next_side = self.mesh.get_edge(faces[j + 1], 0);
                self.mesh.set_twin(side, next_side);
            }
            faces
        } else {
            let faces = [
                self.mesh.create_face(&self.vertices, v0, v2, v1),
                self.mesh.create_face(&self.vertices, v3, v0, v1),
                self.mesh.create_face(&self.vertices, v3, v1, v2),
                self.mesh.create_face(&self.vertices, v3, v2, v0),
            ];
            for i in 0..3 {
                let j = (i + 1) % 3;
                let side = self.mesh.get_edge(faces[i + 1], 2);
                let base = self.mesh.get_edge(faces[0], ((3 - i) % 3) as isize);
                self.mesh.set_twin(side, base);
                let side = self.mesh.get_edge(faces[i + 1], 0);
                let next_side = self.mesh.get_edge(faces[j + 1], 1);
                self.mesh.set_twin(side, next_side);
            }
            faces
        };
        self.faces.extend_from_slice(&faces);
        debug!(
            v0 = v0.index(),
            v1 = v1.index(),
            v2 = v2.index(),
            v3 = v3.index(),
            "initial tetrahedron"
        );

        for id in self.vertices.ids() {
            if id == v0 || id == v1 || id == v2 || id == v3 {
                continue;
            }
            let point = self.vertices[id].point;
            let mut max_distance = tolerance;
            let mut max_face = None;
            for &face in &faces {
                let distance = self.mesh.distance_to_point(face, &point);
                if distance > max_distance {
                    max_distance = distance;
                    max_face = Some(face);
                }
            }
            if let Some(face) = max_face {
                self.add_vertex_to_face(id, face);
            }
        }
        Ok(())
    }

    /// Puts `vertex` at the head of `face`'s run in the assigned list.
    fn add_vertex_to_face(&mut self, vertex: VertexId, face: FaceId) {
        self.vertices[vertex].face = Some(face);
        match self.mesh.face(face).outside {
            Some(head) => self.assigned.insert_before(&mut self.vertices, head, vertex),
            None => self.assigned.append(&mut self.vertices, vertex),
        }
        self.mesh.face_mut(face).outside = Some(vertex);
    }

    fn remove_vertex_from_face(&mut self, vertex: VertexId, face: FaceId) {
        if self.mesh.face(face).outside == Some(vertex) {
            let next = self.vertices[vertex]
                .next
                .filter(|&next| self.vertices[next].face == Some(face));
            self.mesh.face_mut(face).outside = next;
        }
        self.assigned.remove(&mut self.vertices, vertex);
        self.vertices[vertex].face = None;
    }

    /// Detaches `face`'s whole run from the assigned list and returns its
    /// first vertex.
    fn remove_all_vertices_from_face(&mut self, face: FaceId) -> Option<VertexId> {
        let start = self.mesh.face(face).outside?;
        let mut end = start;
        while let Some(next) = self.vertices[end].next {
            if self.vertices[next].face != Some(face) {
                break;
            }
            end = next;
        }
        self.assigned.remove_sub_list(&mut self.vertices, start, end);
        self.mesh.face_mut(face).outside = None;
        Some(start)
    }

    /// Moves the outside vertices of a face that is about to be deleted to
    /// the unassigned list.
    fn delete_face_vertices(&mut self, face: FaceId) {
        if let Some(start) = self.remove_all_vertices_from_face(face) {
            let mut cursor = Some(start);
            while let Some(vertex) = cursor {
                self.vertices[vertex].face = None;
                cursor = self.vertices[vertex].next;
            }
            self.unassigned.append_chain(&mut self.vertices, start);
        }
    }

    /// Hands every unassigned vertex to the new face it is farthest outside
    /// of. Vertices outside none of them are inside the hull.
    fn resolve_unassigned_points(&mut self) {
        let good_enough = self.config.good_enough_factor * self.tolerance;
        while let Some(vertex) = self.unassigned.pop_front(&mut self.vertices) {
            let point = self.vertices[vertex].point;
            let mut max_distance = self.tolerance;
            let mut max_face = None;
            for &face in &self.new_faces {
                if !self.mesh.face(face).is_visible() {
                    continue;
                }
                let distance = self.mesh.distance_to_point(face, &point);
                if distance > max_distance {
                    max_distance = distance;
                    max_face = Some(face);
                }
                if max_distance > good_enough {
                    break;
                }
            }
            if let Some(face) = max_face {
                self.add_vertex_to_face(vertex, face);
            }
        }
    }

    /// Marks every face visible from `eye` as deleted and returns the
    /// boundary of that region as an ordered loop of half-edges belonging to
    /// the deleted faces.
    fn compute_horizon(&mut self, eye: &Point, face: FaceId) -> Vec<EdgeId> {
        let mut horizon = Vec::new();
        let mut stack = vec![self.enter_visible_face(face, None)];

        while let Some(frame) = stack.last_mut() {
            if frame.pos == frame.len {
                stack.pop();
                continue;
            }
            let edge = frame.edges[frame.pos];
            frame.pos += 1;

            let twin = match self.mesh.edge(edge).twin {
                Some(twin) => twin,
                None => continue,
            };
            let opposite = self.mesh.edge(twin).face;
            if !self.mesh.face(opposite).is_visible() {
                continue;
            }
            if self.mesh.distance_to_point(opposite, eye) > self.tolerance {
                let next = self.enter_visible_face(opposite, Some(twin));
                stack.push(next);
            } else {
                horizon.push(edge);
            }
        }
        horizon
    }

    /// Deletes `face` and lists the edges still to be crossed from it: all
    /// three for the starting face, otherwise the two after `entry`.
    fn enter_visible_face(&mut self, face: FaceId, entry: Option<EdgeId>) -> HorizonFrame {
        self.delete_face_vertices(face);
        self.mesh.face_mut(face).mark = FaceMark::Deleted;

        match entry {
            None => HorizonFrame {
                edges: self.mesh.face_edges(face),
                len: 3,
                pos: 0,
            },
            Some(entry) => {
                let first = self.mesh.edge(entry).next;
                let second = self.mesh.edge(first).next;
                HorizonFrame {
                    edges: [first, second, entry],
                    len: 2,
                    pos: 0,
                }
            }
        }
    }

    /// Creates the face `eye, tail, head` over a horizon edge and joins its
    /// last edge to the horizon edge's twin. Returns the edge ending at `eye`.
    fn add_adjoining_face(&mut self, eye: VertexId, horizon_edge: EdgeId) -> EdgeId {
        let tail = self.mesh.tail(horizon_edge);
        let head = self.mesh.head(horizon_edge);
        let face = self.mesh.create_face(&self.vertices, eye, tail, head);
        self.faces.push(face);

        if let Some(twin) = self.mesh.edge(horizon_edge).twin {
            let closing = self.mesh.get_edge(face, -1);
            self.mesh.set_twin(closing, twin);
        }
        self.mesh.get_edge(face, 0)
    }

    fn add_new_faces(&mut self, eye: VertexId, horizon: &[EdgeId]) {
        self.new_faces.clear();

        let mut first_side_edge: Option<EdgeId> = None;
        let mut previous_side_edge: Option<EdgeId> = None;
        for &horizon_edge in horizon {
            let side_edge = self.add_adjoining_face(eye, horizon_edge);
            match previous_side_edge {
                Some(previous) => {
                    let next = self.mesh.edge(side_edge).next;
                    self.mesh.set_twin(next, previous);
                }
                None => first_side_edge = Some(side_edge),
            }
            self.new_faces.push(self.mesh.edge(side_edge).face);
            previous_side_edge = Some(side_edge);
        }

        if let (Some(first), Some(last)) = (first_side_edge, previous_side_edge) {
            let next = self.mesh.edge(first).next;
            self.mesh.set_twin(next, last);
        }
    }

    /// The farthest outside vertex of the first face that has any.
    fn next_vertex_to_add(&self) -> Option<VertexId> {
        let first = self.assigned.first()?;
        let eye_face = self.vertices[first].face?;
        let face = self.mesh.face(eye_face);

        let mut max_distance = 0.0;
        let mut eye = None;
        let mut cursor = face.outside;
        while let Some(vertex) = cursor {
            let node = &self.vertices[vertex];
            if node.face != Some(eye_face) {
                break;
            }
            let distance = face.distance_to_point(&node.point);
            if distance > max_distance {
                max_distance = distance;
                eye = Some(vertex);
            }
            cursor = node.next;
        }
        eye
    }

    fn add_vertex_to_hull(&mut self, eye: VertexId) {
        self.unassigned.clear();

        let face = match self.vertices[eye].face {
            Some(face) => face,
            None => return,
        };
        self.remove_vertex_from_face(eye, face);

        let point = self.vertices[eye].point;
        let horizon = self.compute_horizon(&point, face);
        self.add_new_faces(eye, &horizon);
        trace!(
            vertex = eye.index(),
            horizon = horizon.len(),
            "added vertex to hull"
        );

        self.resolve_unassigned_points();
    }

    fn reindex_faces(&mut self) {
        let mesh = &self.mesh;
        self.faces.retain(|&face| mesh.face(face).is_visible());
    }

    /// Detaches whatever is still in the assigned list, which is only
    /// non-empty after stopping at the iteration limit.
    fn cleanup(&mut self) {
        let mut cursor = self.assigned.first();
        while let Some(vertex) = cursor {
            let node = &mut self.vertices[vertex];
            cursor = node.next.take();
            node.prev = None;
            if let Some(face) = node.face.take() {
                self.mesh.face_mut(face).outside = None;
            }
        }
        self.assigned.clear();
        self.unassigned.clear();
        self.new_faces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng as _};

    fn cloud(seed: u64, count: usize) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                Point::new(
                    rng.gen_range(-1.0, 1.0),
                    rng.gen_range(-1.0, 1.0),
                    rng.gen_range(-1.0, 1.0),
                )
            })
            .collect()
    }

    fn load(points: &[Point]) -> ConvexHull {
        let mut hull = ConvexHull::new();
        for &p in points {
            hull.vertices.push(p);
        }
        hull
    }

    /// Walks the assigned list and checks that each face owns one contiguous
    /// run headed by `Face::outside`, made of vertices outside that face.
    fn check_assigned_runs(hull: &ConvexHull) -> usize {
        let mut seen = Vec::new();
        let mut previous_face = None;
        let mut count = 0;
        for vertex in hull.assigned.iter(&hull.vertices) {
            let face = hull.vertices[vertex].face.expect("assigned vertex has a face");
            if previous_face != Some(face) {
                assert!(!seen.contains(&face), "run of {:?} is split", face);
                assert_eq!(hull.mesh.face(face).outside, Some(vertex));
                seen.push(face);
                previous_face = Some(face);
            }
            assert!(hull.mesh.face(face).is_visible());
            let distance = hull
                .mesh
                .distance_to_point(face, &hull.vertices[vertex].point);
            assert!(distance > hull.tolerance);
            count += 1;
        }
        for id in hull.vertices.ids() {
            let in_list = hull.assigned.iter(&hull.vertices).any(|v| v == id);
            assert_eq!(hull.vertices[id].face.is_some(), in_list);
        }
        count
    }

    #[test]
    fn tolerance_scales_with_extent() {
        let mut hull = load(&[
            Point::new(-4.0, 0.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
            Point::new(0.0, -3.0, 5.0),
            Point::new(1.0, 1.0, -1.0),
        ]);
        let (min, max) = hull.compute_extremes();
        assert_eq!(min.map(VertexId::index), [0, 2, 3]);
        assert_eq!(max.map(VertexId::index), [1, 1, 2]);
        assert_eq!(hull.tolerance, 3.0 * f64::EPSILON * (4.0 + 3.0 + 5.0));
    }

    #[test]
    fn initial_hull_partitions_outside_vertices() {
        let mut hull = load(&cloud(11, 200));
        hull.compute_initial_hull().unwrap();
        assert_eq!(hull.faces.len(), 4);
        assert!(check_assigned_runs(&hull) > 0);

        for &face in &hull.faces {
            for edge in hull.mesh.face_edges(face) {
                let twin = hull.mesh.edge(edge).twin.unwrap();
                assert_eq!(hull.mesh.edge(twin).twin, Some(edge));
            }
        }
    }

    #[test]
    fn runs_stay_contiguous_while_iterating() {
        let mut hull = load(&cloud(5, 300));
        hull.compute_initial_hull().unwrap();

        let mut steps = 0;
        while let Some(eye) = hull.next_vertex_to_add() {
            let face = hull.vertices[eye].face.unwrap();
            let best = hull.mesh.distance_to_point(face, &hull.vertices[eye].point);
            let mut cursor = hull.mesh.face(face).outside;
            while let Some(v) = cursor {
                if hull.vertices[v].face != Some(face) {
                    break;
                }
                assert!(hull.mesh.distance_to_point(face, &hull.vertices[v].point) <= best);
                cursor = hull.vertices[v].next;
            }

            hull.add_vertex_to_hull(eye);
            assert!(hull.unassigned.is_empty());
            assert_eq!(hull.vertices[eye].face, None);
            check_assigned_runs(&hull);
            steps += 1;
        }
        assert!(steps > 0);
        hull.reindex_faces();
        assert!(hull.faces.iter().all(|&f| hull.mesh.face(f).is_visible()));
    }

    #[test]
    fn horizon_is_a_closed_loop() {
        let mut hull = load(&cloud(8, 120));
        hull.compute_initial_hull().unwrap();
        for _ in 0..10 {
            let eye = hull.next_vertex_to_add().unwrap();
            hull.add_vertex_to_hull(eye);
        }

        let eye = hull.next_vertex_to_add().unwrap();
        let face = hull.vertices[eye].face.unwrap();
        let point = hull.vertices[eye].point;
        hull.remove_vertex_from_face(eye, face);
        let horizon = hull.compute_horizon(&point, face);

        assert!(horizon.len() >= 3);
        for (i, &edge) in horizon.iter().enumerate() {
            let next = horizon[(i + 1) % horizon.len()];
            assert_eq!(hull.mesh.head(edge), hull.mesh.tail(next));
            let inner = hull.mesh.edge(edge).face;
            assert_eq!(hull.mesh.face(inner).mark, FaceMark::Deleted);
            let twin = hull.mesh.edge(edge).twin.unwrap();
            let outer = hull.mesh.edge(twin).face;
            assert!(hull.mesh.face(outer).is_visible());
            assert!(hull.mesh.distance_to_point(outer, &point) <= hull.tolerance);
        }
    }

    fn early_exit_case(factor: f64) -> (ConvexHull, FaceId, FaceId, VertexId) {
        let config = HullConfig::default().with_good_enough_factor(factor);
        let mut hull = ConvexHull::with_config(config);
        let corners: Vec<_> = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, -5.0),
            Point::new(1.0, 0.0, -5.0),
            Point::new(0.0, 1.0, -5.0),
        ]
        .iter()
        .map(|&p| hull.vertices.push(p))
        .collect();
        let eye = hull.vertices.push(Point::new(0.2, 0.2, 2.0));

        // Both faces point along +z: the eye is 2 above the first, 7 above
        // the second.
        let near = hull
            .mesh
            .create_face(&hull.vertices, corners[0], corners[1], corners[2]);
        let far = hull
            .mesh
            .create_face(&hull.vertices, corners[3], corners[4], corners[5]);
        hull.faces = vec![near, far];
        hull.new_faces = vec![near, far];
        hull.tolerance = 1e-3;

        hull.unassigned.append(&mut hull.vertices, eye);
        hull.resolve_unassigned_points();
        (hull, near, far, eye)
    }

    #[test]
    fn reassignment_stops_at_first_good_enough_face() {
        // 1000 tolerances is 1.0; the near face already beats it.
        let (hull, near, _, eye) = early_exit_case(1000.0);
        assert_eq!(hull.vertices[eye].face, Some(near));
        assert_eq!(hull.mesh.face(near).outside, Some(eye));
        assert!(hull.unassigned.is_empty());

        let (hull, near, far, eye) = early_exit_case(f64::INFINITY);
        assert_eq!(hull.vertices[eye].face, Some(far));
        assert_eq!(hull.mesh.face(far).outside, Some(eye));
        assert_eq!(hull.mesh.face(near).outside, None);
    }

    #[test]
    fn iteration_limit_detaches_leftover_vertices() {
        let mut points = Vec::new();
        for x in 0..12 {
            for y in 0..12 {
                for z in 0..12 {
                    if [x, y, z].iter().any(|&c| c == 0 || c == 11) {
                        points.push(Point::new(x as f64, y as f64, z as f64));
                    }
                }
            }
        }
        let mut hull = ConvexHull::with_config(HullConfig::default().with_max_iterations(2));
        hull.set_from_points(&points);
        assert!(!hull.is_empty());

        assert!(hull.assigned.is_empty());
        for &face in &hull.faces {
            assert_eq!(hull.mesh.face(face).outside(), None);
        }
        for id in hull.vertices.ids() {
            assert_eq!(hull.vertices[id].face(), None);
            assert_eq!(hull.vertices[id].next(), None);
        }
    }
}
