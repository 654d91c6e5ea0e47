//! Vertex arena and the intrusive doubly-linked lists threaded through it.
//!
//! Every input point becomes one [`VertexNode`] in a [`VertexRegistry`]. The
//! hull keeps two [`VertexList`]s over the same arena: the *assigned* list,
//! holding every vertex that is still outside some face, and a scratch
//! *unassigned* list used while faces are being replaced. A node is linked
//! into at most one list at a time.

use std::ops::{Index, IndexMut};

use crate::half_edge::FaceId;
use crate::Point;

/// Handle of a vertex in a [`VertexRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the vertex in the registry, which is also the index of the
    /// input point it wraps.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One input point plus its list links and the face that sees it.
#[derive(Debug, Clone)]
pub struct VertexNode {
    pub point: Point,
    pub(crate) prev: Option<VertexId>,
    pub(crate) next: Option<VertexId>,
    pub(crate) face: Option<FaceId>,
}

impl VertexNode {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            prev: None,
            next: None,
            face: None,
        }
    }

    /// The face this vertex is outside of, while it sits in the assigned list.
    #[inline]
    pub fn face(&self) -> Option<FaceId> {
        self.face
    }

    #[inline]
    pub fn next(&self) -> Option<VertexId> {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> Option<VertexId> {
        self.prev
    }
}

/// Arena owning every [`VertexNode`] of a hull computation.
#[derive(Debug, Clone, Default)]
pub struct VertexRegistry {
    nodes: Vec<VertexNode>,
}

impl VertexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) -> VertexId {
        let id = VertexId::new(self.nodes.len());
        self.nodes.push(VertexNode::new(point));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.nodes.len()).map(VertexId::new)
    }
}

impl Index<VertexId> for VertexRegistry {
    type Output = VertexNode;

    #[inline]
    fn index(&self, id: VertexId) -> &VertexNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<VertexId> for VertexRegistry {
    #[inline]
    fn index_mut(&mut self, id: VertexId) -> &mut VertexNode {
        &mut self.nodes[id.0]
    }
}

/// Intrusive doubly-linked list of vertices stored in a [`VertexRegistry`].
///
/// The list only records its ends; the links live in the nodes, so every
/// mutating operation takes the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexList {
    head: Option<VertexId>,
    tail: Option<VertexId>,
}

impl VertexList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn first(&self) -> Option<VertexId> {
        self.head
    }

    #[inline]
    pub fn last(&self) -> Option<VertexId> {
        self.tail
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Forgets the list's contents. Nodes keep stale links until they are
    /// linked somewhere else.
    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
    }

    /// Links `vertex` in front of `target`, which must be in this list.
    pub fn insert_before(&mut self, nodes: &mut VertexRegistry, target: VertexId, vertex: VertexId) {
        let prev = nodes[target].prev;
        nodes[vertex].prev = prev;
        nodes[vertex].next = Some(target);
        match prev {
            Some(p) => nodes[p].next = Some(vertex),
            None => self.head = Some(vertex),
        }
        nodes[target].prev = Some(vertex);
    }

    /// Links `vertex` behind `target`, which must be in this list.
    pub fn insert_after(&mut self, nodes: &mut VertexRegistry, target: VertexId, vertex: VertexId) {
        let next = nodes[target].next;
        nodes[vertex].prev = Some(target);
        nodes[vertex].next = next;
        match next {
            Some(n) => nodes[n].prev = Some(vertex),
            None => self.tail = Some(vertex),
        }
        nodes[target].next = Some(vertex);
    }

    pub fn append(&mut self, nodes: &mut VertexRegistry, vertex: VertexId) {
        match self.tail {
            Some(t) => nodes[t].next = Some(vertex),
            None => self.head = Some(vertex),
        }
        nodes[vertex].prev = self.tail;
        nodes[vertex].next = None;
        self.tail = Some(vertex);
    }

    /// Splices a detached chain starting at `start` onto the end of the list.
    pub fn append_chain(&mut self, nodes: &mut VertexRegistry, start: VertexId) {
        match self.tail {
            Some(t) => nodes[t].next = Some(start),
            None => self.head = Some(start),
        }
        nodes[start].prev = self.tail;

        let mut end = start;
        while let Some(next) = nodes[end].next {
            end = next;
        }
        self.tail = Some(end);
    }

    pub fn remove(&mut self, nodes: &mut VertexRegistry, vertex: VertexId) {
        let prev = nodes[vertex].prev;
        let next = nodes[vertex].next;
        match prev {
            Some(p) => nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => nodes[n].prev = prev,
            None => self.tail = prev,
        }
        nodes[vertex].prev = None;
        nodes[vertex].next = None;
    }

    /// Unlinks the run `a..=b`. The run stays chained internally and is
    /// detached at both ends, ready for [`append_chain`](Self::append_chain).
    pub fn remove_sub_list(&mut self, nodes: &mut VertexRegistry, a: VertexId, b: VertexId) {
        let prev = nodes[a].prev;
        let next = nodes[b].next;
        match prev {
            Some(p) => nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => nodes[n].prev = prev,
            None => self.tail = prev,
        }
        nodes[a].prev = None;
        nodes[b].next = None;
    }

    /// Unlinks and returns the first vertex.
    pub fn pop_front(&mut self, nodes: &mut VertexRegistry) -> Option<VertexId> {
        let first = self.head?;
        self.remove(nodes, first);
        Some(first)
    }

    pub fn iter<'a>(&self, nodes: &'a VertexRegistry) -> Iter<'a> {
        Iter {
            nodes,
            cursor: self.head,
        }
    }
}

/// Front-to-back iterator over a [`VertexList`].
pub struct Iter<'a> {
    nodes: &'a VertexRegistry,
    cursor: Option<VertexId>,
}

impl Iterator for Iter<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        let current = self.cursor?;
        self.cursor = self.nodes[current].next;
        Some(current)
    }
}
