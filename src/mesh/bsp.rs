//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree node structure and operations
//!
//! All traversals use explicit stacks; thread meshes produce trees far deeper
//! than the call stack allows.

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Splitting plane for this node, or `None` for an empty leaf.
    pub plane: Option<Plane>,
    pub front: Option<Box<Node>>,
    pub back: Option<Box<Node>>,
    /// Polygons lying on `plane`.
    pub polygons: Vec<Polygon>,
}

impl Node {
    pub const fn new() -> Self {
        Node {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut node = Self::new();
        node.build(polygons);
        node
    }

    /// Turns the solid inside out.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
            stack.extend(node.front.as_deref_mut());
            stack.extend(node.back.as_deref_mut());
        }
    }

    /// Samples a few candidate planes and keeps the one cutting the fewest
    /// polygons while keeping the tree balanced.
    fn pick_splitting_plane(polygons: &[Polygon]) -> Plane {
        const K_SPANS: Real = 8.0;
        const K_BALANCE: Real = 1.0;

        let mut best_plane = polygons[0].plane;
        let mut best_score = Real::MAX;
        for candidate in polygons.iter().take(20) {
            let plane = &candidate.plane;
            let (mut front, mut back, mut spanning) = (0i64, 0i64, 0i64);
            for polygon in polygons {
                match plane.classify_polygon(polygon) {
                    COPLANAR => {},
                    FRONT => front += 1,
                    BACK => back += 1,
                    _ => spanning += 1,
                }
            }
            let score = K_SPANS * spanning as Real + K_BALANCE * ((front - back) as Real).abs();
            if score < best_score {
                best_score = score;
                best_plane = *plane;
            }
        }
        best_plane
    }

    /// Removes every part of `polygons` that lies inside this tree's solid.
    pub fn clip_polygons(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front = Vec::with_capacity(polys.len());
            let mut back = Vec::with_capacity(polys.len());
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                front.extend(coplanar_front);
                front.extend(front_parts);
                back.extend(coplanar_back);
                back.extend(back_parts);
            }

            match node.front.as_deref() {
                Some(child) if !front.is_empty() => stack.push((child, front)),
                Some(_) => {},
                None => result.extend(front),
            }
            // polygons behind a leaf are inside the solid
            if let Some(child) = node.back.as_deref() {
                if !back.is_empty() {
                    stack.push((child, back));
                }
            }
        }
        result
    }

    /// Removes every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &Node) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(&node.polygons);
            stack.extend(node.front.as_deref_mut());
            stack.extend(node.back.as_deref_mut());
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        result
    }

    /// Inserts `polygons` into the tree, splitting them where they cross
    /// existing planes.
    pub fn build(&mut self, polygons: &[Polygon]) {
        if polygons.is_empty() {
            return;
        }
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let plane = *node
                .plane
                .get_or_insert_with(|| Self::pick_splitting_plane(&polys));

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            if !front.is_empty() {
                let child: &mut Node = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child: &mut Node = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child, back));
            }
        }
    }
}
