//! Text rendering of [`ScadNode`] trees.

use super::{Offset, ScadNode};
use crate::float_types::Real;
use crate::io::{IoError, ModelFile};
use nalgebra::{Point2, Point3};
use std::fmt::Write as _;

const INDENT: &str = "  ";

fn num(v: Real) -> String {
    // `-0` is valid OpenSCAD but noisy
    if v == 0.0 { "0".to_string() } else { v.to_string() }
}

fn vec2(p: &Point2<Real>) -> String {
    format!("[{}, {}]", num(p.x), num(p.y))
}

fn vec3(p: &Point3<Real>) -> String {
    format!("[{}, {}, {}]", num(p.x), num(p.y), num(p.z))
}

fn list<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
    format!("[{}]", items.iter().map(f).collect::<Vec<_>>().join(", "))
}

fn header(node: &ScadNode) -> String {
    match node {
        ScadNode::Circle { diameter, segments } => {
            format!("circle(d = {}, $fn = {segments});", num(*diameter))
        },
        ScadNode::RegularPolygon { circumradius, sides } => {
            format!("circle(r = {}, $fn = {sides});", num(*circumradius))
        },
        ScadNode::Square { size } => format!("square([{}, {}]);", num(size.x), num(size.y)),
        ScadNode::Polygon { points } => format!("polygon(points = {});", list(points, vec2)),
        ScadNode::Cube { size } => format!("cube([{}, {}, {}]);", num(size.x), num(size.y), num(size.z)),
        ScadNode::Polyhedron { points, faces } => {
            // OpenSCAD expects clockwise faces seen from outside
            let faces = list(faces, |face| {
                let reversed: Vec<usize> = face.iter().rev().copied().collect();
                list(&reversed, |i| i.to_string())
            });
            format!(
                "polyhedron(points = {}, faces = {});",
                list(points, vec3),
                faces
            )
        },
        ScadNode::LinearExtrude { height, .. } => format!("linear_extrude(height = {})", num(*height)),
        ScadNode::RotateExtrude { segments, .. } => format!("rotate_extrude($fn = {segments})"),
        ScadNode::Offset {
            offset: Offset::Radius(r),
            ..
        } => format!("offset(r = {})", num(*r)),
        ScadNode::Offset {
            offset: Offset::Delta(d),
            ..
        } => format!("offset(delta = {})", num(*d)),
        ScadNode::Translate { offset, .. } => {
            format!("translate([{}, {}, {}])", num(offset.x), num(offset.y), num(offset.z))
        },
        ScadNode::MultMatrix { matrix, .. } => {
            let rows: Vec<String> = matrix
                .row_iter()
                .map(|row| format!("[{}]", row.iter().map(|v| num(*v)).collect::<Vec<_>>().join(", ")))
                .collect();
            format!("multmatrix([{}])", rows.join(", "))
        },
        ScadNode::Hull(_) => "hull()".to_string(),
        ScadNode::Union(_) => "union()".to_string(),
        ScadNode::Difference(_) => "difference()".to_string(),
    }
}

fn write_node(out: &mut String, node: &ScadNode, depth: usize) {
    let pad = INDENT.repeat(depth);
    let children: Vec<&ScadNode> = match node {
        ScadNode::LinearExtrude { child, .. }
        | ScadNode::RotateExtrude { child, .. }
        | ScadNode::Offset { child, .. }
        | ScadNode::Translate { child, .. }
        | ScadNode::MultMatrix { child, .. } => vec![child.as_ref()],
        ScadNode::Hull(children) | ScadNode::Union(children) | ScadNode::Difference(children) => {
            children.iter().map(|c| c.as_ref()).collect()
        },
        _ => {
            let _ = writeln!(out, "{pad}{}", header(node));
            return;
        },
    };

    let _ = writeln!(out, "{pad}{} {{", header(node));
    for child in children {
        write_node(out, child, depth + 1);
    }
    let _ = writeln!(out, "{pad}}}");
}

/// Renders a tree as OpenSCAD source. The output only depends on the tree,
/// so equal trees render to identical text.
pub fn to_scad(node: &ScadNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

/// OpenSCAD source writer.
#[derive(Debug, Clone, Copy)]
pub struct ScadFile<'a> {
    pub root: &'a ScadNode,
}

impl ModelFile for ScadFile<'_> {
    fn extension(&self) -> &'static str {
        "scad"
    }

    fn to_bytes(&self, name: &str) -> Result<Vec<u8>, IoError> {
        let mut text = format!("// {name}\n");
        text.push_str(&to_scad(self.root));
        Ok(text.into_bytes())
    }
}
