//! Indented text rendering of a [`KdTree`].
//!
//! One line per node, indented with one tab per level. Children are introduced by `left : `
//! or `right : `, and coordinates are separated by single spaces:
//!
//! ```text
//! 7 2
//! 	left : 5 4
//! 		left : 2 3
//! 		right : 4 7
//! 	right : 9 6
//! 		left : 8 1
//! ```

use std::fmt::{self, Display, Write};

use crate::kd_tree::{KdTree, Side};

/// Renders `tree` as indented text. An empty tree renders as an empty string.
pub fn render_tree<T: Display>(tree: &KdTree<T>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(tree, &mut out);
    out
}

fn write_tree<T: Display, W: Write>(tree: &KdTree<T>, out: &mut W) -> fmt::Result {
    for visit in tree.pre_order() {
        for _ in 0..visit.depth {
            out.write_char('\t')?;
        }
        match visit.side {
            Some(Side::Left) => out.write_str("left : ")?,
            Some(Side::Right) => out.write_str("right : ")?,
            None => {}
        }
        let point = tree.node(visit.id).point();
        for (axis, coordinate) in point.iter().enumerate() {
            if axis > 0 {
                out.write_char(' ')?;
            }
            write!(out, "{coordinate}")?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

impl<T: Display> Display for KdTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(self, f)
    }
}
