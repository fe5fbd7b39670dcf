//! Utilities to traverse the KdTree structure.

use std::fmt;
use std::iter::FusedIterator;

use crate::kdtree::node::Node;
use crate::kdtree::KdTree;
use crate::r#type::IndexableNum;

/// An iterator over the points and values of a [`KdTree`].
///
/// The root comes first. After that, pending left children are always drained before pending
/// right children. Every point is visited exactly once; no other ordering is guaranteed.
#[derive(Debug, Clone)]
pub struct Iter<'a, N: IndexableNum, const D: usize, V> {
    left: Vec<&'a Node<N, D, V>>,
    right: Vec<&'a Node<N, D, V>>,
    remaining: usize,
}

impl<'a, N: IndexableNum, const D: usize, V> Iterator for Iter<'a, N, D, V> {
    type Item = (&'a [N; D], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.left.pop().or_else(|| self.right.pop())?;
        self.left.extend(node.left());
        self.right.extend(node.right());
        self.remaining -= 1;
        Some((&node.point, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<N: IndexableNum, const D: usize, V> ExactSizeIterator for Iter<'_, N, D, V> {}

impl<N: IndexableNum, const D: usize, V> FusedIterator for Iter<'_, N, D, V> {}

impl<N: IndexableNum, const D: usize, V, M> KdTree<N, D, V, M> {
    /// Iterate over every stored `(point, value)` pair.
    pub fn iter(&self) -> Iter<'_, N, D, V> {
        Iter {
            left: self.root.as_deref().into_iter().collect(),
            right: vec![],
            remaining: self.count,
        }
    }
}

impl<'a, N: IndexableNum, const D: usize, V, M> IntoIterator for &'a KdTree<N, D, V, M> {
    type Item = (&'a [N; D], &'a V);
    type IntoIter = Iter<'a, N, D, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Dumps the tree as indented text, one node per line.
///
/// A node line holds its coordinates and then its value, separated by tabs. Below it come an
/// `L ` and an `R ` line for its children, indented one tab deeper than their parent; an absent
/// child leaves its line empty after the marker.
impl<N, const D: usize, V, M> fmt::Display for KdTree<N, D, V, M>
where
    N: IndexableNum + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // (node, depth, side marker)
        let mut stack: Vec<(Option<&Node<N, D, V>>, usize, &str)> =
            vec![(self.root.as_deref(), 0, "")];

        while let Some((node, depth, marker)) = stack.pop() {
            if !marker.is_empty() {
                for _ in 0..depth {
                    f.write_str("\t")?;
                }
                f.write_str(marker)?;
            }

            match node {
                Some(node) => {
                    for coord in &node.point {
                        write!(f, "{}\t", coord)?;
                    }
                    writeln!(f, "{}", node.value)?;
                    stack.push((node.right(), depth + 1, "R "));
                    stack.push((node.left(), depth + 1, "L "));
                }
                None if depth > 0 => writeln!(f)?,
                None => {}
            }
        }

        Ok(())
    }
}
