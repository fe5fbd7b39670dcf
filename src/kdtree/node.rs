use crate::r#type::IndexableNum;

/// Which child of a node a point descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    /// Points less than or equal to the node's coordinate on the split axis go left.
    #[inline]
    pub(crate) fn of<N: IndexableNum>(coord: N, split: N) -> Self {
        if coord <= split {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// The axis following `axis`, wrapping at `D`.
#[inline]
pub(crate) fn next_axis<const D: usize>(axis: usize) -> usize {
    let next = axis + 1;
    if next >= D {
        0
    } else {
        next
    }
}

/// A stored point and the subtree below it.
///
/// Each node exclusively owns its children.
#[derive(Debug)]
pub(crate) struct Node<N: IndexableNum, const D: usize, V> {
    pub(crate) point: [N; D],
    pub(crate) value: V,
    pub(crate) children: [Option<Box<Node<N, D, V>>>; 2],
}

impl<N: IndexableNum, const D: usize, V> Node<N, D, V> {
    pub(crate) fn new(point: [N; D], value: V) -> Box<Self> {
        Box::new(Self {
            point,
            value,
            children: [None, None],
        })
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<&Node<N, D, V>> {
        self.children[side as usize].as_deref()
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<Box<Node<N, D, V>>> {
        &mut self.children[side as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<&Node<N, D, V>> {
        self.child(Side::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<&Node<N, D, V>> {
        self.child(Side::Right)
    }

    /// The side `point` falls on when this node splits along `axis`.
    #[inline]
    pub(crate) fn side_of(&self, point: &[N; D], axis: usize) -> Side {
        Side::of(point[axis], self.point[axis])
    }

    /// Detach both children, returning them in `[left, right]` order.
    #[inline]
    pub(crate) fn take_children(&mut self) -> [Option<Box<Node<N, D, V>>>; 2] {
        [self.children[0].take(), self.children[1].take()]
    }
}
