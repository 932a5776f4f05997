use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// Red-black node: the key plus topology. The value lives in a separate arena.
pub(crate) struct Node<K> {
    pub(super) key: K,
    pub(super) value: Handle,
    pub(super) color: Color,
    pub(super) parent: Handle,
    pub(super) left: Handle,
    pub(super) right: Handle,
}

impl<K> Node<K> {
    /// Creates a detached red node, the color every insertion starts with.
    pub(crate) const fn new_red(key: K, value: Handle, parent: Handle) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Handle {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}
