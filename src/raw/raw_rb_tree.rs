use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::{ColorFlips, Distance};

/// The core red-black tree backing `RbTreeMap`.
///
/// Absent children and the parent of the root are `Handle::NIL`. The sentinel is
/// black, has no key and no children; only its parent link is ever written, by
/// `transplant` during removal, so the delete fixup can climb from an empty slot.
pub(crate) struct RawRbTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes so rotations touch less memory).
    values: Arena<V>,
    /// Root node, or `NIL` when the tree is empty.
    root: Handle,
    /// Parent link of the sentinel.
    nil_parent: Handle,
}

/// Nodes visited by a nearest-key probe that tie for the smallest distance.
pub(crate) type Nearest = SmallVec<[Handle; 2]>;

impl<K, V> RawRbTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: Handle::NIL,
            nil_parent: Handle::NIL,
        }
    }

    /// Creates a new tree with the specified capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: Handle::NIL,
            nil_parent: Handle::NIL,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = Handle::NIL;
        self.nil_parent = Handle::NIL;
    }

    /// Returns the root node, `NIL` if empty.
    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    // ─── Node accessors (sentinel aware) ─────────────────────────────────────

    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.nodes.get(handle).key
    }

    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(self.nodes.get(handle).value)
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.nodes.get(handle).value;
        self.values.get_mut(value)
    }

    pub(crate) fn color(&self, handle: Handle) -> Color {
        if handle.is_nil() {
            Color::Black
        } else {
            self.nodes.get(handle).color
        }
    }

    pub(crate) fn parent(&self, handle: Handle) -> Handle {
        if handle.is_nil() {
            self.nil_parent
        } else {
            self.nodes.get(handle).parent
        }
    }

    pub(crate) fn child(&self, handle: Handle, side: Side) -> Handle {
        if handle.is_nil() {
            Handle::NIL
        } else {
            self.nodes.get(handle).child(side)
        }
    }

    pub(crate) fn left(&self, handle: Handle) -> Handle {
        self.child(handle, Side::Left)
    }

    pub(crate) fn right(&self, handle: Handle) -> Handle {
        self.child(handle, Side::Right)
    }

    fn set_parent(&mut self, handle: Handle, parent: Handle) {
        if handle.is_nil() {
            self.nil_parent = parent;
        } else {
            self.nodes.get_mut(handle).parent = parent;
        }
    }

    fn set_child(&mut self, handle: Handle, side: Side, child: Handle) {
        debug_assert!(!handle.is_nil(), "the sentinel has no children");
        self.nodes.get_mut(handle).set_child(side, child);
    }

    /// Repaints a node, counting the change only if the color actually toggles.
    fn paint(&mut self, handle: Handle, color: Color, flips: &mut ColorFlips) {
        if handle.is_nil() {
            debug_assert_eq!(color, Color::Black, "the sentinel is always black");
            return;
        }
        let node = self.nodes.get_mut(handle);
        if node.color != color {
            node.color = color;
            flips.record();
        }
    }

    /// The side of its parent that a non-root node hangs from.
    fn side_of(&self, handle: Handle) -> Side {
        if self.left(self.parent(handle)) == handle {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Leftmost node of the subtree rooted at `handle`.
    pub(crate) fn minimum(&self, mut handle: Handle) -> Handle {
        while !self.left(handle).is_nil() {
            handle = self.left(handle);
        }
        handle
    }

    /// Rightmost node of the subtree rooted at `handle`.
    pub(crate) fn maximum(&self, mut handle: Handle) -> Handle {
        while !self.right(handle).is_nil() {
            handle = self.right(handle);
        }
        handle
    }

    // ─── Rotations ───────────────────────────────────────────────────────────

    /// Rotates around `pivot` towards `side`: the opposite child takes `pivot`'s place
    /// and `pivot` becomes its `side` child.
    fn rotate(&mut self, pivot: Handle, side: Side) {
        let riser = self.child(pivot, side.opposite());
        debug_assert!(!riser.is_nil(), "rotation needs a child on the rising side");

        let inner = self.child(riser, side);
        self.set_child(pivot, side.opposite(), inner);
        if !inner.is_nil() {
            self.set_parent(inner, pivot);
        }

        let parent = self.parent(pivot);
        self.set_parent(riser, parent);
        if parent.is_nil() {
            self.root = riser;
        } else {
            let pivot_side = self.side_of(pivot);
            self.set_child(parent, pivot_side, riser);
        }

        self.set_child(riser, side, pivot);
        self.set_parent(pivot, riser);
        tracing::trace!(?side, "rotated subtree");
    }

    // ─── Insertion ───────────────────────────────────────────────────────────

    /// Restores the red-black invariants after `node` was attached as a red leaf.
    fn insert_fixup(&mut self, mut node: Handle, flips: &mut ColorFlips) {
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                self.paint(parent, Color::Black, flips);
                self.paint(uncle, Color::Black, flips);
                self.paint(grandparent, Color::Red, flips);
                node = grandparent;
            } else {
                if node == self.child(parent, side.opposite()) {
                    // Inner grandchild: straighten the zig-zag first.
                    node = parent;
                    self.rotate(node, side);
                }
                let parent = self.parent(node);
                let grandparent = self.parent(parent);
                self.paint(parent, Color::Black, flips);
                self.paint(grandparent, Color::Red, flips);
                self.rotate(grandparent, side.opposite());
            }
        }
        self.paint(self.root, Color::Black, flips);
    }

    // ─── Removal ─────────────────────────────────────────────────────────────

    /// Replaces the subtree rooted at `old` with the one rooted at `new`.
    fn transplant(&mut self, old: Handle, new: Handle) {
        let parent = self.parent(old);
        if parent.is_nil() {
            self.root = new;
        } else {
            let side = self.side_of(old);
            self.set_child(parent, side, new);
        }
        self.set_parent(new, parent);
    }

    /// Removes `node` from the tree and frees it, returning its key and value.
    fn remove_node(&mut self, node: Handle) -> (K, V, ColorFlips) {
        let mut flips = ColorFlips::default();
        let mut removed_color = self.color(node);
        let carrier;

        if self.left(node).is_nil() {
            carrier = self.right(node);
            self.transplant(node, carrier);
        } else if self.right(node).is_nil() {
            carrier = self.left(node);
            self.transplant(node, carrier);
        } else {
            let successor = self.minimum(self.right(node));
            removed_color = self.color(successor);
            carrier = self.right(successor);

            if self.parent(successor) == node {
                self.set_parent(carrier, successor);
            } else {
                self.transplant(successor, carrier);
                let right = self.right(node);
                self.set_child(successor, Side::Right, right);
                self.set_parent(right, successor);
            }

            self.transplant(node, successor);
            let left = self.left(node);
            self.set_child(successor, Side::Left, left);
            self.set_parent(left, successor);
            // The successor takes over the slot and its color; this is not a fixup toggle.
            let color = self.color(node);
            self.nodes.get_mut(successor).color = color;
        }

        if removed_color == Color::Black {
            self.delete_fixup(carrier, &mut flips);
        }
        self.nil_parent = Handle::NIL;

        let Node { key, value, .. } = self.nodes.take(node);
        let value = self.values.take(value);
        (key, value, flips)
    }

    /// Pushes the extra black carried by `node` up the tree until it can be absorbed.
    fn delete_fixup(&mut self, mut node: Handle, flips: &mut ColorFlips) {
        while node != self.root && self.color(node) == Color::Black {
            let parent = self.parent(node);
            // A NIL carrier always has a non-NIL sibling, so comparing against the left
            // slot identifies its side even when both are the sentinel handle.
            let side = if self.left(parent) == node { Side::Left } else { Side::Right };
            let mut sibling = self.child(parent, side.opposite());

            if self.color(sibling) == Color::Red {
                self.paint(sibling, Color::Black, flips);
                self.paint(parent, Color::Red, flips);
                self.rotate(parent, side);
                sibling = self.child(parent, side.opposite());
            }

            if self.color(self.left(sibling)) == Color::Black && self.color(self.right(sibling)) == Color::Black {
                self.paint(sibling, Color::Red, flips);
                node = parent;
            } else {
                if self.color(self.child(sibling, side.opposite())) == Color::Black {
                    let near = self.child(sibling, side);
                    self.paint(near, Color::Black, flips);
                    self.paint(sibling, Color::Red, flips);
                    self.rotate(sibling, side.opposite());
                    sibling = self.child(parent, side.opposite());
                }
                let parent_color = self.color(parent);
                self.paint(sibling, parent_color, flips);
                self.paint(parent, Color::Black, flips);
                let far = self.child(sibling, side.opposite());
                self.paint(far, Color::Black, flips);
                self.rotate(parent, side);
                node = self.root;
            }
        }
        self.paint(node, Color::Black, flips);
    }
}

impl<K: Ord, V> RawRbTree<K, V> {
    /// Searches for a key and returns its node handle if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while !current.is_nil() {
            match key.cmp(self.key(current).borrow()) {
                Ordering::Less => current = self.left(current),
                Ordering::Greater => current = self.right(current),
                Ordering::Equal => return Some(current),
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.value(handle))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.value_mut(handle))
    }

    /// Inserts a new key. An existing key is left untouched and the pair is handed back.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<ColorFlips, (K, V)> {
        let mut parent = Handle::NIL;
        let mut side = Side::Left;
        let mut current = self.root;

        while !current.is_nil() {
            parent = current;
            match key.cmp(self.key(current)) {
                Ordering::Less => side = Side::Left,
                Ordering::Greater => side = Side::Right,
                Ordering::Equal => return Err((key, value)),
            }
            current = self.child(current, side);
        }

        let value = self.values.alloc(value);
        let node = self.nodes.alloc(Node::new_red(key, value, parent));
        if parent.is_nil() {
            self.root = node;
        } else {
            self.set_child(parent, side, node);
        }

        let mut flips = ColorFlips::default();
        self.insert_fixup(node, &mut flips);
        Ok(flips)
    }

    /// Removes a key, returning the stored key, value and the fixup's flip count.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V, ColorFlips)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.search(key)?;
        Some(self.remove_node(node))
    }

    /// Collects, in ascending order, every node with `low <= key <= high`.
    ///
    /// Subtrees that cannot hold a match are never entered.
    pub(crate) fn range<Q>(&self, low: &Q, high: &Q) -> Vec<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut out = Vec::new();
        if low <= high {
            self.collect_range(self.root, low, high, &mut out);
        }
        out
    }

    fn collect_range<Q>(&self, handle: Handle, low: &Q, high: &Q, out: &mut Vec<Handle>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if handle.is_nil() {
            return;
        }
        let key = self.key(handle).borrow();
        if low < key {
            self.collect_range(self.left(handle), low, high, out);
        }
        if low <= key && key <= high {
            out.push(handle);
        }
        if high > key {
            self.collect_range(self.right(handle), low, high, out);
        }
    }
}

impl<K: Ord + Distance, V> RawRbTree<K, V> {
    /// Probes the search path of `target` and keeps every node at the smallest distance.
    ///
    /// Only one root-to-leaf path is visited. Ties come back in visit order.
    pub(crate) fn nearest(&self, target: &K) -> Nearest {
        let mut best = Nearest::new();
        let mut best_distance = u64::MAX;
        let mut current = self.root;

        while !current.is_nil() {
            let key = self.key(current);
            let distance = target.distance(key);
            if best.is_empty() || distance < best_distance {
                best.clear();
                best.push(current);
                best_distance = distance;
            } else if distance == best_distance {
                best.push(current);
            }

            current = if key < target { self.right(current) } else { self.left(current) };
        }
        best
    }
}
