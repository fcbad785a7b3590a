use std::convert::Infallible;
use std::fmt;
use std::ops::{Bound, Range, RangeBounds};
use std::sync::Arc;
use crate::error::RopeError;
use crate::iter::Chunks;
use crate::node::Node;
use crate::range::{check_range, range_from_numbers};
use crate::sequence::Sequence;

/// A persistent rope.
///
/// Ropes never change once they're built. [`Rope::concat`] and [`Rope::substr`] make new ropes
/// which share the nodes of their inputs instead of copying text, and cloning a rope is just an
/// `Arc` bump. Text is only copied when the rope is rendered.
///
/// Positions count chars for `Rope<str>` and elements for `Rope<[T]>`.
pub struct Rope<S: ?Sized + Sequence = str> {
    root: Arc<Node<S>>,
}

/// Literal values which can be wrapped as a single leaf with [`Rope::atom`].
pub trait IntoLeaf {
    type Seq: ?Sized + Sequence;

    fn into_leaf(self) -> <Self::Seq as ToOwned>::Owned;
}

impl IntoLeaf for &str {
    type Seq = str;
    fn into_leaf(self) -> String { self.to_string() }
}

impl IntoLeaf for String {
    type Seq = str;
    fn into_leaf(self) -> String { self }
}

impl<T: Clone> IntoLeaf for Vec<T> {
    type Seq = [T];
    fn into_leaf(self) -> Vec<T> { self }
}

impl<T: Clone> IntoLeaf for &[T] {
    type Seq = [T];
    fn into_leaf(self) -> Vec<T> { self.to_vec() }
}

impl<S: ?Sized + Sequence> Rope<S> {
    fn from_node(node: Node<S>) -> Self {
        Rope { root: Arc::new(node) }
    }

    /// Wrap a literal value as a rope with a single leaf.
    pub fn atom<V: IntoLeaf<Seq = S>>(value: V) -> Self {
        Self::from_node(Node::leaf(value.into_leaf()))
    }

    /// Join ropes end to end. The new rope shares each part's nodes.
    ///
    /// With no parts this makes an empty rope.
    pub fn concat<'a, I>(parts: I) -> Self
        where I: IntoIterator<Item = &'a Rope<S>>, S: 'a
    {
        Self::from_node(Node::concat(parts.into_iter().map(|r| r.root.clone()).collect()))
    }

    pub fn empty() -> Self {
        Self::from_node(Node::concat(Vec::new()))
    }

    /// A view of part of this rope. An unbounded end means "to the end of the rope".
    ///
    /// This never fails and never copies. The range is *not* checked against the rope here:
    /// a view which doesn't fit is only caught when a range is checked against it at render
    /// time, and rendering it unchecked yields whatever part of the view actually exists.
    /// Call [`Rope::validate`] to check eagerly.
    pub fn substr<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let begin = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&n) => n.saturating_add(1),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => self.len(),
        };

        Self::from_node(Node::substr(self.root.clone(), begin..end))
    }

    /// The number of positions in the rope. O(1).
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The root node, for inspecting how the rope was built.
    pub fn root(&self) -> &Arc<Node<S>> {
        &self.root
    }

    /// Do these two ropes share the same root node?
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.root, &b.root)
    }

    /// Render the whole rope.
    pub fn render(&self) -> S::Owned {
        self.root.render_unchecked(None)
    }

    /// Render positions `range.start..range.end`. The range must fit inside the rope.
    pub fn render_range(&self, range: Range<usize>) -> Result<S::Owned, RopeError> {
        self.root.render(Some(range))
    }

    /// Render a range given as plain numbers, as they come from JS and friends.
    ///
    /// Both numbers must be whole, and `0 <= begin <= end <= len`.
    pub fn render_numbers(&self, begin: f64, end: f64) -> Result<S::Owned, RopeError> {
        let range = range_from_numbers(begin, end, self.len())?;
        Ok(self.root.render_unchecked(Some(range)))
    }

    /// Iterate over the rope's literal fragments, in order.
    pub fn fragments(&self) -> Chunks<'_, S> {
        Chunks::new(&self.root, None)
    }

    /// Iterate over the literal fragments inside `range`. The range must fit inside the rope.
    pub fn fragments_in(&self, range: Range<usize>) -> Result<Chunks<'_, S>, RopeError> {
        check_range(&range, self.len())?;
        Ok(Chunks::new(&self.root, Some(range)))
    }

    /// Check the rope's internal invariants, panicking if any are broken.
    ///
    /// Every node's cached length is compared with the length recomputed from its contents.
    pub fn check(&self) {
        let result: Result<(), Infallible> = self.root.try_for_each_unique(|node| {
            assert_eq!(node.len(), node.structural_len(), "Cached node length is stale");
            Ok(())
        });
        if let Err(e) = result { match e {} }
    }

    /// Eagerly check that every substr view in the rope fits inside the node it views.
    ///
    /// Building a view never checks its range, so this is the way to find bad views up front.
    /// Returns the first bad view's range.
    pub fn validate(&self) -> Result<(), RopeError> {
        self.root.try_for_each_unique(|node| match node {
            Node::Substr(sub) => check_range(&sub.range(), sub.child().len()),
            _ => Ok(()),
        })
    }

    /// The longest path from the root to a leaf. An atom has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// The number of distinct nodes reachable from the root. Shared nodes count once.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let result: Result<(), Infallible> = self.root.try_for_each_unique(|_| {
            count += 1;
            Ok(())
        });
        if let Err(e) = result { match e {} }
        count
    }
}

impl<S: ?Sized + Sequence> Clone for Rope<S> {
    fn clone(&self) -> Self {
        Rope { root: self.root.clone() }
    }
}

impl<S: ?Sized + Sequence> Default for Rope<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ?Sized + Sequence> fmt::Debug for Rope<S> where S::Owned: fmt::Debug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rope")
            .field("len", &self.len())
            .field("root", &*self.root)
            .finish()
    }
}

impl fmt::Display for Rope<str> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.fragments() {
            f.write_str(s)?;
        }
        Ok(())
    }
}

impl<S: ?Sized + Sequence + PartialEq> PartialEq for Rope<S> {
    // Compare fragment by fragment, so neither rope gets rendered. Fragment boundaries won't
    // line up in general, so we walk both sides and compare the overlap each step.
    //
    // Only contents count. Cached lengths can overstate what an out of bounds view renders, so
    // they're no shortcut here. This agrees with comparing against the rendered str.
    fn eq(&self, other: &Rope<S>) -> bool {
        if Rope::ptr_eq(self, other) { return true; }

        let mut other_iter = other.fragments();
        let mut os: Option<(&S, usize)> = None;

        let mut iter = self.fragments();
        while let Some((mut s, mut s_len)) = iter.next_with_len() {
            while s_len > 0 {
                let (o, o_len) = match os.take().or_else(|| other_iter.next_with_len()) {
                    Some(next) => next,
                    None => return false,
                };

                let amt = s_len.min(o_len);
                if s.position_slice_counted(0..amt, s_len) != o.position_slice_counted(0..amt, o_len) {
                    return false;
                }

                s = s.position_slice_counted(amt..s_len, s_len);
                s_len -= amt;
                if amt < o_len {
                    os = Some((o.position_slice_counted(amt..o_len, o_len), o_len - amt));
                }
            }
        }

        os.is_none() && other_iter.next_with_len().is_none()
    }
}

impl<S: ?Sized + Sequence + Eq> Eq for Rope<S> {}

impl PartialEq<str> for Rope<str> {
    fn eq(&self, other: &str) -> bool {
        let mut rest = other;
        for s in self.fragments() {
            match rest.strip_prefix(s) {
                Some(r) => rest = r,
                None => return false,
            }
        }
        rest.is_empty()
    }
}

impl PartialEq<&str> for Rope<str> {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<&str> for Rope<str> {
    fn from(s: &str) -> Self {
        Rope::atom(s)
    }
}

impl From<String> for Rope<str> {
    fn from(s: String) -> Self {
        Rope::atom(s)
    }
}

impl<T: Clone> From<Vec<T>> for Rope<[T]> {
    fn from(v: Vec<T>) -> Self {
        Rope::atom(v)
    }
}

impl<T: Clone> From<&[T]> for Rope<[T]> {
    fn from(v: &[T]) -> Self {
        Rope::atom(v)
    }
}

impl<S: ?Sized + Sequence> FromIterator<Rope<S>> for Rope<S> {
    fn from_iter<I: IntoIterator<Item = Rope<S>>>(iter: I) -> Self {
        Self::from_node(Node::concat(iter.into_iter().map(|r| r.root).collect()))
    }
}

impl<'a, S: ?Sized + Sequence + 'a> FromIterator<&'a Rope<S>> for Rope<S> {
    fn from_iter<I: IntoIterator<Item = &'a Rope<S>>>(iter: I) -> Self {
        Rope::concat(iter)
    }
}
