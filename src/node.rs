//! The node algebra behind a rope.
//!
//! There are three kinds of node: leaves hold a literal run of elements, concatenations hold an
//! ordered list of children, and substrings hold a view (a half-open range) onto one child.
//! Every node caches its length when it is built and is never modified afterwards, so nodes are
//! shared freely between ropes through `Arc`. A rope is really a DAG of nodes, not a tree.
//!
//! Rendering walks the structure top down. The requested range is checked once at the top, then
//! narrowed at each concatenation boundary and shifted at each substring boundary. Leaves push
//! borrowed fragments onto an accumulator which is joined at the end.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use crate::error::RopeError;
use crate::range::{check_range, clamp, sum_lengths};
use crate::sequence::Sequence;

pub enum Node<S: ?Sized + Sequence> {
    Leaf(Leaf<S>),
    Concat(Concat<S>),
    Substr(Substr<S>),
}

pub struct Leaf<S: ?Sized + Sequence> {
    value: S::Owned,
    len: usize,
}

pub struct Concat<S: ?Sized + Sequence> {
    children: Vec<Arc<Node<S>>>,
    len: usize,
}

/// A view onto `child`. The range is not checked against the child when the node is built.
pub struct Substr<S: ?Sized + Sequence> {
    // Always Some, except while the node is being dropped.
    child: Option<Arc<Node<S>>>,
    range: Range<usize>,
}

impl<S: ?Sized + Sequence> Leaf<S> {
    pub fn value(&self) -> &S {
        <S::Owned as Borrow<S>>::borrow(&self.value)
    }

    /// The fragment covering `range` (the whole value if None), and its length in positions.
    ///
    /// Out of bounds ranges are clamped, so an unchecked substr view can never panic here.
    pub(crate) fn fragment(&self, range: Option<Range<usize>>) -> (&S, usize) {
        match range {
            None => (self.value(), self.len),
            Some(range) => {
                let range = clamp(range, self.len);
                let len = range.end - range.start;
                if range.start == 0 && len == self.len {
                    (self.value(), len)
                } else {
                    (self.value().position_slice_counted(range, self.len), len)
                }
            }
        }
    }
}

impl<S: ?Sized + Sequence> Concat<S> {
    pub fn children(&self) -> &[Arc<Node<S>>] {
        &self.children
    }

    /// The children overlapping `range`, each paired with the part of the range inside it.
    pub(crate) fn window(&self, range: Range<usize>) -> Window<'_, S> {
        Window::new(&self.children, range)
    }
}

impl<S: ?Sized + Sequence> Substr<S> {
    pub fn child(&self) -> &Arc<Node<S>> {
        self.child.as_ref().expect("substr child is only taken when the node is dropped")
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Translate a range over this view into the child's coordinates.
    pub(crate) fn child_range(&self, range: Option<Range<usize>>) -> Range<usize> {
        match range {
            None => self.range.clone(),
            Some(r) => {
                let base = self.range.start;
                base.saturating_add(r.start)..base.saturating_add(r.end)
            }
        }
    }
}

/// Walks a concatenation's children, handing out the slice of a range that falls in each.
///
/// Children entirely before the range are skipped. The walk stops at the child where the range
/// ends, so children entirely after the range are never touched.
pub(crate) struct Window<'a, S: ?Sized + Sequence> {
    children: std::slice::Iter<'a, Arc<Node<S>>>,
    remaining: Range<usize>,
    done: bool,
}

impl<'a, S: ?Sized + Sequence> Window<'a, S> {
    fn new(children: &'a [Arc<Node<S>>], range: Range<usize>) -> Self {
        // Backwards ranges only come from unchecked substr views. They select nothing.
        let remaining = range.start..range.end.max(range.start);
        Window { children: children.iter(), remaining, done: false }
    }
}

impl<'a, S: ?Sized + Sequence> Iterator for Window<'a, S> {
    type Item = (&'a Node<S>, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done { return None; }

        let r = &mut self.remaining;
        for child in self.children.by_ref() {
            debug_assert!(r.start <= r.end);
            let l = child.len();

            if r.start >= l {
                // The window hasn't started yet.
                r.start -= l;
                r.end -= l;
            } else if r.end <= l {
                // The window ends inside this child.
                self.done = true;
                return Some((&**child, r.clone()));
            } else {
                let here = r.start..l;
                r.start = 0;
                r.end -= l;
                return Some((&**child, here));
            }
        }

        self.done = true;
        None
    }
}

impl<S: ?Sized + Sequence> Node<S> {
    pub fn leaf(value: S::Owned) -> Self {
        let len = <S::Owned as Borrow<S>>::borrow(&value).position_len();
        Node::Leaf(Leaf { value, len })
    }

    pub fn concat(children: Vec<Arc<Node<S>>>) -> Self {
        let len = sum_lengths(children.iter().map(|c| c.len()));
        Node::Concat(Concat { children, len })
    }

    pub fn substr(child: Arc<Node<S>>, range: Range<usize>) -> Self {
        Node::Substr(Substr { child: Some(child), range })
    }

    /// The number of positions in this node. Computed when the node was built.
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len,
            Node::Concat(cat) => cat.len,
            Node::Substr(sub) => sub.range.end.saturating_sub(sub.range.start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the fragments in `range` (or the whole node) to `parts`, in order.
    ///
    /// The range is trusted. Call [`Node::render`] to check it first.
    pub fn gather<'a>(&'a self, parts: &mut Vec<&'a S>, range: Option<Range<usize>>) {
        match self {
            Node::Leaf(leaf) => {
                parts.push(leaf.fragment(range).0);
            }
            Node::Concat(cat) => match range {
                None => {
                    for child in &cat.children {
                        child.gather(parts, None);
                    }
                }
                Some(range) => {
                    for (child, r) in cat.window(range) {
                        child.gather(parts, Some(r));
                    }
                }
            },
            Node::Substr(sub) => {
                sub.child().gather(parts, Some(sub.child_range(range)));
            }
        }
    }

    /// Render the contents of `range` (or the whole node) into a fresh owned sequence.
    ///
    /// The range must satisfy `begin <= end <= self.len()`. It is checked here, once, before
    /// anything is visited.
    pub fn render(&self, range: Option<Range<usize>>) -> Result<S::Owned, RopeError> {
        log::trace!("render {:?} of node with length {}", range, self.len());
        if let Some(range) = &range {
            check_range(range, self.len())?;
        }
        Ok(self.render_unchecked(range))
    }

    pub(crate) fn render_unchecked(&self, range: Option<Range<usize>>) -> S::Owned {
        let mut parts = Vec::new();
        self.gather(&mut parts, range);
        S::join(&parts)
    }

    /// Visit each distinct node reachable from here once, parents before children.
    ///
    /// Shared subtrees are only visited the first time they're reached, which keeps this linear
    /// in the number of distinct nodes even when the DAG has heavy sharing.
    pub(crate) fn try_for_each_unique<E>(&self, mut f: impl FnMut(&Node<S>) -> Result<(), E>) -> Result<(), E> {
        let mut seen = HashSet::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if !seen.insert(node as *const Node<S>) { continue; }
            f(node)?;

            stack.extend(node.child_nodes().iter().rev().map(|c| &**c));
        }
        Ok(())
    }

    /// The direct children of this node, in order.
    fn child_nodes(&self) -> &[Arc<Node<S>>] {
        match self {
            Node::Leaf(_) => &[],
            Node::Concat(cat) => &cat.children,
            Node::Substr(sub) => std::slice::from_ref(sub.child()),
        }
    }

    /// Move this node's children onto `out`, leaving it childless.
    fn take_children(&mut self, out: &mut Vec<Arc<Node<S>>>) {
        match self {
            Node::Leaf(_) => {}
            Node::Concat(cat) => out.append(&mut cat.children),
            Node::Substr(sub) => out.extend(sub.child.take()),
        }
    }

    /// The length this node should have, recomputed from its contents rather than the cache.
    pub(crate) fn structural_len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.value().position_len(),
            Node::Concat(cat) => sum_lengths(cat.children.iter().map(|c| c.len())),
            Node::Substr(sub) => sub.range.end.saturating_sub(sub.range.start),
        }
    }

    /// Longest path from here to a leaf. A lone leaf has depth 1.
    ///
    /// Post-order over an explicit stack, so arbitrarily deep ropes are fine. Each distinct node
    /// is measured once.
    pub(crate) fn depth(&self) -> usize {
        let mut memo: HashMap<*const Node<S>, usize> = HashMap::new();
        // (node, children already pushed)
        let mut stack = vec![(self, false)];

        while let Some((node, expanded)) = stack.pop() {
            let key = node as *const Node<S>;
            if memo.contains_key(&key) { continue; }

            if expanded {
                // Every child was pushed above this entry, so they're all measured by now.
                let d = 1 + node.child_nodes().iter()
                    .map(|c| memo[&(&**c as *const Node<S>)])
                    .max()
                    .unwrap_or(0);
                memo.insert(key, d);
            } else {
                stack.push((node, true));
                stack.extend(node.child_nodes().iter().map(|c| (&**c, false)));
            }
        }

        memo[&(self as *const Node<S>)]
    }
}

/// Dropping a node hands its children to a worklist instead of recursing, so a rope of any depth
/// can be freed without overflowing the stack.
impl<S: ?Sized + Sequence> Drop for Node<S> {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);

        while let Some(child) = stack.pop() {
            // Shared children are still alive elsewhere. Dropping our Arc just decrements them.
            if let Ok(mut node) = Arc::try_unwrap(child) {
                node.take_children(&mut stack);
                // node is childless now, so its own drop returns straight away.
            }
        }
    }
}

impl<S: ?Sized + Sequence> fmt::Debug for Node<S> where S::Owned: fmt::Debug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => f.debug_tuple("Leaf").field(&leaf.value).finish(),
            Node::Concat(cat) => f.debug_tuple("Concat").field(&cat.children).finish(),
            Node::Substr(sub) => f.debug_struct("Substr")
                .field("range", &sub.range)
                .field("child", sub.child())
                .finish(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn atom(s: &str) -> Arc<Node<str>> {
        Arc::new(Node::leaf(s.to_string()))
    }

    fn cat(kids: &[&Arc<Node<str>>]) -> Arc<Node<str>> {
        Arc::new(Node::concat(kids.iter().map(|&k| k.clone()).collect()))
    }

    fn render(node: &Node<str>, range: Range<usize>) -> String {
        node.render(Some(range)).unwrap()
    }

    #[test]
    fn simple_leaf() {
        let leaf = atom("foo");
        assert_eq!(leaf.len(), 3);
        assert_eq!(leaf.render(None).unwrap(), "foo");
    }

    #[test]
    fn leaf_ranges() {
        let leaf = atom("foo bar baz");
        assert_eq!(render(&leaf, 0..3), "foo");
        assert_eq!(render(&leaf, 4..7), "bar");
        assert_eq!(render(&leaf, 11..11), "");

        #[allow(clippy::reversed_empty_ranges)]
        let backwards = 2..1;
        assert_eq!(leaf.render(Some(backwards)).unwrap_err().to_string(), "range [2, 1) is invalid.");
        assert_eq!(leaf.render(Some(0..12)).unwrap_err().to_string(), "range [0, 12) is invalid.");
    }

    #[test]
    fn concat_degenerate() {
        let c = cat(&[&atom("bazqux")]);
        assert_eq!(c.render(None).unwrap(), "bazqux");
        assert_eq!(render(&c, 3..6), "qux");
    }

    #[test]
    fn concat_compound() {
        let c = cat(&[&atom("foo"), &atom("bar"), &atom("baz"), &atom("qux")]);
        assert_eq!(c.len(), 12);
        assert_eq!(c.render(None).unwrap(), "foobarbazqux");
        assert_eq!(render(&c, 3..6), "bar");
        assert_eq!(render(&c, 2..10), "obarbazq");
        assert_eq!(render(&c, 12..12), "");
    }

    #[test]
    fn empty_concat() {
        let c: Node<str> = Node::concat(vec![]);
        assert_eq!(c.len(), 0);
        assert_eq!(c.render(None).unwrap(), "");
        assert_eq!(c.render(Some(0..0)).unwrap(), "");
        assert!(c.render(Some(0..1)).is_err());
    }

    #[test]
    fn window_touches_only_overlapping_children() {
        let c = Node::concat(vec![atom("foo"), atom("bar"), atom("baz"), atom("qux")]);
        let Node::Concat(c) = &c else { unreachable!() };

        let pieces: Vec<(String, Range<usize>)> = c.window(4..7)
            .map(|(n, r)| (n.render(None).unwrap(), r))
            .collect();
        assert_eq!(pieces, vec![
            ("bar".to_string(), 1..3),
            ("baz".to_string(), 0..1),
        ]);

        // A window ending exactly on a boundary stops there.
        assert_eq!(c.window(0..3).count(), 1);
        assert_eq!(c.window(3..6).count(), 1);
    }

    #[test]
    fn gather_pushes_borrowed_fragments() {
        let c = cat(&[&atom("foo"), &atom("bar"), &atom("baz")]);
        let mut parts = Vec::new();
        c.gather(&mut parts, Some(1..8));
        assert_eq!(parts, vec!["oo", "bar", "ba"]);
    }

    #[test]
    fn substr_simple() {
        let sub = Node::substr(atom("foobarbazqux"), 2..10);
        assert_eq!(sub.len(), 8);
        assert_eq!(sub.render(None).unwrap(), "obarbazq");
        assert_eq!(render(&sub, 1..7), "barbaz");
    }

    #[test]
    fn nested_substr_composes_offsets() {
        let base = atom("0123456789");
        let outer = Arc::new(Node::substr(base, 2..9));
        let inner = Node::substr(outer, 1..5);
        assert_eq!(inner.render(None).unwrap(), "3456");
        assert_eq!(render(&inner, 1..3), "45");
    }

    #[test]
    fn unchecked_substr_views_clamp() {
        // Built without any bounds check. Rendering clamps at the leaf.
        let sub = Node::substr(atom("abc"), 1..10);
        assert_eq!(sub.len(), 9);
        assert_eq!(sub.render(None).unwrap(), "bc");
        assert_eq!(render(&sub, 0..9), "bc");

        #[allow(clippy::reversed_empty_ranges)]
        let backwards = Node::substr(cat(&[&atom("abc"), &atom("def")]), 4..1);
        assert_eq!(backwards.len(), 0);
        assert_eq!(backwards.render(None).unwrap(), "");
    }

    #[test]
    fn unicode_leaf() {
        let leaf = atom("héllo wörld");
        assert_eq!(leaf.len(), 11);
        assert_eq!(render(&leaf, 1..5), "éllo");
        assert_eq!(render(&leaf, 6..11), "wörld");
    }

    #[test]
    fn element_leaves() {
        let c: Node<[u8]> = Node::concat(vec![
            Arc::new(Node::leaf(vec![1, 2, 3])),
            Arc::new(Node::leaf(vec![4, 5])),
        ]);
        assert_eq!(c.render(None).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(c.render(Some(2..4)).unwrap(), vec![3, 4]);
    }

    #[test]
    fn long_ascii_leaf() {
        let text = "0123456789".repeat(10_000);
        let leaf = atom(&text);
        assert_eq!(render(&leaf, 99_990..100_000), "0123456789");
        assert_eq!(leaf.render(None).unwrap().len(), 100_000);

        let Node::Leaf(l) = &*leaf else { unreachable!() };
        assert_eq!(l.fragment(Some(5..8)), ("567", 3));
    }

    #[test]
    fn dropping_releases_only_unshared_children() {
        let a = atom("shared");
        let s = Arc::new(Node::substr(a.clone(), 1..3));
        let c = cat(&[&s, &a]);
        assert_eq!(Arc::strong_count(&a), 3);

        drop(c);
        assert_eq!(Arc::strong_count(&s), 1);
        assert_eq!(Arc::strong_count(&a), 2);
        assert_eq!(s.render(None).unwrap(), "ha");

        drop(s);
        assert_eq!(Arc::strong_count(&a), 1);
        assert_eq!(a.render(None).unwrap(), "shared");
    }

    #[test]
    fn depth_and_structure() {
        let a = atom("a");
        let c = cat(&[&a, &a]);
        let s = Node::substr(c.clone(), 0..1);
        assert_eq!(a.depth(), 1);
        assert_eq!(c.depth(), 2);
        assert_eq!(s.depth(), 3);
        assert_eq!(c.structural_len(), c.len());

        let mut count = 0;
        s.try_for_each_unique(|_| -> Result<(), ()> { count += 1; Ok(()) }).unwrap();
        // a is shared, so it's only seen once.
        assert_eq!(count, 3);
    }
}
