use std::ops::Range;
use crate::node::Node;
use crate::sequence::Sequence;

/// An iterator over the literal fragments of a rope, in order.
///
/// This yields exactly what rendering would join together, but lazily and without allocating
/// the result. Empty fragments are skipped. Unlike rendering it keeps an explicit stack, so
/// arbitrarily deep ropes can be walked.
pub struct Chunks<'a, S: ?Sized + Sequence> {
    stack: Vec<(&'a Node<S>, Option<Range<usize>>)>,
}

impl<'a, S: ?Sized + Sequence> Chunks<'a, S> {
    /// The range (if any) must already be checked against the node's length.
    pub(crate) fn new(root: &'a Node<S>, range: Option<Range<usize>>) -> Self {
        Chunks { stack: vec![(root, range)] }
    }

    /// The next fragment along with its length in positions.
    pub(crate) fn next_with_len(&mut self) -> Option<(&'a S, usize)> {
        while let Some((node, range)) = self.stack.pop() {
            match node {
                Node::Leaf(leaf) => {
                    let (s, len) = leaf.fragment(range);
                    if len > 0 { return Some((s, len)); }
                }
                Node::Concat(cat) => {
                    // Children are pushed backwards so they pop off in order.
                    let start = self.stack.len();
                    match range {
                        None => self.stack.extend(cat.children().iter().map(|c| (&**c, None))),
                        Some(range) => self.stack.extend(cat.window(range).map(|(c, r)| (c, Some(r)))),
                    }
                    self.stack[start..].reverse();
                }
                Node::Substr(sub) => {
                    self.stack.push((&**sub.child(), Some(sub.child_range(range))));
                }
            }
        }

        None
    }
}

impl<'a, S: ?Sized + Sequence> Iterator for Chunks<'a, S> {
    type Item = &'a S;

    fn next(&mut self) -> Option<&'a S> {
        self.next_with_len().map(|(s, _)| s)
    }
}

#[cfg(test)]
mod test {
    use crate::Rope;

    #[test]
    fn chunks_match_render() {
        let r = Rope::concat([
            &Rope::atom("foo"),
            &Rope::atom(""),
            &Rope::substr(&Rope::atom("barbaz"), 0..3),
            &Rope::atom("baz"),
        ]);

        let all: Vec<&str> = r.fragments().collect();
        assert_eq!(all, vec!["foo", "bar", "baz"]);

        let some: Vec<&str> = r.fragments_in(2..7).unwrap().collect();
        assert_eq!(some, vec!["o", "bar", "b"]);
        assert_eq!(some.concat(), r.render_range(2..7).unwrap());
    }

    #[test]
    fn left_leaning_ropes() {
        let mut r = Rope::atom("x");
        for _ in 0..2_000 {
            r = Rope::concat([&r, &Rope::atom("y")]);
        }
        assert_eq!(r.depth(), 2_001);
        assert_eq!(r.fragments().count(), 2_001);
        assert_eq!(r.fragments_in(1_999..2_001).unwrap().collect::<String>(), "yy");
    }
}
