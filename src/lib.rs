//! # Persistent ropes with structural sharing
//!
//! A rope is a string (or any other sequence) stored as a tree of nodes, so that concatenating
//! and taking substrings never copies text. Ropes here are immutable: every operation returns a
//! new rope which shares nodes with its inputs.
//!
//! ```
//! use viewrope::Rope;
//!
//! let hello = Rope::atom("hello ");
//! let world = Rope::atom("world");
//! let greeting = Rope::concat([&hello, &world]);
//! assert_eq!(greeting.render(), "hello world");
//!
//! let sub = greeting.substr(3..8);
//! assert_eq!(sub.render(), "lo wo");
//! assert_eq!(greeting.render_range(2..10).unwrap(), "llo worl");
//!
//! let err = greeting.render_range(5..50).unwrap_err();
//! assert_eq!(err.to_string(), "range [5, 50) is invalid.");
//! ```
//!
//! Positions in a `Rope<str>` count unicode scalar values (chars). `Rope<[T]>` counts elements.
//!
//! There's no rebalancing, and substr ranges are only checked when the view is rendered with a
//! range (or explicitly, with [`Rope::validate`]).

mod error;
mod fast_str_tools;
mod iter;
mod node;
pub mod range;
mod rope;
mod sequence;

pub use crate::error::{Bound, RopeError};
pub use crate::iter::Chunks;
pub use crate::node::{Concat, Leaf, Node, Substr};
pub use crate::rope::{IntoLeaf, Rope};
pub use crate::sequence::Sequence;
