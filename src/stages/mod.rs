//! Intermediate operations. Each one consumes a [`Sequence`](crate::Sequence) handle and
//! returns a new handle whose node wraps the old one; nothing is evaluated here.

mod distinct;
mod element;
mod slice;
mod sorted;
