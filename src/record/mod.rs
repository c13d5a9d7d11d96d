//! Record naming and rendering.
//!
//! An item becomes a [`Record`](crate::models::Record) in two steps: the namer
//! derives the identifier that doubles as the deduplication key, and the
//! formatter renders the front-matter body.

mod namer;
mod template;

pub use namer::identifier;
pub use template::{render, render_body};
