//! Resolution of scanned tokens against the page index.

mod image;
mod link;

pub use image::{ResolvedImage, resolve_image};
pub use link::{ResolvedLink, resolve_link};
