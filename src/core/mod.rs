//! Core domain types shared across the pipeline.

mod section;
mod slug;

pub use section::Section;
pub use slug::Slug;
