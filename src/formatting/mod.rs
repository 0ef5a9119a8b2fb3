// src/formatting/mod.rs
//! Renders entries into Markdown documents with frontmatter.
//!
//! Everything here is synchronous and free of I/O. Images arrive already
//! resolved through [`block_renderer::ImageResolver`], and notices leave
//! through [`document::ConversionReporter`].

pub mod block_renderer;
pub mod document;
pub mod frontmatter;
pub mod rich_text;
pub mod text;

pub use block_renderer::{render_block, render_blocks, ImageResolver, NoImages};
pub use document::{assemble, ConversionReporter, LogReporter, RenderedDocument};
pub use frontmatter::Frontmatter;
