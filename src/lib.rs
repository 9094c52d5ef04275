//! Reshape language-model email analyses into HTML digests.
//!
//! The core is [`render::Renderer`]: a generic recursive renderer over
//! [`node::DocumentNode`] trees that emits one full document plus a
//! per-section breakdown, omitting sections with no real content.
pub mod node;
pub mod title;
pub mod emptiness;
pub mod style;
pub mod config;
pub mod render;
pub mod envelope;
pub mod markdown;
pub mod logging;
pub mod cli;

pub use node::{DocumentNode, Scalar};
pub use config::{RendererConfig, Settings, Theme};
pub use render::{RenderedDocument, Renderer};
pub use title::format_title;
pub use emptiness::{is_blank, is_empty};
