//! Digest email rendering: turns a curated batch of articles into a
//! finished, email-client-compatible HTML document. The renderer is a pure
//! function of its inputs; the only external touchpoint is the batched
//! image lookup in [`enrich`].

pub mod date;
pub mod enrich;
pub mod fields;
pub mod render;

pub use date::format_digest_date;
pub use enrich::enrich_images;
pub use fields::{DigestArticle, PublishedAt};
pub use render::{render_digest, subject_line, RenderOptions, DEFAULT_HEADLINE};
