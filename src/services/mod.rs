//! Services module - Pure logic for turning form snapshots into front matter.
//!
//! Everything in here is a function of a [`Snapshot`](crate::models::Snapshot):
//! no locks, no I/O, no hidden state. The state manager and the CLI call into
//! these functions; nothing in here calls back out.
//!
//! # Components
//!
//! - [`emit`]: The YAML emitter. Produces the complete front-matter block, in a
//!   fixed key order:
//!   - metadata (`title`, `subtitle`, `date`, `author`)
//!   - document class and sorted `classoption`
//!   - table of contents (`toc`, `toc-title`, `toc-depth`)
//!   - page geometry (`papersize`, `fontsize`, sorted `geometry`)
//!   - `links-as-notes`, sorted `header-includes`
//!   - fonts with fallbacks and options
//!
//! - [`header_includes`]: Static table of style flag → LaTeX preamble fragment,
//!   with optional extra activation conditions.
//!
//! - [`fonts`]: Fallback chains and per-font options for the three font slots.
//!
//! - [`visibility`]: Which conditional controls are shown for a snapshot.
//!
//! # Usage Example
//!
//! ```
//! use frontmatter_builder::models::Snapshot;
//! use frontmatter_builder::services::emit;
//!
//! let snapshot = Snapshot {
//!     title: "O'Brien's Thesis".to_string(),
//!     ..Snapshot::default()
//! };
//! let yaml = emit(&snapshot);
//! assert!(yaml.contains("title: 'O''Brien''s Thesis'"));
//! assert!(yaml.ends_with("---\n\n\n"));
//! ```

pub mod emitter;
pub mod fonts;
pub mod header_includes;
pub mod visibility;

pub use emitter::{class_options, emit, escape_double_quoted, escape_single_quoted, geometry};
pub use fonts::{FontEntry, FontSlot, font_entries};
pub use header_includes::{HEADER_INCLUDES, HeaderInclude, active_fragments};
pub use visibility::{VISIBILITY_RULES, is_visible, visibility};
