//! Sheet editor
//!
//! Wires a [`DocumentContext`] to a [`GridView`](crate::grid::GridView):
//!
//! ```text
//! document text ──parse──▶ grid data + column descriptors ──▶ grid view
//!       ▲                                                         │
//!       └──────────────serialize◀── content events ◀──────────────┤
//!                                   search re-index ◀─────────────┘
//! ```
//!
//! Column types, widths, freeze and header state live only for the session;
//! the document text is all that is persisted.

mod document;
mod editor;

pub use document::{DocumentContext, TextDocument};
pub use editor::SheetEditor;
