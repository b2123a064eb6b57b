//! csvgrid - grid editing for delimited text documents
//!
//! This crate keeps a CSV/TSV document and a grid view of it in sync, and
//! provides in-grid find/replace, column fit layouts and header promotion,
//! driven through the Elm-style `update(editor, Msg) -> Option<Cmd>` loop.

pub mod cli;
pub mod columns;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod csv;
pub mod grid;
pub mod layout;
pub mod messages;
pub mod search;
pub mod sheet;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::SheetConfig;
pub use messages::Msg;
pub use sheet::{DocumentContext, SheetEditor, TextDocument};
