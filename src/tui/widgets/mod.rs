//! Reusable TUI widget components.

pub(crate) mod header;
pub(crate) mod panel;
