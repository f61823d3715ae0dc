//! Terminal companion for the Watson time tracker. Shows one calendar week of
//! recorded frames as seven per-day tables and lets you move the week window,
//! select a row, and edit or remove the selected frame directly from the
//! terminal.
//!

pub mod cli;
pub mod frames;
pub mod overview;
pub mod utils;
