//! adventures-tui library: application core for the terminal client.

pub mod api;
pub mod error;
pub mod fetch;
pub mod input;
pub mod model;
pub mod state;
pub mod theme;
pub mod ui;
