//! # perdita-layout: Pane layout for perdita
//!
//! Rectangular views over a [`Terminal`](perdita_term::Terminal):
//!
//! - **[`region`]**: `Endpoint`, `Region`, `Padding`, and the fractional
//!   `PaneDetails` used to carve sub-panes
//! - **[`pane`]**: `Pane` with padded/bordered geometry, cursor movement,
//!   clipped writes, and sub-division
//! - **[`border`]**: box-drawing glyph sets
//! - **[`prompt`]**: blocking yes/no and press-any-key prompts
//!
//! Panes never own the terminal. Every operation that writes takes it by
//! `&mut`, and every geometric query takes the terminal's current `Size`,
//! so a pane whose edges are computed follows resizes without being told.

pub mod border;
pub mod error;
pub mod pane;
pub mod prompt;
pub mod region;

pub use border::BorderGlyphs;
pub use error::LayoutError;
pub use pane::Pane;
pub use region::{Dimensions, Endpoint, Inset, Offset, Padding, PaneDetails, Region};
