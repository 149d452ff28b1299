//! Carton - The toolbox for calque.
//!
//! This crate holds the text-coordinate primitives every other calque crate
//! builds on: positions, the line-offset index and whole-line utilities.
//!
//! # Modules
//!
//! - **position**: 0-based line / UTF-16 character positions
//! - **line_index**: offset <-> position conversion for one text snapshot
//! - **lines**: line splitting and line stripping
//!
//! # Example
//!
//! ```
//! use calque_carton::{LineIndex, Position};
//!
//! let index = LineIndex::new("let a = 1\r\nlet b = a\n");
//! assert_eq!(index.line_count(), 3);
//! assert_eq!(index.position_at(11), Position::new(1, 0));
//! assert_eq!(index.offset_at(Position::new(1, 4)), 15);
//! ```

pub mod line_index;
pub mod lines;
pub mod position;

pub use line_index::LineIndex;
pub use lines::{split_lines, strip_lines};
pub use position::Position;
