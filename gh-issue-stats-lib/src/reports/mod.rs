//! Report generation for statistics series
//!
//! Four generators are provided, each accessed through a `generate` function:
//! - **Console**: Aligned text tables with optional ANSI colors
//! - **Markdown**: Tables ready to paste into an issue or wiki page, with links to the searches
//! - **JSON**: The full series, including beginning totals, search URLs, and warnings
//! - **CSV**: One row per (interval, scope, label) cell
//!
//! Console and markdown output render one table per scope, one row per interval, and one
//! column per label. Cells read `open (+new, -closed)`. Cells affected by incomplete search
//! results or by a negative reconstructed count carry a marker explained in a footnote.

mod common;
mod console;
mod csv;
mod json;
mod markdown;

pub use console::generate as generate_console;
pub use csv::generate as generate_csv;
pub use json::generate as generate_json;
pub use markdown::generate as generate_markdown;
