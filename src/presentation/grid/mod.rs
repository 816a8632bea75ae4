//! HTML grid helpers: column configuration derived from view field types,
//! action links gated by [`Access`](crate::application::access::Access), and
//! a small table renderer.

pub mod column_type;
pub mod columns;
pub mod culture;
pub mod options;
pub mod render;

pub use column_type::{CellKind, CellValue, ColumnType, DateColumn, css_class_of};
pub use columns::{
    ACTION_LINK_CSS, ACTION_LINK_WIDTH, GridColumn, GridColumns, LinkAction, RouteContext,
};
pub use culture::Culture;
pub use options::{DEFAULT_PAGE_SIZE, GridOptions};
pub use render::{Grid, escape_html, sanitize_html};
