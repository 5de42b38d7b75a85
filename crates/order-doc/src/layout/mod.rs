//! Layout building blocks shared by the profiles
//!
//! - [`measure`] - wrapping and widths through the surface's metrics
//! - [`geometry`] - cursor, points and boxes
//! - [`panel`] - titled panels, measured before they are drawn
//! - [`table`] - equipment table rows and the checklist block
//! - [`policy`] - two-column warranty policies with adaptive font size

pub mod geometry;
pub mod measure;
pub mod panel;
pub mod policy;
pub mod table;

pub use geometry::{Cursor, Point, Rect};
pub use measure::Measurer;
pub use panel::{
    measure_info, min_height, render_info, render_panel, render_side_by_side, InfoRow,
    MeasuredInfo, PanelStyle,
};
pub use policy::{fit_policies, with_bullet, PolicyColumns, FONT_CANDIDATES};
pub use table::{checklist_entries, AmountCell, ChecklistBlock, MeasuredRow, TableLayout, TableRow};
