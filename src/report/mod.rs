//! Report building
//!
//! Pipeline: load sheets, detect column roles, coerce and aggregate the
//! yearly series, build chart payloads, assemble the render context.

mod builder;
pub mod charts;
pub mod roles;
pub mod series;

pub use builder::{
    render_report, ChartFailure, ErrorContext, Report, ReportBuilder, ReportContext,
};
pub use charts::Chart;
pub use roles::{detect_column_roles, ColumnRole, RoleAssignment};
