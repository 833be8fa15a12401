//! `agingboard-aging`: account aging engine.
//!
//! Pure engine crate: receives pre-extracted spreadsheet rows, returns
//! classified records and per-business-area aggregates.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod cache;
pub mod category;
pub mod classify;
pub mod columns;
pub mod date_age;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod session;
pub mod view;

pub use category::AgeCategory;
pub use columns::ColumnMapping;
pub use error::AgingError;
pub use model::{AreaAggregate, AreaCounts, CellValue, ClassifiedRecord, RawRow};
pub use pipeline::{compute_aggregate, compute_records};
pub use session::{Clock, DatasetSession, FixedClock, SystemClock};
pub use view::View;
