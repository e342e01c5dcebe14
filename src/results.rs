//! Query results and their projection into name-keyed records.

pub mod projection;
pub mod result_set;
pub mod row;

pub use projection::{ProjectedRecord, project};
pub use result_set::ResultSet;
pub use row::{ColumnDescriptor, ResultRow};
