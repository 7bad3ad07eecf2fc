pub mod query;
pub mod report;
