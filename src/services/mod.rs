//! Business services for the Stratos backend

pub mod reporting;

pub use reporting::ReportingService;
