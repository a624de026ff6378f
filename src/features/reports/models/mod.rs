mod report;

pub use report::{NewReport, Report, ReportChanges, ReportFilter, ReportSeverity, ReportStatus};
