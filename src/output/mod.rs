//! Report output: persisting JSON reports and rendering them to HTML

pub mod formatter;
pub mod report;

pub use formatter::{
    render_report_file, CandidateReportRenderer, JobMatchReportRenderer, ReportRenderer,
};
pub use report::{
    should_overwrite, CandidateAction, Enricher, PassThroughEnricher, ReportOutcome, ReportWriter,
};
