//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::cleaning::CleaningReport;
use crate::domain::error::SmatraderError;
use std::path::Path;

/// Port for writing backtest output.
pub trait ReportPort {
    /// Write the trade ledgers of one or more runs.
    fn write_orders(&self, results: &[BacktestResult], output_path: &Path)
        -> Result<(), SmatraderError>;

    fn write_validation_report(
        &self,
        report: &CleaningReport,
        output_path: &Path,
    ) -> Result<(), SmatraderError>;
}
