//! Data access port trait.

use crate::domain::cleaning::CleanedData;
use crate::domain::error::SmatraderError;
use crate::domain::ohlcv::PriceSeries;

pub trait DataPort {
    /// Every symbol in the source, cleaned, with the cleaning report.
    fn load_all(&self) -> Result<CleanedData, SmatraderError>;

    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SmatraderError> {
        let mut cleaned = self.load_all()?;
        cleaned
            .series
            .remove(symbol)
            .ok_or_else(|| SmatraderError::NoData {
                symbol: symbol.to_string(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, SmatraderError> {
        Ok(self.load_all()?.series.into_keys().collect())
    }
}
