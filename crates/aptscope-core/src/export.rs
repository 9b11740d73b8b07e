use crate::{Result, TransactionRecord};
use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct TransactionCsvRow<'a> {
    contract_date: &'a str,
    contract_day: Option<NaiveDate>,
    area: &'a str,
    price: &'a str,
    price_man_won: Option<u64>,
}

impl<'a> From<&'a TransactionRecord> for TransactionCsvRow<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        Self {
            contract_date: &record.contract_date,
            contract_day: record.contract_day(),
            area: &record.area,
            price: &record.price,
            price_man_won: record.price_value(),
        }
    }
}

/// Write the transaction history as CSV, keeping the scraped text next to
/// the parsed values.
pub fn write_transactions_csv(path: &Path, transactions: &[TransactionRecord]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    if transactions.is_empty() {
        writer.write_record(["contract_date", "contract_day", "area", "price", "price_man_won"])?;
    }
    for record in transactions {
        writer.serialize(TransactionCsvRow::from(record))?;
    }
    writer.flush()?;
    info!("Wrote {} transactions to {}", transactions.len(), path.display());
    Ok(())
}
