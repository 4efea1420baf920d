use analytics::{load, Dataset, RawRecord};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Loads a CSV export of the warehouse sales query into a dataset.
///
/// The first line must be a header; header names become field names, so any
/// capitalization of `year,channel,country,continent,revenue,cost,quantity`
/// works and extra columns are ignored.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open data file {}", path.display()))?;
    let dataset =
        load_csv_from(file).with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(dataset)
}

pub fn load_csv_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name, value.to_string()))
                .collect::<RawRecord>(),
        );
    }

    Ok(load(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsError;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_headers_case_insensitively() {
        let csv = "CalendarNote,Year,Channel,Country,Continent,Revenue,Cost,Quantity\n\
                   x,2023,Store,USA,North America,100.50,40.25,5\n\
                   y,2022, Online ,Canada,North America,50,20,2\n";
        let dataset = load_csv_from(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0].margin(), dec!(60.25));
        assert_eq!(dataset.rows()[1].channel(), "Online");
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let csv = "year,channel,country,continent,revenue,quantity\n2023,Store,USA,NA,1,1\n";
        let err = load_csv_from(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalyticsError>(),
            Some(&AnalyticsError::MissingField { row: 0, field: "cost" })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "year,channel,country,continent,revenue,cost,quantity\n2023,Store,USA\n";
        let err = load_csv_from(csv.as_bytes()).unwrap_err();
        assert!(err.downcast_ref::<csv::Error>().is_some());
    }
}
