use crate::models::{CheckedRecord, IbanRecord};
use crate::validator::Validator;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub results: Vec<CheckedRecord>,
    pub reasons: HashMap<&'static str, usize>,
}

impl BatchReport {
    pub fn invalid_records(&self) -> usize {
        self.total_records - self.valid_records
    }

    pub fn top_reasons(&self) -> Vec<(&'static str, usize)> {
        let mut items: Vec<(&'static str, usize)> =
            self.reasons.iter().map(|(k, v)| (*k, *v)).collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }
}

pub fn check_csv(path: &Path, validator: &Validator) -> Result<BatchReport, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: IbanRecord = result.map_err(|err| err.to_string())?;
        records.push(record);
    }
    log::debug!("read {} IBAN rows from {}", records.len(), path.display());
    Ok(check_records(&records, validator))
}

pub fn check_records(records: &[IbanRecord], validator: &Validator) -> BatchReport {
    let mut valid_records = 0usize;
    let mut reasons: HashMap<&'static str, usize> = HashMap::new();
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        match validator.check(&record.iban) {
            Ok(()) => {
                valid_records += 1;
                results.push(CheckedRecord {
                    iban: record.iban.clone(),
                    valid: true,
                    reason: None,
                });
            }
            Err(issue) => {
                *reasons.entry(issue.label()).or_insert(0) += 1;
                results.push(CheckedRecord {
                    iban: record.iban.clone(),
                    valid: false,
                    reason: Some(issue.to_string()),
                });
            }
        }
    }

    BatchReport {
        total_records: records.len(),
        valid_records,
        results,
        reasons,
    }
}

pub fn write_results(output: &Path, results: &[CheckedRecord]) -> Result<(), String> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    let mut writer = csv::Writer::from_path(output).map_err(|err| err.to_string())?;
    for record in results {
        writer.serialize(record).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())
}
