use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IbanRecord {
    pub iban: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedRecord {
    pub iban: String,
    pub valid: bool,
    #[serde(default)]
    pub reason: Option<String>,
}
