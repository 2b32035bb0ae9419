use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_IBAN_LENGTHS: &[(&str, usize)] = &[
    ("AT", 20),
    ("BE", 16),
    ("CZ", 24),
    ("DE", 22),
    ("DK", 18),
    ("FR", 27),
];

// EU/EEA members plus CH and GB.
pub const REGISTRY_IBAN_LENGTHS: &[(&str, usize)] = &[
    ("AT", 20),
    ("BE", 16),
    ("BG", 22),
    ("HR", 21),
    ("CY", 28),
    ("CZ", 24),
    ("DK", 18),
    ("EE", 20),
    ("FI", 18),
    ("FR", 27),
    ("DE", 22),
    ("GR", 27),
    ("HU", 28),
    ("IE", 22),
    ("IT", 27),
    ("LV", 21),
    ("LT", 20),
    ("LU", 20),
    ("MT", 31),
    ("NL", 18),
    ("PL", 28),
    ("PT", 25),
    ("RO", 24),
    ("SK", 24),
    ("SI", 19),
    ("ES", 24),
    ("SE", 24),
    ("CH", 21),
    ("GB", 22),
    ("IS", 26),
    ("LI", 21),
    ("NO", 15),
];

const MIN_IBAN_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryLengths {
    lengths: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct LengthRow {
    country: String,
    length: usize,
}

impl CountryLengths {
    pub fn from_pairs(pairs: &[(&str, usize)]) -> Self {
        let lengths = pairs
            .iter()
            .map(|(code, len)| ((*code).to_string(), *len))
            .collect();
        Self { lengths }
    }

    pub fn registry() -> Self {
        Self::from_pairs(REGISTRY_IBAN_LENGTHS)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, String> {
        let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
        let mut lengths = HashMap::new();

        for (idx, result) in reader.deserialize().enumerate() {
            let row: LengthRow = result.map_err(|err| err.to_string())?;
            let line = idx + 2;
            let code = row.country.trim();
            if !is_country_code(code) {
                return Err(format!(
                    "{}:{}: country must be 2 uppercase letters, got '{}'",
                    path.display(),
                    line,
                    code
                ));
            }
            if row.length < MIN_IBAN_LENGTH {
                return Err(format!(
                    "{}:{}: length for {} must be at least {}",
                    path.display(),
                    line,
                    code,
                    MIN_IBAN_LENGTH
                ));
            }
            if lengths.insert(code.to_string(), row.length).is_some() {
                log::warn!("{}: duplicate entry for {}, last one wins", path.display(), code);
            }
        }

        log::debug!(
            "loaded {} country lengths from {}",
            lengths.len(),
            path.display()
        );
        Ok(Self { lengths })
    }

    pub fn expected_length(&self, country: &str) -> Option<usize> {
        self.lengths.get(country).copied()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.lengths.contains_key(country)
    }

    pub fn entries(&self) -> Vec<(&str, usize)> {
        let mut items: Vec<(&str, usize)> = self
            .lengths
            .iter()
            .map(|(code, len)| (code.as_str(), *len))
            .collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
    }
}

impl Default for CountryLengths {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_IBAN_LENGTHS)
    }
}

fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|ch| ch.is_ascii_uppercase())
}
