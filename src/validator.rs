use crate::reference::CountryLengths;
use std::fmt;
use std::sync::OnceLock;

const FIRST_SEGMENT_LEN: usize = 9;
const NEXT_SEGMENT_LEN: usize = 7;
const MODULUS: u64 = 97;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterPolicy {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IbanIssue {
    TooShort,
    UnknownCountry,
    LengthMismatch { expected: usize, actual: usize },
    InvalidCharacter,
    NoDigits,
    ChecksumMismatch { remainder: u64 },
}

impl IbanIssue {
    pub fn label(&self) -> &'static str {
        match self {
            IbanIssue::TooShort => "IBAN is too short",
            IbanIssue::UnknownCountry => "IBAN country code is not known",
            IbanIssue::LengthMismatch { .. } => "IBAN length does not match country specification",
            IbanIssue::InvalidCharacter => "IBAN must be alphanumeric",
            IbanIssue::NoDigits => "IBAN has no alphanumeric content",
            IbanIssue::ChecksumMismatch { .. } => "IBAN check digits are invalid",
        }
    }
}

impl fmt::Display for IbanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IbanIssue::LengthMismatch { expected, actual } => {
                write!(f, "{} (expected {}, got {})", self.label(), expected, actual)
            }
            IbanIssue::ChecksumMismatch { remainder } => {
                write!(f, "{} (mod 97 = {})", self.label(), remainder)
            }
            _ => f.write_str(self.label()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    lengths: CountryLengths,
    policy: CharacterPolicy,
}

impl Validator {
    pub fn new(lengths: CountryLengths) -> Self {
        Self {
            lengths,
            policy: CharacterPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CharacterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn lengths(&self) -> &CountryLengths {
        &self.lengths
    }

    pub fn policy(&self) -> CharacterPolicy {
        self.policy
    }

    pub fn validate(&self, iban: &str) -> bool {
        self.check(iban).is_ok()
    }

    pub fn check(&self, iban: &str) -> Result<(), IbanIssue> {
        check_length(&self.lengths, iban)?;
        let rearranged = rearrange(iban).ok_or(IbanIssue::TooShort)?;
        let digits = expand(&rearranged, self.policy)?;
        let remainder = mod97(&digits).ok_or(IbanIssue::NoDigits)?;
        if remainder == 1 {
            Ok(())
        } else {
            Err(IbanIssue::ChecksumMismatch { remainder })
        }
    }
}

pub fn validate(iban: &str) -> bool {
    default_validator().validate(iban)
}

pub fn default_validator() -> &'static Validator {
    static DEFAULT: OnceLock<Validator> = OnceLock::new();
    DEFAULT.get_or_init(Validator::default)
}

fn check_length(lengths: &CountryLengths, iban: &str) -> Result<(), IbanIssue> {
    let country = iban.get(0..2).ok_or(IbanIssue::TooShort)?;
    let expected = lengths
        .expected_length(country)
        .ok_or(IbanIssue::UnknownCountry)?;
    let actual = iban.chars().count();
    if actual != expected {
        return Err(IbanIssue::LengthMismatch { expected, actual });
    }
    Ok(())
}

pub(crate) fn rearrange(iban: &str) -> Option<String> {
    let head = iban.get(..4)?;
    let tail = iban.get(4..)?;
    let mut out = String::with_capacity(iban.len());
    out.push_str(tail);
    out.push_str(head);
    Some(out)
}

// 0-9 as is, A-Z as 10-35.
pub(crate) fn expand(input: &str, policy: CharacterPolicy) -> Result<String, IbanIssue> {
    let mut out = String::with_capacity(input.len() * 2);
    for ch in input.chars() {
        let upper = ch.to_ascii_uppercase();
        if upper.is_ascii_digit() {
            out.push(upper);
        } else if upper.is_ascii_uppercase() {
            let value = u32::from(upper) - u32::from('A') + 10;
            out.push_str(&value.to_string());
        } else if policy == CharacterPolicy::Strict {
            return Err(IbanIssue::InvalidCharacter);
        }
    }
    Ok(out)
}

// First segment is 9 digits, then the remainder is prepended to 7 digits at
// a time. Every parse stays within u64.
pub(crate) fn mod97(digits: &str) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    let split = digits.len().min(FIRST_SEGMENT_LEN);
    let (first, mut rest) = digits.split_at(split);
    let mut remainder = first.parse::<u64>().ok()? % MODULUS;

    while rest.len() >= FIRST_SEGMENT_LEN {
        let (segment, next) = rest.split_at(NEXT_SEGMENT_LEN);
        remainder = reduce_segment(remainder, segment)?;
        rest = next;
    }
    if !rest.is_empty() {
        remainder = reduce_segment(remainder, rest)?;
    }
    Some(remainder)
}

fn reduce_segment(remainder: u64, segment: &str) -> Option<u64> {
    let combined = format!("{}{}", remainder, segment);
    combined.parse::<u64>().ok().map(|value| value % MODULUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_mod97(digits: &str) -> u64 {
        digits
            .bytes()
            .fold(0, |acc, b| (acc * 10 + u64::from(b - b'0')) % MODULUS)
    }

    #[test]
    fn reference_scenarios() {
        assert!(validate("DE22790200760027913168"));
        assert!(!validate("DE21790200760027913173"));
        assert!(!validate("DE227902007600279131"));
        assert!(!validate("XX22790200760027913168"));
        assert!(!validate(""));
        assert!(validate("AT611904300234573201"));
    }

    #[test]
    fn short_inputs_are_rejected_without_panicking() {
        let validator = Validator::default();
        assert_eq!(validator.check(""), Err(IbanIssue::TooShort));
        assert_eq!(validator.check("D"), Err(IbanIssue::TooShort));
        assert_eq!(validator.check("DE"), Err(IbanIssue::LengthMismatch { expected: 22, actual: 2 }));
    }

    #[test]
    fn multibyte_prefix_is_rejected() {
        let validator = Validator::default();
        assert_eq!(validator.check("é"), Err(IbanIssue::TooShort));
        assert!(!validator.validate("Dé22790200760027913168"));
    }

    #[test]
    fn reports_length_mismatch() {
        let validator = Validator::default();
        assert_eq!(
            validator.check("DE227902007600279131"),
            Err(IbanIssue::LengthMismatch { expected: 22, actual: 20 })
        );
    }

    #[test]
    fn reports_checksum_remainder() {
        let validator = Validator::default();
        assert_eq!(
            validator.check("DE21790200760027913173"),
            Err(IbanIssue::ChecksumMismatch { remainder: 38 })
        );
    }

    #[test]
    fn country_lookup_is_case_sensitive() {
        assert!(!validate("de22790200760027913168"));
    }

    #[test]
    fn lowercase_bban_letters_match_uppercase() {
        assert!(validate("FR1420041010050500013M02606"));
        assert!(validate("FR1420041010050500013m02606"));
    }

    #[test]
    fn validation_is_idempotent() {
        let iban = "BE68539007547034";
        let first = validate(iban);
        assert_eq!(first, validate(iban));
        assert!(first);
    }

    #[test]
    fn permissive_policy_drops_separators() {
        // 22 characters with a trailing '-' that expansion ignores.
        let iban = "DE5137040044053201300-";
        assert!(Validator::default().validate(iban));
        let strict = Validator::default().with_policy(CharacterPolicy::Strict);
        assert_eq!(strict.check(iban), Err(IbanIssue::InvalidCharacter));
    }

    #[test]
    fn injected_table_replaces_default() {
        let validator = Validator::new(CountryLengths::from_pairs(&[("GB", 22)]));
        assert!(validator.validate("GB82WEST12345698765432"));
        assert!(!validator.validate("DE22790200760027913168"));
    }

    #[test]
    fn rearrange_moves_prefix_to_end() {
        assert_eq!(rearrange("AB12CDEF").as_deref(), Some("CDEFAB12"));
        assert_eq!(rearrange("AB1"), None);
    }

    #[test]
    fn expand_maps_letters() {
        assert_eq!(expand("A9z", CharacterPolicy::Permissive).unwrap(), "10935");
        assert_eq!(expand("--", CharacterPolicy::Permissive).unwrap(), "");
    }

    #[test]
    fn mod97_handles_short_and_empty_input() {
        assert_eq!(mod97(""), None);
        assert_eq!(mod97("98"), Some(1));
        assert_eq!(mod97("123456789"), Some(123_456_789 % 97));
    }

    #[test]
    fn mod97_matches_digit_by_digit_reduction() {
        let digits = "3214282912345698765432161182";
        assert_eq!(mod97(digits), Some(naive_mod97(digits)));
        let long: String = (0..200).map(|i| char::from(b'0' + (i * 7 % 10) as u8)).collect();
        for len in 1..long.len() {
            assert_eq!(mod97(&long[..len]), Some(naive_mod97(&long[..len])), "len {}", len);
        }
    }

    #[test]
    fn issue_display_includes_details() {
        let issue = IbanIssue::LengthMismatch { expected: 22, actual: 20 };
        assert_eq!(
            issue.to_string(),
            "IBAN length does not match country specification (expected 22, got 20)"
        );
        assert_eq!(IbanIssue::TooShort.to_string(), "IBAN is too short");
    }
}
