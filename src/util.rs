use crate::validator::{expand, mod97, CharacterPolicy};
use rand::Rng;

pub fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let digit = rng.gen_range(0..10);
        out.push(char::from(b'0' + digit as u8));
    }
    out
}

pub fn iban_check_digits(country: &str, bban: &str) -> Result<String, String> {
    if country.len() != 2 || !country.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err("IBAN country code must be 2 letters".to_string());
    }
    let combined = format!("{}{}00", bban, country.to_ascii_uppercase());
    let digits = expand(&combined, CharacterPolicy::Strict)
        .map_err(|_| "IBAN contains invalid character".to_string())?;
    let remainder = mod97(&digits).ok_or_else(|| "IBAN has no digits".to_string())?;

    let check = 98 - remainder;
    Ok(format!("{:02}", check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn computes_known_check_digits() {
        assert_eq!(iban_check_digits("DE", "370400440532013000").unwrap(), "89");
        assert_eq!(iban_check_digits("AT", "1904300234573201").unwrap(), "61");
        assert_eq!(iban_check_digits("GB", "WEST12345698765432").unwrap(), "82");
    }

    #[test]
    fn pads_single_digit_check() {
        assert_eq!(iban_check_digits("DE", "370400440532013003").unwrap(), "08");
        assert_eq!(iban_check_digits("DE", "790200760027913168").unwrap(), "22");
    }

    #[test]
    fn rejects_bad_country_and_characters() {
        assert!(iban_check_digits("D", "1234").is_err());
        assert!(iban_check_digits("D1", "1234").is_err());
        assert!(iban_check_digits("DE", "12-34").is_err());
    }

    #[test]
    fn random_digits_are_digits() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let value = random_digits(&mut rng, 32);
        assert_eq!(value.len(), 32);
        assert!(value.chars().all(|ch| ch.is_ascii_digit()));
    }
}
