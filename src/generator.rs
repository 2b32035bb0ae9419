use crate::reference::CountryLengths;
use crate::util::{iban_check_digits, random_digits};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn generate_iban<R: Rng + ?Sized>(
    rng: &mut R,
    lengths: &CountryLengths,
    country: &str,
) -> Result<String, String> {
    let length = lengths
        .expected_length(country)
        .ok_or_else(|| format!("IBAN length not known for country {}", country))?;
    let bban_len = length.saturating_sub(4);
    let bban = random_digits(rng, bban_len);
    let check = iban_check_digits(country, &bban)?;
    Ok(format!("{}{}{}", country, check, bban))
}

pub fn generate_ibans(
    lengths: &CountryLengths,
    country: &str,
    count: usize,
    seed: u64,
) -> Result<Vec<String>, String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(generate_iban(&mut rng, lengths, country)?);
    }
    log::debug!("generated {} {} IBANs (seed {})", out.len(), country, seed);
    Ok(out)
}
