use crate::validator::Validator;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub iban: String,
    pub position: usize,
    pub original: char,
    pub replacement: char,
}

/// Replaces one digit after the country code so that `validator` rejects
/// the result. Candidates are tried in random order until one is rejected.
pub fn corrupt_iban<R: Rng + ?Sized>(
    rng: &mut R,
    iban: &str,
    validator: &Validator,
) -> Result<Mutation, String> {
    corrupt_iban_with(rng, iban, |candidate| !validator.validate(candidate))
}

pub fn corrupt_iban_with<R, F>(rng: &mut R, iban: &str, rejects: F) -> Result<Mutation, String>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut candidates: Vec<(usize, char)> = iban
        .char_indices()
        .skip(2)
        .filter(|(_, ch)| ch.is_ascii_digit())
        .flat_map(|(idx, ch)| {
            ('0'..='9')
                .filter(move |digit| *digit != ch)
                .map(move |digit| (idx, digit))
        })
        .collect();
    if candidates.is_empty() {
        return Err("IBAN has no digits after the country code".to_string());
    }
    candidates.shuffle(rng);

    for (position, replacement) in candidates {
        let mut mutated = String::with_capacity(iban.len());
        mutated.push_str(&iban[..position]);
        mutated.push(replacement);
        mutated.push_str(&iban[position + 1..]);
        if rejects(&mutated) {
            return Ok(Mutation {
                iban: mutated,
                position,
                original: char::from(iban.as_bytes()[position]),
                replacement,
            });
        }
    }

    Err(format!("no single-digit mutation of {} is rejected", iban))
}
