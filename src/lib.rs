//! IBAN validation per ISO 13616: a per-country length table combined with
//! the ISO 7064 MOD 97-10 checksum.
//!
//! ```
//! assert!(iban_checker::validate("DE22790200760027913168"));
//! assert!(!iban_checker::validate("DE21790200760027913173"));
//! ```

pub mod batch;
pub mod corrupt;
pub mod generator;
pub mod logging;
pub mod models;
pub mod reference;
pub mod util;
pub mod validator;

pub use reference::CountryLengths;
pub use validator::{validate, CharacterPolicy, IbanIssue, Validator};
