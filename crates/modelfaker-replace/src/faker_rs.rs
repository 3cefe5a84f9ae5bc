//! Adapter exposing `fake` crate generators as replacers.

use fake::Fake;
use fake::faker::address::en::{CityName, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use modelfaker_core::Value;
use rand::RngCore;

use crate::errors::ReplaceError;
use crate::replacers::Replacer;

/// Generator ids accepted by `FakeReplacer::new`.
pub const FAKE_IDS: &[&str] = &[
    "name",
    "first_name",
    "last_name",
    "email",
    "username",
    "phone",
    "company",
    "city",
    "street",
    "zip",
    "word",
    "sentence",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FakeKind {
    Name,
    FirstName,
    LastName,
    Email,
    Username,
    Phone,
    Company,
    City,
    Street,
    Zip,
    Word,
    Sentence,
}

impl FakeKind {
    fn parse(id: &str) -> Option<Self> {
        let kind = match id.to_lowercase().as_str() {
            "name" | "full_name" => FakeKind::Name,
            "first_name" => FakeKind::FirstName,
            "last_name" => FakeKind::LastName,
            "email" | "safe_email" => FakeKind::Email,
            "username" | "user_name" => FakeKind::Username,
            "phone" | "phone_number" => FakeKind::Phone,
            "company" | "company_name" => FakeKind::Company,
            "city" => FakeKind::City,
            "street" | "street_name" => FakeKind::Street,
            "zip" | "zip_code" | "postal_code" => FakeKind::Zip,
            "word" => FakeKind::Word,
            "sentence" => FakeKind::Sentence,
            _ => return None,
        };
        Some(kind)
    }
}

/// English-locale value from the `fake` crate.
#[derive(Debug, Clone)]
pub struct FakeReplacer {
    kind: FakeKind,
}

impl FakeReplacer {
    pub fn new(generator: &str) -> Result<Self, ReplaceError> {
        let kind = FakeKind::parse(generator)
            .ok_or_else(|| ReplaceError::UnknownGenerator(generator.to_string()))?;
        Ok(Self { kind })
    }
}

impl Replacer for FakeReplacer {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let text: String = match self.kind {
            FakeKind::Name => Name().fake_with_rng(rng),
            FakeKind::FirstName => FirstName().fake_with_rng(rng),
            FakeKind::LastName => LastName().fake_with_rng(rng),
            FakeKind::Email => SafeEmail().fake_with_rng(rng),
            FakeKind::Username => Username().fake_with_rng(rng),
            FakeKind::Phone => PhoneNumber().fake_with_rng(rng),
            FakeKind::Company => CompanyName().fake_with_rng(rng),
            FakeKind::City => CityName().fake_with_rng(rng),
            FakeKind::Street => StreetName().fake_with_rng(rng),
            FakeKind::Zip => ZipCode().fake_with_rng(rng),
            FakeKind::Word => Word().fake_with_rng(rng),
            FakeKind::Sentence => Sentence(3..8).fake_with_rng(rng),
        };
        Ok(Value::Text(text))
    }
}
