use modelfaker_core::Value;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};

use crate::catalog::{COMPANIES, COMPANY_SUFFIXES, FIRST_NAMES, LAST_NAMES, MAIL_EXTS};
use crate::errors::ReplaceError;
use crate::replacers::{Replacer, pick};

/// Uniform pick from a fixed set; values may repeat across records.
#[derive(Debug, Clone)]
pub struct ChoiceReplacer {
    choices: Vec<Value>,
}

impl ChoiceReplacer {
    pub fn new<I, V>(choices: I) -> Result<Self, ReplaceError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();
        if choices.is_empty() {
            return Err(ReplaceError::EmptyChoices);
        }
        Ok(Self { choices })
    }
}

impl Replacer for ChoiceReplacer {
    fn id(&self) -> &'static str {
        "choice"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        self.choices
            .choose(rng)
            .cloned()
            .ok_or(ReplaceError::EmptyChoices)
    }
}

/// Pops values from a shrinking pool, so no value is handed out twice.
///
/// Without shuffling, values come out from the end of the pool. Calling it
/// more times than the pool holds fails with `ReplaceError::Exhausted`.
#[derive(Debug, Clone)]
pub struct ChoiceUniqueReplacer {
    pool: Vec<Value>,
    shuffle: bool,
    picked: usize,
}

impl ChoiceUniqueReplacer {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            pool: choices.into_iter().map(Into::into).collect(),
            shuffle: false,
            picked: 0,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }
}

impl Replacer for ChoiceUniqueReplacer {
    fn id(&self) -> &'static str {
        "choice_unique"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        if self.shuffle {
            self.pool.shuffle(rng);
        }
        let value = self.pool.pop().ok_or(ReplaceError::Exhausted {
            picked: self.picked,
        })?;
        self.picked += 1;
        Ok(value)
    }
}

/// Company name built from a name token and a suffix token.
#[derive(Debug, Clone)]
pub struct CompanyReplacer {
    names: Vec<String>,
    suffixes: Vec<String>,
}

impl CompanyReplacer {
    pub fn new() -> Self {
        Self {
            names: COMPANIES.iter().map(|s| s.to_string()).collect(),
            suffixes: COMPANY_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_pools(names: Vec<String>, suffixes: Vec<String>) -> Result<Self, ReplaceError> {
        if names.is_empty() || suffixes.is_empty() {
            return Err(ReplaceError::EmptyChoices);
        }
        Ok(Self { names, suffixes })
    }
}

impl Default for CompanyReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replacer for CompanyReplacer {
    fn id(&self) -> &'static str {
        "company"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let name = self.names.choose(rng).ok_or(ReplaceError::EmptyChoices)?;
        let suffix = self.suffixes.choose(rng).ok_or(ReplaceError::EmptyChoices)?;
        let value = if rng.random_bool(0.5) {
            format!("{name} {suffix}")
        } else {
            format!("{suffix} {name}")
        };
        Ok(Value::Text(value))
    }
}

/// `first.last@ext.example.com` from the name pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailReplacer;

impl Replacer for EmailReplacer {
    fn id(&self) -> &'static str {
        "email"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let first = slug::slugify(pick(FIRST_NAMES, rng));
        let last = slug::slugify(pick(LAST_NAMES, rng));
        let ext = pick(MAIL_EXTS, rng);
        Ok(Value::Text(format!("{first}.{last}@{ext}.example.com")))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneReplacer;

impl Replacer for PhoneReplacer {
    fn id(&self) -> &'static str {
        "phone"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        Ok(Value::Text(french_number(rng)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MobileReplacer;

impl Replacer for MobileReplacer {
    fn id(&self) -> &'static str {
        "mobile"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        Ok(Value::Text(french_number(rng)))
    }
}

fn french_number(rng: &mut dyn RngCore) -> String {
    let prefix = rng.random_range(1..=9);
    let line = rng.random_range(10_000_000..=99_999_999);
    format!("(+33){prefix}{line}")
}

/// Upper-cased prefix of a random 128-bit identifier.
#[derive(Debug, Clone, Copy)]
pub struct SerialReplacer {
    len: usize,
    int_only: bool,
}

impl SerialReplacer {
    pub const DEFAULT_LEN: usize = 12;

    pub fn new(len: usize, int_only: bool) -> Self {
        Self { len, int_only }
    }
}

impl Default for SerialReplacer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEN, false)
    }
}

impl Replacer for SerialReplacer {
    fn id(&self) -> &'static str {
        "serial"
    }

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let mut bytes = [0_u8; 16];
        rng.fill_bytes(&mut bytes);
        let raw = if self.int_only {
            u128::from_be_bytes(bytes).to_string()
        } else {
            hex::encode_upper(bytes)
        };
        Ok(Value::Text(raw.chars().take(self.len).collect()))
    }
}
