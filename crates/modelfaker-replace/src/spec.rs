//! Declarative replacer configuration, as written in faker manifests.

use modelfaker_core::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ReplaceError;
use crate::faker_rs::FakeReplacer;
use crate::password::DEFAULT_ITERATIONS;
use crate::replacers::lazy::{
    CompanyEmailReplacer, CompanyWebsiteReplacer, LazyEmailReplacer, LazyPasswordReplacer,
    LazyUsernameReplacer, TextReplacer,
};
use crate::replacers::simple::{
    ChoiceReplacer, ChoiceUniqueReplacer, CompanyReplacer, EmailReplacer, MobileReplacer,
    PhoneReplacer, SerialReplacer,
};
use crate::replacers::{LazyReplacer, Replacer};

/// Replacer kind with its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "replacer", rename_all = "snake_case", deny_unknown_fields)]
pub enum ReplacerSpec {
    Choice {
        choices: Vec<Value>,
    },
    ChoiceUnique {
        choices: Vec<Value>,
        #[serde(default)]
        shuffle: bool,
    },
    Company,
    Email,
    Phone,
    Mobile,
    Serial {
        #[serde(default = "default_serial_len")]
        len: usize,
        #[serde(default)]
        int_only: bool,
    },
    Fake {
        generator: String,
    },
    Text {
        template: String,
        /// Fields feeding the positional placeholders.
        #[serde(default)]
        fields: Vec<String>,
    },
    LazyEmail {
        first: String,
        last: String,
    },
    LazyUsername {
        first: String,
        last: String,
    },
    LazyPassword {
        first: String,
        last: String,
        #[serde(default = "default_iterations")]
        iterations: u32,
    },
    CompanyWebsite {
        field: String,
    },
    CompanyEmail {
        first: String,
        last: String,
        company: String,
    },
}

/// A replacer ready to be bound to a field.
pub enum BuiltReplacer {
    Simple(Box<dyn Replacer>),
    Lazy(Box<dyn LazyReplacer>),
}

impl BuiltReplacer {
    pub fn id(&self) -> &'static str {
        match self {
            BuiltReplacer::Simple(replacer) => replacer.id(),
            BuiltReplacer::Lazy(replacer) => replacer.id(),
        }
    }
}

impl std::fmt::Debug for BuiltReplacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuiltReplacer::Simple(replacer) => write!(f, "Simple({})", replacer.id()),
            BuiltReplacer::Lazy(replacer) => write!(f, "Lazy({})", replacer.id()),
        }
    }
}

impl ReplacerSpec {
    pub fn build(&self) -> Result<BuiltReplacer, ReplaceError> {
        let built = match self {
            ReplacerSpec::Choice { choices } => {
                BuiltReplacer::Simple(Box::new(ChoiceReplacer::new(choices.clone())?))
            }
            ReplacerSpec::ChoiceUnique { choices, shuffle } => BuiltReplacer::Simple(Box::new(
                ChoiceUniqueReplacer::new(choices.clone()).with_shuffle(*shuffle),
            )),
            ReplacerSpec::Company => BuiltReplacer::Simple(Box::new(CompanyReplacer::new())),
            ReplacerSpec::Email => BuiltReplacer::Simple(Box::new(EmailReplacer)),
            ReplacerSpec::Phone => BuiltReplacer::Simple(Box::new(PhoneReplacer)),
            ReplacerSpec::Mobile => BuiltReplacer::Simple(Box::new(MobileReplacer)),
            ReplacerSpec::Serial { len, int_only } => {
                if *len == 0 {
                    return Err(ReplaceError::Invalid(
                        "serial len must be greater than zero".to_string(),
                    ));
                }
                BuiltReplacer::Simple(Box::new(SerialReplacer::new(*len, *int_only)))
            }
            ReplacerSpec::Fake { generator } => {
                BuiltReplacer::Simple(Box::new(FakeReplacer::new(generator)?))
            }
            ReplacerSpec::Text { template, fields } => BuiltReplacer::Lazy(Box::new(
                TextReplacer::with_tokens(template, fields.iter().cloned())?,
            )),
            ReplacerSpec::LazyEmail { first, last } => {
                BuiltReplacer::Lazy(Box::new(LazyEmailReplacer::new(first, last)))
            }
            ReplacerSpec::LazyUsername { first, last } => {
                BuiltReplacer::Lazy(Box::new(LazyUsernameReplacer::new(first, last)))
            }
            ReplacerSpec::LazyPassword {
                first,
                last,
                iterations,
            } => BuiltReplacer::Lazy(Box::new(
                LazyPasswordReplacer::new(first, last).with_iterations(*iterations),
            )),
            ReplacerSpec::CompanyWebsite { field } => {
                BuiltReplacer::Lazy(Box::new(CompanyWebsiteReplacer::new(field)))
            }
            ReplacerSpec::CompanyEmail {
                first,
                last,
                company,
            } => BuiltReplacer::Lazy(Box::new(CompanyEmailReplacer::new(first, last, company))),
        };
        Ok(built)
    }
}

fn default_serial_len() -> usize {
    SerialReplacer::DEFAULT_LEN
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
