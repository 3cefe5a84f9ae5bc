//! Value replacers for modelfaker.
//!
//! A replacer produces the synthetic value written into one field of a
//! record. Context-free replacers (`Replacer`) know nothing about the record,
//! context-aware ones (`LazyReplacer`) derive their value from fields that
//! were already replaced in the same pass.

pub mod catalog;
pub mod errors;
pub mod faker_rs;
pub mod password;
pub mod replacers;
pub mod spec;
pub mod template;

pub use errors::ReplaceError;
pub use faker_rs::FakeReplacer;
pub use password::{check_password, make_password};
pub use replacers::lazy::{
    CallbackReplacer, CompanyEmailReplacer, CompanyWebsiteReplacer, LazyEmailReplacer,
    LazyPasswordReplacer, LazyUsernameReplacer, TextReplacer,
};
pub use replacers::simple::{
    ChoiceReplacer, ChoiceUniqueReplacer, CompanyReplacer, EmailReplacer, MobileReplacer,
    PhoneReplacer, SerialReplacer,
};
pub use replacers::{LazyReplacer, Replacer};
pub use spec::{BuiltReplacer, ReplacerSpec};
pub use template::Template;
