use modelfaker_core::{Record, Value};
use rand::RngCore;

use crate::catalog::MAIL_EXTS;
use crate::errors::ReplaceError;
use crate::password::{DEFAULT_ITERATIONS, make_password};
use crate::replacers::{LazyReplacer, field_text, pick, slug_field};
use crate::template::Template;

/// Substitutes record fields into a format template.
#[derive(Debug, Clone)]
pub struct TextReplacer {
    template: Template,
    tokens: Vec<String>,
}

impl TextReplacer {
    /// Template with named placeholders only, e.g. `"Hello {first_name}"`.
    pub fn new(template: &str) -> Result<Self, ReplaceError> {
        Self::with_tokens(template, Vec::<String>::new())
    }

    /// Template whose positional placeholders resolve to `tokens`, in order.
    pub fn with_tokens<I, S>(template: &str, tokens: I) -> Result<Self, ReplaceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            template: Template::parse(template)?,
            tokens: tokens.into_iter().map(Into::into).collect(),
        })
    }

    pub fn fields(&self) -> Vec<&str> {
        self.template.fields(&self.tokens)
    }
}

impl LazyReplacer for TextReplacer {
    fn id(&self) -> &'static str {
        "text"
    }

    fn apply(&mut self, record: &Record, _rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        self.template.render(record, &self.tokens).map(Value::Text)
    }
}

/// `<first>.<last>@<ext>.example.com` from two record fields.
#[derive(Debug, Clone)]
pub struct LazyEmailReplacer {
    first: String,
    last: String,
}

impl LazyEmailReplacer {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

impl LazyReplacer for LazyEmailReplacer {
    fn id(&self) -> &'static str {
        "lazy_email"
    }

    fn apply(&mut self, record: &Record, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let first = slug_field(record, &self.first)?;
        let last = slug_field(record, &self.last)?;
        let ext = pick(MAIL_EXTS, rng);
        Ok(Value::Text(format!("{first}.{last}@{ext}.example.com")))
    }
}

#[derive(Debug, Clone)]
pub struct LazyUsernameReplacer {
    first: String,
    last: String,
}

impl LazyUsernameReplacer {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

impl LazyReplacer for LazyUsernameReplacer {
    fn id(&self) -> &'static str {
        "lazy_username"
    }

    fn apply(&mut self, record: &Record, _rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let first = slug_field(record, &self.first)?;
        let last = slug_field(record, &self.last)?;
        Ok(Value::Text(format!("{first}.{last}")))
    }
}

/// Hashed password whose clear text is the initials of two fields.
///
/// `first_name = "jack"`, `last_name = "doe"` gives the password `JD`.
#[derive(Debug, Clone)]
pub struct LazyPasswordReplacer {
    first: String,
    last: String,
    iterations: u32,
}

impl LazyPasswordReplacer {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }
}

impl LazyReplacer for LazyPasswordReplacer {
    fn id(&self) -> &'static str {
        "lazy_password"
    }

    fn apply(&mut self, record: &Record, rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let raw = format!(
            "{}{}",
            initial(record, &self.first)?,
            initial(record, &self.last)?
        );
        Ok(Value::Text(make_password(&raw, self.iterations, rng)))
    }
}

/// First character of the upper-cased text: `ß` gives `S`, not `SS`.
fn initial(record: &Record, field: &str) -> Result<char, ReplaceError> {
    field_text(record, field)?
        .to_uppercase()
        .chars()
        .next()
        .ok_or_else(|| ReplaceError::EmptyField(field.to_string()))
}

/// `<company>.example.com`.
#[derive(Debug, Clone)]
pub struct CompanyWebsiteReplacer {
    company: String,
}

impl CompanyWebsiteReplacer {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
        }
    }
}

impl LazyReplacer for CompanyWebsiteReplacer {
    fn id(&self) -> &'static str {
        "company_website"
    }

    fn apply(&mut self, record: &Record, _rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let company = slug_field(record, &self.company)?;
        Ok(Value::Text(format!("{company}.example.com")))
    }
}

/// `<first>.<last>@<company>.example.com`.
#[derive(Debug, Clone)]
pub struct CompanyEmailReplacer {
    first: String,
    last: String,
    company: String,
}

impl CompanyEmailReplacer {
    pub fn new(
        first: impl Into<String>,
        last: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            company: company.into(),
        }
    }
}

impl LazyReplacer for CompanyEmailReplacer {
    fn id(&self) -> &'static str {
        "company_email"
    }

    fn apply(&mut self, record: &Record, _rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        let first = slug_field(record, &self.first)?;
        let last = slug_field(record, &self.last)?;
        let company = slug_field(record, &self.company)?;
        Ok(Value::Text(format!("{first}.{last}@{company}.example.com")))
    }
}

type Callback = Box<dyn FnMut(&Record) -> Result<Value, ReplaceError> + Send>;

/// Delegates to a closure computing the value from the record.
pub struct CallbackReplacer {
    callback: Callback,
}

impl CallbackReplacer {
    pub fn new(
        callback: impl FnMut(&Record) -> Result<Value, ReplaceError> + Send + 'static,
    ) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl std::fmt::Debug for CallbackReplacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallbackReplacer")
    }
}

impl LazyReplacer for CallbackReplacer {
    fn id(&self) -> &'static str {
        "callback"
    }

    fn apply(&mut self, record: &Record, _rng: &mut dyn RngCore) -> Result<Value, ReplaceError> {
        (self.callback)(record)
    }
}
