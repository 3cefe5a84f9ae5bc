use std::fmt;
use std::sync::Arc;

use crate::record::Record;
use crate::value::Value;

type CustomPredicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Condition evaluated against each record of a model.
#[derive(Clone, Default)]
pub enum Predicate {
    /// Matches every record.
    #[default]
    All,
    /// Field equals value; an absent field compares as `Null`.
    Eq(String, Value),
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    /// Matches when any inner predicate matches.
    Any(Vec<Predicate>),
    Custom(CustomPredicate),
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(field.into(), value.into())
    }

    pub fn custom(check: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        Predicate::Custom(Arc::new(check))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Eq(field, value) => record.value(field) == value,
            Predicate::Not(inner) => !inner.matches(record),
            Predicate::And(inner) => inner.iter().all(|p| p.matches(record)),
            Predicate::Any(inner) => inner.iter().any(|p| p.matches(record)),
            Predicate::Custom(check) => check(record),
        }
    }

    /// Field names referenced by equality conditions, depth first.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Eq(field, _) => out.push(field.as_str()),
            Predicate::Not(inner) => inner.collect_fields(out),
            Predicate::And(inner) | Predicate::Any(inner) => {
                for predicate in inner {
                    predicate.collect_fields(out);
                }
            }
            Predicate::All | Predicate::Custom(_) => {}
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => f.write_str("All"),
            Predicate::Eq(field, value) => f.debug_tuple("Eq").field(field).field(value).finish(),
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Predicate::And(inner) => f.debug_tuple("And").field(inner).finish(),
            Predicate::Any(inner) => f.debug_tuple("Any").field(inner).finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A model plus the predicate selecting some of its records.
#[derive(Debug, Clone)]
pub struct Selection {
    pub model: String,
    pub predicate: Predicate,
}

impl Selection {
    pub fn all(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            predicate: Predicate::All,
        }
    }

    pub fn filter(model: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            model: model.into(),
            predicate,
        }
    }

    /// Shorthand for a single `field == value` condition.
    pub fn where_eq(
        model: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::filter(model, Predicate::eq(field, value))
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.model == self.model && self.predicate.matches(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::new("shop.Customer", 1)
            .with_field("name", "Ada")
            .with_field("old", true)
    }

    #[test]
    fn absent_field_compares_as_null() {
        assert!(Predicate::eq("missing", Value::Null).matches(&record()));
        assert!(!Predicate::eq("missing", "x").matches(&record()));
    }

    #[test]
    fn combinators_compose() {
        let predicate = Predicate::And(vec![
            Predicate::eq("old", true),
            Predicate::not(Predicate::eq("name", "Bob")),
        ]);
        assert!(predicate.matches(&record()));
        assert_eq!(predicate.fields(), vec!["old", "name"]);
    }

    #[test]
    fn selection_checks_model() {
        let selection = Selection::where_eq("shop.Order", "old", true);
        assert!(!selection.matches(&record()));
    }
}
