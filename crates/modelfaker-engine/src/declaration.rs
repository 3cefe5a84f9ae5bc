//! Faker declarations: the anonymization policy of one model.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use modelfaker_core::{Selection, Value};
use modelfaker_replace::{BuiltReplacer, LazyReplacer, Replacer};

use crate::errors::ConfigurationError;

/// Stable `<app>.<Name>` identifier of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclarationId {
    app: String,
    name: String,
}

impl DeclarationId {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
        }
    }

    /// Parses `app.Name`; the last `.` separates the app from the name.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        match raw.rsplit_once('.') {
            Some((app, name)) if !app.is_empty() && !name.is_empty() => Ok(Self::new(app, name)),
            _ => Err(ConfigurationError::InvalidDeclarationId(raw.to_string())),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app, self.name)
    }
}

impl FromStr for DeclarationId {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// How one field gets its replacement value.
pub enum FieldBinding {
    Constant(Value),
    Simple(Box<dyn Replacer>),
    Lazy(Box<dyn LazyReplacer>),
}

impl FieldBinding {
    /// Evaluation group: constants first, then simple, then lazy replacers.
    pub(crate) fn stage(&self) -> u8 {
        match self {
            FieldBinding::Constant(_) => 0,
            FieldBinding::Simple(_) => 1,
            FieldBinding::Lazy(_) => 2,
        }
    }
}

impl From<BuiltReplacer> for FieldBinding {
    fn from(built: BuiltReplacer) -> Self {
        match built {
            BuiltReplacer::Simple(replacer) => FieldBinding::Simple(replacer),
            BuiltReplacer::Lazy(replacer) => FieldBinding::Lazy(replacer),
        }
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldBinding::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            FieldBinding::Simple(replacer) => write!(f, "Simple({})", replacer.id()),
            FieldBinding::Lazy(replacer) => write!(f, "Lazy({})", replacer.id()),
        }
    }
}

/// Anonymization policy for exactly one model.
///
/// Built once with the chained setters below, then handed to a
/// `FakerRegistry`. Records of `target` matching `deletion_filter` are
/// deleted; records matching `update_filter` (all records when unset) get
/// their bound fields replaced and are saved.
#[derive(Debug)]
pub struct FakerDeclaration {
    id: DeclarationId,
    target: Option<String>,
    deletion_filter: Option<Selection>,
    update_filter: Option<Selection>,
    dependencies: Vec<DeclarationId>,
    bindings: Vec<(String, FieldBinding)>,
    has_run: bool,
}

impl FakerDeclaration {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_id(DeclarationId::new(app, name))
    }

    pub fn with_id(id: DeclarationId) -> Self {
        Self {
            id,
            target: None,
            deletion_filter: None,
            update_filter: None,
            dependencies: Vec::new(),
            bindings: Vec::new(),
            has_run: false,
        }
    }

    pub fn target(mut self, model: impl Into<String>) -> Self {
        self.target = Some(model.into());
        self
    }

    pub fn deletion_filter(mut self, selection: Selection) -> Self {
        self.deletion_filter = Some(selection);
        self
    }

    pub fn update_filter(mut self, selection: Selection) -> Self {
        self.update_filter = Some(selection);
        self
    }

    pub fn depends_on(mut self, dependency: DeclarationId) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn bind(mut self, field: impl Into<String>, binding: FieldBinding) -> Self {
        self.bindings.push((field.into(), binding));
        self
    }

    pub fn constant(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(field, FieldBinding::Constant(value.into()))
    }

    pub fn simple(self, field: impl Into<String>, replacer: impl Replacer + 'static) -> Self {
        self.bind(field, FieldBinding::Simple(Box::new(replacer)))
    }

    pub fn lazy(self, field: impl Into<String>, replacer: impl LazyReplacer + 'static) -> Self {
        self.bind(field, FieldBinding::Lazy(Box::new(replacer)))
    }

    pub fn id(&self) -> &DeclarationId {
        &self.id
    }

    pub fn target_model(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn deletion(&self) -> Option<&Selection> {
        self.deletion_filter.as_ref()
    }

    pub fn update(&self) -> Option<&Selection> {
        self.update_filter.as_ref()
    }

    pub fn dependencies(&self) -> &[DeclarationId] {
        &self.dependencies
    }

    pub fn bindings(&self) -> &[(String, FieldBinding)] {
        &self.bindings
    }

    pub(crate) fn bindings_mut(&mut self) -> &mut [(String, FieldBinding)] {
        &mut self.bindings
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }

    pub(crate) fn mark_run(&mut self) {
        self.has_run = true;
    }

    pub(crate) fn rearm(&mut self) {
        self.has_run = false;
    }

    /// Binding indices in evaluation order: constants, simple, lazy, each
    /// group in declared order.
    pub(crate) fn evaluation_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.bindings.len()).collect();
        order.sort_by_key(|&index| self.bindings[index].1.stage());
        order
    }

    /// Checks the declaration is complete and consistent.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let Some(target) = self.target.as_deref() else {
            return Err(ConfigurationError::MissingTarget(self.id.clone()));
        };
        if let Some(selection) = &self.deletion_filter {
            self.check_filter("deletion", target, selection)?;
        }
        if let Some(selection) = &self.update_filter {
            self.check_filter("update", target, selection)?;
        }

        let mut seen = BTreeSet::new();
        for (field, _) in &self.bindings {
            if !seen.insert(field.as_str()) {
                return Err(ConfigurationError::DuplicateField {
                    declaration: self.id.clone(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_filter(
        &self,
        filter: &'static str,
        target: &str,
        selection: &Selection,
    ) -> Result<(), ConfigurationError> {
        let reason = if selection.model != target {
            Some(format!(
                "selects model '{}' instead of '{target}'",
                selection.model
            ))
        } else if selection.predicate.fields().iter().any(|f| f.is_empty()) {
            Some("condition on an empty field name".to_string())
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ConfigurationError::InvalidFilter {
                declaration: self.id.clone(),
                filter,
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use modelfaker_core::Predicate;
    use modelfaker_replace::{ChoiceReplacer, TextReplacer};

    use super::*;

    #[test]
    fn parses_ids_on_last_dot() {
        let id = DeclarationId::parse("billing.core.InvoiceFaker").expect("id");
        assert_eq!(id.app(), "billing.core");
        assert_eq!(id.name(), "InvoiceFaker");
        assert_eq!(id.to_string(), "billing.core.InvoiceFaker");
        assert!(DeclarationId::parse("InvoiceFaker").is_err());
        assert!(DeclarationId::parse("billing.").is_err());
    }

    #[test]
    fn evaluation_order_groups_by_kind() {
        let declaration = FakerDeclaration::new("app", "AFaker")
            .target("A")
            .lazy("greeting", TextReplacer::new("Hello {name}").expect("template"))
            .simple("name", ChoiceReplacer::new(["Jack"]).expect("choices"))
            .constant("kind", "dummy")
            .lazy("farewell", TextReplacer::new("Bye {name}").expect("template"))
            .constant("flag", true);
        let fields: Vec<&str> = declaration
            .evaluation_order()
            .into_iter()
            .map(|index| declaration.bindings()[index].0.as_str())
            .collect();
        assert_eq!(fields, ["kind", "flag", "name", "greeting", "farewell"]);
    }

    #[test]
    fn validate_rejects_incomplete_declarations() {
        let missing = FakerDeclaration::new("app", "AFaker");
        assert!(matches!(
            missing.validate(),
            Err(ConfigurationError::MissingTarget(_))
        ));

        let wrong_model = FakerDeclaration::new("app", "AFaker")
            .target("A")
            .deletion_filter(Selection::all("B"));
        assert!(matches!(
            wrong_model.validate(),
            Err(ConfigurationError::InvalidFilter { filter: "deletion", .. })
        ));

        let empty_field = FakerDeclaration::new("app", "AFaker")
            .target("A")
            .update_filter(Selection::filter("A", Predicate::not(Predicate::eq("", 1))));
        assert!(matches!(
            empty_field.validate(),
            Err(ConfigurationError::InvalidFilter { filter: "update", .. })
        ));

        let duplicated = FakerDeclaration::new("app", "AFaker")
            .target("A")
            .constant("w", "x")
            .constant("w", "y");
        assert!(matches!(
            duplicated.validate(),
            Err(ConfigurationError::DuplicateField { field, .. }) if field == "w"
        ));

        let valid = FakerDeclaration::new("app", "AFaker")
            .target("A")
            .deletion_filter(Selection::where_eq("A", "old", true))
            .update_filter(Selection::where_eq("A", "w", "foo"));
        assert!(valid.validate().is_ok());
    }
}
