//! Faker declarations read from a TOML manifest.
//!
//! ```toml
//! [[faker]]
//! app = "shop"
//! name = "CustomerFaker"
//! target = "Customer"
//! depends_on = ["shop.CompanyFaker"]
//!
//! [faker.deletion_filter]
//! is_staff = true
//!
//! [faker.fields]
//! first_name = { replacer = "fake", generator = "first_name" }
//! last_name = { replacer = "fake", generator = "last_name" }
//! email = { replacer = "lazy_email", first = "first_name", last = "last_name" }
//! newsletter = false
//! ```
//!
//! Filter tables are conjunctions of `field = value` equalities; an empty
//! table selects every record. A field binding is either a bare value, a
//! `{ constant = ... }` table or a replacer table.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use modelfaker_core::{Predicate, Selection, Value};
use modelfaker_replace::ReplacerSpec;

use crate::coordinator::DeclarationSource;
use crate::declaration::{DeclarationId, FakerDeclaration, FieldBinding};
use crate::errors::{ConfigurationError, FakerError};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    faker: Vec<DeclarationSpec>,
}

/// One `[[faker]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSpec {
    pub app: String,
    pub name: String,
    #[serde(default)]
    pub target: Option<String>,
    /// `app.Name` ids; a bare name refers to the same app.
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub deletion_filter: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub update_filter: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub fields: toml::Table,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BindingSpec {
    Constant { constant: Value },
    Replacer(ReplacerSpec),
    Literal(Value),
}

impl DeclarationSpec {
    pub fn id(&self) -> DeclarationId {
        DeclarationId::new(&self.app, &self.name)
    }

    pub fn build(&self) -> Result<FakerDeclaration, ConfigurationError> {
        let id = self.id();
        let mut declaration = FakerDeclaration::with_id(id.clone());
        let model = self.target.clone().unwrap_or_default();
        if let Some(target) = &self.target {
            declaration = declaration.target(target);
        }

        for raw in &self.depends_on {
            let dependency = if raw.contains('.') {
                DeclarationId::parse(raw)?
            } else {
                DeclarationId::new(&self.app, raw)
            };
            declaration = declaration.depends_on(dependency);
        }

        if let Some(filter) = &self.deletion_filter {
            declaration = declaration.deletion_filter(selection(&model, filter));
        }
        if let Some(filter) = &self.update_filter {
            declaration = declaration.update_filter(selection(&model, filter));
        }

        for (field, raw) in &self.fields {
            let spec: BindingSpec = raw.clone().try_into().map_err(|err| {
                ConfigurationError::Manifest(format!("faker '{id}' field '{field}': {err}"))
            })?;
            let binding = match spec {
                BindingSpec::Constant { constant } => FieldBinding::Constant(constant),
                BindingSpec::Literal(value) => FieldBinding::Constant(value),
                BindingSpec::Replacer(spec) => spec
                    .build()
                    .map_err(|err| {
                        ConfigurationError::Manifest(format!("faker '{id}' field '{field}': {err}"))
                    })?
                    .into(),
            };
            declaration = declaration.bind(field.as_str(), binding);
        }
        Ok(declaration)
    }
}

fn selection(model: &str, filter: &BTreeMap<String, Value>) -> Selection {
    let mut conditions: Vec<Predicate> = filter
        .iter()
        .map(|(field, value)| Predicate::eq(field.as_str(), value.clone()))
        .collect();
    let predicate = match conditions.len() {
        0 => Predicate::All,
        1 => conditions.remove(0),
        _ => Predicate::And(conditions),
    };
    Selection::filter(model, predicate)
}

/// Declarations described by a TOML manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestSource {
    specs: Vec<DeclarationSpec>,
}

impl ManifestSource {
    /// Parses the manifest and checks every entry builds.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        let file: ManifestFile =
            toml::from_str(content).map_err(|err| ConfigurationError::Manifest(err.to_string()))?;
        for spec in &file.faker {
            spec.build()?;
        }
        Ok(Self { specs: file.faker })
    }

    pub fn load(path: &Path) -> Result<Self, FakerError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    pub fn specs(&self) -> &[DeclarationSpec] {
        &self.specs
    }
}

impl DeclarationSource for ManifestSource {
    fn load_declarations(&self) -> Result<Vec<FakerDeclaration>, FakerError> {
        let declarations = self
            .specs
            .iter()
            .map(DeclarationSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(declarations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_keep_declared_order_and_kind() {
        let source = ManifestSource::from_toml_str(
            r#"
            [[faker]]
            app = "tests"
            name = "AFaker"
            target = "A"
            depends_on = ["BFaker", "other.CFaker"]

            [faker.fields]
            y = { replacer = "text", template = "Hello {0}", fields = ["x"] }
            w = "dummyA"
            x = { replacer = "choice", choices = ["Jack"] }
            z = { constant = 3 }
            "#,
        )
        .expect("manifest");
        let declaration = source.specs()[0].build().expect("declaration");

        assert_eq!(
            declaration.dependencies(),
            [
                DeclarationId::new("tests", "BFaker"),
                DeclarationId::new("other", "CFaker")
            ]
        );
        let bindings: Vec<String> = declaration
            .bindings()
            .iter()
            .map(|(field, binding)| format!("{field}={binding:?}"))
            .collect();
        assert_eq!(
            bindings,
            [
                "y=Lazy(text)",
                "w=Constant(Text(\"dummyA\"))",
                "x=Simple(choice)",
                "z=Constant(Int(3))"
            ]
        );
    }

    #[test]
    fn filters_become_equality_conjunctions() {
        let filter: BTreeMap<String, Value> = [
            ("old".to_string(), Value::Bool(true)),
            ("w".to_string(), Value::from("foo")),
        ]
        .into();
        let selection = selection("A", &filter);
        assert_eq!(selection.model, "A");
        assert_eq!(selection.predicate.fields(), ["old", "w"]);
        assert!(matches!(selection.predicate, Predicate::And(_)));
        assert!(matches!(
            super::selection("A", &BTreeMap::new()).predicate,
            Predicate::All
        ));
    }

    #[test]
    fn malformed_manifests_are_configuration_errors() {
        let not_a_table = ManifestSource::from_toml_str(
            "[[faker]]\napp = \"a\"\nname = \"B\"\ndeletion_filter = \"old\"\n",
        );
        assert!(matches!(not_a_table, Err(ConfigurationError::Manifest(_))));

        let bad_replacer = ManifestSource::from_toml_str(
            "[[faker]]\napp = \"a\"\nname = \"B\"\n[faker.fields]\nx = { replacer = \"choice\", choices = [] }\n",
        );
        assert!(
            matches!(bad_replacer, Err(ConfigurationError::Manifest(message)) if message.contains("'x'"))
        );
    }
}
