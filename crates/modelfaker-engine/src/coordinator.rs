//! Discovery of faker declarations and whole-scope runs.

use tracing::info;

use modelfaker_core::DataStore;

use crate::declaration::{DeclarationId, FakerDeclaration};
use crate::errors::{ConfigurationError, FakerError};
use crate::model::{RunOptions, RunReport};
use crate::observer::FakeObserver;
use crate::orchestrator::Orchestrator;
use crate::registry::FakerRegistry;
use crate::settings::FakerSettings;

/// Provides every declaration known to the process.
pub trait DeclarationSource {
    fn load_declarations(&self) -> Result<Vec<FakerDeclaration>, FakerError>;
}

type Factory = Box<dyn Fn() -> FakerDeclaration>;

/// Declarations registered in code, built afresh on every load.
#[derive(Default)]
pub struct StaticSource {
    factories: Vec<Factory>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, factory: impl Fn() -> FakerDeclaration + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }
}

impl DeclarationSource for StaticSource {
    fn load_declarations(&self) -> Result<Vec<FakerDeclaration>, FakerError> {
        Ok(self.factories.iter().map(|factory| factory()).collect())
    }
}

/// Which declarations a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    App(String),
    Declaration(DeclarationId),
}

impl Scope {
    /// Scope from optional app and declaration names, as given on the
    /// command line. A declaration name requires its app.
    pub fn new(app: Option<&str>, declaration: Option<&str>) -> Result<Self, ConfigurationError> {
        match (app, declaration) {
            (None, None) => Ok(Scope::All),
            (Some(app), None) => Ok(Scope::App(app.to_string())),
            (Some(app), Some(name)) => Ok(Scope::Declaration(DeclarationId::new(app, name))),
            (None, Some(name)) => Err(ConfigurationError::DeclarationWithoutApp(name.to_string())),
        }
    }
}

/// Loads every declaration of `source` into a registry, so cross-app
/// dependencies resolve, and returns the ids `scope` selects in source order.
pub fn discover(
    source: &dyn DeclarationSource,
    scope: &Scope,
) -> Result<(FakerRegistry, Vec<DeclarationId>), FakerError> {
    let declarations = source.load_declarations()?;
    let loaded: Vec<DeclarationId> = declarations
        .iter()
        .map(|declaration| declaration.id().clone())
        .collect();
    let registry = FakerRegistry::build(declarations)?;

    let selection: Vec<DeclarationId> = match scope {
        Scope::All => loaded,
        Scope::App(app) => {
            let ids: Vec<DeclarationId> = loaded.into_iter().filter(|id| id.app() == app).collect();
            if ids.is_empty() {
                return Err(ConfigurationError::UnknownApp(app.clone()).into());
            }
            ids
        }
        Scope::Declaration(id) => {
            if !registry.contains(id) {
                return Err(ConfigurationError::UnknownDeclaration(id.to_string()).into());
            }
            vec![id.clone()]
        }
    };
    info!(
        declarations = registry.len(),
        selected = selection.len(),
        "fakers discovered"
    );
    Ok((registry, selection))
}

/// Runs each selected declaration between the before-all and after-all
/// notifications. Declarations that already ran are skipped.
pub fn run_all(
    orchestrator: &mut Orchestrator<'_>,
    selection: &[DeclarationId],
    options: RunOptions,
) -> Result<(), FakerError> {
    let observer = orchestrator.observer();
    observer.before_fake_all(selection);
    for id in selection {
        orchestrator.run(id, options)?;
    }
    observer.after_fake_all(selection);
    Ok(())
}

/// Discovers the scope, then fakes it against `store`.
pub fn fake_scope(
    source: &dyn DeclarationSource,
    scope: &Scope,
    store: &mut dyn DataStore,
    settings: &FakerSettings,
    observer: &dyn FakeObserver,
    options: RunOptions,
) -> Result<RunReport, FakerError> {
    let (mut registry, selection) = discover(source, scope)?;
    let mut orchestrator =
        Orchestrator::new(&mut registry, store, settings)?.with_observer(observer);
    run_all(&mut orchestrator, &selection, options)?;
    Ok(orchestrator.into_report())
}
