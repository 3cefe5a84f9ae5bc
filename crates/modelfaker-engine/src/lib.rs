//! Faking orchestration for modelfaker.
//!
//! A `FakerDeclaration` describes how one model is anonymized. Declarations
//! live in a `FakerRegistry`, which resolves their dependencies once; an
//! `Orchestrator` then runs them against a `DataStore`: dependencies first,
//! then deletions, then field replacement with uniqueness retries.

pub mod coordinator;
pub mod declaration;
pub mod errors;
pub mod manifest;
pub mod model;
pub mod observer;
pub mod orchestrator;
pub mod registry;
pub mod settings;

pub use coordinator::{DeclarationSource, Scope, StaticSource, discover, fake_scope, run_all};
pub use declaration::{DeclarationId, FakerDeclaration, FieldBinding};
pub use errors::{ConfigurationError, FakerError, UnicityError};
pub use manifest::{DeclarationSpec, ManifestSource};
pub use model::{DeclarationReport, RunOptions, RunReport};
pub use observer::{FakeEvent, FakeObserver, NoopObserver, RecordingObserver};
pub use orchestrator::{Orchestrator, UpdateOutcome};
pub use registry::FakerRegistry;
pub use settings::FakerSettings;
