use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use modelfaker_core::{DataStore, Record, Selection, Uniqueness};
use modelfaker_replace::ReplaceError;

use crate::declaration::{DeclarationId, FakerDeclaration, FieldBinding};
use crate::errors::{ConfigurationError, FakerError, UnicityError};
use crate::model::{DeclarationReport, RunOptions, RunReport};
use crate::observer::{FakeObserver, NoopObserver};
use crate::registry::FakerRegistry;
use crate::settings::FakerSettings;

static NOOP: NoopObserver = NoopObserver;

/// Counters of one update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Records saved.
    pub updated: usize,
    /// Attempts thrown away after a uniqueness conflict.
    pub retries: u64,
}

/// Executes faker declarations against a store.
///
/// Creating one fails when the settings do not validate, e.g. `max_tries = 0`.
///
/// A session borrows the registry (for the declarations and their `has_run`
/// flags) and the store, and owns the RNG feeding every replacer plus the
/// report of what ran.
pub struct Orchestrator<'a> {
    registry: &'a mut FakerRegistry,
    store: &'a mut dyn DataStore,
    observer: &'a dyn FakeObserver,
    max_tries: u32,
    rng: ChaCha8Rng,
    report: RunReport,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        registry: &'a mut FakerRegistry,
        store: &'a mut dyn DataStore,
        settings: &FakerSettings,
    ) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            registry,
            store,
            observer: &NOOP,
            max_tries: settings.max_tries,
            rng,
            report: RunReport::default(),
        })
    }

    pub fn with_observer(mut self, observer: &'a dyn FakeObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn observer(&self) -> &'a dyn FakeObserver {
        self.observer
    }

    pub fn registry(&self) -> &FakerRegistry {
        self.registry
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    fn declaration(&self, id: &DeclarationId) -> Result<&FakerDeclaration, ConfigurationError> {
        self.registry
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownDeclaration(id.to_string()))
    }

    pub fn validate(&self, id: &DeclarationId) -> Result<(), FakerError> {
        self.declaration(id)?.validate()?;
        Ok(())
    }

    /// Runs every dependency of `id`, in declared order, with default options.
    pub fn run_dependencies(&mut self, id: &DeclarationId) -> Result<(), FakerError> {
        let dependencies = self.declaration(id)?.dependencies().to_vec();
        for dependency in &dependencies {
            self.run(dependency, RunOptions::default())?;
        }
        Ok(())
    }

    /// Deletes the records selected by the deletion filter, if any.
    pub fn run_deletion(&mut self, id: &DeclarationId) -> Result<usize, FakerError> {
        let Some(selection) = self.declaration(id)?.deletion().cloned() else {
            return Ok(0);
        };
        let records = self.store.filter(&selection)?;
        let deleted = self.store.delete(&records)?;
        info!(
            faker = %id,
            model = %selection.model,
            deleted,
            "deletion finished"
        );
        Ok(deleted)
    }

    /// Records to rewrite: the update filter's result, else every record of
    /// the target model.
    pub fn update_targets(&self, id: &DeclarationId) -> Result<Vec<Record>, FakerError> {
        let declaration = self.declaration(id)?;
        let selection = match declaration.update() {
            Some(selection) => selection.clone(),
            None => {
                let target = declaration
                    .target_model()
                    .ok_or_else(|| ConfigurationError::MissingTarget(id.clone()))?;
                Selection::all(target)
            }
        };
        Ok(self.store.filter(&selection)?)
    }

    /// Replaces the bound fields of every update target and saves it.
    ///
    /// Each attempt re-applies every binding, constants first, then simple
    /// replacers, then lazy ones. A record still conflicting after
    /// `max_tries` attempts aborts the pass with `UnicityError`; records
    /// saved before that stay saved.
    pub fn run_update(&mut self, id: &DeclarationId) -> Result<UpdateOutcome, FakerError> {
        let mut outcome = UpdateOutcome::default();
        if self.declaration(id)?.bindings().is_empty() {
            return Ok(outcome);
        }
        let records = self.update_targets(id)?;
        let declaration = self
            .registry
            .get_mut(id)
            .ok_or_else(|| ConfigurationError::UnknownDeclaration(id.to_string()))?;
        let order = declaration.evaluation_order();

        for mut record in records {
            let mut attempt = 0;
            loop {
                apply_bindings(declaration.bindings_mut(), &order, &mut record, &mut self.rng)?;
                match self.store.validate_uniqueness(&record)? {
                    Uniqueness::Unique => {
                        self.store.save(&record)?;
                        outcome.updated += 1;
                        break;
                    }
                    Uniqueness::Conflict(fields) => {
                        attempt += 1;
                        debug!(
                            faker = %id,
                            record = record.id,
                            attempt,
                            fields = ?fields,
                            "record conflict"
                        );
                        if attempt >= self.max_tries {
                            warn!(
                                faker = %id,
                                record = record.id,
                                attempts = attempt,
                                "no unique value found"
                            );
                            return Err(UnicityError {
                                declaration: id.clone(),
                                record: record.id,
                                fields,
                            }
                            .into());
                        }
                        outcome.retries += 1;
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// Full run of one declaration; a declaration that already ran is skipped.
    pub fn run(&mut self, id: &DeclarationId, options: RunOptions) -> Result<(), FakerError> {
        if self.declaration(id)?.has_run() {
            debug!(faker = %id, "faker already ran");
            return Ok(());
        }
        self.observer.before_fake(id);
        self.validate(id)?;
        let target = self
            .declaration(id)?
            .target_model()
            .unwrap_or_default()
            .to_string();
        info!(
            faker = %id,
            target = %target,
            skip_dependencies = options.skip_dependencies,
            skip_deletion = options.skip_deletion,
            "faker started"
        );

        if !options.skip_dependencies {
            self.run_dependencies(id)?;
        }
        let deleted = if options.skip_deletion {
            0
        } else {
            self.run_deletion(id)?
        };
        let outcome = self.run_update(id)?;

        self.observer.after_fake(id);
        if let Some(declaration) = self.registry.get_mut(id) {
            declaration.mark_run();
        }
        info!(
            faker = %id,
            deleted,
            updated = outcome.updated,
            retries = outcome.retries,
            "faker finished"
        );
        self.report.push(DeclarationReport {
            declaration: id.to_string(),
            target,
            deleted: deleted as u64,
            updated: outcome.updated as u64,
            retries: outcome.retries,
        });
        Ok(())
    }
}

fn apply_bindings(
    bindings: &mut [(String, FieldBinding)],
    order: &[usize],
    record: &mut Record,
    rng: &mut dyn RngCore,
) -> Result<(), ReplaceError> {
    for &index in order {
        let (field, binding) = &mut bindings[index];
        let value = match binding {
            FieldBinding::Constant(value) => value.clone(),
            FieldBinding::Simple(replacer) => replacer.apply(rng)?,
            FieldBinding::Lazy(replacer) => replacer.apply(record, rng)?,
        };
        record.set(field.as_str(), value);
    }
    Ok(())
}
