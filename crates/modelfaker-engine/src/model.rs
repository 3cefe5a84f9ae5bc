use serde::{Deserialize, Serialize};

/// Options for one `Orchestrator::run` call.
///
/// Dependencies always run with the default options, whatever the options
/// of the declaration that pulled them in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    pub skip_dependencies: bool,
    pub skip_deletion: bool,
}

/// Summary of one executed declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationReport {
    pub declaration: String,
    pub target: String,
    pub deleted: u64,
    pub updated: u64,
    /// Attempts discarded because of a uniqueness conflict.
    pub retries: u64,
}

/// Report for a faking run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub declarations: Vec<DeclarationReport>,
    pub deleted_total: u64,
    pub updated_total: u64,
    pub retries_total: u64,
}

impl RunReport {
    pub fn declaration(&self, id: &str) -> Option<&DeclarationReport> {
        self.declarations.iter().find(|entry| entry.declaration == id)
    }

    pub(crate) fn push(&mut self, entry: DeclarationReport) {
        self.deleted_total += entry.deleted;
        self.updated_total += entry.updated;
        self.retries_total += entry.retries;
        self.declarations.push(entry);
    }
}
