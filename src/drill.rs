//! The plan-to-action pipeline.
//!
//! Every planned creation is dispatched to the provider by resource type,
//! checked for a live counterpart, and remediated: either an import command
//! is produced or the live resource is deleted. Nothing here is fatal; a
//! failed check counts as "does not exist".

use crate::import::{ImportCommand, SecretsWrapper};
use crate::providers::Provider;
use crate::resource::{ExistingResource, Lookup};
use crate::terraform::{Plan, ResourceChange};

#[derive(Debug, Clone, Default)]
pub struct DrillOptions {
    pub verbose: bool,
    /// Delete live resources instead of suggesting an import.
    pub delete: bool,
    /// Print a header above each import command.
    pub announce: bool,
    pub wrapper: Option<SecretsWrapper>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Absent,
    /// The identifying attribute is unknown until apply.
    Unidentified { attribute: String },
    /// The check itself failed; treated as absent.
    CheckFailed { error: String },
    Importable {
        existing: ExistingResource,
        command: ImportCommand,
    },
    Deleted { existing: ExistingResource },
    DeleteFailed {
        existing: ExistingResource,
        error: String,
    },
}

impl Outcome {
    pub fn summary(&self) -> &'static str {
        match self {
            Outcome::Absent => "not found",
            Outcome::Unidentified { .. } => "unknown until apply",
            Outcome::CheckFailed { .. } => "check failed",
            Outcome::Importable { .. } => "import",
            Outcome::Deleted { .. } => "deleted",
            Outcome::DeleteFailed { .. } => "delete failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checked {
    pub address: String,
    pub resource_type: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrillReport {
    /// Number of planned creations, supported or not.
    pub creations: usize,
    pub checked: Vec<Checked>,
    /// Resource types with no handler, in first-seen order.
    pub unsupported: Vec<String>,
}

impl DrillReport {
    pub fn import_commands(&self) -> impl Iterator<Item = &ImportCommand> {
        self.checked.iter().filter_map(|c| match &c.outcome {
            Outcome::Importable { command, .. } => Some(command),
            _ => None,
        })
    }

    pub fn delete_failures(&self) -> usize {
        self.checked
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::DeleteFailed { .. }))
            .count()
    }
}

pub async fn drill(plan: &Plan, provider: &dyn Provider, options: &DrillOptions) -> DrillReport {
    let mut report = DrillReport::default();

    for change in plan.creations() {
        report.creations += 1;

        if !provider.supports(&change.resource_type) {
            if !report.unsupported.contains(&change.resource_type) {
                report.unsupported.push(change.resource_type.clone());
            }
            continue;
        }

        let outcome = check(change, provider, options).await;
        report.checked.push(Checked {
            address: change.address.clone(),
            resource_type: change.resource_type.clone(),
            outcome,
        });
    }

    tracing::info!(
        creations = report.creations,
        checked = report.checked.len(),
        unsupported = report.unsupported.len(),
        "drill complete"
    );

    report
}

async fn check(change: &ResourceChange, provider: &dyn Provider, options: &DrillOptions) -> Outcome {
    let existing = match provider.find_existing(change).await {
        Ok(Lookup::Found(existing)) => existing,
        Ok(Lookup::NotFound) => return Outcome::Absent,
        Ok(Lookup::Unknown { attribute }) => return Outcome::Unidentified { attribute },
        Err(e) => {
            tracing::debug!(address = %change.address, error = %e, "existence check failed");
            return Outcome::CheckFailed {
                error: e.to_string(),
            };
        }
    };

    if !options.delete {
        let command = existing.import_command().wrapped(options.wrapper.clone());
        return Outcome::Importable { existing, command };
    }

    match provider.delete(&existing).await {
        Ok(()) => Outcome::Deleted { existing },
        Err(e) => {
            tracing::debug!(address = %existing.address, error = %e, "delete failed");
            Outcome::DeleteFailed {
                existing,
                error: e.to_string(),
            }
        }
    }
}
