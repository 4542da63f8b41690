use crate::error::SyncError;
use crate::model::{Disposition, Record};
use crate::reconcile::Reconciler;

/// Per-run totals and accumulated warnings, printed by the caller.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Records driven through the first pass.
    pub records: usize,
    /// Creates whose parent was unresolved, replayed in the second pass.
    pub deferred: usize,
    /// Updates abandoned because their parent does not exist.
    pub rejected: usize,
    pub warnings: Vec<String>,
}

/// Drive the reconciler over the full record set: one pass in input
/// order, then exactly one replay of the records deferred for a
/// missing parent.
///
/// Strictly sequential; a parent created earlier in a pass must be
/// visible to lookups for later records in the same pass. The first
/// hard error aborts the run.
pub fn run(
    reconciler: &mut Reconciler,
    entity_type: &str,
    records: &[Record],
) -> Result<RunReport, SyncError> {
    let mut report = RunReport {
        records: records.len(),
        ..RunReport::default()
    };
    let mut retry: Vec<&Record> = Vec::new();

    for record in records {
        match reconciler.upsert(entity_type, record)? {
            Disposition::Committed => {}
            Disposition::NeedsRetry => {
                report.deferred += 1;
                retry.push(record);
            }
            Disposition::Rejected { missing_parent } => {
                report.rejected += 1;
                report.warnings.push(reject_warning(record, &missing_parent));
            }
        }
    }

    // No third pass: a parent still missing here leaves the record
    // permanently rooted at "0".
    for record in retry {
        match reconciler.upsert(entity_type, record)? {
            Disposition::Committed => {}
            Disposition::NeedsRetry => report.warnings.push(format!(
                "parent for entity with externalid {} still missing after second pass; left as root",
                record.external_id(),
            )),
            Disposition::Rejected { missing_parent } => {
                report.rejected += 1;
                report.warnings.push(reject_warning(record, &missing_parent));
            }
        }
    }

    Ok(report)
}

fn reject_warning(record: &Record, missing_parent: &str) -> String {
    format!(
        "parent entity with externalid {missing_parent} not found for entity {}; update skipped, check your source data",
        record.external_id(),
    )
}
