use tracing::{debug, info};

use crate::models::Transaction;
use crate::splitter::{PayeeMemo, SkipReason};

/// Things the reconciler tells its observer about while it works.
#[derive(Debug)]
pub enum Event<'a> {
    Skipped {
        transaction: &'a Transaction,
        reason: SkipReason,
    },
    Planned {
        transaction: &'a Transaction,
        change: &'a PayeeMemo,
    },
    BatchDispatched {
        index: usize,
        total: usize,
        size: usize,
    },
    BatchApplied {
        index: usize,
        total: usize,
        updated: usize,
    },
    BatchSkippedDryRun {
        index: usize,
        total: usize,
        size: usize,
    },
}

pub trait Reporter {
    fn report(&mut self, event: Event<'_>);
}

/// Writes every event to the `tracing` log.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: Event<'_>) {
        match event {
            Event::Skipped { transaction, reason } => {
                debug!(id = %transaction.id, reason = reason.describe(), "skipping transaction");
            }
            Event::Planned { transaction, change } => {
                info!(
                    id = %transaction.id,
                    payee = transaction.payee_name.as_deref().unwrap_or_default(),
                    import_payee = transaction.import_payee_name.as_deref().unwrap_or_default(),
                    new_payee = %change.payee,
                    import_memo = transaction.import_memo.as_deref().unwrap_or_default(),
                    memo = transaction.memo.as_deref().unwrap_or_default(),
                    new_memo = change.memo.as_deref().unwrap_or_default(),
                    "planned update"
                );
            }
            Event::BatchDispatched { index, total, size } => {
                info!("Sending batch {} of {} ({} transactions)", index + 1, total, size);
            }
            Event::BatchApplied { index, total, updated } => {
                info!("Batch {} of {}: {} transactions updated", index + 1, total, updated);
            }
            Event::BatchSkippedDryRun { index, total, size } => {
                info!("Dry run: batch {} of {} ({} transactions) not sent", index + 1, total, size);
            }
        }
    }
}
