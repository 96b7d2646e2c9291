use crate::error::{Result, SplitError};
use crate::events::{Event, Reporter};
use crate::models::{Transaction, UpdateRequest};
use crate::splitter::{evaluate, PayeeMemo, SplitRules, Verdict};

pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Anything that can apply a batch of full-replace updates and say how many stuck.
pub trait TransactionStore {
    fn update_transactions(&self, budget_id: &str, batch: &[UpdateRequest]) -> Result<usize>;
}

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub dry_run: bool,
    pub batch_size: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    pub id: String,
    pub date: String,
    pub amount: i64,
    pub payee: Option<String>,
    pub new_payee: String,
    pub memo: Option<String>,
    pub new_memo: Option<String>,
}

#[derive(Debug, Default)]
pub struct ReconcileSummary {
    pub considered: usize,
    pub eligible: usize,
    pub updated: usize,
    pub skipped: usize,
    pub batches: usize,
    pub changes: Vec<PlannedChange>,
}

pub fn update_request(txn: &Transaction, change: &PayeeMemo) -> UpdateRequest {
    UpdateRequest {
        id: txn.id.clone(),
        account_id: txn.account_id.clone(),
        date: txn.date.clone(),
        amount: txn.amount,
        payee_id: None,
        payee_name: change.payee.clone(),
        category_id: txn.category_id.clone(),
        memo: change.memo.clone(),
        cleared: txn.cleared,
        approved: txn.approved,
        flag_color: txn.flag_color.clone(),
    }
}

fn planned_change(txn: &Transaction, change: &PayeeMemo) -> PlannedChange {
    PlannedChange {
        id: txn.id.clone(),
        date: txn.date.clone(),
        amount: txn.amount,
        payee: txn.payee_name.clone(),
        new_payee: change.payee.clone(),
        memo: txn.memo.clone(),
        new_memo: change.memo.clone(),
    }
}

/// Run every transaction through the split engine, keeping input order.
pub fn plan_updates(
    transactions: &[Transaction],
    rules: &SplitRules,
    reporter: &mut dyn Reporter,
) -> (Vec<UpdateRequest>, Vec<PlannedChange>) {
    let mut requests = Vec::new();
    let mut changes = Vec::new();
    for txn in transactions {
        match evaluate(txn, rules) {
            Verdict::Excluded(reason) => reporter.report(Event::Skipped {
                transaction: txn,
                reason,
            }),
            Verdict::Update(change) => {
                reporter.report(Event::Planned {
                    transaction: txn,
                    change: &change,
                });
                requests.push(update_request(txn, &change));
                changes.push(planned_change(txn, &change));
            }
        }
    }
    (requests, changes)
}

/// Apply the split engine to one budget's transactions and push the results in batches.
///
/// Batches go out one at a time in input order. The first failing batch aborts the
/// rest and its error is returned; nothing is retried here.
pub fn reconcile<S: TransactionStore + ?Sized>(
    store: &S,
    budget_id: &str,
    transactions: &[Transaction],
    rules: &SplitRules,
    options: &ReconcileOptions,
    reporter: &mut dyn Reporter,
) -> Result<ReconcileSummary> {
    if options.batch_size == 0 {
        return Err(SplitError::Config("batch size must be at least 1".to_string()));
    }

    let (requests, changes) = plan_updates(transactions, rules, reporter);
    let batches: Vec<&[UpdateRequest]> = requests.chunks(options.batch_size).collect();
    let total = batches.len();

    let mut updated = 0usize;
    for (index, batch) in batches.iter().enumerate() {
        if options.dry_run {
            reporter.report(Event::BatchSkippedDryRun {
                index,
                total,
                size: batch.len(),
            });
            continue;
        }
        reporter.report(Event::BatchDispatched {
            index,
            total,
            size: batch.len(),
        });
        let count = store.update_transactions(budget_id, batch)?;
        reporter.report(Event::BatchApplied {
            index,
            total,
            updated: count,
        });
        updated += count;
    }

    Ok(ReconcileSummary {
        considered: transactions.len(),
        eligible: requests.len(),
        updated,
        skipped: transactions.len() - requests.len(),
        batches: total,
        changes,
    })
}
