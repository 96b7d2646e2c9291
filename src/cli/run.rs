use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use comfy_table::{Cell, Table};
use tracing::{error, info};

use super::RunArgs;
use crate::client::{TransactionFilter, YnabClient};
use crate::error::{Result, SplitError};
use crate::events::TracingReporter;
use crate::fmt::{memo, milliunits};
use crate::reconciler::{reconcile, ReconcileOptions, ReconcileSummary};
use crate::settings::load_settings;
use crate::splitter::SplitRules;

#[derive(Debug, PartialEq)]
pub enum BudgetSelection {
    Default,
    Ids(Vec<String>),
}

impl BudgetSelection {
    pub fn from_args(budget_id: Option<&str>, budget_ids: Option<&str>) -> Result<Self> {
        match (budget_id, budget_ids) {
            (Some(_), Some(_)) => Err(SplitError::Config(
                "either --budget-id or --budget-ids should be provided, not both".to_string(),
            )),
            (Some(id), None) if id.trim().is_empty() => {
                Err(SplitError::Config("--budget-id is empty".to_string()))
            }
            (Some(id), None) => Ok(Self::Ids(vec![id.trim().to_string()])),
            (None, Some(list)) => {
                let ids: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                if ids.is_empty() {
                    return Err(SplitError::Config("--budget-ids lists no budgets".to_string()));
                }
                Ok(Self::Ids(ids))
            }
            (None, None) => Ok(Self::Default),
        }
    }
}

pub fn since_date(today: NaiveDate, days_back: i64) -> String {
    (today - chrono::Duration::days(days_back))
        .format("%Y-%m-%d")
        .to_string()
}

/// An empty delimiter would make every payee segment empty; an empty marker would
/// treat every transaction as a transfer.
pub fn check_rules(rules: &SplitRules) -> Result<()> {
    if rules.delimiter.is_empty() {
        return Err(SplitError::Config("delimiter cannot be empty".to_string()));
    }
    if rules.transfer_marker.is_empty() {
        return Err(SplitError::Config("transfer marker cannot be empty".to_string()));
    }
    Ok(())
}

fn mask(token: &str) -> String {
    let prefix: String = token.chars().take(5).collect();
    format!("{prefix}...")
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let settings = load_settings();

    let selection =
        BudgetSelection::from_args(args.budget_id.as_deref(), args.budget_ids.as_deref())?;
    let batch_size = args.batch_size.unwrap_or(settings.batch_size);
    if batch_size == 0 {
        return Err(SplitError::Config("batch size must be at least 1".to_string()).into());
    }
    let days_back = args.days_back.unwrap_or(settings.days_back);
    if days_back < 0 {
        return Err(SplitError::Config("days back cannot be negative".to_string()).into());
    }
    let rules = settings.split_rules();
    check_rules(&rules)?;
    let only_unapproved = if args.all {
        false
    } else {
        args.only_unapproved || settings.only_unapproved
    };
    let options = ReconcileOptions {
        dry_run: args.dry_run,
        batch_size,
    };

    info!("Starting ynab-split");
    info!("Token: {}", mask(&args.auth.token));
    info!("Budgets: {:?}", selection);
    info!("Account ID: {}", args.account_id.as_deref().unwrap_or("all"));
    info!("Days back: {days_back}, batch size: {batch_size}");
    info!("Dry run: {}, only unapproved: {only_unapproved}", options.dry_run);

    let client = YnabClient::new(
        &args.auth.token,
        &settings.api_base_url,
        Duration::from_secs(settings.timeout_secs),
    )?;

    let budget_ids = match selection {
        BudgetSelection::Ids(ids) => ids,
        BudgetSelection::Default => {
            info!("No budget ID provided, fetching default budget");
            let budget = client.default_budget().context("fetching default budget")?;
            info!("Using budget: {} ({})", budget.name, budget.id);
            vec![budget.id]
        }
    };

    let filter = TransactionFilter {
        account_id: args.account_id,
        since_date: Some(since_date(Local::now().date_naive(), days_back)),
        only_unapproved,
    };

    let mut failed = Vec::new();
    for budget_id in &budget_ids {
        info!("Processing budget {budget_id}");
        match process_budget(&client, budget_id, &filter, &rules, &options) {
            Ok(summary) => print_summary(budget_id, &summary, options.dry_run),
            Err(e) => {
                error!("Budget {budget_id} failed: {e:#}");
                failed.push(budget_id.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} budgets failed: {}",
            failed.len(),
            budget_ids.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

fn process_budget(
    client: &YnabClient,
    budget_id: &str,
    filter: &TransactionFilter,
    rules: &SplitRules,
    options: &ReconcileOptions,
) -> anyhow::Result<ReconcileSummary> {
    let transactions = client
        .transactions(budget_id, filter)
        .with_context(|| format!("fetching transactions for budget {budget_id}"))?;
    info!("Found {} transactions", transactions.len());

    let summary = reconcile(client, budget_id, &transactions, rules, options, &mut TracingReporter)
        .with_context(|| format!("updating transactions for budget {budget_id}"))?;
    Ok(summary)
}

fn print_summary(budget_id: &str, summary: &ReconcileSummary, dry_run: bool) {
    if dry_run && !summary.changes.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Date", "Amount", "Payee", "New Payee", "Memo", "New Memo"]);
        for change in &summary.changes {
            table.add_row(vec![
                Cell::new(&change.date),
                Cell::new(milliunits(change.amount)),
                Cell::new(change.payee.as_deref().unwrap_or_default()),
                Cell::new(&change.new_payee),
                Cell::new(memo(change.memo.as_deref())),
                Cell::new(memo(change.new_memo.as_deref())),
            ]);
        }
        println!("{} {budget_id}\n{table}", "DRY RUN".yellow().bold());
    }

    let updated = if dry_run {
        format!("{} would be updated", summary.eligible).yellow()
    } else {
        format!("{} updated", summary.updated).green()
    };
    println!(
        "Budget {budget_id}: {} transactions, {updated}, {} skipped ({} batches)",
        summary.considered, summary.skipped, summary.batches
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_selectors_is_a_config_error() {
        let err = BudgetSelection::from_args(Some("a"), Some("b,c")).unwrap_err();
        assert!(matches!(err, SplitError::Config(_)));
    }

    #[test]
    fn test_budget_ids_are_trimmed() {
        let sel = BudgetSelection::from_args(None, Some(" a, b ,,c ")).unwrap();
        assert_eq!(sel, BudgetSelection::Ids(vec!["a".into(), "b".into(), "c".into()]));
    }

    #[test]
    fn test_empty_budget_ids_rejected() {
        assert!(BudgetSelection::from_args(None, Some(" , ")).is_err());
        assert!(BudgetSelection::from_args(Some("  "), None).is_err());
    }

    #[test]
    fn test_no_selector_uses_default() {
        assert_eq!(BudgetSelection::from_args(None, None).unwrap(), BudgetSelection::Default);
        assert_eq!(
            BudgetSelection::from_args(Some("x"), None).unwrap(),
            BudgetSelection::Ids(vec!["x".into()])
        );
    }

    #[test]
    fn test_since_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(since_date(today, 30), "2026-01-30");
        assert_eq!(since_date(today, 0), "2026-03-01");
    }

    #[test]
    fn test_empty_delimiter_or_marker_rejected() {
        assert!(check_rules(&SplitRules::default()).is_ok());
        let no_delimiter = SplitRules {
            delimiter: String::new(),
            ..SplitRules::default()
        };
        assert!(matches!(check_rules(&no_delimiter), Err(SplitError::Config(_))));
        let no_marker = SplitRules {
            transfer_marker: String::new(),
            ..SplitRules::default()
        };
        assert!(matches!(check_rules(&no_marker), Err(SplitError::Config(_))));
    }

    #[test]
    fn test_token_is_masked() {
        assert_eq!(mask("abcdefghij"), "abcde...");
        assert_eq!(mask("ab"), "ab...");
    }
}
