use super::run::check_rules;
use crate::fmt::memo as show_memo;
use crate::models::{Cleared, Transaction};
use crate::settings::load_settings;
use crate::splitter::{evaluate, Verdict};

pub fn run(import_payee: &str, payee: Option<&str>, memo: Option<&str>) -> anyhow::Result<()> {
    let rules = load_settings().split_rules();
    check_rules(&rules)?;
    let txn = Transaction {
        id: "check".to_string(),
        date: String::new(),
        amount: 0,
        cleared: Cleared::Uncleared,
        approved: false,
        deleted: false,
        account_id: String::new(),
        payee_name: Some(payee.unwrap_or(import_payee).to_string()),
        category_id: None,
        memo: memo.map(str::to_string),
        flag_color: None,
        import_payee_name: Some(import_payee.to_string()),
        import_memo: None,
    };

    match evaluate(&txn, &rules) {
        Verdict::Update(change) => {
            println!("payee: {}", change.payee);
            println!("memo:  {}", show_memo(change.memo.as_deref()));
        }
        Verdict::Excluded(reason) => println!("skip: {}", reason.describe()),
    }
    Ok(())
}
