use std::time::Duration;

use comfy_table::{Cell, Table};

use super::AuthArgs;
use crate::client::YnabClient;
use crate::settings::load_settings;

pub fn list(auth: &AuthArgs) -> anyhow::Result<()> {
    let settings = load_settings();
    let client = YnabClient::new(
        &auth.token,
        &settings.api_base_url,
        Duration::from_secs(settings.timeout_secs),
    )?;
    let response = client.budgets()?;
    let default_id = response.default_budget.as_ref().map(|b| b.id.as_str());

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Last Modified", "Default"]);
    for budget in &response.budgets {
        let is_default = default_id == Some(budget.id.as_str());
        table.add_row(vec![
            Cell::new(&budget.id),
            Cell::new(&budget.name),
            Cell::new(budget.last_modified_on.as_deref().unwrap_or_default()),
            Cell::new(if is_default { "\u{2713}" } else { "" }),
        ]);
    }
    println!("Budgets\n{table}");
    Ok(())
}
