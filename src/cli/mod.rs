pub mod budgets;
pub mod check;
pub mod init;
pub mod run;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ynab-split",
    version,
    about = "Split bank-imported YNAB payees like 'John Doe - Rent' into payee and memo."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct AuthArgs {
    /// YNAB personal access token
    #[arg(short = 't', long, env = "YNAB_TOKEN", hide_env_values = true)]
    pub token: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split payees for recent transactions and push the corrections to YNAB.
    Run(RunArgs),
    /// List the budgets the token can see.
    Budgets {
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Show what a single import payee would be split into, without contacting YNAB.
    Check {
        /// Import payee as it came from the bank, e.g. 'John Doe - Rent'
        import_payee: String,
        /// Current payee (default: same as the import payee)
        #[arg(long)]
        payee: Option<String>,
        /// Current memo
        #[arg(long)]
        memo: Option<String>,
    },
    /// Write a settings file with the default values.
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub auth: AuthArgs,
    /// Budget ID (default: the budget YNAB marks as default)
    #[arg(short = 'b', long = "budget-id", env = "YNAB_BUDGET_ID")]
    pub budget_id: Option<String>,
    /// Comma separated budget IDs; use instead of --budget-id
    #[arg(long = "budget-ids", env = "YNAB_BUDGET_IDS")]
    pub budget_ids: Option<String>,
    /// Only process this account (default: all accounts)
    #[arg(short = 'a', long = "account-id", env = "YNAB_ACCOUNT_ID")]
    pub account_id: Option<String>,
    /// Show what would change without updating anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Days to look back for transactions (default from settings: 30)
    #[arg(short = 'd', long = "days-back")]
    pub days_back: Option<i64>,
    /// Transactions per bulk update call (default from settings: 25)
    #[arg(long = "batch-size")]
    pub batch_size: Option<usize>,
    /// Only process unapproved transactions
    #[arg(long = "only-unapproved", conflicts_with = "all")]
    pub only_unapproved: bool,
    /// Process approved transactions too
    #[arg(long)]
    pub all: bool,
}
