//! Decides whether an imported payee should be split into payee + memo, and how.

use crate::models::Transaction;

pub const DEFAULT_TRANSFER_MARKER: &str = "Transfer : ";
pub const DEFAULT_DELIMITER: &str = " - ";

/// The two literals the engine keys off.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRules {
    pub transfer_marker: String,
    pub delimiter: String,
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            transfer_marker: DEFAULT_TRANSFER_MARKER.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlankPayee,
    AlreadyRenamed,
    Transfer,
    NoImportPayee,
    NoPayeeSegment,
    Unchanged,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::BlankPayee => "payee or import payee is blank",
            Self::AlreadyRenamed => "payee was already changed by YNAB or the user",
            Self::Transfer => "transaction is a transfer",
            Self::NoImportPayee => "import payee is missing",
            Self::NoPayeeSegment => "no payee found before the delimiter",
            Self::Unchanged => "payee and memo are unchanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayeeMemo {
    pub payee: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Excluded(SkipReason),
    Update(PayeeMemo),
}

type Guard = fn(&Transaction, &SplitRules) -> bool;

// Evaluated top-down; the first guard that fires excludes the transaction.
const GUARDS: &[(SkipReason, Guard)] = &[
    (SkipReason::BlankPayee, has_blank_payee),
    (SkipReason::AlreadyRenamed, payee_diverged),
    (SkipReason::Transfer, is_transfer),
    (SkipReason::NoImportPayee, import_payee_missing),
];

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn has_blank_payee(txn: &Transaction, _: &SplitRules) -> bool {
    is_blank(&txn.payee_name) || is_blank(&txn.import_payee_name)
}

fn payee_diverged(txn: &Transaction, _: &SplitRules) -> bool {
    txn.payee_name != txn.import_payee_name
}

fn is_transfer(txn: &Transaction, rules: &SplitRules) -> bool {
    txn.payee_name
        .as_deref()
        .is_some_and(|p| p.starts_with(rules.transfer_marker.as_str()))
}

fn import_payee_missing(txn: &Transaction, _: &SplitRules) -> bool {
    txn.import_payee_name.is_none()
}

pub fn evaluate(txn: &Transaction, rules: &SplitRules) -> Verdict {
    if let Some((reason, _)) = GUARDS.iter().find(|(_, guard)| guard(txn, rules)) {
        return Verdict::Excluded(*reason);
    }
    let Some(import_payee) = txn.import_payee_name.as_deref() else {
        return Verdict::Excluded(SkipReason::NoImportPayee);
    };

    let delimiter = rules.delimiter.as_str();
    let (payee, fragment) = split_payee(import_payee, delimiter);
    if payee.is_empty() {
        return Verdict::Excluded(SkipReason::NoPayeeSegment);
    }
    let memo = merge_memo(txn.memo.as_deref(), fragment, delimiter);

    if txn.payee_name.as_deref() == Some(payee) && txn.memo == memo {
        return Verdict::Excluded(SkipReason::Unchanged);
    }
    Verdict::Update(PayeeMemo {
        payee: payee.to_string(),
        memo,
    })
}

/// Split `"Payee - memo text"` into the trimmed payee and the trimmed memo fragment.
/// A dangling delimiter at the end (`"Payee -"`) is dropped first.
pub fn split_payee<'a>(import_payee: &'a str, delimiter: &str) -> (&'a str, Option<&'a str>) {
    let dangling = delimiter.trim_end();
    let text = if dangling.is_empty() {
        import_payee
    } else {
        import_payee.strip_suffix(dangling).unwrap_or(import_payee)
    };
    let mut parts = text.splitn(2, delimiter);
    let payee = parts.next().unwrap_or_default().trim();
    let fragment = parts.next().map(str::trim);
    (payee, fragment)
}

fn merge_memo(memo: Option<&str>, fragment: Option<&str>, delimiter: &str) -> Option<String> {
    let fragment = fragment.filter(|f| !f.is_empty());
    match (memo, fragment) {
        (memo, None) => memo.map(|m| collapse_repeated_suffix(m, delimiter)),
        (None, Some(fragment)) => Some(fragment.to_string()),
        (Some(memo), Some(fragment)) => {
            let collapsed = collapse_repeated_suffix(memo, delimiter);
            if collapsed != memo || collapsed.contains(fragment) {
                Some(collapsed)
            } else {
                Some(format!("{memo}{delimiter}{fragment}"))
            }
        }
    }
}

/// Drop repeated trailing runs of delimiter-separated segments.
///
/// `"X - A - B - A - B"` becomes `"X - A - B"`, `"A - A - A - A"` becomes `"A"`.
/// Input without a delimiter is returned untouched.
pub fn collapse_repeated_suffix(text: &str, delimiter: &str) -> String {
    let parts: Vec<&str> = text.split(delimiter).map(str::trim).collect();
    if parts.len() <= 1 {
        return text.to_string();
    }
    let mut kept: &[&str] = &parts;
    while let Some(len) = repeated_suffix_len(kept) {
        kept = &kept[..kept.len() - len];
    }
    kept.join(delimiter)
}

fn repeated_suffix_len(parts: &[&str]) -> Option<usize> {
    let n = parts.len();
    (1..=n / 2).find(|&len| parts[n - len..] == parts[n - 2 * len..n - len])
}
