/// Format a YNAB milliunit amount with thousands separators: -1234560 -> -1,234.56
pub fn milliunits(val: i64) -> String {
    let negative = val < 0;
    let cents = (val.unsigned_abs() + 5) / 10;
    let int_part = (cents / 100).to_string();
    let dec_part = cents % 100;

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part:02}")
    } else {
        format!("{with_commas}.{dec_part:02}")
    }
}

/// Render an optional memo for tables.
pub fn memo(val: Option<&str>) -> &str {
    val.unwrap_or("\u{2014}")
}
