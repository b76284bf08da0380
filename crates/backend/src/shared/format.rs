/// Shown instead of a number when an aggregate has no data
pub const NO_DATA_PLACEHOLDER: &str = "—";

/// Formats an integer with thousands separators (commas)
///
/// # Examples
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Formats an amount with two decimals, thousands separators and a currency
/// suffix: `1234.5` -> `"1,234.50 €"`
pub fn format_money(amount: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = amount < 0.0 && fixed != "0.00";
    format!(
        "{}{}.{} {}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part,
        currency
    )
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
