/// Dollar amount with thousands separators and cents, e.g. `-$1,234.50`.
pub fn currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round();
    let whole = (cents / 100.0).trunc() as u64;
    let fraction = (cents % 100.0) as u64;
    let sign = if amount < 0.0 && cents > 0.0 { "-" } else { "" };
    format!("{sign}${}.{fraction:02}", group_thousands(whole))
}

/// Ratio rendered as a percentage with one decimal, e.g. `0.183` -> `18.3%`.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(50_000.0), "$50,000.00");
        assert_eq!(currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(currency(999.5), "$999.50");
        assert_eq!(currency(0.0), "$0.00");
    }

    #[test]
    fn currency_keeps_sign_for_negative_amounts() {
        assert_eq!(currency(-2_500.25), "-$2,500.25");
        assert_eq!(currency(-0.001), "$0.00");
    }

    #[test]
    fn percent_uses_one_decimal() {
        assert_eq!(percent(0.4512), "45.1%");
        assert_eq!(percent(-0.1234), "-12.3%");
    }
}
