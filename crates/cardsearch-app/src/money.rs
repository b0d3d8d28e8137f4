// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Formats an amount as US dollars: `$1,234.56`. Rounds to the cent.
pub fn format_currency(amount: f64) -> String {
    format_cents(to_cents(amount))
}

pub fn format_cents(cents: i64) -> String {
    let (sign, cents) = normalize_sign(cents);
    let dollars = cents / 100;
    let remainder = cents % 100;
    format!("{sign}${}.{:02}", comma_format(dollars), remainder)
}

fn to_cents(amount: f64) -> i64 {
    // `as` saturates at the i64 bounds and maps NaN to zero.
    (amount * 100.0).round() as i64
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let mut count = 0usize;
    for ch in digits.chars().rev() {
        if count == 3 {
            out.push(',');
            count = 0;
        }
        out.push(ch);
        count += 1;
    }
    out.chars().rev().collect()
}

fn normalize_sign(cents: i64) -> (&'static str, i64) {
    if cents >= 0 {
        return ("", cents);
    }
    if cents == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -cents)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_cents, format_currency};
    use std::collections::BTreeMap;

    #[test]
    fn format_currency_test() {
        let cases = BTreeMap::from([
            ("0", (0.0, "$0.00")),
            ("fraction", (500.5, "$500.50")),
            ("grouped", (1_234_567.891, "$1,234,567.89")),
            ("round up", (0.005, "$0.01")),
            ("negative", (-42.0, "-$42.00")),
            ("thousand", (1000.0, "$1,000.00")),
        ]);
        for (name, (amount, expected)) in cases {
            assert_eq!(format_currency(amount), expected, "case {name}");
        }
    }

    #[test]
    fn format_cents_test() {
        assert_eq!(format_cents(123_456), "$1,234.56");
        assert_eq!(format_cents(-5), "-$0.05");
    }
}
