//! Salary values and their display formatting.
//!
//! The catalog sends `salary_min`/`salary_max` either as a number or as a
//! free-text label ("Negotiable", "As per industry standards"). Both arrive as
//! a [`Salary`] and are rendered through [`format_salary_range`].

use serde::{Deserialize, Serialize};

use crate::types::Currency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Salary {
    Amount(f64),
    Label(String),
}

impl Salary {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Salary::Amount(value) => Some(*value),
            Salary::Label(_) => None,
        }
    }

    pub fn format(&self, currency: Currency) -> String {
        match self {
            Salary::Amount(value) => format_amount(*value, currency),
            Salary::Label(text) => text.trim().to_string(),
        }
    }
}

/// Render a salary range for a job card.
pub fn format_salary_range(
    min: Option<&Salary>,
    max: Option<&Salary>,
    currency: Currency,
) -> String {
    let min = min.filter(|s| !is_blank(s));
    let max = max.filter(|s| !is_blank(s));

    match (min, max) {
        (None, None) => "Not disclosed".to_string(),
        (Some(min), None) => match min {
            Salary::Amount(_) => format!("From {}", min.format(currency)),
            Salary::Label(_) => min.format(currency),
        },
        (None, Some(max)) => match max {
            Salary::Amount(_) => format!("Up to {}", max.format(currency)),
            Salary::Label(_) => max.format(currency),
        },
        (Some(min @ Salary::Label(_)), Some(Salary::Amount(_))) => min.format(currency),
        (Some(Salary::Amount(_)), Some(max @ Salary::Label(_))) => max.format(currency),
        (Some(min), Some(max)) => {
            let (lo, hi) = (min.format(currency), max.format(currency));
            if lo == hi {
                lo
            } else {
                format!("{} - {}", lo, hi)
            }
        }
    }
}

fn is_blank(salary: &Salary) -> bool {
    matches!(salary, Salary::Label(text) if text.trim().is_empty())
}

fn format_amount(value: f64, currency: Currency) -> String {
    let whole = value.max(0.0).round() as u64;
    let digits = whole.to_string();
    let grouped = match currency {
        Currency::Inr => group_indian(&digits),
        Currency::Usd => group_thousands(&digits),
    };
    format!("{}{}", currency.symbol(), grouped)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// 12,34,567: last three digits, then groups of two
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_number_or_label() {
        let amount: Salary = serde_json::from_str("45000").unwrap();
        let label: Salary = serde_json::from_str("\"Negotiable\"").unwrap();
        assert_eq!(amount, Salary::Amount(45000.0));
        assert_eq!(label, Salary::Label("Negotiable".into()));
    }

    #[test]
    fn formats_inr_with_indian_grouping() {
        assert_eq!(Salary::Amount(1234567.0).format(Currency::Inr), "₹12,34,567");
        assert_eq!(Salary::Amount(950.0).format(Currency::Inr), "₹950");
        assert_eq!(Salary::Amount(50000.0).format(Currency::Inr), "₹50,000");
    }

    #[test]
    fn formats_usd_with_thousands_grouping() {
        assert_eq!(Salary::Amount(1234567.0).format(Currency::Usd), "$1,234,567");
        assert_eq!(Salary::Amount(85000.0).format(Currency::Usd), "$85,000");
    }

    #[test]
    fn range_rules() {
        let min = Salary::Amount(30000.0);
        let max = Salary::Amount(45000.0);
        let label = Salary::Label("Negotiable".into());

        assert_eq!(
            format_salary_range(Some(&min), Some(&max), Currency::Inr),
            "₹30,000 - ₹45,000"
        );
        assert_eq!(
            format_salary_range(Some(&min), Some(&min), Currency::Inr),
            "₹30,000"
        );
        assert_eq!(
            format_salary_range(Some(&min), None, Currency::Usd),
            "From $30,000"
        );
        assert_eq!(
            format_salary_range(None, Some(&max), Currency::Usd),
            "Up to $45,000"
        );
        assert_eq!(
            format_salary_range(Some(&label), Some(&label), Currency::Inr),
            "Negotiable"
        );
        assert_eq!(
            format_salary_range(Some(&min), Some(&label), Currency::Inr),
            "Negotiable"
        );
        assert_eq!(
            format_salary_range(Some(&label), Some(&max), Currency::Inr),
            "Negotiable"
        );
        assert_eq!(
            format_salary_range(
                Some(&Salary::Label("Negotiable".into())),
                Some(&Salary::Label("Competitive".into())),
                Currency::Inr
            ),
            "Negotiable - Competitive"
        );
        assert_eq!(format_salary_range(None, None, Currency::Inr), "Not disclosed");
        assert_eq!(
            format_salary_range(Some(&Salary::Label(" ".into())), None, Currency::Inr),
            "Not disclosed"
        );
    }
}
