//! Listing helpers: search filter and balance label

use serde_json::Value;

use crate::resources::fees_balance;

/// Students whose name, email, subject or standard contains `term`,
/// ignoring case. A blank term keeps everyone.
pub fn filter_students<'a>(students: &'a [Value], term: &str) -> Vec<&'a Value> {
    let term = term.trim().to_lowercase();
    students
        .iter()
        .filter(|student| {
            term.is_empty()
                || ["name", "email", "subject", "standard"].iter().any(|field| {
                    student
                        .get(field)
                        .and_then(Value::as_str)
                        .map_or(false, |v| v.to_lowercase().contains(&term))
                })
        })
        .collect()
}

/// `Pending: ₹<balance>` while money is owed, otherwise `Fully Paid ✓`.
pub fn balance_label(student: &Value) -> String {
    let balance = student
        .as_object()
        .and_then(fees_balance)
        .unwrap_or(Value::from(0));
    match balance.as_f64() {
        Some(owed) if owed > 0.0 => format!("Pending: ₹{}", balance),
        _ => "Fully Paid ✓".to_string(),
    }
}
