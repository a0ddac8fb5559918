use serde_json::Value;

use super::{flatten, is_replay, scalar_text};

/// Print just the key answer of a report.
///
/// Looks for the headline fields of each view in order, then falls back to
/// the first field of the result.
pub fn print_minimal(value: &Value) {
    if is_replay(value) {
        if let Value::Array(steps) = value {
            for step in steps {
                let n = step.get("step").map(scalar_text).unwrap_or_default();
                match step.get("report") {
                    Some(Value::Null) | None => println!("{}: idle", n),
                    Some(report) => println!("{}: {}", n, headline(report)),
                }
            }
        }
        return;
    }
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "outcome.gross_margin_pct",
        "outcome.message",
        "retail.sale_price",
        "analysis.variable_margin.amount",
        "industry.gross_revenue",
    ];

    let flat = flatten(result);
    for key in &priority_keys {
        if let Some((_, val)) = flat.iter().find(|(k, v)| k == key && !v.is_null()) {
            return scalar_text(val);
        }
    }

    match flat.first() {
        Some((key, val)) if !key.is_empty() => format!("{}: {}", key, scalar_text(val)),
        _ => scalar_text(result),
    }
}
