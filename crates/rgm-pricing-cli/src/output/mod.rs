pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted `(key, value)` pairs.
///
/// Arrays are kept as leaves; the display list is printed on its own.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(&mut out, String::new(), value);
    out
}

fn flatten_into(out: &mut Vec<(String, Value)>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(out, path, val);
            }
        }
        _ => out.push((prefix, value.clone())),
    }
}

/// A replay transcript is an array of steps, each carrying its own report.
pub fn is_replay(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(|s| s.get("report").is_some()))
}

/// One row per display write: `(target, kind, text)`.
pub fn display_rows(display: &[Value]) -> Vec<[String; 3]> {
    display
        .iter()
        .map(|w| {
            let target = w.get("target").map(scalar_text).unwrap_or_default();
            let value = w.get("value");
            let kind = value
                .and_then(|v| v.get("kind"))
                .map(scalar_text)
                .unwrap_or_default();
            let text = value
                .and_then(|v| v.get("value"))
                .map(scalar_text)
                .unwrap_or_default();
            [target, kind, text]
        })
        .collect()
}

/// Plain text for a scalar JSON value.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested() {
        let v = json!({"retail": {"sale_price": "947.87"}, "edited": null, "display": []});
        let flat = flatten(&v);
        assert!(flat.contains(&("retail.sale_price".to_string(), json!("947.87"))));
        assert!(flat.contains(&("edited".to_string(), Value::Null)));
        assert!(flat.contains(&("display".to_string(), json!([]))));
    }

    #[test]
    fn test_display_rows() {
        let display = vec![json!({
            "target": "retail.sale_price",
            "value": {"kind": "currency", "value": "R$ 947,87"}
        })];
        assert_eq!(
            display_rows(&display),
            vec![[
                "retail.sale_price".to_string(),
                "currency".to_string(),
                "R$ 947,87".to_string()
            ]]
        );
    }
}
