use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{display_rows, flatten, is_replay, scalar_text};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) if is_replay(value) => {
            for step in arr {
                let n = step.get("step").map(scalar_text).unwrap_or_default();
                let event = step.get("event").map(scalar_text).unwrap_or_default();
                println!("\nStep {}: {}", n, event);
                match step.get("report") {
                    Some(Value::Null) | None => println!("(idle)"),
                    Some(report) => print_table(report),
                }
            }
        }
        Value::Array(arr) => print_array_table(arr),
        Value::Null => println!("(idle)"),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(result) {
        if key == "display" {
            continue;
        }
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(display)) = result.get("display") {
        if !display.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Target", "Kind", "Display"]);
            for row in display_rows(display) {
                builder.push_record(row);
            }
            println!("\n{}", Table::from(builder));
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        _ => scalar_text(value),
    }
}
