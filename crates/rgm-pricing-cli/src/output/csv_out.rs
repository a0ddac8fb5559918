use serde_json::Value;
use std::io;

use super::{display_rows, flatten, is_replay, scalar_text};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Reports become `field,value` rows; display writes appear as
/// `display:<target>` rows after the computed fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Array(arr) if is_replay(value) => {
            let _ = wtr.write_record(["step", "field", "value"]);
            for step in arr {
                let n = step.get("step").map(scalar_text).unwrap_or_default();
                if let Some(report) = step.get("report") {
                    for (field, val) in report_rows(report) {
                        let _ = wtr.write_record([n.as_str(), &field, &val]);
                    }
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            for (field, val) in report_rows(value) {
                let _ = wtr.write_record([field, val]);
            }
        }
        _ => {
            let _ = wtr.write_record([scalar_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn report_rows(report: &Value) -> Vec<(String, String)> {
    let result = report.get("result").unwrap_or(report);
    let mut rows: Vec<(String, String)> = flatten(result)
        .into_iter()
        .filter(|(k, _)| k != "display")
        .map(|(k, v)| (k, scalar_text(&v)))
        .collect();
    if let Some(Value::Array(display)) = result.get("display") {
        for [target, _, text] in display_rows(display) {
            rows.push((format!("display:{}", target), text));
        }
    }
    if let Some(Value::Array(warnings)) = report.get("warnings") {
        for w in warnings {
            rows.push(("warning".to_string(), scalar_text(w)));
        }
    }
    rows
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([scalar_text(item)]);
        }
    }
}
