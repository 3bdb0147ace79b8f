use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result go into one Field/Value table; every array
/// of records (yearly breakdowns, schedules, issues) gets a table of its own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            if is_sensitivity_grid(res_map) {
                print_grid(res_map);
            }
            print_object(res_map);
        }
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn is_record_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))))
}

fn is_sensitivity_grid(map: &Map<String, Value>) -> bool {
    map.contains_key("matrix")
        && map.contains_key("variable_1_values")
        && map.contains_key("variable_2_values")
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections = Vec::new();

    for (key, val) in map {
        if is_record_array(val) {
            sections.push((key, val));
            continue;
        }
        if key == "matrix" || (key == "better_choice" && val.is_array()) {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));

    for (key, val) in sections {
        if let Value::Array(arr) = val {
            println!("\n{}", heading(key).bold());
            print_array_table(arr);
        }
    }
}

/// Difference matrix with the first variable down the side and the second
/// across the top.
fn print_grid(map: &Map<String, Value>) {
    let name_1 = map.get("variable_1_name").and_then(Value::as_str).unwrap_or("variable_1");
    let name_2 = map.get("variable_2_name").and_then(Value::as_str).unwrap_or("variable_2");
    let empty = Vec::new();
    let cols = map.get("variable_2_values").and_then(Value::as_array).unwrap_or(&empty);
    let rows = map.get("variable_1_values").and_then(Value::as_array).unwrap_or(&empty);
    let matrix = map.get("matrix").and_then(Value::as_array).unwrap_or(&empty);

    let mut builder = Builder::default();
    let mut header = vec![format!("{name_1} \\ {name_2}")];
    header.extend(cols.iter().map(format_value));
    builder.push_record(header);

    for (row_value, cells) in rows.iter().zip(matrix) {
        let mut record = vec![format_value(row_value)];
        if let Value::Array(cells) = cells {
            record.extend(cells.iter().map(|c| match c {
                Value::Null => "-".to_string(),
                other => format_value(other),
            }));
        }
        builder.push_record(record);
    }

    println!("{}", "Rent minus buy net worth".bold());
    println!("{}\n", Table::from(builder));
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

fn heading(key: &str) -> String {
    key.replace('_', " ")
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
