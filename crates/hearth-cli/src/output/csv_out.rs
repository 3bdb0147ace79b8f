use serde_json::{Map, Value};
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Results carrying per-year or per-month records are written one row per
/// record; parallel record arrays (the buy and rent breakdowns) are joined
/// column-wise with their field name as prefix. Anything else becomes a
/// two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result(&mut wtr, result),
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => {
            let arrays = [("", arr.as_slice())];
            write_records(&mut wtr, &arrays);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result(wtr: &mut StdoutWriter<'_>, result: &Map<String, Value>) {
    if let (Some(Value::Array(rows)), Some(Value::Array(cols)), Some(Value::Array(matrix))) = (
        result.get("variable_1_values"),
        result.get("variable_2_values"),
        result.get("matrix"),
    ) {
        write_grid(wtr, result, rows, cols, matrix);
        return;
    }

    let arrays: Vec<(&str, &[Value])> = result
        .iter()
        .filter_map(|(k, v)| match v {
            Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => {
                Some((k.as_str(), arr.as_slice()))
            }
            _ => None,
        })
        .collect();

    if arrays.is_empty() {
        write_fields(wtr, result);
    } else {
        write_records(wtr, &arrays);
    }
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

/// Join record arrays side by side, row by row. A shared leading `year` or
/// `month` column is written once.
fn write_records(wtr: &mut StdoutWriter<'_>, arrays: &[(&str, &[Value])]) {
    let columns: Vec<(usize, String)> = arrays
        .iter()
        .enumerate()
        .flat_map(|(idx, (_, arr))| match arr.first() {
            Some(Value::Object(first)) => first.keys().map(|k| (idx, k.clone())).collect(),
            _ => Vec::new(),
        })
        .collect();
    let shared_key = shared_index_column(arrays);

    let mut headers = Vec::new();
    if let Some(key) = shared_key {
        headers.push(key.to_string());
    }
    for (idx, key) in &columns {
        if Some(key.as_str()) == shared_key {
            continue;
        }
        let prefix = arrays[*idx].0;
        if arrays.len() > 1 && !prefix.is_empty() {
            headers.push(format!("{}.{}", prefix, key));
        } else {
            headers.push(key.clone());
        }
    }
    let _ = wtr.write_record(&headers);

    let rows = arrays.iter().map(|(_, arr)| arr.len()).max().unwrap_or(0);
    for row in 0..rows {
        let mut record = Vec::with_capacity(headers.len());
        if let Some(key) = shared_key {
            record.push(cell(arrays[0].1, row, key));
        }
        for (idx, key) in &columns {
            if Some(key.as_str()) == shared_key {
                continue;
            }
            record.push(cell(arrays[*idx].1, row, key));
        }
        let _ = wtr.write_record(&record);
    }
}

fn shared_index_column(arrays: &[(&str, &[Value])]) -> Option<&'static str> {
    if arrays.len() < 2 {
        return None;
    }
    ["year", "month"].into_iter().find(|key| {
        arrays
            .iter()
            .all(|(_, arr)| matches!(arr.first(), Some(Value::Object(m)) if m.contains_key(*key)))
    })
}

fn cell(arr: &[Value], row: usize, key: &str) -> String {
    arr.get(row)
        .and_then(|item| item.get(key))
        .map(format_csv_value)
        .unwrap_or_default()
}

fn write_grid(
    wtr: &mut StdoutWriter<'_>,
    result: &Map<String, Value>,
    rows: &[Value],
    cols: &[Value],
    matrix: &[Value],
) {
    let name_1 = result.get("variable_1_name").and_then(Value::as_str).unwrap_or("variable_1");
    let mut header = vec![name_1.to_string()];
    header.extend(cols.iter().map(format_csv_value));
    let _ = wtr.write_record(&header);

    for (row_value, cells) in rows.iter().zip(matrix) {
        let mut record = vec![format_csv_value(row_value)];
        if let Value::Array(cells) = cells {
            record.extend(cells.iter().map(format_csv_value));
        }
        let _ = wtr.write_record(&record);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
