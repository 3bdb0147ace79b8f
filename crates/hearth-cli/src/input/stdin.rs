use serde_json::Value;
use std::io::{self, Read};

/// Read a piped scenario from stdin, as JSON or YAML.
///
/// Returns `None` when stdin is a terminal or nothing was piped, so callers
/// can fall back to flags and region defaults.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    parse_document(trimmed).map(Some)
}

fn parse_document(text: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if text.starts_with('{') || text.starts_with('[') {
        return serde_json::from_str(text)
            .map_err(|e| format!("Failed to parse stdin as JSON: {e}").into());
    }
    serde_yaml::from_str(text).map_err(|e| format!("Failed to parse stdin as YAML: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_yaml_documents() {
        let json = parse_document(r#"{"time_horizon_years": 20}"#).unwrap();
        assert_eq!(json["time_horizon_years"], 20);

        let yaml = parse_document("time_horizon_years: 20\nbuy:\n  home_price: '2500000'").unwrap();
        assert_eq!(yaml["time_horizon_years"], 20);
        assert_eq!(yaml["buy"]["home_price"], "2500000");
    }

    #[test]
    fn test_malformed_json_reports_format() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse stdin as JSON"));
    }
}
