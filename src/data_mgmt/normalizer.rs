use serde_json::{Map, Value};

use super::models::{sentinel_value, Reading};

// Accepted spellings per quantity, in priority order
const DO_ALIASES: &[&str] = &["DO", "Do", "do"];
const TEMP_ALIASES: &[&str] = &["temperature", "temp", "Temp", "TempC"];
const PH_ALIASES: &[&str] = &["pH", "ph"];
const CONDUCT_ALIASES: &[&str] = &["conductivity", "conduct", "tds", "Conduct"];

/// Build a reading from an arbitrary sensor payload. Never fails.
pub fn normalize(payload: &Value) -> Reading {
    let Some(fields) = payload.as_object() else {
        log::debug!("Payload is not a JSON object; using sentinel reading");
        return Reading::sentinel();
    };
    Reading {
        dissolved_oxygen: first_present(fields, DO_ALIASES),
        temperature: first_present(fields, TEMP_ALIASES),
        ph: first_present(fields, PH_ALIASES),
        conductivity: first_present(fields, CONDUCT_ALIASES),
    }
}

fn first_present(fields: &Map<String, Value>, aliases: &[&str]) -> Value {
    aliases
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .find(|value| !value.is_null())
        .cloned()
        .unwrap_or_else(sentinel_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_canonical_names() {
        let reading = normalize(&json!({"DO": 5.2, "Temp": 28, "pH": 7.1, "tds": 310}));
        assert_eq!(reading.dissolved_oxygen, json!(5.2));
        assert_eq!(reading.temperature, json!(28));
        assert_eq!(reading.ph, json!(7.1));
        assert_eq!(reading.conductivity, json!(310));
    }

    #[test]
    fn test_alias_priority() {
        let reading = normalize(&json!({
            "do": 1.0, "Do": 2.0, "DO": 3.0,
            "TempC": 10, "temp": 20, "temperature": 30,
            "ph": 6.5, "pH": 7.5,
            "Conduct": 100, "tds": 200, "conduct": 300, "conductivity": 400
        }));
        assert_eq!(reading.dissolved_oxygen, json!(3.0));
        assert_eq!(reading.temperature, json!(30));
        assert_eq!(reading.ph, json!(7.5));
        assert_eq!(reading.conductivity, json!(400));
    }

    #[test]
    fn test_null_falls_through_to_next_alias() {
        let reading = normalize(&json!({"DO": null, "Do": 4.4, "temperature": null}));
        assert_eq!(reading.dissolved_oxygen, json!(4.4));
        assert_eq!(reading.temperature, json!(0.01));
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        assert_eq!(normalize(&json!({"turbidity": 3})), Reading::sentinel());
        assert_eq!(normalize(&json!({})), Reading::sentinel());
        assert_eq!(normalize(&json!([1, 2, 3])), Reading::sentinel());
    }

    #[test]
    fn test_values_pass_through_unvalidated() {
        let reading = normalize(&json!({"DO": "high", "temp": -400, "ph": {"raw": 1}, "tds": false}));
        assert_eq!(reading.dissolved_oxygen, json!("high"));
        assert_eq!(reading.temperature, json!(-400));
        assert_eq!(reading.ph, json!({"raw": 1}));
        assert_eq!(reading.conductivity, json!(false));
    }
}
