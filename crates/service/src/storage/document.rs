use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry in a collection: a free-form JSON object whose only required
/// field is an integer `id`. All other fields pass through unvalidated.
pub type Record = serde_json::Map<String, Value>;

/// The persisted whole: both collections plus their id counters.
/// Field order matches the on-disk layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub scenarios: Vec<Record>,
    pub vehicles: Vec<Record>,
    #[serde(rename = "nextScenarioId", deserialize_with = "int_lenient")]
    pub next_scenario_id: i64,
    #[serde(rename = "nextVehicleId", deserialize_with = "int_lenient")]
    pub next_vehicle_id: i64,
}

impl Document {
    /// The document written on first run: empty collections, counters at 1.
    pub fn empty() -> Self {
        Self { scenarios: Vec::new(), vehicles: Vec::new(), next_scenario_id: 1, next_vehicle_id: 1 }
    }
}

/// Which collection of the document an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Scenarios,
    Vehicles,
}

impl Collection {
    /// Entity name used in client-facing messages ("Scenario not found").
    pub fn label(self) -> &'static str {
        match self {
            Collection::Scenarios => "Scenario",
            Collection::Vehicles => "Vehicle",
        }
    }

    pub fn records(self, doc: &Document) -> &Vec<Record> {
        match self {
            Collection::Scenarios => &doc.scenarios,
            Collection::Vehicles => &doc.vehicles,
        }
    }

    pub fn records_mut(self, doc: &mut Document) -> &mut Vec<Record> {
        match self {
            Collection::Scenarios => &mut doc.scenarios,
            Collection::Vehicles => &mut doc.vehicles,
        }
    }

    pub fn next_id(self, doc: &Document) -> i64 {
        match self {
            Collection::Scenarios => doc.next_scenario_id,
            Collection::Vehicles => doc.next_vehicle_id,
        }
    }

    pub fn set_next_id(self, doc: &mut Document, value: i64) {
        match self {
            Collection::Scenarios => doc.next_scenario_id = value,
            Collection::Vehicles => doc.next_vehicle_id = value,
        }
    }
}

/// The integer `id` of a record, if present and integral.
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// Persisted counters may appear as a number or a numeric string; always
/// normalize to an integer on load.
fn int_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) => Ok(v as i64),
        Raw::Str(s) => s.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_counters_at_one() {
        let doc = Document::empty();
        assert!(doc.scenarios.is_empty());
        assert!(doc.vehicles.is_empty());
        assert_eq!(doc.next_scenario_id, 1);
        assert_eq!(doc.next_vehicle_id, 1);
    }

    #[test]
    fn counters_load_from_numbers_or_numeric_strings() {
        let doc: Document = serde_json::from_str(
            r#"{"scenarios":[],"vehicles":[],"nextScenarioId":"7","nextVehicleId":3}"#,
        )
        .expect("parse");
        assert_eq!(doc.next_scenario_id, 7);
        assert_eq!(doc.next_vehicle_id, 3);
    }

    #[test]
    fn non_numeric_counter_is_a_parse_error() {
        let res: Result<Document, _> = serde_json::from_str(
            r#"{"scenarios":[],"vehicles":[],"nextScenarioId":"seven","nextVehicleId":1}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn serializes_with_camel_case_counter_keys() {
        let json = serde_json::to_value(Document::empty()).expect("serialize");
        assert_eq!(json["nextScenarioId"], 1);
        assert_eq!(json["nextVehicleId"], 1);
        assert!(json["scenarios"].is_array());
        assert!(json["vehicles"].is_array());
    }

    #[test]
    fn record_id_requires_integral_value() {
        let rec: Record = serde_json::from_str(r#"{"id": 4, "name": "x"}"#).expect("parse");
        assert_eq!(record_id(&rec), Some(4));
        let rec: Record = serde_json::from_str(r#"{"id": "4"}"#).expect("parse");
        assert_eq!(record_id(&rec), None);
        let rec: Record = serde_json::from_str(r#"{"name": "x"}"#).expect("parse");
        assert_eq!(record_id(&rec), None);
    }
}
