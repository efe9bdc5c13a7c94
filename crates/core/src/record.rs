//! Typed view over a normalized medicine record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// General (non-dosing) information about a medicine, as returned by the model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    pub name: String,
    pub generic: String,
    pub strength: String,
    pub form: String,
    pub indications: String,
    pub contraindications: String,
    pub side_effects: String,
    pub warnings: String,
    pub interactions: String,
    pub pregnancy: String,
    pub schedule: String,
    pub note: String,
}

impl MedicineRecord {
    /// Build a record from normalized data.
    ///
    /// Models sometimes answer with lists or numbers instead of strings; those are flattened
    /// to text rather than rejected. Unknown fields are ignored.
    pub fn from_data(data: &Map<String, Value>) -> Self {
        let text = |field: &str| data.get(field).map(value_to_text).unwrap_or_default();

        Self {
            name: text("name"),
            generic: text("generic"),
            strength: text("strength"),
            form: text("form"),
            indications: text("indications"),
            contraindications: text("contraindications"),
            side_effects: text("side_effects"),
            warnings: text("warnings"),
            interactions: text("interactions"),
            pregnancy: text("pregnancy"),
            schedule: text("schedule"),
            note: text("note"),
        }
    }

    /// Field name and value pairs in display order.
    pub fn fields(&self) -> [(&'static str, &str); 12] {
        [
            ("name", self.name.as_str()),
            ("generic", self.generic.as_str()),
            ("strength", self.strength.as_str()),
            ("form", self.form.as_str()),
            ("indications", self.indications.as_str()),
            ("contraindications", self.contraindications.as_str()),
            ("side_effects", self.side_effects.as_str()),
            ("warnings", self.warnings.as_str()),
            ("interactions", self.interactions.as_str()),
            ("pregnancy", self.pregnancy.as_str()),
            ("schedule", self.schedule.as_str()),
            ("note", self.note.as_str()),
        ]
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEDICINE_FIELDS;
    use serde_json::json;

    #[test]
    fn test_from_data_flattens_non_string_values() {
        let data = json!({
            "name": "Ibuprofen",
            "strength": 200,
            "side_effects": ["nausea", "", "heartburn"],
            "pregnancy": null,
            "extra": "ignored"
        });
        let record = MedicineRecord::from_data(data.as_object().unwrap());

        assert_eq!(record.name, "Ibuprofen");
        assert_eq!(record.strength, "200");
        assert_eq!(record.side_effects, "nausea, heartburn");
        assert_eq!(record.pregnancy, "");
        assert_eq!(record.note, "");
    }

    #[test]
    fn test_fields_follow_expected_order() {
        let record = MedicineRecord::default();
        let names: Vec<&str> = record.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, MEDICINE_FIELDS);
    }
}
