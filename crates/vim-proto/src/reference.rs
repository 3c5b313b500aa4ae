use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Opaque identifier for a remote managed object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ManagedObjectReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ManagedObjectReference {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ManagedObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

// References always travel with their type marker; the JSON protocol needs it
// wherever a reference sits in a polymorphic slot.
impl Serialize for ManagedObjectReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ManagedObjectReference", 3)?;
        state.serialize_field("_typeName", "ManagedObjectReference")?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_type_and_value() {
        let moref = ManagedObjectReference::new("ResourcePool", "resgroup-9");
        assert_eq!(moref.to_string(), "ResourcePool:resgroup-9");
    }

    #[test]
    fn serializes_with_type_marker() {
        let moref = ManagedObjectReference::new("Folder", "group-v3");
        let value = serde_json::to_value(&moref).unwrap();
        assert_eq!(value["_typeName"], "ManagedObjectReference");
        assert_eq!(value["type"], "Folder");
        assert_eq!(value["value"], "group-v3");
    }

    #[test]
    fn ignores_type_marker_when_decoding() {
        let moref: ManagedObjectReference = serde_json::from_value(serde_json::json!({
            "_typeName": "ManagedObjectReference",
            "type": "Task",
            "value": "task-42"
        }))
        .unwrap();
        assert_eq!(moref, ManagedObjectReference::new("Task", "task-42"));
    }
}
