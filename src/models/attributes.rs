use serde_json::{Map, Value as JsonValue};

/// Attribute key under which a resource's short name is stored
pub const SHORT_NAME_ATTRIBUTE: &str = "alias";

pub type Attributes = Map<String, JsonValue>;

/// Read/write access to a resource's free-form attributes.
///
/// Anything that can expose its attributes can carry a short name, so the
/// allocator works the same way for every resource type.
pub trait Attributed {
    /// Current attributes, or `None` when the resource has none yet
    fn attributes(&self) -> Option<&Attributes>;

    /// Replaces the attributes wholesale
    fn set_attributes(&mut self, attributes: Attributes);

    fn short_name(&self) -> Option<&str> {
        self.attributes()?
            .get(SHORT_NAME_ATTRIBUTE)
            .and_then(JsonValue::as_str)
    }

    fn set_short_name(&mut self, short_name: &str) {
        let mut attributes = self.attributes().cloned().unwrap_or_default();
        attributes.insert(
            SHORT_NAME_ATTRIBUTE.to_string(),
            JsonValue::String(short_name.to_string()),
        );
        self.set_attributes(attributes);
    }
}

impl Attributed for JsonValue {
    fn attributes(&self) -> Option<&Attributes> {
        self.as_object()
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        *self = JsonValue::Object(attributes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_name_missing() {
        assert_eq!(JsonValue::Null.short_name(), None);
        assert_eq!(json!({ "region": "us-central1" }).short_name(), None);
        assert_eq!(json!({ "alias": 42 }).short_name(), None);
    }

    #[test]
    fn test_set_short_name_keeps_other_attributes() {
        let mut doc = json!({ "region": "us-central1" });
        doc.set_short_name("DW");

        assert_eq!(doc.short_name(), Some("DW"));
        assert_eq!(doc["region"], "us-central1");
    }

    #[test]
    fn test_set_short_name_on_null_document() {
        let mut doc = JsonValue::Null;
        doc.set_short_name("D");
        assert_eq!(doc, json!({ "alias": "D" }));
    }
}
