use serde_json::{Map, Value};

/// Value that marks a missing column in the input records.
const NULL_VALUE: &str = "null";

/// Turns delimited text lines into JSON records, the same way the user defined function that
/// accompanies the CSV ingestion template does: the value at every position is assigned to the
/// property at the same position, `null` values are omitted, and values without a matching
/// property are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTransform {
    properties: Vec<String>,
    delimiter: char,
}

impl RecordTransform {
    /// Creates a comma-separated record transform with the specified property names.
    pub fn new<P: Into<String>>(properties: impl IntoIterator<Item = P>) -> Self {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
            delimiter: ',',
        }
    }

    /// Overrides the value delimiter.
    pub fn with_delimiter(self, delimiter: char) -> Self {
        Self { delimiter, ..self }
    }

    /// Transforms a single line into a JSON object.
    pub fn apply(&self, line: &str) -> Map<String, Value> {
        self.properties
            .iter()
            .zip(line.split(self.delimiter))
            .filter(|(_, value)| *value != NULL_VALUE)
            .map(|(property, value)| (property.clone(), Value::String(value.to_string())))
            .collect()
    }

    /// Transforms a single line into a compact JSON string.
    pub fn apply_to_string(&self, line: &str) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.apply(line))?)
    }
}
