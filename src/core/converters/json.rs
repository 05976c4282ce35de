use crate::domain::model::{iso8601, Artifact, ConversionRequest, ResultSet, Value};
use crate::domain::ports::Converter;
use crate::utils::error::Result;

/// Serializes a result set as a JSON array of objects, in row order.
pub struct JsonConverter;

impl Converter for JsonConverter {
    fn convert(&self, rows: &ResultSet, request: &ConversionRequest) -> Result<Artifact> {
        let array = rows_to_json(rows);

        let bytes = if request.json.pretty {
            serde_json::to_vec_pretty(&array)?
        } else {
            serde_json::to_vec(&array)?
        };

        Ok(Artifact::Bytes(bytes))
    }
}

fn rows_to_json(rows: &ResultSet) -> serde_json::Value {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows.rows() {
        let mut object = serde_json::Map::new();
        for (name, value) in rows.columns().iter().zip(&row.values) {
            object.insert(name.clone(), value_to_json(value));
        }
        out.push(serde_json::Value::Object(object));
    }
    serde_json::Value::Array(out)
}

pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        // Non-finite floats have no JSON form and degrade to null.
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Timestamp(ts) => serde_json::Value::String(iso8601(ts)),
        Value::Json(v) => v.clone(),
    }
}
