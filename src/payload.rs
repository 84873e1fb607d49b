use anyhow::{Context, Result as AnyResult};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::error::{CompareError, Result};
use crate::platform::PlatformId;
use crate::stats::RawRecord;

/// Table name given to the single series of a CDN payload.
pub const CDN_TABLE: &str = "summary";

/// One range's backend response, split into named sub-tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub tables: IndexMap<String, Vec<RawRecord>>,
}

impl Payload {
    pub fn from_value(platform: PlatformId, value: Value) -> Result<Self> {
        let mut tables = IndexMap::new();

        match platform {
            PlatformId::Cdn => {
                let records = match value {
                    Value::Array(items) => records_from(CDN_TABLE, items)?,
                    Value::Object(mut object) if object.contains_key("data") => {
                        envelope_records(CDN_TABLE, take_value(&mut object, "data"))?
                    }
                    Value::Object(object) => vec![object],
                    Value::Null => Vec::new(),
                    other => {
                        return Err(CompareError::Payload(format!(
                            "expected records for {}, found {}",
                            platform,
                            kind(&other)
                        )))
                    }
                };
                tables.insert(CDN_TABLE.to_string(), records);
            }
            PlatformId::Search | PlatformId::WebAnalytics => {
                let mut object = match value {
                    Value::Object(object) => object,
                    other => {
                        return Err(CompareError::Payload(format!(
                            "expected an object of sub-tables for {}, found {}",
                            platform,
                            kind(&other)
                        )))
                    }
                };
                if matches!(object.get("comparison"), Some(Value::Object(_))) {
                    if let Value::Object(inner) = take_value(&mut object, "comparison") {
                        object = inner;
                    }
                }
                for (name, table) in object {
                    let records = match table {
                        Value::Array(items) => records_from(&name, items)?,
                        Value::Object(mut envelope) if envelope.contains_key("data") => {
                            envelope_records(&name, take_value(&mut envelope, "data"))?
                        }
                        Value::Object(_) => {
                            return Err(CompareError::Payload(format!(
                                "table '{}' is an object without a data array",
                                name
                            )))
                        }
                        Value::Null => Vec::new(),
                        other => {
                            return Err(CompareError::Payload(format!(
                                "table '{}' has {} where records were expected",
                                name,
                                kind(&other)
                            )))
                        }
                    };
                    tables.insert(name, records);
                }
            }
        }

        Ok(Self { tables })
    }

    pub fn from_file(platform: PlatformId, path: &Path) -> AnyResult<Self> {
        let start_time = Instant::now();
        info!(action = "load", component = "payload", file_path = ?path, platform = %platform, "Loading payload");

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {:?}", path))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Payload file {:?} is not valid JSON", path))?;
        let payload = Self::from_value(platform, value)
            .with_context(|| format!("Payload file {:?} has an unexpected shape", path))?;

        info!(
            action = "loaded",
            component = "payload",
            file_path = ?path,
            table_count = payload.tables.len(),
            record_count = payload.record_count(),
            duration_ms = start_time.elapsed().as_millis(),
            "Loaded payload"
        );
        Ok(payload)
    }

    pub fn records(&self, table: &str) -> &[RawRecord] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}

fn records_from(table: &str, items: Vec<Value>) -> Result<Vec<RawRecord>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(CompareError::Payload(format!(
                "row {} of table '{}' is {}, not an object",
                i,
                table,
                kind(&other)
            ))),
        })
        .collect()
}

fn take_value(object: &mut RawRecord, key: &str) -> Value {
    object.get_mut(key).map(Value::take).unwrap_or(Value::Null)
}

/// The `data` member of an envelope: an array of records, or null for none.
fn envelope_records(table: &str, data: Value) -> Result<Vec<RawRecord>> {
    match data {
        Value::Array(items) => records_from(table, items),
        Value::Null => Ok(Vec::new()),
        other => Err(CompareError::Payload(format!(
            "table '{}' has {} where records were expected",
            table,
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
