use crate::models::detail::{NewDetail, UNKNOWN};
use serde::de::Error as _;
use serde_json::{Map, Value};

/// One device record as emitted by the test analyzer. Unknown fields are ignored.
#[derive(Debug, Default, PartialEq)]
pub struct DeviceRecord {
    pub serial: Option<String>,
    pub status: Option<String>,
    pub log_path: Option<String>,
}

impl DeviceRecord {
    /// Strings are taken as they are, other values keep their JSON text.
    /// A `null` counts as absent.
    fn from_map(mut fields: Map<String, Value>) -> Self {
        let mut take = |key: &str| match fields.remove(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        Self {
            serial: take("serial"),
            status: take("status"),
            log_path: take("log_path"),
        }
    }
}

impl From<DeviceRecord> for NewDetail {
    fn from(record: DeviceRecord) -> Self {
        Self {
            device_serial: record.serial.unwrap_or_else(|| UNKNOWN.to_string()),
            result: record.status.unwrap_or_else(|| UNKNOWN.to_string()),
            log_path: record.log_path.unwrap_or_default(),
        }
    }
}

/// The analyzer writes either `{"device_results": [...]}` or a bare list.
#[derive(Debug)]
pub struct ResultDocument {
    records: Vec<DeviceRecord>,
}

impl ResultDocument {
    pub fn parse_slice(content: &[u8]) -> serde_json::Result<Self> {
        Self::from_value(serde_json::from_slice(content)?)
    }

    fn from_value(value: Value) -> serde_json::Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut fields) => match fields.remove("device_results") {
                None => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(serde_json::Error::custom(format!(
                        "device_results must be a list, found {}",
                        kind(&other)
                    )));
                }
            },
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a list or an object with device_results, found {}",
                    kind(&other)
                )));
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(DeviceRecord::from_map(fields)),
                other => Err(serde_json::Error::custom(format!(
                    "device record {} must be an object, found {}",
                    index,
                    kind(&other)
                ))),
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(Self { records })
    }

    pub fn into_records(self) -> Vec<DeviceRecord> {
        self.records
    }

    pub fn into_details(self) -> Vec<NewDetail> {
        self.into_records().into_iter().map(NewDetail::from).collect()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
