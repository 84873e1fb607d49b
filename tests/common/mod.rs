//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rangecmp::range::parse_iso_date;
use rangecmp::stats::RawRecord;
use rangecmp::{DateRange, Payload, PlatformId};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn date_range(start: &str, end: &str) -> DateRange {
    DateRange::new(parse_iso_date(start).unwrap(), parse_iso_date(end).unwrap()).unwrap()
}

pub fn records(value: Value) -> Vec<RawRecord> {
    value
        .as_array()
        .expect("records fixture must be an array")
        .iter()
        .map(|v| v.as_object().expect("record must be an object").clone())
        .collect()
}

pub fn payload(platform: PlatformId, value: Value) -> Payload {
    Payload::from_value(platform, value).expect("fixture payload should parse")
}

pub fn write_fixture(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, "{}", value).expect("write fixture");
    file
}
