//! Memory usage samples recorded while the index was built.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WebIndexError;

/// One RSS sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    /// Sample position, parsed base 10 from the response key
    pub index: i64,
    /// Memory usage value
    pub value: f64,
}

/// A plotted point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl From<MemorySample> for ChartPoint {
    fn from(sample: MemorySample) -> Self {
        Self {
            x: sample.index as f64,
            y: sample.value,
        }
    }
}

/// Parse a sample mapping into a series sorted ascending by index.
///
/// The mapping carries no usable order, so the result is always sorted
/// numerically ("10" comes after "9"). Two keys naming the same index
/// ("1" and "01") are rejected.
pub fn parse_samples(raw: &Map<String, Value>) -> Result<Vec<MemorySample>, WebIndexError> {
    let mut keyed = raw
        .iter()
        .map(|(key, value)| {
            let index = key
                .parse::<i64>()
                .map_err(|_| WebIndexError::InvalidSampleKey { key: key.clone() })?;
            let value = value
                .as_f64()
                .ok_or_else(|| WebIndexError::InvalidSampleValue { key: key.clone() })?;
            Ok((key, MemorySample { index, value }))
        })
        .collect::<Result<Vec<_>, WebIndexError>>()?;

    keyed.sort_by_key(|(_, s)| s.index);
    if let Some(pair) = keyed.windows(2).find(|w| w[0].1.index == w[1].1.index) {
        return Err(WebIndexError::DuplicateSampleIndex {
            index: pair[0].1.index,
            first: pair[0].0.clone(),
            second: pair[1].0.clone(),
        });
    }

    Ok(keyed.into_iter().map(|(_, sample)| sample).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_sorted_by_numeric_key() {
        let raw = as_map(json!({"2": 100, "0": 50, "1": 75}));
        let samples = parse_samples(&raw).unwrap();
        let points: Vec<(i64, f64)> = samples.iter().map(|s| (s.index, s.value)).collect();
        assert_eq!(points, vec![(0, 50.0), (1, 75.0), (2, 100.0)]);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let raw = as_map(json!({"10": 3, "9": 2, "100": 4, "1": 1}));
        let indices: Vec<i64> = parse_samples(&raw).unwrap().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 9, 10, 100]);
    }

    #[test]
    fn test_invalid_key() {
        let raw = as_map(json!({"0": 1, "abc": 2}));
        let err = parse_samples(&raw).unwrap_err();
        assert!(matches!(err, WebIndexError::InvalidSampleKey { ref key } if key == "abc"));
    }

    #[test]
    fn test_padded_key_rejected() {
        let raw = as_map(json!({" 1": 2}));
        let err = parse_samples(&raw).unwrap_err();
        assert!(matches!(err, WebIndexError::InvalidSampleKey { ref key } if key == " 1"));
    }

    #[test]
    fn test_repeated_index_rejected() {
        let raw = as_map(json!({"1": 10, "01": 20, "2": 30}));
        let err = parse_samples(&raw).unwrap_err();
        assert!(matches!(err, WebIndexError::DuplicateSampleIndex { index: 1, .. }));
    }

    #[test]
    fn test_invalid_value() {
        let raw = as_map(json!({"0": "lots"}));
        let err = parse_samples(&raw).unwrap_err();
        assert!(matches!(err, WebIndexError::InvalidSampleValue { .. }));
    }

    #[test]
    fn test_empty_mapping() {
        let raw = Map::new();
        assert!(parse_samples(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_chart_point_from_sample() {
        let point = ChartPoint::from(MemorySample { index: 3, value: 12.5 });
        assert_eq!(point, ChartPoint { x: 3.0, y: 12.5 });
    }
}
