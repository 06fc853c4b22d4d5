use serde_json::Value;

/// Raw search-provider payload: an arbitrarily nested, schema-less sequence of
/// heterogeneous values, consumed once by the decoder.
pub type RawPayload = serde_json::Value;

/// Types readable from a terminal payload position. A value of the wrong JSON
/// type reads as `None`, which the accessor turns into the zero value.
pub(crate) trait PayloadField: Sized + Default {
    fn from_value(value: &Value) -> Option<Self>;
}

impl PayloadField for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl PayloadField for Vec<String> {
    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect()
    }
}

/// Reads the value at a nested index path. Every miss is soft: an index out of
/// range, a null, a non-sequence where descent must continue, or a terminal
/// type mismatch all yield the zero value, so one broken field never spoils
/// its siblings.
pub(crate) fn element_at<T: PayloadField>(seq: &[Value], path: &[usize]) -> T {
    let Some((&last, descent)) = path.split_last() else {
        return T::default();
    };

    let mut current = seq;
    for &index in descent {
        let next = match current.get(index) {
            Some(value) if !value.is_null() => value,
            _ => return T::default(),
        };
        current = match next.as_array() {
            Some(items) => items,
            None => return T::default(),
        };
    }

    current
        .get(last)
        .filter(|value| !value.is_null())
        .and_then(T::from_value)
        .unwrap_or_default()
}
