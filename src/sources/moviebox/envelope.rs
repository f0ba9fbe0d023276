use serde_json::Value;

/// Shape of an upstream response body.
///
/// The catalog wraps payloads inconsistently: most endpoints answer
/// `{code, message, data: {...}}`, some nest a second `data` inside, and a
/// few return the payload bare. Every endpoint goes through the same unwrap.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{ data: { data: payload } }`
    Nested(Value),
    /// `{ data: payload }`
    Single(Value),
    /// Anything else, passed through untouched.
    Raw(Value),
}

impl Envelope {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut outer) => {
                let has_data = outer.get("data").is_some_and(|d| !d.is_null());
                let has_nested = outer
                    .get("data")
                    .and_then(|d| d.get("data"))
                    .is_some_and(|d| !d.is_null());

                if has_nested {
                    let payload = outer
                        .remove("data")
                        .and_then(|mut d| d.get_mut("data").map(Value::take))
                        .unwrap_or_default();
                    Self::Nested(payload)
                } else if has_data {
                    Self::Single(outer.remove("data").unwrap_or_default())
                } else {
                    Self::Raw(Value::Object(outer))
                }
            }
            other => Self::Raw(other),
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Self::Nested(v) | Self::Single(v) | Self::Raw(v) => v,
        }
    }
}

pub fn unwrap_payload(value: Value) -> Value {
    Envelope::classify(value).into_payload()
}
