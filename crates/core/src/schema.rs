//! Schema Contract Layer
//!
//! Every request and result type is validated from raw JSON through the two
//! contract traits below, so failures name the offending field and rule instead
//! of surfacing a generic deserializer message. Output types additionally
//! publish a JSON Schema that is forwarded to the model as the structured-output
//! constraint.

use crate::error::{Constraint, ValidationError};
use schemars::{JsonSchema, generate::SchemaSettings};
use serde_json::{Map, Value};

/// A request type that can be built from untrusted caller input.
pub trait InputContract: Sized {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError>;
}

/// A result type that can be built from a model response.
pub trait OutputContract: Sized + JsonSchema {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError>;

    /// The JSON Schema sent alongside the prompt.
    fn response_schema() -> Value {
        json_schema_for::<Self>()
    }
}

/// Renders an inlined JSON Schema for `T`, without the meta keys providers reject.
pub fn json_schema_for<T: JsonSchema>() -> Value {
    let schema = SchemaSettings::draft2020_12()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>();
    let mut value = schema.to_value();
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    value
}

/// Read-only view over one JSON object, tracking its path for error reporting.
pub struct Fields<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Opens the top-level document.
    pub fn of(raw: &'a Value) -> Result<Self, ValidationError> {
        Self::at(raw, String::new())
    }

    fn at(raw: &'a Value, path: String) -> Result<Self, ValidationError> {
        match raw.as_object() {
            Some(map) => Ok(Self { path, map }),
            None => {
                let field = if path.is_empty() { "body".to_string() } else { path };
                Err(ValidationError::new(field, Constraint::NotAnObject))
            }
        }
    }

    fn path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn error(&self, name: &str, constraint: Constraint) -> ValidationError {
        ValidationError::new(self.path(name), constraint)
    }

    /// Absent and explicit `null` are treated alike.
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    /// A string whose trimmed length is at least `min` characters. The value is
    /// returned verbatim.
    pub fn required_text(&self, name: &str, min: usize) -> Result<String, ValidationError> {
        let value = self
            .get(name)
            .ok_or_else(|| self.error(name, Constraint::Required))?;
        let text = value.as_str().ok_or_else(|| {
            self.error(
                name,
                Constraint::TypeMismatch {
                    expected: "a string",
                },
            )
        })?;
        let actual = text.trim().chars().count();
        if actual < min {
            return Err(self.error(name, Constraint::MinLength { min, actual }));
        }
        Ok(text.to_string())
    }

    pub fn optional_text(&self, name: &str) -> Result<Option<String>, ValidationError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(self.error(
                name,
                Constraint::TypeMismatch {
                    expected: "a string",
                },
            )),
        }
    }

    /// An integer `>= min`; `default` only applies when the field is absent.
    pub fn integer_or(&self, name: &str, default: i64, min: i64) -> Result<i64, ValidationError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        let number = value.as_i64().ok_or_else(|| {
            self.error(
                name,
                Constraint::TypeMismatch {
                    expected: "an integer",
                },
            )
        })?;
        if number < min {
            return Err(self.error(name, Constraint::Minimum { min }));
        }
        Ok(number)
    }

    pub fn optional_bool(&self, name: &str) -> Result<Option<bool>, ValidationError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(self.error(
                name,
                Constraint::TypeMismatch {
                    expected: "a boolean",
                },
            )),
        }
    }

    /// A string restricted to `allowed`.
    pub fn one_of(
        &self,
        name: &str,
        allowed: &'static [&'static str],
    ) -> Result<&'a str, ValidationError> {
        let value = self
            .get(name)
            .ok_or_else(|| self.error(name, Constraint::Required))?;
        let text = value.as_str().ok_or_else(|| {
            self.error(
                name,
                Constraint::TypeMismatch {
                    expected: "a string",
                },
            )
        })?;
        allowed
            .iter()
            .find(|candidate| **candidate == text)
            .copied()
            .ok_or_else(|| self.error(name, Constraint::EnumMismatch { allowed }))
    }

    fn array(&self, name: &str) -> Result<&'a Vec<Value>, ValidationError> {
        let value = self
            .get(name)
            .ok_or_else(|| self.error(name, Constraint::Required))?;
        value.as_array().ok_or_else(|| {
            self.error(
                name,
                Constraint::TypeMismatch {
                    expected: "an array",
                },
            )
        })
    }

    /// An array of strings, in order.
    pub fn text_list(&self, name: &str) -> Result<Vec<String>, ValidationError> {
        self.array(name)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ValidationError::new(
                        format!("{}[{}]", self.path(name), i),
                        Constraint::TypeMismatch {
                            expected: "a string",
                        },
                    )
                })
            })
            .collect()
    }

    /// An array of objects, each opened as its own `Fields` view.
    pub fn objects(&self, name: &str) -> Result<Vec<Fields<'a>>, ValidationError> {
        self.array(name)?
            .iter()
            .enumerate()
            .map(|(i, item)| Fields::at(item, format!("{}[{}]", self.path(name), i)))
            .collect()
    }

    /// A nested object.
    pub fn object(&self, name: &str) -> Result<Fields<'a>, ValidationError> {
        let value = self
            .get(name)
            .ok_or_else(|| self.error(name, Constraint::Required))?;
        Fields::at(value, self.path(name))
    }

    /// Every entry of this object whose value is a string. Keys keep their
    /// original spelling.
    pub fn text_entries(&self) -> Result<Vec<(&'a str, String)>, ValidationError> {
        self.map
            .iter()
            .map(|(key, value)| match value.as_str() {
                Some(text) => Ok((key.as_str(), text.to_string())),
                None => Err(self.error(
                    key,
                    Constraint::TypeMismatch {
                        expected: "a string",
                    },
                )),
            })
            .collect()
    }

    /// Field path prefix of this view, for callers reporting their own errors.
    pub fn field(&self, name: &str) -> String {
        self.path(name)
    }
}
