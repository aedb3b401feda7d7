//! Declarative request schemas
//!
//! Each operation owns a [`Schema`]: the fields it accepts, their types, which
//! are required, and a few cross-field rules. Validation is a pure check run
//! before anything is signed or sent.

use bybit_types::{ParamValue, Params};

/// Accepted shape of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Any text
    String,
    /// Whole number
    Integer,
    /// Any number (integer, decimal or float)
    Number,
    /// `true`/`false`
    Boolean,
    /// Text restricted to a fixed set of values
    OneOf(&'static [&'static str]),
}

impl FieldType {
    /// Human-readable name used in errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::OneOf(_) => "string",
        }
    }

    fn accepts(&self, value: &ParamValue) -> bool {
        match self {
            Self::String | Self::OneOf(_) => matches!(value, ParamValue::Str(_)),
            Self::Integer => value.is_integer(),
            Self::Number => value.is_number(),
            Self::Boolean => matches!(value, ParamValue::Bool(_)),
        }
    }
}

/// One accepted parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Parameter name on the wire
    pub name: &'static str,
    /// Accepted type
    pub ty: FieldType,
    /// Whether the parameter must be present
    pub required: bool,
}

impl Field {
    /// A field that must be present
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    /// A field that may be omitted
    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Cross-field constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `field` is required when `when` equals `equals`
    RequiredWhen {
        field: &'static str,
        when: &'static str,
        equals: &'static str,
    },
    /// At least one of the listed fields must be present
    AnyOf(&'static [&'static str]),
}

/// Fields and rules for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Accepted fields, in declaration order
    pub fields: &'static [Field],
    /// Cross-field rules
    pub rules: &'static [Rule],
}

impl Schema {
    /// A schema accepting no parameters
    pub const EMPTY: Schema = Schema {
        fields: &[],
        rules: &[],
    };

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Check `params` against this schema
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// unknown fields (alphabetically), then declared fields in declaration
    /// order, then cross-field rules.
    pub fn validate(&self, params: &Params) -> Result<(), ValidationError> {
        let mut unknown: Vec<&str> = params
            .keys()
            .filter(|key| self.field(key).is_none())
            .collect();
        unknown.sort_unstable();
        if let Some(field) = unknown.first() {
            return Err(ValidationError::UnknownField {
                field: field.to_string(),
            });
        }

        for field in self.fields {
            let Some(value) = params.get(field.name) else {
                if field.required {
                    return Err(ValidationError::MissingField { field: field.name });
                }
                continue;
            };

            if !field.ty.accepts(value) {
                return Err(ValidationError::WrongType {
                    field: field.name,
                    expected: field.ty.name(),
                    found: value.kind_name(),
                });
            }

            if let FieldType::OneOf(allowed) = field.ty {
                let text = value.as_str().unwrap_or_default();
                if !allowed.contains(&text) {
                    return Err(ValidationError::NotInDomain {
                        field: field.name,
                        value: text.to_string(),
                        allowed,
                    });
                }
            }
        }

        for rule in self.rules {
            match *rule {
                Rule::RequiredWhen {
                    field,
                    when,
                    equals,
                } => {
                    let triggered = params.get(when).and_then(ParamValue::as_str) == Some(equals);
                    if triggered && !params.contains_key(field) {
                        return Err(ValidationError::ConditionalRequired {
                            field,
                            when,
                            equals,
                        });
                    }
                }
                Rule::AnyOf(fields) => {
                    if !fields.iter().any(|f| params.contains_key(f)) {
                        return Err(ValidationError::MissingOneOf { fields });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Why a parameter set was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field absent
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// Field present with the wrong type
    #[error("field `{field}` must be {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Value outside the field's allowed set
    #[error("field `{field}` has invalid value `{value}` (allowed: {})", .allowed.join(", "))]
    NotInDomain {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Field not accepted by this operation
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    /// None of a group of alternative fields present
    #[error("one of {} is required", .fields.join(", "))]
    MissingOneOf { fields: &'static [&'static str] },

    /// Field required by another field's value
    #[error("field `{field}` is required when `{when}` is {equals}")]
    ConditionalRequired {
        field: &'static str,
        when: &'static str,
        equals: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field (alternatives joined with `|`)
    pub fn field(&self) -> String {
        match self {
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::NotInDomain { field, .. }
            | Self::ConditionalRequired { field, .. } => field.to_string(),
            Self::UnknownField { field } => field.clone(),
            Self::MissingOneOf { fields } => fields.join("|"),
        }
    }
}
