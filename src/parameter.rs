//! Query parameters: the untyped base and its typed extension.
//!
//! A [`Parameter`] only knows its name, its default and its current value. A
//! [`TypedParameter`] wraps one and adds the type inferred from the
//! placeholder, which drives default inference, value sanitization and the
//! input control offered to the user.

use std::fmt;
use std::ops::Deref;

use bigdecimal::BigDecimal;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ParamError;
use crate::placeholder::Placeholder;

lazy_static! {
    // anchored at both ends and ASCII only: the value is spliced into SQL
    // verbatim, and other Unicode digits read as identifier characters there
    static ref NUMBER: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").unwrap();
}

/// The closed set of parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Boolean,
    /// `places == 0` means integer-like or unspecified.
    DecimalNumber { places: u32 },
}

impl ParamType {
    /// Infers the type from a placeholder suffix letter and its decimal digit
    /// run. A digit run always means a decimal number, whatever the letter.
    pub fn from_suffix(suffix: char, decimals: &str) -> Self {
        if !decimals.is_empty() {
            // the tokenizer rejects runs too long for u32; direct callers saturate
            return Self::DecimalNumber { places: decimals.parse().unwrap_or(u32::MAX) };
        }
        match suffix {
            'b' => Self::Boolean,
            'd' => Self::DecimalNumber { places: 0 },
            _ => Self::String,
        }
    }
    pub fn code(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::DecimalNumber { .. } => "decimal-number",
        }
    }
    pub fn decimal_places(&self) -> u32 {
        match self {
            Self::DecimalNumber { places } => *places,
            _ => 0,
        }
    }
    /// The default used when the placeholder names none.
    pub fn fallback_default(&self) -> &'static str {
        match self {
            Self::String => "",
            Self::Boolean => "false",
            Self::DecimalNumber { .. } => "0",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ------------- Parameter -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    default_value: String,
    value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
            value: None,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn default_value(&self) -> &str {
        &self.default_value
    }
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
    /// Two occurrences of a name may not disagree on a non-empty default.
    pub fn ensure_consistency(&self, previous: &Parameter) -> Result<(), ParamError> {
        if !self.default_value.is_empty()
            && !previous.default_value.is_empty()
            && self.default_value != previous.default_value
        {
            return Err(ParamError::InconsistentDefault {
                name: self.name.clone(),
                found: self.default_value.clone(),
                previous: previous.default_value.clone(),
            });
        }
        Ok(())
    }
    /// The base layer has no grammar to check.
    pub fn sanitize(&self, value: Option<&str>, _for_default: bool) -> Result<Option<String>, ParamError> {
        Ok(value.map(str::to_string))
    }
}

// ------------- TypedParameter -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedParameter {
    // holds the default exactly as written; inference happens on read
    base: Parameter,
    kind: ParamType,
}

impl TypedParameter {
    /// Builds a parameter the way a placeholder declares it: a non-empty
    /// `decimals` run forces a decimal number.
    pub fn new(name: impl Into<String>, default_value: &str, suffix: char, decimals: &str) -> Self {
        Self::with_type(name, default_value, ParamType::from_suffix(suffix, decimals))
    }
    pub fn with_type(name: impl Into<String>, default_value: &str, kind: ParamType) -> Self {
        Self {
            base: Parameter::new(name, default_value),
            kind,
        }
    }
    pub fn from_placeholder(placeholder: &Placeholder) -> Self {
        Self::new(
            placeholder.name.as_str(),
            placeholder.hint.as_deref().unwrap_or(""),
            placeholder.suffix,
            &placeholder.decimals,
        )
    }
    pub fn kind(&self) -> ParamType {
        self.kind
    }
    pub fn decimal_places(&self) -> u32 {
        self.kind.decimal_places()
    }
    /// The default as given, or the type's own when none was.
    pub fn default_value(&self) -> &str {
        match self.base.default_value() {
            "" => self.kind.fallback_default(),
            given => given,
        }
    }
    /// The default as the operator wrote it, empty when none was given.
    pub fn nominal_default(&self) -> &str {
        self.base.default_value()
    }
    pub fn has_nominal_default(&self) -> bool {
        !self.nominal_default().is_empty()
    }
    /// The `step` attribute of a number input: `10^-decimal_places`.
    pub fn step(&self) -> BigDecimal {
        BigDecimal::new(1.into(), i64::from(self.decimal_places()))
    }

    pub fn ensure_consistency(&self, previous: &TypedParameter) -> Result<(), ParamError> {
        self.base.ensure_consistency(&previous.base)?;
        if std::mem::discriminant(&self.kind) != std::mem::discriminant(&previous.kind) {
            return Err(ParamError::InconsistentType {
                name: self.name().to_string(),
                found: self.kind.code(),
                previous: previous.kind.code(),
            });
        }
        let (found, registered) = (self.decimal_places(), previous.decimal_places());
        if found != 0 && registered != 0 && found != registered {
            return Err(ParamError::InconsistentPrecision {
                name: self.name().to_string(),
                found,
                previous: registered,
            });
        }
        Ok(())
    }

    /// Folds a consistent later occurrence into this one. Zero decimals and
    /// empty defaults carry no opinion, so a later, more specific occurrence
    /// fills them in.
    pub(crate) fn absorb(&mut self, later: &TypedParameter) {
        if self.decimal_places() == 0 && later.decimal_places() != 0 {
            self.kind = later.kind;
        }
        if !self.has_nominal_default() && later.has_nominal_default() {
            self.base.default_value = later.base.default_value.clone();
        }
    }

    /// Validates and normalizes a submitted value against the type's grammar.
    ///
    /// An absent value stays absent. Strings pass through untouched: they only
    /// ever reach the database through native parameter binding. Booleans are
    /// lower-cased and must read `true` or `false`; numbers must be a plain
    /// decimal literal and are kept exactly as entered. For those two types an
    /// empty submission means "no value".
    pub fn sanitize(&self, value: Option<&str>, for_default: bool) -> Result<Option<String>, ParamError> {
        let Some(value) = self.base.sanitize(value, for_default)? else {
            return Ok(None);
        };
        match self.kind {
            ParamType::String => Ok(Some(value)),
            _ if value.is_empty() => Ok(None),
            ParamType::Boolean => {
                let value = value.to_lowercase();
                if value != "true" && value != "false" {
                    return Err(ParamError::InvalidBooleanValue {
                        name: self.name().to_string(),
                        value,
                        for_default,
                    });
                }
                Ok(Some(value))
            }
            ParamType::DecimalNumber { .. } => {
                if !NUMBER.is_match(&value) {
                    return Err(ParamError::InvalidNumberValue {
                        name: self.name().to_string(),
                        value,
                        for_default,
                    });
                }
                Ok(Some(value))
            }
        }
    }

    /// Sanitizes `value` and makes it the current value.
    pub fn set_value(&mut self, value: Option<&str>, for_default: bool) -> Result<(), ParamError> {
        self.base.value = self.sanitize(value, for_default)?;
        Ok(())
    }
}

impl Deref for TypedParameter {
    type Target = Parameter;
    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
