//! The parameters of one query, keyed by name in first-seen order.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ParamError;
use crate::parameter::TypedParameter;
use crate::placeholder;
use crate::rewrite::{self, RewrittenQuery};

/// Built fresh for every resolution request and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    parameters: Vec<TypedParameter>,
    index: HashMap<String, usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts every placeholder of `sql` and registers it, checking repeated
    /// names against their first occurrence.
    pub fn from_sql(sql: &str) -> Result<Self, ParamError> {
        let mut set = Self::new();
        for placeholder in placeholder::extract(sql)? {
            set.register(TypedParameter::from_placeholder(&placeholder))?;
        }
        debug!(parameters = set.len(), "extracted query parameters");
        Ok(set)
    }

    /// Adds a parameter, or merges it into the one already registered under
    /// the same name once the two are found consistent. A default written
    /// into the placeholder must already satisfy the parameter's type.
    pub fn register(&mut self, parameter: TypedParameter) -> Result<(), ParamError> {
        if parameter.has_nominal_default() {
            parameter.sanitize(Some(parameter.default_value()), true)?;
        }
        let registered = self.index.get(parameter.name()).copied();
        match registered {
            Some(position) => {
                let previous = &mut self.parameters[position];
                parameter.ensure_consistency(previous)?;
                previous.absorb(&parameter);
            }
            None => {
                self.index.insert(parameter.name().to_string(), self.parameters.len());
                self.parameters.push(parameter);
            }
        }
        Ok(())
    }

    /// Resolves and sanitizes the value of every parameter.
    ///
    /// A submitted value wins; otherwise a default the operator wrote into
    /// the placeholder is used; otherwise the parameter has no value. The
    /// first failure aborts the whole bind.
    pub fn bind(&mut self, submitted: &HashMap<String, String>) -> Result<(), ParamError> {
        for parameter in &mut self.parameters {
            match submitted.get(parameter.name()) {
                Some(value) => parameter.set_value(Some(value.as_str()), false)?,
                None if parameter.has_nominal_default() => {
                    let default = parameter.default_value().to_string();
                    parameter.set_value(Some(default.as_str()), true)?;
                }
                None => parameter.set_value(None, false)?,
            }
        }
        Ok(())
    }

    /// Rewrites `sql` with the current values of this set.
    pub fn rewrite(&self, sql: &str) -> Result<RewrittenQuery, ParamError> {
        rewrite::rewrite(sql, &self.parameters)
    }

    pub fn get(&self, name: &str) -> Option<&TypedParameter> {
        self.index.get(name).map(|&position| &self.parameters[position])
    }
    pub fn iter(&self) -> impl Iterator<Item = &TypedParameter> {
        self.parameters.iter()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name())
    }
    pub fn len(&self) -> usize {
        self.parameters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a TypedParameter;
    type IntoIter = std::slice::Iter<'a, TypedParameter>;
    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
