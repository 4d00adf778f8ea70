//! Input controls for query parameters.
//!
//! A parameter is first described as a [`FormControl`], a small structured
//! value that can be serialized or handed to another template engine, and
//! only then rendered to markup. All escaping happens in this module's
//! rendering functions.

use std::fmt::{self, Write};

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use crate::parameter::{ParamType, TypedParameter};

// past this many decimals a plain step would be a long run of zeros
const PLAIN_STEP_PLACES: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormControl {
    /// Id of the input the label points at.
    pub id: String,
    pub label: String,
    pub kind: ControlKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    Number { name: String, step: String, value: String },
    /// A hidden `false` input followed by a checkbox posting `true`, so an
    /// unchecked box still submits a value.
    Checkbox { name: String, checked: bool },
    /// null / true / false.
    RadioGroup { name: String, choices: Vec<RadioChoice> },
    Text { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioChoice {
    pub id: String,
    pub label: &'static str,
    pub value: &'static str,
    pub checked: bool,
}

impl FormControl {
    pub fn for_parameter(parameter: &TypedParameter) -> Self {
        let name = parameter.name().to_string();
        let id = format!("qp_{name}");
        let value = parameter.value();
        let kind = match parameter.kind() {
            ParamType::DecimalNumber { places } => {
                let step = parameter.step();
                ControlKind::Number {
                    name: name.clone(),
                    step: if places <= PLAIN_STEP_PLACES {
                        step.to_plain_string()
                    } else {
                        step.to_scientific_notation()
                    },
                    value: value.unwrap_or_default().to_string(),
                }
            }
            ParamType::Boolean if parameter.has_nominal_default() => ControlKind::Checkbox {
                name: name.clone(),
                checked: value == Some("true"),
            },
            ParamType::Boolean => ControlKind::RadioGroup {
                name: name.clone(),
                choices: [("null", ""), ("true", "true"), ("false", "false")]
                    .into_iter()
                    .map(|(label, choice)| RadioChoice {
                        id: format!("{id}_{label}"),
                        label,
                        value: choice,
                        checked: value.unwrap_or_default() == choice,
                    })
                    .collect(),
            },
            ParamType::String => ControlKind::Text {
                name: name.clone(),
                value: value.unwrap_or_default().to_string(),
            },
        };
        Self { id, label: name, kind }
    }

    /// The label and its control as HTML.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_html(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, r#"<label for="{}">{}</label>"#, attr(&self.id), encode_text(&self.label))?;
        match &self.kind {
            ControlKind::Number { name, step, value } => write!(
                out,
                r#"<input type="number" step="{}" id="{}" name="{}" value="{}">"#,
                attr(step),
                attr(&self.id),
                attr(name),
                attr(value)
            ),
            ControlKind::Checkbox { name, checked } => {
                writeln!(out, r#"<input type="hidden" name="{}" value="false">"#, attr(name))?;
                write!(
                    out,
                    r#"<input type="checkbox" id="{}" name="{}" value="true"{}>"#,
                    attr(&self.id),
                    attr(name),
                    checked_attr(*checked)
                )
            }
            ControlKind::RadioGroup { name, choices } => {
                writeln!(out, "<div>")?;
                for choice in choices {
                    writeln!(
                        out,
                        r#"<input type="radio" id="{}" name="{}" value="{}"{}>"#,
                        attr(&choice.id),
                        attr(name),
                        attr(choice.value),
                        checked_attr(choice.checked)
                    )?;
                    writeln!(out, r#"<label for="{}">{}</label>"#, attr(&choice.id), encode_text(choice.label))?;
                }
                write!(out, "</div>")
            }
            ControlKind::Text { name, value } => write!(
                out,
                r#"<input type="text" id="{}" name="{}" value="{}">"#,
                attr(&self.id),
                attr(name),
                attr(value)
            ),
        }
    }
}

impl fmt::Display for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_html(f)
    }
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    encode_double_quoted_attribute(value)
}

fn checked_attr(checked: bool) -> &'static str {
    if checked { " checked" } else { "" }
}

/// Controls for every parameter of a set, in order.
pub fn controls<'a>(parameters: impl IntoIterator<Item = &'a TypedParameter>) -> Vec<FormControl> {
    parameters.into_iter().map(FormControl::for_parameter).collect()
}
