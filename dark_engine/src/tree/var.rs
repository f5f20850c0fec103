//! The primitive value stored in property tree nodes.

use std::fmt;

/// A dynamically typed property value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Var {
    #[default]
    Void,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Var>),
}

/// The primitive shape of a [`Var`], used by the schema to decode and check values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Bool,
    Int,
    Double,
    String,
    IntArray,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Bool => write!(f, "bool"),
            VarKind::Int => write!(f, "int"),
            VarKind::Double => write!(f, "double"),
            VarKind::String => write!(f, "string"),
            VarKind::IntArray => write!(f, "int array"),
        }
    }
}

impl Var {
    pub fn is_void(&self) -> bool {
        matches!(self, Var::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Var::Bool(b) => Some(*b),
            Var::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Var::Int(i) => Some(*i),
            Var::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Var::Double(d) => Some(*d),
            Var::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Var::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Var]> {
        match self {
            Var::Array(items) => Some(items),
            _ => None,
        }
    }

    /// True if this value has the given primitive shape.
    pub fn is_kind(&self, kind: VarKind) -> bool {
        match kind {
            VarKind::Bool => matches!(self, Var::Bool(_)),
            VarKind::Int => matches!(self, Var::Int(_)),
            VarKind::Double => matches!(self, Var::Double(_) | Var::Int(_)),
            VarKind::String => matches!(self, Var::String(_)),
            VarKind::IntArray => self
                .as_array()
                .is_some_and(|items| items.iter().all(|v| matches!(v, Var::Int(_)))),
        }
    }

    /// Text form used for XML attributes.
    pub fn to_attribute(&self) -> String {
        match self {
            Var::Void => String::new(),
            Var::Bool(b) => b.to_string(),
            Var::Int(i) => i.to_string(),
            Var::Double(d) => {
                // keep a decimal point so the value reads back as a double without a schema
                if d.fract() == 0.0 && d.is_finite() {
                    format!("{d:.1}")
                } else {
                    d.to_string()
                }
            },
            Var::String(s) => s.clone(),
            Var::Array(items) => items.iter().map(Var::to_attribute).collect::<Vec<_>>().join(","),
        }
    }

    /// Parse attribute text written by [`Var::to_attribute`] back into the given shape.
    pub fn from_attribute(text: &str, kind: VarKind) -> Option<Var> {
        match kind {
            VarKind::Bool => match text {
                "true" | "1" => Some(Var::Bool(true)),
                "false" | "0" => Some(Var::Bool(false)),
                _ => None,
            },
            VarKind::Int => text.trim().parse().ok().map(Var::Int),
            VarKind::Double => text.trim().parse().ok().map(Var::Double),
            VarKind::String => Some(Var::String(text.to_string())),
            VarKind::IntArray => {
                if text.trim().is_empty() {
                    return Some(Var::Array(Vec::new()));
                }
                text.split(',')
                    .map(|part| part.trim().parse::<i64>().ok().map(Var::Int))
                    .collect::<Option<Vec<_>>>()
                    .map(Var::Array)
            },
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Void => write!(f, "<void>"),
            Var::Array(items) => {
                let inner: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", inner.join(", "))
            },
            other => write!(f, "{}", other.to_attribute()),
        }
    }
}

impl From<bool> for Var {
    fn from(value: bool) -> Self {
        Var::Bool(value)
    }
}

impl From<i64> for Var {
    fn from(value: i64) -> Self {
        Var::Int(value)
    }
}

impl From<i32> for Var {
    fn from(value: i32) -> Self {
        Var::Int(i64::from(value))
    }
}

impl From<f64> for Var {
    fn from(value: f64) -> Self {
        Var::Double(value)
    }
}

impl From<&str> for Var {
    fn from(value: &str) -> Self {
        Var::String(value.to_string())
    }
}

impl From<String> for Var {
    fn from(value: String) -> Self {
        Var::String(value)
    }
}
