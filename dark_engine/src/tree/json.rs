//! JSON form of a property tree.
//!
//! Each node is an object `{"type": .., "properties": {..}, "children": [..]}`;
//! empty property maps and child lists are omitted.

use serde_json::{Map, Number, Value};

use super::FormatError;
use super::node::Node;
use super::var::Var;

pub fn to_json_value(node: &Node) -> Value {
    let mut object = Map::new();
    object.insert("type".into(), Value::String(node.node_type()));
    let properties = node.properties();
    if !properties.is_empty() {
        let map: Map<String, Value> = properties.into_iter().map(|(id, v)| (id, var_to_json(&v))).collect();
        object.insert("properties".into(), Value::Object(map));
    }
    let children = node.children();
    if !children.is_empty() {
        object.insert("children".into(), Value::Array(children.iter().map(to_json_value).collect()));
    }
    Value::Object(object)
}

/// Pretty-printed JSON document for `root`.
///
/// # Errors
/// Returns [`FormatError::Json`] if serialization fails.
pub fn to_json_string(root: &Node) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&to_json_value(root))?)
}

/// Parse a JSON document into a detached tree.
///
/// # Errors
/// Returns an error if the text is not JSON or doesn't have the node shape.
pub fn from_json_str(text: &str) -> Result<Node, FormatError> {
    let value: Value = serde_json::from_str(text)?;
    from_json_value(&value)
}

/// Build a tree from an already parsed JSON value.
///
/// # Errors
/// Returns [`FormatError::Shape`] if a node object is missing its type or holds
/// values that can't be stored as properties.
pub fn from_json_value(value: &Value) -> Result<Node, FormatError> {
    let object = value
        .as_object()
        .ok_or_else(|| FormatError::Shape("expected a node object".into()))?;
    let node_type = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| FormatError::Shape("node object without a \"type\"".into()))?;
    let node = Node::new(node_type);

    if let Some(properties) = object.get("properties") {
        let properties = properties
            .as_object()
            .ok_or_else(|| FormatError::Shape(format!("properties of '{node_type}' must be an object")))?;
        for (id, value) in properties {
            node.set_property(id, json_to_var(value).ok_or_else(|| bad_value(node_type, id))?);
        }
    }
    if let Some(children) = object.get("children") {
        let children = children
            .as_array()
            .ok_or_else(|| FormatError::Shape(format!("children of '{node_type}' must be an array")))?;
        for child in children {
            node.append_child(&from_json_value(child)?);
        }
    }
    Ok(node)
}

fn bad_value(node_type: &str, id: &str) -> FormatError {
    FormatError::Shape(format!("property '{id}' of '{node_type}' is not a storable value"))
}

fn var_to_json(value: &Var) -> Value {
    match value {
        Var::Void => Value::Null,
        Var::Bool(b) => Value::Bool(*b),
        Var::Int(i) => Value::Number((*i).into()),
        Var::Double(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
        Var::String(s) => Value::String(s.clone()),
        Var::Array(items) => Value::Array(items.iter().map(var_to_json).collect()),
    }
}

fn json_to_var(value: &Value) -> Option<Var> {
    match value {
        Value::Null => Some(Var::Void),
        Value::Bool(b) => Some(Var::Bool(*b)),
        Value::Number(n) => n.as_i64().map(Var::Int).or_else(|| n.as_f64().map(Var::Double)),
        Value::String(s) => Some(Var::String(s.clone())),
        Value::Array(items) => items.iter().map(json_to_var).collect::<Option<Vec<_>>>().map(Var::Array),
        Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_and_doubles_stay_apart() {
        let node = Node::new("worldEntity");
        node.set_property("weight", Var::Double(80.0));
        node.set_property("level", Var::Int(3));
        node.set_property("unlockableIDs", Var::Array(vec![Var::Int(2), Var::Int(9)]));
        let text = to_json_string(&node).expect("serialize");
        let back = from_json_str(&text).expect("parse");
        assert_eq!(back.property("weight"), Some(Var::Double(80.0)));
        assert_eq!(back.property("level"), Some(Var::Int(3)));
        assert!(back.is_equivalent_to(&node));
    }

    #[test]
    fn property_order_survives() {
        let node = Node::new("thing");
        node.set_property("zeta", Var::Int(1));
        node.set_property("alpha", Var::Int(2));
        let back = from_json_str(&to_json_string(&node).expect("serialize")).expect("parse");
        assert_eq!(back.property_names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(from_json_str("[1, 2]").is_err());
        assert!(from_json_str(r#"{"properties": {}}"#).is_err());
        assert!(from_json_str(r#"{"type": "x", "properties": {"a": {"b": 1}}}"#).is_err());
        assert!(from_json_str("{not json").is_err());
    }
}
