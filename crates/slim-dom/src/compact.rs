//! Compact positional encoding
//!
//! Trees serialise to nested JSON sequences whose shape is read from the
//! values sitting in fixed slots rather than from a type field:
//!
//! | Shape                 | Encoding                                 |
//! |-----------------------|------------------------------------------|
//! | Text                  | `"content"`                              |
//! | Element               | `[tag, {attrs}?, [children]?]`           |
//! | Comment               | `[8, data]`                              |
//! | ProcessingInstruction | `[7, target, data]`                      |
//! | Document              | `[9, mode, [children]]`                  |
//! | DocumentType          | `[10, name, public_id, system_id]`       |
//! | DocumentFragment      | `[[children]]`                           |
//!
//! Sentinels are DOM node-type numbers, so they can never collide with a
//! tag name (always a string).

use std::cmp::Ordering;

use serde_json::{Map, Value, json};

use crate::{Attr, AttrMap, DomError, DomTree, NodeData, NodeId, Shape, children};

pub const PROCESSING_INSTRUCTION_TAG: u64 = 7;
pub const COMMENT_TAG: u64 = 8;
pub const DOCUMENT_TAG: u64 = 9;
pub const DOCUMENT_TYPE_TAG: u64 = 10;

/// Compact decoding error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompactError {
    #[error("Malformed compact node at {path}: {reason}")]
    Malformed { path: String, reason: &'static str },
}

fn malformed(path: &str, reason: &'static str) -> CompactError {
    CompactError::Malformed {
        path: path.to_owned(),
        reason,
    }
}

/// Work out which shape a compact value encodes
///
/// Returns `None` for values that encode no node at all.
pub fn classify(value: &Value) -> Option<Shape> {
    if let Some(Value::Array(_)) = value.as_array().and_then(|slots| slots.first()) {
        return Some(Shape::DocumentFragment);
    }

    match value {
        Value::String(_) => Some(Shape::Text),
        Value::Array(slots) => match slots.first()? {
            Value::Number(tag) => match tag.as_u64()? {
                COMMENT_TAG => Some(Shape::Comment),
                PROCESSING_INSTRUCTION_TAG => Some(Shape::ProcessingInstruction),
                DOCUMENT_TAG => Some(Shape::Document),
                DOCUMENT_TYPE_TAG => Some(Shape::DocumentType),
                _ => None,
            },
            Value::String(tag) if !tag.is_empty() => Some(Shape::Element),
            _ => None,
        },
        _ => None,
    }
}

/// Slot holding the child list, if the value has one
///
/// Fragments keep their children in slot 0. Elements and documents use the
/// first array found at slot 2, then slot 1.
pub fn child_slot(value: &Value) -> Option<usize> {
    let slots = value.as_array()?;
    match classify(value)? {
        Shape::DocumentFragment => Some(0),
        Shape::Element | Shape::Document => [2, 1]
            .into_iter()
            .find(|&index| slots.get(index).is_some_and(Value::is_array)),
        _ => None,
    }
}

/// Slot holding an element's attribute map, if present
///
/// The first non-null, non-array value at slot 1, then slot 2.
pub fn attr_slot(value: &Value) -> Option<usize> {
    let slots = value.as_array()?;
    if classify(value)? != Shape::Element {
        return None;
    }
    [1, 2].into_iter().find(|&index| {
        slots
            .get(index)
            .is_some_and(|slot| !slot.is_null() && !slot.is_array())
    })
}

/// Encode the subtree under `root`
pub fn to_compact(tree: &DomTree, root: NodeId) -> Result<Value, DomError> {
    let value = match &tree.node(root)?.data {
        NodeData::Text(text) => Value::String(text.clone()),
        NodeData::Comment(data) => json!([COMMENT_TAG, data]),
        NodeData::ProcessingInstruction { target, data } => {
            json!([PROCESSING_INSTRUCTION_TAG, target, data])
        }
        NodeData::DocumentType {
            name,
            public_id,
            system_id,
        } => json!([DOCUMENT_TYPE_TAG, name, public_id, system_id]),
        NodeData::Document { mode, children } => Value::Array(vec![
            Value::from(DOCUMENT_TAG),
            Value::String(mode.clone()),
            encode_children(tree, children)?,
        ]),
        NodeData::DocumentFragment { children } => {
            Value::Array(vec![encode_children(tree, children)?])
        }
        NodeData::Element {
            name,
            attrs,
            children,
        } => {
            let mut slots = vec![Value::String(name.clone())];
            if let Some(attrs) = attrs {
                let object: Map<String, Value> = attrs
                    .iter()
                    .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
                    .collect();
                slots.push(Value::Object(object));
            }
            if let Some(children) = children {
                slots.push(encode_children(tree, children)?);
            }
            Value::Array(slots)
        }
    };
    Ok(value)
}

fn encode_children(tree: &DomTree, children: &[NodeId]) -> Result<Value, DomError> {
    children
        .iter()
        .map(|&child| to_compact(tree, child))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Decode a compact value into a fresh arena, returning it with the root id
pub fn from_compact(value: &Value) -> Result<(DomTree, NodeId), CompactError> {
    let mut tree = DomTree::new();
    let root = decode(&mut tree, value, "$")?;
    Ok((tree, root))
}

fn decode(tree: &mut DomTree, value: &Value, path: &str) -> Result<NodeId, CompactError> {
    let shape = classify(value).ok_or_else(|| malformed(path, "not a node"))?;
    let slots = value.as_array().map(Vec::as_slice).unwrap_or(&[]);

    let (data, child_index) = match shape {
        Shape::Text => (NodeData::Text(value.as_str().unwrap_or_default().to_owned()), None),
        Shape::Comment => {
            expect_width(slots, 2, path)?;
            (NodeData::Comment(string_at(slots, 1, path)?), None)
        }
        Shape::ProcessingInstruction => {
            expect_width(slots, 3, path)?;
            let data = NodeData::ProcessingInstruction {
                target: string_at(slots, 1, path)?,
                data: string_at(slots, 2, path)?,
            };
            (data, None)
        }
        Shape::DocumentType => {
            expect_width(slots, 4, path)?;
            let data = NodeData::DocumentType {
                name: string_at(slots, 1, path)?,
                public_id: string_at(slots, 2, path)?,
                system_id: string_at(slots, 3, path)?,
            };
            (data, None)
        }
        Shape::Document => {
            expect_width(slots, 3, path)?;
            let mode = string_at(slots, 1, path)?;
            if !slots[2].is_array() {
                return Err(malformed(path, "document has no child list"));
            }
            let data = NodeData::Document {
                mode,
                children: Vec::new(),
            };
            (data, Some(2))
        }
        Shape::DocumentFragment => {
            expect_width(slots, 1, path)?;
            (NodeData::fragment(), Some(0))
        }
        Shape::Element => {
            let (attr_index, child_index) = element_slots(slots, path)?;
            let data = NodeData::Element {
                name: string_at(slots, 0, path)?,
                attrs: attr_index
                    .map(|index| decode_attrs(&slots[index], path))
                    .transpose()?,
                children: None,
            };
            (data, child_index)
        }
    };
    let id = tree.insert(data);

    if let Some(index) = child_index {
        let items = slots[index].as_array().map(Vec::as_slice).unwrap_or(&[]);
        let mut child_ids = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let child = decode(tree, item, &format!("{path}[{index}][{position}]"))?;
            if let Some(node) = tree.get_mut(child) {
                node.parent = Some(id);
            }
            child_ids.push(child);
        }
        if let Some(node) = tree.get_mut(id) {
            children::set_child_list(&mut node.data, child_ids);
        }
    }

    Ok(id)
}

fn expect_width(slots: &[Value], width: usize, path: &str) -> Result<(), CompactError> {
    match slots.len().cmp(&width) {
        Ordering::Greater => Err(malformed(path, "unexpected trailing slots")),
        Ordering::Less => Err(malformed(path, "missing slots")),
        Ordering::Equal => Ok(()),
    }
}

/// Attribute and child slot indices of an element
///
/// After the tag come at most an attribute map (or `null` in its place)
/// and then at most one child list.
fn element_slots(slots: &[Value], path: &str) -> Result<(Option<usize>, Option<usize>), CompactError> {
    match slots {
        [_] | [_, Value::Null] => Ok((None, None)),
        [_, Value::Object(_)] => Ok((Some(1), None)),
        [_, Value::Array(_)] => Ok((None, Some(1))),
        [_, Value::Null, Value::Array(_)] => Ok((None, Some(2))),
        [_, Value::Object(_), Value::Array(_)] => Ok((Some(1), Some(2))),
        [_, Value::Array(_), _] => Err(malformed(path, "child list is not the last slot")),
        [_, Value::Object(_) | Value::Null, _] => Err(malformed(path, "child list is not a sequence")),
        [_, _] | [_, _, _] => Err(malformed(path, "attribute slot is not a map")),
        _ => Err(malformed(path, "unexpected trailing slots")),
    }
}

fn string_at(slots: &[Value], index: usize, path: &str) -> Result<String, CompactError> {
    slots
        .get(index)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| malformed(path, "expected a string slot"))
}

fn decode_attrs(value: &Value, path: &str) -> Result<AttrMap, CompactError> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(path, "attribute slot is not a map"))?;
    object
        .iter()
        .map(|(name, value)| {
            value
                .as_str()
                .map(|value| Attr::new(name.as_str(), value))
                .ok_or_else(|| malformed(path, "attribute value is not a string"))
        })
        .collect()
}
