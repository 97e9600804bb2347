//! # Absent Stripping
//!
//! Removes every mapping entry whose value is [`Value::Absent`] from a value tree.
//!
//! The binary formats have no way to say "this field does not exist", only
//! `nil`, so outgoing values are stripped before they are serialized.
//!
//! ## Guarantees
//! - **Copy-on-write**: a composite is rebuilt only when something below it
//!   changed; otherwise the original handle is returned, so unchanged subtrees
//!   keep their identity.
//! - **Cycle safe**: each call tracks the composites it has entered. A node seen
//!   again is returned as-is, without descending into it.
//! - **Depth bounded**: nesting beyond [`MAX_DEPTH`] fails the whole call with
//!   [`CodecError::DepthExceeded`]. No partial result is returned.
//!
//! Sequence slots are never removed: an `Absent` element stays where it is.
//!
//! ```rust
//! use absent_codec::{strip, Mapping, Value};
//!
//! let map = Mapping::from_entries([("a", Value::from(1)), ("b", Value::Absent)]);
//! let stripped = strip(&Value::from(map))?;
//!
//! let stripped = stripped.as_mapping().unwrap();
//! assert!(stripped.contains_key("a"));
//! assert!(!stripped.contains_key("b"));
//! # Ok::<(), absent_codec::CodecError>(())
//! ```

use crate::core::value::{Mapping, Sequence, Value};
use crate::error::{CodecError, Result};
use std::collections::HashSet;

/// Deepest composite nesting accepted. The outermost composite is level 1.
pub const MAX_DEPTH: usize = 100;

/// Strip absent mapping entries from `value`.
///
/// # Errors
/// Returns [`CodecError::DepthExceeded`] if composites nest deeper than [`MAX_DEPTH`].
pub fn strip(value: &Value) -> Result<Value> {
    Stripper::default().visit(value, 1)
}

/// Per-call traversal state.
#[derive(Default)]
struct Stripper {
    visited: HashSet<usize>,
}

impl Stripper {
    fn visit(&mut self, value: &Value, depth: usize) -> Result<Value> {
        let id = match value.node_id() {
            Some(id) => id,
            None => return Ok(value.clone()),
        };

        if depth > MAX_DEPTH {
            return Err(CodecError::DepthExceeded { limit: MAX_DEPTH });
        }

        // Already entered during this call: cycle or shared subtree.
        if !self.visited.insert(id) {
            return Ok(value.clone());
        }

        match value {
            Value::Sequence(seq) => self.strip_sequence(seq, depth),
            Value::Mapping(map) => self.strip_mapping(map, depth),
            _ => Ok(value.clone()),
        }
    }

    fn strip_sequence(&mut self, seq: &Sequence, depth: usize) -> Result<Value> {
        let items = seq.read();
        let mut rebuilt: Option<Vec<Value>> = None;

        for (index, item) in items.iter().enumerate() {
            let stripped = self.visit(item, depth + 1)?;
            if let Some(out) = rebuilt.as_mut() {
                out.push(stripped);
            } else if !stripped.same_node(item) {
                let mut out = Vec::with_capacity(items.len());
                out.extend_from_slice(&items[..index]);
                out.push(stripped);
                rebuilt = Some(out);
            }
        }

        Ok(match rebuilt {
            Some(out) => Value::Sequence(Sequence::from_values(out)),
            None => Value::Sequence(seq.clone()),
        })
    }

    fn strip_mapping(&mut self, map: &Mapping, depth: usize) -> Result<Value> {
        let entries = map.read();
        let mut rebuilt: Option<Vec<(String, Value)>> = None;

        for (index, (key, child)) in entries.iter().enumerate() {
            if child.is_absent() {
                if rebuilt.is_none() {
                    rebuilt = Some(entries[..index].to_vec());
                }
                continue;
            }

            let stripped = self.visit(child, depth + 1)?;
            if let Some(out) = rebuilt.as_mut() {
                out.push((key.clone(), stripped));
            } else if !stripped.same_node(child) {
                let mut out = Vec::with_capacity(entries.len());
                out.extend_from_slice(&entries[..index]);
                out.push((key.clone(), stripped));
                rebuilt = Some(out);
            }
        }

        Ok(match rebuilt {
            Some(out) => Value::Mapping(Mapping::from_unique_entries(out)),
            None => Value::Mapping(map.clone()),
        })
    }
}
