//! # Value Tree
//!
//! Dynamically-typed value tree carried by the codec.
//!
//! Scalars are stored inline. Composite nodes ([`Sequence`] and [`Mapping`]) are
//! shared handles: cloning one clones the reference, not the contents, so a node
//! can appear at several places in a tree, or inside itself. Every composite has
//! a stable identity (its allocation) which [`Value::same_node`] and the
//! `ptr_eq` methods compare.
//!
//! ```rust
//! use absent_codec::{Mapping, Value};
//!
//! let user = Mapping::new();
//! user.insert("name", "ada");
//! user.insert("nickname", Value::Absent);
//! user.insert("self", user.clone()); // cycles are allowed
//!
//! assert_eq!(user.len(), 3);
//! ```

use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A node in the value tree.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer above `i64::MAX`. Smaller unsigned values are held as `Int`.
    UInt(u64),
    Float(f64),
    Text(Arc<str>),
    Bytes(Bytes),
    Sequence(Sequence),
    Mapping(Mapping),
    /// The field this value is assigned to should not exist. Distinct from `Null`.
    Absent,
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for sequences and mappings.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Identity comparison.
    ///
    /// Composites are the same node when they share an allocation. Scalars have
    /// no identity of their own and compare by value (bit pattern for floats).
    pub fn same_node(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a.ptr_eq(b),
            (Value::Mapping(a), Value::Mapping(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Identity token of a composite node, `None` for scalars.
    pub(crate) fn node_id(&self) -> Option<usize> {
        match self {
            Value::Sequence(seq) => Some(seq.id()),
            Value::Mapping(map) => Some(map.id()),
            _ => None,
        }
    }
}

/// Ordered list of values behind a shared handle.
#[derive(Clone, Default)]
pub struct Sequence(Arc<RwLock<Vec<Value>>>);

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(values)))
    }

    pub fn push(&self, value: impl Into<Value>) {
        let value = value.into();
        self.write().push(value);
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove every element. Breaks any cycle running through this node.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Snapshot of the elements. Composite elements stay shared.
    pub fn to_vec(&self) -> Vec<Value> {
        self.read().clone()
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Insertion-ordered map from text keys to values behind a shared handle.
///
/// Keys are unique: inserting an existing key replaces its value in place.
#[derive(Clone, Default)]
pub struct Mapping(Arc<RwLock<Vec<(String, Value)>>>);

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = Self::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    /// Build from entries whose keys are already known to be unique.
    pub(crate) fn from_unique_entries(entries: Vec<(String, Value)>) -> Self {
        Self(Arc::new(RwLock::new(entries)))
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let mut entries = self.write();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().iter().any(|(k, _)| k == key)
    }

    /// Remove `key`, keeping the relative order of the remaining entries.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut entries = self.write();
        let index = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.read().clone()
    }

    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<(String, Value)>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<(String, Value)>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Structural equality. A pair of nodes already under comparison is assumed
// equal, so cyclic graphs terminate. Contents are snapshotted before descending
// so no lock is held while recursing.
fn structural_eq(a: &Value, b: &Value, assumed: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Sequence(x), Value::Sequence(y)) => {
            if x.ptr_eq(y) || !assumed.insert((x.id(), y.id())) {
                return true;
            }
            let (left, right) = (x.to_vec(), y.to_vec());
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(l, r)| structural_eq(l, r, assumed))
        }
        (Value::Mapping(x), Value::Mapping(y)) => {
            if x.ptr_eq(y) || !assumed.insert((x.id(), y.id())) {
                return true;
            }
            let (left, right) = (x.entries(), y.entries());
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|((lk, lv), (rk, rv))| lk == rk && structural_eq(lv, rv, assumed))
        }
        (Value::Null, Value::Null) | (Value::Absent, Value::Absent) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::UInt(x), Value::UInt(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut HashSet::new())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        Value::Sequence(self.clone()) == Value::Sequence(other.clone())
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        Value::Mapping(self.clone()) == Value::Mapping(other.clone())
    }
}

/// Debug view that prints `<cycle>` when a node reappears on the current path.
struct DebugNode<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<usize>>,
}

impl DebugNode<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> DebugNode<'b> {
        DebugNode {
            value,
            path: self.path,
        }
    }
}

impl fmt::Debug for DebugNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.value.node_id() {
            if self.path.borrow().contains(&id) {
                return f.write_str("<cycle>");
            }
            self.path.borrow_mut().push(id);
            let result = match self.value {
                Value::Sequence(seq) => {
                    let items = seq.to_vec();
                    f.debug_list()
                        .entries(items.iter().map(|item| self.child(item)))
                        .finish()
                }
                Value::Mapping(map) => {
                    let entries = map.entries();
                    f.debug_map()
                        .entries(entries.iter().map(|(k, v)| (k, self.child(v))))
                        .finish()
                }
                _ => Ok(()),
            };
            self.path.borrow_mut().pop();
            return result;
        }

        match self.value {
            Value::Null => f.write_str("Null"),
            Value::Absent => f.write_str("Absent"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Value::Sequence(_) | Value::Mapping(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = RefCell::new(Vec::new());
        DebugNode { value: self, path: &path }.fmt(f)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Value::Sequence(self.clone()).fmt(f)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Value::Mapping(self.clone()).fmt(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::UInt(n),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Sequence(Sequence::from_values(values))
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}
