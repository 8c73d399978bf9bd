//! Accumulates the decoded value tree while the format decoder walks the stream.
//!
//! The builder owns the container stack (`§3`'s "stack of container frames"): as the
//! format decoder completes each scalar or nested container, it hands the result to
//! [`Builder::complete_value`], which attaches it to the innermost open frame and
//! cascades frame completions upward — a child container finishing can itself finish
//! its parent, grandparent, and so on, in one call, the way `[[[1]]]`'s innermost `1`
//! closes three frames in a row.

use alloc::vec::Vec;

use crate::config::Config;
use crate::error::HookError;
use crate::value::{Array, Value};

enum Frame {
    Array {
        items: Vec<Value>,
        remaining: u32,
        use_list: bool,
    },
    /// Awaiting the next pair's key.
    MapKey {
        pairs: Vec<(Value, Value)>,
        remaining: u32,
    },
    /// Key decoded, awaiting its value.
    MapValue {
        pairs: Vec<(Value, Value)>,
        remaining: u32,
        key: Value,
    },
}

/// The container stack plus the logic to fold completed children into their parent.
#[derive(Default)]
pub struct Builder {
    stack: Vec<Frame>,
}

impl Builder {
    pub fn new() -> Self {
        Builder { stack: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Resets the builder to a fresh, empty state (used after `ERROR` leaves the
    /// decoder unspecified, or defensively before reuse).
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// Begins an array frame of declared length `len`, honoring `use_list`.
    ///
    /// An empty array is finalized immediately and threaded straight into the parent
    /// frame (or returned as the root) rather than ever entering the stack.
    pub fn begin_array(&mut self, len: u32, config: &mut Config) -> Result<Option<Value>, HookError> {
        if len == 0 {
            let value = finalize_array(Vec::new(), config.use_list, config)?;
            return self.complete_value(value, config);
        }
        self.stack.push(Frame::Array { items: Vec::new(), remaining: len, use_list: config.use_list });
        Ok(None)
    }

    /// Begins a map frame of declared pair count `len`.
    pub fn begin_map(&mut self, len: u32, config: &mut Config) -> Result<Option<Value>, HookError> {
        if len == 0 {
            let value = finalize_map(Vec::new(), config)?;
            return self.complete_value(value, config);
        }
        self.stack.push(Frame::MapKey { pairs: Vec::new(), remaining: len });
        Ok(None)
    }

    /// Attaches a fully-decoded value as the next child of the innermost open frame,
    /// cascading completions upward. Returns `Some(root)` once there is no longer any
    /// open frame to attach to — i.e. the outermost value is complete.
    pub fn complete_value(&mut self, mut value: Value, config: &mut Config) -> Result<Option<Value>, HookError> {
        loop {
            match self.stack.pop() {
                None => return Ok(Some(value)),
                Some(Frame::Array { mut items, remaining, use_list }) => {
                    items.push(value);
                    let remaining = remaining - 1;
                    if remaining == 0 {
                        value = finalize_array(items, use_list, config)?;
                        // cascades: treat the just-closed array as the next child
                    } else {
                        self.stack.push(Frame::Array { items, remaining, use_list });
                        return Ok(None);
                    }
                }
                Some(Frame::MapKey { pairs, remaining }) => {
                    self.stack.push(Frame::MapValue { pairs, remaining, key: value });
                    return Ok(None);
                }
                Some(Frame::MapValue { mut pairs, remaining, key }) => {
                    pairs.push((key, value));
                    let remaining = remaining - 1;
                    if remaining == 0 {
                        value = finalize_map(pairs, config)?;
                    } else {
                        self.stack.push(Frame::MapKey { pairs, remaining });
                        return Ok(None);
                    }
                }
            }
        }
    }
}

fn finalize_array(items: Vec<Value>, use_list: bool, config: &mut Config) -> Result<Value, HookError> {
    if let Some(hook) = config.list_hook.as_mut() {
        hook(items)
    } else if use_list {
        Ok(Value::Array(Array::List(items)))
    } else {
        Ok(Value::Array(Array::Tuple(items.into_boxed_slice())))
    }
}

fn finalize_map(pairs: Vec<(Value, Value)>, config: &mut Config) -> Result<Value, HookError> {
    if let Some(hook) = config.object_pairs_hook.as_mut() {
        return hook(pairs);
    }
    let deduped = dedupe_last_wins(pairs);
    if let Some(hook) = config.object_hook.as_mut() {
        hook(deduped)
    } else {
        Ok(Value::Map(deduped))
    }
}

/// Resolves duplicate keys last-wins, keeping each key's first-seen position —
/// matching common dynamic-language dict-literal semantics (see DESIGN.md).
fn dedupe_last_wins(pairs: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    let mut deduped: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        if let Some(existing) = deduped.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            deduped.push((key, value));
        }
    }
    deduped
}
