//! The runtime variable store.
//!
//! One [`Workspace`] is created per execution, sized from the variable
//! table after parsing. Each slot holds a value of its declared group
//! plus the written flag the executor checks before any read.

use serde::{Deserialize, Serialize};

use crate::ids::WsvId;
use crate::value::Value;
use crate::variables::VariableTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    value: Value,
    written: bool,
}

/// Runtime storage for every declared variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    slots: Vec<Slot>,
}

impl Workspace {
    /// A fresh store: every slot holds its group's default value and is
    /// unwritten.
    pub fn new(table: &VariableTable) -> Self {
        let slots = table
            .iter()
            .map(|(_, record)| Slot {
                value: Value::default_for(record.group()),
                written: false,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn value(&self, id: WsvId) -> &Value {
        &self.slots[id.0].value
    }

    /// Replaces the slot's value. The caller keeps the group invariant:
    /// the new value's variant must match the slot's declared group.
    pub fn set(&mut self, id: WsvId, value: Value) {
        self.slots[id.0].value = value;
    }

    pub fn is_written(&self, id: WsvId) -> bool {
        self.slots[id.0].written
    }

    pub fn mark_written(&mut self, id: WsvId) {
        self.slots[id.0].written = true;
    }

    /// Restores the slot to its group default and resets the written
    /// flag. Used by the Delete method for transient slots.
    pub fn clear(&mut self, id: WsvId) {
        let slot = &mut self.slots[id.0];
        slot.value = Value::default_for(slot.value.group());
        slot.written = false;
    }
}
