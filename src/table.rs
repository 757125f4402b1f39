use crate::func::Func;
use crate::store::{FuncId, Store, TableId};
use crate::traps::Trap;
use crate::types::TableType;
use alloc::vec;
use alloc::vec::Vec;

/// The runtime state of one table: sparse `funcref` slots. Reading an
/// unset slot through `call_indirect` traps.
#[derive(Debug)]
pub(crate) struct TableData {
    elements: Vec<Option<FuncId>>,
    ty: TableType,
}

impl TableData {
    pub(crate) fn new(ty: TableType) -> Self {
        Self {
            elements: vec![None; ty.limits.min as usize],
            ty,
        }
    }

    pub(crate) fn ty(&self) -> TableType {
        self.ty
    }

    pub(crate) fn size(&self) -> u32 {
        self.elements.len() as u32
    }

    pub(crate) fn get(&self, index: u32) -> Result<Option<FuncId>, Trap> {
        self.elements
            .get(index as usize)
            .copied()
            .ok_or(Trap::TableOutOfBounds)
    }

    pub(crate) fn set(&mut self, index: u32, value: Option<FuncId>) -> Result<(), Trap> {
        let slot = self
            .elements
            .get_mut(index as usize)
            .ok_or(Trap::TableOutOfBounds)?;
        *slot = value;
        Ok(())
    }

    /// Grows the table to hold at least `len` slots, subject to the
    /// declared maximum.
    pub(crate) fn grow_to(&mut self, len: u32) -> bool {
        if len <= self.size() {
            return true;
        }
        if self.ty.limits.max.is_some_and(|max| len > max) {
            return false;
        }
        self.elements.resize(len as usize, None);
        true
    }
}

/// A handle to a table that lives in a [`Store`].
#[derive(Debug, Clone, Copy)]
pub struct Table(pub(crate) TableId);

impl Table {
    pub fn size(&self, store: &Store) -> u32 {
        store.tables[self.0].size()
    }

    /// The function in `index`, `None` for an unset slot.
    pub fn get(&self, store: &Store, index: u32) -> Result<Option<Func>, Trap> {
        Ok(store.tables[self.0].get(index)?.map(Func))
    }
}
