use crate::errors::{Error, ValidationError};
use crate::store::{GlobalId, Store};
use crate::types::GlobalType;
use crate::values::{VMVal, Val};

/// The runtime cell of one global variable.
#[derive(Debug)]
pub(crate) struct GlobalData {
    ty: GlobalType,
    value: VMVal,
}

impl GlobalData {
    pub(crate) fn new(ty: GlobalType, value: VMVal) -> Self {
        Self { ty, value }
    }

    pub(crate) fn ty(&self) -> GlobalType {
        self.ty
    }

    #[inline]
    pub(crate) fn get(&self) -> VMVal {
        self.value
    }

    #[inline]
    pub(crate) fn set(&mut self, value: VMVal) {
        self.value = value;
    }
}

/// A handle to a global variable that lives in a [`Store`].
#[derive(Debug, Clone, Copy)]
pub struct Global(pub(crate) GlobalId);

impl Global {
    pub fn ty(&self, store: &Store) -> GlobalType {
        store.globals[self.0].ty()
    }

    pub fn get(&self, store: &Store) -> Val {
        let data = &store.globals[self.0];
        Val::from_vmval(data.get(), data.ty().content)
    }

    /// Writes the global, honoring its declared mutability and type.
    pub fn set(&self, store: &mut Store, val: Val) -> crate::Result<()> {
        let data = &mut store.globals[self.0];
        if !data.ty().mutable {
            return Err(Error::Validation(ValidationError::GlobalImmutable));
        }
        if val.ty() != data.ty().content {
            return Err(Error::Validation(ValidationError::TypeMismatch {
                expected: data.ty().content.name(),
                found: val.ty().name(),
            }));
        }
        data.set(val.as_vmval());
        Ok(())
    }
}
