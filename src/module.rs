use crate::decode::{DecodedModule, Import, ModuleDecoder};
use crate::indices::{EntityIndex, FuncIndex};
use crate::types::FuncType;
use crate::validate::validate;
use alloc::sync::Arc;

/// A decoded, validated WebAssembly module, ready to instantiate.
///
/// Modules are cheaply cloneable handles; the underlying model is immutable
/// and shared by every instance.
#[derive(Debug, Clone)]
pub struct Module(Arc<ModuleInner>);

#[derive(Debug)]
struct ModuleInner {
    decoded: DecodedModule,
}

impl Module {
    /// Decodes and validates a module from the text format.
    pub fn from_wat(wat: &str) -> crate::Result<Self> {
        let bytes = wat::parse_str(wat)?;
        Self::from_bytes(&bytes)
    }

    /// Decodes and validates a module from the binary format. This is the
    /// safe entry point.
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let decoded = ModuleDecoder::new().decode(bytes)?;
        validate(&decoded)?;
        Ok(Self(Arc::new(ModuleInner { decoded })))
    }

    /// Decodes a module without validating it.
    ///
    /// Instantiating or running an invalid module produced this way may
    /// misbehave arbitrarily short of memory unsafety (traps, panics,
    /// wrong results). Only use this for inputs validated elsewhere.
    pub fn from_bytes_unchecked(bytes: &[u8]) -> crate::Result<Self> {
        let decoded = ModuleDecoder::new().decode(bytes)?;
        Ok(Self(Arc::new(ModuleInner { decoded })))
    }

    pub fn imports(&self) -> impl ExactSizeIterator<Item = &Import> {
        self.0.decoded.imports.iter()
    }

    pub fn exports(&self) -> impl ExactSizeIterator<Item = (&str, EntityIndex)> + '_ {
        self.0
            .decoded
            .exports
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
    }

    pub(crate) fn get_export(&self, name: &str) -> Option<EntityIndex> {
        self.0.decoded.exports.get(name).copied()
    }

    pub(crate) fn decoded(&self) -> &DecodedModule {
        &self.0.decoded
    }

    /// Materializes the owned signature of the function at `index`.
    pub(crate) fn func_type_of(&self, index: FuncIndex) -> FuncType {
        let decoded = self.decoded();
        let sig = decoded.func_type(index);
        FuncType::new(
            decoded.params(sig).iter().copied(),
            decoded.results(sig).iter().copied(),
        )
    }
}
