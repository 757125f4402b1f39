use crate::enum_accessors;
use crate::types::ValType;
use core::fmt;

/// A value that a WebAssembly module can consume or produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Val {
    /// A 32-bit integer.
    I32(i32),
    /// A 64-bit integer.
    I64(i64),
    /// A 32-bit float.
    ///
    /// Note that the raw bits of the float are stored here, and you can use
    /// `f32::from_bits` to create an `f32` value.
    F32(u32),
    /// A 64-bit float.
    ///
    /// Note that the raw bits of the float are stored here, and you can use
    /// `f64::from_bits` to create an `f64` value.
    F64(u64),
    /// A 128-bit number.
    V128(u128),
}

impl Val {
    pub fn ty(&self) -> ValType {
        match self {
            Val::I32(_) => ValType::I32,
            Val::I64(_) => ValType::I64,
            Val::F32(_) => ValType::F32,
            Val::F64(_) => ValType::F64,
            Val::V128(_) => ValType::V128,
        }
    }

    /// The all-zeroes value of `ty`.
    pub fn zero(ty: ValType) -> Val {
        match ty {
            ValType::I32 => Val::I32(0),
            ValType::I64 => Val::I64(0),
            ValType::F32 => Val::F32(0),
            ValType::F64 => Val::F64(0),
            ValType::V128 => Val::V128(0),
        }
    }

    pub(crate) fn as_vmval(&self) -> VMVal {
        match *self {
            Val::I32(v) => VMVal::i32(v),
            Val::I64(v) => VMVal::i64(v),
            Val::F32(bits) => VMVal::f32_bits(bits),
            Val::F64(bits) => VMVal::f64_bits(bits),
            Val::V128(v) => VMVal::v128(v),
        }
    }

    pub(crate) fn from_vmval(raw: VMVal, ty: ValType) -> Self {
        match ty {
            ValType::I32 => Val::I32(raw.get_i32()),
            ValType::I64 => Val::I64(raw.get_i64()),
            ValType::F32 => Val::F32(raw.get_f32_bits()),
            ValType::F64 => Val::F64(raw.get_f64_bits()),
            ValType::V128 => Val::V128(raw.get_v128()),
        }
    }

    enum_accessors! {
        e
        (I32(i32) is_i32 i32 unwrap_i32 *e)
        (I64(i64) is_i64 i64 unwrap_i64 *e)
        (F32(f32) is_f32 f32 unwrap_f32 f32::from_bits(*e))
        (F64(f64) is_f64 f64 unwrap_f64 f64::from_bits(*e))
        (V128(u128) is_v128 v128 unwrap_v128 *e)
    }
}

impl From<i32> for Val {
    #[inline]
    fn from(val: i32) -> Val {
        Val::I32(val)
    }
}

impl From<i64> for Val {
    #[inline]
    fn from(val: i64) -> Val {
        Val::I64(val)
    }
}

impl From<f32> for Val {
    #[inline]
    fn from(val: f32) -> Val {
        Val::F32(val.to_bits())
    }
}

impl From<f64> for Val {
    #[inline]
    fn from(val: f64) -> Val {
        Val::F64(val.to_bits())
    }
}

/// An untyped 16-byte stack slot.
///
/// The operand stack, locals and the host-call argument buffer all trade in
/// these; validation guarantees the bits are always reinterpreted at the
/// type they were written with.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct VMVal {
    bits: u128,
}

impl fmt::Debug for VMVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VMVal").field(&self.bits).finish()
    }
}

impl VMVal {
    #[inline]
    pub fn i32(v: i32) -> VMVal {
        VMVal {
            bits: u128::from(v as u32),
        }
    }

    #[inline]
    pub fn u32(v: u32) -> VMVal {
        VMVal {
            bits: u128::from(v),
        }
    }

    #[inline]
    pub fn i64(v: i64) -> VMVal {
        VMVal {
            bits: u128::from(v as u64),
        }
    }

    #[inline]
    pub fn u64(v: u64) -> VMVal {
        VMVal {
            bits: u128::from(v),
        }
    }

    #[inline]
    pub fn f32(v: f32) -> VMVal {
        Self::f32_bits(v.to_bits())
    }

    #[inline]
    pub fn f32_bits(bits: u32) -> VMVal {
        VMVal {
            bits: u128::from(bits),
        }
    }

    #[inline]
    pub fn f64(v: f64) -> VMVal {
        Self::f64_bits(v.to_bits())
    }

    #[inline]
    pub fn f64_bits(bits: u64) -> VMVal {
        VMVal {
            bits: u128::from(bits),
        }
    }

    #[inline]
    pub fn v128(v: u128) -> VMVal {
        VMVal { bits: v }
    }

    #[inline]
    pub fn get_i32(self) -> i32 {
        self.bits as u32 as i32
    }

    #[inline]
    pub fn get_u32(self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub fn get_i64(self) -> i64 {
        self.bits as u64 as i64
    }

    #[inline]
    pub fn get_u64(self) -> u64 {
        self.bits as u64
    }

    #[inline]
    pub fn get_f32(self) -> f32 {
        f32::from_bits(self.get_u32())
    }

    #[inline]
    pub fn get_f32_bits(self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub fn get_f64(self) -> f64 {
        f64::from_bits(self.get_u64())
    }

    #[inline]
    pub fn get_f64_bits(self) -> u64 {
        self.bits as u64
    }

    #[inline]
    pub fn get_v128(self) -> u128 {
        self.bits
    }
}
