//! Static opcode metadata: symbolic opcodes for the three encoding sets
//! (the one-byte main set, the `0xFC` saturating-truncation set and the
//! `0xFD` SIMD set), their names, immediate kinds and memory-access widths.

use crate::indices::{FuncIndex, GlobalIndex, TableIndex, TypeIndex};
use crate::types::{BlockType, Span};
use core::fmt;

/// The three opcode encoding sets of the binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpSet {
    /// One-byte opcodes.
    Main,
    /// `0xFC`-prefixed opcodes (nontrapping float-to-int).
    TruncSat,
    /// `0xFD`-prefixed opcodes (fixed-width SIMD), secondary byte LEB128.
    Simd,
}

impl OpSet {
    pub(crate) fn prefix(self) -> u8 {
        match self {
            OpSet::Main => 0x00,
            OpSet::TruncSat => 0xFC,
            OpSet::Simd => 0xFD,
        }
    }
}

/// The kind of immediate a given opcode carries in the binary encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImmKind {
    None,
    BlockType,
    Label,
    LabelTable,
    Func,
    CallIndirect,
    Local,
    Global,
    MemArg,
    MemArgLane,
    ZeroByte,
    I32,
    I64,
    F32,
    F64,
    V128,
    Lane,
    Shuffle,
}

macro_rules! for_each_opcode {
    ($mac:ident) => {
        $mac! {
            (Unreachable, Main, 0x00, "unreachable", None)
            (Nop, Main, 0x01, "nop", None)
            (Block, Main, 0x02, "block", BlockType)
            (Loop, Main, 0x03, "loop", BlockType)
            (If, Main, 0x04, "if", BlockType)
            (Else, Main, 0x05, "else", None)
            (End, Main, 0x0B, "end", None)
            (Br, Main, 0x0C, "br", Label)
            (BrIf, Main, 0x0D, "br_if", Label)
            (BrTable, Main, 0x0E, "br_table", LabelTable)
            (Return, Main, 0x0F, "return", None)
            (Call, Main, 0x10, "call", Func)
            (CallIndirect, Main, 0x11, "call_indirect", CallIndirect)
            (Drop, Main, 0x1A, "drop", None)
            (Select, Main, 0x1B, "select", None)
            (LocalGet, Main, 0x20, "local.get", Local)
            (LocalSet, Main, 0x21, "local.set", Local)
            (LocalTee, Main, 0x22, "local.tee", Local)
            (GlobalGet, Main, 0x23, "global.get", Global)
            (GlobalSet, Main, 0x24, "global.set", Global)
            (I32Load, Main, 0x28, "i32.load", MemArg)
            (I64Load, Main, 0x29, "i64.load", MemArg)
            (F32Load, Main, 0x2A, "f32.load", MemArg)
            (F64Load, Main, 0x2B, "f64.load", MemArg)
            (I32Load8S, Main, 0x2C, "i32.load8_s", MemArg)
            (I32Load8U, Main, 0x2D, "i32.load8_u", MemArg)
            (I32Load16S, Main, 0x2E, "i32.load16_s", MemArg)
            (I32Load16U, Main, 0x2F, "i32.load16_u", MemArg)
            (I64Load8S, Main, 0x30, "i64.load8_s", MemArg)
            (I64Load8U, Main, 0x31, "i64.load8_u", MemArg)
            (I64Load16S, Main, 0x32, "i64.load16_s", MemArg)
            (I64Load16U, Main, 0x33, "i64.load16_u", MemArg)
            (I64Load32S, Main, 0x34, "i64.load32_s", MemArg)
            (I64Load32U, Main, 0x35, "i64.load32_u", MemArg)
            (I32Store, Main, 0x36, "i32.store", MemArg)
            (I64Store, Main, 0x37, "i64.store", MemArg)
            (F32Store, Main, 0x38, "f32.store", MemArg)
            (F64Store, Main, 0x39, "f64.store", MemArg)
            (I32Store8, Main, 0x3A, "i32.store8", MemArg)
            (I32Store16, Main, 0x3B, "i32.store16", MemArg)
            (I64Store8, Main, 0x3C, "i64.store8", MemArg)
            (I64Store16, Main, 0x3D, "i64.store16", MemArg)
            (I64Store32, Main, 0x3E, "i64.store32", MemArg)
            (MemorySize, Main, 0x3F, "memory.size", ZeroByte)
            (MemoryGrow, Main, 0x40, "memory.grow", ZeroByte)
            (I32Const, Main, 0x41, "i32.const", I32)
            (I64Const, Main, 0x42, "i64.const", I64)
            (F32Const, Main, 0x43, "f32.const", F32)
            (F64Const, Main, 0x44, "f64.const", F64)
            (I32Eqz, Main, 0x45, "i32.eqz", None)
            (I32Eq, Main, 0x46, "i32.eq", None)
            (I32Ne, Main, 0x47, "i32.ne", None)
            (I32LtS, Main, 0x48, "i32.lt_s", None)
            (I32LtU, Main, 0x49, "i32.lt_u", None)
            (I32GtS, Main, 0x4A, "i32.gt_s", None)
            (I32GtU, Main, 0x4B, "i32.gt_u", None)
            (I32LeS, Main, 0x4C, "i32.le_s", None)
            (I32LeU, Main, 0x4D, "i32.le_u", None)
            (I32GeS, Main, 0x4E, "i32.ge_s", None)
            (I32GeU, Main, 0x4F, "i32.ge_u", None)
            (I64Eqz, Main, 0x50, "i64.eqz", None)
            (I64Eq, Main, 0x51, "i64.eq", None)
            (I64Ne, Main, 0x52, "i64.ne", None)
            (I64LtS, Main, 0x53, "i64.lt_s", None)
            (I64LtU, Main, 0x54, "i64.lt_u", None)
            (I64GtS, Main, 0x55, "i64.gt_s", None)
            (I64GtU, Main, 0x56, "i64.gt_u", None)
            (I64LeS, Main, 0x57, "i64.le_s", None)
            (I64LeU, Main, 0x58, "i64.le_u", None)
            (I64GeS, Main, 0x59, "i64.ge_s", None)
            (I64GeU, Main, 0x5A, "i64.ge_u", None)
            (F32Eq, Main, 0x5B, "f32.eq", None)
            (F32Ne, Main, 0x5C, "f32.ne", None)
            (F32Lt, Main, 0x5D, "f32.lt", None)
            (F32Gt, Main, 0x5E, "f32.gt", None)
            (F32Le, Main, 0x5F, "f32.le", None)
            (F32Ge, Main, 0x60, "f32.ge", None)
            (F64Eq, Main, 0x61, "f64.eq", None)
            (F64Ne, Main, 0x62, "f64.ne", None)
            (F64Lt, Main, 0x63, "f64.lt", None)
            (F64Gt, Main, 0x64, "f64.gt", None)
            (F64Le, Main, 0x65, "f64.le", None)
            (F64Ge, Main, 0x66, "f64.ge", None)
            (I32Clz, Main, 0x67, "i32.clz", None)
            (I32Ctz, Main, 0x68, "i32.ctz", None)
            (I32Popcnt, Main, 0x69, "i32.popcnt", None)
            (I32Add, Main, 0x6A, "i32.add", None)
            (I32Sub, Main, 0x6B, "i32.sub", None)
            (I32Mul, Main, 0x6C, "i32.mul", None)
            (I32DivS, Main, 0x6D, "i32.div_s", None)
            (I32DivU, Main, 0x6E, "i32.div_u", None)
            (I32RemS, Main, 0x6F, "i32.rem_s", None)
            (I32RemU, Main, 0x70, "i32.rem_u", None)
            (I32And, Main, 0x71, "i32.and", None)
            (I32Or, Main, 0x72, "i32.or", None)
            (I32Xor, Main, 0x73, "i32.xor", None)
            (I32Shl, Main, 0x74, "i32.shl", None)
            (I32ShrS, Main, 0x75, "i32.shr_s", None)
            (I32ShrU, Main, 0x76, "i32.shr_u", None)
            (I32Rotl, Main, 0x77, "i32.rotl", None)
            (I32Rotr, Main, 0x78, "i32.rotr", None)
            (I64Clz, Main, 0x79, "i64.clz", None)
            (I64Ctz, Main, 0x7A, "i64.ctz", None)
            (I64Popcnt, Main, 0x7B, "i64.popcnt", None)
            (I64Add, Main, 0x7C, "i64.add", None)
            (I64Sub, Main, 0x7D, "i64.sub", None)
            (I64Mul, Main, 0x7E, "i64.mul", None)
            (I64DivS, Main, 0x7F, "i64.div_s", None)
            (I64DivU, Main, 0x80, "i64.div_u", None)
            (I64RemS, Main, 0x81, "i64.rem_s", None)
            (I64RemU, Main, 0x82, "i64.rem_u", None)
            (I64And, Main, 0x83, "i64.and", None)
            (I64Or, Main, 0x84, "i64.or", None)
            (I64Xor, Main, 0x85, "i64.xor", None)
            (I64Shl, Main, 0x86, "i64.shl", None)
            (I64ShrS, Main, 0x87, "i64.shr_s", None)
            (I64ShrU, Main, 0x88, "i64.shr_u", None)
            (I64Rotl, Main, 0x89, "i64.rotl", None)
            (I64Rotr, Main, 0x8A, "i64.rotr", None)
            (F32Abs, Main, 0x8B, "f32.abs", None)
            (F32Neg, Main, 0x8C, "f32.neg", None)
            (F32Ceil, Main, 0x8D, "f32.ceil", None)
            (F32Floor, Main, 0x8E, "f32.floor", None)
            (F32Trunc, Main, 0x8F, "f32.trunc", None)
            (F32Nearest, Main, 0x90, "f32.nearest", None)
            (F32Sqrt, Main, 0x91, "f32.sqrt", None)
            (F32Add, Main, 0x92, "f32.add", None)
            (F32Sub, Main, 0x93, "f32.sub", None)
            (F32Mul, Main, 0x94, "f32.mul", None)
            (F32Div, Main, 0x95, "f32.div", None)
            (F32Min, Main, 0x96, "f32.min", None)
            (F32Max, Main, 0x97, "f32.max", None)
            (F32Copysign, Main, 0x98, "f32.copysign", None)
            (F64Abs, Main, 0x99, "f64.abs", None)
            (F64Neg, Main, 0x9A, "f64.neg", None)
            (F64Ceil, Main, 0x9B, "f64.ceil", None)
            (F64Floor, Main, 0x9C, "f64.floor", None)
            (F64Trunc, Main, 0x9D, "f64.trunc", None)
            (F64Nearest, Main, 0x9E, "f64.nearest", None)
            (F64Sqrt, Main, 0x9F, "f64.sqrt", None)
            (F64Add, Main, 0xA0, "f64.add", None)
            (F64Sub, Main, 0xA1, "f64.sub", None)
            (F64Mul, Main, 0xA2, "f64.mul", None)
            (F64Div, Main, 0xA3, "f64.div", None)
            (F64Min, Main, 0xA4, "f64.min", None)
            (F64Max, Main, 0xA5, "f64.max", None)
            (F64Copysign, Main, 0xA6, "f64.copysign", None)
            (I32WrapI64, Main, 0xA7, "i32.wrap_i64", None)
            (I32TruncF32S, Main, 0xA8, "i32.trunc_f32_s", None)
            (I32TruncF32U, Main, 0xA9, "i32.trunc_f32_u", None)
            (I32TruncF64S, Main, 0xAA, "i32.trunc_f64_s", None)
            (I32TruncF64U, Main, 0xAB, "i32.trunc_f64_u", None)
            (I64ExtendI32S, Main, 0xAC, "i64.extend_i32_s", None)
            (I64ExtendI32U, Main, 0xAD, "i64.extend_i32_u", None)
            (I64TruncF32S, Main, 0xAE, "i64.trunc_f32_s", None)
            (I64TruncF32U, Main, 0xAF, "i64.trunc_f32_u", None)
            (I64TruncF64S, Main, 0xB0, "i64.trunc_f64_s", None)
            (I64TruncF64U, Main, 0xB1, "i64.trunc_f64_u", None)
            (F32ConvertI32S, Main, 0xB2, "f32.convert_i32_s", None)
            (F32ConvertI32U, Main, 0xB3, "f32.convert_i32_u", None)
            (F32ConvertI64S, Main, 0xB4, "f32.convert_i64_s", None)
            (F32ConvertI64U, Main, 0xB5, "f32.convert_i64_u", None)
            (F32DemoteF64, Main, 0xB6, "f32.demote_f64", None)
            (F64ConvertI32S, Main, 0xB7, "f64.convert_i32_s", None)
            (F64ConvertI32U, Main, 0xB8, "f64.convert_i32_u", None)
            (F64ConvertI64S, Main, 0xB9, "f64.convert_i64_s", None)
            (F64ConvertI64U, Main, 0xBA, "f64.convert_i64_u", None)
            (F64PromoteF32, Main, 0xBB, "f64.promote_f32", None)
            (I32ReinterpretF32, Main, 0xBC, "i32.reinterpret_f32", None)
            (I64ReinterpretF64, Main, 0xBD, "i64.reinterpret_f64", None)
            (F32ReinterpretI32, Main, 0xBE, "f32.reinterpret_i32", None)
            (F64ReinterpretI64, Main, 0xBF, "f64.reinterpret_i64", None)
            (I32TruncSatF32S, TruncSat, 0x00, "i32.trunc_sat_f32_s", None)
            (I32TruncSatF32U, TruncSat, 0x01, "i32.trunc_sat_f32_u", None)
            (I32TruncSatF64S, TruncSat, 0x02, "i32.trunc_sat_f64_s", None)
            (I32TruncSatF64U, TruncSat, 0x03, "i32.trunc_sat_f64_u", None)
            (I64TruncSatF32S, TruncSat, 0x04, "i64.trunc_sat_f32_s", None)
            (I64TruncSatF32U, TruncSat, 0x05, "i64.trunc_sat_f32_u", None)
            (I64TruncSatF64S, TruncSat, 0x06, "i64.trunc_sat_f64_s", None)
            (I64TruncSatF64U, TruncSat, 0x07, "i64.trunc_sat_f64_u", None)
            (V128Load, Simd, 0x00, "v128.load", MemArg)
            (V128Load8x8S, Simd, 0x01, "v128.load8x8_s", MemArg)
            (V128Load8x8U, Simd, 0x02, "v128.load8x8_u", MemArg)
            (V128Load16x4S, Simd, 0x03, "v128.load16x4_s", MemArg)
            (V128Load16x4U, Simd, 0x04, "v128.load16x4_u", MemArg)
            (V128Load32x2S, Simd, 0x05, "v128.load32x2_s", MemArg)
            (V128Load32x2U, Simd, 0x06, "v128.load32x2_u", MemArg)
            (V128Load8Splat, Simd, 0x07, "v128.load8_splat", MemArg)
            (V128Load16Splat, Simd, 0x08, "v128.load16_splat", MemArg)
            (V128Load32Splat, Simd, 0x09, "v128.load32_splat", MemArg)
            (V128Load64Splat, Simd, 0x0A, "v128.load64_splat", MemArg)
            (V128Store, Simd, 0x0B, "v128.store", MemArg)
            (V128Const, Simd, 0x0C, "v128.const", V128)
            (I8x16Shuffle, Simd, 0x0D, "i8x16.shuffle", Shuffle)
            (I8x16Swizzle, Simd, 0x0E, "i8x16.swizzle", None)
            (I8x16Splat, Simd, 0x0F, "i8x16.splat", None)
            (I16x8Splat, Simd, 0x10, "i16x8.splat", None)
            (I32x4Splat, Simd, 0x11, "i32x4.splat", None)
            (I64x2Splat, Simd, 0x12, "i64x2.splat", None)
            (F32x4Splat, Simd, 0x13, "f32x4.splat", None)
            (F64x2Splat, Simd, 0x14, "f64x2.splat", None)
            (I8x16ExtractLaneS, Simd, 0x15, "i8x16.extract_lane_s", Lane)
            (I8x16ExtractLaneU, Simd, 0x16, "i8x16.extract_lane_u", Lane)
            (I8x16ReplaceLane, Simd, 0x17, "i8x16.replace_lane", Lane)
            (I16x8ExtractLaneS, Simd, 0x18, "i16x8.extract_lane_s", Lane)
            (I16x8ExtractLaneU, Simd, 0x19, "i16x8.extract_lane_u", Lane)
            (I16x8ReplaceLane, Simd, 0x1A, "i16x8.replace_lane", Lane)
            (I32x4ExtractLane, Simd, 0x1B, "i32x4.extract_lane", Lane)
            (I32x4ReplaceLane, Simd, 0x1C, "i32x4.replace_lane", Lane)
            (I64x2ExtractLane, Simd, 0x1D, "i64x2.extract_lane", Lane)
            (I64x2ReplaceLane, Simd, 0x1E, "i64x2.replace_lane", Lane)
            (F32x4ExtractLane, Simd, 0x1F, "f32x4.extract_lane", Lane)
            (F32x4ReplaceLane, Simd, 0x20, "f32x4.replace_lane", Lane)
            (F64x2ExtractLane, Simd, 0x21, "f64x2.extract_lane", Lane)
            (F64x2ReplaceLane, Simd, 0x22, "f64x2.replace_lane", Lane)
            (I8x16Eq, Simd, 0x23, "i8x16.eq", None)
            (I8x16Ne, Simd, 0x24, "i8x16.ne", None)
            (I8x16LtS, Simd, 0x25, "i8x16.lt_s", None)
            (I8x16LtU, Simd, 0x26, "i8x16.lt_u", None)
            (I8x16GtS, Simd, 0x27, "i8x16.gt_s", None)
            (I8x16GtU, Simd, 0x28, "i8x16.gt_u", None)
            (I8x16LeS, Simd, 0x29, "i8x16.le_s", None)
            (I8x16LeU, Simd, 0x2A, "i8x16.le_u", None)
            (I8x16GeS, Simd, 0x2B, "i8x16.ge_s", None)
            (I8x16GeU, Simd, 0x2C, "i8x16.ge_u", None)
            (I16x8Eq, Simd, 0x2D, "i16x8.eq", None)
            (I16x8Ne, Simd, 0x2E, "i16x8.ne", None)
            (I16x8LtS, Simd, 0x2F, "i16x8.lt_s", None)
            (I16x8LtU, Simd, 0x30, "i16x8.lt_u", None)
            (I16x8GtS, Simd, 0x31, "i16x8.gt_s", None)
            (I16x8GtU, Simd, 0x32, "i16x8.gt_u", None)
            (I16x8LeS, Simd, 0x33, "i16x8.le_s", None)
            (I16x8LeU, Simd, 0x34, "i16x8.le_u", None)
            (I16x8GeS, Simd, 0x35, "i16x8.ge_s", None)
            (I16x8GeU, Simd, 0x36, "i16x8.ge_u", None)
            (I32x4Eq, Simd, 0x37, "i32x4.eq", None)
            (I32x4Ne, Simd, 0x38, "i32x4.ne", None)
            (I32x4LtS, Simd, 0x39, "i32x4.lt_s", None)
            (I32x4LtU, Simd, 0x3A, "i32x4.lt_u", None)
            (I32x4GtS, Simd, 0x3B, "i32x4.gt_s", None)
            (I32x4GtU, Simd, 0x3C, "i32x4.gt_u", None)
            (I32x4LeS, Simd, 0x3D, "i32x4.le_s", None)
            (I32x4LeU, Simd, 0x3E, "i32x4.le_u", None)
            (I32x4GeS, Simd, 0x3F, "i32x4.ge_s", None)
            (I32x4GeU, Simd, 0x40, "i32x4.ge_u", None)
            (F32x4Eq, Simd, 0x41, "f32x4.eq", None)
            (F32x4Ne, Simd, 0x42, "f32x4.ne", None)
            (F32x4Lt, Simd, 0x43, "f32x4.lt", None)
            (F32x4Gt, Simd, 0x44, "f32x4.gt", None)
            (F32x4Le, Simd, 0x45, "f32x4.le", None)
            (F32x4Ge, Simd, 0x46, "f32x4.ge", None)
            (F64x2Eq, Simd, 0x47, "f64x2.eq", None)
            (F64x2Ne, Simd, 0x48, "f64x2.ne", None)
            (F64x2Lt, Simd, 0x49, "f64x2.lt", None)
            (F64x2Gt, Simd, 0x4A, "f64x2.gt", None)
            (F64x2Le, Simd, 0x4B, "f64x2.le", None)
            (F64x2Ge, Simd, 0x4C, "f64x2.ge", None)
            (V128Not, Simd, 0x4D, "v128.not", None)
            (V128And, Simd, 0x4E, "v128.and", None)
            (V128Andnot, Simd, 0x4F, "v128.andnot", None)
            (V128Or, Simd, 0x50, "v128.or", None)
            (V128Xor, Simd, 0x51, "v128.xor", None)
            (V128Bitselect, Simd, 0x52, "v128.bitselect", None)
            (V128AnyTrue, Simd, 0x53, "v128.any_true", None)
            (V128Load8Lane, Simd, 0x54, "v128.load8_lane", MemArgLane)
            (V128Load16Lane, Simd, 0x55, "v128.load16_lane", MemArgLane)
            (V128Load32Lane, Simd, 0x56, "v128.load32_lane", MemArgLane)
            (V128Load64Lane, Simd, 0x57, "v128.load64_lane", MemArgLane)
            (V128Store8Lane, Simd, 0x58, "v128.store8_lane", MemArgLane)
            (V128Store16Lane, Simd, 0x59, "v128.store16_lane", MemArgLane)
            (V128Store32Lane, Simd, 0x5A, "v128.store32_lane", MemArgLane)
            (V128Store64Lane, Simd, 0x5B, "v128.store64_lane", MemArgLane)
            (V128Load32Zero, Simd, 0x5C, "v128.load32_zero", MemArg)
            (V128Load64Zero, Simd, 0x5D, "v128.load64_zero", MemArg)
            (F32x4DemoteF64x2Zero, Simd, 0x5E, "f32x4.demote_f64x2_zero", None)
            (F64x2PromoteLowF32x4, Simd, 0x5F, "f64x2.promote_low_f32x4", None)
            (I8x16Abs, Simd, 0x60, "i8x16.abs", None)
            (I8x16Neg, Simd, 0x61, "i8x16.neg", None)
            (I8x16Popcnt, Simd, 0x62, "i8x16.popcnt", None)
            (I8x16AllTrue, Simd, 0x63, "i8x16.all_true", None)
            (I8x16Bitmask, Simd, 0x64, "i8x16.bitmask", None)
            (I8x16NarrowI16x8S, Simd, 0x65, "i8x16.narrow_i16x8_s", None)
            (I8x16NarrowI16x8U, Simd, 0x66, "i8x16.narrow_i16x8_u", None)
            (F32x4Ceil, Simd, 0x67, "f32x4.ceil", None)
            (F32x4Floor, Simd, 0x68, "f32x4.floor", None)
            (F32x4Trunc, Simd, 0x69, "f32x4.trunc", None)
            (F32x4Nearest, Simd, 0x6A, "f32x4.nearest", None)
            (I8x16Shl, Simd, 0x6B, "i8x16.shl", None)
            (I8x16ShrS, Simd, 0x6C, "i8x16.shr_s", None)
            (I8x16ShrU, Simd, 0x6D, "i8x16.shr_u", None)
            (I8x16Add, Simd, 0x6E, "i8x16.add", None)
            (I8x16AddSatS, Simd, 0x6F, "i8x16.add_sat_s", None)
            (I8x16AddSatU, Simd, 0x70, "i8x16.add_sat_u", None)
            (I8x16Sub, Simd, 0x71, "i8x16.sub", None)
            (I8x16SubSatS, Simd, 0x72, "i8x16.sub_sat_s", None)
            (I8x16SubSatU, Simd, 0x73, "i8x16.sub_sat_u", None)
            (F64x2Ceil, Simd, 0x74, "f64x2.ceil", None)
            (F64x2Floor, Simd, 0x75, "f64x2.floor", None)
            (I8x16MinS, Simd, 0x76, "i8x16.min_s", None)
            (I8x16MinU, Simd, 0x77, "i8x16.min_u", None)
            (I8x16MaxS, Simd, 0x78, "i8x16.max_s", None)
            (I8x16MaxU, Simd, 0x79, "i8x16.max_u", None)
            (F64x2Trunc, Simd, 0x7A, "f64x2.trunc", None)
            (I8x16AvgrU, Simd, 0x7B, "i8x16.avgr_u", None)
            (I16x8ExtaddPairwiseI8x16S, Simd, 0x7C, "i16x8.extadd_pairwise_i8x16_s", None)
            (I16x8ExtaddPairwiseI8x16U, Simd, 0x7D, "i16x8.extadd_pairwise_i8x16_u", None)
            (I32x4ExtaddPairwiseI16x8S, Simd, 0x7E, "i32x4.extadd_pairwise_i16x8_s", None)
            (I32x4ExtaddPairwiseI16x8U, Simd, 0x7F, "i32x4.extadd_pairwise_i16x8_u", None)
            (I16x8Abs, Simd, 0x80, "i16x8.abs", None)
            (I16x8Neg, Simd, 0x81, "i16x8.neg", None)
            (I16x8Q15MulrSatS, Simd, 0x82, "i16x8.q15mulr_sat_s", None)
            (I16x8AllTrue, Simd, 0x83, "i16x8.all_true", None)
            (I16x8Bitmask, Simd, 0x84, "i16x8.bitmask", None)
            (I16x8NarrowI32x4S, Simd, 0x85, "i16x8.narrow_i32x4_s", None)
            (I16x8NarrowI32x4U, Simd, 0x86, "i16x8.narrow_i32x4_u", None)
            (I16x8ExtendLowI8x16S, Simd, 0x87, "i16x8.extend_low_i8x16_s", None)
            (I16x8ExtendHighI8x16S, Simd, 0x88, "i16x8.extend_high_i8x16_s", None)
            (I16x8ExtendLowI8x16U, Simd, 0x89, "i16x8.extend_low_i8x16_u", None)
            (I16x8ExtendHighI8x16U, Simd, 0x8A, "i16x8.extend_high_i8x16_u", None)
            (I16x8Shl, Simd, 0x8B, "i16x8.shl", None)
            (I16x8ShrS, Simd, 0x8C, "i16x8.shr_s", None)
            (I16x8ShrU, Simd, 0x8D, "i16x8.shr_u", None)
            (I16x8Add, Simd, 0x8E, "i16x8.add", None)
            (I16x8AddSatS, Simd, 0x8F, "i16x8.add_sat_s", None)
            (I16x8AddSatU, Simd, 0x90, "i16x8.add_sat_u", None)
            (I16x8Sub, Simd, 0x91, "i16x8.sub", None)
            (I16x8SubSatS, Simd, 0x92, "i16x8.sub_sat_s", None)
            (I16x8SubSatU, Simd, 0x93, "i16x8.sub_sat_u", None)
            (F64x2Nearest, Simd, 0x94, "f64x2.nearest", None)
            (I16x8Mul, Simd, 0x95, "i16x8.mul", None)
            (I16x8MinS, Simd, 0x96, "i16x8.min_s", None)
            (I16x8MinU, Simd, 0x97, "i16x8.min_u", None)
            (I16x8MaxS, Simd, 0x98, "i16x8.max_s", None)
            (I16x8MaxU, Simd, 0x99, "i16x8.max_u", None)
            (I16x8AvgrU, Simd, 0x9B, "i16x8.avgr_u", None)
            (I16x8ExtmulLowI8x16S, Simd, 0x9C, "i16x8.extmul_low_i8x16_s", None)
            (I16x8ExtmulHighI8x16S, Simd, 0x9D, "i16x8.extmul_high_i8x16_s", None)
            (I16x8ExtmulLowI8x16U, Simd, 0x9E, "i16x8.extmul_low_i8x16_u", None)
            (I16x8ExtmulHighI8x16U, Simd, 0x9F, "i16x8.extmul_high_i8x16_u", None)
            (I32x4Abs, Simd, 0xA0, "i32x4.abs", None)
            (I32x4Neg, Simd, 0xA1, "i32x4.neg", None)
            (I32x4AllTrue, Simd, 0xA3, "i32x4.all_true", None)
            (I32x4Bitmask, Simd, 0xA4, "i32x4.bitmask", None)
            (I32x4ExtendLowI16x8S, Simd, 0xA7, "i32x4.extend_low_i16x8_s", None)
            (I32x4ExtendHighI16x8S, Simd, 0xA8, "i32x4.extend_high_i16x8_s", None)
            (I32x4ExtendLowI16x8U, Simd, 0xA9, "i32x4.extend_low_i16x8_u", None)
            (I32x4ExtendHighI16x8U, Simd, 0xAA, "i32x4.extend_high_i16x8_u", None)
            (I32x4Shl, Simd, 0xAB, "i32x4.shl", None)
            (I32x4ShrS, Simd, 0xAC, "i32x4.shr_s", None)
            (I32x4ShrU, Simd, 0xAD, "i32x4.shr_u", None)
            (I32x4Add, Simd, 0xAE, "i32x4.add", None)
            (I32x4Sub, Simd, 0xB1, "i32x4.sub", None)
            (I32x4Mul, Simd, 0xB5, "i32x4.mul", None)
            (I32x4MinS, Simd, 0xB6, "i32x4.min_s", None)
            (I32x4MinU, Simd, 0xB7, "i32x4.min_u", None)
            (I32x4MaxS, Simd, 0xB8, "i32x4.max_s", None)
            (I32x4MaxU, Simd, 0xB9, "i32x4.max_u", None)
            (I32x4DotI16x8S, Simd, 0xBA, "i32x4.dot_i16x8_s", None)
            (I32x4ExtmulLowI16x8S, Simd, 0xBC, "i32x4.extmul_low_i16x8_s", None)
            (I32x4ExtmulHighI16x8S, Simd, 0xBD, "i32x4.extmul_high_i16x8_s", None)
            (I32x4ExtmulLowI16x8U, Simd, 0xBE, "i32x4.extmul_low_i16x8_u", None)
            (I32x4ExtmulHighI16x8U, Simd, 0xBF, "i32x4.extmul_high_i16x8_u", None)
            (I64x2Abs, Simd, 0xC0, "i64x2.abs", None)
            (I64x2Neg, Simd, 0xC1, "i64x2.neg", None)
            (I64x2AllTrue, Simd, 0xC3, "i64x2.all_true", None)
            (I64x2Bitmask, Simd, 0xC4, "i64x2.bitmask", None)
            (I64x2ExtendLowI32x4S, Simd, 0xC7, "i64x2.extend_low_i32x4_s", None)
            (I64x2ExtendHighI32x4S, Simd, 0xC8, "i64x2.extend_high_i32x4_s", None)
            (I64x2ExtendLowI32x4U, Simd, 0xC9, "i64x2.extend_low_i32x4_u", None)
            (I64x2ExtendHighI32x4U, Simd, 0xCA, "i64x2.extend_high_i32x4_u", None)
            (I64x2Shl, Simd, 0xCB, "i64x2.shl", None)
            (I64x2ShrS, Simd, 0xCC, "i64x2.shr_s", None)
            (I64x2ShrU, Simd, 0xCD, "i64x2.shr_u", None)
            (I64x2Add, Simd, 0xCE, "i64x2.add", None)
            (I64x2Sub, Simd, 0xD1, "i64x2.sub", None)
            (I64x2Mul, Simd, 0xD5, "i64x2.mul", None)
            (I64x2Eq, Simd, 0xD6, "i64x2.eq", None)
            (I64x2Ne, Simd, 0xD7, "i64x2.ne", None)
            (I64x2LtS, Simd, 0xD8, "i64x2.lt_s", None)
            (I64x2GtS, Simd, 0xD9, "i64x2.gt_s", None)
            (I64x2LeS, Simd, 0xDA, "i64x2.le_s", None)
            (I64x2GeS, Simd, 0xDB, "i64x2.ge_s", None)
            (I64x2ExtmulLowI32x4S, Simd, 0xDC, "i64x2.extmul_low_i32x4_s", None)
            (I64x2ExtmulHighI32x4S, Simd, 0xDD, "i64x2.extmul_high_i32x4_s", None)
            (I64x2ExtmulLowI32x4U, Simd, 0xDE, "i64x2.extmul_low_i32x4_u", None)
            (I64x2ExtmulHighI32x4U, Simd, 0xDF, "i64x2.extmul_high_i32x4_u", None)
            (F32x4Abs, Simd, 0xE0, "f32x4.abs", None)
            (F32x4Neg, Simd, 0xE1, "f32x4.neg", None)
            (F32x4Sqrt, Simd, 0xE3, "f32x4.sqrt", None)
            (F32x4Add, Simd, 0xE4, "f32x4.add", None)
            (F32x4Sub, Simd, 0xE5, "f32x4.sub", None)
            (F32x4Mul, Simd, 0xE6, "f32x4.mul", None)
            (F32x4Div, Simd, 0xE7, "f32x4.div", None)
            (F32x4Min, Simd, 0xE8, "f32x4.min", None)
            (F32x4Max, Simd, 0xE9, "f32x4.max", None)
            (F32x4Pmin, Simd, 0xEA, "f32x4.pmin", None)
            (F32x4Pmax, Simd, 0xEB, "f32x4.pmax", None)
            (F64x2Abs, Simd, 0xEC, "f64x2.abs", None)
            (F64x2Neg, Simd, 0xED, "f64x2.neg", None)
            (F64x2Sqrt, Simd, 0xEF, "f64x2.sqrt", None)
            (F64x2Add, Simd, 0xF0, "f64x2.add", None)
            (F64x2Sub, Simd, 0xF1, "f64x2.sub", None)
            (F64x2Mul, Simd, 0xF2, "f64x2.mul", None)
            (F64x2Div, Simd, 0xF3, "f64x2.div", None)
            (F64x2Min, Simd, 0xF4, "f64x2.min", None)
            (F64x2Max, Simd, 0xF5, "f64x2.max", None)
            (F64x2Pmin, Simd, 0xF6, "f64x2.pmin", None)
            (F64x2Pmax, Simd, 0xF7, "f64x2.pmax", None)
            (I32x4TruncSatF32x4S, Simd, 0xF8, "i32x4.trunc_sat_f32x4_s", None)
            (I32x4TruncSatF32x4U, Simd, 0xF9, "i32x4.trunc_sat_f32x4_u", None)
            (F32x4ConvertI32x4S, Simd, 0xFA, "f32x4.convert_i32x4_s", None)
            (F32x4ConvertI32x4U, Simd, 0xFB, "f32x4.convert_i32x4_u", None)
            (I32x4TruncSatF64x2SZero, Simd, 0xFC, "i32x4.trunc_sat_f64x2_s_zero", None)
            (I32x4TruncSatF64x2UZero, Simd, 0xFD, "i32x4.trunc_sat_f64x2_u_zero", None)
            (F64x2ConvertLowI32x4S, Simd, 0xFE, "f64x2.convert_low_i32x4_s", None)
            (F64x2ConvertLowI32x4U, Simd, 0xFF, "f64x2.convert_low_i32x4_u", None)
        }
    };
}

macro_rules! define_opcodes {
    ($(($variant:ident, $set:ident, $byte:literal, $name:literal, $imm:ident))*) => {
        /// A symbolic opcode, one variant per supported instruction across
        /// all three encoding sets.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($variant,)*
        }

        impl Opcode {
            /// The text-format name of this instruction.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            pub(crate) fn immediate(self) -> ImmKind {
                match self {
                    $(Self::$variant => ImmKind::$imm,)*
                }
            }

            /// Looks up the opcode for `byte` in `set`, or `None` if the
            /// combination is not a valid instruction.
            pub(crate) fn decode(set: OpSet, byte: u32) -> Option<Self> {
                match (set, byte) {
                    $((OpSet::$set, $byte) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

for_each_opcode!(define_opcodes);

impl Opcode {
    /// The width in bytes of the memory access this instruction performs,
    /// or `None` for non-memory instructions. The alignment immediate of a
    /// memory instruction may not exceed this width.
    pub(crate) fn mem_width(self) -> Option<u32> {
        use Opcode::*;
        match self {
            I32Load8S | I32Load8U | I64Load8S | I64Load8U | I32Store8 | I64Store8
            | V128Load8Splat | V128Load8Lane | V128Store8Lane => Some(1),
            I32Load16S | I32Load16U | I64Load16S | I64Load16U | I32Store16 | I64Store16
            | V128Load16Splat | V128Load16Lane | V128Store16Lane => Some(2),
            I32Load | F32Load | I64Load32S | I64Load32U | I32Store | F32Store | I64Store32
            | V128Load32Splat | V128Load32Zero | V128Load32Lane | V128Store32Lane => Some(4),
            I64Load | F64Load | I64Store | F64Store | V128Load8x8S | V128Load8x8U
            | V128Load16x4S | V128Load16x4U | V128Load32x2S | V128Load32x2U | V128Load64Splat
            | V128Load64Zero | V128Load64Lane | V128Store64Lane => Some(8),
            V128Load | V128Store => Some(16),
            _ => None,
        }
    }

    /// The number of lanes addressed by this instruction's lane-index
    /// immediate, or `None` if it has no lane immediate.
    pub(crate) fn lane_count(self) -> Option<u8> {
        use Opcode::*;
        match self {
            I8x16ExtractLaneS | I8x16ExtractLaneU | I8x16ReplaceLane | V128Load8Lane
            | V128Store8Lane | I8x16Shuffle => Some(16),
            I16x8ExtractLaneS | I16x8ExtractLaneU | I16x8ReplaceLane | V128Load16Lane
            | V128Store16Lane => Some(8),
            I32x4ExtractLane | I32x4ReplaceLane | F32x4ExtractLane | F32x4ReplaceLane
            | V128Load32Lane | V128Store32Lane => Some(4),
            I64x2ExtractLane | I64x2ReplaceLane | F64x2ExtractLane | F64x2ReplaceLane
            | V128Load64Lane | V128Store64Lane => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded instruction: opcode plus its discriminated immediate.
///
/// Structured openers (`block`/`loop`/`if`, and `else` for its jump to
/// `end`) carry `else_ofs`/`end_ofs`, the relative offsets to their matching
/// `else`/`end` instructions, filled in by a fix-up pass after the whole
/// body has been decoded.
#[derive(Debug, Clone, Copy)]
pub struct Instr {
    pub op: Opcode,
    pub imm: Imm,
}

#[derive(Debug, Clone, Copy)]
pub enum Imm {
    None,
    Block {
        ty: BlockType,
        else_ofs: u32,
        end_ofs: u32,
    },
    Label {
        depth: u32,
    },
    /// Span into the module's u32 pool; the last entry is the default
    /// target.
    LabelTable {
        targets: Span,
    },
    Func {
        index: FuncIndex,
    },
    CallIndirect {
        type_index: TypeIndex,
        table: TableIndex,
    },
    Local {
        index: u32,
    },
    Global {
        index: GlobalIndex,
    },
    MemArg {
        align: u32,
        offset: u32,
    },
    MemArgLane {
        align: u32,
        offset: u32,
        lane: u8,
    },
    I32 {
        value: i32,
    },
    I64 {
        value: i64,
    },
    F32 {
        bits: u32,
    },
    F64 {
        bits: u64,
    },
    V128 {
        bits: u128,
    },
    Lane {
        lane: u8,
    },
    Shuffle {
        lanes: [u8; 16],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_set_lookup() {
        assert_eq!(Opcode::decode(OpSet::Main, 0x6A), Some(Opcode::I32Add));
        assert_eq!(Opcode::decode(OpSet::Main, 0x0B), Some(Opcode::End));
        assert_eq!(Opcode::decode(OpSet::Main, 0xBF), Some(Opcode::F64ReinterpretI64));
        // Gaps in the main set are invalid.
        assert_eq!(Opcode::decode(OpSet::Main, 0x06), None);
        assert_eq!(Opcode::decode(OpSet::Main, 0x1C), None);
        assert_eq!(Opcode::decode(OpSet::Main, 0xC0), None);
    }

    #[test]
    fn prefixed_set_lookup() {
        assert_eq!(
            Opcode::decode(OpSet::TruncSat, 0x00),
            Some(Opcode::I32TruncSatF32S)
        );
        assert_eq!(Opcode::decode(OpSet::TruncSat, 0x08), None);
        assert_eq!(Opcode::decode(OpSet::Simd, 0x0D), Some(Opcode::I8x16Shuffle));
        assert_eq!(Opcode::decode(OpSet::Simd, 0x9A), None);
    }

    #[test]
    fn metadata() {
        assert_eq!(Opcode::I32Load.mem_width(), Some(4));
        assert_eq!(Opcode::V128Load.mem_width(), Some(16));
        assert_eq!(Opcode::V128Load8x8S.mem_width(), Some(8));
        assert_eq!(Opcode::I32Add.mem_width(), None);
        assert_eq!(Opcode::I8x16ExtractLaneS.lane_count(), Some(16));
        assert_eq!(Opcode::F64x2ReplaceLane.lane_count(), Some(2));
        assert_eq!(Opcode::I32Load.immediate(), ImmKind::MemArg);
        assert_eq!(Opcode::I8x16Shuffle.name(), "i8x16.shuffle");
    }
}
