//! Whole-module structural checks and the per-function abstract-stack type
//! checker.

mod func;

use crate::decode::DecodedModule;
use crate::errors::ValidationError;
use crate::indices::EntityIndex;
use crate::opcode::{Imm, Opcode};
use crate::types::{Limits, Span, ValType};
use func::FuncChecker;
use smallvec::SmallVec;

/// Validates a decoded module against the type, control and memory rules.
///
/// Decoding and validation are separate passes on purpose: the decoder is
/// the safe entry point's first half, but embedders that trust their input
/// may skip this pass entirely.
pub(crate) fn validate(module: &DecodedModule) -> Result<(), ValidationError> {
    for (_, sig) in module.functions.iter() {
        if module.types.get(*sig).is_none() {
            return Err(ValidationError::UnknownType(sig.as_u32()));
        }
    }

    if module.tables.len() > 1 {
        return Err(ValidationError::TooManyTables);
    }
    for (_, table) in module.tables.iter() {
        check_limits(&table.limits)?;
    }

    if module.memories.len() > 1 {
        return Err(ValidationError::TooManyMemories);
    }
    for (_, memory) in module.memories.iter() {
        check_limits(&memory.limits)?;
        if memory.limits.min > crate::WASM32_MAX_PAGES
            || memory.limits.max.is_some_and(|max| max > crate::WASM32_MAX_PAGES)
        {
            return Err(ValidationError::MemoryTooLarge);
        }
    }

    for (defined, init) in module.global_initializers.iter() {
        let index = module.global_index(defined);
        let expected = module.globals[index].content;
        check_const_expr(module, *init, expected)?;
    }

    for (_, index) in module.exports.iter() {
        check_entity_index(module, *index)?;
    }

    for segment in &module.element_segments {
        if module.tables.get(segment.table).is_none() {
            return Err(ValidationError::UnknownTable(segment.table.as_u32()));
        }
        check_const_expr(module, segment.offset, ValType::I32)?;
        for func in module.u32s(segment.funcs) {
            if *func as usize >= module.functions.len() {
                return Err(ValidationError::UnknownFunc(*func));
            }
        }
    }

    for segment in &module.data_segments {
        if module.memories.get(segment.memory).is_none() {
            return Err(ValidationError::UnknownMemory(segment.memory.as_u32()));
        }
        check_const_expr(module, segment.offset, ValType::I32)?;
    }

    if let Some(start) = module.start {
        let sig = *module
            .functions
            .get(start)
            .ok_or(ValidationError::UnknownFunc(start.as_u32()))?;
        if !module.params(sig).is_empty() || !module.results(sig).is_empty() {
            return Err(ValidationError::BadStartSignature);
        }
    }

    for (defined, _) in module.code.iter() {
        FuncChecker::new(module, defined).check()?;
    }

    Ok(())
}

fn check_limits(limits: &Limits) -> Result<(), ValidationError> {
    match limits.max {
        Some(max) if limits.min > max => Err(ValidationError::BadLimits),
        _ => Ok(()),
    }
}

fn check_entity_index(
    module: &DecodedModule,
    index: EntityIndex,
) -> Result<(), ValidationError> {
    match index {
        EntityIndex::Function(i) if module.functions.get(i).is_none() => {
            Err(ValidationError::UnknownFunc(i.as_u32()))
        }
        EntityIndex::Table(i) if module.tables.get(i).is_none() => {
            Err(ValidationError::UnknownTable(i.as_u32()))
        }
        EntityIndex::Memory(i) if module.memories.get(i).is_none() => {
            Err(ValidationError::UnknownMemory(i.as_u32()))
        }
        EntityIndex::Global(i) if module.globals.get(i).is_none() => {
            Err(ValidationError::UnknownGlobal(i.as_u32()))
        }
        _ => Ok(()),
    }
}

/// Constant expressions may contain only `*.const`, `global.get` of an
/// imported immutable global, and the terminating `end`, and must leave
/// exactly one value of the expected type.
fn check_const_expr(
    module: &DecodedModule,
    expr: Span,
    expected: ValType,
) -> Result<(), ValidationError> {
    let instrs = module.instrs(expr);
    let mut stack: SmallVec<[ValType; 2]> = SmallVec::new();

    let (last, body) = instrs
        .split_last()
        .ok_or(ValidationError::BadConstExpr)?;
    if last.op != Opcode::End {
        return Err(ValidationError::BadConstExpr);
    }

    for instr in body {
        match (instr.op, instr.imm) {
            (Opcode::I32Const, _) => stack.push(ValType::I32),
            (Opcode::I64Const, _) => stack.push(ValType::I64),
            (Opcode::F32Const, _) => stack.push(ValType::F32),
            (Opcode::F64Const, _) => stack.push(ValType::F64),
            (Opcode::V128Const, _) => stack.push(ValType::V128),
            (Opcode::GlobalGet, Imm::Global { index }) => {
                let ty = module
                    .globals
                    .get(index)
                    .ok_or(ValidationError::UnknownGlobal(index.as_u32()))?;
                if !module.is_imported_global(index) || ty.mutable {
                    return Err(ValidationError::BadConstExprGlobal);
                }
                stack.push(ty.content);
            }
            _ => return Err(ValidationError::BadConstExpr),
        }
    }

    match stack.as_slice() {
        [ty] if *ty == expected => Ok(()),
        [ty] => Err(ValidationError::TypeMismatch {
            expected: expected.name(),
            found: ty.name(),
        }),
        _ => Err(ValidationError::ConstExprArity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ModuleDecoder;

    fn validate_wat(wat: &str) -> Result<(), ValidationError> {
        let module = ModuleDecoder::new().decode(&wat::parse_str(wat).unwrap()).unwrap();
        validate(&module)
    }

    #[test]
    fn accepts_simple_module() {
        validate_wat(
            r#"(module
                (memory 1)
                (global (mut i32) (i32.const 0))
                (func (param i32) (result i32)
                    local.get 0
                    i32.const 1
                    i32.add))"#,
        )
        .unwrap();
    }

    #[test]
    fn rejects_bad_start_signature() {
        let err = validate_wat(
            r#"(module
                (func $f (param i32) local.get 0 drop)
                (start $f))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::BadStartSignature));
    }

    #[test]
    fn rejects_mutable_global_in_const_expr() {
        let err = validate_wat(
            r#"(module
                (import "env" "g" (global $g (mut i32)))
                (global i32 (global.get $g)))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::BadConstExprGlobal));
    }

    #[test]
    fn rejects_const_expr_type_mismatch() {
        let err = validate_wat(r#"(module (global i32 (i64.const 1)))"#).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn rejects_oversized_memory() {
        // 65537 pages; the text format already refuses this, so build the
        // memory section by hand.
        let bytes = b"\0asm\x01\0\0\0\x05\x05\x01\x00\x81\x80\x04";
        let module = ModuleDecoder::new().decode(bytes).unwrap();
        let err = validate(&module).unwrap_err();
        assert!(matches!(err, ValidationError::MemoryTooLarge));
    }
}
