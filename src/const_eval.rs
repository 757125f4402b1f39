use crate::decode::DecodedModule;
use crate::indices::GlobalIndex;
use crate::opcode::{Imm, Opcode};
use crate::store::{GlobalId, Store};
use crate::types::Span;
use crate::values::VMVal;
use cranelift_entity::PrimaryMap;
use smallvec::SmallVec;

/// Evaluates validated constant expressions: global initializers and
/// element/data segment offsets.
#[derive(Debug, Default)]
pub struct ConstExprEvaluator {
    stack: SmallVec<[VMVal; 2]>,
}

impl ConstExprEvaluator {
    /// Evaluates `expr` in a minimal frame. `globals` maps the module's
    /// global index space to store cells; only imported entries are ever
    /// read (the validator restricts `global.get` to those).
    pub(crate) fn eval(
        &mut self,
        store: &Store,
        module: &DecodedModule,
        globals: &PrimaryMap<GlobalIndex, GlobalId>,
        expr: Span,
    ) -> VMVal {
        self.stack.clear();

        for instr in module.instrs(expr) {
            match (instr.op, instr.imm) {
                (Opcode::I32Const, Imm::I32 { value }) => self.stack.push(VMVal::i32(value)),
                (Opcode::I64Const, Imm::I64 { value }) => self.stack.push(VMVal::i64(value)),
                (Opcode::F32Const, Imm::F32 { bits }) => self.stack.push(VMVal::f32_bits(bits)),
                (Opcode::F64Const, Imm::F64 { bits }) => self.stack.push(VMVal::f64_bits(bits)),
                (Opcode::V128Const, Imm::V128 { bits }) => self.stack.push(VMVal::v128(bits)),
                (Opcode::GlobalGet, Imm::Global { index }) => {
                    self.stack.push(store.globals[globals[index]].get());
                }
                (Opcode::End, _) => break,
                _ => unreachable!("validated constant expression"),
            }
        }

        debug_assert_eq!(self.stack.len(), 1);
        self.stack.pop().expect("empty constant expression")
    }
}
