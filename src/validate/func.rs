use crate::decode::DecodedModule;
use crate::errors::ValidationError;
use crate::indices::DefinedFuncIndex;
use crate::opcode::{Imm, Instr, Opcode};
use crate::types::{BlockType, ValType};
use alloc::vec::Vec;
use smallvec::SmallVec;

/// The abstract-stack element: one of the five value types, or `Unknown`
/// for a polymorphic slot on an unreachable stack. `Unknown` unifies with
/// anything; there is deliberately no subtyping hierarchy behind this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckType {
    I32,
    I64,
    F32,
    F64,
    V128,
    Unknown,
}

impl CheckType {
    fn name(self) -> &'static str {
        match self {
            CheckType::I32 => "i32",
            CheckType::I64 => "i64",
            CheckType::F32 => "f32",
            CheckType::F64 => "f64",
            CheckType::V128 => "v128",
            CheckType::Unknown => "unknown",
        }
    }
}

impl From<ValType> for CheckType {
    fn from(ty: ValType) -> Self {
        match ty {
            ValType::I32 => CheckType::I32,
            ValType::I64 => CheckType::I64,
            ValType::F32 => CheckType::F32,
            ValType::F64 => CheckType::F64,
            ValType::V128 => CheckType::V128,
        }
    }
}

struct ControlFrame {
    opcode: Opcode,
    block_type: BlockType,
    /// Operand stack height on entry, below the block parameters.
    height: usize,
    /// Set once an unconditional transfer makes the rest of the block
    /// polymorphic.
    unreachable: bool,
}

type TypeList = SmallVec<[ValType; 4]>;

/// Type-checks one function body with the canonical abstract-stack
/// algorithm: a stack of checker types and a stack of control frames,
/// failing closed on any mismatch.
pub(crate) struct FuncChecker<'m> {
    module: &'m DecodedModule,
    func: DefinedFuncIndex,
    locals: Vec<ValType>,
    stack: Vec<CheckType>,
    ctrl: Vec<ControlFrame>,
}

impl<'m> FuncChecker<'m> {
    pub(crate) fn new(module: &'m DecodedModule, func: DefinedFuncIndex) -> Self {
        let body = module.code[func];
        let sig = module.func_type(module.func_index(func));

        let mut locals = Vec::with_capacity(body.frame_size as usize);
        locals.extend_from_slice(module.params(sig));
        for decl in module.local_decls(body.locals) {
            locals.extend(core::iter::repeat(decl.ty).take(decl.count as usize));
        }

        let mut checker = Self {
            module,
            func,
            locals,
            stack: Vec::new(),
            ctrl: Vec::new(),
        };

        // The implicit function body block; its results are the function's.
        checker.ctrl.push(ControlFrame {
            opcode: Opcode::Block,
            block_type: BlockType::Func(sig),
            height: 0,
            unreachable: false,
        });

        checker
    }

    pub(crate) fn check(mut self) -> Result<(), ValidationError> {
        let body = self.module.code[self.func];
        for instr in self.module.instrs(body.expr) {
            self.step(instr)?;
            if self.ctrl.is_empty() {
                break;
            }
        }
        debug_assert!(self.ctrl.is_empty(), "decoder guarantees balanced ends");
        Ok(())
    }

    fn block_params(&self, ty: BlockType) -> TypeList {
        match ty {
            BlockType::Empty | BlockType::Result(_) => TypeList::new(),
            BlockType::Func(index) => TypeList::from_slice(self.module.params(index)),
        }
    }

    fn block_results(&self, ty: BlockType) -> TypeList {
        match ty {
            BlockType::Empty => TypeList::new(),
            BlockType::Result(ty) => {
                let mut list = TypeList::new();
                list.push(ty);
                list
            }
            BlockType::Func(index) => TypeList::from_slice(self.module.results(index)),
        }
    }

    /// The types a branch to this frame must supply: a loop receives its
    /// parameters back, every other block its results.
    fn label_types(&self, frame: &ControlFrame) -> TypeList {
        if frame.opcode == Opcode::Loop {
            self.block_params(frame.block_type)
        } else {
            self.block_results(frame.block_type)
        }
    }

    fn push(&mut self, ty: CheckType) {
        self.stack.push(ty);
    }

    fn push_vals(&mut self, types: &[ValType]) {
        for ty in types {
            self.stack.push(CheckType::from(*ty));
        }
    }

    fn pop(&mut self) -> Result<CheckType, ValidationError> {
        let frame = self.ctrl.last().expect("control stack is never empty here");
        if self.stack.len() == frame.height {
            return if frame.unreachable {
                Ok(CheckType::Unknown)
            } else {
                Err(ValidationError::StackUnderflow)
            };
        }
        debug_assert!(self.stack.len() > frame.height);
        Ok(self.stack.pop().unwrap())
    }

    /// Pops a value and checks it against `expected`; either side being
    /// `Unknown` matches, and the more specific of the two is returned.
    fn pop_expect(&mut self, expected: CheckType) -> Result<CheckType, ValidationError> {
        let actual = self.pop()?;
        match (actual, expected) {
            (CheckType::Unknown, _) => Ok(expected),
            (_, CheckType::Unknown) => Ok(actual),
            _ if actual == expected => Ok(actual),
            _ => Err(ValidationError::TypeMismatch {
                expected: expected.name(),
                found: actual.name(),
            }),
        }
    }

    fn pop_vals(&mut self, types: &[ValType]) -> Result<(), ValidationError> {
        for ty in types.iter().rev() {
            self.pop_expect(CheckType::from(*ty))?;
        }
        Ok(())
    }

    fn push_ctrl(&mut self, opcode: Opcode, block_type: BlockType) {
        let params = self.block_params(block_type);
        self.ctrl.push(ControlFrame {
            opcode,
            block_type,
            height: self.stack.len(),
            unreachable: false,
        });
        self.push_vals(&params);
    }

    fn pop_ctrl(&mut self) -> Result<ControlFrame, ValidationError> {
        let frame = self.ctrl.last().expect("control stack is never empty here");
        let results = self.block_results(frame.block_type);
        let height = frame.height;
        self.pop_vals(&results)?;
        if self.stack.len() != height {
            return Err(ValidationError::StackHeightMismatch);
        }
        Ok(self.ctrl.pop().unwrap())
    }

    fn set_unreachable(&mut self) {
        let frame = self.ctrl.last_mut().expect("control stack is never empty here");
        self.stack.truncate(frame.height);
        frame.unreachable = true;
    }

    fn frame_at(&self, depth: u32) -> Result<&ControlFrame, ValidationError> {
        let depth = depth as usize;
        if depth >= self.ctrl.len() {
            return Err(ValidationError::UnknownLabel(depth as u32));
        }
        Ok(&self.ctrl[self.ctrl.len() - 1 - depth])
    }

    fn branch(&mut self, depth: u32) -> Result<(), ValidationError> {
        let types = self.label_types(self.frame_at(depth)?);
        self.pop_vals(&types)?;
        self.set_unreachable();
        Ok(())
    }

    fn local_type(&self, index: u32) -> Result<ValType, ValidationError> {
        self.locals
            .get(index as usize)
            .copied()
            .ok_or(ValidationError::UnknownLocal(index))
    }

    fn check_mem(&self, op: Opcode, align: u32) -> Result<(), ValidationError> {
        if self.module.memories.is_empty() {
            return Err(ValidationError::UnknownMemory(0));
        }
        let width = op.mem_width().expect("memory instruction");
        if align >= 32 || (1u32 << align) > width {
            return Err(ValidationError::BadAlignment { align, width });
        }
        Ok(())
    }

    fn check_lane(&self, op: Opcode, lane: u8) -> Result<(), ValidationError> {
        let lanes = op.lane_count().expect("lane instruction");
        if lane >= lanes {
            return Err(ValidationError::BadLaneIndex { lane, lanes });
        }
        Ok(())
    }

    fn unop(&mut self, ty: CheckType) -> Result<(), ValidationError> {
        self.pop_expect(ty)?;
        self.push(ty);
        Ok(())
    }

    fn binop(&mut self, ty: CheckType) -> Result<(), ValidationError> {
        self.pop_expect(ty)?;
        self.pop_expect(ty)?;
        self.push(ty);
        Ok(())
    }

    fn testop(&mut self, ty: CheckType) -> Result<(), ValidationError> {
        self.pop_expect(ty)?;
        self.push(CheckType::I32);
        Ok(())
    }

    fn relop(&mut self, ty: CheckType) -> Result<(), ValidationError> {
        self.pop_expect(ty)?;
        self.pop_expect(ty)?;
        self.push(CheckType::I32);
        Ok(())
    }

    fn cvtop(&mut self, src: CheckType, dst: CheckType) -> Result<(), ValidationError> {
        self.pop_expect(src)?;
        self.push(dst);
        Ok(())
    }

    fn load(&mut self, op: Opcode, align: u32, ty: CheckType) -> Result<(), ValidationError> {
        self.check_mem(op, align)?;
        self.pop_expect(CheckType::I32)?;
        self.push(ty);
        Ok(())
    }

    fn store(&mut self, op: Opcode, align: u32, ty: CheckType) -> Result<(), ValidationError> {
        self.check_mem(op, align)?;
        self.pop_expect(ty)?;
        self.pop_expect(CheckType::I32)?;
        Ok(())
    }

    /// `(v128, i32) -> v128` lane shifts.
    fn shiftop(&mut self) -> Result<(), ValidationError> {
        self.pop_expect(CheckType::I32)?;
        self.pop_expect(CheckType::V128)?;
        self.push(CheckType::V128);
        Ok(())
    }

    fn extract_lane(&mut self, op: Opcode, lane: u8, ty: CheckType) -> Result<(), ValidationError> {
        self.check_lane(op, lane)?;
        self.pop_expect(CheckType::V128)?;
        self.push(ty);
        Ok(())
    }

    fn replace_lane(&mut self, op: Opcode, lane: u8, ty: CheckType) -> Result<(), ValidationError> {
        self.check_lane(op, lane)?;
        self.pop_expect(ty)?;
        self.pop_expect(CheckType::V128)?;
        self.push(CheckType::V128);
        Ok(())
    }

    fn step(&mut self, instr: &Instr) -> Result<(), ValidationError> {
        use CheckType::{F32, F64, I32, I64, V128};
        use Opcode::*;

        let op = instr.op;
        match op {
            Unreachable => self.set_unreachable(),
            Nop => {}

            Block | Loop | If => {
                let Imm::Block { ty, .. } = instr.imm else {
                    unreachable!()
                };
                if let BlockType::Func(index) = ty {
                    if self.module.types.get(index).is_none() {
                        return Err(ValidationError::UnknownType(index.as_u32()));
                    }
                }
                if op == If {
                    self.pop_expect(I32)?;
                }
                let params = self.block_params(ty);
                self.pop_vals(&params)?;
                self.push_ctrl(op, ty);
            }
            Else => {
                let frame = self.pop_ctrl()?;
                if frame.opcode != If {
                    return Err(ValidationError::ElseWithoutIf);
                }
                self.push_ctrl(Else, frame.block_type);
            }
            End => {
                let frame = self.pop_ctrl()?;
                // An `if` without `else` must be valid with the implicit
                // empty else, so its params and results must agree.
                if frame.opcode == If
                    && self.block_params(frame.block_type)
                        != self.block_results(frame.block_type)
                {
                    return Err(ValidationError::TypeMismatch {
                        expected: "else",
                        found: "end",
                    });
                }
                let results = self.block_results(frame.block_type);
                self.push_vals(&results);
            }

            Br => {
                let Imm::Label { depth } = instr.imm else {
                    unreachable!()
                };
                self.branch(depth)?;
            }
            BrIf => {
                let Imm::Label { depth } = instr.imm else {
                    unreachable!()
                };
                self.pop_expect(I32)?;
                let types = self.label_types(self.frame_at(depth)?);
                self.pop_vals(&types)?;
                self.push_vals(&types);
            }
            BrTable => {
                let Imm::LabelTable { targets } = instr.imm else {
                    unreachable!()
                };
                self.pop_expect(I32)?;
                let targets: SmallVec<[u32; 8]> =
                    SmallVec::from_slice(self.module.u32s(targets));
                let (default, rest) = targets.split_last().expect("default target");
                let default_types = self.label_types(self.frame_at(*default)?);
                for target in rest {
                    let types = self.label_types(self.frame_at(*target)?);
                    if types.len() != default_types.len() {
                        return Err(ValidationError::StackHeightMismatch);
                    }
                    self.pop_vals(&types)?;
                    self.push_vals(&types);
                }
                self.pop_vals(&default_types)?;
                self.set_unreachable();
            }
            Return => {
                let depth = self.ctrl.len() as u32 - 1;
                self.branch(depth)?;
            }

            Call => {
                let Imm::Func { index } = instr.imm else {
                    unreachable!()
                };
                let sig = *self
                    .module
                    .functions
                    .get(index)
                    .ok_or(ValidationError::UnknownFunc(index.as_u32()))?;
                let params = TypeList::from_slice(self.module.params(sig));
                let results = TypeList::from_slice(self.module.results(sig));
                self.pop_vals(&params)?;
                self.push_vals(&results);
            }
            CallIndirect => {
                let Imm::CallIndirect { type_index, table } = instr.imm else {
                    unreachable!()
                };
                if self.module.tables.get(table).is_none() {
                    return Err(ValidationError::UnknownTable(table.as_u32()));
                }
                if self.module.types.get(type_index).is_none() {
                    return Err(ValidationError::UnknownType(type_index.as_u32()));
                }
                self.pop_expect(I32)?;
                let params = TypeList::from_slice(self.module.params(type_index));
                let results = TypeList::from_slice(self.module.results(type_index));
                self.pop_vals(&params)?;
                self.push_vals(&results);
            }

            Drop => {
                self.pop()?;
            }
            Select => {
                self.pop_expect(I32)?;
                let a = self.pop()?;
                let b = self.pop()?;
                let ty = match (a, b) {
                    (CheckType::Unknown, other) | (other, CheckType::Unknown) => other,
                    _ if a == b => a,
                    _ => {
                        return Err(ValidationError::TypeMismatch {
                            expected: b.name(),
                            found: a.name(),
                        })
                    }
                };
                self.push(ty);
            }

            LocalGet => {
                let Imm::Local { index } = instr.imm else {
                    unreachable!()
                };
                let ty = self.local_type(index)?;
                self.push(CheckType::from(ty));
            }
            LocalSet => {
                let Imm::Local { index } = instr.imm else {
                    unreachable!()
                };
                let ty = self.local_type(index)?;
                self.pop_expect(CheckType::from(ty))?;
            }
            LocalTee => {
                let Imm::Local { index } = instr.imm else {
                    unreachable!()
                };
                let ty = self.local_type(index)?;
                let got = self.pop_expect(CheckType::from(ty))?;
                self.push(got);
            }
            GlobalGet => {
                let Imm::Global { index } = instr.imm else {
                    unreachable!()
                };
                let ty = self
                    .module
                    .globals
                    .get(index)
                    .ok_or(ValidationError::UnknownGlobal(index.as_u32()))?;
                self.push(CheckType::from(ty.content));
            }
            GlobalSet => {
                let Imm::Global { index } = instr.imm else {
                    unreachable!()
                };
                let ty = *self
                    .module
                    .globals
                    .get(index)
                    .ok_or(ValidationError::UnknownGlobal(index.as_u32()))?;
                if !ty.mutable {
                    return Err(ValidationError::GlobalImmutable);
                }
                self.pop_expect(CheckType::from(ty.content))?;
            }

            I32Load | I32Load8S | I32Load8U | I32Load16S | I32Load16U => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.load(op, align, I32)?;
            }
            I64Load | I64Load8S | I64Load8U | I64Load16S | I64Load16U | I64Load32S
            | I64Load32U => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.load(op, align, I64)?;
            }
            F32Load => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.load(op, align, F32)?;
            }
            F64Load => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.load(op, align, F64)?;
            }
            V128Load | V128Load8x8S | V128Load8x8U | V128Load16x4S | V128Load16x4U
            | V128Load32x2S | V128Load32x2U | V128Load8Splat | V128Load16Splat
            | V128Load32Splat | V128Load64Splat | V128Load32Zero | V128Load64Zero => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.load(op, align, V128)?;
            }
            I32Store | I32Store8 | I32Store16 => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.store(op, align, I32)?;
            }
            I64Store | I64Store8 | I64Store16 | I64Store32 => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.store(op, align, I64)?;
            }
            F32Store => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.store(op, align, F32)?;
            }
            F64Store => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.store(op, align, F64)?;
            }
            V128Store => {
                let Imm::MemArg { align, .. } = instr.imm else {
                    unreachable!()
                };
                self.store(op, align, V128)?;
            }
            V128Load8Lane | V128Load16Lane | V128Load32Lane | V128Load64Lane => {
                let Imm::MemArgLane { align, lane, .. } = instr.imm else {
                    unreachable!()
                };
                self.check_mem(op, align)?;
                self.check_lane(op, lane)?;
                self.pop_expect(V128)?;
                self.pop_expect(I32)?;
                self.push(V128);
            }
            V128Store8Lane | V128Store16Lane | V128Store32Lane | V128Store64Lane => {
                let Imm::MemArgLane { align, lane, .. } = instr.imm else {
                    unreachable!()
                };
                self.check_mem(op, align)?;
                self.check_lane(op, lane)?;
                self.pop_expect(V128)?;
                self.pop_expect(I32)?;
            }
            MemorySize => {
                if self.module.memories.is_empty() {
                    return Err(ValidationError::UnknownMemory(0));
                }
                self.push(I32);
            }
            MemoryGrow => {
                if self.module.memories.is_empty() {
                    return Err(ValidationError::UnknownMemory(0));
                }
                self.pop_expect(I32)?;
                self.push(I32);
            }

            I32Const => self.push(I32),
            I64Const => self.push(I64),
            F32Const => self.push(F32),
            F64Const => self.push(F64),
            V128Const => self.push(V128),

            I32Eqz => self.testop(I32)?,
            I64Eqz => self.testop(I64)?,
            I32Eq | I32Ne | I32LtS | I32LtU | I32GtS | I32GtU | I32LeS | I32LeU | I32GeS
            | I32GeU => self.relop(I32)?,
            I64Eq | I64Ne | I64LtS | I64LtU | I64GtS | I64GtU | I64LeS | I64LeU | I64GeS
            | I64GeU => self.relop(I64)?,
            F32Eq | F32Ne | F32Lt | F32Gt | F32Le | F32Ge => self.relop(F32)?,
            F64Eq | F64Ne | F64Lt | F64Gt | F64Le | F64Ge => self.relop(F64)?,

            I32Clz | I32Ctz | I32Popcnt => self.unop(I32)?,
            I64Clz | I64Ctz | I64Popcnt => self.unop(I64)?,
            I32Add | I32Sub | I32Mul | I32DivS | I32DivU | I32RemS | I32RemU | I32And | I32Or
            | I32Xor | I32Shl | I32ShrS | I32ShrU | I32Rotl | I32Rotr => self.binop(I32)?,
            I64Add | I64Sub | I64Mul | I64DivS | I64DivU | I64RemS | I64RemU | I64And | I64Or
            | I64Xor | I64Shl | I64ShrS | I64ShrU | I64Rotl | I64Rotr => self.binop(I64)?,
            F32Abs | F32Neg | F32Ceil | F32Floor | F32Trunc | F32Nearest | F32Sqrt => {
                self.unop(F32)?;
            }
            F64Abs | F64Neg | F64Ceil | F64Floor | F64Trunc | F64Nearest | F64Sqrt => {
                self.unop(F64)?;
            }
            F32Add | F32Sub | F32Mul | F32Div | F32Min | F32Max | F32Copysign => {
                self.binop(F32)?;
            }
            F64Add | F64Sub | F64Mul | F64Div | F64Min | F64Max | F64Copysign => {
                self.binop(F64)?;
            }

            I32WrapI64 => self.cvtop(I64, I32)?,
            I32TruncF32S | I32TruncF32U | I32TruncSatF32S | I32TruncSatF32U
            | I32ReinterpretF32 => self.cvtop(F32, I32)?,
            I32TruncF64S | I32TruncF64U | I32TruncSatF64S | I32TruncSatF64U => {
                self.cvtop(F64, I32)?;
            }
            I64ExtendI32S | I64ExtendI32U => self.cvtop(I32, I64)?,
            I64TruncF32S | I64TruncF32U | I64TruncSatF32S | I64TruncSatF32U => {
                self.cvtop(F32, I64)?;
            }
            I64TruncF64S | I64TruncF64U | I64TruncSatF64S | I64TruncSatF64U
            | I64ReinterpretF64 => self.cvtop(F64, I64)?,
            F32ConvertI32S | F32ConvertI32U | F32ReinterpretI32 => self.cvtop(I32, F32)?,
            F32ConvertI64S | F32ConvertI64U => self.cvtop(I64, F32)?,
            F32DemoteF64 => self.cvtop(F64, F32)?,
            F64ConvertI32S | F64ConvertI32U => self.cvtop(I32, F64)?,
            F64ConvertI64S | F64ConvertI64U | F64ReinterpretI64 => self.cvtop(I64, F64)?,
            F64PromoteF32 => self.cvtop(F32, F64)?,

            I8x16Shuffle => {
                let Imm::Shuffle { lanes } = instr.imm else {
                    unreachable!()
                };
                for lane in lanes {
                    if lane >= 32 {
                        return Err(ValidationError::BadLaneIndex { lane, lanes: 32 });
                    }
                }
                self.binop(V128)?;
            }

            I8x16Splat | I16x8Splat | I32x4Splat => self.cvtop(I32, V128)?,
            I64x2Splat => self.cvtop(I64, V128)?,
            F32x4Splat => self.cvtop(F32, V128)?,
            F64x2Splat => self.cvtop(F64, V128)?,

            I8x16ExtractLaneS | I8x16ExtractLaneU | I16x8ExtractLaneS | I16x8ExtractLaneU
            | I32x4ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.extract_lane(op, lane, I32)?;
            }
            I64x2ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.extract_lane(op, lane, I64)?;
            }
            F32x4ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.extract_lane(op, lane, F32)?;
            }
            F64x2ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.extract_lane(op, lane, F64)?;
            }
            I8x16ReplaceLane | I16x8ReplaceLane | I32x4ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.replace_lane(op, lane, I32)?;
            }
            I64x2ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.replace_lane(op, lane, I64)?;
            }
            F32x4ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.replace_lane(op, lane, F32)?;
            }
            F64x2ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                self.replace_lane(op, lane, F64)?;
            }

            V128AnyTrue | I8x16AllTrue | I16x8AllTrue | I32x4AllTrue | I64x2AllTrue
            | I8x16Bitmask | I16x8Bitmask | I32x4Bitmask | I64x2Bitmask => self.testop(V128)?,

            I8x16Shl | I8x16ShrS | I8x16ShrU | I16x8Shl | I16x8ShrS | I16x8ShrU | I32x4Shl
            | I32x4ShrS | I32x4ShrU | I64x2Shl | I64x2ShrS | I64x2ShrU => self.shiftop()?,

            V128Bitselect => {
                self.pop_expect(V128)?;
                self.pop_expect(V128)?;
                self.pop_expect(V128)?;
                self.push(V128);
            }

            V128Not | I8x16Abs | I8x16Neg | I8x16Popcnt | I16x8Abs | I16x8Neg | I32x4Abs
            | I32x4Neg | I64x2Abs | I64x2Neg | F32x4Abs | F32x4Neg | F32x4Sqrt | F32x4Ceil
            | F32x4Floor | F32x4Trunc | F32x4Nearest | F64x2Abs | F64x2Neg | F64x2Sqrt
            | F64x2Ceil | F64x2Floor | F64x2Trunc | F64x2Nearest
            | I16x8ExtaddPairwiseI8x16S | I16x8ExtaddPairwiseI8x16U
            | I32x4ExtaddPairwiseI16x8S | I32x4ExtaddPairwiseI16x8U | I16x8ExtendLowI8x16S
            | I16x8ExtendHighI8x16S | I16x8ExtendLowI8x16U | I16x8ExtendHighI8x16U
            | I32x4ExtendLowI16x8S | I32x4ExtendHighI16x8S | I32x4ExtendLowI16x8U
            | I32x4ExtendHighI16x8U | I64x2ExtendLowI32x4S | I64x2ExtendHighI32x4S
            | I64x2ExtendLowI32x4U | I64x2ExtendHighI32x4U | F32x4DemoteF64x2Zero
            | F64x2PromoteLowF32x4 | I32x4TruncSatF32x4S | I32x4TruncSatF32x4U
            | I32x4TruncSatF64x2SZero | I32x4TruncSatF64x2UZero | F32x4ConvertI32x4S
            | F32x4ConvertI32x4U | F64x2ConvertLowI32x4S | F64x2ConvertLowI32x4U => {
                self.unop(V128)?;
            }

            I8x16Swizzle | I8x16Eq | I8x16Ne | I8x16LtS | I8x16LtU | I8x16GtS | I8x16GtU
            | I8x16LeS | I8x16LeU | I8x16GeS | I8x16GeU | I16x8Eq | I16x8Ne | I16x8LtS
            | I16x8LtU | I16x8GtS | I16x8GtU | I16x8LeS | I16x8LeU | I16x8GeS | I16x8GeU
            | I32x4Eq | I32x4Ne | I32x4LtS | I32x4LtU | I32x4GtS | I32x4GtU | I32x4LeS
            | I32x4LeU | I32x4GeS | I32x4GeU | I64x2Eq | I64x2Ne | I64x2LtS | I64x2GtS
            | I64x2LeS | I64x2GeS | F32x4Eq | F32x4Ne | F32x4Lt | F32x4Gt | F32x4Le | F32x4Ge
            | F64x2Eq | F64x2Ne | F64x2Lt | F64x2Gt | F64x2Le | F64x2Ge | V128And
            | V128Andnot | V128Or | V128Xor | I8x16NarrowI16x8S | I8x16NarrowI16x8U
            | I16x8NarrowI32x4S | I16x8NarrowI32x4U | I8x16Add | I8x16AddSatS | I8x16AddSatU
            | I8x16Sub | I8x16SubSatS | I8x16SubSatU | I8x16MinS | I8x16MinU | I8x16MaxS
            | I8x16MaxU | I8x16AvgrU | I16x8Q15MulrSatS | I16x8Add | I16x8AddSatS
            | I16x8AddSatU | I16x8Sub | I16x8SubSatS | I16x8SubSatU | I16x8Mul | I16x8MinS
            | I16x8MinU | I16x8MaxS | I16x8MaxU | I16x8AvgrU | I16x8ExtmulLowI8x16S
            | I16x8ExtmulHighI8x16S | I16x8ExtmulLowI8x16U | I16x8ExtmulHighI8x16U
            | I32x4Add | I32x4Sub | I32x4Mul | I32x4MinS | I32x4MinU | I32x4MaxS | I32x4MaxU
            | I32x4DotI16x8S | I32x4ExtmulLowI16x8S | I32x4ExtmulHighI16x8S
            | I32x4ExtmulLowI16x8U | I32x4ExtmulHighI16x8U | I64x2Add | I64x2Sub | I64x2Mul
            | I64x2ExtmulLowI32x4S | I64x2ExtmulHighI32x4S | I64x2ExtmulLowI32x4U
            | I64x2ExtmulHighI32x4U | F32x4Add | F32x4Sub | F32x4Mul | F32x4Div | F32x4Min
            | F32x4Max | F32x4Pmin | F32x4Pmax | F64x2Add | F64x2Sub | F64x2Mul | F64x2Div
            | F64x2Min | F64x2Max | F64x2Pmin | F64x2Pmax => self.binop(V128)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ModuleDecoder;
    use crate::validate::validate;

    fn check(wat: &str) -> Result<(), ValidationError> {
        let module = ModuleDecoder::new()
            .decode(&wat::parse_str(wat).unwrap())
            .unwrap();
        validate(&module)
    }

    #[test]
    fn accepts_structured_control() {
        check(
            r#"(module (func (param i32) (result i32)
                (local i32)
                block (result i32)
                    local.get 0
                    if (result i32)
                        i32.const 1
                    else
                        i32.const 2
                    end
                end))"#,
        )
        .unwrap();
    }

    #[test]
    fn accepts_polymorphic_stack_after_branch() {
        // After `br 0` the stack is polymorphic, so the trailing `i32.add`
        // type-checks against unknown operands.
        check(
            r#"(module (func (result i32)
                block (result i32)
                    i32.const 1
                    br 0
                    i32.add
                end))"#,
        )
        .unwrap();
    }

    #[test]
    fn rejects_type_mismatch() {
        let err = check(
            r#"(module (func (result i32)
                i64.const 1
                i32.const 2
                i32.add))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn rejects_stack_underflow() {
        let err = check(r#"(module (func i32.add drop))"#).unwrap_err();
        assert!(matches!(err, ValidationError::StackUnderflow));
    }

    #[test]
    fn rejects_unknown_local() {
        let err = check(r#"(module (func (param i32) local.get 1 drop))"#).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownLocal(1)));
    }

    #[test]
    fn rejects_bad_branch_depth() {
        let err = check(r#"(module (func br 5))"#).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownLabel(5)));
    }

    #[test]
    fn rejects_over_aligned_memory_access() {
        let err = check(
            r#"(module (memory 1) (func (result i32)
                i32.const 0
                i32.load align=8))"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::BadAlignment { align: 3, width: 4 }
        ));
    }

    #[test]
    fn rejects_memory_op_without_memory() {
        let err = check(
            r#"(module (func (result i32)
                i32.const 0
                i32.load))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownMemory(0)));
    }

    #[test]
    fn rejects_set_of_immutable_global() {
        let err = check(
            r#"(module (global i32 (i32.const 0))
                (func i32.const 1 global.set 0))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::GlobalImmutable));
    }

    #[test]
    fn rejects_branch_arity_mismatch() {
        let err = check(
            r#"(module (func
                block (result i32)
                    br 0
                end
                drop))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::StackUnderflow));
    }

    #[test]
    fn rejects_bad_lane_index() {
        let err = check(
            r#"(module (func (result i32)
                v128.const i64x2 0 0
                i8x16.extract_lane_s 16))"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::BadLaneIndex { lane: 16, lanes: 16 }
        ));
    }

    #[test]
    fn rejects_scalar_operand_for_simd_binop() {
        let err = check(
            r#"(module (func (result v128)
                v128.const i32x4 1 2 3 4
                i32.const 1
                i32x4.add))"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn accepts_simd_arithmetic() {
        check(
            r#"(module (func (result i32)
                v128.const i32x4 1 2 3 4
                v128.const i32x4 4 3 2 1
                i32x4.add
                i32x4.extract_lane 0))"#,
        )
        .unwrap();
    }
}
