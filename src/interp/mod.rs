//! The instruction-dispatch interpreter.
//!
//! Execution state is the store's shared operand stack (parameters, locals
//! and operands all live there) plus a per-invocation control-frame stack.
//! Forward jumps go through the `else_ofs`/`end_ofs` annotations the
//! decoder's fix-up pass left on structured openers; branches are resolved
//! purely by unwinding control frames.

mod numeric;
mod simd;

use crate::decode::DecodedModule;
use crate::func::FuncData;
use crate::indices::DefinedFuncIndex;
use crate::module::Module;
use crate::opcode::{Imm, Opcode};
use crate::store::{FuncId, InstanceId, MemoryId, Store};
use crate::traps::Trap;
use crate::types::BlockType;
use crate::values::VMVal;
use smallvec::SmallVec;

/// Calls a function with its parameters already on the operand stack;
/// on success exactly its results replace them.
pub(crate) fn call_func(store: &mut Store, func: FuncId) -> Result<(), Trap> {
    if store.call_depth >= crate::MAX_CALL_DEPTH {
        return Err(Trap::StackOverflow);
    }
    store.call_depth += 1;
    let result = dispatch(store, func);
    store.call_depth -= 1;
    result
}

fn dispatch(store: &mut Store, func: FuncId) -> Result<(), Trap> {
    match &store.funcs[func] {
        FuncData::Host { ty, callee } => {
            let callee = callee.clone();
            let num_params = ty.params().len();
            let num_results = ty.results().len();

            // The array-call convention: one buffer, parameters in, results
            // out in their place.
            let base = store.stack.len() - num_params;
            let mut buf: SmallVec<[VMVal; 8]> = SmallVec::from_slice(&store.stack[base..]);
            buf.resize(num_params.max(num_results), VMVal::default());
            store.stack.truncate(base);

            callee.as_ref()(store, &mut buf)?;

            store.stack.extend_from_slice(&buf[..num_results]);
            Ok(())
        }
        FuncData::Wasm {
            instance,
            module,
            def,
        } => {
            let instance = *instance;
            let def = *def;
            let module = module.clone();

            if let Some(compiled) = store.instances[instance].compiled.get(def) {
                let compiled = compiled.clone();
                return compiled.as_ref()(store, instance, def);
            }

            run(store, &module, instance, def)
        }
    }
}

/// One entry of the control-frame stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    op: Opcode,
    /// Operand stack height on entry, below the block parameters.
    height: usize,
    num_params: usize,
    num_results: usize,
    /// Instruction index of the opener; branch target for loops.
    head_ip: usize,
    /// Instruction index of the matching `end`.
    end_ip: usize,
}

impl Frame {
    /// A branch to this frame carries its params (loop) or results.
    fn branch_arity(&self) -> usize {
        if self.op == Opcode::Loop {
            self.num_params
        } else {
            self.num_results
        }
    }
}

#[inline]
fn push(store: &mut Store, val: VMVal) {
    store.stack.push(val);
}

#[inline]
fn pop(store: &mut Store) -> VMVal {
    store.stack.pop().unwrap()
}

/// Moves the top `n` values down to `height` and drops everything between.
fn compact(store: &mut Store, height: usize, n: usize) {
    let top = store.stack.len() - n;
    store.stack.copy_within(top..top + n, height);
    store.stack.truncate(height + n);
}

fn block_arity(decoded: &DecodedModule, ty: BlockType) -> (usize, usize) {
    match ty {
        BlockType::Empty => (0, 0),
        BlockType::Result(_) => (0, 1),
        BlockType::Func(index) => (decoded.params(index).len(), decoded.results(index).len()),
    }
}

/// Unwinds to the frame `depth` levels up: loops jump back to their
/// header, everything else jumps forward to its `end` (which pops the
/// frame when it executes).
fn do_branch(store: &mut Store, ctrl: &mut SmallVec<[Frame; 8]>, ip: &mut usize, depth: u32) {
    let target = ctrl.len() - 1 - depth as usize;
    let frame = ctrl[target];
    ctrl.truncate(target + 1);
    if frame.op == Opcode::Loop {
        compact(store, frame.height, frame.num_params);
        *ip = frame.head_ip + 1;
    } else {
        *ip = frame.end_ip;
    }
}

#[inline]
fn require_mem(mem: Option<MemoryId>) -> Result<MemoryId, Trap> {
    mem.ok_or(Trap::MemoryOutOfBounds)
}

fn mem_read<const N: usize>(
    store: &Store,
    mem: MemoryId,
    addr: u32,
    offset: u32,
) -> Result<[u8; N], Trap> {
    let data = store.memories[mem].data();
    let start = u64::from(addr) + u64::from(offset);
    if start + N as u64 > data.len() as u64 {
        return Err(Trap::MemoryOutOfBounds);
    }
    let start = start as usize;
    Ok(data[start..start + N].try_into().unwrap())
}

fn mem_write<const N: usize>(
    store: &mut Store,
    mem: MemoryId,
    addr: u32,
    offset: u32,
    bytes: [u8; N],
) -> Result<(), Trap> {
    let data = store.memories[mem].data_mut();
    let start = u64::from(addr) + u64::from(offset);
    if start + N as u64 > data.len() as u64 {
        return Err(Trap::MemoryOutOfBounds);
    }
    let start = start as usize;
    data[start..start + N].copy_from_slice(&bytes);
    Ok(())
}

macro_rules! binop {
    ($store:ident, $get:ident, $mk:ident, $f:expr) => {{
        let b = pop($store).$get();
        let a = pop($store).$get();
        push($store, VMVal::$mk(($f)(a, b)));
    }};
}

macro_rules! binop_try {
    ($store:ident, $get:ident, $mk:ident, $f:expr) => {{
        let b = pop($store).$get();
        let a = pop($store).$get();
        push($store, VMVal::$mk(($f)(a, b)?));
    }};
}

macro_rules! unop {
    ($store:ident, $get:ident, $mk:ident, $f:expr) => {{
        let a = pop($store).$get();
        push($store, VMVal::$mk(($f)(a)));
    }};
}

macro_rules! unop_try {
    ($store:ident, $get:ident, $mk:ident, $f:expr) => {{
        let a = pop($store).$get();
        push($store, VMVal::$mk(($f)(a)?));
    }};
}

macro_rules! relop {
    ($store:ident, $get:ident, $f:expr) => {{
        let b = pop($store).$get();
        let a = pop($store).$get();
        push($store, VMVal::i32(i32::from(($f)(a, b))));
    }};
}

macro_rules! load {
    ($store:ident, $mem:ident, $instr:ident, $n:literal, $mk:ident, $f:expr) => {{
        let m = require_mem($mem)?;
        let Imm::MemArg { offset, .. } = $instr.imm else {
            unreachable!()
        };
        let addr = pop($store).get_u32();
        let bytes: [u8; $n] = mem_read($store, m, addr, offset)?;
        push($store, VMVal::$mk(($f)(bytes)));
    }};
}

macro_rules! stor {
    ($store:ident, $mem:ident, $instr:ident, $get:ident, $f:expr) => {{
        let m = require_mem($mem)?;
        let Imm::MemArg { offset, .. } = $instr.imm else {
            unreachable!()
        };
        let v = pop($store).$get();
        let addr = pop($store).get_u32();
        mem_write($store, m, addr, offset, ($f)(v))?;
    }};
}

macro_rules! vbin {
    ($store:ident, $to:ident, $from:ident, $f:expr) => {{
        let b = simd::$to(pop($store).get_v128());
        let a = simd::$to(pop($store).get_v128());
        push($store, VMVal::v128(simd::$from(simd::map2(a, b, $f))));
    }};
}

macro_rules! vun {
    ($store:ident, $to:ident, $from:ident, $f:expr) => {{
        let a = simd::$to(pop($store).get_v128());
        push($store, VMVal::v128(simd::$from(simd::map(a, $f))));
    }};
}

macro_rules! vcmp {
    ($store:ident, $to:ident, $from:ident, $f:expr) => {{
        let b = simd::$to(pop($store).get_v128());
        let a = simd::$to(pop($store).get_v128());
        let f = $f;
        push(
            $store,
            VMVal::v128(simd::$from(core::array::from_fn(|i| {
                if f(a[i], b[i]) {
                    !0
                } else {
                    0
                }
            }))),
        );
    }};
}

macro_rules! vshift {
    ($store:ident, $to:ident, $from:ident, $bits:literal, $f:expr) => {{
        let count = pop($store).get_u32() % $bits;
        let a = simd::$to(pop($store).get_v128());
        let f = $f;
        push($store, VMVal::v128(simd::$from(simd::map(a, |x| f(x, count)))));
    }};
}

fn run(
    store: &mut Store,
    module: &Module,
    instance: InstanceId,
    def: DefinedFuncIndex,
) -> Result<(), Trap> {
    let decoded = module.decoded();
    let body = decoded.code[def];
    let sig = decoded.func_type(decoded.func_index(def));
    let num_params = decoded.params(sig).len();
    let num_results = decoded.results(sig).len();

    // Parameters were pushed by the caller; reserve and zero the declared
    // locals above them.
    let locals_base = store.stack.len() - num_params;
    let operand_base = locals_base + body.frame_size as usize;
    store.stack.resize(operand_base, VMVal::default());

    let mem = store.instances[instance].memories.values().next().copied();
    let code = decoded.instrs(body.expr);

    let mut ctrl: SmallVec<[Frame; 8]> = SmallVec::new();
    ctrl.push(Frame {
        op: Opcode::Block,
        height: operand_base,
        num_params,
        num_results,
        head_ip: 0,
        end_ip: code.len() - 1,
    });

    let mut ip = 0usize;
    loop {
        let instr = &code[ip];
        let pc = ip;
        ip += 1;

        match instr.op {
            Opcode::Unreachable => return Err(Trap::UnreachableCodeReached),
            Opcode::Nop => {}

            Opcode::Block | Opcode::Loop => {
                let Imm::Block { ty, end_ofs, .. } = instr.imm else {
                    unreachable!()
                };
                let (np, nr) = block_arity(decoded, ty);
                ctrl.push(Frame {
                    op: instr.op,
                    height: store.stack.len() - np,
                    num_params: np,
                    num_results: nr,
                    head_ip: pc,
                    end_ip: pc + end_ofs as usize,
                });
            }
            Opcode::If => {
                let Imm::Block {
                    ty,
                    else_ofs,
                    end_ofs,
                } = instr.imm
                else {
                    unreachable!()
                };
                let cond = pop(store).get_i32();
                let (np, nr) = block_arity(decoded, ty);
                ctrl.push(Frame {
                    op: Opcode::If,
                    height: store.stack.len() - np,
                    num_params: np,
                    num_results: nr,
                    head_ip: pc,
                    end_ip: pc + end_ofs as usize,
                });
                if cond == 0 {
                    if else_ofs != 0 {
                        // Resume just past the `else`.
                        ip = pc + else_ofs as usize + 1;
                    } else {
                        // No else: run the `end` so the frame pops.
                        ip = pc + end_ofs as usize;
                    }
                }
            }
            Opcode::Else => {
                // Fell out of the taken branch: skip to the matching `end`.
                let Imm::Block { end_ofs, .. } = instr.imm else {
                    unreachable!()
                };
                ip = pc + end_ofs as usize;
            }
            Opcode::End => {
                let frame = ctrl.pop().unwrap();
                compact(store, frame.height, frame.num_results);
                if ctrl.is_empty() {
                    break;
                }
            }

            Opcode::Br => {
                let Imm::Label { depth } = instr.imm else {
                    unreachable!()
                };
                do_branch(store, &mut ctrl, &mut ip, depth);
            }
            Opcode::BrIf => {
                let Imm::Label { depth } = instr.imm else {
                    unreachable!()
                };
                if pop(store).get_i32() != 0 {
                    do_branch(store, &mut ctrl, &mut ip, depth);
                }
            }
            Opcode::BrTable => {
                let Imm::LabelTable { targets } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_u32() as usize;
                let labels = decoded.u32s(targets);
                let depth = labels[v.min(labels.len() - 1)];
                do_branch(store, &mut ctrl, &mut ip, depth);
            }
            Opcode::Return => {
                let depth = ctrl.len() as u32 - 1;
                do_branch(store, &mut ctrl, &mut ip, depth);
            }

            Opcode::Call => {
                let Imm::Func { index } = instr.imm else {
                    unreachable!()
                };
                let callee = store.instances[instance].funcs[index];
                call_func(store, callee)?;
            }
            Opcode::CallIndirect => {
                let Imm::CallIndirect { type_index, table } = instr.imm else {
                    unreachable!()
                };
                let tid = store.instances[instance].tables[table];
                let slot = pop(store).get_u32();
                let callee = store.tables[tid]
                    .get(slot)?
                    .ok_or(Trap::IndirectCallToNull)?;

                // The callee's signature must match the declared one
                // exactly: parameter count, result count and each type.
                let actual = store.funcs[callee].ty();
                if actual.params() != decoded.params(type_index)
                    || actual.results() != decoded.results(type_index)
                {
                    return Err(Trap::BadSignature);
                }
                call_func(store, callee)?;
            }

            Opcode::Drop => {
                pop(store);
            }
            Opcode::Select => {
                let cond = pop(store).get_i32();
                let b = pop(store);
                let a = pop(store);
                push(store, if cond != 0 { a } else { b });
            }

            Opcode::LocalGet => {
                let Imm::Local { index } = instr.imm else {
                    unreachable!()
                };
                let val = store.stack[locals_base + index as usize];
                push(store, val);
            }
            Opcode::LocalSet => {
                let Imm::Local { index } = instr.imm else {
                    unreachable!()
                };
                let val = pop(store);
                store.stack[locals_base + index as usize] = val;
            }
            Opcode::LocalTee => {
                let Imm::Local { index } = instr.imm else {
                    unreachable!()
                };
                let val = *store.stack.last().unwrap();
                store.stack[locals_base + index as usize] = val;
            }
            Opcode::GlobalGet => {
                let Imm::Global { index } = instr.imm else {
                    unreachable!()
                };
                let gid = store.instances[instance].globals[index];
                let val = store.globals[gid].get();
                push(store, val);
            }
            Opcode::GlobalSet => {
                let Imm::Global { index } = instr.imm else {
                    unreachable!()
                };
                let gid = store.instances[instance].globals[index];
                let val = pop(store);
                store.globals[gid].set(val);
            }

            Opcode::I32Load => load!(store, mem, instr, 4, i32, i32::from_le_bytes),
            Opcode::I32Load8S => load!(store, mem, instr, 1, i32, |b: [u8; 1]| i32::from(b[0] as i8)),
            Opcode::I32Load8U => load!(store, mem, instr, 1, u32, |b: [u8; 1]| u32::from(b[0])),
            Opcode::I32Load16S => {
                load!(store, mem, instr, 2, i32, |b| i32::from(i16::from_le_bytes(b)))
            }
            Opcode::I32Load16U => {
                load!(store, mem, instr, 2, u32, |b| u32::from(u16::from_le_bytes(b)))
            }
            Opcode::I64Load => load!(store, mem, instr, 8, i64, i64::from_le_bytes),
            Opcode::I64Load8S => load!(store, mem, instr, 1, i64, |b: [u8; 1]| i64::from(b[0] as i8)),
            Opcode::I64Load8U => load!(store, mem, instr, 1, u64, |b: [u8; 1]| u64::from(b[0])),
            Opcode::I64Load16S => {
                load!(store, mem, instr, 2, i64, |b| i64::from(i16::from_le_bytes(b)))
            }
            Opcode::I64Load16U => {
                load!(store, mem, instr, 2, u64, |b| u64::from(u16::from_le_bytes(b)))
            }
            Opcode::I64Load32S => {
                load!(store, mem, instr, 4, i64, |b| i64::from(i32::from_le_bytes(b)))
            }
            Opcode::I64Load32U => {
                load!(store, mem, instr, 4, u64, |b| u64::from(u32::from_le_bytes(b)))
            }
            Opcode::F32Load => load!(store, mem, instr, 4, f32_bits, u32::from_le_bytes),
            Opcode::F64Load => load!(store, mem, instr, 8, f64_bits, u64::from_le_bytes),

            Opcode::I32Store => stor!(store, mem, instr, get_u32, |v: u32| v.to_le_bytes()),
            Opcode::I32Store8 => stor!(store, mem, instr, get_u32, |v: u32| [v as u8]),
            Opcode::I32Store16 => {
                stor!(store, mem, instr, get_u32, |v: u32| (v as u16).to_le_bytes())
            }
            Opcode::I64Store => stor!(store, mem, instr, get_u64, |v: u64| v.to_le_bytes()),
            Opcode::I64Store8 => stor!(store, mem, instr, get_u64, |v: u64| [v as u8]),
            Opcode::I64Store16 => {
                stor!(store, mem, instr, get_u64, |v: u64| (v as u16).to_le_bytes())
            }
            Opcode::I64Store32 => {
                stor!(store, mem, instr, get_u64, |v: u64| (v as u32).to_le_bytes())
            }
            Opcode::F32Store => stor!(store, mem, instr, get_f32_bits, |v: u32| v.to_le_bytes()),
            Opcode::F64Store => stor!(store, mem, instr, get_f64_bits, |v: u64| v.to_le_bytes()),

            Opcode::MemorySize => {
                let m = require_mem(mem)?;
                let pages = store.memories[m].size();
                push(store, VMVal::u32(pages));
            }
            Opcode::MemoryGrow => {
                let m = require_mem(mem)?;
                let delta = pop(store).get_u32();
                let old = store.memories[m].grow(delta);
                push(store, VMVal::i32(old.map_or(-1, |pages| pages as i32)));
            }

            Opcode::I32Const => {
                let Imm::I32 { value } = instr.imm else {
                    unreachable!()
                };
                push(store, VMVal::i32(value));
            }
            Opcode::I64Const => {
                let Imm::I64 { value } = instr.imm else {
                    unreachable!()
                };
                push(store, VMVal::i64(value));
            }
            Opcode::F32Const => {
                let Imm::F32 { bits } = instr.imm else {
                    unreachable!()
                };
                push(store, VMVal::f32_bits(bits));
            }
            Opcode::F64Const => {
                let Imm::F64 { bits } = instr.imm else {
                    unreachable!()
                };
                push(store, VMVal::f64_bits(bits));
            }
            Opcode::V128Const => {
                let Imm::V128 { bits } = instr.imm else {
                    unreachable!()
                };
                push(store, VMVal::v128(bits));
            }

            Opcode::I32Eqz => unop!(store, get_i32, i32, |a| i32::from(a == 0)),
            Opcode::I64Eqz => unop!(store, get_i64, i32, |a| i32::from(a == 0)),
            Opcode::I32Eq => relop!(store, get_i32, |a, b| a == b),
            Opcode::I32Ne => relop!(store, get_i32, |a, b| a != b),
            Opcode::I32LtS => relop!(store, get_i32, |a, b| a < b),
            Opcode::I32LtU => relop!(store, get_u32, |a, b| a < b),
            Opcode::I32GtS => relop!(store, get_i32, |a, b| a > b),
            Opcode::I32GtU => relop!(store, get_u32, |a, b| a > b),
            Opcode::I32LeS => relop!(store, get_i32, |a, b| a <= b),
            Opcode::I32LeU => relop!(store, get_u32, |a, b| a <= b),
            Opcode::I32GeS => relop!(store, get_i32, |a, b| a >= b),
            Opcode::I32GeU => relop!(store, get_u32, |a, b| a >= b),
            Opcode::I64Eq => relop!(store, get_i64, |a, b| a == b),
            Opcode::I64Ne => relop!(store, get_i64, |a, b| a != b),
            Opcode::I64LtS => relop!(store, get_i64, |a, b| a < b),
            Opcode::I64LtU => relop!(store, get_u64, |a, b| a < b),
            Opcode::I64GtS => relop!(store, get_i64, |a, b| a > b),
            Opcode::I64GtU => relop!(store, get_u64, |a, b| a > b),
            Opcode::I64LeS => relop!(store, get_i64, |a, b| a <= b),
            Opcode::I64LeU => relop!(store, get_u64, |a, b| a <= b),
            Opcode::I64GeS => relop!(store, get_i64, |a, b| a >= b),
            Opcode::I64GeU => relop!(store, get_u64, |a, b| a >= b),
            Opcode::F32Eq => relop!(store, get_f32, |a, b| a == b),
            Opcode::F32Ne => relop!(store, get_f32, |a, b| a != b),
            Opcode::F32Lt => relop!(store, get_f32, |a, b| a < b),
            Opcode::F32Gt => relop!(store, get_f32, |a, b| a > b),
            Opcode::F32Le => relop!(store, get_f32, |a, b| a <= b),
            Opcode::F32Ge => relop!(store, get_f32, |a, b| a >= b),
            Opcode::F64Eq => relop!(store, get_f64, |a, b| a == b),
            Opcode::F64Ne => relop!(store, get_f64, |a, b| a != b),
            Opcode::F64Lt => relop!(store, get_f64, |a, b| a < b),
            Opcode::F64Gt => relop!(store, get_f64, |a, b| a > b),
            Opcode::F64Le => relop!(store, get_f64, |a, b| a <= b),
            Opcode::F64Ge => relop!(store, get_f64, |a, b| a >= b),

            Opcode::I32Clz => unop!(store, get_i32, i32, |a: i32| a.leading_zeros() as i32),
            Opcode::I32Ctz => unop!(store, get_i32, i32, |a: i32| a.trailing_zeros() as i32),
            Opcode::I32Popcnt => unop!(store, get_i32, i32, |a: i32| a.count_ones() as i32),
            Opcode::I32Add => binop!(store, get_i32, i32, i32::wrapping_add),
            Opcode::I32Sub => binop!(store, get_i32, i32, i32::wrapping_sub),
            Opcode::I32Mul => binop!(store, get_i32, i32, i32::wrapping_mul),
            Opcode::I32DivS => binop_try!(store, get_i32, i32, numeric::i32_div_s),
            Opcode::I32DivU => binop_try!(store, get_u32, u32, numeric::i32_div_u),
            Opcode::I32RemS => binop_try!(store, get_i32, i32, numeric::i32_rem_s),
            Opcode::I32RemU => binop_try!(store, get_u32, u32, numeric::i32_rem_u),
            Opcode::I32And => binop!(store, get_i32, i32, |a, b| a & b),
            Opcode::I32Or => binop!(store, get_i32, i32, |a, b| a | b),
            Opcode::I32Xor => binop!(store, get_i32, i32, |a, b| a ^ b),
            Opcode::I32Shl => binop!(store, get_i32, i32, |a: i32, b: i32| a.wrapping_shl(b as u32)),
            Opcode::I32ShrS => {
                binop!(store, get_i32, i32, |a: i32, b: i32| a.wrapping_shr(b as u32))
            }
            Opcode::I32ShrU => {
                binop!(store, get_u32, u32, |a: u32, b: u32| a.wrapping_shr(b))
            }
            Opcode::I32Rotl => {
                binop!(store, get_u32, u32, |a: u32, b: u32| a.rotate_left(b))
            }
            Opcode::I32Rotr => {
                binop!(store, get_u32, u32, |a: u32, b: u32| a.rotate_right(b))
            }
            Opcode::I64Clz => unop!(store, get_i64, i64, |a: i64| i64::from(a.leading_zeros())),
            Opcode::I64Ctz => unop!(store, get_i64, i64, |a: i64| i64::from(a.trailing_zeros())),
            Opcode::I64Popcnt => unop!(store, get_i64, i64, |a: i64| i64::from(a.count_ones())),
            Opcode::I64Add => binop!(store, get_i64, i64, i64::wrapping_add),
            Opcode::I64Sub => binop!(store, get_i64, i64, i64::wrapping_sub),
            Opcode::I64Mul => binop!(store, get_i64, i64, i64::wrapping_mul),
            Opcode::I64DivS => binop_try!(store, get_i64, i64, numeric::i64_div_s),
            Opcode::I64DivU => binop_try!(store, get_u64, u64, numeric::i64_div_u),
            Opcode::I64RemS => binop_try!(store, get_i64, i64, numeric::i64_rem_s),
            Opcode::I64RemU => binop_try!(store, get_u64, u64, numeric::i64_rem_u),
            Opcode::I64And => binop!(store, get_i64, i64, |a, b| a & b),
            Opcode::I64Or => binop!(store, get_i64, i64, |a, b| a | b),
            Opcode::I64Xor => binop!(store, get_i64, i64, |a, b| a ^ b),
            Opcode::I64Shl => binop!(store, get_i64, i64, |a: i64, b: i64| a.wrapping_shl(b as u32)),
            Opcode::I64ShrS => {
                binop!(store, get_i64, i64, |a: i64, b: i64| a.wrapping_shr(b as u32))
            }
            Opcode::I64ShrU => {
                binop!(store, get_u64, u64, |a: u64, b: u64| a.wrapping_shr(b as u32))
            }
            Opcode::I64Rotl => {
                binop!(store, get_u64, u64, |a: u64, b: u64| a.rotate_left(b as u32))
            }
            Opcode::I64Rotr => {
                binop!(store, get_u64, u64, |a: u64, b: u64| a.rotate_right(b as u32))
            }

            Opcode::F32Abs => unop!(store, get_f32, f32, f32::abs),
            Opcode::F32Neg => unop!(store, get_f32, f32, |a: f32| -a),
            Opcode::F32Ceil => unop!(store, get_f32, f32, f32::ceil),
            Opcode::F32Floor => unop!(store, get_f32, f32, f32::floor),
            Opcode::F32Trunc => unop!(store, get_f32, f32, f32::trunc),
            Opcode::F32Nearest => unop!(store, get_f32, f32, f32::round_ties_even),
            Opcode::F32Sqrt => unop!(store, get_f32, f32, f32::sqrt),
            Opcode::F32Add => binop!(store, get_f32, f32, |a, b| a + b),
            Opcode::F32Sub => binop!(store, get_f32, f32, |a, b| a - b),
            Opcode::F32Mul => binop!(store, get_f32, f32, |a, b| a * b),
            Opcode::F32Div => binop!(store, get_f32, f32, |a, b| a / b),
            Opcode::F32Min => binop!(store, get_f32, f32, numeric::fmin32),
            Opcode::F32Max => binop!(store, get_f32, f32, numeric::fmax32),
            Opcode::F32Copysign => binop!(store, get_f32, f32, f32::copysign),
            Opcode::F64Abs => unop!(store, get_f64, f64, f64::abs),
            Opcode::F64Neg => unop!(store, get_f64, f64, |a: f64| -a),
            Opcode::F64Ceil => unop!(store, get_f64, f64, f64::ceil),
            Opcode::F64Floor => unop!(store, get_f64, f64, f64::floor),
            Opcode::F64Trunc => unop!(store, get_f64, f64, f64::trunc),
            Opcode::F64Nearest => unop!(store, get_f64, f64, f64::round_ties_even),
            Opcode::F64Sqrt => unop!(store, get_f64, f64, f64::sqrt),
            Opcode::F64Add => binop!(store, get_f64, f64, |a, b| a + b),
            Opcode::F64Sub => binop!(store, get_f64, f64, |a, b| a - b),
            Opcode::F64Mul => binop!(store, get_f64, f64, |a, b| a * b),
            Opcode::F64Div => binop!(store, get_f64, f64, |a, b| a / b),
            Opcode::F64Min => binop!(store, get_f64, f64, numeric::fmin64),
            Opcode::F64Max => binop!(store, get_f64, f64, numeric::fmax64),
            Opcode::F64Copysign => binop!(store, get_f64, f64, f64::copysign),

            Opcode::I32WrapI64 => unop!(store, get_i64, i32, |a| a as i32),
            Opcode::I32TruncF32S => unop_try!(store, get_f32, i32, numeric::i32_trunc_f32),
            Opcode::I32TruncF32U => unop_try!(store, get_f32, u32, numeric::u32_trunc_f32),
            Opcode::I32TruncF64S => unop_try!(store, get_f64, i32, numeric::i32_trunc_f64),
            Opcode::I32TruncF64U => unop_try!(store, get_f64, u32, numeric::u32_trunc_f64),
            Opcode::I64ExtendI32S => unop!(store, get_i32, i64, i64::from),
            Opcode::I64ExtendI32U => unop!(store, get_u32, u64, u64::from),
            Opcode::I64TruncF32S => unop_try!(store, get_f32, i64, numeric::i64_trunc_f32),
            Opcode::I64TruncF32U => unop_try!(store, get_f32, u64, numeric::u64_trunc_f32),
            Opcode::I64TruncF64S => unop_try!(store, get_f64, i64, numeric::i64_trunc_f64),
            Opcode::I64TruncF64U => unop_try!(store, get_f64, u64, numeric::u64_trunc_f64),
            Opcode::F32ConvertI32S => unop!(store, get_i32, f32, |a| a as f32),
            Opcode::F32ConvertI32U => unop!(store, get_u32, f32, |a| a as f32),
            Opcode::F32ConvertI64S => unop!(store, get_i64, f32, |a| a as f32),
            Opcode::F32ConvertI64U => unop!(store, get_u64, f32, |a| a as f32),
            Opcode::F32DemoteF64 => unop!(store, get_f64, f32, |a| a as f32),
            Opcode::F64ConvertI32S => unop!(store, get_i32, f64, f64::from),
            Opcode::F64ConvertI32U => unop!(store, get_u32, f64, f64::from),
            Opcode::F64ConvertI64S => unop!(store, get_i64, f64, |a| a as f64),
            Opcode::F64ConvertI64U => unop!(store, get_u64, f64, |a| a as f64),
            Opcode::F64PromoteF32 => unop!(store, get_f32, f64, f64::from),
            Opcode::I32ReinterpretF32 => unop!(store, get_f32_bits, u32, |a| a),
            Opcode::I64ReinterpretF64 => unop!(store, get_f64_bits, u64, |a| a),
            Opcode::F32ReinterpretI32 => unop!(store, get_u32, f32_bits, |a| a),
            Opcode::F64ReinterpretI64 => unop!(store, get_u64, f64_bits, |a| a),

            Opcode::I32TruncSatF32S => unop!(store, get_f32, i32, |a| a as i32),
            Opcode::I32TruncSatF32U => unop!(store, get_f32, u32, |a| a as u32),
            Opcode::I32TruncSatF64S => unop!(store, get_f64, i32, |a| a as i32),
            Opcode::I32TruncSatF64U => unop!(store, get_f64, u32, |a| a as u32),
            Opcode::I64TruncSatF32S => unop!(store, get_f32, i64, |a| a as i64),
            Opcode::I64TruncSatF32U => unop!(store, get_f32, u64, |a| a as u64),
            Opcode::I64TruncSatF64S => unop!(store, get_f64, i64, |a| a as i64),
            Opcode::I64TruncSatF64U => unop!(store, get_f64, u64, |a| a as u64),

            Opcode::V128Load => load!(store, mem, instr, 16, v128, u128::from_le_bytes),
            Opcode::V128Load8x8S => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_i16x8(core::array::from_fn(|i| i16::from(b[i] as i8)))
            }),
            Opcode::V128Load8x8U => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_u16x8(core::array::from_fn(|i| u16::from(b[i])))
            }),
            Opcode::V128Load16x4S => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_i32x4(core::array::from_fn(|i| {
                    i32::from(i16::from_le_bytes([b[2 * i], b[2 * i + 1]]))
                }))
            }),
            Opcode::V128Load16x4U => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_u32x4(core::array::from_fn(|i| {
                    u32::from(u16::from_le_bytes([b[2 * i], b[2 * i + 1]]))
                }))
            }),
            Opcode::V128Load32x2S => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_i64x2(core::array::from_fn(|i| {
                    i64::from(i32::from_le_bytes(b[4 * i..4 * i + 4].try_into().unwrap()))
                }))
            }),
            Opcode::V128Load32x2U => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_u64x2(core::array::from_fn(|i| {
                    u64::from(u32::from_le_bytes(b[4 * i..4 * i + 4].try_into().unwrap()))
                }))
            }),
            Opcode::V128Load8Splat => load!(store, mem, instr, 1, v128, |b: [u8; 1]| {
                simd::from_u8x16([b[0]; 16])
            }),
            Opcode::V128Load16Splat => load!(store, mem, instr, 2, v128, |b: [u8; 2]| {
                simd::from_u16x8([u16::from_le_bytes(b); 8])
            }),
            Opcode::V128Load32Splat => load!(store, mem, instr, 4, v128, |b: [u8; 4]| {
                simd::from_u32x4([u32::from_le_bytes(b); 4])
            }),
            Opcode::V128Load64Splat => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                simd::from_u64x2([u64::from_le_bytes(b); 2])
            }),
            Opcode::V128Load32Zero => load!(store, mem, instr, 4, v128, |b: [u8; 4]| {
                u128::from(u32::from_le_bytes(b))
            }),
            Opcode::V128Load64Zero => load!(store, mem, instr, 8, v128, |b: [u8; 8]| {
                u128::from(u64::from_le_bytes(b))
            }),
            Opcode::V128Store => stor!(store, mem, instr, get_v128, |v: u128| v.to_le_bytes()),

            Opcode::V128Load8Lane | Opcode::V128Load16Lane | Opcode::V128Load32Lane
            | Opcode::V128Load64Lane => {
                let m = require_mem(mem)?;
                let Imm::MemArgLane { offset, lane, .. } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_v128();
                let addr = pop(store).get_u32();
                let out = match instr.op {
                    Opcode::V128Load8Lane => {
                        let b: [u8; 1] = mem_read(store, m, addr, offset)?;
                        let mut lanes = simd::to_u8x16(v);
                        lanes[lane as usize] = b[0];
                        simd::from_u8x16(lanes)
                    }
                    Opcode::V128Load16Lane => {
                        let b: [u8; 2] = mem_read(store, m, addr, offset)?;
                        let mut lanes = simd::to_u16x8(v);
                        lanes[lane as usize] = u16::from_le_bytes(b);
                        simd::from_u16x8(lanes)
                    }
                    Opcode::V128Load32Lane => {
                        let b: [u8; 4] = mem_read(store, m, addr, offset)?;
                        let mut lanes = simd::to_u32x4(v);
                        lanes[lane as usize] = u32::from_le_bytes(b);
                        simd::from_u32x4(lanes)
                    }
                    _ => {
                        let b: [u8; 8] = mem_read(store, m, addr, offset)?;
                        let mut lanes = simd::to_u64x2(v);
                        lanes[lane as usize] = u64::from_le_bytes(b);
                        simd::from_u64x2(lanes)
                    }
                };
                push(store, VMVal::v128(out));
            }
            Opcode::V128Store8Lane | Opcode::V128Store16Lane | Opcode::V128Store32Lane
            | Opcode::V128Store64Lane => {
                let m = require_mem(mem)?;
                let Imm::MemArgLane { offset, lane, .. } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_v128();
                let addr = pop(store).get_u32();
                match instr.op {
                    Opcode::V128Store8Lane => {
                        mem_write(store, m, addr, offset, [simd::to_u8x16(v)[lane as usize]])?;
                    }
                    Opcode::V128Store16Lane => {
                        let lanes = simd::to_u16x8(v);
                        mem_write(store, m, addr, offset, lanes[lane as usize].to_le_bytes())?;
                    }
                    Opcode::V128Store32Lane => {
                        let lanes = simd::to_u32x4(v);
                        mem_write(store, m, addr, offset, lanes[lane as usize].to_le_bytes())?;
                    }
                    _ => {
                        let lanes = simd::to_u64x2(v);
                        mem_write(store, m, addr, offset, lanes[lane as usize].to_le_bytes())?;
                    }
                }
            }

            Opcode::I8x16Shuffle => {
                let Imm::Shuffle { lanes } = instr.imm else {
                    unreachable!()
                };
                let b = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128(simd::shuffle(a, b, lanes)));
            }
            Opcode::I8x16Swizzle => {
                let s = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128(simd::swizzle(a, s)));
            }

            Opcode::I8x16Splat => {
                let v = pop(store).get_i32() as i8;
                push(store, VMVal::v128(simd::from_i8x16([v; 16])));
            }
            Opcode::I16x8Splat => {
                let v = pop(store).get_i32() as i16;
                push(store, VMVal::v128(simd::from_i16x8([v; 8])));
            }
            Opcode::I32x4Splat => {
                let v = pop(store).get_i32();
                push(store, VMVal::v128(simd::from_i32x4([v; 4])));
            }
            Opcode::I64x2Splat => {
                let v = pop(store).get_i64();
                push(store, VMVal::v128(simd::from_i64x2([v; 2])));
            }
            Opcode::F32x4Splat => {
                let v = pop(store).get_f32();
                push(store, VMVal::v128(simd::from_f32x4([v; 4])));
            }
            Opcode::F64x2Splat => {
                let v = pop(store).get_f64();
                push(store, VMVal::v128(simd::from_f64x2([v; 2])));
            }

            Opcode::I8x16ExtractLaneS => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_i8x16(pop(store).get_v128());
                push(store, VMVal::i32(i32::from(a[lane as usize])));
            }
            Opcode::I8x16ExtractLaneU => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_u8x16(pop(store).get_v128());
                push(store, VMVal::u32(u32::from(a[lane as usize])));
            }
            Opcode::I16x8ExtractLaneS => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_i16x8(pop(store).get_v128());
                push(store, VMVal::i32(i32::from(a[lane as usize])));
            }
            Opcode::I16x8ExtractLaneU => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_u16x8(pop(store).get_v128());
                push(store, VMVal::u32(u32::from(a[lane as usize])));
            }
            Opcode::I32x4ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_i32x4(pop(store).get_v128());
                push(store, VMVal::i32(a[lane as usize]));
            }
            Opcode::I64x2ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_i64x2(pop(store).get_v128());
                push(store, VMVal::i64(a[lane as usize]));
            }
            Opcode::F32x4ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_f32x4(pop(store).get_v128());
                push(store, VMVal::f32(a[lane as usize]));
            }
            Opcode::F64x2ExtractLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let a = simd::to_f64x2(pop(store).get_v128());
                push(store, VMVal::f64(a[lane as usize]));
            }
            Opcode::I8x16ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_i32() as i8;
                let mut a = simd::to_i8x16(pop(store).get_v128());
                a[lane as usize] = v;
                push(store, VMVal::v128(simd::from_i8x16(a)));
            }
            Opcode::I16x8ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_i32() as i16;
                let mut a = simd::to_i16x8(pop(store).get_v128());
                a[lane as usize] = v;
                push(store, VMVal::v128(simd::from_i16x8(a)));
            }
            Opcode::I32x4ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_i32();
                let mut a = simd::to_i32x4(pop(store).get_v128());
                a[lane as usize] = v;
                push(store, VMVal::v128(simd::from_i32x4(a)));
            }
            Opcode::I64x2ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_i64();
                let mut a = simd::to_i64x2(pop(store).get_v128());
                a[lane as usize] = v;
                push(store, VMVal::v128(simd::from_i64x2(a)));
            }
            Opcode::F32x4ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_f32();
                let mut a = simd::to_f32x4(pop(store).get_v128());
                a[lane as usize] = v;
                push(store, VMVal::v128(simd::from_f32x4(a)));
            }
            Opcode::F64x2ReplaceLane => {
                let Imm::Lane { lane } = instr.imm else {
                    unreachable!()
                };
                let v = pop(store).get_f64();
                let mut a = simd::to_f64x2(pop(store).get_v128());
                a[lane as usize] = v;
                push(store, VMVal::v128(simd::from_f64x2(a)));
            }

            Opcode::I8x16Eq => vcmp!(store, to_i8x16, from_i8x16, |a, b| a == b),
            Opcode::I8x16Ne => vcmp!(store, to_i8x16, from_i8x16, |a, b| a != b),
            Opcode::I8x16LtS => vcmp!(store, to_i8x16, from_i8x16, |a, b| a < b),
            Opcode::I8x16LtU => vcmp!(store, to_u8x16, from_u8x16, |a, b| a < b),
            Opcode::I8x16GtS => vcmp!(store, to_i8x16, from_i8x16, |a, b| a > b),
            Opcode::I8x16GtU => vcmp!(store, to_u8x16, from_u8x16, |a, b| a > b),
            Opcode::I8x16LeS => vcmp!(store, to_i8x16, from_i8x16, |a, b| a <= b),
            Opcode::I8x16LeU => vcmp!(store, to_u8x16, from_u8x16, |a, b| a <= b),
            Opcode::I8x16GeS => vcmp!(store, to_i8x16, from_i8x16, |a, b| a >= b),
            Opcode::I8x16GeU => vcmp!(store, to_u8x16, from_u8x16, |a, b| a >= b),
            Opcode::I16x8Eq => vcmp!(store, to_i16x8, from_i16x8, |a, b| a == b),
            Opcode::I16x8Ne => vcmp!(store, to_i16x8, from_i16x8, |a, b| a != b),
            Opcode::I16x8LtS => vcmp!(store, to_i16x8, from_i16x8, |a, b| a < b),
            Opcode::I16x8LtU => vcmp!(store, to_u16x8, from_u16x8, |a, b| a < b),
            Opcode::I16x8GtS => vcmp!(store, to_i16x8, from_i16x8, |a, b| a > b),
            Opcode::I16x8GtU => vcmp!(store, to_u16x8, from_u16x8, |a, b| a > b),
            Opcode::I16x8LeS => vcmp!(store, to_i16x8, from_i16x8, |a, b| a <= b),
            Opcode::I16x8LeU => vcmp!(store, to_u16x8, from_u16x8, |a, b| a <= b),
            Opcode::I16x8GeS => vcmp!(store, to_i16x8, from_i16x8, |a, b| a >= b),
            Opcode::I16x8GeU => vcmp!(store, to_u16x8, from_u16x8, |a, b| a >= b),
            Opcode::I32x4Eq => vcmp!(store, to_i32x4, from_i32x4, |a, b| a == b),
            Opcode::I32x4Ne => vcmp!(store, to_i32x4, from_i32x4, |a, b| a != b),
            Opcode::I32x4LtS => vcmp!(store, to_i32x4, from_i32x4, |a, b| a < b),
            Opcode::I32x4LtU => vcmp!(store, to_u32x4, from_u32x4, |a, b| a < b),
            Opcode::I32x4GtS => vcmp!(store, to_i32x4, from_i32x4, |a, b| a > b),
            Opcode::I32x4GtU => vcmp!(store, to_u32x4, from_u32x4, |a, b| a > b),
            Opcode::I32x4LeS => vcmp!(store, to_i32x4, from_i32x4, |a, b| a <= b),
            Opcode::I32x4LeU => vcmp!(store, to_u32x4, from_u32x4, |a, b| a <= b),
            Opcode::I32x4GeS => vcmp!(store, to_i32x4, from_i32x4, |a, b| a >= b),
            Opcode::I32x4GeU => vcmp!(store, to_u32x4, from_u32x4, |a, b| a >= b),
            Opcode::I64x2Eq => vcmp!(store, to_i64x2, from_i64x2, |a, b| a == b),
            Opcode::I64x2Ne => vcmp!(store, to_i64x2, from_i64x2, |a, b| a != b),
            Opcode::I64x2LtS => vcmp!(store, to_i64x2, from_i64x2, |a, b| a < b),
            Opcode::I64x2GtS => vcmp!(store, to_i64x2, from_i64x2, |a, b| a > b),
            Opcode::I64x2LeS => vcmp!(store, to_i64x2, from_i64x2, |a, b| a <= b),
            Opcode::I64x2GeS => vcmp!(store, to_i64x2, from_i64x2, |a, b| a >= b),
            Opcode::F32x4Eq => vcmp!(store, to_f32x4, from_u32x4, |a, b| a == b),
            Opcode::F32x4Ne => vcmp!(store, to_f32x4, from_u32x4, |a, b| a != b),
            Opcode::F32x4Lt => vcmp!(store, to_f32x4, from_u32x4, |a, b| a < b),
            Opcode::F32x4Gt => vcmp!(store, to_f32x4, from_u32x4, |a, b| a > b),
            Opcode::F32x4Le => vcmp!(store, to_f32x4, from_u32x4, |a, b| a <= b),
            Opcode::F32x4Ge => vcmp!(store, to_f32x4, from_u32x4, |a, b| a >= b),
            Opcode::F64x2Eq => vcmp!(store, to_f64x2, from_u64x2, |a, b| a == b),
            Opcode::F64x2Ne => vcmp!(store, to_f64x2, from_u64x2, |a, b| a != b),
            Opcode::F64x2Lt => vcmp!(store, to_f64x2, from_u64x2, |a, b| a < b),
            Opcode::F64x2Gt => vcmp!(store, to_f64x2, from_u64x2, |a, b| a > b),
            Opcode::F64x2Le => vcmp!(store, to_f64x2, from_u64x2, |a, b| a <= b),
            Opcode::F64x2Ge => vcmp!(store, to_f64x2, from_u64x2, |a, b| a >= b),

            Opcode::V128Not => {
                let a = pop(store).get_v128();
                push(store, VMVal::v128(!a));
            }
            Opcode::V128And => {
                let b = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128(a & b));
            }
            Opcode::V128Andnot => {
                let b = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128(a & !b));
            }
            Opcode::V128Or => {
                let b = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128(a | b));
            }
            Opcode::V128Xor => {
                let b = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128(a ^ b));
            }
            Opcode::V128Bitselect => {
                let c = pop(store).get_v128();
                let b = pop(store).get_v128();
                let a = pop(store).get_v128();
                push(store, VMVal::v128((a & c) | (b & !c)));
            }
            Opcode::V128AnyTrue => {
                let a = pop(store).get_v128();
                push(store, VMVal::i32(i32::from(a != 0)));
            }

            Opcode::I8x16Abs => vun!(store, to_i8x16, from_i8x16, i8::wrapping_abs),
            Opcode::I8x16Neg => vun!(store, to_i8x16, from_i8x16, i8::wrapping_neg),
            Opcode::I8x16Popcnt => {
                vun!(store, to_u8x16, from_u8x16, |a: u8| a.count_ones() as u8)
            }
            Opcode::I8x16AllTrue => {
                let a = simd::to_u8x16(pop(store).get_v128());
                push(store, VMVal::i32(i32::from(a.iter().all(|x| *x != 0))));
            }
            Opcode::I8x16Bitmask => {
                let a = simd::to_i8x16(pop(store).get_v128());
                push(store, VMVal::i32(simd::bitmask(a, |x| x < 0)));
            }
            Opcode::I8x16NarrowI16x8S => {
                let b = simd::to_i16x8(pop(store).get_v128());
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i8; 16] = core::array::from_fn(|i| {
                    if i < 8 {
                        simd::sat8(a[i])
                    } else {
                        simd::sat8(b[i - 8])
                    }
                });
                push(store, VMVal::v128(simd::from_i8x16(out)));
            }
            Opcode::I8x16NarrowI16x8U => {
                let b = simd::to_i16x8(pop(store).get_v128());
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [u8; 16] = core::array::from_fn(|i| {
                    if i < 8 {
                        simd::sat8u(a[i])
                    } else {
                        simd::sat8u(b[i - 8])
                    }
                });
                push(store, VMVal::v128(simd::from_u8x16(out)));
            }
            Opcode::I8x16Shl => {
                vshift!(store, to_u8x16, from_u8x16, 8, |x: u8, c: u32| x.wrapping_shl(c))
            }
            Opcode::I8x16ShrS => {
                vshift!(store, to_i8x16, from_i8x16, 8, |x: i8, c: u32| x.wrapping_shr(c))
            }
            Opcode::I8x16ShrU => {
                vshift!(store, to_u8x16, from_u8x16, 8, |x: u8, c: u32| x.wrapping_shr(c))
            }
            Opcode::I8x16Add => vbin!(store, to_i8x16, from_i8x16, i8::wrapping_add),
            Opcode::I8x16AddSatS => vbin!(store, to_i8x16, from_i8x16, i8::saturating_add),
            Opcode::I8x16AddSatU => vbin!(store, to_u8x16, from_u8x16, u8::saturating_add),
            Opcode::I8x16Sub => vbin!(store, to_i8x16, from_i8x16, i8::wrapping_sub),
            Opcode::I8x16SubSatS => vbin!(store, to_i8x16, from_i8x16, i8::saturating_sub),
            Opcode::I8x16SubSatU => vbin!(store, to_u8x16, from_u8x16, u8::saturating_sub),
            Opcode::I8x16MinS => vbin!(store, to_i8x16, from_i8x16, i8::min),
            Opcode::I8x16MinU => vbin!(store, to_u8x16, from_u8x16, u8::min),
            Opcode::I8x16MaxS => vbin!(store, to_i8x16, from_i8x16, i8::max),
            Opcode::I8x16MaxU => vbin!(store, to_u8x16, from_u8x16, u8::max),
            Opcode::I8x16AvgrU => vbin!(store, to_u8x16, from_u8x16, |a: u8, b: u8| {
                ((u16::from(a) + u16::from(b) + 1) >> 1) as u8
            }),

            Opcode::I16x8ExtaddPairwiseI8x16S => {
                let a = simd::to_i8x16(pop(store).get_v128());
                let out: [i16; 8] =
                    core::array::from_fn(|i| i16::from(a[2 * i]) + i16::from(a[2 * i + 1]));
                push(store, VMVal::v128(simd::from_i16x8(out)));
            }
            Opcode::I16x8ExtaddPairwiseI8x16U => {
                let a = simd::to_u8x16(pop(store).get_v128());
                let out: [u16; 8] =
                    core::array::from_fn(|i| u16::from(a[2 * i]) + u16::from(a[2 * i + 1]));
                push(store, VMVal::v128(simd::from_u16x8(out)));
            }
            Opcode::I32x4ExtaddPairwiseI16x8S => {
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i32; 4] =
                    core::array::from_fn(|i| i32::from(a[2 * i]) + i32::from(a[2 * i + 1]));
                push(store, VMVal::v128(simd::from_i32x4(out)));
            }
            Opcode::I32x4ExtaddPairwiseI16x8U => {
                let a = simd::to_u16x8(pop(store).get_v128());
                let out: [u32; 4] =
                    core::array::from_fn(|i| u32::from(a[2 * i]) + u32::from(a[2 * i + 1]));
                push(store, VMVal::v128(simd::from_u32x4(out)));
            }

            Opcode::I16x8Abs => vun!(store, to_i16x8, from_i16x8, i16::wrapping_abs),
            Opcode::I16x8Neg => vun!(store, to_i16x8, from_i16x8, i16::wrapping_neg),
            Opcode::I16x8Q15MulrSatS => vbin!(store, to_i16x8, from_i16x8, |a: i16, b: i16| {
                simd::sat16((i32::from(a) * i32::from(b) + 0x4000) >> 15)
            }),
            Opcode::I16x8AllTrue => {
                let a = simd::to_u16x8(pop(store).get_v128());
                push(store, VMVal::i32(i32::from(a.iter().all(|x| *x != 0))));
            }
            Opcode::I16x8Bitmask => {
                let a = simd::to_i16x8(pop(store).get_v128());
                push(store, VMVal::i32(simd::bitmask(a, |x| x < 0)));
            }
            Opcode::I16x8NarrowI32x4S => {
                let b = simd::to_i32x4(pop(store).get_v128());
                let a = simd::to_i32x4(pop(store).get_v128());
                let out: [i16; 8] = core::array::from_fn(|i| {
                    if i < 4 {
                        simd::sat16(a[i])
                    } else {
                        simd::sat16(b[i - 4])
                    }
                });
                push(store, VMVal::v128(simd::from_i16x8(out)));
            }
            Opcode::I16x8NarrowI32x4U => {
                let b = simd::to_i32x4(pop(store).get_v128());
                let a = simd::to_i32x4(pop(store).get_v128());
                let out: [u16; 8] = core::array::from_fn(|i| {
                    if i < 4 {
                        simd::sat16u(a[i])
                    } else {
                        simd::sat16u(b[i - 4])
                    }
                });
                push(store, VMVal::v128(simd::from_u16x8(out)));
            }
            Opcode::I16x8ExtendLowI8x16S => {
                let a = simd::to_i8x16(pop(store).get_v128());
                let out: [i16; 8] = core::array::from_fn(|i| i16::from(a[i]));
                push(store, VMVal::v128(simd::from_i16x8(out)));
            }
            Opcode::I16x8ExtendHighI8x16S => {
                let a = simd::to_i8x16(pop(store).get_v128());
                let out: [i16; 8] = core::array::from_fn(|i| i16::from(a[i + 8]));
                push(store, VMVal::v128(simd::from_i16x8(out)));
            }
            Opcode::I16x8ExtendLowI8x16U => {
                let a = simd::to_u8x16(pop(store).get_v128());
                let out: [u16; 8] = core::array::from_fn(|i| u16::from(a[i]));
                push(store, VMVal::v128(simd::from_u16x8(out)));
            }
            Opcode::I16x8ExtendHighI8x16U => {
                let a = simd::to_u8x16(pop(store).get_v128());
                let out: [u16; 8] = core::array::from_fn(|i| u16::from(a[i + 8]));
                push(store, VMVal::v128(simd::from_u16x8(out)));
            }
            Opcode::I16x8Shl => {
                vshift!(store, to_u16x8, from_u16x8, 16, |x: u16, c: u32| x.wrapping_shl(c))
            }
            Opcode::I16x8ShrS => {
                vshift!(store, to_i16x8, from_i16x8, 16, |x: i16, c: u32| x.wrapping_shr(c))
            }
            Opcode::I16x8ShrU => {
                vshift!(store, to_u16x8, from_u16x8, 16, |x: u16, c: u32| x.wrapping_shr(c))
            }
            Opcode::I16x8Add => vbin!(store, to_i16x8, from_i16x8, i16::wrapping_add),
            Opcode::I16x8AddSatS => vbin!(store, to_i16x8, from_i16x8, i16::saturating_add),
            Opcode::I16x8AddSatU => vbin!(store, to_u16x8, from_u16x8, u16::saturating_add),
            Opcode::I16x8Sub => vbin!(store, to_i16x8, from_i16x8, i16::wrapping_sub),
            Opcode::I16x8SubSatS => vbin!(store, to_i16x8, from_i16x8, i16::saturating_sub),
            Opcode::I16x8SubSatU => vbin!(store, to_u16x8, from_u16x8, u16::saturating_sub),
            Opcode::I16x8Mul => vbin!(store, to_i16x8, from_i16x8, i16::wrapping_mul),
            Opcode::I16x8MinS => vbin!(store, to_i16x8, from_i16x8, i16::min),
            Opcode::I16x8MinU => vbin!(store, to_u16x8, from_u16x8, u16::min),
            Opcode::I16x8MaxS => vbin!(store, to_i16x8, from_i16x8, i16::max),
            Opcode::I16x8MaxU => vbin!(store, to_u16x8, from_u16x8, u16::max),
            Opcode::I16x8AvgrU => vbin!(store, to_u16x8, from_u16x8, |a: u16, b: u16| {
                ((u32::from(a) + u32::from(b) + 1) >> 1) as u16
            }),
            Opcode::I16x8ExtmulLowI8x16S => {
                let b = simd::to_i8x16(pop(store).get_v128());
                let a = simd::to_i8x16(pop(store).get_v128());
                let out: [i16; 8] =
                    core::array::from_fn(|i| i16::from(a[i]) * i16::from(b[i]));
                push(store, VMVal::v128(simd::from_i16x8(out)));
            }
            Opcode::I16x8ExtmulHighI8x16S => {
                let b = simd::to_i8x16(pop(store).get_v128());
                let a = simd::to_i8x16(pop(store).get_v128());
                let out: [i16; 8] =
                    core::array::from_fn(|i| i16::from(a[i + 8]) * i16::from(b[i + 8]));
                push(store, VMVal::v128(simd::from_i16x8(out)));
            }
            Opcode::I16x8ExtmulLowI8x16U => {
                let b = simd::to_u8x16(pop(store).get_v128());
                let a = simd::to_u8x16(pop(store).get_v128());
                let out: [u16; 8] =
                    core::array::from_fn(|i| u16::from(a[i]) * u16::from(b[i]));
                push(store, VMVal::v128(simd::from_u16x8(out)));
            }
            Opcode::I16x8ExtmulHighI8x16U => {
                let b = simd::to_u8x16(pop(store).get_v128());
                let a = simd::to_u8x16(pop(store).get_v128());
                let out: [u16; 8] =
                    core::array::from_fn(|i| u16::from(a[i + 8]) * u16::from(b[i + 8]));
                push(store, VMVal::v128(simd::from_u16x8(out)));
            }

            Opcode::I32x4Abs => vun!(store, to_i32x4, from_i32x4, i32::wrapping_abs),
            Opcode::I32x4Neg => vun!(store, to_i32x4, from_i32x4, i32::wrapping_neg),
            Opcode::I32x4AllTrue => {
                let a = simd::to_u32x4(pop(store).get_v128());
                push(store, VMVal::i32(i32::from(a.iter().all(|x| *x != 0))));
            }
            Opcode::I32x4Bitmask => {
                let a = simd::to_i32x4(pop(store).get_v128());
                push(store, VMVal::i32(simd::bitmask(a, |x| x < 0)));
            }
            Opcode::I32x4ExtendLowI16x8S => {
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i32; 4] = core::array::from_fn(|i| i32::from(a[i]));
                push(store, VMVal::v128(simd::from_i32x4(out)));
            }
            Opcode::I32x4ExtendHighI16x8S => {
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i32; 4] = core::array::from_fn(|i| i32::from(a[i + 4]));
                push(store, VMVal::v128(simd::from_i32x4(out)));
            }
            Opcode::I32x4ExtendLowI16x8U => {
                let a = simd::to_u16x8(pop(store).get_v128());
                let out: [u32; 4] = core::array::from_fn(|i| u32::from(a[i]));
                push(store, VMVal::v128(simd::from_u32x4(out)));
            }
            Opcode::I32x4ExtendHighI16x8U => {
                let a = simd::to_u16x8(pop(store).get_v128());
                let out: [u32; 4] = core::array::from_fn(|i| u32::from(a[i + 4]));
                push(store, VMVal::v128(simd::from_u32x4(out)));
            }
            Opcode::I32x4Shl => {
                vshift!(store, to_u32x4, from_u32x4, 32, |x: u32, c: u32| x.wrapping_shl(c))
            }
            Opcode::I32x4ShrS => {
                vshift!(store, to_i32x4, from_i32x4, 32, |x: i32, c: u32| x.wrapping_shr(c))
            }
            Opcode::I32x4ShrU => {
                vshift!(store, to_u32x4, from_u32x4, 32, |x: u32, c: u32| x.wrapping_shr(c))
            }
            Opcode::I32x4Add => vbin!(store, to_i32x4, from_i32x4, i32::wrapping_add),
            Opcode::I32x4Sub => vbin!(store, to_i32x4, from_i32x4, i32::wrapping_sub),
            Opcode::I32x4Mul => vbin!(store, to_i32x4, from_i32x4, i32::wrapping_mul),
            Opcode::I32x4MinS => vbin!(store, to_i32x4, from_i32x4, i32::min),
            Opcode::I32x4MinU => vbin!(store, to_u32x4, from_u32x4, u32::min),
            Opcode::I32x4MaxS => vbin!(store, to_i32x4, from_i32x4, i32::max),
            Opcode::I32x4MaxU => vbin!(store, to_u32x4, from_u32x4, u32::max),
            Opcode::I32x4DotI16x8S => {
                let b = simd::to_i16x8(pop(store).get_v128());
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i32; 4] = core::array::from_fn(|i| {
                    let lo = i32::from(a[2 * i]) * i32::from(b[2 * i]);
                    let hi = i32::from(a[2 * i + 1]) * i32::from(b[2 * i + 1]);
                    lo.wrapping_add(hi)
                });
                push(store, VMVal::v128(simd::from_i32x4(out)));
            }
            Opcode::I32x4ExtmulLowI16x8S => {
                let b = simd::to_i16x8(pop(store).get_v128());
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i32; 4] =
                    core::array::from_fn(|i| i32::from(a[i]) * i32::from(b[i]));
                push(store, VMVal::v128(simd::from_i32x4(out)));
            }
            Opcode::I32x4ExtmulHighI16x8S => {
                let b = simd::to_i16x8(pop(store).get_v128());
                let a = simd::to_i16x8(pop(store).get_v128());
                let out: [i32; 4] =
                    core::array::from_fn(|i| i32::from(a[i + 4]) * i32::from(b[i + 4]));
                push(store, VMVal::v128(simd::from_i32x4(out)));
            }
            Opcode::I32x4ExtmulLowI16x8U => {
                let b = simd::to_u16x8(pop(store).get_v128());
                let a = simd::to_u16x8(pop(store).get_v128());
                let out: [u32; 4] =
                    core::array::from_fn(|i| u32::from(a[i]) * u32::from(b[i]));
                push(store, VMVal::v128(simd::from_u32x4(out)));
            }
            Opcode::I32x4ExtmulHighI16x8U => {
                let b = simd::to_u16x8(pop(store).get_v128());
                let a = simd::to_u16x8(pop(store).get_v128());
                let out: [u32; 4] =
                    core::array::from_fn(|i| u32::from(a[i + 4]) * u32::from(b[i + 4]));
                push(store, VMVal::v128(simd::from_u32x4(out)));
            }

            Opcode::I64x2Abs => vun!(store, to_i64x2, from_i64x2, i64::wrapping_abs),
            Opcode::I64x2Neg => vun!(store, to_i64x2, from_i64x2, i64::wrapping_neg),
            Opcode::I64x2AllTrue => {
                let a = simd::to_u64x2(pop(store).get_v128());
                push(store, VMVal::i32(i32::from(a.iter().all(|x| *x != 0))));
            }
            Opcode::I64x2Bitmask => {
                let a = simd::to_i64x2(pop(store).get_v128());
                push(store, VMVal::i32(simd::bitmask(a, |x| x < 0)));
            }
            Opcode::I64x2ExtendLowI32x4S => {
                let a = simd::to_i32x4(pop(store).get_v128());
                let out: [i64; 2] = core::array::from_fn(|i| i64::from(a[i]));
                push(store, VMVal::v128(simd::from_i64x2(out)));
            }
            Opcode::I64x2ExtendHighI32x4S => {
                let a = simd::to_i32x4(pop(store).get_v128());
                let out: [i64; 2] = core::array::from_fn(|i| i64::from(a[i + 2]));
                push(store, VMVal::v128(simd::from_i64x2(out)));
            }
            Opcode::I64x2ExtendLowI32x4U => {
                let a = simd::to_u32x4(pop(store).get_v128());
                let out: [u64; 2] = core::array::from_fn(|i| u64::from(a[i]));
                push(store, VMVal::v128(simd::from_u64x2(out)));
            }
            Opcode::I64x2ExtendHighI32x4U => {
                let a = simd::to_u32x4(pop(store).get_v128());
                let out: [u64; 2] = core::array::from_fn(|i| u64::from(a[i + 2]));
                push(store, VMVal::v128(simd::from_u64x2(out)));
            }
            Opcode::I64x2Shl => {
                vshift!(store, to_u64x2, from_u64x2, 64, |x: u64, c: u32| x.wrapping_shl(c))
            }
            Opcode::I64x2ShrS => {
                vshift!(store, to_i64x2, from_i64x2, 64, |x: i64, c: u32| x.wrapping_shr(c))
            }
            Opcode::I64x2ShrU => {
                vshift!(store, to_u64x2, from_u64x2, 64, |x: u64, c: u32| x.wrapping_shr(c))
            }
            Opcode::I64x2Add => vbin!(store, to_i64x2, from_i64x2, i64::wrapping_add),
            Opcode::I64x2Sub => vbin!(store, to_i64x2, from_i64x2, i64::wrapping_sub),
            Opcode::I64x2Mul => vbin!(store, to_i64x2, from_i64x2, i64::wrapping_mul),
            Opcode::I64x2ExtmulLowI32x4S => {
                let b = simd::to_i32x4(pop(store).get_v128());
                let a = simd::to_i32x4(pop(store).get_v128());
                let out: [i64; 2] =
                    core::array::from_fn(|i| i64::from(a[i]) * i64::from(b[i]));
                push(store, VMVal::v128(simd::from_i64x2(out)));
            }
            Opcode::I64x2ExtmulHighI32x4S => {
                let b = simd::to_i32x4(pop(store).get_v128());
                let a = simd::to_i32x4(pop(store).get_v128());
                let out: [i64; 2] =
                    core::array::from_fn(|i| i64::from(a[i + 2]) * i64::from(b[i + 2]));
                push(store, VMVal::v128(simd::from_i64x2(out)));
            }
            Opcode::I64x2ExtmulLowI32x4U => {
                let b = simd::to_u32x4(pop(store).get_v128());
                let a = simd::to_u32x4(pop(store).get_v128());
                let out: [u64; 2] =
                    core::array::from_fn(|i| u64::from(a[i]) * u64::from(b[i]));
                push(store, VMVal::v128(simd::from_u64x2(out)));
            }
            Opcode::I64x2ExtmulHighI32x4U => {
                let b = simd::to_u32x4(pop(store).get_v128());
                let a = simd::to_u32x4(pop(store).get_v128());
                let out: [u64; 2] =
                    core::array::from_fn(|i| u64::from(a[i + 2]) * u64::from(b[i + 2]));
                push(store, VMVal::v128(simd::from_u64x2(out)));
            }

            Opcode::F32x4Abs => vun!(store, to_f32x4, from_f32x4, f32::abs),
            Opcode::F32x4Neg => vun!(store, to_f32x4, from_f32x4, |a: f32| -a),
            Opcode::F32x4Sqrt => vun!(store, to_f32x4, from_f32x4, f32::sqrt),
            Opcode::F32x4Ceil => vun!(store, to_f32x4, from_f32x4, f32::ceil),
            Opcode::F32x4Floor => vun!(store, to_f32x4, from_f32x4, f32::floor),
            Opcode::F32x4Trunc => vun!(store, to_f32x4, from_f32x4, f32::trunc),
            Opcode::F32x4Nearest => vun!(store, to_f32x4, from_f32x4, f32::round_ties_even),
            Opcode::F32x4Add => vbin!(store, to_f32x4, from_f32x4, |a, b| a + b),
            Opcode::F32x4Sub => vbin!(store, to_f32x4, from_f32x4, |a, b| a - b),
            Opcode::F32x4Mul => vbin!(store, to_f32x4, from_f32x4, |a, b| a * b),
            Opcode::F32x4Div => vbin!(store, to_f32x4, from_f32x4, |a, b| a / b),
            Opcode::F32x4Min => vbin!(store, to_f32x4, from_f32x4, numeric::fmin32),
            Opcode::F32x4Max => vbin!(store, to_f32x4, from_f32x4, numeric::fmax32),
            Opcode::F32x4Pmin => vbin!(store, to_f32x4, from_f32x4, |a, b| if b < a { b } else { a }),
            Opcode::F32x4Pmax => vbin!(store, to_f32x4, from_f32x4, |a, b| if a < b { b } else { a }),
            Opcode::F64x2Abs => vun!(store, to_f64x2, from_f64x2, f64::abs),
            Opcode::F64x2Neg => vun!(store, to_f64x2, from_f64x2, |a: f64| -a),
            Opcode::F64x2Sqrt => vun!(store, to_f64x2, from_f64x2, f64::sqrt),
            Opcode::F64x2Ceil => vun!(store, to_f64x2, from_f64x2, f64::ceil),
            Opcode::F64x2Floor => vun!(store, to_f64x2, from_f64x2, f64::floor),
            Opcode::F64x2Trunc => vun!(store, to_f64x2, from_f64x2, f64::trunc),
            Opcode::F64x2Nearest => vun!(store, to_f64x2, from_f64x2, f64::round_ties_even),
            Opcode::F64x2Add => vbin!(store, to_f64x2, from_f64x2, |a, b| a + b),
            Opcode::F64x2Sub => vbin!(store, to_f64x2, from_f64x2, |a, b| a - b),
            Opcode::F64x2Mul => vbin!(store, to_f64x2, from_f64x2, |a, b| a * b),
            Opcode::F64x2Div => vbin!(store, to_f64x2, from_f64x2, |a, b| a / b),
            Opcode::F64x2Min => vbin!(store, to_f64x2, from_f64x2, numeric::fmin64),
            Opcode::F64x2Max => vbin!(store, to_f64x2, from_f64x2, numeric::fmax64),
            Opcode::F64x2Pmin => vbin!(store, to_f64x2, from_f64x2, |a, b| if b < a { b } else { a }),
            Opcode::F64x2Pmax => vbin!(store, to_f64x2, from_f64x2, |a, b| if a < b { b } else { a }),

            Opcode::F32x4DemoteF64x2Zero => {
                let a = simd::to_f64x2(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_f32x4([a[0] as f32, a[1] as f32, 0.0, 0.0])),
                );
            }
            Opcode::F64x2PromoteLowF32x4 => {
                let a = simd::to_f32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_f64x2([f64::from(a[0]), f64::from(a[1])])),
                );
            }
            Opcode::I32x4TruncSatF32x4S => {
                let a = simd::to_f32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_i32x4(core::array::from_fn(|i| a[i] as i32))),
                );
            }
            Opcode::I32x4TruncSatF32x4U => {
                let a = simd::to_f32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_u32x4(core::array::from_fn(|i| a[i] as u32))),
                );
            }
            Opcode::I32x4TruncSatF64x2SZero => {
                let a = simd::to_f64x2(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_i32x4([a[0] as i32, a[1] as i32, 0, 0])),
                );
            }
            Opcode::I32x4TruncSatF64x2UZero => {
                let a = simd::to_f64x2(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_u32x4([a[0] as u32, a[1] as u32, 0, 0])),
                );
            }
            Opcode::F32x4ConvertI32x4S => {
                let a = simd::to_i32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_f32x4(core::array::from_fn(|i| a[i] as f32))),
                );
            }
            Opcode::F32x4ConvertI32x4U => {
                let a = simd::to_u32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_f32x4(core::array::from_fn(|i| a[i] as f32))),
                );
            }
            Opcode::F64x2ConvertLowI32x4S => {
                let a = simd::to_i32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_f64x2([f64::from(a[0]), f64::from(a[1])])),
                );
            }
            Opcode::F64x2ConvertLowI32x4U => {
                let a = simd::to_u32x4(pop(store).get_v128());
                push(
                    store,
                    VMVal::v128(simd::from_f64x2([f64::from(a[0]), f64::from(a[1])])),
                );
            }
        }
    }

    // Return: move the results down over the parameters and locals.
    let top = store.stack.len() - num_results;
    store.stack.copy_within(top..top + num_results, locals_base);
    store.stack.truncate(locals_base + num_results);
    Ok(())
}
