use crate::decode::reader::Reader;
use crate::decode::{
    DataSegment, DecodedModule, ElementSegment, FuncBody, FuncTypeDesc, Import, LocalDecl,
};
use crate::errors::DecodeError;
use crate::indices::{EntityIndex, FuncIndex, GlobalIndex, MemoryIndex, TableIndex, TypeIndex};
use crate::opcode::{Imm, ImmKind, Instr, OpSet, Opcode};
use crate::types::{BlockType, GlobalType, Limits, MemoryType, Span, TableType};
use alloc::string::ToString;
use alloc::vec::Vec;

mod section {
    pub const CUSTOM: u8 = 0;
    pub const TYPE: u8 = 1;
    pub const IMPORT: u8 = 2;
    pub const FUNCTION: u8 = 3;
    pub const TABLE: u8 = 4;
    pub const MEMORY: u8 = 5;
    pub const GLOBAL: u8 = 6;
    pub const EXPORT: u8 = 7;
    pub const START: u8 = 8;
    pub const ELEMENT: u8 = 9;
    pub const CODE: u8 = 10;
    pub const DATA: u8 = 11;
}

const WASM_MAGIC: [u8; 4] = *b"\0asm";
const WASM_VERSION: u32 = 1;
const FUNC_TYPE_TAG: u8 = 0x60;
const FUNCREF_TYPE: u8 = 0x70;

/// Named vectors are appended to their pools in fixed-size batches so a
/// hostile item count cannot force a huge up-front allocation.
const VEC_BATCH: usize = 128;

fn batch(count: u32) -> usize {
    (count as usize).min(VEC_BATCH)
}

/// Decodes the binary format into a [`DecodedModule`].
///
/// The decoder checks only grammar-level properties (encodings, section
/// order, balanced control structure); index ranges and types are the
/// validator's job.
pub struct ModuleDecoder {
    result: DecodedModule,
    num_declared_funcs: u32,
}

impl ModuleDecoder {
    pub fn new() -> Self {
        Self {
            result: DecodedModule::default(),
            num_declared_funcs: 0,
        }
    }

    pub fn decode(mut self, data: &[u8]) -> Result<DecodedModule, DecodeError> {
        let mut r = Reader::new(data);

        let magic = r.take(4)?;
        if magic != WASM_MAGIC {
            return Err(DecodeError::BadMagic);
        }
        let version = u32::from_le_bytes(r.take(4)?.try_into().unwrap());
        if version != WASM_VERSION {
            return Err(DecodeError::BadVersion(version));
        }

        let mut last_section = 0u8;
        while !r.is_empty() {
            let offset = r.pos();
            let id = r.u8()?;
            let size = r.u32_leb()? as usize;
            let mut body = r.split(size)?;

            if id != section::CUSTOM {
                if id > section::DATA {
                    return Err(DecodeError::UnknownSection { id, offset });
                }
                if id <= last_section {
                    return Err(DecodeError::SectionOrder { id, offset });
                }
                last_section = id;
            }

            match id {
                section::CUSTOM => self.read_custom_section(&mut body),
                section::TYPE => self.read_type_section(&mut body)?,
                section::IMPORT => self.read_import_section(&mut body)?,
                section::FUNCTION => self.read_function_section(&mut body)?,
                section::TABLE => self.read_table_section(&mut body)?,
                section::MEMORY => self.read_memory_section(&mut body)?,
                section::GLOBAL => self.read_global_section(&mut body)?,
                section::EXPORT => self.read_export_section(&mut body)?,
                section::START => {
                    self.result.start = Some(FuncIndex::from_u32(body.u32_leb()?));
                }
                section::ELEMENT => self.read_element_section(&mut body)?,
                section::CODE => self.read_code_section(&mut body)?,
                section::DATA => self.read_data_section(&mut body)?,
                _ => unreachable!(),
            }

            if id != section::CUSTOM && !body.is_empty() {
                return Err(DecodeError::SectionSizeMismatch(body.pos()));
            }
        }

        if self.result.code.len() != self.num_declared_funcs as usize {
            return Err(DecodeError::CodeCountMismatch);
        }

        self.fix_up_structured_ops()?;

        Ok(self.result)
    }

    fn read_custom_section(&mut self, r: &mut Reader<'_>) {
        // Custom sections may not fail decoding; a bad name is only worth a
        // warning and the body is skipped either way.
        match r.name() {
            Ok(name) => tracing::debug!("skipping custom section `{name}`"),
            Err(_) => tracing::warn!("custom section with invalid UTF-8 name"),
        }
    }

    fn read_type_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.types.reserve_exact(batch(count));

        for _ in 0..count {
            let offset = r.pos();
            let tag = r.u8()?;
            if tag != FUNC_TYPE_TAG {
                return Err(DecodeError::BadValType { ty: tag, offset });
            }
            let params = self.read_val_types(r)?;
            let results = self.read_val_types(r)?;
            self.result.types.push(FuncTypeDesc { params, results });
        }

        Ok(())
    }

    fn read_val_types(&mut self, r: &mut Reader<'_>) -> Result<Span, DecodeError> {
        let count = r.u32_leb()?;
        let start = self.result.val_types.len();
        self.result.val_types.reserve(batch(count));

        for _ in 0..count {
            let ty = r.val_type()?;
            self.result.val_types.push(ty);
        }

        Ok(Span::new(start, self.result.val_types.len() - start))
    }

    fn read_limits(&mut self, r: &mut Reader<'_>) -> Result<Limits, DecodeError> {
        let offset = r.pos();
        let flags = r.u8()?;
        match flags {
            0x00 => Ok(Limits {
                min: r.u32_leb()?,
                max: None,
            }),
            0x01 => Ok(Limits {
                min: r.u32_leb()?,
                max: Some(r.u32_leb()?),
            }),
            _ => Err(DecodeError::BadLimitsFlags { flags, offset }),
        }
    }

    fn read_table_type(&mut self, r: &mut Reader<'_>) -> Result<TableType, DecodeError> {
        let offset = r.pos();
        let ty = r.u8()?;
        if ty != FUNCREF_TYPE {
            return Err(DecodeError::BadElemType { ty, offset });
        }
        Ok(TableType {
            limits: self.read_limits(r)?,
        })
    }

    fn read_global_type(&mut self, r: &mut Reader<'_>) -> Result<GlobalType, DecodeError> {
        let content = r.val_type()?;
        let offset = r.pos();
        let flag = r.u8()?;
        if flag > 1 {
            return Err(DecodeError::BadMutability { flag, offset });
        }
        Ok(GlobalType {
            content,
            mutable: flag == 1,
        })
    }

    fn read_import_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.imports.reserve(batch(count));

        for _ in 0..count {
            let module = r.name()?.to_string();
            let field = r.name()?.to_string();

            let offset = r.pos();
            let kind = r.u8()?;
            let index = match kind {
                0x00 => {
                    let ty = TypeIndex::from_u32(r.u32_leb()?);
                    self.result.num_imported_functions += 1;
                    EntityIndex::Function(self.result.functions.push(ty))
                }
                0x01 => {
                    let ty = self.read_table_type(r)?;
                    self.result.num_imported_tables += 1;
                    EntityIndex::Table(self.result.tables.push(ty))
                }
                0x02 => {
                    let limits = self.read_limits(r)?;
                    self.result.num_imported_memories += 1;
                    EntityIndex::Memory(self.result.memories.push(MemoryType { limits }))
                }
                0x03 => {
                    let ty = self.read_global_type(r)?;
                    self.result.num_imported_globals += 1;
                    EntityIndex::Global(self.result.globals.push(ty))
                }
                _ => return Err(DecodeError::BadExternKind { kind, offset }),
            };

            self.result.imports.push(Import {
                module,
                field,
                index,
            });
        }

        Ok(())
    }

    fn read_function_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.functions.reserve_exact(batch(count));
        self.num_declared_funcs = count;

        for _ in 0..count {
            let ty = TypeIndex::from_u32(r.u32_leb()?);
            self.result.functions.push(ty);
        }

        Ok(())
    }

    fn read_table_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.tables.reserve_exact(batch(count));

        for _ in 0..count {
            let ty = self.read_table_type(r)?;
            self.result.tables.push(ty);
        }

        Ok(())
    }

    fn read_memory_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.memories.reserve_exact(batch(count));

        for _ in 0..count {
            let limits = self.read_limits(r)?;
            self.result.memories.push(MemoryType { limits });
        }

        Ok(())
    }

    fn read_global_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.globals.reserve_exact(batch(count));
        self.result.global_initializers.reserve_exact(batch(count));

        for _ in 0..count {
            let ty = self.read_global_type(r)?;
            let init = self.read_expr(r)?;
            self.result.globals.push(ty);
            self.result.global_initializers.push(init);
        }

        Ok(())
    }

    fn read_export_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.exports.reserve(batch(count));

        for _ in 0..count {
            let name = r.name()?.to_string();

            let offset = r.pos();
            let kind = r.u8()?;
            let raw = r.u32_leb()?;
            let index = match kind {
                0x00 => EntityIndex::Function(FuncIndex::from_u32(raw)),
                0x01 => EntityIndex::Table(TableIndex::from_u32(raw)),
                0x02 => EntityIndex::Memory(MemoryIndex::from_u32(raw)),
                0x03 => EntityIndex::Global(GlobalIndex::from_u32(raw)),
                _ => return Err(DecodeError::BadExternKind { kind, offset }),
            };

            if self.result.exports.insert(name.clone(), index).is_some() {
                return Err(DecodeError::DuplicateExport(name));
            }
        }

        Ok(())
    }

    fn read_element_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.element_segments.reserve(batch(count));

        for _ in 0..count {
            let table = TableIndex::from_u32(r.u32_leb()?);
            let offset = self.read_expr(r)?;

            let num_funcs = r.u32_leb()?;
            let start = self.result.u32s.len();
            self.result.u32s.reserve(batch(num_funcs));
            for _ in 0..num_funcs {
                let index = r.u32_leb()?;
                self.result.u32s.push(index);
            }
            let funcs = Span::new(start, self.result.u32s.len() - start);

            self.result.element_segments.push(ElementSegment {
                table,
                offset,
                funcs,
            });
        }

        Ok(())
    }

    fn read_code_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        if count != self.num_declared_funcs {
            return Err(DecodeError::CodeCountMismatch);
        }
        self.result.code.reserve_exact(batch(count));

        for index in 0..count {
            let size = r.u32_leb()? as usize;
            let mut body = r.split(size)?;

            let func_index = FuncIndex::from_u32(self.result.num_imported_functions + index);
            let sig = *self
                .result
                .functions
                .get(func_index)
                .ok_or(DecodeError::CodeCountMismatch)?;
            // Signature indices are range-checked by the validator; an
            // out-of-range one here just means an unknown parameter count.
            let num_params = self
                .result
                .types
                .get(sig)
                .map_or(0, |ty| ty.params.len() as u32);

            let locals = self.read_locals(&mut body)?;
            let num_locals = self
                .result
                .local_decls(locals)
                .iter()
                .try_fold(0u32, |acc, decl| acc.checked_add(decl.count))
                .ok_or(DecodeError::TooManyLocals(body.pos()))?;
            let frame_size = num_params
                .checked_add(num_locals)
                .filter(|size| *size <= crate::MAX_FUNCTION_LOCALS)
                .ok_or(DecodeError::TooManyLocals(body.pos()))?;

            let expr = self.read_expr(&mut body)?;
            if !body.is_empty() {
                return Err(DecodeError::BodySizeMismatch(body.pos()));
            }

            self.result.code.push(FuncBody {
                locals,
                expr,
                frame_size,
                num_locals,
            });
        }

        Ok(())
    }

    fn read_locals(&mut self, r: &mut Reader<'_>) -> Result<Span, DecodeError> {
        let count = r.u32_leb()?;
        let start = self.result.local_decls.len();
        self.result.local_decls.reserve(batch(count));

        for _ in 0..count {
            let count = r.u32_leb()?;
            let ty = r.val_type()?;
            self.result.local_decls.push(LocalDecl { count, ty });
        }

        Ok(Span::new(start, self.result.local_decls.len() - start))
    }

    fn read_data_section(&mut self, r: &mut Reader<'_>) -> Result<(), DecodeError> {
        let count = r.u32_leb()?;
        self.result.data_segments.reserve(batch(count));

        for _ in 0..count {
            let memory = MemoryIndex::from_u32(r.u32_leb()?);
            let offset = self.read_expr(r)?;

            let len = r.u32_leb()? as usize;
            let start = self.result.bytes.len();
            let contents = r.take(len)?;
            self.result.bytes.extend_from_slice(contents);
            let bytes = Span::new(start, len);

            self.result.data_segments.push(DataSegment {
                memory,
                offset,
                bytes,
            });
        }

        Ok(())
    }

    /// Decodes one expression instruction by instruction until the control
    /// depth introduced by the implicit body block reaches zero.
    fn read_expr(&mut self, r: &mut Reader<'_>) -> Result<Span, DecodeError> {
        let start = self.result.instrs.len();
        let mut depth = 1u32;

        loop {
            let instr = self.read_instr(r)?;

            match instr.op {
                Opcode::Block | Opcode::Loop | Opcode::If => depth += 1,
                Opcode::End => {
                    depth -= 1;
                    if depth == 0 {
                        self.result.instrs.push(instr);
                        break;
                    }
                }
                _ => {}
            }

            self.result.instrs.push(instr);
        }

        Ok(Span::new(start, self.result.instrs.len() - start))
    }

    fn read_instr(&mut self, r: &mut Reader<'_>) -> Result<Instr, DecodeError> {
        let offset = r.pos();
        let byte = r.u8()?;
        let (set, secondary) = match byte {
            0xFC => (OpSet::TruncSat, r.u32_leb()?),
            0xFD => (OpSet::Simd, r.u32_leb()?),
            b => (OpSet::Main, u32::from(b)),
        };

        let op = Opcode::decode(set, secondary).ok_or(DecodeError::BadOpcode {
            set: set.prefix(),
            byte: secondary,
            offset,
        })?;

        let imm = match op.immediate() {
            ImmKind::None => Imm::None,
            ImmKind::BlockType => Imm::Block {
                ty: r.block_type()?,
                else_ofs: 0,
                end_ofs: 0,
            },
            ImmKind::Label => Imm::Label { depth: r.u32_leb()? },
            ImmKind::LabelTable => {
                let count = r.u32_leb()?;
                let start = self.result.u32s.len();
                self.result.u32s.reserve(batch(count) + 1);
                for _ in 0..count {
                    let target = r.u32_leb()?;
                    self.result.u32s.push(target);
                }
                // The default target is stored as the final entry.
                let default = r.u32_leb()?;
                self.result.u32s.push(default);
                Imm::LabelTable {
                    targets: Span::new(start, self.result.u32s.len() - start),
                }
            }
            ImmKind::Func => Imm::Func {
                index: FuncIndex::from_u32(r.u32_leb()?),
            },
            ImmKind::CallIndirect => {
                let type_index = TypeIndex::from_u32(r.u32_leb()?);
                let table_offset = r.pos();
                if r.u8()? != 0 {
                    return Err(DecodeError::BadReservedByte(table_offset));
                }
                Imm::CallIndirect {
                    type_index,
                    table: TableIndex::from_u32(0),
                }
            }
            ImmKind::Local => Imm::Local { index: r.u32_leb()? },
            ImmKind::Global => Imm::Global {
                index: GlobalIndex::from_u32(r.u32_leb()?),
            },
            ImmKind::MemArg => Imm::MemArg {
                align: r.u32_leb()?,
                offset: r.u32_leb()?,
            },
            ImmKind::MemArgLane => Imm::MemArgLane {
                align: r.u32_leb()?,
                offset: r.u32_leb()?,
                lane: r.u8()?,
            },
            ImmKind::ZeroByte => {
                let reserved_offset = r.pos();
                if r.u8()? != 0 {
                    return Err(DecodeError::BadReservedByte(reserved_offset));
                }
                Imm::None
            }
            ImmKind::I32 => Imm::I32 { value: r.s32_leb()? },
            ImmKind::I64 => Imm::I64 { value: r.s64_leb()? },
            ImmKind::F32 => Imm::F32 { bits: r.f32_bits()? },
            ImmKind::F64 => Imm::F64 { bits: r.f64_bits()? },
            ImmKind::V128 => Imm::V128 {
                bits: r.v128_bits()?,
            },
            ImmKind::Lane => Imm::Lane { lane: r.u8()? },
            ImmKind::Shuffle => {
                let bytes = r.take(16)?;
                Imm::Shuffle {
                    lanes: bytes.try_into().unwrap(),
                }
            }
        };

        // `else` needs a slot for its forward jump to `end` even though it
        // carries no immediate in the encoding.
        let imm = if op == Opcode::Else {
            Imm::Block {
                ty: BlockType::Empty,
                else_ofs: 0,
                end_ofs: 0,
            }
        } else {
            imm
        };

        Ok(Instr { op, imm })
    }

    /// Resolves `else_ofs`/`end_ofs` on every structured opener of every
    /// function body with a small offset stack, after all bodies have been
    /// appended.
    fn fix_up_structured_ops(&mut self) -> Result<(), DecodeError> {
        let bodies: Vec<Span> = self.result.code.values().map(|body| body.expr).collect();
        for expr in bodies {
            self.fix_up_expr(expr)?;
        }
        Ok(())
    }

    fn fix_up_expr(&mut self, expr: Span) -> Result<(), DecodeError> {
        let range = expr.range();
        let last = range.end - 1;
        let mut openers: Vec<(usize, Option<usize>)> = Vec::new();

        for i in range {
            match self.result.instrs[i].op {
                Opcode::Block | Opcode::Loop | Opcode::If => openers.push((i, None)),
                Opcode::Else => {
                    let Some((opener, else_slot)) = openers.last_mut() else {
                        return Err(DecodeError::UnbalancedControl(i));
                    };
                    if else_slot.is_some() {
                        return Err(DecodeError::UnbalancedControl(i));
                    }
                    let opener = *opener;
                    *else_slot = Some(i);
                    if let Imm::Block { else_ofs, .. } = &mut self.result.instrs[opener].imm {
                        *else_ofs = (i - opener) as u32;
                    }
                }
                Opcode::End => match openers.pop() {
                    Some((opener, else_idx)) => {
                        if let Imm::Block { end_ofs, .. } = &mut self.result.instrs[opener].imm {
                            *end_ofs = (i - opener) as u32;
                        }
                        if let Some(e) = else_idx {
                            if let Imm::Block { end_ofs, .. } = &mut self.result.instrs[e].imm {
                                *end_ofs = (i - e) as u32;
                            }
                        }
                    }
                    // The expression's own terminating `end`.
                    None if i == last => {}
                    None => return Err(DecodeError::UnbalancedControl(i)),
                },
                _ => {}
            }
        }

        if openers.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::UnbalancedControl(last))
        }
    }
}

impl Default for ModuleDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValType;

    fn decode(bytes: &[u8]) -> Result<DecodedModule, DecodeError> {
        ModuleDecoder::new().decode(bytes)
    }

    fn decode_wat(wat: &str) -> DecodedModule {
        decode(&wat::parse_str(wat).unwrap()).unwrap()
    }

    #[test]
    fn rejects_bad_magic_and_version() {
        assert!(matches!(
            decode(b"\0wasm\x01\0\0\0"),
            Err(DecodeError::BadMagic)
        ));
        assert!(matches!(
            decode(b"\0asm\x02\0\0\0"),
            Err(DecodeError::BadVersion(2))
        ));
        assert!(matches!(
            decode(b"\0asm"),
            Err(DecodeError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn decodes_empty_module() {
        let module = decode(b"\0asm\x01\0\0\0").unwrap();
        assert_eq!(module.types.len(), 0);
        assert_eq!(module.functions.len(), 0);
    }

    #[test]
    fn rejects_out_of_order_sections() {
        // A function section (3) followed by a type section (1).
        let bytes = b"\0asm\x01\0\0\0\x03\x02\x01\x00\x01\x04\x01\x60\x00\x00";
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::SectionOrder { id: 1, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_sections() {
        // Two type sections.
        let bytes = b"\0asm\x01\0\0\0\x01\x04\x01\x60\x00\x00\x01\x04\x01\x60\x00\x00";
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::SectionOrder { id: 1, .. })
        ));
    }

    #[test]
    fn rejects_unknown_section() {
        let bytes = b"\0asm\x01\0\0\0\x0D\x00";
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::UnknownSection { id: 13, .. })
        ));
    }

    #[test]
    fn custom_sections_may_repeat() {
        // Two custom sections, one with a bad name; both are skipped.
        let bytes = b"\0asm\x01\0\0\0\x00\x03\x02hi\x00\x02\x01\xFF";
        assert!(decode(bytes).is_ok());
    }

    #[test]
    fn rejects_empty_expression() {
        // A global whose init expression is empty (no `end`).
        let bytes = b"\0asm\x01\0\0\0\x06\x03\x01\x7F\x00";
        assert!(decode(bytes).is_err());
    }

    #[test]
    fn decodes_pools_and_spans() {
        let module = decode_wat(
            r#"(module
                (type (func (param i32 i32) (result i32)))
                (func (type 0) (local i64 i64 f32)
                    local.get 0
                    local.get 1
                    i32.add)
                (export "add" (func 0)))"#,
        );

        assert_eq!(module.types.len(), 1);
        let ty = module.types.values().next().unwrap();
        assert_eq!(module.val_types(ty.params), &[ValType::I32, ValType::I32]);
        assert_eq!(module.val_types(ty.results), &[ValType::I32]);

        let body = module.code.values().next().unwrap();
        assert_eq!(body.frame_size, 5);
        assert_eq!(body.num_locals, 3);

        let code = module.instrs(body.expr);
        assert_eq!(code.last().unwrap().op, Opcode::End);
        assert!(module.exports.contains_key("add"));

        // Every span stays inside its pool.
        for ty in module.types.values() {
            assert!(ty.params.range().end <= module.val_types.len());
            assert!(ty.results.range().end <= module.val_types.len());
        }
        for body in module.code.values() {
            assert!(body.expr.range().end <= module.instrs.len());
            assert!(body.locals.range().end <= module.local_decls.len());
        }
    }

    #[test]
    fn fix_up_annotates_openers() {
        let module = decode_wat(
            r#"(module
                (func (param i32) (result i32)
                    local.get 0
                    if (result i32)
                        i32.const 1
                    else
                        i32.const 2
                    end))"#,
        );

        let body = module.code.values().next().unwrap();
        let code = module.instrs(body.expr);
        let (if_pos, if_instr) = code
            .iter()
            .enumerate()
            .find(|(_, i)| i.op == Opcode::If)
            .unwrap();

        let Imm::Block {
            else_ofs, end_ofs, ..
        } = if_instr.imm
        else {
            panic!("if without block immediate")
        };
        assert_ne!(else_ofs, 0);
        assert_eq!(code[if_pos + else_ofs as usize].op, Opcode::Else);
        assert_eq!(code[if_pos + end_ofs as usize].op, Opcode::End);

        // The else's own end offset lands on the same `end`.
        let Imm::Block {
            end_ofs: else_end, ..
        } = code[if_pos + else_ofs as usize].imm
        else {
            panic!("else without block immediate")
        };
        assert_eq!(
            if_pos + else_ofs as usize + else_end as usize,
            if_pos + end_ofs as usize
        );
    }
}
