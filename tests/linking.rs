//! Cross-module linking tests: imports resolved through the linker,
//! shared memories, host modules and link-time failures.

use anyhow::Result;
use reef_vm::{
    ConstExprEvaluator, Error, FuncType, HostModule, Linker, Module, Store, Trap, VMVal, Val,
    ValType,
};

#[test_log::test]
fn shared_memory_across_modules() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let exporter = Module::from_wat(
        r#"(module
            (memory (export "mem") 1)
            (func (export "load32") (param i32) (result i32)
                local.get 0
                i32.load))"#,
    )?;
    let exporter = linker.instantiate(&mut store, &mut const_eval, &exporter)?;
    linker.define_instance("A", exporter)?;

    let importer = Module::from_wat(
        r#"(module
            (import "A" "mem" (memory 1))
            (func (export "store42")
                i32.const 4
                i32.const 0x2A
                i32.store))"#,
    )?;
    let importer = linker.instantiate(&mut store, &mut const_eval, &importer)?;

    // B writes through the imported memory...
    let store42 = importer.get_func(&store, "store42").unwrap();
    store42.call(&mut store, &[], &mut [])?;

    // ...and A observes the write.
    let load32 = exporter.get_func(&store, "load32").unwrap();
    let mut results = [Val::I32(0)];
    load32.call(&mut store, &[Val::I32(4)], &mut results)?;
    assert_eq!(results[0], Val::I32(0x2A));
    Ok(())
}

#[test_log::test]
fn imported_function_across_modules() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let math = Module::from_wat(
        r#"(module (func (export "square") (param i32) (result i32)
            local.get 0
            local.get 0
            i32.mul))"#,
    )?;
    let math = linker.instantiate(&mut store, &mut const_eval, &math)?;
    linker.define_instance("math", math)?;

    let main = Module::from_wat(
        r#"(module
            (import "math" "square" (func $square (param i32) (result i32)))
            (func (export "fourth") (param i32) (result i32)
                local.get 0
                call $square
                call $square))"#,
    )?;
    let main = linker.instantiate(&mut store, &mut const_eval, &main)?;

    let fourth = main.get_func(&store, "fourth").unwrap();
    let mut results = [Val::I32(0)];
    fourth.call(&mut store, &[Val::I32(3)], &mut results)?;
    assert_eq!(results[0], Val::I32(81));
    Ok(())
}

#[test_log::test]
fn host_function_import() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let env = HostModule::new().func(
        "mul2",
        FuncType::new([ValType::I32], [ValType::I32]),
        |_store, args| {
            args[0] = VMVal::i32(args[0].get_i32().wrapping_mul(2));
            Ok(())
        },
    );
    linker.define_host(&mut store, "env", env)?;

    let module = Module::from_wat(
        r#"(module
            (import "env" "mul2" (func $mul2 (param i32) (result i32)))
            (func (export "run") (param i32) (result i32)
                local.get 0
                call $mul2
                call $mul2))"#,
    )?;
    let instance = linker.instantiate(&mut store, &mut const_eval, &module)?;

    let run = instance.get_func(&store, "run").unwrap();
    let mut results = [Val::I32(0)];
    run.call(&mut store, &[Val::I32(11)], &mut results)?;
    assert_eq!(results[0], Val::I32(44));
    Ok(())
}

#[test_log::test]
fn host_trap_unwinds_to_the_caller() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let env = HostModule::new().func(
        "fail",
        FuncType::new([], []),
        |_store, _args| Err(Trap::UnreachableCodeReached),
    );
    linker.define_host(&mut store, "env", env)?;

    let module = Module::from_wat(
        r#"(module
            (import "env" "fail" (func $fail))
            (func (export "run")
                call $fail))"#,
    )?;
    let instance = linker.instantiate(&mut store, &mut const_eval, &module)?;

    let run = instance.get_func(&store, "run").unwrap();
    let err = run.call(&mut store, &[], &mut []).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::UnreachableCodeReached)));
    Ok(())
}

#[test_log::test]
fn host_global_and_memory_imports() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let env = HostModule::new()
        .global("answer", false, Val::I32(42))
        .memory("mem", 1, Some(2));
    linker.define_host(&mut store, "env", env)?;

    let module = Module::from_wat(
        r#"(module
            (import "env" "answer" (global i32))
            (import "env" "mem" (memory 1))
            (func (export "stash") (result i32)
                i32.const 16
                global.get 0
                i32.store
                i32.const 16
                i32.load))"#,
    )?;
    let instance = linker.instantiate(&mut store, &mut const_eval, &module)?;

    let stash = instance.get_func(&store, "stash").unwrap();
    let mut results = [Val::I32(0)];
    stash.call(&mut store, &[], &mut results)?;
    assert_eq!(results[0], Val::I32(42));

    // The host-defined memory saw the write too.
    let host = linker.instance("env").unwrap();
    let memory = host.get_memory(&store, "mem").unwrap();
    let mut bytes = [0u8; 4];
    memory.read(&store, 16, &mut bytes).unwrap();
    assert_eq!(i32::from_le_bytes(bytes), 42);
    Ok(())
}

#[test_log::test]
fn imported_global_in_initializer() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let env = HostModule::new().global("base", false, Val::I32(100));
    linker.define_host(&mut store, "env", env)?;

    let module = Module::from_wat(
        r#"(module
            (import "env" "base" (global $base i32))
            (global $derived i32 (global.get $base))
            (func (export "get") (result i32)
                global.get $derived))"#,
    )?;
    let instance = linker.instantiate(&mut store, &mut const_eval, &module)?;

    let get = instance.get_func(&store, "get").unwrap();
    let mut results = [Val::I32(0)];
    get.call(&mut store, &[], &mut results)?;
    assert_eq!(results[0], Val::I32(100));
    Ok(())
}

#[test_log::test]
fn unknown_import_fails_to_link() -> Result<()> {
    let mut store = Store::new();
    let linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let module = Module::from_wat(
        r#"(module (import "nowhere" "nothing" (func)))"#,
    )?;
    let err = linker
        .instantiate(&mut store, &mut const_eval, &module)
        .unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}

#[test_log::test]
fn import_type_mismatch_fails_to_link() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let env = HostModule::new().func(
        "f",
        FuncType::new([ValType::I64], [ValType::I64]),
        |_store, _args| Ok(()),
    );
    linker.define_host(&mut store, "env", env)?;

    let module = Module::from_wat(
        r#"(module (import "env" "f" (func (param i32) (result i32))))"#,
    )?;
    let err = linker
        .instantiate(&mut store, &mut const_eval, &module)
        .unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}

#[test_log::test]
fn import_memory_limits_must_be_compatible() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let env = HostModule::new().memory("mem", 1, None);
    linker.define_host(&mut store, "env", env)?;

    // Requires at least 2 pages; the host memory only guarantees 1.
    let module = Module::from_wat(
        r#"(module (import "env" "mem" (memory 2)))"#,
    )?;
    let err = linker
        .instantiate(&mut store, &mut const_eval, &module)
        .unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}

#[test_log::test]
fn element_segment_out_of_bounds_fails_to_link() -> Result<()> {
    let mut store = Store::new();
    let linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let module = Module::from_wat(
        r#"(module
            (func $f)
            (table 1 1 funcref)
            (elem (i32.const 5) $f))"#,
    )?;
    let err = linker
        .instantiate(&mut store, &mut const_eval, &module)
        .unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}

#[test_log::test]
fn data_segment_out_of_bounds_fails_to_link() -> Result<()> {
    let mut store = Store::new();
    let linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let module = Module::from_wat(
        r#"(module
            (memory 1 1)
            (data (i32.const 65534) "abcd"))"#,
    )?;
    let err = linker
        .instantiate(&mut store, &mut const_eval, &module)
        .unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}

#[test_log::test]
fn duplicate_module_names_are_rejected() -> Result<()> {
    let mut store = Store::new();
    let mut linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();

    let module = Module::from_wat(r#"(module)"#)?;
    let a = linker.instantiate(&mut store, &mut const_eval, &module)?;
    let b = linker.instantiate(&mut store, &mut const_eval, &module)?;

    linker.define_instance("m", a)?;
    let err = linker.define_instance("m", b).unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}
