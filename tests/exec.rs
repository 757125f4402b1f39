//! End-to-end execution tests: decode, validate, instantiate and run
//! single modules through the public API.

use anyhow::Result;
use reef_vm::{ConstExprEvaluator, Error, Instance, Linker, Module, Store, Trap, Val};

fn instantiate(wat: &str) -> Result<(Store, Instance)> {
    let module = Module::from_wat(wat)?;
    let mut store = Store::new();
    let linker = Linker::new();
    let mut const_eval = ConstExprEvaluator::default();
    let instance = linker.instantiate(&mut store, &mut const_eval, &module)?;
    Ok((store, instance))
}

fn call1(store: &mut Store, instance: Instance, name: &str, args: &[Val]) -> reef_vm::Result<Val> {
    let func = instance.get_func(store, name).expect("exported function");
    let mut results = [Val::I32(0)];
    func.call(store, args, &mut results)?;
    Ok(results[0])
}

#[test_log::test]
fn add_two_numbers() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "add") (param i32 i32) (result i32)
            local.get 0
            local.get 1
            i32.add))"#,
    )?;

    let result = call1(&mut store, instance, "add", &[Val::I32(7), Val::I32(35)])?;
    assert_eq!(result, Val::I32(42));
    Ok(())
}

#[test_log::test]
fn data_segment_then_load() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (memory 1)
            (data (i32.const 0) "abcd")
            (func (export "load") (param i32) (result i32)
                local.get 0
                i32.load))"#,
    )?;

    let result = call1(&mut store, instance, "load", &[Val::I32(0)])?;
    assert_eq!(result, Val::I32(0x64636261));
    Ok(())
}

#[test_log::test]
fn loop_accumulates_sum() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "sum") (result i32)
            (local $i i32) (local $sum i32)
            i32.const 10
            local.set $i
            loop $continue
                local.get $sum
                local.get $i
                i32.add
                local.set $sum
                local.get $i
                i32.const 1
                i32.sub
                local.tee $i
                i32.const 0
                i32.ne
                br_if $continue
            end
            local.get $sum))"#,
    )?;

    let result = call1(&mut store, instance, "sum", &[])?;
    assert_eq!(result, Val::I32(55));
    Ok(())
}

#[test_log::test]
fn if_else_selects_branch() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "max") (param i32 i32) (result i32)
            local.get 0
            local.get 1
            i32.gt_s
            if (result i32)
                local.get 0
            else
                local.get 1
            end))"#,
    )?;

    assert_eq!(
        call1(&mut store, instance, "max", &[Val::I32(3), Val::I32(9)])?,
        Val::I32(9)
    );
    assert_eq!(
        call1(&mut store, instance, "max", &[Val::I32(9), Val::I32(3)])?,
        Val::I32(9)
    );
    Ok(())
}

#[test_log::test]
fn br_table_dispatches() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "classify") (param i32) (result i32)
            block $b2
                block $b1
                    block $b0
                        local.get 0
                        br_table $b0 $b1 $b2
                    end
                    i32.const 100
                    return
                end
                i32.const 200
                return
            end
            i32.const 300))"#,
    )?;

    assert_eq!(call1(&mut store, instance, "classify", &[Val::I32(0)])?, Val::I32(100));
    assert_eq!(call1(&mut store, instance, "classify", &[Val::I32(1)])?, Val::I32(200));
    assert_eq!(call1(&mut store, instance, "classify", &[Val::I32(2)])?, Val::I32(300));
    // Out-of-range selectors take the default target.
    assert_eq!(call1(&mut store, instance, "classify", &[Val::I32(99)])?, Val::I32(300));
    Ok(())
}

#[test_log::test]
fn start_function_runs_at_instantiation() -> Result<()> {
    let (store, instance) = instantiate(
        r#"(module
            (global $g (export "flag") (mut i32) (i32.const 0))
            (func $init
                i32.const 1
                global.set $g)
            (start $init))"#,
    )?;

    // No explicit call: the start function already ran.
    let global = instance.get_global(&store, "flag").expect("exported global");
    assert_eq!(global.get(&store), Val::I32(1));
    Ok(())
}

#[test_log::test]
fn call_indirect_checks_slots_and_signatures() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (type $ii (func (param i32) (result i32)))
            (type $void (func))
            (func $double (type $ii)
                local.get 0
                i32.const 2
                i32.mul)
            (func $noop (type $void))
            (table 4 funcref)
            (elem (i32.const 2) $double)
            (func (export "apply") (param i32 i32) (result i32)
                local.get 1
                local.get 0
                call_indirect (type $ii))
            (func (export "run_void") (param i32)
                local.get 0
                call_indirect (type $void)))"#,
    )?;

    // Slot 2 holds $double.
    assert_eq!(
        call1(&mut store, instance, "apply", &[Val::I32(2), Val::I32(21)])?,
        Val::I32(42)
    );

    // Slot 3 is unset.
    let err = call1(&mut store, instance, "apply", &[Val::I32(3), Val::I32(21)]).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::IndirectCallToNull)));

    // Slot 2 holds a function of the wrong declared type.
    let run_void = instance.get_func(&store, "run_void").unwrap();
    let err = run_void.call(&mut store, &[Val::I32(2)], &mut []).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::BadSignature)));

    // An index past the table bounds is its own trap.
    let err = call1(&mut store, instance, "apply", &[Val::I32(100), Val::I32(21)]).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::TableOutOfBounds)));
    Ok(())
}

#[test_log::test]
fn memory_grow_reports_old_size_and_failure() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (memory 0 4)
            (func (export "grow") (param i32) (result i32)
                local.get 0
                memory.grow)
            (func (export "size") (result i32)
                memory.size))"#,
    )?;

    assert_eq!(call1(&mut store, instance, "grow", &[Val::I32(4)])?, Val::I32(0));
    assert_eq!(call1(&mut store, instance, "size", &[])?, Val::I32(4));
    // Growth past the maximum fails with -1 and does not trap.
    assert_eq!(call1(&mut store, instance, "grow", &[Val::I32(1)])?, Val::I32(-1));
    assert_eq!(call1(&mut store, instance, "size", &[])?, Val::I32(4));
    Ok(())
}

#[test_log::test]
fn integer_traps() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (func (export "div") (param i32 i32) (result i32)
                local.get 0
                local.get 1
                i32.div_s)
            (func (export "boom")
                unreachable))"#,
    )?;

    let err = call1(&mut store, instance, "div", &[Val::I32(7), Val::I32(0)]).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::IntegerDivisionByZero)));

    let err = call1(
        &mut store,
        instance,
        "div",
        &[Val::I32(i32::MIN), Val::I32(-1)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::IntegerOverflow)));

    assert_eq!(
        call1(&mut store, instance, "div", &[Val::I32(-7), Val::I32(2)])?,
        Val::I32(-3)
    );

    let boom = instance.get_func(&store, "boom").unwrap();
    let err = boom.call(&mut store, &[], &mut []).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::UnreachableCodeReached)));
    Ok(())
}

#[test_log::test]
fn shift_counts_are_masked() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "shr") (param i32 i32) (result i32)
            local.get 0
            local.get 1
            i32.shr_u))"#,
    )?;

    // A count of 33 shifts by 1.
    assert_eq!(
        call1(&mut store, instance, "shr", &[Val::I32(4), Val::I32(33)])?,
        Val::I32(2)
    );
    Ok(())
}

#[test_log::test]
fn out_of_bounds_access_traps() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (memory 1)
            (func (export "load") (param i32) (result i32)
                local.get 0
                i32.load))"#,
    )?;

    // The last in-bounds word.
    assert_eq!(
        call1(&mut store, instance, "load", &[Val::I32(65532)])?,
        Val::I32(0)
    );
    let err = call1(&mut store, instance, "load", &[Val::I32(65533)]).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::MemoryOutOfBounds)));
    let err = call1(&mut store, instance, "load", &[Val::I32(-1)]).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::MemoryOutOfBounds)));
    Ok(())
}

#[test_log::test]
fn float_arithmetic() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "hypot") (param f64 f64) (result f64)
            local.get 0
            local.get 0
            f64.mul
            local.get 1
            local.get 1
            f64.mul
            f64.add
            f64.sqrt))"#,
    )?;

    let func = instance.get_func(&store, "hypot").unwrap();
    let mut results = [Val::F64(0)];
    func.call(
        &mut store,
        &[Val::from(3.0f64), Val::from(4.0f64)],
        &mut results,
    )?;
    assert_eq!(results[0].unwrap_f64(), 5.0);
    Ok(())
}

#[test_log::test]
fn nontrapping_conversions_saturate() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "sat") (param f64) (result i32)
            local.get 0
            i32.trunc_sat_f64_s))"#,
    )?;

    assert_eq!(
        call1(&mut store, instance, "sat", &[Val::from(1e30f64)])?,
        Val::I32(i32::MAX)
    );
    assert_eq!(
        call1(&mut store, instance, "sat", &[Val::from(-1e30f64)])?,
        Val::I32(i32::MIN)
    );
    assert_eq!(
        call1(&mut store, instance, "sat", &[Val::from(f64::NAN)])?,
        Val::I32(0)
    );
    Ok(())
}

#[test_log::test]
fn simd_lanewise_arithmetic() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "sum_lane") (result i32)
            v128.const i32x4 1 2 3 4
            v128.const i32x4 10 20 30 40
            i32x4.add
            i32x4.extract_lane 3))"#,
    )?;

    assert_eq!(call1(&mut store, instance, "sum_lane", &[])?, Val::I32(44));
    Ok(())
}

#[test_log::test]
fn simd_splat_store_load() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (memory 1)
            (func (export "go") (result i32)
                i32.const 0
                i32.const 7
                i32x4.splat
                v128.store
                i32.const 8
                i32.load))"#,
    )?;

    assert_eq!(call1(&mut store, instance, "go", &[])?, Val::I32(7));
    Ok(())
}

#[test_log::test]
fn simd_shuffle_selects_across_inputs() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "go") (result i32)
            v128.const i8x16 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            v128.const i8x16 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
            i8x16.shuffle 0 16 1 17 2 18 3 19 4 20 5 21 6 22 7 23
            i8x16.extract_lane_u 1))"#,
    )?;

    assert_eq!(call1(&mut store, instance, "go", &[])?, Val::I32(16));
    Ok(())
}

#[test_log::test]
fn infinite_recursion_exhausts_the_stack() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func $f (export "spin") call $f))"#,
    )?;

    let spin = instance.get_func(&store, "spin").unwrap();
    let err = spin.call(&mut store, &[], &mut []).unwrap_err();
    assert!(matches!(err, Error::Trap(Trap::StackOverflow)));
    Ok(())
}

#[test_log::test]
fn multi_value_blocks() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module
            (type $pair (func (result i32 i32)))
            (func (export "swap_sub") (result i32)
                block (type $pair)
                    i32.const 50
                    i32.const 8
                end
                i32.sub))"#,
    )?;

    assert_eq!(call1(&mut store, instance, "swap_sub", &[])?, Val::I32(42));
    Ok(())
}

#[test_log::test]
fn call_argument_mismatch_is_an_error() -> Result<()> {
    let (mut store, instance) = instantiate(
        r#"(module (func (export "id") (param i32) (result i32)
            local.get 0))"#,
    )?;

    let id = instance.get_func(&store, "id").unwrap();
    let mut results = [Val::I32(0)];
    let err = id
        .call(&mut store, &[Val::I64(1)], &mut results)
        .unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    let err = id.call(&mut store, &[], &mut results).unwrap_err();
    assert!(matches!(err, Error::Link(_)));
    Ok(())
}
