use expect_test::{Expect, expect};
use ownir_analysis::{TableOfContents, table_of_contents};
use ownir_core::{ArithOp, CmpKind, Instruction, Label, Program, RawValue, Register};

use crate::{Fault, Interpreter, RuntimeError, ops};

fn r(name: &str) -> Register {
    Register::new(name)
}

fn l(name: &str) -> Label {
    Label::new(name)
}

fn run(instructions: Vec<Instruction>) -> Result<RawValue, Fault> {
    let program = Program::new(instructions);
    let toc = table_of_contents(&program).unwrap();
    Interpreter::new(&program, &toc).run()
}

#[track_caller]
fn check_value(instructions: Vec<Instruction>, expected: impl Into<RawValue>) {
    assert_eq!(run(instructions), Ok(expected.into()));
}

#[track_caller]
fn check_fault(instructions: Vec<Instruction>, expect: Expect) {
    let fault = run(instructions).unwrap_err();
    expect.assert_eq(&fault.to_string());
}

fn diamond(cond: bool) -> Vec<Instruction> {
    vec![
        Instruction::block(Label::entry()),
        Instruction::constant(r("c"), cond),
        Instruction::branch(l("then"), l("else"), r("c")),
        Instruction::block(l("then")),
        Instruction::constant(r("a"), 1),
        Instruction::jump(l("end")),
        Instruction::block(l("else")),
        Instruction::constant(r("b"), 2),
        Instruction::jump(l("end")),
        Instruction::block(l("end")),
        Instruction::phi(r("x"), (l("then"), r("a")), (l("else"), r("b"))),
        Instruction::exit(r("x")),
    ]
}

fn factorial(n: i32) -> Vec<Instruction> {
    vec![
        Instruction::block(Label::entry()),
        Instruction::constant(r("0"), n),
        Instruction::constant(r("1"), 1),
        Instruction::call(r("2"), l("factorial"), vec![r("0"), r("1")]),
        Instruction::exit(r("2")),
        Instruction::function(l("factorial"), vec![r("n"), r("acc")]),
        Instruction::constant(r("3"), 1),
        Instruction::equal(r("6"), r("n"), r("3")),
        Instruction::branch(l("termination"), l("body"), r("6")),
        Instruction::block(l("body")),
        Instruction::subtract(r("7"), r("n"), r("3")),
        Instruction::multiply(r("8"), r("n"), r("acc")),
        Instruction::call(r("9"), l("factorial"), vec![r("7"), r("8")]),
        Instruction::jump(l("termination")),
        Instruction::block(l("termination")),
        Instruction::phi(r("10"), (l("body"), r("9")), (l("factorial"), r("acc"))),
        Instruction::ret(r("10")),
    ]
}

#[test]
fn exit_constant() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 11),
            Instruction::exit(r("0")),
        ],
        11,
    );
}

#[test]
fn add_constants() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 11),
            Instruction::constant(r("1"), 22),
            Instruction::add(r("2"), r("0"), r("1")),
            Instruction::exit(r("2")),
        ],
        33,
    );
}

#[test]
fn recursive_factorial() {
    check_value(factorial(5), 120);
    check_value(factorial(1), 1);
}

#[test]
fn deref_of_ref() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 42),
            Instruction::reference(r("r"), r("x")),
            Instruction::deref(r("t"), r("r")),
            Instruction::exit(r("t")),
        ],
        42,
    );
}

#[test]
fn deref_after_drop_dangles() {
    let fault = run(vec![
        Instruction::block(Label::entry()),
        Instruction::constant(r("x"), 42),
        Instruction::reference(r("r"), r("x")),
        Instruction::drop(r("x")),
        Instruction::deref(r("t"), r("r")),
        Instruction::exit(r("t")),
    ])
    .unwrap_err();

    assert_eq!(fault.line, 4);
    assert!(matches!(fault.error, RuntimeError::DanglingReference { .. }));

    expect![["line 4: reference %r points at %x, which is no longer live"]]
        .assert_eq(&fault.to_string());
}

#[test]
fn diamond_takes_either_branch() {
    check_value(diamond(true), 1);
    check_value(diamond(false), 2);
}

#[test]
fn empty_program() {
    let program = Program::default();
    let toc = TableOfContents::default();

    let fault = Interpreter::new(&program, &toc).run().unwrap_err();
    assert_eq!(fault, Fault { line: 1, error: RuntimeError::MissingExit });
}

#[test]
fn missing_exit() {
    check_fault(
        vec![Instruction::block(Label::entry()), Instruction::constant(r("0"), 1)],
        expect![["line 2: reached the end of the program without an `exit`"]],
    );
}

#[test]
fn exit_with_reference() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::reference(r("r"), r("x")),
            Instruction::exit(r("r")),
        ],
        expect![["line 3: expected %r to hold a value, found a reference"]],
    );
}

#[test]
fn fall_through_into_block() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 1),
            Instruction::block(l("next")),
            Instruction::exit(r("0")),
        ],
        expect![["line 2: fell through into @next without a terminator"]],
    );
}

#[test]
fn fall_through_into_function() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::function(l("f"), Vec::new()),
            Instruction::constant(r("0"), 1),
            Instruction::ret(r("0")),
        ],
        expect![["line 1: fell through into @f without a terminator"]],
    );
}

#[test]
fn jump_skips_blocks() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 7),
            Instruction::jump(l("end")),
            Instruction::block(l("dead")),
            Instruction::constant(r("1"), 0),
            Instruction::exit(r("1")),
            Instruction::block(l("end")),
            Instruction::exit(r("0")),
        ],
        7,
    );
}

#[test]
fn jump_to_unknown_label() {
    check_fault(
        vec![Instruction::block(Label::entry()), Instruction::jump(l("nowhere"))],
        expect![["line 1: jump to unknown label @nowhere"]],
    );
}

#[test]
fn branch_requires_boolean() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("n"), 1),
            Instruction::branch(l("a"), l("b"), r("n")),
        ],
        expect![["line 2: expected %n to hold a boolean, found a number"]],
    );
}

#[test]
fn identity_call() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 9),
            Instruction::call(r("1"), l("id"), vec![r("0")]),
            Instruction::exit(r("1")),
            Instruction::function(l("id"), vec![r("a")]),
            Instruction::ret(r("a")),
        ],
        9,
    );
}

#[test]
fn binary_call() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 3),
            Instruction::constant(r("1"), 4),
            Instruction::call(r("2"), l("add"), vec![r("0"), r("1")]),
            Instruction::exit(r("2")),
            Instruction::function(l("add"), vec![r("a"), r("b")]),
            Instruction::add(r("c"), r("a"), r("b")),
            Instruction::ret(r("c")),
        ],
        7,
    );
}

#[test]
fn reference_arguments_resolve_in_the_callee_frame() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("a"), 7),
            Instruction::reference(r("ra"), r("a")),
            Instruction::call(r("b"), l("f"), vec![r("ra")]),
            Instruction::exit(r("b")),
            Instruction::function(l("f"), vec![r("p")]),
            Instruction::deref(r("q"), r("p")),
            Instruction::ret(r("q")),
        ],
        expect![["line 6: reference %p points at %a, which is no longer live"]],
    );
}

#[test]
fn reference_arguments_survive_the_round_trip() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("a"), 7),
            Instruction::reference(r("ra"), r("a")),
            Instruction::call(r("b"), l("f"), vec![r("ra")]),
            Instruction::deref(r("t"), r("b")),
            Instruction::exit(r("t")),
            Instruction::function(l("f"), vec![r("p")]),
            Instruction::ret(r("p")),
        ],
        7,
    );
}

#[test]
fn arity_mismatch() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 1),
            Instruction::constant(r("1"), 2),
            Instruction::call(r("2"), l("id"), vec![r("0"), r("1")]),
            Instruction::exit(r("2")),
            Instruction::function(l("id"), vec![r("a")]),
            Instruction::ret(r("a")),
        ],
        expect![["line 3: function @id expects 1 argument(s), got 2"]],
    );
}

#[test]
fn call_targets_must_be_functions() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::call(r("0"), l("missing"), Vec::new()),
        ],
        expect![["line 1: call to unknown function @missing"]],
    );

    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::call(r("0"), l("plain"), Vec::new()),
            Instruction::exit(r("0")),
            Instruction::block(l("plain")),
            Instruction::exit(r("0")),
        ],
        expect![["line 1: cannot call @plain: it is a block, not a function"]],
    );
}

#[test]
fn callee_cannot_see_caller_registers() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::call(r("y"), l("f"), Vec::new()),
            Instruction::exit(r("y")),
            Instruction::function(l("f"), Vec::new()),
            Instruction::ret(r("x")),
        ],
        expect![["line 5: register %x is not defined in this frame"]],
    );
}

#[test]
fn return_outside_function() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::ret(r("x")),
        ],
        expect![["line 2: `return` outside of a function"]],
    );
}

#[test]
fn returned_reference_dangles_in_caller() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::call(r("r"), l("leak"), Vec::new()),
            Instruction::deref(r("t"), r("r")),
            Instruction::exit(r("t")),
            Instruction::function(l("leak"), Vec::new()),
            Instruction::constant(r("local"), 5),
            Instruction::reference(r("p"), r("local")),
            Instruction::ret(r("p")),
        ],
        expect![["line 2: reference %r points at %local, which is no longer live"]],
    );
}

#[test]
fn phi_after_jump() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 1),
            Instruction::constant(r("1"), 2),
            Instruction::jump(l("next")),
            Instruction::block(l("next")),
            Instruction::phi(r("2"), (l("other"), r("0")), (Label::entry(), r("1"))),
            Instruction::exit(r("2")),
        ],
        2,
    );
}

#[test]
fn phi_in_loop() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("0"), 0),
            Instruction::constant(r("1"), 1),
            Instruction::constant(r("2"), 3),
            Instruction::jump(l("loop")),
            Instruction::block(l("loop")),
            Instruction::phi(r("3"), (Label::entry(), r("0")), (l("loop"), r("4"))),
            Instruction::add(r("4"), r("1"), r("3")),
            Instruction::unequal(r("5"), r("3"), r("2")),
            Instruction::branch(l("loop"), l("end"), r("5")),
            Instruction::block(l("end")),
            Instruction::exit(r("3")),
        ],
        3,
    );
}

#[test]
fn phi_only_sees_the_immediate_predecessor() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::jump(l("a")),
            Instruction::block(l("a")),
            Instruction::jump(l("b")),
            Instruction::block(l("b")),
            Instruction::phi(r("y"), (Label::entry(), r("x")), (l("other"), r("x"))),
            Instruction::exit(r("y")),
        ],
        expect![["line 6: cannot resolve phi over @entry and @other when the previous block is @a"]],
    );
}

#[test]
fn phi_in_entry_has_no_previous_block() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::phi(r("y"), (l("a"), r("x")), (l("b"), r("x"))),
            Instruction::exit(r("y")),
        ],
        expect![["line 2: cannot resolve phi over @a and @b when the previous block is none"]],
    );
}

#[test]
fn move_transfers_binding() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::move_(r("y"), r("x")),
            Instruction::exit(r("y")),
        ],
        1,
    );
}

#[test]
fn use_after_move() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::move_(r("y"), r("x")),
            Instruction::exit(r("x")),
        ],
        expect![["line 3: register %x was used after being moved"]],
    );
}

#[test]
fn use_after_drop() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::drop(r("x")),
            Instruction::exit(r("x")),
        ],
        expect![["line 3: register %x was used after being dropped"]],
    );
}

#[test]
fn double_drop() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::drop(r("x")),
            Instruction::drop(r("x")),
        ],
        expect![["line 3: register %x was dropped twice"]],
    );
}

#[test]
fn drop_after_move() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::move_(r("y"), r("x")),
            Instruction::drop(r("x")),
        ],
        expect![["line 3: register %x was used after being moved"]],
    );
}

#[test]
fn deref_after_move_dangles() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::reference(r("r"), r("x")),
            Instruction::move_(r("y"), r("x")),
            Instruction::deref(r("t"), r("r")),
            Instruction::exit(r("t")),
        ],
        expect![["line 4: reference %r points at %x, which is no longer live"]],
    );
}

#[test]
fn ref_requires_live_source() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::drop(r("x")),
            Instruction::reference(r("r"), r("x")),
        ],
        expect![["line 3: register %x was used after being dropped"]],
    );
}

#[test]
fn deref_reads_the_current_value() {
    // The interpreter does not verify, so `%x` may be rebound after the reference is taken.
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::reference(r("r"), r("x")),
            Instruction::constant(r("x"), 2),
            Instruction::deref(r("t"), r("r")),
            Instruction::exit(r("t")),
        ],
        2,
    );
}

#[test]
fn copied_references_alias_the_same_register() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 4),
            Instruction::reference(r("r"), r("x")),
            Instruction::copy(r("s"), r("r")),
            Instruction::deref(r("t"), r("s")),
            Instruction::add(r("u"), r("t"), r("x")),
            Instruction::exit(r("u")),
        ],
        8,
    );
}

#[test]
fn deref_requires_reference() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("x"), 1),
            Instruction::deref(r("t"), r("x")),
        ],
        expect![["line 2: `deref` expected %x to hold a reference, found a value"]],
    );
}

#[test]
fn arithmetic_requires_numbers() {
    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("b"), true),
            Instruction::constant(r("n"), 1),
            Instruction::add(r("s"), r("n"), r("b")),
        ],
        expect![["line 3: expected %b to hold a number, found a boolean"]],
    );

    check_fault(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("n"), 1),
            Instruction::reference(r("p"), r("n")),
            Instruction::multiply(r("s"), r("p"), r("n")),
        ],
        expect![["line 3: expected %p to hold a number, found a reference"]],
    );
}

#[test]
fn comparison_across_kinds() {
    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("b"), true),
            Instruction::constant(r("n"), 1),
            Instruction::equal(r("e"), r("b"), r("n")),
            Instruction::exit(r("e")),
        ],
        false,
    );

    check_value(
        vec![
            Instruction::block(Label::entry()),
            Instruction::constant(r("a"), false),
            Instruction::constant(r("b"), false),
            Instruction::equal(r("e"), r("a"), r("b")),
            Instruction::exit(r("e")),
        ],
        true,
    );
}

#[test]
fn undefined_register() {
    check_fault(
        vec![Instruction::block(Label::entry()), Instruction::exit(r("nope"))],
        expect![["line 1: register %nope is not defined in this frame"]],
    );
}

#[test]
fn division_by_zero_is_not_an_error() {
    let value = run(vec![
        Instruction::block(Label::entry()),
        Instruction::constant(r("a"), 1),
        Instruction::constant(r("z"), 0),
        Instruction::divide(r("q"), r("a"), r("z")),
        Instruction::exit(r("q")),
    ]);

    assert_eq!(value, Ok(RawValue::Number(f64::INFINITY)));
}

#[test]
fn arith_follows_host_floats() {
    assert_eq!(ops::arith(ArithOp::Subtract, 1.0, 3.0), -2.0);
    assert_eq!(ops::arith(ArithOp::Divide, 7.0, 2.0), 3.5);
    assert_eq!(ops::arith(ArithOp::Remainder, -7.0, 3.0), -1.0);
    assert_eq!(ops::arith(ArithOp::Divide, -1.0, 0.0), f64::NEG_INFINITY);
    assert!(ops::arith(ArithOp::Remainder, 1.0, 0.0).is_nan());
}

#[test]
fn compare_by_payload() {
    let nan = RawValue::Number(f64::NAN);

    assert!(ops::compare(CmpKind::Equal, RawValue::from(2), RawValue::from(2)));
    assert!(ops::compare(CmpKind::Unequal, nan, nan));
    assert!(ops::compare(CmpKind::Unequal, RawValue::Bool(true), RawValue::from(1)));
}
