use color_eyre::Result;
use proptest::prelude::*;

use cadl::{
    driver::{interpret, CadlError, InterpretOptions, Session},
    interpreter::{
        context::BufferedContext,
        error::RuntimeErrorKind,
        formatter::{BasicFormatter, ValueFormatter},
        value::CadlValue,
        ProgramState,
    },
};

fn run_with(source: &str, options: &InterpretOptions) -> Result<String> {
    let mut context = BufferedContext::new();
    interpret(source, options, &mut context)?;
    Ok(context.into_data())
}

fn run(source: &str) -> Result<String> {
    let options = InterpretOptions {
        seed: Some(0),
        ..Default::default()
    };
    run_with(source, &options)
}

fn run_propagating(source: &str) -> std::result::Result<String, CadlError> {
    let options = InterpretOptions {
        propagate_errors: true,
        seed: Some(0),
        ..Default::default()
    };
    let mut context = BufferedContext::new();
    interpret(source, &options, &mut context)?;
    Ok(context.into_data())
}

fn runtime_error(source: &str) -> RuntimeErrorKind {
    match run_propagating(source) {
        Err(CadlError::Runtime(e)) => e.kind,
        other => panic!("Expected a runtime error from {source:?} but got {other:?}"),
    }
}

fn caption(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

#[test]
fn test_draw_happy_cat() -> Result<()> {
    let output = run("cat Miso { mood = \"happy\"; } draw Miso;")?;
    assert_eq!(
        output,
        "   /\\_/\\\n  ( ^.^ )\n== > u <==\n  ( | | )\nmood: happy\n"
    );
    Ok(())
}

#[test]
fn test_draw_default_cat() -> Result<()> {
    let output = run("cat Plain; draw Plain")?;
    assert_eq!(output, "   /\\_/\\\n  ( o.o )\n - > - <-\n  ( | | )\n");
    let output = run("randomcat Later; draw Later")?;
    assert_eq!(output, "   /\\_/\\\n  ( o.o )\n - > - <-\n  ( | | )\n");
    Ok(())
}

#[test]
fn test_function_return() -> Result<()> {
    let source = r#"
        func pick(c) {
            if (c == 1) { return "one"; }
            return "other";
        }
        cat A { label = pick(1); other = pick(2); }
        draw A;
    "#;
    assert_eq!(caption(&run(source)?), "label: one, other: other");
    Ok(())
}

#[test]
fn test_return_from_loop() -> Result<()> {
    let source = r#"
        func forever() { while (1) { return 7; } }
        cat R { v = forever(); }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "v: 7");
    Ok(())
}

#[test]
fn test_missing_return_is_nil() -> Result<()> {
    assert_eq!(caption(&run("func f() {} cat R { v = f() } draw R")?), "v: nil");
    assert_eq!(caption(&run("func f() return; cat R { v = f() } draw R")?), "v: nil");
    Ok(())
}

#[test]
fn test_return_does_not_leak_into_caller() -> Result<()> {
    let source = r#"
        func f() { return 1; }
        cat A { n = 0 }
        f();
        A.n = 5;
        draw A;
    "#;
    assert_eq!(caption(&run(source)?), "n: 5");
    Ok(())
}

#[test]
fn test_top_level_return_stops_program() -> Result<()> {
    assert_eq!(run("cat A; return; draw A;")?, "");
    Ok(())
}

#[test]
fn test_truthiness_and_equality() -> Result<()> {
    let source = r#"
        cat R {
            a = 1 == 1;
            b = "1" == 1;
            c = !0;
            d = !"";
            e = !"a";
            g = (1 == 1) == !0;
        }
        draw R;
    "#;
    assert_eq!(
        caption(&run(source)?),
        "a: true, b: false, c: true, d: true, e: false, g: true"
    );
    Ok(())
}

#[test]
fn test_while_loop() -> Result<()> {
    let source = r#"
        cat C { n = 0 }
        func step() { C.n = "done"; }
        while (C.n == 0) step();
        draw C;
    "#;
    assert_eq!(caption(&run(source)?), "n: done");
    Ok(())
}

#[test]
fn test_recursion() -> Result<()> {
    let source = r#"
        cat C { n = 0 }
        func rec() { if (C.n == 0) { C.n = 1; rec(); } }
        rec();
        draw C;
    "#;
    assert_eq!(caption(&run(source)?), "n: 1");
    Ok(())
}

#[test]
fn test_cats_are_shared_with_parameters() -> Result<()> {
    let source = r#"
        cat A { ears = "round" }
        func paint(c) { c.tail = "curled"; }
        paint(A);
        draw A;
    "#;
    let output = run(source)?;
    assert!(output.contains("  ( | | )~@"), "{output}");
    Ok(())
}

#[test]
fn test_mood_assignment_overrides_traits() -> Result<()> {
    let source = r#"
        cat A { ears = "round" }
        A.mood = "angry";
        cat R { same = A.ears == "short"; }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "same: true");
    Ok(())
}

#[test]
fn test_draw_applies_mood_in_place() -> Result<()> {
    let source = r#"
        cat A { mood = "sleepy"; ears = "round" }
        cat Before { ears_then = A.ears }
        draw A;
        cat After { ears_now = A.ears }
        draw Before;
        draw After;
    "#;
    let output = run(source)?;
    let captions: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with("ears_"))
        .collect();
    assert_eq!(captions, vec!["ears_then: round", "ears_now: droopy"]);
    Ok(())
}

#[test]
fn test_arguments() -> Result<()> {
    assert_eq!(
        caption(&run("func one(a) { return a; } cat R { v = one(1, 2) } draw R")?),
        "v: 1"
    );
    assert_eq!(
        runtime_error("func two(a, b) { return b; } cat R { v = two(1) }"),
        RuntimeErrorKind::Undeclared("b".into())
    );
    assert_eq!(
        caption(&run("cat A { ears = \"round\" } func f(A) { return A; } cat R { v = f(3) } draw R")?),
        "v: 3"
    );
    Ok(())
}

#[test]
fn test_arguments_see_outer_bindings_until_shadowed() -> Result<()> {
    let source = r#"
        cat x { n = "outer" }
        func f(x) { return x; }
        cat R { v = f(x.n) }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "v: outer");
    Ok(())
}

#[test]
fn test_later_arguments_see_earlier_parameters() -> Result<()> {
    let source = r#"
        cat x { n = 1; }
        func f(x, y) { return y; }
        cat R { v = f(2, x) == 2; }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "v: true");
    Ok(())
}

#[test]
fn test_parameter_does_not_clobber_global() -> Result<()> {
    let source = r#"
        cat A { n = "global" }
        func f(A) { A = 3; return A; }
        cat R { v = f(1); after = A.n }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "after: global, v: 3");
    Ok(())
}

#[test]
fn test_equality_function() -> Result<()> {
    let source = r#"
        func f(a, b) { return a == b; }
        cat R { same = f(3, 3); different = f(3, 4) }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "different: false, same: true");
    Ok(())
}

#[test]
fn test_if_else_runs_one_branch() -> Result<()> {
    let source = r#"
        cat C { then = 0; other = 0 }
        if (1 == 1) C.then = 1; else C.other = 1;
        if (1 == 2) { C.then = 2; } else { C.other = 2; }
        draw C;
    "#;
    assert_eq!(caption(&run(source)?), "other: 2, then: 1");
    Ok(())
}

#[test]
fn test_while_with_false_condition_never_runs() -> Result<()> {
    let source = r#"
        cat C { n = 0 }
        while (C.n == 1) C.n = 2;
        while (0) { C.n = 3; }
        draw C;
    "#;
    assert_eq!(caption(&run(source)?), "n: 0");
    Ok(())
}

#[test]
fn test_self_referential_cats_compare() -> Result<()> {
    let source = r#"
        cat A { x = 1; } A.me = A;
        cat B { x = 1; } B.me = B;
        cat C { x = 2; } C.me = C;
        cat R { same = A == B; different = A == C; }
        draw R;
    "#;
    assert_eq!(caption(&run(source)?), "different: false, same: true");
    Ok(())
}

// Runs on a thread with a main-thread sized stack so the call limit is reached
// before the test harness's smaller default stack runs out.
fn with_main_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(f)
        .expect("Thread spawns")
        .join()
        .expect("Thread does not panic")
}

#[test]
fn test_unbounded_recursion_is_an_error() {
    with_main_stack(|| {
        let source = "func f() { f(); } f();";
        let Err(CadlError::Runtime(error)) = run_propagating(source) else {
            panic!("Expected a runtime error");
        };
        assert_eq!(error.kind, RuntimeErrorKind::RecursionLimit("f".into()));
        assert_eq!(error.code(), "RT006");
        assert_eq!(
            run(source).expect("Errors become output"),
            "error: maximum recursion depth exceeded calling f\n"
        );
    });
}

#[test]
fn test_session_survives_unbounded_recursion() {
    with_main_stack(|| {
        let mut session = Session::new(BufferedContext::new(), Some(0));
        session
            .eval("cat A { ears = \"round\" } func f(c) { return f(c); }")
            .expect("Valid declarations");
        assert!(matches!(session.eval("f(A)"), Err(CadlError::Runtime(_))));
        assert_eq!(session.depth(), 1);
        session.eval("draw A").expect("A is still bound");
        assert!(session.context().data().starts_with("   (\\_/)"));
    });
}

#[test]
fn test_local_declarations_do_not_escape() {
    let source = r#"
        func make() { cat Inner; return 1; }
        make();
        draw Inner;
    "#;
    assert_eq!(
        runtime_error(source),
        RuntimeErrorKind::Undeclared("Inner".into())
    );
}

#[test]
fn test_runtime_errors() {
    let cases = [
        ("draw Ghost;", RuntimeErrorKind::Undeclared("Ghost".into())),
        ("x = 1;", RuntimeErrorKind::Undeclared("x".into())),
        ("X = randomcat;", RuntimeErrorKind::Undeclared("X".into())),
        ("cat A; cat A;", RuntimeErrorKind::AlreadyDeclared("A".into())),
        ("func f() {} cat f;", RuntimeErrorKind::AlreadyDeclared("f".into())),
        ("func f(a, a) {} f(1, 2);", RuntimeErrorKind::AlreadyDeclared("a".into())),
        (
            "cat A { ears = \"round\" } cat B { ears = A.tail }",
            RuntimeErrorKind::TraitKeyMissing {
                cat: "A".into(),
                trait_name: "tail".into(),
            },
        ),
        ("func f() return; draw f;", RuntimeErrorKind::NotACat("f".into())),
        ("func f() return; f.ears = \"x\";", RuntimeErrorKind::NotACat("f".into())),
        ("func f() return; cat B { e = f.ears }", RuntimeErrorKind::NotACat("f".into())),
        ("cat A; A();", RuntimeErrorKind::InvalidCallee("A".into())),
        ("func f() { return g(); } f();", RuntimeErrorKind::Undeclared("g".into())),
    ];
    for (source, expected) in cases {
        assert_eq!(runtime_error(source), expected, "Wrong error for {source:?}");
    }
}

#[test]
fn test_errors_are_reported_as_output() -> Result<()> {
    assert_eq!(run("cat A; cat A;")?, "error: A already declared\n");
    assert_eq!(
        run("cat X { }")?,
        "error: syntax error: Expected at least one trait but got RCURLY.\n"
    );
    let output = run("cat A; draw A; draw B;")?;
    assert!(output.ends_with("  ( | | )\nerror: B was not declared\n"), "{output}");
    Ok(())
}

#[test]
fn test_runtime_error_formatter() {
    let source = "cat A;\ndraw B;";
    let Err(CadlError::Runtime(error)) = run_propagating(source) else {
        panic!("Expected a runtime error");
    };
    assert_eq!(error.code(), "RT001");
    assert_eq!(
        BasicFormatter::new(source).format_error(&error),
        "(2) [Runtime] B was not declared"
    );
}

#[test]
fn test_dump() -> Result<()> {
    let options = InterpretOptions {
        dump: true,
        ..Default::default()
    };
    assert_eq!(run_with("cat A; draw A", &options)?, "(cat A)\n(draw A)\n");
    Ok(())
}

#[test]
fn test_seeded_randomcat_is_reproducible() -> Result<()> {
    let source = "randomcat R; R = randomcat; draw R; R = randomcat; draw R;";
    let options = InterpretOptions {
        seed: Some(1234),
        ..Default::default()
    };
    assert_eq!(run_with(source, &options)?, run_with(source, &options)?);
    Ok(())
}

#[test]
fn test_session() -> Result<()> {
    let mut session = Session::new(BufferedContext::new(), Some(3));
    assert_eq!(session.eval("cat A { ears = \"round\" }")?, ProgramState::Run);
    session.eval("draw A")?;
    assert!(session.context().data().starts_with("   (\\_/)"));

    session.eval("func bad() { draw Nope; }")?;
    assert!(matches!(session.eval("bad()"), Err(CadlError::Runtime(_))));
    assert_eq!(session.depth(), 1);

    assert_eq!(
        session.eval("return 4;")?,
        ProgramState::Return(CadlValue::Integer(4))
    );

    session.reset();
    assert!(matches!(session.eval("draw A"), Err(CadlError::Runtime(_))));
    Ok(())
}

proptest! {
    #[test]
    fn drawing_twice_gives_same_art(seed in any::<u64>()) {
        let options = InterpretOptions {
            seed: Some(seed),
            ..Default::default()
        };
        let output = run_with("randomcat R; R = randomcat; draw R; draw R;", &options)
            .expect("Valid program");
        let (first, second) = output.split_at(output.len() / 2);
        prop_assert_eq!(first, second);
    }
}
