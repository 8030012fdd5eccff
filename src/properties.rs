//! Cross-checks between the scope checker and the two evaluators on
//! generated programs.

use crate::ast::{ArithOp, CompareOp, Expr, Program, Stmt, Symbol, Test};
use crate::choice::{FirstChooser, RandomChooser};
use crate::config::DoStrategy;
use crate::environment::Store;
use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::resolver::Resolver;
use crate::vm::{Control, Machine, MachineError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sym(name: &str) -> Symbol {
    Symbol::new(name).unwrap()
}

fn var(name: &str) -> Expr {
    Expr::var(sym(name))
}

fn start_store() -> Store {
    Store::new()
        .with(sym("a"), 3)
        .with(sym("b"), -2)
        .with(sym("c"), 7)
        .with(sym("i"), 0)
}

fn arb_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("a"), Just("b"), Just("c")]
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-10i64..10).prop_map(Expr::constant),
        arb_name().prop_map(var),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        (
            inner.clone(),
            inner,
            prop_oneof![
                Just(ArithOp::Add),
                Just(ArithOp::Sub),
                Just(ArithOp::Mul),
                Just(ArithOp::Div)
            ],
        )
            .prop_map(|(lhs, rhs, op)| Expr::binop(lhs, rhs, op))
    })
}

fn arb_test() -> impl Strategy<Value = Test> {
    let leaf = prop_oneof![
        Just(Test::True),
        Just(Test::False),
        (
            arb_expr(),
            arb_expr(),
            prop_oneof![Just(CompareOp::Eq), Just(CompareOp::Lt), Just(CompareOp::Gt)]
        )
            .prop_map(|(lhs, rhs, op)| Test::compare(lhs, rhs, op)),
    ];
    leaf.prop_recursive(2, 6, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(lhs, rhs)| Test::and(lhs, rhs)),
            (inner.clone(), inner).prop_map(|(lhs, rhs)| Test::or(lhs, rhs)),
        ]
    })
}

/// Exactly one of `e < k`, `e == k`, `e > k` holds in any store.
fn trichotomy(e: Expr, k: i64, arms: [Stmt; 3]) -> Stmt {
    let [lt, eq, gt] = arms;
    Stmt::if_(vec![
        (Test::compare(e.clone(), Expr::constant(k), CompareOp::Lt), lt),
        (Test::compare(e.clone(), Expr::constant(k), CompareOp::Eq), eq),
        (Test::compare(e, Expr::constant(k), CompareOp::Gt), gt),
    ])
}

/// `i := 0; do i < n -> body; i := i + 1 od`
fn counted_loop(n: i64, body: Stmt) -> Stmt {
    let step = Stmt::assign(sym("i"), Expr::binop(var("i"), Expr::constant(1), ArithOp::Add));
    Stmt::compose(
        Stmt::assign(sym("i"), Expr::constant(0)),
        Stmt::do_(vec![(
            Test::compare(var("i"), Expr::constant(n), CompareOp::Lt),
            Stmt::compose(body, step),
        )]),
    )
}

/// `i := 0; k := sel; do` one counted alternative per sign of `k` `od`.
/// Bodies never write `i` or `k`, so only one alternative is ever enabled.
fn selector_loop(n: i64, sel: i64, arms: [Stmt; 3]) -> Stmt {
    let counting = |cmp: CompareOp, body: Stmt| {
        let guard = Test::and(
            Test::compare(var("i"), Expr::constant(n), CompareOp::Lt),
            Test::compare(var("k"), Expr::constant(0), cmp),
        );
        let step = Stmt::assign(sym("i"), Expr::binop(var("i"), Expr::constant(1), ArithOp::Add));
        (guard, Stmt::compose(body, step))
    };
    let [neg, zero, pos] = arms;
    Stmt::compose(
        Stmt::compose(
            Stmt::assign(sym("i"), Expr::constant(0)),
            Stmt::assign(sym("k"), Expr::constant(sel)),
        ),
        Stmt::do_(vec![
            counting(CompareOp::Lt, neg),
            counting(CompareOp::Eq, zero),
            counting(CompareOp::Gt, pos),
        ]),
    )
}

/// Loop-free statements whose `If`s have mutually exclusive guards.
fn arb_exclusive_body() -> impl Strategy<Value = Stmt> {
    let leaf = prop_oneof![
        Just(Stmt::Skip),
        (arb_name(), arb_expr()).prop_map(|(id, e)| Stmt::assign(sym(id), e)),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(s1, s2)| Stmt::compose(s1, s2)),
            (arb_expr(), -5i64..5, inner.clone(), inner.clone(), inner)
                .prop_map(|(e, k, lt, eq, gt)| trichotomy(e, k, [lt, eq, gt])),
        ]
    })
}

fn arb_exclusive_stmt() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        arb_exclusive_body(),
        (1i64..4, arb_exclusive_body()).prop_map(|(n, body)| counted_loop(n, body)),
        (arb_exclusive_body(), 1i64..4, arb_exclusive_body())
            .prop_map(|(pre, n, body)| Stmt::compose(pre, counted_loop(n, body))),
        (
            1i64..4,
            -1i64..2,
            arb_exclusive_body(),
            arb_exclusive_body(),
            arb_exclusive_body()
        )
            .prop_map(|(n, sel, neg, zero, pos)| selector_loop(n, sel, [neg, zero, pos])),
    ]
}

/// Arbitrary guards, possibly overlapping. Loops stay counted.
fn arb_any_stmt() -> impl Strategy<Value = Stmt> {
    let leaf = prop_oneof![
        Just(Stmt::Skip),
        (arb_name(), arb_expr()).prop_map(|(id, e)| Stmt::assign(sym(id), e)),
    ];
    let body = leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(s1, s2)| Stmt::compose(s1, s2)),
            prop::collection::vec((arb_test(), inner), 0..4).prop_map(|alts| Stmt::if_(alts)),
        ]
    });
    prop_oneof![
        body.clone(),
        (1i64..4, body).prop_map(|(n, body)| counted_loop(n, body)),
    ]
}

/// Programs that may read or write names nobody declared.
fn arb_scoped_program() -> impl Strategy<Value = Program> {
    let name = prop_oneof![Just("a"), Just("b"), Just("t"), Just("u")];
    let expr = name.clone().prop_map(var);
    let leaf = prop_oneof![
        Just(Stmt::Skip),
        (name.clone(), expr.clone()).prop_map(|(id, e)| Stmt::assign(sym(id), e)),
        (name.clone(), -3i64..3).prop_map(|(id, n)| Stmt::assign(sym(id), Expr::constant(n))),
    ];
    let stmt = leaf.prop_recursive(4, 24, 3, move |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(s1, s2)| Stmt::compose(s1, s2)),
            (name.clone(), inner.clone()).prop_map(|(id, body)| Stmt::local(sym(id), body)),
            prop::collection::vec(
                (
                    expr.clone().prop_map(|e| Test::compare(e, Expr::constant(0), CompareOp::Eq)),
                    inner
                ),
                0..3
            )
            .prop_map(|alts| Stmt::if_(alts)),
        ]
    });
    (prop::collection::vec(prop_oneof![Just("a"), Just("b")], 0..3), stmt).prop_map(
        |(names, root)| Program::new(names.into_iter().map(sym).collect(), root),
    )
}

fn agree(
    big: Result<Store, RuntimeError>,
    small: Result<Store, MachineError>,
) -> Result<(), TestCaseError> {
    match (big, small) {
        (Ok(big), Ok(small)) => {
            prop_assert_eq!(big, small);
        }
        (Err(big), Err(small)) => {
            prop_assert_eq!(MachineError::Runtime(big), small);
        }
        (big, small) => {
            return Err(TestCaseError::fail(format!(
                "evaluators disagree: big-step {:?}, stack machine {:?}",
                big, small
            )))
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn same_choices_same_store(stmt in arb_any_stmt(), fair in any::<bool>()) {
        let strategy = if fair { DoStrategy::Fair } else { DoStrategy::Exhaust };
        let big = Interpreter::with_chooser(FirstChooser, strategy)
            .evaluate_statement(&stmt, start_store());
        let small = Machine::with_chooser(
            vec![Control::Stmt(stmt)],
            Vec::new(),
            start_store(),
            FirstChooser,
            strategy,
        )
        .run();
        agree(big, small)?;
    }

    #[test]
    fn exclusive_guards_agree_under_any_order(
        stmt in arb_exclusive_stmt(),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        fair in any::<bool>(),
    ) {
        let strategy = if fair { DoStrategy::Fair } else { DoStrategy::Exhaust };
        let big = Interpreter::with_chooser(RandomChooser::seeded(seed_a), strategy)
            .evaluate_statement(&stmt, start_store());
        let small = Machine::with_chooser(
            vec![Control::Stmt(stmt)],
            Vec::new(),
            start_store(),
            RandomChooser::seeded(seed_b),
            strategy,
        )
        .run();
        agree(big, small)?;
    }

    #[test]
    fn repeated_runs_are_reproducible(
        stmt in arb_exclusive_stmt(),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
    ) {
        let first = Interpreter::with_chooser(RandomChooser::seeded(seed_a), DoStrategy::Exhaust)
            .evaluate_statement(&stmt, start_store());
        let second = Interpreter::with_chooser(RandomChooser::seeded(seed_b), DoStrategy::Exhaust)
            .evaluate_statement(&stmt, start_store());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn well_scoped_programs_never_hit_unbound_names(program in arb_scoped_program(), seed in any::<u64>()) {
        if Resolver::well_scoped(&program) {
            let result = Interpreter::with_chooser(RandomChooser::seeded(seed), DoStrategy::Exhaust)
                .interpret(&program);
            let unbound = matches!(result, Err(RuntimeError::UnboundVariable { .. }));
            prop_assert!(!unbound);
        }
    }
}

#[test]
fn test_overlapping_guards_can_diverge() {
    // both guards hold, so the two evaluators may legitimately disagree
    let stmt = Stmt::if_(vec![
        (Test::True, Stmt::assign(sym("a"), Expr::constant(1))),
        (Test::True, Stmt::assign(sym("a"), Expr::constant(2))),
    ]);
    let mut seen = Vec::new();
    for seed in 0..64 {
        let store = Interpreter::with_chooser(RandomChooser::seeded(seed), DoStrategy::Exhaust)
            .evaluate_statement(&stmt, start_store())
            .unwrap();
        seen.push(store.value_of("a"));
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen, vec![Some(1), Some(2)]);
}
