use std::collections::BTreeSet;

use deadwood_analysis::*;
use deadwood_syntax::ast::*;
use deadwood_syntax::eval::Bindings;
use proptest::prelude::*;

const NAMES: [char; 4] = ['a', 'b', 'c', 'd'];

#[derive(Debug, Clone)]
enum Shape {
    Assign(char, Expr),
    If(Expr, Vec<Shape>),
    While(Expr, Vec<Shape>),
}

fn op_strategy() -> impl Strategy<Value = BinOp> {
    prop::sample::select(vec![BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Lt, BinOp::Gt])
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (0i64..6).prop_map(Expr::Constant),
        prop::sample::select(NAMES.to_vec()).prop_map(Expr::Variable),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), op_strategy(), inner.clone()).prop_map(|(l, op, r)| Expr::binary(l, op, r)),
            inner.prop_map(Expr::priority),
        ]
    })
}

fn assign_strategy() -> impl Strategy<Value = Shape> {
    (prop::sample::select(NAMES.to_vec()), expr_strategy()).prop_map(|(c, e)| Shape::Assign(c, e))
}

fn shape_strategy(loops: bool) -> impl Strategy<Value = Shape> {
    assign_strategy().prop_recursive(2, 16, 3, move |inner| {
        let body = prop::collection::vec(inner, 1..3);
        if loops {
            prop_oneof![
                assign_strategy(),
                (expr_strategy(), body.clone()).prop_map(|(c, b)| Shape::If(c, b)),
                (expr_strategy(), body).prop_map(|(c, b)| Shape::While(c, b)),
            ]
            .boxed()
        } else {
            prop_oneof![
                assign_strategy(),
                (expr_strategy(), body).prop_map(|(c, b)| Shape::If(c, b)),
            ]
            .boxed()
        }
    })
}

fn program_strategy(loops: bool) -> impl Strategy<Value = Program> {
    prop::collection::vec(shape_strategy(loops), 1..6).prop_map(|shapes| {
        let mut next = 0;
        Program::new(number(&shapes, &mut next))
    })
}

/// Assigns ids in pre-order, like the parser does.
fn number(shapes: &[Shape], next: &mut u32) -> Vec<Stmt> {
    shapes
        .iter()
        .map(|shape| {
            let id = StmtId(*next);
            *next += 1;
            let kind = match shape {
                Shape::Assign(target, value) => StmtKind::Assign { target: *target, value: value.clone() },
                Shape::If(cond, body) => StmtKind::If { cond: cond.clone(), body: number(body, next) },
                Shape::While(cond, body) => StmtKind::While { cond: cond.clone(), body: number(body, next) },
            };
            Stmt { id, line: id.0 as usize + 1, kind }
        })
        .collect()
}

fn bindings_strategy() -> impl Strategy<Value = Bindings> {
    prop::collection::btree_map(prop::sample::select(NAMES.to_vec()), -3i64..4, 0..4)
}

fn assignments_in(stmts: &[Stmt], out: &mut Vec<StmtId>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Assign { .. } => out.push(stmt.id),
            StmtKind::If { body, .. } | StmtKind::While { body, .. } => assignments_in(body, out),
        }
    }
}

enum Scan {
    Read,
    Killed,
    Open,
}

/// Forward scan of loop-free code: is `var` read before it is definitely
/// overwritten?
fn scan(stmts: &[Stmt], var: char) -> Scan {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                if value.names().contains(&var) {
                    return Scan::Read;
                }
                if *target == var {
                    return Scan::Killed;
                }
            }
            StmtKind::If { cond, body } => {
                if cond.names().contains(&var) {
                    return Scan::Read;
                }
                // an overwrite inside the body may be skipped
                if let Scan::Read = scan(body, var) {
                    return Scan::Read;
                }
            }
            StmtKind::While { .. } => unreachable!("loop-free programs only"),
        }
    }
    Scan::Open
}

/// Scans what runs after the statement `id`, leaving enclosing `if` bodies
/// outwards. `None` if `id` is not in `stmts`.
fn after_store(stmts: &[Stmt], id: StmtId, var: char) -> Option<Scan> {
    for (i, stmt) in stmts.iter().enumerate() {
        let inner = if stmt.id == id {
            Some(Scan::Open)
        } else {
            match &stmt.kind {
                StmtKind::If { body, .. } => after_store(body, id, var),
                _ => None,
            }
        };
        return match inner {
            None => continue,
            Some(Scan::Open) => Some(scan(&stmts[i + 1..], var)),
            done => done,
        };
    }
    None
}

fn store_is_read(program: &Program, id: StmtId, var: char) -> bool {
    matches!(after_store(&program.statements, id, var), Some(Scan::Read))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn folding_is_idempotent(expr in expr_strategy(), bindings in bindings_strategy()) {
        if let Ok(once) = expr.evaluate(&bindings) {
            let twice = once.evaluate(&bindings);
            prop_assert_eq!(twice, Ok(once));
        }
    }

    #[test]
    fn analyses_are_deterministic(program in program_strategy(true)) {
        let limits = AnalysisLimits::default();
        prop_assert_eq!(run_live_variable_analysis(&program), run_live_variable_analysis(&program));
        prop_assert_eq!(run_possible_value_analysis(&program, &limits), run_possible_value_analysis(&program, &limits));
        prop_assert_eq!(run_mixed_analysis(&program, &limits), run_mixed_analysis(&program, &limits));
    }

    #[test]
    fn classification_is_exclusive(program in program_strategy(true)) {
        let report = run_possible_value_analysis(&program, &AnalysisLimits::default());
        let never: BTreeSet<StmtId> = report.never_happens().collect();
        let always: BTreeSet<StmtId> = report.always_happens().collect();
        prop_assert!(never.is_disjoint(&always));
        for id in never.iter().chain(&always) {
            let is_conditional = matches!(
                program.find(*id).map(|s| &s.kind),
                Some(StmtKind::If { .. } | StmtKind::While { .. })
            );
            prop_assert!(is_conditional, "{} is classified but is not a conditional", id);
        }
    }

    #[test]
    fn never_taken_bodies_are_dead(program in program_strategy(true)) {
        let limits = AnalysisLimits::default();
        let report = run_possible_value_analysis(&program, &limits);
        let flagged: BTreeSet<StmtId> = run_mixed_analysis(&program, &limits).into_iter().collect();
        for id in report.never_happens() {
            let mut inside = Vec::new();
            assignments_in(program.find(id).map(Stmt::body).unwrap_or_default(), &mut inside);
            for store in inside {
                prop_assert!(flagged.contains(&store), "{} inside never-taken {} not flagged", store, id);
            }
        }
    }

    #[test]
    fn findings_are_sorted(program in program_strategy(true)) {
        let limits = AnalysisLimits::default();
        for found in [run_live_variable_analysis(&program), run_mixed_analysis(&program, &limits)] {
            prop_assert!(found.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn mixed_flags_everything_plain_liveness_flags(program in program_strategy(true)) {
        let plain: BTreeSet<StmtId> = run_live_variable_analysis(&program).into_iter().collect();
        let mixed: BTreeSet<StmtId> = run_mixed_analysis(&program, &AnalysisLimits::default()).into_iter().collect();
        prop_assert!(plain.is_subset(&mixed));
    }

    #[test]
    fn loop_free_dead_stores_are_never_read(program in program_strategy(false)) {
        for id in run_live_variable_analysis(&program) {
            let Some(Stmt { kind: StmtKind::Assign { target, .. }, .. }) = program.find(id) else {
                return Err(TestCaseError::fail(format!("{id} is not an assignment")));
            };
            prop_assert!(!store_is_read(&program, id, *target), "{} is flagged but read later", id);
        }
    }

    #[test]
    fn combination_cap_is_respected(left in 1usize..10, right in 1usize..10) {
        let mut program = Vec::new();
        let mut next = 0;
        // a and b each take `left`/`right` distinct values through chained unknown ifs
        for (name, count) in [('a', left), ('b', right)] {
            program.push(Shape::Assign(name, Expr::Constant(0)));
            for v in 1..count as i64 {
                program.push(Shape::If(Expr::Variable('z'), vec![Shape::Assign(name, Expr::Constant(v * 10))]));
            }
        }
        program.push(Shape::Assign('c', Expr::binary(Expr::Variable('a'), BinOp::Add, Expr::Variable('b'))));
        let program = Program::new(number(&program, &mut next));
        let report = run_possible_value_analysis(&program, &AnalysisLimits::default());
        if left * right > MAX_COMBINATION_COUNT {
            prop_assert!(report.values.is_unconstrained('c'));
        } else {
            prop_assert!(!report.values.is_unconstrained('c'));
        }
    }
}
