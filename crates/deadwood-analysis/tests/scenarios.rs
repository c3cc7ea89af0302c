use deadwood_analysis::*;
use deadwood_fmt::stmt_header;
use deadwood_lexer::Lexer;
use deadwood_parser::Parser;
use deadwood_syntax::ast::{Program, StmtId};

fn parse(src: &str) -> Program {
    let tokens = Lexer::new(src).tokenize().expect("Lexing should succeed");
    Parser::new(tokens).parse_program().expect("Parsing should succeed")
}

fn render(program: &Program, ids: &[StmtId]) -> Vec<String> {
    ids.iter()
        .map(|id| stmt_header(program.find(*id).expect("flagged id exists")))
        .collect()
}

fn live(src: &str) -> Vec<String> {
    let program = parse(src);
    render(&program, &run_live_variable_analysis(&program))
}

fn mixed(src: &str) -> Vec<String> {
    mixed_with(src, AnalysisLimits::default())
}

fn mixed_with(src: &str, limits: AnalysisLimits) -> Vec<String> {
    let program = parse(src);
    render(&program, &run_mixed_analysis(&program, &limits))
}

fn classify(src: &str) -> (Program, ValueReport) {
    classify_with(src, AnalysisLimits::default())
}

fn classify_with(src: &str, limits: AnalysisLimits) -> (Program, ValueReport) {
    let program = parse(src);
    let report = run_possible_value_analysis(&program, &limits);
    (program, report)
}

fn headers(program: &Program, ids: impl Iterator<Item = StmtId>) -> Vec<String> {
    ids.map(|id| stmt_header(program.find(id).unwrap())).collect()
}

fn values_of(report: &ValueReport, name: char) -> Option<Vec<i64>> {
    report.values.get(name).map(|s| s.iter().copied().collect())
}

#[test]
fn read_then_overwritten() {
    let src = "a = 1\nb = a\na = 2\n";
    assert_eq!(live(src), vec!["b = a", "a = 2"]);
    assert_eq!(mixed(src), vec!["b = a", "a = 2"]);
}

#[test]
fn never_taken_if() {
    let src = "a = 5\nif a > 10\n  b = 1\nend\n";
    let (program, report) = classify(src);
    assert_eq!(values_of(&report, 'a'), Some(vec![5]));
    assert_eq!(headers(&program, report.never_happens()), vec!["if a > 10"]);
    assert_eq!(report.always_happens().count(), 0);
    assert_eq!(mixed(src), vec!["b = 1"]);
}

#[test]
fn never_taken_if_beats_plain_liveness() {
    let src = "a = 5\nif a > 10\n  b = 1\nend\nc = b\n";
    assert_eq!(live(src), vec!["c = b"]);
    assert_eq!(mixed(src), vec!["b = 1", "c = b"]);
}

#[test]
fn never_taken_while() {
    let src = "a = 1\nwhile a < 1\n  a = a + 1\nend\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.never_happens()), vec!["while a < 1"]);
    assert!(live(src).is_empty());
    assert_eq!(mixed(src), vec!["a = a + 1"]);
}

#[test]
fn always_taken_if() {
    let src = "a = 1\nif a < 10\n  a = 2\nend\nb = a\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.always_happens()), vec!["if a < 10"]);
    assert_eq!(values_of(&report, 'b'), Some(vec![2]));
    let flagged = mixed(src);
    assert!(!flagged.contains(&"a = 2".to_string()));
    assert_eq!(flagged, vec!["b = a"]);
}

#[test]
fn chained_reads() {
    assert_eq!(live("x = 0\ny = x + 1\n"), vec!["y = x + 1"]);
}

#[test]
fn indeterminate_if_unions_values() {
    let (_, report) = classify("a = 1\nif c\n  a = 2\nend\n");
    assert!(report.classification.is_empty());
    assert_eq!(values_of(&report, 'a'), Some(vec![1, 2]));
}

#[test]
fn condition_over_several_values() {
    let src = "a = 1\nif c\n  a = 3\nend\nif a > 0\n  b = 1\nend\nif a > 1\n  d = 1\nend\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.always_happens()), vec!["if a > 0"]);
    assert_eq!(report.never_happens().count(), 0);
}

#[test]
fn counted_loop_is_unrolled() {
    let src = "i = 0\nwhile i < 3\n  i = i + 1\nend\nr = i\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.always_happens()), vec!["while i < 3"]);
    assert_eq!(values_of(&report, 'i'), Some(vec![3]));
    assert_eq!(values_of(&report, 'r'), Some(vec![3]));
}

#[test]
fn depth_limit_clears_loop_writes() {
    let src = "i = 0\nk = 7\nwhile i < 3\n  i = i + 1\nend\n";
    let (_, report) = classify_with(src, AnalysisLimits::default().with_max_depth(2));
    assert!(report.values.is_unconstrained('i'));
    assert_eq!(values_of(&report, 'k'), Some(vec![7]));

    let (_, report) = classify("i = 0\nwhile i < 100\n  i = i + 1\nend\n");
    assert!(report.values.is_unconstrained('i'));
}

#[test]
fn unknown_loop_guard_gives_up() {
    let src = "a = 0\nb = 1\nwhile c\n  a = 1\nend\n";
    let (_, report) = classify(src);
    assert!(report.classification.is_empty());
    assert!(report.values.is_unconstrained('a'));
    assert_eq!(values_of(&report, 'b'), Some(vec![1]));
}

#[test]
fn loop_with_uncertain_exit_merges_iterations() {
    // once i is {1, 5} the guard can go either way; the skip path keeps the
    // whole set rather than only the values that fail the guard
    let src = "i = 0\nwhile i < 2\n  i = i + 1\n  if c\n    i = 5\n  end\nend\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.always_happens()), vec!["while i < 2"]);
    assert_eq!(values_of(&report, 'i'), Some(vec![1, 2, 5, 6]));
}

#[test]
fn nested_guard_seen_both_ways_is_not_classified() {
    // false on the first iteration, true on the second
    let src = "i = 0\nwhile i < 2\n  if i > 0\n    x = 1\n  end\n  i = i + 1\nend\ny = x\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.always_happens()), vec!["while i < 2"]);
    assert_eq!(report.never_happens().count(), 0);
    assert!(!mixed(src).contains(&"x = 1".to_string()));
}

#[test]
fn loop_escape_unclassifies_nested_guards() {
    let src = "i = 0\nwhile i < 100\n  if i > 200\n    x = 1\n  end\n  i = i + 1\nend\ny = x\n";
    let (program, report) = classify(src);
    assert_eq!(headers(&program, report.always_happens()), vec!["while i < 100"]);
    assert_eq!(report.never_happens().count(), 0);
    assert!(!mixed(src).contains(&"x = 1".to_string()));
}

#[test]
fn division_by_zero_makes_guard_unknown() {
    let src = "a = 0\nif 1 / a > 0\n  b = 1\nend\nc = 10 / a\n";
    let (_, report) = classify(src);
    assert!(report.classification.is_empty());
    assert!(report.values.is_unconstrained('c'));
}

#[test]
fn combination_limit_is_configurable() {
    let src = "a = 1\nif c\n  a = 2\nend\nb = a + a\nif b > 1\n  d = 1\nend\n";
    let (program, report) = classify(src);
    assert_eq!(values_of(&report, 'b'), Some(vec![2, 4]));
    assert_eq!(headers(&program, report.always_happens()), vec!["if b > 1"]);

    let (_, report) = classify_with(src, AnalysisLimits::default().with_max_combinations(1));
    assert!(report.values.is_unconstrained('a'));
    assert!(report.classification.is_empty());
}

#[test]
fn always_taken_loop_drops_skip_path() {
    let src = "x = 0\ni = 0\nwhile i < 3\n  x = i\n  i = i + 1\nend\ny = x\n";
    assert_eq!(live(src), vec!["y = x"]);
    assert_eq!(mixed(src), vec!["x = 0", "y = x"]);
}

#[test]
fn findings_are_in_source_order() {
    let src = "a = 1\nif a > 5\n  b = 1\n  c = 2\n  if b > 0\n    d = 3\n  end\nend\ne = 4\n";
    assert_eq!(mixed(src), vec!["b = 1", "c = 2", "d = 3", "e = 4"]);
}

#[test]
fn dead_store_report_maps_lines() {
    let program = parse("a = 1\nb = a\na = 2\n");
    let ids = run_live_variable_analysis(&program);
    let report = dead_store_report(&program, &ids);
    let summary: Vec<(usize, char)> = report.iter().map(|d| (d.line, d.variable)).collect();
    assert_eq!(summary, vec![(2, 'b'), (3, 'a')]);
}

#[test]
fn classified_branches_report_kind() {
    let (program, report) = classify("a = 1\nwhile a < 1\n  a = 2\nend\nif a > 0\n  b = a\nend\n");
    let branches = classified_branches(&program, &report.classification);
    assert_eq!(branches.len(), 2);
    assert_eq!((branches[0].line, branches[0].kind, branches[0].reachability), (2, BranchKind::While, Reachability::Never));
    assert_eq!((branches[1].line, branches[1].kind, branches[1].reachability), (5, BranchKind::If, Reachability::Always));
}

#[test]
fn identical_statements_are_told_apart() {
    // the first `if` is always taken, the second never
    let src = "a = 1\nif a > 0\n  a = 0\nend\nif a > 0\n  a = 0\nend\nb = a\n";
    let (program, report) = classify(src);
    let always: Vec<usize> = report.always_happens().map(|id| program.find(id).unwrap().line).collect();
    let never: Vec<usize> = report.never_happens().map(|id| program.find(id).unwrap().line).collect();
    assert_eq!(always, vec![2]);
    assert_eq!(never, vec![5]);

    let flagged: Vec<usize> = run_mixed_analysis(&program, &AnalysisLimits::default())
        .into_iter()
        .map(|id| program.find(id).unwrap().line)
        .collect();
    // the guard of the first `if` still reads `a = 1`
    assert_eq!(flagged, vec![6, 8]);
}

#[test]
fn mixed_limits_propagate() {
    // the nested guard is false on every unrolled iteration; without an
    // unrolling budget the loop is given up on and the guard stays unknown
    let src = "i = 0\nwhile i < 2\n  if i > 5\n    x = 1\n  end\n  i = i + 1\nend\ny = x\n";
    assert_eq!(mixed(src), vec!["x = 1", "y = x"]);
    assert_eq!(mixed_with(src, AnalysisLimits::default().with_max_depth(0)), vec!["y = x"]);
}
