//! The twig metric catalog.
//!
//! Operation metrics apply to method declarations, class metrics to class
//! declarations. Abstract methods have no body and are not supported by the
//! body-based operation metrics; they still count as declarations in the
//! class-level NCSS.

use once_cell::sync::Lazy;
use regex::Regex;
use thicket_ast::{Node, NodeStreamExt};
use thicket_metrics::{Metric, MetricKey, MetricOption, MetricOptions, MetricsComputer, ResultOption};

use crate::nodes::{method_body, TwigKind, TwigNode, TwigNodeExt};

/// CYCLO: do not count `&&` and `||` in conditions as extra paths.
pub const IGNORE_BOOLEAN_PATHS: MetricOption = MetricOption::new("ignoreBooleanPaths");

/// NCSS: count the import declarations of the file towards each class.
pub const COUNT_IMPORTS: MetricOption = MetricOption::new("countImports");

static ACCESSOR_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(get|set|is)[A-Z]").expect("accessor pattern is valid"));

fn is_class(node: &TwigNode) -> bool {
    node.is(TwigKind::ClassDeclaration)
}

fn is_method(node: &TwigNode) -> bool {
    node.is(TwigKind::MethodDeclaration)
}

fn is_concrete_method(node: &TwigNode) -> bool {
    is_method(node) && method_body(node).is_some()
}

fn count_where(nodes: impl Iterator<Item = TwigNode>, pred: impl Fn(&TwigNode) -> bool) -> f64 {
    nodes.filter(|n| pred(n)).count() as f64
}

/// Cyclomatic complexity: one plus the number of decision points.
pub struct Cyclo;

impl Metric<TwigNode> for Cyclo {
    fn supports(&self, node: &TwigNode) -> bool {
        is_concrete_method(node)
    }

    fn compute_for(&self, node: &TwigNode, options: &MetricOptions, _: &MetricsComputer<TwigNode>) -> f64 {
        let count_boolean_paths = !options.contains(&IGNORE_BOOLEAN_PATHS);
        let decisions: usize = node
            .descendants()
            .filter(|n| {
                matches!(
                    n.twig_kind(),
                    TwigKind::IfStatement | TwigKind::WhileStatement | TwigKind::ConditionalExpression
                )
            })
            .map(|decision| {
                if !count_boolean_paths {
                    return 1;
                }
                1 + Cyclo::boolean_paths(&decision.child(0))
            })
            .sum();
        1.0 + decisions as f64
    }
}

impl Cyclo {
    /// `&&` and `||` operators of a condition. Nested conditional expressions
    /// are decisions of their own and are not entered.
    fn boolean_paths(condition: &TwigNode) -> usize {
        let mut count = 0;
        let mut stack = vec![condition.clone()];
        while let Some(node) = stack.pop() {
            match node.twig_kind() {
                TwigKind::ConditionalExpression => continue,
                TwigKind::InfixExpression if matches!(node.image(), Some("&&") | Some("||")) => {
                    count += 1
                }
                _ => {}
            }
            stack.extend(node.children());
        }
        count
    }
}

/// Non-commenting source statements of one method.
pub struct OperationNcss;

impl Metric<TwigNode> for OperationNcss {
    fn supports(&self, node: &TwigNode) -> bool {
        is_concrete_method(node)
    }

    fn compute_for(&self, node: &TwigNode, _: &MetricOptions, _: &MetricsComputer<TwigNode>) -> f64 {
        1.0 + count_where(node.descendants(), |n| n.twig_kind().is_statement())
    }
}

/// Non-commenting source statements of a class, its members and their bodies.
pub struct ClassNcss;

impl Metric<TwigNode> for ClassNcss {
    fn supports(&self, node: &TwigNode) -> bool {
        is_class(node)
    }

    fn compute_for(&self, node: &TwigNode, options: &MetricOptions, _: &MetricsComputer<TwigNode>) -> f64 {
        let own = 1.0
            + count_where(node.descendants(), |n| {
                let kind = n.twig_kind();
                kind.is_statement()
                    || kind == TwigKind::FieldDeclaration
                    || kind == TwigKind::MethodDeclaration
            });
        if options.contains(&COUNT_IMPORTS) {
            let imports = node
                .parent()
                .map_or(0.0, |unit| count_where(unit.children(), |n| n.is(TwigKind::ImportDeclaration)));
            own + imports
        } else {
            own
        }
    }
}

/// Lines of code spanned by a declaration of the given kind.
pub struct Loc(pub TwigKind);

impl Metric<TwigNode> for Loc {
    fn supports(&self, node: &TwigNode) -> bool {
        node.is(self.0)
    }

    fn compute_for(&self, node: &TwigNode, _: &MetricOptions, _: &MetricsComputer<TwigNode>) -> f64 {
        (1 + node.end_line() - node.begin_line()) as f64
    }
}

/// Weighted method count: sum of CYCLO over the methods of a class.
pub struct Wmc;

impl Metric<TwigNode> for Wmc {
    fn supports(&self, node: &TwigNode) -> bool {
        is_class(node)
    }

    fn compute_for(&self, node: &TwigNode, options: &MetricOptions, computer: &MetricsComputer<TwigNode>) -> f64 {
        computer.compute_with_result_option(&OP_CYCLO, node, options, ResultOption::Sum)
    }
}

/// Number of public attributes.
pub struct Nopa;

impl Metric<TwigNode> for Nopa {
    fn supports(&self, node: &TwigNode) -> bool {
        is_class(node)
    }

    fn compute_for(&self, node: &TwigNode, _: &MetricOptions, _: &MetricsComputer<TwigNode>) -> f64 {
        count_where(
            node.children().filter_kind(TwigKind::FieldDeclaration.name()),
            TwigNodeExt::is_public,
        )
    }
}

/// Number of public accessor methods: `getX`, `setX` or `isX` with a
/// single-statement body.
pub struct Noam;

impl Noam {
    fn is_accessor(method: &TwigNode) -> bool {
        method.is_public()
            && method.image().map_or(false, |name| ACCESSOR_NAME.is_match(name))
            && method_body(method).map_or(false, |body| body.num_children() == 1)
    }
}

impl Metric<TwigNode> for Noam {
    fn supports(&self, node: &TwigNode) -> bool {
        is_class(node)
    }

    fn compute_for(&self, node: &TwigNode, _: &MetricOptions, _: &MetricsComputer<TwigNode>) -> f64 {
        count_where(
            node.children().filter_kind(TwigKind::MethodDeclaration.name()),
            Noam::is_accessor,
        )
    }
}

pub static OP_CYCLO: Lazy<MetricKey<TwigNode>> = Lazy::new(|| MetricKey::new("CYCLO", Cyclo));
pub static OP_NCSS: Lazy<MetricKey<TwigNode>> = Lazy::new(|| MetricKey::new("NCSS", OperationNcss));
pub static OP_LOC: Lazy<MetricKey<TwigNode>> =
    Lazy::new(|| MetricKey::new("LOC", Loc(TwigKind::MethodDeclaration)));

pub static CLASS_WMC: Lazy<MetricKey<TwigNode>> = Lazy::new(|| MetricKey::new("WMC", Wmc));
pub static CLASS_NCSS: Lazy<MetricKey<TwigNode>> = Lazy::new(|| MetricKey::new("NCSS", ClassNcss));
pub static CLASS_LOC: Lazy<MetricKey<TwigNode>> =
    Lazy::new(|| MetricKey::new("LOC", Loc(TwigKind::ClassDeclaration)));
pub static CLASS_NOPA: Lazy<MetricKey<TwigNode>> = Lazy::new(|| MetricKey::new("NOPA", Nopa));
pub static CLASS_NOAM: Lazy<MetricKey<TwigNode>> = Lazy::new(|| MetricKey::new("NOAM", Noam));

pub fn operation_metrics() -> Vec<MetricKey<TwigNode>> {
    vec![OP_CYCLO.clone(), OP_NCSS.clone(), OP_LOC.clone()]
}

pub fn class_metrics() -> Vec<MetricKey<TwigNode>> {
    vec![
        CLASS_WMC.clone(),
        CLASS_NCSS.clone(),
        CLASS_LOC.clone(),
        CLASS_NOPA.clone(),
        CLASS_NOAM.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first(root: &TwigNode, kind: TwigKind) -> TwigNode {
        root.descendants().first_of_kind(kind.name()).unwrap()
    }

    fn value(key: &MetricKey<TwigNode>, node: &TwigNode, options: &MetricOptions) -> f64 {
        MetricsComputer::new(crate::provider::find_operations).compute_for_node(key, node, options)
    }

    #[test]
    fn cyclo_counts_decisions_and_boolean_paths() {
        let root = parse(
            "class C { method m(a, b) {
                if (a && b || a) { return 1; }
                while (a) a = a - 1;
                return a ? b : 0;
            } }",
        )
        .unwrap();
        let method = first(&root, TwigKind::MethodDeclaration);

        assert_eq!(value(&OP_CYCLO, &method, MetricOptions::empty()), 6.0);
        assert_eq!(
            value(&OP_CYCLO, &method, &MetricOptions::of([IGNORE_BOOLEAN_PATHS])),
            4.0
        );
    }

    #[test]
    fn nested_conditional_is_counted_once() {
        let root = parse(
            "class C { method m(a, b, c) {
                if (a || (b ? c && a : c)) return;
            } }",
        )
        .unwrap();
        let method = first(&root, TwigKind::MethodDeclaration);

        // if (+1, || +1), ternary (+1), the && sits in a branch
        assert_eq!(value(&OP_CYCLO, &method, MetricOptions::empty()), 4.0);
        assert_eq!(
            value(&OP_CYCLO, &method, &MetricOptions::of([IGNORE_BOOLEAN_PATHS])),
            3.0
        );
    }

    #[test]
    fn straight_line_method_has_cyclo_one() {
        let root = parse("class C { method m() { a(); b(); } }").unwrap();
        let method = first(&root, TwigKind::MethodDeclaration);
        assert_eq!(value(&OP_CYCLO, &method, MetricOptions::empty()), 1.0);
    }

    #[test]
    fn abstract_methods_are_unsupported() {
        let root = parse("class C { abstract method m(); }").unwrap();
        let method = first(&root, TwigKind::MethodDeclaration);
        assert!(!OP_CYCLO.supports(&method));
        assert!(!OP_NCSS.supports(&method));
        assert!(OP_LOC.supports(&method));
        assert!(!CLASS_LOC.supports(&method));
        assert!(value(&OP_CYCLO, &method, MetricOptions::empty()).is_nan());
    }

    #[test]
    fn ncss() {
        let root = parse(
            "import a.B;
            import c.D;
            class C {
                field x;
                abstract method n();
                method m() {
                    if (x) { y(); } else z();
                    return;
                }
            }",
        )
        .unwrap();
        let class = first(&root, TwigKind::ClassDeclaration);
        let method = class.last_child().unwrap();

        // declaration, if, call, else, call, return
        assert_eq!(value(&OP_NCSS, &method, MetricOptions::empty()), 6.0);
        // class, field, two methods, five statements
        assert_eq!(value(&CLASS_NCSS, &class, MetricOptions::empty()), 9.0);
        assert_eq!(value(&CLASS_NCSS, &class, &MetricOptions::of([COUNT_IMPORTS])), 11.0);
    }

    #[test]
    fn loc_spans_lines() {
        let root = parse("class C {\n  method m() {\n    a();\n  }\n}").unwrap();
        let class = first(&root, TwigKind::ClassDeclaration);
        let method = first(&root, TwigKind::MethodDeclaration);
        assert_eq!(value(&CLASS_LOC, &class, MetricOptions::empty()), 5.0);
        assert_eq!(value(&OP_LOC, &method, MetricOptions::empty()), 3.0);
    }

    #[test]
    fn wmc_sums_cyclo_of_concrete_methods() {
        let root = parse(
            "class C {
                method a() { if (x) y(); }
                method b() { return; }
                abstract method c();
            }",
        )
        .unwrap();
        let class = first(&root, TwigKind::ClassDeclaration);
        assert_eq!(value(&CLASS_WMC, &class, MetricOptions::empty()), 3.0);
    }

    #[test]
    fn wmc_of_class_without_methods_is_zero() {
        let root = parse("class C { field f; }").unwrap();
        let class = first(&root, TwigKind::ClassDeclaration);
        assert_eq!(value(&CLASS_WMC, &class, MetricOptions::empty()), 0.0);
    }

    #[test]
    fn nopa_and_noam() {
        let root = parse(
            "class Bean {
                public field name;
                field secret;
                public field visible;
                public method getName() { return name; }
                public method setName(n) { name = n; }
                public method isVisible() { return visible; }
                method getSecret() { return secret; }
                public method getter() { return 1; }
                public method getBoth() { a(); b(); }
            }",
        )
        .unwrap();
        let class = first(&root, TwigKind::ClassDeclaration);
        assert_eq!(value(&CLASS_NOPA, &class, MetricOptions::empty()), 2.0);
        assert_eq!(value(&CLASS_NOAM, &class, MetricOptions::empty()), 3.0);
    }

    #[test]
    fn class_and_operation_keys_are_distinct() {
        assert_ne!(*OP_LOC, *CLASS_LOC);
        assert_eq!(OP_LOC.name(), CLASS_LOC.name());
        assert_eq!(class_metrics().len(), 5);
        assert_eq!(operation_metrics().len(), 3);
    }
}
