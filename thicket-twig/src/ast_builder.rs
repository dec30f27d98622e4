use pest::iterators::{Pair, Pairs};
use thicket_ast::NodeProto;

use crate::nodes::{Modifiers, TwigKind, TwigPayload};
use crate::parser::{Rule, TwigParseError};

type Proto = NodeProto<TwigPayload>;
type BuildResult = Result<Proto, TwigParseError>;

/// Converts pest parse trees into twig node prototypes.
///
/// Pass-through grammar rules (a binary chain with a single operand, a
/// postfix without calls, ...) do not produce nodes of their own.
pub struct AstBuilder;

fn lines(pair: &Pair<Rule>) -> (usize, usize) {
    let span = pair.as_span();
    (span.start_pos().line_col().0, span.end_pos().line_col().0)
}

fn payload(kind: TwigKind, pair: &Pair<Rule>) -> TwigPayload {
    let (begin, end) = lines(pair);
    TwigPayload::new(kind, begin, end)
}

fn next<'i>(pairs: &mut Pairs<'i, Rule>, context: &str) -> Result<Pair<'i, Rule>, TwigParseError> {
    pairs
        .next()
        .ok_or_else(|| TwigParseError::Malformed(format!("{} ended early", context)))
}

fn unexpected(rule: Rule, context: &str) -> TwigParseError {
    TwigParseError::Malformed(format!("unexpected {:?} in {}", rule, context))
}

impl AstBuilder {
    pub fn build_file(pair: Pair<Rule>) -> BuildResult {
        let unit = payload(TwigKind::CompilationUnit, &pair);
        let mut children = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::import_decl => children.push(Self::build_import(inner)?),
                Rule::class_decl => children.push(Self::build_class(inner)?),
                Rule::EOI => {}
                rule => return Err(unexpected(rule, "file")),
            }
        }
        Ok(NodeProto::new(unit, children))
    }

    fn build_import(pair: Pair<Rule>) -> BuildResult {
        let node = payload(TwigKind::ImportDeclaration, &pair);
        let name = next(&mut pair.into_inner(), "import")?;
        Ok(NodeProto::leaf(node.with_image(name.as_str())))
    }

    fn build_class(pair: Pair<Rule>) -> BuildResult {
        let node = payload(TwigKind::ClassDeclaration, &pair);
        let mut inner = pair.into_inner();
        let name = next(&mut inner, "class")?;

        let members = inner
            .map(|member| match member.as_rule() {
                Rule::field_decl => Self::build_field(member),
                Rule::method_decl => Self::build_method(member),
                rule => Err(unexpected(rule, "class body")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodeProto::new(node.with_image(name.as_str()), members))
    }

    fn build_modifiers(pair: Pair<Rule>) -> Modifiers {
        let mut modifiers = Modifiers::default();
        for modifier in pair.into_inner() {
            match modifier.as_str() {
                "public" => modifiers.public = true,
                "abstract" => modifiers.is_abstract = true,
                _ => {}
            }
        }
        modifiers
    }

    fn build_field(pair: Pair<Rule>) -> BuildResult {
        let node = payload(TwigKind::FieldDeclaration, &pair);
        let mut inner = pair.into_inner();
        let modifiers = Self::build_modifiers(next(&mut inner, "field")?);
        let name = next(&mut inner, "field")?;
        Ok(NodeProto::leaf(
            node.with_image(name.as_str()).with_modifiers(modifiers),
        ))
    }

    fn build_method(pair: Pair<Rule>) -> BuildResult {
        let node = payload(TwigKind::MethodDeclaration, &pair);
        let mut inner = pair.into_inner();
        let modifiers = Self::build_modifiers(next(&mut inner, "method")?);
        let name = next(&mut inner, "method")?;

        let params = next(&mut inner, "method")?;
        let params_node = payload(TwigKind::FormalParameters, &params);
        let formals = params
            .into_inner()
            .map(|p| NodeProto::leaf(payload(TwigKind::FormalParameter, &p).with_image(p.as_str())))
            .collect();

        let mut children = vec![NodeProto::new(params_node, formals)];
        if let Some(body) = inner.next() {
            children.push(Self::build_statement(body)?);
        }

        Ok(NodeProto::new(
            node.with_image(name.as_str()).with_modifiers(modifiers),
            children,
        ))
    }

    fn build_statement(pair: Pair<Rule>) -> BuildResult {
        let rule = pair.as_rule();
        let kind = match rule {
            Rule::block => TwigKind::Block,
            Rule::if_stmt => TwigKind::IfStatement,
            Rule::else_clause => TwigKind::ElseClause,
            Rule::while_stmt => TwigKind::WhileStatement,
            Rule::return_stmt => TwigKind::ReturnStatement,
            Rule::expr_stmt => TwigKind::ExpressionStatement,
            rule => return Err(unexpected(rule, "statement position")),
        };
        let node = payload(kind, &pair);

        let children = pair
            .into_inner()
            .map(|child| match child.as_rule() {
                Rule::expr => Self::build_expr(child),
                _ => Self::build_statement(child),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodeProto::new(node, children))
    }

    fn build_expr(pair: Pair<Rule>) -> BuildResult {
        match pair.as_rule() {
            Rule::expr => Self::build_expr(next(&mut pair.into_inner(), "expression")?),
            Rule::assignment => Self::build_assignment(pair),
            Rule::ternary => Self::build_ternary(pair),
            Rule::or_expr | Rule::and_expr | Rule::eq_expr | Rule::rel_expr | Rule::add_expr => {
                Self::build_infix_chain(pair)
            }
            Rule::unary => Self::build_unary(pair),
            Rule::postfix => Self::build_postfix(pair),
            Rule::number => Ok(NodeProto::leaf(
                payload(TwigKind::Literal, &pair).with_image(pair.as_str()),
            )),
            Rule::identifier => Ok(NodeProto::leaf(
                payload(TwigKind::Name, &pair).with_image(pair.as_str()),
            )),
            rule => Err(unexpected(rule, "expression")),
        }
    }

    fn build_assignment(pair: Pair<Rule>) -> BuildResult {
        let node = payload(TwigKind::Assignment, &pair);
        let mut inner = pair.into_inner();
        let target = Self::build_expr(next(&mut inner, "assignment")?)?;
        match inner.next() {
            None => Ok(target),
            Some(op) => {
                let value = Self::build_expr(next(&mut inner, "assignment")?)?;
                Ok(NodeProto::new(node.with_image(op.as_str()), vec![target, value]))
            }
        }
    }

    fn build_ternary(pair: Pair<Rule>) -> BuildResult {
        let node = payload(TwigKind::ConditionalExpression, &pair);
        let mut inner = pair.into_inner();
        let condition = Self::build_expr(next(&mut inner, "conditional")?)?;
        match inner.next() {
            None => Ok(condition),
            Some(then) => {
                let then = Self::build_expr(then)?;
                let otherwise = Self::build_expr(next(&mut inner, "conditional")?)?;
                Ok(NodeProto::new(node, vec![condition, then, otherwise]))
            }
        }
    }

    /// `a op b op c` becomes `((a op b) op c)`.
    fn build_infix_chain(pair: Pair<Rule>) -> BuildResult {
        let mut inner = pair.into_inner();
        let mut left = Self::build_expr(next(&mut inner, "binary expression")?)?;
        while let Some(op) = inner.next() {
            let right = Self::build_expr(next(&mut inner, "binary expression")?)?;
            let node = TwigPayload::new(
                TwigKind::InfixExpression,
                left.payload.begin_line,
                right.payload.end_line,
            )
            .with_image(op.as_str());
            left = NodeProto::new(node, vec![left, right]);
        }
        Ok(left)
    }

    fn build_unary(pair: Pair<Rule>) -> BuildResult {
        let (begin, end) = lines(&pair);
        let mut operators = Vec::new();
        let mut operand = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::not_op => operators.push(child.as_str().to_string()),
                _ => operand = Some(Self::build_expr(child)?),
            }
        }
        let mut expr =
            operand.ok_or_else(|| TwigParseError::Malformed("unary without operand".to_string()))?;
        for op in operators.into_iter().rev() {
            let node = TwigPayload::new(TwigKind::UnaryExpression, begin, end).with_image(op);
            expr = NodeProto::new(node, vec![expr]);
        }
        Ok(expr)
    }

    fn build_postfix(pair: Pair<Rule>) -> BuildResult {
        let mut inner = pair.into_inner();
        let mut expr = Self::build_expr(next(&mut inner, "postfix")?)?;
        for call in inner {
            let (_, end) = lines(&call);
            let args_node = payload(TwigKind::Arguments, &call);
            let args = call
                .into_inner()
                .map(Self::build_expr)
                .collect::<Result<Vec<_>, _>>()?;
            let node = TwigPayload::new(TwigKind::MethodCall, expr.payload.begin_line, end);
            expr = NodeProto::new(node, vec![expr, NodeProto::new(args_node, args)]);
        }
        Ok(expr)
    }
}
