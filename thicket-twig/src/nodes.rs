//! Twig AST nodes.

use std::fmt;

use thicket_ast::{of_kind, ArenaNode, Node, NodePayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwigKind {
    CompilationUnit,
    ImportDeclaration,
    ClassDeclaration,
    FieldDeclaration,
    MethodDeclaration,
    FormalParameters,
    FormalParameter,
    Block,
    IfStatement,
    ElseClause,
    WhileStatement,
    ReturnStatement,
    ExpressionStatement,
    Assignment,
    ConditionalExpression,
    InfixExpression,
    UnaryExpression,
    MethodCall,
    Arguments,
    Name,
    Literal,
}

impl TwigKind {
    pub fn name(self) -> &'static str {
        match self {
            TwigKind::CompilationUnit => "CompilationUnit",
            TwigKind::ImportDeclaration => "ImportDeclaration",
            TwigKind::ClassDeclaration => "ClassDeclaration",
            TwigKind::FieldDeclaration => "FieldDeclaration",
            TwigKind::MethodDeclaration => "MethodDeclaration",
            TwigKind::FormalParameters => "FormalParameters",
            TwigKind::FormalParameter => "FormalParameter",
            TwigKind::Block => "Block",
            TwigKind::IfStatement => "IfStatement",
            TwigKind::ElseClause => "ElseClause",
            TwigKind::WhileStatement => "WhileStatement",
            TwigKind::ReturnStatement => "ReturnStatement",
            TwigKind::ExpressionStatement => "ExpressionStatement",
            TwigKind::Assignment => "Assignment",
            TwigKind::ConditionalExpression => "ConditionalExpression",
            TwigKind::InfixExpression => "InfixExpression",
            TwigKind::UnaryExpression => "UnaryExpression",
            TwigKind::MethodCall => "MethodCall",
            TwigKind::Arguments => "Arguments",
            TwigKind::Name => "Name",
            TwigKind::Literal => "Literal",
        }
    }

    /// Statements counted by NCSS.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            TwigKind::IfStatement
                | TwigKind::ElseClause
                | TwigKind::WhileStatement
                | TwigKind::ReturnStatement
                | TwigKind::ExpressionStatement
        )
    }
}

impl fmt::Display for TwigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub public: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwigPayload {
    pub kind: TwigKind,
    /// Identifier, operator or literal text, when the node has one.
    pub image: Option<String>,
    pub modifiers: Modifiers,
    pub begin_line: usize,
    pub end_line: usize,
}

impl TwigPayload {
    pub fn new(kind: TwigKind, begin_line: usize, end_line: usize) -> Self {
        Self {
            kind,
            image: None,
            modifiers: Modifiers::default(),
            begin_line,
            end_line,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl NodePayload for TwigPayload {
    fn kind(&self) -> &'static str {
        self.kind.name()
    }
}

pub type TwigNode = ArenaNode<TwigPayload>;

/// Accessors for the twig payload of a node.
pub trait TwigNodeExt {
    fn twig_kind(&self) -> TwigKind;
    fn image(&self) -> Option<&str>;
    fn is_public(&self) -> bool;
    fn is_abstract(&self) -> bool;
    fn begin_line(&self) -> usize;
    fn end_line(&self) -> usize;

    fn is(&self, kind: TwigKind) -> bool {
        self.twig_kind() == kind
    }
}

impl TwigNodeExt for TwigNode {
    fn twig_kind(&self) -> TwigKind {
        self.payload().kind
    }

    fn image(&self) -> Option<&str> {
        self.payload().image.as_deref()
    }

    fn is_public(&self) -> bool {
        self.payload().modifiers.public
    }

    fn is_abstract(&self) -> bool {
        self.payload().modifiers.is_abstract
    }

    fn begin_line(&self) -> usize {
        self.payload().begin_line
    }

    fn end_line(&self) -> usize {
        self.payload().end_line
    }
}

/// The body block of a method declaration, `None` for abstract methods.
pub fn method_body(method: &TwigNode) -> Option<TwigNode> {
    method.first_child_of_kind(TwigKind::Block.name())
}

/// The enclosing class of `node`, if any.
pub fn enclosing_class(node: &TwigNode) -> Option<TwigNode> {
    node.first_ancestor(of_kind(TwigKind::ClassDeclaration.name()))
}
