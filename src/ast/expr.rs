use std::cell::Cell;

use super::{NodeId, ParameterDef, TypeRef};
use crate::intern::Name;
use crate::scope::{ScopeId, SymbolId};
use crate::source::Span;
use crate::types::{ClassId, FuncTypeId, Ty};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub fn text(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    PreIncrement,
    PreDecrement,
}

impl UnaryOp {
    pub fn text(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::PreIncrement => "++",
            UnaryOp::PreDecrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableAccess {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    /// Inserted by the semantic pipeline.
    Implicit,
    /// Written by the programmer as `cast<T>(e)`.
    Explicit,
}

/// An expression (equivalently, a statement: every statement is an
/// expression statement). `ty` is empty until the cast-insertion pass
/// derives it from the children.
#[derive(Debug)]
pub struct Expr<'a> {
    pub id: NodeId,
    pub span: Span,
    ty: Cell<Option<Ty>>,
    pub kind: ExprKind<'a>,
}

impl<'a> Expr<'a> {
    pub fn new(id: NodeId, span: Span, kind: ExprKind<'a>) -> Self {
        Expr {
            id,
            span,
            ty: Cell::new(None),
            kind,
        }
    }

    pub fn ty(&self) -> Option<Ty> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: Ty) {
        self.ty.set(Some(ty));
    }
}

#[derive(Debug)]
pub enum ExprKind<'a> {
    LiteralInt32(i32),
    LiteralFloat(f32),
    LiteralBool(bool),
    VariableRef(VariableRef),
    VariableDecl(VariableDecl),
    Binary(BinaryExpr<'a>),
    Unary(UnaryExpr<'a>),
    Cast(CastExpr<'a>),
    If(IfExpr<'a>),
    While(WhileExpr<'a>),
    Compound(CompoundExpr<'a>),
    Return(&'a Expr<'a>),
    FuncDef(FuncDef<'a>),
    FuncCall(FuncCall<'a>),
    Dot(DotExpr<'a>),
    Class(ClassDef<'a>),
    Assert(&'a Expr<'a>),
}

#[derive(Debug)]
pub struct VariableRef {
    pub name: Name,
    /// `Write` when the reference is the left side of an assignment.
    pub access: Cell<VariableAccess>,
    pub symbol: Cell<Option<SymbolId>>,
}

/// `name:Type` — declares the variable and is itself an lvalue of the
/// declared type.
#[derive(Debug)]
pub struct VariableDecl {
    pub name: Name,
    pub type_ref: TypeRef,
    pub symbol: Cell<Option<SymbolId>>,
}

/// The operand slots are cells so the cast-insertion pass can swap a child
/// for an implicit-cast wrapper around it.
#[derive(Debug)]
pub struct BinaryExpr<'a> {
    pub lhs: Cell<&'a Expr<'a>>,
    pub op: BinaryOp,
    pub op_span: Span,
    pub rhs: Cell<&'a Expr<'a>>,
}

#[derive(Debug)]
pub struct UnaryExpr<'a> {
    pub operand: &'a Expr<'a>,
    pub op: UnaryOp,
    pub op_span: Span,
}

#[derive(Debug)]
pub struct CastExpr<'a> {
    pub target: TypeRef,
    pub value: &'a Expr<'a>,
    pub cast_kind: CastKind,
}

/// `if`/`else`, and the `(? c; t; e)` ternary form. The else branch may be
/// absent.
#[derive(Debug)]
pub struct IfExpr<'a> {
    pub condition: Cell<&'a Expr<'a>>,
    pub then_expr: Cell<&'a Expr<'a>>,
    pub else_expr: Cell<Option<&'a Expr<'a>>>,
}

#[derive(Debug)]
pub struct WhileExpr<'a> {
    pub condition: Cell<&'a Expr<'a>>,
    pub body: &'a Expr<'a>,
}

/// `{ s1; s2; ... }` — its value is the value of the last statement.
#[derive(Debug)]
pub struct CompoundExpr<'a> {
    pub scope: ScopeId,
    pub stmts: &'a [&'a Expr<'a>],
}

/// `func name : ReturnType(p1: T1, ...) body`
#[derive(Debug)]
pub struct FuncDef<'a> {
    pub name: Name,
    pub return_type_ref: TypeRef,
    pub parameters: &'a [ParameterDef],
    pub parameter_scope: ScopeId,
    pub body: &'a Expr<'a>,
    pub symbol: Cell<Option<SymbolId>>,
    pub func_ty: Cell<Option<FuncTypeId>>,
}

#[derive(Debug)]
pub struct FuncCall<'a> {
    pub target: &'a Expr<'a>,
    pub args: &'a [&'a Expr<'a>],
    pub open_paren_span: Span,
}

#[derive(Debug)]
pub struct DotExpr<'a> {
    pub lhs: &'a Expr<'a>,
    pub member: Name,
    pub dot_span: Span,
    /// Set when the dot is the target of an assignment, so a backend emits
    /// a store instead of a load.
    pub is_write: Cell<bool>,
    /// Field ordinal within the class, once the member resolves.
    pub member_ordinal: Cell<Option<u32>>,
}

/// `class Name body` — the body is always a compound with `Instance`
/// storage, named after the class.
#[derive(Debug)]
pub struct ClassDef<'a> {
    pub name: Name,
    pub body: &'a Expr<'a>,
    pub class_id: Cell<Option<ClassId>>,
}
