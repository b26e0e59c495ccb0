//! Pratt parser: one prefix parselet table and one infix parselet table,
//! both indexed by token kind, driven by operator precedence.


use crate::arena_ctx::AstContext;
use crate::ast::{
    BinaryExpr, BinaryOp, CastExpr, CastKind, ClassDef, CompoundExpr, DotExpr, Expr, ExprKind,
    FuncCall, FuncDef, IfExpr, Module, ParameterDef, TypeRef, UnaryExpr, UnaryOp, VariableAccess,
    VariableDecl, VariableRef, WhileExpr,
};
use crate::error::{ErrorKind, ErrorStream};
use crate::lexer::Lexer;
use crate::scope::{ScopeArena, StorageKind};
use crate::source::{SourceLocation, Span};
use crate::token::{Token, TokenKind};
use std::cell::Cell;

/// The statement in progress cannot be parsed any further. Whatever went
/// wrong has already been reported to the error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseAborted;

pub type ParseResult<T> = Result<T, ParseAborted>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
}

const UNARY_PRECEDENCE: i32 = 13;
const NO_PRECEDENCE: i32 = -1;

type PrefixParselet<'a, 'e, 'i, 'w> =
    fn(&mut Parser<'a, 'e, 'i, 'w>, Token) -> ParseResult<&'a Expr<'a>>;
type InfixParselet<'a, 'e, 'i, 'w> =
    fn(&mut Parser<'a, 'e, 'i, 'w>, &'a Expr<'a>, Token) -> ParseResult<&'a Expr<'a>>;

pub struct Parser<'a, 'e, 'i, 'w> {
    lexer: Lexer<'e, 'i>,
    ctx: &'a AstContext<'a>,
    scopes: &'w mut ScopeArena,
    errors: &'e ErrorStream,
}

impl<'a, 'e, 'i, 'w> Parser<'a, 'e, 'i, 'w> {
    pub fn new(
        lexer: Lexer<'e, 'i>,
        ctx: &'a AstContext<'a>,
        scopes: &'w mut ScopeArena,
        errors: &'e ErrorStream,
    ) -> Self {
        Parser {
            lexer,
            ctx,
            scopes,
            errors,
        }
    }

    /// Parses the whole input as a module whose body is a compound over the
    /// global scope, named after the input.
    pub fn parse_module(&mut self) -> ParseResult<Module<'a>> {
        let name = self.lexer.input_name();
        let mut stmts = Vec::new();
        while !self.lexer.eof() {
            stmts.push(self.parse_expr_stmt()?);
        }

        let scope = self.scopes.alloc(StorageKind::Global, Some(name));
        let span = Span::new(name, SourceLocation::new(1, 1), self.lexer.current_location());
        let body = self.ctx.alloc_expr(
            span,
            ExprKind::Compound(CompoundExpr {
                scope,
                stmts: self.ctx.alloc_stmts(stmts),
            }),
        );
        Ok(Module { name, body })
    }

    /// One statement: an expression, followed by `;` unless the expression
    /// is self-delimited (`{...}`, `if`, `while`, `func`, `class`).
    pub fn parse_expr_stmt(&mut self) -> ParseResult<&'a Expr<'a>> {
        let composite = matches!(
            self.lexer.peek_token().kind,
            TokenKind::OpenCurly
                | TokenKind::KwIf
                | TokenKind::KwWhile
                | TokenKind::KwFunc
                | TokenKind::KwClass
        );

        let expr = self.parse_expr(0)?;

        // Self-delimited forms don't need the ';', but one is consumed if
        // the programmer wrote it anyway.
        if composite {
            self.consume_optional(TokenKind::EndOfStatement);
        } else {
            self.consume(TokenKind::EndOfStatement, "';'");
        }
        Ok(expr)
    }

    pub fn parse_expr(&mut self, precedence: i32) -> ParseResult<&'a Expr<'a>> {
        let token = self.lexer.next_token();
        if token.kind == TokenKind::EndOfInput {
            self.errors.error(
                ErrorKind::UnexpectedToken,
                token.span,
                "Unexpected end of input",
            );
            return Err(ParseAborted);
        }

        let Some(prefix) = Self::prefix_parselet(token.kind) else {
            self.surprise(token);
            return Err(ParseAborted);
        };
        let mut left = prefix(self, token)?;

        loop {
            let token = self.lexer.peek_token();
            if token.kind == TokenKind::EndOfInput
                || precedence >= Self::operator_precedence(token.kind)
            {
                break;
            }
            self.lexer.next_token();
            let Some(infix) = Self::infix_parselet(token.kind) else {
                self.surprise(token);
                return Err(ParseAborted);
            };
            left = infix(self, left, token)?;
        }

        Ok(left)
    }

    fn prefix_parselet(kind: TokenKind) -> Option<PrefixParselet<'a, 'e, 'i, 'w>> {
        let parselet: PrefixParselet<'a, 'e, 'i, 'w> = match kind {
            TokenKind::LitInt => Self::parse_literal_int32,
            TokenKind::LitFloat => Self::parse_literal_float,
            TokenKind::KwTrue | TokenKind::KwFalse => Self::parse_literal_bool,
            TokenKind::Ident => Self::parse_variable_ref,
            TokenKind::Not | TokenKind::Inc | TokenKind::Dec => Self::parse_prefix_unary,
            TokenKind::OpenCurly => Self::parse_compound,
            TokenKind::OpenParen => Self::parse_parens,
            TokenKind::KwCast => Self::parse_cast,
            TokenKind::Cond => Self::parse_conditional,
            TokenKind::KwIf => Self::parse_if,
            TokenKind::KwWhile => Self::parse_while,
            TokenKind::KwFunc => Self::parse_func_def,
            TokenKind::KwClass => Self::parse_class_def,
            TokenKind::KwAssert => Self::parse_assert,
            _ => return None,
        };
        Some(parselet)
    }

    fn infix_parselet(kind: TokenKind) -> Option<InfixParselet<'a, 'e, 'i, 'w>> {
        let parselet: InfixParselet<'a, 'e, 'i, 'w> = match kind {
            TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::Div
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::LogicalAnd
            | TokenKind::LogicalOr
            | TokenKind::Assign => Self::parse_binary,
            TokenKind::Dot => Self::parse_dot,
            TokenKind::OpenParen => Self::parse_func_call,
            _ => return None,
        };
        Some(parselet)
    }

    fn operator_precedence(kind: TokenKind) -> i32 {
        match kind {
            TokenKind::Dot | TokenKind::OpenParen => 14,
            TokenKind::Not => UNARY_PRECEDENCE,
            TokenKind::Mul | TokenKind::Div => 11,
            TokenKind::Add | TokenKind::Sub => 10,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => 8,
            TokenKind::Eq | TokenKind::NotEq => 7,
            TokenKind::LogicalAnd => 3,
            TokenKind::LogicalOr => 2,
            TokenKind::Assign => 1,
            _ => NO_PRECEDENCE,
        }
    }

    fn operator_associativity(kind: TokenKind) -> Associativity {
        match kind {
            TokenKind::Assign | TokenKind::Not => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    fn surprise(&mut self, token: Token) {
        let text = self.lexer.interner().resolve(token.text).to_string();
        self.errors.error(
            ErrorKind::SurpriseToken,
            token.span,
            format!("The token '{}' came as a complete surprise to me.", text),
        );
    }

    /// Advances and checks the token kind. On mismatch a diagnostic is
    /// emitted and the token is returned anyway; callers keep parsing with
    /// what they actually got.
    fn consume(&mut self, kind: TokenKind, expected: &str) -> Token {
        let token = self.lexer.next_token();
        if token.kind != kind {
            self.errors.error(
                ErrorKind::UnexpectedToken,
                token.span,
                format!("Expected {}", expected),
            );
        }
        token
    }

    fn consume_either(&mut self, kind1: TokenKind, kind2: TokenKind, expected: &str) -> Token {
        let token = self.lexer.next_token();
        if token.kind != kind1 && token.kind != kind2 {
            self.errors.error(
                ErrorKind::UnexpectedToken,
                token.span,
                format!("Expected {}", expected),
            );
        }
        token
    }

    fn consume_optional(&mut self, kind: TokenKind) -> Option<Token> {
        if self.lexer.peek_token().kind == kind {
            Some(self.lexer.next_token())
        } else {
            None
        }
    }

    fn parse_type_ref(&mut self) -> TypeRef {
        let token = self.consume(TokenKind::Ident, "type identifier");
        TypeRef::named(self.ctx.next_node_id(), token.span, token.text)
    }

    fn parse_literal_int32(&mut self, token: Token) -> ParseResult<&'a Expr<'a>> {
        let value = token.int_value();
        Ok(self.ctx.alloc_expr(token.span, ExprKind::LiteralInt32(value)))
    }

    fn parse_literal_float(&mut self, token: Token) -> ParseResult<&'a Expr<'a>> {
        let value = token.float_value();
        Ok(self.ctx.alloc_expr(token.span, ExprKind::LiteralFloat(value)))
    }

    fn parse_literal_bool(&mut self, token: Token) -> ParseResult<&'a Expr<'a>> {
        let value = token.bool_value();
        Ok(self.ctx.alloc_expr(token.span, ExprKind::LiteralBool(value)))
    }

    /// A bare identifier is a read reference; `name : Type` declares a
    /// variable.
    fn parse_variable_ref(&mut self, token: Token) -> ParseResult<&'a Expr<'a>> {
        if self.consume_optional(TokenKind::Colon).is_some() {
            let type_ref = self.parse_type_ref();
            let span = Span::merge(token.span, type_ref.span);
            return Ok(self.ctx.alloc_expr(
                span,
                ExprKind::VariableDecl(VariableDecl {
                    name: token.text,
                    type_ref,
                    symbol: Cell::new(None),
                }),
            ));
        }
        Ok(self.ctx.alloc_expr(
            token.span,
            ExprKind::VariableRef(VariableRef {
                name: token.text,
                access: Cell::new(VariableAccess::Read),
                symbol: Cell::new(None),
            }),
        ))
    }

    fn parse_prefix_unary(&mut self, token: Token) -> ParseResult<&'a Expr<'a>> {
        let op = match token.kind {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Inc => UnaryOp::PreIncrement,
            TokenKind::Dec => UnaryOp::PreDecrement,
            _ => unreachable!("prefix unary parselet registered for {:?}", token.kind),
        };
        let operand = self.parse_expr(UNARY_PRECEDENCE - 1)?;
        let span = Span::merge(token.span, operand.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::Unary(UnaryExpr {
                operand,
                op,
                op_span: token.span,
            }),
        ))
    }

    fn parse_compound(&mut self, open_curly: Token) -> ParseResult<&'a Expr<'a>> {
        let mut stmts = Vec::new();
        let close_curly = loop {
            if let Some(close) = self.consume_optional(TokenKind::CloseCurly) {
                break close;
            }
            stmts.push(self.parse_expr_stmt()?);
        };

        let scope = self.scopes.alloc(StorageKind::Local, None);
        let span = Span::merge(open_curly.span, close_curly.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::Compound(CompoundExpr {
                scope,
                stmts: self.ctx.alloc_stmts(stmts),
            }),
        ))
    }

    fn parse_parens(&mut self, _open_paren: Token) -> ParseResult<&'a Expr<'a>> {
        let expr = self.parse_expr(0)?;
        self.consume(TokenKind::CloseParen, "')'");
        Ok(expr)
    }

    /// `cast<T>(e)`
    fn parse_cast(&mut self, cast_keyword: Token) -> ParseResult<&'a Expr<'a>> {
        self.consume(TokenKind::Lt, "'<'");
        let target = self.parse_type_ref();
        self.consume(TokenKind::Gt, "'>'");
        self.consume(TokenKind::OpenParen, "'('");
        let value = self.parse_expr(0)?;
        let close_paren = self.consume(TokenKind::CloseParen, "')'");

        let span = Span::merge(cast_keyword.span, close_paren.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::Cast(CastExpr {
                target,
                value,
                cast_kind: CastKind::Explicit,
            }),
        ))
    }

    /// `(? cond; then; else)`
    fn parse_conditional(&mut self, opening_op: Token) -> ParseResult<&'a Expr<'a>> {
        let condition = self.parse_expr(0)?;
        self.consume(TokenKind::EndOfStatement, "';'");
        let then_expr = self.parse_expr(0)?;
        self.consume(TokenKind::EndOfStatement, "';'");
        let else_expr = self.parse_expr(0)?;
        let close_paren = self.consume(TokenKind::CloseParen, "')'");

        let span = Span::merge(opening_op.span, close_paren.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::If(IfExpr {
                condition: Cell::new(condition),
                then_expr: Cell::new(then_expr),
                else_expr: Cell::new(Some(else_expr)),
            }),
        ))
    }

    fn parse_if(&mut self, if_keyword: Token) -> ParseResult<&'a Expr<'a>> {
        self.consume(TokenKind::OpenParen, "'('");
        let condition = self.parse_expr(0)?;
        self.consume(TokenKind::CloseParen, "')'");

        let then_expr = self.parse_expr(0)?;
        let mut else_expr = None;
        if self.consume_optional(TokenKind::KwElse).is_some() {
            else_expr = Some(self.parse_expr(0)?);
        }

        let last = else_expr.unwrap_or(then_expr);
        let span = Span::merge(if_keyword.span, last.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::If(IfExpr {
                condition: Cell::new(condition),
                then_expr: Cell::new(then_expr),
                else_expr: Cell::new(else_expr),
            }),
        ))
    }

    fn parse_while(&mut self, while_keyword: Token) -> ParseResult<&'a Expr<'a>> {
        self.consume(TokenKind::OpenParen, "'('");
        let condition = self.parse_expr(0)?;
        self.consume(TokenKind::CloseParen, "')'");
        let body = self.parse_expr(0)?;

        let span = Span::merge(while_keyword.span, body.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::While(WhileExpr {
                condition: Cell::new(condition),
                body,
            }),
        ))
    }

    /// `func name : ReturnType(p1: T1, p2: T2, ...) body`
    fn parse_func_def(&mut self, func_keyword: Token) -> ParseResult<&'a Expr<'a>> {
        let identifier = self.consume(TokenKind::Ident, "identifier");
        self.consume(TokenKind::Colon, "':'");
        let return_type_ref = self.parse_type_ref();
        self.consume(TokenKind::OpenParen, "'('");

        let mut parameters = Vec::new();
        if self.consume_optional(TokenKind::CloseParen).is_none() {
            loop {
                let name = self.consume(TokenKind::Ident, "identifier");
                self.consume(TokenKind::Colon, "':'");
                let type_ref = self.parse_type_ref();
                parameters.push(ParameterDef {
                    id: self.ctx.next_node_id(),
                    span: Span::merge(name.span, type_ref.span),
                    name: name.text,
                    type_ref,
                    symbol: Cell::new(None),
                });

                let next = self.consume_either(
                    TokenKind::Comma,
                    TokenKind::CloseParen,
                    "',' or ')'",
                );
                match next.kind {
                    TokenKind::CloseParen => break,
                    TokenKind::Comma => continue,
                    _ => return Err(ParseAborted),
                }
            }
        }

        let parameter_scope = self.scopes.alloc(StorageKind::Local, Some(identifier.text));
        let body = self.parse_expr(0)?;

        let span = Span::merge(func_keyword.span, body.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::FuncDef(FuncDef {
                name: identifier.text,
                return_type_ref,
                parameters: self.ctx.alloc_params(parameters),
                parameter_scope,
                body,
                symbol: Cell::new(None),
                func_ty: Cell::new(None),
            }),
        ))
    }

    /// `class Name body` — a non-compound body is wrapped in a one-statement
    /// compound; either way the body scope becomes an instance scope named
    /// after the class.
    fn parse_class_def(&mut self, class_keyword: Token) -> ParseResult<&'a Expr<'a>> {
        let class_name = self.consume(TokenKind::Ident, "identifier");
        let class_body = self.parse_expr(0)?;

        let body = match &class_body.kind {
            ExprKind::Compound(compound) => {
                self.scopes.set_storage(compound.scope, StorageKind::Instance);
                self.scopes.set_name(compound.scope, class_name.text);
                class_body
            }
            _ => {
                let scope = self
                    .scopes
                    .alloc(StorageKind::Instance, Some(class_name.text));
                self.ctx.alloc_expr(
                    class_body.span,
                    ExprKind::Compound(CompoundExpr {
                        scope,
                        stmts: self.ctx.alloc_stmts([class_body]),
                    }),
                )
            }
        };

        let span = Span::merge(class_keyword.span, class_body.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::Class(ClassDef {
                name: class_name.text,
                body,
                class_id: Cell::new(None),
            }),
        ))
    }

    /// `assert(e)`
    fn parse_assert(&mut self, assert_keyword: Token) -> ParseResult<&'a Expr<'a>> {
        self.consume(TokenKind::OpenParen, "'('");
        let condition = self.parse_expr(0)?;
        let close_paren = self.consume(TokenKind::CloseParen, "')'");

        let span = Span::merge(assert_keyword.span, close_paren.span);
        Ok(self.ctx.alloc_expr(span, ExprKind::Assert(condition)))
    }

    fn parse_binary(&mut self, lhs: &'a Expr<'a>, op_token: Token) -> ParseResult<&'a Expr<'a>> {
        let op = match op_token.kind {
            TokenKind::Assign => {
                // The reference left of '=' is a write target, not a read.
                if let ExprKind::VariableRef(var_ref) = &lhs.kind {
                    var_ref.access.set(VariableAccess::Write);
                }
                BinaryOp::Assign
            }
            TokenKind::Add => BinaryOp::Add,
            TokenKind::Sub => BinaryOp::Sub,
            TokenKind::Mul => BinaryOp::Mul,
            TokenKind::Div => BinaryOp::Div,
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::LessThan,
            TokenKind::LtEq => BinaryOp::LessThanOrEqual,
            TokenKind::Gt => BinaryOp::GreaterThan,
            TokenKind::GtEq => BinaryOp::GreaterThanOrEqual,
            TokenKind::LogicalAnd => BinaryOp::LogicalAnd,
            TokenKind::LogicalOr => BinaryOp::LogicalOr,
            _ => unreachable!("binary parselet registered for {:?}", op_token.kind),
        };

        let mut precedence = Self::operator_precedence(op_token.kind);
        if Self::operator_associativity(op_token.kind) == Associativity::Right {
            precedence -= 1;
        }
        let rhs = self.parse_expr(precedence)?;

        let span = Span::merge(lhs.span, rhs.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::Binary(BinaryExpr {
                lhs: Cell::new(lhs),
                op,
                op_span: op_token.span,
                rhs: Cell::new(rhs),
            }),
        ))
    }

    fn parse_dot(&mut self, lhs: &'a Expr<'a>, dot_token: Token) -> ParseResult<&'a Expr<'a>> {
        let member = self.consume(TokenKind::Ident, "identifier");
        let span = Span::merge(lhs.span, member.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::Dot(DotExpr {
                lhs,
                member: member.text,
                dot_span: dot_token.span,
                is_write: Cell::new(false),
                member_ordinal: Cell::new(None),
            }),
        ))
    }

    fn parse_func_call(
        &mut self,
        target: &'a Expr<'a>,
        open_paren: Token,
    ) -> ParseResult<&'a Expr<'a>> {
        let mut args = Vec::new();
        let close_paren = match self.consume_optional(TokenKind::CloseParen) {
            Some(close) => close,
            None => loop {
                args.push(self.parse_expr(0)?);
                let next = self.consume_either(
                    TokenKind::Comma,
                    TokenKind::CloseParen,
                    "',' or ')'",
                );
                match next.kind {
                    TokenKind::CloseParen => break next,
                    TokenKind::Comma => continue,
                    _ => return Err(ParseAborted),
                }
            },
        };

        let span = Span::merge(target.span, close_paren.span);
        Ok(self.ctx.alloc_expr(
            span,
            ExprKind::FuncCall(FuncCall {
                target,
                args: self.ctx.alloc_stmts(args),
                open_paren_span: open_paren.span,
            }),
        ))
    }
}
