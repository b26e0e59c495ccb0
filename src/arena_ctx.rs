use std::cell::Cell;

use crate::arena::Arena;
use crate::ast::{Expr, ExprKind, NodeId, ParameterDef};
use crate::source::Span;

/// Bundles the arenas one compilation allocates its tree from, and hands
/// out node ids. Created by the caller so the tree can outlive the parse.
pub struct AstContext<'a> {
    exprs: &'a Arena<Expr<'a>>,
    expr_lists: &'a Arena<&'a Expr<'a>>,
    params: &'a Arena<ParameterDef>,
    next_node: Cell<u32>,
}

impl<'a> AstContext<'a> {
    pub fn new(
        exprs: &'a Arena<Expr<'a>>,
        expr_lists: &'a Arena<&'a Expr<'a>>,
        params: &'a Arena<ParameterDef>,
    ) -> Self {
        AstContext {
            exprs,
            expr_lists,
            params,
            next_node: Cell::new(0),
        }
    }

    pub fn next_node_id(&self) -> NodeId {
        let id = self.next_node.get();
        self.next_node.set(id + 1);
        NodeId(id)
    }

    pub fn alloc_expr(&self, span: Span, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(Expr::new(self.next_node_id(), span, kind))
    }

    pub fn alloc_stmts<I>(&self, stmts: I) -> &'a [&'a Expr<'a>]
    where
        I: IntoIterator<Item = &'a Expr<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.expr_lists.alloc_slice(stmts)
    }

    pub fn alloc_params<I>(&self, params: I) -> &'a [ParameterDef]
    where
        I: IntoIterator<Item = ParameterDef>,
        I::IntoIter: ExactSizeIterator,
    {
        self.params.alloc_slice(params)
    }
}

/// Declares the arenas an [`AstContext`] needs and binds it, in one line:
/// `ast_context!(ctx);`
#[macro_export]
macro_rules! ast_context {
    ($ctx:ident) => {
        let exprs = $crate::arena::Arena::new();
        let expr_lists = $crate::arena::Arena::new();
        let params = $crate::arena::Arena::new();
        let $ctx = $crate::arena_ctx::AstContext::new(&exprs, &expr_lists, &params);
    };
}
