//! Read-only dump of a syntax tree: one `Kind: detail` header per node,
//! two spaces of indentation per depth level. The exact format is stable —
//! golden tests compare against it verbatim.

use crate::ast::{Expr, ExprKind, Module, TypeRef};
use crate::intern::Interner;
use crate::scope::{ScopeArena, ScopeId};
use crate::types::TypeTable;

pub fn pretty_print(
    module: &Module,
    scopes: &ScopeArena,
    types: &TypeTable,
    interner: &Interner,
) -> String {
    let mut printer = PrettyPrinter {
        out: String::new(),
        indent: 0,
        scopes,
        types,
        interner,
    };
    printer.line(&format!("Module: {}", interner.resolve(module.name)));
    printer.nested(|p| p.node(module.body));
    printer.out
}

struct PrettyPrinter<'p> {
    out: String,
    indent: usize,
    scopes: &'p ScopeArena,
    types: &'p TypeTable,
    interner: &'p Interner,
}

impl<'p> PrettyPrinter<'p> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn node(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::LiteralInt32(value) => self.line(&format!("LiteralInt32: {}", value)),
            ExprKind::LiteralFloat(value) => self.line(&format!("LiteralFloat: {:?}", value)),
            ExprKind::LiteralBool(value) => self.line(&format!("LiteralBool: {}", value)),
            ExprKind::VariableRef(var_ref) => {
                self.line(&format!("VariableRef: {}", self.interner.resolve(var_ref.name)));
            }
            ExprKind::VariableDecl(decl) => {
                self.line(&format!(
                    "VariableDecl: {}:{}",
                    self.interner.resolve(decl.name),
                    self.type_ref_text(&decl.type_ref)
                ));
            }
            ExprKind::Binary(binary) => {
                self.line(&format!("Binary: {}", binary.op.text()));
                self.nested(|p| {
                    p.node(binary.lhs.get());
                    p.node(binary.rhs.get());
                });
            }
            ExprKind::Unary(unary) => {
                self.line(&format!("Unary: {}", unary.op.text()));
                self.nested(|p| p.node(unary.operand));
            }
            ExprKind::Cast(cast) => {
                let kind = match cast.cast_kind {
                    crate::ast::CastKind::Implicit => "implicit",
                    crate::ast::CastKind::Explicit => "explicit",
                };
                self.line(&format!(
                    "Cast({}): {}",
                    kind,
                    self.type_ref_text(&cast.target)
                ));
                self.nested(|p| p.node(cast.value));
            }
            ExprKind::If(if_expr) => {
                self.line("If:");
                self.nested(|p| {
                    p.node(if_expr.condition.get());
                    p.node(if_expr.then_expr.get());
                    if let Some(else_expr) = if_expr.else_expr.get() {
                        p.node(else_expr);
                    }
                });
            }
            ExprKind::While(while_expr) => {
                self.line("While:");
                self.nested(|p| {
                    p.node(while_expr.condition.get());
                    p.node(while_expr.body);
                });
            }
            ExprKind::Compound(compound) => {
                let vars = self.scope_variables(compound.scope);
                self.line(&format!("Compound:{}", vars));
                self.nested(|p| {
                    for stmt in compound.stmts {
                        p.node(stmt);
                    }
                });
            }
            ExprKind::Return(value) => {
                self.line("Return:");
                self.nested(|p| p.node(value));
            }
            ExprKind::FuncDef(func) => {
                self.line(&format!(
                    "FuncDef: {}:{}",
                    self.interner.resolve(func.name),
                    self.type_ref_text(&func.return_type_ref)
                ));
                self.nested(|p| {
                    for param in func.parameters {
                        p.line(&format!(
                            "ParameterDef: {}:{}",
                            p.interner.resolve(param.name),
                            p.type_ref_text(&param.type_ref)
                        ));
                    }
                    p.node(func.body);
                });
            }
            ExprKind::FuncCall(call) => {
                self.line("FuncCall:");
                self.nested(|p| {
                    p.node(call.target);
                    for arg in call.args {
                        p.node(arg);
                    }
                });
            }
            ExprKind::Dot(dot) => {
                self.line(&format!("Dot: {}", self.interner.resolve(dot.member)));
                self.nested(|p| p.node(dot.lhs));
            }
            ExprKind::Class(class) => {
                self.line(&format!("Class: {}", self.interner.resolve(class.name)));
                self.nested(|p| p.node(class.body));
            }
            ExprKind::Assert(condition) => {
                self.line("Assert:");
                self.nested(|p| p.node(condition));
            }
        }
    }

    fn type_ref_text(&self, type_ref: &TypeRef) -> String {
        match (type_ref.name, type_ref.resolved()) {
            (Some(name), _) => self.interner.resolve(name).to_string(),
            (None, Some(ty)) => self.types.name_of(ty, self.interner),
            (None, None) => "<unresolved>".to_string(),
        }
    }

    /// `(a:int, b:float)` — the scope's variables, alphabetically.
    fn scope_variables(&self, scope: ScopeId) -> String {
        let mut variables: Vec<_> = self
            .scopes
            .variables_in(scope)
            .map(|symbol| {
                let ty = match symbol.ty {
                    Some(ty) => self.types.name_of(ty, self.interner),
                    None => "<unresolved>".to_string(),
                };
                format!("{}:{}", self.interner.resolve(symbol.name), ty)
            })
            .collect();
        variables.sort();
        format!("({})", variables.join(", "))
    }
}
