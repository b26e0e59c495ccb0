use std::collections::HashMap;

use crate::intern::{Interner, Name};
use crate::types::Ty;

/// Where symbols of a scope live at runtime. Set when the scope is created
/// (or, for class bodies, rewritten by the parser); it must never still be
/// `NotSet` by the time a symbol is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    NotSet,
    Global,
    Local,
    Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Type,
}

#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: Name,
    /// Dotted path through the named enclosing scopes, fixed at insertion.
    pub fully_qualified_name: String,
    pub storage: StorageKind,
    pub kind: SymbolKind,
    /// Filled in by type resolution.
    pub ty: Option<Ty>,
}

/// One lexical scope: an ordered, case-sensitive map of names to symbols
/// plus a non-owning link to the enclosing scope.
#[derive(Debug)]
pub struct SymbolTable {
    pub storage: StorageKind,
    pub name: Option<Name>,
    pub parent: Option<ScopeId>,
    symbols: Vec<SymbolId>,
    by_name: HashMap<Name, SymbolId>,
}

/// Owns every scope and symbol of one compilation. Scopes point at each
/// other by id, so the parent back-references cannot form ownership cycles.
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<SymbolTable>,
    symbols: Vec<Symbol>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, storage: StorageKind, name: Option<Name>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(SymbolTable {
            storage,
            name,
            parent: None,
            symbols: Vec::new(),
            by_name: HashMap::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &SymbolTable {
        &self.scopes[id.0 as usize]
    }

    pub fn set_parent(&mut self, id: ScopeId, parent: ScopeId) {
        assert_ne!(id, parent, "a scope cannot be its own parent");
        self.scopes[id.0 as usize].parent = Some(parent);
    }

    pub fn set_storage(&mut self, id: ScopeId, storage: StorageKind) {
        self.scopes[id.0 as usize].storage = storage;
    }

    pub fn set_name(&mut self, id: ScopeId, name: Name) {
        self.scopes[id.0 as usize].name = Some(name);
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    /// First match in this scope only.
    pub fn find_symbol(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        self.scope(scope).by_name.get(&name).copied()
    }

    /// Walks the parent chain until a scope defines `name`.
    pub fn recursive_find_symbol(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.find_symbol(id, name) {
                return Some(found);
            }
            current = self.scope(id).parent;
        }
        None
    }

    /// Adds a symbol to `scope`. The caller is responsible for the duplicate
    /// check (a duplicate is a compile error, not a panic); inserting over
    /// an existing name here is a front-end bug.
    pub fn add_symbol(
        &mut self,
        scope: ScopeId,
        name: Name,
        kind: SymbolKind,
        interner: &Interner,
    ) -> SymbolId {
        let storage = self.scope(scope).storage;
        assert_ne!(
            storage,
            StorageKind::NotSet,
            "scope must have a storage kind before symbols are added"
        );
        assert!(
            self.find_symbol(scope, name).is_none(),
            "symbol '{}' already exists in this scope",
            interner.resolve(name)
        );

        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            id,
            name,
            fully_qualified_name: self.qualify(scope, name, interner),
            storage,
            kind,
            ty: None,
        });
        let table = &mut self.scopes[scope.0 as usize];
        table.symbols.push(id);
        table.by_name.insert(name, id);
        id
    }

    fn qualify(&self, scope: ScopeId, name: Name, interner: &Interner) -> String {
        let mut parts = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let table = self.scope(id);
            if let Some(scope_name) = table.name {
                parts.push(interner.resolve(scope_name));
            }
            current = table.parent;
        }
        parts.reverse();
        parts.push(interner.resolve(name));
        parts.join(".")
    }

    /// Symbols of one scope in declaration order.
    pub fn symbols_in(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.scope(scope).symbols.iter().map(move |&id| self.symbol(id))
    }

    /// Variable symbols of one scope in declaration order.
    pub fn variables_in(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.symbols_in(scope).filter(|s| s.kind == SymbolKind::Variable)
    }

    /// Every name visible from `scope`, nearest scope first. Feeds the
    /// "did you mean" hint on unresolved references.
    pub fn visible_names(&self, scope: ScopeId) -> Vec<Name> {
        let mut names = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let table = self.scope(id);
            names.extend(table.symbols.iter().map(|&sid| self.symbol(sid).name));
            current = table.parent;
        }
        names
    }
}
