use crate::intern::{Interner, Name};

/// Primitive types, listed in operand-priority order. In a binary expression
/// mixing two primitives, the result widens to the higher-priority operand:
/// `someInt * someFloat` is a `float`, `someFloat * someDouble` a `double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Void,
    Bool,
    Int32,
    Float,
    Double,
}

impl Primitive {
    pub fn operand_priority(self) -> u8 {
        match self {
            Primitive::Void => 1,
            Primitive::Bool => 2,
            Primitive::Int32 => 3,
            Primitive::Float => 4,
            Primitive::Double => 5,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Int32 => "int",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Primitive> {
        Some(match keyword {
            "void" => Primitive::Void,
            "bool" => Primitive::Bool,
            "int" => Primitive::Int32,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            _ => return None,
        })
    }
}

/// Index of a class type in the [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

/// Index of a function type in the [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncTypeId(u32);

/// A resolved type. Primitives are process-wide constants; class and
/// function types are handles into the compilation's [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Primitive(Primitive),
    Class(ClassId),
    Function(FuncTypeId),
}

impl Ty {
    pub const VOID: Ty = Ty::Primitive(Primitive::Void);
    pub const BOOL: Ty = Ty::Primitive(Primitive::Bool);
    pub const INT32: Ty = Ty::Primitive(Primitive::Int32);
    pub const FLOAT: Ty = Ty::Primitive(Primitive::Float);
    pub const DOUBLE: Ty = Ty::Primitive(Primitive::Double);

    pub fn primitive(self) -> Option<Primitive> {
        match self {
            Ty::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_class(self) -> bool {
        matches!(self, Ty::Class(_))
    }

    /// `A → B` is implicit iff `A`'s operand priority does not exceed `B`'s.
    /// Non-primitive types convert only to themselves.
    pub fn can_implicit_cast_to(self, other: Ty) -> bool {
        if self == other {
            return true;
        }
        match (self.primitive(), other.primitive()) {
            (Some(from), Some(to)) => from.operand_priority() <= to.operand_priority(),
            _ => false,
        }
    }

    /// An explicit cast is legal whenever either direction would be implicit.
    pub fn can_explicit_cast_to(self, other: Ty) -> bool {
        self.can_implicit_cast_to(other) || other.can_implicit_cast_to(self)
    }

    /// Conditions and logical operands coerce to `bool` even when that
    /// narrows (`if(1)` is legal); only types with no relation to `bool`
    /// at all, such as classes, are rejected.
    pub fn can_coerce_to_condition(self) -> bool {
        self.can_explicit_cast_to(Ty::BOOL)
    }

    pub fn can_do_arithmetic(self) -> bool {
        matches!(
            self.primitive(),
            Some(Primitive::Int32) | Some(Primitive::Float) | Some(Primitive::Double)
        )
    }
}

#[derive(Debug, Clone)]
pub struct ClassField {
    pub name: Name,
    /// Filled in once the field's type reference resolves.
    pub ty: Option<Ty>,
    pub ordinal: u32,
}

#[derive(Debug, Clone)]
pub struct ClassMethod {
    pub name: Name,
    pub ty: Option<Ty>,
}

#[derive(Debug, Clone)]
pub struct ClassType {
    pub name: Name,
    pub fields: Vec<ClassField>,
    pub methods: Vec<ClassMethod>,
}

impl ClassType {
    pub fn find_field(&self, name: Name) -> Option<&ClassField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn find_method(&self, name: Name) -> Option<&ClassMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub return_ty: Ty,
    pub param_tys: Vec<Ty>,
}

/// Owns every class and function type of one compilation. AST nodes and
/// symbols refer into it by id, never by pointer.
#[derive(Debug, Default)]
pub struct TypeTable {
    classes: Vec<ClassType>,
    functions: Vec<FunctionType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, name: Name) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassType {
            name,
            fields: Vec::new(),
            methods: Vec::new(),
        });
        id
    }

    pub fn class(&self, id: ClassId) -> &ClassType {
        &self.classes[id.0 as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassType {
        &mut self.classes[id.0 as usize]
    }

    pub fn add_function(&mut self, func: FunctionType) -> FuncTypeId {
        let id = FuncTypeId(self.functions.len() as u32);
        self.functions.push(func);
        id
    }

    pub fn function(&self, id: FuncTypeId) -> &FunctionType {
        &self.functions[id.0 as usize]
    }

    /// Human-readable name of a type, e.g. `int`, `Point`, `int(float, bool)`.
    pub fn name_of(&self, ty: Ty, interner: &Interner) -> String {
        match ty {
            Ty::Primitive(p) => p.keyword().to_string(),
            Ty::Class(id) => interner.resolve(self.class(id).name).to_string(),
            Ty::Function(id) => {
                let func = self.function(id);
                let params = func
                    .param_tys
                    .iter()
                    .map(|&p| self.name_of(p, interner))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", self.name_of(func.return_ty, interner), params)
            }
        }
    }
}
