use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::ast::{collect_fields, max_param, Body, Expr, Ident, Ty};
use crate::class::{
    ConstructorDescriptor, FieldDescriptor, InterfaceRef, Member, MemberKey, MethodDescriptor,
};
use crate::common_enum;
use crate::error::ClassModelError;

common_enum! {
    #[derive(Copy, Default)]
    #[serde(rename_all = "snake_case")]
    pub enum ClassKind {
        #[default]
        Class,
        Interface,
    }
}

/// A mutable, in-progress description of a class.
///
/// Members are kept in declaration order. Adding a member whose key is
/// already declared fails with [`ClassModelError::DuplicateMember`]; bodies
/// and initializers are checked against the fields this definition declares
/// at the time they are added.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClassDefinition {
    name: Ident,
    #[serde(default)]
    kind: ClassKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    interfaces: Vec<InterfaceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    constructors: Vec<ConstructorDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    methods: Vec<MethodDescriptor>,
    #[serde(skip)]
    frozen: bool,
}

impl ClassDefinition {
    pub fn new(name: impl Into<Ident>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            frozen: false,
        }
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }
    pub fn kind(&self) -> ClassKind {
        self.kind
    }
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn interfaces(&self) -> &[InterfaceRef] {
        &self.interfaces
    }
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
    pub fn get_constructor(&self, params: &[Ty]) -> Option<&ConstructorDescriptor> {
        self.constructors
            .iter()
            .find(|ctor| ctor.sig.params == params)
    }
    pub fn get_declared_method(&self, name: &str, params: &[Ty]) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|method| method.name == name && method.sig.params == params)
    }
    /// All overloads declared under `name`.
    pub fn get_declared_methods(&self, name: &str) -> Vec<&MethodDescriptor> {
        self.methods
            .iter()
            .filter(|method| method.name == name)
            .collect()
    }
    pub fn implements(&self, name: &str) -> bool {
        self.interfaces.iter().any(|iface| iface.name == name)
    }

    pub fn has_member(&self, key: &MemberKey) -> bool {
        match key {
            MemberKey::Interface(name) => self.implements(name.as_str()),
            MemberKey::Field(name) => self.get_field(name.as_str()).is_some(),
            MemberKey::Constructor(sig) => self.get_constructor(&sig.params).is_some(),
            MemberKey::Method(name, sig) => self
                .get_declared_method(name.as_str(), &sig.params)
                .is_some(),
        }
    }

    pub fn add_interface(&mut self, interface: InterfaceRef) -> Result<(), ClassModelError> {
        self.check_insertable(&interface.key())?;
        trace!("{}: adding interface {}", self.name, interface.name);
        self.interfaces.push(interface);
        Ok(())
    }

    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<(), ClassModelError> {
        self.check_insertable(&field.key())?;
        self.check_value_type(&field.key(), &field.ty)?;
        if let Some(initializer) = &field.initializer {
            self.check_expr(&field.key(), initializer, 0)?;
        }
        trace!("{}: adding field {}", self.name, field.name);
        self.fields.push(field);
        Ok(())
    }

    pub fn add_constructor(&mut self, ctor: ConstructorDescriptor) -> Result<(), ClassModelError> {
        let key = ctor.key();
        self.check_insertable(&key)?;
        for ty in &ctor.sig.params {
            self.check_value_type(&key, ty)?;
        }
        self.check_body(&key, &ctor.body, ctor.sig.arity())?;
        trace!("{}: adding {}", self.name, key);
        self.constructors.push(ctor);
        Ok(())
    }

    pub fn add_method(&mut self, method: MethodDescriptor) -> Result<(), ClassModelError> {
        let key = method.key();
        self.check_insertable(&key)?;
        for ty in &method.sig.params {
            self.check_value_type(&key, ty)?;
        }
        self.check_body(&key, &method.body, method.sig.arity())?;
        trace!("{}: adding {}", self.name, key);
        self.methods.push(method);
        Ok(())
    }

    /// Duplicates are reported before `Frozen` so that re-adding an existing
    /// member to a realized class is still recognisable as a skip.
    fn check_insertable(&self, key: &MemberKey) -> Result<(), ClassModelError> {
        if self.has_member(key) {
            return Err(ClassModelError::DuplicateMember {
                class: self.name.clone(),
                key: key.clone(),
            });
        }
        if self.frozen {
            return Err(ClassModelError::Frozen {
                class: self.name.clone(),
            });
        }
        Ok(())
    }

    fn check_value_type(&self, key: &MemberKey, ty: &Ty) -> Result<(), ClassModelError> {
        if *ty == Ty::Void {
            return Err(ClassModelError::VoidType {
                class: self.name.clone(),
                member: key.clone(),
            });
        }
        Ok(())
    }

    fn check_body(&self, key: &MemberKey, body: &Body, arity: usize) -> Result<(), ClassModelError> {
        for field in body.referenced_fields() {
            self.check_field(field)?;
        }
        match body.max_param() {
            Some(index) if index >= arity => Err(ClassModelError::ParamOutOfRange {
                class: self.name.clone(),
                member: key.clone(),
                index,
                arity,
            }),
            _ => Ok(()),
        }
    }

    fn check_expr(&self, key: &MemberKey, expr: &Expr, arity: usize) -> Result<(), ClassModelError> {
        let mut fields = Vec::new();
        collect_fields(expr, &mut fields);
        for field in fields {
            self.check_field(field)?;
        }
        match max_param(expr) {
            Some(index) if index >= arity => Err(ClassModelError::ParamOutOfRange {
                class: self.name.clone(),
                member: key.clone(),
                index,
                arity,
            }),
            _ => Ok(()),
        }
    }

    fn check_field(&self, field: &Ident) -> Result<(), ClassModelError> {
        if self.get_field(field.as_str()).is_none() {
            return Err(ClassModelError::UnknownField {
                class: self.name.clone(),
                field: field.clone(),
            });
        }
        Ok(())
    }
}

/// Shared handle to a definition registered in a [`crate::pool::ClassPool`].
#[derive(Debug, Clone)]
pub struct ClassHandle {
    storage: Arc<RwLock<ClassDefinition>>,
}

impl ClassHandle {
    pub fn new(definition: ClassDefinition) -> Self {
        Self {
            storage: Arc::new(RwLock::new(definition)),
        }
    }

    pub fn with_class<R>(&self, func: impl FnOnce(&ClassDefinition) -> R) -> R {
        match self.storage.read() {
            Ok(class) => func(&class),
            // Recover from a poisoned lock by taking the inner value
            Err(poison) => func(&poison.into_inner()),
        }
    }

    pub fn with_class_mut<R>(&self, func: impl FnOnce(&mut ClassDefinition) -> R) -> R {
        match self.storage.write() {
            Ok(mut class) => func(&mut class),
            Err(poison) => func(&mut poison.into_inner()),
        }
    }

    pub fn name(&self) -> Ident {
        self.with_class(|class| class.name().clone())
    }

    /// Owned copy of the current definition.
    pub fn snapshot(&self) -> ClassDefinition {
        self.with_class(ClassDefinition::clone)
    }

    pub fn ptr_eq(&self, other: &ClassHandle) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }
}
