//! Realized classes and the interpreter that runs their bodies.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::trace;

use crate::ast::{BinOpKind, Body, Expr, ExprBinOp, Ident, Stmt, Ty, Value};
use crate::bail;
use crate::class::{ClassDefinition, MethodDescriptor};
use crate::collections::ConcurrentMap;
use crate::error::{Result, RuntimeError};

/// An object created by [`RealizedClass::instantiate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    class: Ident,
    fields: HashMap<Ident, Value>,
}

impl Instance {
    pub fn class(&self) -> &Ident {
        &self.class
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Nested calls allowed before a call fails with [`RuntimeError::StackOverflow`].
pub const MAX_CALL_DEPTH: usize = 128;

enum Flow {
    Next,
    Return(Value),
}

/// Frozen snapshot of a class definition that can be instantiated and invoked.
pub struct RealizedClass {
    definition: ClassDefinition,
    statics: ConcurrentMap<Ident, Value>,
}

impl RealizedClass {
    pub(crate) fn new(definition: ClassDefinition) -> Result<Self> {
        let realized = Self {
            definition,
            statics: ConcurrentMap::new(),
        };
        for field in realized.definition.fields().iter().filter(|f| f.is_static()) {
            realized
                .statics
                .insert(field.name.clone(), field.ty.default_value());
        }
        for field in realized.definition.fields().iter().filter(|f| f.is_static()) {
            if let Some(initializer) = &field.initializer {
                let value = realized.eval(initializer, None, &[], 0)?;
                realized.store(&field.name, value, None)?;
            }
        }
        Ok(realized)
    }

    pub fn name(&self) -> &Ident {
        self.definition.name()
    }

    pub fn definition(&self) -> &ClassDefinition {
        &self.definition
    }

    pub fn interfaces(&self) -> Vec<Ident> {
        self.definition
            .interfaces()
            .iter()
            .map(|iface| iface.name.clone())
            .collect()
    }

    pub fn implements(&self, name: &str) -> bool {
        self.definition.implements(name)
    }

    /// Creates an instance: fields start at their type default, initializers
    /// run in declaration order, then the constructor matching `args`.
    ///
    /// A class without declared constructors gets an implicit no-argument one.
    pub fn instantiate(&self, args: Vec<Value>) -> Result<Instance> {
        if self.definition.is_interface() {
            return Err(RuntimeError::AbstractInstantiation {
                class: self.name().clone(),
            }
            .into());
        }
        let mut instance = Instance {
            class: self.name().clone(),
            fields: self
                .definition
                .fields()
                .iter()
                .filter(|field| !field.is_static())
                .map(|field| (field.name.clone(), field.ty.default_value()))
                .collect(),
        };
        for field in self.definition.fields().iter().filter(|f| !f.is_static()) {
            if let Some(initializer) = &field.initializer {
                let value = self.eval(initializer, Some(&mut instance), &[], 0)?;
                self.store(&field.name, value, Some(&mut instance))?;
            }
        }

        let ctors = self.definition.constructors();
        if ctors.is_empty() && args.is_empty() {
            return Ok(instance);
        }
        let ctor = ctors
            .iter()
            .find(|ctor| ctor.sig.accepts(&args))
            .ok_or_else(|| RuntimeError::NoSuchConstructor {
                class: self.name().clone(),
                signature: describe_args(&args),
            })?;
        trace!("{}: running constructor {}", self.name(), ctor.sig);
        self.exec(&ctor.body, Some(&mut instance), &args, 0)?;
        Ok(instance)
    }

    pub fn invoke(&self, instance: &mut Instance, method: &str, args: Vec<Value>) -> Result<Value> {
        let target = self.find_method(method, &args)?;
        self.call(target, Some(instance), &args, 0)
    }

    pub fn invoke_static(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let target = self.find_method(method, &args)?;
        self.call(target, None, &args, 0)
    }

    pub fn get_field(&self, instance: &Instance, name: &str) -> Result<Value> {
        self.load(name, Some(instance))
    }

    pub fn get_static(&self, name: &str) -> Result<Value> {
        self.load(name, None)
    }

    fn find_method(&self, name: &str, args: &[Value]) -> Result<&MethodDescriptor> {
        self.definition
            .methods()
            .iter()
            .find(|method| method.name == name && method.sig.accepts(args))
            .ok_or_else(|| {
                RuntimeError::NoSuchMethod {
                    class: self.name().clone(),
                    method: Ident::new(name),
                    signature: describe_args(args),
                }
                .into()
            })
    }

    fn call(
        &self,
        method: &MethodDescriptor,
        this: Option<&mut Instance>,
        args: &[Value],
        depth: usize,
    ) -> Result<Value> {
        if depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow {
                class: self.name().clone(),
                method: method.name.clone(),
            }
            .into());
        }
        let this = if method.is_static() {
            None
        } else {
            Some(this.ok_or_else(|| RuntimeError::NoReceiver {
                class: self.name().clone(),
                member: method.name.clone(),
            })?)
        };
        trace!("{}: calling {}{}", self.name(), method.name, method.sig);
        match self.exec(&method.body, this, args, depth + 1)? {
            Flow::Return(value) if value.conforms_to(&method.ret_ty) => Ok(value),
            Flow::Return(value) => Err(RuntimeError::TypeMismatch {
                context: format!("return of {}.{}", self.name(), method.name),
                expected: method.ret_ty.clone(),
                found: value.to_string(),
            }
            .into()),
            Flow::Next if method.ret_ty == Ty::Void => Ok(Value::Unit),
            Flow::Next => Err(RuntimeError::MissingReturn {
                class: self.name().clone(),
                method: method.name.clone(),
                signature: method.sig.clone(),
            }
            .into()),
        }
    }

    fn exec(
        &self,
        body: &Body,
        mut this: Option<&mut Instance>,
        params: &[Value],
        depth: usize,
    ) -> Result<Flow> {
        for stmt in &body.stmts {
            match stmt {
                Stmt::Assign(assign) => {
                    let value = self.eval(&assign.value, this.as_deref_mut(), params, depth)?;
                    self.store(&assign.field, value, this.as_deref_mut())?;
                }
                Stmt::Return(value) => {
                    let value = match value {
                        Some(expr) => self.eval(expr, this.as_deref_mut(), params, depth)?,
                        None => Value::Unit,
                    };
                    return Ok(Flow::Return(value));
                }
                Stmt::Expr(expr) => {
                    self.eval(expr, this.as_deref_mut(), params, depth)?;
                }
            }
        }
        Ok(Flow::Next)
    }

    fn eval(
        &self,
        expr: &Expr,
        mut this: Option<&mut Instance>,
        params: &[Value],
        depth: usize,
    ) -> Result<Value> {
        match expr {
            Expr::Value(value) => Ok(value.clone()),
            Expr::Field(name) => self.load(name.as_str(), this.as_deref()),
            Expr::Param(index) => match params.get(*index) {
                Some(value) => Ok(value.clone()),
                None => bail!("parameter ${} is not bound in {}", index + 1, self.name()),
            },
            Expr::BinOp(binop) => self.eval_binop(binop, this, params, depth),
            Expr::Invoke(invoke) => {
                let mut args = Vec::with_capacity(invoke.args.len());
                for arg in &invoke.args {
                    args.push(self.eval(arg, this.as_deref_mut(), params, depth)?);
                }
                let target = self.find_method(invoke.method.as_str(), &args)?;
                self.call(target, this, &args, depth)
            }
        }
    }

    fn eval_binop(
        &self,
        binop: &ExprBinOp,
        mut this: Option<&mut Instance>,
        params: &[Value],
        depth: usize,
    ) -> Result<Value> {
        let lhs = self.eval(&binop.lhs, this.as_deref_mut(), params, depth)?;
        match (&binop.kind, &lhs) {
            (BinOpKind::And, Value::Bool(false)) => return Ok(Value::Bool(false)),
            (BinOpKind::Or, Value::Bool(true)) => return Ok(Value::Bool(true)),
            _ => {}
        }
        let rhs = self.eval(&binop.rhs, this, params, depth)?;
        let mismatch = |expected: Ty, found: &Value| -> crate::error::Error {
            RuntimeError::TypeMismatch {
                context: format!("operator {}", binop.kind.symbol()),
                expected,
                found: found.to_string(),
            }
            .into()
        };
        let value = match (&binop.kind, lhs, rhs) {
            (BinOpKind::Add, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
            (BinOpKind::Add, Value::Str(a), b) => Value::Str(format!("{}{}", a, display_plain(&b))),
            (BinOpKind::Sub, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(b)),
            (BinOpKind::Mul, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_mul(b)),
            (BinOpKind::Lt, Value::Int(a), Value::Int(b)) => Value::Bool(a < b),
            (BinOpKind::Gt, Value::Int(a), Value::Int(b)) => Value::Bool(a > b),
            (BinOpKind::Eq, a, b) => Value::Bool(a == b),
            (BinOpKind::Ne, a, b) => Value::Bool(a != b),
            (BinOpKind::And | BinOpKind::Or, Value::Bool(_), Value::Bool(b)) => Value::Bool(b),
            (BinOpKind::And | BinOpKind::Or, Value::Bool(_), other) => {
                return Err(mismatch(Ty::Bool, &other))
            }
            (BinOpKind::And | BinOpKind::Or, other, _) => return Err(mismatch(Ty::Bool, &other)),
            (_, Value::Int(_), other) => return Err(mismatch(Ty::Int, &other)),
            (_, other, _) => return Err(mismatch(Ty::Int, &other)),
        };
        Ok(value)
    }

    fn load(&self, name: &str, this: Option<&Instance>) -> Result<Value> {
        let field = self.definition.get_field(name).ok_or_else(|| RuntimeError::NoSuchField {
            class: self.name().clone(),
            field: Ident::new(name),
        })?;
        if field.is_static() {
            return Ok(self
                .statics
                .get_cloned(name)
                .unwrap_or_else(|| field.ty.default_value()));
        }
        let this = this.ok_or_else(|| RuntimeError::NoReceiver {
            class: self.name().clone(),
            member: field.name.clone(),
        })?;
        Ok(this
            .field(name)
            .cloned()
            .unwrap_or_else(|| field.ty.default_value()))
    }

    fn store(&self, name: &Ident, value: Value, this: Option<&mut Instance>) -> Result<()> {
        let field = self
            .definition
            .get_field(name.as_str())
            .ok_or_else(|| RuntimeError::NoSuchField {
                class: self.name().clone(),
                field: name.clone(),
            })?;
        if !value.conforms_to(&field.ty) {
            return Err(RuntimeError::TypeMismatch {
                context: format!("{}.{}", self.name(), name),
                expected: field.ty.clone(),
                found: value.to_string(),
            }
            .into());
        }
        if field.is_static() {
            self.statics.insert(name.clone(), value);
            return Ok(());
        }
        let this = this.ok_or_else(|| RuntimeError::NoReceiver {
            class: self.name().clone(),
            member: name.clone(),
        })?;
        this.fields.insert(name.clone(), value);
        Ok(())
    }
}

fn describe_args(args: &[Value]) -> String {
    format!("({})", args.iter().join(", "))
}

fn display_plain(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
