use std::fmt::{Display, Formatter};

use crate::ast::{Body, Expr, Ident, Signature, Ty};
use crate::{common_enum, common_struct};

common_enum! {
    /// Visibility is a label to a member
    #[derive(Default)]
    #[serde(rename_all = "snake_case")]
    pub enum Visibility {
        #[default]
        Public,
        Protected,
        Package,
        Private,
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Package => Ok(()),
            Visibility::Private => write!(f, "private"),
        }
    }
}

common_struct! {
    #[derive(Default)]
    pub struct Modifiers {
        #[serde(default)]
        pub visibility: Visibility,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        pub is_static: bool,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        pub is_final: bool,
    }
}

impl Modifiers {
    pub fn public() -> Self {
        Self::default()
    }
    pub fn private() -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::default()
        }
    }
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut words = Vec::new();
        if self.visibility != Visibility::Package {
            words.push(self.visibility.to_string());
        }
        if self.is_static {
            words.push("static".to_string());
        }
        if self.is_final {
            words.push("final".to_string());
        }
        write!(f, "{}", words.join(" "))
    }
}

common_enum! {
    /// Identity used to detect that a destination already has a member
    #[serde(rename_all = "snake_case")]
    pub enum MemberKey {
        Interface(Ident),
        Field(Ident),
        Constructor(Signature),
        Method(Ident, Signature),
    }
}

impl Display for MemberKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberKey::Interface(name) => write!(f, "interface {}", name),
            MemberKey::Field(name) => write!(f, "field {}", name),
            MemberKey::Constructor(sig) => write!(f, "constructor {}", sig),
            MemberKey::Method(name, sig) => write!(f, "method {}{}", name, sig),
        }
    }
}

/// Anything a class definition holds an ordered list of.
pub trait Member: Clone {
    fn key(&self) -> MemberKey;
}

common_struct! {
    pub struct InterfaceRef {
        pub name: Ident,
    }
}

impl InterfaceRef {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self { name: name.into() }
    }
}

impl Member for InterfaceRef {
    fn key(&self) -> MemberKey {
        MemberKey::Interface(self.name.clone())
    }
}

common_struct! {
    pub struct FieldDescriptor {
        pub name: Ident,
        pub ty: Ty,
        #[serde(default)]
        pub modifiers: Modifiers,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub initializer: Option<Expr>,
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Ident>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::default(),
            initializer: None,
        }
    }
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(initializer);
        self
    }
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }
}

impl Member for FieldDescriptor {
    fn key(&self) -> MemberKey {
        MemberKey::Field(self.name.clone())
    }
}

common_struct! {
    pub struct ConstructorDescriptor {
        pub sig: Signature,
        #[serde(default)]
        pub modifiers: Modifiers,
        pub body: Body,
    }
}

impl ConstructorDescriptor {
    pub fn new(params: Vec<Ty>, body: Body) -> Self {
        Self {
            sig: Signature::new(params),
            modifiers: Modifiers::default(),
            body,
        }
    }
    /// No-argument constructor
    pub fn default_with(body: Body) -> Self {
        Self::new(Vec::new(), body)
    }
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl Member for ConstructorDescriptor {
    fn key(&self) -> MemberKey {
        MemberKey::Constructor(self.sig.clone())
    }
}

common_struct! {
    pub struct MethodDescriptor {
        pub name: Ident,
        pub sig: Signature,
        pub ret_ty: Ty,
        #[serde(default)]
        pub modifiers: Modifiers,
        pub body: Body,
    }
}

impl MethodDescriptor {
    pub fn new(name: impl Into<Ident>, params: Vec<Ty>, ret_ty: Ty, body: Body) -> Self {
        Self {
            name: name.into(),
            sig: Signature::new(params),
            ret_ty,
            modifiers: Modifiers::default(),
            body,
        }
    }
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }
}

impl Member for MethodDescriptor {
    fn key(&self) -> MemberKey {
        MemberKey::Method(self.name.clone(), self.sig.clone())
    }
}
