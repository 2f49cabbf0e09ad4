//! Registry of class definitions.
//!
//! A [`ClassPool`] is created and owned by the caller and handed to whatever
//! needs to create or resolve classes; there is no process-wide default pool.

use itertools::Itertools;
use tracing::{debug, info};

use crate::ast::{Ident, Ty};
use crate::class::{ClassDefinition, ClassHandle, ClassKind};
use crate::collections::ConcurrentMap;
use crate::error::{ClassModelError, Result};
use crate::runtime::RealizedClass;

#[derive(Default)]
pub struct ClassPool {
    classes: ConcurrentMap<Ident, ClassHandle>,
}

impl ClassPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_class(&self, name: impl Into<Ident>) -> Result<ClassHandle> {
        self.insert(ClassDefinition::new(name, ClassKind::Class))
    }

    pub fn make_interface(&self, name: impl Into<Ident>) -> Result<ClassHandle> {
        self.insert(ClassDefinition::new(name, ClassKind::Interface))
    }

    /// Registers an existing definition under its own name.
    pub fn insert(&self, definition: ClassDefinition) -> Result<ClassHandle> {
        let name = definition.name().clone();
        let handle = ClassHandle::new(definition);
        if !self.classes.insert_new(name.clone(), handle.clone()) {
            return Err(ClassModelError::DuplicateClass { name }.into());
        }
        debug!("pool: registered {}", name);
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> Option<ClassHandle> {
        self.classes.get_cloned(name)
    }

    pub fn require(&self, name: &str) -> Result<ClassHandle> {
        self.get(name).ok_or_else(|| {
            ClassModelError::UnknownClass {
                name: Ident::new(name),
            }
            .into()
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<Ident> {
        self.classes.keys().into_iter().sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Loads a pool from a JSON array of class definitions.
    ///
    /// Every member goes through the same checks as a direct `add_*` call,
    /// so a document cannot smuggle in bodies that reference undeclared fields.
    pub fn from_json(text: &str) -> Result<Self> {
        let definitions: Vec<ClassDefinition> = serde_json::from_str(text)?;
        let pool = Self::new();
        for raw in definitions {
            let mut class = ClassDefinition::new(raw.name().clone(), raw.kind());
            for interface in raw.interfaces() {
                class.add_interface(interface.clone())?;
            }
            for field in raw.fields() {
                class.add_field(field.clone())?;
            }
            for ctor in raw.constructors() {
                class.add_constructor(ctor.clone())?;
            }
            for method in raw.methods() {
                class.add_method(method.clone())?;
            }
            pool.insert(class)?;
        }
        Ok(pool)
    }

    pub fn to_json(&self) -> Result<String> {
        let definitions = self
            .names()
            .iter()
            .filter_map(|name| self.get(name.as_str()))
            .map(|handle| handle.snapshot())
            .collect_vec();
        Ok(serde_json::to_string_pretty(&definitions)?)
    }

    /// Freezes the definition behind `handle` and turns it into an invocable class.
    ///
    /// Every implemented interface must be an interface of this pool and every
    /// object type in a member signature must name a pooled class. The handle
    /// is only frozen once static initializers have run; a failed realization
    /// leaves it editable.
    pub fn realize(&self, handle: &ClassHandle) -> Result<RealizedClass> {
        let mut definition = handle.snapshot();
        self.resolve(&definition)?;
        definition.freeze();
        let realized = RealizedClass::new(definition)?;
        handle.with_class_mut(|class| class.freeze());
        info!("realized {}", realized.name());
        Ok(realized)
    }

    fn resolve(&self, class: &ClassDefinition) -> Result<()> {
        for interface in class.interfaces() {
            let target = self.get(interface.name.as_str()).ok_or_else(|| {
                ClassModelError::UnresolvedType {
                    class: class.name().clone(),
                    name: interface.name.clone(),
                }
            })?;
            if !target.with_class(ClassDefinition::is_interface) {
                return Err(ClassModelError::NotAnInterface {
                    class: class.name().clone(),
                    name: interface.name.clone(),
                }
                .into());
            }
        }

        let field_types = class.fields().iter().map(|field| &field.ty);
        let ctor_types = class
            .constructors()
            .iter()
            .flat_map(|ctor| ctor.sig.params.iter());
        let method_types = class
            .methods()
            .iter()
            .flat_map(|method| method.sig.params.iter().chain(Some(&method.ret_ty)));
        for name in field_types
            .chain(ctor_types)
            .chain(method_types)
            .filter_map(Ty::as_object)
        {
            if name != class.name() && !self.contains(name.as_str()) {
                return Err(ClassModelError::UnresolvedType {
                    class: class.name().clone(),
                    name: name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}
