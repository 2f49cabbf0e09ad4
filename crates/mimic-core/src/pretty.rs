//! Java-like source rendering of class definitions.

use std::fmt::{Display, Formatter, Result};

use itertools::Itertools;

use crate::ast::{Body, Signature};
use crate::class::{ClassDefinition, Modifiers};

const INDENT: &str = "    ";

fn write_modifiers(f: &mut Formatter<'_>, modifiers: &Modifiers) -> Result {
    let text = modifiers.to_string();
    if text.is_empty() {
        Ok(())
    } else {
        write!(f, "{} ", text)
    }
}

fn write_params(f: &mut Formatter<'_>, sig: &Signature) -> Result {
    let params = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("{} ${}", ty, i + 1));
    write!(f, "({})", params.format(", "))
}

fn write_body(f: &mut Formatter<'_>, body: &Body) -> Result {
    writeln!(f, " {{")?;
    for stmt in &body.stmts {
        writeln!(f, "{INDENT}{INDENT}{}", stmt)?;
    }
    writeln!(f, "{INDENT}}}")
}

impl Display for ClassDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let keyword = if self.is_interface() { "interface" } else { "class" };
        write!(f, "public {} {}", keyword, self.name())?;
        if !self.interfaces().is_empty() {
            let clause = if self.is_interface() { "extends" } else { "implements" };
            let names = self.interfaces().iter().map(|iface| &iface.name);
            write!(f, " {} {}", clause, names.format(", "))?;
        }
        writeln!(f, " {{")?;

        for field in self.fields() {
            write!(f, "{INDENT}")?;
            write_modifiers(f, &field.modifiers)?;
            write!(f, "{} {}", field.ty, field.name)?;
            if let Some(initializer) = &field.initializer {
                write!(f, " = {}", initializer)?;
            }
            writeln!(f, ";")?;
        }

        for ctor in self.constructors() {
            writeln!(f)?;
            write!(f, "{INDENT}")?;
            write_modifiers(f, &ctor.modifiers)?;
            write!(f, "{}", self.name())?;
            write_params(f, &ctor.sig)?;
            write_body(f, &ctor.body)?;
        }

        for method in self.methods() {
            writeln!(f)?;
            write!(f, "{INDENT}")?;
            write_modifiers(f, &method.modifiers)?;
            write!(f, "{} {}", method.ret_ty, method.name)?;
            write_params(f, &method.sig)?;
            write_body(f, &method.body)?;
        }

        write!(f, "}}")
    }
}
