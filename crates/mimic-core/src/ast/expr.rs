use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::ast::{Ident, Value};
use crate::{common_enum, common_struct};

pub type BExpr = Box<Expr>;

common_enum! {
    #[serde(rename_all = "snake_case")]
    pub enum BinOpKind {
        Add,
        Sub,
        Mul,
        Eq,
        Ne,
        Lt,
        Gt,
        And,
        Or,
    }
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Eq => "==",
            BinOpKind::Ne => "!=",
            BinOpKind::Lt => "<",
            BinOpKind::Gt => ">",
            BinOpKind::And => "&&",
            BinOpKind::Or => "||",
        }
    }
}

common_enum! {
    /// Expressions of member bodies and field initializers.
    ///
    /// Bodies only ever address the enclosing class: fields and methods are
    /// looked up on `this` (or the class statics), parameters by position.
    #[serde(rename_all = "snake_case")]
    pub enum Expr {
        Value(Value),
        Field(Ident),
        Param(usize),
        BinOp(ExprBinOp),
        Invoke(ExprInvoke),
    }
}

common_struct! {
    pub struct ExprBinOp {
        pub kind: BinOpKind,
        pub lhs: BExpr,
        pub rhs: BExpr,
    }
}

common_struct! {
    pub struct ExprInvoke {
        pub method: Ident,
        pub args: Vec<Expr>,
    }
}

impl Expr {
    pub fn value(value: Value) -> Self {
        Expr::Value(value)
    }
    pub fn int(v: i64) -> Self {
        Expr::Value(Value::Int(v))
    }
    pub fn bool(v: bool) -> Self {
        Expr::Value(Value::Bool(v))
    }
    pub fn field(name: impl Into<Ident>) -> Self {
        Expr::Field(name.into())
    }
    pub fn param(index: usize) -> Self {
        Expr::Param(index)
    }
    pub fn binop(kind: BinOpKind, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinOp(ExprBinOp {
            kind,
            lhs: lhs.into(),
            rhs: rhs.into(),
        })
    }
    pub fn invoke(method: impl Into<Ident>, args: Vec<Expr>) -> Self {
        Expr::Invoke(ExprInvoke {
            method: method.into(),
            args,
        })
    }

    /// Calls `f` on this expression and every sub-expression, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::BinOp(binop) => {
                binop.lhs.walk(f);
                binop.rhs.walk(f);
            }
            Expr::Invoke(invoke) => {
                for arg in &invoke.args {
                    arg.walk(f);
                }
            }
            Expr::Value(_) | Expr::Field(_) | Expr::Param(_) => {}
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Value(value) => write!(f, "{}", value),
            Expr::Field(name) => write!(f, "this.{}", name),
            Expr::Param(index) => write!(f, "${}", index + 1),
            Expr::BinOp(binop) => {
                write!(f, "({} {} {})", binop.lhs, binop.kind.symbol(), binop.rhs)
            }
            Expr::Invoke(invoke) => {
                write!(f, "this.{}({})", invoke.method, invoke.args.iter().join(", "))
            }
        }
    }
}

common_enum! {
    #[serde(rename_all = "snake_case")]
    pub enum Stmt {
        Assign(StmtAssign),
        Return(Option<Expr>),
        Expr(Expr),
    }
}

common_struct! {
    pub struct StmtAssign {
        pub field: Ident,
        pub value: Expr,
    }
}

impl Stmt {
    pub fn assign(field: impl Into<Ident>, value: Expr) -> Self {
        Stmt::Assign(StmtAssign {
            field: field.into(),
            value,
        })
    }
    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }
    pub fn ret_void() -> Self {
        Stmt::Return(None)
    }

    pub fn exprs(&self) -> impl Iterator<Item = &Expr> {
        let expr = match self {
            Stmt::Assign(assign) => Some(&assign.value),
            Stmt::Return(value) => value.as_ref(),
            Stmt::Expr(expr) => Some(expr),
        };
        expr.into_iter()
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Assign(assign) => write!(f, "this.{} = {};", assign.field, assign.value),
            Stmt::Return(Some(value)) => write!(f, "return {};", value),
            Stmt::Return(None) => write!(f, "return;"),
            Stmt::Expr(expr) => write!(f, "{};", expr),
        }
    }
}

common_struct! {
    /// Statements of a constructor or method, in execution order
    #[derive(Default)]
    pub struct Body {
        pub stmts: Vec<Stmt>,
    }
}

impl Body {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Fields read or assigned anywhere in the body.
    pub fn referenced_fields(&self) -> Vec<&Ident> {
        let mut fields = Vec::new();
        for stmt in &self.stmts {
            if let Stmt::Assign(assign) = stmt {
                fields.push(&assign.field);
            }
            for expr in stmt.exprs() {
                collect_fields(expr, &mut fields);
            }
        }
        fields
    }

    /// Highest parameter index read by the body, if any.
    pub fn max_param(&self) -> Option<usize> {
        self.stmts
            .iter()
            .flat_map(Stmt::exprs)
            .filter_map(max_param)
            .max()
    }
}

pub(crate) fn collect_fields<'a>(expr: &'a Expr, fields: &mut Vec<&'a Ident>) {
    expr.walk(&mut |e| {
        if let Expr::Field(name) = e {
            fields.push(name);
        }
    });
}

pub(crate) fn max_param(expr: &Expr) -> Option<usize> {
    let mut max = None;
    expr.walk(&mut |e| {
        if let Expr::Param(index) = e {
            max = max.max(Some(*index));
        }
    });
    max
}
