//! Syntax tree for parsed build scripts.

/// A parsed script: top-level statements in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub statements: Vec<Statement>,
}

/// A statement with the position of its first token
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `a.b = value`
    Assign { target: Vec<String>, value: Expr },
    /// `val name = value`
    Val { name: String, value: Expr },
    /// `import a.b.C`
    Import(Vec<String>),
    /// `name(args) { block } infix...`
    Call(Call),
    /// Control flow, declarations and other statements with no node here,
    /// labelled by their first source line
    Other(String),
}

/// A call-style statement: `android { }`, `id("x") version "1" apply false`,
/// `create("release") { }`, `implementation("g:a:v")`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: Vec<String>,
    /// `None` when the call had no parentheses
    pub args: Option<Vec<Argument>>,
    pub block: Option<Vec<Statement>>,
    /// Infix suffixes such as `version "1.0"` or `apply false`
    pub infix: Vec<(String, Expr)>,
}

/// A call argument; `name` is set for `name = value` arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expr,
}

impl Argument {
    pub fn positional(value: Expr) -> Self {
        Self { name: None, value }
    }
}

impl Call {
    /// Dotted name of the call target
    pub fn name(&self) -> String {
        self.target.join(".")
    }

    /// The arguments, empty when the call had no parentheses
    pub fn arguments(&self) -> &[Argument] {
        self.args.as_deref().unwrap_or(&[])
    }

    /// The single positional argument of a one-argument call
    pub fn single_arg(&self) -> Option<&Expr> {
        match self.arguments() {
            [Argument { name: None, value }] => Some(value),
            _ => None,
        }
    }

    /// Value of the argument passed as `name = value`
    pub fn named_arg(&self, name: &str) -> Option<&Expr> {
        self.arguments()
            .iter()
            .find(|arg| arg.name.as_deref() == Some(name))
            .map(|arg| &arg.value)
    }
}

/// Value expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Dotted reference: `flutter.versionCode`, `JavaVersion.VERSION_11`
    Path(Vec<String>),
    /// `file("x")`, `signingConfigs.getByName("debug")`, `JavaVersion.VERSION_11.toString()`
    Call {
        receiver: Option<Box<Expr>>,
        callee: Vec<String>,
        args: Vec<Expr>,
    },
    /// `expr.name` on a non-path receiver
    Member { receiver: Box<Expr>, name: String },
    /// `expr[key]`
    Index { receiver: Box<Expr>, key: Box<Expr> },
    /// `expr as Type`
    Cast { value: Box<Expr>, ty: String },
    /// Source text of anything else: safe calls, elvis, lambdas, operators,
    /// string templates
    Opaque(String),
}

impl Expr {
    /// The dotted path of a plain reference
    pub fn as_path(&self) -> Option<String> {
        match self {
            Expr::Path(parts) => Some(parts.join(".")),
            _ => None,
        }
    }

    /// The value of a string literal
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Is this a receiver-less call to `name` with arguments?
    pub fn as_call(&self, name: &str) -> Option<&[Expr]> {
        match self {
            Expr::Call {
                receiver: None,
                callee,
                args,
            } if callee.join(".") == name => Some(args),
            _ => None,
        }
    }

    /// Short rendering used in warnings
    pub fn describe(&self) -> String {
        match self {
            Expr::Str(s) => format!("\"{}\"", s),
            Expr::Int(i) => i.to_string(),
            Expr::Bool(b) => b.to_string(),
            Expr::Path(parts) => parts.join("."),
            Expr::Call {
                receiver, callee, ..
            } => match receiver {
                Some(r) => format!("{}.{}(...)", r.describe(), callee.join(".")),
                None => format!("{}(...)", callee.join(".")),
            },
            Expr::Member { receiver, name } => format!("{}.{}", receiver.describe(), name),
            Expr::Index { receiver, key } => format!("{}[{}]", receiver.describe(), key.describe()),
            Expr::Cast { value, ty } => format!("{} as {}", value.describe(), ty),
            Expr::Opaque(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}
