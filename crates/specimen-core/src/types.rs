use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scalar kinds produced directly from the random source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeafKind {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
    String,
}

impl LeafKind {
    /// Every leaf kind, in declaration order.
    pub const ALL: [LeafKind; 9] = [
        LeafKind::I8,
        LeafKind::I16,
        LeafKind::I32,
        LeafKind::I64,
        LeafKind::F32,
        LeafKind::F64,
        LeafKind::Bool,
        LeafKind::Char,
        LeafKind::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LeafKind::I8 => "i8",
            LeafKind::I16 => "i16",
            LeafKind::I32 => "i32",
            LeafKind::I64 => "i64",
            LeafKind::F32 => "f32",
            LeafKind::F64 => "f64",
            LeafKind::Bool => "bool",
            LeafKind::Char => "char",
            LeafKind::String => "String",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LeafKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Descriptor of a type to generate.
///
/// Container variants carry their generic arguments so nested structure such
/// as `List<Map<String, Cart>>` survives every recursive call. Arguments that
/// are unknown (raw containers, unresolved type variables) are [`TypeRef::Any`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Leaf(LeafKind),
    Sequence(Box<TypeRef>),
    Set(Box<TypeRef>),
    Mapping(Box<TypeRef>, Box<TypeRef>),
    /// User-defined type, resolved against the catalog.
    Named(String),
    /// Unconstrained placeholder.
    Any,
}

impl TypeRef {
    pub fn leaf(kind: LeafKind) -> Self {
        TypeRef::Leaf(kind)
    }

    pub fn string() -> Self {
        TypeRef::Leaf(LeafKind::String)
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::Sequence(Box::new(element))
    }

    pub fn set(element: TypeRef) -> Self {
        TypeRef::Set(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Mapping(Box::new(key), Box::new(value))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Parse the textual form, e.g. `Map<String, List<Cart>>`.
    pub fn parse(expression: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser::new(expression);
        parser.skip_ws();
        if parser.at_end() {
            return Err(TypeParseError::Empty);
        }
        let parsed = parser.parse_type()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(TypeParseError::TrailingInput { offset: parser.pos });
        }
        Ok(parsed)
    }

    /// Whether `name` reads back as `TypeRef::Named(name)`.
    ///
    /// Leaf, container and placeholder names are reserved by the grammar, and
    /// names with whitespace or brackets cannot be written in an expression.
    pub fn is_declarable_name(name: &str) -> bool {
        matches!(TypeRef::parse(name), Ok(TypeRef::Named(parsed)) if parsed == name)
    }

    /// Named types referenced anywhere inside this descriptor.
    pub fn named_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_named(&mut names);
        names
    }

    fn collect_named<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            TypeRef::Named(name) => names.push(name.as_str()),
            TypeRef::Sequence(element) | TypeRef::Set(element) => element.collect_named(names),
            TypeRef::Mapping(key, value) => {
                key.collect_named(names);
                value.collect_named(names);
            }
            TypeRef::Leaf(_) | TypeRef::Any => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Leaf(kind) => f.write_str(kind.name()),
            TypeRef::Sequence(element) => write!(f, "List<{element}>"),
            TypeRef::Set(element) => write!(f, "Set<{element}>"),
            TypeRef::Mapping(key, value) => write!(f, "Map<{key}, {value}>"),
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Any => f.write_str("?"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Errors produced while parsing a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,
    #[error("expected a type name at offset {offset}")]
    ExpectedType { offset: usize },
    #[error("expected '{expected}' at offset {offset}")]
    Expected { expected: char, offset: usize },
    #[error("type '{name}' does not take generic arguments")]
    UnexpectedArguments { name: String },
    #[error("type '{name}' takes {expected} generic argument(s), found {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("unexpected input at offset {offset}")]
    TrailingInput { offset: usize },
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '.' | ':' | '$') {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(TypeParseError::ExpectedType { offset: start });
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        if self.eat('?') {
            return Ok(TypeRef::Any);
        }
        let name = self.ident()?;

        let mut args = Vec::new();
        if self.eat('<') {
            args.push(self.parse_type()?);
            loop {
                if self.eat(',') {
                    args.push(self.parse_type()?);
                } else if self.eat('>') {
                    break;
                } else {
                    return Err(TypeParseError::Expected {
                        expected: '>',
                        offset: self.pos,
                    });
                }
            }
        }

        build(name, args)
    }
}

fn build(name: &str, mut args: Vec<TypeRef>) -> Result<TypeRef, TypeParseError> {
    match name {
        "List" | "Vec" | "Seq" => match args.len() {
            0 => Ok(TypeRef::list(TypeRef::Any)),
            1 => Ok(TypeRef::Sequence(Box::new(args.remove(0)))),
            found => Err(argument_count(name, 1, found)),
        },
        "Set" | "HashSet" | "BTreeSet" => match args.len() {
            0 => Ok(TypeRef::set(TypeRef::Any)),
            1 => Ok(TypeRef::Set(Box::new(args.remove(0)))),
            found => Err(argument_count(name, 1, found)),
        },
        "Map" | "HashMap" | "BTreeMap" => match args.len() {
            0 => Ok(TypeRef::map(TypeRef::Any, TypeRef::Any)),
            2 => {
                let value = args.remove(1);
                let key = args.remove(0);
                Ok(TypeRef::map(key, value))
            }
            found => Err(argument_count(name, 2, found)),
        },
        _ if !args.is_empty() => Err(TypeParseError::UnexpectedArguments {
            name: name.to_string(),
        }),
        "_" | "Any" => Ok(TypeRef::Any),
        _ => Ok(LeafKind::from_name(name)
            .map(TypeRef::Leaf)
            .unwrap_or_else(|| TypeRef::named(name))),
    }
}

fn argument_count(name: &str, expected: usize, found: usize) -> TypeParseError {
    TypeParseError::ArgumentCount {
        name: name.to_string(),
        expected,
        found,
    }
}
