//! The recursive type algebra and literal values used by the IR.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type: either a base type name (`"int"`, `"bool"`, ...) or a single-key
/// type constructor applied to an argument type (`{"ptr": "int"}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A base type name.
    Base(String),
    /// A single-key type constructor, e.g. `ptr` applied to `int`.
    Ctor {
        /// The constructor name (the object's single key).
        ctor: String,
        /// The constructor's argument type.
        arg: Box<Type>,
    },
}

impl Type {
    /// Construct a base type from a name.
    pub fn base(name: impl Into<String>) -> Self {
        Type::Base(name.into())
    }

    /// Construct a type-constructor application.
    pub fn ctor(name: impl Into<String>, arg: Type) -> Self {
        Type::Ctor {
            ctor: name.into(),
            arg: Box::new(arg),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Base(name) => write!(f, "{name}"),
            Type::Ctor { ctor, arg } => write!(f, "{ctor}<{arg}>"),
        }
    }
}

impl Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            Type::Base(name) => serializer.serialize_str(name),
            Type::Ctor { ctor, arg } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ctor, arg)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        struct TypeVisitor;

        impl<'de> Visitor<'de> for TypeVisitor {
            type Value = Type;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a base type name or a single-key type constructor object")
            }

            fn visit_str<E>(self, v: &str) -> Result<Type, E>
            where
                E: de::Error,
            {
                Ok(Type::Base(v.to_owned()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Type, A::Error>
            where
                A: MapAccess<'de>,
            {
                let Some((ctor, arg)) = map.next_entry::<String, Type>()? else {
                    return Err(de::Error::custom("type constructor object must have one key"));
                };
                if map.next_entry::<String, Type>()?.is_some() {
                    return Err(de::Error::custom(
                        "type constructor object must have exactly one key",
                    ));
                }
                Ok(Type::Ctor {
                    ctor,
                    arg: Box::new(arg),
                })
            }
        }

        deserializer.deserialize_any(TypeVisitor)
    }
}

/// A literal constant value: a boolean or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// A boolean constant.
    Bool(bool),
    /// An integer constant.
    Int(i64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
        }
    }
}
