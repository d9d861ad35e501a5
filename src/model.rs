//! Parsed form of one documentation article.

/// Modifier token that marks a method section as the type's constructor.
pub const CONSTRUCTOR_SENTINEL: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub class: Class,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySignature {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub signature: PropertySignature,
    /// Insertion-ordered, no duplicates. Always starts with `public`.
    pub modifiers: Vec<String>,
    pub examples: Vec<String>,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub modifiers: Vec<String>,
}

impl MethodSignature {
    pub fn is_constructor(&self) -> bool {
        self.modifiers.iter().any(|m| m == CONSTRUCTOR_SENTINEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub signature: MethodSignature,
    pub description: Vec<String>,
    pub return_description: Option<String>,
}
