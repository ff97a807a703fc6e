//! Media query nodes.

use crate::source::Span;

use super::{Identifier, Value};

/// A comma-separated list of media queries.
#[derive(Debug, Clone)]
pub struct MediaQueryList {
    pub span: Span,
    pub queries: Vec<MediaQuery>,
}

/// A single media query, e.g. `screen and (min-width: 100px)`.
#[derive(Debug, Clone)]
pub struct MediaQuery {
    pub span: Span,
    pub parts: Vec<MediaQueryPart>,
}

/// A space-separated part of a media query.
#[derive(Debug, Clone)]
pub enum MediaQueryPart {
    /// A media type or operator keyword: `screen`, `not`, `only`,
    /// `and`, ...
    Identifier(Identifier),
    /// A `(name)` or `(name: value)` feature.
    Plain(MediaFeaturePlain),
    /// A range feature, e.g. `(200px < width < 600px)`.
    Range(MediaFeatureRange),
}

impl MediaQueryPart {
    /// The source span of this part.
    pub fn span(&self) -> Span {
        match self {
            MediaQueryPart::Identifier(ident) => ident.span,
            MediaQueryPart::Plain(feature) => feature.span,
            MediaQueryPart::Range(feature) => feature.span,
        }
    }
}

/// An equivalence or boolean media feature: `(width: 500px)`, `(color)`.
#[derive(Debug, Clone)]
pub struct MediaFeaturePlain {
    pub span: Span,
    pub property: Identifier,
    /// Absent for boolean features.
    pub value: Option<Value>,
}

/// A range media feature from Media Queries Level 4, e.g.
/// `(width < 600px)` or `(200px < width < 600px)`.
///
/// When both values are present they bracket the property, and the two
/// written operators point the same way; only one operator is stored.
#[derive(Debug, Clone)]
pub struct MediaFeatureRange {
    pub span: Span,
    pub property: Identifier,
    pub left_value: Option<Value>,
    pub operator: RangeOperator,
    pub right_value: Option<Value>,
}

/// A media range comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl RangeOperator {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeOperator::Lt => "<",
            RangeOperator::Le => "<=",
            RangeOperator::Gt => ">",
            RangeOperator::Ge => ">=",
        }
    }

    /// Whether the comparison excludes the boundary value.
    pub fn is_strict(&self) -> bool {
        matches!(self, RangeOperator::Lt | RangeOperator::Gt)
    }
}

impl std::fmt::Display for RangeOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
