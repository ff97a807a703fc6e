//! Selector nodes.
//!
//! A selector is a flat sequence of parts rather than a nested
//! complex/compound structure: descendant combinators appear as
//! explicit [`Whitespace`] parts, which is all the transformer and
//! printer need.

use crate::source::Span;

use super::Value;

/// A comma-separated list of selectors.
#[derive(Debug, Clone)]
pub struct SelectorList {
    pub span: Span,
    pub selectors: Vec<Selector>,
}

/// A single selector, e.g. `section > a:hover`.
#[derive(Debug, Clone)]
pub struct Selector {
    pub span: Span,
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Whether the selector has any part that is not whitespace. Every
    /// parsed selector does.
    pub fn has_substance(&self) -> bool {
        self.parts
            .iter()
            .any(|part| !matches!(part, SelectorPart::Whitespace(_)))
    }
}

/// One part of a selector.
#[derive(Debug, Clone)]
pub enum SelectorPart {
    Type(TypeSelector),
    Class(ClassSelector),
    Id(IdSelector),
    Combinator(CombinatorSelector),
    PseudoClass(PseudoClassSelector),
    PseudoElement(PseudoElementSelector),
    Attribute(AttributeSelector),
    /// A run of whitespace, i.e. a descendant combinator when it
    /// separates two compound selectors.
    Whitespace(Whitespace),
}

impl SelectorPart {
    /// The source span of this part.
    pub fn span(&self) -> Span {
        match self {
            SelectorPart::Type(sel) => sel.span,
            SelectorPart::Class(sel) => sel.span,
            SelectorPart::Id(sel) => sel.span,
            SelectorPart::Combinator(sel) => sel.span,
            SelectorPart::PseudoClass(sel) => sel.span,
            SelectorPart::PseudoElement(sel) => sel.span,
            SelectorPart::Attribute(sel) => sel.span,
            SelectorPart::Whitespace(ws) => ws.span,
        }
    }
}

/// A type selector, e.g. `div`, or the universal selector `*`.
#[derive(Debug, Clone)]
pub struct TypeSelector {
    pub span: Span,
    pub name: String,
}

/// A class selector, e.g. `.primary`.
#[derive(Debug, Clone)]
pub struct ClassSelector {
    pub span: Span,
    pub name: String,
}

/// An ID selector, e.g. `#container`.
#[derive(Debug, Clone)]
pub struct IdSelector {
    pub span: Span,
    pub name: String,
}

/// A non-descendant combinator: `+`, `>`, `~`, or `|`.
#[derive(Debug, Clone)]
pub struct CombinatorSelector {
    pub span: Span,
    pub operator: String,
}

/// A pseudo-class selector, e.g. `:hover` or `:nth-child(2n+1)`.
#[derive(Debug, Clone)]
pub struct PseudoClassSelector {
    pub span: Span,
    pub name: String,
    /// Arguments, for functional pseudo-classes.
    pub arguments: Option<PseudoClassArguments>,
}

/// Arguments of a functional pseudo-class.
#[derive(Debug, Clone)]
pub enum PseudoClassArguments {
    /// Nested selectors, e.g. in `:not(...)` or `:is(...)`.
    SelectorList(SelectorList),
    /// The `even`/`odd` keywords of the nth pseudo-classes.
    Identifier(super::Identifier),
    /// An `an+b` expression.
    ANPlusB(ANPlusB),
}

/// The `an+b` micro-syntax of `:nth-child()` and friends.
///
/// Coefficients are kept in their source spelling; `a` is `"0"` when
/// only an offset was written and `"-1"` for a bare `-n`.
#[derive(Debug, Clone)]
pub struct ANPlusB {
    pub span: Span,
    /// The `A` coefficient.
    pub a: String,
    /// The sign between `n` and `B`: `""`, `"+"`, or `"-"`.
    pub operator: String,
    /// The `B` offset, or empty.
    pub b: String,
}

/// A pseudo-element selector, e.g. `::before`.
#[derive(Debug, Clone)]
pub struct PseudoElementSelector {
    pub span: Span,
    pub inner: PseudoClassSelector,
}

/// An attribute selector, e.g. `[href^="https:"]`.
#[derive(Debug, Clone)]
pub struct AttributeSelector {
    pub span: Span,
    pub property: String,
    /// The match modifier before `=`: one of `""`, `"^"`, `"~"`, `"$"`,
    /// or `"*"`.
    pub pre_operator: String,
    /// The matched value, if the selector has one.
    pub value: Option<Value>,
}

/// Whitespace between selector parts.
#[derive(Debug, Clone)]
pub struct Whitespace {
    pub span: Span,
}
