//! The CSS syntax tree.
//!
//! Nodes are plain enums and structs dispatched by matching on the
//! variant tag; there is no visitor hierarchy. Every node carries the
//! [`Span`] of the source text that produced it. Nodes are created by
//! the parser, rebuilt (never mutated in place) by the transformer, and
//! read-only to the printer.

mod media;
mod selector;
mod value;

pub use media::*;
pub use selector::*;
pub use value::*;

use crate::source::Span;

/// A parsed CSS stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Top-level rules and comments in source order.
    pub nodes: Vec<Node>,
    /// One entry per `@import` encountered, in source order.
    pub imports: Vec<ImportSpecifier>,
}

/// A reference from a stylesheet to one of its `@import` rules.
#[derive(Debug, Clone)]
pub struct ImportSpecifier {
    /// The import target as written (url or string content).
    pub value: String,
    /// Identity of the `@import` [`AtRule`] in [`Stylesheet::nodes`].
    pub rule: AtRuleId,
}

/// Stable identity for an [`AtRule`], assigned by the parser.
///
/// Used as a map key where rule identity matters (import inlining);
/// structural equality would conflate identical rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtRuleId(pub u32);

/// A top-level node.
#[derive(Debug, Clone)]
pub enum Node {
    /// A prelude plus block, e.g. `a { color: red }`.
    QualifiedRule(QualifiedRule),
    /// An `@`-rule, e.g. `@media (...) { ... }`.
    AtRule(AtRule),
    /// A `/* ... */` comment.
    Comment(Comment),
}

impl Node {
    /// The source span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::QualifiedRule(rule) => rule.span,
            Node::AtRule(rule) => rule.span,
            Node::Comment(comment) => comment.span,
        }
    }
}

/// A comment preserved in the tree. The minifying printer drops it.
#[derive(Debug, Clone)]
pub struct Comment {
    pub span: Span,
    /// The text between `/*` and `*/`.
    pub text: String,
}

/// An at-rule: name, preludes, and an optional block.
#[derive(Debug, Clone)]
pub struct AtRule {
    pub span: Span,
    /// Identity handle assigned at parse time.
    pub id: AtRuleId,
    /// The rule name without `@`, as written.
    pub name: String,
    /// Prelude items between the name and the block or semicolon.
    pub preludes: Vec<AtPrelude>,
    /// The `{}` block, for at-rules that have one.
    pub block: Option<Block>,
}

/// A prelude item of an at-rule.
#[derive(Debug, Clone)]
pub enum AtPrelude {
    Str(Str),
    Identifier(Identifier),
    MediaQueryList(MediaQueryList),
    MediaQuery(MediaQuery),
}

impl AtPrelude {
    /// The source span of this prelude.
    pub fn span(&self) -> Span {
        match self {
            AtPrelude::Str(s) => s.span,
            AtPrelude::Identifier(ident) => ident.span,
            AtPrelude::MediaQueryList(list) => list.span,
            AtPrelude::MediaQuery(query) => query.span,
        }
    }
}

/// A qualified rule: a prelude and its block.
#[derive(Debug, Clone)]
pub struct QualifiedRule {
    pub span: Span,
    pub prelude: Prelude,
    pub block: Block,
}

/// The prelude of a qualified rule.
#[derive(Debug, Clone)]
pub enum Prelude {
    /// The normal case, a comma-separated selector list.
    SelectorList(SelectorList),
    /// Inside `@keyframes` blocks only.
    KeyframeSelectorList(KeyframeSelectorList),
}

impl Prelude {
    /// The source span of this prelude.
    pub fn span(&self) -> Span {
        match self {
            Prelude::SelectorList(list) => list.span,
            Prelude::KeyframeSelectorList(list) => list.span,
        }
    }
}

/// A `{}` block.
#[derive(Debug, Clone)]
pub enum Block {
    /// Declarations, e.g. inside a style rule or `@font-face`.
    Declarations(DeclarationBlock),
    /// Nested qualified rules, e.g. inside `@media` or `@keyframes`.
    Rules(QualifiedRuleBlock),
}

impl Block {
    /// The source span of this block.
    pub fn span(&self) -> Span {
        match self {
            Block::Declarations(block) => block.span,
            Block::Rules(block) => block.span,
        }
    }

    /// Whether the block contains no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            Block::Declarations(block) => block.declarations.is_empty(),
            Block::Rules(block) => block.rules.is_empty(),
        }
    }
}

/// A block of declarations, e.g. `{ width: 1px; }`.
#[derive(Debug, Clone)]
pub struct DeclarationBlock {
    pub span: Span,
    pub declarations: Vec<BlockEntry>,
}

/// An entry in a declaration block.
#[derive(Debug, Clone)]
pub enum BlockEntry {
    Declaration(Declaration),
    /// Unparsed declaration text. Reserved; the parser never produces it.
    Raw(Raw),
}

impl BlockEntry {
    /// The source span of this entry.
    pub fn span(&self) -> Span {
        match self {
            BlockEntry::Declaration(decl) => decl.span,
            BlockEntry::Raw(raw) => raw.span,
        }
    }
}

/// A `property: value` declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub span: Span,
    /// The property name as written.
    pub property: String,
    /// The declaration values, including [`Value::Comma`] separators.
    pub values: Vec<Value>,
    /// Whether `!important` was specified.
    pub important: bool,
}

/// A block of nested qualified rules.
#[derive(Debug, Clone)]
pub struct QualifiedRuleBlock {
    pub span: Span,
    pub rules: Vec<QualifiedRule>,
}

/// The selector list of a rule inside `@keyframes`.
#[derive(Debug, Clone)]
pub struct KeyframeSelectorList {
    pub span: Span,
    pub selectors: Vec<KeyframeSelector>,
}

/// A single keyframe selector: a percentage, or `from`/`to`.
#[derive(Debug, Clone)]
pub enum KeyframeSelector {
    Percentage(Dimension),
    Keyword(Identifier),
}

impl KeyframeSelector {
    /// The source span of this selector.
    pub fn span(&self) -> Span {
        match self {
            KeyframeSelector::Percentage(dim) => dim.span,
            KeyframeSelector::Keyword(ident) => ident.span,
        }
    }
}
