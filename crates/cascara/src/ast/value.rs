//! Value nodes: dimensions, strings, colors, functions, math.

use crate::source::Span;

/// A CSS value.
#[derive(Debug, Clone)]
pub enum Value {
    Dimension(Dimension),
    Str(Str),
    Identifier(Identifier),
    HexColor(HexColor),
    Function(Function),
    Math(MathExpression),
    Comma(Comma),
    /// Unparsed value text. Reserved; the parser never produces it.
    Raw(Raw),
}

impl Value {
    /// The source span of this value.
    pub fn span(&self) -> Span {
        match self {
            Value::Dimension(dim) => dim.span,
            Value::Str(s) => s.span,
            Value::Identifier(ident) => ident.span,
            Value::HexColor(color) => color.span,
            Value::Function(function) => function.span,
            Value::Math(expr) => expr.span,
            Value::Comma(comma) => comma.span,
            Value::Raw(raw) => raw.span,
        }
    }
}

/// A numeric value and a unit.
///
/// The unit is empty for plain numbers and `"%"` for percentages; the
/// numeral keeps its source spelling.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub span: Span,
    /// The string representation of the numeric value.
    pub value: String,
    /// The unit, e.g. `rem` or `px`.
    pub unit: String,
}

impl Dimension {
    /// Whether this is a plain number (no unit, not a percentage).
    pub fn is_number(&self) -> bool {
        self.unit.is_empty()
    }
}

/// A string literal. The value is the raw content between the quotes,
/// escapes included.
#[derive(Debug, Clone)]
pub struct Str {
    pub span: Span,
    pub value: String,
}

/// An identifier.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub span: Span,
    pub value: String,
}

/// A hex color, e.g. `#aabbccdd`. The literal digits are kept as
/// written.
#[derive(Debug, Clone)]
pub struct HexColor {
    pub span: Span,
    pub rgba: String,
}

/// A function invocation, e.g. `var(--x)` or `calc(1px + 2px)`.
#[derive(Debug, Clone)]
pub struct Function {
    pub span: Span,
    pub name: String,
    /// Comma-separated arguments, with [`Value::Comma`] entries kept.
    pub arguments: Vec<Value>,
}

impl Function {
    /// Whether this function is a math function, whose arguments may
    /// contain math expressions.
    ///
    /// See <https://www.w3.org/TR/css-values-4/#math-function>.
    pub fn is_math(&self) -> bool {
        self.name.eq_ignore_ascii_case("calc")
            || self.name.eq_ignore_ascii_case("min")
            || self.name.eq_ignore_ascii_case("max")
            || self.name.eq_ignore_ascii_case("clamp")
    }
}

/// A binary math expression inside a math function.
#[derive(Debug, Clone)]
pub struct MathExpression {
    pub span: Span,
    pub left: Box<Value>,
    pub operator: MathOperator,
    pub right: Box<Value>,
}

/// Operator of a [`MathExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl MathOperator {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            MathOperator::Add => "+",
            MathOperator::Sub => "-",
            MathOperator::Mul => "*",
            MathOperator::Div => "/",
        }
    }
}

impl std::fmt::Display for MathOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comma separating values or function arguments.
#[derive(Debug, Clone)]
pub struct Comma {
    pub span: Span,
}

/// Unparsed raw text, re-emitted verbatim by the printer.
#[derive(Debug, Clone)]
pub struct Raw {
    pub span: Span,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn math_function_names() {
        for name in ["calc", "min", "max", "clamp", "CALC"] {
            let function = Function {
                span: Span::default(),
                name: name.into(),
                arguments: vec![],
            };
            assert!(function.is_math(), "{name} should be a math function");
        }

        let function = Function {
            span: Span::default(),
            name: "var".into(),
            arguments: vec![],
        };
        assert!(!function.is_math());
    }
}
