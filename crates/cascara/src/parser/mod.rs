//! Recursive-descent CSS parser.
//!
//! [`parse`] drives the [`Lexer`] over a [`Source`] and builds a
//! [`Stylesheet`]. Helpers return `Result` and the driver
//! short-circuits on the first syntactic violation; there is no error
//! recovery. Every node in a successful parse carries a valid span.

mod selectors;

use crate::ast::*;
use crate::error::{Diagnostic, Error, Result};
use crate::lexer::{Lexer, TokenKind};
use crate::source::{Source, Span};

/// Parse a stylesheet from a source file.
///
/// On success the source's line-offset table is installed from the
/// lexer pass, so later line/column lookups are free of rescans.
pub fn parse(source: &Source) -> Result<Stylesheet> {
    let mut parser = Parser::new(source)?;
    let result = parser.run();
    let (stylesheet, line_offsets) = parser.finish();
    source.install_line_offsets(line_offsets);
    result.map(|()| stylesheet)
}

pub(crate) struct Parser<'s> {
    pub(crate) lexer: Lexer<'s>,
    source: &'s Source,
    stylesheet: Stylesheet,
    next_rule_id: u32,
    /// Set while parsing the selector arguments of a functional
    /// pseudo-class, where `)` terminates the list instead of `{`.
    pub(crate) inner_selector_list: bool,
}

impl<'s> Parser<'s> {
    fn new(source: &'s Source) -> Result<Self> {
        Ok(Self {
            lexer: Lexer::new(source)?,
            source,
            stylesheet: Stylesheet::default(),
            next_rule_id: 0,
            inner_selector_list: false,
        })
    }

    fn finish(self) -> (Stylesheet, Vec<usize>) {
        (self.stylesheet, self.lexer.into_line_offsets())
    }

    pub(crate) fn error(&self, span: Span, message: impl Into<String>) -> Error {
        Error::Parse(Diagnostic::error(self.source, span, message))
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> Error {
        self.error(self.lexer.token_span(), message)
    }

    fn alloc_rule_id(&mut self) -> AtRuleId {
        let id = AtRuleId(self.next_rule_id);
        self.next_rule_id += 1;
        id
    }

    /// The top-level loop. CDO/CDC are discarded because we always
    /// parse from the top-level entry point of CSS Syntax Level 3.
    fn run(&mut self) -> Result<()> {
        while self.lexer.current != TokenKind::Eof {
            match self.lexer.current {
                TokenKind::AtKeyword => self.parse_at_rule()?,

                TokenKind::Semicolon | TokenKind::Cdo | TokenKind::Cdc => {
                    self.lexer.advance()?;
                }

                TokenKind::Comment => {
                    self.stylesheet.nodes.push(Node::Comment(Comment {
                        span: self.lexer.token_span(),
                        text: self.lexer.current_string.to_string(),
                    }));
                    self.lexer.advance()?;
                }

                _ => {
                    let rule = self.parse_qualified_rule(false)?;
                    self.stylesheet.nodes.push(Node::QualifiedRule(rule));
                }
            }
        }
        Ok(())
    }

    fn parse_at_rule(&mut self) -> Result<()> {
        match self.lexer.current_string.to_ascii_lowercase().as_str() {
            "import" => self.parse_import_at_rule(),
            "media" => self.parse_media_at_rule(),
            "keyframes" | "-webkit-keyframes" => self.parse_keyframes_at_rule(),
            "custom-media" => self.parse_custom_media_at_rule(),
            "font-face" => self.parse_font_face_at_rule(),
            name => Err(self.error_here(format!("unsupported at-rule: @{name}"))),
        }
    }

    /// Parse `@import`, roughly per
    /// <https://www.w3.org/TR/css-cascade-4/#at-import>. `@supports`
    /// conditions are rejected.
    fn parse_import_at_rule(&mut self) -> Result<()> {
        let mut span = self.lexer.token_span();
        let name = self.lexer.current_string.to_string();
        let id = self.alloc_rule_id();
        self.lexer.advance()?;

        let target = match self.lexer.current {
            TokenKind::Url => {
                let target = Str {
                    span: self.lexer.token_span(),
                    value: self.lexer.current_string.to_string(),
                };
                self.lexer.advance()?;
                target
            }

            TokenKind::FunctionStart => {
                if !self.lexer.current_string.eq_ignore_ascii_case("url") {
                    return Err(self.error_here("@import target must be a url or string"));
                }
                let mut target_span = self.lexer.token_span();
                self.lexer.advance()?;

                let value = self.lexer.current_string.to_string();
                self.lexer.expect(TokenKind::String)?;
                target_span.end = self.lexer.token_end();
                self.lexer.expect(TokenKind::RParen)?;
                Str {
                    span: target_span,
                    value,
                }
            }

            TokenKind::String => {
                let target = Str {
                    span: self.lexer.token_span(),
                    value: self.lexer.current_string.to_string(),
                };
                self.lexer.expect(TokenKind::String)?;
                target
            }

            _ => return Err(self.error_here("unexpected import specifier")),
        };

        self.stylesheet.imports.push(ImportSpecifier {
            value: target.value.clone(),
            rule: id,
        });

        let mut preludes = vec![AtPrelude::Str(target)];

        if self.lexer.current == TokenKind::FunctionStart
            && self.lexer.current_string.eq_ignore_ascii_case("supports")
        {
            return Err(self.error_here("@supports conditions on @import are not supported"));
        }

        if let Some(queries) = self.parse_media_query_list()? {
            preludes.push(AtPrelude::MediaQueryList(queries));
        }

        span.end = preludes.last().map(|p| p.span().end).unwrap_or(span.end);
        self.stylesheet.nodes.push(Node::AtRule(AtRule {
            span,
            id,
            name,
            preludes,
            block: None,
        }));
        Ok(())
    }

    /// Parse `@media`, roughly per
    /// <https://www.w3.org/TR/mediaqueries-4/#media>.
    fn parse_media_at_rule(&mut self) -> Result<()> {
        let mut span = self.lexer.token_span();
        let name = self.lexer.current_string.to_string();
        let id = self.alloc_rule_id();
        self.lexer.advance()?;

        let queries = self
            .parse_media_query_list()?
            .ok_or_else(|| self.error_here("@media requires a media query list"))?;

        let block = self.parse_rule_block(false)?;
        span.end = block.span.end;

        self.stylesheet.nodes.push(Node::AtRule(AtRule {
            span,
            id,
            name,
            preludes: vec![AtPrelude::MediaQueryList(queries)],
            block: Some(Block::Rules(block)),
        }));
        Ok(())
    }

    /// Parse `@keyframes` / `@-webkit-keyframes`, roughly per
    /// <https://www.w3.org/TR/css-animations-1/#keyframes>.
    fn parse_keyframes_at_rule(&mut self) -> Result<()> {
        let mut span = self.lexer.token_span();
        let name = self.lexer.current_string.to_string();
        let id = self.alloc_rule_id();
        self.lexer.advance()?;

        let prelude = match self.lexer.current {
            TokenKind::String => AtPrelude::Str(Str {
                span: self.lexer.token_span(),
                value: self.lexer.current_string.to_string(),
            }),
            TokenKind::Ident => AtPrelude::Identifier(Identifier {
                span: self.lexer.token_span(),
                value: self.lexer.current_string.to_string(),
            }),
            _ => {
                return Err(self.error_here(format!(
                    "expected string or identifier for keyframes name, got {}",
                    self.lexer.describe_current()
                )))
            }
        };
        self.lexer.advance()?;

        let block = self.parse_rule_block(true)?;
        span.end = block.span.end;

        self.stylesheet.nodes.push(Node::AtRule(AtRule {
            span,
            id,
            name,
            preludes: vec![prelude],
            block: Some(Block::Rules(block)),
        }));
        Ok(())
    }

    /// Parse `@custom-media`, per
    /// <https://www.w3.org/TR/mediaqueries-5/#custom-mq>. Exactly one
    /// query is allowed.
    fn parse_custom_media_at_rule(&mut self) -> Result<()> {
        let mut span = self.lexer.token_span();
        let name = self.lexer.current_string.to_string();
        let id = self.alloc_rule_id();
        self.lexer.advance()?;

        let extension_name = match self.parse_value()? {
            Some(Value::Identifier(ident)) => ident,
            Some(other) => {
                return Err(self.error(other.span(), "expected identifier for @custom-media name"))
            }
            None => return Err(self.error_here("expected identifier for @custom-media name")),
        };

        let queries = self
            .parse_media_query_list()?
            .ok_or_else(|| self.error_here("@custom-media requires a media query"))?;
        if queries.queries.len() != 1 {
            return Err(self.error(
                queries.queries[1].span,
                "@custom-media rule requires a single media query argument",
            ));
        }
        let query = queries.queries.into_iter().next().expect("one query");

        span.end = query.span.end;
        self.stylesheet.nodes.push(Node::AtRule(AtRule {
            span,
            id,
            name,
            preludes: vec![
                AtPrelude::Identifier(extension_name),
                AtPrelude::MediaQuery(query),
            ],
            block: None,
        }));
        Ok(())
    }

    /// Parse `@font-face`, per
    /// <https://www.w3.org/TR/css-fonts-4/#font-face-rule>.
    fn parse_font_face_at_rule(&mut self) -> Result<()> {
        let mut span = self.lexer.token_span();
        let name = self.lexer.current_string.to_string();
        let id = self.alloc_rule_id();
        self.lexer.advance()?;

        let block = self.parse_declaration_block()?;
        span.end = block.span.end;

        self.stylesheet.nodes.push(Node::AtRule(AtRule {
            span,
            id,
            name,
            preludes: vec![],
            block: Some(Block::Declarations(block)),
        }));
        Ok(())
    }

    /// Parse a `{}` block of nested qualified rules, e.g. the body of
    /// `@media` or `@keyframes`.
    fn parse_rule_block(&mut self, is_keyframes: bool) -> Result<QualifiedRuleBlock> {
        let mut span = self.lexer.token_span();
        self.lexer.expect(TokenKind::LCurly)?;

        let mut rules = vec![];
        loop {
            match self.lexer.current {
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),
                TokenKind::RCurly => {
                    span.end = self.lexer.token_end();
                    self.lexer.advance()?;
                    return Ok(QualifiedRuleBlock { span, rules });
                }
                _ => rules.push(self.parse_qualified_rule(is_keyframes)?),
            }
        }
    }

    /// Parse a qualified rule. Inside `@keyframes`, preludes are
    /// keyframe selector lists instead of selector lists.
    pub(crate) fn parse_qualified_rule(&mut self, is_keyframes: bool) -> Result<QualifiedRule> {
        let mut span = self.lexer.token_span();
        let mut prelude = None;

        loop {
            match self.lexer.current {
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),

                TokenKind::LCurly => {
                    let Some(prelude) = prelude else {
                        return Err(self.error(span, "rule is missing a selector"));
                    };
                    let block = self.parse_declaration_block()?;
                    span.end = block.span.end;
                    return Ok(QualifiedRule {
                        span,
                        prelude,
                        block: Block::Declarations(block),
                    });
                }

                _ => {
                    prelude = Some(if is_keyframes {
                        Prelude::KeyframeSelectorList(self.parse_keyframe_selector_list()?)
                    } else {
                        Prelude::SelectorList(self.parse_selector_list()?)
                    });
                }
            }
        }
    }

    /// Parse a `{}` block of declarations, e.g. `{ width: 1px; }`.
    fn parse_declaration_block(&mut self) -> Result<DeclarationBlock> {
        let mut span = self.lexer.token_span();
        self.lexer.expect(TokenKind::LCurly)?;

        let mut declarations = vec![];
        while self.lexer.current != TokenKind::RCurly {
            // Stray semicolons and comments carry no declaration.
            if matches!(self.lexer.current, TokenKind::Semicolon | TokenKind::Comment) {
                if self.lexer.current == TokenKind::Comment {
                    tracing::debug!("dropping comment inside a declaration block");
                }
                self.lexer.advance()?;
                continue;
            }
            if self.lexer.current == TokenKind::Eof {
                return Err(self.error_here("unexpected EOF"));
            }

            declarations.push(BlockEntry::Declaration(self.parse_declaration()?));

            if self.lexer.current == TokenKind::Semicolon {
                self.lexer.advance()?;
            }
        }

        span.end = self.lexer.token_end();
        self.lexer.advance()?;
        Ok(DeclarationBlock { span, declarations })
    }

    /// Parse a single `property: value [!important]` declaration.
    fn parse_declaration(&mut self) -> Result<Declaration> {
        let mut span = self.lexer.token_span();
        let property = self.lexer.current_string.to_string();
        self.lexer.expect(TokenKind::Ident)?;
        self.lexer.expect(TokenKind::Colon)?;

        let mut values = vec![];
        let mut important = false;

        loop {
            match self.lexer.current {
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),

                TokenKind::Delim if self.lexer.current_string == "!" => {
                    self.lexer.advance()?;
                    let is_important = self.lexer.current == TokenKind::Ident
                        && self.lexer.current_string.eq_ignore_ascii_case("important");
                    if !is_important {
                        return Err(self.error_here(format!(
                            "expected !important, got {}",
                            self.lexer.describe_current()
                        )));
                    }
                    span.end = self.lexer.token_end();
                    self.lexer.advance()?;
                    important = true;
                }

                TokenKind::Comma => {
                    values.push(Value::Comma(Comma {
                        span: self.lexer.token_span(),
                    }));
                    self.lexer.advance()?;
                }

                _ => match self.parse_value()? {
                    Some(value) => values.push(value),
                    None => {
                        if values.is_empty() {
                            return Err(self.error_here("declaration must have a value"));
                        }
                        let last_end = values.last().expect("nonempty").span().end;
                        if last_end > span.end {
                            span.end = last_end;
                        }
                        break;
                    }
                },
            }
        }

        Ok(Declaration {
            span,
            property,
            values,
            important,
        })
    }

    /// Parse a value at the current position, or return `None` to
    /// signal that the value list has ended.
    pub(crate) fn parse_value(&mut self) -> Result<Option<Value>> {
        let span = self.lexer.token_span();
        let value = match self.lexer.current {
            TokenKind::Dimension => {
                let value = Value::Dimension(Dimension {
                    span,
                    value: self.lexer.current_numeral.to_string(),
                    unit: self.lexer.current_string.to_string(),
                });
                self.lexer.advance()?;
                value
            }

            TokenKind::Percentage => {
                let value = Value::Dimension(Dimension {
                    span,
                    value: self.lexer.current_numeral.to_string(),
                    unit: "%".to_string(),
                });
                self.lexer.advance()?;
                value
            }

            TokenKind::Number => {
                let value = Value::Dimension(Dimension {
                    span,
                    value: self.lexer.current_numeral.to_string(),
                    unit: String::new(),
                });
                self.lexer.advance()?;
                value
            }

            TokenKind::Ident => {
                let value = Value::Identifier(Identifier {
                    span,
                    value: self.lexer.current_string.to_string(),
                });
                self.lexer.advance()?;
                value
            }

            TokenKind::Hash => {
                let value = Value::HexColor(HexColor {
                    span,
                    rgba: self.lexer.current_string.to_string(),
                });
                self.lexer.advance()?;
                value
            }

            TokenKind::String => {
                let value = Value::Str(Str {
                    span,
                    value: self.lexer.current_string.to_string(),
                });
                self.lexer.advance()?;
                value
            }

            // An unquoted url normalizes to its quoted function form.
            TokenKind::Url => {
                let value = Value::Function(Function {
                    span,
                    name: "url".to_string(),
                    arguments: vec![Value::Str(Str {
                        span,
                        value: self.lexer.current_string.to_string(),
                    })],
                });
                self.lexer.advance()?;
                value
            }

            TokenKind::FunctionStart => Value::Function(self.parse_function()?),

            _ => return Ok(None),
        };

        Ok(Some(value))
    }

    fn parse_function(&mut self) -> Result<Function> {
        let mut span = self.lexer.token_span();
        let name = self.lexer.current_string.to_string();
        let is_math = name.eq_ignore_ascii_case("calc")
            || name.eq_ignore_ascii_case("min")
            || name.eq_ignore_ascii_case("max")
            || name.eq_ignore_ascii_case("clamp");
        self.lexer.advance()?;

        let mut arguments = vec![];
        loop {
            match self.lexer.current {
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),

                TokenKind::RParen => {
                    span.end = self.lexer.token_end();
                    self.lexer.advance()?;
                    break;
                }

                TokenKind::Comma => {
                    arguments.push(Value::Comma(Comma {
                        span: self.lexer.token_span(),
                    }));
                    self.lexer.advance()?;
                }

                _ => {
                    if is_math {
                        arguments.push(self.parse_math_expression()?);
                    } else {
                        match self.parse_value()? {
                            Some(value) => arguments.push(value),
                            None => {
                                return Err(self.error_here(format!(
                                    "unexpected token in function arguments: {}",
                                    self.lexer.describe_current()
                                )))
                            }
                        }
                    }
                }
            }
        }

        Ok(Function {
            span,
            name,
            arguments,
        })
    }

    /// Recursive-descent math parsing: sums over products over values.
    /// See <https://www.w3.org/TR/css-values-3/#calc-syntax>.
    fn parse_math_expression(&mut self) -> Result<Value> {
        self.parse_math_sum()
    }

    fn parse_math_sum(&mut self) -> Result<Value> {
        let mut left = self.parse_math_product()?;

        while self.lexer.current == TokenKind::Delim
            && matches!(self.lexer.current_string, "+" | "-")
        {
            let operator = if self.lexer.current_string == "+" {
                MathOperator::Add
            } else {
                MathOperator::Sub
            };
            self.lexer.advance()?;

            let right = self.parse_math_product()?;
            let span = left.span().to(right.span().end);
            left = Value::Math(MathExpression {
                span,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_math_product(&mut self) -> Result<Value> {
        let mut left = self
            .parse_value()?
            .ok_or_else(|| self.error_here("expected a value in math expression"))?;

        while self.lexer.current == TokenKind::Delim
            && matches!(self.lexer.current_string, "*" | "/")
        {
            let operator = if self.lexer.current_string == "*" {
                MathOperator::Mul
            } else {
                MathOperator::Div
            };
            self.lexer.advance()?;

            let right = self
                .parse_value()?
                .ok_or_else(|| self.error_here("expected a value in math expression"))?;
            let span = left.span().to(right.span().end);
            left = Value::Math(MathExpression {
                span,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// Parse a comma-separated media query list. Returns `None` when no
    /// query is present at the current position.
    fn parse_media_query_list(&mut self) -> Result<Option<MediaQueryList>> {
        let mut span = self.lexer.token_span();
        let mut queries = vec![];

        loop {
            if self.lexer.current == TokenKind::Eof {
                tracing::debug!("media query list ended by EOF");
                break;
            }

            if let Some(query) = self.parse_media_query()? {
                queries.push(query);
            }

            if self.lexer.current == TokenKind::Comma {
                self.lexer.advance()?;
                continue;
            }
            break;
        }

        let Some(last) = queries.last() else {
            return Ok(None);
        };
        span.end = last.span.end;
        Ok(Some(MediaQueryList { span, queries }))
    }

    /// Parse a single media query: a space-separated run of keywords
    /// and parenthesized features.
    fn parse_media_query(&mut self) -> Result<Option<MediaQuery>> {
        let mut span = self.lexer.token_span();
        let mut parts = vec![];

        loop {
            match self.lexer.current {
                TokenKind::LParen => parts.push(self.parse_media_feature()?),

                TokenKind::Ident => {
                    parts.push(MediaQueryPart::Identifier(Identifier {
                        span: self.lexer.token_span(),
                        value: self.lexer.current_string.to_string(),
                    }));
                    self.lexer.advance()?;
                }

                _ => break,
            }
        }

        let Some(last) = parts.last() else {
            return Ok(None);
        };
        span.end = last.span().end;
        Ok(Some(MediaQuery { span, parts }))
    }

    /// Parse a parenthesized media feature: boolean `(name)`, plain
    /// `(name: value)`, or the range forms of Media Queries Level 4.
    fn parse_media_feature(&mut self) -> Result<MediaQueryPart> {
        let mut span = self.lexer.token_span();
        self.lexer.expect(TokenKind::LParen)?;

        let first = self
            .parse_value()?
            .ok_or_else(|| self.error_here("expected a media feature"))?;

        match self.lexer.current {
            TokenKind::RParen => {
                span.end = self.lexer.token_end();
                self.lexer.advance()?;

                let Value::Identifier(property) = first else {
                    return Err(
                        self.error(first.span(), "expected identifier in boolean media feature")
                    );
                };
                Ok(MediaQueryPart::Plain(MediaFeaturePlain {
                    span,
                    property,
                    value: None,
                }))
            }

            TokenKind::Colon => {
                self.lexer.advance()?;
                let Value::Identifier(property) = first else {
                    return Err(self.error(first.span(), "expected identifier in media feature"));
                };

                let value = self
                    .parse_value()?
                    .ok_or_else(|| self.error_here("expected a media feature value"))?;

                span.end = self.lexer.token_end();
                self.lexer.expect(TokenKind::RParen)?;
                Ok(MediaQueryPart::Plain(MediaFeaturePlain {
                    span,
                    property,
                    value: Some(value),
                }))
            }

            TokenKind::Delim => {
                let operator = self.parse_media_range_operator()?;
                let second = self
                    .parse_value()?
                    .ok_or_else(|| self.error_here("expected a value in media feature range"))?;

                match second {
                    // `value OP name` or `value OP name OP value`.
                    Value::Identifier(property) => {
                        let mut right_value = None;
                        if self.lexer.current == TokenKind::Delim {
                            let second_operator = self.parse_media_range_operator()?;
                            if second_operator != operator {
                                return Err(self.error_here(
                                    "operators in a media feature range must point the same way",
                                ));
                            }
                            right_value = Some(self.parse_value()?.ok_or_else(|| {
                                self.error_here("expected a value in media feature range")
                            })?);
                        }

                        span.end = self.lexer.token_end();
                        self.lexer.expect(TokenKind::RParen)?;
                        Ok(MediaQueryPart::Range(MediaFeatureRange {
                            span,
                            property,
                            left_value: Some(first),
                            operator,
                            right_value,
                        }))
                    }

                    // `name OP value`.
                    second => {
                        let Value::Identifier(property) = first else {
                            return Err(self.error(
                                first.span(),
                                "expected identifier in media feature range",
                            ));
                        };

                        span.end = self.lexer.token_end();
                        self.lexer.expect(TokenKind::RParen)?;
                        Ok(MediaQueryPart::Range(MediaFeatureRange {
                            span,
                            property,
                            left_value: None,
                            operator,
                            right_value: Some(second),
                        }))
                    }
                }
            }

            _ => Err(self.error_here(format!(
                "unexpected token in media feature: {}",
                self.lexer.describe_current()
            ))),
        }
    }

    /// Combine `<`/`>` and an optional `=` delimiter into a range
    /// operator.
    fn parse_media_range_operator(&mut self) -> Result<RangeOperator> {
        let base = match self.lexer.current_string {
            "<" => RangeOperator::Lt,
            ">" => RangeOperator::Gt,
            other => {
                return Err(self.error_here(format!("unknown media range operator: {other}")))
            }
        };
        self.lexer.advance()?;

        if self.lexer.current == TokenKind::Delim && self.lexer.current_string == "=" {
            self.lexer.advance()?;
            return Ok(match base {
                RangeOperator::Lt => RangeOperator::Le,
                RangeOperator::Gt => RangeOperator::Ge,
                _ => unreachable!(),
            });
        }

        Ok(base)
    }

    /// Parse the prelude of a rule inside `@keyframes`: a
    /// comma-separated list of percentages and `from`/`to` keywords.
    fn parse_keyframe_selector_list(&mut self) -> Result<KeyframeSelectorList> {
        let mut span = self.lexer.token_span();
        let mut selectors = vec![];

        loop {
            match self.lexer.current {
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),

                TokenKind::Percentage => selectors.push(KeyframeSelector::Percentage(Dimension {
                    span: self.lexer.token_span(),
                    value: self.lexer.current_numeral.to_string(),
                    unit: "%".to_string(),
                })),

                TokenKind::Ident => {
                    if self.lexer.current_string != "from" && self.lexer.current_string != "to" {
                        return Err(self.error_here(format!(
                            "unexpected {}: keyframe selector can only be from, to, or a percentage",
                            self.lexer.describe_current()
                        )));
                    }
                    selectors.push(KeyframeSelector::Keyword(Identifier {
                        span: self.lexer.token_span(),
                        value: self.lexer.current_string.to_string(),
                    }));
                }

                _ => {
                    return Err(self.error_here(format!(
                        "unexpected {}: keyframe selector can only be from, to, or a percentage",
                        self.lexer.describe_current()
                    )))
                }
            }
            self.lexer.advance()?;

            if self.lexer.current == TokenKind::Comma {
                self.lexer.advance()?;
                continue;
            }
            break;
        }

        if selectors.is_empty() {
            return Err(
                self.error_here("keyframes rule must have at least one selector")
            );
        }

        span.end = selectors.last().expect("nonempty").span().end;
        Ok(KeyframeSelectorList { span, selectors })
    }
}
