//! Selector parsing.
//!
//! Selectors are lexed with whitespace retention switched on so that
//! descendant combinators survive as explicit parts.

use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;
use crate::source::Span;

use super::Parser;

/// Pseudo-classes whose argument uses the `an+b` micro-syntax.
fn is_nth_pseudo_class(name: &str) -> bool {
    matches!(
        name,
        "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type"
    )
}

impl<'s> Parser<'s> {
    pub(crate) fn parse_selector_list(&mut self) -> Result<SelectorList> {
        let mut span = self.lexer.token_span();
        let mut selectors = vec![];

        loop {
            if self.lexer.current == TokenKind::Eof {
                return Err(self.error_here("unexpected EOF"));
            }

            selectors.push(self.parse_selector()?);

            if self.lexer.current == TokenKind::Comma {
                self.lexer.advance()?;
                continue;
            }
            break;
        }

        span.end = selectors.last().expect("nonempty").span.end;
        Ok(SelectorList { span, selectors })
    }

    fn parse_selector(&mut self) -> Result<Selector> {
        let previous = self.lexer.retain_whitespace;
        self.lexer.retain_whitespace = true;
        let result = self.parse_selector_parts();
        self.lexer.retain_whitespace = previous;
        result
    }

    fn parse_selector_parts(&mut self) -> Result<Selector> {
        let mut span = self.lexer.token_span();
        let mut parts: Vec<SelectorPart> = vec![];

        loop {
            match self.lexer.current {
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),

                TokenKind::Whitespace => {
                    parts.push(SelectorPart::Whitespace(Whitespace {
                        span: self.lexer.token_span(),
                    }));
                    self.lexer.advance()?;
                }

                TokenKind::Comma => break,

                TokenKind::LCurly => {
                    if self.inner_selector_list {
                        return Err(self.error_here("unexpected { in selector arguments"));
                    }
                    break;
                }

                TokenKind::RParen => {
                    if !self.inner_selector_list {
                        return Err(self.error_here("unexpected )"));
                    }
                    break;
                }

                TokenKind::Ident => {
                    parts.push(SelectorPart::Type(TypeSelector {
                        span: self.lexer.token_span(),
                        name: self.lexer.current_string.to_string(),
                    }));
                    self.lexer.advance()?;
                }

                TokenKind::Hash => {
                    parts.push(SelectorPart::Id(IdSelector {
                        span: self.lexer.token_span(),
                        name: self.lexer.current_string.to_string(),
                    }));
                    self.lexer.advance()?;
                }

                TokenKind::Delim => match self.lexer.current_string {
                    "." => {
                        let mut class_span = self.lexer.token_span();
                        self.lexer.advance()?;
                        let name = self.lexer.current_string.to_string();
                        class_span.end = self.lexer.token_end();
                        self.lexer.expect(TokenKind::Ident)?;
                        parts.push(SelectorPart::Class(ClassSelector {
                            span: class_span,
                            name,
                        }));
                    }

                    "+" | ">" | "~" | "|" => {
                        parts.push(SelectorPart::Combinator(CombinatorSelector {
                            span: self.lexer.token_span(),
                            operator: self.lexer.current_string.to_string(),
                        }));
                        self.lexer.advance()?;
                    }

                    "*" => {
                        parts.push(SelectorPart::Type(TypeSelector {
                            span: self.lexer.token_span(),
                            name: self.lexer.current_string.to_string(),
                        }));
                        self.lexer.advance()?;
                    }

                    other => {
                        return Err(
                            self.error_here(format!("unexpected delimiter in selector: {other}"))
                        )
                    }
                },

                TokenKind::Colon => parts.push(self.parse_pseudo_selector()?),

                TokenKind::LBracket => parts.push(self.parse_attribute_selector()?),

                _ => {
                    return Err(self.error_here(format!(
                        "unexpected token in selector: {}",
                        self.lexer.describe_current()
                    )))
                }
            }
        }

        let selector = Selector {
            span: span.to(parts.last().map(|p| p.span().end).unwrap_or(span.end)),
            parts,
        };
        if !selector.has_substance() {
            return Err(self.error_here("expected a selector"));
        }
        Ok(selector)
    }

    /// Parse a pseudo-class, wrapping it in a pseudo-element when a
    /// second colon is present.
    fn parse_pseudo_selector(&mut self) -> Result<SelectorPart> {
        let colon_span = self.lexer.token_span();
        self.lexer.advance()?;

        let is_element = self.lexer.current == TokenKind::Colon;
        if is_element {
            self.lexer.advance()?;
        }

        let mut span = Span::new(colon_span.start, self.lexer.token_end());
        let name = self.lexer.current_string.to_string();
        let mut arguments = None;

        match self.lexer.current {
            TokenKind::Ident => {
                span.end = self.lexer.token_end();
                self.lexer.advance()?;
            }

            TokenKind::FunctionStart => {
                self.lexer.advance()?;

                if is_nth_pseudo_class(&name) {
                    while self.lexer.current == TokenKind::Whitespace {
                        self.lexer.advance()?;
                    }

                    arguments = Some(self.parse_nth_arguments()?);
                    span.end = self.lexer.token_end();
                    self.lexer.expect(TokenKind::RParen)?;
                } else {
                    self.inner_selector_list = true;
                    let list = self.parse_selector_list()?;
                    self.inner_selector_list = false;

                    arguments = Some(PseudoClassArguments::SelectorList(list));
                    span.end = self.lexer.token_end();
                    self.lexer.expect(TokenKind::RParen)?;
                }
            }

            _ => {
                return Err(self.error_here(format!(
                    "unexpected token after colon in selector: {}",
                    self.lexer.describe_current()
                )))
            }
        }

        let pseudo_class = PseudoClassSelector {
            span,
            name,
            arguments,
        };

        if is_element {
            Ok(SelectorPart::PseudoElement(PseudoElementSelector {
                span,
                inner: pseudo_class,
            }))
        } else {
            Ok(SelectorPart::PseudoClass(pseudo_class))
        }
    }

    /// Parse the argument of an nth pseudo-class: `even`, `odd`, or an
    /// `an+b` expression.
    fn parse_nth_arguments(&mut self) -> Result<PseudoClassArguments> {
        if self.lexer.current == TokenKind::Ident
            && matches!(self.lexer.current_string, "even" | "odd")
        {
            let ident = Identifier {
                span: self.lexer.token_span(),
                value: self.lexer.current_string.to_string(),
            };
            self.lexer.advance()?;
            return Ok(PseudoClassArguments::Identifier(ident));
        }

        let previous = self.lexer.retain_whitespace;
        self.lexer.retain_whitespace = false;
        let result = self.parse_an_plus_b();
        self.lexer.retain_whitespace = previous;
        result.map(PseudoClassArguments::ANPlusB)
    }

    /// Parse an `an+b` expression from the token forms the lexer
    /// produces. `2n+3` arrives as a dimension followed by a signed
    /// number, `2n-3` as a single dimension whose unit is `n-3`, and
    /// `n`/`-n` as identifiers; this splits them back into A, operator,
    /// and B.
    fn parse_an_plus_b(&mut self) -> Result<ANPlusB> {
        let mut span = self.lexer.token_span();
        let a: String;
        let mut operator = String::new();
        let mut b = String::new();

        match self.lexer.current {
            // A bare integer is an offset with no `n`.
            TokenKind::Number => {
                let numeral = self.lexer.current_numeral;
                a = "0".to_string();
                if let Some(rest) = numeral.strip_prefix('-') {
                    operator = "-".to_string();
                    b = rest.to_string();
                } else {
                    b = numeral.strip_prefix('+').unwrap_or(numeral).to_string();
                }
                span.end = self.lexer.token_end();
                self.lexer.advance()?;
                return Ok(ANPlusB {
                    span,
                    a,
                    operator,
                    b,
                });
            }

            TokenKind::Dimension => {
                let numeral = self.lexer.current_numeral.to_string();
                let unit = self.lexer.current_string;

                if unit == "n" {
                    a = numeral;
                } else if let Some(rest) = unit.strip_prefix("n-") {
                    if rest.is_empty() || !rest.bytes().all(|byte| byte.is_ascii_digit()) {
                        return Err(self.error_here("expected literal n as part of an+b"));
                    }
                    a = numeral;
                    operator = "-".to_string();
                    b = rest.to_string();
                    span.end = self.lexer.token_end();
                    self.lexer.advance()?;
                    return Ok(ANPlusB {
                        span,
                        a,
                        operator,
                        b,
                    });
                } else {
                    return Err(self.error_here("expected literal n as part of an+b"));
                }
                span.end = self.lexer.token_end();
                self.lexer.advance()?;
            }

            TokenKind::Ident => {
                let value = self.lexer.current_string;
                let (sign, rest) = match value.strip_prefix('-') {
                    Some(rest) => ("-1", rest),
                    None => ("1", value),
                };

                let Some(tail) = rest.strip_prefix('n') else {
                    return Err(self.error_here("expected even, odd, or an+b syntax"));
                };

                a = sign.to_string();
                if let Some(offset) = tail.strip_prefix('-') {
                    if offset.is_empty() || !offset.bytes().all(|byte| byte.is_ascii_digit()) {
                        return Err(self.error_here("expected literal n as part of an+b"));
                    }
                    operator = "-".to_string();
                    b = offset.to_string();
                    span.end = self.lexer.token_end();
                    self.lexer.advance()?;
                    return Ok(ANPlusB {
                        span,
                        a,
                        operator,
                        b,
                    });
                } else if !tail.is_empty() {
                    return Err(self.error_here("expected literal n as part of an+b"));
                }
                span.end = self.lexer.token_end();
                self.lexer.advance()?;
            }

            _ => return Err(self.error_here("expected even, odd, or an+b syntax")),
        }

        // An optional offset after a bare `an`: either a separate sign
        // delimiter and number, or a number token that absorbed the sign.
        if self.lexer.current == TokenKind::Delim
            && matches!(self.lexer.current_string, "+" | "-")
        {
            operator = self.lexer.current_string.to_string();
            self.lexer.advance()?;

            b = self
                .lexer
                .current_numeral
                .trim_start_matches('+')
                .to_string();
            span.end = self.lexer.token_end();
            self.lexer.expect(TokenKind::Number)?;
        } else if self.lexer.current == TokenKind::Number {
            let numeral = self.lexer.current_numeral;
            if let Some(rest) = numeral.strip_prefix('+') {
                operator = "+".to_string();
                b = rest.to_string();
            } else if let Some(rest) = numeral.strip_prefix('-') {
                operator = "-".to_string();
                b = rest.to_string();
            } else {
                return Err(self.error_here("expected a signed offset in an+b"));
            }
            span.end = self.lexer.token_end();
            self.lexer.advance()?;
        }

        Ok(ANPlusB {
            span,
            a,
            operator,
            b,
        })
    }

    /// Parse an attribute selector: `[name]`, `[name=value]`, or
    /// `[name^=value]` and friends.
    fn parse_attribute_selector(&mut self) -> Result<SelectorPart> {
        let mut span = self.lexer.token_span();
        self.lexer.advance()?;
        self.skip_selector_whitespace()?;

        let property = self.lexer.current_string.to_string();
        self.lexer.expect(TokenKind::Ident)?;
        self.skip_selector_whitespace()?;

        if self.lexer.current == TokenKind::RBracket {
            span.end = self.lexer.token_end();
            self.lexer.advance()?;
            return Ok(SelectorPart::Attribute(AttributeSelector {
                span,
                property,
                pre_operator: String::new(),
                value: None,
            }));
        }

        if self.lexer.current != TokenKind::Delim {
            return Err(self.error_here(format!(
                "expected ] or an attribute operator, got {}",
                self.lexer.describe_current()
            )));
        }

        let pre_operator = match self.lexer.current_string {
            "^" | "~" | "$" | "*" => {
                let operator = self.lexer.current_string.to_string();
                self.lexer.advance()?;
                if self.lexer.current != TokenKind::Delim || self.lexer.current_string != "=" {
                    return Err(self.error_here(format!(
                        "expected = after attribute operator, got {}",
                        self.lexer.describe_current()
                    )));
                }
                self.lexer.advance()?;
                operator
            }
            "=" => {
                self.lexer.advance()?;
                String::new()
            }
            other => {
                return Err(self.error_here(format!(
                    "unexpected delimiter in attribute selector: {other}"
                )))
            }
        };
        self.skip_selector_whitespace()?;

        let value = self
            .parse_value()?
            .ok_or_else(|| self.error_here("expected an attribute value"))?;
        self.skip_selector_whitespace()?;

        span.end = self.lexer.token_end();
        self.lexer.expect(TokenKind::RBracket)?;
        Ok(SelectorPart::Attribute(AttributeSelector {
            span,
            property,
            pre_operator,
            value: Some(value),
        }))
    }

    /// Attribute selector internals tolerate whitespace even while the
    /// selector lexer retains it.
    fn skip_selector_whitespace(&mut self) -> Result<()> {
        while self.lexer.current == TokenKind::Whitespace {
            self.lexer.advance()?;
        }
        Ok(())
    }
}
