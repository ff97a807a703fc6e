//! Deterministic minified printing.
//!
//! The printer serializes a stylesheet with no whitespace between
//! tokens except where removal would change meaning: inside selectors,
//! between media query parts, between space-separated declaration
//! values, and around the additive operators of math expressions.
//! Printing the same tree twice produces byte-identical output,
//! source-map mappings included.

mod sourcemap;

pub use sourcemap::{vlq_decode, vlq_encode};

use crate::ast::*;
use crate::source::{Source, Span};

use sourcemap::SourceMapBuilder;

/// Print a stylesheet to minified CSS.
pub fn print(stylesheet: &Stylesheet) -> String {
    let mut printer = Printer { out: String::new(), map: None };
    printer.print_stylesheet(stylesheet);
    printer.out
}

/// Print a stylesheet to minified CSS with a trailing
/// `sourceMappingURL` data-url comment mapping the output back to
/// `source`.
pub fn print_with_source_map(stylesheet: &Stylesheet, source: &Source) -> String {
    let mut printer = Printer {
        out: String::new(),
        map: Some(SourceMapBuilder::new(source)),
    };
    printer.print_stylesheet(stylesheet);

    let Printer { mut out, map } = printer;
    if let Some(map) = map {
        map.finish(&mut out);
    }
    out
}

struct Printer<'s> {
    out: String,
    map: Option<SourceMapBuilder<'s>>,
}

impl Printer<'_> {
    fn add_mapping(&mut self, span: Span) {
        if let Some(map) = self.map.as_mut() {
            map.add_mapping(span, &self.out);
        }
    }

    fn print_stylesheet(&mut self, stylesheet: &Stylesheet) {
        for node in &stylesheet.nodes {
            self.print_node(node);
        }
    }

    fn print_node(&mut self, node: &Node) {
        match node {
            Node::QualifiedRule(rule) => self.print_qualified_rule(rule),
            Node::AtRule(rule) => self.print_at_rule(rule),
            // Comments do not survive minification.
            Node::Comment(_) => {}
        }
    }

    fn print_qualified_rule(&mut self, rule: &QualifiedRule) {
        self.add_mapping(rule.span);
        match &rule.prelude {
            Prelude::SelectorList(list) => self.print_selector_list(list),
            Prelude::KeyframeSelectorList(list) => self.print_keyframe_selector_list(list),
        }
        self.out.push('{');
        self.print_block(&rule.block);
        self.out.push('}');
    }

    fn print_at_rule(&mut self, rule: &AtRule) {
        self.add_mapping(rule.span);
        self.out.push('@');
        self.out.push_str(&rule.name);

        if !rule.preludes.is_empty() {
            self.out.push(' ');
            for (i, prelude) in rule.preludes.iter().enumerate() {
                match prelude {
                    AtPrelude::Str(s) => self.print_str(s),
                    AtPrelude::Identifier(ident) => self.out.push_str(&ident.value),
                    AtPrelude::MediaQueryList(list) => self.print_media_query_list(list),
                    AtPrelude::MediaQuery(query) => self.print_media_query(query),
                }
                if i + 1 < rule.preludes.len() {
                    self.out.push(' ');
                }
            }
        }

        match &rule.block {
            Some(block) => {
                self.out.push('{');
                self.print_block(block);
                self.out.push('}');
            }
            None => self.out.push(';'),
        }
    }

    fn print_block(&mut self, block: &Block) {
        match block {
            Block::Declarations(block) => {
                for (i, entry) in block.declarations.iter().enumerate() {
                    match entry {
                        BlockEntry::Declaration(decl) => self.print_declaration(decl),
                        BlockEntry::Raw(raw) => self.out.push_str(&raw.value),
                    }
                    if i + 1 < block.declarations.len() {
                        self.out.push(';');
                    }
                }
            }
            Block::Rules(block) => {
                for rule in &block.rules {
                    self.print_qualified_rule(rule);
                }
            }
        }
    }

    fn print_declaration(&mut self, decl: &Declaration) {
        self.out.push_str(&decl.property);
        self.out.push(':');

        for (i, value) in decl.values.iter().enumerate() {
            self.print_value(value);

            // A space separates adjacent values unless either side is
            // a comma.
            if let Some(next) = decl.values.get(i + 1) {
                let comma_adjacent =
                    matches!(value, Value::Comma(_)) || matches!(next, Value::Comma(_));
                if !comma_adjacent {
                    self.out.push(' ');
                }
            }
        }

        if decl.important {
            self.out.push_str("!important");
        }
    }

    fn print_value(&mut self, value: &Value) {
        match value {
            Value::Dimension(dimension) => {
                self.out.push_str(&dimension.value);
                self.out.push_str(&dimension.unit);
            }
            Value::Str(s) => self.print_str(s),
            Value::Identifier(ident) => self.out.push_str(&ident.value),
            Value::HexColor(color) => {
                self.out.push('#');
                self.out.push_str(&color.rgba);
            }
            Value::Function(function) => {
                self.out.push_str(&function.name);
                self.out.push('(');
                for argument in &function.arguments {
                    self.print_value(argument);
                }
                self.out.push(')');
            }
            Value::Math(expr) => self.print_math_expression(expr),
            Value::Comma(_) => self.out.push(','),
            Value::Raw(raw) => self.out.push_str(&raw.value),
        }
    }

    fn print_math_expression(&mut self, expr: &MathExpression) {
        self.print_value(&expr.left);
        // The additive operators require surrounding whitespace to keep
        // their meaning; the multiplicative ones do not.
        match expr.operator {
            MathOperator::Add | MathOperator::Sub => {
                self.out.push(' ');
                self.out.push_str(expr.operator.as_str());
                self.out.push(' ');
            }
            MathOperator::Mul | MathOperator::Div => {
                self.out.push_str(expr.operator.as_str());
            }
        }
        self.print_value(&expr.right);
    }

    fn print_str(&mut self, s: &Str) {
        self.out.push('"');
        self.out.push_str(&s.value);
        self.out.push('"');
    }

    fn print_selector_list(&mut self, list: &SelectorList) {
        for (i, selector) in list.selectors.iter().enumerate() {
            self.print_selector(selector);
            if i + 1 < list.selectors.len() {
                self.out.push(',');
            }
        }
    }

    fn print_selector(&mut self, selector: &Selector) {
        let parts = &selector.parts;
        for (i, part) in parts.iter().enumerate() {
            if matches!(part, SelectorPart::Whitespace(_)) {
                // Leading and trailing whitespace carries nothing, and a
                // space next to an explicit combinator is redundant.
                if i == 0 || i + 1 >= parts.len() {
                    continue;
                }
                let beside_combinator = matches!(parts[i - 1], SelectorPart::Combinator(_))
                    || matches!(parts[i + 1], SelectorPart::Combinator(_));
                if beside_combinator {
                    continue;
                }
            }
            self.print_selector_part(part);
        }
    }

    fn print_selector_part(&mut self, part: &SelectorPart) {
        match part {
            SelectorPart::Type(sel) => self.out.push_str(&sel.name),
            SelectorPart::Class(sel) => {
                self.out.push('.');
                self.out.push_str(&sel.name);
            }
            SelectorPart::Id(sel) => {
                self.out.push('#');
                self.out.push_str(&sel.name);
            }
            SelectorPart::Combinator(sel) => self.out.push_str(&sel.operator),
            SelectorPart::PseudoClass(sel) => self.print_pseudo_class(sel),
            SelectorPart::PseudoElement(sel) => {
                self.out.push(':');
                self.print_pseudo_class(&sel.inner);
            }
            SelectorPart::Attribute(sel) => {
                self.out.push('[');
                self.out.push_str(&sel.property);
                if let Some(value) = &sel.value {
                    self.out.push_str(&sel.pre_operator);
                    self.out.push('=');
                    self.print_value(value);
                }
                self.out.push(']');
            }
            SelectorPart::Whitespace(_) => self.out.push(' '),
        }
    }

    fn print_pseudo_class(&mut self, pseudo: &PseudoClassSelector) {
        self.out.push(':');
        self.out.push_str(&pseudo.name);
        if let Some(arguments) = &pseudo.arguments {
            self.out.push('(');
            match arguments {
                PseudoClassArguments::SelectorList(list) => self.print_selector_list(list),
                PseudoClassArguments::Identifier(ident) => self.out.push_str(&ident.value),
                PseudoClassArguments::ANPlusB(anb) => self.print_an_plus_b(anb),
            }
            self.out.push(')');
        }
    }

    /// Emit the shortest form of an `an+b` expression: `A` is omitted
    /// when zero, `n` is omitted when only the offset remains, and a
    /// zero offset is elided entirely.
    fn print_an_plus_b(&mut self, anb: &ANPlusB) {
        let a: i64 = anb.a.parse().unwrap_or(0);
        let b: i64 = if anb.b.is_empty() {
            0
        } else {
            anb.b.parse().unwrap_or(0)
        };

        if a == 0 {
            if anb.operator == "-" {
                self.out.push('-');
            }
            self.out.push_str(&b.to_string());
            return;
        }

        match a {
            1 => self.out.push('n'),
            -1 => self.out.push_str("-n"),
            other => {
                self.out.push_str(&other.to_string());
                self.out.push('n');
            }
        }

        if b != 0 {
            self.out.push(if anb.operator == "-" { '-' } else { '+' });
            self.out.push_str(&b.to_string());
        }
    }

    fn print_keyframe_selector_list(&mut self, list: &KeyframeSelectorList) {
        for (i, selector) in list.selectors.iter().enumerate() {
            match selector {
                KeyframeSelector::Percentage(dimension) => {
                    self.out.push_str(&dimension.value);
                    self.out.push_str(&dimension.unit);
                }
                KeyframeSelector::Keyword(ident) => self.out.push_str(&ident.value),
            }
            if i + 1 < list.selectors.len() {
                self.out.push(',');
            }
        }
    }

    fn print_media_query_list(&mut self, list: &MediaQueryList) {
        for (i, query) in list.queries.iter().enumerate() {
            self.print_media_query(query);
            if i + 1 < list.queries.len() {
                self.out.push(',');
            }
        }
    }

    fn print_media_query(&mut self, query: &MediaQuery) {
        for (i, part) in query.parts.iter().enumerate() {
            match part {
                MediaQueryPart::Identifier(ident) => self.out.push_str(&ident.value),
                MediaQueryPart::Plain(feature) => {
                    self.out.push('(');
                    self.out.push_str(&feature.property.value);
                    if let Some(value) = &feature.value {
                        self.out.push(':');
                        self.print_value(value);
                    }
                    self.out.push(')');
                }
                MediaQueryPart::Range(feature) => {
                    self.out.push('(');
                    if let Some(left) = &feature.left_value {
                        self.print_value(left);
                        self.out.push_str(feature.operator.as_str());
                    }
                    self.out.push_str(&feature.property.value);
                    if let Some(right) = &feature.right_value {
                        self.out.push_str(feature.operator.as_str());
                        self.print_value(right);
                    }
                    self.out.push(')');
                }
            }
            if i + 1 < query.parts.len() {
                self.out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn reprint(css: &str) -> String {
        let source = Source::new("test.css", css);
        let stylesheet = parse(&source).expect("parse");
        print(&stylesheet)
    }

    #[test]
    fn minifies_simple_rule() {
        assert_eq!(reprint(".class { width: 2rem }"), ".class{width:2rem}");
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(reprint("/* note */ a { color: red }"), "a{color:red}");
    }

    #[test]
    fn selector_whitespace_and_combinators() {
        assert_eq!(
            reprint("section   a > b + .c { color: red }"),
            "section a>b+.c{color:red}"
        );
        assert_eq!(reprint("a:not( .x ) { color: red }"), "a:not(.x){color:red}");
    }

    #[test]
    fn pseudo_elements_and_classes() {
        assert_eq!(
            reprint("a::before, a:hover { color: red }"),
            "a::before,a:hover{color:red}"
        );
        assert_eq!(
            reprint("a:not(.x, .y) { color: red }"),
            "a:not(.x,.y){color:red}"
        );
    }

    #[test]
    fn an_plus_b_shortest_forms() {
        assert_eq!(reprint(":nth-child(0n+5) {}"), ":nth-child(5){}");
        assert_eq!(reprint(":nth-child(1n+0) {}"), ":nth-child(n){}");
        assert_eq!(reprint(":nth-child(-1n+6) {}"), ":nth-child(-n+6){}");
        assert_eq!(reprint(":nth-child(2n+1) {}"), ":nth-child(2n+1){}");
        assert_eq!(reprint(":nth-child(2n-3) {}"), ":nth-child(2n-3){}");
        assert_eq!(reprint(":nth-child(even) {}"), ":nth-child(even){}");
        assert_eq!(reprint(":nth-child(-n) {}"), ":nth-child(-n){}");
        assert_eq!(reprint(":nth-child(5) {}"), ":nth-child(5){}");
    }

    #[test]
    fn declaration_value_spacing() {
        assert_eq!(
            reprint(".a { margin: 0 auto ; font-family: a , b }"),
            ".a{margin:0 auto;font-family:a,b}"
        );
    }

    #[test]
    fn important_and_multiple_declarations() {
        assert_eq!(
            reprint(".a { color: red !important; width: 1px }"),
            ".a{color:red!important;width:1px}"
        );
    }

    #[test]
    fn media_queries() {
        assert_eq!(
            reprint("@media screen and (min-width: 100px) { .a { color: red } }"),
            "@media screen and (min-width:100px){.a{color:red}}"
        );
        assert_eq!(
            reprint("@media (200px < width < 600px) {}"),
            "@media (200px<width<600px){}"
        );
    }

    #[test]
    fn keyframes() {
        assert_eq!(
            reprint("@keyframes spin { from { opacity: 0 } 50%, 100% { opacity: 1 } }"),
            "@keyframes spin{from{opacity:0}50%,100%{opacity:1}}"
        );
    }

    #[test]
    fn imports_and_font_face() {
        assert_eq!(reprint("@import \"a.css\";"), "@import \"a.css\";");
        assert_eq!(
            reprint("@import url(\"a.css\") screen;"),
            "@import \"a.css\" screen;"
        );
        assert_eq!(
            reprint("@font-face { font-family: x }"),
            "@font-face{font-family:x}"
        );
    }

    #[test]
    fn functions_and_math() {
        assert_eq!(
            reprint(".a { width: calc(1px + 4px / 2) }"),
            ".a{width:calc(1px + 4px/2)}"
        );
        assert_eq!(
            reprint(".a { color: rgba(0, 0, 0, .5) }"),
            ".a{color:rgba(0,0,0,.5)}"
        );
        assert_eq!(
            reprint(".a { background: url(img.png) }"),
            ".a{background:url(\"img.png\")}"
        );
    }

    #[test]
    fn hex_colors_and_strings() {
        assert_eq!(
            reprint(".a { color: #aabbcc; content: \"x\" }"),
            ".a{color:#aabbcc;content:\"x\"}"
        );
    }

    #[test]
    fn attribute_selectors() {
        assert_eq!(reprint("[href] { color: red }"), "[href]{color:red}");
        assert_eq!(
            reprint("[href^=\"https:\"] { color: red }"),
            "[href^=\"https:\"]{color:red}"
        );
    }

    #[test]
    fn printing_is_deterministic() {
        let source = Source::new("test.css", ".a { width: 1px }\n.b { height: 2px }\n");
        let stylesheet = parse(&source).expect("parse");
        let first = print_with_source_map(&stylesheet, &source);
        let second = print_with_source_map(&stylesheet, &source);
        assert_eq!(first, second);
    }

    #[test]
    fn source_map_trailer_shape() {
        let source = Source::new("test.css", ".a { width: 1px }");
        let stylesheet = parse(&source).expect("parse");
        let out = print_with_source_map(&stylesheet, &source);
        assert!(out.starts_with(".a{width:1px}"));
        assert!(out.contains("\n/*# sourceMappingURL=data:application/json;base64,"));
        assert!(out.ends_with(" */\n"));
    }

    #[test]
    fn minification_is_idempotent() {
        for css in [
            ".class { width: 2rem }",
            "@media screen and (min-width: 100px) { .a { color: red } }",
            "a:nth-child(2n+1)::before { content: \"*\" }",
        ] {
            let once = reprint(css);
            assert_eq!(reprint(&once), once);
        }
    }
}
