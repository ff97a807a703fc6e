//! AST transforms.
//!
//! [`transform`] takes a single top-down pass over a stylesheet and
//! rewrites it under the feature flags in [`TransformOptions`]. The
//! pass collects custom-property and custom-media definitions while it
//! walks, which is sound because both must be defined at the top level
//! before their first use; definitions are harvested strictly before
//! substitution into later siblings.
//!
//! Most problems found here are non-fatal: they are handed to the
//! [`Reporter`] and the offending construct is left as written.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::*;
use crate::error::{Diagnostic, Error};
use crate::reporter::Reporter;
use crate::source::{Source, Span};

/// Behavior for `@import` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportRules {
    /// Pass `@import` rules through unchanged.
    #[default]
    Passthrough,
    /// Replace each `@import` with the nodes of the imported
    /// stylesheet. Requires import replacements from the compiler.
    Inline,
    /// Keep `@import` rules as written but emit every imported file as
    /// its own output.
    Follow,
}

/// Behavior for Media Queries Level 4 range syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFeatureRanges {
    /// Pass range features through unchanged.
    #[default]
    Passthrough,
    /// Rewrite ranges into `min-`/`max-` plain features, nudging the
    /// boundary by 0.001 for the strict `<` and `>` operators.
    Transform,
}

/// Behavior for the `:any-link` pseudo-class from Selectors Level 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnyLink {
    /// Pass `:any-link` through unchanged.
    #[default]
    Passthrough,
    /// Expand each selector containing `:any-link` into a `:visited`
    /// and a `:link` variant.
    Transform,
}

/// Behavior for custom properties and `var()` from CSS Variables
/// Level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomProperties {
    /// Pass custom property declarations and `var()` through unchanged.
    #[default]
    Passthrough,
    /// Collect `--name` declarations from top-level `:root` rules and
    /// substitute their values at `var()` usage sites. Definitions
    /// under other selectors pass through.
    TransformRoot,
}

/// Behavior for `@custom-media` from Media Queries Level 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomMediaQueries {
    /// Pass definitions and usages through unchanged.
    #[default]
    Passthrough,
    /// Collect `@custom-media` definitions, drop them from the output,
    /// and splice the stored query into `(--name)` usages.
    Transform,
}

/// Behavior for `calc()` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalcReduction {
    /// Pass `calc()` through unchanged.
    #[default]
    Passthrough,
    /// Constant-fold math expressions whose operands have compatible
    /// units.
    Reduce,
}

/// The set of transforms to run. By default, none are run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub import_rules: ImportRules,
    pub media_feature_ranges: MediaFeatureRanges,
    pub any_link: AnyLink,
    pub custom_properties: CustomProperties,
    pub custom_media_queries: CustomMediaQueries,
    pub calc_reduction: CalcReduction,
}

/// Rewrite `stylesheet` under `options`, reporting problems to
/// `reporter`. `import_replacements` maps `@import` rules (by identity)
/// to the stylesheets to splice in when inlining.
pub fn transform(
    stylesheet: Stylesheet,
    options: &TransformOptions,
    source: &Source,
    reporter: &dyn Reporter,
    import_replacements: &HashMap<AtRuleId, Arc<Stylesheet>>,
) -> Stylesheet {
    let mut transformer = Transformer {
        options,
        source,
        reporter,
        import_replacements,
        variables: (options.custom_properties != CustomProperties::Passthrough)
            .then(HashMap::new),
        custom_media: (options.custom_media_queries != CustomMediaQueries::Passthrough)
            .then(HashMap::new),
    };

    let nodes = transformer.transform_nodes(stylesheet.nodes);
    Stylesheet {
        nodes,
        imports: stylesheet.imports,
    }
}

struct Transformer<'a> {
    options: &'a TransformOptions,
    source: &'a Source,
    reporter: &'a dyn Reporter,
    import_replacements: &'a HashMap<AtRuleId, Arc<Stylesheet>>,

    /// Harvested `--name` values, present when the custom-property
    /// transform is on.
    variables: Option<HashMap<String, Vec<Value>>>,
    /// Harvested `@custom-media` queries, present when that transform
    /// is on.
    custom_media: Option<HashMap<String, MediaQuery>>,
}

impl Transformer<'_> {
    fn error(&self, span: Span, message: impl Into<String>) {
        self.reporter
            .add_error(Error::Transform(Diagnostic::error(self.source, span, message)));
    }

    fn warn(&self, span: Span, message: impl Into<String>) {
        self.reporter.add_error(Error::Transform(Diagnostic::warning(
            self.source,
            span,
            message,
        )));
    }

    fn transform_nodes(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());

        for node in nodes {
            match node {
                Node::QualifiedRule(rule) => {
                    let Some(rule) = self.harvest_root_variables(rule) else {
                        continue;
                    };

                    let QualifiedRule {
                        span,
                        prelude,
                        block,
                    } = rule;
                    let prelude = match prelude {
                        Prelude::SelectorList(list) => {
                            Prelude::SelectorList(self.transform_selector_list(list))
                        }
                        other => other,
                    };
                    let block = self.transform_block(block);
                    out.push(Node::QualifiedRule(QualifiedRule {
                        span,
                        prelude,
                        block,
                    }));
                }

                Node::AtRule(rule) => match rule.name.to_ascii_lowercase().as_str() {
                    "import" => {
                        let replacement = (self.options.import_rules == ImportRules::Inline)
                            .then(|| self.import_replacements.get(&rule.id))
                            .flatten();
                        match replacement {
                            Some(imported) => {
                                if rule.preludes.len() > 1 {
                                    self.warn(
                                        rule.span,
                                        "@import inlining does not apply the import's media queries",
                                    );
                                }
                                out.extend(imported.nodes.iter().cloned());
                            }
                            None => out.push(Node::AtRule(rule)),
                        }
                    }

                    "custom-media" => {
                        if !self.harvest_custom_media(&rule) {
                            out.push(Node::AtRule(rule));
                        }
                    }

                    "media" => {
                        let AtRule {
                            span,
                            id,
                            name,
                            preludes,
                            block,
                        } = rule;
                        let preludes = preludes
                            .into_iter()
                            .map(|prelude| match prelude {
                                AtPrelude::MediaQueryList(list) => {
                                    AtPrelude::MediaQueryList(self.transform_media_query_list(list))
                                }
                                other => other,
                            })
                            .collect();
                        let block = block.map(|block| self.transform_block(block));
                        out.push(Node::AtRule(AtRule {
                            span,
                            id,
                            name,
                            preludes,
                            block,
                        }));
                    }

                    _ => {
                        let AtRule {
                            span,
                            id,
                            name,
                            preludes,
                            block,
                        } = rule;
                        let block = block.map(|block| self.transform_block(block));
                        out.push(Node::AtRule(AtRule {
                            span,
                            id,
                            name,
                            preludes,
                            block,
                        }));
                    }
                },

                Node::Comment(comment) => out.push(Node::Comment(comment)),
            }
        }

        out
    }

    /// Move `--name` declarations out of a top-level `:root` rule into
    /// the variables table. Returns `None` when the rule had
    /// declarations and harvesting removed them all, in which case it
    /// is dropped from the output.
    fn harvest_root_variables(&mut self, rule: QualifiedRule) -> Option<QualifiedRule> {
        if self.variables.is_none() || !is_root_rule(&rule) {
            return Some(rule);
        }

        let QualifiedRule {
            span,
            prelude,
            block,
        } = rule;
        let Block::Declarations(mut decl_block) = block else {
            return Some(QualifiedRule {
                span,
                prelude,
                block,
            });
        };

        let had_declarations = !decl_block.declarations.is_empty();
        let mut kept = Vec::with_capacity(decl_block.declarations.len());
        for entry in decl_block.declarations {
            match entry {
                BlockEntry::Declaration(decl) if decl.property.starts_with("--") => {
                    self.variables
                        .as_mut()
                        .expect("variables enabled")
                        .insert(decl.property.clone(), decl.values);
                }
                other => kept.push(other),
            }
        }

        if had_declarations && kept.is_empty() {
            return None;
        }

        decl_block.declarations = kept;
        Some(QualifiedRule {
            span,
            prelude,
            block: Block::Declarations(decl_block),
        })
    }

    /// Store a `@custom-media` definition. Returns false when the
    /// transform is off and the rule should be kept in the output.
    fn harvest_custom_media(&mut self, rule: &AtRule) -> bool {
        let Some(custom_media) = &mut self.custom_media else {
            return false;
        };

        let (Some(AtPrelude::Identifier(name)), Some(AtPrelude::MediaQuery(query))) =
            (rule.preludes.first(), rule.preludes.get(1))
        else {
            return false;
        };

        custom_media.insert(name.value.clone(), query.clone());
        true
    }

    fn transform_selector_list(&mut self, list: SelectorList) -> SelectorList {
        SelectorList {
            span: list.span,
            selectors: self.transform_selectors(list.selectors),
        }
    }

    /// Expand `:any-link` per occurrence: the `:visited` duplicate is
    /// emitted first, then the original selector continues with
    /// `:link` in place.
    fn transform_selectors(&mut self, selectors: Vec<Selector>) -> Vec<Selector> {
        let mut out = Vec::with_capacity(selectors.len());

        for selector in selectors {
            if self.options.any_link == AnyLink::Passthrough {
                out.push(selector);
                continue;
            }

            let mut parts = Vec::with_capacity(selector.parts.len());
            for (index, part) in selector.parts.iter().enumerate() {
                match part {
                    SelectorPart::PseudoClass(pseudo) if pseudo.name == "any-link" => {
                        let mut duplicate = parts.clone();
                        duplicate.push(SelectorPart::PseudoClass(PseudoClassSelector {
                            span: pseudo.span,
                            name: "visited".to_string(),
                            arguments: None,
                        }));
                        duplicate.extend(selector.parts[index + 1..].iter().cloned());
                        out.push(Selector {
                            span: selector.span,
                            parts: duplicate,
                        });

                        parts.push(SelectorPart::PseudoClass(PseudoClassSelector {
                            span: pseudo.span,
                            name: "link".to_string(),
                            arguments: None,
                        }));
                    }
                    other => parts.push(other.clone()),
                }
            }

            out.push(Selector {
                span: selector.span,
                parts,
            });
        }

        out
    }

    fn transform_block(&mut self, block: Block) -> Block {
        match block {
            Block::Declarations(mut block) => {
                block.declarations = self.transform_declarations(block.declarations);
                Block::Declarations(block)
            }
            Block::Rules(mut block) => {
                block.rules = block
                    .rules
                    .into_iter()
                    .map(|rule| self.transform_nested_rule(rule))
                    .collect();
                Block::Rules(block)
            }
        }
    }

    fn transform_nested_rule(&mut self, mut rule: QualifiedRule) -> QualifiedRule {
        if let Prelude::SelectorList(list) = rule.prelude {
            rule.prelude = Prelude::SelectorList(self.transform_selector_list(list));
        }
        rule.block = self.transform_block(rule.block);
        rule
    }

    fn transform_declarations(&mut self, declarations: Vec<BlockEntry>) -> Vec<BlockEntry> {
        declarations
            .into_iter()
            .map(|entry| match entry {
                BlockEntry::Declaration(mut decl) => {
                    decl.values = self.transform_values(decl.values);
                    BlockEntry::Declaration(decl)
                }
                other => other,
            })
            .collect()
    }

    fn transform_values(&mut self, values: Vec<Value>) -> Vec<Value> {
        let mut out = Vec::with_capacity(values.len());

        for value in values {
            match value {
                Value::Function(function)
                    if function.name.eq_ignore_ascii_case("var") && self.variables.is_some() =>
                {
                    out.extend(self.substitute_var(function));
                }

                Value::Function(function)
                    if function.name.eq_ignore_ascii_case("calc")
                        && self.options.calc_reduction == CalcReduction::Reduce =>
                {
                    out.push(self.reduce_calc(function));
                }

                other => out.push(other),
            }
        }

        out
    }

    /// Replace a `var()` usage with the variable's values, or with its
    /// fallback when the variable is undefined.
    fn substitute_var(&mut self, function: Function) -> Vec<Value> {
        if function.arguments.is_empty() {
            self.error(function.span, "expected at least one argument to var()");
            return vec![Value::Function(function)];
        }

        let Value::Identifier(name) = &function.arguments[0] else {
            self.error(function.span, "expected identifier as argument to var()");
            return vec![Value::Function(function)];
        };

        if let Some(values) = self
            .variables
            .as_ref()
            .expect("variables enabled")
            .get(&name.value)
        {
            return values.clone();
        }

        // The fallback starts after the first comma argument.
        if function.arguments.len() > 2 {
            return function.arguments[2..].to_vec();
        }

        self.warn(
            function.span,
            format!("use of undefined variable without fallback: {}", name.value),
        );
        vec![Value::Function(function)]
    }

    /// Constant-fold a `calc()` call. On success the whole call is
    /// replaced by the folded value; otherwise the call is kept, with
    /// its argument transformed so nested `var()` still substitutes.
    fn reduce_calc(&mut self, mut function: Function) -> Value {
        if function.arguments.len() != 1 {
            self.warn(function.span, "expected a single argument to calc()");
            return Value::Function(function);
        }

        let argument = function.arguments.pop().expect("one argument");
        let transformed = self.transform_values(vec![argument]);

        if transformed.len() == 1 {
            if let Value::Math(expr) = &transformed[0] {
                // Substitute var() on each side before folding.
                let lefts = self.transform_values(vec![(*expr.left).clone()]);
                let rights = self.transform_values(vec![(*expr.right).clone()]);
                if lefts.len() == 1 && rights.len() == 1 {
                    if let Some(folded) =
                        self.evaluate_math(&lefts[0], &rights[0], expr.operator, expr.span)
                    {
                        return folded;
                    }
                } else {
                    self.warn(
                        expr.span,
                        "expected a single value on each side of a math expression",
                    );
                }
            }
        }

        function.arguments = transformed;
        Value::Function(function)
    }

    /// Evaluate one math expression, folding operand sub-expressions
    /// first. Returns `None` when the expression cannot be reduced;
    /// type violations are also reported as errors.
    ///
    /// The operand rules follow
    /// <https://www.w3.org/TR/css-values-3/#calc-type-checking>.
    fn evaluate_math(
        &mut self,
        left: &Value,
        right: &Value,
        operator: MathOperator,
        span: Span,
    ) -> Option<Value> {
        let left = self.fold_operand(left);
        let right = self.fold_operand(right);

        match operator {
            MathOperator::Add | MathOperator::Sub => {
                let Value::Dimension(l) = &left else {
                    self.error(
                        left.span(),
                        format!("cannot perform {operator} on this value"),
                    );
                    return None;
                };
                let Value::Dimension(r) = &right else {
                    return None;
                };

                if l.unit != r.unit {
                    // Mixing a number with a length or percentage is a
                    // type error; differing real units are valid CSS
                    // that simply cannot be folded statically.
                    if l.is_number() != r.is_number() {
                        let unit = if l.is_number() { &r.unit } else { &l.unit };
                        self.error(
                            span,
                            format!(
                                "cannot mix a number and a {} value in calc()",
                                describe_unit(unit)
                            ),
                        );
                    }
                    return None;
                }

                let folded = self.do_math(&l.value, &r.value, operator, span)?;
                Some(Value::Dimension(Dimension {
                    span,
                    value: format_float(folded),
                    unit: l.unit.clone(),
                }))
            }

            MathOperator::Mul => {
                let (Value::Dimension(l), Value::Dimension(r)) = (&left, &right) else {
                    return None;
                };

                if !l.is_number() && !r.is_number() {
                    self.error(span, "one side of multiplication must be a number");
                    return None;
                }

                let (with_unit, number) = if l.is_number() { (r, l) } else { (l, r) };
                let folded = self.do_math(&with_unit.value, &number.value, operator, span)?;
                Some(Value::Dimension(Dimension {
                    span,
                    value: format_float(folded),
                    unit: with_unit.unit.clone(),
                }))
            }

            MathOperator::Div => {
                let Value::Dimension(r) = &right else {
                    self.error(span, "right side of division must be a number");
                    return None;
                };
                if !r.is_number() {
                    self.error(span, "right side of division must be a number");
                    return None;
                }

                let Value::Dimension(l) = &left else {
                    self.error(
                        left.span(),
                        format!("cannot perform {operator} on this value"),
                    );
                    return None;
                };

                let folded = self.do_math(&l.value, &r.value, operator, span)?;
                Some(Value::Dimension(Dimension {
                    span,
                    value: format_float(folded),
                    unit: l.unit.clone(),
                }))
            }
        }
    }

    /// Fold an operand that is itself a math expression, post-order.
    fn fold_operand(&mut self, value: &Value) -> Value {
        if let Value::Math(expr) = value {
            if let Some(folded) =
                self.evaluate_math(&expr.left, &expr.right, expr.operator, expr.span)
            {
                return folded;
            }
        }
        value.clone()
    }

    fn do_math(&mut self, left: &str, right: &str, operator: MathOperator, span: Span) -> Option<f64> {
        let left: f64 = match left.parse() {
            Ok(value) => value,
            Err(_) => {
                self.error(span, format!("could not parse numeric value: {left}"));
                return None;
            }
        };
        let right: f64 = match right.parse() {
            Ok(value) => value,
            Err(_) => {
                self.error(span, format!("could not parse numeric value: {right}"));
                return None;
            }
        };

        match operator {
            MathOperator::Add => Some(left + right),
            MathOperator::Sub => Some(left - right),
            MathOperator::Mul => Some(left * right),
            MathOperator::Div => {
                if right == 0.0 {
                    self.error(span, "cannot divide by zero");
                    return None;
                }
                Some(left / right)
            }
        }
    }

    fn transform_media_query_list(&mut self, list: MediaQueryList) -> MediaQueryList {
        MediaQueryList {
            span: list.span,
            queries: list
                .queries
                .into_iter()
                .map(|mut query| {
                    query.parts = self.transform_media_query_parts(query.parts);
                    query
                })
                .collect(),
        }
    }

    fn transform_media_query_parts(&mut self, parts: Vec<MediaQueryPart>) -> Vec<MediaQueryPart> {
        let mut out = Vec::with_capacity(parts.len());

        for part in parts {
            match part {
                // A boolean feature named `--x` is a custom media usage.
                MediaQueryPart::Plain(feature)
                    if feature.value.is_none()
                        && feature.property.value.starts_with("--")
                        && self.custom_media.is_some() =>
                {
                    let replacement = self
                        .custom_media
                        .as_ref()
                        .expect("custom media enabled")
                        .get(&feature.property.value)
                        .map(|query| query.parts.clone());
                    match replacement {
                        // The stored query may itself use range syntax;
                        // spliced parts go through the same rewrite.
                        Some(parts) => out.extend(self.transform_media_query_parts(parts)),
                        None => out.push(MediaQueryPart::Plain(feature)),
                    }
                }

                MediaQueryPart::Range(range)
                    if self.options.media_feature_ranges == MediaFeatureRanges::Transform =>
                {
                    out.extend(self.transform_media_feature_range(range));
                }

                other => out.push(other),
            }
        }

        out
    }

    /// Rewrite a range feature into `min-`/`max-` plain features. A
    /// two-sided range produces both, joined by `and`.
    fn transform_media_feature_range(&mut self, range: MediaFeatureRange) -> Vec<MediaQueryPart> {
        let mut parts = vec![];

        if let Some(left) = &range.left_value {
            // `200px < width` constrains the minimum.
            let direction = match range.operator {
                RangeOperator::Lt | RangeOperator::Le => "min",
                RangeOperator::Gt | RangeOperator::Ge => "max",
            };
            let nudge = match range.operator {
                RangeOperator::Lt => 0.001,
                RangeOperator::Gt => -0.001,
                _ => 0.0,
            };

            parts.push(MediaQueryPart::Plain(MediaFeaturePlain {
                span: range.span,
                property: Identifier {
                    span: range.property.span,
                    value: format!("{direction}-{}", range.property.value),
                },
                value: Some(self.add_to_value(left.clone(), nudge)),
            }));
        }

        if let Some(right) = &range.right_value {
            if range.left_value.is_some() {
                parts.push(MediaQueryPart::Identifier(Identifier {
                    span: range.span,
                    value: "and".to_string(),
                }));
            }

            let direction = match range.operator {
                RangeOperator::Lt | RangeOperator::Le => "max",
                RangeOperator::Gt | RangeOperator::Ge => "min",
            };
            let nudge = match range.operator {
                RangeOperator::Lt => -0.001,
                RangeOperator::Gt => 0.001,
                _ => 0.0,
            };

            parts.push(MediaQueryPart::Plain(MediaFeaturePlain {
                span: range.span,
                property: Identifier {
                    span: range.property.span,
                    value: format!("{direction}-{}", range.property.value),
                },
                value: Some(self.add_to_value(right.clone(), nudge)),
            }));
        }

        if parts.is_empty() {
            return vec![MediaQueryPart::Range(range)];
        }
        parts
    }

    /// Nudge a numeric value by `diff`. Only dimensions can be
    /// adjusted; anything else is reported and returned unchanged.
    fn add_to_value(&mut self, value: Value, diff: f64) -> Value {
        if diff == 0.0 {
            return value;
        }

        match value {
            Value::Dimension(dimension) => {
                let parsed: f64 = match dimension.value.parse() {
                    Ok(parsed) => parsed,
                    Err(_) => {
                        self.error(
                            dimension.span,
                            format!(
                                "could not parse dimension value to adjust media range: {}",
                                dimension.value
                            ),
                        );
                        return Value::Dimension(dimension);
                    }
                };
                Value::Dimension(Dimension {
                    span: dimension.span,
                    value: format_float(parsed + diff),
                    unit: dimension.unit,
                })
            }
            other => {
                self.error(
                    other.span(),
                    "tried to adjust a non-numeric value in a media range; expected a dimension",
                );
                other
            }
        }
    }
}

/// Whether a rule's prelude is exactly one `:root` selector.
fn is_root_rule(rule: &QualifiedRule) -> bool {
    let Prelude::SelectorList(list) = &rule.prelude else {
        return false;
    };
    if list.selectors.len() != 1 {
        return false;
    }

    let substantial: Vec<_> = list.selectors[0]
        .parts
        .iter()
        .filter(|part| !matches!(part, SelectorPart::Whitespace(_)))
        .collect();
    match substantial.as_slice() {
        [SelectorPart::PseudoClass(pseudo)] => {
            pseudo.name == "root" && pseudo.arguments.is_none()
        }
        _ => false,
    }
}

/// Shortest round-trip decimal representation.
fn format_float(value: f64) -> String {
    value.to_string()
}

fn describe_unit(unit: &str) -> &str {
    if unit == "%" {
        "percentage"
    } else {
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::reporter::MemoryReporter;

    fn run(css: &str, options: &TransformOptions) -> (Stylesheet, MemoryReporter) {
        let source = Source::new("test.css", css);
        let stylesheet = parse(&source).expect("parse");
        let reporter = MemoryReporter::new();
        let transformed = transform(
            stylesheet,
            options,
            &source,
            &reporter,
            &HashMap::new(),
        );
        (transformed, reporter)
    }

    #[test]
    fn passthrough_is_identity_on_node_count() {
        let (out, reporter) = run(
            ":root { --x: 1px; } .a { width: var(--x) } @custom-media --sm (max-width: 30em);",
            &TransformOptions::default(),
        );
        assert_eq!(out.nodes.len(), 3);
        assert!(reporter.is_empty());
    }

    #[test]
    fn root_rule_dropped_when_fully_harvested() {
        let options = TransformOptions {
            custom_properties: CustomProperties::TransformRoot,
            ..Default::default()
        };
        let (out, reporter) = run(":root { --x: 1px; } .a { width: var(--x) }", &options);
        assert_eq!(out.nodes.len(), 1);
        assert!(reporter.is_empty());

        // The non-variable declaration keeps the rule alive.
        let (out, _) = run(":root { --x: 1px; color: red; } .a { width: var(--x) }", &options);
        assert_eq!(out.nodes.len(), 2);
    }

    #[test]
    fn undefined_variable_without_fallback_warns() {
        let options = TransformOptions {
            custom_properties: CustomProperties::TransformRoot,
            ..Default::default()
        };
        let (_, reporter) = run(".a { width: var(--missing) }", &options);
        assert_eq!(reporter.warning_count(), 1);
    }

    #[test]
    fn any_link_expansion_order() {
        let options = TransformOptions {
            any_link: AnyLink::Transform,
            ..Default::default()
        };
        let (out, _) = run("a:any-link, section { color: red }", &options);

        let Node::QualifiedRule(rule) = &out.nodes[0] else {
            panic!("expected rule");
        };
        let Prelude::SelectorList(list) = &rule.prelude else {
            panic!("expected selectors");
        };
        assert_eq!(list.selectors.len(), 3);

        let names: Vec<_> = list
            .selectors
            .iter()
            .map(|selector| {
                selector
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        SelectorPart::PseudoClass(pc) => Some(pc.name.as_str()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(names, vec![vec!["visited"], vec!["link"], vec![]]);
    }

    #[test]
    fn calc_mixing_number_and_percentage_errors() {
        let options = TransformOptions {
            calc_reduction: CalcReduction::Reduce,
            ..Default::default()
        };
        let (_, reporter) = run(".a { width: calc(2 + 25%) }", &options);
        assert_eq!(reporter.error_count(), 1);
        let mut message = String::new();
        reporter.for_each(|error| message.push_str(&error.to_string()));
        assert!(message.contains("cannot mix a number and a percentage value"));
    }

    #[test]
    fn calc_division_by_zero_errors() {
        let options = TransformOptions {
            calc_reduction: CalcReduction::Reduce,
            ..Default::default()
        };
        let (_, reporter) = run(".a { width: calc(1px / 0) }", &options);
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn incompatible_units_fold_silently_left_alone() {
        let options = TransformOptions {
            calc_reduction: CalcReduction::Reduce,
            ..Default::default()
        };
        let (out, reporter) = run(".a { width: calc(1px + 2rem) }", &options);
        assert!(reporter.is_empty());

        let Node::QualifiedRule(rule) = &out.nodes[0] else {
            panic!("expected rule");
        };
        let Block::Declarations(block) = &rule.block else {
            panic!("expected declarations");
        };
        let BlockEntry::Declaration(decl) = &block.declarations[0] else {
            panic!("expected declaration");
        };
        assert!(matches!(&decl.values[0], Value::Function(f) if f.name == "calc"));
    }
}
