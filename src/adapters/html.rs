//! Path-expression selectors evaluated over the parsed page tree.
//!
//! Site lists describe menu items with a small XPath subset such as
//! `//div[@class='menu']/ul/li[2]`, `//h3[.='Monday']/../ul/li` or
//! `//a/@href`. `scraper` parses the page, the result is copied into a
//! [`PageTree`] and each expression is walked step by step over it.
//!
//! Steps are a tag name or `*` (child axis), `.` or `..`, joined by `/` or
//! `//`. Predicates run in order, each on the nodes the previous one kept,
//! so `li[@class='dish'][2]` is the second dish. Supported predicates:
//! `[n]`, `[last()]`, `[op]`, `[op='v']`, `[contains(op,'v')]` and
//! `[starts-with(op,'v')]`, where `op` is `@attr`, `.`, `text()` or a child
//! element name. A final `text()` yields the direct text nodes, a final
//! `@attr` the attribute values.

use crate::domain::ports::SelectorEngine;
use crate::utils::error::{MenuError, Result};
use regex::{Captures, Regex};
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildNode {
    Element(usize),
    Text(usize),
}

#[derive(Debug)]
struct ElementNode {
    name: String,
    attrs: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<ChildNode>,
    // 前序排列下子樹為 [index, subtree_end)
    subtree_end: usize,
}

#[derive(Debug)]
struct TextNode {
    parent: usize,
    content: String,
}

/// Owned copy of a parsed page. Elements and text nodes are stored in
/// document order; element 0 is the root element.
#[derive(Debug, Default)]
pub struct PageTree {
    elements: Vec<ElementNode>,
    texts: Vec<TextNode>,
}

enum Pending<'a> {
    Element(ElementRef<'a>, Option<usize>),
    Text(&'a str, usize),
}

impl PageTree {
    pub fn parse(html: &str) -> Self {
        Self::from_html(&Html::parse_document(html))
    }

    pub fn from_html(html: &Html) -> Self {
        let mut tree = Self::default();
        let mut pending = vec![Pending::Element(html.root_element(), None)];

        while let Some(next) = pending.pop() {
            match next {
                Pending::Text(content, parent) => {
                    let index = tree.texts.len();
                    tree.texts.push(TextNode {
                        parent,
                        content: content.to_string(),
                    });
                    tree.elements[parent].children.push(ChildNode::Text(index));
                }
                Pending::Element(element, parent) => {
                    let index = tree.elements.len();
                    let value = element.value();
                    tree.elements.push(ElementNode {
                        name: value.name().to_string(),
                        attrs: value
                            .attrs()
                            .map(|(name, value)| (name.to_string(), value.to_string()))
                            .collect(),
                        parent,
                        children: Vec::new(),
                        subtree_end: index + 1,
                    });
                    if let Some(parent) = parent {
                        tree.elements[parent].children.push(ChildNode::Element(index));
                    }

                    let children: Vec<Pending<'_>> = element
                        .children()
                        .filter_map(|child| match ElementRef::wrap(child) {
                            Some(child_element) => Some(Pending::Element(child_element, Some(index))),
                            None => child.value().as_text().map(|text| Pending::Text(&**text, index)),
                        })
                        .collect();
                    pending.extend(children.into_iter().rev());
                }
            }
        }

        for index in (0..tree.elements.len()).rev() {
            let last_child = tree.elements[index]
                .children
                .iter()
                .rev()
                .find_map(|child| match child {
                    ChildNode::Element(child) => Some(*child),
                    ChildNode::Text(_) => None,
                });
            if let Some(child) = last_child {
                tree.elements[index].subtree_end = tree.elements[child].subtree_end;
            }
        }

        tree
    }

    fn string_value(&self, node: Context) -> String {
        let index = match node {
            Context::Document => 0,
            Context::Element(index) => index,
        };
        let mut output = String::new();
        let mut stack: Vec<ChildNode> = self.elements[index].children.iter().rev().copied().collect();
        while let Some(child) = stack.pop() {
            match child {
                ChildNode::Text(text) => output.push_str(&self.texts[text].content),
                ChildNode::Element(element) => {
                    stack.extend(self.elements[element].children.iter().rev().copied())
                }
            }
        }
        output
    }

    fn attribute(&self, index: usize, name: &str) -> Option<&str> {
        self.elements[index]
            .attrs
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn child_elements(&self, node: Context) -> Vec<usize> {
        match node {
            Context::Document => vec![0],
            Context::Element(index) => self.elements[index]
                .children
                .iter()
                .filter_map(|child| match child {
                    ChildNode::Element(child) => Some(*child),
                    ChildNode::Text(_) => None,
                })
                .collect(),
        }
    }

    fn direct_texts(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.elements[index].children.iter().filter_map(|child| match child {
            ChildNode::Text(text) => Some(self.texts[*text].content.as_str()),
            ChildNode::Element(_) => None,
        })
    }

    fn parent_of(&self, node: Context) -> Option<Context> {
        match node {
            Context::Document => None,
            Context::Element(index) => Some(
                self.elements[index]
                    .parent
                    .map_or(Context::Document, Context::Element),
            ),
        }
    }

    fn descendants_or_self(&self, context: &BTreeSet<Context>) -> BTreeSet<Context> {
        let mut output = BTreeSet::new();
        let mut covered = 0;
        for node in context {
            match *node {
                Context::Document => {
                    output.insert(Context::Document);
                    output.extend((0..self.elements.len()).map(Context::Element));
                    return output;
                }
                Context::Element(index) if index < covered => {}
                Context::Element(index) => {
                    let end = self.elements[index].subtree_end;
                    output.extend((index..end).map(Context::Element));
                    covered = end;
                }
            }
        }
        output
    }

    fn apply_step(&self, kind: &StepKind, context: &BTreeSet<Context>) -> BTreeSet<Context> {
        let mut output = BTreeSet::new();
        for node in context {
            match kind {
                StepKind::SelfNode => {
                    output.insert(*node);
                }
                StepKind::Parent => output.extend(self.parent_of(*node)),
                StepKind::Child(test, predicates) => {
                    let mut candidates: Vec<usize> = self
                        .child_elements(*node)
                        .into_iter()
                        .filter(|index| test.matches(&self.elements[*index].name))
                        .collect();
                    for predicate in predicates {
                        let size = candidates.len();
                        candidates = candidates
                            .into_iter()
                            .enumerate()
                            .filter(|(position, index)| {
                                self.test_predicate(*index, predicate, position + 1, size)
                            })
                            .map(|(_, index)| index)
                            .collect();
                    }
                    output.extend(candidates.into_iter().map(Context::Element));
                }
            }
        }
        output
    }

    fn test_predicate(&self, index: usize, predicate: &Predicate, position: usize, size: usize) -> bool {
        match predicate {
            Predicate::Position(n) => position == *n,
            Predicate::Last => position == size,
            Predicate::Exists(operand) => !self.operand_values(index, operand).is_empty(),
            Predicate::Equals(operand, value) => self
                .operand_values(index, operand)
                .iter()
                .any(|candidate| candidate == value),
            Predicate::Contains(operand, value) => {
                self.first_value(index, operand).contains(value.as_str())
            }
            Predicate::StartsWith(operand, value) => {
                self.first_value(index, operand).starts_with(value.as_str())
            }
        }
    }

    fn operand_values(&self, index: usize, operand: &Operand) -> Vec<String> {
        match operand {
            Operand::Attribute(name) => self.attribute(index, name).map(str::to_string).into_iter().collect(),
            Operand::Context => vec![self.string_value(Context::Element(index))],
            Operand::Text => self.direct_texts(index).map(str::to_string).collect(),
            Operand::Child(name) => self
                .child_elements(Context::Element(index))
                .into_iter()
                .filter(|child| self.elements[*child].name.eq_ignore_ascii_case(name))
                .map(|child| self.string_value(Context::Element(child)))
                .collect(),
        }
    }

    // contains()/starts-with() 只看第一個節點
    fn first_value(&self, index: usize, operand: &Operand) -> String {
        self.operand_values(index, operand)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

/// A node reached while walking a path. The derived order is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Context {
    Document,
    Element(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Child,
    Descendant,
    Relative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Named(String),
}

impl NameTest {
    fn matches(&self, name: &str) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Named(expected) => expected.eq_ignore_ascii_case(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Attribute(String),
    Context,
    Text,
    Child(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    Last,
    Exists(Operand),
    Equals(Operand, String),
    Contains(Operand, String),
    StartsWith(Operand, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StepKind {
    SelfNode,
    Parent,
    Child(NameTest, Vec<Predicate>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    descend: bool,
    kind: StepKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Nodes,
    Text,
    Attribute(String),
}

/// A validated path expression, ready to run against any [`PageTree`].
#[derive(Debug, Clone)]
pub struct CompiledPath {
    steps: Vec<Step>,
    output: Output,
    output_descend: bool,
}

impl CompiledPath {
    pub fn select(&self, tree: &PageTree) -> Vec<String> {
        if tree.elements.is_empty() {
            return Vec::new();
        }

        let mut context = BTreeSet::from([Context::Document]);
        for step in &self.steps {
            if step.descend {
                context = tree.descendants_or_self(&context);
            }
            context = tree.apply_step(&step.kind, &context);
            if context.is_empty() {
                return Vec::new();
            }
        }
        if self.output_descend {
            context = tree.descendants_or_self(&context);
        }

        match &self.output {
            Output::Nodes => context.iter().map(|node| tree.string_value(*node)).collect(),
            Output::Text => tree
                .texts
                .iter()
                .filter(|text| context.contains(&Context::Element(text.parent)))
                .map(|text| text.content.clone())
                .collect(),
            Output::Attribute(name) => context
                .iter()
                .filter_map(|node| match node {
                    Context::Element(index) => tree.attribute(*index, name),
                    Context::Document => None,
                })
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathSelectorEngine;

impl SelectorEngine for PathSelectorEngine {
    type Document = PageTree;

    fn parse(&self, html: &str) -> PageTree {
        PageTree::parse(html)
    }

    fn query(&self, document: &PageTree, expr: &str) -> Result<Vec<String>> {
        Ok(compile_path(expr)?.select(document))
    }
}

const OPERAND: &str = r#"(@[A-Za-z_][A-Za-z0-9_:-]*|\.|text\(\)|[A-Za-z_][A-Za-z0-9_-]*)"#;
const LITERAL: &str = r#"(?:'([^']*)'|"([^"]*)")"#;

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\*|[A-Za-z][A-Za-z0-9_-]*)$").expect("valid regex"))
}

fn attr_step_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@([A-Za-z_][A-Za-z0-9_:-]*)$").expect("valid regex"))
}

fn position_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*$").expect("valid regex"))
}

fn last_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*last\(\s*\)\s*$").expect("valid regex"))
}

fn function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*(contains|starts-with)\(\s*{}\s*,\s*{}\s*\)\s*$",
            OPERAND, LITERAL
        ))
        .expect("valid regex")
    })
}

fn compare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*{}\s*=\s*{}\s*$", OPERAND, LITERAL)).expect("valid regex")
    })
}

fn exists_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^\s*{}\s*$", OPERAND)).expect("valid regex"))
}

fn selector_error(expr: &str, message: impl Into<String>) -> MenuError {
    MenuError::SelectorError {
        expr: expr.to_string(),
        message: message.into(),
    }
}

pub fn compile_path(expr: &str) -> Result<CompiledPath> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(selector_error(expr, "selector is empty"));
    }

    let mut steps = Vec::new();
    let mut output = Output::Nodes;
    let mut output_descend = false;

    for (separator, step) in split_steps(expr, trimmed)? {
        if step == "text()" || step.starts_with('@') {
            output = if step == "text()" {
                Output::Text
            } else {
                let name = attr_step_re()
                    .captures(&step)
                    .map(|caps| caps[1].to_ascii_lowercase())
                    .ok_or_else(|| selector_error(expr, format!("invalid attribute step '{}'", step)))?;
                Output::Attribute(name)
            };
            output_descend = separator != Separator::Child;
            continue;
        }

        let kind = compile_step(expr, &step)?;
        let descend = match separator {
            Separator::Child => false,
            Separator::Descendant => true,
            // 相對路徑的第一個名稱步驟等同 `//`
            Separator::Relative => matches!(kind, StepKind::Child(..)),
        };
        steps.push(Step { descend, kind });
    }

    Ok(CompiledPath {
        steps,
        output,
        output_descend,
    })
}

/// Splits on `/` and `//` outside brackets and quotes.
fn split_steps(expr: &str, trimmed: &str) -> Result<Vec<(Separator, String)>> {
    let chars: Vec<char> = trimmed.chars().collect();
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let (mut separator, mut i) = if trimmed.starts_with("//") {
        (Separator::Descendant, 2)
    } else if trimmed.starts_with('/') {
        (Separator::Child, 1)
    } else {
        (Separator::Relative, 0)
    };

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            current.push(c);
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| selector_error(expr, "unbalanced ']'"))?;
                current.push(c);
            }
            '|' if depth == 0 => return Err(selector_error(expr, "unions are not supported")),
            '/' if depth == 0 => {
                if current.is_empty() {
                    return Err(selector_error(expr, "empty step"));
                }
                steps.push((separator, std::mem::take(&mut current)));
                if chars.get(i + 1) == Some(&'/') {
                    separator = Separator::Descendant;
                    i += 1;
                } else {
                    separator = Separator::Child;
                }
            }
            _ => current.push(c),
        }
        i += 1;
    }

    if quote.is_some() {
        return Err(selector_error(expr, "unterminated string literal"));
    }
    if depth != 0 {
        return Err(selector_error(expr, "unbalanced '['"));
    }
    if current.is_empty() {
        return Err(selector_error(expr, "path ends with '/'"));
    }
    steps.push((separator, current));

    for (_, step) in &steps[..steps.len() - 1] {
        if step == "text()" || step.starts_with('@') {
            return Err(selector_error(
                expr,
                format!("'{}' is only allowed as the last step", step),
            ));
        }
    }

    Ok(steps)
}

fn compile_step(expr: &str, step: &str) -> Result<StepKind> {
    match step {
        "." => return Ok(StepKind::SelfNode),
        ".." => return Ok(StepKind::Parent),
        _ => {}
    }
    if step.contains("::") {
        return Err(selector_error(expr, format!("axis step '{}' is not supported", step)));
    }

    let (name, mut rest) = match step.find('[') {
        Some(pos) => (&step[..pos], &step[pos..]),
        None => (step, ""),
    };
    if !name_re().is_match(name) {
        return Err(selector_error(expr, format!("invalid name test '{}'", name)));
    }

    let test = if name == "*" {
        NameTest::Any
    } else {
        NameTest::Named(name.to_ascii_lowercase())
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let end = predicate_end(rest)
            .ok_or_else(|| selector_error(expr, format!("malformed predicate in '{}'", step)))?;
        predicates.push(compile_predicate(expr, &rest[1..end])?);
        rest = &rest[end + 1..];
    }

    Ok(StepKind::Child(test, predicates))
}

/// Byte index of the `]` closing the predicate that starts at `rest[0]`.
fn predicate_end(rest: &str) -> Option<usize> {
    if !rest.starts_with('[') {
        return None;
    }
    let mut quote: Option<char> = None;
    for (index, c) in rest.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => return None,
            (None, ']') => return Some(index),
            _ => {}
        }
    }
    None
}

fn compile_predicate(expr: &str, predicate: &str) -> Result<Predicate> {
    if let Some(caps) = position_re().captures(predicate) {
        let position: usize = caps[1]
            .parse()
            .map_err(|_| selector_error(expr, format!("position '{}' out of range", &caps[1])))?;
        if position == 0 {
            return Err(selector_error(expr, "positions start at 1"));
        }
        return Ok(Predicate::Position(position));
    }

    if last_re().is_match(predicate) {
        return Ok(Predicate::Last);
    }

    if let Some(caps) = function_re().captures(predicate) {
        let operand = parse_operand(&caps[2]);
        let value = literal(&caps, 3).to_string();
        return Ok(match &caps[1] {
            "contains" => Predicate::Contains(operand, value),
            _ => Predicate::StartsWith(operand, value),
        });
    }

    if let Some(caps) = compare_re().captures(predicate) {
        return Ok(Predicate::Equals(
            parse_operand(&caps[1]),
            literal(&caps, 2).to_string(),
        ));
    }

    if let Some(caps) = exists_re().captures(predicate) {
        return Ok(Predicate::Exists(parse_operand(&caps[1])));
    }

    Err(selector_error(
        expr,
        format!("unsupported predicate '[{}]'", predicate),
    ))
}

fn parse_operand(raw: &str) -> Operand {
    match raw {
        "." => Operand::Context,
        "text()" => Operand::Text,
        _ => match raw.strip_prefix('@') {
            Some(name) => Operand::Attribute(name.to_ascii_lowercase()),
            None => Operand::Child(raw.to_ascii_lowercase()),
        },
    }
}

/// Single- or double-quoted literal captured at `group` / `group + 1`.
fn literal<'t>(caps: &Captures<'t>, group: usize) -> &'t str {
    caps.get(group)
        .or_else(|| caps.get(group + 1))
        .map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU_HTML: &str = r#"
        <html>
        <body>
            <div id="mon" class="day menu">
                <ul>
                    <li class="dish"> Tomato soup </li>
                    <li class="dish">Schnitzel
                        <span>with fries</span></li>
                    <li class="note">Closed at 2pm</li>
                </ul>
            </div>
            <div id="tue" class="day">
                <ul><li class="dish">Lasagne</li></ul>
                <a href="/tue.pdf">PDF</a>
            </div>
        </body>
        </html>
    "#;

    const WEEK_HTML: &str = r#"<html><body>
        <section><h3>Monday</h3><ul><li class="note">Closed</li><li class="dish">Soup</li><li class="dish">Salad</li></ul></section>
        <section><h3>Tuesday</h3><ul><li class="dish">Stew</li></ul></section>
        <p>Mon <b>special</b> Pasta</p>
    </body></html>"#;

    fn query_in(html: &str, expr: &str) -> Vec<String> {
        let engine = PathSelectorEngine;
        let doc = engine.parse(html);
        engine.query(&doc, expr).unwrap()
    }

    fn query(expr: &str) -> Vec<String> {
        query_in(MENU_HTML, expr)
    }

    #[test]
    fn test_compile_rejects_unsupported_syntax() {
        for expr in [
            "",
            "//li[",
            "//li]",
            "//li[@class='x]",
            "//div/",
            "//div///li",
            "//a | //b",
            "//ancestor::div",
            "//li[0]",
            "//li[position() > 1]",
            "//li[@class!='x']",
            "//li[@class='a' and @id='b']",
            "//..[1]",
            "//@href/li",
            "//text()/b",
            "//@*",
            "//1li",
        ] {
            assert!(compile_path(expr).is_err(), "expected '{}' to be rejected", expr);
        }
    }

    #[test]
    fn test_compile_accepts_supported_syntax() {
        for expr in [
            "//item",
            "/html/body/div",
            "td",
            "//li[last()]",
            "//li/..",
            "./ul/li",
            "//text()",
            "//@href",
            "//h3[.='Monday']/../ul/li",
            r#"//div[contains(@class, "menu")]//li[@class][1]"#,
            "//section[starts-with(h3, 'Mon')]",
            "//tr/*[3]",
        ] {
            assert!(compile_path(expr).is_ok(), "expected '{}' to compile", expr);
        }
    }

    #[test]
    fn test_query_returns_text_content_in_document_order() {
        let items = query("//div[@id='mon']//li[@class='dish']");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].trim(), "Tomato soup");
        assert!(items[1].contains("Schnitzel"));
        assert!(items[1].contains("with fries"));
    }

    #[test]
    fn test_query_positional_predicate() {
        assert_eq!(query("//div[@id='mon']/ul/li[3]"), vec!["Closed at 2pm"]);
        assert_eq!(query("//div[@id='mon']/ul/li[last()]"), vec!["Closed at 2pm"]);
    }

    #[test]
    fn test_position_counts_within_filtered_nodes() {
        assert_eq!(query_in(WEEK_HTML, "//li[@class='dish'][1]"), vec!["Soup", "Stew"]);
        assert_eq!(query_in(WEEK_HTML, "//li[@class='dish'][2]"), vec!["Salad"]);
        assert_eq!(query_in(WEEK_HTML, "//li[2][@class='dish']"), vec!["Soup"]);
        assert_eq!(query_in(WEEK_HTML, "//li[1][@class='dish']"), vec!["Stew"]);
    }

    #[test]
    fn test_position_is_per_parent() {
        let items = query("//div[contains(@class,'day')]/ul/li[1]");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], "Lasagne");
    }

    #[test]
    fn test_parent_and_self_steps() {
        assert_eq!(
            query_in(WEEK_HTML, "//h3[.='Monday']/../ul/li[@class='dish']"),
            vec!["Soup", "Salad"]
        );
        assert_eq!(query_in(WEEK_HTML, "//h3[text()='Tuesday']/./../ul/li"), vec!["Stew"]);
    }

    #[test]
    fn test_value_predicates() {
        assert_eq!(query_in(WEEK_HTML, "//section[h3='Tuesday']/ul/li"), vec!["Stew"]);
        assert_eq!(query_in(WEEK_HTML, "//li[contains(., 'Sal')]"), vec!["Salad"]);
        assert_eq!(
            query_in(WEEK_HTML, "//section[starts-with(h3, 'Mon')]//li[@class='dish']"),
            vec!["Soup", "Salad"]
        );
    }

    #[test]
    fn test_text_step_returns_direct_text_nodes() {
        assert_eq!(query_in(WEEK_HTML, "//p/text()"), vec!["Mon ", " Pasta"]);
        assert_eq!(query_in(WEEK_HTML, "//p//text()"), vec!["Mon ", "special", " Pasta"]);
        assert_eq!(query_in(WEEK_HTML, "//p"), vec!["Mon special Pasta"]);
    }

    #[test]
    fn test_absolute_path_starts_at_root_element() {
        assert_eq!(query_in(WEEK_HTML, "/html/body/p/b"), vec!["special"]);
        assert!(query_in(WEEK_HTML, "/body").is_empty());
    }

    #[test]
    fn test_nested_matches_are_not_duplicated() {
        let html = "<html><body><div><div><ul><li>A</li></ul></div></div></body></html>";
        assert_eq!(query_in(html, "//div//li"), vec!["A"]);
        assert_eq!(query_in(html, "//div"), vec!["A", "A"]);
    }

    #[test]
    fn test_query_attribute_values() {
        assert_eq!(query("//div[@id='tue']/a/@href"), vec!["/tue.pdf"]);
        assert_eq!(query("//@href"), vec!["/tue.pdf"]);
        assert_eq!(query("//div[@id]/@ID"), vec!["mon", "tue"]);
    }

    #[test]
    fn test_query_no_match_is_empty() {
        assert!(query("//table//td").is_empty());
        assert!(query("//li[@class='dish'][9]").is_empty());
    }

    #[test]
    fn test_query_unknown_elements() {
        let engine = PathSelectorEngine;
        let doc = engine.parse("<html><body><item> Soup </item><item>Salad </item></body></html>");
        assert_eq!(engine.query(&doc, "//item").unwrap(), vec![" Soup ", "Salad "]);
    }
}
