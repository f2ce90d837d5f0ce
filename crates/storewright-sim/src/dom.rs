//! A tiny static DOM: enough structure for CSS-ish selectors, text content and
//! visibility, rebuilt from application state after every interaction.

use crate::app::{Action, Field};
use storewright_interfaces::{ApiError, Locator, Segment};

/// Element under construction.
#[derive(Debug, Clone)]
pub(crate) struct El {
    tag: &'static str,
    attrs: Vec<(String, String)>,
    text: String,
    hidden: bool,
    action: Option<Action>,
    field: Option<Field>,
    children: Vec<El>,
}

impl El {
    pub(crate) fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            text: String::new(),
            hidden: false,
            action: None,
            field: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub(crate) fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub(crate) fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub(crate) fn test_id(self, value: impl Into<String>) -> Self {
        self.attr("data-test", value)
    }

    pub(crate) fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub(crate) fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub(crate) fn bind(mut self, field: Field, value: &str) -> Self {
        self.field = Some(field);
        self.attr("value", value)
    }

    pub(crate) fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) tag: &'static str,
    attrs: Vec<(String, String)>,
    own_text: String,
    parent: Option<usize>,
    /// One past the last descendant, so `index..end` is the subtree.
    end: usize,
    visible: bool,
    pub(crate) action: Option<Action>,
    pub(crate) field: Option<Field>,
}

impl Node {
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Nodes in document (pre-)order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    pub(crate) fn build(root: El) -> Self {
        let mut dom = Dom::default();
        dom.push(root, None, true);
        dom
    }

    fn push(&mut self, el: El, parent: Option<usize>, parent_visible: bool) {
        let index = self.nodes.len();
        let visible = parent_visible && !el.hidden;
        self.nodes.push(Node {
            tag: el.tag,
            attrs: el.attrs,
            own_text: el.text,
            parent,
            end: index + 1,
            visible,
            action: el.action,
            field: el.field,
        });
        for child in el.children {
            self.push(child, Some(index), visible);
        }
        self.nodes[index].end = self.nodes.len();
    }

    pub(crate) fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn is_visible(&self, index: usize) -> bool {
        self.nodes[index].visible
    }

    /// Concatenated text of the node and its descendants.
    pub(crate) fn text_content(&self, index: usize) -> String {
        self.nodes[index..self.nodes[index].end]
            .iter()
            .map(|node| node.own_text.as_str())
            .collect()
    }

    /// Text of the visible part of the document, one node per line.
    pub(crate) fn render_text(&self) -> String {
        self.nodes
            .iter()
            .filter(|node| node.visible && !node.own_text.is_empty())
            .map(|node| format!("<{}> {}\n", node.tag, node.own_text))
            .collect()
    }

    /// Elements matched by `locator`, in document order.
    pub(crate) fn resolve(&self, locator: &Locator) -> Result<Vec<usize>, ApiError> {
        let mut scope: Option<Vec<usize>> = None;
        for segment in locator.segments() {
            let selector = SelectorList::parse(&segment.selector)?;
            let candidates: Vec<usize> = (0..self.nodes.len())
                .filter(|&index| match &scope {
                    None => true,
                    Some(roots) => roots
                        .iter()
                        .any(|&root| index > root && index < self.nodes[root].end),
                })
                .filter(|&index| selector.matches(self, index))
                .collect();
            scope = Some(self.filter(candidates, segment));
        }
        Ok(scope.unwrap_or_default())
    }

    fn filter(&self, candidates: Vec<usize>, segment: &Segment) -> Vec<usize> {
        let mut kept: Vec<usize> = candidates
            .into_iter()
            .filter(|&index| {
                let text = self.text_content(index);
                segment.has_text.as_ref().is_none_or(|t| text.contains(t.as_str()))
                    && segment.text_is.as_ref().is_none_or(|t| text.trim() == t)
            })
            .collect();
        if let Some(n) = segment.nth {
            kept = kept.get(n).map(|&index| vec![index]).unwrap_or_default();
        }
        kept
    }
}

/// `a, b`: any alternative matches.
#[derive(Debug)]
struct SelectorList(Vec<Complex>);

/// `a b c`: descendant combinators only.
#[derive(Debug)]
struct Complex(Vec<Compound>);

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug)]
enum AttrTest {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

impl SelectorList {
    fn parse(input: &str) -> Result<Self, ApiError> {
        let invalid = || ApiError::InvalidParameters(format!("unsupported selector {:?}", input));
        let mut list = Vec::new();
        for alternative in split_outside_brackets(input, |c| c == ',') {
            let compounds = split_outside_brackets(&alternative, char::is_whitespace)
                .into_iter()
                .filter(|part| !part.is_empty())
                .map(|part| Compound::parse(&part).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()?;
            if compounds.is_empty() {
                return Err(invalid());
            }
            list.push(Complex(compounds));
        }
        Ok(Self(list))
    }

    fn matches(&self, dom: &Dom, index: usize) -> bool {
        self.0.iter().any(|complex| complex.matches(dom, index))
    }
}

impl Complex {
    fn matches(&self, dom: &Dom, index: usize) -> bool {
        let Some((last, ancestors)) = self.0.split_last() else {
            return false;
        };
        if !last.matches(dom.node(index)) {
            return false;
        }
        let mut current = dom.node(index).parent;
        for compound in ancestors.iter().rev() {
            loop {
                match current {
                    None => return false,
                    Some(ancestor) => {
                        current = dom.node(ancestor).parent;
                        if compound.matches(dom.node(ancestor)) {
                            break;
                        }
                    }
                }
            }
        }
        true
    }
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = input;

        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            compound.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let len = body
                        .find(['#', '.', '['])
                        .unwrap_or(body.len());
                    if len == 0 {
                        return None;
                    }
                    let name = body[..len].to_string();
                    if first == '#' {
                        compound.id = Some(name);
                    } else {
                        compound.classes.push(name);
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    compound.attrs.push(AttrTest::parse(&rest[1..close])?);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(compound)
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().is_none_or(|tag| tag == "*" || tag == node.tag)
            && self.id.as_deref().is_none_or(|id| node.attr("id") == Some(id))
            && self.classes.iter().all(|class| node.has_class(class))
            && self.attrs.iter().all(|test| test.matches(node))
    }
}

impl AttrTest {
    fn parse(body: &str) -> Option<Self> {
        let unquote = |v: &str| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
        if let Some((name, value)) = body.split_once("^=") {
            Some(AttrTest::Prefix(name.trim().to_string(), unquote(value)))
        } else if let Some((name, value)) = body.split_once('=') {
            Some(AttrTest::Equals(name.trim().to_string(), unquote(value)))
        } else if !body.trim().is_empty() {
            Some(AttrTest::Present(body.trim().to_string()))
        } else {
            None
        }
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            AttrTest::Present(name) => node.attr(name).is_some(),
            AttrTest::Equals(name, value) => node.attr(name) == Some(value.as_str()),
            AttrTest::Prefix(name, value) => node.attr(name).is_some_and(|v| v.starts_with(value)),
        }
    }
}

/// Splits on `is_separator` except inside `[...]` and quotes.
fn split_outside_brackets(input: &str, is_separator: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in input.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_separator(c) => {
                parts.push(std::mem::take(&mut current).trim().to_string());
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current.trim().to_string());
    parts
}
