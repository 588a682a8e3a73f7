//! Parsed markdown document tree
//!
//! `pulldown-cmark` produces a flat event stream; the checks in this crate need
//! sibling navigation ("the node right after this heading"), so the events are
//! folded into an owned tree once per document.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Kind of a node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Heading { level: u8 },
    Paragraph,
    BlockQuote,
    List,
    Item,
    Table,
    TableHead,
    TableRow,
    TableCell,
    CodeBlock { info: String, literal: String },
    Link { destination: String },
    Emphasis,
    Strong,
    Strikethrough,
    Image,
    Text(String),
    Code(String),
    Html(String),
    Break,
    Rule,
    /// Container kinds this crate does not inspect (footnotes, metadata, ...)
    Other,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

/// What a visitor wants the walk to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Descend into this node's children, then carry on
    Continue,
    /// Do not descend into this node's children
    SkipChildren,
    /// Abort the whole walk
    Stop,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Heading level, if this node is a heading
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        self.kind == NodeKind::Table
    }

    /// Concatenated literal text of all text and inline-code descendants.
    ///
    /// Inline HTML is ignored, so `<a name="input_x"></a> [x](#input_x)` yields ` x`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| {
            match &node.kind {
                NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
                _ => {}
            }
            Walk::Continue
        });
        out
    }

    /// Depth-first pre-order walk. Returns [`Walk::Stop`] if the visitor stopped.
    pub fn walk<F>(&self, visit: &mut F) -> Walk
    where
        F: FnMut(&Node) -> Walk,
    {
        match visit(self) {
            Walk::Stop => return Walk::Stop,
            Walk::SkipChildren => return Walk::Continue,
            Walk::Continue => {}
        }
        for child in &self.children {
            if child.walk(visit) == Walk::Stop {
                return Walk::Stop;
            }
        }
        Walk::Continue
    }

    /// Header cells of a table node.
    pub fn table_header(&self) -> Option<Vec<String>> {
        let head = self
            .children
            .iter()
            .find(|c| c.kind == NodeKind::TableHead)?;
        // header cells sit directly under the head, without a row
        let header: Vec<String> = head
            .children
            .iter()
            .filter(|c| c.kind == NodeKind::TableCell)
            .map(|c| c.text().trim().to_string())
            .collect();
        if header.is_empty() { None } else { Some(header) }
    }

    /// Body rows of a table node, as cell texts.
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.children
            .iter()
            .filter(|c| c.kind == NodeKind::TableRow)
            .map(|row| {
                row.children
                    .iter()
                    .filter(|c| c.kind == NodeKind::TableCell)
                    .map(Node::text)
                    .collect()
            })
            .collect()
    }
}

/// A level-N heading located in the tree, addressed by its child-index path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    pub path: Vec<usize>,
    pub level: u8,
    pub text: String,
}

/// A parsed markdown document plus its raw source.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    root: Node,
}

impl Document {
    /// Parse markdown with GitHub table and strikethrough extensions.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let root = build_tree(&source);
        Self { source, root }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn walk<F>(&self, visit: &mut F) -> Walk
    where
        F: FnMut(&Node) -> Walk,
    {
        self.root.walk(visit)
    }

    /// Every heading of the given level, in document order.
    pub fn headings(&self, level: u8) -> Vec<HeadingRef> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        collect_headings(&self.root, level, &mut path, &mut found);
        found
    }

    /// The sibling list containing the node at `path`, and its index in it.
    fn siblings(&self, path: &[usize]) -> Option<(&[Node], usize)> {
        let (&last, parents) = path.split_last()?;
        let mut parent = &self.root;
        for &i in parents {
            parent = parent.children.get(i)?;
        }
        Some((&parent.children, last))
    }

    /// Nodes after the one at `path`, sharing its parent.
    pub fn following(&self, path: &[usize]) -> &[Node] {
        match self.siblings(path) {
            Some((siblings, index)) if index < siblings.len() => &siblings[index + 1..],
            _ => &[],
        }
    }

    /// The node immediately after the one at `path`.
    pub fn next_sibling(&self, path: &[usize]) -> Option<&Node> {
        self.following(path).first()
    }

    /// Nodes following a heading, up to the next heading of the same or a
    /// shallower level.
    pub fn section_body(&self, heading: &HeadingRef) -> &[Node] {
        let following = self.following(&heading.path);
        let end = following
            .iter()
            .position(|n| n.heading_level().is_some_and(|l| l <= heading.level))
            .unwrap_or(following.len());
        &following[..end]
    }
}

fn collect_headings(node: &Node, level: u8, path: &mut Vec<usize>, found: &mut Vec<HeadingRef>) {
    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        if child.heading_level() == Some(level) {
            found.push(HeadingRef {
                path: path.clone(),
                level,
                text: child.text().trim().to_string(),
            });
        } else if child.heading_level().is_none() {
            collect_headings(child, level, path, found);
        }
        path.pop();
    }
}

fn build_tree(source: &str) -> Node {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // the bottom of the stack is the document node
    let mut stack = vec![Node::new(NodeKind::Document)];

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(tag) => stack.push(Node::new(kind_for(tag))),
            Event::End(end) => {
                if stack.len() < 2 {
                    continue;
                }
                let Some(mut node) = stack.pop() else {
                    continue;
                };
                if let (TagEnd::CodeBlock, NodeKind::CodeBlock { literal, .. }) =
                    (end, &mut node.kind)
                {
                    let text: String = node
                        .children
                        .drain(..)
                        .filter_map(|c| match c.kind {
                            NodeKind::Text(t) => Some(t),
                            _ => None,
                        })
                        .collect();
                    literal.push_str(&text);
                }
                push_child(&mut stack, node);
            }
            Event::Text(text) => push_child(&mut stack, Node::new(NodeKind::Text(text.into_string()))),
            Event::Code(code) => push_child(&mut stack, Node::new(NodeKind::Code(code.into_string()))),
            Event::Html(html) | Event::InlineHtml(html) => {
                push_child(&mut stack, Node::new(NodeKind::Html(html.into_string())))
            }
            Event::SoftBreak | Event::HardBreak => push_child(&mut stack, Node::new(NodeKind::Break)),
            Event::Rule => push_child(&mut stack, Node::new(NodeKind::Rule)),
            _ => {}
        }
    }

    // unbalanced events should not happen, but fold anything left open
    while stack.len() > 1 {
        if let Some(node) = stack.pop() {
            push_child(&mut stack, node);
        }
    }
    stack.pop().unwrap_or_else(|| Node::new(NodeKind::Document))
}

fn push_child(stack: &mut [Node], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn kind_for(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::List(_) => NodeKind::List,
        Tag::Item => NodeKind::Item,
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => info.into_string(),
                CodeBlockKind::Indented => String::new(),
            },
            literal: String::new(),
        },
        Tag::Link { dest_url, .. } => NodeKind::Link {
            destination: dest_url.into_string(),
        },
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Image { .. } => NodeKind::Image,
        _ => NodeKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# Module

Intro text.

## Resources

- [azurerm_resource_group.main](https://example.com/resources/resource_group) (resource)

## Inputs

| Name | Description |
|------|-------------|
| <a name="input_location"></a> [location](#input\_location) | Where |

### nested

## Outputs

```hcl
object({ a = string })
```
"#;

    #[test]
    fn test_headings_by_level() {
        let doc = Document::parse(SAMPLE);
        let h2: Vec<String> = doc.headings(2).into_iter().map(|h| h.text).collect();
        assert_eq!(h2, vec!["Resources", "Inputs", "Outputs"]);
        assert_eq!(doc.headings(1).len(), 1);
        assert_eq!(doc.headings(3)[0].text, "nested");
    }

    #[test]
    fn test_next_sibling_is_table() {
        let doc = Document::parse(SAMPLE);
        let inputs = &doc.headings(2)[1];
        let next = doc.next_sibling(&inputs.path).unwrap();
        assert!(next.is_table());
        assert_eq!(
            next.table_header().unwrap(),
            vec!["Name".to_string(), "Description".to_string()]
        );
        let rows = next.table_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].trim(), "location");
    }

    #[test]
    fn test_section_body_stops_at_same_level() {
        let doc = Document::parse(SAMPLE);
        let inputs = &doc.headings(2)[1];
        let body = doc.section_body(inputs);
        // table and the nested level-3 heading
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].heading_level(), Some(3));
    }

    #[test]
    fn test_code_block_literal() {
        let doc = Document::parse(SAMPLE);
        let mut literals = Vec::new();
        doc.walk(&mut |n| {
            if let NodeKind::CodeBlock { info, literal } = &n.kind {
                literals.push((info.clone(), literal.clone()));
            }
            Walk::Continue
        });
        assert_eq!(literals.len(), 1);
        assert_eq!(literals[0].0, "hcl");
        assert!(literals[0].1.contains("object("));
    }

    #[test]
    fn test_walk_stop_and_skip() {
        let doc = Document::parse(SAMPLE);
        let mut links = 0;
        doc.walk(&mut |n| match n.kind {
            NodeKind::Table => Walk::SkipChildren,
            NodeKind::Link { .. } => {
                links += 1;
                Walk::Stop
            }
            _ => Walk::Continue,
        });
        // the first link is in the resources list; the table's link is skipped
        assert_eq!(links, 1);
    }
}
