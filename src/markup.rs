use crate::error::{markup_error, AppResult};
use std::collections::BTreeMap;

/// Class that marks an element as a schedule entry in the rendered grid
pub const ENTRY_CLASS: &str = "schedule-entry";

/// Index of a node inside its [`Document`] arena
pub type NodeId = usize;

/// Tags that never carry children
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree for the rendered schedule fragment.
///
/// This is deliberately minimal: enough structure to locate schedule
/// entries, read their attributes, walk ancestors and copy subtree markup.
/// Grid rendering itself happens elsewhere and is out of scope.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document with a synthetic `body` root
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element {
                tag: "body".to_string(),
                attrs: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    /// The synthetic root element
    pub fn root(&self) -> NodeId {
        0
    }

    /// Append a child element under `parent` and return its id
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data: NodeData::Element {
                tag: tag.to_string(),
                attrs: BTreeMap::new(),
            },
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a text node under `parent` and return its id
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data: NodeData::Text(text.to_string()),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Set an attribute on an element node; a no-op on text nodes
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id].data {
            attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Tag name of an element node
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id)?.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Attribute value on an element node
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id)?.data {
            NodeData::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Whether an element carries `class` in its space-separated class list
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Nearest self-or-ancestor element satisfying `pred`
    pub fn closest_by<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if pred(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Nearest self-or-ancestor element carrying `class`
    pub fn closest(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.closest_by(id, |doc, node| doc.has_class(node, class))
    }

    /// First element (document order) whose `id` attribute equals `id_attr`
    pub fn element_by_id(&self, id_attr: &str) -> Option<NodeId> {
        (0..self.nodes.len()).find(|&id| self.attr(id, "id") == Some(id_attr))
    }

    /// All elements (document order) carrying `class`
    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Serialized markup of a node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.nodes[id].children {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialized markup of the node itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for &child in &self.nodes[id].children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Parse a rendered schedule fragment into a document.
    ///
    /// Handles the subset the schedule renderer emits: elements with
    /// quoted attributes, self-closing and void tags, text, comments and
    /// the five basic character entities. Anything else is a markup error.
    pub fn parse(input: &str) -> AppResult<Document> {
        let mut doc = Document::new();
        let mut stack = vec![doc.root()];
        let mut parser = Parser {
            chars: input.char_indices().peekable(),
            input,
        };

        while let Some(&(pos, ch)) = parser.chars.peek() {
            if ch == '<' {
                parser.chars.next();
                match parser.chars.peek() {
                    Some((_, '!')) => parser.skip_declaration()?,
                    Some((_, '/')) => {
                        parser.chars.next();
                        let tag = parser.read_name();
                        parser.skip_until('>')?;
                        let open = stack
                            .last()
                            .copied()
                            .filter(|&id| id != doc.root())
                            .ok_or_else(|| {
                                markup_error(&format!("Unmatched closing tag </{}>", tag))
                            })?;
                        if doc.tag(open) != Some(tag.as_str()) {
                            return Err(markup_error(&format!(
                                "Mismatched closing tag </{}> at byte {}",
                                tag, pos
                            )));
                        }
                        stack.pop();
                    }
                    Some(_) => {
                        let parent = *stack.last().unwrap_or(&0);
                        let (id, self_closed) = parser.read_element(&mut doc, parent)?;
                        let is_void = doc
                            .tag(id)
                            .map(|t| VOID_TAGS.contains(&t))
                            .unwrap_or(false);
                        if !self_closed && !is_void {
                            stack.push(id);
                        }
                    }
                    None => return Err(markup_error("Unexpected end of input after '<'")),
                }
            } else {
                let text = parser.read_text();
                if !text.trim().is_empty() {
                    let parent = *stack.last().unwrap_or(&0);
                    doc.append_text(parent, &text);
                }
            }
        }

        if stack.len() > 1 {
            let open = doc.tag(*stack.last().unwrap()).unwrap_or("?").to_string();
            return Err(markup_error(&format!("Unclosed element <{}>", open)));
        }

        Ok(doc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' {
                name.push(ch.to_ascii_lowercase());
                self.chars.next();
            } else {
                break;
            }
        }
        name
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn skip_until(&mut self, needle: char) -> AppResult<()> {
        for (_, ch) in self.chars.by_ref() {
            if ch == needle {
                return Ok(());
            }
        }
        Err(markup_error(&format!("Expected '{}' before end of input", needle)))
    }

    /// Skip `<!-- ... -->` comments and `<!DOCTYPE ...>` declarations;
    /// the leading `<` is already consumed
    fn skip_declaration(&mut self) -> AppResult<()> {
        self.chars.next(); // '!'
        let rest: String = self
            .chars
            .clone()
            .take(2)
            .map(|(_, c)| c)
            .collect();
        if rest == "--" {
            self.chars.next();
            self.chars.next();
            let mut dashes = 0;
            for (_, ch) in self.chars.by_ref() {
                match ch {
                    '-' => dashes += 1,
                    '>' if dashes >= 2 => return Ok(()),
                    _ => dashes = 0,
                }
            }
            Err(markup_error("Unterminated comment"))
        } else {
            self.skip_until('>')
        }
    }

    /// Parse a start tag; the leading `<` is already consumed.
    /// Returns the new node id and whether the tag was self-closing.
    fn read_element(&mut self, doc: &mut Document, parent: NodeId) -> AppResult<(NodeId, bool)> {
        let tag = self.read_name();
        if tag.is_empty() {
            return Err(markup_error("Expected tag name after '<'"));
        }
        let id = doc.append_element(parent, &tag);

        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                Some(&(_, '>')) => {
                    self.chars.next();
                    return Ok((id, false));
                }
                Some(&(_, '/')) => {
                    self.chars.next();
                    self.skip_whitespace();
                    match self.chars.next() {
                        Some((_, '>')) => return Ok((id, true)),
                        _ => return Err(markup_error("Expected '>' after '/'")),
                    }
                }
                Some(_) => {
                    let name = self.read_name();
                    if name.is_empty() {
                        return Err(markup_error(&format!(
                            "Malformed attribute in <{}>",
                            tag
                        )));
                    }
                    self.skip_whitespace();
                    let value = if matches!(self.chars.peek(), Some(&(_, '='))) {
                        self.chars.next();
                        self.skip_whitespace();
                        self.read_attr_value()?
                    } else {
                        // Bare attribute, e.g. `hidden`
                        String::new()
                    };
                    doc.set_attr(id, &name, &value);
                }
                None => return Err(markup_error(&format!("Unclosed tag <{}>", tag))),
            }
        }
    }

    fn read_attr_value(&mut self) -> AppResult<String> {
        match self.chars.peek() {
            Some(&(_, quote)) if quote == '"' || quote == '\'' => {
                self.chars.next();
                let mut raw = String::new();
                for (_, ch) in self.chars.by_ref() {
                    if ch == quote {
                        return Ok(decode_entities(&raw));
                    }
                    raw.push(ch);
                }
                Err(markup_error("Unterminated attribute value"))
            }
            Some(_) => {
                let mut raw = String::new();
                while let Some(&(_, ch)) = self.chars.peek() {
                    if ch.is_whitespace() || ch == '>' || ch == '/' {
                        break;
                    }
                    raw.push(ch);
                    self.chars.next();
                }
                Ok(decode_entities(&raw))
            }
            None => Err(markup_error("Expected attribute value")),
        }
    }

    fn read_text(&mut self) -> String {
        let start = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(0);
        let mut end = self.input.len();
        while let Some(&(pos, ch)) = self.chars.peek() {
            if ch == '<' {
                end = pos;
                break;
            }
            self.chars.next();
        }
        decode_entities(&self.input[start..end])
    }
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let replaced = [
            ("&amp;", "&"),
            ("&lt;", "<"),
            ("&gt;", ">"),
            ("&quot;", "\""),
            ("&#39;", "'"),
            ("&apos;", "'"),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match replaced {
            Some((entity, ch)) => {
                out.push_str(ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    escape_text(input).replace('"', "&quot;")
}
