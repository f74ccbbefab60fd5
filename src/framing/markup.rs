//! Tables embedded in an HTML document.
//!
//! Bank exports are HTML rather than XHTML, so the tokenizer runs with end
//! name checks off and the tree builder closes void elements, implied cells
//! and stray end tags the way a browser would. Script and style elements are
//! raw text in HTML and are cut out before tokenizing.

use crate::error::{ConvertError, Result};
use log::debug;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

static RAW_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?(?:</script\s*>|\z)|<style\b[^>]*>.*?(?:</style\s*>|\z)")
        .unwrap()
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its children; names are lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Node>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Concatenation of every descendant text node in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements called `name`, in document order.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for element in self.child_elements() {
            if element.name == name {
                found.push(element);
            }
            element.collect_descendants(name, found);
        }
    }

    /// Rows of a table, looking through `thead`, `tbody` and `tfoot` but not
    /// into nested tables.
    pub fn rows(&self) -> Vec<&Element> {
        let mut rows = Vec::new();
        for element in self.child_elements() {
            match element.name.as_str() {
                "tr" => rows.push(element),
                "thead" | "tbody" | "tfoot" => {
                    rows.extend(element.child_elements().filter(|e| e.name == "tr"))
                }
                _ => {}
            }
        }
        rows
    }

    /// `td` and `th` cells of a row.
    pub fn cells(&self) -> Vec<&Element> {
        self.child_elements()
            .filter(|e| e.name == "td" || e.name == "th")
            .collect()
    }
}

/// Closes elements that HTML lets a new start tag end implicitly.
fn close_implied(stack: &mut Vec<Element>, opening: &str) {
    let implied: &[&str] = match opening {
        "td" | "th" => &["td", "th"],
        "tr" => &["td", "th", "tr"],
        "thead" | "tbody" | "tfoot" => &["td", "th", "tr", "thead", "tbody", "tfoot"],
        _ => return,
    };
    while stack.len() > 1 && implied.contains(&stack[stack.len() - 1].name.as_str()) {
        pop_into_parent(stack);
    }
}

fn pop_into_parent(stack: &mut Vec<Element>) {
    if stack.len() > 1 {
        if let Some(element) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(Node::Element(element));
            }
        }
    }
}

fn push_text(stack: &mut [Element], raw: &[u8]) {
    let raw = String::from_utf8_lossy(raw);
    let text = html_escape::decode_html_entities(&raw).into_owned();
    if let Some(top) = stack.last_mut() {
        top.children.push(Node::Text(text));
    }
}

/// Parses a whole HTML document into a tree rooted at a `#document` element.
pub fn parse_document(html: &str) -> Result<Element> {
    let html = RAW_TEXT.replace_all(html, "");
    let mut reader = Reader::from_str(&html);
    reader.config_mut().check_end_names = false;

    let mut stack = vec![Element::new("#document")];
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
                close_implied(&mut stack, &name);
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    if let Some(top) = stack.last_mut() {
                        top.children.push(Node::Element(Element::new(name)));
                    }
                } else {
                    stack.push(Element::new(name));
                }
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
                if let Some(top) = stack.last_mut() {
                    top.children.push(Node::Element(Element::new(name)));
                }
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_lowercase();
                match stack.iter().rposition(|e| e.name == name) {
                    Some(position) if position > 0 => {
                        while stack.len() > position {
                            pop_into_parent(&mut stack);
                        }
                    }
                    _ => debug!("Ignoring stray end tag </{}>", name),
                }
            }
            Event::Text(text) => push_text(&mut stack, &text),
            Event::CData(data) => push_text(&mut stack, &data),
            Event::Eof => break,
            _ => {}
        }
    }

    while stack.len() > 1 {
        pop_into_parent(&mut stack);
    }
    Ok(stack.pop().unwrap_or_else(|| Element::new("#document")))
}

/// A table row with its 1-based position in the table and its cell texts.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub number: usize,
    pub cells: Vec<String>,
}

/// Selects rows of the `table_index`-th table (document order, nested tables
/// included), skipping `skip_head` rows at the top and `skip_tail` at the
/// bottom.
pub fn table_rows(
    document: &Element,
    table_index: usize,
    skip_head: usize,
    skip_tail: usize,
) -> Result<Vec<TableRow>> {
    let tables = document.descendants("table");
    let table = tables.get(table_index).ok_or(ConvertError::MissingMarker {
        marker: "the transaction table",
    })?;

    let rows = table.rows();
    let end = rows.len().saturating_sub(skip_tail);
    debug!(
        "Table {} has {} rows, using rows {}..{}",
        table_index,
        rows.len(),
        skip_head + 1,
        end
    );

    Ok(rows
        .iter()
        .enumerate()
        .take(end)
        .skip(skip_head)
        .map(|(index, row)| TableRow {
            number: index + 1,
            cells: row.cells().iter().map(|cell| cell.text()).collect(),
        })
        .collect())
}
