//! Constrained markdown: `**bold**`, `*italic*`, `` `code` `` and line breaks.
//!
//! Output is structured spans, never markup. Callers render span text as
//! plain text nodes, so `<script>` in a response stays literal.
//!
//! Passes run bold, then italic, then code. Each pass only scans text the
//! earlier passes left plain, matching the shortest delimited run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Text(s) | Span::Bold(s) | Span::Italic(s) | Span::Code(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Vec<Span>),
    /// A blank source line
    Break,
}

pub fn render(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                Block::Break
            } else {
                Block::Paragraph(render_line(line))
            }
        })
        .collect()
}

pub fn render_line(line: &str) -> Vec<Span> {
    let spans = vec![Span::Text(line.to_string())];
    let spans = apply(spans, "**", Span::Bold);
    let spans = apply(spans, "*", Span::Italic);
    apply(spans, "`", Span::Code)
}

/// Plain-text rendering of blocks, one line per block
pub fn to_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(spans) => spans.iter().map(Span::text).collect::<String>(),
            Block::Break => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn apply(spans: Vec<Span>, delim: &str, make: fn(String) -> Span) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::Text(text) => split_delimited(&text, delim, make, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn split_delimited(text: &str, delim: &str, make: fn(String) -> Span, out: &mut Vec<Span>) {
    let mut rest = text;
    while let Some(open) = rest.find(delim) {
        let after_open = &rest[open + delim.len()..];
        let Some(close) = after_open.find(delim) else {
            break;
        };
        if open > 0 {
            out.push(Span::Text(rest[..open].to_string()));
        }
        out.push(make(after_open[..close].to_string()));
        rest = &after_open[close + delim.len()..];
    }
    if !rest.is_empty() {
        out.push(Span::Text(rest.to_string()));
    }
}
