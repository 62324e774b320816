//! Source ranges of Markdown syntax that smart punctuation leaves alone.
//!
//! The educator runs on Markdown source, where `-` and quotes are also
//! syntax: thematic breaks, setext underlines, table delimiter rows, code,
//! link destinations and titles. The parsed tree locates those ranges.

use markdown::mdast::{Node, ReferenceKind};
use std::ops::Range;

/// Byte ranges of `source` that are syntax rather than prose, in document
/// order. `tree` must have been parsed from `source`.
pub(crate) fn verbatim_ranges(source: &str, tree: &Node) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    collect(source, tree, &mut ranges);
    ranges
}

fn collect(source: &str, node: &Node, ranges: &mut Vec<Range<usize>>) {
    let Some(span) = span(node) else {
        collect_children(source, node, ranges);
        return;
    };

    match node {
        Node::Code(_)
        | Node::InlineCode(_)
        | Node::Math(_)
        | Node::InlineMath(_)
        | Node::ThematicBreak(_)
        | Node::Image(_)
        | Node::ImageReference(_)
        | Node::Definition(_)
        | Node::FootnoteReference(_)
        | Node::Yaml(_)
        | Node::Toml(_) => ranges.push(span),
        // Autolinks: the text is the destination.
        Node::Link(_) if !source.get(span.clone()).is_some_and(|raw| raw.starts_with('[')) => {
            ranges.push(span)
        }
        // `[label]` and `[label][]`: the text is the reference label.
        Node::LinkReference(reference)
            if !matches!(reference.reference_kind, ReferenceKind::Full) =>
        {
            ranges.push(span)
        }
        Node::Heading(_)
        | Node::Table(_)
        | Node::Link(_)
        | Node::LinkReference(_)
        | Node::FootnoteDefinition(_) => collect_gaps(source, node, span, ranges),
        _ => collect_children(source, node, ranges),
    }
}

fn collect_children(source: &str, node: &Node, ranges: &mut Vec<Range<usize>>) {
    for child in children(node) {
        collect(source, child, ranges);
    }
}

/// Marks everything in `span` outside the children as verbatim: heading
/// markers and setext underlines, table delimiter rows, link destinations.
fn collect_gaps(source: &str, node: &Node, span: Range<usize>, ranges: &mut Vec<Range<usize>>) {
    let mut cursor = span.start;
    for child in children(node) {
        let Some(child_span) = self::span(child) else {
            continue;
        };
        if child_span.start > cursor {
            ranges.push(cursor..child_span.start);
        }
        collect(source, child, ranges);
        cursor = cursor.max(child_span.end);
    }
    if span.end > cursor {
        ranges.push(cursor..span.end);
    }
}

fn span(node: &Node) -> Option<Range<usize>> {
    node.position()
        .map(|position| position.start.offset..position.end.offset)
}

fn children(node: &Node) -> &[Node] {
    node.children().map(Vec::as_slice).unwrap_or_default()
}
