//! Assistant message formatting.
//!
//! Replies are plain text with a small inline subset: `**bold**`, `*italic*`,
//! lines starting with `- ` or `N. ` as list items, and newlines as line
//! breaks. [`format_message`] turns text into [`Node`]s; the terminal
//! renderer and [`to_html`] both consume the same nodes so the result does
//! not depend on where it is shown.

use crate::session::GiftSuggestion;

/// One piece of formatted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Bold(Vec<Node>),
    Italic(Vec<Node>),
    /// A `- ` or `N. ` line. The newline that ends it is consumed.
    ListItem(Vec<Node>),
    LineBreak,
}

/// Parse assistant text into formatted nodes.
pub fn format_message(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let last = lines.len().saturating_sub(1);

    for (idx, line) in lines.iter().enumerate() {
        if let Some(body) = list_item_body(line) {
            nodes.push(Node::ListItem(parse_inline(body)));
            continue;
        }

        nodes.extend(parse_inline(line));
        if idx < last {
            nodes.push(Node::LineBreak);
        }
    }

    nodes
}

/// Body of a `- item` or `12. item` line.
fn list_item_body(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ") {
        return Some(rest);
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Bold and italic spans within a single line. Spans nest; unclosed markers
/// stay literal.
fn parse_inline(line: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut buffer = String::new();
    let mut rest = line;

    while let Some(pos) = rest.find('*') {
        buffer.push_str(&rest[..pos]);
        let marker = &rest[pos..];

        if let Some(body) = marker.strip_prefix("**") {
            match closing_bold(body) {
                Some(end) => {
                    flush_text(&mut buffer, &mut nodes);
                    nodes.push(Node::Bold(parse_inline(&body[..end])));
                    rest = &body[end + 2..];
                }
                None => {
                    buffer.push_str("**");
                    rest = body;
                }
            }
            continue;
        }

        let body = &marker[1..];
        match closing_italic(body) {
            Some(end) => {
                flush_text(&mut buffer, &mut nodes);
                nodes.push(Node::Italic(parse_inline(&body[..end])));
                rest = &body[end + 1..];
            }
            None => {
                buffer.push('*');
                rest = body;
            }
        }
    }

    buffer.push_str(rest);
    flush_text(&mut buffer, &mut nodes);
    nodes
}

/// Offset of the `**` closing a bold span that opened just before `body`.
///
/// A closer is never empty-bodied and is the last pair of a `*` run, so
/// `***x***` closes after the inner italic.
fn closing_bold(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len().saturating_sub(1)).find(|&i| {
        bytes[i] == b'*' && bytes[i + 1] == b'*' && bytes.get(i + 2) != Some(&b'*')
    })
}

/// Offset of the `*` closing an italic span, skipping complete bold spans
/// and stray `**` inside it.
fn closing_italic(body: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(offset) = body[from..].find('*') {
        let pos = from + offset;
        if body[pos..].starts_with("**") {
            from = match closing_bold(&body[pos + 2..]) {
                Some(end) => pos + 2 + end + 2,
                None => pos + 2,
            };
            continue;
        }
        if pos == 0 {
            return None;
        }
        return Some(pos);
    }
    None
}

fn flush_text(buffer: &mut String, nodes: &mut Vec<Node>) {
    if !buffer.is_empty() {
        nodes.push(Node::Text(std::mem::take(buffer)));
    }
}

/// Render nodes as an HTML fragment.
pub fn to_html(nodes: &[Node]) -> String {
    let mut html = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => html.push_str(&escape_html(text)),
            Node::Bold(children) => {
                html.push_str("<strong>");
                html.push_str(&to_html(children));
                html.push_str("</strong>");
            }
            Node::Italic(children) => {
                html.push_str("<em>");
                html.push_str(&to_html(children));
                html.push_str("</em>");
            }
            Node::ListItem(children) => {
                html.push_str("<li>");
                html.push_str(&to_html(children));
                html.push_str("</li>");
            }
            Node::LineBreak => html.push_str("<br>"),
        }
    }
    html
}

/// HTML for one card in the gift panel.
pub fn gift_card_html(gift: &GiftSuggestion) -> String {
    format!(
        "<div class=\"gift-card\"><h4>{}</h4><p><strong>Why it's perfect:</strong> {}</p><span class=\"gift-price\">{}</span></div>",
        escape_html(&gift.name),
        escape_html(&gift.reason),
        escape_html(&gift.price_range)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn bold(s: &str) -> Node {
        Node::Bold(vec![text(s)])
    }

    fn italic(s: &str) -> Node {
        Node::Italic(vec![text(s)])
    }

    #[test]
    fn test_bold_italic_and_list() {
        let nodes = format_message("**Hot tip:** buy *now*\n- Option A\n- Option B");
        assert_eq!(
            nodes,
            vec![
                bold("Hot tip:"),
                text(" buy "),
                italic("now"),
                Node::LineBreak,
                Node::ListItem(vec![text("Option A")]),
                Node::ListItem(vec![text("Option B")]),
            ]
        );
        assert_eq!(
            to_html(&nodes),
            "<strong>Hot tip:</strong> buy <em>now</em><br><li>Option A</li><li>Option B</li>"
        );
    }

    #[test]
    fn test_numbered_list_items() {
        let nodes = format_message("Ideas:\n1. Scarf\n12. *Warm* gloves");
        assert_eq!(
            nodes,
            vec![
                text("Ideas:"),
                Node::LineBreak,
                Node::ListItem(vec![text("Scarf")]),
                Node::ListItem(vec![italic("Warm"), text(" gloves")]),
            ]
        );
    }

    #[test]
    fn test_plain_newlines_become_breaks() {
        let nodes = format_message("one\n\ntwo");
        assert_eq!(
            nodes,
            vec![text("one"), Node::LineBreak, Node::LineBreak, text("two")]
        );
        assert_eq!(to_html(&nodes), "one<br><br>two");
    }

    #[test]
    fn test_dash_inside_line_is_not_a_list() {
        let nodes = format_message("well - maybe");
        assert_eq!(nodes, vec![text("well - maybe")]);
    }

    #[test]
    fn test_number_without_dot_space_is_not_a_list() {
        assert_eq!(format_message("2024 was great"), vec![text("2024 was great")]);
        assert_eq!(format_message("3.5 stars"), vec![text("3.5 stars")]);
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(format_message("**open"), vec![text("**open")]);
        assert_eq!(format_message("5 * 3"), vec![text("5 * 3")]);
    }

    #[test]
    fn test_multiple_spans_on_one_line() {
        let nodes = format_message("**a** and **b** or *c*");
        assert_eq!(
            nodes,
            vec![
                bold("a"),
                text(" and "),
                bold("b"),
                text(" or "),
                italic("c"),
            ]
        );
    }

    #[test]
    fn test_bold_nested_in_italic() {
        let nodes = format_message("*a **b** c*");
        assert_eq!(
            nodes,
            vec![Node::Italic(vec![text("a "), bold("b"), text(" c")])]
        );
        assert_eq!(to_html(&nodes), "<em>a <strong>b</strong> c</em>");
    }

    #[test]
    fn test_italic_nested_in_bold() {
        let nodes = format_message("**a *b* c**");
        assert_eq!(
            nodes,
            vec![Node::Bold(vec![text("a "), italic("b"), text(" c")])]
        );
        assert_eq!(to_html(&nodes), "<strong>a <em>b</em> c</strong>");
    }

    #[test]
    fn test_triple_stars_are_bold_italic() {
        let nodes = format_message("***x***");
        assert_eq!(nodes, vec![Node::Bold(vec![italic("x")])]);
        assert_eq!(to_html(&nodes), "<strong><em>x</em></strong>");
    }

    #[test]
    fn test_stray_double_star_inside_italic_stays_literal() {
        assert_eq!(format_message("*a **b*"), vec![italic("a **b")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let nodes = format_message("Ideas:\r\n- item\r\nend\r\n");
        assert_eq!(
            nodes,
            vec![
                text("Ideas:"),
                Node::LineBreak,
                Node::ListItem(vec![text("item")]),
                text("end"),
                Node::LineBreak,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(format_message("").is_empty());
    }

    #[test]
    fn test_html_is_escaped() {
        let nodes = format_message("<script>**x & y**");
        assert_eq!(to_html(&nodes), "&lt;script&gt;<strong>x &amp; y</strong>");
    }

    #[test]
    fn test_transform_is_pure() {
        let input = "**Hot tip:** buy *now*\n- Option A";
        assert_eq!(format_message(input), format_message(input));
    }

    #[test]
    fn test_gift_card_html_keeps_fields_verbatim() {
        let gift = GiftSuggestion::new("Telescope", "matches astronomy interest", "$50-$100");
        let html = gift_card_html(&gift);
        assert!(html.contains("<h4>Telescope</h4>"));
        assert!(html.contains("matches astronomy interest"));
        assert!(html.contains("<span class=\"gift-price\">$50-$100</span>"));
    }
}
