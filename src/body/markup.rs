//! Markup beautifier.
//!
//! [`pretty_print`] puts every element on its own line, indented by nesting
//! depth. It is a total function: when the input cannot be tokenized (an
//! unterminated tag, comment or quoted attribute) the input is returned
//! unchanged.
//!
//! The tree builder is forgiving in the same way browsers are: an end tag
//! closes the nearest matching open element, unmatched end tags are kept as
//! they are, and elements left open at the end of the input are closed
//! implicitly. Output is stable: formatting already formatted markup yields
//! the same string.
//!
//! Nesting deeper than [`MAX_DEPTH`] open elements is not formatted either,
//! which keeps both the tree and the output size bounded.

const INDENT: &str = "  ";

/// Deeper markup is left unformatted.
pub(crate) const MAX_DEPTH: usize = 256;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is copied verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "pre", "textarea"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum MarkupError {
    #[error("unterminated tag at byte {0}")]
    UnterminatedTag(usize),
    #[error("unterminated comment at byte {0}")]
    UnterminatedComment(usize),
    #[error("unterminated declaration at byte {0}")]
    UnterminatedDeclaration(usize),
}

/// Reindents markup. Never fails; unparseable input comes back as-is.
pub fn pretty_print(markup: &str) -> String {
    let tokens = match tokenize(markup) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::debug!("markup left unformatted: {e}");
            return markup.to_string();
        }
    };

    let nodes = match build_tree(tokens) {
        Some(nodes) if !nodes.is_empty() => nodes,
        Some(_) => return markup.to_string(),
        None => {
            log::debug!("markup nested deeper than {MAX_DEPTH} levels left unformatted");
            return markup.to_string();
        }
    };

    let mut lines = Vec::new();
    for node in &nodes {
        emit(node, 0, &mut lines);
    }
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    StartTag { name: String, raw: &'a str, self_closing: bool },
    EndTag { name: String, raw: &'a str },
    /// `<!-- ... -->`, delimiters included
    Comment(&'a str),
    /// `<!DOCTYPE ...>` or `<?xml ...?>`
    Declaration(&'a str),
    /// Content of a raw-text element
    RawText(&'a str),
}

pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub(crate) fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

/// Splits markup into tokens. Only ASCII delimiters are used as slice
/// boundaries, so every slice lands on a char boundary.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token<'_>>, MarkupError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut idx = 0_usize;
    let mut text_start = 0_usize;

    while idx < bytes.len() {
        if bytes[idx] != b'<' {
            idx = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
            continue;
        }

        let next = bytes.get(idx + 1).copied();
        let after = bytes.get(idx + 2).copied();

        let is_comment = starts_with(bytes, idx, b"<!--");
        let is_declaration = !is_comment && matches!(next, Some(b'!') | Some(b'?'));
        let is_end = next == Some(b'/') && after.is_some_and(|b| b.is_ascii_alphabetic());
        let is_start = next.is_some_and(|b| b.is_ascii_alphabetic());

        if !(is_comment || is_declaration || is_end || is_start) {
            // A lone '<' is just text
            idx += 1;
            continue;
        }

        if text_start < idx {
            tokens.push(Token::Text(&input[text_start..idx]));
        }

        if is_comment {
            let end = find_subslice(bytes, idx + 4, b"-->")
                .ok_or(MarkupError::UnterminatedComment(idx))?
                + 3;
            tokens.push(Token::Comment(&input[idx..end]));
            idx = end;
        } else if is_declaration {
            let end = find_byte(bytes, idx + 2, b'>')
                .ok_or(MarkupError::UnterminatedDeclaration(idx))?
                + 1;
            tokens.push(Token::Declaration(&input[idx..end]));
            idx = end;
        } else {
            let (tag, end) = parse_tag(bytes, idx).ok_or(MarkupError::UnterminatedTag(idx))?;
            let raw = &input[idx..end];
            idx = end;

            if tag.is_end {
                tokens.push(Token::EndTag { name: tag.name, raw });
            } else {
                let raw_text = is_raw_text(&tag.name) && !tag.self_closing;
                let name = tag.name;
                if raw_text {
                    let content_end = find_raw_text_end(bytes, idx, &name).unwrap_or(bytes.len());
                    tokens.push(Token::StartTag { name, raw, self_closing: false });
                    if content_end > idx {
                        tokens.push(Token::RawText(&input[idx..content_end]));
                    }
                    idx = content_end;
                } else {
                    tokens.push(Token::StartTag { name, raw, self_closing: tag.self_closing });
                }
            }
        }

        text_start = idx;
    }

    if text_start < bytes.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }

    Ok(tokens)
}

#[derive(Debug)]
enum Node<'a> {
    Element {
        name: String,
        start: &'a str,
        children: Vec<Node<'a>>,
        end: Option<&'a str>,
    },
    /// Whitespace-collapsed text
    Text(String),
    /// Raw-text element content
    Raw(&'a str),
    /// Comments, declarations and stray end tags
    Verbatim(&'a str),
}

struct OpenElement<'a> {
    name: String,
    start: &'a str,
    children: Vec<Node<'a>>,
}

impl<'a> OpenElement<'a> {
    fn close(self, end: Option<&'a str>) -> Node<'a> {
        Node::Element {
            name: self.name,
            start: self.start,
            children: self.children,
            end,
        }
    }
}

fn push_node<'a>(open: &mut [OpenElement<'a>], root: &mut Vec<Node<'a>>, node: Node<'a>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

/// Returns `None` once more than [`MAX_DEPTH`] elements are open at the same time.
fn build_tree(tokens: Vec<Token<'_>>) -> Option<Vec<Node<'_>>> {
    let mut root = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => {
                let collapsed = collapse_whitespace(text);
                if !collapsed.is_empty() {
                    push_node(&mut open, &mut root, Node::Text(collapsed));
                }
            }
            Token::RawText(text) => push_node(&mut open, &mut root, Node::Raw(text)),
            Token::Comment(raw) | Token::Declaration(raw) => {
                push_node(&mut open, &mut root, Node::Verbatim(raw))
            }
            Token::StartTag { name, raw, self_closing } => {
                if self_closing || is_void(&name) {
                    let node = Node::Element { name, start: raw, children: Vec::new(), end: None };
                    push_node(&mut open, &mut root, node);
                } else {
                    if open.len() >= MAX_DEPTH {
                        return None;
                    }
                    open.push(OpenElement { name, start: raw, children: Vec::new() });
                }
            }
            Token::EndTag { name, raw } => {
                let Some(pos) = open.iter().rposition(|e| e.name == name) else {
                    push_node(&mut open, &mut root, Node::Verbatim(raw));
                    continue;
                };

                // Anything opened after the match is closed implicitly
                while open.len() > pos + 1 {
                    if let Some(inner) = open.pop() {
                        let node = inner.close(None);
                        push_node(&mut open, &mut root, node);
                    }
                }
                if let Some(element) = open.pop() {
                    let node = element.close(Some(raw));
                    push_node(&mut open, &mut root, node);
                }
            }
        }
    }

    while let Some(element) = open.pop() {
        let node = element.close(None);
        push_node(&mut open, &mut root, node);
    }

    Some(root)
}

fn emit(node: &Node<'_>, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);

    match node {
        Node::Element { name, start, children, end } => {
            let end_tag = end.unwrap_or("");

            if is_raw_text(name) {
                let mut line = format!("{indent}{start}");
                for child in children {
                    if let Node::Raw(content) = child {
                        line.push_str(content);
                    }
                }
                line.push_str(end_tag);
                lines.push(line);
                return;
            }

            match children.as_slice() {
                [] => lines.push(format!("{indent}{start}{end_tag}")),
                [Node::Text(text)] if end.is_some() => {
                    lines.push(format!("{indent}{start}{text}{end_tag}"))
                }
                _ => {
                    lines.push(format!("{indent}{start}"));
                    for child in children {
                        emit(child, depth + 1, lines);
                    }
                    if let Some(end) = end {
                        lines.push(format!("{indent}{end}"));
                    }
                }
            }
        }
        Node::Text(text) => lines.push(format!("{indent}{text}")),
        Node::Raw(raw) | Node::Verbatim(raw) => lines.push(format!("{indent}{raw}")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedTag {
    name: String,
    is_end: bool,
    self_closing: bool,
}

/// Parses a start or end tag beginning at `start`. Quoted attribute values may
/// contain `>`. Returns `None` when the tag is never closed.
fn parse_tag(bytes: &[u8], start: usize) -> Option<(ParsedTag, usize)> {
    let mut idx = start + 1;
    let mut is_end = false;
    if bytes.get(idx).copied() == Some(b'/') {
        is_end = true;
        idx += 1;
    }

    let name_start = idx;
    while idx < bytes.len() && is_tag_name_char(bytes[idx]) {
        idx += 1;
    }
    if idx == name_start {
        return None;
    }
    let name = String::from_utf8_lossy(&bytes[name_start..idx]).to_ascii_lowercase();

    let mut quote: Option<u8> = None;
    while idx < bytes.len() {
        let byte = bytes[idx];
        match quote {
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None => match byte {
                b'\'' | b'"' => quote = Some(byte),
                b'>' => {
                    let self_closing = !is_end && idx > name_start && bytes[idx - 1] == b'/';
                    return Some((ParsedTag { name, is_end, self_closing }, idx + 1));
                }
                _ => {}
            },
        }
        idx += 1;
    }

    None
}

/// Finds the `</name` that ends a raw-text element, case-insensitively.
fn find_raw_text_end(bytes: &[u8], start: usize, name: &str) -> Option<usize> {
    let name_bytes = name.as_bytes();
    let mut idx = start;

    while let Some(lt) = find_byte(bytes, idx, b'<') {
        if bytes.get(lt + 1).copied() == Some(b'/')
            && starts_with_ignore_ascii_case(bytes, lt + 2, name_bytes)
            && tag_name_boundary(bytes, lt + 2 + name_bytes.len())
        {
            return Some(lt);
        }
        idx = lt + 1;
    }

    None
}

/// Collapses runs of ASCII whitespace. `U+00A0` and other Unicode spaces are content.
pub(crate) fn collapse_whitespace(input: &str) -> String {
    input
        .split(|c: char| c.is_ascii_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn tag_name_boundary(bytes: &[u8], idx: usize) -> bool {
    match bytes.get(idx).copied() {
        None => true,
        Some(byte) => byte.is_ascii_whitespace() || byte == b'>' || byte == b'/',
    }
}

fn is_tag_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

fn starts_with(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx.saturating_add(pattern.len());
    end <= bytes.len() && bytes[idx..end] == *pattern
}

fn starts_with_ignore_ascii_case(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx.saturating_add(pattern.len());
    if end > bytes.len() {
        return false;
    }

    bytes[idx..end]
        .iter()
        .zip(pattern.iter())
        .all(|(left, right)| left.eq_ignore_ascii_case(right))
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }

    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

fn find_byte(bytes: &[u8], from: usize, byte: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|candidate| *candidate == byte)
        .map(|offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_nested_elements() {
        let out = pretty_print(
            "<html><head><title>Hi</title></head><body><p>One</p><p>Two</p></body></html>",
        );
        let expected = [
            "<html>",
            "  <head>",
            "    <title>Hi</title>",
            "  </head>",
            "  <body>",
            "    <p>One</p>",
            "    <p>Two</p>",
            "  </body>",
            "</html>",
        ];
        assert_eq!(out, expected.join("\n"));
    }

    #[test]
    fn single_text_child_stays_inline() {
        assert_eq!(pretty_print("<div>hi</div>"), "<div>hi</div>");
        assert_eq!(pretty_print("<div>\n   hi   there \n</div>"), "<div>hi there</div>");
    }

    #[test]
    fn mixed_content_is_split_per_line() {
        let out = pretty_print("<div>Hello <b>world</b>!</div>");
        assert_eq!(out, "<div>\n  Hello\n  <b>world</b>\n  !\n</div>");
    }

    #[test]
    fn void_and_self_closing_elements_have_no_children() {
        let out = pretty_print("<div><img src=\"a.png\"><br/><input type=\"text\" /><span></span></div>");
        assert_eq!(
            out,
            "<div>\n  <img src=\"a.png\">\n  <br/>\n  <input type=\"text\" />\n  <span></span>\n</div>"
        );
    }

    #[test]
    fn doctype_and_comments_are_kept() {
        let out = pretty_print("<!DOCTYPE html><!-- note --><html><body></body></html>");
        assert_eq!(out, "<!DOCTYPE html>\n<!-- note -->\n<html>\n  <body></body>\n</html>");
    }

    #[test]
    fn raw_text_content_is_verbatim() {
        let input = "<body><pre>  a\n    b</pre><script>if (a < b && c > d) { x(); }</script></body>";
        let out = pretty_print(input);
        assert_eq!(
            out,
            "<body>\n  <pre>  a\n    b</pre>\n  <script>if (a < b && c > d) { x(); }</script>\n</body>"
        );
    }

    #[test]
    fn quoted_attributes_may_contain_angle_brackets() {
        let out = pretty_print("<div title=\"a > b\"><p>x</p></div>");
        assert_eq!(out, "<div title=\"a > b\">\n  <p>x</p>\n</div>");
    }

    #[test]
    fn end_tag_closes_nearest_match() {
        let out = pretty_print("<div><p><b>bold</div>");
        assert_eq!(out, "<div>\n  <p>\n    <b>\n      bold\n</div>");
    }

    #[test]
    fn stray_end_tags_are_kept() {
        let out = pretty_print("<div>x</div></span>");
        assert_eq!(out, "<div>x</div>\n</span>");
    }

    #[test]
    fn lone_angle_brackets_are_text() {
        assert_eq!(pretty_print("<p>1 < 2</p>"), "<p>1 < 2</p>");
    }

    #[test]
    fn unparseable_input_is_returned_unchanged() {
        for input in [
            "<div>unterminated <span",
            "<!-- never closed",
            "<!DOCTYPE html",
            "<a href=\"open>text</a>",
        ] {
            assert_eq!(pretty_print(input), input);
        }
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(pretty_print(""), "");
        assert_eq!(pretty_print("   \n "), "   \n ");
    }

    #[test]
    fn non_ascii_content_survives() {
        let out = pretty_print("<p>héllo ☃</p><p>日本語</p>");
        assert_eq!(out, "<p>héllo ☃</p>\n<p>日本語</p>");
    }

    #[test]
    fn formatting_is_idempotent_on_samples() {
        for input in [
            "<html><head><title>Hi</title></head><body><p>One</p></body></html>",
            "<div>Hello <b>world</b>!</div>",
            "<ul><li>a</li><li>b <i>c</i></li></ul>",
            "<body><pre>  a\n    b</pre><script>let x = 1;</script></body>",
            "<div><p><b>bold</div>",
            "<!DOCTYPE html><!-- c\n  multi --><html></html>",
        ] {
            let once = pretty_print(input);
            assert_eq!(pretty_print(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn deep_nesting_is_returned_unchanged() {
        let input = format!("{}x{}", "<div>".repeat(50_000), "</div>".repeat(50_000));
        assert_eq!(pretty_print(&input), input);

        let unclosed = "<span>".repeat(MAX_DEPTH + 1);
        assert_eq!(pretty_print(&unclosed), unclosed);
    }

    #[test]
    fn nesting_up_to_the_limit_is_formatted() {
        let input = format!("{}x{}", "<i>".repeat(MAX_DEPTH), "</i>".repeat(MAX_DEPTH));
        let out = pretty_print(&input);

        assert_ne!(out, input);
        assert_eq!(out.lines().count(), 2 * MAX_DEPTH - 1);
        let innermost = format!("{}<i>x</i>", INDENT.repeat(MAX_DEPTH - 1));
        assert!(out.lines().any(|line| line == innermost));
    }

    #[test]
    fn non_breaking_spaces_are_content() {
        assert_eq!(pretty_print("<p>a\u{a0}\u{a0}b  c</p>"), "<p>a\u{a0}\u{a0}b c</p>");
        assert_eq!(collapse_whitespace(" \t a \u{a0} \n"), "a \u{a0}");
    }

    #[test]
    fn tokenizer_reports_offsets() {
        assert_eq!(tokenize("ab<div").unwrap_err(), MarkupError::UnterminatedTag(2));
        assert_eq!(tokenize("<!--x").unwrap_err(), MarkupError::UnterminatedComment(0));
    }
}
