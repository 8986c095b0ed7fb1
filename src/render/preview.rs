//! Text approximation of rendered markup.
//!
//! A terminal cannot lay out HTML, so the preview view shows what a reader
//! would see: text content with block elements on their own lines, list
//! items bulleted, `<br>` as a line break, and `pre`/`textarea` content kept
//! as-is. Script, style and title content is not shown. Entities are decoded.
//!
//! Markup is interpreted, never executed. Nothing is sanitized either; the
//! output is plain text.

use crate::body::classify::TAG_PATTERN;
use crate::body::markup::{collapse_whitespace, tokenize, Token};

/// Renders markup to readable text. Never fails.
///
/// Markup the tokenizer rejects is rendered by stripping anything
/// tag-shaped instead.
pub fn markup_to_text(markup: &str) -> String {
    let tokens = match tokenize(markup) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::debug!("preview falls back to tag stripping: {e}");
            return decode_entities(&collapse_whitespace(&TAG_PATTERN.replace_all(markup, " ")));
        }
    };

    let mut layout = TextLayout::default();
    let mut hidden: Option<String> = None;

    for token in tokens {
        match token {
            Token::StartTag { name, .. } => {
                if hidden.is_some() {
                    continue;
                }
                if is_hidden(&name) {
                    hidden = Some(name);
                    continue;
                }
                match name.as_str() {
                    "br" => layout.line_break(),
                    "li" => {
                        layout.line_break();
                        layout.current.push_str("- ");
                    }
                    "hr" => {
                        layout.line_break();
                        layout.lines.push("---".to_string());
                    }
                    n if is_block(n) => layout.line_break(),
                    _ => {}
                }
            }
            Token::EndTag { name, .. } => {
                if hidden.as_deref() == Some(name.as_str()) {
                    hidden = None;
                } else if hidden.is_none() && is_block(&name) {
                    layout.line_break();
                }
            }
            Token::Text(text) if hidden.is_none() => layout.current.push_str(&decode_entities(text)),
            Token::RawText(text) if hidden.is_none() => layout.preformatted(&decode_entities(text)),
            _ => {}
        }
    }

    layout.finish()
}

#[derive(Default)]
struct TextLayout {
    lines: Vec<String>,
    current: String,
}

impl TextLayout {
    fn line_break(&mut self) {
        let line = collapse_whitespace(&self.current);
        if !line.is_empty() && line != "-" {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn preformatted(&mut self, text: &str) {
        self.line_break();
        let text = text.trim_matches('\n');
        if !text.is_empty() {
            self.lines.extend(text.lines().map(str::to_string));
        }
    }

    fn finish(mut self) -> String {
        self.line_break();
        self.lines.join("\n")
    }
}

fn is_hidden(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "title" | "template" | "noscript")
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "html"
            | "head"
            | "body"
            | "main"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "nav"
            | "aside"
            | "address"
            | "div"
            | "p"
            | "pre"
            | "form"
            | "fieldset"
            | "legend"
            | "ul"
            | "ol"
            | "li"
            | "dl"
            | "dt"
            | "dd"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "figure"
            | "figcaption"
            | "details"
            | "summary"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "blockquote"
            | "textarea"
    )
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0_usize;

    while let Some(rel_amp) = input[cursor..].find('&') {
        let amp = cursor + rel_amp;
        out.push_str(&input[cursor..amp]);

        let rest = &input[(amp + 1)..];
        let Some(rel_semi) = rest.find(';') else {
            out.push('&');
            cursor = amp + 1;
            continue;
        };

        let semi = amp + 1 + rel_semi;
        if let Some(decoded) = decode_entity(&input[(amp + 1)..semi]) {
            out.push(decoded);
            cursor = semi + 1;
        } else {
            out.push('&');
            cursor = amp + 1;
        }
    }

    out.push_str(&input[cursor..]);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "nbsp" => Some('\u{a0}'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "copy" => Some('©'),
        _ => {
            if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                char::from_u32(u32::from_str_radix(hex, 16).ok()?)
            } else if let Some(dec) = entity.strip_prefix('#') {
                char::from_u32(dec.parse::<u32>().ok()?)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_become_lines() {
        let html = "<html><head><title>Ignored</title><style>p{}</style></head>\
                    <body><h1>Title</h1><p>First <b>bold</b> para.</p><div>Second</div></body></html>";
        assert_eq!(markup_to_text(html), "Title\nFirst bold para.\nSecond");
    }

    #[test]
    fn lists_and_breaks() {
        let html = "<ul><li>one</li><li>two</li></ul>line<br>next<hr>end";
        assert_eq!(markup_to_text(html), "- one\n- two\nline\nnext\n---\nend");
    }

    #[test]
    fn preformatted_content_is_kept() {
        let html = "<p>code:</p><pre>fn main() {\n    run();\n}</pre>";
        assert_eq!(markup_to_text(html), "code:\nfn main() {\n    run();\n}");
    }

    #[test]
    fn scripts_are_not_shown() {
        let html = "<div>visible</div><script>alert('x')</script><noscript><p>nojs</p></noscript>";
        assert_eq!(markup_to_text(html), "visible");
    }

    #[test]
    fn inline_elements_do_not_add_spaces() {
        assert_eq!(markup_to_text("<p>Hello<b>!</b></p>"), "Hello!");
        assert_eq!(markup_to_text("<p>un<i>break</i>able, <b>bold</b> text</p>"), "unbreakable, bold text");
    }

    #[test]
    fn non_breaking_spaces_survive() {
        assert_eq!(markup_to_text("<p>a&nbsp;&nbsp;b \u{a0} c</p>"), "a\u{a0}\u{a0}b \u{a0} c");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(markup_to_text("<p>a &lt; b &amp;&amp; c&#x21;&#33; &bogus; &</p>"), "a < b && c!! &bogus; &");
    }

    #[test]
    fn unparseable_markup_falls_back_to_stripping() {
        assert_eq!(markup_to_text("<p>kept</p> text <span"), "kept text <span");
        assert_eq!(markup_to_text("<b>x</b><!-- open"), "x <!-- open");
    }

    #[test]
    fn indentation_from_pretty_printing_does_not_leak() {
        let html = "<div>\n  <p>hi</p>\n  <p>there</p>\n</div>";
        assert_eq!(markup_to_text(html), "hi\nthere");
    }

    #[test]
    fn empty_input() {
        assert_eq!(markup_to_text(""), "");
    }
}
