use crate::body::classify::{classify, parse_json, ContentKind};
use crate::body::markup::pretty_print;

/// Message shown when a body labelled JSON fails to parse at render time.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON content";

/// JSON nested deeper than this is shown as received.
pub(crate) const MAX_REINDENT_DEPTH: usize = 256;

/// Code view shows formatted source, preview shows an interpreted rendering.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Code,
    Preview,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Code => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Code,
        }
    }

    /// Label next to the mode switch.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Code => "Code",
            ViewMode::Preview => "Rendered",
        }
    }
}

/// Raw shows markup as received, pretty reindents it. Ignored for JSON and text.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Formatting {
    Raw,
    #[default]
    Pretty,
}

impl Formatting {
    pub fn toggled(self) -> Self {
        match self {
            Formatting::Raw => Formatting::Pretty,
            Formatting::Pretty => Formatting::Raw,
        }
    }

    /// Label next to the formatting switch.
    pub fn label(&self) -> &'static str {
        match self {
            Formatting::Raw => "Raw",
            Formatting::Pretty => "Pretty",
        }
    }
}

/// Toggle state of the body view. Starts as `{Code, Pretty}`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BodyViewState {
    pub mode: ViewMode,
    pub formatting: Formatting,
}

impl BodyViewState {
    pub fn new(mode: ViewMode, formatting: Formatting) -> Self {
        Self { mode, formatting }
    }
}

/// What the body section should show for one body and one view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayPayload {
    /// Source text shown as-is in a code block
    SourceText { text: String, language: &'static str },
    /// Markup to be interpreted and rendered
    RenderedMarkup { html: String },
    /// The body could not be displayed
    Error { message: String },
}

impl DisplayPayload {
    /// The string carried by the payload, whatever its kind.
    pub fn as_str(&self) -> &str {
        match self {
            DisplayPayload::SourceText { text, .. } => text,
            DisplayPayload::RenderedMarkup { html } => html,
            DisplayPayload::Error { message } => message,
        }
    }
}

/// Derives the display payload for `body` under `state`.
///
/// | mode    | JSON                 | markup                        | text     |
/// |---------|----------------------|-------------------------------|----------|
/// | code    | source, 2-space JSON | source, pretty or raw         | verbatim |
/// | preview | source, 2-space JSON | rendered markup, pretty or raw| verbatim |
///
/// Nothing is cached: JSON is parsed again on every call.
pub fn render(body: &str, state: BodyViewState) -> DisplayPayload {
    derive(body, classify(body), state)
}

pub(crate) fn derive(body: &str, kind: ContentKind, state: BodyViewState) -> DisplayPayload {
    match kind {
        ContentKind::Json => match reformat_json(body) {
            Ok(text) => DisplayPayload::SourceText { text, language: kind.language() },
            Err(e) => {
                log::warn!("body classified as JSON failed to parse at render time: {e}");
                DisplayPayload::Error { message: INVALID_JSON_MESSAGE.to_string() }
            }
        },
        ContentKind::Markup => {
            let markup = match state.formatting {
                Formatting::Pretty => pretty_print(body),
                Formatting::Raw => body.to_string(),
            };
            match state.mode {
                ViewMode::Code => DisplayPayload::SourceText { text: markup, language: kind.language() },
                ViewMode::Preview => DisplayPayload::RenderedMarkup { html: markup },
            }
        }
        ContentKind::Text => DisplayPayload::SourceText {
            text: body.to_string(),
            language: kind.language(),
        },
    }
}

/// Parses and re-serializes with 2-space indentation, keeping key order and
/// number text.
fn reformat_json(body: &str) -> Result<String, serde_json::Error> {
    let depth = nesting_depth(body);
    if depth > MAX_REINDENT_DEPTH {
        // Still has to be valid, only the reindent is skipped
        parse_json::<serde::de::IgnoredAny>(body)?;
        log::debug!("JSON body nested {depth} levels deep shown as received");
        return Ok(body.to_string());
    }

    let value: serde_json::Value = parse_json(body)?;
    serde_json::to_string_pretty(&value)
}

/// Deepest bracket nesting outside of string literals.
fn nesting_depth(body: &str) -> usize {
    let mut depth = 0_usize;
    let mut deepest = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in body.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Body plus toggle state for the results view.
///
/// Loading a new body resets the toggles. The display payload is derived
/// from `(body, state)` on every call.
#[derive(Debug, Clone, Default)]
pub struct BodyViewModel {
    body: String,
    state: BodyViewState,
}

impl BodyViewModel {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            state: BodyViewState::default(),
        }
    }

    /// Replaces the body and resets the state to `{Code, Pretty}`.
    pub fn load(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.state = BodyViewState::default();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn state(&self) -> BodyViewState {
        self.state
    }

    pub fn kind(&self) -> ContentKind {
        classify(&self.body)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Badge text: the content kind, or `N/A` when there is no body.
    pub fn badge(&self) -> &'static str {
        if self.is_empty() {
            "N/A"
        } else {
            self.kind().badge()
        }
    }

    /// The raw/pretty switch only applies to markup.
    pub fn shows_formatting_toggle(&self) -> bool {
        self.kind() == ContentKind::Markup
    }

    pub fn toggle_mode(&mut self) {
        self.state.mode = self.state.mode.toggled();
    }

    pub fn toggle_formatting(&mut self) {
        self.state.formatting = self.state.formatting.toggled();
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.state.mode = mode;
    }

    pub fn set_formatting(&mut self, formatting: Formatting) {
        self.state.formatting = formatting;
    }

    pub fn display(&self) -> DisplayPayload {
        render(&self.body, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> [BodyViewState; 4] {
        [
            BodyViewState::new(ViewMode::Code, Formatting::Raw),
            BodyViewState::new(ViewMode::Code, Formatting::Pretty),
            BodyViewState::new(ViewMode::Preview, Formatting::Raw),
            BodyViewState::new(ViewMode::Preview, Formatting::Pretty),
        ]
    }

    #[test]
    fn json_body_is_reindented_in_every_mode() {
        let expected = DisplayPayload::SourceText {
            text: "{\n  \"a\": 1\n}".to_string(),
            language: "json",
        };

        for state in all_states() {
            assert_eq!(render(r#"{"a":1}"#, state), expected);
        }
    }

    #[test]
    fn json_keeps_key_order() {
        let out = render(r#"{"z":1,"a":{"y":[1,2],"b":null}}"#, BodyViewState::default());
        assert_eq!(
            out.as_str(),
            "{\n  \"z\": 1,\n  \"a\": {\n    \"y\": [\n      1,\n      2\n    ],\n    \"b\": null\n  }\n}"
        );
    }

    #[test]
    fn markup_follows_both_toggles() {
        let body = "<div><p>hi</p></div>";
        let pretty = "<div>\n  <p>hi</p>\n</div>";

        let code_pretty = render(body, BodyViewState::new(ViewMode::Code, Formatting::Pretty));
        assert_eq!(code_pretty, DisplayPayload::SourceText { text: pretty.into(), language: "markup" });

        let code_raw = render(body, BodyViewState::new(ViewMode::Code, Formatting::Raw));
        assert_eq!(code_raw, DisplayPayload::SourceText { text: body.into(), language: "markup" });

        let preview_pretty = render(body, BodyViewState::new(ViewMode::Preview, Formatting::Pretty));
        assert_eq!(preview_pretty, DisplayPayload::RenderedMarkup { html: pretty.into() });

        let preview_raw = render(body, BodyViewState::new(ViewMode::Preview, Formatting::Raw));
        assert_eq!(preview_raw, DisplayPayload::RenderedMarkup { html: body.into() });
    }

    #[test]
    fn text_is_verbatim_in_every_mode() {
        let body = "plain text, no tags\n  with indentation";
        for state in all_states() {
            assert_eq!(
                render(body, state),
                DisplayPayload::SourceText { text: body.into(), language: "text" }
            );
        }
    }

    #[test]
    fn numbers_keep_their_text() {
        let out = render("[1e400, 1.0, 123456789012345678901234567890]", BodyViewState::default());
        assert_eq!(out.as_str(), "[\n  1e400,\n  1.0,\n  123456789012345678901234567890\n]");
    }

    #[test]
    fn deeply_nested_json_is_reindented_up_to_the_limit() {
        let nested = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let out = render(&nested, BodyViewState::default());
        assert_eq!(out.as_str().lines().count(), 399);

        let deep = format!("{}{}", "[".repeat(50_000), "]".repeat(50_000));
        assert_eq!(
            render(&deep, BodyViewState::default()),
            DisplayPayload::SourceText { text: deep.clone(), language: "json" }
        );
    }

    #[test]
    fn nesting_depth_ignores_brackets_in_strings() {
        assert_eq!(nesting_depth(r#"{"a":[["[[[\"{"]]}"#), 3);
        assert_eq!(nesting_depth("42"), 0);
    }

    #[test]
    fn mislabelled_json_renders_error() {
        let out = derive("{not json", ContentKind::Json, BodyViewState::default());
        assert_eq!(out, DisplayPayload::Error { message: INVALID_JSON_MESSAGE.into() });
    }

    #[test]
    fn model_starts_in_code_pretty_and_resets_on_load() {
        let mut model = BodyViewModel::new("<b>x</b>");
        assert_eq!(model.state(), BodyViewState::new(ViewMode::Code, Formatting::Pretty));

        model.toggle_mode();
        model.toggle_formatting();
        assert_eq!(model.state(), BodyViewState::new(ViewMode::Preview, Formatting::Raw));
        assert_eq!(model.display(), DisplayPayload::RenderedMarkup { html: "<b>x</b>".into() });

        model.load("{}");
        assert_eq!(model.state(), BodyViewState::default());
        assert_eq!(model.kind(), ContentKind::Json);
    }

    #[test]
    fn formatting_toggle_only_for_markup() {
        assert!(BodyViewModel::new("<p>x</p>").shows_formatting_toggle());
        assert!(!BodyViewModel::new("[1]").shows_formatting_toggle());
        assert!(!BodyViewModel::new("hello").shows_formatting_toggle());
        assert!(!BodyViewModel::new("").shows_formatting_toggle());
    }

    #[test]
    fn badge_reflects_kind_or_missing_body() {
        assert_eq!(BodyViewModel::new("").badge(), "N/A");
        assert_eq!(BodyViewModel::new("<p>x</p>").badge(), "HTML");
        assert_eq!(BodyViewModel::new("true").badge(), "JSON");
        assert_eq!(BodyViewModel::new("words").badge(), "TEXT");
    }

    #[test]
    fn labels() {
        assert_eq!(ViewMode::Code.label(), "Code");
        assert_eq!(ViewMode::Preview.label(), "Rendered");
        assert_eq!(Formatting::Raw.label(), "Raw");
        assert_eq!(Formatting::Pretty.label(), "Pretty");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::body::classify::property_tests::arb_json;
    use proptest::prelude::*;

    proptest! {
        /// Property: code view of a JSON body parses back to the same value.
        #[test]
        fn json_code_view_round_trips(
            value in arb_json(),
            formatting in prop_oneof![Just(Formatting::Raw), Just(Formatting::Pretty)],
        ) {
            let body = serde_json::to_string(&value).unwrap();
            let out = render(&body, BodyViewState::new(ViewMode::Code, formatting));

            let DisplayPayload::SourceText { text, language } = out else {
                return Err(TestCaseError::fail("expected source text"));
            };
            prop_assert_eq!(language, "json");

            let original: serde_json::Value = serde_json::from_str(&body).unwrap();
            let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(reparsed, original);
        }

        /// Property: every state yields a payload for arbitrary input.
        #[test]
        fn render_is_total(body in ".*", preview in any::<bool>(), pretty in any::<bool>()) {
            let state = BodyViewState::new(
                if preview { ViewMode::Preview } else { ViewMode::Code },
                if pretty { Formatting::Pretty } else { Formatting::Raw },
            );
            let _ = render(&body, state);
        }
    }
}
