use crate::body::{BodyViewModel, DisplayPayload, ViewMode};
use crate::net::AnalysisResult;
use crate::render::preview::markup_to_text;
use std::fmt;

pub const PAGE_TITLE: &str = "Analysis Results";
pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const NO_DATA_PLACEHOLDER: &str = "No analysis data";
pub const NO_BODY_PLACEHOLDER: &str = "No body content available";

const INDENT: &str = "  ";

/// Load state shared by every section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState<T> {
    /// Data is on its way; show a placeholder
    Loading,
    /// Nothing to show
    Empty,
    /// Data to render
    Ready(T),
}

impl<T> SectionState<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SectionState<U> {
        match self {
            SectionState::Loading => SectionState::Loading,
            SectionState::Empty => SectionState::Empty,
            SectionState::Ready(value) => SectionState::Ready(f(value)),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }
}

impl<T> From<Option<T>> for SectionState<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(SectionState::Empty, SectionState::Ready)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
    Destructive,
}

impl BadgeVariant {
    /// Below 400 is neutral; 400 and up, out-of-range codes included, is destructive.
    pub fn for_status(status_code: i64) -> Self {
        if status_code < 400 {
            BadgeVariant::Default
        } else {
            BadgeVariant::Destructive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub variant: BadgeVariant,
}

impl Badge {
    pub fn new(text: impl Into<String>, variant: BadgeVariant) -> Self {
        Self { text: text.into(), variant }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            BadgeVariant::Destructive => write!(f, "[!{}]", self.text),
            _ => write!(f, "[{}]", self.text),
        }
    }
}

/// Writes `name:` / value rows with the values aligned.
fn write_rows(f: &mut fmt::Formatter<'_>, rows: &[(&str, String)]) -> fmt::Result {
    let width = rows.iter().map(|(name, _)| name.chars().count() + 1).max().unwrap_or(0);
    for (name, value) in rows {
        writeln!(f, "{INDENT}{:<width$} {}", format!("{name}:"), value)?;
    }
    Ok(())
}

fn write_placeholder(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    writeln!(f, "{INDENT}{text}")
}

fn write_indented(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for line in text.lines() {
        if line.is_empty() {
            writeln!(f)?;
        } else {
            writeln!(f, "{INDENT}{line}")?;
        }
    }
    Ok(())
}

/// Response headers in arrival order, plus the protocol version badge.
#[derive(Debug, Clone, Copy)]
pub struct HeadersSection<'a> {
    state: SectionState<&'a AnalysisResult>,
}

impl<'a> HeadersSection<'a> {
    pub const TITLE: &'static str = "Response Headers";

    pub fn new(state: SectionState<&'a AnalysisResult>) -> Self {
        Self { state }
    }

    pub fn version_badge(&self) -> Option<Badge> {
        match self.state {
            SectionState::Ready(result) => Some(Badge::new(result.http_version.as_str(), BadgeVariant::Secondary)),
            _ => None,
        }
    }

    pub fn rows(&self) -> Vec<(&'a str, &'a str)> {
        match self.state {
            SectionState::Ready(result) => result.headers.iter().collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for HeadersSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version_badge() {
            Some(badge) => writeln!(f, "{}  {}", Self::TITLE, badge)?,
            None => writeln!(f, "{}", Self::TITLE)?,
        }

        match self.state {
            SectionState::Loading => write_placeholder(f, LOADING_PLACEHOLDER),
            SectionState::Empty => write_placeholder(f, NO_DATA_PLACEHOLDER),
            SectionState::Ready(_) => {
                let rows: Vec<(&str, String)> = self.rows().into_iter().map(|(n, v)| (n, v.to_string())).collect();
                write_rows(f, &rows)
            }
        }
    }
}

/// Status code, content length and service name.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSection<'a> {
    state: SectionState<&'a AnalysisResult>,
}

impl<'a> AnalysisSection<'a> {
    pub const TITLE: &'static str = "Response Analysis";

    pub fn new(state: SectionState<&'a AnalysisResult>) -> Self {
        Self { state }
    }

    pub fn status_badge(&self) -> Option<Badge> {
        match self.state {
            SectionState::Ready(result) => Some(Badge::new(
                result.status_code.to_string(),
                BadgeVariant::for_status(result.status_code),
            )),
            _ => None,
        }
    }

    pub fn service_badge(&self) -> Option<Badge> {
        match self.state {
            SectionState::Ready(result) => Some(Badge::new(result.service_name.as_str(), BadgeVariant::Outline)),
            _ => None,
        }
    }

    pub fn content_length(&self) -> Option<&'a str> {
        match self.state {
            SectionState::Ready(result) => Some(result.content_length.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Self::TITLE)?;

        match (self.status_badge(), self.content_length(), self.service_badge()) {
            (Some(status), Some(length), Some(service)) => write_rows(
                f,
                &[
                    ("Status Code", status.to_string()),
                    ("Content Length", length.to_string()),
                    ("Service Name", service.to_string()),
                ],
            ),
            _ if self.state.is_loading() => write_placeholder(f, LOADING_PLACEHOLDER),
            _ => write_placeholder(f, NO_DATA_PLACEHOLDER),
        }
    }
}

/// What the body section shows below its header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContent {
    Loading,
    Placeholder(&'static str),
    Display(DisplayPayload),
}

/// Response body with its content badge and view toggles.
#[derive(Debug, Clone, Copy)]
pub struct BodySection<'a> {
    state: SectionState<&'a BodyViewModel>,
}

impl<'a> BodySection<'a> {
    pub const TITLE: &'static str = "Response Body";

    pub fn new(state: SectionState<&'a BodyViewModel>) -> Self {
        Self { state }
    }

    /// `JSON`, `HTML` or `TEXT`; `N/A` for an empty body.
    pub fn badge(&self) -> Option<Badge> {
        match self.state {
            SectionState::Ready(model) => Some(Badge::new(model.badge(), BadgeVariant::Secondary)),
            _ => None,
        }
    }

    pub fn mode_label(&self) -> &'static str {
        match self.state {
            SectionState::Ready(model) => model.state().mode.label(),
            _ => ViewMode::default().label(),
        }
    }

    /// Only present when the body is markup.
    pub fn formatting_label(&self) -> Option<&'static str> {
        match self.state {
            SectionState::Ready(model) if model.shows_formatting_toggle() => Some(model.state().formatting.label()),
            _ => None,
        }
    }

    pub fn content(&self) -> BodyContent {
        match self.state {
            SectionState::Loading => BodyContent::Loading,
            SectionState::Empty => BodyContent::Placeholder(NO_BODY_PLACEHOLDER),
            SectionState::Ready(model) if model.is_empty() => BodyContent::Placeholder(NO_BODY_PLACEHOLDER),
            SectionState::Ready(model) => BodyContent::Display(model.display()),
        }
    }
}

impl fmt::Display for BodySection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::TITLE)?;
        if let Some(badge) = self.badge() {
            write!(f, "  {badge}")?;
        }
        write!(f, "  {}", self.mode_label())?;
        if let Some(label) = self.formatting_label() {
            write!(f, "  {label}")?;
        }
        writeln!(f)?;

        match self.content() {
            BodyContent::Loading => write_placeholder(f, LOADING_PLACEHOLDER),
            BodyContent::Placeholder(text) => write_placeholder(f, text),
            BodyContent::Display(DisplayPayload::SourceText { text, .. }) => write_indented(f, &text),
            BodyContent::Display(DisplayPayload::RenderedMarkup { html }) => write_indented(f, &markup_to_text(&html)),
            BodyContent::Display(DisplayPayload::Error { message }) => write_placeholder(f, &message),
        }
    }
}

/// The whole results page: analysis, headers and body, in that order.
#[derive(Debug, Clone, Copy)]
pub struct ResultsPage<'a> {
    pub analysis: AnalysisSection<'a>,
    pub headers: HeadersSection<'a>,
    pub body: BodySection<'a>,
}

impl<'a> ResultsPage<'a> {
    pub fn new(result: SectionState<&'a AnalysisResult>, body: SectionState<&'a BodyViewModel>) -> Self {
        Self {
            analysis: AnalysisSection::new(result),
            headers: HeadersSection::new(result),
            body: BodySection::new(body),
        }
    }

    pub fn loading() -> Self {
        Self::new(SectionState::Loading, SectionState::Loading)
    }
}

impl fmt::Display for ResultsPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{PAGE_TITLE}")?;
        writeln!(f)?;
        writeln!(f, "{}", self.analysis)?;
        writeln!(f, "{}", self.headers)?;
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Formatting;

    fn sample(status_code: i64, body: &str) -> AnalysisResult {
        AnalysisResult {
            headers: [("Server", "nginx"), ("Content-Type", "text/html")].into_iter().collect(),
            http_version: "HTTP/1.1".into(),
            status_code,
            content_length: "1.2 KB".into(),
            service_name: "nginx".into(),
            body: body.into(),
        }
    }

    #[test]
    fn headers_keep_arrival_order_and_show_version() {
        let result = sample(200, "");
        let section = HeadersSection::new(SectionState::Ready(&result));

        assert_eq!(section.rows(), vec![("Server", "nginx"), ("Content-Type", "text/html")]);
        assert_eq!(section.version_badge(), Some(Badge::new("HTTP/1.1", BadgeVariant::Secondary)));
        assert_eq!(
            section.to_string(),
            "Response Headers  [HTTP/1.1]\n  Server:       nginx\n  Content-Type: text/html\n"
        );
    }

    #[test]
    fn status_badge_variant_follows_code() {
        let cases = [
            (200, BadgeVariant::Default),
            (399, BadgeVariant::Default),
            (400, BadgeVariant::Destructive),
            (503, BadgeVariant::Destructive),
            (70000, BadgeVariant::Destructive),
            (-1, BadgeVariant::Default),
        ];
        for (code, variant) in cases {
            let result = sample(code, "");
            let section = AnalysisSection::new(SectionState::Ready(&result));
            assert_eq!(section.status_badge().map(|b| b.variant), Some(variant));
        }
    }

    #[test]
    fn out_of_range_status_is_shown_as_received() {
        let result = sample(70000, "");
        let section = AnalysisSection::new(SectionState::Ready(&result));
        assert_eq!(section.status_badge().map(|b| b.to_string()), Some("[!70000]".to_string()));

        let result = sample(-1, "");
        let section = AnalysisSection::new(SectionState::Ready(&result));
        assert_eq!(section.status_badge().map(|b| b.to_string()), Some("[-1]".to_string()));
    }

    #[test]
    fn analysis_rows() {
        let result = sample(404, "");
        let section = AnalysisSection::new(SectionState::Ready(&result));
        assert_eq!(
            section.to_string(),
            "Response Analysis\n  Status Code:    [!404]\n  Content Length: 1.2 KB\n  Service Name:   [nginx]\n"
        );
    }

    #[test]
    fn every_section_renders_a_loading_placeholder() {
        let page = ResultsPage::loading();
        assert!(page.analysis.to_string().contains(LOADING_PLACEHOLDER));
        assert!(page.headers.to_string().contains(LOADING_PLACEHOLDER));
        assert_eq!(page.body.content(), BodyContent::Loading);
        assert!(page.body.to_string().contains(LOADING_PLACEHOLDER));
    }

    #[test]
    fn empty_page_shows_placeholders() {
        let page = ResultsPage::new(SectionState::Empty, SectionState::Empty);
        let text = page.to_string();

        assert!(text.starts_with("Analysis Results\n"));
        assert!(page.headers.rows().is_empty());
        assert!(page.analysis.status_badge().is_none());
        assert_eq!(page.body.badge(), None);
        assert_eq!(page.body.content(), BodyContent::Placeholder(NO_BODY_PLACEHOLDER));
        assert!(text.contains(NO_DATA_PLACEHOLDER));
        assert!(text.contains(NO_BODY_PLACEHOLDER));
    }

    #[test]
    fn empty_body_shows_na_badge_and_placeholder() {
        let model = BodyViewModel::new("");
        let section = BodySection::new(SectionState::Ready(&model));

        assert_eq!(section.badge(), Some(Badge::new("N/A", BadgeVariant::Secondary)));
        assert_eq!(section.content(), BodyContent::Placeholder(NO_BODY_PLACEHOLDER));
        assert_eq!(section.formatting_label(), None);
        assert_eq!(section.to_string(), "Response Body  [N/A]  Code\n  No body content available\n");
    }

    #[test]
    fn markup_body_shows_both_toggles() {
        let mut model = BodyViewModel::new("<div><p>hi</p></div>");
        let section = BodySection::new(SectionState::Ready(&model));
        assert_eq!(section.mode_label(), "Code");
        assert_eq!(section.formatting_label(), Some("Pretty"));
        assert_eq!(
            section.to_string(),
            "Response Body  [HTML]  Code  Pretty\n  <div>\n    <p>hi</p>\n  </div>\n"
        );

        model.set_mode(ViewMode::Preview);
        model.set_formatting(Formatting::Raw);
        let section = BodySection::new(SectionState::Ready(&model));
        assert_eq!(section.mode_label(), "Rendered");
        assert_eq!(section.formatting_label(), Some("Raw"));
        assert_eq!(section.to_string(), "Response Body  [HTML]  Rendered  Raw\n  hi\n");
    }

    #[test]
    fn json_body_has_no_formatting_toggle() {
        let model = BodyViewModel::new(r#"{"ok":true}"#);
        let section = BodySection::new(SectionState::Ready(&model));
        assert_eq!(section.formatting_label(), None);
        assert_eq!(section.to_string(), "Response Body  [JSON]  Code\n  {\n    \"ok\": true\n  }\n");
    }

    #[test]
    fn full_page_order() {
        let result = sample(200, "hello");
        let model = BodyViewModel::new(result.body.clone());
        let page = ResultsPage::new(SectionState::Ready(&result), SectionState::Ready(&model));
        let text = page.to_string();

        let analysis = text.find(AnalysisSection::TITLE).unwrap();
        let headers = text.find(HeadersSection::TITLE).unwrap();
        let body = text.find(BodySection::TITLE).unwrap();
        assert!(analysis < headers && headers < body);
        assert!(text.ends_with("  hello\n"));
    }

    #[test]
    fn option_converts_to_state() {
        assert_eq!(SectionState::<u8>::from(None), SectionState::Empty);
        assert_eq!(SectionState::from(Some(3)), SectionState::Ready(3));
        assert_eq!(SectionState::Ready(2).map(|n| n * 2), SectionState::Ready(4));
    }
}
