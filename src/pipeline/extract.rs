//! Document scanning: image markers and the text segments that follow them.
//!
//! The exported document alternates between an image (`<img src="…">`) and
//! the text spans describing it. Every marker owns a **window**: the slice
//! from the end of its own `src` attribute to the start of the next marker,
//! or to the end of the document for the last one. Inside a window, plain
//! text spans are the card fields, in order. Only spans whose class is `c`
//! plus a single digit count; wider classes such as `c12` are styled runs.
//!
//! Scanning is expressed as two iterators, [`MarkerWindows`] and
//! [`TextSegments`], each holding its own cursor. Either can be run on an
//! arbitrary substring in tests.

use crate::error::RecordField;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_IMAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

static RE_TEXT_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span class="c\d">([^<]+)</span>"#).unwrap());

/// One `src="…"` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMarker<'a> {
    /// The attribute value, e.g. `images/image1.png`.
    pub src: &'a str,
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset just past the closing quote.
    pub end: usize,
}

/// Iterator over image markers in document order.
#[derive(Debug, Clone)]
pub struct ImageMarkers<'a> {
    html: &'a str,
    cursor: usize,
}

impl<'a> ImageMarkers<'a> {
    pub fn new(html: &'a str) -> Self {
        Self { html, cursor: 0 }
    }
}

impl<'a> Iterator for ImageMarkers<'a> {
    type Item = ImageMarker<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.html.get(self.cursor..)?;
        let caps = RE_IMAGE_MARKER.captures(rest)?;
        let whole = caps.get(0)?;
        let src = caps.get(1)?;
        let marker = ImageMarker {
            src: &rest[src.range()],
            start: self.cursor + whole.start(),
            end: self.cursor + whole.end(),
        };
        self.cursor = marker.end;
        Some(marker)
    }
}

/// An image marker and the text that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerWindow<'a> {
    pub src: &'a str,
    /// Document slice between this marker and the next.
    pub body: &'a str,
}

impl<'a> MarkerWindow<'a> {
    pub fn segments(&self) -> TextSegments<'a> {
        TextSegments::new(self.body)
    }
}

/// Iterator over [`MarkerWindow`]s in document order.
#[derive(Debug, Clone)]
pub struct MarkerWindows<'a> {
    html: &'a str,
    markers: std::iter::Peekable<ImageMarkers<'a>>,
}

impl<'a> MarkerWindows<'a> {
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            markers: ImageMarkers::new(html).peekable(),
        }
    }
}

impl<'a> Iterator for MarkerWindows<'a> {
    type Item = MarkerWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let marker = self.markers.next()?;
        let end = self
            .markers
            .peek()
            .map_or(self.html.len(), |next| next.start);
        Some(MarkerWindow {
            src: marker.src,
            body: &self.html[marker.end..end],
        })
    }
}

/// Iterator over plain-text span bodies inside a window.
#[derive(Debug, Clone)]
pub struct TextSegments<'a> {
    body: &'a str,
    cursor: usize,
}

impl<'a> TextSegments<'a> {
    pub fn new(body: &'a str) -> Self {
        Self { body, cursor: 0 }
    }
}

impl<'a> Iterator for TextSegments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.body.get(self.cursor..)?;
        let caps = RE_TEXT_SEGMENT.captures(rest)?;
        let whole = caps.get(0)?;
        let text = caps.get(1)?;
        self.cursor += whole.end();
        Some(&rest[text.range()])
    }
}

/// The three raw text fields of one window, before cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub title: &'a str,
    pub objective: &'a str,
    pub description: &'a str,
}

/// Why a window does not hold exactly three segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError<'a> {
    /// The first field with no segment.
    Missing(RecordField),
    /// The first segment past the description.
    Extra { fields: RawFields<'a>, text: &'a str },
}

/// Split a window into title, objective and description.
///
/// A window must hold exactly three segments. On a fourth segment the three
/// fields are still returned inside [`WindowError::Extra`] so a lenient
/// caller can keep them.
pub fn split_window<'a>(window: &MarkerWindow<'a>) -> Result<RawFields<'a>, WindowError<'a>> {
    let mut segments = window.segments();
    let mut take = |field: RecordField| segments.next().ok_or(WindowError::Missing(field));

    let fields = RawFields {
        title: take(RecordField::Title)?,
        objective: take(RecordField::Objective)?,
        description: take(RecordField::Description)?,
    };

    match segments.next() {
        None => Ok(fields),
        Some(text) => Err(WindowError::Extra { fields, text }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(class: u32, text: &str) -> String {
        format!(r#"<p class="c3"><span class="c{class}">{text}</span></p>"#)
    }

    fn card(src: &str, texts: &[&str]) -> String {
        let mut s = format!(
            r#"<p><span style="overflow: hidden;"><img alt="" src="{src}" style="width: 200px;" title=""></span></p>"#
        );
        for (i, t) in texts.iter().enumerate() {
            s.push_str(&span(i as u32 + 1, t));
        }
        s
    }

    #[test]
    fn markers_in_document_order() {
        let html = format!("{}{}", card("images/a.png", &[]), card("images/b.jpg", &[]));
        let srcs: Vec<_> = ImageMarkers::new(&html).map(|m| m.src).collect();
        assert_eq!(srcs, vec!["images/a.png", "images/b.jpg"]);
    }

    #[test]
    fn no_markers_means_no_windows() {
        assert_eq!(MarkerWindows::new("<p>plain</p>").count(), 0);
    }

    #[test]
    fn window_stops_at_next_marker() {
        let html = format!(
            "{}{}",
            card("images/a.png", &["A title", "A goal", "A desc"]),
            card("images/b.png", &["B title", "B goal", "B desc"])
        );
        let windows: Vec<_> = MarkerWindows::new(&html).collect();
        assert_eq!(windows.len(), 2);

        let first: Vec<_> = windows[0].segments().collect();
        assert_eq!(first, vec!["A title", "A goal", "A desc"]);
        assert!(!windows[0].body.contains("B title"));

        let last: Vec<_> = windows[1].segments().collect();
        assert_eq!(last, vec!["B title", "B goal", "B desc"]);
    }

    #[test]
    fn text_before_first_marker_is_ignored() {
        let html = format!("{}{}", span(1, "Preface"), card("images/a.png", &["T", "O", "D"]));
        let w = MarkerWindows::new(&html).next().unwrap();
        assert_eq!(w.segments().next(), Some("T"));
    }

    #[test]
    fn segments_skip_styled_and_nested_spans() {
        let body = r#"<span class="c2">Title</span><span style="x">styled</span><span class="c7"><b>bold</b></span><span class="c4">Goal</span>"#;
        let segs: Vec<_> = TextSegments::new(body).collect();
        assert_eq!(segs, vec!["Title", "Goal"]);
    }

    #[test]
    fn multi_digit_class_after_description_is_not_a_segment() {
        let mut html = card("images/a.png", &["T", "O", "D"]);
        html.push_str(r#"<p><span class="c12">footer</span></p>"#);
        let w = MarkerWindows::new(&html).next().unwrap();
        assert_eq!(
            split_window(&w),
            Ok(RawFields { title: "T", objective: "O", description: "D" })
        );
    }

    #[test]
    fn segments_work_on_substrings() {
        let body = r#"junk <span class="c1">one</span> more <span class="c1">two</span>"#;
        let mut it = TextSegments::new(&body[20..]);
        assert_eq!(it.next(), Some("two"));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn split_exact_three() {
        let html = card("images/a.png", &["T", "O", "D"]);
        let w = MarkerWindows::new(&html).next().unwrap();
        assert_eq!(
            split_window(&w),
            Ok(RawFields { title: "T", objective: "O", description: "D" })
        );
    }

    #[test]
    fn split_reports_first_missing_field() {
        let cases = [
            (vec![], RecordField::Title),
            (vec!["T"], RecordField::Objective),
            (vec!["T", "O"], RecordField::Description),
        ];
        for (texts, expected) in cases {
            let html = card("images/a.png", &texts);
            let w = MarkerWindows::new(&html).next().unwrap();
            assert_eq!(split_window(&w), Err(WindowError::Missing(expected)));
        }
    }

    #[test]
    fn split_reports_extra_text_and_keeps_fields() {
        let html = card("images/a.png", &["T", "O", "D", "Stray"]);
        let w = MarkerWindows::new(&html).next().unwrap();
        match split_window(&w) {
            Err(WindowError::Extra { fields, text }) => {
                assert_eq!(text, "Stray");
                assert_eq!(fields.description, "D");
            }
            other => panic!("expected extra text, got {other:?}"),
        }
    }
}
