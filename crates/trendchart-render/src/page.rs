//! Standalone HTML page wrapping rendered charts.

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// What a page section shows under its heading.
#[derive(Debug, Clone, Copy)]
pub enum SectionBody<'a> {
    /// Chart markup produced by a renderer
    Chart(&'a str),
    /// Failure text, escaped before output
    Error(&'a str),
}

/// One symbol's slot on the page.
#[derive(Debug, Clone, Copy)]
pub struct PageSection<'a> {
    pub heading: &'a str,
    pub body: SectionBody<'a>,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap chart fragments into a complete document that loads plotly.js.
pub fn render_page(title: &str, sections: &[PageSection<'_>]) -> String {
    let mut s = String::new();

    s.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    s.push_str("<meta charset=\"utf-8\">\n");
    s.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    s.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_CDN));
    s.push_str("<style>.error{color:#b00020;font-family:monospace;}</style>\n");
    s.push_str("</head>\n<body>\n");
    s.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));

    for section in sections {
        s.push_str("<section>\n");
        s.push_str(&format!("<h2>{}</h2>\n", escape_html(section.heading)));
        match section.body {
            SectionBody::Chart(markup) => s.push_str(markup),
            SectionBody::Error(text) => {
                s.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(text)));
            }
        }
        s.push_str("</section>\n");
    }

    s.push_str("</body>\n</html>\n");
    s
}
