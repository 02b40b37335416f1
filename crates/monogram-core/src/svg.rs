use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Square,
}

/// Inputs for [`render_avatar_svg`].
#[derive(Debug, Clone)]
pub struct AvatarMarkup<'a> {
    pub initials: &'a str,
    /// Background fill.
    pub primary: Rgb,
    /// Initials fill.
    pub secondary: Rgb,
    pub size: u32,
    /// Stylesheet to `@import`; `None` when the renderer cannot load it.
    pub font_stylesheet: Option<&'a str>,
    pub font_face_css: &'a str,
    pub font_family: &'a str,
    pub shape: Shape,
    /// Inline `font_face_css` when no stylesheet reference is usable.
    pub inline_font_css: bool,
}

pub fn render_avatar_svg(m: &AvatarMarkup<'_>) -> String {
    let size = m.size.max(1);
    let mut out = String::with_capacity(512);
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );

    let bundled_font = match (m.font_stylesheet, m.inline_font_css) {
        (Some(sheet), _) => {
            out.push_str("<style>@import url(&quot;");
            escape_xml_into(&mut out, sheet);
            out.push_str("&quot;);</style>");
            true
        }
        (None, true) if !m.font_face_css.is_empty() => {
            out.push_str("<style>");
            escape_xml_into(&mut out, m.font_face_css);
            out.push_str("</style>");
            true
        }
        _ => false,
    };

    match m.shape {
        Shape::Circle => {
            let r = fmt(f64::from(size) / 2.0);
            let _ = write!(
                &mut out,
                r#"<circle cx="{r}" cy="{r}" r="{r}" fill="{}"/>"#,
                m.primary
            );
        }
        Shape::Square => {
            let _ = write!(
                &mut out,
                r#"<rect width="{size}" height="{size}" fill="{}"/>"#,
                m.primary
            );
        }
    }

    let family = if bundled_font {
        format!("'{}', sans-serif", m.font_family)
    } else {
        "sans-serif".to_string()
    };
    let _ = write!(
        &mut out,
        r#"<text x="50%" y="50%" dominant-baseline="central" text-anchor="middle" fill="{}" font-family=""#,
        m.secondary
    );
    escape_xml_into(&mut out, &family);
    let _ = write!(
        &mut out,
        r#"" font-size="{}">"#,
        fmt(f64::from(size) * 0.4)
    );
    escape_xml_into(&mut out, m.initials);
    out.push_str("</text></svg>");
    out
}

/// Formats a length with at most three decimals and no trailing zeros.
fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let esc = match b {
            b'&' => Some("&amp;"),
            b'<' => Some("&lt;"),
            b'>' => Some("&gt;"),
            b'"' => Some("&quot;"),
            b'\'' => Some("&#39;"),
            _ => None,
        };
        let Some(esc) = esc else {
            continue;
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(initials: &str) -> AvatarMarkup<'_> {
        AvatarMarkup {
            initials,
            primary: Rgb::new(255, 231, 255),
            secondary: Rgb::new(46, 1, 59),
            size: 44,
            font_stylesheet: None,
            font_face_css: "",
            font_family: "Open Sans",
            shape: Shape::Circle,
            inline_font_css: false,
        }
    }

    #[test]
    fn circle_avatar_without_font() {
        let svg = render_avatar_svg(&markup("KB"));
        assert_eq!(
            svg,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="44" height="44" viewBox="0 0 44 44">"#,
                r#"<circle cx="22" cy="22" r="22" fill="rgb(255,231,255)"/>"#,
                r#"<text x="50%" y="50%" dominant-baseline="central" text-anchor="middle" fill="rgb(46,1,59)" font-family="sans-serif" font-size="17.6">KB</text>"#,
                "</svg>"
            )
        );
    }

    #[test]
    fn square_avatar_uses_rect() {
        let mut m = markup("M");
        m.shape = Shape::Square;
        m.size = 25;
        let svg = render_avatar_svg(&m);
        assert!(svg.contains(r#"<rect width="25" height="25" fill="rgb(255,231,255)"/>"#));
        assert!(svg.contains(r#"font-size="10""#));
    }

    #[test]
    fn stylesheet_is_imported_and_family_requested() {
        let mut m = markup("KB");
        m.font_stylesheet = Some("data:text/css;base64,QA==");
        let svg = render_avatar_svg(&m);
        assert!(svg.contains("<style>@import url(&quot;data:text/css;base64,QA==&quot;);</style>"));
        assert!(svg.contains(r#"font-family="&#39;Open Sans&#39;, sans-serif""#));
    }

    #[test]
    fn css_is_inlined_only_on_request() {
        let mut m = markup("KB");
        m.font_face_css = "@font-face { font-family: \"Open Sans\"; }";
        assert!(!render_avatar_svg(&m).contains("<style>"));

        m.inline_font_css = true;
        let svg = render_avatar_svg(&m);
        assert!(svg.contains("<style>@font-face { font-family: &quot;Open Sans&quot;; }</style>"));
    }

    #[test]
    fn initials_are_escaped() {
        let svg = render_avatar_svg(&markup("<&>"));
        assert!(svg.contains(">&lt;&amp;&gt;</text>"));
        roxmltree::Document::parse(&svg).expect("well-formed svg");
    }

    #[test]
    fn empty_initials_still_render() {
        let svg = render_avatar_svg(&markup(""));
        let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
        let text = doc
            .descendants()
            .find(|n| n.has_tag_name("text"))
            .expect("text node");
        assert_eq!(text.text(), None);
    }

    #[test]
    fn fmt_trims_trailing_zeros() {
        assert_eq!(fmt(22.0), "22");
        assert_eq!(fmt(17.6), "17.6");
        assert_eq!(fmt(0.4), "0.4");
        assert_eq!(fmt(f64::NAN), "0");
    }
}
