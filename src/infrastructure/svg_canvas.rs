// SVG drawing surface - Chart frames rendered as standalone SVG documents
use crate::application::drawing_surface::{DrawingSurface, Stroke, TextAnchor, TextStyle};
use kurbo::{BezPath, Point, Rect, Size};

#[derive(Debug, Clone)]
pub struct SvgCanvas {
    size: Size,
    defs: String,
    body: String,
    gradients: usize,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            defs: String::new(),
            body: String::new(),
            gradients: 0,
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn stroke_attrs(stroke: &Stroke<'_>) -> String {
    let mut attrs = format!(r#"stroke="{}" stroke-width="{}""#, escape(stroke.color), stroke.width);
    if stroke.opacity < 1.0 {
        attrs.push_str(&format!(r#" stroke-opacity="{}""#, stroke.opacity));
    }
    attrs
}

impl DrawingSurface for SvgCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.defs.clear();
        self.body.clear();
        self.gradients = 0;
    }

    fn fill_gradient(&mut self, rect: Rect, top: &str, bottom: &str) {
        self.gradients += 1;
        let id = format!("bg{}", self.gradients);
        self.defs.push_str(&format!(
            r#"<linearGradient id="{id}" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient>"#,
            escape(top),
            escape(bottom)
        ));
        self.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="url(#{id})"/>"#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        ));
    }

    fn fill_path(&mut self, path: &BezPath, color: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<path d="{}" fill="{}" fill-opacity="{}"/>"#,
            path.to_svg(),
            escape(color),
            opacity
        ));
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke<'_>) {
        self.body.push_str(&format!(
            r#"<path d="{}" fill="none" {} stroke-linecap="round" stroke-linejoin="round"/>"#,
            path.to_svg(),
            stroke_attrs(stroke)
        ));
    }

    fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: &Stroke<'_>) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" {}/>"#,
            center.x,
            center.y,
            radius,
            escape(fill),
            stroke_attrs(stroke)
        ));
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle<'_>) {
        let anchor = match style.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let weight = if style.bold { "bold" } else { "normal" };
        let transform = style
            .rotate
            .map(|deg| format!(r#" transform="rotate({} {:.2} {:.2})""#, deg, at.x, at.y))
            .unwrap_or_default();

        self.body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-family="Inter, sans-serif" font-size="{}" font-weight="{}" text-anchor="{}"{}>{}</text>"#,
            at.x,
            at.y,
            escape(style.color),
            style.size,
            weight,
            anchor,
            transform,
            escape(text)
        ));
    }

    fn encode(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{}</defs>{}</svg>"#,
            self.defs,
            self.body,
            w = self.size.width,
            h = self.size.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::drawing_surface::line;

    #[test]
    fn test_empty_canvas_is_valid_svg() {
        let canvas = SvgCanvas::new(800.0, 400.0);
        let svg = canvas.encode();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 800 400""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_text_is_escaped_and_rotated() {
        let mut canvas = SvgCanvas::new(800.0, 400.0);
        let style = TextStyle::new("#334155", 14.0).bold().rotate(-90.0);
        canvas.text("BS&W <%>", Point::new(20.0, 200.0), &style);

        let svg = canvas.encode();
        assert!(svg.contains("BS&amp;W &lt;%&gt;"));
        assert!(svg.contains(r#"transform="rotate(-90 20.00 200.00)""#));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut canvas = SvgCanvas::new(100.0, 100.0);
        canvas.fill_gradient(Rect::new(0.0, 0.0, 100.0, 100.0), "#f8fafc", "#ffffff");
        canvas.stroke_path(
            &line(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
            &Stroke::new("#e2e8f0", 1.0).with_opacity(0.5),
        );
        let svg = canvas.encode();
        assert!(svg.contains(r#"fill="url(#bg1)""#));
        assert!(svg.contains(r#"stroke-opacity="0.5""#));

        canvas.clear();
        canvas.circle(Point::new(5.0, 5.0), 4.0, "#2563eb", &Stroke::new("#ffffff", 2.0));
        let svg = canvas.encode();
        assert!(!svg.contains("linearGradient"));
        assert_eq!(svg.matches("<circle").count(), 1);
    }
}
