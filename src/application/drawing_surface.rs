// Drawing surface abstraction for chart rendering
use kurbo::{BezPath, Point, Rect, Size};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub opacity: f64,
}

impl<'a> Stroke<'a> {
    pub fn new(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub color: &'a str,
    pub size: f64,
    pub bold: bool,
    pub anchor: TextAnchor,
    /// Rotation in degrees around the anchor point
    pub rotate: Option<f64>,
}

impl<'a> TextStyle<'a> {
    pub fn new(color: &'a str, size: f64) -> Self {
        Self {
            color,
            size,
            bold: false,
            anchor: TextAnchor::Start,
            rotate: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// A 2D target the chart renderer draws onto. Implementations own their
/// contents; `clear` starts a fresh frame.
pub trait DrawingSurface: Send + Sync {
    fn size(&self) -> Size;

    fn clear(&mut self);

    /// Vertical linear gradient from `top` to `bottom`
    fn fill_gradient(&mut self, rect: Rect, top: &str, bottom: &str);

    fn fill_path(&mut self, path: &BezPath, color: &str, opacity: f64);

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke<'_>);

    fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: &Stroke<'_>);

    fn text(&mut self, text: &str, at: Point, style: &TextStyle<'_>);

    /// Serialized frame, e.g. an SVG document
    fn encode(&self) -> String;
}

/// Straight segment as a path
pub fn line(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

/// Closed rectangle outline
pub fn rect_path(rect: Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((rect.x0, rect.y0));
    path.line_to((rect.x1, rect.y0));
    path.line_to((rect.x1, rect.y1));
    path.line_to((rect.x0, rect.y1));
    path.close_path();
    path
}

/// Surfaces the dashboard can draw on, looked up by id.
#[derive(Default)]
pub struct Surfaces {
    by_id: HashMap<String, Box<dyn DrawingSurface>>,
}

impl Surfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, surface: Box<dyn DrawingSurface>) {
        self.by_id.insert(id.into(), surface);
    }

    pub fn get(&self, id: &str) -> Option<&dyn DrawingSurface> {
        self.by_id.get(id).map(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn DrawingSurface + 'static)> {
        self.by_id.get_mut(id).map(|s| s.as_mut())
    }
}

impl std::fmt::Debug for Surfaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surfaces")
            .field("ids", &self.by_id.keys().collect::<Vec<_>>())
            .finish()
    }
}
