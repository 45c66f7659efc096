// Drawing surface the primitive commands talk to. Arguments are already
// validated when these are called
pub trait Canvas {
    fn set_pen_color(&mut self, red: u8, green: u8, blue: u8);

    fn move_to(&mut self, x: i64, y: i64);

    fn draw_to(&mut self, x: i64, y: i64);

    fn draw_rectangle(&mut self, width: u32, height: u32, filled: bool);

    fn draw_circle(&mut self, radius: u32, filled: bool);

    fn clear(&mut self);

    fn write_text(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    PenColor(u8, u8, u8),
    MoveTo(i64, i64),
    DrawTo(i64, i64),
    Rectangle { width: u32, height: u32, filled: bool },
    Circle { radius: u32, filled: bool },
    Clear,
    Text(String),
}

// Keeps every call, in order
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn set_pen_color(&mut self, red: u8, green: u8, blue: u8) {
        self.ops.push(DrawOp::PenColor(red, green, blue));
    }

    fn move_to(&mut self, x: i64, y: i64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn draw_to(&mut self, x: i64, y: i64) {
        self.ops.push(DrawOp::DrawTo(x, y));
    }

    fn draw_rectangle(&mut self, width: u32, height: u32, filled: bool) {
        self.ops.push(DrawOp::Rectangle { width, height, filled });
    }

    fn draw_circle(&mut self, radius: u32, filled: bool) {
        self.ops.push(DrawOp::Circle { radius, filled });
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn write_text(&mut self, text: &str) {
        self.ops.push(DrawOp::Text(text.to_string()));
    }
}
