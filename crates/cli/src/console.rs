use colored::*;

use runtime::canvas::Canvas;

// Prints every drawing operation instead of rendering it
#[derive(Debug, Default)]
pub struct ConsoleCanvas {
    pub operations: usize,
}

impl ConsoleCanvas {
    fn show(&mut self, op: &str, details: String) {
        self.operations += 1;
        println!("  {} {}", op.cyan(), details);
    }
}

impl Canvas for ConsoleCanvas {
    fn set_pen_color(&mut self, red: u8, green: u8, blue: u8) {
        self.show("pen", format!("{}", "■".truecolor(red, green, blue)));
    }

    fn move_to(&mut self, x: i64, y: i64) {
        self.show("moveto", format!("({}, {})", x, y));
    }

    fn draw_to(&mut self, x: i64, y: i64) {
        self.show("drawto", format!("({}, {})", x, y));
    }

    fn draw_rectangle(&mut self, width: u32, height: u32, filled: bool) {
        let fill = if filled { " filled" } else { "" };
        self.show("rectangle", format!("{}x{}{}", width, height, fill));
    }

    fn draw_circle(&mut self, radius: u32, filled: bool) {
        let fill = if filled { " filled" } else { "" };
        self.show("circle", format!("r={}{}", radius, fill));
    }

    fn clear(&mut self) {
        self.show("clear", String::new());
    }

    fn write_text(&mut self, text: &str) {
        self.show("write", text.to_string());
    }
}
