#![forbid(unsafe_code)]

//! Echoes every raw token the input loop reads: useful for seeing what
//! byte sequences a terminal actually sends. Arrows adjust the number,
//! q or Ctrl-C quits.

use lineweave::{App, Context, Frame, Mode, key};

struct InputTester {
    number: i64,
    count: u64,
    input: String,
}

impl InputTester {
    const fn new() -> Self {
        Self {
            number: 0,
            count: 0,
            input: String::new(),
        }
    }
}

impl Mode for InputTester {
    fn render(&mut self, rows: u16, _cols: u16) -> Frame {
        let mut frame = Frame::blank(rows as usize);
        frame.set_line(0, "Input Value Tester");
        frame.set_line(1, format!("  Number: {}, Count: {}", self.number, self.count));
        frame.set_line(
            2,
            format!("  Bytes: {:?}, String: {:?}", self.input.as_bytes(), self.input),
        );
        frame.set_line(4, "Arrows change the number. Press q to quit.");
        frame
    }

    fn on_input(&mut self, input: &str, ctx: &mut Context<'_>) {
        self.input = input.to_string();
        self.count += 1;

        match input {
            "q" | key::CTRL_C => ctx.quit(),
            key::UP | key::RIGHT => self.number += 1,
            key::DOWN | key::LEFT => self.number -= 1,
            _ => {}
        }
    }
}

fn main() -> Result<(), lineweave::Error> {
    let mut app = App::new();
    app.add_mode(0, InputTester::new());
    app.run()
}
