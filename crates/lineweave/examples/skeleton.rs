#![forbid(unsafe_code)]

//! The smallest useful application: one mode built from closures.

use lineweave::{App, Context, Frame, FnMode, key};

fn main() -> Result<(), lineweave::Error> {
    let mode = FnMode::new(
        |rows, _cols| {
            let mut frame = Frame::blank(rows as usize);
            // Render your app into the lines of the frame.
            frame.set_line(0, "Press q to quit.");
            frame
        },
        |input, ctx: &mut Context<'_>| {
            if input == "q" || input == key::CTRL_C {
                ctx.quit();
            }
        },
    );

    let mut app = App::new();
    app.add_mode(0, mode);
    app.run()
}
