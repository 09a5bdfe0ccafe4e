#![forbid(unsafe_code)]

//! A searchable table over synthetic service records, refreshed from a
//! background thread to show the table's lock and `AppHandle::redraw` at
//! work.
//!
//! Arrows move the selection, typing extends the search, Escape clears
//! it, Enter reports the selected record, Ctrl-C quits. Set RUST_LOG and
//! redirect stderr to a file to watch the runtime's tracing output.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lineweave::{App, Context, Frame, Mode, key};
use lineweave_widgets::{Record, Table};

struct Service {
    name: &'static str,
    port: u16,
    state: &'static str,
}

impl Record for Service {
    fn field(&self, column: &str) -> String {
        match column {
            "Name" => self.name.to_string(),
            "Port" => self.port.to_string(),
            "State" => self.state.to_string(),
            _ => String::new(),
        }
    }
}

fn services(generation: u64) -> Vec<Service> {
    let flip = generation % 2 == 0;
    vec![
        Service { name: "ingress", port: 443, state: if flip { "healthy" } else { "degraded" } },
        Service { name: "api", port: 8080, state: "healthy" },
        Service { name: "worker", port: 9000, state: if flip { "busy" } else { "idle" } },
        Service { name: "postgres", port: 5432, state: "healthy" },
        Service { name: "redis", port: 6379, state: "healthy" },
        Service { name: "metrics", port: 9090, state: if flip { "healthy" } else { "starting" } },
    ]
}

fn columns() -> Vec<String> {
    vec!["Name".into(), "Port".into(), "State".into()]
}

struct Browser {
    table: Arc<Table<Service>>,
    query: String,
    status: Option<String>,
}

impl Mode for Browser {
    fn render(&mut self, rows: u16, cols: u16) -> Frame {
        self.table.set_size(cols as usize, rows as usize);
        let mut frame = self.table.draw();
        if let Some(status) = &self.status
            && !self.table.is_searching()
            && rows > 0
        {
            frame.set_line(rows as usize - 1, status.clone());
        }
        frame
    }

    fn on_input(&mut self, input: &str, ctx: &mut Context<'_>) {
        match input {
            key::CTRL_C => ctx.quit(),
            key::UP => {
                self.table.select_up();
            }
            key::DOWN => {
                self.table.select_down();
            }
            key::ESC => {
                self.query.clear();
                self.status = None;
                self.table.clear_search();
            }
            key::BACKSPACE => {
                self.query.pop();
                self.table.search(&self.query);
            }
            key::ENTER => {
                self.status = self
                    .table
                    .selected_record()
                    .map(|index| format!(" selected record #{index}"));
            }
            _ if input.chars().all(|c| !c.is_control()) => {
                self.query.push_str(input);
                self.table.search(&self.query);
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), lineweave::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let table = Arc::new(Table::new(80, 24));
    table.update(services(0), columns());

    let mut app = App::new();
    app.add_mode(0, Browser {
        table: Arc::clone(&table),
        query: String::new(),
        status: None,
    });

    // Background refresh: flips service states every second and asks the
    // render loop for a repaint. The table's own lock keeps this safe
    // against concurrent draws.
    let handle = app.handle();
    let refresher = Arc::clone(&table);
    thread::spawn(move || {
        let mut generation = 1u64;
        loop {
            thread::sleep(Duration::from_secs(1));
            refresher.update(services(generation), columns());
            handle.redraw();
            generation += 1;
        }
    });

    app.run()
}
