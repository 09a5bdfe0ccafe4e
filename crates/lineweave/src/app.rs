//! Application loop.
//!
//! [`App`] owns the raw terminal session and coordinates three loops
//! around one shared monitor (a mutex paired with a condition variable):
//!
//! - the **render loop** (spawned thread) produces a [`Frame`] from the
//!   active mode, repaints it, and waits on the condition variable;
//! - the **input loop** (the caller's thread) blocking-reads raw input,
//!   dispatches it to the active mode, and signals the render loop;
//! - an optional **resize watcher** polls the window size and signals a
//!   render when it changes, since a resize is not delivered as input.
//!
//! The render loop is the only writer of terminal content; everything
//! else merely signals, so repaints are always serialized.

use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::terminal::Terminal;

/// Identifier a mode is registered under.
pub type ModeId = usize;

const INPUT_BUF_LEN: usize = 16;

/// A named pairing of a view producer and an input handler.
///
/// The application always has exactly one active mode: its `render` is
/// asked for a frame on every render pass, and its `on_input` receives
/// every raw input token. Handlers run inside the monitor, so they may
/// freely mutate their own state; requests that concern the application
/// itself go through the [`Context`].
pub trait Mode: Send {
    /// Produce the frame for the current state at the given window size.
    fn render(&mut self, rows: u16, cols: u16) -> Frame;

    /// Handle one raw input token (see [`crate::key`] for the tokens worth
    /// comparing against).
    fn on_input(&mut self, input: &str, ctx: &mut Context<'_>);
}

/// A mode assembled from a view producer and an input handler.
pub struct FnMode<V, I> {
    view: V,
    input: I,
}

impl<V, I> FnMode<V, I>
where
    V: FnMut(u16, u16) -> Frame + Send,
    I: FnMut(&str, &mut Context<'_>) + Send,
{
    /// Pair a view producer with an input handler.
    pub fn new(view: V, input: I) -> Self {
        Self { view, input }
    }
}

impl<V, I> Mode for FnMode<V, I>
where
    V: FnMut(u16, u16) -> Frame + Send,
    I: FnMut(&str, &mut Context<'_>) + Send,
{
    fn render(&mut self, rows: u16, cols: u16) -> Frame {
        (self.view)(rows, cols)
    }

    fn on_input(&mut self, input: &str, ctx: &mut Context<'_>) {
        (self.input)(input, ctx)
    }
}

/// Handler-visible surface of the application.
///
/// Requests recorded here are applied by the input loop after the handler
/// returns; a handler never has to signal a redraw itself.
pub struct Context<'a> {
    cursor: &'a mut Cursor,
    quit: bool,
    switch_to: Option<ModeId>,
    fatal: Option<String>,
}

impl Context<'_> {
    /// Stop the application once this dispatch completes.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Switch to the mode registered under `id`.
    ///
    /// Selecting an unregistered id is fatal: the session ends and
    /// [`App::run`] returns [`Error::UnknownMode`] after the terminal has
    /// been restored.
    pub fn set_mode(&mut self, id: ModeId) {
        self.switch_to = Some(id);
    }

    /// Abort the session with an error message.
    ///
    /// The terminal is restored before [`App::run`] reports the message as
    /// [`Error::Fatal`].
    pub fn fail(&mut self, message: impl Into<String>) {
        self.fatal = Some(message.into());
    }

    /// The application-level screen cursor.
    pub fn cursor(&mut self) -> &mut Cursor {
        self.cursor
    }
}

/// Options controlling the application loop.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Poll the window size on a background thread. Defaults to true.
    pub watch_resize: bool,
    /// Interval between resize polls. Defaults to 100ms.
    pub resize_interval: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            watch_resize: true,
            resize_interval: Duration::from_millis(100),
        }
    }
}

type ResizeCallback = Box<dyn FnMut(u16, u16) + Send>;

struct LoopState {
    terminal: Terminal,
    modes: HashMap<ModeId, Box<dyn Mode>>,
    active: Option<ModeId>,
    cursor: Cursor,
    last_frame: Frame,
    last_size: (u16, u16),
    error: Option<Error>,
}

/// The monitor: one lock over the loop state plus the redraw condvar.
struct Monitor {
    state: Mutex<LoopState>,
    redraw: Condvar,
    running: AtomicBool,
}

impl Monitor {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Wake the render loop. The monitor is taken first so the signal
    /// cannot land between the loop's running-check and its wait.
    fn signal(&self) {
        let _guard = self.state.lock();
        self.redraw.notify_one();
    }

    fn stop(&self) {
        let _guard = self.state.lock();
        self.running.store(false, Ordering::Release);
        self.redraw.notify_one();
    }
}

/// Handle for driving a running application from other threads.
///
/// Obtained with [`App::handle`] before `run`; a background thread that
/// refreshes shared state calls [`redraw`](AppHandle::redraw) to get the
/// new state painted.
#[derive(Clone)]
pub struct AppHandle {
    monitor: Arc<Monitor>,
}

impl AppHandle {
    /// Wake the render loop for another pass.
    pub fn redraw(&self) {
        self.monitor.signal();
    }

    /// Ask the loops to stop.
    ///
    /// Cooperative: the render loop exits on its next wake, the input loop
    /// after its next read returns. An in-flight blocking read is not
    /// interrupted.
    pub fn stop(&self) {
        self.monitor.stop();
    }

    /// Whether the loops are currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.monitor.is_running()
    }
}

/// The application: terminal session, mode registry, and the loops.
///
/// # Example
///
/// ```rust,ignore
/// use lineweave::{App, Context, Frame, Mode, key};
///
/// struct Hello;
///
/// impl Mode for Hello {
///     fn render(&mut self, rows: u16, _cols: u16) -> Frame {
///         let mut frame = Frame::blank(rows as usize);
///         frame.set_line(0, "Hello! Press q to quit.");
///         frame
///     }
///
///     fn on_input(&mut self, input: &str, ctx: &mut Context<'_>) {
///         if input == "q" || input == key::CTRL_C {
///             ctx.quit();
///         }
///     }
/// }
///
/// let mut app = App::new();
/// app.add_mode(0, Hello);
/// app.run()?;
/// # Ok::<(), lineweave::Error>(())
/// ```
pub struct App {
    monitor: Arc<Monitor>,
    options: AppOptions,
    input: Box<dyn Read + Send>,
    on_resize: Option<ResizeCallback>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// An application over stdin/stdout with default options and no modes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            monitor: Arc::new(Monitor {
                state: Mutex::new(LoopState {
                    terminal: Terminal::stdout(),
                    modes: HashMap::new(),
                    active: None,
                    cursor: Cursor::default(),
                    last_frame: Frame::new(),
                    last_size: (0, 0),
                    error: None,
                }),
                redraw: Condvar::new(),
                running: AtomicBool::new(false),
            }),
            options: AppOptions::default(),
            input: Box::new(io::stdin()),
            on_resize: None,
        }
    }

    /// Replace the terminal driver (custom-I/O mode for tests, embedding).
    #[must_use]
    pub fn with_terminal(self, terminal: Terminal) -> Self {
        self.monitor.state.lock().terminal = terminal;
        self
    }

    /// Replace the input reader.
    #[must_use]
    pub fn with_input<R: Read + Send + 'static>(mut self, input: R) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Replace the loop options wholesale.
    #[must_use]
    pub fn with_options(mut self, options: AppOptions) -> Self {
        self.options = options;
        self
    }

    /// Disable the resize watcher thread.
    #[must_use]
    pub fn without_resize_watcher(mut self) -> Self {
        self.options.watch_resize = false;
        self
    }

    /// Install a callback invoked when the window size changes.
    #[must_use]
    pub fn on_resize<F: FnMut(u16, u16) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_resize = Some(Box::new(callback));
        self
    }

    /// Register a mode under an identifier.
    ///
    /// Registering under id 0 also selects it, so a single-mode
    /// application needs no explicit `set_mode` call.
    pub fn add_mode(&mut self, id: ModeId, mode: impl Mode + 'static) {
        let mut state = self.monitor.state.lock();
        state.modes.insert(id, Box::new(mode));
        if id == 0 {
            state.active = Some(0);
        }
    }

    /// Select the active mode and trigger a redraw.
    pub fn set_mode(&mut self, id: ModeId) -> Result<()> {
        {
            let mut state = self.monitor.state.lock();
            if !state.modes.contains_key(&id) {
                return Err(Error::UnknownMode(id));
            }
            state.active = Some(id);
        }
        debug!(mode = id, "switched mode");
        self.monitor.signal();
        Ok(())
    }

    /// The identifier of the currently active mode, if one is selected.
    #[must_use]
    pub fn active_mode(&self) -> Option<ModeId> {
        self.monitor.state.lock().active
    }

    /// A cloneable handle for other threads.
    #[must_use]
    pub fn handle(&self) -> AppHandle {
        AppHandle {
            monitor: Arc::clone(&self.monitor),
        }
    }

    /// Wake the render loop for another pass.
    pub fn redraw(&self) {
        self.monitor.signal();
    }

    /// Ask the loops to stop.
    pub fn stop(&self) {
        self.monitor.stop();
    }

    /// Run the application until it is stopped.
    ///
    /// Sets up the terminal session, paints the first frame, spawns the
    /// render loop and the optional resize watcher, then drives the input
    /// loop on the calling thread. Whatever happens, the terminal is
    /// restored (show cursor, restore screen, leave raw mode) before this
    /// returns.
    pub fn run(mut self) -> Result<()> {
        let monitor = Arc::clone(&self.monitor);

        if monitor.state.lock().active.is_none() {
            return Err(Error::NoActiveMode);
        }

        monitor.running.store(true, Ordering::Release);
        let _session = SessionGuard {
            monitor: Arc::clone(&monitor),
        };

        {
            let mut state = monitor.state.lock();
            state.terminal.setup()?;
            // First paint happens before the loops exist, so a frame is on
            // screen by the time input can arrive.
            render_pass(&mut state)?;
        }

        let render = thread::spawn({
            let monitor = Arc::clone(&monitor);
            move || render_loop(&monitor)
        });

        let watcher = if self.options.watch_resize {
            let interval = self.options.resize_interval;
            let on_resize = self.on_resize.take();
            Some(thread::spawn({
                let monitor = Arc::clone(&monitor);
                move || resize_watcher(&monitor, interval, on_resize)
            }))
        } else {
            None
        };

        let outcome = input_loop(&monitor, self.input.as_mut());

        monitor.stop();
        let _ = render.join();
        if let Some(watcher) = watcher {
            let _ = watcher.join();
        }

        let stored = monitor.state.lock().error.take();
        match outcome {
            Err(err) => Err(err),
            Ok(()) => stored.map_or(Ok(()), Err),
        }
    }
}

/// Restores the terminal when the session ends, however it ends.
struct SessionGuard {
    monitor: Arc<Monitor>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.monitor.running.store(false, Ordering::Release);
        self.monitor.state.lock().terminal.teardown();
    }
}

fn render_loop(monitor: &Monitor) {
    debug!("render loop started");
    let mut state = monitor.state.lock();
    while monitor.is_running() {
        if let Err(err) = render_pass(&mut state) {
            state.error.get_or_insert(err);
            monitor.running.store(false, Ordering::Release);
            break;
        }
        if !monitor.is_running() {
            break;
        }
        monitor.redraw.wait(&mut state);
    }
    debug!("render loop stopped");
}

fn render_pass(state: &mut LoopState) -> Result<()> {
    let (rows, cols) = state.terminal.size()?;
    let active = state.active.ok_or(Error::NoActiveMode)?;
    let mode = state.modes.get_mut(&active).ok_or(Error::UnknownMode(active))?;
    let frame = mode.render(rows, cols);

    if (rows, cols) == state.last_size {
        frame.render_from(&state.last_frame, &mut state.terminal)?;
    } else {
        trace!(rows, cols, "size changed; full repaint");
        state.last_size = (rows, cols);
        frame.render(&mut state.terminal)?;
    }
    state.last_frame = frame;
    Ok(())
}

fn input_loop(monitor: &Monitor, input: &mut (dyn Read + Send)) -> Result<()> {
    let mut buf = [0u8; INPUT_BUF_LEN];
    while monitor.is_running() {
        match input.read(&mut buf) {
            // EOF: nothing more will ever arrive.
            Ok(0) => break,
            Ok(n) => {
                let token = String::from_utf8_lossy(&buf[..n]).into_owned();
                trace!(?token, "dispatching input");
                if !dispatch(monitor, &token)? {
                    break;
                }
                monitor.signal();
            }
            // Transient read failures are retried, never dispatched.
            Err(_) => {}
        }
    }
    Ok(())
}

/// Dispatch one token to the active mode and apply the requests it made.
/// Returns false when the handler asked to quit.
fn dispatch(monitor: &Monitor, input: &str) -> Result<bool> {
    let mut guard = monitor.state.lock();
    let state = &mut *guard;
    let active = state.active.ok_or(Error::NoActiveMode)?;
    let mode = state
        .modes
        .get_mut(&active)
        .ok_or(Error::UnknownMode(active))?;

    let mut ctx = Context {
        cursor: &mut state.cursor,
        quit: false,
        switch_to: None,
        fatal: None,
    };
    mode.on_input(input, &mut ctx);
    let Context {
        quit,
        switch_to,
        fatal,
        ..
    } = ctx;

    if let Some(message) = fatal {
        return Err(Error::Fatal(message));
    }
    if let Some(id) = switch_to {
        if !state.modes.contains_key(&id) {
            return Err(Error::UnknownMode(id));
        }
        state.active = Some(id);
        debug!(mode = id, "switched mode");
    }
    Ok(!quit)
}

fn resize_watcher(monitor: &Monitor, interval: Duration, mut on_resize: Option<ResizeCallback>) {
    debug!("resize watcher started");
    while monitor.is_running() {
        thread::sleep(interval);
        let looked = {
            let state = monitor.state.lock();
            state
                .terminal
                .size()
                .map(|size| (size, size != state.last_size))
        };
        match looked {
            Ok((size, true)) => {
                debug!(rows = size.0, cols = size.1, "window resized");
                if let Some(callback) = on_resize.as_mut() {
                    callback(size.0, size.1);
                }
                monitor.signal();
            }
            Ok((_, false)) => {}
            Err(err) => {
                monitor.state.lock().error.get_or_insert(err);
                monitor.stop();
                break;
            }
        }
    }
    debug!("resize watcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;

    impl Mode for Nop {
        fn render(&mut self, rows: u16, _cols: u16) -> Frame {
            Frame::blank(rows as usize)
        }

        fn on_input(&mut self, _input: &str, _ctx: &mut Context<'_>) {}
    }

    #[test]
    fn test_options_default() {
        let options = AppOptions::default();
        assert!(options.watch_resize);
        assert_eq!(options.resize_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_builder_flags() {
        let app = App::new().without_resize_watcher();
        assert!(!app.options.watch_resize);
    }

    #[test]
    fn test_add_mode_zero_selects_itself() {
        let mut app = App::new();
        assert_eq!(app.active_mode(), None);

        app.add_mode(0, Nop);
        assert_eq!(app.active_mode(), Some(0));
    }

    #[test]
    fn test_set_mode_unknown_is_an_error() {
        let mut app = App::new();
        app.add_mode(0, Nop);

        assert!(matches!(app.set_mode(7), Err(Error::UnknownMode(7))));
        assert_eq!(app.active_mode(), Some(0));
    }

    #[test]
    fn test_run_without_modes_is_an_error() {
        let app = App::new();
        assert!(matches!(app.run(), Err(Error::NoActiveMode)));
    }

    #[test]
    fn test_handle_reports_not_running_before_run() {
        let app = App::new();
        assert!(!app.handle().is_running());
    }

    #[test]
    fn test_fn_mode_delegates() {
        let mut mode = FnMode::new(
            |rows, _cols| {
                let mut frame = Frame::blank(rows as usize);
                frame.set_line(0, "from closure");
                frame
            },
            |_input, ctx: &mut Context<'_>| ctx.quit(),
        );

        let frame = mode.render(4, 10);
        assert_eq!(frame.line(0), Some("from closure"));

        let mut cursor = Cursor::default();
        let mut ctx = Context {
            cursor: &mut cursor,
            quit: false,
            switch_to: None,
            fatal: None,
        };
        mode.on_input("q", &mut ctx);
        assert!(ctx.quit);
    }
}
