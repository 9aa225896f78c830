//! The animation engine.
//!
//! A [`Spinner`] owns a background render thread that cycles through its
//! frames, printing `frame label` in place and erasing the line after each
//! frame. The caller can change the label, frames, interval or output sink
//! at any time; the render thread picks up the change on its next frame.
//!
//! ```
//! use std::time::Duration;
//! use termspin::Spinner;
//!
//! let spinner = Spinner::start_new("Fetching issues");
//! spinner.set_label("Almost there");
//! std::thread::sleep(Duration::from_millis(20));
//! spinner.stop();
//! ```

use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::SpinnerConfig;
use crate::frames;
use crate::terminal::{self, ERASE_LINE, HIDE_CURSOR, SHOW_CURSOR};

/// Placed between the frame glyph and the label.
pub const SEPARATOR: &str = " ";

/// Composes the line shown for one frame.
pub fn compose(frame: &str, label: &str) -> String {
    format!("{}{}{}", frame, SEPARATOR, label)
}

/// What gets drawn. Never held across a write.
struct Display {
    label: String,
    frames: Vec<String>,
    frame_interval: Duration,
}

impl Display {
    /// The line for frame `index`, or `None` if there are no frames.
    fn line(&self, index: usize) -> Option<String> {
        self.frames
            .get(index)
            .map(|frame| compose(frame, &self.label))
    }
}

/// Where it gets drawn. Held for every write and for the stop check.
struct Io {
    output: Option<Box<dyn Write + Send>>,
    surface: Box<dyn Write + Send>,
    interactive: bool,
}

impl Io {
    fn render(&mut self, line: &str) {
        match self.output.as_mut() {
            Some(sink) => write_best_effort(&mut **sink, line),
            None if self.interactive => write_best_effort(&mut *self.surface, line),
            None => {}
        }
    }

    /// Terminal control sequences only make sense on an interactive surface.
    fn control(&mut self, sequence: &str) {
        if self.interactive {
            write_best_effort(&mut *self.surface, sequence);
        }
    }

    /// A custom sink handles its own redraws, so only the surface is erased.
    fn erase(&mut self) {
        if self.output.is_none() {
            self.control(ERASE_LINE);
        }
    }
}

fn write_best_effort(out: &mut dyn Write, text: &str) {
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        tracing::trace!(error = %e, "spinner write failed");
    }
}

struct Shared {
    display: Mutex<Display>,
    io: Mutex<Io>,
    interactive: bool,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl Shared {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Only the first caller gets past the latch and touches the terminal.
    fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut io = self.io.lock();
        io.erase();
        io.control(SHOW_CURSOR);
        tracing::debug!("spinner stopped");
    }
}

/// Runs the stop routine when the render thread exits, including by panic.
struct StopOnExit(Arc<Shared>);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        self.0.stop();
    }
}

fn render_loop(shared: Arc<Shared>) {
    let guard = StopOnExit(shared);
    let shared = &guard.0;

    {
        let mut io = shared.io.lock();
        if shared.is_stopped() {
            return;
        }
        io.control(HIDE_CURSOR);
    }

    let mut index = 0usize;
    loop {
        let (line, interval) = {
            let display = shared.display.lock();
            if index >= display.frames.len() {
                index = 0;
            }
            (display.line(index), display.frame_interval)
        };

        let rendered = {
            let mut io = shared.io.lock();
            if shared.is_stopped() {
                break;
            }
            match line {
                Some(line) => {
                    io.render(&line);
                    true
                }
                None => false,
            }
        };

        thread::sleep(interval);

        {
            let mut io = shared.io.lock();
            if shared.is_stopped() {
                break;
            }
            if rendered {
                io.erase();
            }
        }
        index = index.wrapping_add(1);
    }
}

/// An in-place terminal spinner.
///
/// Created stopped; call [`Spinner::start`] to begin animating and
/// [`Spinner::stop`] (or drop the handle) to clear the line and restore the
/// cursor. A stopped spinner cannot be started again.
pub struct Spinner {
    shared: Arc<Shared>,
}

impl Spinner {
    /// Creates a spinner rendering to stderr, interactive if stderr is a terminal.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_surface(label, std::io::stderr(), terminal::is_interactive())
    }

    /// Creates and immediately starts a spinner.
    pub fn start_new(label: impl Into<String>) -> Self {
        let spinner = Self::new(label);
        spinner.start();
        spinner
    }

    /// Creates a spinner that treats `surface` as its terminal.
    pub fn with_surface<W>(label: impl Into<String>, surface: W, interactive: bool) -> Self
    where
        W: Write + Send + 'static,
    {
        let display = Display {
            label: label.into(),
            frames: frames::default_frames(),
            frame_interval: frames::DEFAULT_INTERVAL,
        };
        let io = Io {
            output: None,
            surface: Box::new(surface),
            interactive,
        };
        Self {
            shared: Arc::new(Shared {
                display: Mutex::new(display),
                io: Mutex::new(io),
                interactive,
                started: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a stderr spinner with the frames and interval from `config`.
    pub fn from_config(label: impl Into<String>, config: &SpinnerConfig) -> Self {
        let spinner = Self::new(label);
        spinner
            .set_frames(config.frames())
            .set_frame_interval(config.frame_interval());
        spinner
    }

    /// Spawns the render thread. Later calls, and calls after [`Spinner::stop`], do nothing.
    pub fn start(&self) -> &Self {
        self.launch(|shared| {
            thread::Builder::new()
                .name("termspin".to_string())
                .spawn(move || render_loop(shared))
                .map(|_| ())
        })
    }

    fn launch<F>(&self, spawn: F) -> &Self
    where
        F: FnOnce(Arc<Shared>) -> std::io::Result<()>,
    {
        if self.shared.is_stopped() {
            tracing::debug!("spinner already stopped, ignoring start");
            return self;
        }
        if self.shared.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("spinner already started, ignoring start");
            return self;
        }

        if let Err(e) = spawn(Arc::clone(&self.shared)) {
            self.shared.started.store(false, Ordering::SeqCst);
            tracing::warn!(error = %e, "Failed to spawn spinner thread");
        }
        self
    }

    /// Stops the animation, clears the line and shows the cursor again.
    ///
    /// Safe to call repeatedly and from several threads; only the first call
    /// has any effect. Does not wait for the render thread's current sleep,
    /// but does wait for a frame write already in progress, so a stalled
    /// output blocks `stop` until that write returns.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Replaces the label shown after the frame glyph.
    pub fn set_label(&self, label: impl Into<String>) -> &Self {
        self.shared.display.lock().label = label.into();
        self
    }

    /// Sets how long each frame stays on screen. Zero is raised to 1ms.
    pub fn set_frame_interval(&self, interval: Duration) -> &Self {
        self.shared.display.lock().frame_interval = frames::clamp_interval(interval);
        self
    }

    /// Replaces the frame set. An empty set is ignored.
    pub fn set_frames<I, S>(&self, frames: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            tracing::warn!("ignoring empty spinner frame set");
            return self;
        }
        self.shared.display.lock().frames = frames;
        self
    }

    /// Sends frames to `sink` instead of the terminal, without erasing between them.
    ///
    /// Waits for a frame write already in progress.
    pub fn set_output<W>(&self, sink: W) -> &Self
    where
        W: Write + Send + 'static,
    {
        self.shared.io.lock().output = Some(Box::new(sink));
        self
    }

    /// The current label.
    pub fn label(&self) -> String {
        self.shared.display.lock().label.clone()
    }

    /// The current frame set.
    pub fn frames(&self) -> Vec<String> {
        self.shared.display.lock().frames.clone()
    }

    /// How long each frame stays on screen.
    pub fn frame_interval(&self) -> Duration {
        self.shared.display.lock().frame_interval
    }

    /// Whether the spinner draws on its surface at all.
    pub fn is_interactive(&self) -> bool {
        self.shared.interactive
    }

    /// Started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.shared.started.load(Ordering::SeqCst) && !self.shared.is_stopped()
    }

    /// Whether [`Spinner::stop`] has run.
    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopped()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    /// Blocks every write until the test releases the gate.
    struct Gated(Arc<Mutex<()>>);

    impl Write for Gated {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let _open = self.0.lock();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn compose_joins_frame_and_label_with_one_space() {
        for frame in ["-", "⠈⠁", "..."] {
            for label in ["", "loading", "two words"] {
                assert_eq!(compose(frame, label), format!("{frame} {label}"));
            }
        }
    }

    #[test]
    fn new_spinner_uses_defaults() {
        let spinner = Spinner::with_surface("hello", Capture::default(), true);
        assert_eq!(spinner.label(), "hello");
        assert_eq!(spinner.frames(), frames::default_frames());
        assert_eq!(spinner.frame_interval(), frames::DEFAULT_INTERVAL);
        assert!(spinner.is_interactive());
        assert!(!spinner.is_running());
        assert!(!spinner.is_stopped());
    }

    #[test]
    fn setters_chain() {
        let spinner = Spinner::with_surface("", Capture::default(), false);
        spinner
            .set_label("syncing")
            .set_frames(["a", "b"])
            .set_frame_interval(Duration::from_millis(20));
        assert_eq!(spinner.label(), "syncing");
        assert_eq!(spinner.frames(), vec!["a", "b"]);
        assert_eq!(spinner.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn empty_frame_set_is_rejected() {
        let spinner = Spinner::with_surface("", Capture::default(), false);
        spinner.set_frames(["x"]).set_frames(Vec::<String>::new());
        assert_eq!(spinner.frames(), vec!["x"]);
    }

    #[test]
    fn loop_with_no_frames_renders_nothing() {
        let sink = Capture::default();
        let spinner = Spinner::with_surface("idle", Capture::default(), true);
        spinner
            .set_output(sink.clone())
            .set_frame_interval(Duration::from_millis(2));
        spinner.shared.display.lock().frames.clear();
        spinner.start();
        thread::sleep(Duration::from_millis(20));
        spinner.stop();
        assert!(sink.text().is_empty());
    }

    #[test]
    fn zero_interval_is_clamped() {
        let spinner = Spinner::with_surface("", Capture::default(), false);
        spinner.set_frame_interval(Duration::ZERO);
        assert_eq!(spinner.frame_interval(), frames::MIN_FRAME_INTERVAL);
    }

    #[test]
    fn from_config_applies_frames_and_interval() {
        let config = SpinnerConfig {
            frames: vec!["1".into(), "2".into()],
            frame_interval_ms: 25,
        };
        let spinner = Spinner::from_config("cfg", &config);
        assert_eq!(spinner.frames(), vec!["1", "2"]);
        assert_eq!(spinner.frame_interval(), Duration::from_millis(25));
    }

    #[test]
    fn stop_before_start_erases_and_shows_cursor_once() {
        let surface = Capture::default();
        let spinner = Spinner::with_surface("", surface.clone(), true);
        spinner.stop();
        spinner.stop();
        assert_eq!(surface.text(), format!("{ERASE_LINE}{SHOW_CURSOR}"));
    }

    #[test]
    fn start_after_stop_is_ignored() {
        let surface = Capture::default();
        let spinner = Spinner::with_surface("late", surface.clone(), true);
        spinner.stop();
        spinner.start();
        thread::sleep(Duration::from_millis(20));
        assert!(!spinner.is_running());
        assert!(!surface.text().contains(HIDE_CURSOR));
    }

    #[test]
    fn broken_sink_is_swallowed() {
        let spinner = Spinner::with_surface("", Broken, true);
        spinner
            .set_output(Broken)
            .set_frame_interval(Duration::from_millis(2));
        spinner.start();
        thread::sleep(Duration::from_millis(15));
        assert!(spinner.is_running());
        spinner.stop();
        assert!(spinner.is_stopped());
    }

    #[test]
    fn failed_spawn_leaves_spinner_startable() {
        let spinner = Spinner::with_surface("", Capture::default(), false);
        spinner.launch(|_| Err(std::io::Error::new(std::io::ErrorKind::Other, "no threads")));
        assert!(!spinner.is_running());
        assert!(!spinner.is_stopped());

        spinner.set_frame_interval(Duration::from_millis(2)).start();
        assert!(spinner.is_running());
        spinner.stop();
    }

    #[test]
    fn setters_do_not_wait_for_a_stalled_write() {
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock();
        let spinner = Spinner::with_surface("stuck", Gated(Arc::clone(&gate)), true);
        spinner.set_frame_interval(Duration::from_millis(2)).start();
        thread::sleep(Duration::from_millis(20));

        spinner
            .set_label("moving")
            .set_frames(["z"])
            .set_frame_interval(Duration::from_millis(3));
        assert_eq!(spinner.label(), "moving");
        assert_eq!(spinner.frames(), vec!["z"]);
        assert_eq!(spinner.frame_interval(), Duration::from_millis(3));
        assert!(spinner.is_interactive());
        assert!(spinner.is_running());

        drop(held);
        spinner.stop();
        assert!(spinner.is_stopped());
    }

    #[test]
    fn drop_stops_the_spinner() {
        let surface = Capture::default();
        {
            let spinner = Spinner::with_surface("", surface.clone(), true);
            spinner.set_frame_interval(Duration::from_millis(2)).start();
            thread::sleep(Duration::from_millis(10));
        }
        let text = surface.text();
        assert!(text.ends_with(SHOW_CURSOR));
        let len = text.len();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(surface.text().len(), len);
    }
}
