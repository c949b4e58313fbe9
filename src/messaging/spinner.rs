//! Animated typing indicator shown while a reply is outstanding.

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Bouncing dots, closest to a chat typing bubble.
const TYPING_DOTS: &[&str] = &["•  ", "•• ", "•••", " ••", "  •", "   "];

/// Spinner configuration.
#[derive(Clone)]
pub struct SpinnerConfig {
    /// Animation frames.
    pub frames: Vec<&'static str>,
    /// Frame duration in milliseconds.
    pub interval_ms: u64,
    /// Spinner color.
    pub color: Color,
    /// Append elapsed seconds once a reply takes a while.
    pub show_elapsed: bool,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            frames: SPINNER_FRAMES.to_vec(),
            interval_ms: 80,
            color: Color::Magenta,
            show_elapsed: true,
        }
    }
}

impl SpinnerConfig {
    /// The assistant typing indicator.
    pub fn typing() -> Self {
        Self {
            frames: TYPING_DOTS.to_vec(),
            interval_ms: 120,
            ..Default::default()
        }
    }
}

/// A running spinner. Stops when dropped.
pub struct SpinnerHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Stop the spinner and wait for its last frame to clear.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        clear_line();
    }

    /// Stop the spinner synchronously (non-async).
    pub fn stop_sync(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        clear_line();
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
        let _ = stdout().execute(Show);
    }
}

fn clear_line() {
    let mut stdout = stdout();
    let _ = stdout.execute(MoveToColumn(0));
    let _ = stdout.execute(Clear(ClearType::CurrentLine));
    let _ = stdout.execute(Show);
}

/// Label with elapsed time, shown from the third second on.
fn status_line(frame: &str, message: &str, elapsed: Duration, show_elapsed: bool) -> String {
    let secs = elapsed.as_secs();
    if show_elapsed && secs >= 3 {
        format!("{} {} {}s", frame, message, secs)
    } else {
        format!("{} {}", frame, message)
    }
}

/// Spinner for showing activity.
pub struct Spinner {
    config: SpinnerConfig,
}

impl Spinner {
    /// Create a new spinner with default config.
    pub fn new() -> Self {
        Self {
            config: SpinnerConfig::default(),
        }
    }

    /// Create with custom config.
    pub fn with_config(config: SpinnerConfig) -> Self {
        Self { config }
    }

    /// Start the spinner with a message. Must be called inside a Tokio runtime.
    pub fn start(&self, message: impl Into<String>) -> SpinnerHandle {
        let config = self.config.clone();
        let message = message.into();
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let mut frame_idx = 0;
            let mut stdout = stdout();

            let _ = stdout.execute(Hide);

            loop {
                if *stop_rx.borrow() {
                    break;
                }

                let frame = config.frames[frame_idx % config.frames.len()];
                let line = status_line(frame, &message, started.elapsed(), config.show_elapsed);

                let _ = stdout.execute(MoveToColumn(0));
                let _ = stdout.execute(Clear(ClearType::CurrentLine));
                let _ = stdout.execute(SetForegroundColor(config.color));
                let _ = stdout.execute(Print(line));
                let _ = stdout.execute(ResetColor);
                let _ = stdout.flush();

                frame_idx += 1;

                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(config.interval_ms)) => {}
                    _ = stop_rx.changed() => { break; }
                }
            }

            let _ = stdout.execute(Show);
        });

        SpinnerHandle {
            stop_tx,
            task: Some(task),
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}
