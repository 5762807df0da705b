//! Terminal output sink
//!
//! All user-visible text goes through a [`Console`] handle. The binary backs it
//! with stdout; tests back it with an in-memory buffer.

use console::{Style, Term};
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

const DEFAULT_WIDTH: usize = 80;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Shared, cloneable output handle
#[derive(Clone)]
pub struct Console {
    sink: Sink,
    styled: bool,
    width: usize,
}

impl Console {
    /// Console writing to the process stdout
    pub fn stdout() -> Self {
        let term = Term::stdout();
        let width = term
            .size_checked()
            .map(|(_, cols)| cols as usize)
            .unwrap_or(DEFAULT_WIDTH);

        Self::new(
            Box::new(io::stdout()),
            console::colors_enabled() && term.is_term(),
            width,
        )
    }

    /// Console over an arbitrary writer
    pub fn new(writer: Box<dyn Write + Send>, styled: bool, width: usize) -> Self {
        Self {
            sink: Arc::new(Mutex::new(writer)),
            styled,
            width,
        }
    }

    /// Unstyled console that records everything written to it
    #[cfg(test)]
    pub fn capture() -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        let console = Self::new(Box::new(buffer.clone()), false, DEFAULT_WIDTH);
        (console, buffer)
    }

    /// Terminal width in columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Apply `style` to `text` if this console is styled
    pub fn paint<D: Display>(&self, text: D, style: Style) -> String {
        style.force_styling(self.styled).apply_to(text).to_string()
    }

    /// Write text followed by a newline
    pub fn line<D: Display>(&self, text: D) -> io::Result<()> {
        let mut sink = self.lock();
        writeln!(sink, "{}", text)?;
        sink.flush()
    }

    /// Write an empty line
    pub fn blank(&self) -> io::Result<()> {
        self.line("")
    }

    /// Write a yellow warning line
    pub fn warning<D: Display>(&self, message: D) -> io::Result<()> {
        self.line(self.paint(message, Style::new().yellow()))
    }

    /// Write a red label followed by a message
    pub fn error<D: Display>(&self, label: &str, message: D) -> io::Result<()> {
        self.line(format!(
            "{} {}",
            self.paint(label, Style::new().red()),
            message
        ))
    }

    /// Report an error that ends the process. Component errors already
    /// carry their cause in `Display`, so only the outer message is printed.
    pub fn fatal<D: Display>(&self, err: D) -> io::Result<()> {
        self.error("Fatal error:", err)
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// In-memory writer shared with a captured [`Console`]
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CaptureBuffer {
    /// Everything written so far, as text
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
