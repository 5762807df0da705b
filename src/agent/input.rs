//! Line sources for the interactive loop

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, IsTerminal};

/// Something that can prompt for and return one line of input.
///
/// `Ok(None)` means the input is finished (end of file or interrupt).
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Line editor on an interactive stdin, plain line reads when stdin is piped
pub fn stdin_reader() -> rustyline::Result<Box<dyn LineReader>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        Ok(Box::new(Readline::new()?))
    } else {
        Ok(Box::new(BufferedInput::new(stdin.lock())))
    }
}

/// Interactive line editor with history
pub struct Readline {
    editor: DefaultEditor,
}

impl Readline {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for Readline {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}

/// Reads lines from any buffered reader, ignoring the prompt
pub struct BufferedInput<R> {
    reader: R,
}

impl<R: BufRead> BufferedInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineReader for BufferedInput<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
