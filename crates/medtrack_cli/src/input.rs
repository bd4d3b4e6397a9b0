//! Line-based name prompt over a reader/writer pair (stdin/stdout in the CLI).

use medtrack_core::NamePrompt;
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl LinePrompt<StdinLock<'static>, Stdout> {
    pub fn stdin() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> NamePrompt for LinePrompt<R, W> {
    /// EOF or a read error counts as cancellation.
    fn request_name(&mut self, message: &str) -> Option<String> {
        write!(self.writer, "{message} ").ok()?;
        self.writer.flush().ok()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
