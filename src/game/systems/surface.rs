//! Display surfaces.
//!
//! The core never formats for a particular terminal; it only clears the
//! surface and hands it finished lines.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use log::warn;

pub trait Surface {
    fn clear(&mut self);
    fn print_line(&mut self, line: &str);
}

/// Writes to stdout and clears with ANSI escapes.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn clear(&mut self) {
        let mut stdout = io::stdout();
        if let Err(err) = write!(stdout, "\x1b[2J\x1b[1;1H").and_then(|_| stdout.flush()) {
            warn!("[Surface] Failed to clear terminal: {}", err);
        }
    }

    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

#[derive(Debug, Default)]
struct Buffer {
    lines: Vec<String>,
    clears: usize,
}

/// In-memory surface. Clones share the same buffer, so a caller can keep a
/// handle after boxing one into the navigator.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    inner: Rc<RefCell<Buffer>>,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines printed since the last clear.
    pub fn lines(&self) -> Vec<String> {
        self.inner.borrow().lines.clone()
    }

    pub fn clears(&self) -> usize {
        self.inner.borrow().clears
    }

    pub fn contains(&self, text: &str) -> bool {
        self.inner.borrow().lines.iter().any(|line| line.contains(text))
    }
}

impl Surface for BufferSurface {
    fn clear(&mut self) {
        let mut buffer = self.inner.borrow_mut();
        buffer.lines.clear();
        buffer.clears += 1;
    }

    fn print_line(&mut self, line: &str) {
        self.inner.borrow_mut().lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_clones_share_lines() {
        let handle = BufferSurface::new();
        let mut boxed: Box<dyn Surface> = Box::new(handle.clone());
        boxed.print_line("hello");
        assert_eq!(handle.lines(), vec!["hello".to_string()]);

        boxed.clear();
        assert!(handle.lines().is_empty());
        assert_eq!(handle.clears(), 1);
    }
}
