//! Progress reporting for batch runs.

use colored::Colorize;

/// Receives one tick per processed article.
pub trait Progress {
    fn start(&mut self, total: usize);

    /// Called after an article is done; `position` is 1-based.
    fn advance(&mut self, position: usize, total: usize, title: &str);

    fn finish(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _total: usize) {}

    fn advance(&mut self, _position: usize, _total: usize, _title: &str) {}
}

/// Prints `[current/total] title` lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalProgress;

impl Progress for TerminalProgress {
    fn start(&mut self, total: usize) {
        eprintln!("{} {} articles", "Summarising".bold(), total);
    }

    fn advance(&mut self, position: usize, total: usize, title: &str) {
        let counter = format!("[{}/{}]", position, total);
        eprintln!("{} {}", counter.cyan(), title);
    }

    fn finish(&mut self) {
        eprintln!("{}", "Done".green().bold());
    }
}
