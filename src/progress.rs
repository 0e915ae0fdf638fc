//! Progress reporting for long-running dispatch work.

use indicatif::ProgressStyle;

/// A progress bar the progressive unit of work can drive.
pub trait ProgressBar {
    /// Current progress.
    fn current(&self) -> u64;

    /// Total progress, when known.
    fn total(&self) -> Option<u64>;

    /// Whether the bar stays rendered after it is closed.
    fn leave(&self) -> bool;

    /// Advance the bar by `n`.
    fn update(&mut self, n: u64);

    /// Reset the bar, optionally with a new total.
    fn reset(&mut self, total: Option<u64>);

    /// Redraw the bar.
    fn refresh(&mut self);

    /// Write a message without breaking the bar.
    fn write(&self, message: &str);

    /// Close the bar.
    fn close(&mut self);
}

/// Terminal progress bar backed by indicatif.
pub struct IndicatifProgressBar {
    bar: indicatif::ProgressBar,
    leave: bool,
}

impl IndicatifProgressBar {
    pub fn new(description: &str, total: u64, leave: bool) -> Self {
        let bar = indicatif::ProgressBar::new(total);
        let style = ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(description.to_string());
        Self { bar, leave }
    }

    /// Bar that draws nowhere; used in non-terminal contexts and tests.
    pub fn hidden(total: u64, leave: bool) -> Self {
        let bar = indicatif::ProgressBar::hidden();
        bar.set_length(total);
        Self { bar, leave }
    }
}

impl ProgressBar for IndicatifProgressBar {
    fn current(&self) -> u64 {
        self.bar.position()
    }

    fn total(&self) -> Option<u64> {
        self.bar.length()
    }

    fn leave(&self) -> bool {
        self.leave
    }

    fn update(&mut self, n: u64) {
        self.bar.inc(n);
    }

    fn reset(&mut self, total: Option<u64>) {
        if let Some(total) = total {
            self.bar.set_length(total);
        }
        self.bar.reset();
    }

    fn refresh(&mut self) {
        self.bar.tick();
    }

    fn write(&self, message: &str) {
        self.bar.println(message);
    }

    fn close(&mut self) {
        if self.leave {
            self.bar.finish();
        } else {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_advances_position() {
        let mut bar = IndicatifProgressBar::hidden(10, false);
        bar.update(4);
        assert_eq!(bar.current(), 4);
        assert_eq!(bar.total(), Some(10));
    }

    #[test]
    fn test_reset_restarts_progress() {
        let mut bar = IndicatifProgressBar::hidden(10, true);
        bar.update(7);
        bar.reset(Some(20));
        assert_eq!(bar.current(), 0);
        assert_eq!(bar.total(), Some(20));
        assert!(bar.leave());
    }
}
