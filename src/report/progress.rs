use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Width of the textual bar, in characters.
pub const BAR_WIDTH: usize = 77;

/// Progress over a bulk phase.
pub trait ProgressIndicator {
    fn set_total(&mut self, total: u64);
    fn increment(&mut self);
    /// Current state as a single line of text.
    fn render(&self) -> String;
    /// Called once the phase is over, successful or not.
    fn finish(&mut self) {}
}

/// `[####      ] 40%` style rendering shared by all implementations.
pub fn render_bar(done: u64, total: u64, width: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (done as f64 / total as f64).clamp(0.0, 1.0)
    };
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        " ".repeat(width - filled),
        (ratio * 100.0).round() as u16
    )
}

/// Terminal progress bar drawn on stderr by `indicatif`.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("[{bar:77}] {percent}% {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("## ");
        bar.set_style(style);
        BarProgress { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressIndicator for BarProgress {
    fn set_total(&mut self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn increment(&mut self) {
        self.bar.inc(1);
    }

    fn render(&self) -> String {
        render_bar(
            self.bar.position(),
            self.bar.length().unwrap_or(0),
            BAR_WIDTH,
        )
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Counts without drawing anything.
#[derive(Debug, Default, Clone)]
pub struct NullProgress {
    pub total: u64,
    pub done: u64,
}

impl ProgressIndicator for NullProgress {
    fn set_total(&mut self, total: u64) {
        self.total = total;
        self.done = 0;
    }

    fn increment(&mut self) {
        self.done += 1;
    }

    fn render(&self) -> String {
        render_bar(self.done, self.total, BAR_WIDTH)
    }
}
