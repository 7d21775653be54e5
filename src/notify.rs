//! Transient user notices.
//!
//! `notify(key, kind, message)` with a repeated key replaces the pending
//! entry instead of stacking a duplicate, so the persistent "processing"
//! notice raised at submit time is superseded by the success or failure
//! that resolves it.
//!
//! Rendering follows the terminal: a progress notice becomes a spinner on a
//! TTY and a plain stderr line otherwise. The pending queue itself is plain
//! data so callers and tests can inspect it.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Progress,
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub key: String,
    pub kind: NoticeKind,
    pub message: String,
}

pub struct Notifier {
    mode: NotifyMode,
    is_tty: bool,
    entries: Vec<Notice>,
    spinners: HashMap<String, ProgressBar>,
}

impl Notifier {
    pub fn new(mode: NotifyMode, is_tty: bool) -> Self {
        Self {
            mode,
            is_tty,
            entries: Vec::new(),
            spinners: HashMap::new(),
        }
    }

    /// Plain-text notifier, used off-TTY and in tests.
    pub fn plain() -> Self {
        Self::new(NotifyMode::Plain, false)
    }

    /// Raise or replace a notice. A key that is already pending keeps its
    /// position in the queue; only the kind and message change.
    pub fn notify(&mut self, key: &str, kind: NoticeKind, message: &str) {
        let notice = Notice {
            key: key.to_string(),
            kind,
            message: message.to_string(),
        };
        self.emit(&notice);
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => *entry = notice,
            None => self.entries.push(notice),
        }
    }

    /// Pending notices, oldest first.
    pub fn entries(&self) -> &[Notice] {
        &self.entries
    }

    fn use_pretty(&self) -> bool {
        match self.mode {
            NotifyMode::Pretty => true,
            NotifyMode::Plain => false,
            NotifyMode::Auto => self.is_tty,
        }
    }

    fn emit(&mut self, notice: &Notice) {
        if let Some(spinner) = self.spinners.remove(&notice.key) {
            match notice.kind {
                NoticeKind::Progress => {
                    spinner.set_message(notice.message.clone());
                    self.spinners.insert(notice.key.clone(), spinner);
                }
                NoticeKind::Success => {
                    spinner.finish_with_message(format!("✔ {}", notice.message));
                }
                NoticeKind::Error => {
                    spinner.finish_with_message(format!("✖ {}", notice.message));
                }
            }
            return;
        }

        match notice.kind {
            NoticeKind::Progress => {
                if self.use_pretty() {
                    let spinner = ProgressBar::new_spinner();
                    spinner.set_draw_target(ProgressDrawTarget::stderr());
                    spinner.enable_steady_tick(Duration::from_millis(120));
                    let style = ProgressStyle::with_template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner());
                    spinner.set_style(style);
                    spinner.set_message(notice.message.clone());
                    self.spinners.insert(notice.key.clone(), spinner);
                } else {
                    eprintln!("==> {}", notice.message);
                }
            }
            NoticeKind::Success => eprintln!("✔ {}", notice.message),
            NoticeKind::Error => eprintln!("✖ {}", notice.message),
        }
    }
}
