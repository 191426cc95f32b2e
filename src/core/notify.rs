use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: Option<String>,
    /// Dismissed without user action after this delay
    pub auto_dismiss: Option<Duration>,
}

impl Notice {
    pub fn warning(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            text: None,
            auto_dismiss: None,
        }
    }

    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            text: Some(text.into()),
            auto_dismiss: None,
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            text: Some(text.into()),
            auto_dismiss: None,
        }
    }

    pub fn success(title: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            text: None,
            auto_dismiss: Some(dismiss_after),
        }
    }
}

/// Notification capability handed to the pipeline components
///
/// The loading indicator is blocking: it stays up until `close_loading`.
pub trait Notifier: Send + Sync {
    fn show_loading(&self);
    fn close_loading(&self);
    fn notify(&self, notice: Notice);
}

/// Writes notices to stderr for terminal front ends
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_loading(&self) {
        eprintln!("Loading... please wait");
    }

    fn close_loading(&self) {}

    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        match &notice.text {
            Some(text) => eprintln!("[{}] {}: {}", tag, notice.title, text),
            None => eprintln!("[{}] {}", tag, notice.title),
        }
    }
}

/// Event captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    LoadingShown,
    LoadingClosed,
    Notice(Notice),
}

/// Keeps every event in order; used as a test double
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NoticeEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NoticeEvent> {
        self.lock().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                NoticeEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether a loading indicator is still up
    pub fn loading_open(&self) -> bool {
        let mut open = 0i32;
        for event in self.lock().iter() {
            match event {
                NoticeEvent::LoadingShown => open += 1,
                NoticeEvent::LoadingClosed => open = (open - 1).max(0),
                NoticeEvent::Notice(_) => {}
            }
        }
        open > 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NoticeEvent>> {
        // A poisoned log is still readable
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: NoticeEvent) {
        self.lock().push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn show_loading(&self) {
        self.push(NoticeEvent::LoadingShown);
    }

    fn close_loading(&self) {
        self.push(NoticeEvent::LoadingClosed);
    }

    fn notify(&self, notice: Notice) {
        self.push(NoticeEvent::Notice(notice));
    }
}
