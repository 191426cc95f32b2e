// Client pipeline exports
pub mod form;
pub mod notify;
pub mod panel;
pub mod query;
pub mod render;
pub mod search;
pub mod tabs;
pub mod validator;

pub use form::{FilterForm, FormField, CATEGORY_FIELD, SIZE_FIELD};
pub use notify::{ConsoleNotifier, Notice, NoticeEvent, NoticeLevel, Notifier, RecordingNotifier};
pub use panel::RetailerPanel;
pub use query::{build_query, STORE_KEY};
pub use render::{compute_rows, render, MemoryTable, RenderContext, ResultRow, ResultTable, SizeLabel, PLACEHOLDER};
pub use search::{SearchClient, SearchError, SearchOutcome, SearchReport};
pub use tabs::TabController;
pub use validator::{check, validate, ValidationError};
