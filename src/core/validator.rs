use crate::core::form::{FilterForm, CATEGORY_FIELD, SIZE_FIELD};
use crate::core::notify::{Notice, Notifier};
use thiserror::Error;

/// A required filter field was left unselected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a size")]
    MissingSize,

    #[error("Please select a category")]
    MissingCategory,
}

/// Check the required fields, size first
pub fn check(form: &FilterForm) -> Result<(), ValidationError> {
    if form.value(SIZE_FIELD).is_empty() {
        return Err(ValidationError::MissingSize);
    }
    if form.value(CATEGORY_FIELD).is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    Ok(())
}

/// Gate a submission, raising exactly one warning when it is blocked
pub fn validate(form: &FilterForm, notifier: &dyn Notifier) -> bool {
    match check(form) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Submission blocked: {}", e);
            notifier.notify(Notice::warning(e.to_string()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notify::{NoticeLevel, RecordingNotifier};

    #[test]
    fn test_size_checked_before_category() {
        let notifier = RecordingNotifier::new();
        assert!(!validate(&FilterForm::new(), &notifier));

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].title, ValidationError::MissingSize.to_string());
    }

    #[test]
    fn test_missing_category() {
        let form = FilterForm::new().select(SIZE_FIELD, "23", "23");
        assert_eq!(check(&form), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn test_both_present() {
        let notifier = RecordingNotifier::new();
        let form = FilterForm::new()
            .select(CATEGORY_FIELD, "148", "Ankle boots")
            .select(SIZE_FIELD, "23", "23");
        assert!(validate(&form, &notifier));
        assert!(notifier.events().is_empty());
    }
}
