//! Edit buffer: the text the user sees, independent of what has been notified

use tracing::debug;

/// Lengths before and after a local edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Length of the buffer before the edit (in chars)
    pub previous_len: usize,
    /// Length of the buffer after the edit (in chars)
    pub new_len: usize,
}

impl Edit {
    /// True when the edit removed text
    pub fn is_deletion(&self) -> bool {
        self.previous_len > self.new_len
    }
}

/// Outcome of pushing an externally controlled value into the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Buffer took the external value
    Adopted,
    /// External value already matched the buffer
    Unchanged,
    /// A local edit is still waiting to be notified; external value dropped
    Ignored,
}

/// Authoritative current text of one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    value: String,
}

impl EditBuffer {
    /// Create a buffer holding `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: initial.into(),
        }
    }

    /// Current contents
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current length in chars
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Replace contents with a locally typed value
    pub fn set(&mut self, value: impl Into<String>) -> Edit {
        let previous_len = self.char_len();
        self.value = value.into();
        Edit {
            previous_len,
            new_len: self.char_len(),
        }
    }

    /// Reconcile with a value pushed by the owner
    ///
    /// While `pending` is true the user's in-flight edit wins, so an upstream
    /// echo of an older value cannot clobber what was just typed.
    pub fn reconcile_external(&mut self, value: &str, pending: bool) -> Reconciled {
        if pending {
            debug!(external = value, current = %self.value, "ignoring external value while notification pending");
            return Reconciled::Ignored;
        }

        if self.value == value {
            return Reconciled::Unchanged;
        }

        self.value.clear();
        self.value.push_str(value);
        Reconciled::Adopted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_lengths() {
        let mut buffer = EditBuffer::new("ab");
        let edit = buffer.set("abc");
        assert_eq!(edit, Edit { previous_len: 2, new_len: 3 });
        assert!(!edit.is_deletion());

        let edit = buffer.set("a");
        assert!(edit.is_deletion());
        assert_eq!(buffer.value(), "a");
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let buffer = EditBuffer::new("héllo");
        assert_eq!(buffer.char_len(), 5);
    }

    #[test]
    fn test_external_value_adopted_when_idle() {
        let mut buffer = EditBuffer::new("old");
        assert_eq!(buffer.reconcile_external("new", false), Reconciled::Adopted);
        assert_eq!(buffer.value(), "new");
        assert_eq!(buffer.reconcile_external("new", false), Reconciled::Unchanged);
    }

    #[test]
    fn test_external_value_ignored_while_pending() {
        let mut buffer = EditBuffer::new("typed");
        assert_eq!(buffer.reconcile_external("echo", true), Reconciled::Ignored);
        assert_eq!(buffer.value(), "typed");
    }
}
