//! Open/closed state of a detail dialog.

/// A dialog is either closed or open on one selected entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog<T> {
    #[default]
    Closed,
    Open(T),
}

impl<T> Dialog<T> {
    #[must_use]
    pub fn open(selected: T) -> Self {
        Self::Open(selected)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_closed() {
        let dialog = Dialog::open("user-1");
        assert!(dialog.is_open());
        assert_eq!(dialog, Dialog::Open("user-1"));

        let closed: Dialog<&str> = Dialog::default();
        assert!(!closed.is_open());
        assert_eq!(closed, Dialog::Closed);
    }
}
