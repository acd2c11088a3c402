/// Open/closed state of an overlay, carrying the overlay's data while open.
///
/// Replaces a `show_x: bool` plus `x_data: Option<T>` pair. Used for the
/// search overlay and the quit confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState<T> {
    Closed,
    Open(T),
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<T> ModalState<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ModalState::Open(data) => Some(data),
            ModalState::Closed => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            ModalState::Open(data) => Some(data),
            ModalState::Closed => None,
        }
    }

    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    pub fn open_with(&mut self, data: T) {
        *self = ModalState::Open(data);
    }
}

impl ModalState<()> {
    pub fn open_empty(&mut self) {
        *self = ModalState::Open(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut modal: ModalState<String> = ModalState::default();
        assert!(!modal.is_open());
        modal.open_with("query".to_string());
        assert_eq!(modal.data().map(String::as_str), Some("query"));
        if let Some(data) = modal.data_mut() {
            data.push('!');
        }
        assert_eq!(modal.data().map(String::as_str), Some("query!"));
        modal.close();
        assert_eq!(modal.data(), None);
    }
}
