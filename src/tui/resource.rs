/// Outcome of asking for something that may arrive later
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource<T, E = String> {
    /// Still on its way; ask again later
    Loading,

    Success(T),

    /// Stays failed until whoever owns it is told to retry
    Failure(E),
}

impl<T, E> Resource<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Resource::Failure(_))
    }
}
