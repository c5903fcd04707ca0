/// Lifecycle of one catalog fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// The four states rendering cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Error,
    Empty,
    Ready,
}

impl<T> LoadState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Failed(message) => LoadState::Failed(message),
            Self::Ready(value) => LoadState::Ready(f(value)),
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// Items when ready, otherwise an empty slice.
    pub fn items(&self) -> &[T] {
        self.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn phase(&self) -> LoadPhase {
        match self {
            Self::Loading => LoadPhase::Loading,
            Self::Failed(_) => LoadPhase::Error,
            Self::Ready(items) if items.is_empty() => LoadPhase::Empty,
            Self::Ready(_) => LoadPhase::Ready,
        }
    }
}

/// Collapsed view over the picker's three fetches.
///
/// `is_loading` holds while any fetch the lists depend on is still running;
/// `has_data` once either billboard list has something to show. Errors are
/// collected so each failed fetch gets its own inline notice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickerGate {
    pub is_loading: bool,
    pub has_data: bool,
    pub errors: Vec<String>,
}

impl PickerGate {
    pub fn from_states<R, B>(
        regions: &LoadState<Vec<R>>,
        all_billboards: &LoadState<Vec<B>>,
        filtered_billboards: &LoadState<Vec<B>>,
    ) -> Self {
        let errors = [
            regions.error().map(|error| format!("Regions: {error}")),
            all_billboards.error().map(|error| format!("Billboards: {error}")),
            filtered_billboards.error().map(|error| format!("Search: {error}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self {
            is_loading: all_billboards.is_loading() || filtered_billboards.is_loading(),
            has_data: all_billboards.phase() == LoadPhase::Ready
                || filtered_billboards.phase() == LoadPhase::Ready,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_cover_the_lattice() {
        assert_eq!(LoadState::<Vec<u8>>::Loading.phase(), LoadPhase::Loading);
        assert_eq!(LoadState::<Vec<u8>>::Failed("x".into()).phase(), LoadPhase::Error);
        assert_eq!(LoadState::<Vec<u8>>::Ready(vec![]).phase(), LoadPhase::Empty);
        assert_eq!(LoadState::Ready(vec![1]).phase(), LoadPhase::Ready);
    }

    #[test]
    fn items_are_empty_unless_ready() {
        assert!(LoadState::<Vec<u8>>::Failed("offline".into()).items().is_empty());
        assert_eq!(LoadState::Ready(vec![1, 2]).items(), [1, 2]);
    }

    #[test]
    fn gate_reports_partial_failure_without_hiding_data() {
        let regions: LoadState<Vec<u8>> = LoadState::Failed("timeout".into());
        let all = LoadState::Ready(vec![1, 2]);
        let filtered = LoadState::Ready(vec![2]);
        let gate = PickerGate::from_states(&regions, &all, &filtered);
        assert!(!gate.is_loading);
        assert!(gate.has_data);
        assert_eq!(gate.errors, ["Regions: timeout"]);
    }

    #[test]
    fn gate_is_loading_while_a_list_is_pending() {
        let regions = LoadState::Ready(vec![1u8]);
        let all: LoadState<Vec<u8>> = LoadState::Loading;
        let filtered = LoadState::Ready(Vec::<u8>::new());
        let gate = PickerGate::from_states(&regions, &all, &filtered);
        assert!(gate.is_loading);
        assert!(!gate.has_data);
        assert!(gate.errors.is_empty());
    }

    #[test]
    fn from_result_keeps_error_text() {
        let state: LoadState<u8> = LoadState::from_result(Err::<u8, _>("HTTP 500"));
        assert_eq!(state.error(), Some("HTTP 500"));
    }
}
