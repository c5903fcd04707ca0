use serde::{Deserialize, Serialize};

/// Billboard ids chosen for a proposal, in the order they were added.
///
/// Never holds the same id twice. Both mutations are idempotent, so a double
/// click that lands before the next render is harmless.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "Vec<String>")]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of every id.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.add(id);
        }
        selection
    }

    /// Returns `false` when the id was already selected.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Returns `false` when the id was not selected.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|selected| selected != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<String>> for Selection {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.add("b1"));
        assert!(!selection.add("b1"));
        assert_eq!(selection.ids(), ["b1"]);
    }

    #[test]
    fn add_then_remove_restores_previous_state() {
        let original = Selection::from_ids(["b1", "b2"]);
        let mut selection = original.clone();
        selection.add("b9");
        selection.remove("b9");
        assert_eq!(selection, original);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut selection = Selection::from_ids(["b1"]);
        assert!(!selection.remove("b2"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn from_ids_drops_duplicates_and_keeps_order() {
        let selection: Selection = ["b3", "b1", "b3", "b2", "b1"].into_iter().collect();
        assert_eq!(selection.ids(), ["b3", "b1", "b2"]);
    }

    #[test]
    fn wire_form_is_plain_id_list() {
        let selection = Selection::from_ids(["b1", "b2"]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"["b1","b2"]"#);
        let decoded: Selection = serde_json::from_str(r#"["b1","b1","b2"]"#).unwrap();
        assert_eq!(decoded.ids(), ["b1", "b2"]);
    }
}
