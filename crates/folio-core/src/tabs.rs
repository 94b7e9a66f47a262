#![forbid(unsafe_code)]

//! Exclusive tab strip state.

/// Exactly one of a fixed set of tabs is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSwitcher {
    ids: Vec<String>,
    active: Option<usize>,
}

impl TabSwitcher {
    /// Tabs in strip order. `initial` is activated if it names a tab,
    /// otherwise the first tab is.
    pub fn new<I, S>(ids: I, initial: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let active = initial
            .and_then(|id| ids.iter().position(|tab| tab == id))
            .or(if ids.is_empty() { None } else { Some(0) });
        Self { ids, active }
    }

    /// Make `id` the active tab. Unknown ids leave the strip unchanged and
    /// return `false`.
    pub fn activate(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|tab| tab == id) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => {
                tracing::debug!(tab = id, "ignoring unknown tab");
                false
            }
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.map(|index| self.ids[index].as_str())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active() == Some(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_active() {
        let mut tabs = TabSwitcher::new(["technical", "business"], None);
        assert_eq!(tabs.active(), Some("technical"));
        assert!(tabs.activate("business"));
        assert_eq!(tabs.ids().filter(|id| tabs.is_active(id)).count(), 1);
        assert!(tabs.is_active("business"));
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut tabs = TabSwitcher::new(["technical", "business"], Some("business"));
        assert!(!tabs.activate("hobbies"));
        assert_eq!(tabs.active(), Some("business"));
    }

    #[test]
    fn empty_strip_has_no_active_tab() {
        let mut tabs = TabSwitcher::new(Vec::<String>::new(), Some("technical"));
        assert_eq!(tabs.active(), None);
        assert!(!tabs.activate("technical"));
        assert!(tabs.is_empty());
    }
}
