//! Current path plus back-history.

use super::table::normalize_path;

/// Maximum number of entries kept in the back-history.
const HISTORY_LIMIT: usize = 50;

/// Where the user is, and where they have been.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: String,
    history: Vec<String>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl NavigationState {
    pub fn new(initial: &str) -> Self {
        Self {
            current: normalize_path(initial),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Go to `path`. Returns false if it normalises to the current path.
    pub fn navigate(&mut self, path: &str) -> bool {
        let path = normalize_path(path);
        if path == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, path);
        self.history.push(previous);
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
        true
    }

    /// Return to the previous path, if any.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Start over at `path` with no history (used after sign-out).
    pub fn reset(&mut self, path: &str) {
        self.current = normalize_path(path);
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_path_is_normalized() {
        assert_eq!(NavigationState::new("allrds?x").current(), "/allrds");
        assert_eq!(NavigationState::default().current(), "/");
    }

    #[test]
    fn test_navigate_and_back() {
        let mut nav = NavigationState::default();
        assert!(nav.navigate("/allec2"));
        assert!(nav.navigate("/alls3"));
        assert_eq!(nav.history_len(), 2);

        assert!(nav.back());
        assert_eq!(nav.current(), "/allec2");
        assert!(nav.back());
        assert_eq!(nav.current(), "/");
        assert!(!nav.back());
    }

    #[test]
    fn test_same_path_is_not_recorded() {
        let mut nav = NavigationState::new("/allec2");
        assert!(!nav.navigate("allec2"));
        assert!(!nav.can_go_back());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut nav = NavigationState::default();
        for i in 0..(HISTORY_LIMIT + 10) {
            nav.navigate(&format!("/p{}", i));
        }
        assert_eq!(nav.history_len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_reset() {
        let mut nav = NavigationState::default();
        nav.navigate("/allvpcs");
        nav.reset("/");
        assert_eq!(nav.current(), "/");
        assert!(!nav.can_go_back());
    }
}
