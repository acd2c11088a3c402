use super::{NavigationStack, Params, ScreenId};

/// A top-level section reachable from the bottom navigation bar
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub label: &'static str,
    pub screen: ScreenId,
    pub title: &'static str,
    pub params: Params,
}

impl Destination {
    pub fn new(label: &'static str, screen: ScreenId) -> Self {
        Self {
            label,
            screen,
            title: screen.label(),
            params: Params::new(),
        }
    }

    pub fn with_title(mut self, title: &'static str) -> Self {
        self.title = title;
        self
    }

    pub fn with_params(mut self, params: impl Into<Params>) -> Self {
        self.params = params.into();
        self
    }
}

/// Fixed set of destinations; selecting one always resets the stack.
///
/// Selection is "go to section root", never "go back within section", so
/// selecting the active destination resets as well.
#[derive(Debug, Clone)]
pub struct BottomNav {
    destinations: Vec<Destination>,
    active: usize,
}

impl BottomNav {
    /// Returns None when there are no destinations
    pub fn new(destinations: Vec<Destination>) -> Option<Self> {
        if destinations.is_empty() {
            return None;
        }
        Some(Self { destinations, active: 0 })
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Destination {
        &self.destinations[self.active]
    }

    /// Stack for a freshly mounted session, rooted at the first destination
    pub fn initial_stack(&self) -> NavigationStack {
        let first = &self.destinations[0];
        NavigationStack::new(first.screen, first.title, first.params.clone())
    }

    /// Select by position and reset `stack` to that destination's root.
    /// Out of range indices are ignored.
    pub fn select(&mut self, index: usize, stack: &mut NavigationStack) -> bool {
        let Some(destination) = self.destinations.get(index) else {
            log::debug!("Ignoring bottom nav selection {} of {}", index, self.destinations.len());
            return false;
        };
        log::info!("Bottom nav -> {} ({})", destination.label, destination.screen);
        stack.reset(destination.screen, destination.title, destination.params.clone());
        self.active = index;
        true
    }

    /// Select the destination rooted at `screen`, if there is one
    pub fn select_screen(&mut self, screen: ScreenId, stack: &mut NavigationStack) -> bool {
        match self.destinations.iter().position(|d| d.screen == screen) {
            Some(index) => self.select(index, stack),
            None => false,
        }
    }

    pub fn select_next(&mut self, stack: &mut NavigationStack) -> bool {
        let next = (self.active + 1) % self.destinations.len();
        self.select(next, stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nav() -> BottomNav {
        BottomNav::new(vec![
            Destination::new("Home", ScreenId::Overview),
            Destination::new("Students", ScreenId::StudentList),
            Destination::new("Messages", ScreenId::Messages).with_params(json!({"folder": "inbox"})),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_destinations_rejected() {
        assert!(BottomNav::new(Vec::new()).is_none());
    }

    #[test]
    fn test_select_replaces_deep_stack() {
        let mut nav = nav();
        let mut stack = nav.initial_stack();
        stack.push(ScreenId::StudentList, "Students", Params::new());
        stack.push(ScreenId::StudentDetail, "Ada", Params::new());
        assert_eq!(stack.len(), 3);

        assert!(nav.select(0, &mut stack));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().screen, ScreenId::Overview);
        assert_eq!(nav.active_index(), 0);
    }

    #[test]
    fn test_select_carries_destination_params() {
        let mut nav = nav();
        let mut stack = nav.initial_stack();
        assert!(nav.select(2, &mut stack));
        assert_eq!(stack.top().params.get_str("folder"), Some("inbox"));
        assert_eq!(nav.active().label, "Messages");
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut nav = nav();
        let mut stack = nav.initial_stack();
        stack.push(ScreenId::Fees, "Fees", Params::new());
        assert!(!nav.select(9, &mut stack));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_select_next_wraps() {
        let mut nav = nav();
        let mut stack = nav.initial_stack();
        nav.select(2, &mut stack);
        nav.select_next(&mut stack);
        assert_eq!(nav.active_index(), 0);
        assert!(nav.select_screen(ScreenId::StudentList, &mut stack));
        assert_eq!(nav.active_index(), 1);
        assert!(!nav.select_screen(ScreenId::Fees, &mut stack));
    }
}
