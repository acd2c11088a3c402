use super::{Params, ScreenId};

/// Identity of one navigable entry, assigned when the entry is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// What the render host keys a mounted screen by.
///
/// A mounted screen is reused only while the key stays equal. Any push, pop or
/// reset changes `entry`; `force_update` changes `version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub entry: EntryId,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    pub id: EntryId,
    pub screen: ScreenId,
    pub title: String,
    pub params: Params,
}

/// Back-navigable stack of screens.
///
/// The root is held apart from the rest so the stack can never be empty.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    root: StackEntry,
    rest: Vec<StackEntry>,
    next_id: u64,
    version: u64,
}

impl NavigationStack {
    pub fn new(screen: ScreenId, title: impl Into<String>, params: Params) -> Self {
        let root = StackEntry {
            id: EntryId(0),
            screen,
            title: title.into(),
            params,
        };
        Self {
            root,
            rest: Vec::new(),
            next_id: 1,
            version: 0,
        }
    }

    fn allocate(&mut self, screen: ScreenId, title: String, params: Params) -> StackEntry {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        StackEntry { id, screen, title, params }
    }

    /// Append an entry. The screen is not checked against any registry.
    pub fn push(&mut self, screen: ScreenId, title: impl Into<String>, params: Params) -> EntryId {
        let entry = self.allocate(screen, title.into(), params);
        let id = entry.id;
        log::debug!("push {} (depth {} -> {})", screen, self.len(), self.len() + 1);
        self.rest.push(entry);
        id
    }

    /// Remove the top entry unless it is the root
    pub fn pop(&mut self) -> Option<StackEntry> {
        let popped = self.rest.pop();
        match &popped {
            Some(entry) => log::debug!("pop {} (depth {} -> {})", entry.screen, self.len() + 1, self.len()),
            None => log::debug!("pop ignored at root {}", self.root.screen),
        }
        popped
    }

    /// Replace the whole stack with a single root entry
    pub fn reset(&mut self, screen: ScreenId, title: impl Into<String>, params: Params) -> EntryId {
        log::debug!("reset to {} (depth {} -> 1)", screen, self.len());
        self.rest.clear();
        self.root = self.allocate(screen, title.into(), params);
        self.root.id
    }

    /// Invalidate the current render key without touching the entries
    pub fn force_update(&mut self) -> u64 {
        self.version += 1;
        log::debug!("force update of {} (version {})", self.top().screen, self.version);
        self.version
    }

    pub fn top(&self) -> &StackEntry {
        self.rest.last().unwrap_or(&self.root)
    }

    pub fn root(&self) -> &StackEntry {
        &self.root
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn render_key(&self) -> RenderKey {
        RenderKey {
            entry: self.top().id,
            version: self.version,
        }
    }

    /// Entries from root to top
    pub fn entries(&self) -> impl Iterator<Item = &StackEntry> {
        std::iter::once(&self.root).chain(self.rest.iter())
    }

    pub fn screens(&self) -> Vec<ScreenId> {
        self.entries().map(|e| e.screen).collect()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries().map(|e| e.title.as_str()).collect()
    }
}
