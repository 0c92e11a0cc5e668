//! Storage for window records.

use super::window::{Window, WindowId};

/// Owning collection of all windows of one session.
///
/// The [`WindowManager`](super::WindowManager) is the only user of a repository; it relies on
/// ids being unique and on iteration order being stable between mutations.
pub trait WindowRepository {
    /// Consumer data attached to each window.
    type Payload;

    fn get(&self, id: &WindowId) -> Option<&Window<Self::Payload>>;

    fn get_mut(&mut self, id: &WindowId) -> Option<&mut Window<Self::Payload>>;

    /// Stores a window, returning the previous window with the same id, if any.
    fn insert(&mut self, window: Window<Self::Payload>) -> Option<Window<Self::Payload>>;

    fn remove(&mut self, id: &WindowId) -> Option<Window<Self::Payload>>;

    fn clear(&mut self);

    /// Iterates windows in registry order.
    fn iter(&self) -> impl Iterator<Item = &Window<Self::Payload>>;

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window<Self::Payload>>;

    fn contains(&self, id: &WindowId) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Repository keeping windows in memory, in insertion order.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<P> {
    windows: Vec<Window<P>>,
}

impl<P> InMemoryRepository<P> {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    fn idx_of(&self, id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|win| &win.id == id)
    }
}

impl<P> Default for InMemoryRepository<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> WindowRepository for InMemoryRepository<P> {
    type Payload = P;

    fn get(&self, id: &WindowId) -> Option<&Window<P>> {
        self.windows.iter().find(|win| &win.id == id)
    }

    fn get_mut(&mut self, id: &WindowId) -> Option<&mut Window<P>> {
        self.windows.iter_mut().find(|win| &win.id == id)
    }

    fn insert(&mut self, window: Window<P>) -> Option<Window<P>> {
        match self.idx_of(&window.id) {
            Some(idx) => Some(std::mem::replace(&mut self.windows[idx], window)),
            None => {
                self.windows.push(window);
                None
            }
        }
    }

    fn remove(&mut self, id: &WindowId) -> Option<Window<P>> {
        let idx = self.idx_of(id)?;
        Some(self.windows.remove(idx))
    }

    fn clear(&mut self) {
        self.windows.clear();
    }

    fn iter(&self) -> impl Iterator<Item = &Window<P>> {
        self.windows.iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window<P>> {
        self.windows.iter_mut()
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}
