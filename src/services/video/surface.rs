use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use bitflags::bitflags;

use super::{MountId, VideoError};

bitflags! {
    /// Presentation classes the controllers toggle on page elements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SurfaceFlags: u8 {
        /// Placeholder still faded out behind a playing preview
        const FADE_OUT = 1;
        /// Video surface faded in
        const FADE_IN = 1 << 1;
        /// Mute toggle shows the unmuted glyph
        const UNMUTED = 1 << 2;
    }
}

/// Display state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Rendered by the page's stylesheet default
    #[default]
    Default,

    /// Forced visible
    Shown,

    /// Forced hidden
    Hidden,
}

/// The page's mount points, as seen by the players.
///
/// Effects on an element that does not exist are silently ignored, so a
/// controller never fails because a layout omitted an optional element.
pub trait Surface: Send + Sync + 'static {
    /// Whether an element with this id exists.
    fn contains(&self, id: &MountId) -> bool;

    /// Create `child` inside `parent`, replacing any existing element with that id.
    ///
    /// # Errors
    /// Returns `VideoError::MountNotFound` if `parent` does not exist.
    fn create(&self, parent: &MountId, child: &MountId) -> Result<(), VideoError>;

    /// Remove an element and everything inside it.
    fn remove(&self, id: &MountId);

    /// Remove everything inside an element.
    fn clear(&self, id: &MountId);

    /// Replace an element's background fill.
    fn set_background(&self, id: &MountId, fill: &str);

    /// Force an element's visibility.
    fn set_visibility(&self, id: &MountId, visibility: Visibility);

    /// Add or remove presentation flags.
    fn set_flags(&self, id: &MountId, flags: SurfaceFlags, on: bool);
}

/// Snapshot of one element held by [`MemorySurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    /// Enclosing element, if created through [`Surface::create`]
    pub parent: Option<MountId>,
    /// Background fill, if one was set
    pub background: Option<String>,
    /// Forced visibility
    pub visibility: Visibility,
    /// Active presentation flags
    pub flags: SurfaceFlags,
}

/// In-memory [`Surface`] for headless runs and tests.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: Mutex<HashMap<MountId, ElementState>>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface holding the given root elements.
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<MountId>,
    {
        let surface = Self::new();
        {
            let mut elements = surface.lock();
            for id in ids {
                elements.insert(id.into(), ElementState::default());
            }
        }
        surface
    }

    /// Add a root element.
    pub fn insert_root(&self, id: &MountId) {
        self.lock().entry(id.clone()).or_default();
    }

    /// Snapshot of an element.
    pub fn element(&self, id: &MountId) -> Option<ElementState> {
        self.lock().get(id).cloned()
    }

    /// Background fill of an element.
    pub fn background(&self, id: &MountId) -> Option<String> {
        self.lock().get(id).and_then(|el| el.background.clone())
    }

    /// Visibility of an element, `Default` when absent.
    pub fn visibility(&self, id: &MountId) -> Visibility {
        self.lock()
            .get(id)
            .map(|el| el.visibility)
            .unwrap_or_default()
    }

    /// Whether all of `flags` are set on an element.
    pub fn has_flags(&self, id: &MountId, flags: SurfaceFlags) -> bool {
        self.lock()
            .get(id)
            .is_some_and(|el| el.flags.contains(flags))
    }

    /// Ids of every element, sorted.
    pub fn element_ids(&self) -> Vec<MountId> {
        let mut ids: Vec<MountId> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MountId, ElementState>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_children(elements: &mut HashMap<MountId, ElementState>, parent: &MountId) {
        let children: Vec<MountId> = elements
            .iter()
            .filter(|(_, el)| el.parent.as_ref() == Some(parent))
            .map(|(id, _)| id.clone())
            .collect();

        for child in children {
            elements.remove(&child);
            Self::remove_children(elements, &child);
        }
    }
}

impl Surface for MemorySurface {
    fn contains(&self, id: &MountId) -> bool {
        self.lock().contains_key(id)
    }

    fn create(&self, parent: &MountId, child: &MountId) -> Result<(), VideoError> {
        let mut elements = self.lock();
        if !elements.contains_key(parent) {
            return Err(VideoError::MountNotFound(parent.clone()));
        }

        Self::remove_children(&mut elements, child);
        elements.insert(
            child.clone(),
            ElementState {
                parent: Some(parent.clone()),
                ..ElementState::default()
            },
        );
        Ok(())
    }

    fn remove(&self, id: &MountId) {
        let mut elements = self.lock();
        elements.remove(id);
        Self::remove_children(&mut elements, id);
    }

    fn clear(&self, id: &MountId) {
        Self::remove_children(&mut self.lock(), id);
    }

    fn set_background(&self, id: &MountId, fill: &str) {
        if let Some(el) = self.lock().get_mut(id) {
            el.background = Some(fill.to_string());
        }
    }

    fn set_visibility(&self, id: &MountId, visibility: Visibility) {
        if let Some(el) = self.lock().get_mut(id) {
            el.visibility = visibility;
        }
    }

    fn set_flags(&self, id: &MountId, flags: SurfaceFlags, on: bool) {
        if let Some(el) = self.lock().get_mut(id) {
            el.flags.set(flags, on);
        }
    }
}
