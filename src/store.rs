use thiserror::Error;

use crate::color::Color;

/// Opaque identifier for a palette owned by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteHandle(pub u32);

/// One palette slot: a name and a color, always moved together.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Color,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Host-side palette storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Handle does not name a live palette.
    #[error("no palette for handle {0}")]
    BadHandle(u32),

    /// Index past the end of the palette.
    #[error("index {index} out of range for palette of {count} entries")]
    IndexOutOfRange { index: usize, count: usize },
}

/// The host's palette storage. The sorter only reads entries and issues
/// index-based writes back; it never creates or destroys entries.
pub trait PaletteStore {
    fn is_editable(&self, handle: PaletteHandle) -> Result<bool, StoreError>;

    /// Copy-on-write support: clone a palette into a new editable one.
    fn duplicate(&mut self, handle: PaletteHandle) -> Result<PaletteHandle, StoreError>;

    fn count(&self, handle: PaletteHandle) -> Result<usize, StoreError>;

    fn entry(&self, handle: PaletteHandle, index: usize) -> Result<PaletteEntry, StoreError>;

    fn set_entry(
        &mut self,
        handle: PaletteHandle,
        index: usize,
        entry: PaletteEntry,
    ) -> Result<(), StoreError>;
}

/// The host's ambient state: the currently selected foreground and
/// background colors, used as autoslice endpoint markers.
pub trait Context {
    fn foreground(&self) -> Color;
    fn background(&self) -> Color;
}

/// A `Context` with fixed colors, as supplied on the command line.
#[derive(Debug, Clone, Copy)]
pub struct StaticContext {
    pub foreground: Color,
    pub background: Color,
}

impl Context for StaticContext {
    fn foreground(&self) -> Color {
        self.foreground
    }

    fn background(&self) -> Color {
        self.background
    }
}

#[derive(Debug, Clone)]
struct StoredPalette {
    entries: Vec<PaletteEntry>,
    editable: bool,
}

/// In-process `PaletteStore` used by the CLI and by tests. Handles are
/// indices into an append-only list, so they stay valid across
/// duplication.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    palettes: Vec<StoredPalette>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a palette and return its handle.
    pub fn insert(&mut self, entries: Vec<PaletteEntry>, editable: bool) -> PaletteHandle {
        self.palettes.push(StoredPalette { entries, editable });
        PaletteHandle(self.palettes.len() as u32 - 1)
    }

    /// Borrow all entries of a palette, in order.
    pub fn entries(&self, handle: PaletteHandle) -> Result<&[PaletteEntry], StoreError> {
        Ok(&self.palette(handle)?.entries)
    }

    fn palette(&self, handle: PaletteHandle) -> Result<&StoredPalette, StoreError> {
        self.palettes
            .get(handle.0 as usize)
            .ok_or(StoreError::BadHandle(handle.0))
    }
}

impl PaletteStore for InMemoryStore {
    fn is_editable(&self, handle: PaletteHandle) -> Result<bool, StoreError> {
        Ok(self.palette(handle)?.editable)
    }

    fn duplicate(&mut self, handle: PaletteHandle) -> Result<PaletteHandle, StoreError> {
        let entries = self.palette(handle)?.entries.clone();
        Ok(self.insert(entries, true))
    }

    fn count(&self, handle: PaletteHandle) -> Result<usize, StoreError> {
        Ok(self.palette(handle)?.entries.len())
    }

    fn entry(&self, handle: PaletteHandle, index: usize) -> Result<PaletteEntry, StoreError> {
        let palette = self.palette(handle)?;
        palette
            .entries
            .get(index)
            .cloned()
            .ok_or(StoreError::IndexOutOfRange {
                index,
                count: palette.entries.len(),
            })
    }

    fn set_entry(
        &mut self,
        handle: PaletteHandle,
        index: usize,
        entry: PaletteEntry,
    ) -> Result<(), StoreError> {
        let palette = self
            .palettes
            .get_mut(handle.0 as usize)
            .ok_or(StoreError::BadHandle(handle.0))?;
        let count = palette.entries.len();
        let slot = palette
            .entries
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, count })?;
        *slot = entry;
        Ok(())
    }
}
