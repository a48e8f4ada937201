//! Operation dispatch.
//!
//! The host invokes operations by name. Instead of looking names up
//! dynamically, the table below enumerates every operation explicitly
//! and rejects anything else with a typed error.

use crate::error::SortError;
use crate::sorter::{sort_palette, SortRequest};
use crate::store::{Context, PaletteHandle, PaletteStore};

/// Name of the palette sort operation.
pub const PALETTE_SORT: &str = "palette-sort";

pub type Handler =
    fn(&mut dyn PaletteStore, &dyn Context, PaletteHandle, &SortRequest) -> Result<PaletteHandle, SortError>;

/// Maps operation names to handler functions.
pub struct CommandTable {
    entries: Vec<(&'static str, Handler)>,
}

impl CommandTable {
    /// Table with every built-in operation registered.
    pub fn with_builtins() -> Self {
        Self {
            entries: vec![(PALETTE_SORT, sort_palette as Handler)],
        }
    }

    /// Names of all registered operations.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Invoke an operation by name.
    pub fn dispatch(
        &self,
        name: &str,
        store: &mut dyn PaletteStore,
        ctx: &dyn Context,
        handle: PaletteHandle,
        request: &SortRequest,
    ) -> Result<PaletteHandle, SortError> {
        let handler = self
            .entries
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, handler)| *handler)
            .ok_or_else(|| SortError::UnknownOperation {
                name: name.to_string(),
            })?;
        handler(store, ctx, handle, request)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}
