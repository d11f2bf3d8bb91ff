//! Lookup of [ScalarReader]s by type and width.
//!
//! Build a [Registry] once (usually [Registry::standard]) and pass it by
//! reference to whatever assembles schemas from names and widths.

use std::collections::BTreeMap;

use crate::readers::{ReaderType, ScalarReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    readers: BTreeMap<ReaderType, BTreeMap<usize, ScalarReader>>,
}

impl Registry {
    /// A registry with no readers.
    pub fn empty() -> Self {
        Self {
            readers: BTreeMap::new(),
        }
    }

    /// text{4}, uint{1, 2, 4, 8} and double{8}.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry
            .register(ScalarReader::text(4))
            .register(ScalarReader::uint(1))
            .register(ScalarReader::uint(2))
            .register(ScalarReader::uint(4))
            .register(ScalarReader::uint(8))
            .register(ScalarReader::double());
        registry
    }

    /// Adds `reader` under its type and width, replacing any previous entry.
    pub fn register(&mut self, reader: ScalarReader) -> &mut Self {
        self.readers
            .entry(reader.kind())
            .or_default()
            .insert(reader.width(), reader);
        self
    }

    /// All readers of one type, keyed by width.
    pub fn registry_for(&self, kind: ReaderType) -> Option<&BTreeMap<usize, ScalarReader>> {
        self.readers.get(&kind)
    }

    pub fn get(&self, kind: ReaderType, width: usize) -> Option<ScalarReader> {
        self.registry_for(kind)?.get(&width).copied()
    }

    pub fn text(&self, width: usize) -> Option<ScalarReader> {
        self.get(ReaderType::Text, width)
    }

    pub fn uint(&self, width: usize) -> Option<ScalarReader> {
        self.get(ReaderType::Uint, width)
    }

    pub fn double(&self) -> Option<ScalarReader> {
        self.get(ReaderType::Double, 8)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
