//! Name → importer lookup table.

use crate::error::{ConvertError, Result};
use crate::importers::{
    airbank::AirBank, csob::Csob, fio::Fio, kb::Kb, mbank::MBank, slsp::Slsp,
    sporitelna::Sporitelna, tatra::Tatra, unicredit::UniCredit, zuno::Zuno, Importer,
};
use std::collections::BTreeMap;

const BUILTIN: &[&dyn Importer] = &[
    &AirBank, &Csob, &Fio, &Kb, &MBank, &Slsp, &Sporitelna, &Tatra, &UniCredit, &Zuno,
];

/// The set of importers a conversion can choose from.
///
/// Built once, then only read. Names are kept sorted so listings and error
/// messages are stable.
#[derive(Default)]
pub struct Registry {
    importers: BTreeMap<&'static str, &'static dyn Importer>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in format.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for importer in BUILTIN {
            let previous = registry.importers.insert(importer.name(), *importer);
            debug_assert!(previous.is_none(), "duplicate built-in format {}", importer.name());
        }
        registry
    }

    /// Adds an importer under its own name.
    pub fn register(&mut self, importer: &'static dyn Importer) -> Result<()> {
        let name = importer.name();
        if self.importers.contains_key(name) {
            return Err(ConvertError::DuplicateFormat(name));
        }
        self.importers.insert(name, importer);
        Ok(())
    }

    /// Looks up an importer by name.
    pub fn get(&self, name: &str) -> Result<&'static dyn Importer> {
        self.importers
            .get(name)
            .copied()
            .ok_or_else(|| ConvertError::UnknownFormat {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&'static str> {
        self.importers.keys().copied().collect()
    }
}
