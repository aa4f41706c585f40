// This file is part of asmforge, an assembler.
// Copyright 2024 the asmforge contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// asmforge is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// asmforge is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with asmforge.  If not, see <http://www.gnu.org/licenses/>.

//! Flat name-to-value label tables.

use crate::value::Value;

/// A single label: a name paired with the value it resolves to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Label {
    pub name:  String,
    pub value: Value,
}

/// An append-only, duplicate-permitting name-to-value table.
///
/// Unlike [`crate::message`]'s interning-style tables in the teacher this is
/// based on, a `SymbolTable` never deduplicates: two labels with the same
/// name may coexist, and [`SymbolTable::find`] returns the first one
/// inserted. An evaluator uses one `SymbolTable` for globals and another for
/// locals.
#[derive(Clone, Default, Debug)]
pub struct SymbolTable {
    labels: Vec<Label>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Appends a label, regardless of whether a label with the same name
    /// already exists.
    pub fn append(&mut self, name: impl Into<String>, value: Value) {
        self.labels.push(Label { name: name.into(), value });
    }

    /// Returns the value of the first label inserted with the given name.
    pub fn find(&self, name: &str) -> Option<Value> {
        self.labels.iter().find(|l| l.name == name).map(|l| l.value)
    }

    /// Returns the number of labels in the table.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the table has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_finds_nothing() {
        let table = SymbolTable::new();
        assert_eq!(table.find("label"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn append_and_find() {
        let mut table = SymbolTable::new();
        table.append("label", 12345);
        assert_eq!(table.find("label"), Some(12345));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_returns_first_of_duplicates() {
        let mut table = SymbolTable::new();
        table.append("x", 1);
        table.append("x", 2);
        assert_eq!(table.find("x"), Some(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn find_is_case_sensitive_and_exact() {
        let mut table = SymbolTable::new();
        table.append("Label", 1);
        assert_eq!(table.find("label"), None);
    }
}
