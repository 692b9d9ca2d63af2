//! Scope-aware symbol table (flat map keyed by the fully-qualified
//! `scope.name` string, per §9's "either works" note) and the ordered
//! literal pool appended after the last user instruction in pass 2.

use crate::error::{Error, ErrorKind};
use crate::ir::{Label, LiteralValue};
use std::collections::HashMap;

/// The anonymous scope name reserved for `START` entry-point labels.
pub const GLOBAL_SCOPE: &str = "";

#[derive(Default)]
pub struct SymbolTable {
    labels: HashMap<String, Label>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Defines `scope.name`. Returns an error if the fully-qualified name is
    /// already defined (duplicate label).
    pub fn define(
        &mut self,
        scope: &str,
        name: &str,
        line: u32,
        address: u16,
        goto: Option<String>,
    ) -> Result<(), String> {
        let label = Label {
            scope: scope.to_string(),
            name: name.to_string(),
            line,
            address,
            goto,
        };
        let key = label.qualified();
        if self.labels.contains_key(&key) {
            return Err(key);
        }
        self.labels.insert(key, label);
        Ok(())
    }

    pub fn get(&self, scope: &str, name: &str) -> Option<&Label> {
        self.labels.get(&format!("{}.{}", scope, name))
    }

    /// Resolves `name` as referenced from inside `scope`: first as
    /// `scope.name`, then as the anonymous-global `.name`.
    pub fn resolve(&self, scope: &str, name: &str, line: u32, text: &str) -> Result<u16, Error> {
        self.resolve_inner(scope, name, line, text, 0)
    }

    fn resolve_inner(
        &self,
        scope: &str,
        name: &str,
        line: u32,
        text: &str,
        depth: u32,
    ) -> Result<u16, Error> {
        if depth > 64 {
            return Err(Error::new(
                line,
                text,
                ErrorKind::UndefinedLabel(name.to_string()),
            ));
        }
        let label = self
            .get(scope, name)
            .or_else(|| self.get(GLOBAL_SCOPE, name))
            .ok_or_else(|| Error::new(line, text, ErrorKind::UndefinedLabel(name.to_string())))?;

        match &label.goto {
            // A START's `entry` operand: re-resolve within the scope the
            // START itself opened (its own label names that scope).
            Some(target) => self.resolve_inner(&label.name, target, line, text, depth + 1),
            None => Ok(label.address),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }
}

/// One synthesized `_Lnnnn` literal-pool entry: the value to emit as a `DC`
/// word (or words, for a string) once appended after the main program.
pub struct LiteralPool {
    entries: Vec<LiteralValue>,
}

impl LiteralPool {
    pub fn new() -> LiteralPool {
        LiteralPool { entries: Vec::new() }
    }

    /// Appends a literal (never deduplicated, per §4.3) and returns its
    /// index for later resolution.
    pub fn push(&mut self, value: LiteralValue) -> usize {
        self.entries.push(value);
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[LiteralValue] {
        &self.entries[..]
    }
}

impl Default for LiteralPool {
    fn default() -> LiteralPool {
        LiteralPool::new()
    }
}
