//! Flat-scope symbol table: one authoritative entry per name plus a
//! separately kept history of redeclarations.
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::ast::VarType;
use crate::core::error::ErrorKind;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolEntry {
    #[serde(rename = "type")]
    pub ty: VarType,
    pub value: Option<Value>,
    /// 1-based declaration order, assigned once.
    pub declared_at: usize,
    /// Line of the first declaration.
    pub line: usize,
    pub usage_lines: BTreeSet<usize>,
    pub error: Option<ErrorKind>,
    /// Last assigned from `cin` (directly or through an expression), so the
    /// value exists but is only known at run time.
    pub unknown: bool,
}

/// A later declaration of an already known name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redeclaration {
    pub name: String,
    pub previous: VarType,
    pub requested: VarType,
    pub line: usize,
    /// Whether the requested type outranked the stored one and replaced it.
    pub upgraded: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct SymbolTable {
    symbols: IndexMap<String, SymbolEntry>,
    redeclarations: Vec<Redeclaration>,
    #[serde(skip)]
    next_loc: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, name: &str, ty: VarType, value: Option<Value>, line: usize) {
        let Some(entry) = self.symbols.get_mut(name) else {
            self.next_loc += 1;
            let stored = value.and_then(|v| coerce_into(ty, v));
            let error = (value.is_some() && stored.is_none()).then_some(ErrorKind::TypeError);
            self.symbols.insert(
                name.to_string(),
                SymbolEntry {
                    ty,
                    value: stored,
                    declared_at: self.next_loc,
                    line,
                    usage_lines: BTreeSet::from([line]),
                    error,
                    unknown: false,
                },
            );
            return;
        };

        let previous = entry.ty;
        let upgraded = ty > previous;
        if upgraded {
            entry.ty = ty;
            if let Some(Value::Int(i)) = entry.value {
                entry.value = Some(Value::Float(i as f64));
            }
            tracing::warn!(name, from = %previous, to = %ty, line, "redeclaration widened type");
        } else {
            tracing::warn!(name, kept = %previous, requested = %ty, line, "redeclaration ignored");
        }
        entry.usage_lines.insert(line);
        self.redeclarations.push(Redeclaration {
            name: name.to_string(),
            previous,
            requested: ty,
            line,
            upgraded,
        });
    }

    pub fn add_usage(&mut self, name: &str, line: usize) {
        if let Some(entry) = self.symbols.get_mut(name) {
            entry.usage_lines.insert(line);
        }
    }

    /// Stores `value` if it fits the declared type. A non-integral value for an
    /// `int` is rejected: the old value stays and the entry carries `TypeError`.
    pub fn update_value(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        let entry = self.symbols.get_mut(name).ok_or(ErrorKind::NameError)?;
        match coerce_into(entry.ty, value) {
            Some(v) => {
                entry.value = Some(v);
                entry.error = None;
                entry.unknown = false;
                Ok(())
            }
            None => {
                entry.error = Some(ErrorKind::TypeError);
                Err(ErrorKind::TypeError)
            }
        }
    }

    /// Flags a failed assignment without touching the stored value.
    pub fn mark_error(&mut self, name: &str, kind: ErrorKind) {
        if let Some(entry) = self.symbols.get_mut(name) {
            entry.error = Some(kind);
        }
    }

    /// Records an assignment whose value only exists at run time. Clears any
    /// earlier error, since the variable now holds a fresh value.
    pub fn mark_unknown(&mut self, name: &str) {
        if let Some(entry) = self.symbols.get_mut(name) {
            entry.value = None;
            entry.error = None;
            entry.unknown = true;
        }
    }

    pub fn get_symbol(&self, name: &str) -> Option<&SymbolEntry> {
        self.symbols.get(name)
    }

    pub fn get_symbols(&self) -> &IndexMap<String, SymbolEntry> {
        &self.symbols
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn redeclarations(&self) -> &[Redeclaration] {
        &self.redeclarations
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn coerce_into(ty: VarType, value: Value) -> Option<Value> {
    if ty.is_integral() {
        value.as_integral().map(Value::Int)
    } else {
        Some(Value::Float(value.as_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_index_is_monotonic() {
        let mut t = SymbolTable::new();
        t.add_symbol("a", VarType::Int, None, 1);
        t.add_symbol("b", VarType::Float, None, 1);
        t.add_symbol("a", VarType::Int, None, 2);
        t.add_symbol("c", VarType::Int, None, 3);
        let locs: Vec<_> = t.get_symbols().iter().map(|(n, e)| (n.as_str(), e.declared_at)).collect();
        assert_eq!(locs, vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn higher_priority_redeclaration_upgrades() {
        let mut t = SymbolTable::new();
        t.add_symbol("x", VarType::Int, Some(Value::Int(4)), 1);
        t.add_symbol("x", VarType::Float, None, 2);
        let e = t.get_symbol("x").unwrap();
        assert_eq!(e.ty, VarType::Float);
        assert_eq!(e.value, Some(Value::Float(4.0)));
        assert!(t.redeclarations()[0].upgraded);
    }

    #[test]
    fn lower_priority_redeclaration_only_records_usage() {
        let mut t = SymbolTable::new();
        t.add_symbol("x", VarType::Double, None, 1);
        t.add_symbol("x", VarType::Int, None, 4);
        let e = t.get_symbol("x").unwrap();
        assert_eq!(e.ty, VarType::Double);
        assert_eq!(e.usage_lines, BTreeSet::from([1, 4]));
        assert_eq!(t.len(), 1);
        assert!(!t.redeclarations()[0].upgraded);
    }

    #[test]
    fn fractional_value_rejected_for_int() {
        let mut t = SymbolTable::new();
        t.add_symbol("n", VarType::Int, None, 1);
        t.update_value("n", Value::Int(7)).unwrap();
        assert_eq!(t.update_value("n", Value::Float(2.5)), Err(ErrorKind::TypeError));
        let e = t.get_symbol("n").unwrap();
        assert_eq!(e.value, Some(Value::Int(7)));
        assert_eq!(e.error, Some(ErrorKind::TypeError));

        // whole floats are fine and clear the error
        t.update_value("n", Value::Float(3.0)).unwrap();
        let e = t.get_symbol("n").unwrap();
        assert_eq!(e.value, Some(Value::Int(3)));
        assert_eq!(e.error, None);
    }

    #[test]
    fn ints_widen_into_float_variables() {
        let mut t = SymbolTable::new();
        t.add_symbol("f", VarType::Float, None, 1);
        t.update_value("f", Value::Int(2)).unwrap();
        assert_eq!(t.get_symbol("f").unwrap().value, Some(Value::Float(2.0)));
    }

    #[test]
    fn input_value_is_unknown_until_reassigned() {
        let mut t = SymbolTable::new();
        t.add_symbol("n", VarType::Int, Some(Value::Int(2)), 1);
        t.mark_error("n", ErrorKind::DivisionByZero);
        t.mark_unknown("n");
        let e = t.get_symbol("n").unwrap();
        assert!(e.unknown);
        assert_eq!((e.value, e.error), (None, None));

        t.update_value("n", Value::Int(5)).unwrap();
        let e = t.get_symbol("n").unwrap();
        assert!(!e.unknown);
        assert_eq!(e.value, Some(Value::Int(5)));
    }

    #[test]
    fn undeclared_names_never_fail_destructively() {
        let mut t = SymbolTable::new();
        t.add_usage("ghost", 3);
        t.mark_error("ghost", ErrorKind::NameError);
        t.mark_unknown("ghost");
        assert!(!t.is_declared("ghost"));
        assert_eq!(t.update_value("ghost", Value::Int(1)), Err(ErrorKind::NameError));
        assert!(t.is_empty());
    }
}
