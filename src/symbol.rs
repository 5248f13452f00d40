use std::collections::HashMap;

use crate::value::SymbolId;

/// Interned symbol table. Each unique name maps to a unique SymbolId,
/// so `(eq? 'foo 'foo)` is true because both reads resolve to the same
/// id. Names are uppercased by the reader before interning and live for
/// the life of the process.
pub struct SymbolTable {
    name_to_id: HashMap<String, SymbolId>,
    id_to_name: Vec<String>,
}

/// Well-known symbol IDs, pre-interned at startup.
/// These must match the order of interning in SymbolTable::new().
pub mod sym {
    use crate::value::SymbolId;

    pub const T: SymbolId = SymbolId(0);
    pub const QUOTE: SymbolId = SymbolId(1);
    pub const QUASIQUOTE: SymbolId = SymbolId(2);
    pub const UNQUOTE: SymbolId = SymbolId(3);
    pub const UNQUOTE_SPLICING: SymbolId = SymbolId(4);
    pub const IF: SymbolId = SymbolId(5);
    pub const LAMBDA: SymbolId = SymbolId(6);
    pub const DEFINE: SymbolId = SymbolId(7);
    pub const DEFMACRO: SymbolId = SymbolId(8);
    pub const APPLY: SymbolId = SymbolId(9);
    pub const GC: SymbolId = SymbolId(10);
    // Builtin names
    pub const CAR: SymbolId = SymbolId(11);
    pub const CDR: SymbolId = SymbolId(12);
    pub const CONS: SymbolId = SymbolId(13);
    pub const PAIR_P: SymbolId = SymbolId(14);
    pub const EQ_P: SymbolId = SymbolId(15);
    pub const ADD: SymbolId = SymbolId(16);
    pub const SUB: SymbolId = SymbolId(17);
    pub const MUL: SymbolId = SymbolId(18);
    pub const DIV: SymbolId = SymbolId(19);
    pub const NUM_EQ: SymbolId = SymbolId(20);
    pub const LT: SymbolId = SymbolId(21);
    pub const LE: SymbolId = SymbolId(22);
    pub const GT: SymbolId = SymbolId(23);
    pub const GE: SymbolId = SymbolId(24);
}

impl SymbolTable {
    /// Create a new symbol table with all well-known symbols pre-interned.
    /// The order MUST match the constants in the `sym` module above.
    pub fn new() -> Self {
        let names = [
            "T", "QUOTE", "QUASIQUOTE", "UNQUOTE", "UNQUOTE-SPLICING",
            "IF", "LAMBDA", "DEFINE", "DEFMACRO", "APPLY", "GC",
            "CAR", "CDR", "CONS", "PAIR?", "EQ?",
            "+", "-", "*", "/", "=", "<", "<=", ">", ">=",
        ];

        let mut name_to_id = HashMap::new();
        let mut id_to_name = Vec::new();

        for (i, name) in names.iter().enumerate() {
            let id = SymbolId(i as u32);
            name_to_id.insert(name.to_string(), id);
            id_to_name.push(name.to_string());
        }

        SymbolTable {
            name_to_id,
            id_to_name,
        }
    }

    /// Intern a symbol name. Returns the existing ID if already interned,
    /// or creates a new one.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = SymbolId(self.id_to_name.len() as u32);
        self.name_to_id.insert(name.to_string(), id);
        self.id_to_name.push(name.to_string());
        id
    }

    /// Look up a symbol name by its ID.
    pub fn name(&self, id: SymbolId) -> &str {
        &self.id_to_name[id.0 as usize]
    }

    /// Total number of interned symbols.
    pub fn count(&self) -> usize {
        self.id_to_name.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ids_match_their_names() {
        let table = SymbolTable::new();
        assert_eq!(table.name(sym::T), "T");
        assert_eq!(table.name(sym::QUOTE), "QUOTE");
        assert_eq!(table.name(sym::UNQUOTE_SPLICING), "UNQUOTE-SPLICING");
        assert_eq!(table.name(sym::GC), "GC");
        assert_eq!(table.name(sym::PAIR_P), "PAIR?");
        assert_eq!(table.name(sym::GE), ">=");
    }

    #[test]
    fn interning_is_idempotent() {
        let mut table = SymbolTable::new();
        let a = table.intern("ZEBRA");
        let b = table.intern("ZEBRA");
        assert_eq!(a, b);
        assert_eq!(table.name(a), "ZEBRA");
        assert_ne!(a, table.intern("ZEBRAS"));
    }

    #[test]
    fn pre_interned_names_resolve_without_growth() {
        let mut table = SymbolTable::new();
        let before = table.count();
        assert_eq!(table.intern("DEFINE"), sym::DEFINE);
        assert_eq!(table.count(), before);
    }
}
