// --- File: src/core/symbols.rs
use std::collections::HashMap;

/// An append-only symbol table mapping strings to dense integer ids and back.
///
/// Ids are handed out in insertion order starting at 0, so the table doubles
/// as an arena: the reverse lookup is a plain index into `symbols`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<String>,
    ids: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `symbol` with the next free id and returns that id.
    /// Returns `None` if the symbol is already present; the table is unchanged.
    pub fn push(&mut self, symbol: impl Into<String>) -> Option<u32> {
        let symbol = symbol.into();
        if self.ids.contains_key(&symbol) {
            return None;
        }
        let id = self.symbols.len() as u32;
        self.ids.insert(symbol.clone(), id);
        self.symbols.push(symbol);
        Some(id)
    }

    pub fn id(&self, symbol: &str) -> Option<u32> {
        self.ids.get(symbol).copied()
    }

    pub fn symbol(&self, id: u32) -> Option<&str> {
        self.symbols.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.ids.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// `(symbol, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(id, s)| (s.as_str(), id as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_reversible() {
        let mut table = SymbolTable::new();
        assert_eq!(table.push("<eps>"), Some(0));
        assert_eq!(table.push("sil"), Some(1));
        assert_eq!(table.push("spn"), Some(2));

        assert_eq!(table.id("sil"), Some(1));
        assert_eq!(table.symbol(2), Some("spn"));
        assert_eq!(table.symbol(3), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn duplicate_push_is_rejected() {
        let mut table = SymbolTable::new();
        table.push("a");
        assert_eq!(table.push("a"), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.push("b"), Some(1));
    }

    #[test]
    fn iter_walks_in_id_order() {
        let mut table = SymbolTable::new();
        for s in ["z", "a", "m"] {
            table.push(s);
        }
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![("z", 0), ("a", 1), ("m", 2)]);
    }
}
