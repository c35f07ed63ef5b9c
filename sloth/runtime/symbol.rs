use std::{
   borrow::Borrow,
   fmt,
   hash,
   ops,
};

use arcstr::ArcStr;
use rustc_hash::FxHashSet;

/// An interned name. Cheap to clone, compared and hashed by content.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Symbol(ArcStr);

impl hash::Hash for Symbol {
   fn hash<H: hash::Hasher>(&self, state: &mut H) {
      (**self).hash(state);
   }
}

impl ops::Deref for Symbol {
   type Target = str;

   fn deref(&self) -> &Self::Target {
      &self.0
   }
}

impl Borrow<str> for Symbol {
   fn borrow(&self) -> &str {
      self
   }
}

impl fmt::Display for Symbol {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer.write_str(self)
   }
}

impl fmt::Debug for Symbol {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(writer, "{:?}", &**self)
   }
}

/// Deduplicates symbol storage, so equal names share one allocation.
#[derive(Default)]
pub struct SymbolTable(FxHashSet<Symbol>);

impl SymbolTable {
   #[must_use]
   pub fn new() -> Self {
      Self::default()
   }

   pub fn intern(&mut self, name: &str) -> Symbol {
      if let Some(symbol) = self.0.get(name) {
         return symbol.clone();
      }

      let symbol = Symbol(ArcStr::from(name));
      self.0.insert(symbol.clone());
      symbol
   }

   #[must_use]
   pub fn len(&self) -> usize {
      self.0.len()
   }

   #[must_use]
   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn interning_shares_storage() {
      let mut table = SymbolTable::new();

      let first = table.intern("foo");
      let second = table.intern("foo");
      let other = table.intern("bar");

      assert_eq!(first, second);
      assert!(ArcStr::ptr_eq(&first.0, &second.0));
      assert_ne!(first, other);
      assert_eq!(table.len(), 2);
   }
}
