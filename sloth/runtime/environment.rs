use std::{
   fmt,
   ptr,
};

use archery::RcK;
use rpds::{
   HashTrieMap,
   List,
};
use rustc_hash::FxBuildHasher;

use crate::{
   Symbol,
   value::Slot,
};

/// A single level of variable bindings.
#[derive(Clone)]
pub struct Scope(HashTrieMap<Symbol, Slot, RcK, FxBuildHasher>);

impl Default for Scope {
   fn default() -> Self {
      Self::new()
   }
}

impl Scope {
   #[must_use]
   pub fn new() -> Self {
      Self(HashTrieMap::new_with_hasher_and_ptr_kind(FxBuildHasher))
   }

   #[must_use]
   pub fn bind(&self, name: Symbol, slot: Slot) -> Self {
      Self(self.0.insert(name, slot))
   }

   #[must_use]
   pub fn get(&self, name: &str) -> Option<&Slot> {
      self.0.get(name)
   }

   #[must_use]
   pub fn len(&self) -> usize {
      self.0.size()
   }

   #[must_use]
   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }
}

/// A chain of scopes, innermost first.
///
/// Environments never change after construction. Every thunk created in a
/// lexical scope shares the same environment.
#[derive(Clone)]
pub struct Environment(List<Scope, RcK>);

impl fmt::Debug for Environment {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer
         .debug_list()
         .entries(self.0.iter().map(|scope| {
            let mut names = scope.0.keys().collect::<Vec<_>>();
            names.sort();
            names
         }))
         .finish()
   }
}

impl Default for Environment {
   fn default() -> Self {
      Self::new()
   }
}

impl Environment {
   /// Creates the empty, outermost environment.
   #[must_use]
   pub fn new() -> Self {
      Self(List::new_with_ptr_kind())
   }

   pub(crate) fn extend(&self, scope: Scope) -> Self {
      Self(self.0.push_front(scope))
   }

   /// Resolves a variable, searching from the innermost scope outwards.
   #[must_use]
   pub fn lookup(&self, name: &str) -> Option<&Slot> {
      self.0.iter().find_map(|scope| scope.get(name))
   }

   #[must_use]
   pub fn depth(&self) -> usize {
      self.0.len()
   }

   /// Whether both handles refer to the same chain.
   #[must_use]
   pub fn ptr_eq(&self, that: &Self) -> bool {
      match (self.0.first(), that.0.first()) {
         (Some(this), Some(that)) => ptr::eq(this, that),
         (None, None) => true,
         _ => false,
      }
   }
}
