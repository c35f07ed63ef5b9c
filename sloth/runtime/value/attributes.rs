use std::fmt;

use archery::RcK;
use rpds::HashTrieMap;
use rustc_hash::FxBuildHasher;

use crate::{
   Position,
   Symbol,
   value::Slot,
};

/// An attribute set entry.
#[derive(Debug, Clone)]
pub struct Attr {
   pub name:     Symbol,
   pub value:    Slot,
   /// Where the attribute was defined.
   pub position: Position,
}

/// An immutable mapping from names to attributes.
#[derive(Clone)]
pub struct Attributes(HashTrieMap<Symbol, Attr, RcK, FxBuildHasher>);

impl fmt::Debug for Attributes {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      // Values are left out, sets can contain themselves.
      writer.debug_set().entries(self.names()).finish()
   }
}

impl Default for Attributes {
   fn default() -> Self {
      Self::new()
   }
}

impl FromIterator<Attr> for Attributes {
   fn from_iter<I: IntoIterator<Item = Attr>>(iter: I) -> Self {
      iter.into_iter().fold(Self::new(), |attributes, attr| attributes.insert(attr))
   }
}

impl Attributes {
   #[must_use]
   pub fn new() -> Self {
      Self(HashTrieMap::new_with_hasher_and_ptr_kind(FxBuildHasher))
   }

   #[must_use]
   pub fn insert(&self, attr: Attr) -> Self {
      Self(self.0.insert(attr.name.clone(), attr))
   }

   #[must_use]
   pub fn get(&self, name: &str) -> Option<&Attr> {
      self.0.get(name)
   }

   #[must_use]
   pub fn contains(&self, name: &str) -> bool {
      self.0.contains_key(name)
   }

   #[must_use]
   pub fn len(&self) -> usize {
      self.0.size()
   }

   #[must_use]
   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn iter(&self) -> impl Iterator<Item = &Attr> {
      self.0.values()
   }

   /// The attribute names in sorted order.
   #[must_use]
   pub fn names(&self) -> Vec<&Symbol> {
      let mut names = self.0.keys().collect::<Vec<_>>();
      names.sort();
      names
   }

   /// Returns the union of both sets, where attributes of `that` win.
   #[must_use]
   pub fn update(&self, that: &Self) -> Self {
      if self.len() < that.len() {
         self
            .iter()
            .filter(|attr| !that.contains(&attr.name))
            .fold(that.clone(), |attributes, attr| attributes.insert(attr.clone()))
      } else {
         that
            .iter()
            .fold(self.clone(), |attributes, attr| attributes.insert(attr.clone()))
      }
   }
}
