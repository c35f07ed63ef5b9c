use std::{
   cell::RefCell,
   mem,
};

use derive_more::{
   Deref,
   DerefMut,
};

use crate::{
   Environment,
   Error,
   Reclamation,
   Result,
   environment::Scope,
   value::{
      Slot,
      Value,
   },
};

/// The accounted size of a single value slot.
pub const SLOT_SIZE: usize = mem::size_of::<RefCell<Value>>() + 2 * mem::size_of::<usize>();

/// The accounted size of a scope, excluding its bindings.
pub const SCOPE_SIZE: usize = mem::size_of::<Scope>() + 2 * mem::size_of::<usize>();

/// The accounted size of a single scope binding.
pub const BINDING_SIZE: usize = mem::size_of::<(crate::Symbol, Slot)>();

/// A zero-initialized block of memory.
#[derive(Deref, DerefMut, Debug, PartialEq, Eq)]
pub struct Block(Box<[u8]>);

/// The allocator every runtime structure goes through.
///
/// Memory handed out is always zeroed: raw blocks are filled with zero
/// bytes and value slots start out as [`Value::Null`], which initialization
/// then overwrites. Exhausting the budget or the system allocator is
/// reported as [`Error::OutOfMemory`], never as a silent failure.
#[derive(Debug)]
pub struct Arena {
   limit:       Option<usize>,
   used:        usize,
   reclamation: Reclamation,
   tracked:     Vec<Slot>,
}

impl Drop for Arena {
   fn drop(&mut self) {
      for slot in self.tracked.drain(..) {
         slot.clear();
      }
   }
}

impl Arena {
   #[must_use]
   pub fn new(limit: Option<usize>, reclamation: Reclamation) -> Self {
      Self {
         limit,
         used: 0,
         reclamation,
         tracked: Vec::new(),
      }
   }

   /// Bytes handed out so far.
   #[must_use]
   pub fn used(&self) -> usize {
      self.used
   }

   /// Bytes left in the budget, or [`None`] if there is no budget.
   #[must_use]
   pub fn available(&self) -> Option<usize> {
      self.limit.map(|limit| limit.saturating_sub(self.used))
   }

   fn reserve(&mut self, requested: usize) -> Result<()> {
      if let Some(available) = self.available()
         && requested > available
      {
         tracing::warn!("Refusing to allocate {requested} bytes with {available} bytes available.");

         return Err(Error::OutOfMemory {
            requested,
            available,
         });
      }

      self.used += requested;
      Ok(())
   }

   /// Allocates a zero-initialized block of `size` bytes.
   pub fn allocate(&mut self, size: usize) -> Result<Block> {
      self.reserve(size)?;

      let mut bytes = Vec::new();
      if bytes.try_reserve_exact(size).is_err() {
         self.used -= size;

         return Err(Error::OutOfMemory {
            requested: size,
            available: self.available().unwrap_or(usize::MAX),
         });
      }
      bytes.resize(size, 0_u8);

      Ok(Block(bytes.into_boxed_slice()))
   }

   /// Allocates a zeroed slot, to be initialized by the caller.
   pub(crate) fn zeroed_slot(&mut self) -> Result<Slot> {
      self.reserve(SLOT_SIZE)?;

      let slot = Slot::new(Value::Null);

      if self.reclamation == Reclamation::Session {
         self.tracked.push(slot.clone());
      }

      Ok(slot)
   }

   pub(crate) fn slot(&mut self, value: Value) -> Result<Slot> {
      let slot = self.zeroed_slot()?;
      slot.initialize(value);
      Ok(slot)
   }

   pub(crate) fn environment(&mut self, parent: &Environment, scope: Scope) -> Result<Environment> {
      self.reserve(SCOPE_SIZE + scope.len() * BINDING_SIZE)?;

      Ok(parent.extend(scope))
   }
}

#[cfg(test)]
mod tests {
   use proptest::prelude::*;

   use super::*;

   #[test]
   fn budget_is_enforced() {
      let mut arena = Arena::new(Some(64), Reclamation::Session);

      let block = arena.allocate(48).unwrap();
      assert_eq!(block.len(), 48);
      assert_eq!(arena.available(), Some(16));

      assert_eq!(
         arena.allocate(17),
         Err(Error::OutOfMemory {
            requested: 17,
            available: 16,
         }),
      );
      assert_eq!(arena.used(), 48);

      arena.allocate(16).unwrap();
      assert_eq!(arena.available(), Some(0));
   }

   #[test]
   fn slots_start_zeroed() {
      let mut arena = Arena::new(None, Reclamation::Counted);

      let slot = arena.zeroed_slot().unwrap();

      assert!(matches!(slot.get(), Value::Null));
      assert_eq!(arena.used(), SLOT_SIZE);
   }

   #[test]
   fn session_reclamation_clears_slots() {
      let slot = {
         let mut arena = Arena::new(None, Reclamation::Session);
         arena.slot(Value::from(42_i64)).unwrap()
      };

      assert!(matches!(slot.get(), Value::Null));

      let slot = {
         let mut arena = Arena::new(None, Reclamation::Counted);
         arena.slot(Value::from(42_i64)).unwrap()
      };

      assert_eq!(slot.get().as_integer(), Some(&num::BigInt::from(42)));
   }

   proptest! {
      #[test]
      fn blocks_are_zeroed(size in 0_usize..4096) {
         let mut arena = Arena::new(None, Reclamation::Session);

         let block = arena.allocate(size).unwrap();

         prop_assert_eq!(block.len(), size);
         prop_assert!(block.iter().all(|&byte| byte == 0));
      }
   }
}
