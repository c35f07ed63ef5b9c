use std::{
   cell::RefCell,
   fmt,
   rc::Rc,
};

use crate::{
   Symbol,
   value::{
      Attr,
      Value,
   },
};

/// A mutable value cell.
///
/// Slots are the only place a [`Value`] can change its tag. They are created
/// by the arena, shared by reference between environments, lists and
/// attribute sets, and rewritten only by forcing and the evaluation hooks it
/// delegates to.
#[derive(Clone)]
pub struct Slot(Rc<RefCell<Value>>);

impl fmt::Debug for Slot {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      self.0.borrow().fmt(writer)
   }
}

impl Slot {
   pub(crate) fn new(value: Value) -> Self {
      Self(Rc::new(RefCell::new(value)))
   }

   /// Returns a copy of the current value. Copies share every payload.
   #[must_use]
   pub fn get(&self) -> Value {
      self.0.borrow().clone()
   }

   /// Runs the closure with the current value borrowed.
   pub fn with<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
      f(&self.0.borrow())
   }

   pub(crate) fn set(&self, value: Value) {
      *self.0.borrow_mut() = value;
   }

   /// Fills a freshly allocated, zeroed slot.
   pub(crate) fn initialize(&self, value: Value) {
      debug_assert!(
         matches!(*self.0.borrow(), Value::Null),
         "only zeroed slots may be initialized",
      );

      self.set(value);
   }

   /// Drops the payload, breaking any reference cycle that runs through it.
   pub(crate) fn clear(&self) {
      if let Ok(mut value) = self.0.try_borrow_mut() {
         *value = Value::Null;
      }
   }

   #[must_use]
   pub fn ptr_eq(&self, that: &Self) -> bool {
      Rc::ptr_eq(&self.0, &that.0)
   }

   #[must_use]
   pub fn type_name(&self) -> &'static str {
      self.with(Value::type_name)
   }

   #[must_use]
   pub fn is_list(&self) -> bool {
      self.with(Value::is_list)
   }

   #[must_use]
   pub fn is_deferred(&self) -> bool {
      self.with(Value::is_deferred)
   }

   #[must_use]
   pub fn is_blackhole(&self) -> bool {
      self.with(|value| matches!(*value, Value::Blackhole(_)))
   }

   /// Looks up an attribute if this slot currently holds an attribute set.
   /// Never forces.
   #[must_use]
   pub fn attribute(&self, name: &Symbol) -> Option<Attr> {
      self.with(|value| {
         match *value {
            Value::Attributes(ref attributes) => attributes.get(name).cloned(),
            _ => None,
         }
      })
   }
}
