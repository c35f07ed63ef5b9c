use std::rc::Rc;

use scopeguard::ScopeGuard;

use crate::{
   Error,
   Position,
   Result,
   State,
   value::{
      Application,
      Attributes,
      Blackhole,
      LazyBinOp,
      List,
      Slot,
      Thunk,
      Value,
   },
};

/// Puts `previous` back into the slot unless defused with
/// [`ScopeGuard::into_inner`]. Runs on error returns and on unwinding alike.
fn rollback(slot: &Slot, previous: Value) -> ScopeGuard<(Slot, Value), impl FnOnce((Slot, Value))> {
   scopeguard::guard((slot.clone(), previous), |(slot, previous)| {
      tracing::debug!("Forcing failed, restoring {kind}.", kind = previous.type_name());
      slot.set(previous);
   })
}

impl State {
   /// Runs `f` with the slot black-holed and puts the slot's value back
   /// afterwards, whatever `f` returns.
   ///
   /// For attribute lookups that delegate to other slots without evaluating
   /// this one. A delegation that comes back to the slot is a cycle.
   pub(crate) fn black_holed<T>(&mut self, slot: &Slot, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
      let _restore = scopeguard::guard((slot.clone(), slot.get()), |(slot, previous)| slot.set(previous));

      slot.set(Value::Blackhole(Blackhole::new()));
      f(self)
   }

   /// Reduces the value in the slot to normal form, in place.
   ///
   /// Forcing a concrete value does nothing. Forcing a deferred value
   /// replaces it with its result exactly once; if that fails, the deferred
   /// value is put back so a later caller can try again. Forcing a value
   /// that is already being forced further up the stack is an
   /// [`Error::InfiniteRecursion`] attributed to `position`.
   pub fn force_value(&mut self, slot: &Slot, position: &Position) -> Result<()> {
      match slot.get() {
         Value::Thunk(thunk) => self.force_thunk(slot, thunk, position),
         Value::LazyBinOp(operation) => self.force_lazy_bin_op(slot, operation, position),
         Value::Application(application) => self.force_application(slot, application, position),

         Value::Blackhole(_) => {
            tracing::debug!("Black hole re-entered at {position}.");

            Err(Error::InfiniteRecursion {
               position: position.clone(),
            })
         },

         _ => Ok(()),
      }
   }

   /// [`State::force_value`] for call sites that have no position to blame.
   pub fn force(&mut self, slot: &Slot) -> Result<()> {
      self.force_value(slot, &Position::none())
   }

   fn force_thunk(&mut self, slot: &Slot, thunk: Thunk, position: &Position) -> Result<()> {
      self.check_interrupt(position)?;

      tracing::trace!("Forcing thunk defined at {defined}.", defined = thunk.position());
      self.statistics_mut().thunks_forced += 1;

      let guard = rollback(slot, Value::Thunk(thunk.clone()));

      // Black-hole before evaluating so that re-entrant forcing errors out.
      // Expressions that write to their own slot before recursing opt out of
      // this check.
      slot.set(Value::Blackhole(Blackhole::new()));

      thunk
         .expression()
         .evaluate(self, thunk.environment(), slot)?;

      ScopeGuard::into_inner(guard);
      debug_assert!(
         !slot.is_deferred() && !slot.is_blackhole(),
         "evaluation must leave a concrete value behind",
      );

      Ok(())
   }

   fn force_lazy_bin_op(
      &mut self,
      slot: &Slot,
      operation: Rc<LazyBinOp>,
      position: &Position,
   ) -> Result<()> {
      self.check_interrupt(position)?;

      tracing::trace!(
         "Forcing lazy {operator:?} at {at}.",
         operator = operation.operator,
         at = operation.position,
      );
      self.statistics_mut().lazy_bin_ops_forced += 1;

      // No black hole: the operation can only recurse through its operands,
      // and those are checked when they are forced.
      let guard = rollback(slot, Value::LazyBinOp(Rc::clone(&operation)));

      operation.operator.evaluate_lazy_bin_op(
         self,
         &operation.left,
         &operation.right,
         slot,
         &operation.position,
      )?;

      ScopeGuard::into_inner(guard);
      Ok(())
   }

   fn force_application(
      &mut self,
      slot: &Slot,
      application: Rc<Application>,
      position: &Position,
   ) -> Result<()> {
      self.check_interrupt(position)?;

      tracing::trace!("Forcing application at {at}.", at = application.position);
      self.statistics_mut().applications_forced += 1;

      let guard = rollback(slot, Value::Application(Rc::clone(&application)));

      self.call_function(
         &application.function,
         &application.argument,
         slot,
         &application.position,
      )?;

      ScopeGuard::into_inner(guard);
      Ok(())
   }

   /// Forces the value and fails unless it is an attribute set.
   pub fn force_attrs(&mut self, slot: &Slot, position: &Position) -> Result<()> {
      self.forced_attributes(slot, position).map(|_| ())
   }

   /// Forces the value and fails unless it is a list.
   pub fn force_list(&mut self, slot: &Slot, position: &Position) -> Result<()> {
      self.forced_list(slot, position).map(|_| ())
   }

   /// Forces the value and returns the attribute set it holds.
   pub fn forced_attributes(&mut self, slot: &Slot, position: &Position) -> Result<Attributes> {
      self.force_value(slot, position)?;

      slot.with(|value| {
         match *value {
            Value::Attributes(ref attributes) => Ok(attributes.clone()),
            ref other => Err(type_error("a set", other, position)),
         }
      })
   }

   /// Forces the value and returns the list it holds.
   pub fn forced_list(&mut self, slot: &Slot, position: &Position) -> Result<List> {
      self.force_value(slot, position)?;

      slot.with(|value| {
         match *value {
            Value::List(ref list) => Ok(list.clone()),
            ref other => Err(type_error("a list", other, position)),
         }
      })
   }

   /// Forces the value and returns the Boolean it holds.
   pub fn force_bool(&mut self, slot: &Slot, position: &Position) -> Result<bool> {
      self.force_value(slot, position)?;

      slot.with(|value| {
         match *value {
            Value::Boolean(boolean) => Ok(boolean),
            ref other => Err(type_error("a Boolean", other, position)),
         }
      })
   }

   /// Forces the value and returns the integer it holds.
   pub fn force_integer(&mut self, slot: &Slot, position: &Position) -> Result<Rc<num::BigInt>> {
      self.force_value(slot, position)?;

      slot.with(|value| {
         match *value {
            Value::Integer(ref integer) => Ok(Rc::clone(integer)),
            ref other => Err(type_error("an integer", other, position)),
         }
      })
   }
}

pub(crate) fn type_error(expected: &'static str, found: &Value, position: &Position) -> Error {
   Error::Type {
      expected,
      found: found.type_name(),
      position: position.clone(),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{
      Attributes,
      Environment,
      Expression,
   };

   #[test]
   fn force_integer_through_a_thunk() {
      let mut state = State::default();
      let slot = state.alloc_thunk(Expression::integer(7), &Environment::new()).unwrap();

      let integer = state.force_integer(&slot, &Position::none()).unwrap();

      assert_eq!(*integer, num::BigInt::from(7));
      assert!(!slot.is_deferred());
   }

   #[test]
   fn force_list_rejects_sets() {
      let mut state = State::default();
      let slot = state.alloc_value(Attributes::new()).unwrap();

      let error = state.force_list(&slot, &Position::anonymous(1, 1)).unwrap_err();

      assert_eq!(
         error.to_string(),
         "value is a set while a list was expected at «string»:1:1",
      );
   }
}
