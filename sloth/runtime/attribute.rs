use crate::{
   Error,
   Position,
   Result,
   State,
   Symbol,
   value::{
      Attr,
      Slot,
      Value,
   },
};

impl State {
   /// Resolves the attribute `name` of the value in the slot, forcing no
   /// more than the value's current form requires.
   ///
   /// Returns [`None`] if the value is a set without that attribute, or any
   /// other concrete value. Deciding whether that is an error is left to the
   /// caller.
   pub fn eval_value_attr(&mut self, slot: &Slot, name: &Symbol, position: &Position) -> Result<Option<Attr>> {
      // No black hole is set here. Looking up an attribute does not evaluate
      // the value itself, recursion is caught by whatever the hooks force.
      match slot.get() {
         Value::Thunk(thunk) => {
            self.statistics_mut().attribute_shortcuts += 1;

            thunk
               .expression()
               .evaluate_attr(self, thunk.environment(), slot, name)
         },

         Value::LazyBinOp(operation) => {
            self.statistics_mut().attribute_shortcuts += 1;

            operation.operator.evaluate_lazy_bin_op_attr(
               self,
               &operation.left,
               &operation.right,
               slot,
               name,
               &operation.position,
            )
         },

         Value::Application(application) => {
            self.call_function_attr(
               &application.function,
               &application.argument,
               slot,
               name,
               position,
            )
         },

         Value::Attributes(attributes) => Ok(attributes.get(name).cloned()),

         Value::Blackhole(_) => {
            Err(Error::InfiniteRecursion {
               position: position.clone(),
            })
         },

         _ => Ok(None),
      }
   }
}
