use std::rc::Rc;

use crate::{
   Environment,
   Error,
   Position,
   Result,
   State,
   Symbol,
   environment::Scope,
   force::type_error,
   value::{
      Attr,
      Lambda,
      Slot,
      Value,
   },
};

impl State {
   /// Calls `function` with `argument`, writing the result into `target`.
   pub fn call_function(
      &mut self,
      function: &Slot,
      argument: &Slot,
      target: &Slot,
      position: &Position,
   ) -> Result<()> {
      let (lambda, environment) = self.enter_function(function, argument, position)?;
      let mut this = scopeguard::guard(self, |this| this.call_depth -= 1);

      lambda.body.evaluate(&mut this, &environment, target)
   }

   /// Resolves the attribute `name` of the result of calling `function`
   /// with `argument`, through the body's attribute shortcut.
   pub fn call_function_attr(
      &mut self,
      function: &Slot,
      argument: &Slot,
      target: &Slot,
      name: &Symbol,
      position: &Position,
   ) -> Result<Option<Attr>> {
      let (lambda, environment) = self.enter_function(function, argument, position)?;
      let mut this = scopeguard::guard(self, |this| this.call_depth -= 1);

      lambda.body.evaluate_attr(&mut this, &environment, target, name)
   }

   fn enter_function(
      &mut self,
      function: &Slot,
      argument: &Slot,
      position: &Position,
   ) -> Result<(Rc<Lambda>, Environment)> {
      self.force_value(function, position)?;

      let lambda = function.with(|value| {
         match *value {
            Value::Lambda(ref lambda) => Ok(Rc::clone(lambda)),
            ref other => Err(type_error("a function", other, position)),
         }
      })?;

      let limit = self.settings().max_call_depth;
      if self.call_depth >= limit {
         return Err(Error::CallDepthExceeded {
            limit,
            position: position.clone(),
         });
      }

      let scope = Scope::new().bind(lambda.parameter.clone(), argument.clone());
      let environment = self.alloc_environment(&lambda.environment, scope)?;

      self.call_depth += 1;
      self.statistics_mut().function_calls += 1;

      Ok((lambda, environment))
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::Expression;

   // (x: x.missing) { }
   #[test]
   fn depth_is_restored_when_the_body_fails() {
      let mut state = State::default();
      let (x, missing) = (state.symbol("x"), state.symbol("missing"));

      let body = Expression::select(
         Position::anonymous(1, 5),
         Expression::variable(Position::anonymous(1, 5), x.clone()),
         vec![missing],
      );
      let function = state
         .alloc_thunk(
            Expression::lambda(Position::anonymous(1, 2), x, body),
            &Environment::new(),
         )
         .unwrap();
      let argument = state.alloc_value(crate::Attributes::new()).unwrap();
      let target = state.alloc_value(Value::Null).unwrap();

      let error = state
         .call_function(&function, &argument, &target, &Position::anonymous(1, 1))
         .unwrap_err();

      assert!(matches!(error, Error::MissingAttribute { .. }));
      assert_eq!(state.call_depth, 0);
      assert_eq!(state.statistics().function_calls, 1);
   }
}
