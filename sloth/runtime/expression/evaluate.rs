use std::rc::Rc;

use crate::{
   Environment,
   Error,
   Expression,
   Result,
   State,
   Symbol,
   value::{
      Application,
      Attr,
      Attributes,
      Lambda,
      LazyBinOp,
      List,
      Slot,
      Thunk,
      Value,
   },
};

impl Expression {
   /// Evaluates the expression in the environment and writes the normal
   /// form into `target`.
   ///
   /// When called while forcing, `target` is the slot being forced and
   /// holds a black hole. Some expressions write a partial result into it
   /// before evaluating their operands.
   #[stacksafe::stacksafe]
   pub(crate) fn evaluate(self: &Rc<Self>, state: &mut State, environment: &Environment, target: &Slot) -> Result<()> {
      if let Some(value) = self.literal() {
         target.set(value);
         return Ok(());
      }

      match **self {
         Self::Variable {
            ref position,
            ref name,
         } => {
            let slot = Self::lookup(environment, name, position)?;

            state.force_value(&slot, position)?;
            target.set(slot.get());
         },

         Self::Select {
            ref position,
            ref base,
            ref path,
            ref default,
         } => {
            let mut current = base.defer(state, environment)?;
            let mut current_position = position.clone();

            for name in path {
               match state.eval_value_attr(&current, name, position)? {
                  Some(attr) => {
                     current = attr.value;
                     current_position = attr.position;
                  },

                  None => {
                     if let Some(default) = default.as_ref() {
                        return default.evaluate(state, environment, target);
                     }

                     // Report a non-set as such before reporting the name.
                     state.force_attrs(&current, position)?;

                     return Err(Error::MissingAttribute {
                        name:     name.clone(),
                        position: position.clone(),
                     });
                  },
               }
            }

            state.force_value(&current, &current_position)?;
            target.set(current.get());
         },

         Self::HasAttribute {
            ref position,
            ref base,
            ref path,
         } => {
            let mut current = base.defer(state, environment)?;

            for name in path {
               match state.eval_value_attr(&current, name, position)? {
                  Some(attr) => current = attr.value,

                  None => {
                     target.set(Value::Boolean(false));
                     return Ok(());
                  },
               }
            }

            target.set(Value::Boolean(true));
         },

         Self::Attributes {
            recursive: false,
            ref definitions,
            ..
         } => {
            let mut attributes = Attributes::new();

            for definition in definitions {
               let value = definition.expression.defer(state, environment)?;

               attributes = attributes.insert(Attr {
                  name: definition.name.clone(),
                  value,
                  position: definition.position.clone(),
               });
            }

            target.set(Value::Attributes(attributes));
         },

         Self::Attributes {
            recursive: true,
            ref definitions,
            ..
         } => {
            let (_, slots) = Self::recursive_scope(state, environment, definitions)?;

            let attributes = definitions
               .iter()
               .zip(slots)
               .map(|(definition, value)| {
                  Attr {
                     name: definition.name.clone(),
                     value,
                     position: definition.position.clone(),
                  }
               })
               .collect::<Attributes>();

            target.set(Value::Attributes(attributes));
         },

         Self::List { ref elements, .. } => {
            let mut list = List::new_with_ptr_kind();

            for element in elements {
               list.push_back_mut(element.defer(state, environment)?);
            }

            target.set(Value::List(list));
         },

         Self::Lambda {
            ref position,
            ref parameter,
            ref body,
         } => {
            target.set(Value::Lambda(Rc::new(Lambda {
               parameter:   parameter.clone(),
               body:        Rc::clone(body),
               environment: environment.clone(),
               position:    position.clone(),
            })));
         },

         Self::Application {
            ref position,
            ref function,
            ref argument,
         } => {
            let function = function.defer(state, environment)?;
            let argument = argument.defer(state, environment)?;

            state.call_function(&function, &argument, target, position)?;
         },

         Self::Let {
            ref definitions,
            ref body,
            ..
         } => {
            let (environment, _) = Self::recursive_scope(state, environment, definitions)?;

            body.evaluate(state, &environment, target)?;
         },

         Self::If {
            ref position,
            ref condition,
            ref consequence,
            ref alternative,
         } => {
            let condition = condition.defer(state, environment)?;

            if state.force_bool(&condition, position)? {
               consequence.evaluate(state, environment, target)?;
            } else {
               alternative.evaluate(state, environment, target)?;
            }
         },

         Self::Assert {
            ref position,
            ref condition,
            ref body,
         } => {
            let condition = condition.defer(state, environment)?;

            if !state.force_bool(&condition, position)? {
               return Err(Error::Assertion {
                  position: position.clone(),
               });
            }

            body.evaluate(state, environment, target)?;
         },

         Self::Not {
            ref position,
            ref operand,
         } => {
            let operand = operand.defer(state, environment)?;

            let boolean = state.force_bool(&operand, position)?;
            target.set(Value::Boolean(!boolean));
         },

         Self::Binary {
            ref position,
            operator,
            ref left,
            ref right,
         } => {
            let left = left.defer(state, environment)?;
            let right = right.defer(state, environment)?;

            if operator.is_lazy() {
               operator.evaluate_lazy_bin_op(state, &left, &right, target, position)?;
            } else {
               operator.evaluate_strict(state, &left, &right, target, position)?;
            }
         },

         Self::Null
         | Self::Boolean(_)
         | Self::Integer(_)
         | Self::Float(_)
         | Self::String(_)
         | Self::Path(_) => unreachable!("literals are handled above"),
      }

      Ok(())
   }

   /// Resolves the attribute `name` of this expression's value, where
   /// `target` is the deferred slot that holds it.
   ///
   /// Expressions that know their attributes answer without evaluating
   /// themselves. Expressions that would need fresh slots to answer first
   /// turn `target` into an equivalent deferred value built from those
   /// slots, so every later lookup reuses them. Everything else forces
   /// `target` and looks the name up in the result.
   #[stacksafe::stacksafe]
   pub(crate) fn evaluate_attr(
      self: &Rc<Self>,
      state: &mut State,
      environment: &Environment,
      target: &Slot,
      name: &Symbol,
   ) -> Result<Option<Attr>> {
      match **self {
         Self::Attributes {
            recursive: false,
            ref definitions,
            ..
         } => {
            let Some(definition) = definitions.iter().find(|definition| definition.name == *name) else {
               return Ok(None);
            };

            // A non-trivial value would get a new thunk on every lookup,
            // hiding any cycle that runs through it.
            if definition.expression.is_trivial() {
               return Ok(Some(Attr {
                  name:     definition.name.clone(),
                  value:    definition.expression.defer(state, environment)?,
                  position: definition.position.clone(),
               }));
            }
         },

         Self::Variable {
            ref position,
            name: ref variable,
         } => {
            let slot = Self::lookup(environment, variable, position)?;

            // The bound slot may lead back here, looking up through it must
            // meet a black hole instead of this thunk.
            return state.black_holed(target, |state| state.eval_value_attr(&slot, name, position));
         },

         Self::Let {
            ref definitions,
            ref body,
            ..
         } => {
            let (environment, _) = Self::recursive_scope(state, environment, definitions)?;
            target.set(Value::Thunk(Thunk::new(Rc::clone(body), environment.clone())));

            return body.evaluate_attr(state, &environment, target, name);
         },

         Self::Application {
            ref position,
            ref function,
            ref argument,
         } => {
            let function = function.defer(state, environment)?;
            let argument = argument.defer(state, environment)?;
            target.set(Value::Application(Rc::new(Application {
               function: function.clone(),
               argument: argument.clone(),
               position: position.clone(),
            })));

            return state.call_function_attr(&function, &argument, target, name, position);
         },

         Self::Binary {
            ref position,
            operator,
            ref left,
            ref right,
         } if operator.is_lazy() => {
            let left = left.defer_operand(state, environment)?;
            let right = right.defer_operand(state, environment)?;
            target.set(Value::LazyBinOp(Rc::new(LazyBinOp {
               operator,
               position: position.clone(),
               left: left.clone(),
               right: right.clone(),
            })));

            return operator.evaluate_lazy_bin_op_attr(state, &left, &right, target, name, position);
         },

         _ => {},
      }

      state.force_value(target, &self.position())?;
      Ok(target.attribute(name))
   }
}

