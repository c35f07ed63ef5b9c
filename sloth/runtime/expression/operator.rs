use std::{
   cmp::Ordering,
   rc::Rc,
};

use num::{
   ToPrimitive as _,
   Zero as _,
};

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
   Equal,
   NotEqual,

   And,
   Or,
   Implication,

   Less,
   LessOrEqual,
   More,
   MoreOrEqual,

   /// `++`
   Concat,
   /// `//`
   Update,

   Addition,
   Subtraction,
   Multiplication,
   Division,
}

impl BinaryOperator {
   /// Whether the operator can be deferred as a [`Value::LazyBinOp`].
   #[must_use]
   pub fn is_lazy(self) -> bool {
      matches!(
         self,
         Self::Concat
            | Self::Update
            | Self::Addition
            | Self::Subtraction
            | Self::Multiplication
            | Self::Division
      )
   }

   fn verb(self) -> &'static str {
      match self {
         Self::Addition => "add",
         Self::Subtraction => "subtract",
         Self::Multiplication => "multiply",
         Self::Division => "divide",
         Self::Concat => "concatenate",
         Self::Update => "update",
         _ => "compare",
      }
   }

   /// Combines two deferred operands, writing the result into `target`.
   pub(crate) fn evaluate_lazy_bin_op(
      self,
      state: &mut State,
      left: &Slot,
      right: &Slot,
      target: &Slot,
      position: &Position,
   ) -> Result<()> {
      match self {
         Self::Update => {
            let left = state.forced_attributes(left, position)?;

            // The right operand may refer back to this value. Exposing the
            // left operand here lets it see the attributes that are already
            // known instead of a black hole.
            target.set(Value::Attributes(left.clone()));

            let right = state.forced_attributes(right, position)?;

            target.set(Value::Attributes(left.update(&right)));
         },

         Self::Concat => {
            let mut list = state.forced_list(left, position)?;

            for slot in &state.forced_list(right, position)? {
               list.push_back_mut(slot.clone());
            }

            target.set(Value::List(list));
         },

         _ => {
            state.force_value(left, position)?;
            state.force_value(right, position)?;

            let value = self.arithmetic(&left.get(), &right.get(), position)?;
            target.set(value);
         },
      }

      Ok(())
   }

   /// Resolves the attribute `name` of a deferred binary operation.
   ///
   /// For `//` the right operand is asked first and the left one only if
   /// the right one lacks the name, so neither side is forced more than the
   /// lookup needs.
   pub(crate) fn evaluate_lazy_bin_op_attr(
      self,
      state: &mut State,
      left: &Slot,
      right: &Slot,
      target: &Slot,
      name: &Symbol,
      position: &Position,
   ) -> Result<Option<Attr>> {
      if self != Self::Update {
         state.force_value(target, position)?;
         return Ok(target.attribute(name));
      }

      state.black_holed(target, |state| {
         for operand in [right, left] {
            if let Some(attr) = state.eval_value_attr(operand, name, position)? {
               return Ok(Some(attr));
            }

            // Absent keys of a concrete operand still need it to be a set.
            if !operand.is_deferred() {
               state.force_attrs(operand, position)?;
            }
         }

         Ok(None)
      })
   }

   /// Evaluates an operator that always needs its operands, writing the
   /// result into `target`. Boolean operators force the right operand only
   /// when the left one does not decide the result.
   pub(crate) fn evaluate_strict(
      self,
      state: &mut State,
      left: &Slot,
      right: &Slot,
      target: &Slot,
      position: &Position,
   ) -> Result<()> {
      let value = match self {
         Self::And => state.force_bool(left, position)? && state.force_bool(right, position)?,
         Self::Or => state.force_bool(left, position)? || state.force_bool(right, position)?,
         Self::Implication => !state.force_bool(left, position)? || state.force_bool(right, position)?,

         Self::Equal => equal(state, left, right, position)?,
         Self::NotEqual => !equal(state, left, right, position)?,

         Self::Less | Self::LessOrEqual | Self::More | Self::MoreOrEqual => {
            state.force_value(left, position)?;
            state.force_value(right, position)?;

            let ordering = self.compare(&left.get(), &right.get(), position)?;

            match self {
               Self::Less => ordering == Ordering::Less,
               Self::LessOrEqual => ordering != Ordering::Greater,
               Self::More => ordering == Ordering::Greater,
               _ => ordering != Ordering::Less,
            }
         },

         Self::Concat
         | Self::Update
         | Self::Addition
         | Self::Subtraction
         | Self::Multiplication
         | Self::Division => unreachable!("lazy operators are never evaluated strictly"),
      };

      target.set(Value::Boolean(value));
      Ok(())
   }

   fn incompatible(self, left: &Value, right: &Value, position: &Position) -> Error {
      Error::Incompatible {
         operation: self.verb(),
         left:      left.type_name(),
         right:     right.type_name(),
         position:  position.clone(),
      }
   }

   fn arithmetic(self, left: &Value, right: &Value, position: &Position) -> Result<Value> {
      match (left, right) {
         (&Value::Integer(ref left), &Value::Integer(ref right)) => {
            let integer = match self {
               Self::Addition => &**left + &**right,
               Self::Subtraction => &**left - &**right,
               Self::Multiplication => &**left * &**right,

               _ if right.is_zero() => {
                  return Err(Error::DivisionByZero {
                     position: position.clone(),
                  });
               },
               _ => &**left / &**right,
            };

            Ok(Value::Integer(Rc::new(integer)))
         },

         (&Value::Integer(_) | &Value::Float(_), &Value::Integer(_) | &Value::Float(_)) => {
            let (Some(left), Some(right)) = (as_float(left), as_float(right)) else {
               return Err(self.incompatible(left, right, position));
            };

            let float = match self {
               Self::Addition => left + right,
               Self::Subtraction => left - right,
               Self::Multiplication => left * right,

               _ if right == 0.0 => {
                  return Err(Error::DivisionByZero {
                     position: position.clone(),
                  });
               },
               _ => left / right,
            };

            Ok(Value::Float(float))
         },

         (&Value::String(ref left), &Value::String(ref right) | &Value::Path(ref right))
            if self == Self::Addition =>
         {
            Ok(Value::String(left.concat(right)))
         },

         (&Value::Path(ref left), &Value::String(ref right) | &Value::Path(ref right))
            if self == Self::Addition =>
         {
            Ok(Value::Path(left.concat(right)))
         },

         _ => Err(self.incompatible(left, right, position)),
      }
   }

   fn compare(self, left: &Value, right: &Value, position: &Position) -> Result<Ordering> {
      let ordering = match (left, right) {
         (&Value::Integer(ref left), &Value::Integer(ref right)) => Some(left.cmp(right)),
         (&Value::Integer(_) | &Value::Float(_), &Value::Integer(_) | &Value::Float(_)) => {
            as_float(left)
               .zip(as_float(right))
               .and_then(|(left, right)| left.partial_cmp(&right))
         },
         (&Value::String(ref left), &Value::String(ref right))
         | (&Value::Path(ref left), &Value::Path(ref right)) => Some(left.cmp(right)),
         _ => None,
      };

      ordering.ok_or_else(|| self.incompatible(left, right, position))
   }
}

fn as_float(value: &Value) -> Option<f64> {
   match *value {
      Value::Integer(ref integer) => integer.to_f64(),
      Value::Float(float) => Some(float),
      _ => None,
   }
}

/// Deep equality. Forces both sides and, for lists and sets, every element
/// until a difference is found.
#[stacksafe::stacksafe]
fn equal(state: &mut State, left: &Slot, right: &Slot, position: &Position) -> Result<bool> {
   state.force_value(left, position)?;
   state.force_value(right, position)?;

   if left.ptr_eq(right) {
      return Ok(true);
   }

   Ok(match (left.get(), right.get()) {
      (Value::Null, Value::Null) => true,
      (Value::Boolean(left), Value::Boolean(right)) => left == right,
      (Value::Integer(left), Value::Integer(right)) => left == right,
      (left @ (Value::Integer(_) | Value::Float(_)), right @ (Value::Integer(_) | Value::Float(_))) => {
         as_float(&left) == as_float(&right)
      },
      (Value::String(left), Value::String(right)) | (Value::Path(left), Value::Path(right)) => left == right,

      (Value::List(left), Value::List(right)) => {
         if left.len() != right.len() {
            return Ok(false);
         }

         for (left, right) in left.iter().zip(right.iter()) {
            if !equal(state, left, right, position)? {
               return Ok(false);
            }
         }

         true
      },

      (Value::Attributes(left), Value::Attributes(right)) => {
         if left.len() != right.len() {
            return Ok(false);
         }

         for attr in left.iter() {
            let Some(that) = right.get(&attr.name) else {
               return Ok(false);
            };

            if !equal(state, &attr.value, &that.value, position)? {
               return Ok(false);
            }
         }

         true
      },

      // Functions are never equal.
      _ => false,
   })
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::Expression;

   fn integer(state: &mut State, integer: i64) -> Slot {
      state.alloc_value(integer).unwrap()
   }

   #[test]
   fn integer_arithmetic() {
      let mut state = State::default();
      let target = state.alloc_value(Value::Null).unwrap();

      let (left, right) = (integer(&mut state, 7), integer(&mut state, 2));
      BinaryOperator::Division
         .evaluate_lazy_bin_op(&mut state, &left, &right, &target, &Position::none())
         .unwrap();

      assert_eq!(target.with(|value| value.as_integer().cloned()), Some(num::BigInt::from(3)));
   }

   #[test]
   fn division_by_zero() {
      let mut state = State::default();
      let target = state.alloc_value(Value::Null).unwrap();

      let (left, right) = (integer(&mut state, 1), integer(&mut state, 0));
      let error = BinaryOperator::Division
         .evaluate_lazy_bin_op(&mut state, &left, &right, &target, &Position::anonymous(1, 3))
         .unwrap_err();

      assert_eq!(error, Error::DivisionByZero {
         position: Position::anonymous(1, 3),
      });
   }

   #[test]
   fn adding_a_set_is_incompatible() {
      let mut state = State::default();
      let target = state.alloc_value(Value::Null).unwrap();

      let left = integer(&mut state, 1);
      let right = state.alloc_value(crate::Attributes::new()).unwrap();

      let error = BinaryOperator::Addition
         .evaluate_lazy_bin_op(&mut state, &left, &right, &target, &Position::none())
         .unwrap_err();

      assert_eq!(
         error.to_string(),
         "cannot add an integer and a set at undefined position",
      );
   }

   #[test]
   fn mixed_comparison() {
      let mut state = State::default();
      let target = state.alloc_value(Value::Null).unwrap();

      let left = integer(&mut state, 1);
      let right = state.alloc_value(1.5).unwrap();

      BinaryOperator::Less
         .evaluate_strict(&mut state, &left, &right, &target, &Position::none())
         .unwrap();

      assert_eq!(target.with(Value::as_boolean), Some(true));
   }

   #[test]
   fn and_does_not_force_the_right_operand() {
      let mut state = State::default();
      let target = state.alloc_value(Value::Null).unwrap();

      let left = state.alloc_value(false).unwrap();
      let right = state
         .alloc_thunk(
            Expression::integer(1),
            &crate::Environment::new(),
         )
         .unwrap();

      BinaryOperator::And
         .evaluate_strict(&mut state, &left, &right, &target, &Position::none())
         .unwrap();

      assert_eq!(target.with(Value::as_boolean), Some(false));
      assert!(right.is_deferred());
   }

   #[test]
   fn update_prefers_the_right_operand() {
      let mut state = State::default();
      let name = state.symbol("a");

      let one = integer(&mut state, 1);
      let two = integer(&mut state, 2);
      let attr = |value: &Slot| {
         Attr {
            name:     name.clone(),
            value:    value.clone(),
            position: Position::none(),
         }
      };

      let left = state.alloc_value(crate::Attributes::new().insert(attr(&one))).unwrap();
      let right = state.alloc_value(crate::Attributes::new().insert(attr(&two))).unwrap();
      let target = state.alloc_value(Value::Null).unwrap();

      let found = BinaryOperator::Update
         .evaluate_lazy_bin_op_attr(&mut state, &left, &right, &target, &name, &Position::none())
         .unwrap()
         .unwrap();

      assert!(found.value.ptr_eq(&two));
   }
}
