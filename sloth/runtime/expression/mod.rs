//! Expression nodes and their evaluation hooks.
//!
//! The set of expression kinds is closed. Each hook is a single function
//! that matches on the node:
//!
//! - [`Expression::evaluate`] writes the normal form into a target slot.
//! - [`Expression::evaluate_attr`] resolves one attribute of the result,
//!   without evaluating the whole expression where the node allows it.
//! - [`BinaryOperator::evaluate_lazy_bin_op`] and
//!   [`BinaryOperator::evaluate_lazy_bin_op_attr`] do the same for binary
//!   operations whose operands were deferred.

use std::rc::Rc;

use crate::{
   Environment,
   Error,
   Position,
   Result,
   State,
   Symbol,
   environment::Scope,
   value::{
      LazyBinOp,
      SString,
      Slot,
      Thunk,
      Value,
   },
};

mod evaluate;

mod operator;
pub use operator::BinaryOperator;

/// A binding in an attribute set or `let`.
#[derive(Debug, Clone)]
pub struct Definition {
   pub name:       Symbol,
   pub expression: Rc<Expression>,
   pub position:   Position,
}

impl Definition {
   #[must_use]
   pub fn new(name: Symbol, expression: Rc<Expression>, position: Position) -> Self {
      Self {
         name,
         expression,
         position,
      }
   }
}

#[derive(Debug, Clone)]
pub enum Expression {
   Null,
   Boolean(bool),
   Integer(Rc<num::BigInt>),
   Float(f64),
   String(SString),
   Path(SString),

   Variable {
      position: Position,
      name:     Symbol,
   },

   /// `base.a.b or default`
   Select {
      position: Position,
      base:     Rc<Expression>,
      path:     Vec<Symbol>,
      default:  Option<Rc<Expression>>,
   },

   /// `base ? a.b`
   HasAttribute {
      position: Position,
      base:     Rc<Expression>,
      path:     Vec<Symbol>,
   },

   Attributes {
      position:    Position,
      recursive:   bool,
      definitions: Vec<Definition>,
   },

   List {
      position: Position,
      elements: Vec<Rc<Expression>>,
   },

   Lambda {
      position:  Position,
      parameter: Symbol,
      body:      Rc<Expression>,
   },

   Application {
      position: Position,
      function: Rc<Expression>,
      argument: Rc<Expression>,
   },

   Let {
      position:    Position,
      definitions: Vec<Definition>,
      body:        Rc<Expression>,
   },

   If {
      position:    Position,
      condition:   Rc<Expression>,
      consequence: Rc<Expression>,
      alternative: Rc<Expression>,
   },

   Assert {
      position:  Position,
      condition: Rc<Expression>,
      body:      Rc<Expression>,
   },

   Not {
      position: Position,
      operand:  Rc<Expression>,
   },

   Binary {
      position: Position,
      operator: BinaryOperator,
      left:     Rc<Expression>,
      right:    Rc<Expression>,
   },
}

impl Expression {
   #[must_use]
   pub fn integer(integer: i64) -> Rc<Self> {
      Rc::new(Self::Integer(Rc::new(num::BigInt::from(integer))))
   }

   #[must_use]
   pub fn string(string: &str) -> Rc<Self> {
      Rc::new(Self::String(SString::from(string)))
   }

   #[must_use]
   pub fn variable(position: Position, name: Symbol) -> Rc<Self> {
      Rc::new(Self::Variable { position, name })
   }

   #[must_use]
   pub fn select(position: Position, base: Rc<Self>, path: Vec<Symbol>) -> Rc<Self> {
      Rc::new(Self::Select {
         position,
         base,
         path,
         default: None,
      })
   }

   #[must_use]
   pub fn attributes(position: Position, definitions: Vec<Definition>) -> Rc<Self> {
      Rc::new(Self::Attributes {
         position,
         recursive: false,
         definitions,
      })
   }

   #[must_use]
   pub fn recursive_attributes(position: Position, definitions: Vec<Definition>) -> Rc<Self> {
      Rc::new(Self::Attributes {
         position,
         recursive: true,
         definitions,
      })
   }

   #[must_use]
   pub fn list(position: Position, elements: Vec<Rc<Self>>) -> Rc<Self> {
      Rc::new(Self::List { position, elements })
   }

   #[must_use]
   pub fn lambda(position: Position, parameter: Symbol, body: Rc<Self>) -> Rc<Self> {
      Rc::new(Self::Lambda {
         position,
         parameter,
         body,
      })
   }

   #[must_use]
   pub fn application(position: Position, function: Rc<Self>, argument: Rc<Self>) -> Rc<Self> {
      Rc::new(Self::Application {
         position,
         function,
         argument,
      })
   }

   #[must_use]
   pub fn let_in(position: Position, definitions: Vec<Definition>, body: Rc<Self>) -> Rc<Self> {
      Rc::new(Self::Let {
         position,
         definitions,
         body,
      })
   }

   #[must_use]
   pub fn if_then_else(
      position: Position,
      condition: Rc<Self>,
      consequence: Rc<Self>,
      alternative: Rc<Self>,
   ) -> Rc<Self> {
      Rc::new(Self::If {
         position,
         condition,
         consequence,
         alternative,
      })
   }

   #[must_use]
   pub fn binary(position: Position, operator: BinaryOperator, left: Rc<Self>, right: Rc<Self>) -> Rc<Self> {
      Rc::new(Self::Binary {
         position,
         operator,
         left,
         right,
      })
   }
}

impl Expression {
   #[must_use]
   pub fn position(&self) -> Position {
      match *self {
         Self::Null
         | Self::Boolean(_)
         | Self::Integer(_)
         | Self::Float(_)
         | Self::String(_)
         | Self::Path(_) => Position::none(),

         Self::Variable { ref position, .. }
         | Self::Select { ref position, .. }
         | Self::HasAttribute { ref position, .. }
         | Self::Attributes { ref position, .. }
         | Self::List { ref position, .. }
         | Self::Lambda { ref position, .. }
         | Self::Application { ref position, .. }
         | Self::Let { ref position, .. }
         | Self::If { ref position, .. }
         | Self::Assert { ref position, .. }
         | Self::Not { ref position, .. }
         | Self::Binary { ref position, .. } => position.clone(),
      }
   }

   /// The value of a literal, which needs no environment.
   fn literal(&self) -> Option<Value> {
      match *self {
         Self::Null => Some(Value::Null),
         Self::Boolean(boolean) => Some(Value::Boolean(boolean)),
         Self::Integer(ref integer) => Some(Value::Integer(Rc::clone(integer))),
         Self::Float(float) => Some(Value::Float(float)),
         Self::String(ref string) => Some(Value::String(string.clone())),
         Self::Path(ref path) => Some(Value::Path(path.clone())),
         _ => None,
      }
   }

   /// Whether deferring this expression can neither fail on its own nor
   /// allocate a thunk.
   #[must_use]
   pub fn is_trivial(&self) -> bool {
      self.literal().is_some() || matches!(*self, Self::Variable { .. })
   }

   fn lookup(environment: &Environment, name: &Symbol, position: &Position) -> Result<Slot> {
      environment
         .lookup(name)
         .cloned()
         .ok_or_else(|| Error::UndefinedVariable {
            name:     name.clone(),
            position: position.clone(),
         })
   }

   /// Turns the expression into a slot without evaluating it.
   ///
   /// Literals become concrete values, variables share the slot they are
   /// bound to, lazy binary operators defer both operands, and everything
   /// else becomes a thunk.
   pub fn defer(self: &Rc<Self>, state: &mut State, environment: &Environment) -> Result<Slot> {
      if let Self::Variable {
         ref position,
         ref name,
      } = **self
      {
         return Self::lookup(environment, name, position);
      }

      let slot = state.alloc_zeroed()?;
      self.defer_into(state, environment, &slot)?;
      Ok(slot)
   }

   /// Defers an operand of a [`LazyBinOp`]. Variables get a thunk of their
   /// own instead of sharing the bound slot, as that slot may be the one
   /// holding the operation. Forcing the operation does not black-hole it,
   /// the thunk's black hole catches the cycle instead.
   pub(crate) fn defer_operand(self: &Rc<Self>, state: &mut State, environment: &Environment) -> Result<Slot> {
      if matches!(**self, Self::Variable { .. }) {
         return state.alloc_thunk(Rc::clone(self), environment);
      }

      self.defer(state, environment)
   }

   /// Like [`Expression::defer`], but fills a zeroed slot. Variables become
   /// thunks here, as a slot cannot be aliased after the fact.
   fn defer_into(self: &Rc<Self>, state: &mut State, environment: &Environment, slot: &Slot) -> Result<()> {
      if let Some(value) = self.literal() {
         slot.initialize(value);
         return Ok(());
      }

      match **self {
         Self::Binary {
            ref position,
            operator,
            ref left,
            ref right,
         } if operator.is_lazy() => {
            let left = left.defer_operand(state, environment)?;
            let right = right.defer_operand(state, environment)?;

            slot.initialize(Value::LazyBinOp(Rc::new(LazyBinOp {
               operator,
               position: position.clone(),
               left,
               right,
            })));
         },

         _ => slot.initialize(Value::Thunk(Thunk::new(Rc::clone(self), environment.clone()))),
      }

      Ok(())
   }

   /// Creates the scope of a recursive set or `let`, where every definition
   /// can see every other one.
   fn recursive_scope(
      state: &mut State,
      environment: &Environment,
      definitions: &[Definition],
   ) -> Result<(Environment, Vec<Slot>)> {
      let slots = definitions
         .iter()
         .map(|_| state.alloc_zeroed())
         .collect::<Result<Vec<_>>>()?;

      let scope = definitions
         .iter()
         .zip(&slots)
         .fold(Scope::new(), |scope, (definition, slot)| {
            scope.bind(definition.name.clone(), slot.clone())
         });

      let environment = state.alloc_environment(environment, scope)?;

      for (definition, slot) in definitions.iter().zip(&slots) {
         definition
            .expression
            .defer_into(state, &environment, slot)?;
      }

      Ok((environment, slots))
   }
}
