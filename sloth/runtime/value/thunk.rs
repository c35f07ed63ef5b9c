use std::rc::Rc;

use crate::{
   Environment,
   Position,
   Symbol,
   expression::{
      BinaryOperator,
      Expression,
   },
   value::Slot,
};

/// A deferred computation: an expression paired with the environment it has
/// to be evaluated in.
#[derive(Debug, Clone)]
pub struct Thunk {
   expression:  Rc<Expression>,
   environment: Environment,
}

impl Thunk {
   #[must_use]
   pub fn new(expression: Rc<Expression>, environment: Environment) -> Self {
      Self {
         expression,
         environment,
      }
   }

   #[must_use]
   pub fn expression(&self) -> &Rc<Expression> {
      &self.expression
   }

   #[must_use]
   pub fn environment(&self) -> &Environment {
      &self.environment
   }

   #[must_use]
   pub fn position(&self) -> Position {
      self.expression.position()
   }
}

/// A binary operation whose operands have not been forced yet.
#[derive(Debug, Clone)]
pub struct LazyBinOp {
   pub(crate) operator: BinaryOperator,
   pub(crate) position: Position,
   pub(crate) left:     Slot,
   pub(crate) right:    Slot,
}

impl LazyBinOp {
   #[must_use]
   pub fn operator(&self) -> BinaryOperator {
      self.operator
   }

   #[must_use]
   pub fn position(&self) -> &Position {
      &self.position
   }

   #[must_use]
   pub fn left(&self) -> &Slot {
      &self.left
   }

   #[must_use]
   pub fn right(&self) -> &Slot {
      &self.right
   }
}

/// A function call that has not been made yet.
#[derive(Debug, Clone)]
pub struct Application {
   pub(crate) function: Slot,
   pub(crate) argument: Slot,
   pub(crate) position: Position,
}

impl Application {
   #[must_use]
   pub fn function(&self) -> &Slot {
      &self.function
   }

   #[must_use]
   pub fn argument(&self) -> &Slot {
      &self.argument
   }

   #[must_use]
   pub fn position(&self) -> &Position {
      &self.position
   }
}

/// A closure.
#[derive(Debug, Clone)]
pub struct Lambda {
   pub(crate) parameter:   Symbol,
   pub(crate) body:        Rc<Expression>,
   pub(crate) environment: Environment,
   pub(crate) position:    Position,
}

impl Lambda {
   #[must_use]
   pub fn parameter(&self) -> &Symbol {
      &self.parameter
   }

   #[must_use]
   pub fn position(&self) -> &Position {
      &self.position
   }
}

/// Marks a value that is being forced. Only the forcing engine can create
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blackhole(());

impl Blackhole {
   pub(crate) const fn new() -> Self {
      Self(())
   }
}
