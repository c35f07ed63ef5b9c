//! Value representation.

use std::{
   fmt,
   rc::Rc,
};

use archery::RcK;

pub mod attributes;
pub use attributes::{
   Attr,
   Attributes,
};

mod slot;
pub use slot::Slot;

pub mod string;
pub use string::SString;

mod thunk;
pub use thunk::{
   Application,
   Blackhole,
   Lambda,
   LazyBinOp,
   Thunk,
};

/// An immutable list of value slots.
pub type List = rpds::Vector<Slot, RcK>;

/// A value. The tag is the current state of the value, not its final type:
/// [`Value::Thunk`], [`Value::LazyBinOp`] and [`Value::Application`] turn
/// into one of the concrete variants when forced, and [`Value::Blackhole`]
/// is only ever observed while that happens.
#[derive(Clone)]
pub enum Value {
   Null,
   Boolean(bool),
   Integer(Rc<num::BigInt>),
   Float(f64),
   String(SString),
   Path(SString),

   List(List),
   Attributes(Attributes),

   Lambda(Rc<Lambda>),

   Thunk(Thunk),
   LazyBinOp(Rc<LazyBinOp>),
   Application(Rc<Application>),

   Blackhole(Blackhole),
}

impl fmt::Debug for Value {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      match *self {
         Self::Null => writer.write_str("null"),
         Self::Boolean(boolean) => write!(writer, "{boolean}"),
         Self::Integer(ref integer) => write!(writer, "{integer}"),
         Self::Float(float) => write!(writer, "{float:?}"),
         Self::String(ref string) => write!(writer, "{string:?}"),
         Self::Path(ref path) => write!(writer, "{path}"),

         Self::List(ref list) => {
            writer
               .debug_list()
               .entries(list.iter().map(Slot::type_name))
               .finish()
         },
         Self::Attributes(ref attributes) => attributes.fmt(writer),

         Self::Lambda(ref lambda) => write!(writer, "«lambda {parameter}»", parameter = lambda.parameter),

         Self::Thunk(_) => writer.write_str("«thunk»"),
         Self::LazyBinOp(ref operation) => write!(writer, "«lazy {operator:?}»", operator = operation.operator),
         Self::Application(_) => writer.write_str("«application»"),
         Self::Blackhole(_) => writer.write_str("«black hole»"),
      }
   }
}

impl From<bool> for Value {
   fn from(boolean: bool) -> Self {
      Self::Boolean(boolean)
   }
}

impl From<i64> for Value {
   fn from(integer: i64) -> Self {
      Self::Integer(Rc::new(num::BigInt::from(integer)))
   }
}

impl From<num::BigInt> for Value {
   fn from(integer: num::BigInt) -> Self {
      Self::Integer(Rc::new(integer))
   }
}

impl From<f64> for Value {
   fn from(float: f64) -> Self {
      Self::Float(float)
   }
}

impl From<&str> for Value {
   fn from(string: &str) -> Self {
      Self::String(SString::from(string))
   }
}

impl From<SString> for Value {
   fn from(string: SString) -> Self {
      Self::String(string)
   }
}

impl From<List> for Value {
   fn from(list: List) -> Self {
      Self::List(list)
   }
}

impl From<Attributes> for Value {
   fn from(attributes: Attributes) -> Self {
      Self::Attributes(attributes)
   }
}

impl From<Thunk> for Value {
   fn from(thunk: Thunk) -> Self {
      Self::Thunk(thunk)
   }
}

impl Value {
   /// The human readable type name, used in error messages.
   #[must_use]
   pub fn type_name(&self) -> &'static str {
      match *self {
         Self::Null => "null",
         Self::Boolean(_) => "a Boolean",
         Self::Integer(_) => "an integer",
         Self::Float(_) => "a float",
         Self::String(_) => "a string",
         Self::Path(_) => "a path",
         Self::List(_) => "a list",
         Self::Attributes(_) => "a set",
         Self::Lambda(_) => "a function",
         Self::Thunk(_) => "a thunk",
         Self::LazyBinOp(_) => "a lazy binary operation",
         Self::Application(_) => "a function application",
         Self::Blackhole(_) => "a black hole",
      }
   }

   #[must_use]
   pub fn is_list(&self) -> bool {
      matches!(*self, Self::List(_))
   }

   /// Whether forcing this value would do any work.
   #[must_use]
   pub fn is_deferred(&self) -> bool {
      matches!(
         *self,
         Self::Thunk(_) | Self::LazyBinOp(_) | Self::Application(_)
      )
   }

   #[must_use]
   pub fn as_integer(&self) -> Option<&num::BigInt> {
      match *self {
         Self::Integer(ref integer) => Some(integer),
         _ => None,
      }
   }

   #[must_use]
   pub fn as_boolean(&self) -> Option<bool> {
      match *self {
         Self::Boolean(boolean) => Some(boolean),
         _ => None,
      }
   }

   #[must_use]
   pub fn as_attributes(&self) -> Option<&Attributes> {
      match *self {
         Self::Attributes(ref attributes) => Some(attributes),
         _ => None,
      }
   }

   #[must_use]
   pub fn as_list(&self) -> Option<&List> {
      match *self {
         Self::List(ref list) => Some(list),
         _ => None,
      }
   }
}
