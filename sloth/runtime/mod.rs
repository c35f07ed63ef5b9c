//! Lazy evaluation core.
//!
//! Values live in [`Slot`]s. A slot starts out deferred, as a thunk, a lazy
//! binary operation or a pending function application, and is rewritten in
//! place into its normal form the first time it is forced. Attributes of a
//! deferred value can be looked up without forcing all of it.

mod arena;
pub use arena::{
   Arena,
   Block,
};

mod attribute;

mod call;

mod environment;
pub use environment::{
   Environment,
   Scope,
};

pub mod error;
pub use error::{
   Error,
   Result,
};

pub mod expression;
pub use expression::{
   BinaryOperator,
   Definition,
   Expression,
};

mod force;

mod interrupt;
pub use interrupt::Interrupt;

mod position;
pub use position::Position;

pub mod registry;

mod settings;
pub use settings::{
   Reclamation,
   Settings,
};

mod state;
pub use state::State;

mod statistics;
pub use statistics::Statistics;

mod symbol;
pub use symbol::{
   Symbol,
   SymbolTable,
};

pub mod value;
pub use value::{
   Attr,
   Attributes,
   Slot,
   Value,
};
