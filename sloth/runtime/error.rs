use std::result;

use crate::{
   Position,
   Symbol,
};

/// A type alias for concise use of [`Error`].
pub type Result<T> = result::Result<T, Error>;

/// Everything that can go wrong while forcing values.
///
/// None of these are fatal to the process. A value whose forcing failed is
/// left in its deferred state and can be forced again.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
   #[error("infinite recursion encountered at {position}")]
   InfiniteRecursion { position: Position },

   #[error("value is {found} while {expected} was expected at {position}")]
   Type {
      expected: &'static str,
      found:    &'static str,
      position: Position,
   },

   #[error("cannot {operation} {left} and {right} at {position}")]
   Incompatible {
      operation: &'static str,
      left:      &'static str,
      right:     &'static str,
      position:  Position,
   },

   #[error("out of memory: requested {requested} bytes with {available} bytes available")]
   OutOfMemory { requested: usize, available: usize },

   #[error("undefined variable '{name}' at {position}")]
   UndefinedVariable { name: Symbol, position: Position },

   #[error("attribute '{name}' missing at {position}")]
   MissingAttribute { name: Symbol, position: Position },

   #[error("assertion failed at {position}")]
   Assertion { position: Position },

   #[error("division by zero at {position}")]
   DivisionByZero { position: Position },

   #[error("evaluation interrupted at {position}")]
   Interrupted { position: Position },

   #[error("stack overflow: call depth exceeded {limit} at {position}")]
   CallDepthExceeded { limit: usize, position: Position },

   #[error("cycle detected in registry for '{name}' after {limit} redirections")]
   CycleDetected { name: Symbol, limit: usize },

   #[error("cannot find '{name}' in the registries")]
   NotFound { name: Symbol },
}

impl Error {
   /// The source position this error is attributed to, if any.
   #[must_use]
   pub fn position(&self) -> Option<&Position> {
      match *self {
         Self::InfiniteRecursion { ref position }
         | Self::Type { ref position, .. }
         | Self::Incompatible { ref position, .. }
         | Self::UndefinedVariable { ref position, .. }
         | Self::MissingAttribute { ref position, .. }
         | Self::Assertion { ref position }
         | Self::DivisionByZero { ref position }
         | Self::Interrupted { ref position }
         | Self::CallDepthExceeded { ref position, .. } => Some(position).filter(|position| position.is_known()),

         Self::OutOfMemory { .. } | Self::CycleDetected { .. } | Self::NotFound { .. } => None,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn type_error_renders_found_type() {
      let error = Error::Type {
         expected: "a set",
         found:    "a list",
         position: Position::anonymous(2, 5),
      };

      assert_eq!(
         error.to_string(),
         "value is a list while a set was expected at «string»:2:5",
      );
      assert_eq!(error.position(), Some(&Position::anonymous(2, 5)));
   }

   #[test]
   fn unknown_positions_are_hidden() {
      let error = Error::InfiniteRecursion {
         position: Position::none(),
      };

      assert_eq!(error.position(), None);
      assert_eq!(
         error.to_string(),
         "infinite recursion encountered at undefined position",
      );
   }
}
