use std::fmt;

use crate::Symbol;

/// A position in a source file, used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
   /// The file this position belongs to.
   pub file:   Option<Symbol>,
   /// The line number. One indexed, zero means the position is unknown.
   pub line:   u32,
   /// The column. One indexed.
   pub column: u32,
}

impl fmt::Display for Position {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      if !self.is_known() {
         return writer.write_str("undefined position");
      }

      match self.file {
         Some(ref file) => write!(writer, "{file}:{line}:{column}", line = self.line, column = self.column),
         None => write!(writer, "«string»:{line}:{column}", line = self.line, column = self.column),
      }
   }
}

impl Position {
   #[must_use]
   pub fn new(file: Symbol, line: u32, column: u32) -> Self {
      Self {
         file: Some(file),
         line,
         column,
      }
   }

   /// Creates a position for code that was not read from a file.
   #[must_use]
   pub fn anonymous(line: u32, column: u32) -> Self {
      Self {
         file: None,
         line,
         column,
      }
   }

   /// The absent position, for call sites that cannot attribute an error.
   #[must_use]
   pub fn none() -> Self {
      Self {
         file:   None,
         line:   0,
         column: 0,
      }
   }

   #[must_use]
   pub fn is_known(&self) -> bool {
      self.line != 0
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::SymbolTable;

   #[test]
   fn display() {
      let mut symbols = SymbolTable::new();

      assert_eq!(
         Position::new(symbols.intern("default.sl"), 3, 14).to_string(),
         "default.sl:3:14",
      );
      assert_eq!(Position::anonymous(1, 1).to_string(), "«string»:1:1");
      assert_eq!(Position::none().to_string(), "undefined position");
   }
}
