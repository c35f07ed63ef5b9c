use std::{
   fmt,
   ops,
};

/// A cheaply cloneable string slice.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(clippy::module_name_repetitions)]
pub struct SString(arcstr::Substr);

impl From<&str> for SString {
   fn from(s: &str) -> Self {
      Self(arcstr::Substr::from(s))
   }
}

impl From<String> for SString {
   fn from(s: String) -> Self {
      Self(arcstr::Substr::from(s))
   }
}

impl ops::Deref for SString {
   type Target = str;

   fn deref(&self) -> &Self::Target {
      &self.0
   }
}

impl fmt::Debug for SString {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(writer, "{:?}", &**self)
   }
}

impl fmt::Display for SString {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer.write_str(self)
   }
}

impl SString {
   #[must_use]
   pub fn concat(&self, that: &str) -> Self {
      if that.is_empty() {
         return self.clone();
      }

      let mut joined = String::with_capacity(self.len() + that.len());
      joined.push_str(self);
      joined.push_str(that);
      Self::from(joined)
   }
}
