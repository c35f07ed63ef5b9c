//! Alias resolution for source references.
//!
//! A registry maps references to other references. Resolving follows those
//! redirections until a direct reference remains. Only the lookup lives
//! here, loading registries from disk or the network is up to the caller.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
   Error,
   Result,
   Symbol,
   value::SString,
};

/// The most search passes a single resolution may take. Every redirection
/// starts a new pass, so one fewer redirection than this can succeed.
pub const REDIRECTION_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
   /// A name that only means something through a registry.
   Indirect(Symbol),
   /// A location that can be fetched as is.
   Direct(Symbol),
}

/// A reference to a source tree, optionally pinned to a ref and a
/// revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, bon::Builder)]
pub struct Reference {
   #[builder(start_fn)]
   pub location: Location,
   pub reference: Option<SString>,
   pub revision:  Option<SString>,
}

impl fmt::Display for Reference {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self.location {
         Location::Indirect(ref id) => write!(writer, "{id}")?,
         Location::Direct(ref url) => write!(writer, "{url}")?,
      }

      if let Some(ref reference) = self.reference {
         write!(writer, "/{reference}")?;
      }

      if let Some(ref revision) = self.revision {
         write!(writer, "/{revision}")?;
      }

      Ok(())
   }
}

impl Reference {
   #[must_use]
   pub fn name(&self) -> &Symbol {
      match self.location {
         Location::Indirect(ref name) | Location::Direct(ref name) => name,
      }
   }

   #[must_use]
   pub fn is_direct(&self) -> bool {
      matches!(self.location, Location::Direct(_))
   }

   /// Whether `that` is the same location and at least as pinned as this
   /// reference.
   #[must_use]
   pub fn contains(&self, that: &Self) -> bool {
      self.location == that.location
         && (self.reference.is_none() || self.reference == that.reference)
         && (self.revision.is_none() || self.revision == that.revision)
   }

   fn with_overrides(&self, reference: Option<SString>, revision: Option<SString>) -> Self {
      Self {
         location:  self.location.clone(),
         reference: reference.or_else(|| self.reference.clone()),
         revision:  revision.or_else(|| self.revision.clone()),
      }
   }
}

/// Attributes an entry attaches to the reference it redirects to.
pub type Extra = FxHashMap<Symbol, SString>;

#[derive(Debug, Clone)]
pub struct Entry {
   pub from:  Reference,
   pub to:    Reference,
   pub extra: Extra,
}

impl Entry {
   #[must_use]
   pub fn new(from: Reference, to: Reference) -> Self {
      Self {
         from,
         to,
         extra: Extra::default(),
      }
   }

   #[must_use]
   pub fn with_extra(mut self, name: Symbol, value: impl Into<SString>) -> Self {
      self.extra.insert(name, value.into());
      self
   }

   /// The reference `reference` is redirected to. A ref or revision that the
   /// entry does not pin is carried over.
   fn redirect(&self, reference: &Reference) -> Reference {
      let pinned_reference = reference
         .reference
         .clone()
         .filter(|_| self.from.reference.is_none());
      let pinned_revision = reference
         .revision
         .clone()
         .filter(|_| self.from.revision.is_none());

      self.to.with_overrides(pinned_reference, pinned_revision)
   }
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
   entries: Vec<Entry>,
}

impl FromIterator<Entry> for Registry {
   fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
      Self {
         entries: iter.into_iter().collect(),
      }
   }
}

impl Registry {
   #[must_use]
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add(&mut self, entry: Entry) {
      self.entries.push(entry);
   }

   pub fn remove(&mut self, from: &Reference) {
      self.entries.retain(|entry| entry.from != *from);
   }

   #[must_use]
   pub fn entries(&self) -> &[Entry] {
      &self.entries
   }
}

/// Resolves `reference` against `registries`, which are searched in
/// priority order.
///
/// Every redirection restarts the search from the first registry. Returns
/// the direct reference that remains along with the extra attributes of the
/// last entry that applied.
pub fn resolve(registries: &[Registry], mut reference: Reference) -> Result<(Reference, Extra)> {
   let mut extra = Extra::default();
   let mut passes = 0;

   loop {
      passes += 1;
      if passes > REDIRECTION_LIMIT {
         return Err(Error::CycleDetected {
            name:  reference.name().clone(),
            limit: REDIRECTION_LIMIT,
         });
      }

      let Some(entry) = registries
         .iter()
         .flat_map(Registry::entries)
         .find(|entry| entry.from.contains(&reference))
      else {
         break;
      };

      let redirected = entry.redirect(&reference);
      tracing::trace!("Redirecting {reference} to {redirected}.");

      reference = redirected;
      extra.clone_from(&entry.extra);
   }

   if !reference.is_direct() {
      return Err(Error::NotFound {
         name: reference.name().clone(),
      });
   }

   Ok((reference, extra))
}
