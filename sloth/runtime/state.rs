use std::rc::Rc;

use crate::{
   Arena,
   Block,
   Environment,
   Error,
   Expression,
   Interrupt,
   Position,
   Result,
   Settings,
   Statistics,
   Symbol,
   SymbolTable,
   arena,
   environment::Scope,
   value::{
      Application,
      Slot,
      Thunk,
      Value,
   },
};

/// The evaluator state. Owns all memory values live in.
pub struct State {
   settings:   Settings,
   arena:      Arena,
   symbols:    SymbolTable,
   interrupt:  Interrupt,
   statistics: Statistics,

   pub(crate) call_depth: usize,
}

impl Default for State {
   fn default() -> Self {
      Self::new(Settings::default())
   }
}

impl State {
   #[must_use]
   pub fn new(settings: Settings) -> Self {
      Self {
         arena: Arena::new(settings.memory_limit, settings.reclamation),
         settings,
         symbols: SymbolTable::new(),
         interrupt: Interrupt::new(),
         statistics: Statistics::default(),
         call_depth: 0,
      }
   }

   #[must_use]
   pub fn settings(&self) -> &Settings {
      &self.settings
   }

   #[must_use]
   pub fn statistics(&self) -> Statistics {
      self.statistics
   }

   pub(crate) fn statistics_mut(&mut self) -> &mut Statistics {
      &mut self.statistics
   }

   #[must_use]
   pub fn arena(&self) -> &Arena {
      &self.arena
   }

   /// A handle that cancels evaluation when triggered.
   #[must_use]
   pub fn interrupt(&self) -> Interrupt {
      self.interrupt.clone()
   }

   pub fn symbol(&mut self, name: &str) -> Symbol {
      self.symbols.intern(name)
   }

   pub(crate) fn check_interrupt(&self, position: &Position) -> Result<()> {
      if self.settings.interrupt_check && self.interrupt.is_triggered() {
         return Err(Error::Interrupted {
            position: position.clone(),
         });
      }

      Ok(())
   }
}

impl State {
   /// Allocates a zero-initialized block of `size` bytes.
   pub fn allocate(&mut self, size: usize) -> Result<Block> {
      let block = self.arena.allocate(size)?;

      self.statistics.bytes_allocated += size as u64;
      Ok(block)
   }

   pub(crate) fn alloc_zeroed(&mut self) -> Result<Slot> {
      let slot = self.arena.zeroed_slot()?;

      self.statistics.values_allocated += 1;
      self.statistics.bytes_allocated += arena::SLOT_SIZE as u64;
      Ok(slot)
   }

   /// Allocates a slot holding the given value.
   pub fn alloc_value(&mut self, value: impl Into<Value>) -> Result<Slot> {
      let slot = self.arena.slot(value.into())?;

      self.statistics.values_allocated += 1;
      self.statistics.bytes_allocated += arena::SLOT_SIZE as u64;
      Ok(slot)
   }

   /// Allocates a slot holding a thunk of the expression.
   pub fn alloc_thunk(&mut self, expression: Rc<Expression>, environment: &Environment) -> Result<Slot> {
      self.alloc_value(Thunk::new(expression, environment.clone()))
   }

   /// Allocates a slot holding a pending call of `function` with `argument`.
   pub fn alloc_application(&mut self, function: Slot, argument: Slot, position: Position) -> Result<Slot> {
      self.alloc_value(Value::Application(Rc::new(Application {
         function,
         argument,
         position,
      })))
   }

   /// Allocates a new environment with `scope` as the innermost scope.
   pub fn alloc_environment(&mut self, parent: &Environment, scope: Scope) -> Result<Environment> {
      let size = arena::SCOPE_SIZE + scope.len() * arena::BINDING_SIZE;
      let environment = self.arena.environment(parent, scope)?;

      self.statistics.environments_allocated += 1;
      self.statistics.bytes_allocated += size as u64;
      Ok(environment)
   }
}
