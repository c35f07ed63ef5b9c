/// Evaluation counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
   /// Thunks whose expression was evaluated by forcing.
   pub thunks_forced:          u64,
   /// Lazy binary operations combined by forcing.
   pub lazy_bin_ops_forced:    u64,
   /// Pending applications invoked by forcing.
   pub applications_forced:    u64,
   /// Lambda bodies entered.
   pub function_calls:         u64,
   /// Attribute lookups answered by an expression or operator hook.
   pub attribute_shortcuts:    u64,
   pub values_allocated:       u64,
   pub environments_allocated: u64,
   pub bytes_allocated:        u64,
}
