/// How the arena gives memory back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reclamation {
   /// Every slot is tracked and cleared when the owning state is dropped,
   /// which also breaks the reference cycles recursive scopes create.
   #[default]
   Session,

   /// Slots are freed by reference counting alone. Cyclic scopes outlive the
   /// state.
   Counted,
}

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
   /// The arena budget in bytes. Unlimited if unset.
   pub memory_limit: Option<usize>,

   #[builder(default)]
   pub reclamation: Reclamation,

   /// The maximum number of nested function applications.
   #[builder(default = 10_000)]
   pub max_call_depth: usize,

   /// Whether forcing polls the interrupt handle.
   #[builder(default = true)]
   pub interrupt_check: bool,
}

impl Default for Settings {
   fn default() -> Self {
      Self::builder().build()
   }
}

impl Settings {
   pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
      toml::from_str(source)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn defaults() {
      let settings = Settings::default();

      assert_eq!(settings.memory_limit, None);
      assert_eq!(settings.reclamation, Reclamation::Session);
      assert_eq!(settings.max_call_depth, 10_000);
      assert!(settings.interrupt_check);
   }

   #[test]
   fn from_toml() {
      let settings = Settings::from_toml(
         r#"
            memory-limit = 4096
            reclamation = "counted"
            interrupt-check = false
         "#,
      )
      .unwrap();

      assert_eq!(
         settings,
         Settings::builder()
            .memory_limit(4096)
            .reclamation(Reclamation::Counted)
            .interrupt_check(false)
            .build(),
      );
   }

   #[test]
   fn from_toml_rejects_unknown_reclamation() {
      assert!(Settings::from_toml(r#"reclamation = "garbage""#).is_err());
   }
}
