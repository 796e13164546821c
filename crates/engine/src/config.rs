use error::DebugFlags;

/// Executor settings, typically read from the embedding application's TOML configuration.
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Abort the execution when any variable fails coercion.
    pub validate_variables: bool,
    /// Dispatch `__schema` and `__type` on the query root.
    pub introspection: bool,
    pub concurrency: ConcurrencyMode,
    pub debug: DebugConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig {
            validate_variables: true,
            introspection: true,
            concurrency: ConcurrencyMode::default(),
            debug: DebugConfig::default(),
        }
    }
}

/// Built-in promise adapter used when none is injected.
#[derive(Debug, Default, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    #[default]
    Sequential,
    Concurrent,
}

#[derive(Debug, Default, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    pub debug_message: bool,
    pub category: bool,
}

impl DebugConfig {
    pub fn flags(&self) -> DebugFlags {
        let mut flags = DebugFlags::empty();
        flags.set(DebugFlags::INCLUDE_DEBUG_MESSAGE, self.debug_message);
        flags.set(DebugFlags::INCLUDE_CATEGORY, self.category);
        flags
    }
}
