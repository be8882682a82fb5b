/// Dense wire index assigned to a network-callable method within one
/// registry generation
pub type RpcIndex = u32;

/// Counts how many times the method registry has been (re)built
pub type RegistryGeneration = u64;
