/// Checker module
/// Hands synthesized stub modules to a static type checker
///
/// Submodules:
/// - checker: The `TypeChecker` seam and the subprocess-backed `ExternalChecker`
pub mod checker;

#[cfg(test)]
mod tests;
