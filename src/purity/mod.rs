/// Purity module
/// Accepts or rejects a lambda block against the composition grammar
///
/// Submodules:
/// - purity: Statement shape rules, the pure expression predicate and `Violation`
pub mod purity;

#[cfg(test)]
mod tests;
