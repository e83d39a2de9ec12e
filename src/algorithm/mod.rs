/// Corpus assembly with deduplication and top-up rounds
pub mod corpus;
/// Constrained randomized maze growth
pub mod generator;
/// Topological maze validation
pub mod validator;
