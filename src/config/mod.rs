// Configuration modules for the phishing scanner

pub mod heuristics;

pub use heuristics::{HeuristicConfig, HeuristicConfigError, ScoreWeights};
