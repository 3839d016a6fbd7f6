//! Statistical tables supplied by the analytics collaborator
//!
//! How correlations and association rules are computed is outside this crate.
//! These types only hold the results and answer the lookups generation needs.

use serde::{Deserialize, Serialize};

use super::code::canonical;
use super::domains::Domains;

/// Directed relation between two strongly correlated questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongPair {
    /// Question whose answer triggers the cascade
    pub source: usize,
    /// Question sampled in the cascade
    pub target: usize,
    /// Correlation score, above the configured threshold
    pub score: f64,
}

/// Strong pairs of one cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrongPairTable {
    pairs: Vec<StrongPair>,
}

impl StrongPairTable {
    /// Wrap pairs already filtered by the analytics collaborator
    #[must_use]
    pub fn from_pairs(pairs: Vec<StrongPair>) -> Self {
        Self { pairs }
    }

    /// Keep every off-diagonal entry of a question correlation matrix above `threshold`
    #[must_use]
    pub fn from_correlations(matrix: &[Vec<f64>], threshold: f64) -> Self {
        let pairs = matrix
            .iter()
            .enumerate()
            .flat_map(|(source, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |&(target, &score)| target != source && score > threshold)
                    .map(move |(target, &score)| StrongPair {
                        source,
                        target,
                        score,
                    })
            })
            .collect();
        Self { pairs }
    }

    /// All pairs
    #[must_use]
    pub fn pairs(&self) -> &[StrongPair] {
        &self.pairs
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs where the question is the source
    #[must_use]
    pub fn out_degree(&self, question: usize) -> usize {
        self.pairs.iter().filter(|pair| pair.source == question).count()
    }

    /// Targets of a question, in table order
    pub fn targets(&self, question: usize) -> impl Iterator<Item = usize> + '_ {
        self.pairs
            .iter()
            .filter(move |pair| pair.source == question)
            .map(|pair| pair.target)
    }
}

/// Antecedent to consequent code relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Code already sampled
    pub antecedent: String,
    /// Code it makes likely
    pub consequent: String,
    /// Confidence in (0, 1]
    pub confidence: f64,
}

/// Association rules of one cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationRules {
    rules: Vec<AssociationRule>,
}

impl AssociationRules {
    /// Wrap rules as supplied
    #[must_use]
    pub fn from_rules(rules: Vec<AssociationRule>) -> Self {
        Self { rules }
    }

    /// Keep only rules whose codes belong to different known questions
    #[must_use]
    pub fn cross_question(rules: Vec<AssociationRule>, domains: &Domains) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| {
                match (
                    domains.question_of(&rule.antecedent),
                    domains.question_of(&rule.consequent),
                ) {
                    (Some(a), Some(c)) => a != c,
                    _ => false,
                }
            })
            .collect();
        Self { rules }
    }

    /// All rules
    #[must_use]
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// (consequent, confidence) pairs for every rule whose antecedent is `code`
    #[must_use]
    pub fn context_for(&self, code: &str) -> Vec<(String, f64)> {
        let key = canonical(code);
        self.rules
            .iter()
            .filter(|rule| canonical(&rule.antecedent) == key)
            .map(|rule| (rule.consequent.clone(), rule.confidence))
            .collect()
    }
}

/// Tables computed for one respondent cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterAnalytics {
    /// Strongly correlated question pairs
    #[serde(default)]
    pub strong_pairs: StrongPairTable,
    /// Cross-question association rules
    #[serde(default)]
    pub rules: AssociationRules,
}
