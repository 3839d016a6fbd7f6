//! End-to-end repair and generation
//!
//! The pipeline corrects the input, partitions it into respondent clusters,
//! then generates rows per cluster in parallel until the target size is
//! reached. Every generated batch goes back through the correction loop.

use std::fmt;

use indicatif::ProgressBar;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::algorithm::correction::Corrector;
use crate::algorithm::frequency::{AnswerCountDistribution, FrequencyTable};
use crate::algorithm::generation::Generator;
use crate::config::AnalyzerConfig;
use crate::error::{Result, SurveyError};
use crate::models::{AnswerRow, AnswerSet, AssociationRules, ClusterAnalytics, Domains, StrongPairTable, SurveySchema};
use crate::utils::logging::{RepairObserver, add_group_progress_bar, create_multi_progress, finish_progress_bar};

/// Partition of row indices into respondent clusters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clusters {
    members: Vec<Vec<usize>>,
}

impl Clusters {
    /// Wrap a partition computed elsewhere
    #[must_use]
    pub fn new(members: Vec<Vec<usize>>) -> Self {
        Self { members }
    }

    /// Every row in one cluster
    #[must_use]
    pub fn single(row_count: usize) -> Self {
        Self {
            members: vec![(0..row_count).collect()],
        }
    }

    /// Number of clusters
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if there are no clusters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Row indices of one cluster
    #[must_use]
    pub fn members(&self, cluster: usize) -> &[usize] {
        &self.members[cluster]
    }

    /// Split `missing` rows across clusters in proportion to their size
    ///
    /// Every cluster but the last gets `round(missing * size / total)`; the
    /// last takes whatever remains so the shares always add up to `missing`.
    #[must_use]
    pub fn allocate(&self, missing: usize) -> Vec<usize> {
        let total: usize = self.members.iter().map(Vec::len).sum();
        let last = self.members.len().saturating_sub(1);
        let mut assigned = 0;

        self.members
            .iter()
            .enumerate()
            .map(|(cluster, rows)| {
                let share = if cluster == last {
                    missing - assigned
                } else if total == 0 {
                    0
                } else {
                    let exact = (missing * rows.len()) as f64 / total as f64;
                    (exact.round() as usize).min(missing - assigned)
                };
                assigned += share;
                share
            })
            .collect()
    }
}

/// Supplies the statistics generation consumes
///
/// Clustering and the computation of strong pairs and rules happen outside
/// this crate; implementations bridge to whatever produces them.
pub trait AnalyticsProvider: Sync {
    /// Partition the corrected answer set into clusters
    fn partition(&self, answers: &[AnswerRow]) -> Clusters {
        Clusters::single(answers.len())
    }

    /// Strong pairs and rules for one cluster, given its rows without ignored codes
    fn analytics(&self, cluster: usize, rows: &[AnswerRow], domains: &Domains) -> Result<ClusterAnalytics>;
}

/// The same tables for every cluster
#[derive(Debug, Clone, Default)]
pub struct StaticAnalytics {
    tables: ClusterAnalytics,
}

impl StaticAnalytics {
    /// Serve `tables` for every cluster
    #[must_use]
    pub const fn new(tables: ClusterAnalytics) -> Self {
        Self { tables }
    }
}

impl AnalyticsProvider for StaticAnalytics {
    fn analytics(&self, _cluster: usize, _rows: &[AnswerRow], domains: &Domains) -> Result<ClusterAnalytics> {
        Ok(ClusterAnalytics {
            strong_pairs: self.tables.strong_pairs.clone(),
            rules: AssociationRules::cross_question(self.tables.rules.rules().to_vec(), domains),
        })
    }
}

/// Audit record for one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterDiagnostics {
    /// Cluster index
    pub cluster: usize,
    /// Rows in the cluster
    pub size: usize,
    /// Rows generated for the cluster, before correction
    pub generated: usize,
    /// Strong pairs used
    pub strong_pairs: StrongPairTable,
    /// Association rules used
    pub rules: AssociationRules,
}

impl fmt::Display for ClusterDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cluster {}: {} rows, {} generated, {} strong pairs, {} rules",
            self.cluster + 1,
            self.size,
            self.generated,
            self.strong_pairs.pairs().len(),
            self.rules.rules().len()
        )
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Corrected rows followed by surviving generated rows
    pub answers: AnswerSet,
    /// Net number of rows added by generation
    pub generated_count: usize,
    /// Correction passes over all runs of the loop
    pub correction_passes: usize,
    /// One record per cluster, empty when no generation was needed
    pub cluster_diagnostics: Vec<ClusterDiagnostics>,
}

/// Read-only tables of one cluster
struct ClusterTables {
    frequencies: FrequencyTable,
    counts: AnswerCountDistribution,
    analytics: ClusterAnalytics,
}

/// Correction and generation driven by one configuration
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    schema: &'a SurveySchema,
    config: &'a AnalyzerConfig,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline
    #[must_use]
    pub const fn new(schema: &'a SurveySchema, config: &'a AnalyzerConfig) -> Self {
        Self { schema, config }
    }

    /// Correct `answers`, then generate until `needed_answers_count` rows exist
    ///
    /// # Errors
    ///
    /// Fails when correction does not converge, when the analytics provider
    /// fails, or when `max_generation_rounds` rounds do not reach the target.
    pub fn run(
        &self,
        answers: AnswerSet,
        analytics: &dyn AnalyticsProvider,
        observer: &mut dyn RepairObserver,
    ) -> Result<PipelineReport> {
        let mut rng = self.worker_rng(0);
        let corrector = Corrector::new(self.schema, self.config.static_error)
            .with_max_passes(self.config.max_correction_passes);

        let outcome = corrector.run(answers, &mut rng, observer)?;
        let mut correction_passes = outcome.passes;
        let mut answers = outcome.answers;
        let corrected_len = answers.len();
        let needed = self.config.needed_answers_count;

        if corrected_len >= needed {
            info!("{corrected_len} questionnaires available, no generation needed");
            return Ok(PipelineReport {
                answers,
                generated_count: 0,
                correction_passes,
                cluster_diagnostics: Vec::new(),
            });
        }

        let mut clusters = analytics.partition(&answers);
        if clusters.is_empty() {
            warn!("Analytics returned no clusters, using a single cluster");
            clusters = Clusters::single(answers.len());
        }
        let tables = self.cluster_tables(&answers, &clusters, analytics)?;
        let mut generated_per_cluster = vec![0usize; clusters.len()];

        let mut rounds = 0;
        while answers.len() < needed {
            if rounds >= self.config.max_generation_rounds {
                return Err(SurveyError::GenerationStalled { rounds });
            }
            rounds += 1;

            let missing = needed - answers.len();
            info!("Generation round {rounds}: {missing} questionnaires missing");
            let allocation = clusters.allocate(missing);
            let batches = self.generate_round(&tables, &allocation, rounds);

            for (cluster, batch) in batches.into_iter().enumerate() {
                generated_per_cluster[cluster] += batch.len();
                answers.extend(batch);
            }

            let outcome = corrector.run(answers, &mut rng, observer)?;
            correction_passes += outcome.passes;
            answers = outcome.answers;
        }

        let cluster_diagnostics = tables
            .into_iter()
            .enumerate()
            .map(|(cluster, table)| ClusterDiagnostics {
                cluster,
                size: clusters.members(cluster).len(),
                generated: generated_per_cluster[cluster],
                strong_pairs: table.analytics.strong_pairs,
                rules: table.analytics.rules,
            })
            .collect();

        Ok(PipelineReport {
            generated_count: answers.len().saturating_sub(corrected_len),
            answers,
            correction_passes,
            cluster_diagnostics,
        })
    }

    /// Frequencies, answer counts and analytics of every cluster
    fn cluster_tables(
        &self,
        answers: &[AnswerRow],
        clusters: &Clusters,
        analytics: &dyn AnalyticsProvider,
    ) -> Result<Vec<ClusterTables>> {
        let domains = self.schema.domains();

        (0..clusters.len())
            .map(|cluster| -> Result<ClusterTables> {
                let rows: Vec<AnswerRow> = clusters
                    .members(cluster)
                    .iter()
                    .filter_map(|&idx| answers.get(idx))
                    .map(|row| {
                        row.iter()
                            .filter(|code| !self.schema.is_ignored(code))
                            .cloned()
                            .collect()
                    })
                    .collect();

                Ok(ClusterTables {
                    frequencies: FrequencyTable::compute(&rows, domains, self.config.static_error),
                    counts: AnswerCountDistribution::from_answers(
                        &rows,
                        domains,
                        &self.schema.constraints().max_answers,
                    ),
                    analytics: analytics.analytics(cluster, &rows, domains)?,
                })
            })
            .collect()
    }

    /// Generate every cluster's share in parallel
    fn generate_round(&self, tables: &[ClusterTables], allocation: &[usize], round: usize) -> Vec<AnswerSet> {
        let total: usize = allocation.iter().sum();
        let (mp, main_pb) = create_multi_progress(total as u64, Some("Generating questionnaires"));

        let batches: Vec<AnswerSet> = tables
            .par_iter()
            .zip(allocation.par_iter())
            .enumerate()
            .map(|(cluster, (table, &count))| {
                let group_pb = add_group_progress_bar(&mp, count as u64, Some(&format!("Cluster {}", cluster + 1)));
                let mut rng = self.worker_rng((round * tables.len() + cluster + 1) as u64);
                let generator = Generator::new(self.schema, &table.frequencies, &table.counts, &table.analytics);

                let batch: AnswerSet = (0..count)
                    .map(|_| {
                        let row = generator.generate_row(&mut rng).row;
                        tick(&group_pb, &main_pb);
                        row
                    })
                    .collect();
                group_pb.finish_and_clear();
                batch
            })
            .collect();

        finish_progress_bar(&main_pb, Some("Generation round complete"));
        batches
    }

    /// Seeded from the configured seed plus `offset`, or from system entropy
    fn worker_rng(&self, offset: u64) -> StdRng {
        match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(offset)),
            None => StdRng::from_os_rng(),
        }
    }
}

fn tick(group_pb: &ProgressBar, main_pb: &ProgressBar) {
    group_pb.inc(1);
    main_pb.inc(1);
}
