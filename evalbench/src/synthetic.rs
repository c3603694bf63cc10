//! Seeded generator for topic-labelled conversation corpora.
//!
//! Evaluation-only: purity scores are for benches and tests, never part of a served response.

use datasets::Record;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Word pool a synthetic conversation is drawn from.
#[derive(Clone, Debug)]
pub struct TopicTemplate {
    name: String,
    words: Vec<String>,
}

impl TopicTemplate {
    /// Creates a new topic from its name and word pool.
    pub fn new<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the topic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the word pool.
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Customer-support topics with disjoint vocabularies.
pub fn default_topics() -> Vec<TopicTemplate> {
    vec![
        TopicTemplate::new(
            "refunds",
            ["refund", "money", "charge", "invoice", "payment", "card", "credit", "return"],
        ),
        TopicTemplate::new(
            "shipping",
            ["package", "delivery", "courier", "tracking", "late", "address", "parcel", "shipped"],
        ),
        TopicTemplate::new(
            "account",
            ["password", "login", "email", "reset", "locked", "username", "profile", "verify"],
        ),
    ]
}

/// Generated corpus plus the topic each record was drawn from.
#[derive(Clone, Debug)]
pub struct SyntheticCorpus {
    topics: Vec<TopicTemplate>,
    records: Vec<Record>,
    labels: Vec<usize>,
}

impl SyntheticCorpus {
    /// Generates `per_topic` records for every topic, interleaved round-robin so
    /// any prefix of the corpus covers all topics.
    pub fn generate(
        topics: Vec<TopicTemplate>,
        per_topic: usize,
        words_per_record: usize,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut records = Vec::with_capacity(per_topic * topics.len());
        let mut labels = Vec::with_capacity(per_topic * topics.len());

        for round in 0..per_topic {
            for (label, topic) in topics.iter().enumerate() {
                if topic.words.is_empty() {
                    continue;
                }
                let text = (0..words_per_record)
                    .map(|_| topic.words[rng.random_range(0..topic.words.len())].as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                records.push(Record::new(format!("{}-{round}", topic.name), text));
                labels.push(label);
            }
        }

        Self {
            topics,
            records,
            labels,
        }
    }

    /// Returns the topics in label order.
    pub fn topics(&self) -> &[TopicTemplate] {
        &self.topics
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Topic index of each record.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Scores cluster assignments for a prefix of the corpus against the true topics.
    ///
    /// `cluster_indices[i]` is the cluster of record `i`; records past the end of
    /// the slice are ignored.
    pub fn evaluate(&self, cluster_indices: &[usize]) -> BenchReport {
        let cluster_count = cluster_indices.iter().max().map_or(0, |max| max + 1);
        let mut counts = vec![vec![0usize; cluster_count]; self.topics.len()];
        for (&topic, &cluster) in self.labels.iter().zip(cluster_indices) {
            counts[topic][cluster] += 1;
        }

        let mut topic_reports = Vec::with_capacity(self.topics.len());
        let mut total = 0usize;
        let mut dominant_total = 0usize;
        for (topic, row) in self.topics.iter().zip(&counts) {
            let records: usize = row.iter().sum();
            let (dominant_cluster, dominant) = row
                .iter()
                .copied()
                .enumerate()
                .max_by_key(|&(_, count)| count)
                .unwrap_or((0, 0));
            let dominant_share = if records == 0 {
                0.0
            } else {
                dominant as f32 / records as f32
            };
            topic_reports.push(TopicReport {
                name: topic.name().to_string(),
                records,
                dominant_cluster,
                dominant_share,
            });
            total += records;
            dominant_total += dominant;
        }

        let purity = if total == 0 {
            0.0
        } else {
            dominant_total as f32 / total as f32
        };
        BenchReport {
            topic_reports,
            purity,
        }
    }
}

/// How one topic's records spread across clusters.
#[derive(Clone, Debug)]
pub struct TopicReport {
    name: String,
    records: usize,
    dominant_cluster: usize,
    dominant_share: f32,
}

impl TopicReport {
    /// Returns the topic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of evaluated records of this topic.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Returns the cluster holding most of this topic's records.
    pub fn dominant_cluster(&self) -> usize {
        self.dominant_cluster
    }

    /// Returns the share of records in the dominant cluster, in `[0, 1]`.
    pub fn dominant_share(&self) -> f32 {
        self.dominant_share
    }
}

/// Aggregated metrics across all topics.
#[derive(Clone, Debug)]
pub struct BenchReport {
    topic_reports: Vec<TopicReport>,
    purity: f32,
}

impl BenchReport {
    /// Returns the per-topic reports.
    pub fn topic_reports(&self) -> &[TopicReport] {
        &self.topic_reports
    }

    /// Share of records that sit in their topic's dominant cluster.
    pub fn purity(&self) -> f32 {
        self.purity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn generation_is_seeded_and_interleaved() {
        let a = SyntheticCorpus::generate(default_topics(), 4, 5, 7);
        let b = SyntheticCorpus::generate(default_topics(), 4, 5, 7);
        assert_eq!(a.records(), b.records());
        assert_eq!(a.records().len(), 12);
        assert_eq!(&a.labels()[..4], &[0, 1, 2, 0]);
        assert_eq!(a.records()[1].id, "shipping-0");
        assert!(
            a.records()[0]
                .text
                .split(' ')
                .all(|word| a.topics()[0].words().iter().any(|w| w == word))
        );
    }

    #[test]
    fn purity_scores_assignments() {
        let corpus = SyntheticCorpus::generate(default_topics(), 2, 3, 1);
        // labels: 0 1 2 0 1 2
        let perfect = corpus.evaluate(&[2, 0, 1, 2, 0, 1]);
        assert_relative_eq!(perfect.purity(), 1.0);
        assert_eq!(perfect.topic_reports()[0].dominant_cluster(), 2);

        let mixed = corpus.evaluate(&[0, 0, 0, 1, 0, 0]);
        assert_relative_eq!(mixed.purity(), 5.0 / 6.0);
        assert_relative_eq!(mixed.topic_reports()[0].dominant_share(), 0.5);

        let prefix = corpus.evaluate(&[0, 1]);
        assert_eq!(prefix.topic_reports()[2].records(), 0);
    }
}
