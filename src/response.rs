//! Serving payload for one visualization request.

use datasets::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub cluster_id: usize,
    /// Members across the whole corpus, not just the returned points.
    pub size: usize,
    pub examples: Vec<Example>,
}

/// Parallel arrays truncated to the first `max_points` records, plus one summary per cluster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationResponse {
    pub points: Vec<[f32; 2]>,
    pub cluster_indices: Vec<usize>,
    pub ids: Vec<String>,
    pub texts: Vec<String>,
    pub clusters: Vec<ClusterSummary>,
}

impl VisualizationResponse {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Builds the response from per-record projections and labels, all in corpus order.
pub fn assemble(
    records: &[Record],
    projections: &[Vec<f32>],
    labels: &[usize],
    cluster_count: usize,
    max_points: usize,
    examples_per_cluster: usize,
) -> VisualizationResponse {
    let shown = records.len().min(projections.len()).min(labels.len()).min(max_points);

    let points = projections[..shown]
        .iter()
        .map(|p| [p.first().copied().unwrap_or(0.0), p.get(1).copied().unwrap_or(0.0)])
        .collect();

    let mut clusters: Vec<ClusterSummary> = (0..cluster_count)
        .map(|cluster_id| ClusterSummary {
            cluster_id,
            size: 0,
            examples: Vec::new(),
        })
        .collect();
    for (record, &label) in records.iter().zip(labels) {
        let Some(summary) = clusters.get_mut(label) else {
            continue;
        };
        summary.size += 1;
        if summary.examples.len() < examples_per_cluster {
            summary.examples.push(Example {
                id: record.id.clone(),
                text: record.text.clone(),
            });
        }
    }

    VisualizationResponse {
        points,
        cluster_indices: labels[..shown].to_vec(),
        ids: records[..shown].iter().map(|r| r.id.clone()).collect(),
        texts: records[..shown].iter().map(|r| r.text.clone()).collect(),
        clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn corpus(n: usize) -> (Vec<Record>, Vec<Vec<f32>>, Vec<usize>) {
        let records = (0..n)
            .map(|i| Record::new(format!("r{i}"), format!("text {i}")))
            .collect();
        let projections = (0..n).map(|i| vec![i as f32, -(i as f32)]).collect();
        let labels = (0..n).map(|i| i % 3).collect();
        (records, projections, labels)
    }

    #[rstest]
    #[case(4, 4)]
    #[case(500, 500)]
    #[case(501, 500)]
    #[case(1200, 500)]
    fn points_are_truncated_positionally(#[case] n: usize, #[case] expected: usize) {
        let (records, projections, labels) = corpus(n);
        let response = assemble(&records, &projections, &labels, 3, 500, 3);
        assert_eq!(response.len(), expected);
        assert_eq!(response.cluster_indices.len(), expected);
        assert_eq!(response.ids.len(), expected);
        assert_eq!(response.texts.len(), expected);
        assert_eq!(response.ids[0], "r0");
        assert_eq!(response.points[expected - 1], [(expected - 1) as f32, -((expected - 1) as f32)]);
    }

    #[test]
    fn cluster_summaries_count_the_whole_corpus() {
        let (records, projections, labels) = corpus(10);
        let response = assemble(&records, &projections, &labels, 3, 4, 2);
        let sizes: Vec<usize> = response.clusters.iter().map(|c| c.size).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        let first: Vec<&str> = response.clusters[0].examples.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(first, vec!["r0", "r3"]);
        assert_eq!(response.clusters[2].examples[1].text, "text 5");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let (records, projections, labels) = corpus(1);
        let json = serde_json::to_value(assemble(&records, &projections, &labels, 1, 500, 3)).unwrap();
        assert!(json.get("clusterIndices").is_some());
        assert_eq!(json["clusters"][0]["clusterId"], 0);
        assert_eq!(json["points"][0][1], 0.0);
    }
}
