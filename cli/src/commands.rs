use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use convmap::{PipelineError, TrainedPipeline, VisualizationService};
use datasets::{LoadOptions, Record, load_corpus};
use tracing::info;

use crate::config::{TrainSettings, VisualizeSettings};
use crate::telemetry::{init_telemetry, write_profile};

pub fn run_train(config_path: Option<PathBuf>) -> Result<()> {
    let settings = crate::config::load_settings::<TrainSettings>("train", config_path)?;
    let profiler_guard = init_telemetry();
    info!(?settings.pipeline, "pipeline configuration");

    let service = VisualizationService::new(settings.pipeline.clone());
    let pipeline = train(&service, &settings.corpus, &settings.load)?;
    let report_text = render_report(&pipeline);
    println!("Training summary:\n{report_text}");

    let report_body = format!("# Autoencoder training summary\n{report_text}");
    write_text_file(&settings.report, &report_body)?;
    println!("Training summary written to {}", settings.report.display());

    if let Some(guard) = profiler_guard {
        if let Some(profile_path) = settings.profile_output {
            ensure_parent(&profile_path)?;
            write_profile(guard, &profile_path);
            println!("CPU profile written to {}", profile_path.display());
        }
    }

    Ok(())
}

pub fn run_visualize(config_path: Option<PathBuf>) -> Result<()> {
    let settings = crate::config::load_settings::<VisualizeSettings>("visualize", config_path)?;
    let profiler_guard = init_telemetry();
    info!(?settings.pipeline, "pipeline configuration");

    let service = VisualizationService::new(settings.pipeline.clone());
    train(&service, &settings.corpus, &settings.load)?;
    let response = service
        .cluster_visualization()
        .context("failed to compute cluster visualization")?;
    for cluster in &response.clusters {
        info!(
            cluster = cluster.cluster_id,
            size = cluster.size,
            "cluster summary"
        );
    }

    let body = if settings.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .context("failed to serialize visualization")?;
    write_text_file(&settings.output, &body)?;
    println!(
        "Visualization of {} points in {} clusters written to {}",
        response.len(),
        response.clusters.len(),
        settings.output.display()
    );

    if let Some(guard) = profiler_guard {
        if let Some(profile_path) = settings.profile_output {
            ensure_parent(&profile_path)?;
            write_profile(guard, &profile_path);
            println!("CPU profile written to {}", profile_path.display());
        }
    }

    Ok(())
}

fn train(
    service: &VisualizationService,
    corpus: &Path,
    options: &LoadOptions,
) -> Result<Arc<TrainedPipeline>> {
    let loader = || -> Result<Vec<Record>, PipelineError> { Ok(load_corpus(corpus, options)?) };
    service
        .initialize(loader, None)
        .with_context(|| format!("failed to train on corpus at {}", corpus.display()))
}

fn render_report(pipeline: &TrainedPipeline) -> String {
    let history = pipeline.history();
    let encoded = pipeline.encoded();
    let mut lines = vec![
        format!("records = {}", pipeline.records().len()),
        format!("vocabulary_size = {}", encoded.vocabulary().len()),
        format!("max_token_id = {}", encoded.normalized().max_id()),
        format!("epochs = {}", history.len()),
    ];
    if let Some(loss) = history.final_loss() {
        lines.push(format!("final_loss = {loss:.6}"));
    }
    if let Some(loss) = history.best_loss() {
        lines.push(format!("best_loss = {loss:.6}"));
    }
    match history.final_validation_loss() {
        Some(loss) => lines.push(format!("final_validation_loss = {loss:.6}")),
        None => lines.push("final_validation_loss = n/a".to_string()),
    }
    lines.join("\n")
}

fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    let mut body = contents.to_string();
    if !body.ends_with('\n') {
        body.push('\n');
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use convmap::PipelineConfig;
    use tempfile::tempdir;

    #[test]
    fn write_text_file_creates_parents_and_trailing_newline() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested/report.txt");
        write_text_file(&path, "loss = 1").expect("written");
        assert_eq!(fs::read_to_string(&path).unwrap(), "loss = 1\n");
    }

    #[test]
    fn report_lists_training_summary() {
        let dir = tempdir().expect("temp dir");
        let corpus = dir.path().join("corpus.jsonl");
        let lines: Vec<String> = (0..10)
            .map(|i| format!(r#"{{"id": {i}, "text": "order {i} refund delayed package"}}"#))
            .collect();
        fs::write(&corpus, lines.join("\n")).unwrap();

        let service = VisualizationService::new(PipelineConfig {
            sequence_length: 6,
            embedding_dim: 4,
            epochs: 2,
            ..PipelineConfig::default()
        });
        let pipeline = train(&service, &corpus, &LoadOptions::default()).expect("trained");
        let report = render_report(&pipeline);
        assert!(report.contains("records = 10"));
        assert!(report.contains("epochs = 2"));
        assert!(report.contains("final_validation_loss = "));
    }

    #[test]
    fn missing_corpus_reports_path() {
        let service = VisualizationService::new(PipelineConfig::default());
        let error = train(&service, Path::new("missing/corpus.jsonl"), &LoadOptions::default())
            .unwrap_err();
        assert!(format!("{error:#}").contains("missing/corpus.jsonl"));
    }
}
