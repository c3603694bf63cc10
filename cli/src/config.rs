use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use convmap::PipelineConfig;
use datasets::LoadOptions;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Settings driving the `train` command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrainSettings {
    /// Conversation corpus, JSON lines or CSV.
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
    /// Column names and format override for the corpus.
    #[serde(default)]
    pub load: LoadOptions,
    /// Location where the training summary is written.
    #[serde(default = "TrainSettings::default_report")]
    pub report: PathBuf,
    /// Optional flamegraph destination collected while training.
    #[serde(default = "TrainSettings::default_profile_output")]
    pub profile_output: Option<PathBuf>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl TrainSettings {
    fn default_report() -> PathBuf {
        PathBuf::from("reports/train_summary.txt")
    }

    fn default_profile_output() -> Option<PathBuf> {
        Some(PathBuf::from("profiles/train.flamegraph.svg"))
    }
}

impl Default for TrainSettings {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            load: LoadOptions::default(),
            report: Self::default_report(),
            profile_output: Self::default_profile_output(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Settings powering the `visualize` command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VisualizeSettings {
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
    #[serde(default)]
    pub load: LoadOptions,
    /// Path where the visualization JSON is written.
    #[serde(default = "VisualizeSettings::default_output")]
    pub output: PathBuf,
    /// Pretty-print the JSON payload.
    #[serde(default)]
    pub pretty: bool,
    #[serde(default = "VisualizeSettings::default_profile_output")]
    pub profile_output: Option<PathBuf>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl VisualizeSettings {
    fn default_output() -> PathBuf {
        PathBuf::from("reports/clusters.json")
    }

    fn default_profile_output() -> Option<PathBuf> {
        Some(PathBuf::from("profiles/visualize.flamegraph.svg"))
    }
}

impl Default for VisualizeSettings {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            load: LoadOptions::default(),
            output: Self::default_output(),
            pretty: false,
            profile_output: Self::default_profile_output(),
            pipeline: PipelineConfig::default(),
        }
    }
}

fn default_corpus() -> PathBuf {
    PathBuf::from("data/conversations.jsonl")
}

/// Loads TOML settings for the requested command, falling back to defaults when missing.
pub fn load_settings<T>(command: &str, explicit: Option<PathBuf>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let (candidate, explicit_provided) = match explicit {
        Some(path) => (path, true),
        None => (PathBuf::from(format!("{command}.toml")), false),
    };

    if candidate.exists() {
        let raw = std::fs::read_to_string(&candidate).with_context(|| {
            format!(
                "failed to read configuration for `{command}` from {}",
                candidate.display()
            )
        })?;
        let parsed = toml::from_str(&raw).with_context(|| {
            format!(
                "failed to parse TOML configuration for `{command}` at {}",
                candidate.display()
            )
        })?;
        Ok(parsed)
    } else if explicit_provided {
        bail!(
            "configuration file for `{command}` not found at {}",
            candidate.display()
        );
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn load_settings_returns_default_when_missing() {
        let settings: TrainSettings = load_settings("train", None).expect("default settings");
        assert_eq!(settings, TrainSettings::default());
    }

    #[test]
    fn load_settings_errors_for_missing_explicit_path() {
        let result: Result<VisualizeSettings> =
            load_settings("visualize", Some(PathBuf::from("definitely_missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_settings_parses_toml_payload() {
        let file = NamedTempFile::new().expect("temp file");
        let path = file.into_temp_path();
        std::fs::write(
            &path,
            r#"corpus = "data/support.csv"
output = "out/view.json"
profile_output = "profiles/demo.svg"

[load]
text_field = "conversacion"

[pipeline]
cluster_count = 4
epochs = 50
stopwords = "spanish"
"#,
        )
        .expect("write config");

        let settings: VisualizeSettings =
            load_settings("visualize", Some(path.to_path_buf())).expect("parsed settings");
        assert_eq!(settings.corpus, PathBuf::from("data/support.csv"));
        assert_eq!(settings.output, PathBuf::from("out/view.json"));
        assert_eq!(settings.load.text_field, "conversacion");
        assert_eq!(settings.load.id_field, "id");
        assert_eq!(settings.pipeline.cluster_count, 4);
        assert_eq!(settings.pipeline.epochs, 50);
        assert_eq!(
            settings.pipeline.sequence_length,
            PipelineConfig::default().sequence_length
        );
        assert_eq!(
            settings.profile_output,
            Some(PathBuf::from("profiles/demo.svg"))
        );
    }
}
