//! End-to-end driver scenarios against a scripted provider.

use crate::integration::test_utils::{chunk_json, day_json, ScriptedProvider};
use chrono::NaiveDate;
use journeygen::config::{HorizonConfig, PipelineConfig};
use journeygen::error::{ApiError, ParseError, ProviderError};
use journeygen::generation::GenerationClient;
use journeygen::journey::load_artifact;
use journeygen::pipeline::{JourneyPipeline, PipelineState};
use journeygen::prompt::PromptTemplate;
use journeygen::summarizer::FALLBACK_DIGEST;
use tempfile::TempDir;

fn pipeline_config(temp: &TempDir) -> PipelineConfig {
    PipelineConfig {
        output_path: temp.path().join("data").join("journeyData.json"),
        cooldown_secs: 0,
        preview_chars: 20,
        enforce_window_dates: true,
    }
}

fn horizon(months: u32) -> HorizonConfig {
    HorizonConfig {
        start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        months,
    }
}

fn client(provider: &ScriptedProvider) -> GenerationClient<ScriptedProvider> {
    GenerationClient::new(provider.clone(), "You are a JSON data generation expert.", 0.6)
}

#[tokio::test]
async fn full_horizon_is_stitched_in_window_order() {
    let temp = TempDir::new().unwrap();
    let config = pipeline_config(&temp);
    let template = PromptTemplate::default();
    let provider = ScriptedProvider::new(vec![
        Ok(chunk_json(&[day_json("2025-08-01", Some("Baseline panel"), "Booked the lab")])),
        Ok(format!(
            "```json\n{}\n```",
            chunk_json(&[day_json("2025-08-20", Some("ApoB result"), "ApoB levels came back elevated")])
        )),
        Ok(chunk_json(&[day_json("2025-09-03", None, "Started zone 2 training")])),
        Ok(chunk_json(&[day_json("2025-09-30", None, "Month wrap-up")])),
    ]);

    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    let summary = pipeline.run(&horizon(2)).await.unwrap();

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(summary.chunks.len(), 4);
    assert_eq!(summary.total_days, 4);
    assert!(summary.audit.is_clean());

    let artifact = load_artifact(&config.output_path).unwrap();
    let dates: Vec<String> = artifact.journey.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(
        dates,
        vec!["2025-08-01", "2025-08-20", "2025-09-03", "2025-09-30"]
    );

    let prompts = provider.prompts();
    assert!(prompts[0].contains(template.opening_context.as_str()));
    assert!(prompts[0].contains("**August 1 to 15, 2025**"));
    assert!(prompts[2].contains("Summary of events up to August 20, 2025:"));
    assert!(prompts[2].contains("- Key Events: ApoB result"));
    // preview is truncated to 20 characters
    assert!(prompts[2].contains("'ApoB levels came bac...'"));
    assert!(!prompts[2].contains("came back elevated"));
    assert!(prompts[3].contains("- No major events occurred."));
}

#[tokio::test]
async fn rate_limit_mid_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = pipeline_config(&temp);
    let template = PromptTemplate::default();
    let provider = ScriptedProvider::new(vec![
        Ok(chunk_json(&[day_json("2025-08-01", None, "Hello")])),
        Ok(chunk_json(&[day_json("2025-08-16", None, "Hello again")])),
        Err(ProviderError::RateLimit("429 Too Many Requests".to_string())),
    ]);

    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    let err = pipeline.run(&horizon(2)).await.unwrap_err();

    match err {
        ApiError::GenerationFailed { window, source } => {
            assert_eq!(window.start, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
            assert!(matches!(source, ProviderError::RateLimit(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert_eq!(provider.calls(), 3);
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn prose_response_aborts_with_raw_output() {
    let temp = TempDir::new().unwrap();
    let config = pipeline_config(&temp);
    let template = PromptTemplate::default();
    let provider = ScriptedProvider::new(vec![Ok(
        "Sure! Here is the journey you asked for.".to_string()
    )]);

    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    let err = pipeline.run(&horizon(1)).await.unwrap_err();

    match err {
        ApiError::ParseFailed { raw, source, .. } => {
            assert_eq!(raw, "Sure! Here is the journey you asked for.");
            assert!(matches!(source, ParseError::Malformed(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(provider.calls(), 1);
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn empty_chunk_feeds_fallback_digest_forward() {
    let temp = TempDir::new().unwrap();
    let config = pipeline_config(&temp);
    let template = PromptTemplate::default();
    let provider = ScriptedProvider::new(vec![
        Ok(r#"{"notes":"nothing happened"}"#.to_string()),
        Ok(chunk_json(&[day_json("2025-08-16", None, "Back on track")])),
    ]);

    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    let summary = pipeline.run(&horizon(1)).await.unwrap();

    assert_eq!(summary.weak_windows().count(), 1);
    assert_eq!(summary.total_days, 1);
    assert!(provider.prompts()[1].contains(FALLBACK_DIGEST));
}

#[tokio::test]
async fn day_outside_window_is_rejected_by_default() {
    let temp = TempDir::new().unwrap();
    let config = pipeline_config(&temp);
    let template = PromptTemplate::default();
    let provider = ScriptedProvider::new(vec![Ok(chunk_json(&[day_json(
        "2025-08-16",
        None,
        "Too early",
    )]))]);

    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    let err = pipeline.run(&horizon(1)).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::ParseFailed {
            source: ParseError::DateOutsideWindow { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn cross_chunk_reference_issues_are_reported_not_rewritten() {
    let temp = TempDir::new().unwrap();
    let config = pipeline_config(&temp);
    let template = PromptTemplate::default();
    // the second chunk reuses the first chunk's message id
    let reused = day_json("2025-08-16", None, "Second")
        .replace("\"id\":\"msg_2025-08-16\"", "\"id\":\"msg_2025-08-01\"");
    let provider = ScriptedProvider::new(vec![
        Ok(chunk_json(&[day_json("2025-08-01", None, "First")])),
        Ok(chunk_json(&[reused])),
    ]);

    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    let summary = pipeline.run(&horizon(1)).await.unwrap();

    assert_eq!(
        summary.audit.duplicate_message_ids,
        vec!["msg_2025-08-01".to_string()]
    );
    let artifact = load_artifact(&config.output_path).unwrap();
    assert_eq!(artifact.journey[1].messages[0].id, "msg_2025-08-01");
}

#[tokio::test(start_paused = true)]
async fn cooldown_runs_after_every_chunk() {
    let temp = TempDir::new().unwrap();
    let config = PipelineConfig {
        cooldown_secs: 5,
        ..pipeline_config(&temp)
    };
    let template = PromptTemplate::default();
    let provider = ScriptedProvider::new(vec![
        Ok(chunk_json(&[day_json("2025-08-01", None, "One")])),
        Ok(chunk_json(&[day_json("2025-08-16", None, "Two")])),
    ]);

    let started = tokio::time::Instant::now();
    let mut pipeline = JourneyPipeline::new(client(&provider), &template, &config, 8000);
    pipeline.run(&horizon(1)).await.unwrap();
    assert_eq!(started.elapsed().as_secs(), 10);
}
