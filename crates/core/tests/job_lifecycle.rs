//! Job lifecycle integration tests.
//!
//! These tests drive tasks through the gateway and runner:
//! queued -> processing -> completed | error

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use transcoder_core::{
    converter::{ConverterConfig, ConverterError, FfmpegInvoker, ToolInvoker},
    pipeline::{plan, OutputLayout, StepKind},
    task::{Task, TaskError, TaskId, TaskRegistry, TaskStatus},
    testing::{MockInvoker, StaticToolProbe},
    JobRunner, SubmissionError, SubmissionGateway, Upload,
};

/// Test helper wiring a gateway to a runner with a controllable invoker.
struct TestHarness {
    registry: Arc<TaskRegistry>,
    probe: Arc<StaticToolProbe>,
    gateway: SubmissionGateway,
    layout: OutputLayout,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new(invoker: Arc<dyn ToolInvoker>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let layout = OutputLayout::new(temp_dir.path().join("output"));
        let registry = Arc::new(TaskRegistry::new());
        let probe = Arc::new(StaticToolProbe::available());
        let runner = Arc::new(JobRunner::new(
            Arc::clone(&registry),
            invoker,
            layout.clone(),
        ));
        let gateway = SubmissionGateway::new(
            runner,
            probe.clone(),
            temp_dir.path().join("uploads"),
        );

        Self {
            registry,
            probe,
            gateway,
            layout,
            temp_dir,
        }
    }

    fn with_mock(invoker: &MockInvoker) -> Self {
        Self::new(Arc::new(invoker.clone()))
    }

    async fn submit(&self, filename: &str, operation: &str) -> TaskId {
        self.gateway
            .submit(Upload {
                filename: filename.to_string(),
                data: b"media bytes".to_vec(),
                operation: Some(operation.to_string()),
            })
            .await
            .expect("submission should be accepted")
    }

    /// Poll until the task reaches a terminal state.
    async fn wait_for_terminal(&self, id: &TaskId) -> Task {
        for _ in 0..500 {
            let task = self.registry.get(id).await.expect("task should exist");
            if task.status.is_terminal() {
                return task;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {id} did not finish in time");
    }
}

#[tokio::test]
async fn test_mkv_compress_converts_then_compresses() {
    let invoker = MockInvoker::new();
    invoker.set_materialize_outputs(true).await;
    let harness = TestHarness::with_mock(&invoker);

    let id = harness.submit("movie.mkv", "compress").await;
    let task = harness.wait_for_terminal(&id).await;

    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.message, "Compression complete.");
    let output = task.output_path.expect("completed task has an output");
    assert_eq!(
        output,
        harness.layout.compressed_dir().join("movie_compressed.mp4")
    );
    assert!(output.is_file());

    let steps = invoker.recorded_steps().await;
    let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StepKind::ConvertContainer, StepKind::Compress]);
    assert_eq!(steps[0].input, harness.temp_dir.path().join("uploads/movie.mkv"));
    assert_eq!(steps[0].output, harness.layout.video_dir().join("movie.mp4"));
    assert_eq!(steps[1].input, steps[0].output);
}

#[tokio::test]
async fn test_mp4_extract_audio_single_step() {
    let invoker = MockInvoker::new();
    let harness = TestHarness::with_mock(&invoker);

    let id = harness.submit("clip.mp4", "extract-audio").await;
    let task = harness.wait_for_terminal(&id).await;

    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.output_path, Some(harness.layout.audio_dir().join("clip.mp3")));
    assert_eq!(invoker.step_count().await, 1);
}

#[tokio::test]
async fn test_tool_failure_ends_in_error() {
    let invoker = MockInvoker::new();
    invoker
        .fail_on(
            StepKind::Compress,
            ConverterError::execution_failed(Some(1), "Error while opening encoder"),
        )
        .await;
    let harness = TestHarness::with_mock(&invoker);

    let id = harness.submit("clip.mp4", "compress").await;
    let task = harness.wait_for_terminal(&id).await;

    assert_eq!(task.status, TaskStatus::Error);
    assert!(task.message.starts_with("Error during compression"));
    assert!(task.message.contains("Error while opening encoder"));
    assert_eq!(task.output_path, None);
}

#[tokio::test]
async fn test_status_visible_immediately_after_submit() {
    let invoker = MockInvoker::new();
    invoker.set_delay(Duration::from_millis(200)).await;
    let harness = TestHarness::with_mock(&invoker);

    let id = harness.submit("clip.mp4", "compress").await;
    let task = harness.registry.get(&id).await.unwrap();
    assert!(matches!(
        task.status,
        TaskStatus::Queued | TaskStatus::Processing
    ));

    harness.wait_for_terminal(&id).await;
}

#[tokio::test]
async fn test_progress_messages_published() {
    let invoker = MockInvoker::new();
    invoker.set_delay(Duration::from_millis(150)).await;
    let harness = TestHarness::with_mock(&invoker);

    let id = harness.submit("movie.avi", "compress").await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let task = harness.registry.get(&id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Processing);
    assert_eq!(task.message, "Converting movie.avi to MP4 (step 1/2)...");

    harness.wait_for_terminal(&id).await;
}

#[tokio::test]
async fn test_terminal_state_is_stable() {
    let invoker = MockInvoker::new();
    let harness = TestHarness::with_mock(&invoker);

    let id = harness.submit("clip.mp4", "compress").await;
    let first = harness.wait_for_terminal(&id).await;

    let err = harness
        .registry
        .update(&id, TaskStatus::Processing, "late write", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::TerminalState { .. }));

    for _ in 0..3 {
        let again = harness.registry.get(&id).await.unwrap();
        assert_eq!(again.status, first.status);
        assert_eq!(again.message, first.message);
    }
}

#[tokio::test]
async fn test_unknown_task_not_found() {
    let harness = TestHarness::with_mock(&MockInvoker::new());
    let err = harness
        .registry
        .get(&TaskId::new("does-not-exist"))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::TaskNotFound(_)));
}

#[tokio::test]
async fn test_unavailable_tool_rejects_without_task() {
    let invoker = MockInvoker::new();
    let harness = TestHarness::with_mock(&invoker);
    harness.probe.set_available(false);

    let err = harness
        .gateway
        .submit(Upload {
            filename: "clip.mp4".to_string(),
            data: vec![0; 16],
            operation: Some("compress".to_string()),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::ToolUnavailable));
    assert!(harness.registry.is_empty().await);
    assert_eq!(invoker.step_count().await, 0);
}

#[tokio::test]
async fn test_concurrent_submissions_are_independent() {
    let invoker = MockInvoker::new();
    invoker.set_delay(Duration::from_millis(20)).await;
    invoker
        .fail_on(
            StepKind::ExtractAudio,
            ConverterError::execution_failed(Some(1), "Output file #0 does not contain any stream"),
        )
        .await;
    let harness = Arc::new(TestHarness::with_mock(&invoker));

    let mut handles = Vec::new();
    for i in 0..10usize {
        let harness = Arc::clone(&harness);
        handles.push(tokio::spawn(async move {
            let operation = if i % 2 == 0 { "compress" } else { "extract_mp3" };
            let filename = format!("video_{i}.mkv");
            let id = harness.submit(&filename, operation).await;
            (i, id)
        }));
    }

    let ids: Vec<(usize, TaskId)> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let unique: std::collections::HashSet<&TaskId> = ids.iter().map(|(_, id)| id).collect();
    assert_eq!(unique.len(), 10);

    for (i, id) in &ids {
        let task = harness.wait_for_terminal(id).await;
        if i % 2 == 0 {
            assert_eq!(task.status, TaskStatus::Completed);
            assert_eq!(
                task.output_path,
                Some(
                    harness
                        .layout
                        .compressed_dir()
                        .join(format!("video_{i}_compressed.mp4"))
                )
            );
        } else {
            assert_eq!(task.status, TaskStatus::Error);
            assert!(task.message.starts_with("Error during MP3 extraction"));
            assert_eq!(task.output_path, None);
        }
    }

    assert_eq!(harness.registry.len().await, 10);
}

#[test]
fn test_plan_orders_conversion_first() {
    let layout = OutputLayout::new("output");
    for input in ["a.mkv", "a.avi", "a.mov", "a.webm", "a.flv", "a.wmv"] {
        for operation in ["compress", "extract_mp3"] {
            let plan = plan(&layout, Path::new(input), operation).unwrap();
            assert_eq!(plan.len(), 2, "{input} {operation}");
            assert_eq!(plan.steps()[0].kind, StepKind::ConvertContainer);
            assert_eq!(plan.steps()[1].input, plan.steps()[0].output);
        }
    }

    for operation in ["compress", "extract_mp3"] {
        let plan = plan(&layout, Path::new("a.mp4"), operation).unwrap();
        assert_eq!(plan.len(), 1);
        assert_ne!(plan.steps()[0].kind, StepKind::ConvertContainer);
    }
}

#[cfg(unix)]
mod real_process {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable shell script that stands in for ffmpeg.
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fake_ffmpeg_success_and_failure() {
        let bin_dir = TempDir::new().unwrap();
        // Writes the last argument (the output path) and exits 0.
        let ok = write_script(
            bin_dir.path(),
            "ffmpeg-ok",
            r#"for last; do :; done
printf 'fake media' > "$last""#,
        );
        let failing = write_script(
            bin_dir.path(),
            "ffmpeg-fail",
            r#"echo "frame=    0 fps=0.0" >&2
echo "moov atom not found" >&2
exit 1"#,
        );

        let harness = TestHarness::new(Arc::new(FfmpegInvoker::new(
            ConverterConfig::with_ffmpeg_path(&ok),
        )));
        let id = harness.submit("movie.mkv", "compress").await;
        let task = harness.wait_for_terminal(&id).await;
        assert_eq!(task.status, TaskStatus::Completed, "{}", task.message);
        let output = task.output_path.unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "fake media");
        assert!(harness.layout.video_dir().join("movie.mp4").is_file());

        let harness = TestHarness::new(Arc::new(FfmpegInvoker::new(
            ConverterConfig::with_ffmpeg_path(&failing),
        )));
        let id = harness.submit("clip.mp4", "compress").await;
        let task = harness.wait_for_terminal(&id).await;
        assert_eq!(task.status, TaskStatus::Error);
        assert!(task.message.contains("exited with code 1"));
        assert!(task.message.contains("moov atom not found"));
    }
}
