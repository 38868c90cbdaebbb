//! Pipeline behavior against a scripted in-memory transport: chunk
//! carry-forward, budget enforcement, aggregation batching, binary
//! handling, and usage accounting.

mod common;

use std::sync::Arc;

use common::{user_content, system_contents, FailingTransport, ScriptedTransport};
use epitome::config::CompletionConfig;
use epitome::error::CompletionError;
use epitome::git::FileOperation;
use epitome::llm::TokenBudgeter;
use epitome::summarize::{FileChange, Summarizer};

fn config_with_chunk_size(max_chunk_size: usize) -> CompletionConfig {
    CompletionConfig {
        max_chunk_size,
        ..Default::default()
    }
}

fn summarizer(transport: Arc<ScriptedTransport>, config: CompletionConfig) -> Summarizer {
    Summarizer::new(transport, TokenBudgeter::new(), config).expect("valid test config")
}

#[tokio::test]
async fn single_chunk_file_issues_one_call_with_prefixed_summary() {
    let transport = Arc::new(ScriptedTransport::new(["  Adds a greeting script.  "]));
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(100));

    let summary = pipeline
        .summarize_file(FileOperation::Added, "hello.py", "hello world")
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(summary, "Added file `hello.py`: Adds a greeting script.");

    let call = &transport.calls()[0];
    assert_eq!(user_content(call), "hello world");
    let system = system_contents(call);
    assert_eq!(system.len(), 1, "no continuation context on the first chunk");
    assert!(system[0].contains("expert Python developer"));
    assert!(system[0].contains("`hello.py`"));
    assert!(system[0].contains("added"));
}

#[tokio::test]
async fn removed_and_modified_files_get_their_own_verbs() {
    let transport = Arc::new(ScriptedTransport::new(["was a helper", "tweaks the parser"]));
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(100));

    let removed = pipeline
        .summarize_file(FileOperation::Removed, "old/helper.rb", "def helper; end")
        .await
        .unwrap();
    assert!(removed.starts_with("Removed file `old/helper.rb`:"));

    let modified = pipeline
        .summarize_diff("src/parse.rs", "@@ -1 +1 @@\n-a\n+b")
        .await
        .unwrap();
    assert!(modified.starts_with("Modified file `src/parse.rs`:"));

    // The diff prompt names the file but no operation.
    let system = system_contents(&transport.calls()[1]);
    assert!(system[0].contains("unified diff"));
    assert!(system[0].contains("`parse.rs`"));
}

#[tokio::test]
async fn multi_chunk_summaries_carry_forward_previous_chunk() {
    let transport = Arc::new(ScriptedTransport::new([
        "first chunk summary",
        "second chunk summary",
        "third chunk summary",
    ]));
    // Every word costs 6 units, so a 12-unit budget holds exactly two words.
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(12));

    let summary = pipeline
        .summarize_file(
            FileOperation::Added,
            "notes.txt",
            "alpha bravo cedar delta eagle fable",
        )
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);

    assert_eq!(system_contents(&calls[0]).len(), 1);

    let second_system = system_contents(&calls[1]);
    assert_eq!(second_system.len(), 2);
    assert!(second_system[1].contains("first chunk summary"));

    let third_system = system_contents(&calls[2]);
    assert!(third_system[1].contains("second chunk summary"));
    assert!(!third_system[1].contains("first chunk summary"));

    assert_eq!(
        summary,
        "Added file `notes.txt`: first chunk summary second chunk summary third chunk summary"
    );
    assert_eq!(pipeline.stats().files_processed, 1);
    assert_eq!(pipeline.stats().requests, 3);
}

#[tokio::test]
async fn over_budget_request_never_reaches_the_transport() {
    let transport = Arc::new(FailingTransport::new());
    // Reserving the whole 4096-token window leaves no prompt headroom.
    let config = CompletionConfig {
        max_tokens: 4096,
        ..Default::default()
    };
    let mut pipeline =
        Summarizer::new(transport.clone(), TokenBudgeter::new(), config).unwrap();

    let result = pipeline
        .summarize_file(FileOperation::Added, "big.rs", "fn main() {}")
        .await;

    assert!(matches!(
        result,
        Err(CompletionError::TooManyTokens { .. })
    ));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn transport_failure_aborts_the_file_and_propagates() {
    let transport = Arc::new(FailingTransport::new());
    let mut pipeline = Summarizer::new(
        transport.clone(),
        TokenBudgeter::new(),
        CompletionConfig::default(),
    )
    .unwrap();

    let result = pipeline
        .summarize_file(FileOperation::Added, "hello.py", "hello world")
        .await;

    assert!(matches!(result, Err(CompletionError::Api { status: 500, .. })));
    assert_eq!(transport.call_count(), 1);
    // The failed file is not counted and no usage was recorded.
    assert_eq!(pipeline.stats().files_processed, 0);
    assert_eq!(pipeline.stats().requests, 0);
}

#[tokio::test]
async fn binary_files_never_invoke_the_transport() {
    let transport = Arc::new(ScriptedTransport::unscripted());
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(100));

    for (operation, expected) in [
        (FileOperation::Added, "Added binary file `logo.png`"),
        (FileOperation::Removed, "Removed binary file `logo.png`"),
        (FileOperation::Modified, "Replaced binary file `logo.png`"),
    ] {
        let summary = pipeline
            .summarize_change(&FileChange::binary("logo.png", operation))
            .await
            .unwrap();
        assert_eq!(summary, expected);
    }

    assert_eq!(transport.call_count(), 0);
    assert_eq!(pipeline.stats().files_processed, 3);
}

#[tokio::test]
async fn aggregation_flushes_before_overflowing_a_batch() {
    let transport = Arc::new(ScriptedTransport::new(["batch one", "batch two"]));
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(10));

    // 6 + 5 = 11 characters, one over the batch budget of 10.
    let summaries = vec!["aaaaaa".to_string(), "bbbbb".to_string()];
    let digest = pipeline.summarize_changes(&summaries).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2, "one over budget must split into two batches");
    assert_eq!(user_content(&calls[0]), "aaaaaa");
    assert_eq!(user_content(&calls[1]), "bbbbb");
    assert_eq!(digest, "batch one\nbatch two");
}

#[tokio::test]
async fn aggregation_keeps_fitting_summaries_in_one_batch() {
    let transport = Arc::new(ScriptedTransport::new(["single batch"]));
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(100));

    let summaries = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let digest = pipeline.summarize_changes(&summaries).await.unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(user_content(&transport.calls()[0]), "one\ntwo\nthree");
    assert_eq!(digest, "single batch");
}

#[tokio::test]
async fn end_to_end_mixed_text_and_binary_changes() {
    let transport = Arc::new(ScriptedTransport::new([
        "Adds a greeting script.",
        "Add hello script and logo",
        "Add hello script and project logo",
    ]));
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(100));

    let changes = vec![
        FileChange::content("hello.py", FileOperation::Added, "hello world"),
        FileChange::binary("logo.png", FileOperation::Added),
    ];

    let message = pipeline.commit_message(&changes).await.unwrap();
    assert_eq!(message, "Add hello script and project logo");

    // One summarization call, one aggregation batch, one finalize pass.
    let calls = transport.calls();
    assert_eq!(calls.len(), 3);

    let aggregate_input = user_content(&calls[1]);
    assert!(aggregate_input.contains("Added file `hello.py`: Adds a greeting script."));
    assert!(aggregate_input.contains("Added binary file `logo.png`"));

    let finalize_input = user_content(&calls[2]);
    assert_eq!(finalize_input, "Add hello script and logo");

    let stats = pipeline.stats();
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.prompt_tokens, 3 * common::PROMPT_TOKENS_PER_CALL);
    assert_eq!(stats.completion_tokens, 3 * common::COMPLETION_TOKENS_PER_CALL);
    assert_eq!(
        stats.total_tokens,
        stats.prompt_tokens + stats.completion_tokens
    );
}

#[tokio::test]
async fn empty_content_still_issues_one_call() {
    let transport = Arc::new(ScriptedTransport::new(["Empty file."]));
    let mut pipeline = summarizer(transport.clone(), config_with_chunk_size(100));

    let summary = pipeline
        .summarize_file(FileOperation::Added, ".gitkeep", "")
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(user_content(&transport.calls()[0]), "");
    assert_eq!(summary, "Added file `.gitkeep`: Empty file.");
}
