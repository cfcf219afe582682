//! Continuation resolution, listing and merging.

mod common;

use acore::{ChangeRequestRef, Continuation, ErrorKind, MergeStrategy};
use amadeus_pipeline::ContinuationStore;
use common::{FakeModel, Script, pipeline, user};
use forge::ChangeRequest;

fn open(number: u64, head: &str) -> ChangeRequest {
    ChangeRequest {
        reference: ChangeRequestRef {
            number,
            url: format!("https://github.com/octo/svc/pull/{number}"),
            head_branch: head.into(),
            base_branch: "main".into(),
        },
        title: format!("#{number}"),
        updated_at: None,
    }
}

fn setup() -> (amadeus_pipeline::Pipeline<common::FakeBackend>, common::FakeForge) {
    let (pipeline, forge, _) = pipeline(FakeModel::new(Script::Hang));
    forge.with(|s| {
        s.open = vec![
            open(12, "feature/manual"),
            open(9, "amadeus/docs-0301-0a0a"),
            open(3, "amadeus/old-0101-ffff"),
        ];
    });
    (pipeline, forge)
}

#[tokio::test]
async fn latest_prefixed_request_is_continued() {
    let (pipeline, _) = setup();
    let user = user();
    let continuation = pipeline.start_continuation(&user, None).await.unwrap();
    assert_eq!(continuation, Continuation::new("amadeus/docs-0301-0a0a", 9));
    assert_eq!(pipeline.continuation(&user), Some(continuation));
}

#[tokio::test]
async fn explicit_number_is_fetched() {
    let (pipeline, forge) = setup();
    let user = user();
    let continuation = pipeline.start_continuation(&user, Some(12)).await.unwrap();
    assert_eq!(continuation.branch, "feature/manual");
    assert!(forge.called("get_change_request 12"));

    let err = pipeline.start_continuation(&user, Some(99)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(pipeline.continuation(&user), Some(continuation));
}

#[tokio::test]
async fn nothing_to_continue() {
    let (pipeline, forge, _) = pipeline(FakeModel::new(Script::Hang));
    forge.with(|s| s.open = vec![open(1, "someone/else")]);
    let err = pipeline.start_continuation(&user(), None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn stopping_clears_only_that_user() {
    let (pipeline, _) = setup();
    let alice = user();
    pipeline.start_continuation(&alice, None).await.unwrap();
    pipeline
        .store()
        .set("bob", Continuation::new("amadeus/x-0101-0001", 5));

    assert!(pipeline.stop_continuation(&alice).is_some());
    assert_eq!(pipeline.continuation(&alice), None);
    assert!(pipeline.store().get("bob").is_some());
}

#[tokio::test]
async fn merge_ends_matching_continuation() {
    let (pipeline, forge) = setup();
    let user = user();
    pipeline.start_continuation(&user, Some(9)).await.unwrap();

    let message = pipeline
        .merge(&user, 9, MergeStrategy::default())
        .await
        .unwrap();
    assert_eq!(message, "Pull Request successfully merged");
    assert!(forge.called("merge 9 squash"));
    assert_eq!(pipeline.continuation(&user), None);
}

#[tokio::test]
async fn unmergeable_is_distinct() {
    let (pipeline, forge) = setup();
    forge.with(|s| s.unmergeable = true);
    let err = pipeline
        .merge(&user(), 9, MergeStrategy::Rebase)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotMergeable);
}

#[tokio::test]
async fn change_requests_are_listed_in_host_order() {
    let (pipeline, _) = setup();
    let listed = pipeline.change_requests(&user()).await.unwrap();
    let numbers: Vec<u64> = listed.iter().map(|r| r.reference.number).collect();
    assert_eq!(numbers, [12, 9, 3]);
}
