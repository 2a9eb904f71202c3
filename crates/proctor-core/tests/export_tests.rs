mod common;

use std::sync::Arc;

use common::{
    create_single_block_plan, create_test_supervisor, single_block_proposal, ts, FixedAdvisor,
    ScriptedGrader,
};
use proctor_core::{params::SubmitCheckIn, BlockStatus, ExportDocument, Verdict};

#[tokio::test]
async fn test_export_of_empty_store() {
    let (_temp_dir, supervisor) = create_test_supervisor(None, None).await;
    let now = ts("2026-03-02T08:00:00Z");

    let document = supervisor.export(now).await.unwrap();
    assert_eq!(document.exported_at, now);
    assert_eq!(document.schema_version, 1);
    assert!(document.plans.is_empty());
    assert!(document.blocks.is_empty());
    assert!(document.check_ins.is_empty());
}

#[tokio::test]
async fn test_export_lists_everything_flat() {
    let grader = Arc::new(ScriptedGrader::new(&[
        Verdict::ChallengedNeedsEvidence,
        Verdict::Accepted,
    ]));
    let advisor = Arc::new(FixedAdvisor(single_block_proposal()));
    let (temp_dir, supervisor) = create_test_supervisor(Some(advisor), Some(grader)).await;
    let first = create_single_block_plan(&supervisor).await;
    let second = create_single_block_plan(&supervisor).await;
    let block_id = first.blocks[0].id;

    supervisor.tick(ts("2026-03-02T21:00:00Z")).await.unwrap();
    for text in ["did it", "Pushed the exercise with a screenshot of the tests"] {
        supervisor
            .submit_check_in(
                &SubmitCheckIn {
                    block_id,
                    report: text.to_string(),
                    evidence: vec![],
                    self_score: None,
                },
                ts("2026-03-02T21:10:00Z"),
            )
            .await
            .unwrap();
    }

    let document = supervisor.export(ts("2026-03-03T00:00:00Z")).await.unwrap();
    assert_eq!(document.plans.len(), 2);
    assert_eq!(document.plans[0].id, first.id);
    assert!(document.plans.iter().all(|plan| plan.blocks.is_empty()));

    assert_eq!(document.blocks.len(), 2);
    assert_eq!(document.blocks[0].status, BlockStatus::CheckedIn);
    assert_eq!(document.blocks[0].reminder_count, 1);
    assert_eq!(document.blocks[1].plan_id, second.id);
    assert_eq!(document.blocks[1].status, BlockStatus::Reminded);

    assert_eq!(document.check_ins.len(), 2);
    assert_eq!(document.check_ins[0].verdict, Verdict::ChallengedNeedsEvidence);
    assert_eq!(document.check_ins[1].verdict, Verdict::Accepted);

    let path = temp_dir.path().join("export.json");
    document.write_to(&path).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"schema_version\": 1"));
    let parsed: ExportDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.check_ins.len(), 2);
    assert_eq!(parsed.blocks[0].id, block_id);
}
