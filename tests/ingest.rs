// file: tests/ingest.rs
// description: end-to-end ingestion of csv uploads through the public api

use inbox_triage::{
    CancellationToken, ClassificationSource, IngestConfig, IngestionPipeline, TriageCategory,
    TriageError, TriageLevel, TriageSession, TriageSummary,
};
use pretty_assertions::assert_eq;

fn pipeline() -> IngestionPipeline {
    IngestionPipeline::rule_only(IngestConfig {
        show_progress: false,
        ..IngestConfig::default()
    })
}

async fn ingest(text: &str) -> inbox_triage::Result<inbox_triage::IngestReport> {
    pipeline().run(text, &CancellationToken::new()).await
}

#[tokio::test]
async fn missing_datetime_column_is_named() {
    let err = ingest("message_id,subject,message\n1,a,b\n").await.unwrap_err();

    match err {
        TriageError::Schema { missing } => assert_eq!(missing, vec!["datetime".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn header_only_file_is_empty_input() {
    let err = ingest("message_id,subject,message,datetime\n\n").await.unwrap_err();
    assert!(matches!(err, TriageError::EmptyInput));
}

#[tokio::test]
async fn all_rows_malformed_reports_no_valid_messages() {
    let text = "message_id,subject,message,datetime\n1,,,2023-01-01\n2,  ,  ,\n";
    let err = ingest(text).await.unwrap_err();

    assert!(matches!(err, TriageError::NoValidMessages { skipped: 2 }));
}

#[tokio::test]
async fn malformed_row_is_skipped_and_order_kept() {
    let text = "\
message_id,subject,message,datetime
a,Refill,Please refill my lisinopril,2023-05-15T08:00:00
b,,,2023-05-15T09:00:00
c,Bill,Question about my insurance claim,2023-05-15T10:00:00
";
    let report = ingest(text).await.unwrap();

    let ids: Vec<&str> = report.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.stats.rows_total, 3);
    assert_eq!(report.messages[0].triage_category, TriageCategory::Medication);
    assert_eq!(report.messages[1].triage_category, TriageCategory::Insurance);
}

#[tokio::test]
async fn quoted_fields_keep_embedded_delimiters() {
    let text = "\
\u{feff}message_id,subject,message,datetime\r
7,\"Pain, severe\",\"Chest pain since morning, please call\",2023-05-15 08:23:45\r
";
    let report = ingest(text).await.unwrap();
    let message = &report.messages[0];

    assert_eq!(message.id, "7");
    assert_eq!(message.subject, "Pain, severe");
    assert_eq!(message.content, "Chest pain since morning, please call");
    assert_eq!(message.triage_level, TriageLevel::Urgent);
    assert_eq!(message.triage_category, TriageCategory::Clinical);
    assert_eq!(message.datetime.to_rfc3339(), "2023-05-15T08:23:45+00:00");
}

#[tokio::test]
async fn semicolon_tab_and_pipe_files_are_detected() {
    let files = [
        "datetime;message;subject;message_id\n2023-05-15;My lab results are in;Labs;x1\n",
        "message_id\tsubject\tmessage\tdatetime\nx1\tLabs\tMy lab results are in\t2023-05-15\n",
        "Message_ID | Subject | Message | DateTime\nx1|Labs|My lab results are in|2023-05-15\n",
    ];

    for text in files {
        let report = ingest(text).await.unwrap();
        let message = &report.messages[0];

        assert_eq!(message.id, "x1");
        assert_eq!(message.subject, "Labs");
        assert_eq!(message.content, "My lab results are in");
        assert_eq!(message.triage_category, TriageCategory::LabResult);
    }
}

#[tokio::test]
async fn level_counts_sum_to_total() {
    let text = "\
message_id,subject,message,datetime
1,Emergency,I can't breathe,2023-05-15
2,Fever,Running a high fever since yesterday,2023-05-15
3,Question,When should I book my next appointment,2023-05-15
4,Thanks,Thank you for the great visit,2023-05-15
5,Hello,Just saying hi,2023-05-15
";
    let report = ingest(text).await.unwrap();
    let summary = TriageSummary::from_messages(&report.messages);

    assert_eq!(summary.total, 5);
    assert_eq!(summary.by_level.values().sum::<usize>(), summary.total);
    assert_eq!(summary.by_category.values().sum::<usize>(), summary.total);
    assert_eq!(summary.count_for_level(TriageLevel::Urgent), 1);
    assert!(
        report
            .messages
            .iter()
            .all(|m| m.classified_by == ClassificationSource::Rules)
    );
}

#[tokio::test]
async fn session_replaces_batch_after_upload() {
    let mut session = TriageSession::with_mock_data();
    let token = session.begin_upload();

    let report = pipeline()
        .run(
            "message_id,subject,message,datetime\n1,Refill,need a refill,\n",
            &token,
        )
        .await
        .unwrap();

    assert!(session.complete_upload(&token, report));
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.summary().total, 1);
}

#[tokio::test]
async fn superseded_upload_is_cancelled() {
    let mut session = TriageSession::new();
    let stale = session.begin_upload();
    let _current = session.begin_upload();

    let err = pipeline()
        .run("message_id,subject,message,datetime\n1,a,b,\n", &stale)
        .await
        .unwrap_err();

    assert!(matches!(err, TriageError::Cancelled));
    assert!(session.messages().is_empty());
}
