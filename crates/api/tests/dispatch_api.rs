//! Integration tests for the dispatch pipeline: real sends, A/B sends, and
//! test sends, driven through the HTTP surface with a recording provider.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, post_json, ProviderCall, RecordingProvider};
use outflow_db::models::campaign::{CreateCampaign as CreateCampaignRow, UpdateCampaign};
use outflow_db::models::lead::CreateLead;
use outflow_db::models::lead_batch::CreateLeadBatch;
use outflow_db::models::workspace::CreateWorkspace;
use outflow_db::repositories::{
    CampaignRepo, LeadBatchRepo, LeadRepo, SentCampaignRepo, WorkspaceRepo,
};
use outflow_instantly::types::{DelayUnit, SendingAccount};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Two-step workspace playbook with delays high enough to dodge jitter, so
/// the provider steps come out with exactly these values.
fn playbook() -> serde_json::Value {
    json!({
        "guidelines": {
            "tone": "direct",
            "structure": "problem-solution",
            "numSteps": 2,
            "stepDelays": [1, 3]
        }
    })
}

fn passing_steps() -> serde_json::Value {
    json!([
        {
            "subject": "Quick question about Acme",
            "body": "I noticed your team is scaling outbound and wanted to share an idea worth two minutes of your time."
        },
        {
            "subject": "Following up on my note",
            "body": "Circling back in case this got buried; happy to send over the short version instead if easier."
        }
    ])
}

fn failing_steps() -> serde_json::Value {
    json!([
        {"subject": "Hi there", "body": "too short to pass"},
        {"subject": "Hi again", "body": "still too short"}
    ])
}

async fn seed_workspace(pool: &PgPool, api_key: Option<&str>) -> i64 {
    let workspace = WorkspaceRepo::create(
        pool,
        &CreateWorkspace {
            name: "Dispatch WS".to_string(),
            instantly_api_key: api_key.map(str::to_string),
            icp: None,
            proof_points_json: None,
        },
    )
    .await
    .expect("seed workspace");
    WorkspaceRepo::set_playbook(pool, workspace.id, &playbook())
        .await
        .expect("set playbook");
    workspace.id
}

async fn seed_batch(pool: &PgPool, workspace_id: i64) -> i64 {
    LeadBatchRepo::create(
        pool,
        workspace_id,
        &CreateLeadBatch {
            name: "June import".to_string(),
            source: Some("csv".to_string()),
        },
    )
    .await
    .expect("seed batch")
    .id
}

async fn seed_lead(pool: &PgPool, batch_id: i64, email: &str, steps: serde_json::Value) -> i64 {
    LeadRepo::create(
        pool,
        batch_id,
        &CreateLead {
            email: email.to_string(),
            first_name: Some("Pat".to_string()),
            last_name: Some("Jones".to_string()),
            company: Some("Acme".to_string()),
            job_title: None,
            industry: None,
            steps_json: Some(steps),
        },
    )
    .await
    .expect("seed lead")
    .id
}

/// Workspace with an API key, the playbook above, and a batch of three
/// leads that all pass the gate.
async fn seed_ready_workspace(pool: &PgPool) -> (i64, i64) {
    let ws = seed_workspace(pool, Some("key-123")).await;
    let batch = seed_batch(pool, ws).await;
    for email in ["a@acme.test", "b@acme.test", "c@acme.test"] {
        seed_lead(pool, batch, email, passing_steps()).await;
    }
    (ws, batch)
}

fn send_body(batch_id: i64) -> serde_json::Value {
    json!({ "batch_id": batch_id, "campaign_name": "Q3 outbound" })
}

fn dispatch_uri(workspace_id: i64) -> String {
    format!("/api/v1/workspaces/{workspace_id}/dispatch")
}

fn uploaded_emails(call: &ProviderCall) -> Vec<String> {
    match call {
        ProviderCall::BulkAddLeads { leads, .. } => {
            leads.iter().map(|l| l.email.clone()).collect()
        }
        other => panic!("expected BulkAddLeads, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: Input validation fails before any provider traffic
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_campaign_name_rejected(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({ "batch_id": batch, "campaign_name": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ab_test_without_both_subjects_rejected(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({
            "batch_id": batch,
            "campaign_name": "Q3 outbound",
            "ab_test": true,
            "subject_line_a": "Only one subject"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("subject_line_b"));
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn workspace_without_api_key_rejected(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let ws = seed_workspace(&pool, None).await;
    let batch = seed_batch(&pool, ws).await;
    seed_lead(&pool, batch, "a@acme.test", passing_steps()).await;

    let response = post_json(app, &dispatch_uri(ws), send_body(batch)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("API key"));
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_batch_rejected(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let ws = seed_workspace(&pool, Some("key-123")).await;
    let batch = seed_batch(&pool, ws).await;

    let response = post_json(app, &dispatch_uri(ws), send_body(batch)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn workspace_without_playbook_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let workspace = WorkspaceRepo::create(
        &pool,
        &CreateWorkspace {
            name: "No playbook".to_string(),
            instantly_api_key: Some("key-123".to_string()),
            icp: None,
            proof_points_json: None,
        },
    )
    .await
    .expect("seed workspace");
    let batch = seed_batch(&pool, workspace.id).await;
    seed_lead(&pool, batch, "a@acme.test", passing_steps()).await;

    let response = post_json(app, &dispatch_uri(workspace.id), send_body(batch)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("No playbook"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_batch_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let ws = seed_workspace(&pool, Some("key-123")).await;

    let response = post_json(app, &dispatch_uri(ws), send_body(9999)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_campaign_resolves_as_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;
    let other_ws = seed_workspace(&pool, Some("other-key")).await;
    let foreign = CampaignRepo::create(
        &pool,
        other_ws,
        &CreateCampaignRow {
            name: "Someone else's".to_string(),
            lead_batch_id: None,
        },
    )
    .await
    .expect("seed campaign");

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({ "batch_id": batch, "campaign_name": "Q3 outbound", "campaign_id": foreign.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Quality gate blocks bad batches with a diagnostic payload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn gate_failure_returns_422_with_details(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let ws = seed_workspace(&pool, Some("key-123")).await;
    let batch = seed_batch(&pool, ws).await;
    seed_lead(&pool, batch, "good@acme.test", passing_steps()).await;
    seed_lead(&pool, batch, "bad1@acme.test", failing_steps()).await;
    seed_lead(&pool, batch, "bad2@acme.test", failing_steps()).await;

    let response = post_json(app, &dispatch_uri(ws), send_body(batch)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "QUALITY_GATE_FAILED");
    assert_eq!(
        json["error"],
        "2 of 3 leads failed the content quality gate"
    );

    let details = &json["details"];
    assert_eq!(details["num_steps"], 2);
    assert_eq!(details["total_leads"], 3);
    assert_eq!(details["leads_passing_all_steps"], 1);
    assert_eq!(details["failures_by_step"], json!([{"step": 1, "failed": 2}]));
    let samples = details["sample_failures"].as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["lead_email"], "bad1@acme.test");
    assert_eq!(samples[0]["step"], 1);
    assert!(samples[0]["reason"]
        .as_str()
        .unwrap()
        .contains("subject too short"));

    assert!(provider.calls().is_empty());
    let sent = SentCampaignRepo::list_by_workspace(&pool, ws).await.unwrap();
    assert!(sent.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_failing_blocked_even_with_skip(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let ws = seed_workspace(&pool, Some("key-123")).await;
    let batch = seed_batch(&pool, ws).await;
    seed_lead(&pool, batch, "bad1@acme.test", failing_steps()).await;
    seed_lead(&pool, batch, "bad2@acme.test", failing_steps()).await;

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({ "batch_id": batch, "campaign_name": "Q3 outbound", "skip_failing_leads": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn skip_failing_leads_sends_passing_subset(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let ws = seed_workspace(&pool, Some("key-123")).await;
    let batch = seed_batch(&pool, ws).await;
    seed_lead(&pool, batch, "a@acme.test", passing_steps()).await;
    seed_lead(&pool, batch, "bad@acme.test", failing_steps()).await;
    seed_lead(&pool, batch, "c@acme.test", passing_steps()).await;

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({ "batch_id": batch, "campaign_name": "Q3 outbound", "skip_failing_leads": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["leads_uploaded"], 2);

    let calls = provider.calls_for("prov-1");
    assert_eq!(
        uploaded_emails(&calls[1]),
        vec!["a@acme.test", "c@acme.test"]
    );
}

// ---------------------------------------------------------------------------
// Test: Single dispatch happy path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn single_dispatch_runs_provider_phases_in_order(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(app, &dispatch_uri(ws), send_body(batch)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["campaign_id"], "prov-1");
    assert_eq!(json["data"]["leads_uploaded"], 3);
    assert_eq!(json["data"]["duplicated_leads"], 0);
    assert_eq!(json["data"]["in_blocklist"], 0);
    assert_eq!(
        json["data"]["message"],
        "Campaign \"Q3 outbound\" activated with 3 leads"
    );

    let calls = provider.calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[0], ProviderCall::ListAccounts);
    match &calls[1] {
        ProviderCall::CreateCampaign {
            name,
            delay_unit,
            steps,
        } => {
            assert_eq!(name, "Q3 outbound");
            assert_eq!(*delay_unit, DelayUnit::Days);
            assert_eq!(steps.len(), 2);
            assert_eq!(steps[0].subject, "{{step1_subject}}");
            assert_eq!(steps[0].delay, 1);
            assert_eq!(steps[1].body, "{{step2_body}}");
            assert_eq!(steps[1].delay, 3);
        }
        other => panic!("expected CreateCampaign, got {other:?}"),
    }
    match &calls[2] {
        ProviderCall::AddVariables { campaign_id, names } => {
            assert_eq!(campaign_id, "prov-1");
            assert_eq!(
                names,
                &["step1_subject", "step1_body", "step2_subject", "step2_body"]
            );
        }
        other => panic!("expected AddVariables, got {other:?}"),
    }
    match &calls[3] {
        ProviderCall::BulkAddLeads {
            campaign_id,
            leads,
            verify,
        } => {
            assert_eq!(campaign_id, "prov-1");
            assert!(*verify);
            assert_eq!(leads.len(), 3);
            assert_eq!(leads[0].email, "a@acme.test");
            assert_eq!(
                leads[0].custom_variables.get("step1_subject").unwrap(),
                "Quick question about Acme"
            );
        }
        other => panic!("expected BulkAddLeads, got {other:?}"),
    }
    assert_eq!(
        calls[4],
        ProviderCall::Activate {
            campaign_id: "prov-1".to_string()
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_records_history_and_launches_campaign(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;
    let campaign = CampaignRepo::create(
        &pool,
        ws,
        &CreateCampaignRow {
            name: "Working title".to_string(),
            lead_batch_id: Some(batch),
        },
    )
    .await
    .expect("seed campaign");

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({
            "batch_id": batch,
            "campaign_name": "  Q3 outbound  ",
            "campaign_id": campaign.id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let launched = CampaignRepo::find_by_id(&pool, campaign.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(launched.status, "launched");
    assert_eq!(launched.name, "Q3 outbound");

    let sent = SentCampaignRepo::list_by_workspace(&pool, ws).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].instantly_campaign_id, "prov-1");
    assert_eq!(sent[0].name, "Q3 outbound");
    assert_eq!(sent[0].campaign_id, Some(campaign.id));
    assert_eq!(sent[0].lead_batch_id, batch);
    assert_eq!(sent[0].ab_group_id, None);
    assert_eq!(sent[0].variant, None);
    assert_eq!(sent[0].leads_uploaded, 3);

    // A launched campaign refuses a second dispatch.
    let again = post_json(
        common::build_test_app(pool.clone()),
        &dispatch_uri(ws),
        json!({
            "batch_id": batch,
            "campaign_name": "Q3 outbound",
            "campaign_id": campaign.id
        }),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ramp_sets_limits_per_warmup_state(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::with_accounts(vec![
        SendingAccount {
            email: "cold@sender.test".to_string(),
            warmup_complete: false,
            daily_limit: None,
        },
        SendingAccount {
            email: "hot@sender.test".to_string(),
            warmup_complete: true,
            daily_limit: Some(30),
        },
        SendingAccount {
            email: "done@sender.test".to_string(),
            warmup_complete: false,
            daily_limit: Some(10),
        },
    ]));
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(app, &dispatch_uri(ws), send_body(batch)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = provider.calls();
    assert!(calls.contains(&ProviderCall::UpdateDailyLimit {
        email: "cold@sender.test".to_string(),
        daily_limit: 10,
    }));
    assert!(calls.contains(&ProviderCall::UpdateDailyLimit {
        email: "hot@sender.test".to_string(),
        daily_limit: 50,
    }));
    // Already at target, left alone.
    assert!(!calls.iter().any(|call| matches!(
        call,
        ProviderCall::UpdateDailyLimit { email, .. } if email == "done@sender.test"
    )));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_failure_maps_to_502_and_nothing_persists(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::failing_create());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;
    let campaign = CampaignRepo::create(
        &pool,
        ws,
        &CreateCampaignRow {
            name: "Doomed".to_string(),
            lead_batch_id: Some(batch),
        },
    )
    .await
    .expect("seed campaign");

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({
            "batch_id": batch,
            "campaign_name": "Q3 outbound",
            "campaign_id": campaign.id
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "PROVIDER_ERROR");

    let sent = SentCampaignRepo::list_by_workspace(&pool, ws).await.unwrap();
    assert!(sent.is_empty());
    let untouched = CampaignRepo::find_by_id(&pool, campaign.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, "draft");
}

// ---------------------------------------------------------------------------
// Test: A/B dispatch
// ---------------------------------------------------------------------------

fn ab_body(batch_id: i64) -> serde_json::Value {
    json!({
        "batch_id": batch_id,
        "campaign_name": "Q3 outbound",
        "ab_test": true,
        "subject_line_a": "Subject line alpha",
        "subject_line_b": "Subject line bravo"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ab_dispatch_creates_pair_with_alternating_variants(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(app, &dispatch_uri(ws), ab_body(batch)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["campaign_id"], "prov-1");
    assert_eq!(json["data"]["leads_uploaded"], 3);
    assert_eq!(
        json["data"]["message"],
        "A/B campaigns \"Q3 outbound (A)\" and \"Q3 outbound (B)\" activated with 3 leads"
    );

    let created: Vec<String> = provider
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ProviderCall::CreateCampaign { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(created, vec!["Q3 outbound (A)", "Q3 outbound (B)"]);

    // Each provider campaign sees its three phases in order.
    for id in ["prov-1", "prov-2"] {
        let calls = provider.calls_for(id);
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], ProviderCall::AddVariables { .. }));
        assert!(matches!(calls[1], ProviderCall::BulkAddLeads { .. }));
        assert!(matches!(calls[2], ProviderCall::Activate { .. }));
    }

    // Leads alternate A, B, A over insertion order.
    assert_eq!(
        uploaded_emails(&provider.calls_for("prov-1")[1]),
        vec!["a@acme.test", "c@acme.test"]
    );
    assert_eq!(
        uploaded_emails(&provider.calls_for("prov-2")[1]),
        vec!["b@acme.test"]
    );

    let leads = LeadRepo::list_all_by_batch(&pool, batch).await.unwrap();
    let variants: Vec<Option<String>> = leads.into_iter().map(|l| l.ab_variant).collect();
    assert_eq!(
        variants,
        vec![
            Some("A".to_string()),
            Some("B".to_string()),
            Some("A".to_string())
        ]
    );

    // Both history rows share one group id and carry their own counts.
    let sent = SentCampaignRepo::list_by_workspace(&pool, ws).await.unwrap();
    assert_eq!(sent.len(), 2);
    let row_a = sent.iter().find(|s| s.variant.as_deref() == Some("A")).unwrap();
    let row_b = sent.iter().find(|s| s.variant.as_deref() == Some("B")).unwrap();
    assert_eq!(row_a.name, "Q3 outbound (A)");
    assert_eq!(row_b.name, "Q3 outbound (B)");
    assert_eq!(row_a.instantly_campaign_id, "prov-1");
    assert_eq!(row_b.instantly_campaign_id, "prov-2");
    assert_eq!(row_a.leads_uploaded, 2);
    assert_eq!(row_b.leads_uploaded, 1);
    assert!(row_a.ab_group_id.is_some());
    assert_eq!(row_a.ab_group_id, row_b.ab_group_id);
    assert!(row_a.ab_group_id.as_deref().unwrap().starts_with("ab_"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ab_subject_override_touches_first_step_only(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(app, &dispatch_uri(ws), ab_body(batch)).await;
    assert_eq!(response.status(), StatusCode::OK);

    for (id, expected_subject) in [("prov-1", "Subject line alpha"), ("prov-2", "Subject line bravo")]
    {
        let calls = provider.calls_for(id);
        let ProviderCall::BulkAddLeads { leads, verify, .. } = &calls[1] else {
            panic!("expected BulkAddLeads for {id}");
        };
        assert!(*verify);
        for lead in leads {
            assert_eq!(
                lead.custom_variables.get("step1_subject").unwrap(),
                expected_subject
            );
            // The lead's own later steps are untouched.
            assert_eq!(
                lead.custom_variables.get("step2_subject").unwrap(),
                "Following up on my note"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Test: Campaign playbook override
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn campaign_playbook_wins_over_workspace(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;
    let campaign = CampaignRepo::create(
        &pool,
        ws,
        &CreateCampaignRow {
            name: "One-step".to_string(),
            lead_batch_id: Some(batch),
        },
    )
    .await
    .expect("seed campaign");
    CampaignRepo::update(
        &pool,
        campaign.id,
        &UpdateCampaign {
            playbook_json: Some(json!({
                "guidelines": { "tone": "short", "numSteps": 1, "stepDelays": [1] }
            })),
            ..UpdateCampaign::default()
        },
    )
    .await
    .expect("override playbook");

    let response = post_json(
        app,
        &dispatch_uri(ws),
        json!({
            "batch_id": batch,
            "campaign_name": "Q3 outbound",
            "campaign_id": campaign.id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = provider.calls();
    match &calls[1] {
        ProviderCall::CreateCampaign { steps, .. } => assert_eq!(steps.len(), 1),
        other => panic!("expected CreateCampaign, got {other:?}"),
    }
    match &calls[2] {
        ProviderCall::AddVariables { names, .. } => {
            assert_eq!(names, &["step1_subject", "step1_body"]);
        }
        other => panic!("expected AddVariables, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: Test send
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_send_compresses_delays_and_targets_one_inbox(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;
    let campaign = CampaignRepo::create(
        &pool,
        ws,
        &CreateCampaignRow {
            name: "Dry run".to_string(),
            lead_batch_id: Some(batch),
        },
    )
    .await
    .expect("seed campaign");

    let response = post_json(
        app,
        &format!("/api/v1/workspaces/{ws}/dispatch/test"),
        json!({
            "batch_id": batch,
            "campaign_name": "Dry run",
            "test_email": "qa@tester.test",
            "campaign_id": campaign.id
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["campaign_id"], "prov-1");
    assert_eq!(json["data"]["leads_uploaded"], 1);
    assert_eq!(
        json["data"]["message"],
        "Test campaign \"[TEST] Dry run\" sent to qa@tester.test"
    );

    let calls = provider.calls();
    match &calls[1] {
        ProviderCall::CreateCampaign {
            name,
            delay_unit,
            steps,
        } => {
            assert_eq!(name, "[TEST] Dry run");
            assert_eq!(*delay_unit, DelayUnit::Minutes);
            let delays: Vec<i64> = steps.iter().map(|s| s.delay).collect();
            assert_eq!(delays, vec![0, 2]);
        }
        other => panic!("expected CreateCampaign, got {other:?}"),
    }
    match &calls[3] {
        ProviderCall::BulkAddLeads { leads, verify, .. } => {
            assert!(!*verify);
            assert_eq!(leads.len(), 1);
            // The tester's address carries the first lead's content.
            assert_eq!(leads[0].email, "qa@tester.test");
            assert_eq!(leads[0].first_name.as_deref(), Some("Pat"));
            assert_eq!(
                leads[0].custom_variables.get("step1_subject").unwrap(),
                "Quick question about Acme"
            );
        }
        other => panic!("expected BulkAddLeads, got {other:?}"),
    }

    // History gets a row, but the campaign is not launched.
    let sent = SentCampaignRepo::list_by_workspace(&pool, ws).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "[TEST] Dry run");
    let untouched = CampaignRepo::find_by_id(&pool, campaign.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, "draft");
    assert_eq!(untouched.name, "Dry run");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_send_with_failing_template_blocked(pool: PgPool) {
    let provider = Arc::new(RecordingProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let ws = seed_workspace(&pool, Some("key-123")).await;
    let batch = seed_batch(&pool, ws).await;
    // The first lead is the template; later passing leads do not help.
    seed_lead(&pool, batch, "bad@acme.test", failing_steps()).await;
    seed_lead(&pool, batch, "good@acme.test", passing_steps()).await;

    let response = post_json(
        app,
        &format!("/api/v1/workspaces/{ws}/dispatch/test"),
        json!({
            "batch_id": batch,
            "campaign_name": "Dry run",
            "test_email": "qa@tester.test"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "QUALITY_GATE_FAILED");
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_send_rejects_bad_address(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (ws, batch) = seed_ready_workspace(&pool).await;

    let response = post_json(
        app,
        &format!("/api/v1/workspaces/{ws}/dispatch/test"),
        json!({
            "batch_id": batch,
            "campaign_name": "Dry run",
            "test_email": "not-an-address"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
