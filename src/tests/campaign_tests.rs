use actix_rt::test;
use chrono::Duration;

use super::*;
use crate::errors::AppError;

#[test]
async fn create_and_get_keeps_recipient_order() {
    let ctx = test_context().await;
    let created = ctx
        .campaigns
        .create_campaign(campaign_request(
            "Q1-Test",
            "Producto",
            &[("zoe@x.com", "Zoe"), ("alice@x.com", "Alice"), ("bob@x.com", "Bob")],
        ))
        .await
        .unwrap();

    let loaded = ctx.campaigns.get_campaign(created.id).await.unwrap();
    assert_eq!(loaded.name, "Q1-Test");
    let emails: Vec<&str> = loaded.recipients.iter().map(|r| r.email.as_str()).collect();
    assert_eq!(emails, vec!["zoe@x.com", "alice@x.com", "bob@x.com"]);
    assert!(loaded.recipients.iter().all(|r| r.campaign_id == created.id));
    assert_eq!(loaded.start_date, created.start_date);
}

#[test]
async fn start_after_end_is_rejected() {
    let ctx = test_context().await;
    let mut req = campaign_request("C", "T", &[]);
    req.end_date = req.start_date - Duration::days(1);

    let err = ctx.campaigns.create_campaign(req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[test]
async fn same_start_and_end_is_allowed() {
    let ctx = test_context().await;
    let mut req = campaign_request("C", "T", &[]);
    req.end_date = req.start_date;
    assert!(ctx.campaigns.create_campaign(req).await.is_ok());
}

#[test]
async fn invalid_recipient_email_is_rejected() {
    let ctx = test_context().await;
    let err = ctx
        .campaigns
        .create_campaign(campaign_request("C", "T", &[("nope", "Nope")]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    assert!(ctx.campaigns.list_campaigns().await.unwrap().is_empty());
}

#[test]
async fn update_replaces_recipients() {
    let ctx = test_context().await;
    let created = ctx
        .campaigns
        .create_campaign(campaign_request("C", "T", &[("a@x.com", "A")]))
        .await
        .unwrap();

    let updated = ctx
        .campaigns
        .update_campaign(
            created.id,
            campaign_request("C2", "T2", &[("b@x.com", "B"), ("c@x.com", "C")]),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "C2");

    let loaded = ctx.campaigns.get_campaign(created.id).await.unwrap();
    assert_eq!(loaded.template_name, "T2");
    assert_eq!(loaded.recipients.len(), 2);
    assert_eq!(loaded.recipients[0].email, "b@x.com");
}

#[test]
async fn update_unknown_campaign_is_not_found() {
    let ctx = test_context().await;
    let err = ctx
        .campaigns
        .update_campaign(77, campaign_request("C", "T", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(..)), "got {err:?}");
}

#[test]
async fn delete_cascades_to_delivery_records() {
    let ctx = test_context().await;
    seed_template(&ctx, "T", "x").await;
    let campaign = ctx
        .campaigns
        .create_campaign(campaign_request("C", "T", &[("a@x.com", "A")]))
        .await
        .unwrap();
    let summary = ctx
        .email
        .send_campaign(campaign.id, &HashMap::new())
        .await
        .unwrap();
    assert_eq!(count_delivery_records(&ctx.pool).await, 1);

    ctx.campaigns.delete_campaign(campaign.id).await.unwrap();

    assert_eq!(count_delivery_records(&ctx.pool).await, 0);
    let err = ctx
        .tracking
        .record_opened(&summary.sent[0].tracking_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(..)));
    let err = ctx.campaigns.get_campaign(campaign.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(..)));
}

#[test]
async fn renaming_a_dispatched_campaign_keeps_its_tracking() {
    let ctx = test_context().await;
    seed_template(&ctx, "T", "x").await;
    let campaign = ctx
        .campaigns
        .create_campaign(campaign_request("C", "T", &[("a@x.com", "A")]))
        .await
        .unwrap();
    let summary = ctx
        .email
        .send_campaign(campaign.id, &HashMap::new())
        .await
        .unwrap();
    let tracking_id = &summary.sent[0].tracking_id;
    ctx.tracking.record_opened(tracking_id).await.unwrap();

    let updated = ctx
        .campaigns
        .update_campaign(
            campaign.id,
            campaign_request("C renombrada", "T", &[("b@x.com", "B"), ("A@x.com", "A bis")]),
        )
        .await
        .unwrap();

    // El destinatario existente conserva su id aunque cambie de posición
    assert_eq!(updated.recipients[1].id, campaign.recipients[0].id);
    assert_eq!(updated.recipients[1].name, "A bis");

    assert_eq!(count_delivery_records(&ctx.pool).await, 1);
    assert!(ctx.tracking.get_record(tracking_id).await.unwrap().opened);

    let report = ctx.reports.generate_report(campaign.id).await.unwrap();
    assert_eq!(report.total_sent, 1);
    assert_eq!(report.total_opened, 1);

    let loaded = ctx.campaigns.get_campaign(campaign.id).await.unwrap();
    let emails: Vec<&str> = loaded.recipients.iter().map(|r| r.email.as_str()).collect();
    assert_eq!(emails, vec!["b@x.com", "a@x.com"]);
}

#[test]
async fn removing_a_recipient_with_deliveries_is_rejected() {
    let ctx = test_context().await;
    seed_template(&ctx, "T", "x").await;
    let campaign = ctx
        .campaigns
        .create_campaign(campaign_request("C", "T", &[("a@x.com", "A")]))
        .await
        .unwrap();
    ctx.email
        .send_campaign(campaign.id, &HashMap::new())
        .await
        .unwrap();

    let err = ctx
        .campaigns
        .update_campaign(campaign.id, campaign_request("C2", "T", &[("b@x.com", "B")]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // La transacción se revierte completa
    let loaded = ctx.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(loaded.name, "C");
    assert_eq!(loaded.recipients.len(), 1);
    assert_eq!(count_delivery_records(&ctx.pool).await, 1);
}
