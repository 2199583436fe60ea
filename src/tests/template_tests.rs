use actix_rt::test;

use super::*;
use crate::errors::AppError;
use crate::models::template_model::contains_suspicious_words;

fn request(name: &str, body: &str) -> TemplateRequest {
    TemplateRequest {
        name: name.to_string(),
        subject: "Aviso".to_string(),
        body: body.to_string(),
    }
}

#[test]
async fn suspicious_words_match_case_insensitively() {
    assert!(contains_suspicious_words("Please VERIFY your details"));
    assert!(contains_suspicious_words("tu Password vence"));
    assert!(!contains_suspicious_words("Reunión del viernes"));
}

#[test]
async fn suspicious_flag_is_recomputed_on_update() {
    let ctx = test_context().await;
    let created = ctx
        .templates
        .create_template(request("Banco", "Urgent: confirm your bank account"))
        .await
        .unwrap();
    assert!(created.is_suspicious);

    let updated = ctx
        .templates
        .update_template(created.id, request("Banco", "Almuerzo el viernes"))
        .await
        .unwrap();
    assert!(!updated.is_suspicious);
    assert!(!ctx.templates.get_template(created.id).await.unwrap().is_suspicious);
}

#[test]
async fn lookup_by_name_ignores_case() {
    let ctx = test_context().await;
    let created = ctx
        .templates
        .create_template(request("Welcome", "Hola {{name}}"))
        .await
        .unwrap();

    let found = ctx.templates.get_template_by_name("WELCOME").await.unwrap();
    assert_eq!(found.id, created.id);

    let err = ctx.templates.get_template_by_name("Goodbye").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(..)));
}

#[test]
async fn empty_fields_are_rejected() {
    let ctx = test_context().await;
    let err = ctx
        .templates
        .create_template(request("", "body"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = ctx
        .templates
        .create_template(request("n", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
async fn delete_then_get_is_not_found() {
    let ctx = test_context().await;
    let created = ctx
        .templates
        .create_template(request("T", "b"))
        .await
        .unwrap();
    ctx.templates.delete_template(created.id).await.unwrap();

    assert!(matches!(
        ctx.templates.get_template(created.id).await.unwrap_err(),
        AppError::NotFound(..)
    ));
    assert!(matches!(
        ctx.templates.delete_template(created.id).await.unwrap_err(),
        AppError::NotFound(..)
    ));
}
