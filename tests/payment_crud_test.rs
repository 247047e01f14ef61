mod common;

use common::{sample_payment_body, TestApp};
use mongodb::bson::doc;
use payment_service::models::{Evidence, Payment};

#[tokio::test]
async fn create_payment_persists_normalized_record() {
    let app = TestApp::spawn().await;

    let payment_id = app.create_payment(&sample_payment_body()).await;

    let stored = app
        .db
        .database()
        .collection::<Payment>("payments")
        .find_one(doc! { "_id": &payment_id }, None)
        .await
        .unwrap()
        .expect("Payment not found in DB");

    assert_eq!(stored.payee_first_name, "Ana");
    assert_eq!(stored.payee_added_date_utc, "Nov 14, 2023, 10:13 PM");
    assert_eq!(
        stored.payee_due_date.unwrap().to_chrono().to_rfc3339(),
        "2030-01-15T00:00:00+00:00"
    );
    // Optional fields default at the boundary
    assert_eq!(stored.payee_address_line_2, "");
    assert_eq!(stored.payee_province_or_state, "");
    assert_eq!(stored.discount_percent, 0.0);
    assert_eq!(stored.tax_percent, 0.0);
    // Derived total is not computed on write
    assert_eq!(stored.total_due, None);

    app.cleanup().await;
}

#[tokio::test]
async fn create_payment_rejects_invalid_email() {
    let app = TestApp::spawn().await;

    let mut body = sample_payment_body();
    body["payee_email"] = serde_json::json!("not-an-email");

    let response = app
        .api_client
        .post(format!("{}/payments/create", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(422, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn create_payment_rejects_empty_first_name() {
    let app = TestApp::spawn().await;

    let mut body = sample_payment_body();
    body["payee_first_name"] = serde_json::json!("");

    let response = app
        .api_client
        .post(format!("{}/payments/create", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(422, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn update_payment_replaces_fields() {
    let app = TestApp::spawn().await;

    let payment_id = app.create_payment(&sample_payment_body()).await;

    let mut body = sample_payment_body();
    body["payee_city"] = serde_json::json!("Shelbyville");
    body["due_amount"] = serde_json::json!(250.0);

    let response = app
        .api_client
        .put(format!("{}/payments/update/{}", app.address, payment_id))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Payment updated successfully");

    let stored = app
        .db
        .database()
        .collection::<Payment>("payments")
        .find_one(doc! { "_id": &payment_id }, None)
        .await
        .unwrap()
        .expect("Payment not found in DB");

    assert_eq!(stored.payee_city, "Shelbyville");
    assert_eq!(stored.due_amount, 250.0);
    // Update never touches the derived total
    assert_eq!(stored.total_due, None);

    app.cleanup().await;
}

#[tokio::test]
async fn update_with_unknown_id_is_silent_success() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .put(format!(
            "{}/payments/update/{}",
            app.address,
            uuid::Uuid::new_v4()
        ))
        .json(&sample_payment_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Payment updated successfully");

    // Nothing was written
    let count = app
        .db
        .database()
        .collection::<Payment>("payments")
        .count_documents(None, None)
        .await
        .unwrap();
    assert_eq!(count, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn update_with_malformed_id_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .put(format!("{}/payments/update/not-a-uuid", app.address))
        .json(&sample_payment_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn delete_payment_cascades_to_evidence() {
    let app = TestApp::spawn().await;

    let payment_id = app.create_payment(&sample_payment_body()).await;

    let response = app
        .upload_evidence(
            &payment_id,
            "receipt.pdf",
            b"receipt bytes".to_vec(),
            "application/pdf",
        )
        .await;
    assert_eq!(201, response.status().as_u16());

    let response = app
        .api_client
        .delete(format!("{}/payments/delete/{}", app.address, payment_id))
        .send()
        .await
        .expect("Failed to execute delete");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body["message"],
        "Payment and related evidence deleted successfully"
    );

    let payments = app
        .db
        .database()
        .collection::<Payment>("payments")
        .count_documents(doc! { "_id": &payment_id }, None)
        .await
        .unwrap();
    assert_eq!(payments, 0);

    let evidence = app
        .db
        .database()
        .collection::<Evidence>("evidence")
        .count_documents(doc! { "payment_id": &payment_id }, None)
        .await
        .unwrap();
    assert_eq!(evidence, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_without_evidence_removes_just_the_payment() {
    let app = TestApp::spawn().await;

    let payment_id = app.create_payment(&sample_payment_body()).await;

    let response = app
        .api_client
        .delete(format!("{}/payments/delete/{}", app.address, payment_id))
        .send()
        .await
        .expect("Failed to execute delete");

    assert_eq!(200, response.status().as_u16());

    let payments = app
        .db
        .database()
        .collection::<Payment>("payments")
        .count_documents(None, None)
        .await
        .unwrap();
    assert_eq!(payments, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_with_unknown_id_returns_404() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .delete(format!(
            "{}/payments/delete/{}",
            app.address,
            uuid::Uuid::new_v4()
        ))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn delete_with_malformed_id_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .delete(format!("{}/payments/delete/not-a-uuid", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());

    app.cleanup().await;
}
