mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn debit_appends_operation_and_rejects_overdrawn_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Alice").await?;
    let account_id =
        common::create_current_account(&server.base_url, &customer_id, 1000.0, 500.0).await?;

    // Debit 200 for rent
    let res = client
        .post(format!("{}/accounts/debit", server.base_url))
        .json(&json!({ "account_id": account_id, "amount": 200.0, "description": "rent" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::account_balance(&server.base_url, &account_id).await?, 800.0);

    // 900 > 800: rejected, balance untouched. The stored overdraft is not consulted.
    let res = client
        .post(format!("{}/accounts/debit", server.base_url))
        .json(&json!({ "account_id": account_id, "amount": 900.0, "description": "too much" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "INSUFFICIENT_BALANCE");
    assert_eq!(body["balance"], 800.0);
    assert_eq!(body["requested"], 900.0);
    assert_eq!(common::account_balance(&server.base_url, &account_id).await?, 800.0);

    // Exactly one Debit operation exists, with the requested amount
    let res = client
        .get(format!("{}/accounts/{}/operations", server.base_url, account_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let operations = body["data"].as_array().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0]["type"], "DEBIT");
    assert_eq!(operations[0]["amount"], 200.0);
    assert_eq!(operations[0]["description"], "rent");

    Ok(())
}

#[tokio::test]
async fn debit_of_exact_balance_drains_to_zero() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Frank").await?;
    let account_id =
        common::create_current_account(&server.base_url, &customer_id, 300.0, 0.0).await?;

    let res = client
        .post(format!("{}/accounts/debit", server.base_url))
        .json(&json!({ "account_id": account_id, "amount": 300.0, "description": "all of it" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::account_balance(&server.base_url, &account_id).await?, 0.0);

    Ok(())
}

#[tokio::test]
async fn credit_increases_balance_and_appends_operation() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Grace").await?;
    let account_id =
        common::create_current_account(&server.base_url, &customer_id, 50.0, 0.0).await?;

    let res = client
        .post(format!("{}/accounts/credit", server.base_url))
        .json(&json!({ "account_id": account_id, "amount": 150.0, "description": "salary" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::account_balance(&server.base_url, &account_id).await?, 200.0);

    let res = client
        .get(format!("{}/accounts/{}/operations", server.base_url, account_id))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let operations = body["data"].as_array().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0]["type"], "CREDIT");
    assert_eq!(operations[0]["amount"], 150.0);

    Ok(())
}

#[tokio::test]
async fn transfer_moves_funds_and_records_both_legs() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Heidi").await?;
    let source = common::create_current_account(&server.base_url, &customer_id, 500.0, 0.0).await?;
    let destination =
        common::create_current_account(&server.base_url, &customer_id, 100.0, 0.0).await?;

    let res = client
        .post(format!("{}/accounts/transfer", server.base_url))
        .json(&json!({
            "source_account_id": source,
            "destination_account_id": destination,
            "amount": 300.0,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(common::account_balance(&server.base_url, &source).await?, 200.0);
    assert_eq!(common::account_balance(&server.base_url, &destination).await?, 400.0);

    // Each side records one operation referencing the counterpart account
    let body = client
        .get(format!("{}/accounts/{}/operations", server.base_url, source))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let operations = body["data"].as_array().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0]["type"], "DEBIT");
    assert_eq!(operations[0]["amount"], 300.0);
    assert_eq!(operations[0]["description"], json!(format!("Transfer to {}", destination)));

    let body = client
        .get(format!("{}/accounts/{}/operations", server.base_url, destination))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let operations = body["data"].as_array().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0]["type"], "CREDIT");
    assert_eq!(operations[0]["description"], json!(format!("Transfer from {}", source)));

    Ok(())
}

#[tokio::test]
async fn transfer_with_insufficient_source_changes_nothing() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Ivan").await?;
    let source = common::create_current_account(&server.base_url, &customer_id, 100.0, 0.0).await?;
    let destination =
        common::create_current_account(&server.base_url, &customer_id, 0.0, 0.0).await?;

    let res = client
        .post(format!("{}/accounts/transfer", server.base_url))
        .json(&json!({
            "source_account_id": source,
            "destination_account_id": destination,
            "amount": 300.0,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(common::account_balance(&server.base_url, &source).await?, 100.0);
    assert_eq!(common::account_balance(&server.base_url, &destination).await?, 0.0);

    Ok(())
}

#[tokio::test]
async fn transfer_to_unknown_destination_rolls_back_the_debit() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Judy").await?;
    let source = common::create_current_account(&server.base_url, &customer_id, 500.0, 0.0).await?;

    let res = client
        .post(format!("{}/accounts/transfer", server.base_url))
        .json(&json!({
            "source_account_id": source,
            "destination_account_id": uuid::Uuid::new_v4().to_string(),
            "amount": 300.0,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Source is untouched: no debit leg survived the failed credit
    assert_eq!(common::account_balance(&server.base_url, &source).await?, 500.0);
    let body = client
        .get(format!("{}/accounts/{}/operations", server.base_url, source))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert!(body["data"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn paged_history_is_newest_first_with_page_math() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Karl").await?;
    let account_id =
        common::create_current_account(&server.base_url, &customer_id, 0.0, 0.0).await?;

    // Seven credits with distinct amounts, oldest is 1.0, newest is 7.0
    for i in 1..=7 {
        let res = client
            .post(format!("{}/accounts/credit", server.base_url))
            .json(&json!({
                "account_id": account_id,
                "amount": i as f64,
                "description": format!("credit {}", i),
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(format!(
            "{}/accounts/{}/pageOperations?page=0&size=3",
            server.base_url, account_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let data = &body["data"];
    assert_eq!(data["account_id"], json!(account_id));
    assert_eq!(data["current_page"], 0);
    assert_eq!(data["page_size"], 3);
    assert_eq!(data["total_pages"], 3); // ceil(7 / 3)
    assert_eq!(data["balance"], 28.0); // 1 + 2 + ... + 7

    let operations = data["operations"].as_array().unwrap();
    assert_eq!(operations.len(), 3);
    // Newest first
    assert_eq!(operations[0]["amount"], 7.0);
    assert_eq!(operations[1]["amount"], 6.0);
    assert_eq!(operations[2]["amount"], 5.0);

    // Last page holds the remainder
    let res = client
        .get(format!(
            "{}/accounts/{}/pageOperations?page=2&size=3",
            server.base_url, account_id
        ))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let operations = body["data"]["operations"].as_array().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0]["amount"], 1.0);

    Ok(())
}

#[tokio::test]
async fn paged_history_defaults_to_page_zero_size_five() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let customer_id = common::create_customer(&server.base_url, "Liam").await?;
    let account_id =
        common::create_current_account(&server.base_url, &customer_id, 0.0, 0.0).await?;

    for i in 1..=6 {
        client
            .post(format!("{}/accounts/credit", server.base_url))
            .json(&json!({
                "account_id": account_id,
                "amount": i as f64,
                "description": format!("credit {}", i),
            }))
            .send()
            .await?;
    }

    let res = client
        .get(format!(
            "{}/accounts/{}/pageOperations",
            server.base_url, account_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let data = &body["data"];
    assert_eq!(data["current_page"], 0);
    assert_eq!(data["page_size"], 5);
    assert_eq!(data["total_pages"], 2); // ceil(6 / 5)
    assert_eq!(data["operations"].as_array().unwrap().len(), 5);

    Ok(())
}

#[tokio::test]
async fn paged_history_of_unknown_account_is_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/accounts/{}/pageOperations",
            server.base_url,
            uuid::Uuid::new_v4()
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
