use reqwest::Method;
use reqwest::multipart::Form;
use serde_json::json;

use crate::common::{PNG_BYTES, TestApp, png_part, routes};

#[tokio::test]
async fn end_to_end_owner_flow() {
    let app = TestApp::spawn().await;

    let reg = app.register("Ana", "ana@x.com", "secret1").await;
    assert_eq!(reg.status, 201, "{}", reg.text);

    let login = app.login("ana@x.com", "secret1").await;
    assert_eq!(login.status, 200);
    let token = login.body["token"].as_str().unwrap().to_string();

    let form = Form::new()
        .text("name", "Fido")
        .text("birth_date", "2020-01-01")
        .part("image", png_part(PNG_BYTES.to_vec(), "fido.png"));
    let pet = app.send_form(Method::POST, routes::PETS, form, &token).await;
    assert_eq!(pet.status, 201, "{}", pet.text);
    let pet_id = pet.body["petId"].as_i64().unwrap() as i32;

    let vacc = app
        .post_with_token(
            &routes::pet_vaccinations(pet_id),
            &json!({"vaccine_name": "Rabies", "date_administered": "2024-01-01"}),
            &token,
        )
        .await;
    assert_eq!(vacc.status, 201, "{}", vacc.text);
    let vacc_id = vacc.id();

    let list = app
        .get_with_token(&routes::pet_vaccinations(pet_id), &token)
        .await;
    assert_eq!(list.status, 200);
    let items = list.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], vacc_id);
    assert_eq!(items[0]["vaccine_name"], "Rabies");
    assert_eq!(items[0]["date_administered"], "2024-01-01");

    let bob = app.create_authenticated_user("Bob", "bob@x.com").await;
    let foreign = app
        .get_with_token(&routes::pet_vaccinations(pet_id), &bob)
        .await;
    assert_eq!(foreign.status, 404);
    assert_eq!(foreign.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_echoes_the_record() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;
    let (pet_id, _) = app.create_pet(&token, "Fido").await;

    let res = app
        .post_with_token(
            &routes::pet_vaccinations(pet_id),
            &json!({"vaccine_name": " Rabies ", "date_administered": "2024-01-01", "notes": "booster"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert!(res.body["id"].is_number());
    assert_eq!(res.body["pet_id"], pet_id);
    assert_eq!(res.body["vaccine_name"], "Rabies");
    assert_eq!(res.body["notes"], "booster");
}

#[tokio::test]
async fn creating_for_someone_elses_pet_is_not_found() {
    let app = TestApp::spawn().await;
    let ana = app.create_authenticated_user("Ana", "ana@x.com").await;
    let bob = app.create_authenticated_user("Bob", "bob@x.com").await;
    let (pet_id, _) = app.create_pet(&ana, "Fido").await;

    let res = app
        .post_with_token(
            &routes::pet_vaccinations(pet_id),
            &json!({"vaccine_name": "Rabies", "date_administered": "2024-01-01"}),
            &bob,
        )
        .await;

    assert_eq!(res.status, 404);
    let list = app
        .get_with_token(&routes::pet_vaccinations(pet_id), &ana)
        .await;
    assert_eq!(list.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn listing_for_an_unknown_pet_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;

    let res = app
        .get_with_token(&routes::pet_vaccinations(4242), &token)
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn malformed_ids_get_a_json_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;

    let res = app
        .get_with_token("/api/v1/pets/abc/vaccinations", &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["message"].is_string(), "{}", res.text);

    let res = app
        .patch_with_token("/api/v1/vaccinations/abc", &json!({"notes": "x"}), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app.delete_with_token("/api/v1/vaccinations/abc", &token).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn pet_without_records_lists_empty() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;
    let (pet_id, _) = app.create_pet(&token, "Fido").await;

    let res = app
        .get_with_token(&routes::pet_vaccinations(pet_id), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn partial_update_and_null_notes() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;
    let (pet_id, _) = app.create_pet(&token, "Fido").await;
    let created = app
        .post_with_token(
            &routes::pet_vaccinations(pet_id),
            &json!({"vaccine_name": "Rabies", "date_administered": "2024-01-01", "notes": "first dose"}),
            &token,
        )
        .await;
    let id = created.id();

    let renamed = app
        .patch_with_token(
            &routes::vaccination(id),
            &json!({"date_administered": "2025-01-01"}),
            &token,
        )
        .await;
    assert_eq!(renamed.status, 200, "{}", renamed.text);
    assert_eq!(renamed.body["date_administered"], "2025-01-01");
    assert_eq!(renamed.body["vaccine_name"], "Rabies");
    assert_eq!(renamed.body["notes"], "first dose");

    let cleared = app
        .patch_with_token(&routes::vaccination(id), &json!({"notes": null}), &token)
        .await;
    assert_eq!(cleared.status, 200);
    assert!(cleared.body["notes"].is_null());
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;
    let (pet_id, _) = app.create_pet(&token, "Fido").await;
    let id = app.create_vaccination(&token, pet_id, "Rabies").await;

    let res = app
        .patch_with_token(&routes::vaccination(id), &json!({}), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn other_users_cannot_touch_a_vaccination() {
    let app = TestApp::spawn().await;
    let ana = app.create_authenticated_user("Ana", "ana@x.com").await;
    let bob = app.create_authenticated_user("Bob", "bob@x.com").await;
    let (pet_id, _) = app.create_pet(&ana, "Fido").await;
    let id = app.create_vaccination(&ana, pet_id, "Rabies").await;

    let patch = app
        .patch_with_token(&routes::vaccination(id), &json!({"vaccine_name": "X"}), &bob)
        .await;
    let delete = app.delete_with_token(&routes::vaccination(id), &bob).await;

    assert_eq!(patch.status, 404);
    assert_eq!(delete.status, 404);

    let list = app
        .get_with_token(&routes::pet_vaccinations(pet_id), &ana)
        .await;
    let items = list.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["vaccine_name"], "Rabies");
}

#[tokio::test]
async fn deleting_twice_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("Ana", "ana@x.com").await;
    let (pet_id, _) = app.create_pet(&token, "Fido").await;
    let id = app.create_vaccination(&token, pet_id, "Rabies").await;

    let first = app.delete_with_token(&routes::vaccination(id), &token).await;
    let second = app.delete_with_token(&routes::vaccination(id), &token).await;

    assert_eq!(first.status, 200);
    assert_eq!(first.body["message"], "Vaccination deleted");
    assert_eq!(second.status, 404);
}
