use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn admin_creates_sub_category_under_existing_category() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;

        let res = app
            .post_with_token(
                &routes::create_sub_category(category_id),
                &json!({"name": "Shoes", "description": "Everyday shoes"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["name"], "Shoes");
        assert_eq!(res.body["description"], "Everyday shoes");
        assert_eq!(res.body["category_id"], category_id);
        assert!(res.body["image_url"].is_null());
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                &routes::create_sub_category(404),
                &json!({"name": "Shoes"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;

        let too_long = "x".repeat(129);
        for name in ["", "   ", too_long.as_str()] {
            let res = app
                .post_with_token(
                    &routes::create_sub_category(category_id),
                    &json!({ "name": name }),
                    &token,
                )
                .await;
            assert_eq!(res.status, 400, "name {name:?} should be rejected");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn customer_is_denied_before_anything_is_written() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let category_id = app.create_category(&admin, "Footwear").await;
        let customer = app.create_authenticated_user("alice", PASSWORD).await;

        let res = app
            .post_with_token(
                &routes::create_sub_category(category_id),
                &json!({"name": "Shoes"}),
                &customer,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        let list = app.get_without_token(routes::SUB_CATEGORIES).await;
        assert_eq!(list.body, json!([]));
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn update_replaces_name_and_description() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;
        let id = app.create_sub_category(&token, category_id, "Shoes").await;

        let res = app
            .put_with_token(
                &routes::sub_category(id),
                &json!({"name": "Sneakers", "description": "Canvas and leather"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["name"], "Sneakers");
        assert_eq!(res.body["description"], "Canvas and leather");

        let fetched = app.get_without_token(&routes::sub_category(id)).await;
        assert_eq!(fetched.body["name"], "Sneakers");
    }

    #[tokio::test]
    async fn update_keeps_the_attached_image() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;
        let id = app.create_sub_category(&token, category_id, "Shoes").await;
        let uploaded = app
            .upload_image(id, "image/png", b"\x89PNG\r\n\x1a\n".to_vec(), &token)
            .await;
        assert_eq!(uploaded.status, 200, "{}", uploaded.text);

        let res = app
            .put_with_token(
                &routes::sub_category(id),
                &json!({"name": "Sneakers", "image_url": "ignored.png"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["image_url"], uploaded.body["image_url"]);
    }

    #[tokio::test]
    async fn update_of_missing_sub_category_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .put_with_token(&routes::sub_category(77), &json!({"name": "Shoes"}), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .put_without_token(&routes::sub_category(1), &json!({"name": "Shoes"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;
        let id = app.create_sub_category(&token, category_id, "Shoes").await;

        let res = app.delete_with_token(&routes::sub_category(id), &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "SubCategory Deleted Successfully");
        assert_eq!(res.body["success"], true);

        let fetched = app.get_without_token(&routes::sub_category(id)).await;
        assert_eq!(fetched.status, 404);
        assert_eq!(fetched.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_of_missing_sub_category_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.delete_with_token(&routes::sub_category(5), &token).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_releases_the_image_blob() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;
        let id = app.create_sub_category(&token, category_id, "Shoes").await;
        let uploaded = app
            .upload_image(id, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9], &token)
            .await;
        assert_eq!(uploaded.status, 200, "{}", uploaded.text);
        assert_eq!(app.stored_blob_count(), 1);

        let res = app.delete_with_token(&routes::sub_category(id), &token).await;
        assert_eq!(res.status, 200);

        assert_eq!(app.stored_blob_count(), 0);
        let reference = uploaded.body["image_url"].as_str().unwrap();
        let image = app.get_raw(&routes::image(reference)).await;
        assert_eq!(image.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn customer_cannot_delete() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let category_id = app.create_category(&admin, "Footwear").await;
        let id = app.create_sub_category(&admin, category_id, "Shoes").await;
        let customer = app.create_authenticated_user("alice", PASSWORD).await;

        let res = app.delete_with_token(&routes::sub_category(id), &customer).await;

        assert_eq!(res.status, 403);
        let fetched = app.get_without_token(&routes::sub_category(id)).await;
        assert_eq!(fetched.status, 200);
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn get_by_id_is_public() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;
        let id = app.create_sub_category(&token, category_id, "Shoes").await;

        let res = app.get_without_token(&routes::sub_category(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["name"], "Shoes");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_client_error() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token("/api/sub-category/shoes").await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn list_returns_everything_in_id_order() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let footwear = app.create_category(&token, "Footwear").await;
        let outerwear = app.create_category(&token, "Outerwear").await;
        let a = app.create_sub_category(&token, footwear, "Shoes").await;
        let b = app.create_sub_category(&token, outerwear, "Jackets").await;
        let c = app.create_sub_category(&token, footwear, "Boots").await;

        let res = app.get_without_token(routes::SUB_CATEGORIES).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![a as i64, b as i64, c as i64]);
    }

    #[tokio::test]
    async fn list_by_category_returns_exactly_the_matching_subset() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let parents = [
            app.create_category(&token, "Footwear").await,
            app.create_category(&token, "Outerwear").await,
            app.create_category(&token, "Accessories").await,
        ];
        let mut expected: Vec<Vec<i64>> = vec![Vec::new(); parents.len()];
        for n in 0..10 {
            let slot = (n * 7) % parents.len();
            let id = app
                .create_sub_category(&token, parents[slot], &format!("Item {n}"))
                .await;
            expected[slot].push(id as i64);
        }

        for (slot, &category_id) in parents.iter().enumerate() {
            let res = app
                .get_without_token(&routes::sub_categories_of(category_id))
                .await;
            assert_eq!(res.status, 200);
            let items = res.body.as_array().unwrap();
            assert!(items.iter().all(|s| s["category_id"] == category_id));
            let ids: Vec<i64> = items.iter().map(|s| s["id"].as_i64().unwrap()).collect();
            assert_eq!(ids, expected[slot]);
        }
    }

    #[tokio::test]
    async fn list_by_category_of_empty_category_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let category_id = app.create_category(&token, "Footwear").await;

        let res = app
            .get_without_token(&routes::sub_categories_of(category_id))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn list_by_missing_category_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::sub_categories_of(31)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
