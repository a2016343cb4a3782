use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use job_recommender::database::DatabaseConfig;
use job_recommender::{build_rocket, RecommendationConfig};

async fn client() -> (Client, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut db_config = DatabaseConfig::new(dir.path().join("rojgar.db"));
    db_config.init_pool().await.unwrap();
    db_config.migrate().await.unwrap();

    let rocket = build_rocket(db_config, RecommendationConfig::default());
    let client = Client::tracked(rocket).await.unwrap();
    (client, dir)
}

async fn post_json(client: &Client, uri: &str, body: Value) -> (Status, Value) {
    let response = client
        .post(uri.to_string())
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap())
}

async fn get_json(client: &Client, uri: &str) -> (Status, Value) {
    let response = client.get(uri.to_string()).dispatch().await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap())
}

async fn put_json(client: &Client, uri: &str, body: Value) -> (Status, Value) {
    let response = client
        .put(uri.to_string())
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap())
}

async fn create_worker(client: &Client, body: Value) -> String {
    let (status, body) = post_json(client, "/api/workers", body).await;
    assert_eq!(status, Status::Ok, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn seed_jobs(client: &Client) {
    let jobs = [
        json!({
            "title": "Electrical repair",
            "description": "wiring and fan installation",
            "skillsRequired": ["electrician", "carpenter"],
            "salary": 18000,
            "location": "Mumbai",
            "longitude": 72.8777,
            "latitude": 19.0760
        }),
        json!({
            "title": "Plumbing and wiring",
            "description": "plumber needed for new flats",
            "skillsRequired": "plumber, electrician",
            "salary": 15000,
            "location": "Pune",
            "longitude": 73.8567,
            "latitude": 18.5204
        }),
    ];
    for job in jobs {
        let (status, body) = post_json(client, "/api/jobs", job).await;
        assert_eq!(status, Status::Ok, "{body}");
    }
}

#[rocket::async_test]
async fn health_reports_database_state() {
    let (client, _dir) = client().await;
    let (status, body) = get_json(&client, "/api/health").await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "OK (database connected)");
}

#[rocket::async_test]
async fn basic_recommendations_rank_by_shared_skills() {
    let (client, _dir) = client().await;
    let worker_id = create_worker(
        &client,
        json!({ "name": "Asha", "phone": "9000000001", "skills": ["electrician", "plumber"] }),
    )
    .await;
    seed_jobs(&client).await;

    let (status, body) =
        get_json(&client, &format!("/api/workers/{worker_id}/recommendations/basic")).await;

    assert_eq!(status, Status::Ok);
    let data = &body["data"];
    assert_eq!(data["strategy"], "basic");
    assert_eq!(data["jobs"][0]["title"], "Plumbing and wiring");
    assert_eq!(data["jobs"][0]["score"], 2);
    assert_eq!(data["jobs"][1]["score"], 1);
    assert_eq!(data["summary"]["totalJobs"], 2);
    assert_eq!(data["summary"]["aiMatches"], 2);
    assert_eq!(data["summary"]["gpsMatches"], 0);
}

#[rocket::async_test]
async fn ai_recommendations_expose_every_score() {
    let (client, _dir) = client().await;
    let worker_id = create_worker(
        &client,
        json!({
            "name": "Ravi",
            "phone": "9000000002",
            "skills": "plumber",
            "location": "Pune"
        }),
    )
    .await;
    seed_jobs(&client).await;

    let (status, body) =
        get_json(&client, &format!("/api/workers/{worker_id}/recommendations/ai")).await;

    assert_eq!(status, Status::Ok);
    let top = &body["data"]["jobs"][0];
    assert_eq!(top["location"], "Pune");
    assert_eq!(top["locationScore"], 1.0);
    assert!(top["aiScore"].as_f64().unwrap() > 0.0);
    assert!(top["finalScore"].as_f64().unwrap() > body["data"]["jobs"][1]["finalScore"].as_f64().unwrap());
}

#[rocket::async_test]
async fn gps_without_location_asks_for_it() {
    let (client, _dir) = client().await;
    let worker_id =
        create_worker(&client, json!({ "name": "Asha", "phone": "9000000003" })).await;
    seed_jobs(&client).await;

    let (status, body) =
        get_json(&client, &format!("/api/workers/{worker_id}/recommendations/gps")).await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "LOCATION_REQUIRED");
}

#[rocket::async_test]
async fn gps_recommendations_follow_location_updates() {
    let (client, _dir) = client().await;
    let worker_id =
        create_worker(&client, json!({ "name": "Asha", "phone": "9000000004" })).await;
    seed_jobs(&client).await;

    let response = client
        .put(format!("/api/workers/{worker_id}/location"))
        .header(ContentType::JSON)
        .body(json!({ "longitude": 73.8567, "latitude": 18.5204 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let (status, body) = get_json(
        &client,
        &format!("/api/workers/{worker_id}/recommendations/gps?radius_km=5"),
    )
    .await;

    assert_eq!(status, Status::Ok);
    let data = &body["data"];
    assert_eq!(data["maxDistanceMeters"], 5000.0);
    assert_eq!(data["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(data["jobs"][0]["title"], "Plumbing and wiring");
    assert!(data["jobs"][0]["distanceMeters"].as_f64().unwrap() < 1.0);
    assert_eq!(data["jobs"][0]["proximity"], "very_close");
    assert_eq!(data["summary"]["gpsMatches"], 1);

    let (status, body) =
        get_json(&client, &format!("/api/workers/{worker_id}/recommendations/gps")).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["jobs"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["jobs"][1]["location"], "Mumbai");
}

#[rocket::async_test]
async fn negative_radius_is_rejected() {
    let (client, _dir) = client().await;
    let worker_id = create_worker(
        &client,
        json!({ "name": "Asha", "phone": "9000000005", "longitude": 73.8, "latitude": 18.5 }),
    )
    .await;

    let (status, body) = get_json(
        &client,
        &format!("/api/workers/{worker_id}/recommendations/gps?radius_km=-2"),
    )
    .await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "INVALID_RADIUS");
}

#[rocket::async_test]
async fn malformed_radius_is_rejected() {
    let (client, _dir) = client().await;
    let worker_id = create_worker(
        &client,
        json!({ "name": "Asha", "phone": "9000000007", "longitude": 73.8, "latitude": 18.5 }),
    )
    .await;
    seed_jobs(&client).await;

    for raw in ["abc", "5km", "NaN"] {
        let (status, body) = get_json(
            &client,
            &format!("/api/workers/{worker_id}/recommendations/gps?radius_km={raw}"),
        )
        .await;

        assert_eq!(status, Status::BadRequest, "radius_km={raw}");
        assert_eq!(body["error_code"], "INVALID_RADIUS");
    }
}

#[rocket::async_test]
async fn job_without_coordinates_is_rejected() {
    let (client, _dir) = client().await;
    let (status, body) = post_json(
        &client,
        "/api/jobs",
        json!({ "title": "Painter", "location": "Pune", "skillsRequired": ["painter"] }),
    )
    .await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");

    let (_, body) = get_json(&client, "/api/jobs").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[rocket::async_test]
async fn duplicate_phone_conflicts() {
    let (client, _dir) = client().await;
    create_worker(&client, json!({ "name": "Asha", "phone": "9000000006" })).await;

    let (status, body) = post_json(
        &client,
        "/api/workers",
        json!({ "name": "Someone else", "phone": "9000000006" }),
    )
    .await;

    assert_eq!(status, Status::Conflict);
    assert_eq!(body["error_code"], "WORKER_EXISTS");
}

#[rocket::async_test]
async fn unknown_worker_is_not_found() {
    let (client, _dir) = client().await;
    let (status, body) = get_json(&client, "/api/workers/missing/recommendations/basic").await;

    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error_code"], "WORKER_NOT_FOUND");
}

#[rocket::async_test]
async fn profile_update_changes_recommendations() {
    let (client, _dir) = client().await;
    let worker_id = create_worker(
        &client,
        json!({ "name": "Asha", "phone": "9000000010", "skills": ["cook"] }),
    )
    .await;
    seed_jobs(&client).await;

    let uri = format!("/api/workers/{worker_id}/recommendations/basic");
    let (_, body) = get_json(&client, &uri).await;
    assert_eq!(body["data"]["jobs"][0]["score"], 0);

    let (status, body) = put_json(
        &client,
        &format!("/api/workers/{worker_id}"),
        json!({ "skills": "plumber, electrician", "location": "Pune" }),
    )
    .await;
    assert_eq!(status, Status::Ok, "{body}");
    assert_eq!(body["data"]["name"], "Asha");
    assert_eq!(body["data"]["location"], "Pune");

    let (_, body) = get_json(&client, &uri).await;
    assert_eq!(body["data"]["jobs"][0]["title"], "Plumbing and wiring");
    assert_eq!(body["data"]["jobs"][0]["score"], 2);

    let (status, body) = put_json(&client, &format!("/api/workers/{worker_id}"), json!({})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[rocket::async_test]
async fn applications_flow_from_apply_to_job_removal() {
    let (client, _dir) = client().await;
    let (status, body) = post_json(
        &client,
        "/api/employers",
        json!({ "name": "Kulkarni Builders", "phone": "8000000001", "organization": "Kulkarni" }),
    )
    .await;
    assert_eq!(status, Status::Ok, "{body}");
    let employer_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &client,
        "/api/jobs",
        json!({
            "title": "Site plumbing",
            "skillsRequired": ["plumber"],
            "location": "Pune",
            "employerId": employer_id,
            "longitude": 73.8567,
            "latitude": 18.5204
        }),
    )
    .await;
    assert_eq!(status, Status::Ok, "{body}");
    let job_id = body["data"]["id"].as_str().unwrap().to_string();

    let asha = create_worker(
        &client,
        json!({ "name": "Asha", "phone": "9000000011", "skills": ["plumber"] }),
    )
    .await;
    let ravi = create_worker(&client, json!({ "name": "Ravi", "phone": "9000000012" })).await;

    let apply = |worker_id: &str| json!({ "jobId": job_id, "workerId": worker_id });
    let (status, body) = post_json(&client, "/api/applications", apply(&asha)).await;
    assert_eq!(status, Status::Ok, "{body}");
    assert_eq!(body["data"]["status"], "Applied");
    let asha_application = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(&client, "/api/applications", apply(&asha)).await;
    assert_eq!(status, Status::Conflict);
    assert_eq!(body["error_code"], "ALREADY_APPLIED");

    let (_, body) = post_json(&client, "/api/applications", apply(&ravi)).await;
    let ravi_application = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = put_json(
        &client,
        &format!("/api/applications/{asha_application}/accept"),
        json!({}),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["status"], "Accepted");
    put_json(
        &client,
        &format!("/api/applications/{ravi_application}/reject"),
        json!({}),
    )
    .await;

    let (_, body) = get_json(&client, &format!("/api/workers/{asha}/stats")).await;
    assert_eq!(body["data"]["totalApplied"], 1);
    assert_eq!(body["data"]["accepted"], 1);
    assert_eq!(body["data"]["rejected"], 0);
    assert_eq!(body["data"]["totalJobs"], 1);
    assert_eq!(body["data"]["aiMatches"], 1);

    let (_, body) = get_json(&client, &format!("/api/employers/{employer_id}/stats")).await;
    assert_eq!(body["data"]["jobsPosted"], 1);
    assert_eq!(body["data"]["totalApplications"], 2);
    assert_eq!(body["data"]["accepted"], 1);
    assert_eq!(body["data"]["rejected"], 1);
    assert_eq!(body["data"]["pending"], 0);

    let (_, body) = get_json(&client, &format!("/api/jobs/{job_id}/applications")).await;
    let applicants = body["data"].as_array().unwrap();
    assert_eq!(applicants.len(), 2);
    assert!(applicants.iter().any(|a| a["worker"]["name"] == "Ravi"));

    let (_, body) = get_json(&client, &format!("/api/workers/{asha}/applications")).await;
    assert_eq!(body["data"][0]["job"]["title"], "Site plumbing");
    assert_eq!(body["data"][0]["status"], "Accepted");

    let response = client.delete(format!("/api/jobs/{job_id}")).dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let (_, body) = get_json(&client, &format!("/api/workers/{asha}/applications")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    let (_, body) = get_json(&client, &format!("/api/employers/{employer_id}/stats")).await;
    assert_eq!(body["data"]["totalApplications"], 0);
}

#[rocket::async_test]
async fn unknown_application_cannot_be_decided() {
    let (client, _dir) = client().await;
    let (status, body) = put_json(&client, "/api/applications/missing/accept", json!({})).await;

    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error_code"], "APPLICATION_NOT_FOUND");
}

#[rocket::async_test]
async fn job_for_unknown_employer_is_not_found() {
    let (client, _dir) = client().await;
    let (status, body) = post_json(
        &client,
        "/api/jobs",
        json!({
            "title": "Painter",
            "location": "Pune",
            "employerId": "missing",
            "longitude": 73.8567,
            "latitude": 18.5204
        }),
    )
    .await;

    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error_code"], "EMPLOYER_NOT_FOUND");
}

#[rocket::async_test]
async fn duplicate_employer_phone_conflicts() {
    let (client, _dir) = client().await;
    let employer = json!({ "name": "Kulkarni Builders", "phone": "8000000002" });
    let (status, _) = post_json(&client, "/api/employers", employer.clone()).await;
    assert_eq!(status, Status::Ok);

    let (status, body) = post_json(&client, "/api/employers", employer).await;
    assert_eq!(status, Status::Conflict);
    assert_eq!(body["error_code"], "EMPLOYER_EXISTS");

    let (_, body) = get_json(&client, "/api/employers").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
