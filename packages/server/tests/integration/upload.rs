use crate::common::{TestApp, UploadForm, routes};

const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

mod accepted {
    use super::*;

    #[tokio::test]
    async fn uploaded_resource_is_searchable() {
        let app = TestApp::spawn().await;
        let pdf = vec![b'%'; 2 * 1024 * 1024];

        let res = app
            .upload(UploadForm::valid("Calculus Notes").with_file(
                "calculus.pdf",
                "application/pdf",
                pdf,
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        let resource = &res.body["resource"];
        assert_eq!(resource["title"], "Calculus Notes");
        assert_eq!(resource["fileType"], "application/pdf");
        assert_eq!(resource["fileName"], "calculus.pdf");
        assert_eq!(resource["course"], "B.Tech");

        let listed = app
            .get_query(
                routes::RESOURCES,
                &[("course", "B.Tech"), ("specialization", "CSE")],
            )
            .await;
        assert_eq!(listed.status, 200);
        assert_eq!(listed.titles(), ["Calculus Notes"]);
        assert_eq!(listed.body[0]["id"], resource["id"]);
    }

    #[tokio::test]
    async fn stored_file_is_retrievable_from_its_url() {
        let app = TestApp::spawn().await;
        let bytes = b"%PDF-1.7 lecture 4".to_vec();

        let res = app
            .upload(UploadForm::valid("Lecture Four").with_file(
                "lecture 4.pdf",
                "application/pdf",
                bytes.clone(),
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let url = res.body["resource"]["fileUrl"].as_str().unwrap();
        assert!(url.starts_with(&app.url("/files/")), "{url}");
        assert!(url.ends_with("/lecture_4.pdf"), "{url}");

        let fetched = app.client.get(url).send().await.unwrap();
        assert_eq!(fetched.status(), 200);
        assert_eq!(
            fetched.headers()["content-type"].to_str().unwrap(),
            "application/pdf"
        );
        assert_eq!(fetched.bytes().await.unwrap().as_ref(), bytes.as_slice());
    }

    #[tokio::test]
    async fn file_is_served_with_its_declared_type() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(UploadForm::valid("Circuit Scan").with_file(
                "scan",
                "image/png",
                b"\x89PNG".to_vec(),
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let url = res.body["resource"]["fileUrl"].as_str().unwrap();
        let fetched = app.client.get(url).send().await.unwrap();
        assert_eq!(fetched.status(), 200);
        assert_eq!(
            fetched.headers()["content-type"].to_str().unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn file_of_exactly_the_maximum_size_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(UploadForm::valid("Boundary Scan").with_file(
                "scan.png",
                "image/png",
                vec![0u8; MAX_FILE_SIZE],
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["resource"]["fileType"], "image/png");
    }

    #[tokio::test]
    async fn title_of_three_characters_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app.upload(UploadForm::valid("DSA")).await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn fields_are_measured_and_stored_as_submitted() {
        let app = TestApp::spawn().await;
        let mut form = UploadForm::valid("ab ");
        form.category = Some(" QP".into());

        let res = app.upload(form).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["resource"]["title"], "ab ");
        assert_eq!(res.body["resource"]["category"], " QP");
    }

    #[tokio::test]
    async fn blank_description_is_stored_as_absent() {
        let app = TestApp::spawn().await;
        let mut form = UploadForm::valid("Operating Systems");
        form.description = Some("   ".into());

        let res = app.upload(form).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["resource"]["description"].is_null());
    }

    #[tokio::test]
    async fn taxonomy_is_optional_when_not_required() {
        let app = TestApp::spawn_with(|cfg| cfg.upload.require_taxonomy = false).await;
        let mut form = UploadForm::valid("General Handbook");
        form.course = None;
        form.specialization = None;

        let res = app.upload(form).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["resource"]["course"].is_null());
    }
}

mod rejected {
    use super::*;

    #[tokio::test]
    async fn missing_file() {
        let app = TestApp::spawn().await;
        let mut form = UploadForm::valid("No Attachment");
        form.file = None;

        let res = app.upload(form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn file_one_byte_over_the_maximum() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(UploadForm::valid("Too Big").with_file(
                "big.pdf",
                "application/pdf",
                vec![0u8; MAX_FILE_SIZE + 1],
            ))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["error"], "File size exceeds 10MB limit");
        assert_eq!(app.get(routes::RESOURCES).await.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn disallowed_mime_type() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(UploadForm::valid("Slides").with_file(
                "slides.zip",
                "application/zip",
                b"PK".to_vec(),
            ))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["error"],
            "Invalid file type. Only PDF and images are allowed."
        );
    }

    #[tokio::test]
    async fn title_of_two_characters_is_a_field_error() {
        let app = TestApp::spawn().await;

        let res = app.upload(UploadForm::valid("DS")).await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["error"], "Validation failed");
        assert_eq!(
            res.body["details"]["title"],
            serde_json::json!(["Title must be at least 3 characters"])
        );
    }

    #[tokio::test]
    async fn every_invalid_field_is_reported() {
        let app = TestApp::spawn().await;
        let form = UploadForm {
            title: Some("x".into()),
            description: Some("d".repeat(501)),
            category: None,
            course: None,
            specialization: Some("s".repeat(51)),
            ..UploadForm::valid("unused")
        };

        let res = app.upload(form).await;

        assert_eq!(res.status, 400, "{}", res.text);
        let details = res.body["details"].as_object().unwrap();
        let mut fields: Vec<_> = details.keys().map(String::as_str).collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            ["category", "course", "description", "specialization", "title"]
        );
        assert_eq!(details["course"], serde_json::json!(["Course is required"]));
    }

    #[tokio::test]
    async fn rejected_upload_leaves_no_blob_behind() {
        let app = TestApp::spawn().await;

        let res = app.upload(UploadForm::valid("DS")).await;
        assert_eq!(res.status, 400);

        let entries: Vec<_> = std::fs::read_dir(app.blob_dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name() != ".tmp")
            .collect();
        assert!(entries.is_empty(), "unexpected blobs: {entries:?}");
    }

    #[tokio::test]
    async fn unknown_blob_key_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get("/files/0190f3a2-0000-7000-8000-000000000000/none.pdf").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
