use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use library_server::entity::{course, specialization};

use crate::common::{TestApp, routes};

mod listing {
    use super::*;

    #[tokio::test]
    async fn seeded_taxonomy_is_listed_with_specializations() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::COURSES).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let courses = res.body.as_array().unwrap();
        let mut names: Vec<_> = courses.iter().map(|c| c["name"].as_str().unwrap()).collect();
        names.sort_unstable();
        assert_eq!(names, ["B.Tech", "BCA", "M.Tech", "MCA"]);

        let mca = courses.iter().find(|c| c["name"] == "MCA").unwrap();
        let specs: Vec<_> = mca["specializations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(specs, ["AI", "Cloud Computing", "Cyber Security", "Data Science"]);
        assert_eq!(mca["specializations"][0]["courseId"], mca["id"]);
    }

    #[tokio::test]
    async fn courses_are_ordered_by_name() {
        let app = TestApp::spawn().await;
        app.create_course("Zoology").await;
        app.create_course("Anthropology").await;

        let res = app.get(routes::COURSES).await;

        let names: Vec<_> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.first(), Some(&"Anthropology"));
        assert_eq!(names.last(), Some(&"Zoology"));
    }

    #[tokio::test]
    async fn course_without_specializations_has_empty_list() {
        let app = TestApp::spawn().await;
        app.create_course("Diploma").await;

        let res = app.get(routes::COURSES).await;

        let diploma = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == "Diploma")
            .unwrap();
        assert_eq!(diploma["specializations"], json!([]));
    }
}

mod upsert {
    use super::*;

    #[tokio::test]
    async fn course_upsert_is_idempotent() {
        let app = TestApp::spawn().await;

        let first = app.create_course("MBA").await;
        let second = app.create_course("MBA").await;

        assert_eq!(first, second);
        let rows = course::Entity::find()
            .filter(course::Column::Name.eq("MBA"))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn course_name_is_trimmed() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::COURSES, &json!({ "type": "course", "name": "  MBA  " }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "MBA");
        assert_eq!(app.create_course("MBA").await, res.id());
    }

    #[tokio::test]
    async fn same_specialization_name_under_different_courses() {
        let app = TestApp::spawn().await;
        let mba = app.create_course("MBA").await;
        let bba = app.create_course("BBA").await;

        let a = app
            .post_json(
                routes::COURSES,
                &json!({ "type": "specialization", "name": "Finance", "courseId": mba }),
            )
            .await;
        let b = app
            .post_json(
                routes::COURSES,
                &json!({ "type": "specialization", "name": "Finance", "courseId": bba }),
            )
            .await;

        assert_eq!(a.status, 200, "{}", a.text);
        assert_eq!(b.status, 200, "{}", b.text);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.body["courseId"], mba);
        assert_eq!(b.body["courseId"], bba);
    }

    #[tokio::test]
    async fn repeated_specialization_is_a_no_op() {
        let app = TestApp::spawn().await;
        let mba = app.create_course("MBA").await;
        let body = json!({ "type": "specialization", "name": "Marketing", "courseId": mba });

        let first = app.post_json(routes::COURSES, &body).await;
        let second = app.post_json(routes::COURSES, &body).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert_eq!(first.id(), second.id());
        let rows = specialization::Entity::find()
            .filter(specialization::Column::Name.eq("Marketing"))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn seeded_specialization_is_returned_not_duplicated() {
        let app = TestApp::spawn().await;
        let btech = app.create_course("B.Tech").await;

        let res = app
            .post_json(
                routes::COURSES,
                &json!({ "type": "specialization", "name": "CSE", "courseId": btech }),
            )
            .await;

        assert_eq!(res.status, 200);
        let rows = specialization::Entity::find()
            .filter(specialization::Column::Name.eq("CSE"))
            .count(&app.db)
            .await
            .unwrap();
        // B.Tech and M.Tech each carry one.
        assert_eq!(rows, 2);
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::COURSES, &json!({ "type": "faculty", "name": "Science" }))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_course_id_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::COURSES,
                &json!({ "type": "specialization", "name": "Robotics", "courseId": 999_999 }),
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["error"], "Course 999999 does not exist");
    }

    #[tokio::test]
    async fn name_length_is_checked() {
        let app = TestApp::spawn().await;

        let blank = app
            .post_json(routes::COURSES, &json!({ "type": "course", "name": "   " }))
            .await;
        assert_eq!(blank.status, 400);
        assert_eq!(blank.body["details"]["name"], json!(["Name is required"]));

        let long = app
            .post_json(
                routes::COURSES,
                &json!({ "type": "course", "name": "x".repeat(51) }),
            )
            .await;
        assert_eq!(long.status, 400);
        assert_eq!(
            long.body["details"]["name"],
            json!(["Name must be at most 50 characters"])
        );
    }

    #[tokio::test]
    async fn non_json_body_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(app.url(routes::COURSES))
            .body("type=course&name=MBA")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 400);
    }
}
