use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::catalog::{TaxonomyError, TaxonomyService};
use crate::entity::resource;

/// Built-in course taxonomy: each course with its specializations.
pub const COURSES: &[(&str, &[&str])] = &[
    ("B.Tech", &["CSE", "ECE", "ME", "CE", "EE"]),
    (
        "MCA",
        &["Cloud Computing", "AI", "Data Science", "Cyber Security"],
    ),
    ("M.Tech", &["CSE", "VLSI", "Power Systems"]),
    ("BCA", &["General", "AI", "Data Science"]),
];

/// Counts of rows that did not exist before a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub courses: u32,
    pub specializations: u32,
}

/// Insert the built-in taxonomy. Existing rows are left alone, so this can
/// run on every startup.
pub async fn seed_taxonomy<C: ConnectionTrait>(db: &C) -> Result<SeedReport, TaxonomyError> {
    let service = TaxonomyService::new(db);
    let mut report = SeedReport::default();

    for &(course_name, specializations) in COURSES {
        let course = service.upsert_course(course_name).await?;
        if course.created {
            report.courses += 1;
        }

        for &name in specializations {
            let spec = service
                .upsert_specialization(name, course.model.id)
                .await?;
            if spec.created {
                report.specializations += 1;
            }
        }
    }

    if report.courses > 0 || report.specializations > 0 {
        info!(
            "Seeded {} new courses and {} new specializations",
            report.courses, report.specializations
        );
    }

    Ok(report)
}

/// Ensure indexes that schema-sync does not derive from the entities.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) {
    // GET /resources?course=..&specialization=..
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_resource_course_specialization")
        .table(resource::Entity)
        .col(resource::Column::Course)
        .col(resource::Column::Specialization)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_resource_course_specialization exists"),
        Err(e) => warn!(
            "Failed to create index idx_resource_course_specialization: {}",
            e
        ),
    }
}
