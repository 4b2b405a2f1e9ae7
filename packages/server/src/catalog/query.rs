use chrono::{DateTime, Duration, Utc};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{BinOper, ExprTrait, Func};
use sea_orm::*;

use crate::entity::resource;
use crate::models::resource::ResourceQuery;
use crate::models::shared::{ALL_SENTINEL, escape_like, non_empty};

/// Window used for the "recent" count in [`ResourceStats`].
const RECENT_WINDOW_HOURS: i64 = 24;

/// Conjunction of optional resource constraints. `None` means unconstrained.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    pub text: Option<String>,
    pub category: Option<String>,
    pub course: Option<String>,
    pub specialization: Option<String>,
}

fn filter_value(value: Option<String>) -> Option<String> {
    non_empty(value).filter(|v| v != ALL_SENTINEL)
}

/// `LOWER(column) LIKE LOWER(pattern)`, so both sides fold case the same way.
/// Postgres treats backslash as the LIKE escape character.
fn contains_ignoring_case(column: resource::Column, pattern: &str) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
        .binary(BinOper::Like, Func::lower(Expr::val(pattern)))
}

impl From<ResourceQuery> for ResourceFilter {
    fn from(query: ResourceQuery) -> Self {
        Self {
            text: non_empty(query.q),
            category: filter_value(query.category),
            course: filter_value(query.course),
            specialization: filter_value(query.specialization),
        }
    }
}

impl ResourceFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.text.is_none()
            && self.category.is_none()
            && self.course.is_none()
            && self.specialization.is_none()
    }

    /// All supplied constraints AND-ed together.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(text) = &self.text {
            let pattern = format!("%{}%", escape_like(text));
            cond = cond.add(
                Condition::any()
                    .add(contains_ignoring_case(resource::Column::Title, &pattern))
                    .add(contains_ignoring_case(
                        resource::Column::Description,
                        &pattern,
                    )),
            );
        }
        if let Some(category) = &self.category {
            cond = cond.add(resource::Column::Category.eq(category.as_str()));
        }
        if let Some(course) = &self.course {
            cond = cond.add(resource::Column::Course.eq(course.as_str()));
        }
        if let Some(specialization) = &self.specialization {
            cond = cond.add(resource::Column::Specialization.eq(specialization.as_str()));
        }

        cond
    }

    /// Filtered, unordered selection.
    fn base_select(&self) -> Select<resource::Entity> {
        let select = resource::Entity::find();
        if self.is_unconstrained() {
            select
        } else {
            select.filter(self.condition())
        }
    }

    /// Filtered selection ordered newest first.
    pub fn select(&self) -> Select<resource::Entity> {
        self.base_select()
            .order_by_desc(resource::Column::CreatedAt)
            .order_by_desc(resource::Column::Id)
    }
}

/// Summary counts over a filtered resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStats {
    pub total: u64,
    pub categories: u64,
    pub recent: u64,
}

pub struct ResourceService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ResourceService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Every resource matching `filter`, newest first. An empty result is not an error.
    pub async fn search(&self, filter: &ResourceFilter) -> Result<Vec<resource::Model>, DbErr> {
        filter.select().all(self.conn).await
    }

    /// Totals for the resources matching `filter`, relative to `now`.
    pub async fn stats(
        &self,
        filter: &ResourceFilter,
        now: DateTime<Utc>,
    ) -> Result<ResourceStats, DbErr> {
        let total = filter.base_select().count(self.conn).await?;

        let categories = filter
            .base_select()
            .select_only()
            .column(resource::Column::Category)
            .distinct()
            .into_tuple::<String>()
            .all(self.conn)
            .await?
            .len() as u64;

        let since = now - Duration::hours(RECENT_WINDOW_HOURS);
        let recent = filter
            .base_select()
            .filter(resource::Column::CreatedAt.gt(since))
            .count(self.conn)
            .await?;

        Ok(ResourceStats {
            total,
            categories,
            recent,
        })
    }

    /// Distinct categories in use, sorted.
    pub async fn categories(&self) -> Result<Vec<String>, DbErr> {
        resource::Entity::find()
            .select_only()
            .column(resource::Column::Category)
            .distinct()
            .order_by_asc(resource::Column::Category)
            .into_tuple::<String>()
            .all(self.conn)
            .await
    }
}
