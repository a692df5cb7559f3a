//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{DailyClicks, DimensionStats, LinkAnalytics, NewClick};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct DimensionRow {
    name: String,
    unique_clicks: i64,
    unique_users: i64,
}

impl From<DimensionRow> for DimensionStats {
    fn from(r: DimensionRow) -> Self {
        DimensionStats {
            name: r.name,
            unique_clicks: r.unique_clicks,
            unique_users: r.unique_users,
        }
    }
}

#[derive(FromRow)]
struct DailyRow {
    day: NaiveDate,
    clicks: i64,
}

/// PostgreSQL repository for click analytics.
///
/// Each click is applied in one transaction using atomic increments and
/// per-bucket upserts, so concurrent clicks on the same link never
/// overwrite each other's counts.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn record_click(&self, alias: &str, click: &NewClick) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // A click older than the link belongs to a deleted link that held
        // the same alias.
        let link_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE links SET total_clicks = total_clicks + 1
            WHERE alias = $1 AND created_at <= $2
            RETURNING id
            "#,
        )
        .bind(alias)
        .bind(click.clicked_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(link_id) = link_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            r#"
            INSERT INTO link_os_stats (link_id, os_name, unique_clicks, unique_users)
            VALUES ($1, $2, 1, 1)
            ON CONFLICT (link_id, os_name) DO UPDATE
            SET unique_clicks = link_os_stats.unique_clicks + 1,
                unique_users = link_os_stats.unique_users + 1
            "#,
        )
        .bind(link_id)
        .bind(&click.os_type)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO link_device_stats (link_id, device_name, unique_clicks, unique_users)
            VALUES ($1, $2, 1, 1)
            ON CONFLICT (link_id, device_name) DO UPDATE
            SET unique_clicks = link_device_stats.unique_clicks + 1,
                unique_users = link_device_stats.unique_users + 1
            "#,
        )
        .bind(link_id)
        .bind(&click.device_type)
        .execute(&mut *tx)
        .await?;

        if let Some(ip) = &click.ip {
            let inserted = sqlx::query(
                r#"
                INSERT INTO link_unique_ips (link_id, ip)
                VALUES ($1, $2)
                ON CONFLICT (link_id, ip) DO NOTHING
                "#,
            )
            .bind(link_id)
            .bind(ip)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted == 1 {
                sqlx::query("UPDATE links SET unique_clicks = unique_clicks + 1 WHERE id = $1")
                    .bind(link_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query(
            r#"
            INSERT INTO link_daily_clicks (link_id, day, clicks)
            VALUES ($1, $2, 1)
            ON CONFLICT (link_id, day) DO UPDATE
            SET clicks = link_daily_clicks.clicks + 1
            "#,
        )
        .bind(link_id)
        .bind(click.day())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn get_analytics(&self, link_id: i64) -> Result<LinkAnalytics, AppError> {
        let totals: Option<(i64, i64)> =
            sqlx::query_as("SELECT total_clicks, unique_clicks FROM links WHERE id = $1")
                .bind(link_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        let Some((total_clicks, unique_clicks)) = totals else {
            return Ok(LinkAnalytics::default());
        };

        let os_type = sqlx::query_as::<_, DimensionRow>(
            r#"
            SELECT os_name AS name, unique_clicks, unique_users
            FROM link_os_stats
            WHERE link_id = $1
            ORDER BY first_seen_at, os_name
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let device_type = sqlx::query_as::<_, DimensionRow>(
            r#"
            SELECT device_name AS name, unique_clicks, unique_users
            FROM link_device_stats
            WHERE link_id = $1
            ORDER BY first_seen_at, device_name
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let clicks_by_date = sqlx::query_as::<_, DailyRow>(
            "SELECT day, clicks FROM link_daily_clicks WHERE link_id = $1 ORDER BY day",
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(LinkAnalytics {
            total_clicks,
            unique_clicks,
            os_type: os_type.into_iter().map(DimensionStats::from).collect(),
            device_type: device_type.into_iter().map(DimensionStats::from).collect(),
            clicks_by_date: clicks_by_date
                .into_iter()
                .map(|r| DailyClicks {
                    date: r.day,
                    clicks: r.clicks,
                })
                .collect(),
        })
    }
}
