//! DTOs for the analytics endpoint.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::{DailyClicks, DimensionStats, LinkAnalytics};

/// Analytics of a single link.
///
/// The set of visitor IPs behind `uniqueClicks` is never exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub alias: String,
    pub short_url: String,
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub clicks_by_date: Vec<DailyClicksItem>,
    pub os_type: Vec<OsTypeItem>,
    pub device_type: Vec<DeviceTypeItem>,
}

#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    /// `YYYY-MM-DD`, UTC.
    pub date: NaiveDate,
    pub clicks: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsTypeItem {
    pub os_name: String,
    pub unique_clicks: i64,
    pub unique_users: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeItem {
    pub device_name: String,
    pub unique_clicks: i64,
    pub unique_users: i64,
}

impl AnalyticsResponse {
    pub fn new(alias: String, short_url: String, analytics: LinkAnalytics) -> Self {
        Self {
            alias,
            short_url,
            total_clicks: analytics.total_clicks,
            unique_clicks: analytics.unique_clicks,
            clicks_by_date: analytics
                .clicks_by_date
                .into_iter()
                .map(|DailyClicks { date, clicks }| DailyClicksItem { date, clicks })
                .collect(),
            os_type: analytics
                .os_type
                .into_iter()
                .map(|d: DimensionStats| OsTypeItem {
                    os_name: d.name,
                    unique_clicks: d.unique_clicks,
                    unique_users: d.unique_users,
                })
                .collect(),
            device_type: analytics
                .device_type
                .into_iter()
                .map(|d: DimensionStats| DeviceTypeItem {
                    device_name: d.name,
                    unique_clicks: d.unique_clicks,
                    unique_users: d.unique_users,
                })
                .collect(),
        }
    }
}
