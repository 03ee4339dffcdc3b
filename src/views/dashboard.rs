use std::cmp::Reverse;
use std::sync::Arc;

use super::format::percent_of;
use crate::backend::{ApiError, BackendApi};
use crate::collection::{loader, Remote};
use crate::constants::DASHBOARD_NOTIFICATION_COUNT;
use crate::models::Notification;

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardMetrics {
    pub total_users: u64,
    pub active_users: u64,
    pub active_posts: u64,
    pub reported_users: u64,
    pub total_posts: u64,
    /// Newest first.
    pub notifications: Vec<Notification>,
}

impl DashboardMetrics {
    #[must_use]
    pub fn active_user_share(&self) -> String {
        format!(
            "{} of total users",
            percent_of(self.active_users, self.total_users)
        )
    }

    #[must_use]
    pub fn reported_user_share(&self) -> String {
        format!(
            "{} of total users",
            percent_of(self.reported_users, self.total_users)
        )
    }

    #[must_use]
    pub fn recent_notifications(&self) -> &[Notification] {
        let n = self.notifications.len().min(DASHBOARD_NOTIFICATION_COUNT);
        &self.notifications[..n]
    }
}

/// Newest first; notifications without a parseable timestamp go last.
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by_key(|n| Reverse(n.created_at()));
}

/// Fetch every dashboard figure concurrently. Any failure fails the whole
/// load so the page keeps showing the previous figures.
///
/// # Errors
///
/// Returns the first backend error.
pub async fn load_metrics(api: &BackendApi) -> Result<DashboardMetrics, ApiError> {
    let (total_users, active_users, active_posts, reported_users, posts, mut notifications) =
        tokio::try_join!(
            api.total_users(),
            api.total_active_users(),
            api.total_active_posts(),
            api.total_reported_users(),
            api.list_posts(),
            api.admin_notifications(),
        )?;

    sort_newest_first(&mut notifications);

    Ok(DashboardMetrics {
        total_users,
        active_users,
        active_posts,
        reported_users,
        total_posts: posts.len() as u64,
        notifications,
    })
}

pub struct DashboardView {
    remote: Arc<Remote<DashboardMetrics>>,
}

impl DashboardView {
    #[must_use]
    pub fn new(api: BackendApi) -> Self {
        let fetch = loader(move || {
            let api = api.clone();
            async move { load_metrics(&api).await }
        });
        Self {
            remote: Remote::new("dashboard", fetch),
        }
    }

    #[must_use]
    pub fn remote(&self) -> &Arc<Remote<DashboardMetrics>> {
        &self.remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(id: u32, created_at: Option<&str>) -> Notification {
        serde_json::from_value(json!({
            "id": id, "sender": "system", "message": "m", "createdAt": created_at
        }))
        .unwrap()
    }

    #[test]
    fn test_notifications_newest_first() {
        let mut list = vec![
            notification(1, Some("2025-03-01T10:00:00Z")),
            notification(2, None),
            notification(3, Some("2025-03-03T10:00:00Z")),
            notification(4, Some("2025-03-02T10:00:00Z")),
        ];
        sort_newest_first(&mut list);
        let ids: Vec<_> = list.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4", "1", "2"]);
    }

    #[test]
    fn test_shares_and_recent() {
        let metrics = DashboardMetrics {
            total_users: 8,
            active_users: 3,
            active_posts: 10,
            reported_users: 1,
            total_posts: 12,
            notifications: (0..5).map(|i| notification(i, None)).collect(),
        };
        assert_eq!(metrics.active_user_share(), "37.5% of total users");
        assert_eq!(metrics.reported_user_share(), "12.5% of total users");
        assert_eq!(metrics.recent_notifications().len(), 3);
    }
}
