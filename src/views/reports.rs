use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use super::posts::{load_media, PostDetails};
use super::{refetch, ActionError};
use crate::backend::{ApiError, BackendApi, ReportDecision};
use crate::collection::{loader, CollectionView};
use crate::constants::UNKNOWN_USER;
use crate::models::{Report, TargetType, UserDetails};
use crate::table::{compare_text, contains_text, TableSpec};

/// A report with its display-only fields resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub report: Report,
    pub target_type: TargetType,
    pub reporter_name: String,
    pub target_name: String,
}

impl ReportRow {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.report.report_id
    }

    /// Warn and block apply to pending reports against a user.
    #[must_use]
    pub fn allows_user_actions(&self) -> bool {
        self.report.is_pending() && self.target_type == TargetType::User
    }

    #[must_use]
    pub fn allows_post_delete(&self) -> bool {
        self.target_type == TargetType::Post
    }

    #[must_use]
    pub fn allows_decision(&self) -> bool {
        self.report.is_pending()
    }
}

/// Every user id a list of reports refers to, de-duplicated.
#[must_use]
pub fn referenced_user_ids(reports: &[Report]) -> HashSet<String> {
    reports
        .iter()
        .flat_map(|r| [r.reporter_user_id.as_ref(), r.reported_user_id.as_ref()])
        .flatten()
        .cloned()
        .collect()
}

/// Attach usernames to reports; unresolved ids become "Unknown User".
#[must_use]
pub fn enrich(reports: Vec<Report>, names: &HashMap<String, String>) -> Vec<ReportRow> {
    let name_of = |id: Option<&String>| {
        id.and_then(|id| names.get(id))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    };
    reports
        .into_iter()
        .map(|report| ReportRow {
            target_type: report.target_type(),
            reporter_name: name_of(report.reporter_user_id.as_ref()),
            target_name: name_of(report.reported_user_id.as_ref()),
            report,
        })
        .collect()
}

/// Fetch all reports and resolve their usernames in one batch.
///
/// # Errors
///
/// Returns an error if the report list cannot be fetched. Failed username
/// lookups do not fail the load.
pub async fn load_report_rows(
    api: &BackendApi,
    concurrency: usize,
) -> Result<Vec<ReportRow>, ApiError> {
    let reports = api.list_reports().await?;
    let ids = referenced_user_ids(&reports);
    let names = api.resolve_usernames(&ids, concurrency).await;
    debug!(
        reports = reports.len(),
        ids = ids.len(),
        resolved = names.len(),
        "Loaded reports"
    );
    Ok(enrich(reports, &names))
}

/// Reports table: filter and sort on reason.
#[must_use]
pub fn reports_table_spec(page_size: usize) -> TableSpec<ReportRow> {
    TableSpec::new(
        |row: &ReportRow, q: &str| contains_text(&row.report.reason, q),
        page_size,
    )
    .sortable("reason", |a: &ReportRow, b: &ReportRow| {
        compare_text(&a.report.reason, &b.report.reason)
    })
}

/// Contents of the report details dialog.
#[derive(Debug, Clone)]
pub enum ReportDetails {
    Post(PostDetails),
    User(UserDetails),
}

pub struct ReportsView {
    api: BackendApi,
    collection: Arc<CollectionView<ReportRow>>,
}

impl ReportsView {
    #[must_use]
    pub fn new(api: BackendApi, page_size: usize, lookup_concurrency: usize) -> Self {
        let fetch_api = api.clone();
        let fetch = loader(move || {
            let api = fetch_api.clone();
            async move { load_report_rows(&api, lookup_concurrency).await }
        });
        Self {
            api,
            collection: Arc::new(CollectionView::new(
                "reports",
                fetch,
                reports_table_spec(page_size),
            )),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &Arc<CollectionView<ReportRow>> {
        &self.collection
    }

    fn find(&self, report_id: &str) -> Result<ReportRow, ActionError> {
        self.collection
            .rows()
            .into_iter()
            .find(|row| row.id() == report_id)
            .ok_or_else(|| ActionError::NotFound {
                kind: "Report",
                id: report_id.to_string(),
            })
    }

    fn reported_user(row: &ReportRow) -> Result<&str, ActionError> {
        row.report
            .reported_user_id
            .as_deref()
            .ok_or(ActionError::NotAllowed("Report has no reported user"))
    }

    /// Target of the report: the reported post with its media, or the
    /// reported user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the report is unknown or the target cannot be loaded.
    pub async fn details(&self, report_id: &str) -> Result<ReportDetails, ActionError> {
        let row = self.find(report_id)?;
        if let Some(post_id) = row.report.reported_post_id.as_deref() {
            let post = self
                .api
                .get_post(post_id)
                .await
                .map_err(ActionError::step("Load reported post"))?;
            let media = load_media(&self.api, post_id).await;
            return Ok(ReportDetails::Post(PostDetails { post, media }));
        }

        let user_id = Self::reported_user(&row)?;
        let user = self
            .api
            .get_user(user_id)
            .await
            .map_err(ActionError::step("Load reported user"))?;
        Ok(ReportDetails::User(user))
    }

    /// Send a warning to the reported user.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is a pending user report, or if
    /// the backend call fails.
    pub async fn warn_target(&self, report_id: &str) -> Result<String, ActionError> {
        let row = self.find(report_id)?;
        if !row.allows_user_actions() {
            return Err(ActionError::NotAllowed(
                "Only pending reports against a user can be warned",
            ));
        }
        let user_id = Self::reported_user(&row)?;
        self.api
            .warn_user(user_id)
            .await
            .map_err(ActionError::step("Send warning"))?;
        info!(report_id, user_id, "Reported user warned");
        refetch(&self.collection).await;
        Ok("User warned successfully".to_string())
    }

    /// Block the reported user.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is a pending user report, or if
    /// the backend call fails.
    pub async fn block_target(&self, report_id: &str) -> Result<String, ActionError> {
        let row = self.find(report_id)?;
        if !row.allows_user_actions() {
            return Err(ActionError::NotAllowed(
                "Only pending reports against a user can be blocked",
            ));
        }
        let user_id = Self::reported_user(&row)?;
        self.api
            .block_user(user_id)
            .await
            .map_err(ActionError::step("Block user"))?;
        info!(report_id, user_id, "Reported user blocked");
        refetch(&self.collection).await;
        Ok("User blocked successfully".to_string())
    }

    /// Delete the reported post, notify its owner, then tell the reporter.
    ///
    /// # Errors
    ///
    /// Returns an error for a report without a post, or the first failing
    /// step; earlier steps are not rolled back.
    pub async fn delete_reported_post(&self, report_id: &str) -> Result<String, ActionError> {
        let row = self.find(report_id)?;
        let Some(post_id) = row.report.reported_post_id.as_deref() else {
            return Err(ActionError::NotAllowed("Report does not reference a post"));
        };

        self.api
            .delete_post(post_id)
            .await
            .map_err(ActionError::step("Delete post"))?;
        info!(report_id, post_id, "Reported post deleted");

        if let Some(owner) = row.report.reported_user_id.as_deref() {
            self.api
                .warn_post_owner(owner)
                .await
                .map_err(ActionError::step("Notify post owner"))?;
        }
        if let Some(reporter) = row.report.reporter_user_id.as_deref() {
            self.api
                .respond_to_reporter(reporter)
                .await
                .map_err(ActionError::step("Notify reporter"))?;
        }

        refetch(&self.collection).await;
        Ok("Post deleted successfully".to_string())
    }

    /// Mark a pending report resolved or dismissed.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is pending, or if the backend
    /// call fails.
    pub async fn decide(
        &self,
        report_id: &str,
        decision: ReportDecision,
    ) -> Result<String, ActionError> {
        let row = self.find(report_id)?;
        if !row.allows_decision() {
            return Err(ActionError::NotAllowed("Report is no longer pending"));
        }
        self.api
            .change_report_status(report_id, decision)
            .await
            .map_err(ActionError::step("Update report status"))?;
        info!(report_id, status = decision.as_str(), "Report status changed");
        refetch(&self.collection).await;
        Ok(format!("Report marked as {}", decision.past_tense()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ids_are_deduplicated() {
        let reports = vec![
            report(json!({"reportId": 1, "reporterUserId": 10, "reportedUserId": 20})),
            report(json!({"reportId": 2, "reporterUserId": 10, "reportedUserId": 30})),
        ];
        let ids = referenced_user_ids(&reports);
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("10"));
    }

    #[test]
    fn test_enrich_uses_placeholder() {
        let reports = vec![
            report(json!({"reportId": 1, "reporterUserId": 10, "reportedUserId": 20, "reason": "spam"})),
            report(json!({"reportId": 2, "reportedPostId": 5, "reason": "nsfw"})),
        ];
        let names = HashMap::from([("10".to_string(), "ana".to_string())]);

        let rows = enrich(reports, &names);
        assert_eq!(rows[0].reporter_name, "ana");
        assert_eq!(rows[0].target_name, "Unknown User");
        assert_eq!(rows[0].target_type, TargetType::User);
        assert_eq!(rows[1].reporter_name, "Unknown User");
        assert_eq!(rows[1].target_type, TargetType::Post);
    }

    #[test]
    fn test_action_gating() {
        let names = HashMap::new();
        let rows = enrich(
            vec![
                report(json!({"reportId": 1, "reportedUserId": 2, "reportStatus": "PENDING"})),
                report(json!({"reportId": 2, "reportedUserId": 2, "reportStatus": "RESOLVED"})),
                report(json!({"reportId": 3, "reportedPostId": 9, "reportStatus": "PENDING"})),
            ],
            &names,
        );

        assert!(rows[0].allows_user_actions());
        assert!(rows[0].allows_decision());
        assert!(!rows[1].allows_user_actions());
        assert!(!rows[1].allows_decision());
        assert!(!rows[2].allows_user_actions());
        assert!(rows[2].allows_post_delete());
    }
}
