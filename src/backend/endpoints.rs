//! Typed wrappers over the backend REST resources.

use std::collections::{HashMap, HashSet};

use futures_util::{stream, StreamExt};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use super::{decode, ApiError, Gateway};
use crate::models::{NewAdminRecord, Notification, Post, PostMedia, Report, User, UserDetails};

/// Final state a pending report can be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDecision {
    Resolved,
    Dismissed,
}

impl ReportDecision {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "RESOLVED",
            Self::Dismissed => "DISMISSED",
        }
    }

    #[must_use]
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

#[derive(Clone)]
pub struct BackendApi {
    gateway: Gateway,
}

impl BackendApi {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    // Users

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a user list.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.gateway.get("users").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    pub async fn get_user(&self, user_id: &str) -> Result<UserDetails, ApiError> {
        self.gateway.get(&format!("users/{}", encode(user_id))).await
    }

    /// Resolve a user id from an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no id.
    pub async fn user_id_by_email(&self, email: &str) -> Result<String, ApiError> {
        let path = format!("users/getByEmail/{}", encode(email));
        let value = self.gateway.send(&path, Method::GET).await?;
        extract_id(&value).ok_or_else(|| {
            let source = <serde_json::Error as serde::de::Error>::custom(format!(
                "no user id in {value}"
            ));
            ApiError::Decode { path, source }
        })
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn approve_user(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("users/approveUser/{}", encode(user_id));
        self.gateway.send(&path, Method::PUT).await.map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn block_user(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("users/rejectUser/{}", encode(user_id));
        self.gateway.send(&path, Method::PUT).await.map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a count.
    pub async fn total_users(&self) -> Result<u64, ApiError> {
        self.gateway.get("users/total").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a count.
    pub async fn total_active_users(&self) -> Result<u64, ApiError> {
        self.gateway.get("users/total/active").await
    }

    // Posts

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a post list.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.gateway.get("posts").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the post does not exist.
    pub async fn get_post(&self, post_id: &str) -> Result<Post, ApiError> {
        self.gateway.get(&format!("posts/{}", encode(post_id))).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn approve_post(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("posts/approvePost/{}", encode(post_id));
        self.gateway.send(&path, Method::PUT).await.map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reject_post(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("posts/rejectPost/{}", encode(post_id));
        self.gateway.send(&path, Method::PUT).await.map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("posts/{}", encode(post_id));
        self.gateway.send(&path, Method::DELETE).await.map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a count.
    pub async fn total_active_posts(&self) -> Result<u64, ApiError> {
        self.gateway.get("posts/total/active").await
    }

    /// Media attached to a post. A `null` body means no media.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a media list.
    pub async fn post_media(&self, post_id: &str) -> Result<Vec<PostMedia>, ApiError> {
        let path = format!("media/{}", encode(post_id));
        match self.gateway.send(&path, Method::GET).await? {
            Value::Null => Ok(Vec::new()),
            value => decode(&path, value),
        }
    }

    // Reports

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a report list.
    pub async fn list_reports(&self) -> Result<Vec<Report>, ApiError> {
        self.gateway.get("reports").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a count.
    pub async fn total_reported_users(&self) -> Result<u64, ApiError> {
        self.gateway.get("reports/total/users").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn change_report_status(
        &self,
        report_id: &str,
        decision: ReportDecision,
    ) -> Result<(), ApiError> {
        let path = format!(
            "reports/changeStatus/{}/{}",
            encode(report_id),
            decision.as_str()
        );
        self.gateway.send(&path, Method::PUT).await.map(drop)
    }

    // Notifications

    /// Send a warning notification to a reported user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn warn_user(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("notifications/warn/{}", encode(user_id));
        self.gateway.send(&path, Method::POST).await.map(drop)
    }

    /// Tell a user that one of their posts was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn warn_post_owner(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("notifications/warnPost/{}", encode(user_id));
        self.gateway.send(&path, Method::POST).await.map(drop)
    }

    /// Tell a reporter that their report was acted on.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn respond_to_reporter(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("notifications/respond/{}", encode(user_id));
        self.gateway.send(&path, Method::POST).await.map(drop)
    }

    /// Admin notification feed. Anything other than a list, such as the
    /// `{"message": ...}` object sent when there is nothing to show, is an
    /// empty feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a list entry is malformed.
    pub async fn admin_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        match self.gateway.send("adminNotif/all", Method::GET).await? {
            value @ Value::Array(_) => decode("adminNotif/all", value),
            other => {
                debug!(body = %other, "Notification feed is not a list, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    // Admins

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_admin(&self, record: &NewAdminRecord) -> Result<(), ApiError> {
        self.gateway
            .send_json("admins", Method::POST, record)
            .await
            .map(drop)
    }

    /// Resolve user ids to usernames.
    ///
    /// Each distinct id is looked up once, at most `concurrency` at a time.
    /// Ids whose lookup fails are absent from the result.
    pub async fn resolve_usernames(
        &self,
        ids: &HashSet<String>,
        concurrency: usize,
    ) -> HashMap<String, String> {
        debug!(count = ids.len(), "Resolving usernames");

        stream::iter(ids.iter().cloned())
            .map(|id| async move {
                let result = self.get_user(&id).await;
                (id, result)
            })
            .buffer_unordered(concurrency.max(1))
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(user) if !user.username.is_empty() => Some((id, user.username)),
                    Ok(_) => None,
                    Err(e) => {
                        warn!(user_id = %id, error = %e, "Username lookup failed");
                        None
                    }
                }
            })
            .collect()
            .await
    }
}

/// Pull a user id out of whatever `users/getByEmail` answers with: a bare
/// id, a numeric id or a user object.
fn extract_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim().trim_matches('"');
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("id")
            .or_else(|| map.get("userId"))
            .and_then(extract_id),
        _ => None,
    }
}
