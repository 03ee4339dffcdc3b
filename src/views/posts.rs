use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::{refetch, ActionError};
use crate::backend::{ApiError, BackendApi};
use crate::collection::{loader, CollectionView, TableView};
use crate::models::{Post, PostMedia, PostStatus};
use crate::table::{compare_text, contains_text, TableQuery, TableSpec};

/// Status tabs of the posts page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostTab {
    #[default]
    Pending,
    Approved,
    Rejected,
    All,
}

impl PostTab {
    pub const ALL: [PostTab; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::All];

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::All => "all",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::All => "All Posts",
        }
    }
}

/// Most recent first; posts without a parseable `createdAt` go last.
/// Stable, so equal timestamps keep their fetched order.
pub fn order_by_recency(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.created_at(), b.created_at()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Apply a tab to the fetched posts.
///
/// The "all" tab is a stable partition: pending posts first, the rest
/// after, recency order kept inside each group.
#[must_use]
pub fn apply_tab(mut posts: Vec<Post>, tab: PostTab) -> Vec<Post> {
    order_by_recency(&mut posts);
    match tab {
        PostTab::Pending => posts.retain(|p| p.status == PostStatus::Pending),
        PostTab::Approved => posts.retain(|p| p.status == PostStatus::Approved),
        PostTab::Rejected => posts.retain(|p| p.status == PostStatus::Rejected),
        PostTab::All => {
            let (mut pending, rest): (Vec<_>, Vec<_>) =
                posts.into_iter().partition(|p| p.status.is_pending());
            pending.extend(rest);
            posts = pending;
        }
    }
    posts
}

/// Posts table: filter and sort on content.
#[must_use]
pub fn posts_table_spec(page_size: usize) -> TableSpec<Post> {
    TableSpec::new(|post: &Post, q: &str| contains_text(&post.content, q), page_size)
        .sortable("content", |a: &Post, b: &Post| compare_text(&a.content, &b.content))
}

/// Contents of the post details dialog.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub media: Vec<PostMedia>,
}

pub struct PostsView {
    api: BackendApi,
    collection: Arc<CollectionView<Post>>,
    active_tab: RwLock<PostTab>,
}

impl PostsView {
    #[must_use]
    pub fn new(api: BackendApi, page_size: usize) -> Self {
        let fetch_api = api.clone();
        let fetch = loader(move || {
            let api = fetch_api.clone();
            async move { api.list_posts().await }
        });
        Self {
            api,
            collection: Arc::new(CollectionView::new(
                "posts",
                fetch,
                posts_table_spec(page_size),
            )),
            active_tab: RwLock::new(PostTab::default()),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &Arc<CollectionView<Post>> {
        &self.collection
    }

    #[must_use]
    pub fn active_tab(&self) -> PostTab {
        *self.active_tab.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch tabs. A change of tab re-fetches all posts; returns whether
    /// the tab changed.
    pub async fn select_tab(&self, tab: PostTab) -> bool {
        let changed = {
            let mut active = self.active_tab.write().unwrap_or_else(PoisonError::into_inner);
            let changed = *active != tab;
            *active = tab;
            changed
        };
        if changed {
            refetch(&self.collection).await;
        }
        changed
    }

    /// Rows of `tab` through the table pipeline.
    #[must_use]
    pub fn view(&self, tab: PostTab, query: &TableQuery) -> TableView<Post> {
        self.collection.view_with(query, |posts| apply_tab(posts, tab))
    }

    async fn find(&self, post_id: &str) -> Result<Post, ApiError> {
        if let Some(post) = self.collection.rows().into_iter().find(|p| p.id == post_id) {
            return Ok(post);
        }
        self.api.get_post(post_id).await
    }

    /// Post with its media. A failed media lookup yields an empty gallery.
    ///
    /// # Errors
    ///
    /// Returns an error if the post itself cannot be loaded.
    pub async fn details(&self, post_id: &str) -> Result<PostDetails, ApiError> {
        let post = self.find(post_id).await?;
        let media = load_media(&self.api, post_id).await;
        Ok(PostDetails { post, media })
    }

    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn approve(&self, post_id: &str) -> Result<String, ActionError> {
        self.api
            .approve_post(post_id)
            .await
            .map_err(ActionError::step("Approve post"))?;
        info!(post_id, "Post approved");
        refetch(&self.collection).await;
        Ok("Post approved".to_string())
    }

    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn reject(&self, post_id: &str) -> Result<String, ActionError> {
        self.api
            .reject_post(post_id)
            .await
            .map_err(ActionError::step("Reject post"))?;
        info!(post_id, "Post rejected");
        refetch(&self.collection).await;
        Ok("Post rejected".to_string())
    }

    /// Delete a post, then notify its author when the post names one.
    ///
    /// # Errors
    ///
    /// Returns the first failing step; earlier steps are not rolled back.
    pub async fn delete(&self, post_id: &str) -> Result<String, ActionError> {
        let post = self
            .find(post_id)
            .await
            .map_err(ActionError::step("Load post"))?;

        self.api
            .delete_post(post_id)
            .await
            .map_err(ActionError::step("Delete post"))?;
        info!(post_id, "Post deleted");

        let message = if let Some(email) = post.author_email() {
            let author_id = self
                .api
                .user_id_by_email(email)
                .await
                .map_err(ActionError::step("Look up post author"))?;
            self.api
                .warn_post_owner(&author_id)
                .await
                .map_err(ActionError::step("Notify post author"))?;
            "Post deleted and author notified"
        } else {
            "Post deleted"
        };

        refetch(&self.collection).await;
        Ok(message.to_string())
    }
}

pub(crate) async fn load_media(api: &BackendApi, post_id: &str) -> Vec<PostMedia> {
    match api.post_media(post_id).await {
        Ok(media) => media,
        Err(e) => {
            warn!(post_id, error = %e, "Failed to load post media");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: u32, status: &str, created_at: &str) -> Post {
        serde_json::from_value(json!({
            "id": id, "content": format!("post {id}"), "status": status, "createdAt": created_at
        }))
        .unwrap()
    }

    fn fixture() -> Vec<Post> {
        vec![
            post(1, "1", "2025-03-01T10:00:00Z"),
            post(2, "3", "2025-03-02T10:00:00Z"),
            post(3, "0", "2025-03-05T10:00:00Z"),
            post(4, "3", "2025-03-04T10:00:00Z"),
            post(5, "1", "garbage"),
            post(6, "3", "2025-02-01T10:00:00Z"),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_recency_puts_unparseable_last() {
        let mut posts = fixture();
        order_by_recency(&mut posts);
        assert_eq!(ids(&posts), vec!["3", "4", "2", "1", "6", "5"]);
    }

    #[test]
    fn test_status_tabs() {
        assert_eq!(ids(&apply_tab(fixture(), PostTab::Pending)), vec!["4", "2", "6"]);
        assert_eq!(ids(&apply_tab(fixture(), PostTab::Approved)), vec!["1", "5"]);
        assert_eq!(ids(&apply_tab(fixture(), PostTab::Rejected)), vec!["3"]);
    }

    #[test]
    fn test_all_tab_partitions_pending_first() {
        let all = apply_tab(fixture(), PostTab::All);
        assert_eq!(ids(&all), vec!["4", "2", "6", "3", "1", "5"]);

        let first_other = all.iter().position(|p| !p.status.is_pending()).unwrap();
        assert!(all[first_other..].iter().all(|p| !p.status.is_pending()));
    }

    #[test]
    fn test_tab_parse() {
        for tab in PostTab::ALL {
            assert_eq!(PostTab::parse(tab.as_str()), Some(tab));
        }
        assert_eq!(PostTab::parse("archived"), None);
        assert_eq!(PostTab::default(), PostTab::Pending);
    }
}
