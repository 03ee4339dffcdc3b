use std::sync::Arc;

use tracing::info;

use super::{refetch, ActionError};
use crate::backend::{ApiError, BackendApi};
use crate::collection::{loader, CollectionView};
use crate::models::{User, UserDetails};
use crate::table::{compare_text, contains_text, TableSpec};

/// Users table: filter and sort on username.
#[must_use]
pub fn users_table_spec(page_size: usize) -> TableSpec<User> {
    TableSpec::new(|user: &User, q: &str| contains_text(&user.username, q), page_size)
        .sortable("username", |a: &User, b: &User| {
            compare_text(&a.username, &b.username)
        })
}

pub struct UsersView {
    api: BackendApi,
    collection: Arc<CollectionView<User>>,
}

impl UsersView {
    #[must_use]
    pub fn new(api: BackendApi, page_size: usize) -> Self {
        let fetch_api = api.clone();
        let fetch = loader(move || {
            let api = fetch_api.clone();
            async move { api.list_users().await }
        });
        Self {
            api,
            collection: Arc::new(CollectionView::new(
                "users",
                fetch,
                users_table_spec(page_size),
            )),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &Arc<CollectionView<User>> {
        &self.collection
    }

    /// Profile shown in the user details dialog.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn details(&self, user_id: &str) -> Result<UserDetails, ApiError> {
        self.api.get_user(user_id).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn approve(&self, user_id: &str) -> Result<String, ActionError> {
        self.api
            .approve_user(user_id)
            .await
            .map_err(ActionError::step("Approve user"))?;
        info!(user_id, "User approved");
        refetch(&self.collection).await;
        Ok("User approved".to_string())
    }

    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn block(&self, user_id: &str) -> Result<String, ActionError> {
        self.api
            .block_user(user_id)
            .await
            .map_err(ActionError::step("Block user"))?;
        info!(user_id, "User blocked");
        refetch(&self.collection).await;
        Ok("User blocked".to_string())
    }
}
