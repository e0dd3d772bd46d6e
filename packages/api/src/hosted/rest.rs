//! Row API (`/rest/v1/{table}`) half of [`HostedClient`].

use store::{Collection, RecordStore, Row, StoreError};

use super::HostedClient;

impl HostedClient {
    pub(super) fn rest_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.config.url, collection.table())
    }

    fn owner_filter(collection: Collection, id: &str) -> [(&'static str, String); 1] {
        [(collection.owner_column(), format!("eq.{id}"))]
    }
}

impl RecordStore for HostedClient {
    async fn update(&self, collection: Collection, id: &str, fields: Row) -> Result<(), StoreError> {
        tracing::debug!(table = collection.table(), "PATCH row");
        let request = self
            .authorize(self.http.patch(self.rest_url(collection)))
            .await
            .query(&Self::owner_filter(collection, id))
            .header("Prefer", "return=minimal")
            .json(&fields);
        Self::send(request).await?;
        Ok(())
    }

    async fn insert(&self, collection: Collection, fields: Row) -> Result<(), StoreError> {
        tracing::debug!(table = collection.table(), "POST row");
        let request = self
            .authorize(self.http.post(self.rest_url(collection)))
            .await
            .header("Prefer", "return=minimal")
            .json(&fields);
        Self::send(request).await?;
        Ok(())
    }

    async fn upsert_by_identity(&self, collection: Collection, fields: Row) -> Result<(), StoreError> {
        tracing::debug!(table = collection.table(), "UPSERT row");
        let request = self
            .authorize(self.http.post(self.rest_url(collection)))
            .await
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&fields);
        Self::send(request).await?;
        Ok(())
    }

    async fn select_latest_by_user(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> Result<Option<Row>, StoreError> {
        tracing::debug!(table = collection.table(), "GET latest row");
        let [(owner, filter)] = Self::owner_filter(collection, user_id);
        let request = self
            .authorize(self.http.get(self.rest_url(collection)))
            .await
            .query(&[
                ("select", "*"),
                (owner, filter.as_str()),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ]);
        let rows: Vec<Row> = Self::send_json(request).await?;
        Ok(rows.into_iter().next())
    }
}
