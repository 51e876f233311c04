//! MongoDB-backed `StudentStore`.

use crate::config::StoreConfig;
use crate::store::{StoreResult, StudentStore};
use crate::types::{NewStudent, StudentId, StudentRecord};
use futures_util::future::BoxFuture;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use tracing::{debug, info};

/// Holds the single client shared by every request.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<StudentRecord>,
}

impl MongoStore {
    /// Parses the connection string and builds the client. The driver connects
    /// lazily, so callers that need a live server should follow with `ping`.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let collection = client
            .database(&config.database)
            .collection::<StudentRecord>(&config.collection);

        info!(
            "MongoDB client ready: database={}, collection={}",
            config.database, config.collection
        );
        Ok(Self { client, collection })
    }
}

impl StudentStore for MongoStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<StudentRecord>>> {
        Box::pin(async move {
            let cursor = self.collection.find(doc! {}).await?;
            let records: Vec<StudentRecord> = cursor.try_collect().await?;
            Ok(records)
        })
    }

    fn insert(&self, student: NewStudent) -> BoxFuture<'_, StoreResult<StudentRecord>> {
        Box::pin(async move {
            let record = student.into_record(StudentId::new());
            let result = self.collection.insert_one(&record).await?;
            debug!("Inserted student document {:?}", result.inserted_id);
            Ok(record)
        })
    }

    fn find(&self, id: StudentId) -> BoxFuture<'_, StoreResult<Option<StudentRecord>>> {
        Box::pin(async move { Ok(self.collection.find_one(doc! { "_id": id }).await?) })
    }

    fn replace(
        &self,
        id: StudentId,
        student: NewStudent,
    ) -> BoxFuture<'_, StoreResult<Option<StudentRecord>>> {
        Box::pin(async move {
            let replacement = student.into_record(id);
            let updated = self
                .collection
                .find_one_and_replace(doc! { "_id": id }, &replacement)
                .return_document(ReturnDocument::After)
                .await?;
            Ok(updated)
        })
    }

    fn delete(&self, id: StudentId) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let result = self.collection.delete_one(doc! { "_id": id }).await?;
            Ok(result.deleted_count)
        })
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 })
                .await?;
            Ok(())
        })
    }

    fn shutdown(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.client.clone().shutdown().await;
            info!("MongoDB client shut down");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;
    use crate::types::{Major, Scholarship};

    fn config(uri: &str, collection: &str) -> StoreConfig {
        StoreConfig {
            backend: StoreBackend::Mongo,
            uri: uri.to_string(),
            database: "exampleDB".to_string(),
            collection: collection.to_string(),
        }
    }

    fn student(name: &str, major: Major) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            age: 18,
            major,
            scholarship: Scholarship::default(),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_uri() {
        let result = MongoStore::connect(&config("not-a-mongodb-uri", "students")).await;
        assert!(result.is_err());
    }

    /// Needs a running server; set `MONGODB_URI` to point elsewhere.
    #[tokio::test]
    #[ignore]
    async fn test_live_crud_flow() {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string());
        let collection = format!("students_test_{}", StudentId::new().to_hex());
        let store = MongoStore::connect(&config(&uri, &collection)).await.unwrap();
        store.ping().await.unwrap();

        let created = store.insert(student("Ada", Major::Math)).await.unwrap();
        assert_eq!(store.find(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(store.list().await.unwrap(), vec![created.clone()]);

        let replaced = store
            .replace(created.id, student("Ada King", Major::English))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.name, "Ada King");
        assert_eq!(replaced.major, Major::English);
        assert_eq!(
            store.replace(StudentId::new(), student("Nobody", Major::Math)).await.unwrap(),
            None
        );

        assert_eq!(store.delete(created.id).await.unwrap(), 1);
        assert_eq!(store.find(created.id).await.unwrap(), None);
        assert_eq!(store.delete(created.id).await.unwrap(), 0);

        store.collection.drop().await.unwrap();
        store.shutdown().await;
    }
}
