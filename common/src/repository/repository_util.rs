use crate::index_trait::MongoIndexModelProvider;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, Result, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{ClientSession, Collection};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderType {
    #[default]
    Asc,
    Desc,
}

impl OrderType {
    fn direction(&self) -> i32 {
        match self {
            OrderType::Asc => 1,
            OrderType::Desc => -1,
        }
    }
}

#[async_trait]
pub trait Repository<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
    async fn insert(&self, entity: &T) -> Result<()>;
    async fn find_one(&self, filter: Document) -> Result<Option<T>>;
    async fn query(&self, filter: Document) -> Result<Vec<T>>;
    async fn query_sorted(&self, filter: Document, sort_field: &str, order_type: OrderType) -> Result<Vec<T>>;
    /// 在事务会话内更新，返回匹配到的文档数
    async fn update_one_in_session(&self, session: &mut ClientSession, filter: Document, update: Document) -> Result<u64>;
    async fn find_one_and_update(&self, filter: Document, update: Document) -> Result<Option<T>>;
}

#[derive(Debug)]
pub struct BaseRepository<T: Send + Sync> {
    pub collection: Collection<T>,
    _marker: PhantomData<T>,
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection, _marker: Default::default() }
    }
}

impl<T: Send + Sync + MongoIndexModelProvider> BaseRepository<T> {
    /// 按实体声明创建索引（幂等）
    pub async fn ensure_indexes(&self) -> Result<()> {
        let models = T::index_models();
        if models.is_empty() {
            return Ok(());
        }
        self.collection.create_indexes(models).await?;
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T> for BaseRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(doc! { "_id": id }).await
    }

    async fn insert(&self, entity: &T) -> Result<()> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    async fn query(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self.collection.find(filter).await?;
        cursor.try_collect().await
    }

    async fn query_sorted(&self, filter: Document, sort_field: &str, order_type: OrderType) -> Result<Vec<T>> {
        let cursor = self.collection.find(filter).sort(doc! { sort_field: order_type.direction() }).await?;
        cursor.try_collect().await
    }

    async fn update_one_in_session(&self, session: &mut ClientSession, filter: Document, update: Document) -> Result<u64> {
        let result = self.collection.update_one(filter, update).session(&mut *session).await?;
        Ok(result.matched_count)
    }

    async fn find_one_and_update(&self, filter: Document, update: Document) -> Result<Option<T>> {
        self.collection.find_one_and_update(filter, update).return_document(ReturnDocument::After).await
    }
}

/// 唯一索引冲突（E11000）
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
