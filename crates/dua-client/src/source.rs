use std::future::Future;

use dua_model::{Category, CategoryId, Dua, Subcategory, SubcategoryId};

use crate::client::FetchClient;
use crate::error::Result;

/// Where the navigator session loads content from.
///
/// [`FetchClient`] is the production implementation; tests substitute
/// in-process fakes.
pub trait DuaSource: Send + Sync + 'static {
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send;

    fn subcategories(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<Subcategory>>> + Send;

    fn duas(&self, subcategory: SubcategoryId) -> impl Future<Output = Result<Vec<Dua>>> + Send;

    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Dua>>> + Send;
}

impl DuaSource for FetchClient {
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send {
        self.list_categories()
    }

    fn subcategories(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<Subcategory>>> + Send {
        self.list_subcategories(category)
    }

    fn duas(&self, subcategory: SubcategoryId) -> impl Future<Output = Result<Vec<Dua>>> + Send {
        self.list_duas(subcategory)
    }

    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Dua>>> + Send {
        self.search_duas(query)
    }
}
