use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::watch;
use tracing::debug;

use crate::client::HrmsApi;
use crate::model::department::{DepartmentSource, Departments};

const KEY: &str = "departments";

/// Departments fetched from the HRMS API, kept for `ttl`.
///
/// Only remote lists are cached; the default fallback is recomputed so a
/// recovered API is picked up on the next request.
#[derive(Clone)]
pub struct DepartmentCache {
    cache: Cache<&'static str, Arc<Departments>>,
}

impl DepartmentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Concurrent misses share a single fetch.
    pub async fn get_or_fetch(&self, api: &dyn HrmsApi) -> Arc<Departments> {
        self.cache
            .optionally_get_with(KEY, async {
                let departments = Departments::resolve(api.list_departments().await);
                (departments.source == DepartmentSource::Remote).then(|| Arc::new(departments))
            })
            .await
            .unwrap_or_else(|| Arc::new(Departments::defaults()))
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(&KEY).await;
    }

    /// Drops the cached list each time `completions` changes, until its sender is gone.
    pub async fn invalidate_on(self, mut completions: watch::Receiver<u64>) {
        while completions.changed().await.is_ok() {
            self.invalidate().await;
            debug!("Department cache invalidated after employee was added");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::StubApi;

    #[tokio::test]
    async fn remote_list_is_cached_until_invalidated() {
        let api = StubApi::default();
        *api.departments.lock() = Some(vec!["Legal".to_string()]);
        let cache = DepartmentCache::new(Duration::from_secs(300));

        let first = cache.get_or_fetch(&api).await;
        assert_eq!(first.names, vec!["Legal"]);

        *api.departments.lock() = Some(vec!["Legal".to_string(), "Ops".to_string()]);
        assert_eq!(cache.get_or_fetch(&api).await.names, vec!["Legal"]);

        cache.invalidate().await;
        assert_eq!(cache.get_or_fetch(&api).await.names, vec!["Legal", "Ops"]);
    }

    #[tokio::test]
    async fn concurrent_misses_fetch_once() {
        let api = StubApi::default();
        *api.departments.lock() = Some(vec!["Legal".to_string()]);
        let cache = DepartmentCache::new(Duration::from_secs(300));

        let (a, b) = tokio::join!(cache.get_or_fetch(&api), cache.get_or_fetch(&api));
        assert_eq!(a.names, vec!["Legal"]);
        assert_eq!(b.names, vec!["Legal"]);
        assert_eq!(*api.department_calls.lock(), 1);
    }

    #[tokio::test]
    async fn fallback_is_not_cached() {
        let api = StubApi::default();
        let cache = DepartmentCache::new(Duration::from_secs(300));

        let fallback = cache.get_or_fetch(&api).await;
        assert_eq!(fallback.source, DepartmentSource::Default);

        *api.departments.lock() = Some(vec!["Legal".to_string()]);
        let recovered = cache.get_or_fetch(&api).await;
        assert_eq!(recovered.source, DepartmentSource::Remote);
        assert_eq!(*api.department_calls.lock(), 2);
    }
}
