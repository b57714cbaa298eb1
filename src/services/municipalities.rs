use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

const CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);
const FALLBACK_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
const DEFAULT_MUNICIPALITIES: [&str; 7] =
    ["Lisboa", "Porto", "Coimbra", "Faro", "Braga", "Aveiro", "Sintra"];

#[async_trait]
pub trait MunicipalitySource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<String>>;
}

pub struct GeoApiSource {
    url: String,
    client: reqwest::Client,
}

impl GeoApiSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MunicipalitySource for GeoApiSource {
    async fn fetch(&self) -> anyhow::Result<Vec<String>> {
        let data: Value = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("failed to call GeoAPI")?
            .error_for_status()
            .context("GeoAPI returned error")?
            .json()
            .await
            .context("failed to parse GeoAPI response")?;

        Ok(extract_municipalities(&data))
    }
}

/// Accepts a bare array or `{"municipios": [...]}`, with entries given as
/// strings or objects carrying `nome` / `municipio`.
pub fn extract_municipalities(data: &Value) -> Vec<String> {
    let entries = match data {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("municipios") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut names: Vec<String> = entries
        .iter()
        .filter_map(entry_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect();

    names.sort_by_key(|name| name.to_lowercase());
    names
}

fn entry_name(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(s) => Some(s),
        Value::Object(map) => ["nome", "municipio"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }
}

struct CachedList {
    names: Vec<String>,
    expires_at: Option<Instant>,
}

impl CachedList {
    fn fresh(&self) -> Option<&[String]> {
        match self.expires_at {
            Some(expiry) if Instant::now() < expiry && !self.names.is_empty() => Some(&self.names),
            _ => None,
        }
    }
}

/// Served municipalities, refreshed from the upstream source at most once per
/// TTL. Callers arriving during a refresh wait for it.
pub struct MunicipalityDirectory {
    source: Box<dyn MunicipalitySource>,
    cache: Mutex<CachedList>,
    ttl: Duration,
    fallback_ttl: Duration,
}

impl MunicipalityDirectory {
    pub fn new(source: Box<dyn MunicipalitySource>) -> Self {
        Self::with_ttls(source, CACHE_TTL, FALLBACK_CACHE_TTL)
    }

    pub fn with_ttls(source: Box<dyn MunicipalitySource>, ttl: Duration, fallback_ttl: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(CachedList {
                names: Vec::new(),
                expires_at: None,
            }),
            ttl,
            fallback_ttl,
        }
    }

    pub async fn municipalities(&self) -> Vec<String> {
        let mut cache = self.cache.lock().await;
        if let Some(names) = cache.fresh() {
            return names.to_vec();
        }

        match self.source.fetch().await {
            Ok(names) if !names.is_empty() => {
                tracing::info!("fetched {} municipalities from upstream", names.len());
                cache.names = names;
                cache.expires_at = Some(Instant::now() + self.ttl);
                return cache.names.clone();
            }
            Ok(_) => tracing::warn!("upstream responded with an empty municipality list"),
            Err(e) => tracing::error!(error = %e, "failed to fetch municipalities"),
        }

        if cache.names.is_empty() {
            tracing::warn!("municipality cache is empty, serving fallback list");
            cache.names = DEFAULT_MUNICIPALITIES.iter().map(|s| s.to_string()).collect();
            cache.expires_at = Some(Instant::now() + self.fallback_ttl);
        } else {
            tracing::info!("serving {} cached municipalities after upstream failure", cache.names.len());
        }

        cache.names.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    struct ScriptedSource {
        responses: std::sync::Mutex<VecDeque<anyhow::Result<Vec<String>>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<anyhow::Result<Vec<String>>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                responses: std::sync::Mutex::new(responses.into()),
                calls: Arc::clone(&calls),
            };
            (source, calls)
        }
    }

    #[async_trait]
    impl MunicipalitySource for ScriptedSource {
        async fn fetch(&self) -> anyhow::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response")))
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_from_array_of_strings() {
        let data = json!(["Porto", " Lisboa ", "", "aveiro", "Porto"]);
        assert_eq!(extract_municipalities(&data), names(&["aveiro", "Lisboa", "Porto"]));
    }

    #[test]
    fn test_extract_drops_exact_duplicates_only() {
        let data = json!(["Porto", "porto", "Porto", "Lisboa", "porto"]);
        assert_eq!(extract_municipalities(&data), names(&["Lisboa", "Porto", "porto"]));
    }

    #[test]
    fn test_extract_from_wrapped_objects() {
        let data = json!({"municipios": [{"nome": "Faro"}, {"municipio": "Braga"}, {"other": 1}, null]});
        assert_eq!(extract_municipalities(&data), names(&["Braga", "Faro"]));
    }

    #[test]
    fn test_extract_from_unexpected_shape() {
        assert!(extract_municipalities(&json!({"data": []})).is_empty());
        assert!(extract_municipalities(&json!("Lisboa")).is_empty());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_upstream() {
        let (source, calls) = ScriptedSource::new(vec![Ok(names(&["Lisboa"]))]);
        let directory = MunicipalityDirectory::new(Box::new(source));

        assert_eq!(directory.municipalities().await, names(&["Lisboa"]));
        assert_eq!(directory.municipalities().await, names(&["Lisboa"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_without_cache_serves_fallback() {
        let (source, _) = ScriptedSource::new(vec![Err(anyhow::anyhow!("offline"))]);
        let directory = MunicipalityDirectory::new(Box::new(source));

        let list = directory.municipalities().await;
        assert_eq!(list.len(), DEFAULT_MUNICIPALITIES.len());
        assert!(list.contains(&"Sintra".to_string()));
    }

    #[tokio::test]
    async fn test_empty_upstream_serves_fallback() {
        let (source, _) = ScriptedSource::new(vec![Ok(vec![])]);
        let directory = MunicipalityDirectory::new(Box::new(source));
        assert!(directory.municipalities().await.contains(&"Lisboa".to_string()));
    }

    #[tokio::test]
    async fn test_failure_keeps_stale_cache() {
        let (source, calls) = ScriptedSource::new(vec![
            Ok(names(&["Lisboa", "Porto"])),
            Err(anyhow::anyhow!("timeout")),
        ]);
        let directory =
            MunicipalityDirectory::with_ttls(Box::new(source), Duration::ZERO, Duration::ZERO);

        assert_eq!(directory.municipalities().await, names(&["Lisboa", "Porto"]));
        assert_eq!(directory.municipalities().await, names(&["Lisboa", "Porto"]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
