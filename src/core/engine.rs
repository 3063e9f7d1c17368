use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    config::AppConfig,
    core::{
        error::CheckError,
        types::{CandidateName, CheckRecord, Platform, ProbeResult},
    },
    modules::recon::{
        classify::{ClassificationStrategy, Sniffer},
        username::check_url,
    },
    pipeline::normalizer::{candidate, render_template},
};

/// Verdict used whenever a probe cannot reach a conclusion.
///
/// A wrong "taken" costs the user one more candidate; a wrong "available"
/// sends them after a handle that is not free.
pub const ASSUME_TAKEN: bool = false;

#[derive(Clone, Copy, Debug)]
struct CachedVerdict {
    available: bool,
    timestamp: Instant,
}

struct Inner {
    client: reqwest::Client,
    config: AppConfig,
    sniffer: Sniffer,
    timeout: Duration,
    semaphore: Semaphore,
    cache: Mutex<HashMap<(Platform, String), CachedVerdict>>,
}

/// Availability prober. Cheap to clone; clones share the client and limiter.
///
/// The verdict cache is the only mutable state shared between probes, and it
/// stays empty unless `cache_ttl_seconds` is set.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

impl Engine {
    pub fn new(config: AppConfig) -> Result<Self, CheckError> {
        config.validate()?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(CheckError::from)?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                sniffer: Sniffer::new(&config.sniff),
                timeout,
                semaphore: Semaphore::new(config.max_concurrent_requests),
                cache: Mutex::new(HashMap::new()),
                config,
            }),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Probe one fully formed URL. Always yields a verdict; failures become [`ASSUME_TAKEN`].
    pub async fn probe(&self, url: &str, platform: Platform) -> bool {
        self.probe_outcome(url, platform)
            .await
            .unwrap_or(ASSUME_TAKEN)
    }

    /// Probe every (name, platform) pair concurrently and aggregate per name.
    ///
    /// Records come back in input order. An empty `platforms` slice means every
    /// enabled platform. Only structural problems fail the batch; a probe that
    /// errors just reads as taken.
    pub async fn probe_batch(
        &self,
        names: &[String],
        platforms: &[Platform],
    ) -> Result<Vec<CheckRecord>, CheckError> {
        if names.is_empty() {
            return Err(CheckError::Validation(
                "names must be a non-empty list".into(),
            ));
        }
        let platforms = self.resolve_platforms(platforms);
        if platforms.is_empty() {
            return Err(CheckError::Validation("no platforms selected".into()));
        }

        let started = Instant::now();
        let candidates: Vec<CandidateName> = names.iter().map(|n| candidate(n)).collect();
        tracing::info!(
            "checking {} names on {} platforms",
            candidates.len(),
            platforms.len()
        );

        let mut grid: Vec<Vec<Option<bool>>> = vec![vec![None; platforms.len()]; candidates.len()];
        let mut set = JoinSet::new();
        for (ni, cand) in candidates.iter().enumerate() {
            if cand.is_degenerate() {
                tracing::warn!("name {:?} has no usable characters; not probed", cand.raw);
                grid[ni].fill(Some(ASSUME_TAKEN));
                continue;
            }
            for (pi, platform) in platforms.iter().copied().enumerate() {
                let engine = self.clone();
                let handle = cand.canonical.clone();
                set.spawn(async move {
                    let available = engine.probe_handle(&handle, platform).await;
                    (ni, pi, available)
                });
            }
        }

        while let Some(joined) = set.join_next().await {
            let (ni, pi, available) =
                joined.map_err(|e| CheckError::Internal(format!("probe task failed: {e}")))?;
            grid[ni][pi] = Some(available);
        }

        let records = candidates
            .into_iter()
            .zip(grid)
            .map(|(cand, row)| -> Result<CheckRecord, CheckError> {
                let results = platforms
                    .iter()
                    .zip(row)
                    .map(|(platform, cell)| {
                        cell.map(|available| ProbeResult {
                            platform: *platform,
                            available,
                        })
                        .ok_or_else(|| {
                            CheckError::Internal(format!(
                                "missing {platform} result for {}",
                                cand.raw
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CheckRecord {
                    name: cand.raw,
                    results,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            "checked {} names in {} ms",
            records.len(),
            started.elapsed().as_millis()
        );
        Ok(records)
    }

    /// Probe a canonical handle on one platform, consulting the verdict cache.
    pub async fn probe_handle(&self, handle: &str, platform: Platform) -> bool {
        if handle.is_empty() {
            return ASSUME_TAKEN;
        }
        if let Some(available) = self.check_cache(platform, handle) {
            tracing::debug!("{platform}/{handle}: cached {available}");
            return available;
        }

        let template = self
            .inner
            .config
            .platform(platform)
            .map(|p| p.base_url.as_str())
            .unwrap_or_else(|| platform.url_template());
        let url = render_template(template, handle);

        match self.probe_outcome(&url, platform).await {
            Some(available) => {
                self.store_cache(platform, handle, available);
                available
            }
            None => ASSUME_TAKEN,
        }
    }

    fn resolve_platforms(&self, requested: &[Platform]) -> Vec<Platform> {
        let source = if requested.is_empty() {
            self.inner.config.enabled_platforms()
        } else {
            requested.to_vec()
        };
        let mut out: Vec<Platform> = Vec::with_capacity(source.len());
        for p in source {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }

    fn strategy_for(&self, platform: Platform) -> ClassificationStrategy {
        self.inner
            .config
            .platform(platform)
            .map(|p| p.strategy)
            .unwrap_or_else(|| ClassificationStrategy::default_for(platform))
    }

    /// `None` when no response could be classified.
    async fn probe_outcome(&self, url: &str, platform: Platform) -> Option<bool> {
        let _permit = match self.inner.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(err) => {
                tracing::warn!("probe limiter unavailable: {err}");
                return None;
            }
        };
        let strategy = self.strategy_for(platform);
        match check_url(
            &self.inner.client,
            url,
            strategy,
            &self.inner.sniffer,
            self.inner.timeout,
        )
        .await
        {
            Ok(available) => {
                tracing::debug!("{platform} {url}: available={available}");
                Some(available)
            }
            Err(err) => {
                tracing::debug!("{platform} {url}: probe failed, assuming taken: {err}");
                None
            }
        }
    }

    fn check_cache(&self, platform: Platform, handle: &str) -> Option<bool> {
        if self.inner.config.cache_ttl_seconds == 0 {
            return None;
        }
        let ttl = Duration::from_secs(self.inner.config.cache_ttl_seconds);
        let cache = self.inner.cache.lock().ok()?;
        cache
            .get(&(platform, handle.to_string()))
            .filter(|entry| entry.timestamp.elapsed() < ttl)
            .map(|entry| entry.available)
    }

    /// Expired entries are dropped on every insert; at capacity the oldest goes.
    fn store_cache(&self, platform: Platform, handle: &str, available: bool) {
        let cfg = &self.inner.config;
        if cfg.cache_ttl_seconds == 0 || cfg.cache_max_entries == 0 {
            return;
        }
        let ttl = Duration::from_secs(cfg.cache_ttl_seconds);
        if let Ok(mut cache) = self.inner.cache.lock() {
            cache.retain(|_, entry| entry.timestamp.elapsed() < ttl);
            let key = (platform, handle.to_string());
            while cache.len() >= cfg.cache_max_entries && !cache.contains_key(&key) {
                let oldest = cache
                    .iter()
                    .min_by_key(|(_, entry)| entry.timestamp)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        cache.remove(&k);
                    }
                    None => break,
                }
            }
            cache.insert(
                key,
                CachedVerdict {
                    available,
                    timestamp: Instant::now(),
                },
            );
        }
    }
}
