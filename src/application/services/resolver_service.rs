//! Redirect-chain resolution service.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::domain::record::now_ms;
use crate::domain::{CacheRecord, Stats};
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::http::HttpProber;

/// Resolver tunables, fixed at startup.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Upper bound on URLs visited in one chain.
    pub max_hops: usize,
    /// Per-hop probe deadline.
    pub request_timeout: Duration,
    /// Retention window used to backdate non-200 cache writes.
    pub max_cache_age_ms: i64,
    /// `Referer` sent on the first hop, where no previous hop exists.
    pub first_hop_referer: String,
}

/// Follows HTTP redirect chains to their final destination.
///
/// One call to [`ResolverService::resolve`] walks the chain hop by hop,
/// consulting the cache before every probe and enforcing cycle, hop-count
/// and per-hop timeout limits. Whatever terminal outcome the walk reaches is
/// written back to the cache under every URL visited, so later lookups of
/// any intermediate URL are served without re-walking the chain.
///
/// All outcomes are `(code, text)` pairs; resolution never returns an `Err`.
/// Concurrent resolutions share the store and counters but carry their own
/// trail, so they never block each other beyond per-key store access.
pub struct ResolverService {
    store: Arc<CacheStore>,
    prober: Arc<dyn HttpProber>,
    stats: Arc<Stats>,
    settings: ResolverSettings,
}

/// URL validation failure classes surfaced as 400 outcomes.
#[derive(Debug, PartialEq, Eq)]
enum InvalidUrl {
    Protocol,
    MissingHost,
}

impl ResolverService {
    pub fn new(
        store: Arc<CacheStore>,
        prober: Arc<dyn HttpProber>,
        stats: Arc<Stats>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            store,
            prober,
            stats,
            settings,
        }
    }

    /// Resolves `start_url` to its final destination.
    ///
    /// Returns the terminal `(code, text)` pair: `(200, final_url)` on
    /// success, `(status, url)` for terminal non-redirect upstream statuses,
    /// or `(400/500, "ERR ...")` for validation, chain-safety, transport and
    /// protocol failures. The future resolves exactly once per call.
    pub async fn resolve(&self, start_url: &str) -> (u16, String) {
        let (code, text) = self.walk(start_url).await;

        self.stats.record_response(code, now_ms());
        debug!("{} => {} {}", start_url, code, text);

        (code, text)
    }

    /// Walks the redirect chain iteratively, one probe per hop.
    async fn walk(&self, start_url: &str) -> (u16, String) {
        let mut trail: Vec<String> = Vec::new();
        let mut current = start_url.to_string();
        let mut referer = self.settings.first_hop_referer.clone();

        loop {
            // Serve any URL already resolved, including mid-chain: the
            // cached outcome is the chain's outcome.
            if let Some(record) = self.store.touch(&current, now_ms()) {
                self.stats.record_cache_hit();
                return (record.code, record.text);
            }
            self.stats.record_cache_miss();

            if trail.contains(&current) {
                let hops = trail.len();
                let noun = if hops == 1 { "hop" } else { "hops" };
                let text = format!(
                    "ERR Circular reference found after {hops} {noun}, pointing back to {current}"
                );
                return self.finish(400, text, &trail);
            }

            trail.push(current.clone());

            if trail.len() >= self.settings.max_hops {
                return self.finish(400, "ERR Too many hops".to_string(), &trail);
            }

            let target = match validate_url(&current) {
                Ok(url) => url,
                Err(InvalidUrl::Protocol) => {
                    let text = format!("ERR Invalid protocol: {current}");
                    return self.finish(400, text, &trail);
                }
                Err(InvalidUrl::MissingHost) => {
                    let text = "ERR Invalid URL: Missing hostname".to_string();
                    return self.finish(400, text, &trail);
                }
            };

            self.stats.record_hop();

            // Race the probe against the per-hop timer. When the timer wins
            // the probe future is dropped, so a late transport error cannot
            // produce a second outcome for the same hop.
            let probe = timeout(
                self.settings.request_timeout,
                self.prober.head(&target, &referer),
            )
            .await;

            let response = match probe {
                Err(_elapsed) => {
                    let text = format!("ERR Request to {current} timed out");
                    return self.finish(500, text, &trail);
                }
                Ok(Err(e)) => {
                    let text = format!("ERR {e} for {current}");
                    return self.finish(500, text, &trail);
                }
                Ok(Ok(response)) => response,
            };

            match response.status {
                301 | 302 => match response.location {
                    Some(next) => {
                        // The current URL becomes the Referer for the next hop.
                        referer = std::mem::replace(&mut current, next);
                    }
                    None => {
                        let text = format!(
                            "ERR {} response without a location header",
                            response.status
                        );
                        return self.finish(500, text, &trail);
                    }
                },
                status => {
                    // 200 resolves the chain; any other non-redirect status
                    // is terminal too and passed through verbatim.
                    return self.finish(status, current, &trail);
                }
            }
        }
    }

    /// Writes the terminal outcome to every URL in the trail and returns it.
    ///
    /// All trail entries share the same `(code, text)`; non-200 outcomes are
    /// stored backdated so they expire sooner (see [`CacheRecord::stamped`]).
    fn finish(&self, code: u16, text: String, trail: &[String]) -> (u16, String) {
        let now = now_ms();

        for visited in trail {
            self.store.put(
                visited.clone(),
                CacheRecord::stamped(code, text.clone(), now, self.settings.max_cache_age_ms),
            );
        }

        (code, text)
    }
}

/// Validates and parses a URL for probing.
///
/// Requires an `http` or `https` scheme and a non-empty host. The parsed
/// [`Url`] carries scheme-default ports, a `/` default path and an empty
/// default query.
fn validate_url(raw: &str) -> Result<Url, InvalidUrl> {
    match Url::parse(raw) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(InvalidUrl::Protocol);
            }
            match url.host_str() {
                Some(host) if !host.is_empty() => Ok(url),
                _ => Err(InvalidUrl::MissingHost),
            }
        }
        Err(url::ParseError::EmptyHost) => Err(InvalidUrl::MissingHost),
        Err(_) => Err(InvalidUrl::Protocol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::{MockHttpProber, ProbeError, ProbeResponse};
    use async_trait::async_trait;

    const MAX_AGE_MS: i64 = 7 * 24 * 3600 * 1000;

    fn settings() -> ResolverSettings {
        ResolverSettings {
            max_hops: 10,
            request_timeout: Duration::from_millis(5_000),
            max_cache_age_ms: MAX_AGE_MS,
            first_hop_referer: "http://resolver.test/".to_string(),
        }
    }

    fn service(prober: MockHttpProber) -> (ResolverService, Arc<CacheStore>, Arc<Stats>) {
        let store = Arc::new(CacheStore::new());
        let stats = Arc::new(Stats::new());
        let service = ResolverService::new(
            store.clone(),
            Arc::new(prober),
            stats.clone(),
            settings(),
        );
        (service, store, stats)
    }

    fn redirect_to(location: &str) -> ProbeResponse {
        ProbeResponse {
            status: 301,
            location: Some(location.to_string()),
        }
    }

    fn ok_response() -> ProbeResponse {
        ProbeResponse {
            status: 200,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_direct_200() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .withf(|url, referer| {
                url.as_str() == "http://a.example/" && referer == "http://resolver.test/"
            })
            .times(1)
            .returning(|_, _| Ok(ok_response()));

        let (service, store, stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/").await;

        assert_eq!(code, 200);
        assert_eq!(text, "http://a.example/");
        assert_eq!(store.get("http://a.example/").unwrap().code, 200);
        assert_eq!(stats.view().total_hops, 1);
        assert_eq!(stats.view().responses_successful, 1);
    }

    #[tokio::test]
    async fn test_chain_fans_out_to_every_hop() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://a.example/")
            .times(1)
            .returning(|_, _| Ok(redirect_to("http://b.example/")));
        prober
            .expect_head()
            .withf(|url, referer| {
                // Each probe carries the previous hop as Referer.
                url.as_str() == "http://b.example/" && referer == "http://a.example/"
            })
            .times(1)
            .returning(|_, _| Ok(redirect_to("http://c.example/")));
        prober
            .expect_head()
            .withf(|url, referer| {
                url.as_str() == "http://c.example/" && referer == "http://b.example/"
            })
            .times(1)
            .returning(|_, _| Ok(ok_response()));

        let (service, store, stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/").await;

        assert_eq!((code, text.as_str()), (200, "http://c.example/"));
        for key in [
            "http://a.example/",
            "http://b.example/",
            "http://c.example/",
        ] {
            let record = store.get(key).unwrap();
            assert_eq!(record.code, 200);
            assert_eq!(record.text, "http://c.example/");
        }
        assert_eq!(stats.view().total_hops, 3);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network_and_counts() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://a.example/")
            .times(1)
            .returning(|_, _| Ok(ok_response()));

        let (service, _store, stats) = service(prober);

        let first = service.resolve("http://a.example/").await;
        // Second resolve must come from cache: the mock only allows one probe.
        let second = service.resolve("http://a.example/").await;

        assert_eq!(first, second);
        let view = stats.view();
        assert_eq!(view.cache_hits, 1);
        assert_eq!(view.cache_misses, 1);
        assert_eq!(view.total_hops, 1);
        assert_eq!(view.responses_successful, 2);
    }

    #[tokio::test]
    async fn test_intermediate_url_lookup_hits_cache() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://a.example/")
            .times(1)
            .returning(|_, _| Ok(redirect_to("http://b.example/")));
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://b.example/")
            .times(1)
            .returning(|_, _| Ok(ok_response()));

        let (service, _store, stats) = service(prober);

        service.resolve("http://a.example/").await;
        let (code, text) = service.resolve("http://b.example/").await;

        assert_eq!((code, text.as_str()), (200, "http://b.example/"));
        assert_eq!(stats.view().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_circular_reference_detected() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://a.example/")
            .times(1)
            .returning(|_, _| Ok(redirect_to("http://b.example/")));
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://b.example/")
            .times(1)
            .returning(|_, _| Ok(redirect_to("http://a.example/")));

        let (service, store, _stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/").await;

        assert_eq!(code, 400);
        assert_eq!(
            text,
            "ERR Circular reference found after 2 hops, pointing back to http://a.example/"
        );
        // Both chain members cache the failure.
        assert_eq!(store.get("http://a.example/").unwrap().code, 400);
        assert_eq!(store.get("http://b.example/").unwrap().code, 400);
    }

    #[tokio::test]
    async fn test_self_redirect_reports_single_hop() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .times(1)
            .returning(|_, _| Ok(redirect_to("http://a.example/")));

        let (service, _store, _stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/").await;

        assert_eq!(code, 400);
        assert_eq!(
            text,
            "ERR Circular reference found after 1 hop, pointing back to http://a.example/"
        );
    }

    #[tokio::test]
    async fn test_hop_limit_stops_probing() {
        let mut prober = MockHttpProber::new();
        // Every probe redirects to a fresh URL; the walk must stop once the
        // trail reaches max_hops without issuing another probe.
        prober.expect_head().times(9).returning(|url, _| {
            let n: u32 = url.as_str()
                .trim_start_matches("http://hop")
                .trim_end_matches(".example/")
                .parse()
                .unwrap();
            Ok(redirect_to(&format!("http://hop{}.example/", n + 1)))
        });

        let (service, store, stats) = service(prober);

        let (code, text) = service.resolve("http://hop0.example/").await;

        assert_eq!((code, text.as_str()), (400, "ERR Too many hops"));
        assert_eq!(stats.view().total_hops, 9);
        // All ten trail URLs carry the failure.
        assert_eq!(store.len(), 10);
    }

    #[tokio::test]
    async fn test_invalid_protocol_never_probes() {
        let mut prober = MockHttpProber::new();
        prober.expect_head().times(0);

        let (service, store, stats) = service(prober);

        let (code, text) = service.resolve("ftp://x").await;

        assert_eq!(code, 400);
        assert_eq!(text, "ERR Invalid protocol: ftp://x");
        assert_eq!(stats.view().total_hops, 0);
        assert_eq!(store.get("ftp://x").unwrap().code, 400);
    }

    #[tokio::test]
    async fn test_missing_hostname_never_probes() {
        let mut prober = MockHttpProber::new();
        prober.expect_head().times(0);

        let (service, _store, _stats) = service(prober);

        let (code, text) = service.resolve("http://").await;

        assert_eq!(code, 400);
        assert_eq!(text, "ERR Invalid URL: Missing hostname");
    }

    #[tokio::test]
    async fn test_redirect_without_location() {
        let mut prober = MockHttpProber::new();
        prober.expect_head().times(1).returning(|_, _| {
            Ok(ProbeResponse {
                status: 302,
                location: None,
            })
        });

        let (service, _store, _stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/").await;

        assert_eq!(code, 500);
        assert_eq!(text, "ERR 302 response without a location header");
    }

    #[tokio::test]
    async fn test_transport_error_is_terminal() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .times(1)
            .returning(|_, _| Err(ProbeError::Transport("connection refused".to_string())));

        let (service, store, stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/").await;

        assert_eq!(code, 500);
        assert_eq!(text, "ERR connection refused for http://a.example/");
        assert_eq!(store.get("http://a.example/").unwrap().code, 500);
        assert_eq!(stats.view().responses_failures, 1);
    }

    #[tokio::test]
    async fn test_non_200_status_passes_through() {
        let mut prober = MockHttpProber::new();
        prober.expect_head().times(1).returning(|_, _| {
            Ok(ProbeResponse {
                status: 404,
                location: None,
            })
        });

        let (service, store, _stats) = service(prober);

        let (code, text) = service.resolve("http://a.example/missing").await;

        assert_eq!(code, 404);
        assert_eq!(text, "http://a.example/missing");
        assert_eq!(store.get("http://a.example/missing").unwrap().code, 404);
    }

    #[tokio::test]
    async fn test_error_outcome_is_backdated() {
        let mut prober = MockHttpProber::new();
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://ok.example/")
            .returning(|_, _| Ok(ok_response()));
        prober
            .expect_head()
            .withf(|url, _| url.as_str() == "http://err.example/")
            .returning(|_, _| Err(ProbeError::Transport("boom".to_string())));

        let (service, store, _stats) = service(prober);

        service.resolve("http://ok.example/").await;
        service.resolve("http://err.example/").await;

        let ok = store.get("http://ok.example/").unwrap();
        let err = store.get("http://err.example/").unwrap();

        // Written within the same instant give or take scheduling; the error
        // record sits ~90% of the max age in the past.
        let delta = ok.last_access - err.last_access;
        let expected = MAX_AGE_MS * 9 / 10;
        assert!((delta - expected).abs() < 1_000, "delta was {delta}");
    }

    /// Prober whose response never arrives, for exercising the timeout race.
    struct HangingProber;

    #[async_trait]
    impl HttpProber for HangingProber {
        async fn head(&self, _: &Url, _: &str) -> Result<ProbeResponse, ProbeError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_timeout() {
        let store = Arc::new(CacheStore::new());
        let stats = Arc::new(Stats::new());
        let service = ResolverService::new(
            store.clone(),
            Arc::new(HangingProber),
            stats.clone(),
            settings(),
        );

        let (code, text) = service.resolve("http://slow.example/").await;

        assert_eq!(code, 500);
        assert_eq!(text, "ERR Request to http://slow.example/ timed out");
        assert_eq!(store.get("http://slow.example/").unwrap().code, 500);
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com:8443/path?q=1").is_ok());
        assert_eq!(validate_url("ftp://x"), Err(InvalidUrl::Protocol));
        assert_eq!(validate_url("not a url"), Err(InvalidUrl::Protocol));
        assert_eq!(validate_url("http://"), Err(InvalidUrl::MissingHost));
    }

    #[test]
    fn test_validate_url_applies_defaults() {
        let url = validate_url("http://example.com").unwrap();
        assert_eq!(url.path(), "/");
        assert_eq!(url.port_or_known_default(), Some(80));
        assert_eq!(url.query(), None);

        let url = validate_url("https://example.com").unwrap();
        assert_eq!(url.port_or_known_default(), Some(443));
    }
}
