//! Bounded-concurrency stream resolution pool
//!
//! Runs resolution tasks for the locators of one logical stream request
//! with a fixed concurrency ceiling. Each task's descriptors append to the
//! shared aggregate in completion order; each task's failure is logged and
//! swallowed, so a failing mirror never fails the whole request. The
//! aggregate (possibly empty) is returned only after every task settles,
//! with generic placeholder titles renumbered across the whole batch.

use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::errors::ResolveError;
use crate::models::StreamDescriptor;

/// Resolve a batch of locators with at most `limit` in flight
///
/// Zero locators resolve immediately to an empty aggregate.
pub async fn resolve_batch<F, Fut>(
    locators: Vec<String>,
    limit: usize,
    resolve: F,
) -> Vec<StreamDescriptor>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<StreamDescriptor>, ResolveError>>,
{
    if locators.is_empty() {
        return Vec::new();
    }

    let mut settled = stream::iter(locators.into_iter().map(|locator| {
        let task = resolve(locator.clone());
        async move { (locator, task.await) }
    }))
    .buffer_unordered(limit.max(1));

    let mut aggregate = Vec::new();
    while let Some((locator, result)) = settled.next().await {
        match result {
            Ok(descriptors) => aggregate.extend(descriptors),
            Err(e) => warn!("Stream resolution failed for {}: {}", locator, e),
        }
    }

    renumber_generic_titles(&mut aggregate);
    aggregate
}

/// Replace generic placeholder titles with a stable 1-based ordinal
///
/// Runs after aggregation across all locators of a request so the final
/// list never presents duplicate generic titles. Labeled variant titles
/// are left untouched.
pub fn renumber_generic_titles(streams: &mut [StreamDescriptor]) {
    let mut ordinal = 1;
    for stream in streams.iter_mut() {
        if stream.has_generic_title() {
            stream.title = format!("{} #{}", StreamDescriptor::GENERIC_TITLE, ordinal);
            ordinal += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn descriptor(title: &str, url: &str) -> StreamDescriptor {
        StreamDescriptor::new(title, url)
    }

    #[tokio::test]
    async fn empty_batch_resolves_immediately() {
        let streams = resolve_batch(Vec::new(), 10, |_| async { Ok(Vec::new()) }).await;
        assert!(streams.is_empty());
    }

    #[tokio::test]
    async fn one_failing_locator_does_not_fail_the_batch() {
        let locators = vec![
            "http://src/ok-a".to_string(),
            "http://src/broken".to_string(),
            "http://src/ok-b".to_string(),
        ];

        // Serial limit keeps completion order deterministic
        let streams = resolve_batch(locators, 1, |locator| async move {
            if locator.contains("broken") {
                Err(ResolveError::fetch(&locator, "connection refused"))
            } else {
                Ok(vec![StreamDescriptor::new("720p", locator)])
            }
        })
        .await;

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].url, "http://src/ok-a");
        assert_eq!(streams[1].url, "http://src/ok-b");
    }

    #[tokio::test]
    async fn concurrency_stays_under_the_ceiling() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let locators: Vec<String> = (0..30).map(|i| format!("http://src/{i}")).collect();

        let streams = resolve_batch(locators, 5, |locator| {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(vec![StreamDescriptor::new("720p", locator)])
            }
        })
        .await;

        assert_eq!(streams.len(), 30);
        assert!(peak.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn generic_titles_renumber_across_the_whole_batch() {
        let locators = vec!["http://src/one".to_string(), "http://src/two".to_string()];

        let streams = resolve_batch(locators, 1, |locator| async move {
            if locator.ends_with("one") {
                Ok(vec![
                    descriptor(StreamDescriptor::GENERIC_TITLE, "http://v/1"),
                    descriptor("1080p", "http://v/hd"),
                ])
            } else {
                Ok(vec![
                    descriptor(StreamDescriptor::GENERIC_TITLE, "http://v/2"),
                    descriptor(StreamDescriptor::GENERIC_TITLE, "http://v/3"),
                ])
            }
        })
        .await;

        let titles: Vec<&str> = streams.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Stream #1", "1080p", "Stream #2", "Stream #3"]);
    }

    #[test]
    fn renumbering_three_unlabeled_variants() {
        let mut streams = vec![
            descriptor("Stream", "http://v/1"),
            descriptor("Stream", "http://v/2"),
            descriptor("Stream", "http://v/3"),
        ];
        renumber_generic_titles(&mut streams);
        assert_eq!(streams[0].title, "Stream #1");
        assert_eq!(streams[1].title, "Stream #2");
        assert_eq!(streams[2].title, "Stream #3");
    }
}
