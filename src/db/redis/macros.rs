/// Cache-aside helper.
///
/// Returns the cached value for `$key` when present; otherwise runs `$block`
/// to compute it, queues a background cache write with the given TTL, and
/// returns the computed value. `$cache` must provide `get_from_cache` and
/// `set_in_background`.
///
/// # Example
/// ```ignore
/// let drafts = cached!(cache, cache_key, 3600, async move {
///     call_generation_api().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
