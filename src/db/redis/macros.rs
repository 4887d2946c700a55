/// Read-through caching for an async computation.
///
/// `$cache` is an `Option<&Cache>`. With no cache the block simply runs.
/// On a miss the computed value is written back in the background with a
/// TTL of `$ttl` seconds. Must be used inside a function returning
/// `AppResult`.
///
/// ```rust,ignore
/// let types: Vec<String> = cached!(state.cache.as_ref(), key, 3600, async {
///     catalog.product_types(&filter).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                if let Some(hit) = cache.get_from_cache(&$key).await? {
                    tracing::debug!(key = %$key, "Cache hit");
                    Ok(hit)
                } else {
                    let value = $block.await?;
                    cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
            }
            None => $block.await,
        }
    }};
}
