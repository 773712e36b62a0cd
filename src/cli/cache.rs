use crate::cache::ResponseCache;
use crate::Result;

/// Print the cache directory.
pub fn path() -> Result<()> {
    let cache = ResponseCache::new()?;
    println!("{}", cache.cache_dir().display());
    Ok(())
}

/// Delete every cached response.
pub fn clear() -> Result<()> {
    let cache = ResponseCache::new()?;
    let removed = cache.clear()?;
    println!(
        "Removed {} cached responses from {}",
        removed,
        cache.cache_dir().display()
    );
    Ok(())
}
