/// Next id for a collection: one past the largest existing id, or 1 when the
/// collection is empty.
///
/// Nothing is cached between calls. Callers creating records concurrently in
/// the same collection must serialize access themselves.
pub fn next_id<I>(ids: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    ids.into_iter().max().map_or(1, |max| max + 1)
}
