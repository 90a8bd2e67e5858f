use std::path::Path;
use time::{OffsetDateTime, PrimitiveDateTime};

pub fn path_to_str(path: &Path) -> Option<String> {
    path.to_str().map(String::from)
}

pub fn dedup<T: Ord>(mut vec: Vec<T>) -> Vec<T> {
    vec.sort_unstable();
    vec.dedup();
    vec
}

/// Current wall-clock instant as the naive UTC timestamp shows are stored in.
pub fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}
