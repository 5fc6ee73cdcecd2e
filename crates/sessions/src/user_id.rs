use std::fmt::Display;

use {
    chrono::{DateTime, Local, TimeZone},
    md5::{Digest, Md5},
};

/// Timestamp resolution of a user id: one id per second per seed.
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Per-session user id: `md5("<seed>_<YYYYMMDD_HHmmss>")` as lowercase hex.
pub fn derive_user_id<Tz>(seed: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut hasher = Md5::new();
    hasher.update(seed.as_bytes());
    hasher.update(b"_");
    hasher.update(at.format(STAMP_FORMAT).to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// [`derive_user_id`] at the current local time.
pub fn user_id_now(seed: &str) -> String {
    derive_user_id(seed, &Local::now())
}
