use chrono::{DateTime, Utc};

pub trait Expired {
    fn expired_at(&self, now: DateTime<Utc>) -> bool;
}

impl Expired for DateTime<Utc> {
    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        (self.timestamp() - now.timestamp()).is_negative()
    }
}
