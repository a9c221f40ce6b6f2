/// Current UTC timestamp in milliseconds
pub fn now_millis() -> crate::types::Timestamp {
    chrono::Utc::now().timestamp_millis()
}
