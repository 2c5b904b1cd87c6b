/// 当前时间（Unix 时间戳，秒）
pub fn now() -> i64 {
    chrono::Local::now().timestamp()
}

/// 当前时间（Unix 时间戳，毫秒）
pub fn now_millis() -> i64 {
    chrono::Local::now().timestamp_millis()
}

