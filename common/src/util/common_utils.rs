use uuid::Uuid;

pub fn build_id() -> String {
    let uuid = Uuid::new_v4().simple();
    format!("{}", uuid)
}

/// 无序二元组的稳定键：两端 ID 排序后以 `:` 拼接
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b { format!("{}:{}", a, b) } else { format!("{}:{}", b, a) }
}
