use crate::result::result;
use actix_web::{Responder, get, web};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(status);
}

#[get("/status")]
pub async fn status() -> impl Responder {
    web::Json(result())
}
