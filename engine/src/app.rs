/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use actix_web::{
    web::{get, resource, scope, Data},
    HttpResponse, Scope,
};
use tracing::instrument;

use crate::AppData;

pub(crate) fn service() -> Scope {
    scope("/version").service(resource("").route(get().to(get_version)))
}

#[instrument]
async fn get_version(data: Data<AppData>) -> HttpResponse {
    HttpResponse::Ok().json(&data.app_version)
}
