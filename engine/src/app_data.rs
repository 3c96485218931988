/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::{fmt::Debug, sync::Arc};

use alert_relay::EventStore;

use crate::telegram::Notifier;

pub(crate) struct AppData {
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) store: EventStore,
    /// Shared secret required in the body of every incoming request;
    /// `None` disables the check.
    pub(crate) secret: Option<String>,
    pub(crate) app_version: String,
}

#[derive(Debug)]
enum AppDataDebug {
    Notifier,
    EventStore,
}

impl Debug for AppData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppData")
            .field("notifier", &AppDataDebug::Notifier)
            .field("store", &AppDataDebug::EventStore)
            .field("secret", &self.secret.as_ref().map(|_| "<set>"))
            .field("app_version", &self.app_version)
            .finish()
    }
}
