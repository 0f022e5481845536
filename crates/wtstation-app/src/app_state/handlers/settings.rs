use serde::Deserialize;
use serde_json::Value;

use super::store_err;
use crate::app_state::core::StationApp;
use crate::app_state::ipc_dispatch::{to_value, HandlerResult};
use crate::app_state::payload::parse;

#[derive(Deserialize)]
struct SettingUpdate {
    key: String,
    value: Value,
}

impl StationApp {
    /// Store one preference; replies with the merged settings.
    pub(in crate::app_state) fn handle_settings_set(&mut self, payload: &Value) -> HandlerResult {
        let update: SettingUpdate = parse(payload)?;
        let settings = self
            .store
            .set_setting(&update.key, update.value)
            .map_err(store_err)?;
        tracing::debug!(key = %update.key, "Setting saved");
        Ok(to_value(settings))
    }
}
