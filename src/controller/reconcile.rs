// SPDX-License-Identifier: Apache-2.0

use super::NetworkController;
use crate::NetplaneError;

impl NetworkController {
    /// Bring up every non-pending managed network at daemon start. A
    /// misbehaving network is logged and skipped; it must not abort
    /// the daemon's own startup.
    pub async fn startup(&self) -> Result<(), NetplaneError> {
        for name in self.store.list_non_pending().await? {
            let driver = match self.drivers.load_by_name(&name).await {
                Ok(driver) => driver,
                Err(e) => {
                    log::error!("Failed to load network {name:?}: {e}");
                    continue;
                }
            };

            if let Err(e) = driver.validate(driver.config()).await {
                log::error!("Failed to validate network {name:?}: {e}");
                continue;
            }

            if let Err(e) = driver.start().await {
                log::error!("Failed to bring up network {name:?}: {e}");
            }
        }

        Ok(())
    }

    /// Stop every managed network at daemon shutdown, logging
    /// failures and continuing.
    pub async fn shutdown(&self) -> Result<(), NetplaneError> {
        for name in self.store.list_all().await? {
            let driver = match self.drivers.load_by_name(&name).await {
                Ok(driver) => driver,
                Err(e) => {
                    log::error!("Failed to load network {name:?}: {e}");
                    continue;
                }
            };

            if let Err(e) = driver.stop().await {
                log::error!("Failed to bring down network {name:?}: {e}");
            }
        }

        Ok(())
    }
}
