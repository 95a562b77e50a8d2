// SPDX-License-Identifier: Apache-2.0

use super::NetworkController;
use crate::{
    etag_hash, node_config::is_node_specific, ErrorKind, Method,
    NetplaneError, NetworkUpdate, RequestContext,
};

impl NetworkController {
    /// `PUT`/`PATCH networks/{name}`. `PUT` replaces, `PATCH` merges;
    /// the `target` query decides whether global or node-specific keys
    /// are writable.
    pub async fn network_update(
        &self,
        name: &str,
        req: NetworkUpdate,
        ctx: &RequestContext,
        method: Method,
    ) -> Result<(), NetplaneError> {
        let (_, mut record) = self.store.get_in_any_state(name).await?;

        let clustered = self.is_clustered().await?;

        // The ETag must match what an untargeted GET produced, which
        // strips node-specific keys on clustered deployments.
        if ctx.target.is_none() && clustered {
            record.config.retain(|k, _| !is_node_specific(k));
        }

        let etag = etag_hash(&(
            &record.name,
            true,
            record.network_type.to_string(),
            &record.description,
            &record.config,
        ))?;
        if let Some(client_etag) = ctx.etag.as_deref() {
            if client_etag != etag {
                return Err(NetplaneError::new(
                    ErrorKind::PreconditionFailed,
                    format!("ETag doesn't match: {client_etag} vs {etag}"),
                ));
            }
        }

        if clustered {
            match ctx.target.as_deref() {
                None => {
                    for key in req.config.keys() {
                        if is_node_specific(key) {
                            return Err(NetplaneError::new(
                                ErrorKind::InvalidArgument,
                                format!(
                                    "Config key {key:?} is node-specific"
                                ),
                            ));
                        }
                    }
                }
                Some(_) => {
                    // A node-scope call may not silently mutate global
                    // keys.
                    for (key, value) in &req.config {
                        if !is_node_specific(key)
                            && record.config.get(key) != Some(value)
                        {
                            return Err(NetplaneError::new(
                                ErrorKind::InvalidArgument,
                                format!(
                                    "Config key {key:?} may not be used as \
                                     node-specific key"
                                ),
                            ));
                        }
                    }
                }
            }
        }

        self.do_network_update(name, req, ctx, method, clustered).await
    }

    /// Merge the request with the current local config, validate and
    /// hand it to the driver, which persists the row(s) and fans out
    /// global changes itself.
    async fn do_network_update(
        &self,
        name: &str,
        mut req: NetworkUpdate,
        ctx: &RequestContext,
        method: Method,
        clustered: bool,
    ) -> Result<(), NetplaneError> {
        let driver = self.drivers.load_by_name(name).await?;

        if ctx.target.is_none() && method != Method::Patch && clustered {
            // An untargeted replace on a cluster may not wipe the
            // node-specific keys the request was not allowed to carry;
            // fold them back in so validation sees a complete config.
            for (key, value) in driver.config() {
                if is_node_specific(key) {
                    req.config.insert(key.clone(), value.clone());
                }
            }
        } else if method == Method::Patch {
            for (key, value) in driver.config() {
                if !req.config.contains_key(key) {
                    req.config.insert(key.clone(), value.clone());
                }
            }
        }

        driver.validate(&req.config).await?;

        driver
            .update(&req, ctx.target.as_deref(), ctx.cluster_notification)
            .await
    }
}
