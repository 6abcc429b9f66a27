use storefront_client::ClientConfig;

/// Everything needed to assemble a [`crate::Storefront`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub client: ClientConfig,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}
