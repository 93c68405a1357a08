pub(crate) mod fetch;
pub(crate) mod iface;
pub(crate) mod pooled;
