pub(crate) mod slot;
pub(crate) mod slot_cache;
