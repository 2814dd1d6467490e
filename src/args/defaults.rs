pub(crate) const DEFAULT_USER_AGENT: &str = concat!("pipeload/", env!("CARGO_PKG_VERSION"));
