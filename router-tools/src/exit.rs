use router_tools::transport::TransportError;

pub const INVALID_SELECTION: u8 = 1;
pub const TIMEOUT: u8 = 2;
pub const AUTH_FAILURE: u8 = 3;
pub const GENERIC: u8 = 4;

/// Map an error chain to the process exit code.
pub fn code_for(err: &anyhow::Error) -> u8 {
    match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<TransportError>())
    {
        Some(TransportError::ConnectTimeout { .. }) => TIMEOUT,
        Some(TransportError::AuthFailure { .. }) => AUTH_FAILURE,
        _ => GENERIC,
    }
}
