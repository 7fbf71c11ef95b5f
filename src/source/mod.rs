//! Image acquisition and decoding.
//!
//! Bytes come from a local path (with `~/` expansion) or an HTTP(S) URL,
//! bounded in size on both paths and in time on the network path, and are
//! decoded into an in-memory raster.

mod decode;
mod fetch;

pub use decode::{
    check_dimensions, decode, format_name, DecodeError, Decoded, FALLBACK_FORMAT, PRIMARY_FORMATS,
};
pub use fetch::{
    expand_home, is_http, AcquisitionError, FetchOptions, Fetched, Fetcher, ACCEPT_IMAGES,
    DEFAULT_USER_AGENT, FETCH_TIMEOUT, MAX_IMAGE_BYTES,
};
