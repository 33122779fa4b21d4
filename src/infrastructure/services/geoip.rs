//! GeoIP classification backed by a MaxMind country database.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::geoip2;

use crate::domain::services::{IpAddressParser, ParserError};

/// [`IpAddressParser`] over a GeoLite2/GeoIP2 country database file.
///
/// The reader memory-maps the database once at startup and is safe to share
/// across requests.
pub struct MaxMindIpParser {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl MaxMindIpParser {
    /// Opens the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying reader error when the file is missing or not a
    /// valid MaxMind database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, maxminddb::MaxMindDBError> {
        let reader = maxminddb::Reader::open_readfile(path)?;
        Ok(Self { reader })
    }
}

impl IpAddressParser for MaxMindIpParser {
    fn parse(&self, ip: IpAddr) -> Result<String, ParserError> {
        let country: geoip2::Country = self
            .reader
            .lookup(ip)
            .map_err(|e| ParserError::Failed(format!("failed to get country from IP: {}", e)))?;

        country
            .country
            .and_then(|c| c.iso_code)
            .map(str::to_string)
            .ok_or_else(|| ParserError::Failed("country record has no ISO code".to_string()))
    }
}
