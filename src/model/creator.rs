//! The device and software that authored an entry.

use jiff::Timestamp;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Creator {
    pub device_agent: String,
    pub host_name: String,
    pub os_agent: String,
    pub software_agent: String,
    pub generation_date: Option<Timestamp>,
}
