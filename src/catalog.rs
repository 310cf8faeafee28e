//! Names for standard 16-bit GATT service and characteristic UUIDs.

/// Services commonly exposed by wearable sensors.
const SERVICES: &[(u16, &str)] = &[
    (0x1800, "Generic Access"),
    (0x180A, "Device Information"),
    (0x180D, "Heart Rate"),
    (0x180F, "Battery"),
    (0x1814, "Running Speed and Cadence"),
    (0x1819, "Location"),
    (0x181A, "Env"),
    (0x181C, "User Data"),
];

const CHARACTERISTICS: &[(u16, &str)] = &[
    (0x2A19, "Level"),
    (0x2A24, "Model Number"),
    (0x2A26, "Firmware Revision"),
    (0x2A29, "Manufacturer Name"),
    (0x2A37, "Heart Rate Measurement"),
    (0x2A38, "Body Sensor Location"),
    (0x2A53, "RSC Measurement"),
    (0x2A6C, "Elevation"),
    (0x2A6D, "Pressure"),
    (0x2A6E, "Temperature"),
    (0x2A6F, "Humidity"),
    (0x2A76, "UV Index"),
    (0x2AA0, "Magnetic Flux Density 2D"),
    (0x2AA1, "Magnetic Flux Density 3D"),
];

fn lookup(table: &[(u16, &'static str)], uuid: u16) -> Option<&'static str> {
    table
        .iter()
        .find(|(known, _)| *known == uuid)
        .map(|(_, name)| *name)
}

pub fn service_name(uuid: u16) -> Option<&'static str> {
    lookup(SERVICES, uuid)
}

pub fn characteristic_name(uuid: u16) -> Option<&'static str> {
    lookup(CHARACTERISTICS, uuid)
}

/// Parse a `0x`-prefixed 16-bit UUID such as `0x180F`.
pub fn parse_uuid16(src: &str) -> Option<u16> {
    let hex = src.strip_prefix("0x").or_else(|| src.strip_prefix("0X"))?;
    u16::from_str_radix(hex, 16).ok()
}

/// Human-readable name for a service or characteristic token.
///
/// `0x`-prefixed UUIDs are looked up with `lookup_fn` and fall back to their
/// canonical `0xNNNN` spelling; anything else is a literal name in which `_`
/// stands for a space.
pub fn resolve_name(token: &str, lookup_fn: fn(u16) -> Option<&'static str>) -> String {
    match parse_uuid16(token) {
        Some(uuid) => lookup_fn(uuid)
            .map(str::to_string)
            .unwrap_or_else(|| format!("0x{uuid:04X}")),
        None => token.replace('_', " "),
    }
}
