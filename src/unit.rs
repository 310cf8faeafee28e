//! GATT unit UUID to display label lookup.

use tracing::warn;

/// Known unit codes and their labels.
const UNITS: &[(u16, &str)] = &[
    (0x2700, ""),      // unitless
    (0x2713, "m/s²"),  // acceleration (metres per second squared)
    (0x2724, "Pa"),    // pressure (pascal)
    (0x2728, "V"),     // electric potential difference (volt)
    (0x272D, "uT"),    // magnetic flux density (tesla, shown as microtesla)
    (0x272F, "°C"),    // thermodynamic temperature (degree Celsius)
    (0x2743, "rad/s"), // angular velocity (radian per second)
    (0x2763, "°"),     // plane angle (degree)
    (0x27AD, "%"),     // percentage
    (0x27C4, "ppm"),   // concentration (parts per million)
    (0x27C5, "ppb"),   // concentration (parts per billion)
];

/// Look up the label for a unit code without logging.
pub fn lookup_unit(code: u16) -> Option<&'static str> {
    UNITS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

/// Label for a unit code; unknown codes yield an empty label and a warning.
pub fn unit_label(code: u16) -> &'static str {
    lookup_unit(code).unwrap_or_else(|| {
        warn!("Unknown unit code 0x{code:04X}");
        ""
    })
}
