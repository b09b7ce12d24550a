//! HDMI-CEC timing constants, bit classification, and name tables
//!
//! All tolerance windows are strictly open intervals: a duration landing
//! exactly on a window boundary is rejected. Durations are in milliseconds
//! measured from the relevant falling edge.

/// Start sequence: minimum low-phase duration
pub const START_LOW_MIN_MS: f64 = 3.5;
/// Start sequence: maximum low-phase duration
pub const START_LOW_MAX_MS: f64 = 3.9;
/// Start sequence: minimum total duration
pub const START_PERIOD_MIN_MS: f64 = 4.3;
/// Start sequence: maximum total duration
pub const START_PERIOD_MAX_MS: f64 = 4.7;

/// Logical one: minimum low-phase duration
pub const BIT_ONE_LOW_MIN_MS: f64 = 0.4;
/// Logical one: maximum low-phase duration
pub const BIT_ONE_LOW_MAX_MS: f64 = 0.8;
/// Logical zero: minimum low-phase duration
pub const BIT_ZERO_LOW_MIN_MS: f64 = 1.3;
/// Logical zero: maximum low-phase duration
pub const BIT_ZERO_LOW_MAX_MS: f64 = 1.7;
/// Data bit cell: minimum total duration
pub const BIT_PERIOD_MIN_MS: f64 = 2.05;
/// Data bit cell: maximum total duration
pub const BIT_PERIOD_MAX_MS: f64 = 2.75;

/// ACK: minimum asserted low-phase duration
pub const ACK_LOW_MIN_MS: f64 = 1.3;
/// ACK: maximum asserted low-phase duration
pub const ACK_LOW_MAX_MS: f64 = 1.7;

/// Signal free time: minimum before the next message may start
pub const FREE_TIME_MIN_MS: f64 = 2.05;
/// Signal free time: nominal bit-period spacing
pub const FREE_TIME_NOMINAL_MS: f64 = 2.4;

/// Highest toggle frequency the line can carry, in Hz
pub const MAX_FREQUENCY_HZ: u32 = 2500;
/// Minimum capture sample rate for reliable decoding, in Hz
pub const MIN_SAMPLE_RATE_HZ: u32 = 10_000;

/// Maximum number of operand blocks in a message
pub const MAX_MESSAGE_OPERANDS: usize = 14;
/// Maximum number of blocks in a message (header + opcode + operands)
pub const MAX_MESSAGE_BLOCKS: usize = MAX_MESSAGE_OPERANDS + 2;

/// Classify a data bit cell's low-phase duration.
///
/// Returns `Some(true)` for a one, `Some(false)` for a zero, and `None`
/// when the duration fits neither window.
pub fn classify_bit(low_ms: f64) -> Option<bool> {
    if low_ms > BIT_ONE_LOW_MIN_MS && low_ms < BIT_ONE_LOW_MAX_MS {
        Some(true)
    } else if low_ms > BIT_ZERO_LOW_MIN_MS && low_ms < BIT_ZERO_LOW_MAX_MS {
        Some(false)
    } else {
        None
    }
}

/// Check a start sequence's low-phase duration.
pub fn start_low_valid(low_ms: f64) -> bool {
    low_ms > START_LOW_MIN_MS && low_ms < START_LOW_MAX_MS
}

/// Check a start sequence's total duration.
pub fn start_period_valid(period_ms: f64) -> bool {
    period_ms > START_PERIOD_MIN_MS && period_ms < START_PERIOD_MAX_MS
}

/// Check a data bit cell's total duration.
pub fn bit_period_valid(period_ms: f64) -> bool {
    period_ms > BIT_PERIOD_MIN_MS && period_ms < BIT_PERIOD_MAX_MS
}

/// Check whether an ACK low phase counts as asserted.
pub fn ack_asserted(low_ms: f64) -> bool {
    low_ms > ACK_LOW_MIN_MS && low_ms < ACK_LOW_MAX_MS
}

/// Human-readable name for a logical device address nibble.
pub fn device_address_name(address: u8) -> &'static str {
    match address & 0x0F {
        0x0 => "TV",
        0x1 => "Recorder 1",
        0x2 => "Recorder 2",
        0x3 => "Tuner 1",
        0x4 => "Player 1",
        0x5 => "Audio System",
        0x6 => "Tuner 2",
        0x7 => "Tuner 3",
        0x8 => "Player 2",
        0x9 => "Recorder 3",
        0xA => "Tuner 4",
        0xB => "Player 3",
        0xC => "Reserved 1",
        0xD => "Reserved 2",
        0xE => "Free Use",
        _ => "Unregistered/Broadcast",
    }
}

/// Human-readable name for an opcode, when it has one.
pub fn opcode_name(opcode: u8) -> Option<&'static str> {
    let name = match opcode {
        0x00 => "Feature Abort",
        0x04 => "Image View On",
        0x05 => "Tuner Step Increment",
        0x06 => "Tuner Step Decrement",
        0x07 => "Tuner Device Status",
        0x08 => "Give Tuner Device Status",
        0x09 => "Record On",
        0x0A => "Record Status",
        0x0B => "Record Off",
        0x0D => "Text View On",
        0x0F => "Record TV Screen",
        0x1A => "Give Deck Status",
        0x1B => "Deck Status",
        0x32 => "Set Menu Language",
        0x33 => "Clear Analogue Timer",
        0x34 => "Set Analogue Timer",
        0x35 => "Timer Status",
        0x36 => "Standby",
        0x41 => "Play",
        0x42 => "Deck Control",
        0x43 => "Timer Cleared Status",
        0x44 => "User Control Pressed",
        0x45 => "User Control Released",
        0x46 => "Give OSD Name",
        0x47 => "Set OSD Name",
        0x64 => "Set OSD String",
        0x67 => "Set Timer Program Title",
        0x70 => "System Audio Mode Request",
        0x71 => "Give Audio Status",
        0x72 => "Set System Audio Mode",
        0x7A => "Report Audio Status",
        0x7D => "Give System Audio Mode Status",
        0x7E => "System Audio Mode Status",
        0x80 => "Routing Change",
        0x81 => "Routing Information",
        0x82 => "Active Source",
        0x83 => "Give Physical Address",
        0x84 => "Report Physical Address",
        0x85 => "Request Active Source",
        0x86 => "Set Stream Path",
        0x87 => "Device Vendor ID",
        0x89 => "Vendor Command",
        0x8A => "Vendor Remote Button Down",
        0x8B => "Vendor Remote Button Up",
        0x8C => "Give Device Vendor ID",
        0x8D => "Menu Request",
        0x8E => "Menu Status",
        0x8F => "Give Device Power Status",
        0x90 => "Report Power Status",
        0x91 => "Get Menu Language",
        0x92 => "Select Analogue Service",
        0x93 => "Select Digital Service",
        0x97 => "Set Digital Timer",
        0x99 => "Clear Digital Timer",
        0x9A => "Set Audio Rate",
        0x9D => "Inactive Source",
        0x9E => "CEC Version",
        0x9F => "Get CEC Version",
        0xA0 => "Vendor Command With ID",
        0xA1 => "Clear External Timer",
        0xA2 => "Set External Timer",
        0xFF => "Abort",
        _ => return None,
    };
    Some(name)
}
