//! Inbound command grammar.
//!
//! The peer addresses the endpoint with path-style text commands:
//!
//! ```text
//! arduino/digital/<pin>[/<0|1>]
//! arduino/analog/<pin>[/<0..255>]
//! arduino/mode/<pin>/<input|output|input_pullup>
//! event/<uri>&<value>
//! ```
//!
//! Parsing is pure: one frame payload in, one typed [`Command`] out.
//! Validation failures carry the offending token so the dispatcher can
//! echo it in the error frame. Anything outside the two known prefixes
//! is [`CommandError::UnknownPrefix`] — logged and discarded upstream.

use crate::ports::PinMode;

/// A decoded inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'f> {
    /// Digital pin read (no value) or write (value 0/1).
    Digital { pin: u8, value: Option<u8> },
    /// Analog pin read (no value) or PWM write (value 0–255).
    Analog { pin: u8, value: Option<u8> },
    /// Pin direction change.
    Mode { pin: u8, mode: PinMode },
    /// PUT parameters for an event resource. `uri` is the full inbound
    /// path (including the `event/` prefix), exactly as resources are
    /// registered.
    Put { uri: &'f str, value: &'f str },
}

/// Why a frame failed to decode into a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError<'f> {
    /// Not `arduino/…` or `event/…` (or an unknown `arduino/` verb).
    UnknownPrefix,
    /// The pin segment is not a clean integer (strict parsing only).
    MalformedPin(&'f str),
    /// Digital write value outside {0, 1}.
    InvalidDigitalValue(&'f str),
    /// Analog write value outside 0–255.
    InvalidAnalogValue(&'f str),
    /// `mode` command without a mode segment.
    MissingMode,
    /// Mode token matches none of the three keywords.
    InvalidMode(&'f str),
    /// `event/…` frame without the `&` separator.
    MissingPutParameters,
}

/// Decode one frame payload.
///
/// `strict_pins` governs the pin-number grammar: strict rejects anything
/// but a clean integer; lenient reproduces the legacy behaviour of
/// reading leading digits and defaulting to pin 0.
pub fn parse(frame: &str, strict_pins: bool) -> Result<Command<'_>, CommandError<'_>> {
    if frame.starts_with("event/") {
        return parse_put(frame);
    }
    let Some(rest) = frame.strip_prefix("arduino/") else {
        return Err(CommandError::UnknownPrefix);
    };

    let mut segments = rest.split('/');
    match segments.next() {
        Some("digital") => {
            let pin = parse_pin(segments.next(), strict_pins)?;
            let value = match segments.next() {
                None | Some("") => None,
                Some(seg) => match seg.parse::<u8>() {
                    Ok(v) if v <= 1 => Some(v),
                    _ => return Err(CommandError::InvalidDigitalValue(seg)),
                },
            };
            Ok(Command::Digital { pin, value })
        }
        Some("analog") => {
            let pin = parse_pin(segments.next(), strict_pins)?;
            let value = match segments.next() {
                None | Some("") => None,
                Some(seg) => match seg.parse::<u8>() {
                    Ok(v) => Some(v),
                    Err(_) => return Err(CommandError::InvalidAnalogValue(seg)),
                },
            };
            Ok(Command::Analog { pin, value })
        }
        Some("mode") => {
            let pin = parse_pin(segments.next(), strict_pins)?;
            let seg = match segments.next() {
                None | Some("") => return Err(CommandError::MissingMode),
                Some(seg) => seg,
            };
            let mode = match_mode(seg).ok_or(CommandError::InvalidMode(seg))?;
            Ok(Command::Mode { pin, mode })
        }
        _ => Err(CommandError::UnknownPrefix),
    }
}

fn parse_put(frame: &str) -> Result<Command<'_>, CommandError<'_>> {
    match frame.find('&') {
        Some(split) => Ok(Command::Put {
            uri: &frame[..split],
            value: &frame[split + 1..],
        }),
        None => Err(CommandError::MissingPutParameters),
    }
}

fn parse_pin<'f>(
    segment: Option<&'f str>,
    strict: bool,
) -> Result<u8, CommandError<'f>> {
    let seg = segment.unwrap_or("");
    if strict {
        return seg.parse::<u8>().map_err(|_| CommandError::MalformedPin(seg));
    }
    // Legacy grammar: take leading digits, default to pin 0.
    let digits: u32 = seg
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        });
    Ok(digits.min(u32::from(u8::MAX)) as u8)
}

/// Case-insensitive substring match against the three mode keywords.
/// `input_pullup` is checked first — it contains `input`.
fn match_mode(segment: &str) -> Option<PinMode> {
    let mut lowered = heapless::String::<24>::new();
    for ch in segment.chars() {
        lowered.push(ch.to_ascii_lowercase()).ok()?;
    }
    if lowered.contains("input_pullup") {
        Some(PinMode::InputPullup)
    } else if lowered.contains("input") {
        Some(PinMode::Input)
    } else if lowered.contains("output") {
        Some(PinMode::Output)
    } else {
        None
    }
}
