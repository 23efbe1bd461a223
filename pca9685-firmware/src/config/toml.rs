//! Simple TOML parser for the board configuration
//!
//! Handles only the subset `board.toml` uses:
//! - Key = value pairs (integer, hex integer, boolean)
//! - [section] headers
//! - Flat integer arrays: duty = [0, 512, 4095]
//! - Comments (# ...)

use heapless::Vec;
use pca9685_core::CHANNEL_COUNT;

use super::BoardConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Key not recognised in its section
    UnknownKey,
    /// More duty values than channels
    TooManyItems,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Pca9685,
    I2c,
    Channels,
}

/// Parse TOML text into a BoardConfig
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<BoardConfig, ParseError> {
    let mut config = BoardConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "pca9685" => Ok(Section::Pca9685),
        "i2c" => Ok(Section::I2c),
        "channels" => Ok(Section::Channels),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    config: &mut BoardConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Pca9685, "address") => config.controller.address = parse_int(value)?,
        (Section::Pca9685, "frequency_hz") => config.controller.frequency_hz = parse_int(value)?,
        (Section::Pca9685, "sleep_during_prescale") => {
            config.controller.sleep_during_prescale = parse_bool(value)?
        }
        (Section::Pca9685, "totem_pole") => config.totem_pole = parse_bool(value)?,
        (Section::I2c, "frequency") => config.i2c_frequency = parse_int(value)?,
        (Section::Channels, "duty") => config.duty = parse_duty(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) => value[..hash_pos].trim(),
        None => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a decimal or 0x-prefixed hex integer
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let raw = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    }
    .map_err(|_| ParseError::InvalidValue)?;

    T::try_from(raw).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse "[a, b, c]" into duty values
fn parse_duty(value: &str) -> Result<Vec<u16, CHANNEL_COUNT>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut duty = Vec::new();
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        duty.push(parse_int(item)?).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(duty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = r#"
# test board
[pca9685]
address = 0x41   # A0 high
frequency_hz = 50
sleep_during_prescale = false
totem_pole = false

[i2c]
frequency = 100000

[channels]
duty = [0, 307, 4095]
"#;

    #[test]
    fn test_parse_board() {
        let config = parse_config(BOARD).unwrap();
        assert_eq!(config.controller.address, 0x41);
        assert_eq!(config.controller.frequency_hz, 50);
        assert!(!config.controller.sleep_during_prescale);
        assert!(!config.totem_pole);
        assert_eq!(config.i2c_frequency, 100_000);
        assert_eq!(config.duty.as_slice(), &[0, 307, 4095]);
    }

    #[test]
    fn test_defaults_when_empty() {
        assert_eq!(parse_config("").unwrap(), BoardConfig::default());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<u8>("0x40"), Ok(0x40));
        assert_eq!(parse_int::<u16>("1000"), Ok(1000));
        assert_eq!(parse_int::<u8>("0x140"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>("forty"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_duty_limits() {
        assert!(parse_duty("[]").unwrap().is_empty());
        assert_eq!(parse_duty("[1, 2,]").unwrap().as_slice(), &[1, 2]);
        assert_eq!(
            parse_duty("[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]"),
            Err(ParseError::TooManyItems)
        );
        assert_eq!(parse_duty("1, 2"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[servo]\n"), Err(ParseError::InvalidSection));
        assert_eq!(
            parse_config("[pca9685]\nbrightness = 3\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[pca9685]\ntotem_pole = yes\n"),
            Err(ParseError::InvalidValue)
        );
    }
}
