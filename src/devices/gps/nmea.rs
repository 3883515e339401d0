//! NMEA sentence decoder
//!
//! Decodes RMC and GGA sentences into a [`PositioningRecord`]. The decoder
//! treats the `*` checksum delimiter as another field separator and performs
//! no checksum verification; the receiver link is short and framing errors
//! surface as malformed fields instead. Unrecognized sentence types are
//! ignored so the receiver can be reconfigured without breaking the decode
//! loop.

use core::fmt;
use heapless::String;

/// Capacity of the UTC time-of-day field ("hhmmss.sss")
pub const TIME_LEN: usize = 12;
/// Capacity of the UTC date field ("ddmmyy")
pub const DATE_LEN: usize = 8;
/// Capacity of the differential reference station field
pub const STATION_LEN: usize = 8;

/// GGA is the widest handled sentence: 15 fields plus the checksum tail
const MAX_FIELDS: usize = 20;

/// NMEA decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// A required field was missing or a numeric field failed to parse
    Malformed,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed => write!(f, "malformed NMEA sentence"),
        }
    }
}

/// Best-known GPS state, merged across sentence types
///
/// Fields are tagged optionals: `None` means the value has never been
/// decoded or the receiver last reported the field empty. Each sentence type
/// overwrites only the fields it defines, so the record accumulates the
/// freshest value per field across RMC and GGA.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositioningRecord {
    /// Instrument clock milliseconds when the record was last stamped
    pub timestamp_ms: u64,
    /// UTC time of day of the fix ("hhmmss\[.sss\]")
    pub fix_time: Option<String<TIME_LEN>>,
    /// UTC date of the fix ("ddmmyy")
    pub fix_date: Option<String<DATE_LEN>>,
    /// Receiver validity flag (`A` status)
    pub valid: Option<bool>,
    /// Latitude in signed decimal degrees, north positive
    pub latitude: Option<f64>,
    /// Longitude in signed decimal degrees, east positive
    pub longitude: Option<f64>,
    /// Speed over ground in knots
    pub speed_knots: Option<f32>,
    /// Course over ground in degrees
    pub course_deg: Option<f32>,
    /// Magnetic variation in degrees
    pub mag_variation: Option<f32>,
    /// Positioning mode indicator character
    pub mode: Option<char>,
    /// Fix quality code (0 = no fix, 1 = GPS, 2 = differential)
    pub quality: Option<u8>,
    /// Number of satellites used in the fix
    pub satellites: Option<u8>,
    /// Horizontal dilution of precision
    pub hdop: Option<f32>,
    /// Antenna altitude above mean sea level, meters
    pub altitude: Option<f32>,
    /// Geoid separation used as the altitude reference, meters
    pub altitude_ref: Option<f32>,
    /// Age of differential corrections, seconds
    pub diff_age: Option<f32>,
    /// Differential reference station id
    pub diff_station: Option<String<STATION_LEN>>,
}

impl PositioningRecord {
    /// Create an empty record with every field unknown
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decode one NMEA sentence into `record`
///
/// Dispatches on the 3-character sentence identifier after the talker
/// prefix, so `$GPRMC` and `$GNRMC` are handled alike. Sentences other than
/// RMC and GGA leave the record untouched and return `Ok`. A malformed
/// sentence returns `Err(DecodeError::Malformed)` with the record guaranteed
/// unchanged: every field is parsed into locals before any of them is
/// applied.
pub fn decode(sentence: &str, record: &mut PositioningRecord) -> Result<(), DecodeError> {
    let mut fields: heapless::Vec<&str, MAX_FIELDS> = heapless::Vec::new();
    for part in sentence.split(|c: char| c == ',' || c == '*') {
        if fields.push(part).is_err() {
            break;
        }
    }

    let ident = match fields.first() {
        Some(ident) => *ident,
        None => return Ok(()),
    };
    if ident.len() < 4 || !ident.is_char_boundary(3) {
        return Ok(());
    }

    match &ident[3..] {
        "RMC" => decode_rmc(&fields, record),
        "GGA" => decode_gga(&fields, record),
        _ => Ok(()),
    }
}

/// RMC: recommended minimum fix data
///
/// Field map: 1 time, 2 validity, 3/4 latitude, 5/6 longitude, 7 speed
/// (knots), 8 course, 9 date, 10 magnetic variation, 11 mode.
fn decode_rmc(fields: &[&str], record: &mut PositioningRecord) -> Result<(), DecodeError> {
    if fields.len() < 12 {
        return Err(DecodeError::Malformed);
    }

    let fix_time = copy_field::<TIME_LEN>(fields[1]);
    let valid = fields[2] == "A";
    let latitude = parse_coordinate(fields[3], fields[4], 2, "N")?;
    let longitude = parse_coordinate(fields[5], fields[6], 3, "E")?;
    let speed_knots = parse_optional_f32(fields[7])?;
    let course_deg = parse_optional_f32(fields[8])?;
    let fix_date = copy_field::<DATE_LEN>(fields[9]);
    let mag_variation = parse_optional_f32(fields[10])?;
    let mode = fields[11].chars().next();

    record.fix_time = fix_time;
    record.valid = Some(valid);
    record.latitude = latitude;
    record.longitude = longitude;
    record.speed_knots = speed_knots;
    record.course_deg = course_deg;
    record.fix_date = fix_date;
    record.mag_variation = mag_variation;
    record.mode = mode;
    Ok(())
}

/// GGA: fix quality and geometry data
///
/// Field map: 1 time, 2/3 latitude, 4/5 longitude, 6 quality, 7 satellite
/// count, 8 HDOP, 9 altitude, 11 altitude reference. Fields 10 and 12 are
/// unit letters and are skipped.
fn decode_gga(fields: &[&str], record: &mut PositioningRecord) -> Result<(), DecodeError> {
    if fields.len() < 12 {
        return Err(DecodeError::Malformed);
    }

    let fix_time = copy_field::<TIME_LEN>(fields[1]);
    let latitude = parse_coordinate(fields[2], fields[3], 2, "N")?;
    let longitude = parse_coordinate(fields[4], fields[5], 3, "E")?;
    let quality = parse_optional_u8(fields[6])?;
    let satellites = parse_optional_u8(fields[7])?;
    let hdop = parse_optional_f32(fields[8])?;
    let altitude = parse_optional_f32(fields[9])?;
    let altitude_ref = parse_optional_f32(fields[11])?;

    record.fix_time = fix_time;
    record.latitude = latitude;
    record.longitude = longitude;
    record.quality = quality;
    record.satellites = satellites;
    record.hdop = hdop;
    record.altitude = altitude;
    record.altitude_ref = altitude_ref;
    Ok(())
}

/// Parse a `ddmm.mmmm` / `dddmm.mmmm` coordinate with its hemisphere field
///
/// A field no longer than its degrees portion carries no fix and maps to
/// `None`. The value is negated unless the hemisphere matches `positive`.
fn parse_coordinate(
    field: &str,
    hemisphere: &str,
    degree_digits: usize,
    positive: &str,
) -> Result<Option<f64>, DecodeError> {
    if field.len() <= degree_digits {
        return Ok(None);
    }
    if !field.is_char_boundary(degree_digits) {
        return Err(DecodeError::Malformed);
    }

    let (deg, min) = field.split_at(degree_digits);
    let degrees: f64 = deg.parse().map_err(|_| DecodeError::Malformed)?;
    let minutes: f64 = min.parse().map_err(|_| DecodeError::Malformed)?;
    let value = degrees + minutes / 60.0;

    if hemisphere == positive {
        Ok(Some(value))
    } else {
        Ok(Some(-value))
    }
}

fn parse_optional_f32(field: &str) -> Result<Option<f32>, DecodeError> {
    if field.is_empty() {
        return Ok(None);
    }
    field
        .parse::<f32>()
        .map(Some)
        .map_err(|_| DecodeError::Malformed)
}

fn parse_optional_u8(field: &str) -> Result<Option<u8>, DecodeError> {
    if field.is_empty() {
        return Ok(None);
    }
    field
        .parse::<u8>()
        .map(Some)
        .map_err(|_| DecodeError::Malformed)
}

/// Copy a textual field, `None` when empty
fn copy_field<const N: usize>(field: &str) -> Option<String<N>> {
    if field.is_empty() {
        return None;
    }
    let mut out = String::new();
    for c in field.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RMC_FULL: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
    const GGA_FULL: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";

    #[test]
    fn test_decode_rmc_full_fix() {
        let mut record = PositioningRecord::new();
        decode(RMC_FULL, &mut record).unwrap();

        assert_eq!(record.fix_time.as_deref(), Some("123519"));
        assert_eq!(record.valid, Some(true));
        let lat = record.latitude.unwrap();
        let lon = record.longitude.unwrap();
        assert!((lat - (48.0 + 7.038 / 60.0)).abs() < 1e-9);
        assert!((lon - (11.0 + 31.000 / 60.0)).abs() < 1e-9);
        assert_eq!(record.speed_knots, Some(22.4));
        // Course comes from its own field, not the speed field.
        assert_eq!(record.course_deg, Some(84.4));
        assert_eq!(record.fix_date.as_deref(), Some("230394"));
        assert_eq!(record.mag_variation, Some(3.1));
        assert_eq!(record.mode, Some('W'));
    }

    #[test]
    fn test_decode_rmc_void_fix_clears_position() {
        let mut record = PositioningRecord::new();
        decode(RMC_FULL, &mut record).unwrap();

        decode("$GPRMC,123520,V,,,,,,,230394,,*6A", &mut record).unwrap();
        assert_eq!(record.fix_time.as_deref(), Some("123520"));
        assert_eq!(record.valid, Some(false));
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
        assert_eq!(record.speed_knots, None);
        assert_eq!(record.course_deg, None);
        assert_eq!(record.fix_date.as_deref(), Some("230394"));
        assert_eq!(record.mag_variation, None);
        assert_eq!(record.mode, None);
    }

    #[test]
    fn test_decode_rmc_southern_western_hemispheres() {
        let mut record = PositioningRecord::new();
        decode(
            "$GPRMC,220516,A,5133.820,S,00042.240,W,173.8,231.8,130694,004.2,E*49",
            &mut record,
        )
        .unwrap();

        let lat = record.latitude.unwrap();
        let lon = record.longitude.unwrap();
        assert!((lat + (51.0 + 33.820 / 60.0)).abs() < 1e-9);
        assert!((lon + (0.0 + 42.240 / 60.0)).abs() < 1e-9);
        assert_eq!(record.valid, Some(true));
    }

    #[test]
    fn test_decode_gga_fix_data() {
        let mut record = PositioningRecord::new();
        decode(GGA_FULL, &mut record).unwrap();

        let lat = record.latitude.unwrap();
        let lon = record.longitude.unwrap();
        assert!((lat - (48.0 + 7.038 / 60.0)).abs() < 1e-9);
        assert!((lon - (11.0 + 31.000 / 60.0)).abs() < 1e-9);
        assert_eq!(record.quality, Some(1));
        assert_eq!(record.satellites, Some(8));
        assert_eq!(record.hdop, Some(0.9));
        assert_eq!(record.altitude, Some(545.4));
        // Altitude reference is field 11, not a re-read of the altitude.
        assert_eq!(record.altitude_ref, Some(46.9));
    }

    #[test]
    fn test_decode_gga_empty_satellite_count() {
        let mut record = PositioningRecord::new();
        decode(
            "$GPGGA,123519,4807.038,N,01131.000,E,1,,0.9,545.4,M,46.9,M,,",
            &mut record,
        )
        .unwrap();

        assert_eq!(record.satellites, None);
        assert_eq!(record.quality, Some(1));
        assert_eq!(record.altitude, Some(545.4));
    }

    #[test]
    fn test_decode_gga_leaves_rmc_fields_alone() {
        let mut record = PositioningRecord::new();
        decode(RMC_FULL, &mut record).unwrap();
        decode(GGA_FULL, &mut record).unwrap();

        assert_eq!(record.valid, Some(true));
        assert_eq!(record.speed_knots, Some(22.4));
        assert_eq!(record.course_deg, Some(84.4));
        assert_eq!(record.fix_date.as_deref(), Some("230394"));
        assert_eq!(record.mode, Some('W'));
        assert_eq!(record.satellites, Some(8));
    }

    #[test]
    fn test_decode_unknown_sentence_is_noop() {
        let mut record = PositioningRecord::new();
        decode(RMC_FULL, &mut record).unwrap();
        let before = record.clone();

        decode(
            "$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74",
            &mut record,
        )
        .unwrap();
        assert_eq!(record, before);

        decode("$PUBX,00,081350.00,4717.113210,N", &mut record).unwrap();
        assert_eq!(record, before);

        decode("INVALID DATA", &mut record).unwrap();
        assert_eq!(record, before);

        decode("", &mut record).unwrap();
        assert_eq!(record, before);
    }

    #[test]
    fn test_decode_malformed_numeric_leaves_record_untouched() {
        let mut record = PositioningRecord::new();
        decode(RMC_FULL, &mut record).unwrap();
        let before = record.clone();

        let result = decode(
            "$GPRMC,123520,A,4807.038,N,01131.000,E,abc,084.4,230394,003.1,W*6A",
            &mut record,
        );
        assert_eq!(result, Err(DecodeError::Malformed));
        assert_eq!(record, before);
    }

    #[test]
    fn test_decode_short_sentence_is_malformed() {
        let mut record = PositioningRecord::new();
        decode(GGA_FULL, &mut record).unwrap();
        let before = record.clone();

        assert_eq!(
            decode("$GPRMC,123519,A", &mut record),
            Err(DecodeError::Malformed)
        );
        assert_eq!(
            decode("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4", &mut record),
            Err(DecodeError::Malformed)
        );
        assert_eq!(record, before);
    }

    #[test]
    fn test_decode_coordinate_shorter_than_degrees_is_no_fix() {
        let mut record = PositioningRecord::new();
        decode("$GPRMC,123519,V,48,N,011,E,,,230394,,", &mut record).unwrap();

        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
        assert_eq!(record.valid, Some(false));
    }

    #[test]
    fn test_decode_gnrmc_talker_prefix() {
        let mut record = PositioningRecord::new();
        decode(
            "$GNRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*74",
            &mut record,
        )
        .unwrap();

        assert!(record.latitude.is_some());
        assert_eq!(record.valid, Some(true));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let mut first = PositioningRecord::new();
        decode(RMC_FULL, &mut first).unwrap();

        let mut second = first.clone();
        decode(RMC_FULL, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_empty_time_and_date_map_to_none() {
        let mut record = PositioningRecord::new();
        decode("$GPRMC,,V,,,,,,,,,", &mut record).unwrap();

        assert_eq!(record.fix_time, None);
        assert_eq!(record.fix_date, None);
        assert_eq!(record.valid, Some(false));
    }
}
