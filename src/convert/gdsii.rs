//! GDSII stream format support, limited to what mask layouts need:
//! BOUNDARY elements with axis-aligned rings on a single structure.
//!
//! Records are big-endian, length-prefixed. The UNITS record carries the
//! 8-byte excess-64 base-16 reals of the format; the codec implements
//! the complete conversion in both directions.

use std::path::Path;

use crate::check::geometry::{Point, Polygon};
use crate::error::{Error, Result};

// Record type + data type, as they appear on the wire.
const HEADER: u16 = 0x0002;
const BGNLIB: u16 = 0x0102;
const LIBNAME: u16 = 0x0206;
const UNITS: u16 = 0x0305;
const ENDLIB: u16 = 0x0400;
const BGNSTR: u16 = 0x0502;
const STRNAME: u16 = 0x0606;
const ENDSTR: u16 = 0x0700;
const BOUNDARY: u16 = 0x0800;
const LAYER: u16 = 0x0D02;
const DATATYPE: u16 = 0x0E02;
const XY: u16 = 0x1003;
const ENDEL: u16 = 0x1100;

const GDS_VERSION: i16 = 600;
const LIB_NAME: &str = "MASKCHECK";
const STRUCT_NAME: &str = "TOP";

/// Write polygons as a single-structure GDSII library.
pub fn write_gdsii<P: AsRef<Path>>(polygons: &[Polygon], path: P) -> Result<()> {
    let mut out = Vec::new();

    push_record(&mut out, HEADER, &GDS_VERSION.to_be_bytes());
    push_record(&mut out, BGNLIB, &[0u8; 24]);
    push_string_record(&mut out, LIBNAME, LIB_NAME);

    // 1 database unit = 1 nm; user unit = 1 um.
    let mut units = Vec::with_capacity(16);
    units.extend_from_slice(&encode_real8(1e-3));
    units.extend_from_slice(&encode_real8(1e-9));
    push_record(&mut out, UNITS, &units);

    push_record(&mut out, BGNSTR, &[0u8; 24]);
    push_string_record(&mut out, STRNAME, STRUCT_NAME);

    for poly in polygons {
        push_record(&mut out, BOUNDARY, &[]);
        push_record(&mut out, LAYER, &0i16.to_be_bytes());
        push_record(&mut out, DATATYPE, &0i16.to_be_bytes());

        // XY closes the ring by repeating the first vertex.
        let mut xy = Vec::with_capacity((poly.vertices.len() + 1) * 8);
        for vertex in poly.vertices.iter().chain(poly.vertices.first()) {
            xy.extend_from_slice(&vertex.x.to_be_bytes());
            xy.extend_from_slice(&vertex.y.to_be_bytes());
        }
        push_record(&mut out, XY, &xy);
        push_record(&mut out, ENDEL, &[]);
    }

    push_record(&mut out, ENDSTR, &[]);
    push_record(&mut out, ENDLIB, &[]);

    std::fs::write(path, out)?;
    Ok(())
}

/// Read every BOUNDARY element of a GDSII file as a polygon. Ids are
/// assigned in file order.
pub fn read_gdsii<P: AsRef<Path>>(path: P) -> Result<Vec<Polygon>> {
    let bytes = std::fs::read(path)?;
    parse_gdsii(&bytes)
}

/// Parse GDSII bytes.
pub fn parse_gdsii(bytes: &[u8]) -> Result<Vec<Polygon>> {
    let mut polygons = Vec::new();
    let mut pos = 0usize;
    let mut in_boundary = false;
    let mut ring: Vec<Point> = Vec::new();
    let mut saw_endlib = false;

    while pos < bytes.len() {
        if bytes.len() - pos < 4 {
            return Err(Error::Format("truncated GDSII record header".into()));
        }
        let length = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]) as usize;
        let record = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]);
        if length < 4 || pos + length > bytes.len() {
            return Err(Error::Format(format!(
                "bad GDSII record length {} at offset {}",
                length, pos
            )));
        }
        let payload = &bytes[pos + 4..pos + length];
        pos += length;

        match record {
            BOUNDARY => {
                in_boundary = true;
                ring.clear();
            }
            XY if in_boundary => {
                if payload.len() % 8 != 0 {
                    return Err(Error::Format("odd GDSII XY payload".into()));
                }
                for chunk in payload.chunks_exact(8) {
                    let x = i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    let y = i32::from_be_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
                    ring.push(Point::new(x, y));
                }
            }
            ENDEL if in_boundary => {
                // Drop the duplicated closing vertex.
                if ring.len() > 1 && ring.first() == ring.last() {
                    ring.pop();
                }
                if !ring.is_empty() {
                    let id = polygons.len() as i32;
                    polygons.push(Polygon::from_vertices(id, std::mem::take(&mut ring)));
                }
                in_boundary = false;
            }
            ENDLIB => {
                saw_endlib = true;
                break;
            }
            // HEADER, BGNLIB, LIBNAME, UNITS, BGNSTR, STRNAME, LAYER,
            // DATATYPE, ENDSTR and anything exotic carry nothing the
            // checker needs.
            _ => {}
        }
    }

    if !saw_endlib {
        return Err(Error::Format("GDSII stream ended without ENDLIB".into()));
    }
    Ok(polygons)
}

fn push_record(out: &mut Vec<u8>, record: u16, payload: &[u8]) {
    let length = (payload.len() + 4) as u16;
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&record.to_be_bytes());
    out.extend_from_slice(payload);
}

// ASCII strings are padded with a trailing NUL to an even length.
fn push_string_record(out: &mut Vec<u8>, record: u16, value: &str) {
    let mut payload = value.as_bytes().to_vec();
    if payload.len() % 2 != 0 {
        payload.push(0);
    }
    push_record(out, record, &payload);
}

/// Encode an f64 as a GDSII 8-byte real: sign bit, excess-64 base-16
/// exponent, 56-bit mantissa with the value `mantissa / 2^56 * 16^exp`.
pub fn encode_real8(value: f64) -> [u8; 8] {
    if value == 0.0 {
        return [0; 8];
    }
    let negative = value < 0.0;
    let mut magnitude = value.abs();

    let mut exponent = 64i32;
    while magnitude >= 1.0 {
        magnitude /= 16.0;
        exponent += 1;
    }
    while magnitude < 1.0 / 16.0 {
        magnitude *= 16.0;
        exponent -= 1;
    }
    // magnitude is now in [1/16, 1); scale into the 56-bit mantissa.
    let mantissa = (magnitude * (1u64 << 56) as f64) as u64;

    let mut bytes = [0u8; 8];
    bytes[0] = (exponent as u8) & 0x7f;
    if negative {
        bytes[0] |= 0x80;
    }
    for i in 0..7 {
        bytes[7 - i] = ((mantissa >> (8 * i)) & 0xff) as u8;
    }
    bytes
}

/// Decode a GDSII 8-byte real.
pub fn decode_real8(bytes: &[u8; 8]) -> f64 {
    let negative = bytes[0] & 0x80 != 0;
    let exponent = i32::from(bytes[0] & 0x7f) - 64;
    let mut mantissa = 0u64;
    for &b in &bytes[1..8] {
        mantissa = (mantissa << 8) | u64::from(b);
    }
    if mantissa == 0 {
        return 0.0;
    }
    let value = mantissa as f64 / (1u64 << 56) as f64 * 16f64.powi(exponent);
    if negative {
        -value
    } else {
        value
    }
}
