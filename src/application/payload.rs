// Payload expansion: base64 decoding and CSV row extraction.
//
// This is the abortable front half of the pipeline. Both stages stop the
// whole request on failure; the user-visible error text is the body of the
// resulting 400 response.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use csv::ReaderBuilder;
use thiserror::Error;

/// Errors raised while expanding the payload into rows.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The input string is not valid standard base64.
    #[error("Error al decodificar base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded bytes are not well-formed CSV (bad quoting, ragged
    /// rows, invalid UTF-8).
    #[error("Error al leer el CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Decodes a standard base64 string (padding required) into raw bytes.
///
/// An empty input decodes to an empty byte vector, which later fails the
/// batch precondition rather than this stage.
pub fn decode_payload(data: &str) -> Result<Vec<u8>, PayloadError> {
    Ok(STANDARD.decode(data)?)
}

/// Reads CSV bytes into an ordered sequence of rows.
///
/// No header row is assumed. Blank lines are skipped, standard CSV quoting
/// is honored, and the reader enforces a consistent field count across
/// rows. Empty input yields an empty sequence.
pub fn read_rows(data: &[u8]) -> Result<Vec<Vec<String>>, PayloadError> {
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(data);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== base64 decoding ====================

    #[test]
    fn test_decode_payload_valid() {
        let decoded = decode_payload("aG9sYQ==").unwrap();
        assert_eq!(decoded, b"hola");
    }

    #[test]
    fn test_decode_payload_empty_string() {
        // Empty input is valid base64 for zero bytes
        let decoded = decode_payload("").unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_payload_invalid_input() {
        let error = decode_payload("esto-no-es-base64!!").unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Error al decodificar base64: "),
            "unexpected message: {error}"
        );
    }

    #[test]
    fn test_decode_payload_rejects_missing_padding() {
        // The standard engine rejects unpadded input
        assert!(decode_payload("aG9sYQ").is_err());
    }

    // ==================== CSV reading ====================

    #[test]
    fn test_read_rows_simple() {
        let data = b"1,2024-09-30,2024-09-13,false,195,2\n2,2024-10-31,2024-10-01,true,7,9\n";
        let rows = read_rows(data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec!["1", "2024-09-30", "2024-09-13", "false", "195", "2"]
        );
        assert_eq!(rows[1][3], "true");
    }

    #[test]
    fn test_read_rows_quoted_fields() {
        let data = b"1,\"2024-09-30\",\"with, comma\",false,195,2\n";
        let rows = read_rows(data).unwrap();

        assert_eq!(rows[0][1], "2024-09-30");
        assert_eq!(rows[0][2], "with, comma");
    }

    #[test]
    fn test_read_rows_skips_blank_lines() {
        let data = b"1,a,b,true,1,2\n\n2,c,d,false,3,4\n";
        let rows = read_rows(data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "2");
    }

    #[test]
    fn test_read_rows_empty_input() {
        let rows = read_rows(b"").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_rejects_ragged_rows() {
        // Inconsistent field counts are a reader error, not a short row
        let data = b"1,a,b,true,1,2\n2,c,d\n";
        let error = read_rows(data).unwrap_err();

        assert!(
            error.to_string().starts_with("Error al leer el CSV: "),
            "unexpected message: {error}"
        );
    }

    #[test]
    fn test_read_rows_rejects_invalid_utf8() {
        let data = b"1,a,\xFF,true,1,2\n";
        assert!(read_rows(data).is_err());
    }

    #[test]
    fn test_read_rows_handles_crlf() {
        let data = b"1,a,b,true,1,2\r\n2,c,d,false,3,4\r\n";
        let rows = read_rows(data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][5], "4");
    }

    // ==================== round trip ====================

    #[test]
    fn test_encode_decode_round_trip_preserves_rows() {
        // decode(encode(csv)) yields the input rows unchanged
        let csv = "5,2024-09-30,2024-09-13,false,195,2\n6,2024-10-31,2024-10-01,true,7,9\n";
        let encoded = STANDARD.encode(csv.as_bytes());

        let decoded = decode_payload(&encoded).unwrap();
        assert_eq!(decoded, csv.as_bytes());

        let rows = read_rows(&decoded).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec!["5", "2024-09-30", "2024-09-13", "false", "195", "2"]
        );
        assert_eq!(
            rows[1],
            vec!["6", "2024-10-31", "2024-10-01", "true", "7", "9"]
        );
    }
}
