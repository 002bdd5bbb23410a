/// MIME type of an encoded image, from its magic number. Unknown data is reported as JPEG.
pub fn detect_media_type(data: &[u8]) -> &'static str {
    if data.len() < 4 {
        return "image/jpeg";
    }

    match data {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', ..] => "image/gif",
        [b'%', b'P', b'D', b'F', ..] => "application/pdf",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_signatures() {
        assert_eq!(detect_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(
            detect_media_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            "image/png"
        );
        assert_eq!(detect_media_type(b"GIF89a"), "image/gif");
        assert_eq!(detect_media_type(b"%PDF-1.7"), "application/pdf");
        assert_eq!(detect_media_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_detect_defaults_to_jpeg() {
        assert_eq!(detect_media_type(&[]), "image/jpeg");
        assert_eq!(detect_media_type(b"hello world"), "image/jpeg");
        assert_eq!(detect_media_type(b"RIFF\x00\x00\x00\x00WAVE"), "image/jpeg");
    }
}
