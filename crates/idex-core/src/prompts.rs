//! Instruction prompts sent to the vision model, one per document type.

use crate::models::DocumentType;

const PAN_PROMPT: &str = r#"Analyze this PAN card image carefully and extract the following information:

1. PAN Number: a 10-character alphanumeric code (5 letters, 4 digits, 1 letter, for example ABCDE1234F)
2. Name: the cardholder's full name as printed on the card
3. Father's Name: the father's name as printed on the card
4. Date of Birth: in DD/MM/YYYY format
5. Signature: whether a signature is present on the card ("Yes" or "No")

Copy the text exactly as it appears on the card. If a field is not clearly visible or not present, use "Not Found" for that field.

Respond with JSON in exactly this shape:
{
    "pan_number": "XXXXX0000X",
    "name": "Full Name",
    "fathers_name": "Father's Full Name",
    "date_of_birth": "DD/MM/YYYY",
    "signature_present": "Yes/No"
}

Important:
- Do not modify the extracted text
- Keep the capitalization shown on the card
- Capture every character of the PAN number
- Dates must use DD/MM/YYYY
"#;

const AADHAAR_PROMPT: &str = r#"Analyze this Aadhaar card image carefully and extract the following information:

1. Aadhaar Number: a 12-digit number, usually printed as XXXX XXXX XXXX; some digits may be masked
2. Name: the cardholder's full name as printed on the card
3. Date of Birth / Year of Birth: DD/MM/YYYY, or YYYY when only the year is printed
4. Gender: Male, Female or Other
5. Address: the complete address including street, city, state and PIN code
6. QR Code: whether a QR code is present on the card ("Yes" or "No")

Copy the text exactly as it appears on the card. If a field is not clearly visible or not present, use "Not Found" for that field.

Respond with JSON in exactly this shape:
{
    "aadhaar_number": "XXXX XXXX XXXX",
    "name": "Full Name",
    "date_of_birth": "DD/MM/YYYY or YYYY",
    "gender": "Male/Female/Other",
    "address": "Complete address with PIN code",
    "qr_code_present": "Yes/No"
}

Important:
- Do not modify the extracted text
- Keep the capitalization shown on the card
- Preserve the Aadhaar number spacing (XXXX XXXX XXXX)
- Include every part of the address
- Masked digits (XXXX) are expected on some cards
"#;

pub fn prompt_for(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::Pan => PAN_PROMPT,
        DocumentType::Aadhaar => AADHAAR_PROMPT,
    }
}

/// Prompt for a raw document-type tag, `None` when the tag names no known type.
pub fn get_prompt(tag: &str) -> Option<&'static str> {
    tag.parse::<DocumentType>().ok().map(prompt_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_prompt() {
        for doc_type in DocumentType::ALL {
            assert!(!prompt_for(doc_type).trim().is_empty());
        }
    }

    #[test]
    fn prompts_name_the_record_keys() {
        let pan = prompt_for(DocumentType::Pan);
        for key in ["pan_number", "name", "fathers_name", "date_of_birth", "signature_present"] {
            assert!(pan.contains(key), "PAN prompt missing {key}");
        }
        let aadhaar = prompt_for(DocumentType::Aadhaar);
        for key in [
            "aadhaar_number",
            "name",
            "date_of_birth",
            "gender",
            "address",
            "qr_code_present",
        ] {
            assert!(aadhaar.contains(key), "Aadhaar prompt missing {key}");
        }
    }

    #[test]
    fn tag_lookup_is_case_insensitive() {
        assert_eq!(get_prompt("PAN"), Some(PAN_PROMPT));
        assert_eq!(get_prompt("aadhaar"), Some(AADHAAR_PROMPT));
    }

    #[test]
    fn unknown_tag_has_no_prompt() {
        assert_eq!(get_prompt("voter_id"), None);
        assert_eq!(get_prompt(""), None);
    }
}
