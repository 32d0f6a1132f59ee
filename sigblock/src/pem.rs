//! Strict PEM ([RFC 7468](https://tools.ietf.org/html/rfc7468)) text encoding.
//!
//! Only the subset this crate handles is accepted: one `BEGIN`/`END` pair with identical
//! labels, a base64 body split over lines, and optional explanatory text before the block.
//! Headers (`Proc-Type:` and friends) are not part of RFC 7468 and are rejected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const BOUNDARY_DASHES: &str = "-----";
const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";

/// Line width of rendered base64 bodies.
const LINE_WIDTH: usize = 64;

/// Label used when rendering a signature block.
pub const PKCS7_PEM_LABEL: &str = "PKCS7";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PemError {
    /// no `BEGIN` line
    #[error("pem header not found")]
    HeaderNotFound,

    /// label is empty or uses characters outside of RFC 7468 `labelchar`
    #[error("invalid pem label: {label:?}")]
    InvalidLabel { label: String },

    /// no `END` line
    #[error("pem footer not found for label {label}")]
    FooterNotFound { label: String },

    /// `END` label differs from the `BEGIN` one
    #[error("pem footer label {found} doesn't match header label {expected}")]
    LabelMismatch { expected: String, found: String },

    /// label isn't one of the accepted ones
    #[error("unexpected pem label {label}")]
    UnexpectedLabel { label: String },

    /// couldn't decode base64
    #[error("couldn't decode base64 body: {source}")]
    Base64Decoding { source: base64::DecodeError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem<'a> {
    label: String,
    data: Cow<'a, [u8]>,
}

impl<'a> Pem<'a> {
    pub fn new<S: Into<String>, D: Into<Cow<'a, [u8]>>>(label: S, data: D) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Cow<'a, [u8]> {
        self.data
    }
}

impl Pem<'static> {
    /// Parses the first PEM block found in `input`, whatever its label.
    pub fn parse(input: &str) -> Result<Self, PemError> {
        let mut lines = input.lines().map(str::trim_end);

        let label = lines
            .by_ref()
            .find_map(|line| boundary_label(line, BEGIN_PREFIX))
            .ok_or(PemError::HeaderNotFound)?;
        check_label(label)?;

        let mut body = String::new();
        let mut footer = None;
        for line in lines.by_ref() {
            if let Some(end_label) = boundary_label(line, END_PREFIX) {
                footer = Some(end_label);
                break;
            }
            body.push_str(line.trim_start());
        }

        match footer {
            None => {
                return Err(PemError::FooterNotFound {
                    label: label.to_owned(),
                })
            }
            Some(end_label) if end_label != label => {
                return Err(PemError::LabelMismatch {
                    expected: label.to_owned(),
                    found: end_label.to_owned(),
                })
            }
            Some(_) => {}
        }

        let data = STANDARD
            .decode(body)
            .map_err(|source| PemError::Base64Decoding { source })?;

        Ok(Pem::new(label, data))
    }

    /// Same as [`parse`](Self::parse), but fails unless the label is one of `accepted`.
    pub fn parse_labeled(input: &str, accepted: &[&str]) -> Result<Self, PemError> {
        let pem = Self::parse(input)?;

        if accepted.contains(&pem.label()) {
            Ok(pem)
        } else {
            Err(PemError::UnexpectedLabel { label: pem.label })
        }
    }
}

/// Label of a `-----BEGIN label-----` or `-----END label-----` line.
fn boundary_label<'l>(line: &'l str, prefix: &str) -> Option<&'l str> {
    line.strip_prefix(prefix)?.strip_suffix(BOUNDARY_DASHES)
}

// labelchar = %x21-2C / %x2E-7E, joined by single spaces or hyphens
fn check_label(label: &str) -> Result<(), PemError> {
    let valid = !label.is_empty()
        && !label.starts_with(|c: char| c == ' ' || c == '-')
        && !label.ends_with(|c: char| c == ' ' || c == '-')
        && !["  ", "--", " -", "- "].iter().any(|pair| label.contains(pair))
        && label.bytes().all(|byte| (0x20..=0x7E).contains(&byte));

    if valid {
        Ok(())
    } else {
        Err(PemError::InvalidLabel {
            label: label.to_owned(),
        })
    }
}

impl FromStr for Pem<'static> {
    type Err = PemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = STANDARD.encode(&self.data);

        writeln!(f, "{}{}{}", BEGIN_PREFIX, self.label, BOUNDARY_DASHES)?;
        // base64 output is ASCII, so byte offsets are char boundaries
        let mut rest = body.as_str();
        while !rest.is_empty() {
            let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
            writeln!(f, "{}", line)?;
            rest = tail;
        }
        write!(f, "{}{}{}", END_PREFIX, self.label, BOUNDARY_DASHES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sigblock_test_data::{RSA_1024_PK_1, SIGNER_V3_CERT};

    #[test]
    fn certificate_renders_back_identically() {
        let pem = Pem::parse(SIGNER_V3_CERT).unwrap();
        assert_eq!(pem.label(), "CERTIFICATE");
        assert_eq!(pem.data()[0], 0x30);
        assert_eq!(pem.to_string(), SIGNER_V3_CERT.trim_end());

        let parsed: Pem = SIGNER_V3_CERT.parse().unwrap();
        assert_eq!(parsed, pem);
    }

    #[test]
    fn explanatory_text_and_crlf() {
        let input = format!("subject=CN=Signer\r\n\r\n{}", RSA_1024_PK_1.replace('\n', "\r\n"));
        let pem = Pem::parse(&input).unwrap();
        assert_eq!(pem, Pem::parse(RSA_1024_PK_1).unwrap());
    }

    #[test]
    fn accepted_labels() {
        let pem = Pem::parse_labeled(RSA_1024_PK_1, &["PRIVATE KEY", "RSA PRIVATE KEY"]).unwrap();
        assert_eq!(pem.label(), "RSA PRIVATE KEY");

        let err = Pem::parse_labeled(SIGNER_V3_CERT, &[PKCS7_PEM_LABEL]).unwrap_err();
        assert_eq!(
            err,
            PemError::UnexpectedLabel {
                label: "CERTIFICATE".to_owned()
            }
        );
    }

    #[test]
    fn short_body_is_a_single_line() {
        let pem = Pem::new(PKCS7_PEM_LABEL, &b"signature"[..]);
        expect_test::expect![[r#"
            -----BEGIN PKCS7-----
            c2lnbmF0dXJl
            -----END PKCS7-----"#]]
        .assert_eq(&pem.to_string());
    }

    #[rstest]
    #[case::no_header("R0FSQkFHRQo=", PemError::HeaderNotFound)]
    #[case::no_footer(
        "-----BEGIN X-----\nR0FSQkFHRQo=\n",
        PemError::FooterNotFound { label: "X".to_owned() }
    )]
    #[case::mismatched_footer(
        "-----BEGIN X-----\nR0FSQkFHRQo=\n-----END Y-----\n",
        PemError::LabelMismatch { expected: "X".to_owned(), found: "Y".to_owned() }
    )]
    #[case::empty_label("-----BEGIN -----\n-----END -----\n", PemError::InvalidLabel { label: String::new() })]
    #[case::trailing_hyphen(
        "-----BEGIN X------\n-----END X------\n",
        PemError::InvalidLabel { label: "X-".to_owned() }
    )]
    #[case::single_line(
        "-----BEGIN X-----R0FSQkFHRQo=-----END X-----",
        PemError::InvalidLabel { label: "X-----R0FSQkFHRQo=-----END X".to_owned() }
    )]
    fn rejected(#[case] input: &str, #[case] expected: PemError) {
        assert_eq!(Pem::parse(input).unwrap_err(), expected);
    }

    #[test]
    fn bad_base64() {
        let err = Pem::parse("-----BEGIN X-----\n%%%%\n-----END X-----").unwrap_err();
        assert!(matches!(err, PemError::Base64Decoding { .. }));
    }
}
