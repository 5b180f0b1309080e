//! Form body decoding module
//!
//! Decodes `application/x-www-form-urlencoded` bodies into the fixed
//! squirrel field set.

use thiserror::Error;

/// Decoding failure for a squirrel form body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Required field absent or empty
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// Fields accepted by create and update requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquirrelForm {
    pub name: String,
    pub size: String,
}

impl SquirrelForm {
    /// Decode a form body. Unknown keys are ignored; for repeated keys the
    /// first occurrence wins.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let mut name = None;
        let mut size = None;

        for (key, value) in parse_pairs(body) {
            let slot = match key.as_str() {
                "name" => &mut name,
                "size" => &mut size,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value);
            }
        }

        Ok(Self {
            name: name.ok_or(FormError::MissingField("name"))?,
            size: size.ok_or(FormError::MissingField("size"))?,
        })
    }
}

/// Split a form body into decoded `(key, value)` pairs.
///
/// Pairs are separated by `&`; key and value by the first `=`. A pair with
/// no `=` has an empty value. Empty segments are skipped.
pub fn parse_pairs(body: &[u8]) -> Vec<(String, String)> {
    body.split(|&b| b == b'&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = match segment.iter().position(|&b| b == b'=') {
                Some(eq) => (&segment[..eq], &segment[eq + 1..]),
                None => (segment, &[][..]),
            };
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Decode `+` as space and `%XX` escapes; malformed escapes are kept literally
fn decode_component(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < raw.len() => {
                match (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed() {
        let form = SquirrelForm::parse(b"name=Chippy&size=small").unwrap();
        assert_eq!(form.name, "Chippy");
        assert_eq!(form.size, "small");
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let form = SquirrelForm::parse(b"size=small&name=Fluffy").unwrap();
        assert_eq!(form.name, "Fluffy");
        assert_eq!(form.size, "small");
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(
            SquirrelForm::parse(b"name=Josh&"),
            Err(FormError::MissingField("size"))
        );
        assert_eq!(
            SquirrelForm::parse(b""),
            Err(FormError::MissingField("name"))
        );
        assert_eq!(
            SquirrelForm::parse(b"name=&size=small"),
            Err(FormError::MissingField("name"))
        );
    }

    #[test]
    fn test_missing_field_message() {
        let err = SquirrelForm::parse(b"name=Fluffy").unwrap_err();
        assert_eq!(err.to_string(), "missing field: size");
    }

    #[test]
    fn test_unknown_and_repeated_keys() {
        let form = SquirrelForm::parse(b"color=red&name=A&name=B&size=small").unwrap();
        assert_eq!(form.name, "A");
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let form = SquirrelForm::parse(b"name=Mr+Nutty%21&size=extra%20large").unwrap();
        assert_eq!(form.name, "Mr Nutty!");
        assert_eq!(form.size, "extra large");
    }

    #[test]
    fn test_malformed_escape_kept() {
        assert_eq!(decode_component(b"100%"), "100%");
        assert_eq!(decode_component(b"%zz"), "%zz");
        assert_eq!(decode_component(b"a%4"), "a%4");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let pairs = parse_pairs(b"name=a=b&flag");
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "a=b".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }
}
