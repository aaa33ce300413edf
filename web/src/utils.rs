use wasm_bindgen::{JsCast, JsValue};

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Readable message for a value thrown or rejected on the JS side.
pub(crate) fn describe_js_error(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    match err.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{:?}", err),
    }
}

/// Seeds given as text in the location hash: numbers are used as is, anything else is hashed.
pub(crate) fn parse_seed(seed: &str) -> u64 {
    let seed = seed.trim();
    seed.parse().unwrap_or_else(|_| {
        // FNV-1a
        seed.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_seed_is_used_verbatim() {
        assert_eq!(parse_seed("42"), 42);
        assert_eq!(parse_seed(" 7 "), 7);
    }

    #[test]
    fn text_seed_is_hashed_stably() {
        assert_eq!(parse_seed("flags"), parse_seed("flags"));
        assert_ne!(parse_seed("flags"), parse_seed("flag"));
        assert_eq!(parse_seed(""), 0xcbf2_9ce4_8422_2325);
    }
}
